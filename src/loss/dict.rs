/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 损失字典：有序的（名称，已加权分数），`total()`为各项之和
 */

use std::fmt;

use serde::Serialize;

/// 损失字典
///
/// 名称可嵌套，如`style_loss.relu1_2`；单个无名分数（`scalar`）并入时直接使用前缀作名称
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LossDict {
    entries: Vec<(String, f32)>,
}

impl LossDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单个无名分数
    pub fn scalar(value: f32) -> Self {
        Self {
            entries: vec![(String::new(), value)],
        }
    }

    /// 插入一项；同名项会被覆盖（保留原位置）
    pub fn insert(&mut self, name: &str, value: f32) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// 以`prefix`为前缀并入另一个字典
    pub fn extend_prefixed(&mut self, prefix: &str, other: Self) {
        for (name, value) in other.entries {
            let name = if name.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{name}")
            };
            self.insert(&name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| *value)
    }

    /// 名称以`prefix`开头（含`prefix`本身及`prefix.*`）的各项之和
    pub fn sum_prefixed(&self, prefix: &str) -> f32 {
        self.entries
            .iter()
            .filter(|(n, _)| n == prefix || n.starts_with(&format!("{prefix}.")))
            .map(|(_, value)| value)
            .sum()
    }

    /// 总损失
    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, value)| value).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl fmt::Display for LossDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            writeln!(f, "{name}: {value:.3e}")?;
        }
        write!(f, "total: {:.3e}", self.total())
    }
}
