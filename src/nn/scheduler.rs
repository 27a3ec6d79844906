/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 学习率调度器，PyTorch `lr_scheduler` 风格：每个 epoch 结束后调用一次`step`
 */

use serde::{Deserialize, Serialize};

use super::NnError;
use super::optimizer::{ConfigOptions, Optimizer, merge_options};

/// 学习率调度器 trait
pub trait LrScheduler: Send {
    /// 推进一个 epoch，并把新的学习率写入优化器
    fn step(&mut self, optimizer: &mut dyn Optimizer) {
        self.advance();
        optimizer.set_learning_rate(self.last_lr());
    }

    /// 推进一个 epoch（不接触优化器）
    fn advance(&mut self);

    /// 当前学习率
    fn last_lr(&self) -> f32;

    /// 已推进的 epoch 数
    fn epoch(&self) -> usize;
}

/// 每`step_size`个 epoch 将学习率乘以`gamma`
#[derive(Debug, Clone)]
pub struct StepLR {
    base_lr: f32,
    step_size: usize,
    gamma: f32,
    epoch: usize,
}

impl StepLR {
    pub fn new(base_lr: f32, step_size: usize, gamma: f32) -> Result<Self, NnError> {
        if step_size == 0 {
            return Err(NnError::InvalidConfig("StepLR 的 step_size 必须大于0".to_string()));
        }
        Ok(Self {
            base_lr,
            step_size,
            gamma,
            epoch: 0,
        })
    }
}

impl LrScheduler for StepLR {
    fn advance(&mut self) {
        self.epoch += 1;
    }

    fn last_lr(&self) -> f32 {
        self.base_lr * self.gamma.powi((self.epoch / self.step_size) as i32)
    }

    fn epoch(&self) -> usize {
        self.epoch
    }
}

/// 每到达一个里程碑 epoch 将学习率乘以`gamma`
#[derive(Debug, Clone)]
pub struct MultiStepLR {
    base_lr: f32,
    milestones: Vec<usize>,
    gamma: f32,
    epoch: usize,
}

impl MultiStepLR {
    pub fn new(base_lr: f32, mut milestones: Vec<usize>, gamma: f32) -> Self {
        milestones.sort_unstable();
        Self {
            base_lr,
            milestones,
            gamma,
            epoch: 0,
        }
    }
}

impl LrScheduler for MultiStepLR {
    fn advance(&mut self) {
        self.epoch += 1;
    }

    fn last_lr(&self) -> f32 {
        let passed = self.milestones.iter().filter(|&&m| m <= self.epoch).count();
        self.base_lr * self.gamma.powi(passed as i32)
    }

    fn epoch(&self) -> usize {
        self.epoch
    }
}

/// 每个 epoch 将学习率乘以`gamma`
#[derive(Debug, Clone)]
pub struct ExponentialLR {
    base_lr: f32,
    gamma: f32,
    epoch: usize,
}

impl ExponentialLR {
    pub fn new(base_lr: f32, gamma: f32) -> Self {
        Self {
            base_lr,
            gamma,
            epoch: 0,
        }
    }
}

impl LrScheduler for ExponentialLR {
    fn advance(&mut self) {
        self.epoch += 1;
    }

    fn last_lr(&self) -> f32 {
        self.base_lr * self.gamma.powi(self.epoch as i32)
    }

    fn epoch(&self) -> usize {
        self.epoch
    }
}

/// 余弦退火：`eta_min + (base_lr - eta_min) * (1 + cos(π * t / t_max)) / 2`，
/// 超过`t_max`后按余弦周期继续变化
#[derive(Debug, Clone)]
pub struct CosineAnnealingLR {
    base_lr: f32,
    t_max: usize,
    eta_min: f32,
    epoch: usize,
}

impl CosineAnnealingLR {
    pub fn new(base_lr: f32, t_max: usize, eta_min: f32) -> Result<Self, NnError> {
        if t_max == 0 {
            return Err(NnError::InvalidConfig(
                "CosineAnnealingLR 的 t_max 必须大于0".to_string(),
            ));
        }
        Ok(Self {
            base_lr,
            t_max,
            eta_min,
            epoch: 0,
        })
    }
}

impl LrScheduler for CosineAnnealingLR {
    fn advance(&mut self) {
        self.epoch += 1;
    }

    fn last_lr(&self) -> f32 {
        let progress = self.epoch as f32 / self.t_max as f32;
        self.eta_min
            + (self.base_lr - self.eta_min) * (1.0 + (std::f32::consts::PI * progress).cos()) / 2.0
    }

    fn epoch(&self) -> usize {
        self.epoch
    }
}

/// 调度器配置，序列化形式如`{"name": "steplr", "step_size": 10}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase", deny_unknown_fields)]
pub enum SchedulerConfig {
    StepLr {
        step_size: usize,
        #[serde(default = "default_gamma")]
        gamma: f32,
    },
    MultiStepLr {
        milestones: Vec<usize>,
        #[serde(default = "default_gamma")]
        gamma: f32,
    },
    ExponentialLr {
        gamma: f32,
    },
    CosineAnnealingLr {
        t_max: usize,
        #[serde(default)]
        eta_min: f32,
    },
}

const fn default_gamma() -> f32 {
    0.1
}

impl SchedulerConfig {
    /// 按名称（大小写不敏感，忽略`_`）与选项构建配置，如`("StepLR", {"step_size": 10})`
    pub fn from_name(
        name: &str,
        options: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, NnError> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let mut value = options.clone();
        value.insert("name".to_string(), serde_json::Value::String(normalized));
        serde_json::from_value(serde_json::Value::Object(value))
            .map_err(|e| NnError::InvalidConfig(format!("调度器`{name}`配置无效：{e}")))
    }

    /// 以`options`覆盖当前配置中的同名选项，如`{"gamma": 0.5}`
    pub fn with_options(&self, options: &ConfigOptions) -> Result<Self, NnError> {
        merge_options(self, options, "调度器")
    }

    /// 以优化器的初始学习率构建调度器实例
    pub fn build(&self, base_lr: f32) -> Result<Box<dyn LrScheduler>, NnError> {
        Ok(match self {
            Self::StepLr { step_size, gamma } => Box::new(StepLR::new(base_lr, *step_size, *gamma)?),
            Self::MultiStepLr { milestones, gamma } => {
                Box::new(MultiStepLR::new(base_lr, milestones.clone(), *gamma))
            }
            Self::ExponentialLr { gamma } => Box::new(ExponentialLR::new(base_lr, *gamma)),
            Self::CosineAnnealingLr { t_max, eta_min } => {
                Box::new(CosineAnnealingLR::new(base_lr, *t_max, *eta_min)?)
            }
        })
    }
}
