/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : nn 模块（层、函数式算子、优化器、调度器）的错误类型
 */

use thiserror::Error;

/// 神经网络操作错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NnError {
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配（期望 {expected:?}，实际 {got:?}）：{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("无效配置：{0}")]
    InvalidConfig(String),
}
