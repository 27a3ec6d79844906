use crate::loss::{LossDict, LossError};
use crate::tensor::Tensor;

/// 可求值的损失算子（对象安全，便于组合进感知损失）
pub trait Operator: Send + Sync {
    /// 以目标图像为基准给输入图像打分，返回已乘以权重的分数
    fn evaluate(&self, input_image: &Tensor) -> Result<LossDict, LossError>;

    /// 设置（覆盖）目标图像
    fn set_target_image(&mut self, image: &Tensor) -> Result<(), LossError>;

    fn has_target_image(&self) -> bool;
}
