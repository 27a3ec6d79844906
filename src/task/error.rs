use thiserror::Error;

use crate::data::DataKey;
use crate::enc::EncoderError;
use crate::loss::LossError;
use crate::nn::NnError;
use crate::vision::VisionError;

/// 任务相关错误
#[derive(Debug, Error)]
pub enum TaskError {
    /// 任务不支持的阶段（如风格迁移没有验证、测试阶段）
    #[error("该任务不支持`{0}`阶段：没有可供比较的目标")]
    UnsupportedOperation(String),
    #[error("批数据中缺少`{0}`")]
    MissingBatchKey(DataKey),
    /// 优化器实例只能被取走一次
    #[error("优化器实例已被取走")]
    OptimizerConsumed,
    #[error(transparent)]
    Loss(#[from] LossError),
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error(transparent)]
    Vision(#[from] VisionError),
    #[error(transparent)]
    Nn(#[from] NnError),
    #[error("配置（反）序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}
