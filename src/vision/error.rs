use std::path::PathBuf;

use thiserror::Error;

use crate::errors::TensorError;

/// 图像读写、示例图像下载相关错误
#[derive(Debug, Error)]
pub enum VisionError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 图像解码/编码错误
    #[error("图像错误: {0}")]
    Image(#[from] image::ImageError),

    /// 张量不是图像
    #[error(transparent)]
    Tensor(#[from] TensorError),

    /// 图像尺寸无效
    #[error("无效的图像尺寸: {0}")]
    InvalidSize(String),

    /// 下载错误
    #[error("下载错误: {0}")]
    Download(String),

    /// 校验和不匹配
    #[error("校验和不匹配: 期望 {expected}, 实际 {got}")]
    ChecksumMismatch { expected: String, got: String },

    /// 未注册的示例图像
    #[error("未知的示例图像`{name}`，可选：{available:?}")]
    UnknownDemoImage { name: String, available: Vec<String> },

    /// 示例图像未缓存且无下载地址
    #[error("示例图像`{name}`不存在：请将其放置于 {path:?}，或为其登记下载地址")]
    DemoImageNotFound { name: String, path: PathBuf },
}
