/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 编码器（骨干网络）相关错误
 */

use thiserror::Error;

use crate::nn::NnError;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("未知的骨干网络`{name}`，可选：{available:?}")]
    UnknownBackbone { name: String, available: Vec<String> },
    #[error("编码器中不存在层`{layer}`")]
    UnknownLayer { layer: String },
    #[error("编码器中存在重复的层名`{0}`")]
    DuplicateLayer(String),
    #[error("读取权重`{key}`失败：{message}")]
    Weights { key: String, message: String },
    #[error(transparent)]
    Nn(#[from] NnError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
