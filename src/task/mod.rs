/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 任务模块：通用任务基础（模型、优化器、调度器、序列化器）与风格迁移任务
 */

mod base;
mod config;
mod error;
mod serializer;
mod style_transfer;

pub use base::{ConfiguredOptimizers, OptimizerSpec, Options, SchedulerSpec, Task, TaskCore};
pub use config::StyleTransferConfig;
pub use error::TaskError;
pub use serializer::{ImageSerializer, Serializer, SerializerSpec, TensorSerializer};
pub use style_transfer::{
    STYLE_GRAM_NORMALIZATION, StyleImage, StyleTransfer, StyleTransferBuilder,
    StyleTransferHparams, StyleTransferLoss, perceptual_loss,
};

#[cfg(test)]
mod tests;
