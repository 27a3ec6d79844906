//! # Only Style
//!
//! `only_style`项目用纯rust实现神经风格迁移（style transfer）的训练任务：
//! 以VGG为骨干的多层编码器、内容特征重建 + Gram风格统计的感知损失、
//! 优化器与学习率调度器，以及把这些组装在一起的`StyleTransfer`任务。
//! 训练循环本身（遍历批数据、求梯度、保存检查点）由外部训练器负责。
//!

pub mod data;
pub mod enc;
pub mod errors;
pub mod loss;
pub mod models;
pub mod nn;
pub mod ops;
pub mod task;
pub mod tensor;
pub mod utils;
pub mod vision;
