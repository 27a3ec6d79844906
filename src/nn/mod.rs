/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 负责神经网络（neural network）的构建：前向算子、常见层、优化器与学习率调度器。
 *                 反向传播由外部训练器负责，本模块只接收算好的梯度。
 */

mod error;
pub mod functional;
mod init;
pub mod layer;
mod module;
pub mod optimizer;
pub mod scheduler;

pub use error::NnError;
pub use init::Init;
pub use module::Module;
pub use optimizer::{Adam, ConfigOptions, Optimizer, OptimizerConfig, SGD};
pub use scheduler::{LrScheduler, SchedulerConfig};

#[cfg(test)]
mod tests;
