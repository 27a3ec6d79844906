/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 感知损失与损失字典
 */

mod dict;
mod error;
mod perceptual;

pub use dict::LossDict;
pub use error::LossError;
pub use perceptual::PerceptualLoss;

#[cfg(test)]
mod tests;
