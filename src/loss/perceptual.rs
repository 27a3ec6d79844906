/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 感知损失 = 内容损失 + 风格损失
 */

use tracing::debug;

use super::{LossDict, LossError};
use crate::ops::Operator;
use crate::tensor::Tensor;

/// 感知损失
///
/// 持有“当前内容图像”与“当前风格图像”两份可变状态，求值前须先设置；
/// 再次设置会直接覆盖，不保留历史
#[derive(Debug)]
pub struct PerceptualLoss<C: Operator, S: Operator> {
    content_loss: C,
    style_loss: S,
}

impl<C: Operator, S: Operator> PerceptualLoss<C, S> {
    pub fn new(content_loss: C, style_loss: S) -> Self {
        Self {
            content_loss,
            style_loss,
        }
    }

    pub fn content_loss(&self) -> &C {
        &self.content_loss
    }

    pub fn style_loss(&self) -> &S {
        &self.style_loss
    }

    pub fn set_content_image(&mut self, image: &Tensor) -> Result<(), LossError> {
        self.content_loss.set_target_image(image)
    }

    pub fn set_style_image(&mut self, image: &Tensor) -> Result<(), LossError> {
        debug!(shape = ?image.shape(), "设置风格图像");
        self.style_loss.set_target_image(image)
    }

    pub fn has_content_image(&self) -> bool {
        self.content_loss.has_target_image()
    }

    pub fn has_style_image(&self) -> bool {
        self.style_loss.has_target_image()
    }

    /// 对输出图像求值，得到`content_loss`与`style_loss.<层名>`各项
    pub fn evaluate(&self, output_image: &Tensor) -> Result<LossDict, LossError> {
        if !self.has_content_image() {
            return Err(LossError::TargetNotSet("content_loss".to_string()));
        }
        if !self.has_style_image() {
            return Err(LossError::TargetNotSet("style_loss".to_string()));
        }
        let mut losses = LossDict::new();
        losses.extend_prefixed("content_loss", self.content_loss.evaluate(output_image)?);
        losses.extend_prefixed("style_loss", self.style_loss.evaluate(output_image)?);
        Ok(losses)
    }
}
