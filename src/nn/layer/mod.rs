/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Layer 模块 - 常见网络层，均实现`Module`，前向委托给`functional`中的算子
 */

mod activation;
mod conv2d;
mod max_pool2d;
mod norm;
mod sequential;
mod upsample;

pub use activation::{ReLU, Sigmoid};
pub use conv2d::Conv2d;
pub use max_pool2d::MaxPool2d;
pub use norm::{BatchNorm2d, InstanceNorm2d};
pub use sequential::Sequential;
pub use upsample::Upsample;
