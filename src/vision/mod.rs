/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 本模块提供图像读写与示例图像相关的功能。
 *                 在本模块中，所谓的image/图像是指RGB格式的图像，对应张量形状为`[1, 3, H, W]`。
 */

mod demo;
mod download;
mod error;
mod io;

pub use demo::{DEFAULT_STYLE_IMAGE, DemoImage, DemoImages, default_image_dir};
pub use download::{compute_md5, download_file, verify_md5};
pub use error::VisionError;
pub use io::{ImageSize, read_image, write_image};

#[cfg(test)]
pub(crate) mod tests;
