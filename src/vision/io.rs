/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 图像文件与张量之间的读写
 */

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::VisionError;
use crate::tensor::Tensor;

/// 读取图像时的缩放方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
    /// 短边缩放到给定长度，保持宽高比
    Edge(u32),
    /// 缩放到给定的（高，宽）
    Exact { height: u32, width: u32 },
}

impl ImageSize {
    /// 由原始（高，宽）计算目标（高，宽）
    pub fn resolve(self, height: u32, width: u32) -> Result<(u32, u32), VisionError> {
        match self {
            Self::Edge(0) | Self::Exact { height: 0, .. } | Self::Exact { width: 0, .. } => {
                Err(VisionError::InvalidSize(format!("{self:?}")))
            }
            Self::Edge(edge) => {
                let scale = |long: u32, short: u32| {
                    ((f64::from(long) * f64::from(edge) / f64::from(short)).round() as u32).max(1)
                };
                Ok(if height <= width {
                    (edge, scale(width, height))
                } else {
                    (scale(height, width), edge)
                })
            }
            Self::Exact { height, width } => Ok((height, width)),
        }
    }
}

/// 读取图像为`[1, 3, H, W]`张量（像素值位于[0, 1]），可选缩放
pub fn read_image<P: AsRef<Path>>(path: P, size: Option<ImageSize>) -> Result<Tensor, VisionError> {
    let path = path.as_ref();
    let image = image::open(path)?;
    let image = match size {
        Some(size) => resize(image, size)?,
        None => image,
    };
    let (width, height) = image.dimensions();
    debug!(path = %path.display(), height, width, "读取图像");
    Ok(Tensor::from_image(&image))
}

/// 把`[1, 3, H, W]`或`[3, H, W]`张量保存为图像，格式由扩展名决定
pub fn write_image<P: AsRef<Path>>(tensor: &Tensor, path: P) -> Result<(), VisionError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tensor.to_image()?.save(path)?;
    Ok(())
}

fn resize(image: DynamicImage, size: ImageSize) -> Result<DynamicImage, VisionError> {
    let (width, height) = image.dimensions();
    let (new_height, new_width) = size.resolve(height, width)?;
    if (new_height, new_width) == (height, width) {
        return Ok(image);
    }
    Ok(image.resize_exact(new_width, new_height, FilterType::Triangle))
}
