/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2025-02-13 22:07:50
 * @Description  : 张量与`image`库图像之间的转换。
 *                 张量一侧统一为`[1, 3, H, W]`（batch为1的RGB图），像素值位于[0, 1]；
 *                 图像一侧统一为8位RGB。
 */

use super::Tensor;
use crate::errors::TensorError;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

impl Tensor {
    /// 将`image`库的图像转为形状为`[1, 3, H, W]`的张量，像素值缩放到[0, 1]。
    /// 灰度或带透明通道的图像会先被转换为RGB。
    pub fn from_image(image: &DynamicImage) -> Tensor {
        let rgb = image.to_rgb8();
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        let plane = height * width;

        let mut data = vec![0.0f32; 3 * plane];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let offset = y as usize * width + x as usize;
            for c in 0..3 {
                data[c * plane + offset] = f32::from(pixel[c]) / 255.0;
            }
        }
        Tensor::new(&data, &[1, 3, height, width])
    }

    /// 将`[1, 3, H, W]`或`[3, H, W]`的张量转为8位RGB图像，超出[0, 1]的像素值会被截断。
    pub fn to_image(&self) -> Result<RgbImage, TensorError> {
        let (height, width) = self.image_size()?;
        let plane = height * width;
        let data = self.data_as_slice();

        let mut image = RgbImage::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                let offset = y * width + x;
                let mut pixel = [0u8; 3];
                for (c, value) in pixel.iter_mut().enumerate() {
                    *value = (data[c * plane + offset].clamp(0.0, 1.0) * 255.0).round() as u8;
                }
                image.put_pixel(x as u32, y as u32, Rgb(pixel));
            }
        }
        Ok(image)
    }

    /// 确定是图像张量的情况下，返回该图像的（高度，宽度）
    pub fn image_size(&self) -> Result<(usize, usize), TensorError> {
        match self.shape() {
            [1, 3, h, w] | [3, h, w] => Ok((*h, *w)),
            shape => Err(TensorError::NotAnImage(shape.to_vec())),
        }
    }
}
