use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Zip;
use std::cmp::PartialEq;

impl From<f32> for Tensor {
    /// 实现 From<f32> trait 用于将`f32`类型转换为形状为`[1]`的张量
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 对张量中的所有元素求和
    pub fn sum(&self) -> f32 {
        let mut value = 0.0;
        Zip::from(&self.data).for_each(|a| value += a);
        value
    }

    /// 所有元素的均值。空张量返回`NaN`
    pub fn mean(&self) -> f32 {
        self.sum() / self.size() as f32
    }

    /// 与`other`之间的均方误差（mean squared error），两者形状须严格一致。
    /// 即`mean((self - other)²)`，对应PyTorch中`reduction="mean"`的`mse_loss`。
    pub fn mse(&self, other: &Tensor) -> f32 {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::OperatorError {
                operator: Operator::Mse,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        let mut value = 0.0;
        Zip::from(&self.data)
            .and(&other.data)
            .for_each(|a, b| value += (a - b) * (a - b));
        value / self.size() as f32
    }

    /// 逐元素开平方
    pub fn sqrt(&self) -> Tensor {
        self.map(f32::sqrt)
    }

    /// 逐元素整数次幂
    pub fn powi(&self, n: i32) -> Tensor {
        self.map(|x| x.powi(n))
    }

    /// 逐元素截断到[min, max]区间
    pub fn clamp(&self, min: f32, max: f32) -> Tensor {
        self.map(|x| x.clamp(min, max))
    }

    /// 逐元素映射，返回新张量
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    /// 逐元素就地映射
    pub fn map_inplace<F: Fn(f32) -> f32>(&mut self, f: F) {
        self.data.mapv_inplace(f);
    }

    /// 两个同形张量之间最大的逐元素绝对差，常用于测试中的近似比较
    pub fn max_abs_diff(&self, other: &Tensor) -> f32 {
        assert!(self.is_same_shape(other), "{}", TensorError::IncompatibleShape);
        let mut value = 0.0f32;
        Zip::from(&self.data)
            .and(&other.data)
            .for_each(|a, b| value = value.max((a - b).abs()));
        value
    }
}
