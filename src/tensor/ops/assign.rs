/*
 * @Author       : 老董
 * @Date         : 2023-09-05 21:18:44
 * @LastEditors  : 老董
 * @LastEditTime : 2025-02-11 16:22:37
 * @Description  : 张量的自运算（+=、-=、*=），用于优化器中矩估计等的原地更新。
 *                 右操作数须能广播到左操作数的形状。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use std::ops::{AddAssign, MulAssign, SubAssign};

impl AddAssign<f32> for Tensor {
    fn add_assign(&mut self, scalar: f32) {
        self.data += scalar;
    }
}

impl<'a> AddAssign<&'a Tensor> for Tensor {
    fn add_assign(&mut self, other: &'a Tensor) {
        assert_assignable(self, other, Operator::AddAssign);
        self.data += &other.data;
    }
}

impl AddAssign for Tensor {
    fn add_assign(&mut self, other: Tensor) {
        *self += &other;
    }
}

impl SubAssign<f32> for Tensor {
    fn sub_assign(&mut self, scalar: f32) {
        self.data -= scalar;
    }
}

impl<'a> SubAssign<&'a Tensor> for Tensor {
    fn sub_assign(&mut self, other: &'a Tensor) {
        assert_assignable(self, other, Operator::SubAssign);
        self.data -= &other.data;
    }
}

impl SubAssign for Tensor {
    fn sub_assign(&mut self, other: Tensor) {
        *self -= &other;
    }
}

impl MulAssign<f32> for Tensor {
    fn mul_assign(&mut self, scalar: f32) {
        self.data *= scalar;
    }
}

impl<'a> MulAssign<&'a Tensor> for Tensor {
    fn mul_assign(&mut self, other: &'a Tensor) {
        assert_assignable(self, other, Operator::MulAssign);
        self.data *= &other.data;
    }
}

/// 自运算不会改变左操作数的形状，故右操作数须能单向广播到左操作数
fn assert_assignable(target: &Tensor, other: &Tensor, operator: Operator) {
    assert!(
        other.data.broadcast(target.data.raw_dim()).is_some(),
        "{}",
        TensorError::OperatorError {
            operator,
            tensor1_shape: target.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        }
    );
}
