/*
 * @Author       : 老董
 * @Date         : 2023-09-12 15:02:31
 * @LastEditors  : 老董
 * @LastEditTime : 2025-02-12 09:30:18
 * @Description  : 矩阵乘法。Gram矩阵的计算依赖批量矩阵乘（bmm）：[b,m,k] x [b,k,n] -> [b,m,n]
 */

use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Array3, Axis, Ix2, Ix3};

impl Tensor {
    /// 二维矩阵乘法：`[m, k] x [k, n] -> [m, n]`
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        assert_dims(self, 2);
        assert_dims(other, 2);
        assert!(
            self.shape()[1] == other.shape()[0],
            "{}",
            TensorError::OperatorError {
                operator: Operator::Mul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        let a = self.data.view().into_dimensionality::<Ix2>();
        let b = other.data.view().into_dimensionality::<Ix2>();
        match (a, b) {
            (Ok(a), Ok(b)) => Tensor {
                data: a.dot(&b).into_dyn(),
            },
            _ => unreachable!("维数已校验"),
        }
    }

    /// 批量矩阵乘法：`[b, m, k] x [b, k, n] -> [b, m, n]`
    pub fn bmm(&self, other: &Tensor) -> Tensor {
        assert_dims(self, 3);
        assert_dims(other, 3);
        let (batch, m, k) = (self.shape()[0], self.shape()[1], self.shape()[2]);
        let (other_batch, other_k, n) = (other.shape()[0], other.shape()[1], other.shape()[2]);
        assert!(
            batch == other_batch && k == other_k,
            "{}",
            TensorError::OperatorError {
                operator: Operator::BatchMatMul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );

        let (a, b) = match (
            self.data.view().into_dimensionality::<Ix3>(),
            other.data.view().into_dimensionality::<Ix3>(),
        ) {
            (Ok(a), Ok(b)) => (a, b),
            _ => unreachable!("维数已校验"),
        };
        let mut output = Array3::<f32>::zeros((batch, m, n));
        for i in 0..batch {
            let product = a.index_axis(Axis(0), i).dot(&b.index_axis(Axis(0), i));
            output.index_axis_mut(Axis(0), i).assign(&product);
        }
        Tensor {
            data: output.into_dyn(),
        }
    }
}

fn assert_dims(tensor: &Tensor, expected: usize) {
    assert!(
        tensor.dimension() == expected,
        "{}",
        TensorError::DimensionMismatch {
            expected,
            got: tensor.dimension(),
        }
    );
}
