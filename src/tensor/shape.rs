use super::Tensor;
use crate::errors::TensorError;
use std::collections::HashSet;

impl Tensor {
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let total_elements: usize = self.data.len();
        let new_total_elements: usize = shape.iter().product();
        assert!(
            total_elements == new_total_elements,
            "{}",
            TensorError::IncompatibleShape
        );
        Self::new(self.data_as_slice(), shape)
    }

    pub fn reshape_mut(&mut self, shape: &[usize]) {
        *self = self.reshape(shape);
    }

    /// 将第`start_dim`维（含）之后的所有维度展平为一维。
    /// 如形状为`[b, c, h, w]`的特征图经`flatten_from(2)`后形状为`[b, c, h*w]`。
    pub fn flatten_from(&self, start_dim: usize) -> Self {
        assert!(start_dim < self.dimension(), "维度超出范围");
        let mut new_shape = self.shape()[..start_dim].to_vec();
        new_shape.push(self.shape()[start_dim..].iter().product());
        self.reshape(&new_shape)
    }

    /// 交换张量的两个（以上）维度，并将其返回（不影响原张量）
    pub fn permute(&self, axes: &[usize]) -> Self {
        assert!(axes.len() == self.dimension(), "{}", TensorError::IncompatibleShape);
        // 检查axes中的所有元素必须是唯一且在[0, <张量维数>)范围内
        let unique_axes = axes.iter().copied().collect::<HashSet<_>>();
        assert!(
            unique_axes.len() == axes.len() && unique_axes.iter().all(|&a| a < self.dimension()),
            "需要交换的维度必须是唯一且在[0, <张量维数>)范围内"
        );

        Self {
            data: self.data.clone().permuted_axes(axes),
        }
        .into_standard_layout()
    }

    /// 交换最后两个维度，如`[b, m, n]`→`[b, n, m]`
    pub fn transpose_last_two(&self) -> Self {
        let dims = self.dimension();
        assert!(dims >= 2, "转置至少需要2个维度");
        let mut axes: Vec<usize> = (0..dims).collect();
        axes.swap(dims - 2, dims - 1);
        self.permute(&axes)
    }

    /// 在指定维度上增加一个长度为1的维度
    pub fn unsqueeze(&self, dim: usize) -> Self {
        assert!(dim <= self.dimension(), "维度超出范围。");
        let mut new_shape = self.shape().to_vec();
        new_shape.insert(dim, 1);
        self.reshape(&new_shape)
    }
}
