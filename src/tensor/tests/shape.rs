use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_reshape() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]);
    assert_eq!(reshaped.shape(), &[3, 2]);
    assert_eq!(reshaped.data_as_slice(), tensor.data_as_slice());

    assert_panic!(tensor.reshape(&[4, 2]));
}

#[test]
fn test_flatten_from() {
    let feature = Tensor::zeros(&[2, 3, 4, 5]);
    assert_eq!(feature.flatten_from(2).shape(), &[2, 3, 20]);
    assert_eq!(feature.flatten_from(1).shape(), &[2, 60]);
    assert_eq!(feature.flatten_from(0).shape(), &[120]);
}

#[test]
fn test_transpose_last_two() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[1, 2, 3]);
    let transposed = tensor.transpose_last_two();
    assert_eq!(transposed.shape(), &[1, 3, 2]);
    // 转置后数据须重新按行优先排列
    assert_eq!(transposed.data_as_slice(), &[1., 4., 2., 5., 3., 6.]);
}

#[test]
fn test_permute_with_invalid_axes() {
    let tensor = Tensor::zeros(&[1, 2, 3]);
    assert_panic!(tensor.permute(&[0, 0, 1]));
    assert_panic!(tensor.permute(&[0, 1]));
}

#[test]
fn test_unsqueeze() {
    let tensor = Tensor::zeros(&[3, 4, 4]);
    assert_eq!(tensor.unsqueeze(0).shape(), &[1, 3, 4, 4]);
    assert_eq!(tensor.unsqueeze(3).shape(), &[3, 4, 4, 1]);
}

#[test]
fn test_can_broadcast_with() {
    let a = Tensor::zeros(&[2, 3, 4]);
    assert!(a.can_broadcast_with(&Tensor::zeros(&[4])));
    assert!(a.can_broadcast_with(&Tensor::zeros(&[3, 1])));
    assert!(a.can_broadcast_with(&Tensor::zeros(&[1, 1, 1, 1])));
    assert!(!a.can_broadcast_with(&Tensor::zeros(&[3])));
}
