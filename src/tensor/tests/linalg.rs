use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_mat_mul() {
    let a = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let b = Tensor::new(&[7., 8., 9., 10., 11., 12.], &[3, 2]);
    let expected = Tensor::new(&[58., 64., 139., 154.], &[2, 2]);
    assert_eq!(a.mat_mul(&b), expected);
}

#[test]
fn test_mat_mul_with_mismatched_shapes() {
    let a = Tensor::zeros(&[2, 3]);
    assert_panic!(a.mat_mul(&Tensor::zeros(&[2, 3])));
    assert_panic!(a.mat_mul(&Tensor::zeros(&[3])));
}

#[test]
fn test_bmm() {
    let a = Tensor::new(&[1., 2., 3., 4., 1., 0., 0., 1.], &[2, 2, 2]);
    let b = Tensor::new(&[1., 0., 0., 1., 5., 6., 7., 8.], &[2, 2, 2]);
    let result = a.bmm(&b);
    assert_eq!(result.shape(), &[2, 2, 2]);
    assert_eq!(result.data_as_slice(), &[1., 2., 3., 4., 5., 6., 7., 8.]);
}

#[test]
fn test_bmm_with_its_transpose_is_symmetric() {
    let x = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[1, 2, 3]);
    let gram = x.bmm(&x.transpose_last_two());
    assert_eq!(gram.shape(), &[1, 2, 2]);
    // [1,2,3]·[1,2,3]=14, [1,2,3]·[4,5,6]=32, [4,5,6]·[4,5,6]=77
    assert_eq!(gram.data_as_slice(), &[14., 32., 32., 77.]);
}

#[test]
fn test_bmm_with_mismatched_batch() {
    let a = Tensor::zeros(&[2, 2, 3]);
    let b = Tensor::zeros(&[1, 3, 2]);
    assert_panic!(a.bmm(&b));
}
