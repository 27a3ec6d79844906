use crate::assert_panic;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_new_tensor() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.data_as_slice(), &[1., 2., 3., 4., 5., 6.]);

    let scalar = Tensor::new(&[7.], &[]);
    assert_eq!(scalar.shape(), &[] as &[usize]);
    assert_eq!(scalar.number(), Some(7.));
}

#[test]
fn test_new_tensor_with_mismatched_len() {
    assert_panic!(Tensor::new(&[1., 2., 3.], &[2, 2]));
}

#[test]
fn test_zeros_and_ones() {
    let zeros = Tensor::zeros(&[2, 3, 4]);
    assert_eq!(zeros.shape(), &[2, 3, 4]);
    assert!(zeros.data_as_slice().iter().all(|&x| x == 0.));

    let ones = Tensor::ones(&[3]);
    assert_eq!(ones, Tensor::new(&[1., 1., 1.], &[3]));

    let like = Tensor::zeros_like(&ones);
    assert_eq!(like, Tensor::new(&[0., 0., 0.], &[3]));
}

#[test]
fn test_new_random_in_range() {
    let tensor = Tensor::new_random(-1.0, 2.0, &[4, 5]);
    assert_eq!(tensor.size(), 20);
    assert!(tensor.data_as_slice().iter().all(|&x| (-1.0..=2.0).contains(&x)));
}

#[test]
fn test_new_normal_with_seed_is_reproducible() {
    let mut rng_1 = StdRng::seed_from_u64(42);
    let mut rng_2 = StdRng::seed_from_u64(42);
    let tensor_1 = Tensor::new_normal_with_rng(0.0, 1.0, &[3, 7], &mut rng_1);
    let tensor_2 = Tensor::new_normal_with_rng(0.0, 1.0, &[3, 7], &mut rng_2);
    assert_eq!(tensor_1, tensor_2);

    let mut rng_3 = StdRng::seed_from_u64(43);
    let tensor_3 = Tensor::new_normal_with_rng(0.0, 1.0, &[3, 7], &mut rng_3);
    assert_ne!(tensor_1, tensor_3);
}

#[test]
fn test_new_normal_statistics() {
    let mut rng = StdRng::seed_from_u64(0);
    let tensor = Tensor::new_normal_with_rng(3.0, 0.5, &[100, 100], &mut rng);
    let mean = tensor.mean();
    let std = (&tensor - mean).powi(2).mean().sqrt();
    assert!((mean - 3.0).abs() < 0.05, "均值偏差过大：{mean}");
    assert!((std - 0.5).abs() < 0.05, "标准差偏差过大：{std}");
}
