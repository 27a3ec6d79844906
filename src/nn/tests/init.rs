use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::nn::Init;

#[test]
fn test_init_constant_values() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(Init::Zeros.generate(&[2, 2], &mut rng).sum(), 0.0);
    assert_eq!(Init::Ones.generate(&[2, 2], &mut rng).sum(), 4.0);
    assert_eq!(Init::Constant(0.5).generate(&[4], &mut rng).data_as_slice(), &[0.5; 4]);
}

#[test]
fn test_init_same_seed_same_weights() {
    let a = Init::Kaiming.generate(&[8, 3, 3, 3], &mut StdRng::seed_from_u64(42));
    let b = Init::Kaiming.generate(&[8, 3, 3, 3], &mut StdRng::seed_from_u64(42));
    let c = Init::Kaiming.generate(&[8, 3, 3, 3], &mut StdRng::seed_from_u64(43));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_init_kaiming_std() {
    // fan_in = 64 * 3 * 3，std = sqrt(2 / 576)
    let weights = Init::Kaiming.generate(&[64, 64, 3, 3], &mut StdRng::seed_from_u64(7));
    let mean = weights.mean();
    let var = weights.map(|x| (x - mean) * (x - mean)).mean();
    assert_abs_diff_eq!(mean, 0.0, epsilon = 0.01);
    assert_abs_diff_eq!(var.sqrt(), (2.0f32 / 576.0).sqrt(), epsilon = 0.005);
}
