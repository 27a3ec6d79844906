use crate::assert_err;
use crate::models::TransformerNet;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

#[test]
fn test_transformer_net_param_count() {
    let model = TransformerNet::new(0);
    assert_eq!(model.num_params(), 1_679_235);
    // 每个卷积块 2 个卷积参数 + 2 个实例归一化参数，输出层只有卷积参数
    assert_eq!(model.parameters().len(), 5 * 4 + 5 * 8 + 2);
}

#[test]
fn test_transformer_net_preserves_size_and_range() {
    let model = TransformerNet::new(0);
    let input = Tensor::new_random(0.0, 1.0, &[2, 3, 8, 12]);
    let output = model.forward(&input).unwrap();
    assert_eq!(output.shape(), &[2, 3, 8, 12]);
    assert!(output.data_as_slice().iter().all(|&x| (0.0..=1.0).contains(&x)));
}

#[test]
fn test_transformer_net_is_seeded() {
    let input = Tensor::new_random(0.0, 1.0, &[1, 3, 8, 8]);
    let a = TransformerNet::new(3).forward(&input).unwrap();
    let b = TransformerNet::new(3).forward(&input).unwrap();
    let c = TransformerNet::new(4).forward(&input).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_transformer_net_invalid_input() {
    let model = TransformerNet::new(0);
    assert_err!(
        model.forward(&Tensor::zeros(&[1, 1, 8, 8])),
        NnError::ShapeMismatch { .. }
    );
    assert_err!(
        model.forward(&Tensor::zeros(&[1, 3, 10, 8])),
        NnError::InvalidOperation(_)
    );
}
