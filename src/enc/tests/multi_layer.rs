use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::assert_err;
use crate::enc::{EncoderError, MultiLayerEncoder};
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 加上常数并记录调用次数的测试层
struct AddConst {
    value: f32,
    calls: Arc<AtomicUsize>,
}

impl Module for AddConst {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input + self.value)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}

fn toy_encoder(calls: &Arc<AtomicUsize>) -> MultiLayerEncoder {
    let layers: Vec<(String, Box<dyn Module>)> = ["a", "b", "c", "d"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let layer: Box<dyn Module> = Box::new(AddConst {
                value: (i + 1) as f32,
                calls: Arc::clone(calls),
            });
            (name.to_string(), layer)
        })
        .collect();
    MultiLayerEncoder::new(layers).unwrap()
}

#[test]
fn test_encode_returns_requested_order_in_one_pass() {
    let calls = Arc::new(AtomicUsize::new(0));
    let encoder = toy_encoder(&calls);
    let input = Tensor::zeros(&[1]);

    let encodings = encoder.encode(&input, &["c", "a", "c"]).unwrap();
    assert_eq!(encodings.len(), 3);
    assert_eq!(encodings[0].number(), Some(6.0));
    assert_eq!(encodings[1].number(), Some(1.0));
    assert_eq!(encodings[2].number(), Some(6.0));
    // 只计算到最深的层 c
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    assert!(encoder.encode(&input, &[]).unwrap().is_empty());
}

#[test]
fn test_encode_unknown_layer() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    assert_err!(
        encoder.encode(&Tensor::zeros(&[1]), &["a", "z"]),
        EncoderError::UnknownLayer { layer } if layer == "z"
    );
}

#[test]
fn test_duplicate_layer_names() {
    let layers: Vec<(String, Box<dyn Module>)> = vec![
        ("x".to_string(), Box::new(crate::nn::layer::ReLU)),
        ("x".to_string(), Box::new(crate::nn::layer::ReLU)),
    ];
    assert_err!(
        MultiLayerEncoder::new(layers),
        EncoderError::DuplicateLayer(name) if name == "x"
    );
}

#[test]
fn test_layers_and_forward() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    assert_eq!(encoder.layers().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    assert_eq!(encoder.len(), 4);
    assert!(encoder.contains("b"));
    assert!(!encoder.contains("e"));
    assert_eq!(encoder.position("d").unwrap(), 3);
    assert_eq!(encoder.forward(&Tensor::zeros(&[1])).unwrap().number(), Some(10.0));
}

#[test]
fn test_extract_encoder_shares_multi_layer_encoder() {
    let calls = Arc::new(AtomicUsize::new(0));
    let encoder = Arc::new(toy_encoder(&calls));
    let single = encoder.extract_encoder("b").unwrap();
    assert_eq!(single.layer(), "b");
    assert!(Arc::ptr_eq(single.multi_layer_encoder(), &encoder));
    assert_eq!(single.encode(&Tensor::zeros(&[1])).unwrap().number(), Some(3.0));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    assert_err!(encoder.extract_encoder("q"), EncoderError::UnknownLayer { .. });
}

#[test]
fn test_trim() {
    let mut encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    encoder.trim(&[]).unwrap();
    assert_eq!(encoder.len(), 4);
    encoder.trim(&["a", "b"]).unwrap();
    assert_eq!(encoder.layers().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_err!(encoder.trim(&["d"]), EncoderError::UnknownLayer { .. });
}
