mod comparison;
mod multi_layer;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::enc::MultiLayerEncoder;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 乘以常数并记录调用次数的测试层
struct Scale {
    factor: f32,
    calls: Arc<AtomicUsize>,
}

impl Module for Scale {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input * self.factor)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}

/// 层`x2`、`x3`依次乘2、乘3（即`x3`层输出为输入的6倍）
fn toy_encoder(calls: &Arc<AtomicUsize>) -> Arc<MultiLayerEncoder> {
    let layers: Vec<(String, Box<dyn Module>)> = vec![
        (
            "x2".to_string(),
            Box::new(Scale {
                factor: 2.0,
                calls: Arc::clone(calls),
            }),
        ),
        (
            "x3".to_string(),
            Box::new(Scale {
                factor: 3.0,
                calls: Arc::clone(calls),
            }),
        ),
    ];
    Arc::new(MultiLayerEncoder::new(layers).unwrap())
}
