mod serializer;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::nn::{Module, NnError};
use crate::tensor::Tensor;
use crate::task::StyleTransferBuilder;

/// `x * 0.5 + 0.25`，并记录前向调用次数
struct Squash {
    calls: Arc<AtomicUsize>,
}

impl Module for Squash {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input * 0.5 + 0.25)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}

/// 只用到`vgg11`第一层的轻量任务构建器（模型为`Squash`，风格图像为固定种子随机张量）
fn tiny_builder(calls: &Arc<AtomicUsize>) -> StyleTransferBuilder {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    StyleTransferBuilder::new()
        .model(Squash {
            calls: Arc::clone(calls),
        })
        .backbone("vgg11")
        .content_layer("relu1_1")
        .style_layers(&["relu1_1"])
        .style_image_tensor(Tensor::new_random_with_rng(0.0, 1.0, &[1, 3, 8, 8], &mut rng))
}

/// 每个测试独立的临时目录
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("only_style_task_{}_{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
