/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 从`.npz`读取骨干网络权重并组装感知损失
 */
use std::fs::File;

use ndarray::{Array1, Array4};
use ndarray_npy::NpzWriter;
use only_style::enc::{BackboneRegistry, WeightSource};
use only_style::task::{StyleTransferConfig, TaskError, perceptual_loss};
use only_style::tensor::Tensor;

#[test]
fn test_perceptual_loss_with_npz_weights() -> Result<(), TaskError> {
    let path = std::env::temp_dir().join(format!(
        "only_style_perceptual_{}.npz",
        std::process::id()
    ));
    {
        let mut writer = NpzWriter::new(File::create(&path)?);
        writer
            .add_array("conv1_1.weight", &Array4::<f32>::zeros((64, 3, 3, 3)))
            .unwrap();
        writer
            .add_array("conv1_1.bias", &Array1::<f32>::ones(64))
            .unwrap();
        writer.finish().unwrap();
    }

    let config = StyleTransferConfig {
        backbone: "vgg11".to_string(),
        backbone_weights: WeightSource::Npz { path: path.clone() },
        content_layer: "relu1_1".to_string(),
        style_layers: vec!["relu1_1".to_string(), "conv1_1".to_string()],
        ..Default::default()
    };
    let mut loss = perceptual_loss(&BackboneRegistry::default(), &config)?;
    loss.set_style_image(&Tensor::new_random(0.0, 1.0, &[1, 3, 6, 6]))?;
    loss.set_content_image(&Tensor::new_random(0.0, 1.0, &[1, 3, 6, 6]))?;

    // 卷积核为零：任何图像的特征都恒为1，各项损失均为0
    let losses = loss.evaluate(&Tensor::new_random(0.0, 1.0, &[1, 3, 6, 6]))?;
    println!("{losses}");
    assert_eq!(losses.len(), 3);
    assert_eq!(losses.total(), 0.0);

    std::fs::remove_file(&path)?;
    Ok(())
}
