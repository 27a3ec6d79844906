/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 骨干网络注册表与 VGG 构建测试
 */

use std::fs::File;
use std::path::PathBuf;

use ndarray::{Array1, Array4};
use ndarray_npy::NpzWriter;

use crate::assert_err;
use crate::enc::{BackboneOptions, BackboneRegistry, EncoderError, MultiLayerEncoder, WeightSource};
use crate::nn::Module;
use crate::tensor::Tensor;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("only_style_enc_{}_{name}", std::process::id()))
}

#[test]
fn test_registry_default_backbones() {
    let registry = BackboneRegistry::default();
    for name in ["vgg11", "vgg13", "vgg16", "vgg19", "vgg11_bn", "vgg16_bn", "vgg19_bn"] {
        assert!(registry.contains(name), "缺少骨干网络 {name}");
    }
    assert_eq!(registry.available().len(), 8);
}

#[test]
fn test_registry_unknown_backbone() {
    let registry = BackboneRegistry::default();
    assert_err!(
        registry.get("resnet50", &BackboneOptions::default()),
        EncoderError::UnknownBackbone { name, available } if name == "resnet50" && available.len() == 8
    );
}

#[test]
fn test_registry_custom_factory() {
    let mut registry = BackboneRegistry::empty();
    assert!(registry.available().is_empty());
    registry.register("identity", |_| {
        let layers: Vec<(String, Box<dyn Module>)> =
            vec![("relu".to_string(), Box::new(crate::nn::layer::ReLU))];
        MultiLayerEncoder::new(layers)
    });
    let encoder = registry.get("identity", &BackboneOptions::default()).unwrap();
    assert_eq!(encoder.layers().collect::<Vec<_>>(), vec!["relu"]);
}

#[test]
fn test_vgg_required_layers_trim_and_encode() {
    let registry = BackboneRegistry::default();
    let options = BackboneOptions::default().with_required_layers(&["relu1_2", "relu1_1"]);
    let encoder = registry.get("vgg16", &options).unwrap();
    assert_eq!(
        encoder.layers().collect::<Vec<_>>(),
        vec!["preprocessing", "conv1_1", "relu1_1", "conv1_2", "relu1_2"]
    );

    let input = Tensor::new_random(0.0, 1.0, &[1, 3, 8, 8]);
    let encodings = encoder.encode(&input, &["relu1_1", "relu1_2"]).unwrap();
    assert_eq!(encodings[0].shape(), &[1, 64, 8, 8]);
    assert_eq!(encodings[1].shape(), &[1, 64, 8, 8]);
    assert!(encodings[1].data_as_slice().iter().all(|&x| x >= 0.0));

    assert_err!(
        registry.get("vgg16", &BackboneOptions::default().with_required_layers(&["relu9_9"])),
        EncoderError::UnknownLayer { layer } if layer == "relu9_9"
    );
}

#[test]
fn test_vgg_random_weights_are_seeded() {
    let registry = BackboneRegistry::default();
    let build = |seed| {
        let options = BackboneOptions::default()
            .with_weights(WeightSource::Random { seed })
            .with_required_layers(&["relu2_1"]);
        registry.get("vgg11", &options).unwrap()
    };
    let input = Tensor::new_random(0.0, 1.0, &[1, 3, 8, 8]);
    let a = build(1).encode_layer(&input, "relu2_1").unwrap();
    let b = build(1).encode_layer(&input, "relu2_1").unwrap();
    let c = build(2).encode_layer(&input, "relu2_1").unwrap();
    assert_eq!(a.shape(), &[1, 128, 4, 4]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_weight_source_pretrained() {
    assert!(!WeightSource::default().is_pretrained());
    assert!(!WeightSource::Random { seed: 3 }.is_pretrained());
    assert!(
        WeightSource::Npz {
            path: "vgg16.npz".into()
        }
        .is_pretrained()
    );
}

#[test]
fn test_vgg_npz_weights() {
    let path = temp_path("vgg11.npz");
    {
        let mut writer = NpzWriter::new(File::create(&path).unwrap());
        writer
            .add_array("conv1_1.weight", &Array4::<f32>::zeros((64, 3, 3, 3)))
            .unwrap();
        writer
            .add_array("conv1_1.bias", &Array1::<f32>::from_elem(64, 0.5))
            .unwrap();
        writer.finish().unwrap();
    }

    let options = BackboneOptions::default()
        .with_weights(WeightSource::Npz { path: path.clone() })
        .with_required_layers(&["relu1_1"]);
    let encoder = BackboneRegistry::default().get("vgg11", &options).unwrap();
    let output = encoder
        .encode_layer(&Tensor::new_random(0.0, 1.0, &[1, 3, 4, 4]), "relu1_1")
        .unwrap();
    // 卷积核为零：输出恒为偏置
    assert!(output.data_as_slice().iter().all(|&x| x == 0.5));

    // BN 版本缺少 bn1_1 的权重
    assert_err!(
        BackboneRegistry::default().get("vgg11_bn", &options),
        EncoderError::Weights { key, .. } if key.starts_with("bn1_1")
    );
    // 需要 conv2_1 但存档中没有
    let deeper = options.clone().with_required_layers(&["conv2_1"]);
    assert_err!(
        BackboneRegistry::default().get("vgg11", &deeper),
        EncoderError::Weights { key, .. } if key == "conv2_1.weight"
    );

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_vgg_npz_missing_file() {
    let options = BackboneOptions::default().with_weights(WeightSource::Npz {
        path: temp_path("does_not_exist.npz"),
    });
    assert_err!(
        BackboneRegistry::default().get("vgg16", &options),
        EncoderError::Io(_)
    );
}

#[test]
fn test_backbone_options_serde() {
    let options: BackboneOptions =
        serde_json::from_str(r#"{"weights": {"kind": "random", "seed": 7}}"#).unwrap();
    assert_eq!(options.weights, WeightSource::Random { seed: 7 });
    assert!(options.required_layers.is_empty());
}
