use std::collections::BTreeMap;

use serde_json::json;

use super::temp_dir;
use crate::assert_err;
use crate::data::{Batch, DataKey};
use crate::task::{
    ImageSerializer, Serializer, SerializerSpec, TaskCore, TaskError, TensorSerializer,
};
use crate::tensor::Tensor;
use crate::vision::read_image;

#[test]
fn test_tensor_serializer() {
    let value = TensorSerializer
        .serialize(&Tensor::new(&[1., 2., 3., 4.], &[2, 2]))
        .unwrap();
    assert_eq!(value, json!({"shape": [2, 2], "data": [1.0, 2.0, 3.0, 4.0]}));
}

#[test]
fn test_image_serializer() {
    let dir = temp_dir("image_serializer");
    let serializer = ImageSerializer::new(&dir);
    let value = serializer.serialize(&Tensor::ones(&[2, 3, 4, 5])).unwrap();
    let paths = value.as_array().unwrap();
    assert_eq!(paths.len(), 2);
    assert_eq!(serializer.count(), 2);
    assert!(paths[1].as_str().unwrap().ends_with("000001.png"));

    let image = read_image(paths[0].as_str().unwrap(), None).unwrap();
    assert_eq!(image, Tensor::ones(&[1, 3, 4, 5]));

    // 计数跨批延续
    let value = serializer.serialize(&Tensor::zeros(&[1, 3, 4, 5])).unwrap();
    assert!(value[0].as_str().unwrap().ends_with("000002.png"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_serializer_spec() {
    let batch = Batch::from_input(Tensor::zeros(&[1, 2]))
        .with(DataKey::Preds, Tensor::ones(&[1, 2]));

    let single = SerializerSpec::Single(Box::new(TensorSerializer));
    assert_eq!(
        single.serialize(&batch).unwrap(),
        json!({"preds": {"shape": [1, 2], "data": [1.0, 1.0]}})
    );
    assert_err!(
        single.serialize(&Batch::from_input(Tensor::zeros(&[1]))),
        TaskError::MissingBatchKey(DataKey::Preds)
    );

    let mut mapping: BTreeMap<DataKey, Box<dyn Serializer>> = BTreeMap::new();
    mapping.insert(DataKey::Input, Box::new(TensorSerializer));
    mapping.insert(DataKey::Target, Box::new(TensorSerializer));
    let mapping = SerializerSpec::Mapping(mapping);
    let value = mapping.serialize(&batch).unwrap();
    assert_eq!(value["input"]["data"], json!([0.0, 0.0]));
    assert!(value.get("target").is_none());
    assert_eq!(mapping.describe(), json!(["input", "target"]));
}

#[test]
fn test_task_core_serialize() {
    let model = crate::models::TransformerNet::new(0);
    let batch = Batch::new().with(DataKey::Preds, Tensor::zeros(&[1]));

    let core = TaskCore::new(Box::new(model), 1e-3);
    assert_eq!(core.serialize(&batch).unwrap(), None);

    let core = core.with_serializer(Some(SerializerSpec::Single(Box::new(TensorSerializer))));
    assert_eq!(
        core.serialize(&batch).unwrap(),
        Some(json!({"preds": {"shape": [1], "data": [0.0]}}))
    );
}
