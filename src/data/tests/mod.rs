use serde_json::json;

use crate::data::{Batch, DataKey};
use crate::tensor::Tensor;

#[test]
fn test_batch_from_input() {
    let batch = Batch::from_input(Tensor::zeros(&[4, 3, 8, 8]));
    assert_eq!(batch.len(), 4);
    assert!(batch.contains(DataKey::Input));
    assert!(!batch.contains(DataKey::Target));
    assert_eq!(batch.keys().collect::<Vec<_>>(), vec![DataKey::Input]);
    assert!(Batch::new().is_empty());
}

#[test]
fn test_batch_insert_overwrites() {
    let mut batch = Batch::new().with(DataKey::Preds, Tensor::zeros(&[1]));
    let old = batch.insert(DataKey::Preds, Tensor::ones(&[1]));
    assert_eq!(old, Some(Tensor::zeros(&[1])));
    assert_eq!(batch.get(DataKey::Preds), Some(&Tensor::ones(&[1])));
}

#[test]
fn test_batch_metadata() {
    let mut batch = Batch::new();
    assert!(batch.metadata().is_null());
    batch.set_metadata(json!({"file": "a.png"}));
    assert_eq!(batch.metadata()["file"], "a.png");
}

#[test]
fn test_data_key_names() {
    assert_eq!(DataKey::Input.to_string(), "input");
    assert_eq!(serde_json::to_value(DataKey::Preds).unwrap(), "preds");
}
