//! JSON 辅助函数

use serde::Serialize;
use serde_json::Value;

/// 转为`serde_json::Value`，`f32`字段保留其最短十进制表示
///
/// `serde_json::to_value`会把`f32`按位扩成`f64`（0.9 变成 0.8999999761581421），
/// 这里先按文本序列化再解析
pub fn to_json_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::from_str(&serde_json::to_string(value)?)
}
