use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 张量运算中的错误。张量层面的误用（形状不符、除零等）属于编程错误，
/// 故这些错误一般作为`panic`的消息出现，而非`Result`。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    DataLenMismatch { data_len: usize, shape: Vec<usize> },

    #[error("张量形状不兼容")]
    IncompatibleShape,
    #[error("张量维数须为{expected}，实际为{got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("图像张量应为[1, 3, H, W]或[3, H, W]形状，实际为{0:?}")]
    NotAnImage(Vec<usize>),
    #[error("除数为零")]
    DivByZero,
    #[error("作为除数的张量中存在为零元素")]
    DivByZeroElement,
}
