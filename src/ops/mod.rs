/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 损失算子：内容（特征重建）与风格（Gram）比较，以及多层组合
 */

mod comparison;
mod multi_layer;
mod operator;
mod representation;

pub use comparison::{EncodingComparisonOperator, FeatureReconstructionOperator, GramOperator};
pub use multi_layer::{LayerWeights, MultiLayerEncodingOperator};
pub use operator::Operator;
pub use representation::{
    FeatureReconstruction, Gram, GramNormalization, Representation, gram_matrix,
};

#[cfg(test)]
mod tests;
