/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 预置模型
 */

mod transformer;

pub use transformer::TransformerNet;

#[cfg(test)]
mod tests;
