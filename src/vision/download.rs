//! 通用下载工具
//!
//! 提供 HTTP 下载和 MD5 校验功能，供示例图像等复用。

use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};
use tracing::info;

use super::VisionError;

/// 下载文件并保存到指定路径
///
/// # 参数
/// - `url`: 下载地址
/// - `dest_path`: 保存路径（父目录不存在时会自动创建）
/// - `expected_md5`: 可选的 MD5 校验码，提供时会验证下载内容，不通过则不写入文件
pub fn download_file(
    url: &str,
    dest_path: &Path,
    expected_md5: Option<&str>,
) -> Result<(), VisionError> {
    info!(url, "正在下载");

    let response = ureq::get(url)
        .call()
        .map_err(|e| VisionError::Download(format!("HTTP 请求失败: {e}")))?;

    if response.status() != 200 {
        return Err(VisionError::Download(format!(
            "HTTP 状态码: {}",
            response.status()
        )));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| VisionError::Download(format!("读取响应失败: {e}")))?;

    verify_md5(&bytes, expected_md5)?;

    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest_path, &bytes)?;

    info!(path = %dest_path.display(), "下载完成");
    Ok(())
}

/// MD5 校验（未提供预期值时直接通过）
pub fn verify_md5(data: &[u8], expected_md5: Option<&str>) -> Result<(), VisionError> {
    if let Some(expected) = expected_md5 {
        let actual = compute_md5(data);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(VisionError::ChecksumMismatch {
                expected: expected.to_string(),
                got: actual,
            });
        }
    }
    Ok(())
}

/// 计算数据的 MD5 校验码
pub fn compute_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}
