/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 示例图像：按名称登记，文件缓存在本地目录，带下载地址的条目会在缺失时自动下载
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::download::{download_file, verify_md5};
use super::{ImageSize, VisionError, read_image};
use crate::tensor::Tensor;

/// 默认风格图像的名称
pub const DEFAULT_STYLE_IMAGE: &str = "paint";

/// 单张示例图像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoImage {
    /// 缓存目录中的文件名
    pub file: String,
    /// 下载地址（可选）
    #[serde(default)]
    pub url: Option<String>,
    /// 文件的 MD5（可选）
    #[serde(default)]
    pub md5: Option<String>,
}

impl DemoImage {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            url: None,
            md5: None,
        }
    }

    pub fn with_url(mut self, url: &str, md5: Option<&str>) -> Self {
        self.url = Some(url.to_string());
        self.md5 = md5.map(str::to_string);
        self
    }
}

/// 示例图像集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoImages {
    root: PathBuf,
    images: BTreeMap<String, DemoImage>,
}

impl Default for DemoImages {
    fn default() -> Self {
        Self::with_root(default_image_dir())
    }
}

impl DemoImages {
    /// 以`root`为缓存目录，并登记内置的示例图像
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        let mut images = BTreeMap::new();
        images.insert(
            DEFAULT_STYLE_IMAGE.to_string(),
            DemoImage::new(&format!("{DEFAULT_STYLE_IMAGE}.jpg")),
        );
        Self {
            root: root.into(),
            images,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 登记（或覆盖）一张示例图像
    pub fn register(&mut self, name: &str, image: DemoImage) {
        self.images.insert(name.to_string(), image);
    }

    /// 为已登记的示例图像指定下载地址与 MD5
    pub fn set_source(
        &mut self,
        name: &str,
        url: &str,
        md5: Option<&str>,
    ) -> Result<(), VisionError> {
        let available = self.names();
        let image = self
            .images
            .get_mut(name)
            .ok_or_else(|| VisionError::UnknownDemoImage {
                name: name.to_string(),
                available,
            })?;
        image.url = Some(url.to_string());
        image.md5 = md5.map(str::to_string);
        Ok(())
    }

    pub fn names(&self) -> Vec<String> {
        self.images.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Result<&DemoImage, VisionError> {
        self.images
            .get(name)
            .ok_or_else(|| VisionError::UnknownDemoImage {
                name: name.to_string(),
                available: self.names(),
            })
    }

    /// 示例图像在缓存目录中的路径（不保证存在）
    pub fn path(&self, name: &str) -> Result<PathBuf, VisionError> {
        Ok(self.root.join(&self.get(name)?.file))
    }

    /// 确保示例图像已在本地：已缓存则校验（若有 MD5），否则按地址下载
    pub fn ensure(&self, name: &str) -> Result<PathBuf, VisionError> {
        let image = self.get(name)?;
        let path = self.root.join(&image.file);
        if path.exists() {
            if image.md5.is_some() {
                verify_md5(&std::fs::read(&path)?, image.md5.as_deref())?;
            }
            return Ok(path);
        }
        match &image.url {
            Some(url) => {
                download_file(url, &path, image.md5.as_deref())?;
                Ok(path)
            }
            None => Err(VisionError::DemoImageNotFound {
                name: name.to_string(),
                path,
            }),
        }
    }

    /// 读取示例图像为`[1, 3, H, W]`张量
    pub fn read(&self, name: &str, size: Option<ImageSize>) -> Result<Tensor, VisionError> {
        let path = self.ensure(name)?;
        debug!(name, path = %path.display(), "读取示例图像");
        read_image(path, size)
    }
}

/// 获取默认的示例图像缓存目录
pub fn default_image_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("only_style")
        .join("images")
}
