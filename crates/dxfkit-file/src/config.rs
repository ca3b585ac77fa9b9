//! 新建文档的配置

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::version::DxfVersion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// 目标方言版本，序列化为 `AC1015` 形式
    pub dxfversion: DxfVersion,
    /// 第一个发放的句柄
    pub handle_seed: u64,
    /// 是否创建默认表项（ByBlock、图层 0、Standard 等）
    pub setup_defaults: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            dxfversion: DxfVersion::default(),
            handle_seed: 1,
            setup_defaults: true,
        }
    }
}

impl DocumentConfig {
    pub fn with_version(dxfversion: DxfVersion) -> Self {
        Self {
            dxfversion,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DxfError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DxfError::Config(e.to_string()))
    }
}
