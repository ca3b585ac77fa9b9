//! DXF 版本（方言门限）
//!
//! `AC1009`（R12）及以下为旧方言：没有子类标记，没有复杂线型的字形词汇。
//! 更高版本为扩展方言，每组属性前必须写子类标记（组码 100）。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DxfError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DxfVersion {
    R12,
    R2000,
    R2004,
    R2007,
    R2010,
    R2013,
    R2018,
}

impl DxfVersion {
    /// `$ACADVER` 中使用的版本字符串
    pub fn acad_version(&self) -> &'static str {
        match self {
            DxfVersion::R12 => "AC1009",
            DxfVersion::R2000 => "AC1015",
            DxfVersion::R2004 => "AC1018",
            DxfVersion::R2007 => "AC1021",
            DxfVersion::R2010 => "AC1024",
            DxfVersion::R2013 => "AC1027",
            DxfVersion::R2018 => "AC1032",
        }
    }

    /// 是否为旧方言
    pub fn is_legacy(&self) -> bool {
        *self <= DxfVersion::R12
    }
}

impl Default for DxfVersion {
    fn default() -> Self {
        DxfVersion::R2000
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.acad_version())
    }
}

impl FromStr for DxfVersion {
    type Err = DxfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            // R12 之前的版本都按旧方言处理
            "AC1006" | "AC1009" | "R12" => Ok(DxfVersion::R12),
            "AC1012" | "AC1014" | "AC1015" | "R2000" => Ok(DxfVersion::R2000),
            "AC1018" | "R2004" => Ok(DxfVersion::R2004),
            "AC1021" | "R2007" => Ok(DxfVersion::R2007),
            "AC1024" | "R2010" => Ok(DxfVersion::R2010),
            "AC1027" | "R2013" => Ok(DxfVersion::R2013),
            "AC1032" | "R2018" => Ok(DxfVersion::R2018),
            other => Err(DxfError::Validation(format!("Unsupported DXF version: {}", other))),
        }
    }
}

impl TryFrom<String> for DxfVersion {
    type Error = DxfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DxfVersion> for String {
    fn from(version: DxfVersion) -> Self {
        version.acad_version().to_string()
    }
}
