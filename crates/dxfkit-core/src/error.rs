//! DXF 读写错误定义

use thiserror::Error;

use crate::handle::Handle;
use crate::tag::{GroupCode, ValueKind};

/// 错误分类
///
/// 结构性错误（格式、分帧）一律中止当前读写操作，不做局部恢复。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 组码与值类型不符
    Format,
    /// 句柄或名称不存在
    Lookup,
    /// 线型定义字符串语法错误
    Parse,
    /// 分帧或结构约束被破坏
    Validation,
    /// 底层流错误
    Io,
    /// 配置解码错误
    Config,
}

#[derive(Error, Debug)]
pub enum DxfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: group code {code} expects {expected}, found {found} ({context})")]
    Format {
        code: GroupCode,
        expected: ValueKind,
        found: ValueKind,
        context: String,
    },

    #[error("Format error: invalid group code {value:?} at line {line}")]
    InvalidGroupCode { line: usize, value: String },

    #[error("Format error: group code {code} at line {line}: {reason}")]
    InvalidValue {
        code: GroupCode,
        line: usize,
        reason: String,
    },

    #[error("Format error: group code {code} in {context}: {reason}")]
    UnwritableValue {
        code: GroupCode,
        context: String,
        reason: String,
    },

    #[error("Handle not found: {0}")]
    HandleNotFound(Handle),

    #[error("Table entry not found: {table}/{name}")]
    EntryNotFound { table: String, name: String },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Unknown attribute {name:?} for {dxftype}")]
    UnknownAttribute { dxftype: String, name: String },

    #[error("Linetype parse error at token {position} ({token:?}): {reason}")]
    Parse {
        position: usize,
        token: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl DxfError {
    /// 返回错误所属分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            DxfError::Format { .. }
            | DxfError::InvalidGroupCode { .. }
            | DxfError::InvalidValue { .. }
            | DxfError::UnwritableValue { .. } => ErrorKind::Format,
            DxfError::HandleNotFound(_)
            | DxfError::EntryNotFound { .. }
            | DxfError::TableNotFound(_)
            | DxfError::UnknownAttribute { .. } => ErrorKind::Lookup,
            DxfError::Parse { .. } => ErrorKind::Parse,
            DxfError::Validation(_) => ErrorKind::Validation,
            DxfError::Io(_) => ErrorKind::Io,
            DxfError::Config(_) => ErrorKind::Config,
        }
    }

    pub fn parse(position: usize, token: impl Into<String>, reason: impl Into<String>) -> Self {
        DxfError::Parse {
            position,
            token: token.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DxfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let err = DxfError::HandleNotFound(Handle::new(0x1F));
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.to_string(), "Handle not found: 1F");

        let err = DxfError::Format {
            code: 70,
            expected: ValueKind::Int,
            found: ValueKind::Str,
            context: "LTYPE".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("group code 70"));
    }
}
