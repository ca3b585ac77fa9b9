//! 句柄
//!
//! DXF 句柄是十六进制字符串形式的唯一标识，`"0"` 保留表示"无所属"。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DxfError, Result};

/// 实体句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    /// 空句柄 `"0"`
    pub const NULL: Handle = Handle(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl FromStr for Handle {
    type Err = DxfError;

    fn from_str(s: &str) -> Result<Self> {
        u64::from_str_radix(s.trim(), 16)
            .map(Handle)
            .map_err(|_| DxfError::Validation(format!("Invalid handle: {:?}", s)))
    }
}

/// 文档级句柄分配器
///
/// 单调递增，已发出的句柄即使实体被删除也不会再次发出。
/// `u64::MAX` 只作为耗尽后的种子出现，永远不会被发出。
#[derive(Debug, Clone)]
pub struct HandleGenerator {
    next: u64,
}

impl HandleGenerator {
    /// 从给定种子开始分配（种子 0 会被提升为 1）
    pub fn new(seed: u64) -> Self {
        Self { next: seed.max(1) }
    }

    /// 分配下一个句柄；句柄空间耗尽时返回校验错误
    pub fn next(&mut self) -> Result<Handle> {
        if self.next == u64::MAX {
            return Err(DxfError::Validation("Handle space exhausted".to_string()));
        }
        let handle = Handle(self.next);
        self.next += 1;
        Ok(handle)
    }

    /// 下一个将被分配的值（对应 `$HANDSEED`）
    pub fn seed(&self) -> Handle {
        Handle(self.next)
    }

    /// 保证之后分配的句柄都大于 `handle`
    pub fn reserve(&mut self, handle: Handle) -> Result<()> {
        if handle.0 >= self.next {
            self.next = handle.0.checked_add(1).ok_or_else(|| {
                DxfError::Validation(format!("Handle {} leaves no room for new handles", handle))
            })?;
        }
        Ok(())
    }
}

impl Default for HandleGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
