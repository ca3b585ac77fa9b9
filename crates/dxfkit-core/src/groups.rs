//! 标签分组
//!
//! 把扁平的标签流按标记组码（通常是 0）切成若干组，每组以标记标签开头：
//! ```text
//! 0 TABLE   ┐ 组 0（表头）
//! 2 LTYPE   ┘
//! 0 LTYPE   ┐ 组 1（表项）
//! 2 DASHED  ┘
//! 0 ENDTAB  ─ 组 2（结束）
//! ```

use std::ops::Index;

use crate::error::{DxfError, Result};
use crate::tag::{GroupCode, Tag, STRUCTURE_MARKER};
use crate::tags::Tags;

#[derive(Debug, Clone)]
pub struct TagGroups {
    groups: Vec<Tags>,
}

impl TagGroups {
    /// 按组码 0 切分
    pub fn new(tags: impl IntoIterator<Item = Tag>) -> Result<Self> {
        Self::with_split_code(tags, STRUCTURE_MARKER)
    }

    /// 按任意标记组码切分；首个标签必须是标记标签
    pub fn with_split_code(tags: impl IntoIterator<Item = Tag>, split_code: GroupCode) -> Result<Self> {
        let mut groups: Vec<Tags> = Vec::new();
        for tag in tags {
            if tag.code == split_code {
                groups.push(Tags::new());
            }
            match groups.last_mut() {
                Some(group) => group.push(tag),
                None => {
                    return Err(DxfError::Validation(format!(
                        "Tag group must start with group code {}, found {}",
                        split_code, tag
                    )))
                }
            }
        }
        Ok(Self { groups })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 组的标记名；`index` 为负数时从末尾计数
    pub fn name(&self, index: isize) -> Option<&str> {
        let index = if index < 0 {
            self.groups.len().checked_sub(index.unsigned_abs())?
        } else {
            index as usize
        };
        self.groups.get(index).and_then(|g| g.first()).and_then(|t| t.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tags> {
        self.groups.iter()
    }

    pub fn into_vec(self) -> Vec<Tags> {
        self.groups
    }
}

impl Index<usize> for TagGroups {
    type Output = Tags;

    fn index(&self, index: usize) -> &Tags {
        &self.groups[index]
    }
}
