//! 标签序列

use std::ops::Index;
use std::slice;

use crate::error::Result;
use crate::handle::Handle;
use crate::tag::{Tag, TagValue, GroupCode, APP_DATA_MARKER, STRUCTURE_MARKER, SUBCLASS_MARKER};

/// 有序标签序列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn extend(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.0.extend(tags);
    }

    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Tag> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Tag> {
        self.0.last()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.0.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.0.get_mut(index)
    }

    pub fn insert(&mut self, index: usize, tag: Tag) {
        self.0.insert(index, tag);
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.0
    }

    /// 第一个组码为 `code` 的标签位置
    pub fn find_first(&self, code: GroupCode) -> Option<usize> {
        self.0.iter().position(|t| t.code == code)
    }

    /// 第一个组码为 `code` 的标签值
    pub fn value_of(&self, code: GroupCode) -> Option<&TagValue> {
        self.find_first(code).map(|i| &self.0[i].value)
    }

    /// 结构标记名（首个标签为 `0/<name>` 时）
    pub fn dxftype(&self) -> Option<&str> {
        self.0
            .first()
            .filter(|t| t.code == STRUCTURE_MARKER)
            .and_then(|t| t.as_str())
    }

    /// 读取句柄（组码 5，DIMSTYLE 为 105）
    pub fn handle(&self) -> Option<Result<Handle>> {
        let value = self.value_of(5).or_else(|| self.value_of(105))?;
        value.as_str().map(|s| s.parse())
    }

    /// 检查所有标签的值类型
    pub fn check(&self, context: &str) -> Result<()> {
        self.0.iter().try_for_each(|t| t.check(context))
    }

    /// 按子类标记（组码 100）切分
    ///
    /// 第一组为首个子类标记之前的标签（包含结构标记），之后每组都以子类标记开头。
    /// `102 {...}` 应用数据块内部的标签不参与切分。
    pub fn subclass_groups(&self) -> Vec<Tags> {
        let mut groups = vec![Tags::new()];
        let mut in_app_data = false;
        for tag in &self.0 {
            if tag.code == APP_DATA_MARKER {
                in_app_data = tag.as_str().is_some_and(|s| s.starts_with('{'));
            } else if tag.code == SUBCLASS_MARKER && !in_app_data {
                groups.push(Tags::new());
            }
            if let Some(group) = groups.last_mut() {
                group.push(tag.clone());
            }
        }
        groups
    }
}

impl Index<usize> for Tags {
    type Output = Tag;

    fn index(&self, index: usize) -> &Tag {
        &self.0[index]
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Tags {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
