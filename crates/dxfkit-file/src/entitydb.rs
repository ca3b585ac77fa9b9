//! 实体数据库：句柄 → 记录
//!
//! 数据库独占所有记录，其他组件只持有句柄。
//! 删除记录不会级联到表成员，表成员由调用方（`Table`）同步维护。

use std::collections::HashMap;

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::handle::{Handle, HandleGenerator};
use tracing::debug;

use crate::entities::DxfEntity;

#[derive(Debug, Default)]
pub struct EntityDb {
    records: HashMap<Handle, DxfEntity>,
    handles: HandleGenerator,
}

impl EntityDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从指定种子开始发放句柄（通常来自 `$HANDSEED`）
    pub fn with_seed(seed: u64) -> Self {
        Self {
            records: HashMap::new(),
            handles: HandleGenerator::new(seed),
        }
    }

    /// 发放新句柄；严格递增，删除后也不复用
    pub fn next_handle(&mut self) -> Result<Handle> {
        self.handles.next()
    }

    /// 下一个将要发放的句柄
    pub fn handle_seed(&self) -> Handle {
        self.handles.seed()
    }

    /// 把外部已占用的句柄登记到发放器
    pub fn reserve(&mut self, handle: Handle) -> Result<()> {
        if handle >= self.handles.seed() {
            debug!("Handle seed raised above loaded handle {}", handle);
        }
        self.handles.reserve(handle)
    }

    /// 存入记录，返回被替换的旧记录
    pub fn store(&mut self, handle: Handle, entity: DxfEntity) -> Result<Option<DxfEntity>> {
        self.reserve(handle)?;
        Ok(self.records.insert(handle, entity))
    }

    pub fn fetch(&self, handle: Handle) -> Result<&DxfEntity> {
        self.records.get(&handle).ok_or(DxfError::HandleNotFound(handle))
    }

    pub fn fetch_mut(&mut self, handle: Handle) -> Result<&mut DxfEntity> {
        self.records
            .get_mut(&handle)
            .ok_or(DxfError::HandleNotFound(handle))
    }

    /// 只删除记录本身
    pub fn delete(&mut self, handle: Handle) -> Result<DxfEntity> {
        self.records
            .remove(&handle)
            .ok_or(DxfError::HandleNotFound(handle))
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.records.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
