//! 表项实体
//!
//! - `Linetype`: 带线型图案的 LTYPE 表项
//! - `TableEntry`: 其余按模式加载的符号表记录
//! - `RawEntity`: 没有注册模式的类型，按原始标签保留

pub mod ltype;
pub mod schemas;

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::handle::Handle;
use dxfkit_core::namespace::DxfNamespace;
use dxfkit_core::tag::{Tag, TagValue};
use dxfkit_core::tags::Tags;
use dxfkit_core::version::DxfVersion;
use dxfkit_core::writer::TagWriter;
use tracing::debug;

pub use ltype::{Linetype, LinetypePattern};
pub use schemas::schema_for;

/// 新建表项时使用的属性集合
#[derive(Debug, Clone, Default)]
pub struct DxfAttribs {
    values: Vec<(String, TagValue)>,
    pattern: Option<LinetypePattern>,
}

impl DxfAttribs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<TagValue>) -> Self {
        self.set(name, value);
        self
    }

    /// 线型图案（仅 LTYPE 使用）
    pub fn with_pattern(mut self, pattern: LinetypePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<TagValue>) {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(|v| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn take_pattern(&mut self) -> Option<LinetypePattern> {
        self.pattern.take()
    }
}

/// 按模式加载的通用表项
#[derive(Debug, Clone)]
pub struct TableEntry {
    pub dxf: DxfNamespace,
}

/// 未注册类型的原始记录
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    tags: Tags,
}

impl RawEntity {
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    fn handle_index(&self) -> Option<usize> {
        self.tags
            .find_first(5)
            .or_else(|| self.tags.find_first(105))
    }
}

#[derive(Debug, Clone)]
pub enum DxfEntity {
    Linetype(Linetype),
    Entry(TableEntry),
    Raw(RawEntity),
}

impl DxfEntity {
    /// 从一条记录（以 `0/<type>` 开头）的标签加载
    pub fn load(tags: &Tags) -> Result<Self> {
        let dxftype = tags
            .dxftype()
            .ok_or_else(|| DxfError::Validation(format!("Entity record must start with a structure tag: {:?}", tags.first())))?;
        match schema_for(dxftype) {
            Some(schema) if schema.dxftype == "LTYPE" => Ok(DxfEntity::Linetype(Linetype::load(tags)?)),
            Some(schema) => Ok(DxfEntity::Entry(TableEntry {
                dxf: DxfNamespace::load(tags, schema)?,
            })),
            None => {
                debug!("Loading {} as raw tags", dxftype);
                tags.check(dxftype)?;
                Ok(DxfEntity::Raw(RawEntity { tags: tags.clone() }))
            }
        }
    }

    /// 新建指定类型的表项
    pub fn new(dxftype: &str, handle: Handle, owner: Handle, attribs: DxfAttribs) -> Result<Self> {
        let schema = schema_for(dxftype)
            .ok_or_else(|| DxfError::Validation(format!("Cannot create entity of unregistered type {}", dxftype)))?;
        if schema.dxftype == "LTYPE" {
            return Ok(DxfEntity::Linetype(Linetype::new(handle, owner, attribs)?));
        }

        let mut dxf = DxfNamespace::new(schema);
        dxf.set("handle", handle.to_string())?;
        if !owner.is_null() {
            dxf.set("owner", owner.to_string())?;
        }
        for (name, value) in attribs.iter() {
            dxf.set(name, value.clone())?;
        }
        // 新建表项带上所有声明了默认值的属性，加载的记录保持原样
        for (_, attr) in schema.attribs() {
            if let Some(default) = attr.default {
                if !dxf.has(attr.name) {
                    dxf.set(attr.name, default.to_value())?;
                }
            }
        }
        Ok(DxfEntity::Entry(TableEntry { dxf }))
    }

    pub fn namespace(&self) -> Option<&DxfNamespace> {
        match self {
            DxfEntity::Linetype(ltype) => Some(&ltype.dxf),
            DxfEntity::Entry(entry) => Some(&entry.dxf),
            DxfEntity::Raw(_) => None,
        }
    }

    pub fn namespace_mut(&mut self) -> Option<&mut DxfNamespace> {
        match self {
            DxfEntity::Linetype(ltype) => Some(&mut ltype.dxf),
            DxfEntity::Entry(entry) => Some(&mut entry.dxf),
            DxfEntity::Raw(_) => None,
        }
    }

    pub fn dxftype(&self) -> &str {
        match self {
            DxfEntity::Raw(raw) => raw.tags.dxftype().unwrap_or_default(),
            _ => self.namespace().map(|ns| ns.dxftype()).unwrap_or_default(),
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        match self {
            DxfEntity::Raw(raw) => raw.tags.handle().and_then(|h| h.ok()),
            _ => self.namespace().and_then(|ns| ns.handle()),
        }
    }

    /// 设置句柄；原始记录没有句柄时插入到结构标记之后
    pub fn set_handle(&mut self, handle: Handle) -> Result<()> {
        match self {
            DxfEntity::Raw(raw) => {
                match raw.handle_index() {
                    Some(index) => {
                        let code = raw.tags[index].code;
                        if let Some(tag) = raw.tags.get_mut(index) {
                            *tag = Tag::new(code, handle.to_string());
                        }
                    }
                    None => raw.tags.insert(1, Tag::new(5, handle.to_string())),
                }
                Ok(())
            }
            _ => match self.namespace_mut() {
                Some(ns) => ns.set("handle", handle.to_string()),
                None => Ok(()),
            },
        }
    }

    pub fn owner(&self) -> Option<Handle> {
        match self {
            DxfEntity::Raw(raw) => raw
                .tags
                .value_of(330)
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok()),
            _ => self.namespace().and_then(|ns| ns.owner()),
        }
    }

    /// 名称属性（组码 2）
    pub fn name(&self) -> Option<&str> {
        match self {
            DxfEntity::Raw(raw) => raw.tags.value_of(2).and_then(|v| v.as_str()),
            _ => self.namespace().and_then(|ns| ns.get_str("name")),
        }
    }

    pub fn as_linetype(&self) -> Option<&Linetype> {
        match self {
            DxfEntity::Linetype(ltype) => Some(ltype),
            _ => None,
        }
    }

    pub fn as_linetype_mut(&mut self) -> Option<&mut Linetype> {
        match self {
            DxfEntity::Linetype(ltype) => Some(ltype),
            _ => None,
        }
    }

    /// 目标版本下是否导出该记录
    pub fn preprocess_export(&self, version: DxfVersion) -> bool {
        match self {
            DxfEntity::Linetype(ltype) => ltype.preprocess_export(version),
            _ => true,
        }
    }

    pub fn export_dxf<W: std::io::Write>(&self, writer: &mut TagWriter<W>) -> Result<()> {
        match self {
            DxfEntity::Linetype(ltype) => ltype.export_dxf(writer),
            DxfEntity::Entry(entry) => entry.dxf.export_entity(writer, &["name", "flags"]),
            DxfEntity::Raw(raw) => writer.write_tags(&raw.tags),
        }
    }
}
