//! 实体属性命名空间
//!
//! 按模式把标签组装成属性表，再按模式顺序导出。
//! 模式未声明的标签按子类分组原样保留，保证无损往返。

use std::collections::HashMap;

use crate::error::{DxfError, Result};
use crate::handle::Handle;
use crate::schema::{DxfAttr, EntitySchema};
use crate::tag::{Tag, TagValue, APP_DATA_MARKER, STRUCTURE_MARKER};
use crate::tags::Tags;
use crate::writer::TagWriter;

/// 某个子类中未被模式识别的标签
#[derive(Debug, Clone, PartialEq)]
pub struct UnprocessedTags {
    /// 子类标记名；`None` 为基础类（或没有子类标记的旧方言记录）
    pub subclass: Option<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone)]
pub struct DxfNamespace {
    schema: &'static EntitySchema,
    values: HashMap<&'static str, TagValue>,
    unprocessed: Vec<UnprocessedTags>,
    /// 加载自没有子类标记的记录
    flat: bool,
}

impl DxfNamespace {
    /// 空命名空间
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            unprocessed: Vec::new(),
            flat: true,
        }
    }

    /// 从一条记录的标签加载
    ///
    /// 标签值类型与组码不符时返回格式错误。
    /// 同一属性重复出现时只取第一次，之后的按未识别标签保留。
    pub fn load(tags: &Tags, schema: &'static EntitySchema) -> Result<Self> {
        let mut namespace = Self::new(schema);
        let groups = tags.subclass_groups();
        namespace.flat = groups.len() == 1;

        for (group_index, group) in groups.iter().enumerate() {
            let (marker, body) = if group_index == 0 {
                (None, group.as_slice())
            } else {
                (group[0].as_str(), &group.as_slice()[1..])
            };
            let subclass_index = if group_index == 0 {
                Some(0)
            } else {
                marker.and_then(|m| schema.subclass_index(m))
            };

            let mut rest = Tags::new();
            let mut in_app_data = false;
            for (i, tag) in body.iter().enumerate() {
                tag.check(schema.dxftype)?;
                if group_index == 0 && i == 0 && tag.code == STRUCTURE_MARKER {
                    continue;
                }
                if tag.code == APP_DATA_MARKER {
                    in_app_data = tag.as_str().is_some_and(|s| s.starts_with('{'));
                    rest.push(tag.clone());
                    continue;
                }
                if in_app_data {
                    rest.push(tag.clone());
                    continue;
                }

                let attr = if namespace.flat {
                    schema.by_code(tag.code)
                } else {
                    subclass_index
                        .and_then(|i| schema.subclasses[i].by_code(tag.code).map(|a| (i, a)))
                };
                match attr {
                    Some((_, attr)) if !namespace.values.contains_key(attr.name) => {
                        namespace.values.insert(attr.name, tag.value.clone());
                    }
                    _ => rest.push(tag.clone()),
                }
            }

            // 未知子类即使没有内容也要保留标记
            if !rest.is_empty() || (group_index > 0 && subclass_index.is_none()) {
                namespace.unprocessed.push(UnprocessedTags {
                    subclass: marker.map(str::to_string),
                    tags: rest,
                });
            }
        }
        Ok(namespace)
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn dxftype(&self) -> &'static str {
        self.schema.dxftype
    }

    fn attr(&self, name: &str) -> Result<&'static DxfAttr> {
        self.schema
            .get(name)
            .map(|(_, a)| a)
            .ok_or_else(|| DxfError::UnknownAttribute {
                dxftype: self.schema.dxftype.to_string(),
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_i64())
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_f64())
    }

    /// 属性值，缺失时返回模式默认值
    pub fn get_or_default(&self, name: &str) -> Result<Option<TagValue>> {
        let attr = self.attr(name)?;
        Ok(self
            .values
            .get(attr.name)
            .cloned()
            .or_else(|| attr.default.map(|d| d.to_value())))
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// 设置属性；属性未声明或值类型与组码不符时报错
    pub fn set(&mut self, name: &str, value: impl Into<TagValue>) -> Result<()> {
        let attr = self.attr(name)?;
        let value = value.into();
        Tag::new(attr.code, value.clone()).check(self.schema.dxftype)?;
        self.values.insert(attr.name, value);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<TagValue> {
        self.values.remove(name)
    }

    pub fn handle(&self) -> Option<Handle> {
        self.get_str("handle").and_then(|s| s.parse().ok())
    }

    pub fn owner(&self) -> Option<Handle> {
        self.get_str("owner").and_then(|s| s.parse().ok())
    }

    pub fn unprocessed(&self) -> &[UnprocessedTags] {
        &self.unprocessed
    }

    /// 取出某个子类的未识别标签
    ///
    /// 记录没有子类标记时（旧方言），取出唯一的无名分组。
    pub fn take_unprocessed(&mut self, subclass: &str) -> Tags {
        let position = if self.flat {
            self.unprocessed.iter().position(|u| u.subclass.is_none())
        } else {
            self.unprocessed
                .iter()
                .position(|u| u.subclass.as_deref() == Some(subclass))
        };
        position
            .map(|i| self.unprocessed.remove(i).tags)
            .unwrap_or_default()
    }

    fn unprocessed_of(&self, subclass: Option<&str>) -> Option<&Tags> {
        self.unprocessed
            .iter()
            .find(|u| u.subclass.as_deref() == subclass)
            .map(|u| &u.tags)
    }

    fn export_value<W: std::io::Write>(
        &self,
        writer: &mut TagWriter<W>,
        attr: &DxfAttr,
        force: bool,
    ) -> Result<bool> {
        if !attr.is_valid_for(writer.dxfversion()) {
            return Ok(false);
        }
        let value = match self.values.get(attr.name) {
            Some(value) => value.clone(),
            None if force => match attr.default {
                Some(default) => default.to_value(),
                None => return Ok(false),
            },
            None => return Ok(false),
        };
        writer.write_tag(&Tag::new(attr.code, value))?;
        Ok(true)
    }

    /// 按模式声明顺序导出指定属性
    ///
    /// `force` 为真时缺失属性以默认值导出，否则跳过。
    /// 扩展方言下，每个子类第一个导出的属性前写该子类的标记。
    pub fn export_dxf_attribs<W: std::io::Write>(
        &self,
        writer: &mut TagWriter<W>,
        names: &[&str],
        force: bool,
    ) -> Result<()> {
        let mut current_subclass = None;
        for (index, attr) in self.schema.attribs() {
            if !names.contains(&attr.name) {
                continue;
            }
            if current_subclass != Some(index) && self.would_export(attr, writer, force) {
                if let Some(marker) = self.schema.subclasses[index].name {
                    writer.write_subclass(marker)?;
                }
                current_subclass = Some(index);
            }
            self.export_value(writer, attr, force)?;
        }
        Ok(())
    }

    fn would_export<W: std::io::Write>(&self, attr: &DxfAttr, writer: &TagWriter<W>, force: bool) -> bool {
        attr.is_valid_for(writer.dxfversion())
            && (self.values.contains_key(attr.name) || (force && attr.default.is_some()))
    }

    /// 导出整条记录：结构标记、各子类标记与属性、保留的未识别标签
    ///
    /// `force` 中列出的属性缺失时以默认值导出。
    pub fn export_entity<W: std::io::Write>(&self, writer: &mut TagWriter<W>, force: &[&str]) -> Result<()> {
        writer.write_structure(self.schema.dxftype)?;

        for (index, subclass) in self.schema.subclasses.iter().enumerate() {
            if let Some(marker) = subclass.name {
                writer.write_subclass(marker)?;
            }
            for attr in subclass.attribs {
                self.export_value(writer, attr, force.contains(&attr.name))?;
                // 应用数据块紧跟在句柄之后
                if index == 0 && attr.name == "handle" && !self.flat {
                    if let Some(tags) = self.unprocessed_of(None) {
                        writer.write_tags(tags)?;
                    }
                }
            }
            if let Some(marker) = subclass.name {
                if let Some(tags) = self.unprocessed_of(Some(marker)) {
                    writer.write_tags(tags)?;
                }
            }
        }

        for group in &self.unprocessed {
            match group.subclass.as_deref() {
                Some(marker) if self.schema.subclass_index(marker).is_none() => {
                    writer.write_subclass(marker)?;
                    writer.write_tags(&group.tags)?;
                }
                None if self.flat => writer.write_tags(&group.tags)?,
                _ => {}
            }
        }
        Ok(())
    }
}
