//! DXF 文档
//!
//! 文档持有实体数据库、TABLES 段与其余段的原始标签。
//! HEADER 段原样保留，只在写出时刷新 `$HANDSEED`；`$ACADVER` 决定读写方言。

use std::io::{BufRead, Write};

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::handle::Handle;
use dxfkit_core::reader::read_tags;
use dxfkit_core::tag::{Tag, TagValue};
use dxfkit_core::tags::Tags;
use dxfkit_core::version::DxfVersion;
use dxfkit_core::writer::TagWriter;
use tracing::{info, warn};

use crate::complex_ltype::GlyphResolver;
use crate::config::DocumentConfig;
use crate::entities::schemas::STYLE_SHAPE_FILE;
use crate::entities::{DxfAttribs, DxfEntity, Linetype, LinetypePattern};
use crate::entitydb::EntityDb;
use crate::sections::{split_sections, RawSection, TablesSection};
use crate::table::Table;

/// 线型图案的来源
#[derive(Debug, Clone, Copy)]
pub enum PatternSource<'a> {
    /// `[总长, 元素...]`
    Numeric(&'a [f64]),
    /// `.lin` 定义字符串与图案总长
    Definition { text: &'a str, length: f64 },
}

/// 段在文件中的位置
#[derive(Debug, Clone)]
enum SectionSlot {
    Header,
    Tables,
    Raw(RawSection),
}

#[derive(Debug)]
pub struct Document {
    dxfversion: DxfVersion,
    entitydb: EntityDb,
    tables: TablesSection,
    /// HEADER 段内容（`9 $NAME` + 值）
    header: Tags,
    layout: Vec<SectionSlot>,
}

impl Document {
    /// 新建文档
    pub fn new(config: DocumentConfig) -> Result<Self> {
        let mut entitydb = EntityDb::with_seed(config.handle_seed);
        let tables = TablesSection::setup(&mut entitydb, config.dxfversion)?;
        let header = Tags::from(vec![
            Tag::new(9, "$ACADVER"),
            Tag::new(1, config.dxfversion.acad_version()),
            Tag::new(9, "$HANDSEED"),
            Tag::new(5, entitydb.handle_seed().to_string()),
        ]);

        let mut doc = Self {
            dxfversion: config.dxfversion,
            entitydb,
            tables,
            header,
            layout: vec![SectionSlot::Header, SectionSlot::Tables],
        };
        if config.setup_defaults {
            doc.setup_default_entries()?;
        }
        Ok(doc)
    }

    fn setup_default_entries(&mut self) -> Result<()> {
        for (name, description) in [("ByBlock", ""), ("ByLayer", ""), ("Continuous", "Solid line")] {
            self.new_linetype(name, description, PatternSource::Numeric(&[0.0]))?;
        }
        self.new_entry("LAYER", DxfAttribs::new().with("name", "0"))?;
        self.new_entry("STYLE", DxfAttribs::new().with("name", "Standard"))?;
        self.new_entry("APPID", DxfAttribs::new().with("name", "ACAD"))?;
        self.new_entry("VPORT", DxfAttribs::new().with("name", "*Active"))?;
        Ok(())
    }

    /// 读取 DXF 文本
    ///
    /// 任何格式或分帧错误都会中止整个读取。
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let sections = split_sections(read_tags(reader)?)?;

        let header = sections
            .iter()
            .find(|s| s.name == "HEADER")
            .map(|s| s.tags.clone())
            .unwrap_or_default();
        let dxfversion = match header_var(&header, "$ACADVER").and_then(|v| v.as_str()) {
            Some(version) => version.parse()?,
            None => DxfVersion::R12,
        };
        let mut entitydb = match header_var(&header, "$HANDSEED").and_then(|v| v.as_str()) {
            Some(seed) => match seed.parse::<Handle>() {
                Ok(seed) => EntityDb::with_seed(seed.value()),
                Err(err) => {
                    warn!("{}; using the highest loaded handle instead", err);
                    EntityDb::new()
                }
            },
            None => EntityDb::new(),
        };

        let mut tables = TablesSection::new();
        let mut layout = Vec::with_capacity(sections.len());
        for section in sections {
            match section.name.as_str() {
                "HEADER" => layout.push(SectionSlot::Header),
                "TABLES" => {
                    tables = TablesSection::load(section.tags, &mut entitydb)?;
                    layout.push(SectionSlot::Tables);
                }
                _ => {
                    reserve_handles(&section.tags, &mut entitydb)?;
                    layout.push(SectionSlot::Raw(section));
                }
            }
        }

        info!(
            "Read DXF {}: {} tables, {} table entries",
            dxfversion,
            tables.len(),
            entitydb.len()
        );
        Ok(Self {
            dxfversion,
            entitydb,
            tables,
            header,
            layout,
        })
    }

    /// 写出 DXF 文本；写入失败时输出可能被截断
    pub fn write<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = TagWriter::new(sink, self.dxfversion);
        for slot in &self.layout {
            match slot {
                SectionSlot::Header => self.write_header(&mut writer)?,
                SectionSlot::Tables => self.tables.write(&self.entitydb, &mut writer)?,
                SectionSlot::Raw(section) => section.write(&mut writer)?,
            }
        }
        writer.write_structure("EOF")?;
        writer.flush()?;
        info!(
            "Wrote DXF {}: {} tables, {} table entries",
            self.dxfversion,
            self.tables.len(),
            self.entitydb.len()
        );
        Ok(())
    }

    fn write_header<W: Write>(&self, writer: &mut TagWriter<W>) -> Result<()> {
        writer.write_structure("SECTION")?;
        writer.write_tag2(2, "HEADER")?;
        let mut after_handseed = false;
        for tag in &self.header {
            if after_handseed && tag.code == 5 {
                writer.write_tag2(5, self.entitydb.handle_seed().to_string())?;
            } else {
                writer.write_tag(tag)?;
            }
            after_handseed = tag.code == 9 && tag.as_str() == Some("$HANDSEED");
        }
        writer.write_structure("ENDSEC")
    }

    pub fn dxfversion(&self) -> DxfVersion {
        self.dxfversion
    }

    pub fn header(&self) -> &Tags {
        &self.header
    }

    pub fn entitydb(&self) -> &EntityDb {
        &self.entitydb
    }

    pub fn tables(&self) -> &TablesSection {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables.get(name)
    }

    /// 未解析段的原始标签
    pub fn raw_section(&self, name: &str) -> Option<&RawSection> {
        self.layout.iter().find_map(|slot| match slot {
            SectionSlot::Raw(section) if section.name == name => Some(section),
            _ => None,
        })
    }

    /// 在指定表中新建表项
    ///
    /// 除允许同名的表外，名称已存在时返回校验错误。
    pub fn new_entry(&mut self, table: &str, attribs: DxfAttribs) -> Result<Handle> {
        let table = self.tables.get_mut(table)?;
        if let Some(name) = attribs.name() {
            if !table.allow_duplicate_names() && table.entry_exists(&self.entitydb, name) {
                return Err(duplicate_name(table, name));
            }
        }
        table.new_entry(&mut self.entitydb, attribs)
    }

    pub fn get_entry(&self, table: &str, name: &str) -> Result<&DxfEntity> {
        self.tables.get(table)?.get_entry(&self.entitydb, name)
    }

    pub fn get_entry_mut(&mut self, table: &str, name: &str) -> Result<&mut DxfEntity> {
        self.tables.get(table)?.get_entry_mut(&mut self.entitydb, name)
    }

    pub fn entry_exists(&self, table: &str, name: &str) -> bool {
        self.tables
            .get(table)
            .is_ok_and(|t| t.entry_exists(&self.entitydb, name))
    }

    /// 删除表项（同时更新表成员与实体数据库）
    pub fn remove_entry(&mut self, table: &str, name: &str) -> Result<DxfEntity> {
        self.tables.get_mut(table)?.remove_entry(&mut self.entitydb, name)
    }

    /// 新建线型；文本定义中的字形引用解析到 STYLE 表，缺失的样式会被创建
    pub fn new_linetype(&mut self, name: &str, description: &str, source: PatternSource<'_>) -> Result<Handle> {
        let ltypes = self.tables.get("LTYPE")?;
        if ltypes.entry_exists(&self.entitydb, name) {
            return Err(duplicate_name(ltypes, name));
        }

        let pattern = match source {
            PatternSource::Numeric(pattern) => LinetypePattern::from_numeric(pattern),
            PatternSource::Definition { text, length } => {
                let mut resolver = StyleResolver {
                    styles: self.tables.get_mut("STYLE")?,
                    db: &mut self.entitydb,
                };
                LinetypePattern::compile(text, length, &mut resolver)?
            }
        };
        let attribs = DxfAttribs::new()
            .with("name", name)
            .with("description", description)
            .with_pattern(pattern);
        self.new_entry("LTYPE", attribs)
    }

    pub fn linetype(&self, name: &str) -> Result<&Linetype> {
        self.get_entry("LTYPE", name)?
            .as_linetype()
            .ok_or_else(|| DxfError::EntryNotFound {
                table: "LTYPE".to_string(),
                name: name.to_string(),
            })
    }
}

fn duplicate_name(table: &Table, name: &str) -> DxfError {
    DxfError::Validation(format!("{} entry {:?} already exists", table.name(), name))
}

/// HEADER 变量 `9 $NAME` 之后的值
fn header_var<'a>(header: &'a Tags, name: &str) -> Option<&'a TagValue> {
    let index = header
        .iter()
        .position(|t| t.code == 9 && t.as_str() == Some(name))?;
    header.get(index + 1).map(|t| &t.value)
}

/// 未解析段中的实体句柄也要登记，避免新句柄与之冲突
fn reserve_handles(tags: &Tags, db: &mut EntityDb) -> Result<()> {
    for tag in tags {
        if tag.code == 5 || tag.code == 105 {
            if let Some(Ok(handle)) = tag.as_str().map(str::parse::<Handle>) {
                db.reserve(handle)?;
            }
        }
    }
    Ok(())
}

/// 在 STYLE 表中查找或创建字形样式
struct StyleResolver<'a> {
    styles: &'a mut Table,
    db: &'a mut EntityDb,
}

impl StyleResolver<'_> {
    fn find(&self, predicate: impl Fn(&DxfEntity) -> bool) -> Result<Option<Handle>> {
        for &handle in self.styles.handles() {
            if predicate(self.db.fetch(handle)?) {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }
}

impl GlyphResolver for StyleResolver<'_> {
    fn text_style_handle(&mut self, style: &str) -> Result<Handle> {
        let found = self.find(|e| e.name().is_some_and(|n| n.eq_ignore_ascii_case(style)))?;
        match found {
            Some(handle) => Ok(handle),
            None => self
                .styles
                .new_entry(self.db, DxfAttribs::new().with("name", style)),
        }
    }

    fn shape_file_handle(&mut self, shx: &str) -> Result<Handle> {
        let found = self.find(|e| {
            e.namespace().is_some_and(|ns| {
                ns.get_i64("flags").unwrap_or(0) & STYLE_SHAPE_FILE != 0
                    && ns.get_str("font").is_some_and(|f| f.eq_ignore_ascii_case(shx))
            })
        })?;
        match found {
            Some(handle) => Ok(handle),
            None => self.styles.new_entry(
                self.db,
                DxfAttribs::new()
                    .with("name", "")
                    .with("flags", STYLE_SHAPE_FILE)
                    .with("font", shx),
            ),
        }
    }
}
