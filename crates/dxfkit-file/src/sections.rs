//! 文件分段
//!
//! DXF 文件由若干 `0 SECTION / 2 <name> ... 0 ENDSEC` 段组成，以 `0 EOF` 结束。
//! 只有 TABLES 段被解析为表，其余段按原始标签保留。

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::tag::Tag;
use dxfkit_core::tags::Tags;
use dxfkit_core::version::DxfVersion;
use dxfkit_core::writer::TagWriter;

use crate::entitydb::EntityDb;
use crate::table::{Table, TABLE_KINDS};

/// 一个段：段名 + 段内标签（不含 SECTION/名称/ENDSEC）
#[derive(Debug, Clone, PartialEq)]
pub struct RawSection {
    pub name: String,
    pub tags: Tags,
}

impl RawSection {
    pub fn write<W: std::io::Write>(&self, writer: &mut TagWriter<W>) -> Result<()> {
        writer.write_structure("SECTION")?;
        writer.write_tag2(2, self.name.as_str())?;
        writer.write_tags(&self.tags)?;
        writer.write_structure("ENDSEC")
    }
}

/// 把整个文件的标签切成段
///
/// 段外只允许出现 `0 EOF`；缺少 ENDSEC 或段名时返回校验错误。
pub fn split_sections(tags: Tags) -> Result<Vec<RawSection>> {
    let mut sections = Vec::new();
    let mut tags = tags.into_iter();

    while let Some(tag) = tags.next() {
        if tag.is_structure("EOF") {
            break;
        }
        if !tag.is_structure("SECTION") {
            return Err(DxfError::Validation(format!("Expected 0/SECTION, found {}", tag)));
        }
        let name = match tags.next() {
            Some(Tag { code: 2, value }) => value.as_str().map(str::to_string),
            _ => None,
        }
        .ok_or_else(|| DxfError::Validation("SECTION without name (group code 2)".to_string()))?;

        let mut content = Tags::new();
        let mut closed = false;
        for tag in tags.by_ref() {
            if tag.is_structure("ENDSEC") {
                closed = true;
                break;
            }
            content.push(tag);
        }
        if !closed {
            return Err(DxfError::Validation(format!("Section {} must end with 0/ENDSEC", name)));
        }
        sections.push(RawSection { name, tags: content });
    }
    Ok(sections)
}

/// TABLES 段：按文件顺序排列的表
#[derive(Debug, Clone, Default)]
pub struct TablesSection {
    tables: Vec<Table>,
}

impl TablesSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新建全部标准表（BLOCK_RECORD 只在扩展方言中存在）
    pub fn setup(db: &mut EntityDb, dxfversion: DxfVersion) -> Result<Self> {
        let tables = TABLE_KINDS
            .iter()
            .filter(|kind| kind.name != "BLOCK_RECORD" || !dxfversion.is_legacy())
            .map(|kind| Table::new(kind.name, db, dxfversion))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tables })
    }

    /// 从段内标签加载；每张表必须以 `0 TABLE` 开始、`0 ENDTAB` 结束
    pub fn load(tags: Tags, db: &mut EntityDb) -> Result<Self> {
        let mut tables = Vec::new();
        let mut current: Option<Tags> = None;

        for tag in tags {
            match current.as_mut() {
                None if tag.is_structure("TABLE") => current = Some(Tags::from(vec![tag])),
                None => {
                    return Err(DxfError::Validation(format!(
                        "Unexpected tag {} outside of a table",
                        tag
                    )))
                }
                Some(table_tags) => {
                    let is_end = tag.is_structure("ENDTAB");
                    table_tags.push(tag);
                    if is_end {
                        if let Some(table_tags) = current.take() {
                            tables.push(Table::build_from_tags(table_tags, db)?);
                        }
                    }
                }
            }
        }
        if current.is_some() {
            return Err(DxfError::Validation("Table must end with 0/ENDTAB".to_string()));
        }
        Ok(Self { tables })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn get(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| DxfError::TableNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| DxfError::TableNotFound(name.to_string()))
    }

    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    pub fn write<W: std::io::Write>(&self, db: &EntityDb, writer: &mut TagWriter<W>) -> Result<()> {
        writer.write_structure("SECTION")?;
        writer.write_tag2(2, "TABLES")?;
        for table in &self.tables {
            table.write(db, writer)?;
        }
        writer.write_structure("ENDSEC")
    }
}
