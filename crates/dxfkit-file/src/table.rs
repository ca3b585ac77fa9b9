//! 符号表
//!
//! 表只维护成员句柄的有序列表与原样保留的表头；记录本身存放在 `EntityDb` 中。
//! 文本形式：
//! ```text
//!   0 TABLE
//!   2 LTYPE     ┐
//!   5 5         │ 表头（原样保留）
//!  70 3         ┘ 表项个数，写出时按当前成员数重算
//!   0 LTYPE     ─ 表项 ...
//!   0 ENDTAB
//! ```

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::groups::TagGroups;
use dxfkit_core::handle::Handle;
use dxfkit_core::tag::Tag;
use dxfkit_core::tags::Tags;
use dxfkit_core::version::DxfVersion;
use dxfkit_core::writer::TagWriter;
use tracing::debug;

use crate::entities::{DxfAttribs, DxfEntity};
use crate::entitydb::EntityDb;

const COUNT_CODE: i32 = 70;

/// 表类型的静态描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableKind {
    pub name: &'static str,
    /// 表项的实体类型名
    pub entry_type: &'static str,
    /// 是否允许同名表项
    pub allow_duplicate_names: bool,
}

impl TableKind {
    const fn new(name: &'static str, entry_type: &'static str) -> Self {
        Self {
            name,
            entry_type,
            allow_duplicate_names: false,
        }
    }

    /// 按表名查找标准表
    pub fn for_name(name: &str) -> Option<TableKind> {
        TABLE_KINDS
            .iter()
            .copied()
            .find(|k| k.name.eq_ignore_ascii_case(name))
    }
}

/// 标准符号表，按 DXF 文件中的顺序
pub static TABLE_KINDS: &[TableKind] = &[
    // 多个视口配置可以共用 `*Active` 这样的名称
    TableKind {
        allow_duplicate_names: true,
        ..TableKind::new("VPORT", "VPORT")
    },
    TableKind::new("LTYPE", "LTYPE"),
    TableKind::new("LAYER", "LAYER"),
    TableKind::new("STYLE", "STYLE"),
    TableKind::new("VIEW", "VIEW"),
    TableKind::new("UCS", "UCS"),
    TableKind::new("APPID", "APPID"),
    TableKind::new("DIMSTYLE", "DIMSTYLE"),
    TableKind::new("BLOCK_RECORD", "BLOCK_RECORD"),
];

#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    /// 非标准表为 `None`，表项类型与表名相同
    kind: Option<TableKind>,
    /// `0 TABLE` 与第一个表项之间的标签
    header: Tags,
    entries: Vec<Handle>,
}

impl Table {
    /// 新建空表并合成表头
    pub fn new(name: &str, db: &mut EntityDb, dxfversion: DxfVersion) -> Result<Self> {
        let handle = db.next_handle()?;
        let mut header = Tags::from(vec![Tag::new(2, name), Tag::new(5, handle.to_string())]);
        if !dxfversion.is_legacy() {
            header.push(Tag::new(330, "0"));
            header.push(Tag::new(100, "AcDbSymbolTable"));
        }
        header.push(Tag::new(COUNT_CODE, 0));
        Ok(Self::with_header(name, header))
    }

    fn with_header(name: &str, header: Tags) -> Self {
        let kind = TableKind::for_name(name);
        if kind.is_none() {
            debug!("Unregistered table {}", name);
        }
        Self {
            name: name.to_string(),
            kind,
            header,
            entries: Vec::new(),
        }
    }

    /// 从 `0 TABLE ... 0 ENDTAB` 标签构建表
    ///
    /// 分帧错误返回校验错误；任何失败都不会在数据库中留下部分表项。
    pub fn build_from_tags(tags: Tags, db: &mut EntityDb) -> Result<Self> {
        let groups = TagGroups::new(tags)?;
        if groups.name(0) != Some("TABLE") {
            return Err(DxfError::Validation(format!(
                "Table must start with 0/TABLE, found {:?}",
                groups.name(0)
            )));
        }
        if groups.len() < 2 || groups.name(-1) != Some("ENDTAB") {
            return Err(DxfError::Validation(format!(
                "Table must end with 0/ENDTAB, found {:?}",
                groups.name(-1)
            )));
        }

        let mut groups = groups.into_vec();
        groups.pop();
        let mut groups = groups.into_iter();
        let header: Tags = groups
            .next()
            .map(|g| g.into_iter().skip(1).collect())
            .unwrap_or_default();
        let name = header
            .value_of(2)
            .and_then(|v| v.as_str())
            .ok_or_else(|| DxfError::Validation("Table header has no name (group code 2)".to_string()))?
            .to_string();

        let mut entities = groups
            .map(|group| DxfEntity::load(&group))
            .collect::<Result<Vec<_>>>()?;

        let mut table = Self::with_header(&name, header);
        // 先登记已有句柄，再给缺句柄的记录发新句柄，两者不会冲突
        for handle in entities.iter().filter_map(DxfEntity::handle) {
            db.reserve(handle)?;
        }
        for entity in &mut entities {
            if entity.handle().is_none() {
                entity.set_handle(db.next_handle()?)?;
            }
        }
        for entity in entities {
            let handle = entity.handle().unwrap_or(Handle::NULL);
            db.store(handle, entity)?;
            table.entries.push(handle);
        }
        debug!("Loaded table {} with {} entries", table.name, table.entries.len());
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Option<TableKind> {
        self.kind
    }

    /// 是否允许同名表项；非标准表不允许
    pub fn allow_duplicate_names(&self) -> bool {
        self.kind.is_some_and(|k| k.allow_duplicate_names)
    }

    pub fn header(&self) -> &Tags {
        &self.header
    }

    /// 表自身的句柄（表头组码 5）
    pub fn handle(&self) -> Option<Handle> {
        self.header.handle().and_then(|h| h.ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 成员句柄，按写出顺序
    pub fn handles(&self) -> &[Handle] {
        &self.entries
    }

    /// 按成员顺序取出记录
    pub fn entries<'a>(&'a self, db: &'a EntityDb) -> impl Iterator<Item = Result<&'a DxfEntity>> + 'a {
        self.entries.iter().map(move |&h| db.fetch(h))
    }

    /// 新建表项并加入成员列表；不检查名称唯一性
    pub fn new_entry(&mut self, db: &mut EntityDb, attribs: DxfAttribs) -> Result<Handle> {
        let handle = db.next_handle()?;
        let owner = self.handle().unwrap_or(Handle::NULL);
        let entity = DxfEntity::new(self.entry_type(), handle, owner, attribs)?;
        db.store(handle, entity)?;
        self.entries.push(handle);
        debug!("New {} entry {}", self.name, handle);
        Ok(handle)
    }

    fn entry_type(&self) -> &str {
        match self.kind {
            Some(kind) => kind.entry_type,
            None => &self.name,
        }
    }

    /// 第一个名称匹配的成员句柄
    pub fn get_entry_handle(&self, db: &EntityDb, name: &str) -> Result<Handle> {
        for &handle in &self.entries {
            if db.fetch(handle)?.name() == Some(name) {
                return Ok(handle);
            }
        }
        Err(DxfError::EntryNotFound {
            table: self.name.clone(),
            name: name.to_string(),
        })
    }

    pub fn get_entry<'a>(&self, db: &'a EntityDb, name: &str) -> Result<&'a DxfEntity> {
        let handle = self.get_entry_handle(db, name)?;
        db.fetch(handle)
    }

    pub fn get_entry_mut<'a>(&self, db: &'a mut EntityDb, name: &str) -> Result<&'a mut DxfEntity> {
        let handle = self.get_entry_handle(db, name)?;
        db.fetch_mut(handle)
    }

    pub fn entry_exists(&self, db: &EntityDb, name: &str) -> bool {
        self.get_entry_handle(db, name).is_ok()
    }

    /// 从成员列表移除第一个同名表项并删除其记录
    pub fn remove_entry(&mut self, db: &mut EntityDb, name: &str) -> Result<DxfEntity> {
        let handle = self.get_entry_handle(db, name)?;
        if let Some(index) = self.entries.iter().position(|&h| h == handle) {
            self.entries.remove(index);
        }
        db.delete(handle)
    }

    /// 写出整张表；表项个数按实际写出的成员数重算
    pub fn write<W: std::io::Write>(&self, db: &EntityDb, writer: &mut TagWriter<W>) -> Result<()> {
        let version = writer.dxfversion();
        let mut exported = Vec::with_capacity(self.entries.len());
        for &handle in &self.entries {
            let entity = db.fetch(handle)?;
            if entity.preprocess_export(version) {
                exported.push(entity);
            }
        }
        let count = exported.len() as i64;
        writer.write_structure("TABLE")?;

        let mut count_written = false;
        for tag in &self.header {
            if tag.code == COUNT_CODE && !count_written {
                writer.write_tag2(COUNT_CODE, count)?;
                count_written = true;
            } else {
                writer.write_tag(tag)?;
            }
        }
        if !count_written {
            writer.write_tag2(COUNT_CODE, count)?;
        }

        for entity in exported {
            entity.export_dxf(writer)?;
        }
        writer.write_structure("ENDTAB")?;
        debug!("Wrote table {} with {} entries", self.name, count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxfkit_core::error::ErrorKind;
    use dxfkit_core::reader::read_tags;
    use proptest::prelude::*;

    const LTYPE_TABLE: &str = "  0\nTABLE\n  2\nLTYPE\n  5\n5\n330\n0\n100\nAcDbSymbolTable\n 70\n3\n\
  0\nLTYPE\n  5\n14\n330\n5\n100\nAcDbSymbolTableRecord\n100\nAcDbLinetypeTableRecord\n  2\nByBlock\n  3\n\n 70\n0\n 72\n65\n 73\n0\n 40\n0.0\n\
  0\nLTYPE\n  5\n15\n330\n5\n100\nAcDbSymbolTableRecord\n100\nAcDbLinetypeTableRecord\n  2\nByLayer\n  3\n\n 70\n0\n 72\n65\n 73\n0\n 40\n0.0\n\
  0\nLTYPE\n  5\n16\n330\n5\n100\nAcDbSymbolTableRecord\n100\nAcDbLinetypeTableRecord\n  2\nDASHED\n  3\nDashed __ __\n 70\n0\n 72\n65\n 73\n2\n 40\n0.75\n 49\n0.5\n 74\n0\n 49\n-0.25\n 74\n0\n\
  0\nENDTAB\n";

    fn load(text: &str, db: &mut EntityDb) -> Result<Table> {
        Table::build_from_tags(read_tags(text.as_bytes())?, db)
    }

    fn write(table: &Table, db: &EntityDb, version: DxfVersion) -> Tags {
        let mut writer = TagWriter::new(Vec::new(), version);
        table.write(db, &mut writer).unwrap();
        read_tags(writer.into_inner().as_slice()).unwrap()
    }

    fn names(table: &Table, db: &EntityDb) -> Vec<String> {
        table
            .entries(db)
            .map(|e| e.unwrap().name().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_build_from_tags() {
        let mut db = EntityDb::new();
        let table = load(LTYPE_TABLE, &mut db).unwrap();
        assert_eq!(table.name(), "LTYPE");
        assert_eq!(table.handle(), Some(Handle::new(5)));
        assert_eq!(table.len(), 3);
        assert_eq!(names(&table, &db), ["ByBlock", "ByLayer", "DASHED"]);
        assert_eq!(table.header().len(), 5);
        assert!(db.next_handle().unwrap() > Handle::new(0x16));
    }

    #[test]
    fn test_round_trip() {
        let mut db = EntityDb::new();
        let table = load(LTYPE_TABLE, &mut db).unwrap();
        let tags = write(&table, &db, DxfVersion::R2000);
        assert_eq!(tags, read_tags(LTYPE_TABLE.as_bytes()).unwrap());

        let mut db2 = EntityDb::new();
        let reloaded = Table::build_from_tags(tags, &mut db2).unwrap();
        assert_eq!(reloaded.header(), table.header());
        assert_eq!(names(&reloaded, &db2), names(&table, &db));
        let dashed = reloaded.get_entry(&db2, "DASHED").unwrap().as_linetype().unwrap();
        assert_eq!(dashed.pattern().total_length(), Some(0.75));
    }

    #[test]
    fn test_framing_errors() {
        let mut db = EntityDb::new();
        let missing_end = "  0\nTABLE\n  2\nLTYPE\n  0\nLTYPE\n  2\nDOT\n";
        let err = load(missing_end, &mut db).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let wrong_start = "  0\nSECTION\n  2\nLTYPE\n  0\nENDTAB\n";
        assert_eq!(load(wrong_start, &mut db).unwrap_err().kind(), ErrorKind::Validation);

        let only_open = "  0\nTABLE\n  2\nLTYPE\n";
        assert_eq!(load(only_open, &mut db).unwrap_err().kind(), ErrorKind::Validation);

        let no_marker = Tags::from(vec![Tag::new(2, "LTYPE"), Tag::new(0, "ENDTAB")]);
        assert_eq!(Table::build_from_tags(no_marker, &mut db).unwrap_err().kind(), ErrorKind::Validation);
        assert!(db.is_empty());
    }

    #[test]
    fn test_no_partial_table_on_format_error() {
        let mut db = EntityDb::new();
        // 组码 70 必须是整数
        let tags = Tags::from(vec![
            Tag::new(0, "TABLE"),
            Tag::new(2, "LTYPE"),
            Tag::new(0, "LTYPE"),
            Tag::new(5, "20"),
            Tag::new(2, "DOT"),
            Tag::new(0, "LTYPE"),
            Tag::new(5, "21"),
            Tag::new(2, "BAD"),
            Tag::new(70, "x"),
            Tag::new(0, "ENDTAB"),
        ]);
        assert_eq!(Table::build_from_tags(tags, &mut db).unwrap_err().kind(), ErrorKind::Format);
        assert!(db.is_empty());
    }

    #[test]
    fn test_count_recomputed_on_write() {
        let mut db = EntityDb::new();
        let mut table = load(LTYPE_TABLE, &mut db).unwrap();
        let removed = table.remove_entry(&mut db, "ByLayer").unwrap();
        assert_eq!(removed.name(), Some("ByLayer"));
        assert_eq!(table.len(), 2);
        assert!(!db.contains(Handle::new(0x15)));

        let tags = write(&table, &db, DxfVersion::R2000);
        assert_eq!(tags.value_of(COUNT_CODE).and_then(|v| v.as_i64()), Some(2));
        assert_eq!(
            tags.iter().filter(|t| t.is_structure("LTYPE")).count(),
            2
        );
    }

    #[test]
    fn test_count_appended_when_missing() {
        let mut db = EntityDb::new();
        let text = "  0\nTABLE\n  2\nAPPID\n  0\nAPPID\n  2\nACAD\n 70\n0\n  0\nENDTAB\n";
        let table = load(text, &mut db).unwrap();
        let tags = write(&table, &db, DxfVersion::R12);
        assert_eq!(tags[1], Tag::new(2, "APPID"));
        assert_eq!(tags[2], Tag::new(COUNT_CODE, 1));
    }

    #[test]
    fn test_duplicate_names_in_vport() {
        let mut db = EntityDb::new();
        let mut table = Table::new("VPORT", &mut db, DxfVersion::R2000).unwrap();
        assert!(table.allow_duplicate_names());
        let first = table
            .new_entry(&mut db, DxfAttribs::new().with("name", "*Active").with("height", 10.0))
            .unwrap();
        let second = table
            .new_entry(&mut db, DxfAttribs::new().with("name", "*Active").with("height", 20.0))
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_entry_handle(&db, "*Active").unwrap(), first);
        let height = table
            .get_entry(&db, "*Active")
            .unwrap()
            .namespace()
            .and_then(|ns| ns.get_f64("height"));
        assert_eq!(height, Some(10.0));
    }

    #[test]
    fn test_new_entry_owner_and_lookup() {
        let mut db = EntityDb::new();
        let mut table = Table::new("LAYER", &mut db, DxfVersion::R2000).unwrap();
        assert!(!table.allow_duplicate_names());
        let handle = table.new_entry(&mut db, DxfAttribs::new().with("name", "0")).unwrap();
        let entry = db.fetch(handle).unwrap();
        assert_eq!(entry.owner(), table.handle());
        assert!(table.entry_exists(&db, "0"));
        assert!(!table.entry_exists(&db, "WALLS"));
        assert_eq!(table.get_entry(&db, "WALLS").unwrap_err().kind(), ErrorKind::Lookup);
        assert_eq!(table.remove_entry(&mut db, "WALLS").unwrap_err().kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_new_table_header() {
        let mut db = EntityDb::new();
        let table = Table::new("LTYPE", &mut db, DxfVersion::R2000).unwrap();
        let tags = write(&table, &db, DxfVersion::R2000);
        assert_eq!(
            tags.as_slice(),
            &[
                Tag::new(0, "TABLE"),
                Tag::new(2, "LTYPE"),
                Tag::new(5, "1"),
                Tag::new(330, "0"),
                Tag::new(100, "AcDbSymbolTable"),
                Tag::new(70, 0),
                Tag::new(0, "ENDTAB"),
            ]
        );

        let legacy = Table::new("LTYPE", &mut db, DxfVersion::R12).unwrap();
        assert_eq!(legacy.header().len(), 3);
    }

    #[test]
    fn test_legacy_write_skips_complex_linetype() {
        let mut db = EntityDb::new();
        let mut table = Table::new("LTYPE", &mut db, DxfVersion::R12).unwrap();
        let pattern = crate::entities::LinetypePattern::compile(
            "A,.5,[132,ltypeshp.shx],-.25",
            0.75,
            &mut crate::complex_ltype::NullResolver,
        )
        .unwrap();
        table
            .new_entry(&mut db, DxfAttribs::new().with("name", "SHAPES").with_pattern(pattern))
            .unwrap();
        table
            .new_entry(&mut db, DxfAttribs::new().with("name", "CONTINUOUS"))
            .unwrap();

        let legacy = write(&table, &db, DxfVersion::R12);
        assert_eq!(legacy.iter().filter(|t| t.is_structure("LTYPE")).count(), 1);
        assert_eq!(legacy.value_of(COUNT_CODE).and_then(|v| v.as_i64()), Some(1));
        let extended = write(&table, &db, DxfVersion::R2000);
        assert_eq!(extended.iter().filter(|t| t.is_structure("LTYPE")).count(), 2);
        assert_eq!(extended.value_of(COUNT_CODE).and_then(|v| v.as_i64()), Some(2));
    }

    #[test]
    fn test_load_rejects_exhausted_handle_space() {
        let mut db = EntityDb::new();
        let text = "  0\nTABLE\n  2\nAPPID\n 70\n1\n  0\nAPPID\n  5\nFFFFFFFFFFFFFFFF\n  2\nACAD\n 70\n0\n  0\nENDTAB\n";
        assert_eq!(load(text, &mut db).unwrap_err().kind(), ErrorKind::Validation);
        assert!(db.is_empty());

        let mut table = Table::new("APPID", &mut db, DxfVersion::R2000).unwrap();
        let mut db = EntityDb::with_seed(u64::MAX);
        let err = table.new_entry(&mut db, DxfAttribs::new().with("name", "ACAD")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_handle_does_not_collide() {
        let mut db = EntityDb::new();
        let text = "  0\nTABLE\n  2\nAPPID\n 70\n2\n  0\nAPPID\n  2\nFIRST\n 70\n0\n  0\nAPPID\n  5\n1\n  2\nSECOND\n 70\n0\n  0\nENDTAB\n";
        let table = load(text, &mut db).unwrap();
        let handles = table.handles();
        assert_eq!(handles[1], Handle::new(1));
        assert!(handles[0] > Handle::new(1));
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_new_entry_rejects_line_break_in_name() {
        let mut db = EntityDb::new();
        let mut table = Table::new("APPID", &mut db, DxfVersion::R2000).unwrap();
        let err = table
            .new_entry(&mut db, DxfAttribs::new().with("name", "A\n  0\nENDTAB"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(table.is_empty());
        assert_eq!(write(&table, &db, DxfVersion::R2000).iter().filter(|t| t.is_structure("APPID")).count(), 0);
    }

    #[derive(Debug, Clone)]
    struct GeneratedEntry {
        name: String,
        flags: i64,
        color: i64,
        reactors: bool,
        extras: Vec<Tag>,
    }

    fn unmodeled_tag() -> impl Strategy<Value = Tag> {
        prop_oneof![
            "[a-z0-9]{1,8}".prop_map(|s| Tag::new(1000, s)),
            (-1000i64..1000).prop_map(|v| Tag::new(1070, v)),
            (-1000i32..1000).prop_map(|v| Tag::new(1040, f64::from(v) / 8.0)),
        ]
    }

    fn generated_entry() -> impl Strategy<Value = GeneratedEntry> {
        (
            "[A-Z][A-Z0-9_]{0,8}",
            0i64..4,
            1i64..256,
            any::<bool>(),
            prop::collection::vec(unmodeled_tag(), 0..4),
        )
            .prop_map(|(name, flags, color, reactors, extras)| GeneratedEntry {
                name,
                flags,
                color,
                reactors,
                extras,
            })
    }

    /// 按写出顺序拼出一张表的标签
    fn generated_table(kind: &str, entries: &[GeneratedEntry], legacy: bool) -> Tags {
        let mut tags = vec![Tag::new(0, "TABLE"), Tag::new(2, kind)];
        if !legacy {
            tags.push(Tag::new(5, "1"));
            tags.push(Tag::new(330, "0"));
            tags.push(Tag::new(100, "AcDbSymbolTable"));
        }
        tags.push(Tag::new(COUNT_CODE, entries.len() as i64));

        let subclass = if kind == "LAYER" {
            "AcDbLayerTableRecord"
        } else {
            "AcDbRegAppTableRecord"
        };
        for (i, entry) in entries.iter().enumerate() {
            tags.push(Tag::new(0, kind));
            tags.push(Tag::new(5, Handle::new(0x100 + i as u64).to_string()));
            if !legacy {
                if entry.reactors {
                    tags.push(Tag::new(102, "{ACAD_REACTORS"));
                    tags.push(Tag::new(330, "1"));
                    tags.push(Tag::new(102, "}"));
                }
                tags.push(Tag::new(330, "1"));
                tags.push(Tag::new(100, "AcDbSymbolTableRecord"));
                tags.push(Tag::new(100, subclass));
            }
            tags.push(Tag::new(2, entry.name.as_str()));
            tags.push(Tag::new(70, entry.flags));
            if kind == "LAYER" {
                tags.push(Tag::new(62, entry.color));
                tags.push(Tag::new(6, "Continuous"));
            }
            tags.extend(entry.extras.iter().cloned());
        }
        tags.push(Tag::new(0, "ENDTAB"));
        Tags::from(tags)
    }

    proptest! {
        #[test]
        fn prop_table_round_trip(
            layer in any::<bool>(),
            legacy in any::<bool>(),
            entries in prop::collection::vec(generated_entry(), 0..6),
        ) {
            let kind = if layer { "LAYER" } else { "APPID" };
            let version = if legacy { DxfVersion::R12 } else { DxfVersion::R2000 };
            let input = generated_table(kind, &entries, legacy);

            let mut db = EntityDb::new();
            let table = Table::build_from_tags(input.clone(), &mut db).unwrap();
            let written = write(&table, &db, version);
            prop_assert_eq!(&written, &input);

            let mut db2 = EntityDb::new();
            let reloaded = Table::build_from_tags(written, &mut db2).unwrap();
            prop_assert_eq!(reloaded.header(), table.header());
            prop_assert_eq!(reloaded.handles(), table.handles());

            for (before, after) in table.entries(&db).zip(reloaded.entries(&db2)) {
                let before = before.unwrap().namespace().unwrap();
                let after = after.unwrap().namespace().unwrap();
                for (_, attr) in before.schema().attribs() {
                    prop_assert_eq!(before.get(attr.name), after.get(attr.name));
                }
                prop_assert_eq!(before.unprocessed(), after.unprocessed());
            }
            prop_assert_eq!(names(&reloaded, &db2), entries.iter().map(|e| e.name.clone()).collect::<Vec<_>>());
        }
    }
}
