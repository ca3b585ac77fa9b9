//! 属性模式声明
//!
//! 每种实体类型在编译期声明一次：属性名、组码、默认值、所属子类、最低方言版本。
//! 模式是静态不可变数据，不需要虚分派。
//!
//! ```rust
//! use dxfkit_core::schema::{AttrDefault, DefSubclass, DxfAttr, EntitySchema, BASE_CLASS};
//!
//! static ACDB_APPID: DefSubclass = DefSubclass::new(
//!     Some("AcDbRegAppTableRecord"),
//!     &[DxfAttr::new("name", 2), DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0))],
//! );
//! static APPID: EntitySchema = EntitySchema::new("APPID", &[&BASE_CLASS, &ACDB_APPID]);
//!
//! assert_eq!(APPID.get("flags").unwrap().1.code, 70);
//! ```

use crate::tag::{GroupCode, TagValue};
use crate::version::DxfVersion;

/// 编译期可构造的默认值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrDefault {
    Int(i64),
    Float(f64),
    Str(&'static str),
}

impl AttrDefault {
    pub fn to_value(&self) -> TagValue {
        match *self {
            AttrDefault::Int(v) => TagValue::Int(v),
            AttrDefault::Float(v) => TagValue::Float(v),
            AttrDefault::Str(s) => TagValue::Str(s.to_string()),
        }
    }
}

/// 单个属性声明
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxfAttr {
    pub name: &'static str,
    pub code: GroupCode,
    pub default: Option<AttrDefault>,
    /// 最低方言版本；低于该版本时不导出
    pub since: DxfVersion,
}

impl DxfAttr {
    pub const fn new(name: &'static str, code: GroupCode) -> Self {
        Self {
            name,
            code,
            default: None,
            since: DxfVersion::R12,
        }
    }

    pub const fn with_default(self, default: AttrDefault) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    pub const fn since(self, version: DxfVersion) -> Self {
        Self { since: version, ..self }
    }

    /// 该属性在目标版本中是否有效
    pub fn is_valid_for(&self, version: DxfVersion) -> bool {
        version >= self.since
    }
}

/// 子类：一组属性 + 子类标记名（基础类没有标记名）
#[derive(Debug)]
pub struct DefSubclass {
    pub name: Option<&'static str>,
    pub attribs: &'static [DxfAttr],
}

impl DefSubclass {
    pub const fn new(name: Option<&'static str>, attribs: &'static [DxfAttr]) -> Self {
        Self { name, attribs }
    }

    pub fn get(&self, name: &str) -> Option<&DxfAttr> {
        self.attribs.iter().find(|a| a.name == name)
    }

    pub fn by_code(&self, code: GroupCode) -> Option<&DxfAttr> {
        self.attribs.iter().find(|a| a.code == code)
    }
}

/// 所有实体共有的基础类：句柄与所属句柄
pub static BASE_CLASS: DefSubclass = DefSubclass::new(
    None,
    &[
        DxfAttr::new("handle", 5),
        DxfAttr::new("owner", 330).since(DxfVersion::R2000),
    ],
);

/// 符号表记录公共子类（无属性）
pub static ACDB_SYMBOL_TABLE_RECORD: DefSubclass = DefSubclass::new(Some("AcDbSymbolTableRecord"), &[]);

/// 一种实体类型的完整模式
#[derive(Debug)]
pub struct EntitySchema {
    pub dxftype: &'static str,
    pub subclasses: &'static [&'static DefSubclass],
}

impl EntitySchema {
    pub const fn new(dxftype: &'static str, subclasses: &'static [&'static DefSubclass]) -> Self {
        Self { dxftype, subclasses }
    }

    /// 按属性名查找，返回 (子类序号, 属性)
    pub fn get(&self, name: &str) -> Option<(usize, &DxfAttr)> {
        self.subclasses
            .iter()
            .enumerate()
            .find_map(|(i, sc)| sc.get(name).map(|a| (i, a)))
    }

    /// 按子类标记名查找子类序号
    pub fn subclass_index(&self, marker: &str) -> Option<usize> {
        self.subclasses.iter().position(|sc| sc.name == Some(marker))
    }

    /// 按组码在所有子类中查找（旧方言没有子类标记时使用），先声明者优先
    pub fn by_code(&self, code: GroupCode) -> Option<(usize, &DxfAttr)> {
        self.subclasses
            .iter()
            .enumerate()
            .find_map(|(i, sc)| sc.by_code(code).map(|a| (i, a)))
    }

    /// 按声明顺序遍历全部属性
    pub fn attribs(&self) -> impl Iterator<Item = (usize, &DxfAttr)> + '_ {
        self.subclasses
            .iter()
            .enumerate()
            .flat_map(|(i, sc)| sc.attribs.iter().map(move |a| (i, a)))
    }
}
