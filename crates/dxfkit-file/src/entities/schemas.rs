//! 符号表记录的属性模式
//!
//! 只声明常用属性；其余组码在加载时按子类原样保留。

use dxfkit_core::schema::{
    AttrDefault, DefSubclass, DxfAttr, EntitySchema, ACDB_SYMBOL_TABLE_RECORD, BASE_CLASS,
};
use dxfkit_core::version::DxfVersion;

pub static ACDB_LINETYPE: DefSubclass = DefSubclass::new(
    Some("AcDbLinetypeTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("description", 3).with_default(AttrDefault::Str("")),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
    ],
);

pub static LTYPE: EntitySchema =
    EntitySchema::new("LTYPE", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_LINETYPE]);

static ACDB_LAYER: DefSubclass = DefSubclass::new(
    Some("AcDbLayerTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
        DxfAttr::new("color", 62).with_default(AttrDefault::Int(7)),
        DxfAttr::new("linetype", 6).with_default(AttrDefault::Str("Continuous")),
        DxfAttr::new("plot", 290)
            .with_default(AttrDefault::Int(1))
            .since(DxfVersion::R2000),
        DxfAttr::new("lineweight", 370)
            .with_default(AttrDefault::Int(-3))
            .since(DxfVersion::R2000),
        DxfAttr::new("plotstyle_handle", 390).since(DxfVersion::R2000),
    ],
);

pub static LAYER: EntitySchema =
    EntitySchema::new("LAYER", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_LAYER]);

static ACDB_STYLE: DefSubclass = DefSubclass::new(
    Some("AcDbTextStyleTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
        DxfAttr::new("height", 40).with_default(AttrDefault::Float(0.0)),
        DxfAttr::new("width", 41).with_default(AttrDefault::Float(1.0)),
        DxfAttr::new("oblique", 50).with_default(AttrDefault::Float(0.0)),
        DxfAttr::new("generation_flags", 71).with_default(AttrDefault::Int(0)),
        DxfAttr::new("last_height", 42).with_default(AttrDefault::Float(2.5)),
        DxfAttr::new("font", 3).with_default(AttrDefault::Str("txt")),
        DxfAttr::new("bigfont", 4).with_default(AttrDefault::Str("")),
    ],
);

pub static STYLE: EntitySchema =
    EntitySchema::new("STYLE", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_STYLE]);

/// STYLE 的 flags 位：该记录是形文件（SHX）而不是文字样式
pub const STYLE_SHAPE_FILE: i64 = 1;

static ACDB_APPID: DefSubclass = DefSubclass::new(
    Some("AcDbRegAppTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
    ],
);

pub static APPID: EntitySchema =
    EntitySchema::new("APPID", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_APPID]);

static ACDB_VPORT: DefSubclass = DefSubclass::new(
    Some("AcDbViewportTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
        DxfAttr::new("center", 12),
        DxfAttr::new("height", 40).with_default(AttrDefault::Float(1.0)),
        DxfAttr::new("aspect_ratio", 41).with_default(AttrDefault::Float(1.0)),
    ],
);

pub static VPORT: EntitySchema =
    EntitySchema::new("VPORT", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_VPORT]);

static ACDB_VIEW: DefSubclass = DefSubclass::new(
    Some("AcDbViewTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
    ],
);

pub static VIEW: EntitySchema =
    EntitySchema::new("VIEW", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_VIEW]);

static ACDB_UCS: DefSubclass = DefSubclass::new(
    Some("AcDbUCSTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
        DxfAttr::new("origin", 10),
        DxfAttr::new("xaxis", 11),
        DxfAttr::new("yaxis", 12),
    ],
);

pub static UCS: EntitySchema =
    EntitySchema::new("UCS", &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_UCS]);

// DIMSTYLE 的句柄组码是 105
static DIMSTYLE_BASE: DefSubclass = DefSubclass::new(
    None,
    &[
        DxfAttr::new("handle", 105),
        DxfAttr::new("owner", 330).since(DxfVersion::R2000),
    ],
);

static ACDB_DIMSTYLE: DefSubclass = DefSubclass::new(
    Some("AcDbDimStyleTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("flags", 70).with_default(AttrDefault::Int(0)),
    ],
);

pub static DIMSTYLE: EntitySchema =
    EntitySchema::new("DIMSTYLE", &[&DIMSTYLE_BASE, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_DIMSTYLE]);

static ACDB_BLOCK_RECORD: DefSubclass = DefSubclass::new(
    Some("AcDbBlockTableRecord"),
    &[
        DxfAttr::new("name", 2),
        DxfAttr::new("layout", 340),
    ],
);

pub static BLOCK_RECORD: EntitySchema = EntitySchema::new(
    "BLOCK_RECORD",
    &[&BASE_CLASS, &ACDB_SYMBOL_TABLE_RECORD, &ACDB_BLOCK_RECORD],
);

static REGISTRY: &[&EntitySchema] = &[
    &LTYPE,
    &LAYER,
    &STYLE,
    &APPID,
    &VPORT,
    &VIEW,
    &UCS,
    &DIMSTYLE,
    &BLOCK_RECORD,
];

/// 按实体类型名查找模式
pub fn schema_for(dxftype: &str) -> Option<&'static EntitySchema> {
    REGISTRY.iter().copied().find(|s| s.dxftype == dxftype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        assert_eq!(schema_for("LTYPE").map(|s| s.dxftype), Some("LTYPE"));
        assert!(schema_for("LINE").is_none());
        assert_eq!(schema_for("DIMSTYLE").and_then(|s| s.get("handle")).map(|(_, a)| a.code), Some(105));
    }

    #[test]
    fn test_every_schema_has_name() {
        for schema in REGISTRY {
            assert_eq!(schema.get("name").map(|(_, a)| a.code), Some(2), "{}", schema.dxftype);
        }
    }
}
