//! LTYPE 表项与线型图案
//!
//! 图案标签固定形如：
//! ```text
//! 72 65        对齐方式 'A'
//! 73 n         元素个数
//! 40 length    图案总长
//! 49 v / 74 0  每个元素：长度 + 填充标签
//! ```
//! 复杂线型在 74 中记录字形类型，并嵌入 75/340/46/50/44/45/9 字形参数。

use dxfkit_core::error::Result;
use dxfkit_core::handle::Handle;
use dxfkit_core::namespace::DxfNamespace;
use dxfkit_core::tag::Tag;
use dxfkit_core::tags::Tags;
use dxfkit_core::version::DxfVersion;
use dxfkit_core::writer::TagWriter;
use tracing::debug;

use super::schemas::LTYPE;
use super::DxfAttribs;
use crate::complex_ltype::{lin_compiler, GlyphResolver, LinToken};

const ALIGNMENT: i64 = 65;

/// 线型图案的标签序列；存入后只做长度与复杂度查询
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinetypePattern {
    tags: Tags,
}

impl LinetypePattern {
    pub fn new(tags: Tags) -> Self {
        Self { tags }
    }

    /// 由数值序列构造：首元素为总长，其余为带符号的划线/空白/点长度
    ///
    /// 空序列得到空图案（不导出）。
    pub fn from_numeric(pattern: &[f64]) -> Self {
        let Some((&length, elements)) = pattern.split_first() else {
            return Self::default();
        };
        let mut tags = Tags::from(vec![
            Tag::new(72, ALIGNMENT),
            Tag::new(73, elements.len() as i64),
            Tag::new(40, length),
        ]);
        for &element in elements {
            tags.push(Tag::new(49, element));
            tags.push(Tag::new(74, 0));
        }
        Self { tags }
    }

    /// 由 `.lin` 定义字符串编译
    ///
    /// 元素个数 73 先以 0 占位，编译结束后回填。
    /// 连续两个数值元素之间插入填充标签 74 0，末尾总是追加一个。
    pub fn compile(definition: &str, length: f64, resolver: &mut dyn GlyphResolver) -> Result<Self> {
        let tokens = lin_compiler(definition)?;

        let mut tags = Tags::from(vec![Tag::new(72, ALIGNMENT), Tag::new(73, 0), Tag::new(40, length)]);
        let mut count = 0i64;
        for token in &tokens {
            if let LinToken::Value(_) = token {
                if tags.last().is_some_and(|t| t.code == 49) {
                    tags.push(Tag::new(74, 0));
                }
                count += 1;
            }
            tags.extend(token.complex_ltype_tags(resolver)?);
        }
        tags.push(Tag::new(74, 0));

        if let Some(tag) = tags.get_mut(1) {
            *tag = Tag::new(73, count);
        }
        Ok(Self { tags })
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// 含有字形引用（74 非零）
    pub fn is_complex_type(&self) -> bool {
        self.tags
            .iter()
            .any(|t| t.code == 74 && t.as_i64().is_some_and(|v| v != 0))
    }

    /// 图案总长（组码 40）
    pub fn total_length(&self) -> Option<f64> {
        self.tags.value_of(40).and_then(|v| v.as_f64())
    }

    /// 元素个数（组码 73）
    pub fn element_count(&self) -> Option<i64> {
        self.tags.value_of(73).and_then(|v| v.as_i64())
    }

    pub fn export_dxf<W: std::io::Write>(&self, writer: &mut TagWriter<W>) -> Result<()> {
        writer.write_tags(&self.tags)
    }
}

/// LTYPE 表项
#[derive(Debug, Clone)]
pub struct Linetype {
    pub dxf: DxfNamespace,
    pattern: LinetypePattern,
}

impl Linetype {
    /// 新建线型；未给出图案时使用实线 `[0.0]`
    pub fn new(handle: Handle, owner: Handle, mut attribs: DxfAttribs) -> Result<Self> {
        let mut dxf = DxfNamespace::new(&LTYPE);
        dxf.set("handle", handle.to_string())?;
        if !owner.is_null() {
            dxf.set("owner", owner.to_string())?;
        }
        let pattern = attribs
            .take_pattern()
            .unwrap_or_else(|| LinetypePattern::from_numeric(&[0.0]));
        for (name, value) in attribs.iter() {
            dxf.set(name, value.clone())?;
        }
        Ok(Self { dxf, pattern })
    }

    /// 从记录标签加载；图案标签从线型子类的未识别标签中取出
    pub fn load(tags: &Tags) -> Result<Self> {
        let mut dxf = DxfNamespace::load(tags, &LTYPE)?;
        let pattern = LinetypePattern::new(dxf.take_unprocessed("AcDbLinetypeTableRecord"));
        Ok(Self { dxf, pattern })
    }

    pub fn pattern(&self) -> &LinetypePattern {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: LinetypePattern) {
        self.pattern = pattern;
    }

    /// 目标版本下是否导出
    ///
    /// 空图案不导出；旧方言没有字形词汇，复杂线型整体跳过。
    pub fn preprocess_export(&self, version: DxfVersion) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        if version.is_legacy() && self.pattern.is_complex_type() {
            debug!(
                "Skipping complex linetype {:?} for {}",
                self.dxf.get_str("name").unwrap_or_default(),
                version
            );
            return false;
        }
        true
    }

    pub fn export_dxf<W: std::io::Write>(&self, writer: &mut TagWriter<W>) -> Result<()> {
        self.dxf.export_entity(writer, &["name", "description", "flags"])?;
        self.pattern.export_dxf(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex_ltype::NullResolver;
    use dxfkit_core::error::ErrorKind;
    use dxfkit_core::reader::read_tags;
    use proptest::prelude::*;

    fn export(ltype: &Linetype, version: DxfVersion) -> Tags {
        let mut writer = TagWriter::new(Vec::new(), version);
        ltype.export_dxf(&mut writer).unwrap();
        read_tags(writer.into_inner().as_slice()).unwrap()
    }

    #[test]
    fn test_numeric_pattern() {
        let pattern = LinetypePattern::from_numeric(&[2.0, 1.25, -0.25, 0.25, -0.25]);
        let expected = Tags::from(vec![
            Tag::new(72, 65),
            Tag::new(73, 4),
            Tag::new(40, 2.0),
            Tag::new(49, 1.25),
            Tag::new(74, 0),
            Tag::new(49, -0.25),
            Tag::new(74, 0),
            Tag::new(49, 0.25),
            Tag::new(74, 0),
            Tag::new(49, -0.25),
            Tag::new(74, 0),
        ]);
        assert_eq!(pattern.tags(), &expected);
        assert!(!pattern.is_complex_type());
        assert_eq!(pattern.total_length(), Some(2.0));
    }

    #[test]
    fn test_empty_numeric_pattern() {
        assert!(LinetypePattern::from_numeric(&[]).is_empty());
    }

    #[test]
    fn test_compile_simple_definition() {
        let pattern = LinetypePattern::compile("A,.5,-.25", 0.75, &mut NullResolver).unwrap();
        let expected = Tags::from(vec![
            Tag::new(72, 65),
            Tag::new(73, 2),
            Tag::new(40, 0.75),
            Tag::new(49, 0.5),
            Tag::new(74, 0),
            Tag::new(49, -0.25),
            Tag::new(74, 0),
        ]);
        assert_eq!(pattern.tags(), &expected);
    }

    #[test]
    fn test_compile_text_glyph() {
        let pattern = LinetypePattern::compile(
            r#"A,.5,-.2,["GAS",STANDARD,S=.1,U=0.0,X=-0.1,Y=-.05],-.25"#,
            0.95,
            &mut NullResolver,
        )
        .unwrap();
        let expected = Tags::from(vec![
            Tag::new(72, 65),
            Tag::new(73, 3),
            Tag::new(40, 0.95),
            Tag::new(49, 0.5),
            Tag::new(74, 0),
            Tag::new(49, -0.2),
            Tag::new(74, 2),
            Tag::new(75, 0),
            Tag::new(340, "0"),
            Tag::new(46, 0.1),
            Tag::new(50, 0.0),
            Tag::new(44, -0.1),
            Tag::new(45, -0.05),
            Tag::new(9, "GAS"),
            Tag::new(49, -0.25),
            Tag::new(74, 0),
        ]);
        assert_eq!(pattern.tags(), &expected);
        assert!(pattern.is_complex_type());
        assert_eq!(pattern.element_count(), Some(3));
    }

    #[test]
    fn test_compile_parse_error() {
        let err = LinetypePattern::compile("A,.5,[", 1.0, &mut NullResolver).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_legacy_suppression() {
        let complex = LinetypePattern::compile("A,.25,-.1,[132,ltypeshp.shx,x=-.1,s=.1],-.1", 0.45, &mut NullResolver)
            .unwrap();
        let attribs = DxfAttribs::new().with("name", "BATTING").with_pattern(complex);
        let ltype = Linetype::new(Handle::new(0x20), Handle::new(5), attribs).unwrap();
        assert!(!ltype.preprocess_export(DxfVersion::R12));
        assert!(ltype.preprocess_export(DxfVersion::R2000));

        let attribs = DxfAttribs::new()
            .with("name", "DASHED")
            .with_pattern(LinetypePattern::from_numeric(&[0.75, 0.5, -0.25]));
        let ltype = Linetype::new(Handle::new(0x21), Handle::new(5), attribs).unwrap();
        assert!(ltype.preprocess_export(DxfVersion::R12));
        assert!(ltype.preprocess_export(DxfVersion::R2000));
    }

    #[test]
    fn test_empty_pattern_not_exported() {
        let attribs = DxfAttribs::new()
            .with("name", "NONE")
            .with_pattern(LinetypePattern::default());
        let ltype = Linetype::new(Handle::new(0x22), Handle::NULL, attribs).unwrap();
        assert!(!ltype.preprocess_export(DxfVersion::R2000));
    }

    #[test]
    fn test_export_forces_defaults() {
        let attribs = DxfAttribs::new().with("name", "CONTINUOUS");
        let ltype = Linetype::new(Handle::new(0x16), Handle::new(5), attribs).unwrap();
        let tags = export(&ltype, DxfVersion::R12);
        assert_eq!(
            tags.as_slice(),
            &[
                Tag::new(0, "LTYPE"),
                Tag::new(5, "16"),
                Tag::new(2, "CONTINUOUS"),
                Tag::new(3, ""),
                Tag::new(70, 0),
                Tag::new(72, 65),
                Tag::new(73, 0),
                Tag::new(40, 0.0),
            ]
        );
    }

    #[test]
    fn test_load_round_trip() {
        let attribs = DxfAttribs::new()
            .with("name", "DASHED")
            .with("description", "Dashed __ __")
            .with_pattern(LinetypePattern::from_numeric(&[0.75, 0.5, -0.25]));
        let ltype = Linetype::new(Handle::new(0x30), Handle::new(5), attribs).unwrap();

        for version in [DxfVersion::R12, DxfVersion::R2000] {
            let tags = export(&ltype, version);
            let loaded = Linetype::load(&tags).unwrap();
            assert_eq!(loaded.pattern(), ltype.pattern(), "{version}");
            assert_eq!(loaded.dxf.get_str("description"), Some("Dashed __ __"));
            assert_eq!(export(&loaded, version), tags);
        }
    }

    proptest! {
        #[test]
        fn prop_numeric_pattern_shape(elements in prop::collection::vec(-5.0f64..5.0, 0..16)) {
            let mut pattern = vec![1.0];
            pattern.extend(&elements);
            let tags = LinetypePattern::from_numeric(&pattern);
            prop_assert_eq!(tags.len(), 3 + 2 * elements.len());
            prop_assert_eq!(tags.element_count(), Some(elements.len() as i64));
        }
    }
}
