//! DXF 文本标签写入器
//!
//! 写入目标是任意 `io::Write`；写入失败时不回滚，输出可能被截断。

use std::io::Write;

use crate::error::Result;
use crate::tag::{format_float, GroupCode, Tag, TagValue, SUBCLASS_MARKER};
use crate::version::DxfVersion;

/// 标签写入器
pub struct TagWriter<W: Write> {
    sink: W,
    dxfversion: DxfVersion,
}

impl<W: Write> TagWriter<W> {
    pub fn new(sink: W, dxfversion: DxfVersion) -> Self {
        Self { sink, dxfversion }
    }

    /// 目标方言版本
    pub fn dxfversion(&self) -> DxfVersion {
        self.dxfversion
    }

    /// 是否写旧方言（不写子类标记）
    pub fn is_legacy(&self) -> bool {
        self.dxfversion.is_legacy()
    }

    fn write_line_pair(&mut self, code: GroupCode, value: &str) -> Result<()> {
        write!(self.sink, "{:>3}\n{}\n", code, value)?;
        Ok(())
    }

    /// 写入一个标签；值类型必须与组码一致
    pub fn write_tag(&mut self, tag: &Tag) -> Result<()> {
        tag.check("tag writer")?;
        match &tag.value {
            TagValue::Point2(p) => {
                self.write_line_pair(tag.code, &format_float(p.x))?;
                self.write_line_pair(tag.code + 10, &format_float(p.y))
            }
            TagValue::Point3(p) => {
                self.write_line_pair(tag.code, &format_float(p.x))?;
                self.write_line_pair(tag.code + 10, &format_float(p.y))?;
                self.write_line_pair(tag.code + 20, &format_float(p.z))
            }
            value => self.write_line_pair(tag.code, &value.to_string()),
        }
    }

    /// 写入组码-值对
    pub fn write_tag2(&mut self, code: GroupCode, value: impl Into<TagValue>) -> Result<()> {
        self.write_tag(&Tag::new(code, value))
    }

    /// 写入标签序列
    pub fn write_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a Tag>) -> Result<()> {
        for tag in tags {
            self.write_tag(tag)?;
        }
        Ok(())
    }

    /// 写入子类标记；旧方言下什么都不写
    pub fn write_subclass(&mut self, name: &str) -> Result<()> {
        if self.is_legacy() {
            return Ok(());
        }
        self.write_tag2(SUBCLASS_MARKER, name)
    }

    /// 写入结构标记 `0/<name>`
    pub fn write_structure(&mut self, name: &str) -> Result<()> {
        self.write_tag2(0, name)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// 取回底层输出
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// 便捷函数：把标签序列写成 DXF 文本
pub fn tags_to_string<'a>(
    tags: impl IntoIterator<Item = &'a Tag>,
    dxfversion: DxfVersion,
) -> Result<String> {
    let mut writer = TagWriter::new(Vec::new(), dxfversion);
    writer.write_tags(tags)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reader::read_tags;
    use nalgebra::Point3;

    #[test]
    fn test_tag_lines() {
        let tags = [Tag::new(0, "TABLE"), Tag::new(70, 3), Tag::new(40, 2.0)];
        let text = tags_to_string(&tags, DxfVersion::R2000).unwrap();
        assert_eq!(text, "  0\nTABLE\n 70\n3\n 40\n2.0\n");
    }

    #[test]
    fn test_point_split_into_coordinates() {
        let tags = [Tag::new(10, Point3::new(1.0, 2.0, 3.0))];
        let text = tags_to_string(&tags, DxfVersion::R2000).unwrap();
        assert_eq!(text, " 10\n1.0\n 20\n2.0\n 30\n3.0\n");
        assert_eq!(read_tags(text.as_bytes()).unwrap()[0], tags[0]);
    }

    #[test]
    fn test_subclass_marker_gated_by_dialect() {
        let mut writer = TagWriter::new(Vec::new(), DxfVersion::R12);
        writer.write_subclass("AcDbSymbolTableRecord").unwrap();
        assert!(writer.into_inner().is_empty());

        let mut writer = TagWriter::new(Vec::new(), DxfVersion::R2000);
        writer.write_subclass("AcDbSymbolTableRecord").unwrap();
        assert_eq!(writer.into_inner(), b"100\nAcDbSymbolTableRecord\n");
    }

    #[test]
    fn test_rejects_kind_mismatch() {
        let mut writer = TagWriter::new(Vec::new(), DxfVersion::R2000);
        let err = writer.write_tag2(73, "four").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_rejects_line_break_in_string() {
        let mut writer = TagWriter::new(Vec::new(), DxfVersion::R2000);
        let err = writer.write_tag2(2, "A\n  0\nENDTAB").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(writer.write_tag2(3, "CR\r").is_err());
        assert!(writer.write_tag2(49, f64::NAN).is_err());
        assert!(writer.into_inner().is_empty());
    }
}
