//! DXF 文本标签读取器
//!
//! 每个数据项由两行组成：
//! - 第一行：组码（数字）
//! - 第二行：值
//!
//! 点坐标在文本中拆成多行（x 组码 n，y 组码 n+10，可选 z 组码 n+20），
//! 读取时合并为一个点标签。

use std::io::BufRead;

use nalgebra::{Point2, Point3};

use crate::error::{DxfError, Result};
use crate::tag::{GroupCode, Tag, TagValue, ValueKind};
use crate::tags::Tags;

/// 未解释的组码-值行对
#[derive(Debug, Clone)]
struct RawPair {
    code: GroupCode,
    value: String,
    line: usize,
}

impl RawPair {
    fn parse_f64(&self) -> Result<f64> {
        self.value.trim().parse().map_err(|_| DxfError::InvalidValue {
            code: self.code,
            line: self.line,
            reason: format!("expected float, found {:?}", self.value),
        })
    }

    fn parse_i64(&self) -> Result<i64> {
        let text = self.value.trim();
        // 部分写入器会把整数写成 "1.0"
        text.parse::<i64>()
            .or_else(|_| match text.parse::<f64>() {
                Ok(v) if v.fract() == 0.0 => Ok(v as i64),
                _ => Err(()),
            })
            .map_err(|_| DxfError::InvalidValue {
                code: self.code,
                line: self.line,
                reason: format!("expected integer, found {:?}", self.value),
            })
    }
}

/// 文本标签读取器
pub struct TagReader {
    pairs: Vec<RawPair>,
    position: usize,
}

impl TagReader {
    /// 读取全部行对，直到流结束或遇到 `0/EOF`
    pub fn new<R: BufRead>(reader: R) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut lines = reader.lines();
        let mut line_no = 0;

        loop {
            // 读取组码
            let code_line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            line_no += 1;
            if code_line.trim().is_empty() && pairs.is_empty() {
                continue;
            }

            // 读取值
            let value_line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(DxfError::InvalidValue {
                        code: code_line.trim().parse().unwrap_or(-1),
                        line: line_no,
                        reason: "missing value line".to_string(),
                    })
                }
            };
            line_no += 1;

            let code: GroupCode = code_line.trim().parse().map_err(|_| DxfError::InvalidGroupCode {
                line: line_no - 1,
                value: code_line.clone(),
            })?;

            let value = value_line.trim_end_matches('\r').to_string();
            let is_eof = code == 0 && value.trim() == "EOF";
            pairs.push(RawPair {
                code,
                value,
                line: line_no,
            });

            if is_eof {
                break;
            }
        }

        tracing::debug!("Read {} group code pairs ({} lines)", pairs.len(), line_no);
        Ok(Self { pairs, position: 0 })
    }

    /// 从字符串读取
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(text.as_bytes())
    }

    fn advance(&mut self) -> Option<RawPair> {
        let pair = self.pairs.get(self.position).cloned();
        if pair.is_some() {
            self.position += 1;
        }
        pair
    }

    fn peek_code(&self) -> Option<GroupCode> {
        self.pairs.get(self.position).map(|p| p.code)
    }

    /// 读取下一个带类型的标签
    pub fn next_tag(&mut self) -> Result<Option<Tag>> {
        let Some(pair) = self.advance() else {
            return Ok(None);
        };

        let value = match ValueKind::for_code(pair.code) {
            ValueKind::Str => TagValue::Str(pair.value.clone()),
            ValueKind::Int => TagValue::Int(pair.parse_i64()?),
            ValueKind::Float => TagValue::Float(pair.parse_f64()?),
            ValueKind::Point => self.read_point(&pair)?,
        };
        Ok(Some(Tag::new(pair.code, value)))
    }

    fn read_point(&mut self, x_pair: &RawPair) -> Result<TagValue> {
        let x = x_pair.parse_f64()?;
        let y_pair = match self.advance() {
            Some(p) if p.code == x_pair.code + 10 => p,
            _ => {
                return Err(DxfError::InvalidValue {
                    code: x_pair.code,
                    line: x_pair.line,
                    reason: format!("missing y coordinate (group code {})", x_pair.code + 10),
                })
            }
        };
        let y = y_pair.parse_f64()?;

        if self.peek_code() == Some(x_pair.code + 20) {
            if let Some(z_pair) = self.advance() {
                let z = z_pair.parse_f64()?;
                return Ok(TagValue::Point3(Point3::new(x, y, z)));
            }
        }
        Ok(TagValue::Point2(Point2::new(x, y)))
    }

    /// 读取剩余全部标签
    pub fn read_all(mut self) -> Result<Tags> {
        let mut tags = Tags::new();
        while let Some(tag) = self.next_tag()? {
            tags.push(tag);
        }
        Ok(tags)
    }
}

/// 便捷函数：把 DXF 文本解析为标签序列
pub fn read_tags<R: BufRead>(reader: R) -> Result<Tags> {
    TagReader::new(reader)?.read_all()
}
