//! DXF 组码-值对
//!
//! 组码决定值的类型：
//! - 0..=9: 字符串（0 为结构标记，5 为句柄）
//! - 10..=18: 点（文本形式为 x/y/z 三行，组码依次 +10）
//! - 40..=59: 浮点数
//! - 60..=99: 整数
//! - 100: 子类标记
//! - 330..=369: 句柄引用

use std::fmt;

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

use crate::error::{DxfError, Result};

pub type GroupCode = i32;

/// 结构标记（实体类型、TABLE/ENDTAB 等）
pub const STRUCTURE_MARKER: GroupCode = 0;
/// 子类标记
pub const SUBCLASS_MARKER: GroupCode = 100;
/// 应用数据块标记 `102 {NAME` ... `102 }`
pub const APP_DATA_MARKER: GroupCode = 102;

/// 值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    Float,
    Str,
    Point,
}

impl ValueKind {
    /// 按组码范围确定期望的值类型
    pub fn for_code(code: GroupCode) -> ValueKind {
        match code {
            0..=9 => ValueKind::Str,
            10..=18 => ValueKind::Point,
            19..=59 => ValueKind::Float,
            60..=99 => ValueKind::Int,
            100..=109 => ValueKind::Str,
            110..=112 => ValueKind::Point,
            113..=159 => ValueKind::Float,
            160..=179 => ValueKind::Int,
            210 => ValueKind::Point,
            211..=239 => ValueKind::Float,
            270..=299 => ValueKind::Int,
            300..=369 => ValueKind::Str,
            370..=389 => ValueKind::Int,
            390..=399 => ValueKind::Str,
            400..=409 => ValueKind::Int,
            410..=419 => ValueKind::Str,
            420..=429 => ValueKind::Int,
            430..=439 => ValueKind::Str,
            440..=459 => ValueKind::Int,
            460..=469 => ValueKind::Float,
            470..=481 => ValueKind::Str,
            1010..=1013 => ValueKind::Point,
            1014..=1059 => ValueKind::Float,
            1060..=1071 => ValueKind::Int,
            _ => ValueKind::Str,
        }
    }

    /// 该组码是否为点的 x 坐标组码
    pub fn is_point_code(code: GroupCode) -> bool {
        ValueKind::for_code(code) == ValueKind::Point
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Point => "point",
        };
        f.write_str(name)
    }
}

/// 带类型的标签值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    Int(i64),
    Float(f64),
    Str(String),
    Point2(Point2<f64>),
    Point3(Point3<f64>),
}

impl TagValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TagValue::Int(_) => ValueKind::Int,
            TagValue::Float(_) => ValueKind::Float,
            TagValue::Str(_) => ValueKind::Str,
            TagValue::Point2(_) | TagValue::Point3(_) => ValueKind::Point,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TagValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// 整数也可以按浮点读取
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Float(v) => Some(*v),
            TagValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<i16> for TagValue {
    fn from(v: i16) -> Self {
        TagValue::Int(v.into())
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Int(v.into())
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Int(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::Float(v)
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Str(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::Str(v)
    }
}

impl From<Point2<f64>> for TagValue {
    fn from(v: Point2<f64>) -> Self {
        TagValue::Point2(v)
    }
}

impl From<Point3<f64>> for TagValue {
    fn from(v: Point3<f64>) -> Self {
        TagValue::Point3(v)
    }
}

/// 按 DXF 文本习惯格式化浮点数（始终带小数点）
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Int(v) => write!(f, "{}", v),
            TagValue::Float(v) => f.write_str(&format_float(*v)),
            TagValue::Str(s) => f.write_str(s),
            TagValue::Point2(p) => write!(f, "({}, {})", format_float(p.x), format_float(p.y)),
            TagValue::Point3(p) => write!(
                f,
                "({}, {}, {})",
                format_float(p.x),
                format_float(p.y),
                format_float(p.z)
            ),
        }
    }
}

/// 标签：组码 + 值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub code: GroupCode,
    pub value: TagValue,
}

impl Tag {
    pub fn new(code: GroupCode, value: impl Into<TagValue>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    /// 是否为结构标记 `0/<name>`
    pub fn is_structure(&self, name: &str) -> bool {
        self.code == STRUCTURE_MARKER && self.value.as_str() == Some(name)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_i64()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// 检查值类型是否与组码一致，且值能写成单独一行
    ///
    /// 字符串不能含换行，实数必须有限，否则写出后会打乱行对。
    pub fn check(&self, context: &str) -> Result<()> {
        let expected = ValueKind::for_code(self.code);
        let found = self.value.kind();
        if expected != found {
            return Err(DxfError::Format {
                code: self.code,
                expected,
                found,
                context: context.to_string(),
            });
        }
        let reason = match &self.value {
            TagValue::Str(s) if s.contains(['\n', '\r']) => Some("string value contains a line break"),
            TagValue::Float(v) if !v.is_finite() => Some("float value is not finite"),
            TagValue::Point2(p) if !p.coords.iter().all(|c| c.is_finite()) => Some("point coordinate is not finite"),
            TagValue::Point3(p) if !p.coords.iter().all(|c| c.is_finite()) => Some("point coordinate is not finite"),
            _ => None,
        };
        match reason {
            Some(reason) => Err(DxfError::UnwritableValue {
                code: self.code,
                context: context.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.code, self.value)
    }
}
