//! 复杂线型定义解析器
//!
//! 支持 `.lin` 文件中的线型定义格式：
//! - 简单线型: `A,.5,-.25,0,-.25`（正数为划线，负数为空白，0 为点）
//! - 文字字形: `A,.5,-.2,["GAS",STANDARD,S=.1,U=0.0,X=-0.1,Y=-.05],-.25`
//! - 形字形: `A,.25,-.1,[132,ltypeshp.shx,X=-.1,S=.1],-.1`
//!
//! 开头的 `A` 为对齐方式，只允许出现在第一个位置。
//! 字形参数：`S` 缩放、`R`/`U` 旋转、`X`/`Y` 偏移，缺省为 0。

use dxfkit_core::error::{DxfError, Result};
use dxfkit_core::handle::Handle;
use dxfkit_core::tag::Tag;

/// 字形引用的解析器（通常由文档的 STYLE 表实现）
///
/// 未知字形如何处理（报错或新建样式）由实现者决定。
pub trait GlyphResolver {
    /// 文字样式句柄
    fn text_style_handle(&mut self, style: &str) -> Result<Handle>;

    /// 形文件（SHX）样式句柄
    fn shape_file_handle(&mut self, shx: &str) -> Result<Handle>;
}

/// 没有文档时使用：所有字形引用都指向空句柄 `"0"`
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl GlyphResolver for NullResolver {
    fn text_style_handle(&mut self, _style: &str) -> Result<Handle> {
        Ok(Handle::NULL)
    }

    fn shape_file_handle(&mut self, _shx: &str) -> Result<Handle> {
        Ok(Handle::NULL)
    }
}

/// 字形摆放参数
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphPlacement {
    pub scale: f64,
    pub rotation: f64,
    pub x: f64,
    pub y: f64,
}

impl GlyphPlacement {
    fn tags(&self) -> [Tag; 4] {
        [
            Tag::new(46, self.scale),
            Tag::new(50, self.rotation),
            Tag::new(44, self.x),
            Tag::new(45, self.y),
        ]
    }
}

/// 线型定义中的一个元素
#[derive(Debug, Clone, PartialEq)]
pub enum LinToken {
    /// 划线/空白/点的长度
    Value(f64),
    /// 文字字形
    Text {
        text: String,
        style: String,
        placement: GlyphPlacement,
    },
    /// 形字形（按形编号引用）
    Shape {
        index: i64,
        shx: String,
        placement: GlyphPlacement,
    },
}

impl LinToken {
    pub fn is_glyph(&self) -> bool {
        !matches!(self, LinToken::Value(_))
    }

    /// 展开为线型标签
    pub fn complex_ltype_tags(&self, resolver: &mut dyn GlyphResolver) -> Result<Vec<Tag>> {
        match self {
            LinToken::Value(value) => Ok(vec![Tag::new(49, *value)]),
            LinToken::Text {
                text,
                style,
                placement,
            } => {
                let handle = resolver.text_style_handle(style)?;
                let mut tags = vec![
                    Tag::new(74, 2),
                    Tag::new(75, 0),
                    Tag::new(340, handle.to_string()),
                ];
                tags.extend(placement.tags());
                tags.push(Tag::new(9, text.as_str()));
                Ok(tags)
            }
            LinToken::Shape {
                index,
                shx,
                placement,
            } => {
                let handle = resolver.shape_file_handle(shx)?;
                let mut tags = vec![
                    Tag::new(74, 4),
                    Tag::new(75, *index),
                    Tag::new(340, handle.to_string()),
                ];
                tags.extend(placement.tags());
                Ok(tags)
            }
        }
    }
}

/// 按逗号拆分定义字符串；引号内的逗号不拆分
pub fn lin_tokenizer(definition: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut quoted = false;

    for ch in definition.chars() {
        if ch == ',' && !quoted {
            tokens.push(token.trim().to_string());
            token.clear();
            continue;
        }
        token.push(ch);
        if ch == '"' {
            quoted = !quoted;
        }
    }

    if quoted {
        return Err(DxfError::parse(tokens.len(), token.trim(), "unterminated quote"));
    }
    if !token.trim().is_empty() {
        tokens.push(token.trim().to_string());
    }
    Ok(tokens)
}

enum GlyphKind {
    Text(String),
    Shape(i64),
}

/// 正在解析的 `[...]` 字形
struct GlyphBuilder {
    position: usize,
    kind: GlyphKind,
    font: Option<String>,
    placement: GlyphPlacement,
}

impl GlyphBuilder {
    /// 解析字形的第一个记号：`["text"` 或 `[index`
    fn open(position: usize, token: &str) -> Result<Self> {
        let body = token[1..].trim_end_matches(']').trim();
        let kind = if body.starts_with('"') {
            if body.len() < 2 || !body.ends_with('"') {
                return Err(DxfError::parse(position, token, "malformed quoted text"));
            }
            GlyphKind::Text(body[1..body.len() - 1].to_string())
        } else {
            let index = body.parse::<i64>().map_err(|_| {
                DxfError::parse(position, token, "shape glyph requires a shape index, not a shape name")
            })?;
            GlyphKind::Shape(index)
        };
        Ok(Self {
            position,
            kind,
            font: None,
            placement: GlyphPlacement::default(),
        })
    }

    /// 解析字形内部的记号：样式名或 `cmd=value`
    fn push(&mut self, position: usize, token: &str) -> Result<()> {
        let item = token.trim_end_matches(']').trim();
        if let Some((command, value)) = item.split_once('=') {
            let value = finite_value(value.trim())
                .ok_or_else(|| DxfError::parse(position, token, "glyph parameter value must be a finite number"))?;
            match command.trim().to_ascii_lowercase().as_str() {
                "s" => self.placement.scale = value,
                "r" | "u" => self.placement.rotation = value,
                "x" => self.placement.x = value,
                "y" => self.placement.y = value,
                _ => return Err(DxfError::parse(position, token, "unknown glyph parameter")),
            }
        } else if self.font.is_none() && !item.is_empty() {
            self.font = Some(item.to_string());
        } else {
            return Err(DxfError::parse(position, token, "unexpected token in glyph definition"));
        }
        Ok(())
    }

    fn finish(self) -> Result<LinToken> {
        let Some(font) = self.font else {
            let reason = match self.kind {
                GlyphKind::Text(_) => "text glyph requires a text style",
                GlyphKind::Shape(_) => "shape glyph requires a shape file",
            };
            return Err(DxfError::parse(self.position, "[", reason));
        };
        Ok(match self.kind {
            GlyphKind::Text(text) => LinToken::Text {
                text,
                style: font,
                placement: self.placement,
            },
            GlyphKind::Shape(index) => LinToken::Shape {
                index,
                shx: font,
                placement: self.placement,
            },
        })
    }
}

/// `nan`、`inf` 之类能被 `f64` 解析，但不是合法的 DXF 实数
fn finite_value(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 把线型定义字符串解析为元素序列
pub fn lin_compiler(definition: &str) -> Result<Vec<LinToken>> {
    let mut result = Vec::new();
    let mut glyph: Option<GlyphBuilder> = None;

    for (position, token) in lin_tokenizer(definition)?.iter().enumerate() {
        if position == 0 && token.eq_ignore_ascii_case("A") {
            continue;
        }

        match glyph.as_mut() {
            None => {
                if token.starts_with('[') {
                    glyph = Some(GlyphBuilder::open(position, token)?);
                } else if let Ok(value) = token.parse::<f64>() {
                    if !value.is_finite() {
                        return Err(DxfError::parse(position, token.as_str(), "pattern value must be finite"));
                    }
                    result.push(LinToken::Value(value));
                    continue;
                } else if token.ends_with(']') {
                    return Err(DxfError::parse(position, token.as_str(), "']' without matching '['"));
                } else {
                    return Err(DxfError::parse(position, token.as_str(), "expected a number or a glyph"));
                }
            }
            Some(builder) => {
                if token.starts_with('[') {
                    return Err(DxfError::parse(position, token.as_str(), "nested glyph definition"));
                }
                builder.push(position, token)?;
            }
        }

        if token.ends_with(']') {
            if let Some(builder) = glyph.take() {
                result.push(builder.finish()?);
            }
        }
    }

    if let Some(builder) = glyph {
        return Err(DxfError::parse(builder.position, "[", "unterminated glyph definition"));
    }
    Ok(result)
}
