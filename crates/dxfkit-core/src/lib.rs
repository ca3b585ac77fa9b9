//! DXFKit 组码层
//!
//! DXF 文本由 (组码, 值) 对组成，本 crate 提供：
//! - `Tag` / `Tags`: 带类型的标签与标签序列
//! - `TagGroups`: 按结构标记切分标签流
//! - `schema` / `DxfNamespace`: 声明式属性模式与按模式加载/导出
//! - `TagReader` / `TagWriter`: 文本读写，按 `DxfVersion` 切换新旧方言
//! - `Handle` / `HandleGenerator`: 文档级唯一句柄
//!
//! # 示例
//!
//! ```rust
//! use dxfkit_core::prelude::*;
//!
//! let tags = read_tags("  0\nLTYPE\n  2\nDASHED\n 70\n0\n".as_bytes()).unwrap();
//! assert_eq!(tags.dxftype(), Some("LTYPE"));
//! assert_eq!(tags[2], Tag::new(70, 0));
//! ```

pub mod error;
pub mod groups;
pub mod handle;
pub mod namespace;
pub mod reader;
pub mod schema;
pub mod tag;
pub mod tags;
pub mod version;
pub mod writer;

pub use error::{DxfError, ErrorKind, Result};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::error::{DxfError, ErrorKind, Result};
    pub use crate::groups::TagGroups;
    pub use crate::handle::{Handle, HandleGenerator};
    pub use crate::namespace::DxfNamespace;
    pub use crate::reader::{read_tags, TagReader};
    pub use crate::schema::{AttrDefault, DefSubclass, DxfAttr, EntitySchema};
    pub use crate::tag::{GroupCode, Tag, TagValue, ValueKind};
    pub use crate::tags::Tags;
    pub use crate::version::DxfVersion;
    pub use crate::writer::TagWriter;
}
