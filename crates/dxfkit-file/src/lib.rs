//! DXFKit 文档层
//!
//! 支持：
//! - 符号表（LTYPE、LAYER、STYLE、VPORT ...）的加载、编辑与写出
//! - 句柄分配与实体数据库
//! - 线型图案：数值序列与 `.lin` 定义（含文字/形字形）
//! - R12 旧方言与 R2000+ 扩展方言
//!
//! ```rust
//! use dxfkit_file::prelude::*;
//!
//! let mut doc = Document::new(DocumentConfig::default()).unwrap();
//! doc.new_linetype("DASHED", "Dashed __ __", PatternSource::Numeric(&[0.75, 0.5, -0.25]))
//!     .unwrap();
//!
//! let mut buffer = Vec::new();
//! doc.write(&mut buffer).unwrap();
//! let loaded = Document::read(buffer.as_slice()).unwrap();
//! assert!(loaded.entry_exists("LTYPE", "DASHED"));
//! ```

pub mod complex_ltype;
pub mod config;
pub mod document;
pub mod entities;
pub mod entitydb;
pub mod sections;
pub mod table;

pub use config::DocumentConfig;
pub use document::{Document, PatternSource};
pub use entitydb::EntityDb;
pub use table::{Table, TableKind};

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::complex_ltype::{GlyphResolver, NullResolver};
    pub use crate::config::DocumentConfig;
    pub use crate::document::{Document, PatternSource};
    pub use crate::entities::{DxfAttribs, DxfEntity, Linetype, LinetypePattern};
    pub use crate::entitydb::EntityDb;
    pub use crate::sections::TablesSection;
    pub use crate::table::{Table, TableKind};
    pub use dxfkit_core::prelude::*;
}
