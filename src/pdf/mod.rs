//! PDF 文档布局与渲染

pub mod error;
pub mod fonts;
pub mod layout;
pub mod renderer;

pub use error::RenderError;
pub use fonts::FontFamily;
pub use layout::{Alignment, Block, Cell, ColumnWidth, DocumentDefinition, Margin, Style, Table, Text};
pub use renderer::PdfRenderer;
