//! 文档布局描述
//!
//! 渲染前的文档结构：文本块、分栏、表格以及命名样式。
//! 这里只有数据，没有任何排版或输出逻辑。

use std::collections::HashMap;

/// 水平对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// 表格列宽
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// 按内容宽度
    Auto,
    /// 平分剩余宽度
    Star,
    /// 固定宽度（pt）
    Fixed(f32),
}

/// 外边距：左、上、右、下
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Margin {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn vertical(top: f32, bottom: f32) -> Self {
        Self::new(0.0, top, 0.0, bottom)
    }
}

/// 命名样式
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub font_size: Option<f32>,
    pub bold: bool,
    pub italics: bool,
}

impl Style {
    pub fn sized(font_size: f32) -> Self {
        Self {
            font_size: Some(font_size),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// 文本块
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub text: String,
    pub style: Option<String>,
    pub alignment: Alignment,
    /// 覆盖样式中的字号
    pub font_size: Option<f32>,
    pub margin: Margin,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }
}

/// 表格单元格
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub style: Option<String>,
    pub alignment: Alignment,
    pub col_span: usize,
    /// 被左侧单元格合并覆盖的占位格
    pub placeholder: bool,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            alignment: Alignment::Left,
            col_span: 1,
            placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            placeholder: true,
            ..Self::new("")
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn col_span(mut self, col_span: usize) -> Self {
        self.col_span = col_span.max(1);
        self
    }
}

/// 表格
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub widths: Vec<ColumnWidth>,
    pub body: Vec<Vec<Cell>>,
}

/// 文档内容块
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// 等宽分栏，每栏一个文本块
    Columns(Vec<Text>),
    Text(Text),
    Table(Table),
}

/// 完整的文档定义
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDefinition {
    pub default_style: Style,
    pub content: Vec<Block>,
    pub styles: HashMap<String, Style>,
}

impl DocumentDefinition {
    pub fn new(default_style: Style) -> Self {
        Self {
            default_style,
            content: Vec::new(),
            styles: HashMap::new(),
        }
    }

    pub fn with_style(mut self, name: impl Into<String>, style: Style) -> Self {
        self.styles.insert(name.into(), style);
        self
    }

    pub fn push(&mut self, block: Block) {
        self.content.push(block);
    }

    /// 文档中的第一个表格
    pub fn table(&self) -> Option<&Table> {
        self.content.iter().find_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// 合并默认样式与命名样式；未知样式名按默认样式处理
    pub fn resolve_style(&self, name: Option<&str>, font_size: Option<f32>) -> ResolvedStyle {
        let named = name.and_then(|n| self.styles.get(n));
        let size = font_size
            .or_else(|| named.and_then(|s| s.font_size))
            .or(self.default_style.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE);

        ResolvedStyle {
            font_size: size,
            bold: named.map(|s| s.bold).unwrap_or(false) || self.default_style.bold,
            italics: named.map(|s| s.italics).unwrap_or(false) || self.default_style.italics,
        }
    }
}

pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// 最终生效的文字样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub font_size: f32,
    pub bold: bool,
    pub italics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_style_precedence() {
        let doc = DocumentDefinition::new(Style::sized(12.0))
            .with_style("header", Style::sized(18.0).bold());

        let header = doc.resolve_style(Some("header"), None);
        assert_eq!(header.font_size, 18.0);
        assert!(header.bold);

        // 显式字号优先
        let overridden = doc.resolve_style(Some("header"), Some(14.0));
        assert_eq!(overridden.font_size, 14.0);

        let unknown = doc.resolve_style(Some("missing"), None);
        assert_eq!(unknown.font_size, 12.0);
        assert!(!unknown.bold);
    }

    #[test]
    fn test_cell_col_span_never_zero() {
        assert_eq!(Cell::new("x").col_span(0).col_span, 1);
        assert!(Cell::placeholder().placeholder);
    }
}
