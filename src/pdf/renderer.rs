//! 基于 lopdf 的 PDF 渲染器
//!
//! 把 [`DocumentDefinition`] 按从上到下的流式排版写成 PDF：
//! 文本自动换行，表格行放不下时另起一页，超过一页高的行拆到后续页，
//! 最后一次性输出完整字节。

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use super::error::RenderError;
use super::fonts::{encode_win_ansi, FontFamily, FontMetrics, FontVariant};
use super::layout::{
    Alignment, Block, Cell, ColumnWidth, DocumentDefinition, ResolvedStyle, Table, Text,
};

const CELL_PADDING_X: f32 = 4.0;
const CELL_PADDING_Y: f32 = 2.0;
const BORDER_WIDTH: f32 = 1.0;
/// 自动列收缩时给每个弹性列保留的最小宽度
const MIN_STAR_WIDTH: f32 = 50.0;

/// 页面尺寸与边距（pt）
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageGeometry {
    width: f32,
    height: f32,
    margin: f32,
}

impl PageGeometry {
    fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 40.0,
        }
    }

    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

/// PDF 渲染器，持有字体族配置，可跨请求共享
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    fonts: FontFamily,
    page: PageGeometry,
    /// 按 `FontVariant::index` 排列
    metrics: Vec<FontMetrics>,
}

impl PdfRenderer {
    pub fn new(fonts: FontFamily) -> Result<Self, RenderError> {
        let metrics = FontVariant::ALL
            .iter()
            .map(|variant| {
                let base_font = fonts.base_font(*variant);
                FontMetrics::for_base_font(base_font)
                    .ok_or_else(|| RenderError::UnsupportedFont(base_font.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            fonts,
            page: PageGeometry::a4(),
            metrics,
        })
    }

    /// 渲染整份文档，返回完整的 PDF 字节
    pub fn render(&self, doc: &DocumentDefinition) -> Result<Vec<u8>, RenderError> {
        let mut composer = PageComposer::new(self, doc);
        for block in &doc.content {
            match block {
                Block::Text(text) => composer.text_block(text)?,
                Block::Columns(columns) => composer.columns(columns)?,
                Block::Table(table) => composer.table(table)?,
            }
        }
        let pages = composer.finish();
        debug!("文档排版完成，共 {} 页", pages.len());

        self.write_document(pages)
    }

    fn write_document(&self, pages: Vec<Content>) -> Result<Vec<u8>, RenderError> {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let mut font_dict = Dictionary::new();
        for variant in FontVariant::ALL {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => Object::Name(self.fonts.base_font(variant).as_bytes().to_vec()),
                "Encoding" => "WinAnsiEncoding",
            });
            font_dict.set(variant.resource_name(), font_id);
        }
        let resources_id = document.add_object(dictionary! { "Font" => font_dict });

        let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
        for content in pages {
            let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), self.page.width.into(), self.page.height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_ids.push(page_id);
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        };
        document
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        document.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// 一段已选定字体的文字
#[derive(Debug, Clone, Copy)]
struct Face {
    variant: FontVariant,
    metrics: FontMetrics,
    size: f32,
}

impl Face {
    fn line_height(&self) -> f32 {
        self.metrics.line_height(self.size)
    }

    fn width(&self, text: &str) -> f32 {
        self.metrics.text_width(text, self.size)
    }
}

/// 排版中的单元格：换行后的文字与占据的列
struct CellBox<'a> {
    cell: &'a Cell,
    face: Face,
    lines: Vec<String>,
    column: usize,
    span: usize,
}

/// 逐页收集绘制指令
struct PageComposer<'a> {
    renderer: &'a PdfRenderer,
    doc: &'a DocumentDefinition,
    pages: Vec<Content>,
    current: Content,
    /// 距页面顶端的当前位置
    cursor: f32,
}

impl<'a> PageComposer<'a> {
    fn new(renderer: &'a PdfRenderer, doc: &'a DocumentDefinition) -> Self {
        Self {
            renderer,
            doc,
            pages: Vec::new(),
            current: Self::blank_page(),
            cursor: renderer.page.margin,
        }
    }

    fn blank_page() -> Content {
        Content {
            operations: vec![Operation::new("w", vec![BORDER_WIDTH.into()])],
        }
    }

    fn page(&self) -> &PageGeometry {
        &self.renderer.page
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.page().margin
    }

    fn remaining(&self) -> f32 {
        self.page().content_bottom() - self.cursor
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(&mut self.current, Self::blank_page());
        self.pages.push(finished);
        self.cursor = self.page().margin;
    }

    fn finish(mut self) -> Vec<Content> {
        self.pages.push(self.current);
        self.pages
    }

    fn face(&self, style: ResolvedStyle) -> Face {
        let variant = self.renderer.fonts.variant(style.bold, style.italics);
        Face {
            variant,
            metrics: self.renderer.metrics[variant.index()],
            size: style.font_size,
        }
    }

    fn text_face(&self, text: &Text) -> Face {
        self.face(self.doc.resolve_style(text.style.as_deref(), text.font_size))
    }

    fn text_block(&mut self, text: &Text) -> Result<(), RenderError> {
        let face = self.text_face(text);
        let left = self.page().margin + text.margin.left;
        let width = self.page().content_width() - text.margin.left - text.margin.right;
        let lines = wrap_text(&text.text, &face, width);
        let line_height = face.line_height();

        self.cursor += text.margin.top;
        for line in &lines {
            if line_height > self.remaining() && !self.at_page_top() {
                self.new_page();
            }
            self.draw_line(line, &face, text.alignment, left, width, self.cursor);
            self.cursor += line_height;
        }
        self.cursor += text.margin.bottom;
        Ok(())
    }

    fn columns(&mut self, columns: &[Text]) -> Result<(), RenderError> {
        if columns.is_empty() {
            return Ok(());
        }
        let column_width = self.page().content_width() / columns.len() as f32;

        let laid_out: Vec<(Face, Vec<String>, f32)> = columns
            .iter()
            .map(|text| {
                let face = self.text_face(text);
                let inner = column_width - text.margin.left - text.margin.right;
                let lines = wrap_text(&text.text, &face, inner);
                let height =
                    text.margin.top + lines.len() as f32 * face.line_height() + text.margin.bottom;
                (face, lines, height)
            })
            .collect();

        let height = laid_out.iter().map(|(_, _, h)| *h).fold(0.0, f32::max);
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }

        let top = self.cursor;
        for (index, (text, (face, lines, _))) in columns.iter().zip(&laid_out).enumerate() {
            let left = self.page().margin + index as f32 * column_width + text.margin.left;
            let inner = column_width - text.margin.left - text.margin.right;
            let mut y = top + text.margin.top;
            for line in lines {
                self.draw_line(line, face, text.alignment, left, inner, y);
                y += face.line_height();
            }
        }
        self.cursor = top + height;
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<(), RenderError> {
        let widths = self.column_widths(table);
        let left = self.page().margin;
        let offsets: Vec<f32> = widths
            .iter()
            .scan(left, |x, width| {
                let start = *x;
                *x += width;
                Some(start)
            })
            .collect();

        for row in &table.body {
            let boxes = self.layout_row(row, &widths);
            if boxes.is_empty() {
                continue;
            }
            let height = row_height(&boxes);

            // 整页放得下的行整体移到下一页，否则从当前位置开始拆分
            if height > self.remaining()
                && !self.at_page_top()
                && height <= self.page().content_height()
            {
                self.new_page();
            }

            let mut drawn = vec![0usize; boxes.len()];
            loop {
                let room = self.remaining() - 2.0 * CELL_PADDING_Y;
                let mut take: Vec<usize> = boxes
                    .iter()
                    .zip(&drawn)
                    .map(|(cell_box, done)| {
                        let fit = (room / cell_box.face.line_height()).floor().max(0.0) as usize;
                        (cell_box.lines.len() - done).min(fit)
                    })
                    .collect();

                if take.iter().all(|n| *n == 0) {
                    if !self.at_page_top() {
                        self.new_page();
                        continue;
                    }
                    // 单行已高于整页：每格至少输出一行，保证推进
                    for (n, (cell_box, done)) in take.iter_mut().zip(boxes.iter().zip(&drawn)) {
                        *n = usize::from(*done < cell_box.lines.len());
                    }
                }

                let part_height = boxes
                    .iter()
                    .zip(&take)
                    .map(|(cell_box, n)| *n as f32 * cell_box.face.line_height())
                    .fold(0.0, f32::max)
                    + 2.0 * CELL_PADDING_Y;

                let top = self.cursor;
                for ((cell_box, done), n) in boxes.iter().zip(&drawn).zip(&take) {
                    let x = offsets[cell_box.column];
                    let width: f32 = widths[cell_box.column..cell_box.column + cell_box.span]
                        .iter()
                        .sum();
                    self.draw_border(x, top, width, part_height);

                    let inner = width - 2.0 * CELL_PADDING_X;
                    let mut y = top + CELL_PADDING_Y;
                    for line in &cell_box.lines[*done..*done + *n] {
                        self.draw_line(
                            line,
                            &cell_box.face,
                            cell_box.cell.alignment,
                            x + CELL_PADDING_X,
                            inner,
                            y,
                        );
                        y += cell_box.face.line_height();
                    }
                }
                self.cursor = top + part_height;

                for (done, n) in drawn.iter_mut().zip(&take) {
                    *done += n;
                }
                if boxes
                    .iter()
                    .zip(&drawn)
                    .all(|(cell_box, done)| *done >= cell_box.lines.len())
                {
                    break;
                }
                self.new_page();
            }
        }
        Ok(())
    }

    fn layout_row<'r>(&self, row: &'r [Cell], widths: &[f32]) -> Vec<CellBox<'r>> {
        let columns = widths.len();
        row.iter()
            .enumerate()
            .take(columns)
            .filter(|(_, cell)| !cell.placeholder)
            .map(|(column, cell)| {
                let span = cell.col_span.min(columns - column);
                let width: f32 = widths[column..column + span].iter().sum();
                let face = self.face(self.doc.resolve_style(cell.style.as_deref(), None));
                let lines = wrap_text(&cell.text, &face, width - 2.0 * CELL_PADDING_X);
                CellBox {
                    cell,
                    face,
                    lines,
                    column,
                    span,
                }
            })
            .collect()
    }

    /// 计算各列宽度：固定列取定值，自动列取最宽单行内容，弹性列平分剩余
    fn column_widths(&self, table: &Table) -> Vec<f32> {
        let available = self.page().content_width();
        let padding = 2.0 * CELL_PADDING_X;

        let mut widths: Vec<f32> = table
            .widths
            .iter()
            .enumerate()
            .map(|(column, width)| match width {
                ColumnWidth::Fixed(value) => *value,
                ColumnWidth::Star => 0.0,
                ColumnWidth::Auto => {
                    table
                        .body
                        .iter()
                        .filter_map(|row| row.get(column))
                        .filter(|cell| !cell.placeholder && cell.col_span == 1)
                        .map(|cell| {
                            let face = self.face(self.doc.resolve_style(cell.style.as_deref(), None));
                            cell.text
                                .lines()
                                .map(|line| face.width(line))
                                .fold(0.0, f32::max)
                        })
                        .fold(0.0, f32::max)
                        + padding
                }
            })
            .collect();

        let star_count = table
            .widths
            .iter()
            .filter(|w| matches!(w, ColumnWidth::Star))
            .count();
        let fixed_total: f32 = table
            .widths
            .iter()
            .zip(&widths)
            .filter(|(w, _)| matches!(w, ColumnWidth::Fixed(_)))
            .map(|(_, value)| value)
            .sum();
        let auto_total: f32 = table
            .widths
            .iter()
            .zip(&widths)
            .filter(|(w, _)| matches!(w, ColumnWidth::Auto))
            .map(|(_, value)| value)
            .sum();

        let star_reserve = MIN_STAR_WIDTH * star_count as f32;
        if auto_total > 0.0 && fixed_total + auto_total + star_reserve > available {
            let room = (available - fixed_total - star_reserve).max(0.0);
            let scale = room / auto_total;
            for (width, kind) in widths.iter_mut().zip(&table.widths) {
                if matches!(kind, ColumnWidth::Auto) {
                    *width = (*width * scale).max(padding + 1.0);
                }
            }
        }

        if star_count > 0 {
            let used: f32 = widths.iter().sum();
            let share = ((available - used) / star_count as f32).max(padding + 1.0);
            for (width, kind) in widths.iter_mut().zip(&table.widths) {
                if matches!(kind, ColumnWidth::Star) {
                    *width = share;
                }
            }
        }
        widths
    }

    fn draw_border(&mut self, x: f32, top: f32, width: f32, height: f32) {
        let y = self.page().height - (top + height);
        let ops = &mut self.current.operations;
        ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("S", vec![]));
    }

    /// 在 `left..left+width` 范围内按对齐方式绘制一行，`top` 为行顶端
    fn draw_line(&mut self, line: &str, face: &Face, alignment: Alignment, left: f32, width: f32, top: f32) {
        if line.is_empty() {
            return;
        }
        let line_width = face.width(line);
        let x = match alignment {
            Alignment::Left => left,
            Alignment::Center => left + (width - line_width) / 2.0,
            Alignment::Right => left + width - line_width,
        };
        let glyph_height = (face.metrics.ascent - face.metrics.descent) * face.size;
        let baseline = top + (face.line_height() - glyph_height) / 2.0 + face.metrics.ascent * face.size;
        let y = self.page().height - baseline;

        let ops = &mut self.current.operations;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![
                Object::Name(face.variant.resource_name().as_bytes().to_vec()),
                face.size.into(),
            ],
        ));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(line))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

fn row_height(boxes: &[CellBox<'_>]) -> f32 {
    boxes
        .iter()
        .map(|b| b.lines.len() as f32 * b.face.line_height() + 2.0 * CELL_PADDING_Y)
        .fold(0.0, f32::max)
}

/// 在单个空格处折行，保留连续空格；单词本身过长时按字符拆分；空文本也占一行
fn wrap_text(text: &str, face: &Face, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut started = false;
        for word in paragraph.split(' ') {
            let candidate = if started {
                format!("{} {}", current, word)
            } else {
                word.to_string()
            };
            if face.width(&candidate) <= max_width {
                current = candidate;
                started = true;
                continue;
            }
            if started {
                lines.push(std::mem::take(&mut current));
            }
            started = true;
            if face.width(word) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    if !current.is_empty() && face.width(&current) + face.metrics.char_width(c, face.size) > max_width {
                        lines.push(std::mem::take(&mut current));
                    }
                    current.push(c);
                }
            }
        }
        lines.push(current);
    }
    lines
}
