//! 商品报表：展示行、合计与文档布局

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use super::model::Product;
use crate::pdf::{
    Alignment, Block, Cell, ColumnWidth, DocumentDefinition, Margin, Style, Table, Text,
};

pub const CURRENCY_PREFIX: &str = "R$";
pub const REPORT_TITLE: &str = "Products Report";
pub const FOOTER_LABEL: &str = "Total of Products";
pub const COLUMN_TITLES: [&str; 4] = ["Id", "Description", "Price", "Quantity"];

const STYLE_HEADER: &str = "header";
const STYLE_COLUMNS_TITLE: &str = "columnsTitle";
const STYLE_TABLE_FOOTER: &str = "tableFooter";
const DIVIDER: &str = "--------------------------------------------------------------------------------------------------------------------------------";

/// 价格格式：两位小数、逗号作小数点、无千分位，带货币前缀
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{} {}", CURRENCY_PREFIX, format!("{:.2}", rounded).replace('.', ","))
}

/// 生成时间格式：dd/mm/yyyy HH:MM
pub fn format_generated_at(generated_at: NaiveDateTime) -> String {
    generated_at.format("%d/%m/%Y %H:%M").to_string()
}

/// 报表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: String,
    pub description: String,
    pub price: String,
    pub quantity: String,
}

impl From<&Product> for ReportRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            description: product.description.clone(),
            price: format_price(product.price),
            quantity: product.quantity.to_string(),
        }
    }
}

/// 一次快照生成的报表数据
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReport {
    pub rows: Vec<ReportRow>,
    pub total_quantity: i64,
    pub generated_at: NaiveDateTime,
}

impl ProductReport {
    pub fn from_snapshot(products: &[Product], generated_at: NaiveDateTime) -> Self {
        Self {
            rows: products.iter().map(ReportRow::from).collect(),
            total_quantity: products.iter().map(|p| i64::from(p.quantity)).sum(),
            generated_at,
        }
    }

    /// 组装文档：标题栏、分隔线、商品表格（表头、明细、合计）
    pub fn to_document(&self) -> DocumentDefinition {
        let mut doc = DocumentDefinition::new(Style::sized(12.0))
            .with_style(STYLE_HEADER, Style::sized(18.0).bold())
            .with_style(STYLE_COLUMNS_TITLE, Style::sized(16.0).bold())
            .with_style(STYLE_TABLE_FOOTER, Style::sized(12.0).bold());

        doc.push(Block::Columns(vec![
            Text::new(REPORT_TITLE).style(STYLE_HEADER),
            Text::new(format!(
                "Generated at {}",
                format_generated_at(self.generated_at)
            ))
            .align(Alignment::Right)
            .font_size(14.0),
        ]));
        doc.push(Block::Text(
            Text::new(DIVIDER).margin(Margin::vertical(16.0, 16.0)),
        ));
        doc.push(Block::Table(self.table()));

        doc
    }

    fn table(&self) -> Table {
        let mut body = Vec::with_capacity(self.rows.len() + 2);

        body.push(
            COLUMN_TITLES
                .iter()
                .map(|title| {
                    Cell::new(*title)
                        .style(STYLE_COLUMNS_TITLE)
                        .align(Alignment::Center)
                })
                .collect(),
        );

        body.extend(self.rows.iter().map(|row| {
            vec![
                Cell::new(row.id.as_str()),
                Cell::new(row.description.as_str()),
                Cell::new(row.price.as_str()).align(Alignment::Right),
                Cell::new(row.quantity.as_str()).align(Alignment::Right),
            ]
        }));

        body.push(vec![
            Cell::new(FOOTER_LABEL).style(STYLE_TABLE_FOOTER).col_span(3),
            Cell::placeholder(),
            Cell::placeholder(),
            Cell::new(self.total_quantity.to_string())
                .style(STYLE_TABLE_FOOTER)
                .align(Alignment::Right),
        ]);

        Table {
            widths: vec![
                ColumnWidth::Auto,
                ColumnWidth::Star,
                ColumnWidth::Auto,
                ColumnWidth::Auto,
            ],
            body,
        }
    }
}
