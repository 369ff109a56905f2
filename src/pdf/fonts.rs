//! 字体族配置与标准 Type1 字体度量

/// 一个字体族的四种变体（PostScript 名称）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamily {
    pub name: String,
    pub normal: String,
    pub bold: String,
    pub italics: String,
    pub bolditalics: String,
}

impl FontFamily {
    pub fn helvetica() -> Self {
        Self {
            name: "Helvetica".to_string(),
            normal: "Helvetica".to_string(),
            bold: "Helvetica-Bold".to_string(),
            italics: "Helvetica-Oblique".to_string(),
            bolditalics: "Helvetica-BoldOblique".to_string(),
        }
    }

    /// 按粗体/斜体选择变体
    pub fn variant(&self, bold: bool, italics: bool) -> FontVariant {
        match (bold, italics) {
            (false, false) => FontVariant::Normal,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italics,
            (true, true) => FontVariant::BoldItalics,
        }
    }

    pub fn base_font(&self, variant: FontVariant) -> &str {
        match variant {
            FontVariant::Normal => &self.normal,
            FontVariant::Bold => &self.bold,
            FontVariant::Italics => &self.italics,
            FontVariant::BoldItalics => &self.bolditalics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontVariant {
    Normal,
    Bold,
    Italics,
    BoldItalics,
}

impl FontVariant {
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Normal,
        FontVariant::Bold,
        FontVariant::Italics,
        FontVariant::BoldItalics,
    ];

    /// 页面资源中的字体名
    pub fn resource_name(self) -> &'static str {
        match self {
            FontVariant::Normal => "F1",
            FontVariant::Bold => "F2",
            FontVariant::Italics => "F3",
            FontVariant::BoldItalics => "F4",
        }
    }

    pub fn index(self) -> usize {
        match self {
            FontVariant::Normal => 0,
            FontVariant::Bold => 1,
            FontVariant::Italics => 2,
            FontVariant::BoldItalics => 3,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldItalics)
    }
}

/// 标准字体的度量数据
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    widths: &'static [u16; 95],
    /// 非 ASCII 字符的近似宽度
    fallback: u16,
    pub ascent: f32,
    pub descent: f32,
}

impl FontMetrics {
    /// 只有 Helvetica 系列的度量是内置的
    pub fn for_base_font(base_font: &str) -> Option<Self> {
        match base_font {
            "Helvetica" | "Helvetica-Oblique" => Some(Self::for_variant(FontVariant::Normal)),
            "Helvetica-Bold" | "Helvetica-BoldOblique" => Some(Self::for_variant(FontVariant::Bold)),
            _ => None,
        }
    }

    fn for_variant(variant: FontVariant) -> Self {
        let (widths, fallback) = if variant.is_bold() {
            (&HELVETICA_BOLD_WIDTHS, 611)
        } else {
            (&HELVETICA_WIDTHS, 556)
        };
        Self {
            widths,
            fallback,
            ascent: 0.718,
            descent: -0.207,
        }
    }

    pub fn char_width(&self, c: char, font_size: f32) -> f32 {
        let units = match c as u32 {
            code @ 32..=126 => self.widths[(code - 32) as usize],
            _ => self.fallback,
        };
        units as f32 * font_size / 1000.0
    }

    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|c| self.char_width(c, font_size)).sum()
    }

    pub fn line_height(&self, font_size: f32) -> f32 {
        (self.ascent - self.descent) * font_size * LINE_SPACING
    }
}

const LINE_SPACING: f32 = 1.25;

/// 把文本编码为 WinAnsi 字节，超出 Latin-1 的字符替换为 `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

// AFM 宽度，字符 32..=126
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_selection() {
        let family = FontFamily::helvetica();
        assert_eq!(family.base_font(family.variant(true, false)), "Helvetica-Bold");
        assert_eq!(
            family.base_font(family.variant(true, true)),
            "Helvetica-BoldOblique"
        );
        assert_eq!(family.base_font(family.variant(false, true)), "Helvetica-Oblique");
    }

    #[test]
    fn test_text_width() {
        let metrics = FontMetrics::for_base_font("Helvetica").unwrap();
        // "0" 宽 556 单位
        assert!((metrics.text_width("00", 10.0) - 11.12).abs() < 0.001);

        let bold = FontMetrics::for_base_font("Helvetica-Bold").unwrap();
        assert!(bold.text_width("Id", 12.0) > metrics.text_width("Id", 12.0));
    }

    #[test]
    fn test_unknown_font_has_no_metrics() {
        assert!(FontMetrics::for_base_font("Courier").is_none());
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("R$ 1,00"), b"R$ 1,00".to_vec());
        assert_eq!(encode_win_ansi("ção"), vec![0xE7, 0xE3, b'o']);
        assert_eq!(encode_win_ansi("€"), vec![b'?']);
    }
}
