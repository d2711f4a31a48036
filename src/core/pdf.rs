//! PDF layout on top of `genpdf`.
//!
//! genpdf wraps paragraphs and breaks pages. Text is drawn with the built-in
//! Helvetica family; a TrueType file from the system only supplies glyph
//! metrics for the line breaker.

use crate::domain::model::PlanDocument;
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::is_win_ansi_char;
use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use genpdf::{Alignment, PaperSize, SimplePageDecorator};
use printpdf::BuiltinFont;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// 常見的系統字型目錄
pub const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];

// regular, bold, italic, bold italic
const FONT_FILE_SETS: &[[&str; 4]] = &[
    [
        "LiberationSans-Regular.ttf",
        "LiberationSans-Bold.ttf",
        "LiberationSans-Italic.ttf",
        "LiberationSans-BoldItalic.ttf",
    ],
    [
        "DejaVuSans.ttf",
        "DejaVuSans-Bold.ttf",
        "DejaVuSans-Oblique.ttf",
        "DejaVuSans-BoldOblique.ttf",
    ],
    [
        "Arial.ttf",
        "Arial Bold.ttf",
        "Arial Italic.ttf",
        "Arial Bold Italic.ttf",
    ],
];

/// Finds a sans-serif TrueType family to measure text with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLocator {
    dirs: Vec<PathBuf>,
}

impl Default for FontLocator {
    fn default() -> Self {
        Self::new(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
    }
}

impl FontLocator {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// 設定檔指定的目錄優先於系統目錄
    pub fn with_preferred_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(0, dir.into());
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First directory holding a complete family, as regular/bold/italic/bold-italic paths.
    pub fn locate(&self) -> Option<[PathBuf; 4]> {
        self.dirs.iter().find_map(|dir| {
            FONT_FILE_SETS.iter().find_map(|set| {
                let paths = (*set).map(|file| dir.join(file));
                paths.iter().all(|path| path.is_file()).then_some(paths)
            })
        })
    }

    pub fn load(&self) -> Result<FontFamily<FontData>> {
        let [regular, bold, italic, bold_italic] =
            self.locate().ok_or_else(|| PlanError::RenderError {
                message: format!(
                    "no TrueType font family found in {}",
                    self.dirs
                        .iter()
                        .map(|dir| dir.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?;
        tracing::debug!("Using font metrics from {}", regular.display());

        Ok(FontFamily {
            regular: load_font(&regular, BuiltinFont::Helvetica)?,
            bold: load_font(&bold, BuiltinFont::HelveticaBold)?,
            italic: load_font(&italic, BuiltinFont::HelveticaOblique)?,
            bold_italic: load_font(&bold_italic, BuiltinFont::HelveticaBoldOblique)?,
        })
    }
}

fn load_font(path: &Path, builtin: BuiltinFont) -> Result<FontData> {
    FontData::load(path, Some(builtin)).map_err(|e| PlanError::RenderError {
        message: format!("failed to load font {}: {}", path.display(), e),
    })
}

/// Margins in millimetres, font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfLayout {
    pub margin_mm: f64,
    pub bottom_margin_mm: f64,
    pub title_font_size: u8,
    pub body_font_size: u8,
    pub line_spacing: f64,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            margin_mm: 10.0,
            bottom_margin_mm: 20.0,
            title_font_size: 16,
            body_font_size: 12,
            line_spacing: 1.25,
        }
    }
}

/// 內建字型只能輸出 WinAnsi，其餘字元換成 `?`
pub fn to_win_ansi(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_win_ansi_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| match c {
                '\t' => ' ',
                c if is_win_ansi_char(c) => c,
                _ => '?',
            })
            .collect(),
    )
}

pub fn render_pdf(
    document: &PlanDocument,
    layout: &PdfLayout,
    fonts: FontFamily<FontData>,
) -> Result<Vec<u8>> {
    let title = to_win_ansi(&document.title).into_owned();

    let mut doc = genpdf::Document::new(fonts);
    doc.set_title(title.clone());
    doc.set_minimal_conformance();
    doc.set_paper_size(PaperSize::A4);
    doc.set_font_size(layout.body_font_size);
    doc.set_line_spacing(layout.line_spacing);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins((
        layout.margin_mm,
        layout.margin_mm,
        layout.bottom_margin_mm,
        layout.margin_mm,
    ));
    doc.set_page_decorator(decorator);

    let title_style = Style::new().bold().with_font_size(layout.title_font_size);
    doc.push(Paragraph::new(StyledString::new(title, title_style)).aligned(Alignment::Center));
    doc.push(Break::new(1.0));

    for line in &document.body_lines {
        let line = to_win_ansi(line);
        // 空白行仍佔一行
        if line.trim().is_empty() {
            doc.push(Break::new(1.0));
        } else {
            doc.push(Paragraph::new(line.into_owned()));
        }
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes).map_err(|e| PlanError::RenderError {
        message: format!("PDF layout failed: {}", e),
    })?;
    Ok(bytes)
}
