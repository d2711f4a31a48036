use crate::core::pdf::{render_pdf, FontLocator, PdfLayout};
use crate::domain::model::{OutputFormat, PlanDocument, RenderedDocument};
use crate::utils::error::{PlanError, Result};

pub const DEFAULT_TITLE_SUFFIX: &str = "DiaPlate Meal Plan";

impl PlanDocument {
    pub fn new(name: &str, plan_text: &str) -> Self {
        Self::with_title_suffix(name, plan_text, DEFAULT_TITLE_SUFFIX)
    }

    pub fn with_title_suffix(name: &str, plan_text: &str, suffix: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            title: format!("{}'s {}", name, suffix),
            name,
            plan_text: plan_text.to_string(),
            // `\r\n` 視為單一換行
            body_lines: plan_text
                .split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect(),
        }
    }

    /// Title line plus one line per newline-delimited plan line.
    pub fn line_count(&self) -> usize {
        self.body_lines.len() + 1
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.title.as_str()).chain(self.body_lines.iter().map(String::as_str))
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::with_capacity(self.title.len() + self.plan_text.len() + 2);
        out.push_str(&self.title);
        out.push_str("\n\n");
        out.push_str(&self.body_lines.join("\n"));
        out
    }

    pub fn file_name(&self, format: OutputFormat) -> String {
        format!(
            "{}_DiaPlate_Meal_Plan.{}",
            sanitize_file_stem(&self.name),
            format.extension()
        )
    }
}

/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.chars().all(|c| c == '_') {
        "plan".to_string()
    } else {
        stem
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    layout: PdfLayout,
    fonts: FontLocator,
}

impl DocumentRenderer {
    pub fn new(layout: PdfLayout, fonts: FontLocator) -> Self {
        Self { layout, fonts }
    }

    pub fn render(&self, document: &PlanDocument, format: OutputFormat) -> Result<RenderedDocument> {
        if document.name.is_empty() {
            return Err(PlanError::MissingName);
        }

        let bytes = match format {
            // 字型只在輸出 PDF 時載入
            OutputFormat::Pdf => render_pdf(document, &self.layout, self.fonts.load()?)?,
            OutputFormat::Txt => document.to_plain_text().into_bytes(),
        };

        if bytes.is_empty() {
            return Err(PlanError::RenderError {
                message: format!("{:?} renderer produced no output", format),
            });
        }

        Ok(RenderedDocument {
            bytes,
            mime: format.mime(),
            file_name: document.file_name(format),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_is_plan_lines_plus_title() {
        for plan in ["", "one", "one\ntwo", "a\n\nb\n", "windows\r\nline"] {
            let document = PlanDocument::new("Ali", plan);
            assert_eq!(document.line_count(), plan.split('\n').count() + 1, "plan {:?}", plan);
            assert_eq!(document.lines().count(), document.line_count());
        }
    }

    #[test]
    fn test_title_and_file_name() {
        let document = PlanDocument::new(" Ana María ", "Eat well");
        assert_eq!(document.title, "Ana María's DiaPlate Meal Plan");
        assert_eq!(
            document.file_name(OutputFormat::Pdf),
            "Ana_Mar_a_DiaPlate_Meal_Plan.pdf"
        );
        assert_eq!(sanitize_file_stem("../../"), "plan");
    }

    #[test]
    fn test_plain_text_rendering() {
        let document = PlanDocument::new("Ali", "Breakfast\nLunch");
        let rendered = DocumentRenderer::default()
            .render(&document, OutputFormat::Txt)
            .unwrap();
        assert_eq!(
            String::from_utf8(rendered.bytes).unwrap(),
            "Ali's DiaPlate Meal Plan\n\nBreakfast\nLunch"
        );
        assert_eq!(rendered.mime, "text/plain; charset=utf-8");
        assert_eq!(rendered.file_name, "Ali_DiaPlate_Meal_Plan.txt");
    }

    #[test]
    fn test_pdf_rendering_header() {
        let document = PlanDocument::new("Ali", "Breakfast\nLunch");
        let rendered = DocumentRenderer::default()
            .render(&document, OutputFormat::Pdf)
            .unwrap();
        assert!(rendered.bytes.starts_with(b"%PDF-"));
        assert_eq!(rendered.mime, "application/pdf");
    }

    #[test]
    fn test_missing_fonts_only_affect_pdf() {
        let empty = tempfile::TempDir::new().unwrap();
        let renderer = DocumentRenderer::new(PdfLayout::default(), FontLocator::new([empty.path()]));
        let document = PlanDocument::new("Ali", "Breakfast");

        assert!(matches!(
            renderer.render(&document, OutputFormat::Pdf),
            Err(PlanError::RenderError { .. })
        ));
        assert!(renderer.render(&document, OutputFormat::Txt).is_ok());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let document = PlanDocument::new("  ", "text");
        assert!(matches!(
            DocumentRenderer::default().render(&document, OutputFormat::Pdf),
            Err(PlanError::MissingName)
        ));
    }
}
