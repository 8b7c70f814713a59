//! Markdown projection of the structural tree.

use crate::error::Result;
use crate::model::{Alignment, Document, Element, Page, Paragraph, Table};

use super::RenderOptions;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();
        for page in &doc.pages {
            self.render_page(&mut output, page);
        }
        Ok(output.trim().to_string())
    }

    fn render_page(&self, output: &mut String, page: &Page) {
        for element in &page.elements {
            self.render_element(output, element);
        }
    }

    fn render_element(&self, output: &mut String, element: &Element) {
        match element {
            Element::Heading { level, content } => {
                let level = (*level).min(self.options.max_heading_level).max(1);
                output.push_str(&"#".repeat(level as usize));
                output.push(' ');
                output.push_str(&self.inline(content));
                output.push_str("\n\n");
            }
            Element::Paragraph(content) => {
                if content.is_empty() {
                    return;
                }
                output.push_str(&self.inline(content));
                output.push_str("\n\n");
            }
            Element::ListItem {
                depth,
                ordinal,
                content,
            } => {
                output.push_str(&"  ".repeat(*depth as usize));
                match ordinal {
                    Some(n) => {
                        output.push_str(&n.to_string());
                        output.push_str(". ");
                    }
                    None => output.push_str("- "),
                }
                output.push_str(&self.inline(content));
                output.push('\n');
            }
            Element::BlockQuote { depth, content } => {
                output.push_str(&"> ".repeat((*depth).max(1) as usize));
                output.push_str(&self.inline(content));
                output.push_str("\n\n");
            }
            Element::Table(table) => self.render_table(output, table),
            Element::HorizontalRule => output.push_str("---\n\n"),
        }
    }

    fn render_table(&self, output: &mut String, table: &Table) {
        if table.is_empty() {
            return;
        }
        let n_cols = table.column_count();

        for (i, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in &row.cells {
                output.push(' ');
                output.push_str(&escape_cell(&cell.plain_text()));
                output.push_str(" |");
            }
            output.push('\n');

            // Separator row after the header (or the first row when the
            // table has no header, since pipe tables require one).
            if i == 0 {
                output.push('|');
                for c in 0..n_cols {
                    let alignment = table
                        .column_alignments
                        .get(c)
                        .copied()
                        .unwrap_or_default();
                    output.push_str(match alignment {
                        Alignment::Left | Alignment::Justify => " --- |",
                        Alignment::Center => " :---: |",
                        Alignment::Right => " ---: |",
                    });
                }
                output.push('\n');
            }
        }
        output.push('\n');
    }

    fn inline(&self, paragraph: &Paragraph) -> String {
        let mut out = String::new();
        for run in &paragraph.runs {
            if !self.options.emphasis || run.text.trim().is_empty() {
                out.push_str(&run.text);
                continue;
            }
            match (run.style.bold, run.style.italic) {
                (true, true) => {
                    out.push_str("***");
                    out.push_str(run.text.trim());
                    out.push_str("***");
                }
                (true, false) => {
                    out.push_str("**");
                    out.push_str(run.text.trim());
                    out.push_str("**");
                }
                (false, true) => {
                    out.push('*');
                    out.push_str(run.text.trim());
                    out.push('*');
                }
                (false, false) => out.push_str(&run.text),
            }
        }
        out
    }
}

/// Escape pipe characters and collapse line breaks inside a cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}
