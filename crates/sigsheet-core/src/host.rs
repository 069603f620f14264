//! Terminal host adapters
//!
//! [`TerminalPresenter`] prints the grid as text. [`HtmlExporter`] writes a
//! standalone HTML page of the grid with the signatures inlined, to be
//! opened or rasterized by a browser.

use crate::adapters::{ExportAdapter, ExportArtifact, ExportRequest, PresentationAdapter};
use crate::error::ExportError;
use sigsheet_roster::RenderModel;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Prints the grid to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    /// Text rendering of `model`
    #[must_use]
    pub fn render_to_string(model: &RenderModel) -> String {
        let width = model
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for row in &model.rows {
            let cell = match row.image.as_deref() {
                Some(image) => format!("signed ({} bytes)", image.len()),
                None => "-".to_string(),
            };
            let _ = writeln!(out, "{:>3}  {:<width$}  {cell}", row.index.get() + 1, row.label);
        }
        let _ = writeln!(out, "{}/{} signed", model.status.signed, model.status.total);
        if let Some(banner) = model.banner() {
            let _ = writeln!(out, "{banner}");
        }
        out
    }
}

impl PresentationAdapter for TerminalPresenter {
    fn render(&self, model: &RenderModel) {
        print!("{}", Self::render_to_string(model));
    }
}

/// Writes the grid as an HTML page into a directory
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    out_dir: PathBuf,
}

impl HtmlExporter {
    /// Exporter writing into `out_dir`, which must exist
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output directory
    #[must_use]
    pub fn out_dir(&self) -> &std::path::Path {
        &self.out_dir
    }

    /// HTML page for `model`
    #[must_use]
    pub fn render_page(model: &RenderModel, request: &ExportRequest) -> String {
        let mut page = String::new();
        let _ = write!(
            page,
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n\
             <body style=\"background:{};zoom:{}\">\n<table border=\"1\">\n\
             <tr><th>No</th><th>Name</th><th>Signature</th></tr>\n",
            escape(&request.file_name),
            escape(&request.background),
            request.scale,
        );
        for row in &model.rows {
            let cell = row
                .image
                .as_deref()
                .map(|src| format!("<img src=\"{}\" width=\"100\">", escape(src)))
                .unwrap_or_default();
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{cell}</td></tr>",
                row.index.get() + 1,
                escape(&row.label),
            );
        }
        page.push_str("</table>\n");
        if let Some(banner) = model.banner() {
            let _ = writeln!(page, "<p>{}</p>", escape(banner));
        }
        page.push_str("</body>\n</html>\n");
        page
    }
}

impl ExportAdapter for HtmlExporter {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn export(&self, model: &RenderModel, request: &ExportRequest) -> Result<ExportArtifact, ExportError> {
        let page = Self::render_page(model, request);
        let path = self.out_dir.join(&request.file_name);
        std::fs::write(&path, &page).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "html export written");
        Ok(ExportArtifact {
            file_name: request.file_name.clone(),
            location: Some(path),
            bytes: page.len(),
        })
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigsheet_roster::{ImageData, MemoryStorage, NameList, RosterStore, SlotIndex};
    use std::sync::Arc;

    fn model(signed: &[usize]) -> RenderModel {
        let names = NameList::new(["Ahsan", "Nasa"]).unwrap();
        let mut store = RosterStore::new(Arc::new(MemoryStorage::new()), "k", names.len());
        for &i in signed {
            store
                .set_signature(SlotIndex::new(i), ImageData::new("data:image/png;base64,AA==").unwrap())
                .unwrap();
        }
        RenderModel::build(store.roster(), &names)
    }

    #[test]
    fn terminal_lists_every_row() {
        let text = TerminalPresenter::render_to_string(&model(&[0]));
        assert!(text.contains("Ahsan"));
        assert!(text.contains("Nasa"));
        assert!(text.contains("1/2 signed"));
        assert!(!text.contains("All signatures collected!"));
    }

    #[test]
    fn terminal_shows_banner_when_complete() {
        let text = TerminalPresenter::render_to_string(&model(&[0, 1]));
        assert!(text.ends_with("All signatures collected!\n"));
    }

    #[test]
    fn html_escapes_text() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn html_page_inlines_images() {
        let request = ExportRequest {
            file_name: "t.html".to_string(),
            scale: 2,
            background: "#ffffff".to_string(),
        };
        let page = HtmlExporter::render_page(&model(&[1]), &request);
        assert!(page.contains("background:#ffffff"));
        assert!(page.contains("zoom:2"));
        assert_eq!(page.matches("<img ").count(), 1);
    }
}
