// src/output/plan.rs
//! Decides which files one document export writes.

use super::paths::{blocks_dump_file_name, html_file_name};
use super::types::OutputPlan;
use crate::constants::STYLESHEET_FILE_NAME;
use crate::formatting::{stylesheet, StylesheetMode};
use crate::model::DocumentInfo;
use crate::types::RenderedHtml;
use std::path::Path;

/// Plans the HTML file, the external stylesheet when requested, and the
/// optional block dump, all inside `output_dir`.
pub fn plan_document_output(
    output_dir: &Path,
    document: &DocumentInfo,
    html: RenderedHtml,
    mode: StylesheetMode,
    blocks_dump: Option<String>,
) -> OutputPlan {
    let title = document.display_title();
    let id = document.document_id.as_str();

    let mut plan =
        OutputPlan::new().with_file(output_dir.join(html_file_name(title, id)), html.into_string());

    if mode == StylesheetMode::External {
        plan = plan.with_file(output_dir.join(STYLESHEET_FILE_NAME), stylesheet());
    }

    if let Some(json) = blocks_dump {
        plan = plan.with_file(output_dir.join(blocks_dump_file_name(title, id)), json);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentId;
    use std::path::PathBuf;

    fn info() -> DocumentInfo {
        DocumentInfo {
            document_id: DocumentId::parse("doxAbc").unwrap(),
            title: "Plan".to_string(),
            revision_id: 3,
        }
    }

    fn written(plan: &OutputPlan) -> Vec<PathBuf> {
        plan.files.iter().map(|file| file.path.clone()).collect()
    }

    #[test]
    fn test_inline_plan_writes_only_html() {
        let out = Path::new("/out");
        let plan = plan_document_output(
            out,
            &info(),
            RenderedHtml::new("<html></html>".to_string()),
            StylesheetMode::Inline,
            None,
        );
        assert_eq!(written(&plan), vec![out.join("Plan_doxAbc.html")]);
        assert_eq!(plan.html_path(), Some(&out.join("Plan_doxAbc.html")));
    }

    #[test]
    fn test_external_plan_with_dump() {
        let out = Path::new("/out");
        let plan = plan_document_output(
            out,
            &info(),
            RenderedHtml::new(String::new()),
            StylesheetMode::External,
            Some("{}".to_string()),
        );
        assert_eq!(
            written(&plan),
            vec![
                out.join("Plan_doxAbc.html"),
                out.join("feishu2html.css"),
                out.join("Plan_doxAbc.blocks.json"),
            ]
        );
    }
}
