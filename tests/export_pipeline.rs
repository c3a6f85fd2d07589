//! Full exports against an in-memory document repository.

use async_trait::async_trait;
use feishu2html::model::{
    Align, Block, BlockCommon, BoardBlock, FileBlock, ImageBlock, PageBlock, TextBlock,
    TextBlockContent, TextElement,
};
use feishu2html::{
    AppError, AssetCoordinator, BlockId, DocumentContent, DocumentExporter, DocumentId,
    DocumentInfo, DocumentRepository, ExportConfig, RateLimiter, StylesheetMode,
};
use indexmap::IndexMap;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct MemoryRepository {
    documents: HashMap<String, DocumentContent>,
    /// Number of content fetches to fail with a transient error first
    flaky_fetches: AtomicUsize,
    failing_tokens: Vec<String>,
    fetches: AtomicUsize,
    downloads: Mutex<Vec<String>>,
}

impl MemoryRepository {
    fn with_document(mut self, content: DocumentContent) -> Self {
        self.documents
            .insert(content.document.document_id.as_str().to_string(), content);
        self
    }

    fn download_count(&self) -> usize {
        self.downloads.lock().len()
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    async fn get_document_info(&self, id: &DocumentId) -> Result<DocumentInfo, AppError> {
        self.documents
            .get(id.as_str())
            .map(|c| c.document.clone())
            .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    async fn get_document_raw_content(&self, id: &DocumentId) -> Result<DocumentContent, AppError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let remaining = self.flaky_fetches.load(Ordering::SeqCst);
        if remaining > 0 {
            self.flaky_fetches.store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::NetworkFailure("connection reset".to_string()));
        }
        self.documents
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| AppError::DocumentNotFound(id.to_string()))
    }

    async fn download_file(&self, token: &str, dest: &Path) -> Result<(), AppError> {
        self.write_asset(token, dest).await
    }

    async fn export_board(&self, token: &str, dest: &Path) -> Result<(), AppError> {
        self.write_asset(token, dest).await
    }
}

impl MemoryRepository {
    async fn write_asset(&self, token: &str, dest: &Path) -> Result<(), AppError> {
        self.downloads.lock().push(token.to_string());
        if self.failing_tokens.iter().any(|t| t == token) {
            return Err(AppError::Api {
                code: 1061004,
                status: 403,
                message: format!("no access to {}", token),
            });
        }
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, token.as_bytes()).await?;
        Ok(())
    }
}

fn id(s: &str) -> BlockId {
    BlockId::parse(s).unwrap()
}

fn common(block_id: &str, parent: &str) -> BlockCommon {
    BlockCommon::new(id(block_id)).with_parent(id(parent))
}

/// A document with a paragraph, an image, a board and an attachment.
fn document(doc_id: &str, title: &str) -> DocumentContent {
    let children = vec![id("intro"), id("pic"), id("sketch"), id("attachment")];
    let blocks = vec![
        Block::Page(PageBlock {
            common: BlockCommon::new(id(doc_id)).with_children(children),
            content: TextBlockContent::new(vec![TextElement::text(title)]),
        }),
        Block::Text(TextBlock {
            common: common("intro", doc_id),
            content: TextBlockContent::new(vec![TextElement::text("Hello & welcome")]),
        }),
        Block::Image(ImageBlock {
            common: common("pic", doc_id),
            token: "boxImage1".to_string(),
            width: Some(100),
            height: None,
            align: Align::Center,
        }),
        Block::Board(BoardBlock {
            common: common("sketch", doc_id),
            token: "boardSketch".to_string(),
            width: None,
            height: None,
            align: Align::Left,
        }),
        Block::File(FileBlock {
            common: common("attachment", doc_id),
            token: "boxFile1".to_string(),
            name: "spec.pdf".to_string(),
        }),
    ];

    DocumentContent {
        document: DocumentInfo {
            document_id: DocumentId::parse(doc_id).unwrap(),
            title: title.to_string(),
            revision_id: 7,
        },
        blocks: blocks.into_iter().map(|b| (b.id().clone(), b)).collect(),
    }
}

fn config(output_dir: &Path) -> ExportConfig {
    ExportConfig {
        output_dir: output_dir.to_path_buf(),
        initial_backoff: Duration::from_millis(10),
        concurrency: Some(2),
        ..ExportConfig::default()
    }
}

fn limiter() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(50).unwrap())
}

fn exporter(repository: Arc<MemoryRepository>, config: &ExportConfig) -> DocumentExporter {
    DocumentExporter::new(repository, limiter(), config)
}

#[tokio::test]
async fn test_export_writes_html_and_assets() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(MemoryRepository::default().with_document(document("doxA", "Launch Plan")));
    let config = config(dir.path());

    let outcome = exporter(Arc::clone(&repository), &config)
        .export_document(&DocumentId::parse("doxA").unwrap())
        .await
        .unwrap();

    let html_path = outcome.html_path.clone().unwrap();
    assert_eq!(html_path, dir.path().join("Launch Plan_doxA.html"));
    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Launch Plan</title>"));
    assert!(html.contains("<p>Hello &amp; welcome</p>"));
    assert!(html.contains("src=\"images/boxImage1.png\""));
    assert!(html.contains("src=\"images/boardSketch.png\""));
    assert!(html.contains("href=\"files/spec.pdf\""));
    assert!(html.contains("<style>"));

    assert_eq!(outcome.assets.images.downloaded, 2);
    assert_eq!(outcome.assets.files.downloaded, 1);
    assert_eq!(repository.download_count(), 3);
    assert!(dir.path().join("images").join("boxImage1.png").exists());
    assert!(dir.path().join("images").join("boardSketch.png").exists());
    assert!(dir.path().join("files").join("spec.pdf").exists());
}

#[tokio::test]
async fn test_existing_image_is_not_downloaded_again() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("images")).unwrap();
    std::fs::write(dir.path().join("images").join("boxImage1.png"), b"cached").unwrap();

    let repository = Arc::new(MemoryRepository::default());
    let coordinator = AssetCoordinator::new(
        Arc::clone(&repository) as Arc<dyn DocumentRepository>,
        limiter(),
        dir.path(),
        None,
    );
    let blocks = vec![Block::Image(ImageBlock {
        common: BlockCommon::new(id("pic")),
        token: "boxImage1".to_string(),
        width: None,
        height: None,
        align: Align::Left,
    })];

    let report = coordinator.download_assets(&blocks).await;

    assert_eq!(repository.download_count(), 0);
    assert_eq!(report.images.skipped, 1);
    assert_eq!(report.downloaded(), 0);
    assert_eq!(
        std::fs::read(dir.path().join("images").join("boxImage1.png")).unwrap(),
        b"cached"
    );
}

#[tokio::test]
async fn test_failed_asset_does_not_abort_export() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(MemoryRepository {
        failing_tokens: vec!["boardSketch".to_string()],
        ..MemoryRepository::default().with_document(document("doxA", "Plan"))
    });

    let outcome = exporter(Arc::clone(&repository), &config(dir.path()))
        .export_document(&DocumentId::parse("doxA").unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.assets.failed(), 1);
    assert_eq!(outcome.assets.downloaded(), 2);
    assert!(outcome.html_path.unwrap().exists());
}

#[tokio::test]
async fn test_attachments_sharing_a_name_are_kept_apart() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = document("doxA", "Plan");
    content.blocks.insert(
        id("attachment2"),
        Block::File(FileBlock {
            common: common("attachment2", "doxA"),
            token: "boxFile2".to_string(),
            name: "spec.pdf".to_string(),
        }),
    );
    if let Some(Block::Page(page)) = content.blocks.get_mut(&id("doxA")) {
        page.common.children.push(id("attachment2"));
    }
    let repository = Arc::new(MemoryRepository::default().with_document(content));

    let outcome = exporter(Arc::clone(&repository), &config(dir.path()))
        .export_document(&DocumentId::parse("doxA").unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.assets.files.downloaded, 2);
    let html = std::fs::read_to_string(outcome.html_path.unwrap()).unwrap();
    assert!(html.contains("href=\"files/spec.pdf\""));
    assert!(html.contains("href=\"files/boxFile2_spec.pdf\""));
    let files = dir.path().join("files");
    assert_eq!(std::fs::read(files.join("spec.pdf")).unwrap(), b"boxFile1");
    assert_eq!(std::fs::read(files.join("boxFile2_spec.pdf")).unwrap(), b"boxFile2");
}

#[tokio::test]
async fn test_transient_fetch_failure_is_retried() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(MemoryRepository {
        flaky_fetches: AtomicUsize::new(2),
        ..MemoryRepository::default().with_document(document("doxA", "Plan"))
    });

    let result = exporter(Arc::clone(&repository), &config(dir.path()))
        .export_document(&DocumentId::parse("doxA").unwrap())
        .await;

    assert!(result.is_ok());
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_batch_continues_past_failed_document() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(MemoryRepository::default().with_document(document("doxB", "Second")));
    let ids = vec![
        DocumentId::parse("doxMissing").unwrap(),
        DocumentId::parse("doxB").unwrap(),
    ];

    let err = exporter(Arc::clone(&repository), &config(dir.path()))
        .export_batch(&ids)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BatchIncomplete { failed: 1, total: 2 }));
    // Not found is not retried.
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 2);
    assert!(dir.path().join("Second_doxB.html").exists());
}

#[tokio::test]
async fn test_external_stylesheet_and_block_dump() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(MemoryRepository::default().with_document(document("doxA", "")));
    let config = ExportConfig {
        stylesheet: StylesheetMode::External,
        dump_blocks: true,
        ..config(dir.path())
    };

    let outcome = exporter(repository, &config)
        .export_document(&DocumentId::parse("doxA").unwrap())
        .await
        .unwrap();

    let html_path: PathBuf = outcome.html_path.unwrap();
    assert_eq!(html_path, dir.path().join("Untitled_doxA.html"));
    let html = std::fs::read_to_string(html_path).unwrap();
    assert!(html.contains("<link rel=\"stylesheet\" href=\"feishu2html.css\">"));
    assert!(!html.contains("<style>"));
    assert!(dir.path().join("feishu2html.css").exists());

    let dump = std::fs::read_to_string(dir.path().join("Untitled_doxA.blocks.json")).unwrap();
    let parsed: IndexMap<String, serde_json::Value> = serde_json::from_str(&dump).unwrap();
    assert_eq!(parsed.len(), 5);
    assert!(parsed.contains_key("pic"));
}
