// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Document API boundaries
// ---------------------------------------------------------------------------

/// Default API host; Lark tenants use `https://open.larksuite.com`.
pub const DEFAULT_API_BASE_URL: &str = "https://open.feishu.cn";

/// How many blocks the block-listing endpoint returns per page.
///
/// 500 is the endpoint's maximum.
pub const BLOCKS_PAGE_SIZE: usize = 500;

/// Upper bound on block-listing pages for one document.
///
/// Guards against a server that keeps returning `has_more` forever.
pub const MAX_BLOCK_PAGES: usize = 1_000;

/// The tenant token is refreshed this long before the server says it expires.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Per-request timeout for JSON calls.
pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request timeout for media downloads and board exports.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Rate limiting and retries
// ---------------------------------------------------------------------------

/// Trailing window the rate limiter counts requests in.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(1);

/// Requests per second allowed by default.
///
/// The docx endpoints allow a handful of calls per second per app; staying
/// at 3 keeps a single exporter well below that.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 3;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1_000);

pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

// ---------------------------------------------------------------------------
// Asset downloads
// ---------------------------------------------------------------------------

/// Lower bound for the CPU-derived download concurrency.
pub const MIN_DOWNLOAD_CONCURRENCY: usize = 4;

/// Upper bound for the CPU-derived download concurrency.
pub const MAX_DOWNLOAD_CONCURRENCY: usize = 16;

/// Sub-directory of the output directory that receives images and board snapshots.
pub const IMAGES_DIR: &str = "images";

/// Sub-directory of the output directory that receives file attachments.
pub const FILES_DIR: &str = "files";

// ---------------------------------------------------------------------------
// Formatting boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth when recursively rendering blocks to HTML.
///
/// Blocks nested deeper than this are marked processed and skipped, so a
/// pathological document cannot overflow the stack.
pub const BLOCK_MAX_RENDER_DEPTH: usize = 100;

/// Name of the stylesheet written next to the HTML in external mode.
pub const STYLESHEET_FILE_NAME: &str = "feishu2html.css";

/// Longest file-name stem derived from a document title.
pub const MAX_TITLE_STEM_CHARS: usize = 80;

// ---------------------------------------------------------------------------
// String capacity hints (performance, not correctness)
// ---------------------------------------------------------------------------

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
