//! Feed engine: render surfaces and the effect executor for the feed core.
mod chrome;
mod detect;
mod export;
mod extract;
mod feed;
mod filename;
mod links;
mod paginate;
mod progress;
mod scroll;
mod settings;
mod settle;
mod snapshot;
mod surface;

pub use chrome::ChromeSurface;
pub use detect::detect_no_results;
pub use export::{export_records, ExportError, ExportSummary};
pub use extract::{normalize_text, PageExtractor, PartialBatch};
pub use feed::FeedScraper;
pub use filename::export_filename;
pub use links::canonicalize_link;
pub use paginate::{PaginationController, DEFAULT_PAGE_CONTROL, PAGE_PLACEHOLDER};
pub use progress::{NullProgressSink, ProgressSink, ScrapeEvent};
pub use scroll::{ScrollLoader, DEFAULT_SCROLL_DY, DEFAULT_SCROLL_STEPS};
pub use settings::{ExtractionMode, FeedSelectors, ScrapeSettings};
pub use settle::SettlePolicy;
pub use snapshot::SnapshotSurface;
pub use surface::{NodeHandle, RenderSurface, SurfaceError, SurfaceResult};
