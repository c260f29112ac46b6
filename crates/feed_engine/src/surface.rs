use std::fmt;
use std::time::Duration;

/// Frame-local reference to a mounted DOM node.
///
/// A handle is only meaningful for the render frame it was resolved in. Any
/// scroll, click or navigation may unmount the node, after which reads fail
/// with [`SurfaceError::Detached`]. Components re-resolve handles on every
/// call instead of keeping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The browser session is gone. Fatal for the scraping loop.
    #[error("render surface unavailable: {0}")]
    Unavailable(String),
    /// The node was unmounted between lookup and read.
    #[error("node {0} is no longer attached")]
    Detached(NodeHandle),
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

impl SurfaceError {
    /// Everything except a stale node ends the session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SurfaceError::Detached(_))
    }
}

pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// A live, scriptable view of a dynamically updating results page.
///
/// Calls are blocking request/response pairs; there is never more than one
/// in flight. Lookups that match nothing return `None` or an empty `Vec`.
pub trait RenderSurface {
    fn find_one(&self, selector: &str) -> SurfaceResult<Option<NodeHandle>>;

    fn find_all(&self, selector: &str) -> SurfaceResult<Vec<NodeHandle>>;

    /// First descendant of `scope` matching `selector`.
    fn find_within(&self, scope: NodeHandle, selector: &str) -> SurfaceResult<Option<NodeHandle>>;

    fn text(&self, node: NodeHandle) -> SurfaceResult<String>;

    fn attribute(&self, node: NodeHandle, name: &str) -> SurfaceResult<Option<String>>;

    fn click(&self, node: NodeHandle) -> SurfaceResult<()>;

    fn scroll_from_anchor(&self, anchor: NodeHandle, dx: i64, dy: i64) -> SurfaceResult<()>;

    fn wait(&self, duration: Duration);

    /// URL of the document currently rendered, used to resolve relative links.
    fn current_url(&self) -> Option<String> {
        None
    }
}
