use feed_logging::feed_debug;

use crate::{RenderSurface, SurfaceResult};

/// True when the "no matching results" sentinel is mounted.
pub fn detect_no_results(surface: &dyn RenderSurface, sentinel: &str) -> SurfaceResult<bool> {
    match surface.find_one(sentinel)? {
        Some(node) => {
            feed_debug!("no-results sentinel {} found at {}", sentinel, node);
            Ok(true)
        }
        None => Ok(false),
    }
}
