use feed_core::AdvanceOutcome;
use feed_logging::{feed_debug, feed_info, feed_warn};

use crate::{RenderSurface, SettlePolicy, SurfaceError, SurfaceResult};

pub const PAGE_PLACEHOLDER: &str = "{page}";
pub const DEFAULT_PAGE_CONTROL: &str = "button[aria-label='Page {page}']";
pub const DEFAULT_PAGINATION_SETTLE_MS: u64 = 2_000;

/// Moves the feed to a given page through its page selector controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    /// Selector for the control of one page; `{page}` is replaced by the index.
    pub control_template: String,
    pub settle: SettlePolicy,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            control_template: DEFAULT_PAGE_CONTROL.to_string(),
            settle: SettlePolicy::fixed_millis(DEFAULT_PAGINATION_SETTLE_MS),
        }
    }
}

impl PaginationController {
    pub fn control_selector(&self, page: u32) -> String {
        self.control_template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// A missing control means the page does not exist in the result set.
    pub fn advance_page(
        &self,
        surface: &dyn RenderSurface,
        expected_index: u32,
    ) -> SurfaceResult<AdvanceOutcome> {
        let selector = self.control_selector(expected_index);
        let Some(control) = surface.find_one(&selector)? else {
            feed_debug!("no control for page {} ({})", expected_index, selector);
            return Ok(AdvanceOutcome::Exhausted);
        };
        match surface.click(control) {
            Ok(()) => {}
            Err(SurfaceError::Detached(node)) => {
                feed_warn!("page {} control {} unmounted before click", expected_index, node);
                return Ok(AdvanceOutcome::Exhausted);
            }
            Err(err) => return Err(err),
        }
        self.settle.settle(surface)?;
        feed_info!("advanced to page {}", expected_index);
        Ok(AdvanceOutcome::Advanced)
    }
}
