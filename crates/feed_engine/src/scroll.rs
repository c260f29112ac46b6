use feed_logging::feed_trace;

use crate::{NodeHandle, RenderSurface, SettlePolicy, SurfaceResult};

pub const DEFAULT_SCROLL_STEPS: u32 = 6;
pub const DEFAULT_SCROLL_DY: i64 = 300;
pub const DEFAULT_SCROLL_SETTLE_MS: u64 = 1_000;

/// Forces a virtualized list to mount more listings by scrolling from an anchor.
///
/// The gesture count is fixed; whether new content actually mounted is left to
/// the settle policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollLoader {
    pub steps: u32,
    pub dx: i64,
    pub dy: i64,
    pub settle: SettlePolicy,
}

impl Default for ScrollLoader {
    fn default() -> Self {
        Self {
            steps: DEFAULT_SCROLL_STEPS,
            dx: 0,
            dy: DEFAULT_SCROLL_DY,
            settle: SettlePolicy::fixed_millis(DEFAULT_SCROLL_SETTLE_MS),
        }
    }
}

impl ScrollLoader {
    pub fn load_more(&self, surface: &dyn RenderSurface, anchor: NodeHandle) -> SurfaceResult<()> {
        for step in 1..=self.steps {
            surface.scroll_from_anchor(anchor, self.dx, self.dy)?;
            self.settle.settle(surface)?;
            feed_trace!("scroll step {}/{} from {}", step, self.steps, anchor);
        }
        Ok(())
    }
}
