use std::time::Duration;

use feed_logging::feed_trace;

use crate::{RenderSurface, SurfaceResult};

/// How to wait for client-side rendering that the surface never signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Sleep a fixed interval and trust it was long enough.
    Fixed(Duration),
    /// Poll the number of nodes matching `selector` until two consecutive
    /// counts agree, or `max_attempts` polls were made.
    UntilStable {
        selector: String,
        interval: Duration,
        max_attempts: u32,
    },
}

impl SettlePolicy {
    pub fn fixed_millis(millis: u64) -> Self {
        SettlePolicy::Fixed(Duration::from_millis(millis))
    }

    /// Returns the number of polls made (0 for a fixed delay).
    pub fn settle(&self, surface: &dyn RenderSurface) -> SurfaceResult<u32> {
        match self {
            SettlePolicy::Fixed(delay) => {
                surface.wait(*delay);
                Ok(0)
            }
            SettlePolicy::UntilStable {
                selector,
                interval,
                max_attempts,
            } => {
                let mut previous = surface.find_all(selector)?.len();
                let mut attempts = 1;
                while attempts < *max_attempts {
                    surface.wait(*interval);
                    let count = surface.find_all(selector)?.len();
                    attempts += 1;
                    if count == previous {
                        feed_trace!("settled at {} nodes after {} polls", count, attempts);
                        break;
                    }
                    previous = count;
                }
                Ok(attempts)
            }
        }
    }
}
