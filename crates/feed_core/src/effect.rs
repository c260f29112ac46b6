use crate::TerminalReason;

/// Work the driver must perform against the render surface, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Look for the "no matching results" sentinel.
    CheckNoResults,
    /// Scroll the result list so lazily mounted listings appear.
    LoadMore,
    /// Read every currently mounted listing.
    ExtractPage,
    /// Activate the page selector control labelled `expected_index`.
    AdvancePage { expected_index: u32 },
    /// The session reached a terminal state.
    Finished { reason: TerminalReason },
}
