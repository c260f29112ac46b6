use crate::ListingRecord;

/// Result of trying to move to the next results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Start the session on the already rendered first results page.
    Begin,
    /// Outcome of the empty-result sentinel lookup.
    NoResultsChecked { empty: bool },
    /// The scroll pass for the current page finished.
    ContentLoaded,
    /// Records read from the current page, in page order.
    PageExtracted(Vec<ListingRecord>),
    /// Outcome of the pagination attempt.
    PageAdvanced(AdvanceOutcome),
    /// The render surface stopped answering.
    ReadFailed { message: String },
}
