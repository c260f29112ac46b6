//! Feed core: pure state machine for one paginated search session.
mod effect;
mod msg;
mod record;
mod state;
mod update;

pub use effect::Effect;
pub use msg::{AdvanceOutcome, Msg};
pub use record::{ListingRecord, ResultAggregator};
pub use state::{
    FeedOutcome, FeedState, Phase, TerminalReason, DEFAULT_MAX_PAGES, FIRST_PAGINATED_INDEX,
};
pub use update::update;
