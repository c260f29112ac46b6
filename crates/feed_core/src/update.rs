use crate::{AdvanceOutcome, Effect, FeedState, Msg, Phase, TerminalReason};

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the state is `Done` every message is a no-op.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Done, _) => Vec::new(),
        (_, Msg::ReadFailed { message }) => {
            state.fail(message);
            finished(TerminalReason::ReadFailure)
        }
        (Phase::Start, Msg::Begin) => vec![Effect::CheckNoResults],
        (Phase::Start, Msg::NoResultsChecked { empty: true }) => {
            state.finish(TerminalReason::NoResults);
            finished(TerminalReason::NoResults)
        }
        (Phase::Start, Msg::NoResultsChecked { empty: false }) => {
            state.start_scanning();
            vec![Effect::LoadMore]
        }
        (Phase::Scanning, Msg::ContentLoaded) => vec![Effect::ExtractPage],
        (Phase::Scanning, Msg::PageExtracted(batch)) => {
            state.record_page(batch);
            if state.cap_reached() {
                state.finish(TerminalReason::CapReached);
                finished(TerminalReason::CapReached)
            } else {
                vec![Effect::AdvancePage {
                    expected_index: state.current_page_index(),
                }]
            }
        }
        (Phase::Scanning, Msg::PageAdvanced(AdvanceOutcome::Advanced)) => {
            state.advance_page_index();
            vec![Effect::LoadMore]
        }
        (Phase::Scanning, Msg::PageAdvanced(AdvanceOutcome::Exhausted)) => {
            state.finish(TerminalReason::Exhausted);
            finished(TerminalReason::Exhausted)
        }
        // Out-of-phase messages are dropped.
        (Phase::Start, _) | (Phase::Scanning, _) => Vec::new(),
    };

    (state, effects)
}

fn finished(reason: TerminalReason) -> Vec<Effect> {
    vec![Effect::Finished { reason }]
}
