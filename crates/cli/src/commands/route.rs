use engagegov_core::routing::MinistryRouter;

use super::CommandResult;

/// Offline preview of the ministry suggestion for a piece of text.
pub fn run(text: &str) -> CommandResult {
    let router = MinistryRouter::default();
    CommandResult::success(router.classify(text))
}
