use engagegov_client::build_pipeline;

use super::CommandResult;
use crate::load_config_and_logging;

pub async fn run(text: &str) -> CommandResult {
    let config = match load_config_and_logging() {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(error),
    };

    let pipeline = build_pipeline(&config);
    match pipeline.process_inquiry(text).await {
        Ok(outcome) => CommandResult::success(format!(
            "{}\n\nSuggested ministry: {}",
            outcome.response, outcome.ministry
        )),
        Err(error) => CommandResult::failure(error.user_message()),
    }
}
