use std::path::Path;

use anyhow::{bail, Context};
use engagegov_client::build_pipeline;

use super::CommandResult;
use crate::load_config_and_logging;

pub async fn run(image_path: &Path) -> CommandResult {
    match execute(image_path).await {
        Ok(output) => CommandResult::success(output),
        Err(error) => CommandResult::failure(format!("{error:#}")),
    }
}

async fn execute(image_path: &Path) -> anyhow::Result<String> {
    let mime_type = mime_for(image_path)?;
    let image = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("could not read image `{}`", image_path.display()))?;

    let config = load_config_and_logging()?;
    let pipeline = build_pipeline(&config);
    let outcome = pipeline
        .process_image(&image, mime_type)
        .await
        .map_err(|error| anyhow::anyhow!(error.user_message()))?;

    if outcome.extracted_text.trim().is_empty() {
        return Ok(format!(
            "No text could be extracted from the image.\n\nSuggested ministry: {}",
            outcome.ministry
        ));
    }

    Ok(format!(
        "Extracted Text\n--------------\n{}\n\n\
         Summary\n-------\n{}\n\n\
         Actionable Insights\n-------------------\n{}\n\n\
         Suggested ministry: {}",
        outcome.extracted_text, outcome.summary, outcome.insights, outcome.ministry
    ))
}

fn mime_for(path: &Path) -> anyhow::Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        other => bail!("unsupported image type `.{other}` (expected .png, .jpg, or .jpeg)"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::mime_for;

    #[test]
    fn known_extensions_map_to_their_mime_types() {
        assert_eq!(mime_for(Path::new("report.png")).unwrap(), "image/png");
        assert_eq!(mime_for(Path::new("report.JPG")).unwrap(), "image/jpeg");
        assert_eq!(mime_for(Path::new("report.jpeg")).unwrap(), "image/jpeg");
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        assert!(mime_for(Path::new("report.gif")).is_err());
        assert!(mime_for(Path::new("report")).is_err());
    }
}
