//! Wire model for the flow-execution response envelope.
//!
//! The remote returns `{ outputs: [ { outputs: [ { results: { message:
//! { text } } } ] } ] }`. Every level is optional on the wire: a leaf with
//! missing keys flattens to an empty string rather than failing the decode.

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowEnvelope {
    #[serde(default)]
    pub outputs: Vec<FlowRun>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowRun {
    #[serde(default)]
    pub outputs: Vec<FlowOutput>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowOutput {
    #[serde(default)]
    pub results: FlowResults,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowResults {
    #[serde(default)]
    pub message: FlowMessage,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowMessage {
    #[serde(default)]
    pub text: String,
}

impl FlowEnvelope {
    /// Flattens all leaf texts in declaration order. A present output whose
    /// nested keys are missing contributes `""`; a missing top-level
    /// `outputs` yields an empty list.
    pub fn flatten(&self) -> Vec<String> {
        self.outputs
            .iter()
            .flat_map(|run| run.outputs.iter())
            .map(|output| output.results.message.text.clone())
            .collect()
    }

    /// Joins flattened leaves as the bullet list shown to the reporter.
    pub fn joined(&self, separator: &str) -> String {
        self.flatten()
            .iter()
            .map(|text| format!("- {text}"))
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.iter().all(|run| run.outputs.is_empty())
    }
}
