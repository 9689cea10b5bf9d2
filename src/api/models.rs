use serde::Deserialize;

use crate::controller::SummarizeRequest;

/// Fields posted by the form or the JSON endpoint. Missing fields count as blank.
#[derive(Deserialize)]
pub struct SummarizeInput {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub url: String,
}

impl From<SummarizeInput> for SummarizeRequest {
    fn from(input: SummarizeInput) -> Self {
        SummarizeRequest::new(input.api_key, input.url)
    }
}
