use serde::Deserialize;

/// Identity of the remote time-series channel fixes are reported to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct IngestConfig {
    pub url: String,
    pub api_key: String,
}
