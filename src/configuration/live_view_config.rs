use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct LiveViewConfig {
    pub port: u16,
}
