use crate::configuration::IngestConfig;
use crate::fix::Fix;
use crate::FixReceiver;

use thiserror::Error;

use tracing::debug;
use tracing::error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("submission failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ingestion endpoint answered status {0}")]
    Status(u16),
}

/// Client for a ThingSpeak-style channel-update endpoint.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl Client {
    pub fn new(config: &IngestConfig) -> Client {
        Client {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Spawns the relay feeding fixes from the acquisition loop to
    /// the remote endpoint.
    ///
    /// Each fix is submitted from its own task so a slow submission
    /// never delays the ones behind it, and its outcome is only ever
    /// logged. The relay ends when the sending side closes.
    pub fn relay(self, mut rx: FixReceiver) {
        tokio::spawn(async move {
            while let Some(fix) = rx.recv().await {
                let client = self.clone();

                tokio::spawn(async move {
                    match client.submit(fix).await {
                        Ok(()) => debug!("submitted latitude {} to ingestion", fix.latitude),
                        Err(e) => error!("ingestion submission failed: {}", e),
                    }
                });
            }
        });
    }

    /// Reports one fix to the remote channel.
    ///
    /// The update protocol carries the channel key and the latitude
    /// field; longitude travels only on the live-view path.
    pub async fn submit(&self, fix: Fix) -> Result<(), IngestError> {
        let field1 = fix.latitude.to_string();

        let response = self
            .http
            .get(&self.url)
            .query(&[("api_key", self.api_key.as_str()), ("field1", field1.as_str())])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(IngestError::Status(status.as_u16()));
        }

        Ok(())
    }
}
