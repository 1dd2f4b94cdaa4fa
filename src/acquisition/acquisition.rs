use crate::fix::Fix;
use crate::live_view::ViewerSlot;
use crate::nmea;
use crate::nmea::LineSource;
use crate::FixSender;

use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::time::interval_at;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;

use tracing::debug;
use tracing::info;
use tracing::warn;

/// Drives the fixed-cadence acquire/decode/dispatch cycle.
pub struct Acquisition {
    source: LineSource,
    viewers: ViewerSlot,
    ingest_tx: FixSender,
    period: Duration,
    read_timeout: Duration,
    last_fix: Option<Fix>,
}

impl Acquisition {
    pub fn new(
        source: LineSource,
        viewers: ViewerSlot,
        ingest_tx: FixSender,
        period: Duration,
        read_timeout: Duration,
    ) -> Self {
        Acquisition {
            source,
            viewers,
            ingest_tx,
            period,
            read_timeout,
            last_fix: None,
        }
    }

    /// Runs forever on the configured cadence.
    ///
    /// The first attempt happens one full period after startup. An
    /// attempt that overruns its period delays the following ticks
    /// rather than letting attempts overlap.
    pub async fn run(mut self) {
        let mut ticks = interval_at(Instant::now() + self.period, self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            self.acquire().await;
        }
    }

    /// One acquisition attempt: read a line, decode it, fan out.
    ///
    /// Every failure ends the cycle without dispatching anything;
    /// recovery is the next tick.
    pub async fn acquire(&mut self) {
        let line = match self.source.next_line(self.read_timeout).await {
            Ok(l) => l,
            Err(e) => {
                warn!("acquisition failed: {}", e);
                return;
            }
        };

        let data = match nmea::decode(&line) {
            Ok(d) => d,
            Err(e) => {
                warn!("discarded line {:?}: {}", line, e);
                return;
            }
        };

        if !data.valid {
            debug!("receiver reports the fix is not yet valid");
        }

        let fix = data.fix;

        info!(
            "fix {:.6},{:.6} at {}",
            fix.latitude,
            fix.longitude,
            data.time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "unknown time".to_string()),
        );

        self.viewers.push(fix);

        match self.ingest_tx.try_send(fix) {
            Ok(()) => (),
            Err(TrySendError::Full(_)) => warn!("ingestion backlog is full, dropped fix"),
            Err(TrySendError::Closed(_)) => warn!("ingestion relay is gone"),
        }

        self.last_fix = Some(fix);
    }

    /// Most recently dispatched fix.
    pub fn last_fix(&self) -> Option<Fix> {
        self.last_fix
    }
}
