use crate::configuration::DeviceConfig;
use crate::nmea::LineCodec;
use crate::LineReceiver;
use crate::LineSender;

use anyhow::Context;
use anyhow::Result;

use backoff::ExponentialBackoff;
use backoff::SystemClock;

use futures_util::StreamExt;

use std::convert::TryFrom;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

use tokio::sync::mpsc;
use tokio::time::timeout;

use tokio_serial::SerialPortBuilder;
use tokio_serial::SerialPortBuilderExt;
use tokio_serial::SerialStream;

use tokio_util::codec::FramedRead;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;

/// Opens the receiver's serial port and feeds its lines to a single
/// consumer.
///
/// The port is opened with retries and reopened whenever it hangs up,
/// so a flaky receiver never takes the acquisition cadence down with
/// it.
pub struct DeviceBuilder {
    device: String,
    backoff: ExponentialBackoff,
    serial_port_builder: SerialPortBuilder,
}

impl DeviceBuilder {
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let device = config.path.clone();
        let serial_port_builder = SerialPortBuilder::try_from(config.clone())?;

        Ok(DeviceBuilder {
            device,
            backoff: default_backoff(),
            serial_port_builder,
        })
    }

    pub fn build(self) -> LineSource {
        let (sender, receiver) = mpsc::channel(20);

        tokio::task::spawn(async move { self.start(sender).await });

        LineSource::new(receiver)
    }

    async fn open(&self) -> Result<SerialStream> {
        backoff::future::retry(self.backoff.clone(), || async {
            let serial = self
                .serial_port_builder
                .clone()
                .open_native_async()
                .map_err(log_error)
                .with_context(|| format!("Failed to open device {}", self.device))?;

            debug!("Opened serial port {}", self.device);

            Ok(serial)
        })
        .await
    }

    async fn start(&self, sender: LineSender) {
        loop {
            let serial = match self.open().await {
                Ok(t) => t,
                Err(_) => unreachable!("open retries opening the device forever"),
            };

            let mut framed = FramedRead::new(serial, LineCodec::new());

            loop {
                match framed.next().await {
                    Some(Ok(line)) => {
                        trace!("device {} line {:?}", self.device, line);

                        if sender.send(line).await.is_err() {
                            error!("line consumer for {} went away, stopping", self.device);
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        error!("device {} read error {:?}", self.device, e);
                        break;
                    }
                    None => {
                        error!("device {} has no more lines", self.device);
                        break;
                    }
                };
            }

            info!("Device {} hung up, retrying", self.device);
        }
    }
}

fn default_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(50),
        initial_interval: Duration::from_millis(50),
        randomization_factor: 0.25,
        multiplier: 1.5,
        max_interval: Duration::from_millis(60_000),
        max_elapsed_time: None,
        clock: SystemClock::default(),
        start_time: Instant::now(),
    }
}

fn log_error<T: std::fmt::Display>(e: T) -> T {
    error!("Opening failed: {}", e);

    e
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("no line arrived within {0:?}")]
    TimedOut(Duration),
    #[error("device reader is gone")]
    Closed,
}

/// The acquisition loop's end of the device channel.
pub struct LineSource {
    receiver: LineReceiver,
}

impl LineSource {
    pub fn new(receiver: LineReceiver) -> Self {
        LineSource { receiver }
    }

    /// Waits up to `wait` for the first line read after this call.
    ///
    /// Lines buffered while nobody was waiting describe where the
    /// receiver used to be, not where it is, and are discarded first.
    pub async fn next_line(&mut self, wait: Duration) -> Result<String, ReadError> {
        self.drain();

        match timeout(wait, self.receiver.recv()).await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(ReadError::Closed),
            Err(_) => Err(ReadError::TimedOut(wait)),
        }
    }

    fn drain(&mut self) {
        let mut stale = 0;

        while self.receiver.try_recv().is_ok() {
            stale += 1;
        }

        if stale > 0 {
            debug!("discarded {} stale line(s)", stale);
        }
    }
}
