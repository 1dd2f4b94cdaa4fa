pub mod acquisition;
pub mod configuration;
pub mod fix;
pub mod ingest;
pub mod live_view;
pub mod nmea;

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

use fix::Fix;
use tokio::sync::mpsc;

pub type FixReceiver = mpsc::Receiver<Fix>;
pub type FixSender = mpsc::Sender<Fix>;

pub type LineReceiver = mpsc::Receiver<String>;
pub type LineSender = mpsc::Sender<String>;
