use crate::fix::Fix;
use crate::FixSender;

use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::mpsc::error::TrySendError;

use tracing::debug;
use tracing::info;

/// Single-slot registry for the connected live viewer.
///
/// Registering a viewer displaces the previous one; pushes go only to
/// the most recent registration. Displacing a viewer drops its
/// sender, which lets the displaced connection's writer task wind
/// down.
#[derive(Clone, Debug, Default)]
pub struct ViewerSlot {
    current: Arc<Mutex<Option<FixSender>>>,
}

impl ViewerSlot {
    pub fn new() -> Self {
        ViewerSlot::default()
    }

    pub fn register(&self, viewer: FixSender) {
        let mut current = self.current.lock().unwrap();

        if current.replace(viewer).is_some() {
            info!("replaced live viewer");
        } else {
            info!("registered live viewer");
        }
    }

    /// Pushes a fix to the registered viewer, if any.
    ///
    /// Never blocks; a viewer that cannot keep up loses fixes, and a
    /// viewer that has gone away vacates the slot.
    pub fn push(&self, fix: Fix) {
        let mut current = self.current.lock().unwrap();

        let viewer = match current.as_ref() {
            Some(v) => v,
            None => return,
        };

        match viewer.try_send(fix) {
            Ok(()) => (),
            Err(TrySendError::Full(_)) => debug!("live viewer is not keeping up, dropped fix"),
            Err(TrySendError::Closed(_)) => {
                debug!("live viewer went away");

                *current = None;
            }
        }
    }

    pub fn is_registered(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }
}
