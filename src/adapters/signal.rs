//! Process signal adapter.
//!
//! Turns SIGINT / SIGTERM into a [`ShutdownToken`] request so the control
//! loop finishes its current event, emits `Stopped` and returns.  A second
//! signal while shutdown is already pending only logs; the loop exits at the
//! next event boundary.

use log::{info, warn};

use crate::channels::ShutdownToken;

/// Route termination signals to `token`.  Only one handler per process.
pub fn install(token: &'static ShutdownToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(on_signal(token))?;
    info!("Signals: SIGINT/SIGTERM request shutdown");
    Ok(())
}

fn on_signal(token: &'static ShutdownToken) -> impl FnMut() + Send + 'static {
    move || {
        if token.is_requested() {
            warn!("Signals: shutdown already in progress");
        } else {
            info!("Signals: termination requested");
            token.request();
        }
    }
}
