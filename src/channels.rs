//! Inter-thread communication for the control loop.
//!
//! Uses `embassy-sync` primitives to bridge the transport's receive thread
//! with the single-threaded control loop.  The loop is the only consumer,
//! so every mutation of the latest reading happens on one thread.
//!
//! ```text
//! ┌──────────────┐   RawFrame   ┌──────────────┐
//! │ MQTT thread  │─────────────▶│ Control loop │
//! │ (blocking)   │              │ (async)      │
//! └──────────────┘              └──────────────┘
//!        │          shutdown          ▲
//!        └────────────────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

/// Largest telemetry frame accepted.  Real frames are ~20 bytes.
pub const MAX_FRAME_LEN: usize = 128;

/// Frames buffered between the transport thread and the loop.
const FRAME_DEPTH: usize = 8;

/// One raw inbound frame, copied out of the transport's buffer.
pub type RawFrame = heapless::Vec<u8, MAX_FRAME_LEN>;

/// Why a frame did not make it into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// Frame longer than [`MAX_FRAME_LEN`].
    Oversized,
    /// The loop is not keeping up.
    Full,
}

impl core::fmt::Display for PushError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Oversized => write!(f, "frame exceeds {} bytes", MAX_FRAME_LEN),
            Self::Full => write!(f, "inbound queue full"),
        }
    }
}

// ── Inbound frames ───────────────────────────────────────────

/// Bounded multi-producer, single-consumer frame queue.
pub struct InboundQueue {
    frames: Channel<CriticalSectionRawMutex, RawFrame, FRAME_DEPTH>,
}

impl InboundQueue {
    pub const fn new() -> Self {
        Self {
            frames: Channel::new(),
        }
    }

    /// Copy `bytes` into the queue without blocking.
    pub fn push(&self, bytes: &[u8]) -> Result<(), PushError> {
        let frame = RawFrame::from_slice(bytes).map_err(|_| PushError::Oversized)?;
        self.frames.try_send(frame).map_err(|_| PushError::Full)
    }

    /// Wait for the next frame.
    pub async fn receive(&self) -> RawFrame {
        self.frames.receive().await
    }

    /// Take a frame if one is queued.  Used to drain the queue on shutdown.
    pub fn try_receive(&self) -> Option<RawFrame> {
        self.frames.try_receive().ok()
    }
}

impl Default for InboundQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Shutdown ─────────────────────────────────────────────────

/// Cooperative cancellation shared by the loop and the transport thread.
///
/// Once requested it stays requested; there is no reset.
pub struct ShutdownToken {
    requested: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl ShutdownToken {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    /// Ask every holder of this token to stop.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
        self.wake.signal(());
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Resolve once shutdown has been requested.
    pub async fn wait(&self) {
        if self.is_requested() {
            return;
        }
        self.wake.wait().await;
    }
}

impl Default for ShutdownToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide queue fed by the transport adapter.
pub static INBOUND: InboundQueue = InboundQueue::new();

/// Process-wide shutdown token.
pub static SHUTDOWN: ShutdownToken = ShutdownToken::new();

// ── Tests ────────────────────────────────────────────────────
