use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative interrupt flag shared with the SIGINT handler.
///
/// Loops poll [`CancelToken::is_cancelled`] between iterations; nothing is
/// interrupted mid-call.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl+C into a new token. Only one handler can exist per process.
    pub fn install() -> Result<Self> {
        let token = Self::new();
        let flag = token.flag.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })?;
        Ok(token)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Re-arm before the next cancellable phase.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
