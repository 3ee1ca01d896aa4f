use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::error::StructError;

/// Why a pipeline step stopped early.
#[derive(Error, Debug)]
pub enum Interrupt {
    /// The wall-clock budget ran out. Expected under pathological inputs.
    #[error("computation cancelled")]
    Cancelled,

    #[error(transparent)]
    Failed(#[from] StructError),
}

/// Shared cancellation flag, optionally tied to a deadline.
///
/// Cloning shares the flag. Long-running steps poll [`CancellationToken::checkpoint`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn checkpoint(&self) -> Result<(), Interrupt> {
        if self.is_cancelled() {
            Err(Interrupt::Cancelled)
        } else {
            Ok(())
        }
    }
}
