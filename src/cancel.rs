use errors::*;
use std::cmp;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

// upper bound on how long a cancellation goes unnoticed while sleeping
const SLICE: Duration = Duration::from_millis(200);

/// Lets a caller stop a polling loop, either explicitly (e.g. from a Ctrl-C
/// handler running on another thread) or by imposing a deadline.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A token that is cancelled along with this one, and also once
    /// `timeout` has elapsed.
    pub fn with_timeout(&self, timeout: Duration) -> CancelToken {
        let deadline = Instant::now() + timeout;
        CancelToken {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(match self.deadline {
                Some(earlier) => cmp::min(earlier, deadline),
                None => deadline,
            }),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn check(&self) -> Result<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            bail!(ErrorKind::Cancelled("interrupted".to_owned()));
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                bail!(ErrorKind::Cancelled("timed out".to_owned()));
            }
        }
        Ok(())
    }

    /// Sleeps for `duration`, waking early with an error if the token is
    /// cancelled or its deadline passes in the meantime.
    pub fn sleep(&self, duration: Duration) -> Result<()> {
        let until = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            thread::sleep(cmp::min(SLICE, until - now));
        }
    }
}
