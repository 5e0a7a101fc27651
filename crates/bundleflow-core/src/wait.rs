//! "Keep waiting while the flag is false" adapter
//!
//! Scheduler loops that resume a task once per tick only need to ask one
//! question: keep waiting or not. [`WaitUntil`] answers it from any predicate,
//! typically one that polls a bundle operation.

/// Waits until a predicate turns true, counting the polls spent waiting
///
/// # Example
///
/// ```
/// use bundleflow_core::WaitUntil;
///
/// let mut ticks = 0;
/// let mut wait = WaitUntil::new(|| {
///     ticks += 1;
///     ticks >= 3
/// });
///
/// assert!(wait.keep_waiting());
/// assert!(wait.keep_waiting());
/// assert!(!wait.keep_waiting());
/// assert_eq!(wait.polls(), 2);
/// ```
pub struct WaitUntil<F> {
    predicate: F,
    polls: u64,
    finished: bool,
}

impl<F: FnMut() -> bool> WaitUntil<F> {
    /// Wrap a predicate
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            polls: 0,
            finished: false,
        }
    }

    /// True while the predicate is still false
    ///
    /// Once the predicate has returned true it is not evaluated again.
    pub fn keep_waiting(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if (self.predicate)() {
            self.finished = true;
            return false;
        }
        self.polls += 1;
        true
    }

    /// Number of polls that returned "keep waiting"
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Whether the predicate has been observed true
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<F> std::fmt::Debug for WaitUntil<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitUntil")
            .field("polls", &self.polls)
            .field("finished", &self.finished)
            .finish()
    }
}
