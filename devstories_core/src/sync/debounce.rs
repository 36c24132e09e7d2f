use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::error;

/// Delays a job and lets each newer `schedule` call supersede the pending one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Runs `job` after the delay unless another call to `schedule` or
    /// `cancel` happens first. The job receives its generation so results can
    /// be checked with [`Debouncer::is_current`] when they come back.
    pub fn schedule<F>(&self, job: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let delay = self.delay;
        let spawned = thread::Builder::new()
            .name("debounce".into())
            .spawn(move || {
                thread::sleep(delay);
                if latest.load(Ordering::SeqCst) == generation {
                    job(generation);
                }
            });
        if let Err(err) = spawned {
            error!("failed to start debounce worker: {err}");
        }
        generation
    }

    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn only_the_last_keystroke_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(80));
        let (tx, rx) = mpsc::channel();
        for name in ["b", "bu", "bun"] {
            let tx = tx.clone();
            debouncer.schedule(move |generation| {
                let _ = tx.send((generation, name));
            });
        }
        let (generation, name) = rx.recv_timeout(Duration::from_secs(5)).expect("fired");
        assert_eq!(name, "bun");
        assert!(debouncer.is_current(generation));
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn cancel_suppresses_pending_job() {
        let debouncer = Debouncer::new(Duration::from_millis(40));
        let (tx, rx) = mpsc::channel::<()>();
        let generation = debouncer.schedule(move |_| {
            let _ = tx.send(());
        });
        debouncer.cancel();
        assert!(!debouncer.is_current(generation));
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }
}
