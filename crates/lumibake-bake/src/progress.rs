use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

// Set from the signal handler, checked between rows.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct Progress {
    label: &'static str,
    total: u32,
    every: u32,
    done: AtomicU32,
    start: Instant,
}

impl Progress {
    pub(crate) fn new(label: &'static str, total: u32, every: u32) -> Self {
        Self {
            label,
            total,
            every,
            done: AtomicU32::new(0),
            start: Instant::now(),
        }
    }

    pub(crate) fn row_done(&self) {
        if self.every == 0 {
            return;
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done == self.total || done % self.every == 0 {
            let elapsed = self.start.elapsed().as_secs_f64();
            let percent = (done as f64 / self.total as f64) * 100.0;
            let total = elapsed * self.total as f64 / done as f64;
            let remaining = (total - elapsed).max(0.0);
            log::info!(
                "{}: {}/{} rows ({:.1}%) elapsed {:.1}s eta {:.1}s",
                self.label,
                done,
                self.total,
                percent,
                elapsed,
                remaining
            );
        }
    }
}

pub(crate) fn with_thread_pool<T: Send>(threads: usize, f: impl FnOnce() -> T + Send) -> T {
    if threads == 0 {
        f()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("failed to build rayon pool")
            .install(f)
    }
}
