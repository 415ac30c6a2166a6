use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

pub type Callback = Box<dyn FnMut() + Send + 'static>;

/// Owns timing for periodic work.
///
/// Implementations must never run one callback concurrently with itself.
pub trait Scheduler {
    fn register_periodic(&mut self, period: Duration, callback: Callback) -> io::Result<()>;
}

/// Runs every registered callback on its own thread.
///
/// Dropping the scheduler stops and joins all of them. A stopped scheduler
/// refuses new registrations.
pub struct ThreadScheduler {
    stop: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
        }
    }

    pub fn callback_count(&self) -> usize {
        self.workers.len()
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        for worker in &self.workers {
            worker.thread().unpark();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                debug!("periodic worker panicked");
            }
        }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Scheduler for ThreadScheduler {
    fn register_periodic(&mut self, period: Duration, mut callback: Callback) -> io::Result<()> {
        if self.stop.load(Ordering::Acquire) {
            return Err(io::Error::other("scheduler is stopped"));
        }
        let stop = Arc::clone(&self.stop);
        let worker = thread::Builder::new()
            .name(format!("periodic-{}", self.workers.len()))
            .spawn(move || {
                let mut next = Instant::now() + period;
                loop {
                    // park_timeout may wake early, so wait out the full deadline
                    loop {
                        if stop.load(Ordering::Acquire) {
                            return;
                        }
                        let now = Instant::now();
                        if now >= next {
                            break;
                        }
                        thread::park_timeout(next - now);
                    }
                    callback();
                    next += period;
                    let now = Instant::now();
                    if next < now {
                        next = now + period;
                    }
                }
            })?;
        self.workers.push(worker);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn invokes_callback_until_dropped() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = ThreadScheduler::new();
        let counter = Arc::clone(&count);
        scheduler
            .register_periodic(
                Duration::from_millis(5),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        assert_eq!(scheduler.callback_count(), 1);

        thread::sleep(Duration::from_millis(100));
        drop(scheduler);

        let seen = count.load(Ordering::SeqCst);
        assert!(seen >= 2, "callback ran {} times", seen);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[test]
    fn stop_does_not_wait_for_long_period() {
        let mut scheduler = ThreadScheduler::new();
        scheduler
            .register_periodic(Duration::from_secs(3600), Box::new(|| {}))
            .unwrap();
        let started = Instant::now();
        scheduler.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(scheduler.callback_count(), 0);
    }

    #[test]
    fn register_after_stop_is_refused() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut scheduler = ThreadScheduler::new();
        scheduler.stop();

        let counter = Arc::clone(&count);
        let result = scheduler.register_periodic(
            Duration::from_millis(5),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(result.is_err());
        assert_eq!(scheduler.callback_count(), 0);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
