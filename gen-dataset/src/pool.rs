//! Running work items concurrently on a fixed number of threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rand::{thread_rng, Rng};
use rayon::ThreadPoolBuilder;

use crate::error::Error;

/// Splits `items` into `n` partitions by assigning item `i` to partition `i % n`.
/// Items keep their relative order within a partition.
/// Some partitions may be empty if there are fewer items than partitions.
pub fn partition<T>(items: &[T], n: usize) -> Vec<Vec<&T>> {
    let n = n.max(1);
    let mut partitions: Vec<Vec<&T>> = (0..n)
        .map(|_| Vec::with_capacity(items.len() / n + 1))
        .collect();
    for (i, item) in items.iter().enumerate() {
        partitions[i % n].push(item);
    }
    partitions
}

/// Executes a unit of work for every item, with up to `threads` items in flight at once.
pub struct WorkerPool {
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> WorkerPool {
        WorkerPool {
            threads: threads.max(1),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Partitions the items round-robin and processes each partition sequentially
    /// on its own thread. With a single thread, everything runs on the calling thread.
    ///
    /// Returns after all items were processed or after the first failure.
    /// Once any item fails, no worker starts another item, and the first error is returned.
    pub fn run<T, F>(&self, items: &[T], work: F) -> Result<(), Error>
    where
        T: Sync,
        F: Fn(&T) -> Result<(), Error> + Sync,
    {
        if self.threads == 1 {
            return items.iter().try_for_each(work);
        }

        let partitions: Vec<Vec<&T>> = partition(items, self.threads)
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if partitions.is_empty() {
            return Ok(());
        }

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(partitions.len())
            .thread_name(|i| format!("worker-{i}"))
            .build()
            .map_err(|e| Error::new(format!("Failed to start worker threads: {e}")))?;

        let failed = AtomicBool::new(false);
        let first_error: Mutex<Option<Error>> = Mutex::new(None);

        // References, so each spawned task can capture them by move:
        let work = &work;
        let failed = &failed;
        let error_slot = &first_error;

        // One long-running task per partition, and as many threads as partitions,
        // so all partitions make progress at the same time.
        thread_pool.scope(|s| {
            for part in &partitions {
                s.spawn(move |_| {
                    for item in part {
                        if failed.load(Ordering::Acquire) {
                            return;
                        }
                        if let Err(e) = work(item) {
                            failed.store(true, Ordering::Release);
                            record_error(error_slot, e);
                            return;
                        }
                    }
                });
            }
        });

        match first_error.into_inner().unwrap_or_else(|e| e.into_inner()) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Keeps the first reported error, later ones are dropped.
/// A poisoned lock still holds a usable slot, so it is not a reason to panic.
fn record_error(slot: &Mutex<Option<Error>>, error: Error) {
    slot.lock()
        .unwrap_or_else(|e| e.into_inner())
        .get_or_insert(error);
}

/// Optional random pause taken by a worker after each file.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pacing {
    max_wait: Duration,
}

impl Pacing {
    pub fn new(max_wait: Duration) -> Pacing {
        Pacing { max_wait }
    }

    /// Sleeps a random number of milliseconds, uniformly distributed in `[0, max_wait]`.
    /// Does nothing if `max_wait` is zero.
    /// Uses the random generator local to the calling thread.
    pub fn pause(&self) {
        let max_ms = self.max_wait.as_millis() as u64;
        if max_ms == 0 {
            return;
        }
        let ms = thread_rng().gen_range(0..=max_ms);
        thread::sleep(Duration::from_millis(ms));
    }
}
