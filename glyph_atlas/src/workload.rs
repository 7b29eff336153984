// Copyright 2026 the Glyph Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting independent tasks across worker threads.

use core::ops::Range;

/// Runs independent tasks in balanced chunks, one chunk per worker.
///
/// Results always come back in task order, whatever the number of workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    threads: usize,
}

impl Workload {
    /// A workload using `threads` workers.
    ///
    /// Zero selects [`default_threads`](Self::default_threads).
    pub fn new(threads: usize) -> Self {
        Self {
            threads: if threads == 0 {
                Self::default_threads()
            } else {
                threads
            },
        }
    }

    /// A workload that runs everything on the calling thread.
    pub fn single_threaded() -> Self {
        Self { threads: 1 }
    }

    /// The hardware concurrency, or 1 if it cannot be determined.
    pub fn default_threads() -> usize {
        std::thread::available_parallelism().map_or(1, usize::from)
    }

    /// Number of workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Splits `len` tasks into at most [`threads`](Self::threads) contiguous chunks whose
    /// sizes differ by at most one.
    pub fn chunks(&self, len: usize) -> Vec<Range<usize>> {
        let count = self.threads.min(len).max(1);
        let base = len / count;
        let extra = len % count;
        let mut start = 0;
        (0..count)
            .map(|chunk| {
                let size = base + usize::from(chunk < extra);
                let range = start..start + size;
                start += size;
                range
            })
            .collect()
    }

    /// Runs `task` on every item and returns the results in item order.
    ///
    /// Each chunk calls `init` once to create scratch state that its tasks share.
    pub fn run<I, R, S, Init, Task>(&self, items: Vec<I>, init: Init, task: Task) -> Vec<R>
    where
        I: Send,
        R: Send,
        Init: Fn() -> S + Sync,
        Task: Fn(&mut S, I) -> R + Sync,
    {
        let ranges = self.chunks(items.len());
        let mut items = items.into_iter();
        let chunks: Vec<Vec<I>> = ranges
            .iter()
            .map(|range| items.by_ref().take(range.len()).collect())
            .collect();
        let run_chunk = |chunk: Vec<I>| -> Vec<R> {
            let mut scratch = init();
            chunk.into_iter().map(|item| task(&mut scratch, item)).collect()
        };

        if chunks.len() <= 1 {
            return chunks.into_iter().flat_map(run_chunk).collect();
        }
        self.run_parallel(chunks, run_chunk)
    }

    #[cfg(feature = "parallel")]
    fn run_parallel<I, R, F>(&self, chunks: Vec<Vec<I>>, run_chunk: F) -> Vec<R>
    where
        I: Send,
        R: Send,
        F: Fn(Vec<I>) -> Vec<R> + Sync,
    {
        use rayon::prelude::*;

        match rayon::ThreadPoolBuilder::new()
            .num_threads(chunks.len())
            .build()
        {
            Ok(pool) => {
                log::debug!(
                    "running {} chunks on {} threads",
                    chunks.len(),
                    pool.current_num_threads()
                );
                let results: Vec<Vec<R>> =
                    pool.install(|| chunks.into_par_iter().map(&run_chunk).collect());
                results.into_iter().flatten().collect()
            }
            Err(err) => {
                log::warn!("cannot start worker threads, running on the calling thread: {err}");
                chunks.into_iter().flat_map(run_chunk).collect()
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel<I, R, F>(&self, chunks: Vec<Vec<I>>, run_chunk: F) -> Vec<R>
    where
        F: Fn(Vec<I>) -> Vec<R>,
    {
        chunks.into_iter().flat_map(run_chunk).collect()
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::new(0)
    }
}
