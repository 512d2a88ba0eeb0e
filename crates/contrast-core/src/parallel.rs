use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::consts::{MIN_PIXELS_PER_CHUNK, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{ContrastError, Result};

/// Data-parallel executor over interleaved pixel buffers.
///
/// Work is split into disjoint chunks of whole pixel groups, so a chunk never
/// starts or ends in the middle of a pixel. Each executor owns its own pool;
/// the global Rayon pool is never reconfigured.
pub struct Executor {
    pool: Option<ThreadPool>,
    threads: usize,
}

impl Executor {
    /// Build an executor with `threads` workers. `0` selects Rayon's default
    /// (one worker per logical CPU, or `RAYON_NUM_THREADS`).
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 1 {
            return Ok(Self::sequential());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("contrast-worker-{index}"))
            .build()
            .map_err(|e| ContrastError::ThreadPool(e.to_string()))?;
        let threads = pool.current_num_threads();
        debug!(threads, "Thread pool ready");

        Ok(Self {
            pool: Some(pool),
            threads,
        })
    }

    /// Executor that runs everything inline on the calling thread.
    pub fn sequential() -> Self {
        Self {
            pool: None,
            threads: 1,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of samples per work chunk for an image of `pixel_count` pixels.
    ///
    /// Always a multiple of `channels`.
    pub fn chunk_len(&self, pixel_count: usize, channels: usize) -> usize {
        let pixels_per_chunk = pixel_count
            .div_ceil(self.threads)
            .max(MIN_PIXELS_PER_CHUNK);
        pixels_per_chunk * channels
    }

    fn pool_for(&self, pixel_count: usize) -> Option<&ThreadPool> {
        self.pool
            .as_ref()
            .filter(|_| pixel_count >= PARALLEL_PIXEL_THRESHOLD)
    }

    /// Fold disjoint chunks of `data` into private partial results and reduce
    /// them with `merge`.
    ///
    /// `merge` must be associative and commutative for the result to be
    /// independent of the thread count.
    pub fn fold_chunks<T, I, F, M>(
        &self,
        data: &[u8],
        channels: usize,
        identity: I,
        fold: F,
        merge: M,
    ) -> T
    where
        T: Send,
        I: Fn() -> T + Sync + Send,
        F: Fn(T, &[u8]) -> T + Sync + Send,
        M: Fn(T, T) -> T + Sync + Send,
    {
        let pixel_count = data.len() / channels;
        match self.pool_for(pixel_count) {
            Some(pool) => {
                let chunk_len = self.chunk_len(pixel_count, channels);
                pool.install(|| {
                    data.par_chunks(chunk_len)
                        .map(|chunk| fold(identity(), chunk))
                        .reduce(&identity, &merge)
                })
            }
            None => fold(identity(), data),
        }
    }

    /// Apply `op` to disjoint mutable chunks of `data`.
    pub fn for_each_chunk_mut<F>(&self, data: &mut [u8], channels: usize, op: F)
    where
        F: Fn(&mut [u8]) + Sync + Send,
    {
        let pixel_count = data.len() / channels;
        match self.pool_for(pixel_count) {
            Some(pool) => {
                let chunk_len = self.chunk_len(pixel_count, channels);
                pool.install(|| data.par_chunks_mut(chunk_len).for_each(&op));
            }
            None => op(data),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::sequential()
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("threads", &self.threads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_len_is_whole_pixels() {
        let executor = Executor::new(3).unwrap();
        for channels in 1..=3 {
            let len = executor.chunk_len(1_000_003, channels);
            assert_eq!(len % channels, 0);
        }
    }

    #[test]
    fn chunk_len_has_floor() {
        let executor = Executor::new(8).unwrap();
        assert_eq!(executor.chunk_len(10, 3), MIN_PIXELS_PER_CHUNK * 3);
    }

    #[test]
    fn fold_chunks_visits_every_sample_once() {
        let data: Vec<u8> = (0..PARALLEL_PIXEL_THRESHOLD * 3)
            .map(|i| (i % 7) as u8)
            .collect();
        let expected: u64 = data.iter().map(|&v| v as u64).sum();
        for threads in [1, 2, 5] {
            let executor = Executor::new(threads).unwrap();
            let total = executor.fold_chunks(
                &data,
                3,
                || 0u64,
                |acc, chunk| acc + chunk.iter().map(|&v| v as u64).sum::<u64>(),
                |a, b| a + b,
            );
            assert_eq!(total, expected, "threads = {threads}");
        }
    }
}
