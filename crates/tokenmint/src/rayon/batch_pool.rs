//! # Batch Worker Pool

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use crate::{
    errors::{TMResult, TokenmintError},
    types::TMHashMap,
};

/// The default number of batch workers.
pub const DEFAULT_BATCH_THREADS: usize = 4;

/// A bounded [`rayon`] pool for batch operations, built on first use.
#[derive(Debug)]
pub struct BatchPool {
    num_threads: usize,
    pool: once_cell::sync::OnceCell<ThreadPool>,
}

impl Default for BatchPool {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_THREADS)
    }
}

impl BatchPool {
    /// Create a pool of `num_threads` workers; 0 is treated as 1.
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
            pool: once_cell::sync::OnceCell::new(),
        }
    }

    /// The worker count.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn pool(&self) -> TMResult<&ThreadPool> {
        self.pool.get_or_try_init(|| {
            log::debug!("starting batch pool with {} threads", self.num_threads);
            ThreadPoolBuilder::new()
                .num_threads(self.num_threads)
                .thread_name(|idx| format!("tokenmint-batch-{idx}"))
                .build()
                .map_err(|e| TokenmintError::External(e.to_string()))
        })
    }

    /// Map `f` over `items` on the pool.
    ///
    /// Output order matches input order. The first error fails the whole
    /// batch; remaining work is abandoned and no partial results are returned.
    pub fn try_map<I, O, F>(
        &self,
        items: &[I],
        f: F,
    ) -> TMResult<Vec<O>>
    where
        I: Sync,
        O: Send,
        F: Fn(&I) -> TMResult<O> + Sync + Send,
    {
        self.pool()?
            .install(|| items.par_iter().map(f).collect::<TMResult<Vec<O>>>())
    }
}

/// [`BatchPool`]s keyed by worker count.
///
/// Each worker count gets one pool, built on first use and kept for the
/// life of the cache.
#[derive(Debug, Default)]
pub struct BatchPools {
    pools: RwLock<TMHashMap<usize, Arc<BatchPool>>>,
}

impl BatchPools {
    /// The pool with `num_threads` workers; 0 is treated as 1.
    pub fn get(
        &self,
        num_threads: usize,
    ) -> Arc<BatchPool> {
        let num_threads = num_threads.max(1);
        if let Some(pool) = self.pools.read().get(&num_threads) {
            return pool.clone();
        }
        self.pools
            .write()
            .entry(num_threads)
            .or_insert_with(|| Arc::new(BatchPool::new(num_threads)))
            .clone()
    }

    /// The number of distinct pools created so far.
    pub fn num_pools(&self) -> usize {
        self.pools.read().len()
    }
}
