//! A fixed pool of worker threads with per-worker state.
//!
//! Each worker owns a [`WorkerState`]: private values created on first use
//! (typically its scratch [`msm_curves::Arena`]) and read-only values
//! broadcast by the coordinator (typically curve parameters). Work is
//! dispatched with [`WorkerPool::call_workers`], which runs a closure once on
//! every worker and waits for all of them.

use crate::error::MsmError;
use log::info;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, PoisonError},
};

/// State private to one worker.
pub struct WorkerState {
    index: usize,
    locals: HashMap<TypeId, Box<dyn Any + Send>>,
    shared: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl WorkerState {
    fn new(index: usize) -> Self {
        Self {
            index,
            locals: HashMap::new(),
            shared: HashMap::new(),
        }
    }

    /// Position of this worker in the pool, from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// This worker's value of type `T`, created with `T::default()` on
    /// first use and kept across calls.
    pub fn local<T: Any + Send + Default>(&mut self) -> &mut T {
        let entry = self
            .locals
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::<T>::default());
        match entry.as_mut().downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("locals are keyed by their type"),
        }
    }

    /// The value broadcast under `key`.
    pub fn shared<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>, MsmError> {
        self.shared
            .get(key)
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
            .ok_or_else(|| MsmError::NotBroadcast(key.to_string()))
    }
}

pub struct WorkerPool {
    pool: ThreadPool,
    workers: Vec<Mutex<WorkerState>>,
}

impl WorkerPool {
    /// Starts `threads` workers, or one per available core when `threads`
    /// is zero.
    pub fn start(threads: usize) -> Result<Self, MsmError> {
        let threads = if threads == 0 {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("msm-worker-{i}"))
            .build()
            .map_err(|err| MsmError::ThreadPool(err.to_string()))?;
        let workers = (0..pool.current_num_threads())
            .map(|i| Mutex::new(WorkerState::new(i)))
            .collect();
        info!("started {threads} MSM workers");
        Ok(Self { pool, workers })
    }

    /// Shuts the workers down, dropping their state.
    pub fn stop(self) {
        info!("stopping {} MSM workers", self.size());
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Runs `f` once on every worker, in parallel, and returns the results
    /// in worker order.
    ///
    /// The first error, in worker order, is returned; a panicking worker is
    /// reported as [`MsmError::WorkerPanicked`]. Results of the other workers
    /// are dropped in both cases.
    pub fn call_workers<R, F>(&self, f: F) -> Result<Vec<R>, MsmError>
    where
        R: Send,
        F: Fn(&mut WorkerState) -> Result<R, MsmError> + Sync,
    {
        let results = self.pool.broadcast(|context| {
            let worker = context.index();
            panic::catch_unwind(AssertUnwindSafe(|| {
                let mut state = self.workers[worker]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                f(&mut state)
            }))
            .unwrap_or_else(|payload| {
                Err(MsmError::WorkerPanicked {
                    worker,
                    message: panic_message(payload.as_ref()),
                })
            })
        });
        results.into_iter().collect()
    }

    /// Installs `value` under `key` on every worker. Returns once all workers
    /// hold it.
    pub fn broadcast<T: Any + Send + Sync>(&self, key: &str, value: Arc<T>) -> Result<(), MsmError> {
        self.call_workers(|state| {
            let value: Arc<dyn Any + Send + Sync> = value.clone();
            state.shared.insert(key.to_string(), value);
            Ok(())
        })?;
        info!("broadcast {key:?} to {} workers", self.size());
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_come_back_in_worker_order() {
        let pool = WorkerPool::start(4).unwrap();
        let indices = pool.call_workers(|state| Ok(state.index())).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        pool.stop();
    }

    #[test]
    fn test_locals_persist_across_calls() {
        let pool = WorkerPool::start(3).unwrap();
        for _ in 0..5 {
            pool.call_workers(|state| {
                *state.local::<u64>() += 1;
                Ok(())
            })
            .unwrap();
        }
        let counts = pool.call_workers(|state| Ok(*state.local::<u64>())).unwrap();
        assert_eq!(counts, vec![5, 5, 5]);
    }

    #[test]
    fn test_broadcast_reaches_every_worker() {
        let pool = WorkerPool::start(2).unwrap();
        pool.broadcast("answer", Arc::new(42u32)).unwrap();
        let values = pool
            .call_workers(|state| state.shared::<u32>("answer").map(|v| *v))
            .unwrap();
        assert_eq!(values, vec![42, 42]);

        let missing = pool.call_workers(|state| state.shared::<u32>("question"));
        assert_eq!(missing.unwrap_err(), MsmError::NotBroadcast("question".into()));
        // wrong type
        assert!(pool.call_workers(|state| state.shared::<u64>("answer")).is_err());
    }

    #[test]
    fn test_panics_are_reported() {
        let pool = WorkerPool::start(2).unwrap();
        let result = pool.call_workers(|state| {
            if state.index() == 1 {
                panic!("boom");
            }
            Ok(())
        });
        assert_eq!(
            result.unwrap_err(),
            MsmError::WorkerPanicked {
                worker: 1,
                message: "boom".to_string()
            }
        );
        // the pool is still usable
        assert_eq!(pool.call_workers(|_| Ok(1)).unwrap(), vec![1, 1]);
    }
}
