//! Wave Scheduler - The explicit run-loop behind microbatching
//!
//! One resolution wave: run every synchronously-ready resolution step, and
//! once nothing can make further progress without data, fire the loaders
//! holding submissions. Batches fire at this wave boundary, never on a
//! timer. The loop repeats until every task has completed, so nested waves
//! (children resolving grandchildren) batch the same way.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use futures::task::noop_waker;

use crate::error::{LoaderError, LoaderResult};

use super::registry::LoaderRegistry;

type ResolutionTask = Pin<Box<dyn Future<Output = LoaderResult<()>> + Send>>;

/// Drives resolution tasks cooperatively and fires batches between waves
pub struct WaveScheduler {
    registry: Arc<LoaderRegistry>,
    tasks: Vec<ResolutionTask>,
}

impl WaveScheduler {
    /// Create a scheduler over the request's loader registry
    pub fn new(registry: Arc<LoaderRegistry>) -> Self {
        Self {
            registry,
            tasks: Vec::new(),
        }
    }

    /// Queue one resolution task for the current request
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = LoaderResult<()>> + Send + 'static,
    {
        self.tasks.push(Box::pin(task));
    }

    /// Number of tasks still queued
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Drive every spawned task to completion.
    ///
    /// Fails fast on the first task error, and with a stall error when tasks
    /// remain pending while no loader holds submissions (a handle awaited
    /// outside any batch would otherwise spin forever).
    pub async fn run(&mut self) -> LoaderResult<()> {
        let waker = noop_waker();
        while !self.tasks.is_empty() {
            self.poll_ready_tasks(&waker)?;
            if self.tasks.is_empty() {
                break;
            }
            let fired = self.registry.fire_pending().await?;
            tracing::debug!(
                "Wave boundary: fired {} batch(es), {} task(s) remaining",
                fired,
                self.tasks.len()
            );
            if fired == 0 {
                tracing::warn!(
                    "Resolution stalled: {} task(s) pending with no batch to fire",
                    self.tasks.len()
                );
                return Err(LoaderError::batch(
                    "resolution stalled: tasks pending but no loader holds submissions",
                ));
            }
        }
        Ok(())
    }

    /// Poll tasks until none makes further synchronous progress.
    ///
    /// Completed tasks drop out; a task error aborts the wave.
    fn poll_ready_tasks(&mut self, waker: &Waker) -> LoaderResult<()> {
        let mut cx = Context::from_waker(waker);
        loop {
            let mut progressed = false;
            let mut still_pending = Vec::with_capacity(self.tasks.len());
            for mut task in self.tasks.drain(..) {
                match task.as_mut().poll(&mut cx) {
                    Poll::Ready(Ok(())) => progressed = true,
                    Poll::Ready(Err(err)) => return Err(err),
                    Poll::Pending => still_pending.push(task),
                }
            }
            self.tasks = still_pending;
            if !progressed || self.tasks.is_empty() {
                return Ok(());
            }
        }
    }
}
