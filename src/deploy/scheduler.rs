// ABOUTME: Scheduler running a batch of tasks in parallel or one at a time.
// ABOUTME: Honors abort-on-first-failure and aggregates failures in arrival order.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

use crate::config::Concurrency;

/// Runs tasks with a concurrency strategy and an abort policy. Never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    concurrency: Concurrency,
    exit_on_failure: bool,
}

impl Scheduler {
    pub fn new(concurrency: Concurrency, exit_on_failure: bool) -> Self {
        Self {
            concurrency,
            exit_on_failure,
        }
    }

    /// Run `tasks`, returning every failure in the order it arrived.
    ///
    /// Tasks are lazy: a task that is never polled never starts. Parallel
    /// runs start every task without waiting on the others and a failure
    /// never cancels a task in flight, so every task runs to completion
    /// whatever `exit_on_failure` says. Sequential runs go in list order and,
    /// with `exit_on_failure` set, stop at the first failure.
    pub async fn run<T, E, F>(&self, tasks: Vec<F>) -> Result<(), Vec<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let total = tasks.len();
        let errors = match self.concurrency {
            Concurrency::Parallel => self.run_parallel(tasks).await,
            Concurrency::Sequential => self.run_sequential(tasks).await,
        };

        if errors.is_empty() {
            tracing::debug!("all {} task(s) succeeded", total);
            Ok(())
        } else {
            tracing::debug!("{} of {} task(s) failed", errors.len(), total);
            Err(errors)
        }
    }

    async fn run_parallel<T, E, F>(&self, tasks: Vec<F>) -> Vec<E>
    where
        F: Future<Output = Result<T, E>>,
    {
        // Every task is part of the batch from the start, so abort has nothing
        // left to hold back; failures are collected as they arrive.
        let mut running: FuturesUnordered<F> = tasks.into_iter().collect();

        let mut errors = Vec::new();
        while let Some(result) = running.next().await {
            if let Err(e) = result {
                if self.exit_on_failure && errors.is_empty() && !running.is_empty() {
                    tracing::info!(
                        "task failed, {} task(s) already in flight will finish",
                        running.len()
                    );
                }
                errors.push(e);
            }
        }

        errors
    }

    async fn run_sequential<T, E, F>(&self, tasks: Vec<F>) -> Vec<E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let total = tasks.len();
        let mut errors = Vec::new();

        for (index, task) in tasks.into_iter().enumerate() {
            if let Err(e) = task.await {
                errors.push(e);
                if self.exit_on_failure {
                    let remaining = total - index - 1;
                    if remaining > 0 {
                        tracing::info!("task failed, {} task(s) never started", remaining);
                    }
                    break;
                }
            }
        }

        errors
    }
}
