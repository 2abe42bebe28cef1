// (c) Roel Kluin, 2023, GPL v3

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::debug;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed number of workers taking jobs from one shared channel.
pub struct ThreadPool {
    tx: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

/// The eventual result of a submitted job.
pub struct Task<T> {
    rx: Receiver<thread::Result<Result<T>>>,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown cause"
    }
}

impl<T> Task<T> {
    /// block until the job is done; a panic in the job is returned as an error.
    pub fn join(self) -> Result<T> {
        match self.rx.recv() {
            Ok(Ok(res)) => res,
            Ok(Err(payload)) => Err(anyhow!("job panicked: {}", panic_message(&*payload))),
            Err(_) => Err(anyhow!("job was dropped before it completed")),
        }
    }
}

impl ThreadPool {
    pub fn new(no_threads: usize) -> Result<Self> {
        let no_threads = no_threads.max(1);
        let (tx, rx) = unbounded::<Job>();
        let workers = (0..no_threads)
            .map(|nr| {
                let rx = rx.clone();
                thread::Builder::new()
                    .name(format!("worker-{nr}"))
                    .spawn(move || {
                        // ends when the pool drops its sender and the queue is drained.
                        for job in rx.iter() {
                            job();
                        }
                    })
                    .map_err(|e| anyhow!("spawning worker {nr}: {e}"))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("started {no_threads} workers");
        Ok(ThreadPool {
            tx: Some(tx),
            workers,
        })
    }

    /// as many workers as the machine offers parallelism.
    pub fn with_available_parallelism() -> Result<Self> {
        let n = thread::available_parallelism().map_or(1, |n| n.get());
        ThreadPool::new(n)
    }

    pub fn no_threads(&self) -> usize {
        self.workers.len()
    }

    pub fn submit<F, T>(&self, f: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx_res, rx) = bounded(1);
        let job: Job = Box::new(move || {
            let res = panic::catch_unwind(AssertUnwindSafe(f));
            // the task may have been dropped unjoined; nobody is waiting then.
            let _ = tx_res.send(res);
        });
        if let Some(tx) = self.tx.as_ref() {
            // a failed send drops the job and with it the result sender, join reports it.
            let _ = tx.send(job);
        }
        Task { rx }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.tx.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
