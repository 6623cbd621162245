use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context, Result};

use crate::{
    registry::{ProbeRequest, Validity},
    types::{ImageProbe, check_image},
};

#[derive(Debug, Clone)]
pub(crate) struct ProbeJob {
    pub field: String,
    pub seq: u64,
    pub request: ProbeRequest,
}

#[derive(Debug, Clone)]
pub(crate) struct ProbeOutcome {
    pub field: String,
    pub seq: u64,
    pub outcome: Validity,
}

/// Background thread running image probes. Results are collected without
/// blocking; whether they are still wanted is the caller's call.
pub(crate) struct ProbeWorker {
    jobs: Option<Sender<ProbeJob>>,
    results: Receiver<ProbeOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl ProbeWorker {
    pub fn spawn(probe: Arc<dyn ImageProbe>) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<ProbeJob>();
        let (result_tx, result_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("smartform-probe".into())
            .spawn(move || {
                for job in job_rx {
                    let outcome =
                        check_image(&job.request.source, &job.request.validation, probe.as_ref());
                    tracing::debug!(field = %job.field, seq = job.seq, valid = outcome.is_valid(), "image probed");
                    let sent = result_tx.send(ProbeOutcome {
                        field: job.field,
                        seq: job.seq,
                        outcome,
                    });
                    if sent.is_err() {
                        break;
                    }
                }
            })
            .context("failed to spawn image probe worker")?;
        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Queue `job`; returns false once the worker has gone away.
    pub fn submit(&self, job: ProbeJob) -> bool {
        self.jobs
            .as_ref()
            .is_some_and(|jobs| jobs.send(job).is_ok())
    }

    pub fn drain(&self) -> Vec<ProbeOutcome> {
        self.results.try_iter().collect()
    }

    #[cfg(test)]
    pub fn wait(&self, timeout: std::time::Duration) -> Option<ProbeOutcome> {
        self.results.recv_timeout(timeout).ok()
    }
}

impl Drop for ProbeWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
