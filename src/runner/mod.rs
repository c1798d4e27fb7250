//! In-process task runner: the bridge between the HTTP boundary and
//! background execution.
//!
//! `dispatch` assigns a UUID task identity, binds it to the job record and
//! queues the work; a single worker loop pulls tasks and executes them to
//! completion. Delivery is at-least-once with one retry, which is safe
//! because both the import orchestrator and the promotion engine are
//! idempotent.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::services::{ImportService, JobService, PromotionService};

/// Work shipped to the background worker.
#[derive(Clone, Debug)]
pub enum TaskPayload {
    ExcelImport {
        version_id: i32,
        country: Option<String>,
        data: Vec<u8>,
    },
    Promotion {
        version_id: i32,
    },
}

#[derive(Clone, Debug)]
struct QueuedTask {
    job_id: i32,
    task_id: String,
    attempt: u32,
    payload: TaskPayload,
}

/// Handle used by request handlers to enqueue work.
#[derive(Clone)]
pub struct TaskRunner {
    tx: mpsc::UnboundedSender<QueuedTask>,
    jobs: JobService,
}

impl TaskRunner {
    /// Spawn the worker loop and return the dispatch handle.
    pub fn start(
        db: DatabaseConnection,
        soft_timeout: Duration,
        hard_timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            db: db.clone(),
            soft_timeout,
            hard_timeout,
            retry_tx: tx.clone(),
        };
        tokio::spawn(worker.run(rx));

        Self {
            tx,
            jobs: JobService::new(db),
        }
    }

    /// Assign a task identity, bind it to the job, and enqueue.
    pub async fn dispatch(&self, job_id: i32, payload: TaskPayload) -> Result<String> {
        let task_id = Uuid::new_v4().to_string();
        self.jobs.bind_task(job_id, &task_id).await?;

        self.tx
            .send(QueuedTask {
                job_id,
                task_id: task_id.clone(),
                attempt: 0,
                payload,
            })
            .map_err(|_| anyhow!("task runner is no longer accepting work"))?;

        info!("dispatched task {} for job {}", task_id, job_id);
        Ok(task_id)
    }
}

struct Worker {
    db: DatabaseConnection,
    soft_timeout: Duration,
    hard_timeout: Duration,
    retry_tx: mpsc::UnboundedSender<QueuedTask>,
}

impl Worker {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<QueuedTask>) {
        info!("task runner worker started");
        while let Some(task) = rx.recv().await {
            self.execute(task).await;
        }
        info!("task runner worker stopped");
    }

    async fn execute(&self, task: QueuedTask) {
        let soft_deadline = Instant::now() + self.soft_timeout;
        let outcome = match tokio::time::timeout(
            self.hard_timeout,
            self.execute_payload(&task, soft_deadline),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "task {} exceeded the hard deadline of {:?}",
                task.task_id,
                self.hard_timeout
            )),
        };

        let err = match outcome {
            Ok(()) => return,
            Err(err) => err,
        };

        if task.attempt == 0 {
            warn!(
                "task {} (job {}) failed, retrying once: {}",
                task.task_id, task.job_id, err
            );
            let retry = QueuedTask {
                attempt: 1,
                ..task.clone()
            };
            if self.retry_tx.send(retry).is_ok() {
                return;
            }
            // Channel gone; fall through to terminal failure
        }

        error!(
            "task {} (job {}) failed permanently: {}",
            task.task_id, task.job_id, err
        );
        // The job may already be terminal (the orchestrator fails its own
        // job on data errors); a write-once violation here is fine
        if let Err(e) = JobService::new(self.db.clone())
            .fail(task.job_id, &err.to_string())
            .await
        {
            warn!("could not record failure for job {}: {}", task.job_id, e);
        }
    }

    async fn execute_payload(&self, task: &QueuedTask, soft_deadline: Instant) -> Result<()> {
        match &task.payload {
            TaskPayload::ExcelImport {
                version_id,
                country,
                data,
            } => {
                ImportService::new(self.db.clone())
                    .run(
                        task.job_id,
                        *version_id,
                        country.clone(),
                        data,
                        Some(soft_deadline),
                    )
                    .await
            }
            TaskPayload::Promotion { version_id } => {
                PromotionService::new(self.db.clone())
                    .run(task.job_id, *version_id)
                    .await
            }
        }
    }
}
