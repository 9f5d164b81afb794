use crate::domain::model::Artifact;
use crate::domain::ports::Job;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// 依序執行多個產出工作，每個工作分成 prepare / publish 兩階段
pub struct AuthoringEngine {
    jobs: Vec<Box<dyn Job>>,
    monitor: SystemMonitor,
}

impl AuthoringEngine {
    pub fn new(jobs: Vec<Box<dyn Job>>) -> Self {
        Self {
            jobs,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(jobs: Vec<Box<dyn Job>>, monitor_enabled: bool) -> Self {
        Self {
            jobs,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn job_names(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.name()).collect()
    }

    pub async fn run(&self) -> Result<Vec<Artifact>> {
        tracing::info!("🚀 Starting authoring run ({} jobs)", self.jobs.len());
        if self.monitor.is_enabled() {
            tracing::debug!("🔍 Resource stats will be logged per phase");
        }
        self.monitor.log_stats("Start");

        let mut artifacts = Vec::new();
        for (i, job) in self.jobs.iter().enumerate() {
            let name = job.name();
            tracing::info!("🧱 [{}/{}] Preparing {}...", i + 1, self.jobs.len(), name);
            let plan = job.prepare().await?;
            tracing::info!("🧱 {} prepared {} file(s)", name, plan.len());
            self.monitor.log_stats(&format!("{} prepared", name));

            let written = job.publish(plan).await?;
            for artifact in &written {
                tracing::info!("💾 Saved: {}", artifact);
            }
            self.monitor.log_stats(&format!("{} published", name));
            artifacts.extend(written);
        }

        self.monitor.log_final_stats();
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ArtifactKind;
    use crate::domain::ports::PendingFile;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct RecordingJob {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Job for RecordingJob {
        fn name(&self) -> String {
            self.name.to_string()
        }

        async fn prepare(&self) -> Result<Vec<PendingFile>> {
            self.log.lock().unwrap().push(format!("prepare {}", self.name));
            Ok(vec![PendingFile::new(
                format!("{}.png", self.name),
                ArtifactKind::Png,
                vec![1, 2, 3],
            )])
        }

        async fn publish(&self, plan: Vec<PendingFile>) -> Result<Vec<Artifact>> {
            self.log.lock().unwrap().push(format!("publish {}", self.name));
            Ok(plan
                .into_iter()
                .map(|f| Artifact {
                    path: f.path,
                    kind: f.kind,
                    bytes: f.data.len(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let engine = AuthoringEngine::new(vec![
            Box::new(RecordingJob {
                name: "diagram",
                log: log.clone(),
            }),
            Box::new(RecordingJob {
                name: "deck",
                log: log.clone(),
            }),
        ]);

        let artifacts = engine.run().await.unwrap();

        assert_eq!(engine.job_names(), vec!["diagram", "deck"]);
        assert_eq!(artifacts.len(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["prepare diagram", "publish diagram", "prepare deck", "publish deck"]
        );
    }
}
