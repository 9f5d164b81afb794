use super::write_plan;
use crate::app::products::ApiImageSpec;
use crate::domain::model::{Artifact, ArtifactKind};
use crate::domain::ports::{ImageGenerator, Job, PendingFile, Storage};
use crate::utils::error::{ForgeError, Result};
use async_trait::async_trait;

/// 以圖片生成 API 產生多張圖；全部失敗才算工作失敗
pub struct ApiImageJob<S: Storage, G: ImageGenerator> {
    storage: S,
    generator: G,
    specs: Vec<ApiImageSpec>,
}

impl<S: Storage, G: ImageGenerator> ApiImageJob<S, G> {
    pub fn new(storage: S, generator: G, specs: Vec<ApiImageSpec>) -> Self {
        Self {
            storage,
            generator,
            specs,
        }
    }
}

#[async_trait]
impl<S: Storage, G: ImageGenerator> Job for ApiImageJob<S, G> {
    fn name(&self) -> String {
        format!("api images ({})", self.specs.len())
    }

    async fn prepare(&self) -> Result<Vec<PendingFile>> {
        let mut plan = Vec::with_capacity(self.specs.len());
        let mut last_error = None;

        for (i, spec) in self.specs.iter().enumerate() {
            tracing::info!("🎨 [{}/{}] Generating {}...", i + 1, self.specs.len(), spec.output_file);
            match self.generator.generate(spec.prompt).await {
                Ok(data) => {
                    tracing::info!("✅ {} ({} bytes)", spec.output_file, data.len());
                    plan.push(PendingFile::new(spec.output_file.clone(), ArtifactKind::Image, data));
                }
                Err(e) => {
                    tracing::warn!("❌ {} failed: {}", spec.output_file, e);
                    last_error = Some(e);
                }
            }
        }

        if plan.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
            return Err(ForgeError::ProcessingError {
                message: "no images requested".to_string(),
            });
        }
        Ok(plan)
    }

    async fn publish(&self, plan: Vec<PendingFile>) -> Result<Vec<Artifact>> {
        write_plan(&self.storage, plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    /// 提示含 "fail" 就回錯誤
    struct FakeGenerator;

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<Vec<u8>> {
            if prompt.contains("fail") {
                Err(ForgeError::ApiError {
                    message: "no image in response".to_string(),
                })
            } else {
                Ok(prompt.as_bytes().to_vec())
            }
        }
    }

    fn job(dir: &TempDir, prompts: &[&'static str]) -> ApiImageJob<LocalStorage, FakeGenerator> {
        let specs = prompts
            .iter()
            .enumerate()
            .map(|(i, prompt)| ApiImageSpec {
                prompt: *prompt,
                output_file: format!("p/img{}.png", i),
            })
            .collect();
        ApiImageJob::new(
            LocalStorage::new(dir.path().to_string_lossy().to_string()),
            FakeGenerator,
            specs,
        )
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_images() {
        let dir = TempDir::new().unwrap();
        let job = job(&dir, &["fail please", "cat"]);

        let plan = job.prepare().await.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].path, "p/img1.png");

        job.publish(plan).await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("p/img1.png")).unwrap(), b"cat");
    }

    #[tokio::test]
    async fn test_all_failures_fail_the_job() {
        let dir = TempDir::new().unwrap();
        let err = job(&dir, &["fail a", "fail b"]).prepare().await.unwrap_err();
        assert!(matches!(err, ForgeError::ApiError { .. }));
    }
}
