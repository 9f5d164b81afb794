use super::write_plan;
use crate::adapters::render_png;
use crate::app::products::DiagramSpec;
use crate::domain::model::{Artifact, ArtifactKind};
use crate::domain::ports::{Job, PendingFile, Storage};
use crate::utils::error::{ForgeError, Result};
use async_trait::async_trait;

/// 把一張圖點陣化成 PNG
pub struct DiagramJob<S: Storage> {
    storage: S,
    spec: DiagramSpec,
}

impl<S: Storage> DiagramJob<S> {
    pub fn new(storage: S, spec: DiagramSpec) -> Self {
        Self { storage, spec }
    }
}

#[async_trait]
impl<S: Storage> Job for DiagramJob<S> {
    fn name(&self) -> String {
        format!("diagram {}", self.spec.file)
    }

    async fn prepare(&self) -> Result<Vec<PendingFile>> {
        let (w, h) = self.spec.figure.pixel_size();
        tracing::info!("🖼️ Rendering {} at {}x{} px...", self.spec.name, w, h);

        // 點陣化是純 CPU 工作，移出 async 執行緒
        let figure = self.spec.figure.clone();
        let data = tokio::task::spawn_blocking(move || render_png(&figure))
            .await
            .map_err(|e| ForgeError::ProcessingError {
                message: format!("render task failed: {}", e),
            })??;

        Ok(vec![PendingFile::new(self.spec.file.clone(), ArtifactKind::Png, data)])
    }

    async fn publish(&self, plan: Vec<PendingFile>) -> Result<Vec<Artifact>> {
        write_plan(&self.storage, plan).await
    }
}
