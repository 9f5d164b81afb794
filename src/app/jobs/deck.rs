use super::write_plan;
use crate::adapters::{PdfRenderer, PptxRenderer};
use crate::app::products::DeckSpec;
use crate::domain::model::{Artifact, ArtifactKind};
use crate::domain::ports::{DeckRenderer, ImageAssets, Job, PendingFile, Storage};
use crate::utils::error::{ForgeError, Result};
use async_trait::async_trait;

fn renderer_for(kind: ArtifactKind) -> Result<Box<dyn DeckRenderer>> {
    match kind {
        ArtifactKind::Pdf => Ok(Box::new(PdfRenderer)),
        ArtifactKind::Pptx => Ok(Box::new(PptxRenderer)),
        other => Err(ForgeError::RenderError {
            message: format!("no deck renderer for {:?}", other),
        }),
    }
}

/// 一份簡報輸出成一或多種格式
pub struct DeckJob<S: Storage> {
    storage: S,
    spec: DeckSpec,
}

impl<S: Storage> DeckJob<S> {
    pub fn new(storage: S, spec: DeckSpec) -> Self {
        Self { storage, spec }
    }

    /// 讀入簡報引用的圖片；缺少的只警告，渲染時略過
    async fn load_images(&self) -> Result<ImageAssets> {
        let mut images = ImageAssets::new();
        for path in self.spec.deck.image_paths() {
            let key = path.to_string_lossy();
            if !self.storage.exists(&key).await {
                tracing::warn!("⚠️ Image not found, skipping: {} (render its diagram first)", key);
                continue;
            }
            let data = self.storage.read_file(&key).await?;
            tracing::debug!("Loaded image {} ({} bytes)", key, data.len());
            images.insert(path.clone(), data);
        }
        Ok(images)
    }
}

#[async_trait]
impl<S: Storage> Job for DeckJob<S> {
    fn name(&self) -> String {
        format!("deck {}", self.spec.stem)
    }

    async fn prepare(&self) -> Result<Vec<PendingFile>> {
        let images = self.load_images().await?;
        let mut plan = Vec::with_capacity(self.spec.formats.len());
        for kind in &self.spec.formats {
            let renderer = renderer_for(*kind)?;
            let data = renderer.render(&self.spec.deck, &images)?;
            tracing::debug!(
                "Rendered {} slides as {:?} ({} bytes)",
                self.spec.deck.slides.len(),
                kind,
                data.len()
            );
            plan.push(PendingFile::new(self.spec.file_for(*kind), *kind, data));
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
    use crate::domain::deck::{Deck, Frame, ImageFit, Shape, Slide};
    use crate::domain::model::Color;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn spec_with_image() -> DeckSpec {
        let mut deck = Deck::new("t", 200.0, 100.0);
        let mut slide = Slide::new(Color::BLACK);
        slide.push(Shape::Image {
            frame: Frame::new(0.0, 0.0, 50.0, 50.0),
            path: PathBuf::from("p/missing.png"),
            fit: ImageFit::Contain,
        });
        deck.slides.push(slide);
        DeckSpec {
            stem: "p/Deck".to_string(),
            formats: vec![ArtifactKind::Pdf, ArtifactKind::Pptx],
            deck,
        }
    }

    #[tokio::test]
    async fn test_missing_image_still_produces_every_format() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let job = DeckJob::new(storage, spec_with_image());

        let plan = job.prepare().await.unwrap();
        let paths: Vec<&str> = plan.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["p/Deck.pdf", "p/Deck.pptx"]);

        let written = job.publish(plan).await.unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("p/Deck.pdf").is_file());
        assert!(dir.path().join("p/Deck.pptx").is_file());
    }

    #[test]
    fn test_png_is_not_a_deck_format() {
        assert!(renderer_for(ArtifactKind::Png).is_err());
        assert_eq!(renderer_for(ArtifactKind::Pptx).unwrap().kind(), ArtifactKind::Pptx);
    }
}
