//! 把產品需求包裝成 [`Job`]，交給 [`crate::core::engine::AuthoringEngine`] 執行。

pub mod api_image;
pub mod deck;
pub mod diagram;
pub mod illustration;

pub use api_image::ApiImageJob;
pub use deck::DeckJob;
pub use diagram::DiagramJob;
pub use illustration::IllustrationJob;

use crate::app::products::ConceptProduct;
use crate::config::toml_config::RenderConfig;
use crate::domain::model::{Artifact, ArtifactKind};
use crate::domain::ports::{Job, PendingFile, Storage};
use crate::utils::error::Result;

/// 依序寫出檔案，既有檔案直接覆寫
pub(crate) async fn write_plan<S: Storage>(storage: &S, plan: Vec<PendingFile>) -> Result<Vec<Artifact>> {
    let mut written = Vec::with_capacity(plan.len());
    for file in plan {
        storage.write_file(&file.path, &file.data).await?;
        written.push(Artifact {
            path: file.path,
            kind: file.kind,
            bytes: file.data.len(),
        });
    }
    Ok(written)
}

/// 產品的簡報工作，只保留 `accepts` 接受的格式
pub fn deck_jobs<S, F>(product: &dyn ConceptProduct, storage: &S, accepts: F) -> Vec<Box<dyn Job>>
where
    S: Storage + Clone + 'static,
    F: Fn(ArtifactKind) -> bool,
{
    product
        .decks()
        .into_iter()
        .filter_map(|mut spec| {
            spec.formats.retain(|kind| accepts(*kind));
            if spec.formats.is_empty() {
                None
            } else {
                Some(Box::new(DeckJob::new(storage.clone(), spec)) as Box<dyn Job>)
            }
        })
        .collect()
}

/// 產品的圖表工作，`only` 指定時只算那一張
pub fn diagram_jobs<S>(
    product: &dyn ConceptProduct,
    render: &RenderConfig,
    storage: &S,
    only: Option<&str>,
) -> Vec<Box<dyn Job>>
where
    S: Storage + Clone + 'static,
{
    product
        .diagrams(render)
        .into_iter()
        .filter(|spec| only.map_or(true, |name| name == spec.name))
        .map(|spec| Box::new(DiagramJob::new(storage.clone(), spec)) as Box<dyn Job>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::find;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    #[test]
    fn test_deck_jobs_respect_format_filter() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let bubbler = find("bubbler").unwrap();
        let chillstream = find("chillstream").unwrap();

        assert_eq!(deck_jobs(bubbler.as_ref(), &storage, |_| true).len(), 1);
        assert_eq!(
            deck_jobs(bubbler.as_ref(), &storage, |k| k == ArtifactKind::Pdf).len(),
            1
        );
        // ChillStream 只有 PPTX
        assert!(deck_jobs(chillstream.as_ref(), &storage, |k| k == ArtifactKind::Pdf).is_empty());
    }

    #[test]
    fn test_diagram_jobs_filter_by_name() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
        let bubbler = find("bubbler").unwrap();
        let render = RenderConfig::default();

        assert_eq!(diagram_jobs(bubbler.as_ref(), &render, &storage, None).len(), 2);
        let only = diagram_jobs(bubbler.as_ref(), &render, &storage, Some("arrangement"));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].name(), "diagram bubbler/arrangement_options.png");
        assert!(diagram_jobs(bubbler.as_ref(), &render, &storage, Some("nope")).is_empty());
    }
}
