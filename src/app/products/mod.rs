//! 產品內容：每個產品提供自己的簡報、圖表與插圖需求。

pub mod bubbler;
mod carousel;
pub mod chillstream;
pub mod popcorn;
pub mod shusher;
pub mod toothbrush;

use crate::config::toml_config::RenderConfig;
use crate::domain::deck::Deck;
use crate::domain::figure::Figure;
use crate::domain::model::ArtifactKind;

/// 一份簡報與要輸出的格式
#[derive(Debug, Clone)]
pub struct DeckSpec {
    /// 輸出檔名（不含副檔名），相對於輸出目錄
    pub stem: String,
    pub formats: Vec<ArtifactKind>,
    pub deck: Deck,
}

impl DeckSpec {
    pub fn file_for(&self, kind: ArtifactKind) -> String {
        format!("{}.{}", self.stem, kind.extension())
    }
}

#[derive(Debug, Clone)]
pub struct DiagramSpec {
    pub name: &'static str,
    pub file: String,
    pub figure: Figure,
}

/// 透過聊天網頁產生插圖的輸入
#[derive(Debug, Clone, PartialEq)]
pub struct ChatIllustrationSpec {
    pub prompt_prefix: &'static str,
    /// 相對於 `output.assets_dir`
    pub design_files: Vec<String>,
    /// 相對於輸出目錄，通常是先前算圖的產物
    pub reference_image: Option<String>,
    pub output_file: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiImageSpec {
    pub prompt: &'static str,
    pub output_file: String,
}

pub trait ConceptProduct: Send + Sync {
    fn key(&self) -> &'static str;
    fn display_name(&self) -> &'static str;

    fn decks(&self) -> Vec<DeckSpec> {
        Vec::new()
    }

    fn diagrams(&self, _render: &RenderConfig) -> Vec<DiagramSpec> {
        Vec::new()
    }

    fn chat_illustration(&self) -> Option<ChatIllustrationSpec> {
        None
    }

    fn api_images(&self) -> Vec<ApiImageSpec> {
        Vec::new()
    }
}

pub fn registry() -> Vec<Box<dyn ConceptProduct>> {
    vec![
        Box::new(bubbler::Bubbler),
        Box::new(chillstream::ChillStream),
        Box::new(shusher::Shusher),
        Box::new(toothbrush::Toothbrush),
        Box::new(popcorn::Popcorn),
    ]
}

pub fn find(key: &str) -> Option<Box<dyn ConceptProduct>> {
    registry().into_iter().find(|p| p.key() == key)
}

/// 產品資料夾下的相對路徑
pub(crate) fn product_path(product: &str, file: &str) -> String {
    format!("{}/{}", product, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_products() {
        assert_eq!(find("bubbler").map(|p| p.display_name()), Some("Bubbler"));
        assert!(find("chillstream").is_some());
        assert!(find("shusher").is_some());
        assert_eq!(
            find("toothbrush").map(|p| p.display_name()),
            Some("Consumable Electric Toothbrush")
        );
        assert_eq!(find("popcorn").map(|p| p.display_name()), Some("Pop!"));
        assert!(find("toaster").is_none());
    }

    #[test]
    fn test_registry_keys_are_unique() {
        let keys: Vec<&str> = registry().iter().map(|p| p.key()).collect();
        let mut deduped = keys.clone();
        deduped.dedup();
        assert_eq!(keys, deduped);
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn test_deck_file_names() {
        let spec = DeckSpec {
            stem: "bubbler/Bubbler_Carousel".to_string(),
            formats: vec![ArtifactKind::Pdf],
            deck: Deck::new("t", 1.0, 1.0),
        };
        assert_eq!(spec.file_for(ArtifactKind::Pptx), "bubbler/Bubbler_Carousel.pptx");
    }
}
