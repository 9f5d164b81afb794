use crate::domain::deck::Deck;
use crate::domain::model::{Artifact, ArtifactKind, DomDiagnostics, ImageCandidate};
use crate::domain::selector::ElementMatcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// 一個待寫出的檔案，路徑相對於輸出根目錄
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub path: String,
    pub kind: ArtifactKind,
    pub data: Vec<u8>,
}

impl PendingFile {
    pub fn new(path: impl Into<String>, kind: ArtifactKind, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            kind,
            data,
        }
    }
}

/// 單一產出工作：先在記憶體中準備，再寫出
#[async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> String;
    async fn prepare(&self) -> Result<Vec<PendingFile>>;
    async fn publish(&self, plan: Vec<PendingFile>) -> Result<Vec<Artifact>>;
}

/// 簡報引用的圖片檔內容，以 [`crate::domain::deck::Shape::Image`] 的路徑為鍵
pub type ImageAssets = HashMap<PathBuf, Vec<u8>>;

/// 把 [`Deck`] 序列化成單一檔案格式。缺少的圖片直接略過。
pub trait DeckRenderer: Send + Sync {
    fn kind(&self) -> ArtifactKind;
    fn render(&self, deck: &Deck, images: &ImageAssets) -> Result<Vec<u8>>;
}

/// 已開啟的聊天頁面，所有操作都在目前分頁進行
#[async_trait]
pub trait BrowserPage: Send + Sync {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;
    async fn current_url(&self) -> Result<String>;
    /// 元素存在且有版面尺寸
    async fn is_visible(&self, matcher: &ElementMatcher) -> Result<bool>;
    /// 元素在 DOM 裡即可，隱藏的也算
    async fn exists(&self, matcher: &ElementMatcher) -> Result<bool>;
    /// 找不到元素時回傳 `false`
    async fn click(&self, matcher: &ElementMatcher) -> Result<bool>;
    async fn press_key(&self, key: &str) -> Result<()>;
    async fn insert_text(&self, matcher: &ElementMatcher, text: &str) -> Result<bool>;
    async fn upload_file(&self, matcher: &ElementMatcher, file: &Path) -> Result<bool>;
    /// 目前套用中的 CSS 動畫名稱，每個元素一筆
    async fn animation_names(&self) -> Result<Vec<String>>;
    async fn image_candidates(&self, selector: &str) -> Result<Vec<ImageCandidate>>;
    /// 把指定 `src` 的圖片畫到 canvas，回傳 `data:` URL
    async fn canvas_data_url(&self, src: &str) -> Result<String>;
    async fn cookie_header(&self, url: &str) -> Result<String>;
    async fn user_agent(&self) -> Result<String>;
    async fn diagnostics(&self) -> Result<DomDiagnostics>;
    async fn close(&self) -> Result<()>;
}

/// 以文字提示產生圖片的服務
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>>;
}
