use crate::config::toml_config::ExtractionConfig;
use crate::domain::model::ImageCandidate;
use crate::domain::ports::BrowserPage;
use crate::utils::error::{ForgeError, Result};
use base64::Engine as _;
use reqwest::header::{COOKIE, USER_AGENT};
use url::Url;

/// 圖片的取得方式，依 `src` 判斷
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Http(String),
    Blob(String),
    Data(String),
}

impl ImageSource {
    /// 相對路徑以頁面網址為基準解析
    pub fn classify(src: &str, page_url: &str) -> Result<Self> {
        if src.starts_with("blob:") {
            return Ok(ImageSource::Blob(src.to_string()));
        }
        if src.starts_with("data:") {
            return Ok(ImageSource::Data(src.to_string()));
        }
        let resolved = match Url::parse(src) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url)
                .and_then(|base| base.join(src))
                .map_err(|e| ForgeError::ProcessingError {
                    message: format!("Cannot resolve image URL '{}': {}", src, e),
                })?,
            Err(e) => {
                return Err(ForgeError::ProcessingError {
                    message: format!("Invalid image URL '{}': {}", src, e),
                })
            }
        };
        Ok(ImageSource::Http(resolved.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundImage {
    pub candidate: ImageCandidate,
    /// 命中的選擇器，寬鬆搜尋時為 `img`
    pub strategy: String,
}

/// `data:image/png;base64,....` 解碼
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let (header, payload) =
        data_url
            .split_once(',')
            .ok_or_else(|| ForgeError::CanvasExtractionFailed {
                message: "data URL has no payload".to_string(),
            })?;
    if !header.ends_with(";base64") {
        return Err(ForgeError::CanvasExtractionFailed {
            message: format!("unsupported data URL encoding: {}", header),
        });
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}

pub struct ImageExtractor<'a> {
    config: &'a ExtractionConfig,
    client: reqwest::Client,
}

impl<'a> ImageExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(config: &'a ExtractionConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn strategies_count(&self) -> usize {
        self.config.image_selectors.len() + 1
    }

    /// 先找最後一則回覆內的圖片，再退回整頁的大圖
    pub async fn find_image<P: BrowserPage + ?Sized>(&self, page: &P) -> Result<Option<FoundImage>> {
        let min_scoped = self.config.min_scoped_side as f64;
        for selector in &self.config.image_selectors {
            let candidates = page.image_candidates(selector).await?;
            if let Some(candidate) = candidates
                .into_iter()
                .find(|c| c.width > min_scoped && c.height > min_scoped)
            {
                tracing::info!("🖼️ Found image via: {}", selector);
                return Ok(Some(FoundImage {
                    candidate,
                    strategy: selector.clone(),
                }));
            }
        }

        tracing::info!("🔍 Trying broad image search...");
        let min_broad = self.config.min_broad_side as f64;
        let broad = page.image_candidates("img").await?;
        let found = broad.into_iter().find(|c| {
            c.width > min_broad
                && c.height > min_broad
                && !self
                    .config
                    .exclude_patterns
                    .iter()
                    .any(|p| c.src.contains(p.as_str()))
        });

        Ok(found.map(|candidate| {
            tracing::info!(
                "🖼️ Found large image (broad search): {}",
                truncate(&candidate.src, 80)
            );
            FoundImage {
                candidate,
                strategy: "img".to_string(),
            }
        }))
    }

    pub async fn fetch<P: BrowserPage + ?Sized>(&self, page: &P, image: &FoundImage) -> Result<Vec<u8>> {
        let src = &image.candidate.src;
        tracing::info!("🔗 Image src: {}...", truncate(src, 120));
        let page_url = page.current_url().await?;

        match ImageSource::classify(src, &page_url)? {
            ImageSource::Blob(blob) => {
                tracing::info!("🧪 Blob URL detected, extracting via canvas...");
                let data_url = page.canvas_data_url(&blob).await?;
                if !data_url.starts_with("data:image") {
                    return Err(ForgeError::CanvasExtractionFailed {
                        message: format!("canvas returned '{}'", truncate(&data_url, 40)),
                    });
                }
                decode_data_url(&data_url)
            }
            ImageSource::Data(data_url) => {
                tracing::info!("🧪 Inline data URL detected, decoding...");
                decode_data_url(&data_url)
            }
            ImageSource::Http(url) => self.download(page, &url).await,
        }
    }

    /// 帶著瀏覽器的 cookie 與 UA 下載
    async fn download<P: BrowserPage + ?Sized>(&self, page: &P, url: &str) -> Result<Vec<u8>> {
        tracing::info!("⬇️ Downloading image over HTTP...");
        let cookies = page.cookie_header(url).await?;
        let user_agent = page.user_agent().await?;

        let mut request = self.client.get(url).header(USER_AGENT, user_agent);
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.as_u16() != 200 {
            return Err(ForgeError::DownloadFailed {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// 找圖並取回位元組；找不到時先輸出頁面診斷資訊
    pub async fn extract<P: BrowserPage + ?Sized>(&self, page: &P) -> Result<Vec<u8>> {
        match self.find_image(page).await? {
            Some(found) => self.fetch(page, &found).await,
            None => {
                self.log_diagnostics(page).await;
                Err(ForgeError::NoImageFound {
                    strategies_tried: self.strategies_count(),
                })
            }
        }
    }

    async fn log_diagnostics<P: BrowserPage + ?Sized>(&self, page: &P) {
        match page.image_candidates("img").await {
            Ok(all) => {
                tracing::warn!("🐛 Found {} total <img> elements on page:", all.len());
                for c in &all {
                    tracing::warn!(
                        "    [{}] {:.0}x{:.0} {}",
                        c.index,
                        c.width,
                        c.height,
                        truncate(&c.src, 100)
                    );
                }
            }
            Err(e) => tracing::warn!("🐛 Could not list images: {}", e),
        }

        match page.diagnostics().await {
            Ok(info) => {
                tracing::warn!("🐛 DOM info:");
                tracing::warn!("    canvases: {}", info.canvases);
                tracing::warn!("    totalImages: {}", info.total_images);
                tracing::warn!("    articleCount: {}", info.article_count);
                if let Some(html) = &info.last_article_html {
                    tracing::warn!("    lastArticleHTML: {}", truncate(html, 500));
                }
                tracing::warn!("    urlAttributes: {:?}", info.url_attributes);
                tracing::warn!("    allImgSrcs: {:?}", info.all_img_srcs);
            }
            Err(e) => tracing::warn!("🐛 Could not collect DOM diagnostics: {}", e),
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sources() {
        let page = "https://chatgpt.com/c/abc";
        assert_eq!(
            ImageSource::classify("blob:https://chatgpt.com/123", page).unwrap(),
            ImageSource::Blob("blob:https://chatgpt.com/123".to_string())
        );
        assert!(matches!(
            ImageSource::classify("data:image/png;base64,AAAA", page).unwrap(),
            ImageSource::Data(_)
        ));
        assert_eq!(
            ImageSource::classify("/backend-api/estuary/content?id=1", page).unwrap(),
            ImageSource::Http("https://chatgpt.com/backend-api/estuary/content?id=1".to_string())
        );
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("not-a-data-url").is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
