//! Chrome DevTools Protocol 實作（chromiumoxide）。
//!
//! 所有 DOM 操作都以一段 JavaScript 運算式完成，元素以 [`ElementMatcher::to_js`]
//! 產生的運算式定位。

use crate::config::toml_config::BrowserConfig as BrowserSettings;
use crate::domain::model::{DomDiagnostics, ImageCandidate};
use crate::domain::ports::BrowserPage;
use crate::domain::selector::{js_string, ElementMatcher};
use crate::utils::error::{ForgeError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

const ANIMATIONS_JS: &str = r#"(() => {
    const names = [];
    for (const el of document.querySelectorAll('*')) {
        const anim = window.getComputedStyle(el).animationName || '';
        if (anim && anim !== 'none') {
            names.push(anim);
        }
    }
    return names;
})()"#;

const DIAGNOSTICS_JS: &str = r#"(() => {
    const info = {};
    info.canvases = document.querySelectorAll('canvas').length;
    info.totalImages = document.querySelectorAll('img').length;

    const articles = document.querySelectorAll('article, [data-testid*="conversation-turn"]');
    info.articleCount = articles.length;

    const lastArticle = articles[articles.length - 1];
    if (lastArticle) {
        info.lastArticleHtml = lastArticle.innerHTML.substring(0, 10000);
        const srcs = [];
        for (const el of lastArticle.querySelectorAll('*')) {
            for (const attr of el.attributes) {
                const v = attr.value || '';
                if (v.includes('http') || v.includes('blob:') || v.includes('data:')) {
                    srcs.push(`${el.tagName}.${attr.name}=${v.substring(0, 150)}`);
                }
            }
        }
        info.urlAttributes = srcs;
    }

    info.allImgSrcs = Array.from(document.querySelectorAll('img')).map(img => {
        const box = img.getBoundingClientRect();
        return `${box.width.toFixed(0)}x${box.height.toFixed(0)} ${(img.src || '').substring(0, 120)}`;
    });
    return info;
})()"#;

/// 用持久化 profile 開啟的 Chromium 與其中一個分頁
pub struct ChromiumPage {
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: JoinHandle<()>,
    user_agent: String,
}

impl ChromiumPage {
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let profile = settings.profile_path();
        tracing::info!("🌐 Launching browser (profile: {})...", profile.display());

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&profile)
            .arg("--disable-blink-features=AutomationControlled")
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
                ..Viewport::default()
            });
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder
            .build()
            .map_err(|message| ForgeError::ConfigError { message })?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(SetUserAgentOverrideParams::new(settings.user_agent.clone()))
            .await?;

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
            user_agent: settings.user_agent.clone(),
        })
    }

    async fn eval<T: DeserializeOwned>(&self, expression: String) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|message| ForgeError::ProcessingError { message })?;
        let result = self.page.evaluate_expression(params).await?;
        Ok(result.into_value::<T>()?)
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => {
                // 頁面可能仍在載入長輪詢資源，DOM 已可操作就繼續
                tracing::warn!("⚠️ Navigation to {} did not settle within {:?}", url, timeout);
                Ok(())
            }
        }
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn is_visible(&self, matcher: &ElementMatcher) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; return !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()",
            matcher.to_js()
        ))
        .await
    }

    async fn exists(&self, matcher: &ElementMatcher) -> Result<bool> {
        self.eval(format!("!!({})", matcher.to_js())).await
    }

    async fn click(&self, matcher: &ElementMatcher) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; el.scrollIntoView({{block: 'center'}}); el.click(); return true; }})()",
            matcher.to_js()
        ))
        .await
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let target = match self.page.find_element(":focus").await {
            Ok(el) => el,
            Err(_) => self.page.find_element("body").await?,
        };
        target.press_key(key).await?;
        Ok(())
    }

    async fn insert_text(&self, matcher: &ElementMatcher, text: &str) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; el.focus(); document.execCommand('insertText', false, {}); return true; }})()",
            matcher.to_js(),
            js_string(text)
        ))
        .await
    }

    async fn upload_file(&self, matcher: &ElementMatcher, file: &Path) -> Result<bool> {
        let selector = match matcher {
            ElementMatcher::Css(selector) => selector,
            ElementMatcher::Text { .. } => return Ok(false),
        };
        let element = match self.page.find_element(selector.as_str()).await {
            Ok(el) => el,
            Err(_) => return Ok(false),
        };

        let path = std::fs::canonicalize(file)?;
        let params = SetFileInputFilesParams::builder()
            .file(path.to_string_lossy().to_string())
            .backend_node_id(element.backend_node_id)
            .build()
            .map_err(|message| ForgeError::ProcessingError { message })?;
        self.page.execute(params).await?;
        Ok(true)
    }

    async fn animation_names(&self) -> Result<Vec<String>> {
        self.eval(ANIMATIONS_JS.to_string()).await
    }

    async fn image_candidates(&self, selector: &str) -> Result<Vec<ImageCandidate>> {
        self.eval(format!(
            "Array.from(document.querySelectorAll({})).map((img, index) => {{ const r = img.getBoundingClientRect(); return {{ index, src: img.getAttribute('src') || img.src || '', width: r.width, height: r.height }}; }})",
            js_string(selector)
        ))
        .await
    }

    async fn canvas_data_url(&self, src: &str) -> Result<String> {
        let data_url: Option<String> = self
            .eval(format!(
                "(() => {{ const src = {}; const img = Array.from(document.images).find(i => i.getAttribute('src') === src || i.src === src); if (!img) return null; const canvas = document.createElement('canvas'); canvas.width = img.naturalWidth; canvas.height = img.naturalHeight; canvas.getContext('2d').drawImage(img, 0, 0); return canvas.toDataURL('image/png'); }})()",
                js_string(src)
            ))
            .await?;
        data_url.ok_or_else(|| ForgeError::CanvasExtractionFailed {
            message: "image element disappeared before canvas extraction".to_string(),
        })
    }

    async fn cookie_header(&self, url: &str) -> Result<String> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();
        let cookies = self.page.get_cookies().await?;
        let pairs: Vec<String> = cookies
            .iter()
            .filter(|c| {
                let domain = c.domain.trim_start_matches('.');
                host == domain || host.ends_with(&format!(".{}", domain))
            })
            .map(|c| format!("{}={}", c.name, c.value))
            .collect();
        Ok(pairs.join("; "))
    }

    async fn user_agent(&self) -> Result<String> {
        Ok(self.user_agent.clone())
    }

    async fn diagnostics(&self) -> Result<DomDiagnostics> {
        self.eval(DIAGNOSTICS_JS.to_string()).await
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                tracing::debug!("Browser process wait failed: {}", e);
            }
        }
        self.handler.abort();
        Ok(())
    }
}
