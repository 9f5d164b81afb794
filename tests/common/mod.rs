#![allow(dead_code)]

use async_trait::async_trait;
use concept_forge::domain::model::{DomDiagnostics, ImageCandidate};
use concept_forge::domain::ports::BrowserPage;
use concept_forge::domain::selector::ElementMatcher;
use concept_forge::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

pub const FAKE_USER_AGENT: &str = "FakeAgent/1.0";

/// 照腳本回應的假頁面，並記錄收到的操作
#[derive(Default)]
pub struct FakePage {
    url: Mutex<String>,
    /// 導向含 `/auth/` 的網址後回報的網址，空字串表示停在原地
    landing_url: String,
    visible: HashSet<String>,
    /// 在 DOM 裡但沒有版面尺寸的元素
    hidden: HashSet<String>,
    /// 最後一筆會一直重複
    animations: Mutex<VecDeque<Vec<String>>>,
    candidates: HashMap<String, Vec<ImageCandidate>>,
    canvas_result: String,
    cookies: String,
    events: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
            ..Self::default()
        }
    }

    pub fn landing(mut self, url: &str) -> Self {
        self.landing_url = url.to_string();
        self
    }

    pub fn visible(mut self, matchers: &[&str]) -> Self {
        self.visible.extend(matchers.iter().map(|m| m.to_string()));
        self
    }

    pub fn hidden(mut self, matchers: &[&str]) -> Self {
        self.hidden.extend(matchers.iter().map(|m| m.to_string()));
        self
    }

    pub fn animations(self, script: Vec<Vec<&str>>) -> Self {
        *self.animations.lock().unwrap() = script
            .into_iter()
            .map(|names| names.into_iter().map(str::to_string).collect())
            .collect();
        self
    }

    pub fn images(mut self, selector: &str, images: Vec<(&str, f64, f64)>) -> Self {
        let list = images
            .into_iter()
            .enumerate()
            .map(|(index, (src, width, height))| ImageCandidate {
                index,
                src: src.to_string(),
                width,
                height,
            })
            .collect();
        self.candidates.insert(selector.to_string(), list);
        self
    }

    pub fn canvas(mut self, data_url: &str) -> Self {
        self.canvas_result = data_url.to_string();
        self
    }

    pub fn cookies(mut self, header: &str) -> Self {
        self.cookies = header.to_string();
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("navigate {}", url));
        let target = if url.contains("/auth/") && !self.landing_url.is_empty() {
            self.landing_url.clone()
        } else {
            url.to_string()
        };
        *self.url.lock().unwrap() = target;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn is_visible(&self, matcher: &ElementMatcher) -> Result<bool> {
        Ok(self.visible.contains(&matcher.to_string()))
    }

    async fn exists(&self, matcher: &ElementMatcher) -> Result<bool> {
        let key = matcher.to_string();
        Ok(self.visible.contains(&key) || self.hidden.contains(&key))
    }

    async fn click(&self, matcher: &ElementMatcher) -> Result<bool> {
        if self.visible.contains(&matcher.to_string()) {
            self.record(format!("click {}", matcher));
            return Ok(true);
        }
        Ok(false)
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        self.record(format!("key {}", key));
        Ok(())
    }

    async fn insert_text(&self, matcher: &ElementMatcher, text: &str) -> Result<bool> {
        self.record(format!("insert {} chars into {}", text.chars().count(), matcher));
        Ok(self.visible.contains(&matcher.to_string()))
    }

    async fn upload_file(&self, matcher: &ElementMatcher, file: &Path) -> Result<bool> {
        if !self.exists(matcher).await? {
            return Ok(false);
        }
        let name = file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        self.record(format!("upload {}", name));
        Ok(true)
    }

    async fn animation_names(&self) -> Result<Vec<String>> {
        let mut script = self.animations.lock().unwrap();
        let names = if script.len() > 1 {
            script.pop_front().unwrap_or_default()
        } else {
            script.front().cloned().unwrap_or_default()
        };
        Ok(names)
    }

    async fn image_candidates(&self, selector: &str) -> Result<Vec<ImageCandidate>> {
        Ok(self.candidates.get(selector).cloned().unwrap_or_default())
    }

    async fn canvas_data_url(&self, src: &str) -> Result<String> {
        self.record(format!("canvas {}", src));
        Ok(self.canvas_result.clone())
    }

    async fn cookie_header(&self, _url: &str) -> Result<String> {
        Ok(self.cookies.clone())
    }

    async fn user_agent(&self) -> Result<String> {
        Ok(FAKE_USER_AGENT.to_string())
    }

    async fn diagnostics(&self) -> Result<DomDiagnostics> {
        self.record("diagnostics".to_string());
        Ok(DomDiagnostics::default())
    }

    async fn close(&self) -> Result<()> {
        self.record("close".to_string());
        Ok(())
    }
}

/// 小張 PNG，給需要真實圖檔的測試用
pub fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0, 155, 245]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
