//! 聊天介面的操作流程：登入、送出提示、等待生成、取回圖片。

use crate::config::toml_config::ForgeConfig;
use crate::core::extraction::ImageExtractor;
use crate::core::generation::{GenerationWatcher, WatchOutcome};
use crate::core::selectors::{click_first, find_first, find_present, wait_for_any};
use crate::domain::ports::BrowserPage;
use crate::utils::error::{ForgeError, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const PROMPT_INPUT_TIMEOUT: Duration = Duration::from_secs(10);
const LOGIN_INPUT_TIMEOUT: Duration = Duration::from_secs(3);
const SEND_BUTTON_TIMEOUT: Duration = Duration::from_secs(3);

pub struct ChatSession<'a, P: BrowserPage + ?Sized> {
    page: &'a P,
    config: &'a ForgeConfig,
    extractor: ImageExtractor<'a>,
}

impl<'a, P: BrowserPage + ?Sized> ChatSession<'a, P> {
    pub fn new(page: &'a P, config: &'a ForgeConfig) -> Self {
        Self {
            page,
            config,
            extractor: ImageExtractor::new(&config.extraction),
        }
    }

    pub fn with_extractor(mut self, extractor: ImageExtractor<'a>) -> Self {
        self.extractor = extractor;
        self
    }

    /// 完整流程，回傳生成圖片的位元組
    pub async fn run(&self, prompt: &str, reference: Option<&Path>) -> Result<Vec<u8>> {
        let timing = &self.config.timing;

        tracing::info!("🌐 Navigating to {}...", self.config.browser.chat_url);
        self.page
            .navigate(&self.config.browser.chat_url, timing.navigation_timeout())
            .await?;
        sleep(timing.settle()).await;

        self.dismiss_desktop_prompt().await?;
        self.wait_for_login().await?;
        sleep(Duration::from_secs(1)).await;
        self.dismiss_desktop_prompt().await?;

        tracing::info!("📤 Sending prompt...");
        if let Some(reference) = reference {
            self.upload_reference(reference).await?;
        }
        self.type_and_send(prompt).await?;

        tracing::info!("🎨 Waiting for image generation...");
        let outcome = self.wait_for_generation().await;
        tracing::debug!("Generation watch finished: {:?}", outcome);

        tracing::info!("⬇️ Downloading image...");
        self.extractor.extract(self.page).await
    }

    /// 關掉「開啟桌面版」提示：點第一個找到的按鈕，都沒有就按 Escape
    pub async fn dismiss_desktop_prompt(&self) -> Result<bool> {
        if let Some(matcher) = click_first(self.page, &self.config.selectors.dismiss_prompt).await? {
            tracing::info!("🙅 Dismissed desktop app prompt: {}", matcher);
            sleep(Duration::from_millis(1000)).await;
            return Ok(true);
        }

        if let Err(e) = self.page.press_key("Escape").await {
            tracing::debug!("Escape key press failed: {}", e);
        }
        sleep(Duration::from_millis(500)).await;
        Ok(false)
    }

    fn is_logged_in_url(&self, url: &str) -> bool {
        let host = self.config.browser.chat_host().unwrap_or_default();
        !host.is_empty() && url.contains(&host) && !url.contains("/auth/") && !url.contains("accounts.google")
    }

    /// 導向登入頁並等待使用者手動登入
    pub async fn wait_for_login(&self) -> Result<()> {
        let timing = &self.config.timing;
        tracing::info!("🔐 Navigating to login page...");
        self.page
            .navigate(&self.config.browser.login_url, timing.navigation_timeout())
            .await?;
        tracing::info!("🔐 Please log in manually in the browser window.");
        tracing::info!(
            "⏳ Waiting up to {}s for login to complete...",
            timing.login_timeout_secs
        );

        let deadline = Instant::now() + timing.login_timeout();
        while Instant::now() < deadline {
            let url = match self.page.current_url().await {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Could not read page URL: {}", e);
                    sleep(timing.login_poll()).await;
                    continue;
                }
            };

            if self.is_logged_in_url(&url) {
                if let Err(e) = self.page.press_key("Escape").await {
                    tracing::debug!("Escape key press failed: {}", e);
                }
                sleep(Duration::from_millis(1000)).await;

                let modal = find_first(self.page, &self.config.selectors.login_modal).await?;
                if modal.is_none() {
                    let input = wait_for_any(
                        self.page,
                        "prompt_input",
                        &self.config.selectors.prompt_input,
                        LOGIN_INPUT_TIMEOUT,
                    )
                    .await?;
                    if input.is_some() {
                        tracing::info!("✅ Login confirmed.");
                        return Ok(());
                    }
                    tracing::info!("🔎 On chat page but prompt input not found yet...");
                }
            }
            sleep(timing.login_poll()).await;
        }

        Err(ForgeError::LoginTimeout {
            seconds: timing.login_timeout_secs,
        })
    }

    /// 上傳參考圖片；檔案不存在或找不到上傳欄位時只警告
    pub async fn upload_reference(&self, image: &Path) -> Result<bool> {
        if !image.exists() {
            tracing::warn!(
                "⚠️ Reference image not found: {}, skipping upload.",
                image.display()
            );
            return Ok(false);
        }

        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        tracing::info!("📎 Uploading reference image: {}...", name);

        // 檔案欄位通常是隱藏的，只看是否存在；完全沒有才去點附件按鈕
        let selectors = &self.config.selectors;
        let mut input = find_present(self.page, &selectors.file_input).await?;
        if input.is_none() {
            if let Some(matcher) = click_first(self.page, &selectors.attach_button).await? {
                tracing::info!("📎 Clicked attach button: {}", matcher);
                sleep(Duration::from_millis(1000)).await;
            }
            input = find_present(self.page, &selectors.file_input).await?;
        }

        let Some(matcher) = input else {
            tracing::warn!("⚠️ Could not find file input element. Proceeding without image.");
            return Ok(false);
        };

        if self.page.upload_file(matcher, image).await? {
            tracing::info!("📎 Uploaded {}", name);
            sleep(self.config.timing.upload_settle()).await;
            Ok(true)
        } else {
            tracing::warn!("⚠️ Could not find file input element. Proceeding without image.");
            Ok(false)
        }
    }

    /// 把提示貼進輸入框並送出
    pub async fn type_and_send(&self, prompt: &str) -> Result<()> {
        let selectors = &self.config.selectors;
        let input = wait_for_any(
            self.page,
            "prompt_input",
            &selectors.prompt_input,
            PROMPT_INPUT_TIMEOUT,
        )
        .await?
        .ok_or_else(|| ForgeError::ProcessingError {
            message: "Could not find prompt input".to_string(),
        })?;

        self.page.click(input).await?;
        sleep(Duration::from_millis(300)).await;

        if !self.page.insert_text(input, prompt).await? {
            return Err(ForgeError::ProcessingError {
                message: format!("Prompt input '{}' disappeared before typing", input),
            });
        }
        tracing::info!("📋 Pasted prompt ({} chars)", prompt.chars().count());
        sleep(Duration::from_millis(1000)).await;

        match wait_for_any(self.page, "send_button", &selectors.send_button, SEND_BUTTON_TIMEOUT).await? {
            Some(button) => {
                self.page.click(button).await?;
                tracing::info!("🚀 Clicked send button.");
            }
            None => {
                tracing::info!("⌨️ Send button not found, pressing Enter.");
                self.page.press_key("Enter").await?;
            }
        }

        sleep(Duration::from_millis(1000)).await;
        Ok(())
    }

    pub async fn wait_for_generation(&self) -> WatchOutcome {
        let timing = &self.config.timing;
        GenerationWatcher::new(
            &self.config.generation.ignored_animations,
            timing.generation_poll(),
            timing.generation_timeout(),
            timing.settle(),
        )
        .with_stop_button(&self.config.selectors.stop_button)
        .with_completion(&self.config.selectors.completion)
        .watch(self.page)
        .await
    }
}
