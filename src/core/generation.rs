//! 以 CSS 動畫判斷圖片生成進度。
//!
//! 生成中頁面會出現 spinner/shimmer 類動畫，完成後消失；輸入框上常駐的
//! 動畫（預設 `edge-fade`）不列入計算。

use crate::core::selectors::find_first;
use crate::domain::ports::BrowserPage;
use crate::domain::selector::SelectorChain;
use crate::utils::error::Result;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
    Complete,
    TimedOut,
}

impl GenerationState {
    /// 依一次取樣（是否有進行中的動畫）推進狀態
    pub fn advance(self, active: bool) -> Self {
        match (self, active) {
            (GenerationState::Idle, true) => GenerationState::Generating,
            (GenerationState::Idle, false) => GenerationState::Idle,
            (GenerationState::Generating, true) => GenerationState::Generating,
            (GenerationState::Generating, false) => GenerationState::Complete,
            (terminal, _) => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationState::Complete | GenerationState::TimedOut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOutcome {
    pub state: GenerationState,
    /// 從開始等待到判定完成（或逾時）的時間，不含穩定等待
    pub elapsed: Duration,
    pub samples: usize,
}

/// 過濾掉常駐動畫
pub fn active_animations(names: &[String], ignored: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !name.is_empty() && name.as_str() != "none")
        .filter(|name| !ignored.iter().any(|i| i == *name))
        .cloned()
        .collect()
}

pub struct GenerationWatcher<'a> {
    ignored: &'a [String],
    stop_button: Option<&'a SelectorChain>,
    completion: Option<&'a SelectorChain>,
    poll: Duration,
    timeout: Duration,
    settle: Duration,
}

impl<'a> GenerationWatcher<'a> {
    pub fn new(ignored: &'a [String], poll: Duration, timeout: Duration, settle: Duration) -> Self {
        Self {
            ignored,
            stop_button: None,
            completion: None,
            poll,
            timeout,
            settle,
        }
    }

    /// 「停止生成」按鈕可見時也視為生成中
    pub fn with_stop_button(mut self, chain: &'a SelectorChain) -> Self {
        self.stop_button = Some(chain);
        self
    }

    /// 生成開始後，最新回覆的完成標記（例如複製按鈕）出現就視為完成，
    /// 即使頁面上還殘留其他動畫
    pub fn with_completion(mut self, chain: &'a SelectorChain) -> Self {
        self.completion = Some(chain);
        self
    }

    async fn sample<P: BrowserPage + ?Sized>(&self, page: &P, state: GenerationState) -> Result<Vec<String>> {
        let names = page.animation_names().await?;
        let mut active = active_animations(&names, self.ignored);
        if active.is_empty() {
            if let Some(chain) = self.stop_button {
                if find_first(page, chain).await?.is_some() {
                    active.push("stop-button".to_string());
                }
            }
        } else if state == GenerationState::Generating {
            if let Some(chain) = self.completion {
                if let Some(marker) = find_first(page, chain).await? {
                    tracing::debug!("🏁 Completion marker visible: {}", marker);
                    active.clear();
                }
            }
        }
        Ok(active)
    }

    /// 輪詢直到完成或逾時；逾時不是錯誤，呼叫端仍會嘗試擷取圖片
    pub async fn watch<P: BrowserPage + ?Sized>(&self, page: &P) -> WatchOutcome {
        tracing::info!("⏳ Waiting for generation to complete...");
        let start = Instant::now();
        let deadline = start + self.timeout;
        let mut state = GenerationState::Idle;
        let mut samples = 0;

        while Instant::now() < deadline {
            let elapsed = start.elapsed().as_secs();
            match self.sample(page, state).await {
                Ok(active) => {
                    samples += 1;
                    state = state.advance(!active.is_empty());
                    match state {
                        GenerationState::Generating => {
                            let unique: BTreeSet<&str> = active.iter().map(String::as_str).collect();
                            tracing::info!(
                                "🎨 [{}s] Generating... ({} active: {})",
                                elapsed,
                                active.len(),
                                unique.into_iter().collect::<Vec<_>>().join(", ")
                            );
                        }
                        GenerationState::Complete => {
                            let detected = start.elapsed();
                            tracing::info!("✅ [{}s] Generation complete.", elapsed);
                            sleep(self.settle).await;
                            return WatchOutcome {
                                state,
                                elapsed: detected,
                                samples,
                            };
                        }
                        _ => tracing::info!("⌛ [{}s] Waiting for generation to start...", elapsed),
                    }
                }
                Err(e) => {
                    tracing::warn!("⚠️ [{}s] Animation sample failed: {}", elapsed, e);
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(self.poll.min(remaining)).await;
        }

        tracing::warn!("⚠️ Generation timeout reached. Attempting image download anyway.");
        WatchOutcome {
            state: GenerationState::TimedOut,
            elapsed: start.elapsed(),
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let s = GenerationState::Idle;
        assert_eq!(s.advance(false), GenerationState::Idle);
        let s = s.advance(true);
        assert_eq!(s, GenerationState::Generating);
        assert_eq!(s.advance(true), GenerationState::Generating);
        let s = s.advance(false);
        assert_eq!(s, GenerationState::Complete);
        assert!(s.is_terminal());
        assert_eq!(s.advance(true), GenerationState::Complete);
    }

    #[test]
    fn test_ignored_animations_are_filtered() {
        let names = vec![
            "edge-fade".to_string(),
            "none".to_string(),
            "spin".to_string(),
            "loading-shimmer".to_string(),
        ];
        let ignored = vec!["edge-fade".to_string()];
        assert_eq!(active_animations(&names, &ignored), vec!["spin", "loading-shimmer"]);
    }
}
