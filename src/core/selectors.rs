use crate::domain::ports::BrowserPage;
use crate::domain::selector::{ElementMatcher, SelectorChain};
use crate::utils::error::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const VISIBILITY_POLL: Duration = Duration::from_millis(250);

/// 依序檢查清單，回傳第一個目前可見的比對
pub async fn find_first<'a, P: BrowserPage + ?Sized>(
    page: &P,
    chain: &'a SelectorChain,
) -> Result<Option<&'a ElementMatcher>> {
    for matcher in chain.iter() {
        if page.is_visible(matcher).await? {
            return Ok(Some(matcher));
        }
    }
    Ok(None)
}

/// 同 [`find_first`]，但只要求元素存在於 DOM
pub async fn find_present<'a, P: BrowserPage + ?Sized>(
    page: &P,
    chain: &'a SelectorChain,
) -> Result<Option<&'a ElementMatcher>> {
    for matcher in chain.iter() {
        if page.exists(matcher).await? {
            return Ok(Some(matcher));
        }
    }
    Ok(None)
}

/// 在期限內反覆檢查整條清單，全部落空時回傳 `None`
pub async fn wait_for_any<'a, P: BrowserPage + ?Sized>(
    page: &P,
    name: &str,
    chain: &'a SelectorChain,
    timeout: Duration,
) -> Result<Option<&'a ElementMatcher>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(matcher) = find_first(page, chain).await? {
            tracing::debug!("🎯 [{}] matched: {}", name, matcher);
            return Ok(Some(matcher));
        }
        let now = Instant::now();
        if now >= deadline {
            tracing::debug!("🔍 [{}] no selector matched within {:?}", name, timeout);
            return Ok(None);
        }
        sleep(VISIBILITY_POLL.min(deadline - now)).await;
    }
}

/// 點擊第一個找到的元素，回傳被點擊的比對
pub async fn click_first<'a, P: BrowserPage + ?Sized>(
    page: &P,
    chain: &'a SelectorChain,
) -> Result<Option<&'a ElementMatcher>> {
    for matcher in chain.iter() {
        if page.click(matcher).await? {
            return Ok(Some(matcher));
        }
    }
    Ok(None)
}
