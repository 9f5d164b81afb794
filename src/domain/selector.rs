use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// 頁面元素的比對方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementMatcher {
    /// 一般 CSS 選擇器（可含逗號群組）
    Css(String),
    /// 標籤名稱 + 文字內容包含比對，寫法為 `tag:has-text('…')`
    Text { tag: String, text: String },
}

fn has_text_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r#"^\s*([A-Za-z][\w-]*)?:has-text\(\s*(?:'([^']*)'|"([^"]*)")\s*\)\s*$"#).ok()
        })
        .as_ref()
}

impl ElementMatcher {
    pub fn css(selector: impl Into<String>) -> Self {
        ElementMatcher::Css(selector.into())
    }

    pub fn parse(raw: &str) -> Self {
        if let Some(caps) = has_text_pattern().and_then(|re| re.captures(raw)) {
            let tag = caps.get(1).map(|m| m.as_str()).unwrap_or("*").to_string();
            let text = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            return ElementMatcher::Text { tag, text };
        }
        ElementMatcher::Css(raw.trim().to_string())
    }

    /// 回傳一段求值為元素或 `null` 的 JavaScript 運算式
    pub fn to_js(&self) -> String {
        match self {
            ElementMatcher::Css(selector) => {
                format!("document.querySelector({})", js_string(selector))
            }
            ElementMatcher::Text { tag, text } => format!(
                "(Array.from(document.querySelectorAll({})).find(e => (e.textContent || '').includes({})) || null)",
                js_string(tag),
                js_string(text)
            ),
        }
    }
}

impl fmt::Display for ElementMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementMatcher::Css(selector) => write!(f, "{}", selector),
            ElementMatcher::Text { tag, text } => write!(f, "{}:has-text('{}')", tag, text),
        }
    }
}

impl Serialize for ElementMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ElementMatcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ElementMatcher::parse(&raw))
    }
}

/// JSON 字串字面值可直接當 JavaScript 字串使用
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// 依序嘗試的比對清單，第一個命中者勝出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SelectorChain(pub Vec<ElementMatcher>);

impl SelectorChain {
    pub fn from_strs(items: &[&str]) -> Self {
        SelectorChain(items.iter().map(|s| ElementMatcher::parse(s)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementMatcher> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_css_selector() {
        let m = ElementMatcher::parse("button[data-testid='send-button']");
        assert_eq!(m, ElementMatcher::css("button[data-testid='send-button']"));
    }

    #[test]
    fn test_parse_has_text_selector() {
        let m = ElementMatcher::parse("button:has-text('Stay in browser')");
        assert_eq!(
            m,
            ElementMatcher::Text {
                tag: "button".to_string(),
                text: "Stay in browser".to_string()
            }
        );
        assert_eq!(m.to_string(), "button:has-text('Stay in browser')");
    }

    #[test]
    fn test_text_matcher_js_escapes_quotes() {
        let m = ElementMatcher::Text {
            tag: "a".to_string(),
            text: "Don\"t".to_string(),
        };
        let js = m.to_js();
        assert!(js.contains(r#""Don\"t""#));
        assert!(js.contains("querySelectorAll(\"a\")"));
    }

    #[test]
    fn test_chain_deserializes_from_string_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            chain: SelectorChain,
        }
        let w: Wrapper =
            toml::from_str(r##"chain = ["#prompt-textarea", "a:has-text('Dismiss')"]"##).unwrap();
        assert_eq!(w.chain.len(), 2);
        assert!(matches!(w.chain.0[1], ElementMatcher::Text { .. }));
    }
}
