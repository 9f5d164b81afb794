use crate::domain::selector::SelectorChain;
use crate::utils::error::{ForgeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub output: OutputConfig,
    pub browser: BrowserConfig,
    pub timing: TimingConfig,
    pub generation: GenerationConfig,
    pub selectors: SelectorConfig,
    pub extraction: ExtractionConfig,
    pub gemini: GeminiConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// 設計文件與參考圖片所在目錄
    pub assets_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./output".to_string(),
            assets_dir: "./assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub profile_dir: String,
    pub chat_url: String,
    pub login_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            profile_dir: "~/.chatgpt_automation_profile".to_string(),
            chat_url: "https://chatgpt.com/".to_string(),
            login_url: "https://chatgpt.com/auth/login".to_string(),
            headless: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width: 1280,
            viewport_height: 900,
            executable: None,
        }
    }
}

impl BrowserConfig {
    /// 展開開頭的 `~`
    pub fn profile_path(&self) -> PathBuf {
        expand_home(&self.profile_dir)
    }

    pub fn chat_host(&self) -> Option<String> {
        url::Url::parse(&self.chat_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub login_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub generation_poll_secs: u64,
    pub login_poll_secs: u64,
    pub navigation_timeout_secs: u64,
    pub settle_secs: u64,
    pub upload_settle_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            login_timeout_secs: 180,
            generation_timeout_secs: 180,
            generation_poll_secs: 3,
            login_poll_secs: 2,
            navigation_timeout_secs: 30,
            settle_secs: 3,
            upload_settle_secs: 5,
        }
    }
}

impl TimingConfig {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn generation_poll(&self) -> Duration {
        Duration::from_secs(self.generation_poll_secs)
    }

    pub fn login_poll(&self) -> Duration {
        Duration::from_secs(self.login_poll_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn upload_settle(&self) -> Duration {
        Duration::from_secs(self.upload_settle_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// 不算作「生成中」的動畫名稱
    pub ignored_animations: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            ignored_animations: vec!["edge-fade".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub prompt_input: SelectorChain,
    pub send_button: SelectorChain,
    pub stop_button: SelectorChain,
    pub completion: SelectorChain,
    pub attach_button: SelectorChain,
    pub dismiss_prompt: SelectorChain,
    pub login_modal: SelectorChain,
    pub file_input: SelectorChain,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            prompt_input: SelectorChain::from_strs(&[
                "#prompt-textarea",
                "div[contenteditable='true']",
            ]),
            send_button: SelectorChain::from_strs(&[
                "button[data-testid='send-button']",
                "button[aria-label='Send prompt']",
                "button[aria-label='Send message']",
            ]),
            stop_button: SelectorChain::from_strs(&[
                "button[aria-label='Stop generating']",
                "button[data-testid='stop-button']",
            ]),
            completion: SelectorChain::from_strs(&[
                "article:last-child button[aria-label='Copy']",
                "[data-testid*='conversation-turn']:last-child button[aria-label='Copy']",
            ]),
            attach_button: SelectorChain::from_strs(&[
                "button[aria-label='Attach files']",
                "button[aria-label='Upload file']",
                "button[data-testid='upload-button']",
                "button[aria-label='Attach']",
            ]),
            dismiss_prompt: SelectorChain::from_strs(&[
                "button:has-text('Stay in browser')",
                "button:has-text('Continue in browser')",
                "button:has-text('Use browser')",
                "button:has-text('No thanks')",
                "button:has-text('Dismiss')",
                "a:has-text('Stay in browser')",
                "a:has-text('Continue in browser')",
            ]),
            login_modal: SelectorChain::from_strs(&[
                "#modal-no-auth-login, [data-testid='modal-no-auth-login']",
            ]),
            file_input: SelectorChain::from_strs(&["input[type='file']"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// 依優先順序，限定在最後一則回覆內
    pub image_selectors: Vec<String>,
    pub min_scoped_side: u64,
    pub min_broad_side: u64,
    pub exclude_patterns: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            image_selectors: vec![
                "article:last-child img[src*='oaidalleapiprodscus']".to_string(),
                "article:last-child img[src*='dalle']".to_string(),
                "[data-testid*='conversation-turn']:last-child img[src*='dalle']".to_string(),
                "article:last-child img[alt]".to_string(),
                "[data-testid*='conversation-turn']:last-child img".to_string(),
            ],
            min_scoped_side: 100,
            min_broad_side: 200,
            exclude_patterns: vec!["avatar".to_string(), "logo".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| "${GEMINI_API_KEY}".to_string()),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash-exp-image-generation".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// 剖面圖的解析度
    pub cross_section_dpi: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cross_section_dpi: 100.0,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(path)
}

impl ForgeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForgeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 有指定檔案就載入，否則全部使用預設值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${API_KEY})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForgeError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.dir", &self.output.dir)?;
        validation::validate_path("output.assets_dir", &self.output.assets_dir)?;

        validation::validate_path("browser.profile_dir", &self.browser.profile_dir)?;
        validation::validate_url("browser.chat_url", &self.browser.chat_url)?;
        validation::validate_url("browser.login_url", &self.browser.login_url)?;
        validation::validate_non_empty_string("browser.user_agent", &self.browser.user_agent)?;
        if let Some(executable) = &self.browser.executable {
            validation::validate_path("browser.executable", executable)?;
        }
        validation::validate_positive_number(
            "browser.viewport_width",
            self.browser.viewport_width as u64,
            1,
        )?;
        validation::validate_positive_number(
            "browser.viewport_height",
            self.browser.viewport_height as u64,
            1,
        )?;

        let timings = [
            ("timing.login_timeout_secs", self.timing.login_timeout_secs),
            ("timing.generation_timeout_secs", self.timing.generation_timeout_secs),
            ("timing.generation_poll_secs", self.timing.generation_poll_secs),
            ("timing.login_poll_secs", self.timing.login_poll_secs),
            ("timing.navigation_timeout_secs", self.timing.navigation_timeout_secs),
        ];
        for (field, value) in timings {
            validation::validate_positive_number(field, value, 1)?;
        }

        let chains = [
            ("selectors.prompt_input", &self.selectors.prompt_input),
            ("selectors.send_button", &self.selectors.send_button),
            ("selectors.stop_button", &self.selectors.stop_button),
            ("selectors.completion", &self.selectors.completion),
            ("selectors.attach_button", &self.selectors.attach_button),
            ("selectors.dismiss_prompt", &self.selectors.dismiss_prompt),
            ("selectors.login_modal", &self.selectors.login_modal),
            ("selectors.file_input", &self.selectors.file_input),
        ];
        for (field, chain) in chains {
            validation::validate_non_empty_list(field, &chain.0)?;
        }

        validation::validate_non_empty_list(
            "extraction.image_selectors",
            &self.extraction.image_selectors,
        )?;
        validation::validate_range(
            "extraction.min_scoped_side",
            self.extraction.min_scoped_side,
            1,
            10_000,
        )?;
        validation::validate_range(
            "extraction.min_broad_side",
            self.extraction.min_broad_side,
            1,
            10_000,
        )?;

        validation::validate_url("gemini.endpoint", &self.gemini.endpoint)?;
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validation::validate_positive_number("gemini.timeout_secs", self.gemini.timeout_secs, 1)?;

        if !(self.render.cross_section_dpi > 0.0 && self.render.cross_section_dpi <= 600.0) {
            return Err(ForgeError::InvalidConfigValueError {
                field: "render.cross_section_dpi".to_string(),
                value: self.render.cross_section_dpi.to_string(),
                reason: "DPI must be in 1..=600".to_string(),
            });
        }

        Ok(())
    }

    /// 取得 API 金鑰，仍為 `${...}` 佔位字串時視為未設定
    pub fn gemini_api_key(&self) -> Result<&str> {
        validation::validate_substituted("gemini.api_key", &self.gemini.api_key)?;
        validation::validate_non_empty_string("gemini.api_key", &self.gemini.api_key)?;
        Ok(&self.gemini.api_key)
    }

    pub fn assets_path(&self, file: &str) -> PathBuf {
        Path::new(&self.output.assets_dir).join(file)
    }
}

impl Validate for ForgeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selector::ElementMatcher;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ForgeConfig::from_toml_str("").unwrap();

        assert_eq!(config.output.dir, "./output");
        assert_eq!(config.browser.chat_url, "https://chatgpt.com/");
        assert_eq!(config.timing.generation_timeout_secs, 180);
        assert_eq!(config.generation.ignored_animations, vec!["edge-fade"]);
        assert_eq!(config.selectors.send_button.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[output]
dir = "./build"

[timing]
generation_timeout_secs = 60

[selectors]
dismiss_prompt = ["button:has-text('Not now')"]
"#;

        let config = ForgeConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output.dir, "./build");
        assert_eq!(config.output.assets_dir, "./assets");
        assert_eq!(config.timing.generation_timeout_secs, 60);
        assert_eq!(config.timing.login_timeout_secs, 180);
        assert_eq!(
            config.selectors.dismiss_prompt.0,
            vec![ElementMatcher::Text {
                tag: "button".to_string(),
                text: "Not now".to_string()
            }]
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FORGE_TEST_CHAT_URL", "https://chat.example.com/");

        let toml_content = r#"
[browser]
chat_url = "${FORGE_TEST_CHAT_URL}"
login_url = "${FORGE_TEST_UNDEFINED_VAR}"
"#;

        let config = ForgeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.browser.chat_url, "https://chat.example.com/");
        assert_eq!(config.browser.login_url, "${FORGE_TEST_UNDEFINED_VAR}");
        assert_eq!(config.browser.chat_host().as_deref(), Some("chat.example.com"));

        std::env::remove_var("FORGE_TEST_CHAT_URL");
    }

    #[test]
    fn test_config_validation() {
        let config = ForgeConfig::from_toml_str(
            r#"
[browser]
chat_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = ForgeConfig::from_toml_str(
            r#"
[timing]
generation_poll_secs = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = ForgeConfig::from_toml_str(
            r#"
[selectors]
send_button = []
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsubstituted_api_key_is_rejected() {
        let config = ForgeConfig::from_toml_str(
            r#"
[gemini]
api_key = "${FORGE_TEST_MISSING_KEY}"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.gemini_api_key(),
            Err(ForgeError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
dir = "./from-file"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ForgeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.dir, "./from-file");
    }

    #[test]
    fn test_profile_path_expands_home() {
        let browser = BrowserConfig::default();
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(
                browser.profile_path(),
                Path::new(&home).join(".chatgpt_automation_profile")
            );
        }
    }
}
