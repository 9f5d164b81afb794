use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Browser automation error: {0}")]
    BrowserError(#[from] chromiumoxide::error::CdpError),

    #[error("Base64 decoding error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Required input not found: {path}")]
    MissingInput { path: String },

    #[error("Login was not completed within {seconds}s")]
    LoginTimeout { seconds: u64 },

    #[error("No generated image found on the page ({strategies_tried} strategies tried)")]
    NoImageFound { strategies_tried: usize },

    #[error("Image download failed with status {status}: {url}")]
    DownloadFailed { status: u16, url: String },

    #[error("Canvas extraction failed: {message}")]
    CanvasExtractionFailed { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Image API error: {message}")]
    ApiError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Browser,
    Render,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ForgeError::ConfigError { .. }
            | ForgeError::ConfigValidationError { .. }
            | ForgeError::InvalidConfigValueError { .. }
            | ForgeError::MissingConfigError { .. }
            | ForgeError::MissingInput { .. } => ErrorCategory::Configuration,
            ForgeError::HttpError(_)
            | ForgeError::DownloadFailed { .. }
            | ForgeError::ApiError { .. } => ErrorCategory::Network,
            ForgeError::BrowserError(_)
            | ForgeError::LoginTimeout { .. }
            | ForgeError::NoImageFound { .. }
            | ForgeError::CanvasExtractionFailed { .. } => ErrorCategory::Browser,
            ForgeError::ImageError(_) | ForgeError::RenderError { .. } => ErrorCategory::Render,
            ForgeError::IoError(_) | ForgeError::ZipError(_) => ErrorCategory::Io,
            ForgeError::SerializationError(_)
            | ForgeError::Base64Error(_)
            | ForgeError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重跑即可
            ForgeError::HttpError(_) | ForgeError::ApiError { .. } => ErrorSeverity::Medium,
            ForgeError::ConfigError { .. }
            | ForgeError::ConfigValidationError { .. }
            | ForgeError::InvalidConfigValueError { .. }
            | ForgeError::MissingConfigError { .. }
            | ForgeError::IoError(_)
            | ForgeError::BrowserError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ForgeError::MissingInput { path } => {
                format!("Place the file at '{}' or point output.assets_dir at the folder that holds it", path)
            }
            ForgeError::LoginTimeout { .. } => {
                "Log in manually in the opened browser window, or raise timing.login_timeout_secs".to_string()
            }
            ForgeError::NoImageFound { .. } => {
                "The chat page layout may have changed; update [extraction].image_selectors and rerun".to_string()
            }
            ForgeError::DownloadFailed { .. } => {
                "The image URL may have expired; rerun the illustration job".to_string()
            }
            ForgeError::CanvasExtractionFailed { .. } => {
                "Wait for the image to finish loading and rerun the illustration job".to_string()
            }
            ForgeError::BrowserError(_) => {
                "Make sure Chrome/Chromium is installed and no other process holds the profile directory".to_string()
            }
            ForgeError::ApiError { .. } | ForgeError::HttpError(_) => {
                "Check network connectivity and the API key, then retry".to_string()
            }
            ForgeError::ConfigError { .. }
            | ForgeError::ConfigValidationError { .. }
            | ForgeError::InvalidConfigValueError { .. }
            | ForgeError::MissingConfigError { .. } => {
                "Fix the configuration file and run `concept-forge check`".to_string()
            }
            ForgeError::IoError(_) | ForgeError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            ForgeError::ImageError(_) | ForgeError::RenderError { .. } => {
                "Regenerate the embedded image assets and rebuild".to_string()
            }
            _ => "Rerun with --verbose for more details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Browser => format!("Browser automation problem: {}", self),
            ErrorCategory::Render => format!("Rendering problem: {}", self),
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Processing => format!("Processing problem: {}", self),
        }
    }

    /// 依嚴重程度對應的程序結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_browser_failures_exit_with_one() {
        let err = ForgeError::NoImageFound { strategies_tried: 2 };
        assert_eq!(err.category(), ErrorCategory::Browser);
        assert_eq!(err.exit_code(), 1);

        let err = ForgeError::LoginTimeout { seconds: 180 };
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("login_timeout_secs"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = ForgeError::MissingConfigError {
            field: "gemini.api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
    }

    #[test]
    fn test_download_failure_message() {
        let err = ForgeError::DownloadFailed {
            status: 403,
            url: "https://files.example.com/img.png".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Image download failed with status 403: https://files.example.com/img.png"
        );
    }
}
