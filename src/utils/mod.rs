pub mod error;
pub mod logger;
pub mod monitor;
pub mod text_metrics;
pub mod validation;
