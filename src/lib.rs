pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, FormatFilter};

pub use adapters::{render_png, PdfRenderer, PptxRenderer};
pub use app::products::{find, registry, ConceptProduct};
pub use config::{cli::LocalStorage, toml_config::ForgeConfig};
pub use core::engine::AuthoringEngine;
pub use utils::error::{ForgeError, Result};
