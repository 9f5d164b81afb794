pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command, FormatFilter};

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::ForgeConfig;
    use crate::domain::model::ArtifactKind;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand, ValueEnum};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "concept-forge")]
    #[command(about = "Builds concept decks, diagrams and AI illustrations for hardware products")]
    pub struct CliConfig {
        #[arg(long, global = true, help = "Optional TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, global = true, help = "Override output.dir")]
        pub output: Option<String>,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List products and their jobs
        List,
        /// Build slide decks
        Deck {
            product: String,
            #[arg(long, value_enum, default_value_t = FormatFilter::All)]
            format: FormatFilter,
        },
        /// Render diagrams
        Diagram {
            product: String,
            #[arg(long, help = "Render only this diagram")]
            kind: Option<String>,
        },
        /// Render all diagrams, then all decks
        Build { product: String },
        /// Request an illustration through the chat web interface
        Illustrate {
            product: String,
            #[arg(long)]
            headless: bool,
            #[arg(long, help = "Do not upload the reference image")]
            no_reference: bool,
        },
        /// Generate images through the image API
        Generate { product: String },
        /// Load and validate configuration, then print a summary
        Check,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum FormatFilter {
        Pdf,
        Pptx,
        All,
    }

    impl FormatFilter {
        pub fn accepts(self, kind: ArtifactKind) -> bool {
            match self {
                FormatFilter::All => true,
                FormatFilter::Pdf => kind == ArtifactKind::Pdf,
                FormatFilter::Pptx => kind == ArtifactKind::Pptx,
            }
        }
    }

    impl CliConfig {
        /// 載入 TOML（若有）並套用命令列覆寫
        pub fn resolve_config(&self) -> Result<ForgeConfig> {
            let mut config = ForgeConfig::load(self.config.as_deref())?;
            if let Some(dir) = &self.output {
                config.output.dir = dir.clone();
            }
            if let Command::Illustrate { headless: true, .. } = self.command {
                config.browser.headless = true;
            }
            Ok(config)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_deck_command() {
            let cli = CliConfig::parse_from(["concept-forge", "deck", "bubbler", "--format", "pdf", "-v"]);
            assert!(cli.verbose);
            match cli.command {
                Command::Deck { product, format } => {
                    assert_eq!(product, "bubbler");
                    assert_eq!(format, FormatFilter::Pdf);
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_overrides_apply_to_config() {
            let cli = CliConfig::parse_from([
                "concept-forge",
                "--output",
                "/tmp/forge-out",
                "illustrate",
                "shusher",
                "--headless",
            ]);
            let config = cli.resolve_config().unwrap();
            assert_eq!(config.output.dir, "/tmp/forge-out");
            assert!(config.browser.headless);
        }

        #[test]
        fn test_format_filter() {
            assert!(FormatFilter::All.accepts(ArtifactKind::Pptx));
            assert!(FormatFilter::Pdf.accepts(ArtifactKind::Pdf));
            assert!(!FormatFilter::Pdf.accepts(ArtifactKind::Pptx));
        }
    }
}
