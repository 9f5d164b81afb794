use clap::Parser;
use concept_forge::adapters::gemini::GeminiClient;
use concept_forge::app::jobs::{deck_jobs, diagram_jobs, ApiImageJob, IllustrationJob};
use concept_forge::domain::ports::Job;
use concept_forge::utils::{logger, validation::Validate};
use concept_forge::{
    find, registry, AuthoringEngine, CliConfig, Command, ConceptProduct, ForgeConfig, ForgeError, LocalStorage,
    Result,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting concept-forge CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    if let Err(e) = run(&cli, config).await {
        fail(&e);
    }
}

/// 記錄錯誤、印出建議，並依嚴重程度結束程序
fn fail(e: &ForgeError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

fn product(key: &str) -> Result<Box<dyn ConceptProduct>> {
    find(key).ok_or_else(|| {
        let known: Vec<&str> = registry().iter().map(|p| p.key()).collect();
        ForgeError::ConfigError {
            message: format!("unknown product '{}' (available: {})", key, known.join(", ")),
        }
    })
}

async fn run(cli: &CliConfig, config: ForgeConfig) -> Result<()> {
    let storage = LocalStorage::new(config.output.dir.clone());

    let jobs: Vec<Box<dyn Job>> = match &cli.command {
        Command::List => {
            print_products(&config);
            return Ok(());
        }
        Command::Check => {
            print_summary(&config);
            return Ok(());
        }
        Command::Deck { product: key, format } => {
            let p = product(key)?;
            deck_jobs(p.as_ref(), &storage, |kind| format.accepts(kind))
        }
        Command::Diagram { product: key, kind } => {
            let p = product(key)?;
            diagram_jobs(p.as_ref(), &config.render, &storage, kind.as_deref())
        }
        Command::Build { product: key } => {
            // 先算圖，簡報才能嵌入
            let p = product(key)?;
            let mut jobs = diagram_jobs(p.as_ref(), &config.render, &storage, None);
            jobs.extend(deck_jobs(p.as_ref(), &storage, |_| true));
            jobs
        }
        Command::Illustrate {
            product: key,
            no_reference,
            ..
        } => {
            let p = product(key)?;
            let spec = p.chat_illustration().ok_or_else(|| ForgeError::ConfigError {
                message: format!("{} has no chat illustration", p.display_name()),
            })?;
            let mut job = IllustrationJob::new(storage.clone(), config.clone(), spec);
            if *no_reference {
                job = job.without_reference();
            }
            vec![Box::new(job) as Box<dyn Job>]
        }
        Command::Generate { product: key } => {
            let p = product(key)?;
            let specs = p.api_images();
            if specs.is_empty() {
                return Err(ForgeError::ConfigError {
                    message: format!("{} has no API image prompts", p.display_name()),
                });
            }
            let client = GeminiClient::new(&config.gemini, config.gemini_api_key()?)?;
            vec![Box::new(ApiImageJob::new(storage.clone(), client, specs)) as Box<dyn Job>]
        }
    };

    if jobs.is_empty() {
        tracing::warn!("⚠️ Nothing to do for this command");
        println!("⚠️ Nothing to do");
        return Ok(());
    }

    let engine = AuthoringEngine::new_with_monitoring(jobs, cli.monitor);
    tracing::debug!("Planned jobs: {}", engine.job_names().join(", "));
    let artifacts = engine.run().await?;

    tracing::info!("✅ Completed successfully ({} files)", artifacts.len());
    println!("✅ Completed successfully!");
    for artifact in &artifacts {
        println!("📁 {}/{}", config.output.dir, artifact);
    }
    Ok(())
}

fn print_products(config: &ForgeConfig) {
    for p in registry() {
        println!("📦 {} ({})", p.display_name(), p.key());
        for deck in p.decks() {
            for kind in &deck.formats {
                println!("  deck:        {}", deck.file_for(*kind));
            }
        }
        for diagram in p.diagrams(&config.render) {
            let (w, h) = diagram.figure.pixel_size();
            println!("  diagram:     {} ({}x{} px) -> {}", diagram.name, w, h, diagram.file);
        }
        if let Some(chat) = p.chat_illustration() {
            println!("  illustrate:  {}", chat.output_file);
        }
        for image in p.api_images() {
            println!("  generate:    {}", image.output_file);
        }
        println!();
    }
}

fn print_summary(config: &ForgeConfig) {
    println!("📋 Configuration Summary:");
    println!("  Output: {}", config.output.dir);
    println!("  Assets: {}", config.output.assets_dir);
    println!();
    println!("🌐 Browser:");
    println!("  Chat URL: {}", config.browser.chat_url);
    println!("  Profile: {}", config.browser.profile_path().display());
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Viewport: {}x{}",
        config.browser.viewport_width, config.browser.viewport_height
    );
    println!();
    println!("⏱️ Timing:");
    println!("  Login timeout: {}s", config.timing.login_timeout_secs);
    println!(
        "  Generation timeout: {}s (poll every {}s)",
        config.timing.generation_timeout_secs, config.timing.generation_poll_secs
    );
    println!(
        "  Ignored animations: {}",
        config.generation.ignored_animations.join(", ")
    );
    println!();
    println!("🖼️ Extraction:");
    println!("  Image selectors: {}", config.extraction.image_selectors.len());
    println!(
        "  Min side: {} px scoped, {} px broad",
        config.extraction.min_scoped_side, config.extraction.min_broad_side
    );
    println!();
    println!("🎨 Image API:");
    println!("  Model: {}", config.gemini.model);
    match config.gemini_api_key() {
        Ok(_) => println!("  API key: set"),
        Err(_) => println!("  API key: missing (only needed for `generate`)"),
    }
    println!();
    println!("✅ Configuration is valid");
}
