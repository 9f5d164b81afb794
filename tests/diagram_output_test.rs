use anyhow::Context;
use concept_forge::app::jobs::diagram_jobs;
use concept_forge::app::products::{bubbler, chillstream};
use concept_forge::config::toml_config::RenderConfig;
use concept_forge::{find, render_png, AuthoringEngine, LocalStorage};
use std::io::Cursor;
use tempfile::TempDir;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn dimensions(png: &[u8]) -> anyhow::Result<(u32, u32)> {
    Ok(image::ImageReader::new(Cursor::new(png))
        .with_guessed_format()?
        .into_dimensions()?)
}

#[tokio::test]
async fn test_bubbler_diagrams_are_written_at_declared_size() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
    let bubbler = find("bubbler").context("bubbler is registered")?;

    let jobs = diagram_jobs(bubbler.as_ref(), &RenderConfig::default(), &storage, None);
    let artifacts = AuthoringEngine::new(jobs).run().await?;
    assert_eq!(artifacts.len(), 2);

    let block = std::fs::read(dir.path().join("bubbler/block_diagram.png"))?;
    assert!(block.starts_with(PNG_SIGNATURE));
    assert_eq!(dimensions(&block)?, (2520, 1620));

    let arrangement = std::fs::read(dir.path().join("bubbler/arrangement_options.png"))?;
    assert_eq!(dimensions(&arrangement)?, (3240, 2340));
    Ok(())
}

#[tokio::test]
async fn test_toothbrush_arrangement_is_written() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());
    let toothbrush = find("toothbrush").context("toothbrush is registered")?;

    let jobs = diagram_jobs(toothbrush.as_ref(), &RenderConfig::default(), &storage, None);
    let artifacts = AuthoringEngine::new(jobs).run().await?;
    assert_eq!(artifacts.len(), 1);

    let png = std::fs::read(dir.path().join("toothbrush/arrangement_options.png"))?;
    assert!(png.starts_with(PNG_SIGNATURE));
    assert_eq!(dimensions(&png)?, (2100, 3000));
    Ok(())
}

#[test]
fn test_cross_section_follows_configured_dpi() -> anyhow::Result<()> {
    let png = render_png(&chillstream::cross_section(40.0))?;
    assert!(png.starts_with(PNG_SIGNATURE));
    assert_eq!(dimensions(&png)?, (800, 1040));
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> anyhow::Result<()> {
    let figure = bubbler::block_diagram();
    assert_eq!(render_png(&figure)?, render_png(&figure)?);
    Ok(())
}
