mod common;

use anyhow::Context;
use common::tiny_png;
use concept_forge::app::jobs::deck_jobs;
use concept_forge::app::products::chillstream;
use concept_forge::domain::ports::{DeckRenderer, ImageAssets, Storage};
use concept_forge::{find, AuthoringEngine, LocalStorage, PdfRenderer, PptxRenderer};
use std::io::{Cursor, Read};
use tempfile::TempDir;

fn storage(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().to_string_lossy().to_string())
}

fn zip_names(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).context("pptx is not a zip")?;
    Ok(archive.file_names().map(str::to_string).collect())
}

fn page_count(pdf: &[u8]) -> usize {
    let text = String::from_utf8_lossy(pdf);
    text.matches("/Type /Page").count() - text.matches("/Type /Pages").count()
}

#[tokio::test]
async fn test_bubbler_carousel_builds_pdf_and_pptx() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let storage = storage(&dir);
    // 先放好排列圖，讓簡報能嵌入
    storage
        .write_file("bubbler/arrangement_options.png", &tiny_png(36, 26))
        .await?;

    let bubbler = find("bubbler").context("bubbler is registered")?;
    let engine = AuthoringEngine::new(deck_jobs(bubbler.as_ref(), &storage, |_| true));
    let artifacts = engine.run().await?;

    let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(paths, vec!["bubbler/Bubbler_Carousel.pdf", "bubbler/Bubbler_Carousel.pptx"]);

    let pdf = std::fs::read(dir.path().join("bubbler/Bubbler_Carousel.pdf"))?;
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(page_count(&pdf), 8);

    let pptx = std::fs::read(dir.path().join("bubbler/Bubbler_Carousel.pptx"))?;
    let names = zip_names(&pptx)?;
    assert!(names.contains(&"ppt/presentation.xml".to_string()));
    for n in 1..=8 {
        assert!(names.contains(&format!("ppt/slides/slide{}.xml", n)), "slide {} missing", n);
    }
    assert!(!names.contains(&"ppt/slides/slide9.xml".to_string()));
    assert!(names.contains(&"ppt/media/image1.png".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_deck_without_embedded_image_still_builds() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let storage = storage(&dir);
    let chill = find("chillstream").context("chillstream is registered")?;

    let artifacts = AuthoringEngine::new(deck_jobs(chill.as_ref(), &storage, |_| true))
        .run()
        .await?;

    assert_eq!(artifacts.len(), 1);
    let pptx = std::fs::read(dir.path().join("chillstream/ChillStream_Executive_Deck.pptx"))?;
    let names = zip_names(&pptx)?;
    assert!(names.contains(&"ppt/slides/slide12.xml".to_string()));
    assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
    Ok(())
}

#[tokio::test]
async fn test_carousels_embed_cover_illustration_when_present() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let storage = storage(&dir);
    storage
        .write_file(
            "shusher/cross_section_illustration_shusher.png",
            &tiny_png(30, 22),
        )
        .await?;

    for key in ["shusher", "toothbrush", "popcorn"] {
        let product = find(key).context("product is registered")?;
        let artifacts = AuthoringEngine::new(deck_jobs(product.as_ref(), &storage, |_| true))
            .run()
            .await?;
        assert_eq!(artifacts.len(), 2, "{} should write pdf and pptx", key);

        let pdf_path = artifacts[0].path.clone();
        let pdf = std::fs::read(dir.path().join(&pdf_path))?;
        assert_eq!(page_count(&pdf), 8, "{}", pdf_path);

        let pptx = std::fs::read(dir.path().join(&artifacts[1].path))?;
        let has_media = zip_names(&pptx)?.iter().any(|n| n.starts_with("ppt/media/"));
        // 只有 shusher 的封面圖已存在
        assert_eq!(has_media, key == "shusher", "{}", key);
    }
    Ok(())
}

#[test]
fn test_decks_are_byte_identical_across_runs() -> anyhow::Result<()> {
    let deck = chillstream::executive_deck();
    let mut images = ImageAssets::new();
    images.insert("chillstream/cross_section.png".into(), tiny_png(20, 26));

    for renderer in [&PdfRenderer as &dyn DeckRenderer, &PptxRenderer] {
        let first = renderer.render(&deck, &images)?;
        let second = renderer.render(&deck, &images)?;
        assert_eq!(first, second, "{:?} output changed between runs", renderer.kind());
    }
    Ok(())
}

#[test]
fn test_pptx_slide_text_is_searchable() -> anyhow::Result<()> {
    let deck = chillstream::executive_deck();
    let pptx = PptxRenderer.render(&deck, &ImageAssets::new())?;
    let mut archive = zip::ZipArchive::new(Cursor::new(pptx))?;
    let mut slide = String::new();
    archive.by_name("ppt/slides/slide1.xml")?.read_to_string(&mut slide)?;

    assert!(slide.contains("<a:t>ChillStream</a:t>"));
    assert!(slide.contains(r#"<a:latin typeface="Calibri"/>"#));
    Ok(())
}
