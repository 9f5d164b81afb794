mod common;

use base64::Engine as _;
use common::{tiny_png, FakePage, FAKE_USER_AGENT};
use concept_forge::config::toml_config::ExtractionConfig;
use concept_forge::core::extraction::ImageExtractor;
use concept_forge::ForgeError;
use httpmock::prelude::*;

const PAGE_URL: &str = "https://chatgpt.com/c/abc";

fn first_selector(config: &ExtractionConfig) -> String {
    config.image_selectors[0].clone()
}

#[tokio::test]
async fn test_http_source_is_downloaded_with_cookies_and_user_agent() {
    let server = MockServer::start();
    let png = tiny_png(4, 4);
    let image_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/files/generated.png")
            .header("cookie", "session=abc")
            .header("user-agent", FAKE_USER_AGENT);
        then.status(200).header("Content-Type", "image/png").body(&png);
    });

    let config = ExtractionConfig::default();
    let src = server.url("/files/generated.png");
    let page = FakePage::new(PAGE_URL)
        .cookies("session=abc")
        .images(&first_selector(&config), vec![(src.as_str(), 1024.0, 1024.0)]);

    let bytes = ImageExtractor::new(&config).extract(&page).await.unwrap();

    image_mock.assert();
    assert_eq!(bytes, png);
}

#[tokio::test]
async fn test_injected_client_is_used_for_download() {
    let server = MockServer::start();
    let png = tiny_png(3, 3);
    let image_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/files/proxied.png")
            .header("x-forge-run", "nightly");
        then.status(200).body(&png);
    });

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-forge-run", reqwest::header::HeaderValue::from_static("nightly"));
    let client = reqwest::Client::builder().default_headers(headers).build().unwrap();

    let config = ExtractionConfig::default();
    let src = server.url("/files/proxied.png");
    let page = FakePage::new(PAGE_URL).images(&first_selector(&config), vec![(src.as_str(), 1024.0, 1024.0)]);

    let bytes = ImageExtractor::with_client(&config, client).extract(&page).await.unwrap();

    image_mock.assert();
    assert_eq!(bytes, png);
}

#[tokio::test]
async fn test_non_200_download_is_fatal() {
    let server = MockServer::start();
    let image_mock = server.mock(|when, then| {
        when.method(GET).path("/expired.png");
        then.status(403);
    });

    let config = ExtractionConfig::default();
    let src = server.url("/expired.png");
    let page = FakePage::new(PAGE_URL).images(&first_selector(&config), vec![(src.as_str(), 512.0, 512.0)]);

    let err = ImageExtractor::new(&config).extract(&page).await.unwrap_err();

    image_mock.assert();
    match err {
        ForgeError::DownloadFailed { status, url } => {
            assert_eq!(status, 403);
            assert!(url.ends_with("/expired.png"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_blob_source_round_trips_through_canvas() {
    let png = tiny_png(8, 3);
    let data_url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    let config = ExtractionConfig::default();
    let page = FakePage::new(PAGE_URL)
        .images(
            &first_selector(&config),
            vec![("blob:https://chatgpt.com/1234", 800.0, 600.0)],
        )
        .canvas(&data_url);

    let bytes = ImageExtractor::new(&config).extract(&page).await.unwrap();

    assert_eq!(bytes, png);
    assert_eq!(page.events(), vec!["canvas blob:https://chatgpt.com/1234"]);
}

#[tokio::test]
async fn test_canvas_returning_non_image_fails() {
    let config = ExtractionConfig::default();
    let page = FakePage::new(PAGE_URL)
        .images(&first_selector(&config), vec![("blob:https://chatgpt.com/9", 800.0, 600.0)])
        .canvas("data:,");

    let err = ImageExtractor::new(&config).extract(&page).await.unwrap_err();
    assert!(matches!(err, ForgeError::CanvasExtractionFailed { .. }));
}

#[tokio::test]
async fn test_small_scoped_image_falls_back_to_broad_search() {
    let png = tiny_png(2, 2);
    let inline = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    let config = ExtractionConfig::default();
    let page = FakePage::new(PAGE_URL)
        // 100px 不大於門檻
        .images(&first_selector(&config), vec![("https://cdn.example/thumb.png", 100.0, 100.0)])
        .images(
            "img",
            vec![
                ("https://cdn.example/avatar.png", 400.0, 400.0),
                ("https://cdn.example/logo.svg", 300.0, 300.0),
                ("https://cdn.example/wide.png", 900.0, 150.0),
                (inline.as_str(), 1024.0, 1024.0),
            ],
        );

    let extractor = ImageExtractor::new(&config);
    let found = extractor.find_image(&page).await.unwrap().unwrap();
    assert_eq!(found.strategy, "img");
    assert_eq!(found.candidate.index, 3);

    assert_eq!(extractor.extract(&page).await.unwrap(), png);
}

#[tokio::test]
async fn test_no_image_dumps_diagnostics_and_fails() {
    let config = ExtractionConfig::default();
    let page = FakePage::new(PAGE_URL);

    let err = ImageExtractor::new(&config).extract(&page).await.unwrap_err();

    match err {
        ForgeError::NoImageFound { strategies_tried } => {
            assert_eq!(strategies_tried, config.image_selectors.len() + 1)
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(page.events(), vec!["diagnostics"]);
}
