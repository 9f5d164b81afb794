mod common;

use base64::Engine as _;
use common::{tiny_png, FakePage};
use concept_forge::core::session::ChatSession;
use concept_forge::{ForgeConfig, ForgeError};
use tempfile::TempDir;

const PROMPT_INPUT: &str = "#prompt-textarea";
const SEND_BUTTON: &str = "button[data-testid='send-button']";
const FILE_INPUT: &str = "input[type='file']";
const ATTACH_BUTTON: &str = "button[aria-label='Attach files']";

fn logged_in_page(config: &ForgeConfig, image_data_url: &str) -> FakePage {
    FakePage::new("about:blank")
        .landing("https://chatgpt.com/")
        .visible(&[PROMPT_INPUT, SEND_BUTTON])
        .hidden(&[FILE_INPUT])
        .animations(vec![vec!["edge-fade"], vec!["spin"], vec!["edge-fade"]])
        .images(&config.extraction.image_selectors[0], vec![(image_data_url, 1024.0, 1024.0)])
}

fn data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[tokio::test(start_paused = true)]
async fn test_full_run_sends_prompt_and_returns_image() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("arrangement_options.png");
    std::fs::write(&reference, tiny_png(2, 2)).unwrap();

    let config = ForgeConfig::default();
    let png = tiny_png(6, 6);
    let page = logged_in_page(&config, &data_url(&png));

    let bytes = ChatSession::new(&page, &config)
        .run("draw a bubble machine", Some(&reference))
        .await
        .unwrap();

    assert_eq!(bytes, png);
    let events = page.events();
    let position = |needle: &str| {
        events
            .iter()
            .position(|e| e.starts_with(needle))
            .unwrap_or_else(|| panic!("missing event '{}' in {:?}", needle, events))
    };
    assert_eq!(events[0], "navigate https://chatgpt.com/");
    assert!(position("navigate https://chatgpt.com/auth/login") < position("upload arrangement_options.png"));
    assert!(position("upload arrangement_options.png") < position("insert 21 chars"));
    assert!(position("insert 21 chars") < position(&format!("click {}", SEND_BUTTON)));
}

#[tokio::test(start_paused = true)]
async fn test_missing_send_button_falls_back_to_enter() {
    let config = ForgeConfig::default();
    let page = FakePage::new("https://chatgpt.com/").visible(&[PROMPT_INPUT]);
    let session = ChatSession::new(&page, &config);

    session.type_and_send("hello").await.unwrap();

    let events = page.events();
    assert!(events.contains(&format!("click {}", PROMPT_INPUT)));
    assert_eq!(events.last().map(String::as_str), Some("key Enter"));
}

#[tokio::test(start_paused = true)]
async fn test_login_times_out_when_still_on_auth_page() {
    let config = ForgeConfig::default();
    let page = FakePage::new("about:blank").visible(&[PROMPT_INPUT]);
    let session = ChatSession::new(&page, &config);

    let started = tokio::time::Instant::now();
    let err = tokio_test::assert_err!(session.wait_for_login().await);

    assert!(matches!(err, ForgeError::LoginTimeout { seconds: 180 }));
    assert!(started.elapsed() >= config.timing.login_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_login_waits_while_modal_is_shown() {
    let config = ForgeConfig::default();
    let modal = config.selectors.login_modal.iter().next().unwrap().to_string();
    let page = FakePage::new("about:blank")
        .landing("https://chatgpt.com/")
        .visible(&[PROMPT_INPUT, modal.as_str()]);
    let session = ChatSession::new(&page, &config);

    let err = session.wait_for_login().await.unwrap_err();
    assert!(matches!(err, ForgeError::LoginTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_desktop_prompt_is_dismissed_by_text() {
    let config = ForgeConfig::default();
    let page = FakePage::new("https://chatgpt.com/").visible(&["button:has-text('Continue in browser')"]);
    let session = ChatSession::new(&page, &config);

    assert!(tokio_test::assert_ok!(session.dismiss_desktop_prompt().await));
    assert_eq!(page.events(), vec!["click button:has-text('Continue in browser')"]);

    let empty = FakePage::new("https://chatgpt.com/");
    assert!(!ChatSession::new(&empty, &config).dismiss_desktop_prompt().await.unwrap());
    assert_eq!(empty.events(), vec!["key Escape"]);
}

#[tokio::test(start_paused = true)]
async fn test_missing_reference_is_not_uploaded() {
    let config = ForgeConfig::default();
    let page = FakePage::new("https://chatgpt.com/").visible(&[FILE_INPUT]);
    let session = ChatSession::new(&page, &config);

    let uploaded = session
        .upload_reference(std::path::Path::new("/nonexistent/ref.png"))
        .await
        .unwrap();

    assert!(!uploaded);
    assert!(page.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_hidden_file_input_is_used_without_clicking_attach() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref.png");
    std::fs::write(&reference, tiny_png(2, 2)).unwrap();

    let config = ForgeConfig::default();
    let page = FakePage::new("https://chatgpt.com/")
        .visible(&[ATTACH_BUTTON])
        .hidden(&[FILE_INPUT]);

    let uploaded = ChatSession::new(&page, &config)
        .upload_reference(&reference)
        .await
        .unwrap();

    assert!(uploaded);
    assert_eq!(page.events(), vec!["upload ref.png"]);
}

#[tokio::test(start_paused = true)]
async fn test_attach_is_clicked_only_when_no_file_input_exists() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref.png");
    std::fs::write(&reference, tiny_png(2, 2)).unwrap();

    let config = ForgeConfig::default();
    let page = FakePage::new("https://chatgpt.com/").visible(&[ATTACH_BUTTON]);

    let uploaded = ChatSession::new(&page, &config)
        .upload_reference(&reference)
        .await
        .unwrap();

    assert!(!uploaded);
    assert_eq!(page.events(), vec![format!("click {}", ATTACH_BUTTON)]);
}
