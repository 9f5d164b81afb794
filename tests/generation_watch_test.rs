mod common;

use common::FakePage;
use concept_forge::core::generation::{GenerationState, GenerationWatcher};
use std::time::Duration;

const POLL: Duration = Duration::from_secs(3);
const SETTLE: Duration = Duration::from_secs(3);

fn ignored() -> Vec<String> {
    vec!["edge-fade".to_string()]
}

#[tokio::test(start_paused = true)]
async fn test_completes_after_none_some_none() {
    let page = FakePage::new("https://chatgpt.com/").animations(vec![
        vec![],
        vec!["spin"],
        vec!["spin", "shimmer"],
        vec![],
    ]);
    let ignored = ignored();
    let watcher = GenerationWatcher::new(&ignored, POLL, Duration::from_secs(180), SETTLE);

    let started = tokio::time::Instant::now();
    let outcome = watcher.watch(&page).await;

    assert_eq!(outcome.state, GenerationState::Complete);
    assert_eq!(outcome.samples, 4);
    assert_eq!(outcome.elapsed, Duration::from_secs(9));
    // 判定完成後還要等一段穩定時間
    assert_eq!(started.elapsed(), Duration::from_secs(12));
}

#[tokio::test(start_paused = true)]
async fn test_times_out_at_deadline_when_never_finishing() {
    let page = FakePage::new("https://chatgpt.com/").animations(vec![vec!["spin"]]);
    let ignored = ignored();
    let watcher = GenerationWatcher::new(&ignored, POLL, Duration::from_secs(10), SETTLE);

    let outcome = watcher.watch(&page).await;

    assert_eq!(outcome.state, GenerationState::TimedOut);
    assert_eq!(outcome.elapsed, Duration::from_secs(10));
    assert_eq!(outcome.samples, 4);
}

#[tokio::test(start_paused = true)]
async fn test_ignored_animation_does_not_count_as_generating() {
    let page = FakePage::new("https://chatgpt.com/").animations(vec![
        vec!["edge-fade"],
        vec!["edge-fade", "spin"],
        vec!["edge-fade"],
    ]);
    let ignored = ignored();
    let watcher = GenerationWatcher::new(&ignored, POLL, Duration::from_secs(180), SETTLE);

    let outcome = watcher.watch(&page).await;

    assert_eq!(outcome.state, GenerationState::Complete);
    assert_eq!(outcome.elapsed, Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_only_ignored_animations_times_out() {
    let page = FakePage::new("https://chatgpt.com/").animations(vec![vec!["edge-fade"]]);
    let ignored = ignored();
    let watcher = GenerationWatcher::new(&ignored, POLL, Duration::from_secs(6), SETTLE);

    let outcome = watcher.watch(&page).await;

    assert_eq!(outcome.state, GenerationState::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn test_completion_marker_ends_wait_despite_lingering_animation() {
    let marker = "article:last-child button[aria-label='Copy']";
    let page = FakePage::new("https://chatgpt.com/")
        .visible(&[marker])
        .animations(vec![vec![], vec!["spin"], vec!["shimmer"]]);
    let ignored = ignored();
    let completion = concept_forge::domain::selector::SelectorChain::from_strs(&[marker]);
    let watcher = GenerationWatcher::new(&ignored, POLL, Duration::from_secs(180), SETTLE)
        .with_completion(&completion);

    let outcome = watcher.watch(&page).await;

    // 還沒開始生成時，上一輪留下的標記不算數
    assert_eq!(outcome.state, GenerationState::Complete);
    assert_eq!(outcome.samples, 3);
    assert_eq!(outcome.elapsed, Duration::from_secs(6));
}
