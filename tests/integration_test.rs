//! Integration tests using the MoodifyTest harness

mod common;

use common::MoodifyTest;
use moodify::bridge::{ThemeRequest, ThemeResponse};
use moodify::dom::EventKind;
use moodify::page::STYLE_ELEMENT_ID;
use moodify::popup::{ApplyOutcome, ResetOutcome};
use moodify::theme::{AppliedTheme, Mood, Theme};

const URL: &str = "https://example.com/article";

#[tokio::test]
async fn test_apply_then_reload_restores_theme() {
    let mut t = MoodifyTest::start().await.expect("Failed to start");
    t.open_page(URL).await;

    let mut popup = t.popup().await;
    popup.select_mood(Mood::Focus).await.unwrap();
    assert!(matches!(
        popup.apply().await.unwrap(),
        ApplyOutcome::Applied { .. }
    ));

    // reopen the page after a restart; the page restores on its own
    t.restart().await.unwrap();
    let document = t.open_page(URL).await;
    let (tab, _) = t.ext.tabs().active_tab().await.unwrap();

    let resp = t
        .ext
        .tabs()
        .send(tab, &ThemeRequest::GetCurrentTheme)
        .await
        .unwrap();
    assert_eq!(
        resp,
        ThemeResponse::Current {
            theme: Some(AppliedTheme {
                theme: Theme::focus(),
                mood: "focus".to_string(),
            })
        }
    );

    let doc = document.lock();
    assert_eq!(doc.elements_by_id(STYLE_ELEMENT_ID).len(), 1);
    assert!(doc.has_class(doc.body(), "moodify-focus"));
    let h1 = doc.query_selector_all("h1")[0];
    assert_eq!(doc.style(h1, "padding-left"), Some("10px"));
}

#[tokio::test]
async fn test_preferences_survive_restart() {
    let mut t = MoodifyTest::start().await.expect("Failed to start");

    let mut popup = t.popup().await;
    popup.select_mood(Mood::Vintage).await.unwrap();
    popup.set_ai_mode(true).await.unwrap();

    t.restart().await.unwrap();
    let popup = t.popup().await;
    assert_eq!(popup.selected(), Some(Mood::Vintage));
    assert!(popup.ai_mode());
}

#[tokio::test]
async fn test_reset_returns_page_to_original() {
    let t = MoodifyTest::start().await.expect("Failed to start");
    let document = t.open_page(URL).await;
    let before = document.lock().clone();

    let mut popup = t.popup().await;
    popup.select_mood(Mood::Energetic).await.unwrap();
    popup.apply().await.unwrap();

    {
        let mut doc = document.lock();
        let button = doc.query_selector_all("button")[0];
        doc.dispatch(button, EventKind::MouseEnter);
        assert_eq!(doc.style(button, "transform"), Some("translateY(-2px)"));
    }

    assert_eq!(
        popup.reset().await.unwrap(),
        ResetOutcome::Reset {
            url: URL.to_string()
        }
    );
    assert_eq!(t.ext.store().page_theme(URL).await.unwrap(), None);

    let doc = document.lock();
    assert!(doc.elements_by_id(STYLE_ELEMENT_ID).is_empty());
    for node in doc.query_selector_all("button, .btn, a") {
        assert_eq!(doc.listener_count(node), 0);
        assert_eq!(doc.style(node, "transform"), None);
        assert_eq!(doc.style(node, "transition"), None);
    }
    assert_eq!(doc.classes(doc.body()), before.classes(before.body()));
    assert_eq!(doc.node_count(), before.node_count());
}

#[tokio::test]
async fn test_themes_are_per_url() {
    let t = MoodifyTest::start().await.expect("Failed to start");
    let other = "https://example.org/";

    t.open_page(URL).await;
    let mut popup = t.popup().await;
    popup.select_mood(Mood::Chill).await.unwrap();
    popup.apply().await.unwrap();

    t.open_page(other).await;
    let popup = t.popup().await;
    assert!(popup.current_theme().is_none());

    let store = t.ext.store();
    assert_eq!(store.page_theme(URL).await.unwrap(), Some(Theme::chill()));
    assert_eq!(store.page_theme(other).await.unwrap(), None);
}

#[tokio::test]
async fn test_closed_tab_is_not_themable() {
    let t = MoodifyTest::start().await.expect("Failed to start");
    t.open_page(URL).await;

    let mut popup = t.popup().await;
    popup.select_mood(Mood::Chill).await.unwrap();

    let (tab, _) = t.ext.tabs().active_tab().await.unwrap();
    t.ext.tabs().close(tab).await;

    assert_eq!(
        popup.apply().await.unwrap(),
        ApplyOutcome::NotThemable { url: None }
    );
    assert_eq!(t.ext.store().page_theme(URL).await.unwrap(), None);
}
