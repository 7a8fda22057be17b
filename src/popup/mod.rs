//! Popup controller
//!
//! Holds the popup's selection state and drives the active tab through the
//! bridge, persisting themes per URL and preferences globally.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::{info, warn};

use crate::bridge::{BridgeError, TabId, Tabs, ThemeRequest, ThemeResponse};
use crate::store::{StoreError, ThemeStore};
use crate::theme::{Mood, Theme, ThemeRegistry};

/// Popup errors
#[derive(Debug, Error)]
pub enum PopupError {
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

/// Result of an apply request
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// Applied and saved for `url`
    Applied { url: String, theme: Theme },
    /// Nothing selected; nothing sent
    NoMoodSelected,
    /// No active tab, or the tab has no live page context
    NotThemable { url: Option<String> },
    /// The page answered with a failure
    Rejected { error: String },
}

/// Result of a reset request
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    Reset { url: String },
    NotThemable { url: Option<String> },
    Rejected { error: String },
}

/// Pick a mood at random (stand-in for a real suggestion engine)
pub fn suggest_mood() -> Mood {
    Mood::ALL
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(Mood::Chill)
}

/// Popup state for one opening of the extension popup
pub struct Popup {
    registry: Arc<ThemeRegistry>,
    store: Arc<ThemeStore>,
    tabs: Arc<Tabs>,
    selected: Option<Mood>,
    ai_mode: bool,
    current: Option<Theme>,
}

impl Popup {
    /// Open the popup: load preferences and the theme saved for the active tab
    pub async fn open(
        registry: Arc<ThemeRegistry>,
        store: Arc<ThemeStore>,
        tabs: Arc<Tabs>,
    ) -> Result<Self, PopupError> {
        let ai_mode = store.ai_mode().await?;
        let selected = store.last_mood().await?;
        let current = match tabs.active_tab().await {
            Some((_, url)) => store.page_theme(&url).await?,
            None => None,
        };

        Ok(Self {
            registry,
            store,
            tabs,
            selected,
            ai_mode,
            current,
        })
    }

    pub fn selected(&self) -> Option<Mood> {
        self.selected
    }

    pub fn ai_mode(&self) -> bool {
        self.ai_mode
    }

    /// Theme saved for the active tab, as last seen by this popup
    pub fn current_theme(&self) -> Option<&Theme> {
        self.current.as_ref()
    }

    /// Select a mood and remember it; returns the theme to preview
    pub async fn select_mood(&mut self, mood: Mood) -> Result<&Theme, PopupError> {
        self.selected = Some(mood);
        self.store.set_last_mood(mood).await?;
        Ok(self.registry.lookup(mood))
    }

    /// Toggle AI mode. Enabling it with nothing selected picks a suggestion.
    pub async fn set_ai_mode(&mut self, enabled: bool) -> Result<Option<Mood>, PopupError> {
        self.ai_mode = enabled;
        self.store.set_ai_mode(enabled).await?;

        if enabled && self.selected.is_none() {
            let mood = suggest_mood();
            info!(%mood, "Suggesting mood");
            self.select_mood(mood).await?;
            return Ok(Some(mood));
        }
        Ok(None)
    }

    /// Send the selected theme to the active tab and save it on success
    pub async fn apply(&mut self) -> Result<ApplyOutcome, PopupError> {
        let Some(mood) = self.selected else {
            return Ok(ApplyOutcome::NoMoodSelected);
        };
        let Some((tab, url)) = self.tabs.active_tab().await else {
            return Ok(ApplyOutcome::NotThemable { url: None });
        };

        let theme = self.registry.lookup(mood).clone();
        let request = ThemeRequest::ApplyTheme {
            theme: theme.clone(),
            mood: mood.to_string(),
        };

        let response = match self.deliver(tab, &request).await? {
            Some(response) => response,
            None => return Ok(ApplyOutcome::NotThemable { url: Some(url) }),
        };

        if !response.is_success() {
            return Ok(ApplyOutcome::Rejected {
                error: failure_message(response),
            });
        }

        self.store.save_page_theme(&url, &theme).await?;
        self.current = Some(theme.clone());
        info!(url = %url, %mood, "Theme applied");
        Ok(ApplyOutcome::Applied { url, theme })
    }

    /// Reset the active tab and forget its saved theme
    pub async fn reset(&mut self) -> Result<ResetOutcome, PopupError> {
        let Some((tab, url)) = self.tabs.active_tab().await else {
            return Ok(ResetOutcome::NotThemable { url: None });
        };

        let response = match self.deliver(tab, &ThemeRequest::ResetTheme).await? {
            Some(response) => response,
            None => return Ok(ResetOutcome::NotThemable { url: Some(url) }),
        };

        if !response.is_success() {
            return Ok(ResetOutcome::Rejected {
                error: failure_message(response),
            });
        }

        self.store.forget_page_theme(&url).await?;
        self.current = None;
        info!(url = %url, "Theme reset");
        Ok(ResetOutcome::Reset { url })
    }

    /// Send a request; delivery failures become `None` rather than errors
    async fn deliver(
        &self,
        tab: TabId,
        request: &ThemeRequest,
    ) -> Result<Option<ThemeResponse>, PopupError> {
        match self.tabs.send(tab, request).await {
            Ok(response) => Ok(Some(response)),
            Err(e @ (BridgeError::PageUnreachable(_) | BridgeError::UnknownTab(_))) => {
                warn!(tab = %tab, "Page not themable: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn failure_message(response: ThemeResponse) -> String {
    match response {
        ThemeResponse::Ack {
            error: Some(error), ..
        } => error,
        _ => "unexpected response".to_string(),
    }
}
