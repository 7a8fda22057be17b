//! Tab registry and the page-resident side of the bridge

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use super::{decode_request, BridgeError, ThemeRequest, ThemeResponse};
use crate::dom::SharedDocument;
use crate::page::PageThemeApplier;
use crate::store::ThemeStore;

/// Browser tab identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request in flight to a page, with its reply slot
#[derive(Debug)]
pub struct Envelope {
    pub request: serde_json::Value,
    pub reply: oneshot::Sender<ThemeResponse>,
}

/// An open tab
#[derive(Debug)]
struct Tab {
    url: String,
    sender: mpsc::Sender<Envelope>,
}

/// Registry of open tabs and their page contexts
pub struct Tabs {
    store: Arc<ThemeStore>,
    tabs: RwLock<HashMap<TabId, Tab>>,
    active: RwLock<Option<TabId>>,
    next_id: AtomicU64,
}

impl Tabs {
    pub fn new(store: Arc<ThemeStore>) -> Self {
        Self {
            store,
            tabs: RwLock::new(HashMap::new()),
            active: RwLock::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    async fn insert(&self, url: &str, sender: mpsc::Sender<Envelope>) -> TabId {
        let id = TabId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let tab = Tab {
            url: url.to_string(),
            sender,
        };
        self.tabs.write().await.insert(id, tab);
        *self.active.write().await = Some(id);
        id
    }

    /// Open a tab showing `document` and make it active.
    ///
    /// The page context starts immediately and restores any theme saved for `url`
    /// before it serves its first request.
    pub async fn open(&self, url: &str, document: SharedDocument) -> TabId {
        let (tx, rx) = mpsc::channel(32);
        let id = self.insert(url, tx).await;

        tokio::spawn(run_page(
            url.to_string(),
            document,
            self.store.clone(),
            rx,
        ));

        info!(tab = %id, url, "Opened tab");
        id
    }

    /// Open a tab that has no content script (browser-internal pages and the like)
    pub async fn open_unscriptable(&self, url: &str) -> TabId {
        let (tx, _rx) = mpsc::channel(1);
        let id = self.insert(url, tx).await;
        info!(tab = %id, url, "Opened tab without content script");
        id
    }

    /// Close a tab; its page context shuts down once in-flight requests drain
    pub async fn close(&self, id: TabId) {
        self.tabs.write().await.remove(&id);
        let mut active = self.active.write().await;
        if *active == Some(id) {
            *active = None;
        }
    }

    /// Make an open tab active
    pub async fn activate(&self, id: TabId) -> bool {
        if !self.tabs.read().await.contains_key(&id) {
            return false;
        }
        *self.active.write().await = Some(id);
        true
    }

    /// The active tab and its URL
    pub async fn active_tab(&self) -> Option<(TabId, String)> {
        let id = (*self.active.read().await)?;
        self.tabs
            .read()
            .await
            .get(&id)
            .map(|tab| (id, tab.url.clone()))
    }

    /// Send a request to a tab and wait for its response
    pub async fn send(
        &self,
        id: TabId,
        request: &ThemeRequest,
    ) -> Result<ThemeResponse, BridgeError> {
        let raw = serde_json::to_value(request)?;
        self.send_raw(id, raw).await
    }

    /// Send an arbitrary JSON message to a tab
    pub async fn send_raw(
        &self,
        id: TabId,
        request: serde_json::Value,
    ) -> Result<ThemeResponse, BridgeError> {
        let sender = self
            .tabs
            .read()
            .await
            .get(&id)
            .map(|tab| tab.sender.clone())
            .ok_or(BridgeError::UnknownTab(id))?;

        let (reply, response) = oneshot::channel();
        if sender.send(Envelope { request, reply }).await.is_err() {
            warn!(tab = %id, "Failed to deliver message to page");
            return Err(BridgeError::PageUnreachable(id));
        }

        response.await.map_err(|_| {
            warn!(tab = %id, "Page went away before responding");
            BridgeError::PageUnreachable(id)
        })
    }
}

/// Page-resident event loop: restore the saved theme, then serve requests in order
pub async fn run_page(
    url: String,
    document: SharedDocument,
    store: Arc<ThemeStore>,
    mut requests: mpsc::Receiver<Envelope>,
) {
    let mut applier = PageThemeApplier::new();

    match store.page_theme(&url).await {
        Ok(Some(theme)) => {
            let mood = theme.display_name().to_lowercase();
            applier.apply(&mut document.lock(), theme, &mood);
            info!(url = %url, mood = %mood, "Restored saved theme");
        }
        Ok(None) => {}
        Err(e) => warn!(url = %url, "Failed to read saved theme: {}", e),
    }

    while let Some(Envelope { request, reply }) = requests.recv().await {
        let response = handle_request(&mut applier, &document, request);
        if reply.send(response).is_err() {
            debug!(url = %url, "Requester went away before the response");
        }
    }

    debug!(url = %url, "Page context closed");
}

fn handle_request(
    applier: &mut PageThemeApplier,
    document: &SharedDocument,
    raw: serde_json::Value,
) -> ThemeResponse {
    debug!(request = %raw, "Page received message");

    let request = match decode_request(raw) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match request {
        ThemeRequest::ApplyTheme { theme, mood } => {
            applier.apply(&mut document.lock(), theme, &mood);
            ThemeResponse::ok()
        }
        ThemeRequest::ResetTheme => {
            applier.reset(&mut document.lock());
            ThemeResponse::ok()
        }
        ThemeRequest::GetCurrentTheme => ThemeResponse::Current {
            theme: applier.current().cloned(),
        },
    }
}
