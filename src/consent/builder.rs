use std::sync::Arc;

use crate::config::ConsentConfig;
use crate::consent::ConsentController;
use crate::cookies::{CookieStoreHandle, DocumentCookieStore, InMemoryCookieDocument};
use crate::dom::{DomHandle, VirtualDom};
use crate::hooks::TagHookHandle;

/// Builds a [`ConsentController`].
///
/// Without a store the controller works on an in-memory secure document, without a DOM it
/// works on an empty page (every UI access is skipped).
#[derive(Default)]
pub struct ConsentBuilder {
    config: Option<ConsentConfig>,
    store: Option<CookieStoreHandle>,
    dom: Option<DomHandle>,
    hook: Option<TagHookHandle>,
}

impl ConsentController {
    /// Entry point to start building a controller.
    pub fn builder() -> ConsentBuilder {
        ConsentBuilder::default()
    }
}

impl ConsentBuilder {
    pub fn config(mut self, cfg: ConsentConfig) -> Self {
        self.config = Some(cfg);
        self
    }

    pub fn store(mut self, store: CookieStoreHandle) -> Self {
        self.store = Some(store);
        self
    }

    pub fn dom(mut self, dom: DomHandle) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn tag_hook(mut self, hook: TagHookHandle) -> Self {
        self.hook = Some(hook);
        self
    }

    pub fn build(self) -> ConsentController {
        let store = self.store.unwrap_or_else(|| {
            Arc::new(DocumentCookieStore::new(Arc::new(InMemoryCookieDocument::secure())))
        });
        let dom = self.dom.unwrap_or_else(|| Arc::new(VirtualDom::new()));

        ConsentController::new(self.config.unwrap_or_default(), store, dom, self.hook)
    }
}
