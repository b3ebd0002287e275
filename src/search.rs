//! Search-as-you-type over the single search box.

use crate::cache::SharedCache;
use crate::debounce::Debouncer;
use crate::notice::NoticeBoard;
use crate::port::{Command, RemoteCommandPort};
use crate::statics;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

/// Called after every wholesale cache replace with the ids it removed.
pub type ReplaceHook = Box<dyn Fn(&[String])>;

struct Inner {
    port: Rc<dyn RemoteCommandPort>,
    cache: SharedCache,
    notices: NoticeBoard,
    debouncer: Debouncer<()>,
    settle: Duration,
    // Sequence of the most recently issued request; only its response is applied.
    latest_seq: Cell<u64>,
    loading: Cell<bool>,
    last_query: RefCell<Option<String>>,
    on_replace: RefCell<Option<ReplaceHook>>,
}

impl Inner {
    fn next_seq(&self) -> u64 {
        let seq = self.latest_seq.get() + 1;
        self.latest_seq.set(seq);
        seq
    }

    fn replaced(&self, evicted: Vec<String>) {
        if let Some(hook) = self.on_replace.borrow().as_ref() {
            hook(&evicted);
        }
    }

    async fn search(&self, text: String) {
        let seq = self.next_seq();
        self.loading.set(true);
        self.last_query.replace(Some(text.clone()));
        tracing::debug!(seq, query = %text, "search issued");

        let result = self.port.search(&text).await;

        if seq != self.latest_seq.get() {
            tracing::debug!(seq, latest = self.latest_seq.get(), "stale search response dropped");
            return;
        }

        let evicted = match result {
            Ok(suppliers) => {
                tracing::debug!(seq, results = suppliers.len(), "search applied");
                self.cache.borrow_mut().replace_all(suppliers)
            }
            Err(e) => {
                tracing::warn!(command = Command::Search.name(), error = %e, "search failed");
                self.notices.error(statics::EN_SEARCH_FAILED);
                self.cache.borrow_mut().clear()
            }
        };
        self.loading.set(false);
        self.replaced(evicted);
    }
}

pub struct SearchDebouncer {
    inner: Rc<Inner>,
}

impl SearchDebouncer {
    pub fn new(
        port: Rc<dyn RemoteCommandPort>,
        cache: SharedCache,
        notices: NoticeBoard,
        settle: Duration,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                port,
                cache,
                notices,
                debouncer: Debouncer::new(),
                settle,
                latest_seq: Cell::new(0),
                loading: Cell::new(false),
                last_query: RefCell::new(None),
                on_replace: RefCell::new(None),
            }),
        }
    }

    pub fn set_replace_hook(&self, hook: ReplaceHook) {
        self.inner.on_replace.replace(Some(hook));
    }

    pub fn on_query_change(&self, text: &str) {
        if text.trim().is_empty() {
            self.inner.debouncer.cancel(&());
            // Responses still in flight must not repopulate the cleared view.
            self.inner.next_seq();
            self.inner.loading.set(false);
            self.inner.last_query.replace(None);
            let evicted = self.inner.cache.borrow_mut().clear();
            self.inner.replaced(evicted);
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let text = text.to_string();
        self.inner.debouncer.schedule((), self.inner.settle, move || async move {
            if let Some(inner) = weak.upgrade() {
                inner.search(text).await;
            }
        });
    }

    /// Re-run the last query now, e.g. after an import changed the store.
    /// Returns false when there is no query to repeat.
    pub async fn refresh(&self) -> bool {
        let Some(text) = self.inner.last_query.borrow().clone() else {
            return false;
        };
        self.inner.debouncer.cancel(&());
        self.inner.search(text).await;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    pub fn is_scheduled(&self) -> bool {
        self.inner.debouncer.is_pending(&())
    }

    pub fn last_query(&self) -> Option<String> {
        self.inner.last_query.borrow().clone()
    }

    pub fn cancel(&self) {
        self.inner.debouncer.cancel(&());
    }
}
