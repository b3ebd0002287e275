//! Keyed settle-window scheduler.
//!
//! For each key at most one action runs per settle window: the most recently
//! scheduled one, after `delay` has passed without another `schedule` for that key.
//! Timers are local tasks, so everything here must run inside a `tokio::task::LocalSet`.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    hash::Hash,
    rc::Rc,
    time::Duration,
};
use tokio::task::JoinHandle;

struct Timer {
    token: u64,
    handle: JoinHandle<()>,
}

pub struct Debouncer<K> {
    timers: Rc<RefCell<HashMap<K, Timer>>>,
    next_token: Cell<u64>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            timers: Rc::new(RefCell::new(HashMap::new())),
            next_token: Cell::new(0),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede any pending timer for `key` and start a new one.
    /// On expiry the timer entry is removed before `action` runs, so a later
    /// `schedule` never aborts an action that is already executing.
    pub fn schedule<F, Fut>(&self, key: K, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let token = self.next_token.get();
        self.next_token.set(token.wrapping_add(1));

        let timers = Rc::clone(&self.timers);
        let task_key = key.clone();
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            {
                let mut timers = timers.borrow_mut();
                match timers.get(&task_key) {
                    Some(timer) if timer.token == token => {
                        timers.remove(&task_key);
                    }
                    // Superseded between wake-up and now.
                    _ => return,
                }
            }
            action().await;
        });

        let previous = self
            .timers
            .borrow_mut()
            .insert(key, Timer { token, handle });
        if let Some(previous) = previous {
            previous.handle.abort();
        }
    }

    /// Cancel the pending timer for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &K) -> bool {
        let removed = self.timers.borrow_mut().remove(key);
        match removed {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        let drained: Vec<Timer> = self.timers.borrow_mut().drain().map(|(_, t)| t).collect();
        for timer in drained {
            timer.handle.abort();
        }
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.timers.borrow().contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, timer) in self.timers.borrow_mut().drain() {
            timer.handle.abort();
        }
    }
}
