use log::info;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Online,
    Offline,
}

#[derive(Default)]
struct Listeners {
    entries: Vec<(u64, Transition, Callback)>,
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Online/offline state fed by the platform's connectivity events.
///
/// There is no polling: state only changes through `set_online`, so a link that
/// degrades without emitting an event leaves `is_online` stale.
pub struct ConnectivityMonitor {
    online: AtomicBool,
    next_id: AtomicU64,
    listeners: Arc<Mutex<Listeners>>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        ConnectivityMonitor {
            online: AtomicBool::new(initially_online),
            next_id: AtomicU64::new(0),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Records a connectivity event. Listeners fire only when the state flips.
    /// Returns whether it did.
    pub fn set_online(&self, online: bool) -> bool {
        if self.online.swap(online, Ordering::SeqCst) == online {
            return false;
        }
        let transition = if online {
            Transition::Online
        } else {
            Transition::Offline
        };
        info!("Connectivity changed: {:?}", transition);

        let callbacks: Vec<Callback> = lock(&self.listeners)
            .entries
            .iter()
            .filter(|(_, kind, _)| *kind == transition)
            .map(|(_, _, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback();
        }
        true
    }

    pub fn on_online<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(Transition::Online, Arc::new(callback))
    }

    pub fn on_offline<F>(&self, callback: F) -> ListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(Transition::Offline, Arc::new(callback))
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }

    fn register(&self, kind: Transition, callback: Callback) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.listeners).entries.push((id, kind, callback));
        ListenerHandle {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Keeps a listener registered. Dropping it deregisters the callback.
#[must_use = "dropping the handle deregisters the listener"]
pub struct ListenerHandle {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl ListenerHandle {
    pub fn unregister(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).entries.retain(|(id, _, _)| *id != self.id);
        }
    }
}
