//! The owning browsing-context handle.
//!
//! A [`Target`] tracks the scope of the currently loaded document and
//! dispatches navigation lifecycle signals to registered listeners:
//! `will_navigate` just before a navigation starts, `navigated` once one
//! commits. Listeners are held weakly so a destroyed relay cannot be kept
//! alive by its own target.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use wsmon_core::ids::ScopeId;

/// Navigation lifecycle callbacks. Dispatch is synchronous.
pub trait NavigationListener: Send + Sync {
    /// The context is about to navigate away from the current document.
    fn will_navigate(&self);

    /// A navigation committed; the target's scope now reflects the new
    /// document.
    fn navigated(&self);
}

/// Key returned by [`Target::on_navigation`], used to unregister precisely.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(u64);

struct TargetInner {
    scope: ScopeId,
    next_key: u64,
    listeners: Vec<(u64, Weak<dyn NavigationListener>)>,
}

/// Handle to the browsing context that owns a relay.
pub struct Target {
    inner: Mutex<TargetInner>,
}

impl Target {
    /// Create a target whose current document has the given scope.
    pub fn new(scope: ScopeId) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(TargetInner {
                scope,
                next_key: 0,
                listeners: Vec::new(),
            }),
        })
    }

    /// Scope of the currently loaded document.
    pub fn scope(&self) -> ScopeId {
        self.inner.lock().scope
    }

    /// Register a navigation listener. Dead weak refs are pruned on the way.
    pub fn on_navigation(&self, listener: Weak<dyn NavigationListener>) -> ListenerKey {
        let mut inner = self.inner.lock();
        inner.listeners.retain(|(_, l)| l.strong_count() > 0);
        let key = inner.next_key;
        inner.next_key += 1;
        inner.listeners.push((key, listener));
        ListenerKey(key)
    }

    /// Unregister the listener behind `key`. Unknown keys are a no-op.
    pub fn off_navigation(&self, key: ListenerKey) {
        self.inner.lock().listeners.retain(|(k, _)| *k != key.0);
    }

    /// Number of live registered listeners.
    pub fn navigation_listener_count(&self) -> usize {
        self.inner
            .lock()
            .listeners
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }

    /// Signal that a navigation is about to start.
    pub fn begin_navigation(&self) {
        for listener in self.live_listeners() {
            listener.will_navigate();
        }
    }

    /// Commit a navigation: update the scope, then notify listeners.
    pub fn commit_navigation(&self, scope: ScopeId) {
        self.inner.lock().scope = scope;
        for listener in self.live_listeners() {
            listener.navigated();
        }
    }

    // Snapshot under the lock, dispatch outside it — listeners call back
    // into `scope()`.
    fn live_listeners(&self) -> Vec<Arc<dyn NavigationListener>> {
        self.inner
            .lock()
            .listeners
            .iter()
            .filter_map(|(_, l)| l.upgrade())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Recorder {
        wills: AtomicU32,
        navs: AtomicU32,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                wills: AtomicU32::new(0),
                navs: AtomicU32::new(0),
            })
        }
    }

    impl NavigationListener for Recorder {
        fn will_navigate(&self) {
            let _ = self.wills.fetch_add(1, Ordering::SeqCst);
        }

        fn navigated(&self) {
            let _ = self.navs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn scope_updates_on_commit() {
        let target = Target::new(ScopeId::new(1));
        assert_eq!(target.scope(), ScopeId::new(1));
        target.commit_navigation(ScopeId::new(2));
        assert_eq!(target.scope(), ScopeId::new(2));
    }

    #[test]
    fn listeners_receive_signals() {
        let target = Target::new(ScopeId::new(1));
        let rec = Recorder::new();
        let _key = target.on_navigation(Arc::downgrade(&rec) as Weak<dyn NavigationListener>);

        target.begin_navigation();
        target.commit_navigation(ScopeId::new(2));
        target.begin_navigation();

        assert_eq!(rec.wills.load(Ordering::SeqCst), 2);
        assert_eq!(rec.navs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn off_navigation_stops_delivery() {
        let target = Target::new(ScopeId::new(1));
        let rec = Recorder::new();
        let key = target.on_navigation(Arc::downgrade(&rec) as Weak<dyn NavigationListener>);
        target.off_navigation(key);

        target.begin_navigation();
        assert_eq!(rec.wills.load(Ordering::SeqCst), 0);
        assert_eq!(target.navigation_listener_count(), 0);
    }

    #[test]
    fn dropped_listeners_are_skipped() {
        let target = Target::new(ScopeId::new(1));
        let rec = Recorder::new();
        let _key = target.on_navigation(Arc::downgrade(&rec) as Weak<dyn NavigationListener>);
        drop(rec);

        // No live listener left; dispatch must not panic.
        target.begin_navigation();
        target.commit_navigation(ScopeId::new(2));
        assert_eq!(target.navigation_listener_count(), 0);
    }

    #[test]
    fn listener_can_read_scope_during_dispatch() {
        struct ScopeReader {
            target: Mutex<Option<Arc<Target>>>,
            seen: AtomicU32,
        }

        impl NavigationListener for ScopeReader {
            fn will_navigate(&self) {}

            fn navigated(&self) {
                let target = self.target.lock().clone().unwrap();
                let _ = self
                    .seen
                    .store(target.scope().value() as u32, Ordering::SeqCst);
            }
        }

        let target = Target::new(ScopeId::new(1));
        let reader = Arc::new(ScopeReader {
            target: Mutex::new(Some(Arc::clone(&target))),
            seen: AtomicU32::new(0),
        });
        let _key = target.on_navigation(Arc::downgrade(&reader) as Weak<dyn NavigationListener>);

        // Would deadlock if dispatch held the target lock.
        target.commit_navigation(ScopeId::new(9));
        assert_eq!(reader.seen.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn keys_are_distinct() {
        let target = Target::new(ScopeId::new(1));
        let a = Recorder::new();
        let b = Recorder::new();
        let ka = target.on_navigation(Arc::downgrade(&a) as Weak<dyn NavigationListener>);
        let kb = target.on_navigation(Arc::downgrade(&b) as Weak<dyn NavigationListener>);
        assert_ne!(ka, kb);

        target.off_navigation(ka);
        target.begin_navigation();
        assert_eq!(a.wills.load(Ordering::SeqCst), 0);
        assert_eq!(b.wills.load(Ordering::SeqCst), 1);
    }
}
