//! Change notification between market data and its dependents.
//!
//! Curves, quotes and handles each own an [`Observable`]. Dependents
//! implement [`Observer`] and register a weak reference, so an observable
//! never keeps its observers alive. Notification is synchronous and
//! transitive: a handle forwards its target's notifications, an engine
//! forwards its handles', and the instrument at the end of the chain marks
//! its cached result stale.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Receives change notifications.
pub trait Observer: Send + Sync {
    /// Called when something this observer registered with has changed.
    fn update(&self);
}

/// Anything that exposes an [`Observable`] to subscribe to.
pub trait Observed: Send + Sync {
    /// The notifier for this object.
    fn observable(&self) -> &Observable;
}

/// A list of weakly-held observers.
#[derive(Default)]
pub struct Observable {
    observers: Mutex<Vec<Weak<dyn Observer>>>,
}

impl Observable {
    /// Creates an observable with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Registering the same observer twice is a no-op.
    pub fn register_observer(&self, observer: Weak<dyn Observer>) {
        let mut observers = self.observers.lock();
        observers.retain(|w| w.strong_count() > 0);
        if !observers.iter().any(|w| same_observer(w, &observer)) {
            observers.push(observer);
        }
    }

    /// Removes an observer if registered.
    pub fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observers
            .lock()
            .retain(|w| w.strong_count() > 0 && !same_observer(w, observer));
    }

    /// Notifies every live observer and drops the dead ones.
    ///
    /// The observer list is not locked while observers run, so an observer
    /// may register or unregister itself from within `update`.
    pub fn notify_observers(&self) {
        let live: Vec<Arc<dyn Observer>> = {
            let mut observers = self.observers.lock();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for observer in live {
            observer.update();
        }
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

impl std::fmt::Debug for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn same_observer(a: &Weak<dyn Observer>, b: &Weak<dyn Observer>) -> bool {
    std::ptr::eq(a.as_ptr().cast::<()>(), b.as_ptr().cast::<()>())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts notifications.
    #[derive(Default)]
    pub(crate) struct Counter(pub(crate) AtomicUsize);

    impl Counter {
        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Observer for Counter {
        fn update(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub(crate) fn watch(observable: &Observable) -> Arc<Counter> {
        let counter = Arc::new(Counter::default());
        let weak: Weak<Counter> = Arc::downgrade(&counter);
        observable.register_observer(weak);
        counter
    }

    #[test]
    fn test_notify_reaches_observers() {
        let observable = Observable::new();
        let a = watch(&observable);
        let b = watch(&observable);

        observable.notify_observers();
        observable.notify_observers();

        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_dead_observers_are_pruned() {
        let observable = Observable::new();
        let a = watch(&observable);
        {
            let _b = watch(&observable);
            assert_eq!(observable.observer_count(), 2);
        }
        observable.notify_observers();
        assert_eq!(observable.observer_count(), 1);
        assert_eq!(a.count(), 1);
    }

    #[test]
    fn test_register_twice_and_unregister() {
        let observable = Observable::new();
        let counter = Arc::new(Counter::default());
        let weak: Weak<dyn Observer> = Arc::downgrade(&counter) as Weak<Counter>;

        observable.register_observer(weak.clone());
        observable.register_observer(weak.clone());
        assert_eq!(observable.observer_count(), 1);

        observable.unregister_observer(&weak);
        observable.notify_observers();
        assert_eq!(counter.count(), 0);
    }
}
