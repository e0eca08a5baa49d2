//! Relinkable, possibly-empty shared references to market data.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::observer::{Observable, Observed, Observer};

/// The shared slot behind every clone of a [`Handle`].
///
/// The slot observes its current target and forwards the target's
/// notifications to the handle's own observers.
struct Link<T: ?Sized> {
    target: RwLock<Option<Arc<T>>>,
    observable: Observable,
}

impl<T: Observed + ?Sized + 'static> Observer for Link<T> {
    fn update(&self) {
        self.observable.notify_observers();
    }
}

/// A shared reference to a curve or quote that may be empty and may be
/// pointed at a different object later.
///
/// Clones share the same slot: relinking one clone relinks them all and
/// notifies everything observing the handle.
///
/// ```rust
/// use std::sync::Arc;
/// use hazard_curves::{Handle, SimpleQuote};
///
/// let recovery: Handle<SimpleQuote> = Handle::empty();
/// assert!(recovery.is_empty());
///
/// let shared = recovery.clone();
/// recovery.link_to(Some(Arc::new(SimpleQuote::new(0.4))));
/// assert_eq!(shared.current().and_then(|q| q.value()), Some(0.4));
/// ```
pub struct Handle<T: ?Sized> {
    link: Arc<Link<T>>,
}

impl<T: Observed + ?Sized + 'static> Handle<T> {
    /// Creates a handle pointing at `target`.
    #[must_use]
    pub fn new(target: Arc<T>) -> Self {
        let handle = Self::empty();
        target.observable().register_observer(handle.as_observer());
        *handle.link.target.write() = Some(target);
        handle
    }

    /// Creates an empty handle.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            link: Arc::new(Link {
                target: RwLock::new(None),
                observable: Observable::new(),
            }),
        }
    }

    /// Points the handle at a new target (or at nothing) and notifies
    /// observers.
    pub fn link_to(&self, target: Option<Arc<T>>) {
        let observer = self.as_observer();
        if let Some(next) = &target {
            next.observable().register_observer(observer.clone());
        }
        let unchanged = matches!(
            (&target, &*self.link.target.read()),
            (Some(next), Some(current)) if same_target(next, current)
        );
        let previous = std::mem::replace(&mut *self.link.target.write(), target);
        if let Some(previous) = previous.filter(|_| !unchanged) {
            previous.observable().unregister_observer(&observer);
        }
        self.link.observable.notify_observers();
    }

    /// The current target, if any.
    pub fn current(&self) -> Option<Arc<T>> {
        self.link.target.read().clone()
    }

    /// Returns true if the handle points at nothing.
    pub fn is_empty(&self) -> bool {
        self.link.target.read().is_none()
    }

    fn as_observer(&self) -> Weak<dyn Observer> {
        let weak: Weak<Link<T>> = Arc::downgrade(&self.link);
        weak
    }
}

impl<T: Observed + ?Sized + 'static> Observed for Handle<T> {
    fn observable(&self) -> &Observable {
        &self.link.observable
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: Observed + ?Sized + 'static> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

fn same_target<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl<T: ?Sized> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("empty", &self.link.target.read().is_none())
            .finish()
    }
}
