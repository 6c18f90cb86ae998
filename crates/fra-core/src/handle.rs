//! Shared, relinkable references to observable objects.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::patterns::{Observable, Observer, Relay, Subject};

struct HandleLink<T: ?Sized + Subject> {
    target: RwLock<Option<Arc<T>>>,
    observable: Arc<Observable>,
    relay: Arc<dyn Observer>,
    what: &'static str,
}

impl<T: ?Sized + Subject> Drop for HandleLink<T> {
    fn drop(&mut self) {
        if let Some(target) = self.target.get_mut().take() {
            target.unregister_observer(&self.relay);
        }
    }
}

/// A shared link to an observable object that may be empty or relinked.
///
/// Clones share the same link: relinking through any clone is seen by all
/// of them. The handle is itself a [`Subject`]; it relays every
/// notification of its current target and notifies on relink.
///
/// # Example
///
/// ```rust
/// use fra_core::handle::Handle;
/// use fra_core::settings::Settings;
/// use fra_core::types::Date;
/// use std::sync::Arc;
///
/// let handle: Handle<Settings> = Handle::empty("settings");
/// assert!(handle.current_link().is_err());
///
/// handle.link_to(Arc::new(Settings::new(Date::from_ymd(2024, 1, 2).unwrap())));
/// assert!(!handle.is_empty());
/// ```
pub struct Handle<T: ?Sized + Subject> {
    link: Arc<HandleLink<T>>,
}

impl<T: ?Sized + Subject + 'static> Handle<T> {
    /// Creates an unlinked handle; `what` names the target in errors.
    #[must_use]
    pub fn empty(what: &'static str) -> Self {
        let observable = Observable::shared();
        let relay = Relay::new(&observable, what);
        Self {
            link: Arc::new(HandleLink {
                target: RwLock::new(None),
                observable,
                relay,
                what,
            }),
        }
    }

    /// Creates a handle linked to `target`.
    #[must_use]
    pub fn new(target: Arc<T>, what: &'static str) -> Self {
        let handle = Self::empty(what);
        target.register_observer(&handle.link.relay);
        *handle.link.target.write() = Some(target);
        handle
    }

    /// Links the handle to a new target and notifies observers.
    pub fn link_to(&self, target: Arc<T>) {
        self.relink(Some(target));
    }

    /// Empties the handle and notifies observers.
    pub fn unlink(&self) {
        self.relink(None);
    }

    fn relink(&self, target: Option<Arc<T>>) {
        if let Some(new_target) = &target {
            new_target.register_observer(&self.link.relay);
        }
        let previous = std::mem::replace(&mut *self.link.target.write(), target);
        if let Some(old) = previous {
            // Relinking to the same object keeps the registration.
            let same = self
                .link
                .target
                .read()
                .as_ref()
                .is_some_and(|t| Arc::ptr_eq(t, &old));
            if !same {
                old.unregister_observer(&self.link.relay);
            }
        }
        debug!(handle = self.link.what, linked = !self.is_empty(), "handle relinked");
        self.link.observable.notify_observers();
    }

    /// Returns the current target.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::EmptyHandle` if the handle is not linked.
    pub fn current_link(&self) -> CoreResult<Arc<T>> {
        self.link
            .target
            .read()
            .clone()
            .ok_or_else(|| CoreError::empty_handle(self.link.what))
    }

    /// Returns true if the handle is not linked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link.target.read().is_none()
    }

    /// Returns true if both handles share the same link.
    #[must_use]
    pub fn same_link(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.link, &other.link)
    }
}

impl<T: ?Sized + Subject> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            link: Arc::clone(&self.link),
        }
    }
}

impl<T: ?Sized + Subject> Subject for Handle<T> {
    fn observable(&self) -> &Observable {
        &self.link.observable
    }
}

impl<T: ?Sized + Subject> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("what", &self.link.what)
            .field("linked", &self.link.target.read().is_some())
            .finish()
    }
}
