// File: ./src/reactive.rs
/*! Change-notifying values for the single-threaded view layer.

An [`Observable`] holds the latest value of something (a store query, the
search text, a derived list) and synchronously calls its subscribers whenever
that value is replaced. Derived values are wired with [`derive`]: the compute
closure reads the *current* value of every input, so a change in any one
source recomputes against the latest value of all the others.

Everything here is `Rc`/`RefCell` based and stays on one thread.
*/

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    // Bumped on every write so a dispatch can tell it has been superseded.
    version: u64,
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// A shared, change-notifying value. Clones share the same cell.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrows the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutates the value in place and notifies every subscriber.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
        }
        self.notify();
    }

    /// Re-emits the current value.
    ///
    /// Listeners may read this observable, drop their own subscription, or
    /// write a new value. A write from inside a listener starts a nested
    /// dispatch of the newer value to every listener, and the outer dispatch
    /// stops there, so no listener sees the older value after the newer one.
    pub fn notify(&self) {
        let (value, version, listeners) = {
            let inner = self.inner.borrow();
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (inner.value.clone(), inner.version, listeners)
        };
        for listener in listeners {
            if self.inner.borrow().version != version {
                break;
            }
            listener(&value);
        }
    }

    /// Registers `f` to run after every change. It does not run for the current value.
    /// The listener stays registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(f)));
            id
        };

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Detaches a listener when dropped.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

/// Type-erased "something changed" source, so observables of different
/// value types can feed one derived value.
pub trait Trigger {
    fn on_change(&self, f: Rc<dyn Fn()>) -> Subscription;
}

impl<T: Clone + 'static> Trigger for Observable<T> {
    fn on_change(&self, f: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| f())
    }
}

/// Keeps `target` equal to `compute()`.
///
/// `compute` runs once immediately, then again whenever any of `sources` emits.
/// It is expected to read the sources itself, so every recomputation sees the
/// latest value of every input rather than only the one that fired.
pub fn derive<T: Clone + 'static>(
    target: &Observable<T>,
    sources: &[&dyn Trigger],
    compute: impl Fn() -> T + 'static,
) -> Vec<Subscription> {
    let target = target.clone();
    let recompute: Rc<dyn Fn()> = Rc::new(move || target.set(compute()));
    recompute();
    sources
        .iter()
        .map(|source| source.on_change(Rc::clone(&recompute)))
        .collect()
}
