//! Observable/Subject pair over one shared value.
//!
//! Delivery is synchronous: [`Subject::next`] does not return until every
//! subscriber registered when delivery began has been called with the new
//! value. The subscriber list is snapshotted before callbacks run, so
//! callbacks may subscribe, unsubscribe or publish again without
//! invalidating the round in progress:
//!   - A subscriber added during delivery is not called in that round
//!     (it still gets its own replay call from `subscribe`).
//!   - A subscriber removed during delivery is still called in that round.
//!   - A nested `next` delivers its own value to everyone before the outer
//!     round resumes with the value it started with.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
    next_id: Cell<u64>,
}

impl<T: Clone> Shared<T> {
    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn publish(&self, value: T) {
        *self.value.borrow_mut() = value.clone();

        // Borrows are released before any callback runs.
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(&value);
        }
    }
}

/// Consumer side of a reactive value: read and subscribe.
///
/// Cloning an `Observable` yields another handle to the same value and the
/// same subscriber list.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.shared.value.borrow())
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Register `callback` and immediately call it once with the current value.
    ///
    /// The returned id can be passed to [`Observable::unsubscribe`].
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.shared.next_id.get());
        self.shared.next_id.set(id.0 + 1);

        let callback: Callback<T> = Rc::new(callback);
        self.shared
            .subscribers
            .borrow_mut()
            .push((id, Rc::clone(&callback)));

        let current = self.shared.get();
        callback(&current);
        id
    }

    /// Remove the subscription `id`. Unknown or already removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subscribers = self.shared.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        if subscribers.len() == before {
            log::trace!("unsubscribe: no subscription {:?}", id);
        }
    }

    /// The last published value.
    pub fn get_value(&self) -> T {
        self.shared.get()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

/// Producer side of a reactive value: read and publish.
///
/// Hand out [`Subject::as_observable`] to consumers so they can watch the
/// value without being able to change it.
pub struct Subject<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("value", &*self.shared.value.borrow())
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Store `value` and deliver it to every current subscriber, in
    /// registration order. Equal values are delivered again.
    pub fn next(&self, value: T) {
        self.shared.publish(value);
    }

    /// The last published value.
    pub fn get_value(&self) -> T {
        self.shared.get()
    }

    /// A read-only handle to this value.
    pub fn as_observable(&self) -> Observable<T> {
        Observable {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Default + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
