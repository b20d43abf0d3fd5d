//! Subscriber registry and screen routing.
//!
//! Observers register with [`Subscribers::subscribe`] and receive every
//! published event on an unbounded channel until they unsubscribe or drop
//! their receiver.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

/// Identifies a subscription for [`Subscribers::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A live subscription.
#[derive(Debug)]
pub struct Subscription<E> {
    pub id: SubscriptionId,
    pub receiver: mpsc::UnboundedReceiver<E>,
}

/// Fan-out of events of type `E` to any number of subscribers.
#[derive(Debug)]
pub struct Subscribers<E> {
    next_id: AtomicU64,
    senders: Mutex<Vec<(SubscriptionId, mpsc::UnboundedSender<E>)>>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> Subscribers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, sender));
        Subscription { id, receiver }
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let before = senders.len();
        senders.retain(|(existing, _)| *existing != id);
        senders.len() != before
    }

    /// Sends `event` to every subscriber and returns how many received it.
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&self, event: &E) -> usize {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        senders.len()
    }

    pub fn len(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Screens the application can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LoginScreen,
}

/// Publishes navigation requests to whoever renders screens.
#[derive(Debug, Default)]
pub struct RouteNavigator {
    subscribers: Subscribers<Route>,
}

impl RouteNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigate(&self, route: Route) {
        let delivered = self.subscribers.publish(&route);
        debug!(?route, delivered, "navigate");
    }

    pub fn subscribe(&self) -> Subscription<Route> {
        self.subscribers.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}
