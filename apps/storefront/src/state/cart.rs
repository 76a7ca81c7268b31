//! # Cart State
//!
//! Holds the session's cart and publishes a new snapshot after every change.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  dispatch(action)                                                       │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  ┌──────────────────── write lock ─────────────────────┐               │
//! │  │  cart.reduce(action)                                 │               │
//! │  │     ├── None ────────► no-op, nothing published      │               │
//! │  │     └── Some(next) ──► snapshot = { Arc(next), v+1 } │               │
//! │  │                        watch_tx.send_replace(..)     │               │
//! │  └──────────────────────────────────────────────────────┘               │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  snapshot queued ──► listeners called in order (no lock held)          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  dispatch returns                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delivery Order
//! Every listener sees snapshots in version order. A dispatch made from inside
//! a listener is queued and delivered once the current round has reached every
//! listener, so no listener is handed an older snapshot after a newer one.
//!
//! ## Snapshots
//! A snapshot shares its `Cart` through an `Arc`. Each change swaps in a new
//! `Arc`, so a snapshot held by a view never changes under it.
//!
//! ## Capabilities
//! `CartStore` is a cheap handle. [`CartStore::split`] gives a
//! [`CartDispatcher`] (write only) and a [`CartReader`] (read, subscribe,
//! watch) for components that should hold only one side.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use bazar_core::{Cart, CartAction, RawAction};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

// =============================================================================
// Snapshot
// =============================================================================

/// Immutable point-in-time view of the cart.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    cart: Arc<Cart>,
    version: u64,
    updated_at: DateTime<Utc>,
}

impl CartSnapshot {
    fn initial() -> Self {
        CartSnapshot {
            cart: Arc::new(Cart::new()),
            version: 0,
            updated_at: Utc::now(),
        }
    }

    fn advance(&self, next: Cart) -> Self {
        CartSnapshot {
            cart: Arc::new(next),
            version: self.version + 1,
            updated_at: Utc::now(),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Number of changes since the store was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when both snapshots share the same cart allocation.
    pub fn shares_cart_with(&self, other: &CartSnapshot) -> bool {
        Arc::ptr_eq(&self.cart, &other.cart)
    }
}

impl Deref for CartSnapshot {
    type Target = Cart;

    fn deref(&self) -> &Cart {
        &self.cart
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&CartSnapshot) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

/// Snapshots waiting to be handed to listeners.
#[derive(Default)]
struct Delivery {
    draining: bool,
    pending: VecDeque<CartSnapshot>,
}

/// Clears `draining` even if a listener panics.
struct DrainGuard<'a>(&'a Mutex<Delivery>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).draining = false;
    }
}

struct Inner {
    id: Uuid,
    state: RwLock<CartSnapshot>,
    listeners: Mutex<Listeners>,
    delivery: Mutex<Delivery>,
    watch_tx: watch::Sender<CartSnapshot>,
}

/// Session cart store.
///
/// ## Thread Safety
/// Uses `RwLock<CartSnapshot>` because:
/// - transitions must not interleave (write lock around reduce + swap)
/// - readers only clone an `Arc`, so they never wait on each other
///
/// Locks are never held while listeners run, so a listener may read the
/// store or dispatch again. Snapshots are queued under the write lock, so
/// delivery follows version order.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    /// Creates a store holding an empty cart.
    pub fn new() -> Self {
        let initial = CartSnapshot::initial();
        let (watch_tx, _) = watch::channel(initial.clone());

        CartStore {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                state: RwLock::new(initial),
                listeners: Mutex::new(Listeners::default()),
                delivery: Mutex::new(Delivery::default()),
                watch_tx,
            }),
        }
    }

    /// Store instance id (shows up in logs).
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Splits the store into its write and read capabilities.
    pub fn split(&self) -> (CartDispatcher, CartReader) {
        (
            CartDispatcher {
                store: self.clone(),
            },
            CartReader {
                store: self.clone(),
            },
        )
    }

    pub fn dispatcher(&self) -> CartDispatcher {
        CartDispatcher {
            store: self.clone(),
        }
    }

    pub fn reader(&self) -> CartReader {
        CartReader {
            store: self.clone(),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies an action and notifies listeners before returning.
    ///
    /// Called from inside a listener (or while another thread is delivering),
    /// the new snapshot is queued and reaches listeners right after the round
    /// in progress.
    ///
    /// ## Returns
    /// The snapshot after the action. Actions that change nothing return the
    /// current snapshot without notifying anyone.
    pub fn dispatch(&self, action: CartAction) -> CartSnapshot {
        let changed = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            match state.cart.reduce(&action) {
                Some(next) => {
                    *state = state.advance(next);
                    self.inner.watch_tx.send_replace(state.clone());
                    self.inner
                        .delivery
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pending
                        .push_back(state.clone());
                    Some(state.clone())
                }
                None => None,
            }
        };

        match changed {
            Some(snapshot) => {
                debug!(
                    store_id = %self.inner.id,
                    action = action.kind(),
                    version = snapshot.version(),
                    lines = snapshot.len(),
                    "Cart updated"
                );
                self.deliver_pending();
                snapshot
            }
            None => {
                debug!(
                    store_id = %self.inner.id,
                    action = action.kind(),
                    "Cart action had no effect"
                );
                self.snapshot()
            }
        }
    }

    /// Decodes and dispatches an envelope; undecodable actions are dropped.
    pub fn dispatch_raw(&self, raw: RawAction) -> CartSnapshot {
        match CartAction::try_from(raw) {
            Ok(action) => self.dispatch(action),
            Err(err) => {
                warn!(store_id = %self.inner.id, error = %err, "Ignoring cart action");
                self.snapshot()
            }
        }
    }

    /// Like [`CartStore::dispatch_raw`] for an arbitrary JSON value.
    pub fn dispatch_value(&self, value: Value) -> CartSnapshot {
        match serde_json::from_value::<RawAction>(value) {
            Ok(raw) => self.dispatch_raw(raw),
            Err(err) => {
                warn!(store_id = %self.inner.id, error = %err, "Ignoring malformed cart action");
                self.snapshot()
            }
        }
    }

    /// Registers a listener called synchronously after every change.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        listeners.entries.len() != before
    }

    /// Receiver for async consumers; updated before `dispatch` returns.
    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.inner.watch_tx.subscribe()
    }

    /// Hands queued snapshots to listeners until the queue is empty. Returns
    /// at once if a delivery round is already running.
    fn deliver_pending(&self) {
        {
            let mut delivery = self
                .inner
                .delivery
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }
        let _guard = DrainGuard(&self.inner.delivery);

        loop {
            let next = self
                .inner
                .delivery
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending
                .pop_front();

            match next {
                Some(snapshot) => self.notify(&snapshot),
                None => break,
            }
        }
    }

    fn notify(&self, snapshot: &CartSnapshot) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            (*listener)(snapshot);
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("CartStore")
            .field("id", &self.inner.id)
            .field("version", &snapshot.version())
            .field("lines", &snapshot.len())
            .finish()
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Write side of a [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartDispatcher {
    store: CartStore,
}

impl CartDispatcher {
    pub fn dispatch(&self, action: CartAction) -> CartSnapshot {
        self.store.dispatch(action)
    }

    pub fn dispatch_raw(&self, raw: RawAction) -> CartSnapshot {
        self.store.dispatch_raw(raw)
    }

    pub fn dispatch_value(&self, value: Value) -> CartSnapshot {
        self.store.dispatch_value(value)
    }
}

/// Read side of a [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartReader {
    store: CartStore,
}

impl CartReader {
    pub fn snapshot(&self) -> CartSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn watch(&self) -> watch::Receiver<CartSnapshot> {
        self.store.watch()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bazar_core::{ProductDescriptor, ProductId};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn add(id: i64) -> CartAction {
        CartAction::add(ProductDescriptor::new(id).with_attribute("name", format!("Producto {}", id)))
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = CartStore::new();
        let snapshot = store.snapshot();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.version(), 0);
    }

    #[test]
    fn test_dispatch_returns_post_mutation_snapshot() {
        let store = CartStore::new();

        store.dispatch(add(1));
        let snapshot = store.dispatch(add(1));

        assert_eq!(snapshot.quantity_of(&ProductId::from(1)), 2);
        assert_eq!(snapshot.version(), 2);
        assert_eq!(store.snapshot().version(), 2);
    }

    #[test]
    fn test_listener_sees_new_state_before_dispatch_returns() {
        let store = CartStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store.subscribe(move |snapshot| {
            sink.lock().unwrap().push((snapshot.version(), snapshot.total_quantity()));
        });

        store.dispatch(add(1));
        assert_eq!(*seen.lock().unwrap(), vec![(1, 1)]);

        store.dispatch(add(2));
        store.dispatch(CartAction::ClearCart);
        assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 2), (3, 0)]);
    }

    #[test]
    fn test_listener_can_read_store() {
        let store = CartStore::new();
        let reader = store.reader();
        let matched = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&matched);
        store.subscribe(move |snapshot| {
            if reader.snapshot().version() == snapshot.version() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.dispatch(add(1));
        store.dispatch(add(1));
        assert_eq!(matched.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_can_dispatch() {
        let store = CartStore::new();
        let dispatcher = store.dispatcher();

        // Cap product 1 at two units.
        store.subscribe(move |snapshot| {
            if snapshot.quantity_of(&ProductId::from(1)) > 2 {
                dispatcher.dispatch(CartAction::decrement(1));
            }
        });

        for _ in 0..3 {
            store.dispatch(add(1));
        }
        assert_eq!(store.snapshot().quantity_of(&ProductId::from(1)), 2);
    }

    #[test]
    fn test_nested_dispatch_is_delivered_in_order() {
        let store = CartStore::new();
        let dispatcher = store.dispatcher();
        let first_seen = Arc::new(Mutex::new(Vec::new()));
        let second_seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&first_seen);
        store.subscribe(move |snapshot| {
            sink.lock().unwrap().push(snapshot.version());
            if snapshot.version() == 1 {
                dispatcher.dispatch(add(2));
            }
        });
        let sink = Arc::clone(&second_seen);
        store.subscribe(move |snapshot| {
            sink.lock().unwrap().push(snapshot.version());
        });

        let returned = store.dispatch(add(1));

        assert_eq!(returned.version(), 1);
        assert_eq!(store.snapshot().version(), 2);
        assert_eq!(*first_seen.lock().unwrap(), vec![1, 2]);
        assert_eq!(*second_seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_listener_panic_does_not_stop_delivery() {
        let store = CartStore::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        store.subscribe(move |snapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
            if snapshot.version() == 1 {
                panic!("listener failure");
            }
        });

        let dispatcher = store.dispatcher();
        let result = std::thread::spawn(move || {
            dispatcher.dispatch(add(1));
        })
        .join();
        assert!(result.is_err());

        store.dispatch(add(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.snapshot().version(), 2);
    }

    #[test]
    fn test_no_op_does_not_notify() {
        let store = CartStore::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let snapshot = store.dispatch(CartAction::remove(99));
        store.dispatch(CartAction::ClearCart);
        store.dispatch(CartAction::decrement(5));

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.version(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let store = CartStore::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(add(1));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(add(2));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_held_snapshot_is_unaffected() {
        let store = CartStore::new();
        store.dispatch(add(1));

        let held = store.snapshot();
        store.dispatch(add(1));
        store.dispatch(add(2));
        store.dispatch(CartAction::remove(1));

        assert_eq!(held.version(), 1);
        assert_eq!(held.quantity_of(&ProductId::from(1)), 1);
        assert_eq!(held.len(), 1);
        assert!(!held.shares_cart_with(&store.snapshot()));
    }

    #[test]
    fn test_reads_share_the_same_cart() {
        let store = CartStore::new();
        store.dispatch(add(1));
        assert!(store.snapshot().shares_cart_with(&store.snapshot()));
    }

    #[test]
    fn test_dispatch_raw_ignores_bad_actions() {
        let store = CartStore::new();
        store.dispatch(add(1));

        let snapshot = store.dispatch_raw(RawAction::new("SET_QUANTITY", Some(json!({ "id": 1 }))));
        assert_eq!(snapshot.version(), 1);

        let snapshot = store.dispatch_raw(RawAction::new("ADD_ITEM", None));
        assert_eq!(snapshot.version(), 1);

        let snapshot = store.dispatch_value(json!(["not", "an", "action"]));
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.quantity_of(&ProductId::from(1)), 1);
    }

    #[test]
    fn test_dispatch_value_decodes_browser_actions() {
        let store = CartStore::new();
        store.dispatch_value(json!({ "type": "ADD_ITEM", "payload": { "id": 1, "name": "Producto 1" } }));
        store.dispatch_value(json!({ "type": "ADD_ITEM", "payload": { "id": 1, "name": "Producto 1" } }));
        let snapshot =
            store.dispatch_value(json!({ "type": "DECREMENT_ITEM", "payload": { "id": 1 } }));

        assert_eq!(snapshot.quantity_of(&ProductId::from(1)), 1);
        assert_eq!(snapshot.version(), 3);
    }

    #[test]
    fn test_split_capabilities_share_state() {
        let store = CartStore::new();
        let (dispatcher, reader) = store.split();

        dispatcher.dispatch(add(3));
        assert_eq!(reader.snapshot().quantity_of(&ProductId::from(3)), 1);
        assert_eq!(store.snapshot().version(), 1);
    }

    #[test]
    fn test_replay_matches_store() {
        let actions = vec![add(1), add(2), add(1), CartAction::decrement(2), add(3)];
        let store = CartStore::new();
        for action in &actions {
            store.dispatch(action.clone());
        }
        assert_eq!(*store.snapshot().cart(), Cart::replay(&actions));
    }

    #[tokio::test]
    async fn test_watch_receives_changes() {
        let store = CartStore::new();
        let mut rx = store.watch();

        store.dispatch(add(1));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().version(), 1);

        let dispatcher = store.dispatcher();
        let handle = tokio::spawn(async move {
            dispatcher.dispatch(add(2));
        });

        rx.changed().await.unwrap();
        handle.await.unwrap();
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.len(), 2);
    }
}
