//! Application State Management
//!
//! This module manages the state shared by every handler: the catalog, one
//! cart store and one checkout per session, and the injected payment and
//! suggestion collaborators.

use crate::{
    cart::store::{CartStore, StorageKeys},
    catalog::Catalog,
    checkout::{
        models::{CheckoutPhase, CheckoutSession, CheckoutView},
        payment::PaymentGateway,
    },
    storage::KeyValueStorage,
    suggest::service::ToolSuggestionService,
};
use dashmap::{mapref::one::RefMut, DashMap};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::info;

/// Storage namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "changChao";

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Core application state
pub struct AppState {
    pub catalog: Catalog,

    /// Open cart stores, keyed by session id.
    /// DashMap allows concurrent access without external Mutexes.
    sessions: DashMap<String, CartStore>,

    /// In-flight checkouts, keyed by session id. Not persisted.
    checkouts: DashMap<String, CheckoutSession>,

    /// Last mutating access of every session held in memory.
    activity: DashMap<String, Instant>,

    storage: Arc<dyn KeyValueStorage>,
    namespace: String,

    pub payments: Arc<dyn PaymentGateway>,
    pub suggestions: Arc<dyn ToolSuggestionService>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        storage: Arc<dyn KeyValueStorage>,
        payments: Arc<dyn PaymentGateway>,
        suggestions: Arc<dyn ToolSuggestionService>,
    ) -> Self {
        Self {
            catalog,
            sessions: DashMap::new(),
            checkouts: DashMap::new(),
            activity: DashMap::new(),
            storage,
            namespace: DEFAULT_NAMESPACE.to_string(),
            payments,
            suggestions,
        }
    }

    /// Overrides the prefix of every storage key.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn open_store(&self, session_id: &str) -> CartStore {
        CartStore::open(
            self.storage.clone(),
            StorageKeys::for_session(&self.namespace, session_id),
        )
    }

    fn touch(&self, session_id: &str) {
        self.activity.insert(session_id.to_string(), Instant::now());
    }

    fn touch_if_held(&self, session_id: &str) {
        if let Some(mut seen) = self.activity.get_mut(session_id) {
            *seen = Instant::now();
        }
    }

    /// Cart store of `session_id`, opened from storage on first use.
    ///
    /// The returned guard locks the session; drop it before awaiting.
    pub fn store(&self, session_id: &str) -> RefMut<'_, String, CartStore> {
        self.touch(session_id);
        if let Some(store) = self.sessions.get_mut(session_id) {
            return store;
        }

        // Storage is read before the shard lock is taken.
        let opened = self.open_store(session_id);
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!(session_id, "starting session");
                opened
            })
    }

    /// Runs `read` against the cart store of `session_id`.
    ///
    /// A session that is not held in memory is read from storage and is
    /// not kept.
    pub fn read_store<R>(&self, session_id: &str, read: impl FnOnce(&CartStore) -> R) -> R {
        match self.sessions.get(session_id) {
            Some(store) => {
                let out = read(&store);
                drop(store);
                self.touch_if_held(session_id);
                out
            }
            None => read(&self.open_store(session_id)),
        }
    }

    /// Checkout of `session_id`, created in the `Cart` phase on first use.
    pub fn checkout(&self, session_id: &str) -> RefMut<'_, String, CheckoutSession> {
        self.touch(session_id);
        self.checkouts.entry(session_id.to_string()).or_default()
    }

    /// Current checkout of `session_id`; a session without one is in `Cart`.
    pub fn checkout_view(&self, session_id: &str) -> CheckoutView {
        let view = self.checkouts.get(session_id).map(|c| c.view());
        match view {
            Some(view) => {
                self.touch_if_held(session_id);
                view
            }
            None => CheckoutSession::default().view(),
        }
    }

    /// Number of sessions held in memory.
    pub fn session_count(&self) -> usize {
        self.activity.len()
    }

    /// Drops the in-memory state of a session. Persisted data stays.
    pub fn end_session(&self, session_id: &str) {
        self.activity.remove(session_id);
        self.checkouts.remove(session_id);
        if self.sessions.remove(session_id).is_some() {
            info!(session_id, "ended session");
        }
    }

    /// Ends every session untouched for at least `max_idle`, and returns
    /// how many were ended. Sessions with a payment in flight are kept.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let is_idle = |seen: &Instant| now.saturating_duration_since(*seen) >= max_idle;

        let candidates: Vec<String> = self
            .activity
            .iter()
            .filter(|entry| is_idle(entry.value()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut evicted = 0;
        for session_id in candidates {
            let paying = self
                .checkouts
                .get(&session_id)
                .is_some_and(|c| c.phase() == CheckoutPhase::PaymentProcessing);
            if paying {
                continue;
            }
            // Skips sessions touched since the scan.
            if self
                .activity
                .remove_if(&session_id, |_, seen| is_idle(seen))
                .is_none()
            {
                continue;
            }
            self.end_session(&session_id);
            evicted += 1;
        }

        if evicted > 0 {
            info!(evicted, remaining = self.session_count(), "evicted idle sessions");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cart::models::PurchaseType,
        checkout::payment::{FixedPaymentGateway, PaymentOutcome},
        storage::MemoryStorage,
        suggest::models::SuggestError,
    };
    use async_trait::async_trait;

    struct NoSuggestions;

    #[async_trait]
    impl ToolSuggestionService for NoSuggestions {
        async fn suggest(&self, _document: &str) -> Result<Vec<String>, SuggestError> {
            Ok(Vec::new())
        }
    }

    fn state(storage: Arc<dyn KeyValueStorage>) -> AppState {
        AppState::new(
            Catalog::builtin(),
            storage,
            Arc::new(FixedPaymentGateway(PaymentOutcome::Approved)),
            Arc::new(NoSuggestions),
        )
        .with_namespace("test")
    }

    #[test]
    fn stores_use_the_configured_namespace() {
        let storage = Arc::new(MemoryStorage::new());
        let state = state(storage.clone());
        let drill = state.catalog.lookup("1").unwrap().clone();

        state
            .store("abc")
            .add_to_cart(&drill, PurchaseType::Buy, 1, None);

        assert!(storage.get("testCart-abc").unwrap().is_some());
        assert!(storage.get("changChaoCart-abc").unwrap().is_none());
    }

    #[test]
    fn ended_session_reloads_from_storage() {
        let state = state(Arc::new(MemoryStorage::new()));
        let drill = state.catalog.lookup("1").unwrap().clone();

        state
            .store("abc")
            .add_to_cart(&drill, PurchaseType::Buy, 2, None);
        state.checkout("abc");
        state.end_session("abc");

        assert_eq!(state.store("abc").quantity_of("1"), 2);
        assert_eq!(state.checkout("abc").phase(), Default::default());
    }

    #[test]
    fn reads_do_not_hold_sessions() {
        let storage = Arc::new(MemoryStorage::new());
        let state = state(storage.clone());
        let drill = state.catalog.lookup("1").unwrap().clone();

        for n in 0..100 {
            let id = format!("reader-{n}");
            assert!(state.read_store(&id, |store| store.is_empty()));
            assert_eq!(state.checkout_view(&id).phase, CheckoutPhase::Cart);
        }
        assert_eq!(state.session_count(), 0);

        // Persisted state is visible without opening the session.
        state.store("abc").add_to_cart(&drill, PurchaseType::Buy, 1, None);
        state.end_session("abc");
        assert_eq!(state.read_store("abc", |store| store.quantity_of("1")), 1);
        assert_eq!(state.session_count(), 0);
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let state = state(Arc::new(MemoryStorage::new()));
        let drill = state.catalog.lookup("1").unwrap().clone();

        state.store("abc").add_to_cart(&drill, PurchaseType::Buy, 1, None);
        state.checkout("def");
        assert_eq!(state.session_count(), 2);

        assert_eq!(state.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(state.session_count(), 2);

        assert_eq!(state.evict_idle(Duration::ZERO), 2);
        assert_eq!(state.session_count(), 0);
        // The cart survives in storage.
        assert_eq!(state.store("abc").quantity_of("1"), 1);
    }

    #[test]
    fn sessions_with_a_payment_in_flight_are_kept() {
        let state = state(Arc::new(MemoryStorage::new()));
        let drill = state.catalog.lookup("1").unwrap().clone();

        state.store("abc").add_to_cart(&drill, PurchaseType::Buy, 1, None);
        let items = state.store("abc").items().to_vec();
        {
            let mut checkout = state.checkout("abc");
            checkout.begin(items, Vec::new()).unwrap();
            checkout.accept_agreement(true).unwrap();
            checkout.start_payment().unwrap();
        }

        assert_eq!(state.evict_idle(Duration::ZERO), 0);
        assert_eq!(
            state.checkout_view("abc").phase,
            CheckoutPhase::PaymentProcessing
        );
    }
}
