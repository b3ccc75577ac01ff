//! Cart / Rental Store
//!
//! Authoritative cart and rental ledger of one session. Every mutation is
//! followed by a full write of the affected collection; reads are served
//! from memory.

use super::{
    helpers::{cart_total, coalesce_line_items, merge_line_item},
    models::{CartLineItem, LineKey, PurchaseType, RentalDuration},
};
use crate::{
    catalog::models::Tool,
    rental::{
        helpers::{generate_rental_id, today},
        models::{NewRental, RentalEntry},
    },
    storage::{load_collection, save_collection, KeyValueStorage},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage keys of one session's collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cart: String,
    pub rental_history: String,
}

impl StorageKeys {
    /// `<namespace>Cart-<session>` and `<namespace>RentalHistory-<session>`.
    pub fn for_session(namespace: &str, session_id: &str) -> Self {
        Self {
            cart: format!("{namespace}Cart-{session_id}"),
            rental_history: format!("{namespace}RentalHistory-{session_id}"),
        }
    }
}

pub struct CartStore {
    items: Vec<CartLineItem>,
    rentals: Vec<RentalEntry>,
    storage: Arc<dyn KeyValueStorage>,
    keys: StorageKeys,
}

impl CartStore {
    /// Loads both collections; unreadable state starts empty.
    pub fn open(storage: Arc<dyn KeyValueStorage>, keys: StorageKeys) -> Self {
        let items = load_collection(storage.as_ref(), &keys.cart);
        let rentals = load_collection(storage.as_ref(), &keys.rental_history);
        debug!(
            cart_key = %keys.cart,
            items = items.len(),
            rentals = rentals.len(),
            "opened cart store"
        );

        Self {
            items,
            rentals,
            storage,
            keys,
        }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn rentals(&self) -> &[RentalEntry] {
        &self.rentals
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units of `tool_id` across all of its lines.
    pub fn quantity_of(&self, tool_id: &str) -> u64 {
        self.items
            .iter()
            .filter(|i| i.tool.id == tool_id)
            .map(|i| u64::from(i.quantity))
            .sum()
    }

    /// Adds `quantity` units, merging into a line with the same key.
    ///
    /// Stock is not checked here. A zero quantity is ignored.
    pub fn add_to_cart(
        &mut self,
        tool: &Tool,
        purchase_type: PurchaseType,
        quantity: u32,
        rental_duration: Option<RentalDuration>,
    ) {
        if quantity == 0 {
            return;
        }

        let key = LineKey::new(&tool.id, purchase_type, rental_duration);
        merge_line_item(
            &mut self.items,
            CartLineItem {
                tool: tool.clone(),
                quantity,
                purchase_type,
                rental_duration: key.rental_duration,
            },
        );
        self.persist_cart();
    }

    /// Removes every line matching the key.
    pub fn remove_from_cart(
        &mut self,
        tool_id: &str,
        purchase_type: PurchaseType,
        rental_duration: Option<RentalDuration>,
    ) {
        let key = LineKey::new(tool_id, purchase_type, rental_duration);
        self.items.retain(|i| !i.matches(&key));
        self.persist_cart();
    }

    /// Sets the quantity of matching lines; below 1 removes them instead.
    pub fn update_item_quantity(
        &mut self,
        tool_id: &str,
        purchase_type: PurchaseType,
        rental_duration: Option<RentalDuration>,
        new_quantity: i64,
    ) {
        if new_quantity < 1 {
            self.remove_from_cart(tool_id, purchase_type, rental_duration);
            return;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        let key = LineKey::new(tool_id, purchase_type, rental_duration);
        for item in self.items.iter_mut().filter(|i| i.matches(&key)) {
            item.quantity = quantity;
        }
        self.persist_cart();
    }

    /// Changes the duration of every rent line of `tool_id`.
    ///
    /// Lines that end up with the same key are merged into the first one.
    pub fn update_item_duration(&mut self, tool_id: &str, new_duration: RentalDuration) {
        for item in self
            .items
            .iter_mut()
            .filter(|i| i.tool.id == tool_id && i.purchase_type == PurchaseType::Rent)
        {
            item.rental_duration = Some(new_duration.clone());
        }
        coalesce_line_items(&mut self.items);
        self.persist_cart();
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist_cart();
    }

    /// Takes the units of a checked-out snapshot out of the cart.
    ///
    /// Lines added after the snapshot, and units added to a snapshotted line
    /// since, stay in the cart.
    pub fn remove_purchased(&mut self, purchased: &[CartLineItem]) {
        for bought in purchased {
            let key = bought.key();
            let mut left = bought.quantity;
            for item in self.items.iter_mut().filter(|i| i.matches(&key)) {
                let taken = left.min(item.quantity);
                item.quantity -= taken;
                left -= taken;
            }
        }
        self.items.retain(|i| i.quantity > 0);
        self.persist_cart();
    }

    pub fn cart_total(&self) -> u64 {
        cart_total(&self.items)
    }

    /// Records a confirmed rental dated today, newest first, and returns its id.
    pub fn add_rental_to_history(&mut self, new: NewRental) -> String {
        let id = generate_rental_id();
        let entry = RentalEntry::confirmed(new, id.clone(), today());
        self.rentals.insert(0, entry);
        self.persist_rentals();
        id
    }

    pub fn rental_by_id(&self, id: &str) -> Option<&RentalEntry> {
        self.rentals.iter().find(|r| r.id == id)
    }

    fn persist_cart(&self) {
        if let Err(e) = save_collection(self.storage.as_ref(), &self.keys.cart, &self.items) {
            warn!(key = %self.keys.cart, error = %e, "failed to persist cart");
        }
    }

    fn persist_rentals(&self) {
        if let Err(e) = save_collection(
            self.storage.as_ref(),
            &self.keys.rental_history,
            &self.rentals,
        ) {
            warn!(key = %self.keys.rental_history, error = %e, "failed to persist rental history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rental::models::{RentalEntryItem, RentalStatus},
        storage::{FileStorage, MemoryStorage},
    };

    fn drill() -> Tool {
        Tool {
            id: "1".into(),
            name: "Heavy Duty Electric Drill XR-5000".into(),
            stock: 3,
            price_buy: Some(3500),
            price_rent: 500,
            ..Default::default()
        }
    }

    fn open_store(storage: Arc<dyn KeyValueStorage>) -> CartStore {
        CartStore::open(storage, StorageKeys::for_session("changChao", "test"))
    }

    fn memory_store() -> CartStore {
        open_store(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut store = memory_store();
        let tool = drill();

        for qty in [1, 2, 4] {
            store.add_to_cart(&tool, PurchaseType::Rent, qty, Some(RentalDuration::ThreeDays));
        }

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 7);
    }

    #[test]
    fn rent_without_duration_defaults_to_one_day() {
        let mut store = memory_store();
        let tool = drill();

        store.add_to_cart(&tool, PurchaseType::Rent, 1, None);
        store.add_to_cart(&tool, PurchaseType::Rent, 1, Some(RentalDuration::OneDay));
        store.add_to_cart(&tool, PurchaseType::Buy, 1, Some(RentalDuration::OneWeek));

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[0].rental_duration, Some(RentalDuration::OneDay));
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(store.items()[1].rental_duration, None);
    }

    #[test]
    fn zero_quantity_add_is_ignored() {
        let mut store = memory_store();
        store.add_to_cart(&drill(), PurchaseType::Buy, 0, None);
        assert!(store.is_empty());
    }

    #[test]
    fn quantity_below_one_removes_the_line() {
        let mut store = memory_store();
        let tool = drill();
        store.add_to_cart(&tool, PurchaseType::Rent, 2, Some(RentalDuration::OneWeek));
        store.add_to_cart(&tool, PurchaseType::Buy, 1, None);

        store.update_item_quantity("1", PurchaseType::Rent, Some(RentalDuration::OneWeek), 5);
        assert_eq!(store.items()[0].quantity, 5);

        store.update_item_quantity("1", PurchaseType::Rent, Some(RentalDuration::OneWeek), 0);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].purchase_type, PurchaseType::Buy);

        store.update_item_quantity("1", PurchaseType::Buy, None, -3);
        assert!(store.is_empty());
    }

    #[test]
    fn duration_change_remerges_colliding_lines() {
        let mut store = memory_store();
        let tool = drill();
        store.add_to_cart(&tool, PurchaseType::Rent, 1, Some(RentalDuration::OneDay));
        store.add_to_cart(&tool, PurchaseType::Buy, 1, None);
        store.add_to_cart(&tool, PurchaseType::Rent, 2, Some(RentalDuration::OneWeek));

        store.update_item_duration("1", RentalDuration::OneWeek);

        assert_eq!(store.items().len(), 2);
        let rent = &store.items()[0];
        assert_eq!(rent.purchase_type, PurchaseType::Rent);
        assert_eq!(rent.rental_duration, Some(RentalDuration::OneWeek));
        assert_eq!(rent.quantity, 3);
        assert_eq!(store.items()[1].purchase_type, PurchaseType::Buy);
    }

    #[test]
    fn totals_match_buy_and_rent_pricing() {
        let mut store = memory_store();
        let tool = drill();

        store.add_to_cart(&tool, PurchaseType::Buy, 2, None);
        assert_eq!(store.cart_total(), 7000);

        store.add_to_cart(&tool, PurchaseType::Rent, 1, Some(RentalDuration::ThreeDays));
        assert_eq!(store.cart_total(), 8500);

        store.remove_from_cart("1", PurchaseType::Buy, None);
        assert_eq!(store.cart_total(), 1500);

        store.clear_cart();
        assert_eq!(store.cart_total(), 0);
    }

    #[test]
    fn purchased_snapshot_leaves_later_additions() {
        let mut store = memory_store();
        let tool = drill();
        store.add_to_cart(&tool, PurchaseType::Rent, 1, Some(RentalDuration::OneWeek));
        let snapshot = store.items().to_vec();

        store.add_to_cart(&tool, PurchaseType::Buy, 1, None);
        store.add_to_cart(&tool, PurchaseType::Rent, 2, Some(RentalDuration::OneWeek));
        store.remove_purchased(&snapshot);

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.items()[0].purchase_type, PurchaseType::Rent);
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(store.items()[1].purchase_type, PurchaseType::Buy);

        store.remove_purchased(&store.items().to_vec());
        assert!(store.is_empty());
    }

    #[test]
    fn new_rentals_are_confirmed_today_and_newest_first() {
        let mut store = memory_store();
        let item = CartLineItem {
            tool: drill(),
            quantity: 1,
            purchase_type: PurchaseType::Rent,
            rental_duration: Some(RentalDuration::OneWeek),
        };

        let first = store.add_rental_to_history(NewRental {
            items: vec![RentalEntryItem::from_line_item(&item)],
            total_amount: 3500,
            rental_start_date: None,
            rental_due_date: None,
        });
        let second = store.add_rental_to_history(NewRental {
            items: Vec::new(),
            total_amount: 0,
            rental_start_date: None,
            rental_due_date: None,
        });

        let entry = store.rental_by_id(&first).unwrap();
        assert_eq!(entry.status, RentalStatus::Confirmed);
        assert_eq!(entry.rental_date, today());
        assert_eq!(entry.total_amount, 3500);

        assert_eq!(store.rentals()[0].id, second);
        assert!(store.rental_by_id("CCH-0-none0").is_none());
    }

    #[test]
    fn reopening_restores_cart_and_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());
        let tool = drill();

        let mut store = open_store(storage.clone());
        store.add_to_cart(&tool, PurchaseType::Rent, 1, Some(RentalDuration::from("5days")));
        store.add_to_cart(&tool, PurchaseType::Buy, 2, None);
        let rental_id = store.add_rental_to_history(NewRental {
            items: Vec::new(),
            total_amount: 100,
            rental_start_date: None,
            rental_due_date: None,
        });
        let before = store.items().to_vec();
        drop(store);

        let reopened = open_store(storage);
        assert_eq!(reopened.items(), before.as_slice());
        assert!(reopened.rental_by_id(&rental_id).is_some());
    }

    #[test]
    fn corrupt_storage_opens_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let keys = StorageKeys::for_session("changChao", "test");
        storage.set(&keys.cart, "[{broken").unwrap();

        let store = CartStore::open(storage, keys);
        assert!(store.is_empty());
        assert!(store.rentals().is_empty());
    }
}
