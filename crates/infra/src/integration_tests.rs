//! Integration tests for the full inventory pipeline.
//!
//! Tests: Predict → InventoryStore → ChangeBus → Notifications
//!
//! Verifies:
//! - Saved predictions come back from `list` exactly as predicted
//! - Every mutation is signalled to subscribers and observers
//! - The expiring-soon set and notifications follow the stored expiry dates
//! - Storage failures surface on write and recover on read

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use foodwise_ai::{ExpiryModel, RiskLevel, RuleCascadeModel};
use foodwise_core::{FoodAttributes, FoodCategory, FoodItemId, Packaging};
use foodwise_events::{ChangeBus, ChangeKind, InMemoryChangeBus, InventoryChange};
use foodwise_inventory::{
    NewFoodItem, NotificationLevel, NotificationThresholds, derive_notifications, expiry_date_after,
};

use crate::store::{InMemoryBackend, InventoryStore, JsonFileBackend, StorageError, StoreError};

type Bus = Arc<InMemoryChangeBus<InventoryChange>>;

fn in_memory_store() -> (InventoryStore<Arc<InMemoryBackend>, Bus>, Bus) {
    let bus: Bus = Arc::new(InMemoryChangeBus::new());
    (InventoryStore::new(InMemoryBackend::arc(), bus.clone()), bus)
}

fn file_store(path: &Path) -> InventoryStore<JsonFileBackend, InMemoryChangeBus<InventoryChange>> {
    InventoryStore::new(JsonFileBackend::new(path), InMemoryChangeBus::new())
}

fn attrs(
    name: &str,
    category: FoodCategory,
    temperature: f64,
    humidity: f64,
    packaging: Packaging,
) -> FoodAttributes {
    FoodAttributes::new(name, category, temperature, humidity, packaging)
}

#[test]
fn predict_save_list_notify_delete() {
    let (store, bus) = in_memory_store();
    let sub = bus.subscribe();
    let model = RuleCascadeModel::new();
    let now = Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0).unwrap();

    let milk = attrs("Milk", FoodCategory::Dairy, 4.0, 40.0, Packaging::Plastic);
    milk.validate().unwrap();
    let prediction = model.predict(&milk);
    assert_eq!(prediction.days, 4.7);
    assert_eq!(prediction.risk, RiskLevel::Low);

    // Room-temperature meat in paper is the quickly expiring one.
    let meat = attrs("Chicken", FoodCategory::Meat, 22.0, 50.0, Packaging::Paper);
    let meat_prediction = model.predict(&meat);
    assert_eq!(meat_prediction.days, 0.9);
    assert_eq!(meat_prediction.risk, RiskLevel::High);

    let saved_milk = store
        .save_at(NewFoodItem::from_prediction(&milk, &prediction, now), now)
        .unwrap();
    let saved_meat = store
        .save_at(NewFoodItem::from_prediction(&meat, &meat_prediction, now), now)
        .unwrap();

    assert_eq!(saved_milk.expiry_date, expiry_date_after(now, 4.7));
    assert_eq!(store.list(), vec![saved_milk.clone(), saved_meat.clone()]);

    // 4.7 days rounds up to 5, outside the default window.
    let expiring = store.expiring_soon_at(3, now);
    assert_eq!(expiring, vec![saved_meat.clone()]);

    let snapshot = derive_notifications(&expiring, now, &NotificationThresholds::default());
    assert_eq!(snapshot.len(), 1);
    let alert = &snapshot.notifications[0];
    assert_eq!(alert.level, NotificationLevel::Critical);
    assert_eq!(alert.due_label(), "Tomorrow");
    assert_eq!(alert.action_label(), "Use Now");

    // Two days later the milk has entered the window as a warning.
    let later = now + Duration::days(2);
    let expiring = store.expiring_soon_at(3, later);
    let snapshot = derive_notifications(&expiring, later, &NotificationThresholds::default());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.notifications[0].item.id, saved_milk.id);
    assert_eq!(snapshot.notifications[0].level, NotificationLevel::Warning);

    store.delete(saved_meat.id).unwrap();
    assert_eq!(store.list(), vec![saved_milk.clone()]);

    let kinds: Vec<_> = sub.drain().into_iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::Saved { id: saved_milk.id },
            ChangeKind::Saved { id: saved_meat.id },
            ChangeKind::Deleted { id: saved_meat.id },
        ]
    );
}

#[test]
fn observers_refresh_views_after_each_mutation() {
    let (store, bus) = in_memory_store();
    let store = Arc::new(store);

    let refreshes = Arc::new(AtomicUsize::new(0));
    let counts = Arc::new(Mutex::new(Vec::new()));
    let (weak, r, c) = (Arc::downgrade(&store), refreshes.clone(), counts.clone());
    let observer = bus.observe(Arc::new(move |_change: &InventoryChange| {
        r.fetch_add(1, Ordering::SeqCst);
        if let Some(store) = weak.upgrade() {
            c.lock().unwrap().push(store.stats().total);
        }
    }));

    let bread = attrs("Bread", FoodCategory::Bakery, 22.0, 50.0, Packaging::Plastic);
    let item = NewFoodItem::from_prediction(&bread, &foodwise_ai::predict(&bread), Utc::now());
    let saved = store.save(item.clone()).unwrap();
    store.save(item).unwrap();
    store.delete(saved.id).unwrap();

    assert_eq!(refreshes.load(Ordering::SeqCst), 3);
    assert_eq!(*counts.lock().unwrap(), vec![1, 2, 1]);

    assert!(bus.unobserve(observer));
    assert!(!bus.unobserve(observer));
    store.clear().unwrap();
    assert_eq!(refreshes.load(Ordering::SeqCst), 3);
}

#[test]
fn deleting_unknown_id_still_signals_and_keeps_data() {
    let (store, bus) = in_memory_store();
    let now = Utc::now();
    store
        .save(NewFoodItem {
            name: "Apple".into(),
            category: FoodCategory::Fruits,
            expiry_date: now + Duration::days(6),
            expiry_days: 6.0,
            temperature: 4.0,
            humidity: 90.0,
            packaging: Packaging::None,
        })
        .unwrap();
    let before = store.list();
    let sub = bus.subscribe();

    let unknown = FoodItemId::new();
    store.delete(unknown).unwrap();

    assert_eq!(store.list(), before);
    assert_eq!(sub.drain().len(), 1);
}

#[test]
fn quota_failure_surfaces_on_save() {
    let bus: Bus = Arc::new(InMemoryChangeBus::new());
    let store = InventoryStore::new(Arc::new(InMemoryBackend::with_capacity(16)), bus.clone());
    let sub = bus.subscribe();

    let apple = attrs("Apple", FoodCategory::Fruits, 4.0, 90.0, Packaging::None);
    let prediction = foodwise_ai::predict(&apple);
    let err = store
        .save(NewFoodItem::from_prediction(&apple, &prediction, Utc::now()))
        .unwrap_err();

    assert!(matches!(err, StoreError::Write(StorageError::CapacityExceeded { .. })));
    assert!(store.list().is_empty());
    // Failed writes are not announced.
    assert!(sub.drain().is_empty());
}

#[test]
fn json_file_store_survives_a_restart_and_sees_other_writers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foodwise_items.json");

    let first = file_store(&path);
    let cheese = attrs("Cheddar Cheese", FoodCategory::Dairy, 4.0, 40.0, Packaging::Vacuum);
    let saved = first
        .save(NewFoodItem::from_prediction(
            &cheese,
            &foodwise_ai::predict(&cheese),
            Utc::now(),
        ))
        .unwrap();

    let second = file_store(&path);
    assert_eq!(second.list(), vec![saved.clone()]);

    // The persisted layout is a bare JSON array of camelCase records.
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["expiryDays"], serde_json::json!(saved.expiry_days));
    assert_eq!(raw[0]["category"], "dairy");

    let sub = second.subscribe();
    first.delete(saved.id).unwrap();
    // mtime granularity can hide a same-size rewrite; the length changed here.
    assert!(second.check_external_change());
    let kinds: Vec<_> = sub.drain().into_iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![ChangeKind::External]);
    assert!(second.list().is_empty());
}

#[test]
fn corrupt_file_reads_as_empty_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foodwise_items.json");
    std::fs::write(&path, "[{\"broken\": ").unwrap();

    let store = file_store(&path);
    assert!(store.list().is_empty());
    assert!(store.expiring_soon(3).is_empty());
    assert!(store.stats().is_empty());
}
