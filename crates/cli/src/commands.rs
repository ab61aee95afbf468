use std::io::BufRead;

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde_json::json;

use foodwise_ai::{AlertThresholds, ExpiryModel, PredictionAlert, RuleCascadeModel, storage_tips};
use foodwise_core::FoodItemId;
use foodwise_infra::{ExpiryWatcher, ExpiryWatcherConfig, FoodwiseConfig, TracingAlertSink};
use foodwise_inventory::{
    NewFoodItem, NotificationSnapshot, NotificationThresholds, SavedFoodItem, ShelfBadge,
    derive_notifications,
};

use crate::{FoodArgs, Store};

pub(crate) struct Output {
    pub(crate) json: bool,
}

impl Output {
    fn emit(&self, value: serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }
}

fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%a %b %-d %Y").to_string()
}

pub(crate) fn predict(out: &Output, food: &FoodArgs, explain: bool) -> anyhow::Result<()> {
    let attrs = food.attributes()?;
    let model = RuleCascadeModel::new();
    let breakdown = model.explain(&attrs);
    let prediction = breakdown.result;
    let now = Utc::now();
    let expiry_date = foodwise_inventory::expiry_date_after(now, prediction.days);
    let alert =
        PredictionAlert::for_prediction(&attrs.name, &prediction, &AlertThresholds::default());
    let tips = storage_tips(attrs.category);

    if out.json {
        let mut value = json!({
            "name": attrs.name,
            "category": attrs.category,
            "days": prediction.days,
            "risk": prediction.risk,
            "freshnessPercent": prediction.freshness_percent(),
            "expiryDate": expiry_date,
            "alert": alert,
            "tips": tips,
        });
        if explain {
            value["breakdown"] = breakdown.to_metadata(model.name());
        }
        return out.emit(value);
    }

    println!(
        "{} ({}): {} {}",
        attrs.name,
        attrs.category.label(),
        prediction.days,
        prediction.days_unit()
    );
    println!(
        "  {}  |  freshness {}%  |  expires {}",
        prediction.risk.label(),
        prediction.freshness_percent(),
        local_date(expiry_date)
    );
    println!();
    println!("{}: {}", alert.title, alert.message);
    println!("  -> {}", alert.action);

    if explain {
        println!();
        println!("How this was computed:");
        match breakdown.name_override {
            Some(o) => println!(
                "  start            {} days ({o:?} override of {})",
                breakdown.starting_days, breakdown.base_days
            ),
            None => println!(
                "  start            {} days (category base)",
                breakdown.starting_days
            ),
        }
        println!("  temperature      x{}", breakdown.temperature_factor);
        println!(
            "  humidity         x{} (off optimum by {}%)",
            breakdown.humidity_factor, breakdown.humidity_deviation
        );
        match breakdown.packaging_factor {
            Some(f) => println!("  packaging        x{f}"),
            None => println!("  packaging        unknown, not applied"),
        }
        println!("  = {:.3} -> {} days", breakdown.raw_days, prediction.days);
    }

    println!();
    println!("Storage tips:");
    for tip in tips {
        println!("  - {tip}");
    }
    Ok(())
}

pub(crate) fn save(out: &Output, store: &Store, food: &FoodArgs) -> anyhow::Result<()> {
    let attrs = food.attributes()?;
    let prediction = RuleCascadeModel::new().predict(&attrs);
    let saved = store
        .save(NewFoodItem::from_prediction(&attrs, &prediction, Utc::now()))
        .context("failed to save food item")?;

    if out.json {
        return out.emit(serde_json::to_value(&saved)?);
    }

    println!("Saved {} ({})", saved.name, saved.id);
    println!(
        "  {} days, {}, expires {}",
        saved.expiry_days,
        prediction.risk.label(),
        local_date(saved.expiry_date)
    );
    Ok(())
}

fn print_item(item: &SavedFoodItem, now: DateTime<Utc>) {
    let days_left = item.days_left(now);
    let badge = ShelfBadge::for_days(days_left);
    let due = match badge {
        ShelfBadge::Expired => "expired".to_string(),
        _ => format!("{days_left} day(s) left"),
    };
    println!(
        "{}  {:<24} {:<10} {:<8} {} ({due})",
        item.id,
        item.name,
        item.category.label(),
        format!("{badge:?}").to_lowercase(),
        local_date(item.expiry_date),
    );
}

pub(crate) fn list(out: &Output, store: &Store) -> anyhow::Result<()> {
    let items = store.list();
    if out.json {
        return out.emit(serde_json::to_value(&items)?);
    }

    if items.is_empty() {
        println!("No saved food items.");
        return Ok(());
    }

    let now = Utc::now();
    for item in &items {
        print_item(item, now);
    }
    Ok(())
}

pub(crate) fn delete(out: &Output, store: &Store, id: &str) -> anyhow::Result<()> {
    let id: FoodItemId = id.parse()?;
    let existed = store.get(id).is_some();
    store.delete(id).context("failed to delete food item")?;

    if out.json {
        return out.emit(json!({ "id": id, "deleted": existed }));
    }
    if existed {
        println!("Deleted {id}");
    } else {
        println!("No item with id {id}; nothing deleted");
    }
    Ok(())
}

fn print_snapshot(snapshot: &NotificationSnapshot) {
    println!("Expiry notifications: {}", snapshot.summary());
    for n in &snapshot.notifications {
        println!(
            "  [{:?}] {}  due {}  ({}). {}",
            n.level,
            n.headline(),
            n.due_label(),
            n.use_before(),
            n.action_label()
        );
    }
}

pub(crate) fn expiring(out: &Output, store: &Store, days: i64) -> anyhow::Result<()> {
    let now = Utc::now();
    let items = store.expiring_soon_at(days, now);
    let snapshot = derive_notifications(&items, now, &NotificationThresholds::default());

    if out.json {
        return out.emit(json!({
            "thresholdDays": days,
            "items": items,
            "notifications": snapshot,
        }));
    }

    if items.is_empty() {
        println!("Nothing expires within {days} day(s).");
        return Ok(());
    }
    for item in &items {
        print_item(item, now);
    }
    println!();
    print_snapshot(&snapshot);
    Ok(())
}

pub(crate) fn stats(out: &Output, store: &Store) -> anyhow::Result<()> {
    let stats = store.stats();
    if out.json {
        return out.emit(serde_json::to_value(&stats)?);
    }

    println!("Total items:   {}", stats.total);
    println!("Expired:       {}", stats.expired);
    println!("Expiring soon: {}", stats.expiring_soon);
    println!("Safe:          {}", stats.safe);
    if !stats.is_empty() {
        println!();
        for (category, count) in &stats.by_category {
            println!("  {:<12} {count}", category.label());
        }
    }
    Ok(())
}

pub(crate) fn clear(out: &Output, store: &Store) -> anyhow::Result<()> {
    store.clear().context("failed to clear inventory")?;
    if out.json {
        return out.emit(json!({ "cleared": true }));
    }
    println!("All saved food items deleted.");
    Ok(())
}

pub(crate) fn watch(out: &Output, store: Store, config: &FoodwiseConfig) -> anyhow::Result<()> {
    let watcher =
        ExpiryWatcher::spawn(store, TracingAlertSink, ExpiryWatcherConfig::from_config(config))
            .context("failed to start expiry watcher")?;

    let show = |snapshot: &NotificationSnapshot| -> anyhow::Result<()> {
        if out.json {
            out.emit(serde_json::to_value(snapshot)?)
        } else {
            print_snapshot(snapshot);
            println!("(press Enter to refresh, Ctrl-D to stop)");
            Ok(())
        }
    };

    show(&watcher.latest())?;
    for line in std::io::stdin().lock().lines() {
        if line.is_err() {
            break;
        }
        show(&watcher.latest())?;
    }

    watcher.shutdown();
    Ok(())
}
