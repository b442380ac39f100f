//! Collection business logic - Schemaless item lists stored as JSON documents.
//!
//! Tools, general tools, PPE, stationery, loose inventory items and faulty
//! returns are kept as one JSON array per [`CollectionKey`]. Items are plain
//! JSON objects; name and quantity fields are discovered by key priority
//! rather than by schema. A write replaces the whole array, so two writers
//! racing on the same collection resolve as last-write-wins.

use crate::{
    core::sync::SyncHub,
    entities::{Dataset, dataset},
    errors::{Error, Result},
    models::{CollectionKey, NAME_KEYS},
};
use sea_orm::{Set, prelude::*};
use serde_json::Value;

/// Loads the raw dataset row for a collection, if it was ever written.
pub async fn get_dataset<C>(db: &C, key: CollectionKey) -> Result<Option<dataset::Model>>
where
    C: ConnectionTrait,
{
    Dataset::find()
        .filter(dataset::Column::Key.eq(key.as_str()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns every item in a collection.
///
/// A collection that was never written is empty. A stored document that is
/// not a JSON array is treated as empty and logged rather than failing the
/// caller.
pub async fn list_items<C>(db: &C, key: CollectionKey) -> Result<Vec<Value>>
where
    C: ConnectionTrait,
{
    let Some(doc) = get_dataset(db, key).await? else {
        return Ok(Vec::new());
    };

    match doc.items {
        Value::Array(items) => Ok(items),
        other => {
            tracing::warn!(
                collection = %key,
                kind = json_kind(&other),
                "stored collection is not an array, treating as empty"
            );
            Ok(Vec::new())
        }
    }
}

/// Writes a collection without publishing a sync event.
///
/// Used by callers that publish once after a larger change.
pub(crate) async fn write_items<C>(db: &C, key: CollectionKey, items: Vec<Value>) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    match get_dataset(db, key).await? {
        Some(existing) => {
            let mut active: dataset::ActiveModel = existing.into();
            active.items = Set(Value::Array(items));
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            let active = dataset::ActiveModel {
                key: Set(key.as_str().to_string()),
                items: Set(Value::Array(items)),
                updated_at: Set(now),
                ..Default::default()
            };
            active.insert(db).await?;
        }
    }
    Ok(())
}

/// Replaces a collection's items and notifies subscribers.
///
/// # Errors
/// Returns an error if any item is not a JSON object or the write fails.
pub async fn replace_items<C>(
    db: &C,
    hub: &SyncHub,
    key: CollectionKey,
    items: Vec<Value>,
) -> Result<Vec<Value>>
where
    C: ConnectionTrait,
{
    if let Some(pos) = items.iter().position(|item| !item.is_object()) {
        return Err(Error::validation(format!(
            "item {pos} in {key} is not a JSON object"
        )));
    }

    write_items(db, key, items.clone()).await?;
    hub.publish(key.as_str());
    tracing::info!(collection = %key, count = items.len(), "collection replaced");
    Ok(items)
}

/// Appends one item to a collection and returns its index.
pub async fn append_item<C>(db: &C, hub: &SyncHub, key: CollectionKey, item: Value) -> Result<usize>
where
    C: ConnectionTrait,
{
    if !item.is_object() {
        return Err(Error::validation("collection items must be JSON objects"));
    }

    let mut items = list_items(db, key).await?;
    items.push(item);
    let index = items.len() - 1;
    write_items(db, key, items).await?;
    hub.publish(key.as_str());
    Ok(index)
}

/// Removes the item at `index` and returns it.
pub async fn remove_item<C>(db: &C, hub: &SyncHub, key: CollectionKey, index: usize) -> Result<Value>
where
    C: ConnectionTrait,
{
    let mut items = list_items(db, key).await?;
    if index >= items.len() {
        return Err(Error::not_found("collection item", format!("{key}[{index}]")));
    }
    let removed = items.remove(index);
    write_items(db, key, items).await?;
    hub.publish(key.as_str());
    Ok(removed)
}

/// Display name of an item, taken from the first name field present.
#[must_use]
pub fn item_name(item: &Value) -> Option<&str> {
    NAME_KEYS
        .iter()
        .find_map(|field| item.get(*field).and_then(Value::as_str))
}

/// Index of the first item whose name matches `name`, ignoring case and
/// surrounding whitespace.
#[must_use]
pub fn find_by_name(items: &[Value], name: &str) -> Option<usize> {
    let wanted = super::name_key(name);
    items
        .iter()
        .position(|item| item_name(item).is_some_and(|candidate| super::name_key(candidate) == wanted))
}

/// First numeric value among `keys`, with the key it came from.
#[must_use]
pub fn item_quantity<'k>(item: &Value, keys: &[&'k str]) -> Option<(&'k str, f64)> {
    keys.iter()
        .find_map(|key| item.get(*key).and_then(Value::as_f64).map(|q| (*key, q)))
}

/// Sum of item quantities; items without a numeric quantity count as 0.
#[must_use]
pub fn sum_quantity(items: &[Value], keys: &[&str]) -> f64 {
    items
        .iter()
        .filter_map(|item| item_quantity(item, keys).map(|(_, q)| q))
        .sum()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
