use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::{compare_sort_keys, value_text};
use super::{
    strip_id, with_id, Collection, Document, DocumentStore, Filter, Sort, StoreError,
    UpdateOutcome,
};

/// In-process store with the same semantics as [`super::PgDocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Document)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    collection: Collection,
    rows: &[(Uuid, Document)],
    skip: Option<Uuid>,
    doc: &Document,
) -> Result<(), StoreError> {
    let Some(field) = collection.unique_field() else {
        return Ok(());
    };
    let Some(wanted) = doc.get(field).and_then(value_text) else {
        return Ok(());
    };
    let taken = rows.iter().any(|(id, existing)| {
        Some(*id) != skip && existing.get(field).and_then(value_text).as_deref() == Some(wanted.as_str())
    });
    if taken {
        return Err(StoreError::Duplicate {
            collection: collection.name(),
            field,
        });
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().await;
        let mut hits: Vec<&(Uuid, Document)> = guard
            .get(&collection)
            .map(|rows| rows.iter().filter(|(id, doc)| filter.matches(*id, doc)).collect())
            .unwrap_or_default();
        if let Some(sort) = sort {
            // stable: ties keep insertion order
            hits.sort_by(|(_, a), (_, b)| {
                compare_sort_keys(a.get(sort.field), b.get(sort.field), sort.order)
            });
        }
        Ok(hits
            .into_iter()
            .map(|(id, doc)| with_id(*id, doc.clone()))
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).and_then(|rows| {
            rows.iter()
                .find(|(id, doc)| filter.matches(*id, doc))
                .map(|(id, doc)| with_id(*id, doc.clone()))
        }))
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<Uuid, StoreError> {
        let doc = strip_id(doc);
        let mut guard = self.collections.write().await;
        let rows = guard.entry(collection).or_default();
        check_unique(collection, rows, None, &doc)?;
        let id = Uuid::new_v4();
        rows.push((id, doc));
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: Uuid,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let set = strip_id(set);
        let mut guard = self.collections.write().await;
        let rows = guard.entry(collection).or_default();

        if let Some(pos) = rows.iter().position(|(row_id, _)| *row_id == id) {
            let mut merged = rows[pos].1.clone();
            let mut changed = false;
            for (key, value) in set {
                if merged.get(&key) != Some(&value) {
                    merged.insert(key, value);
                    changed = true;
                }
            }
            if changed {
                check_unique(collection, rows, Some(id), &merged)?;
                rows[pos].1 = merged;
            }
            return Ok(UpdateOutcome {
                matched: 1,
                modified: u64::from(changed),
                upserted_id: None,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome::default());
        }
        check_unique(collection, rows, None, &set)?;
        rows.push((id, set));
        Ok(UpdateOutcome {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError> {
        let mut guard = self.collections.write().await;
        let Some(rows) = guard.get_mut(&collection) else {
            return Ok(0);
        };
        match rows.iter().position(|(row_id, _)| *row_id == id) {
            Some(pos) => {
                rows.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SortOrder, ID_FIELD};
    use serde_json::{json, Value};

    fn doc(v: Value) -> Document {
        v.as_object().cloned().expect("object")
    }

    #[tokio::test]
    async fn insert_assigns_id_and_ignores_client_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Testimonials, doc(json!({"_id": "mine", "text": "great"})))
            .await
            .expect("insert");
        let found = store
            .find_one(Collection::Testimonials, &Filter::Id(id))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found[ID_FIELD], json!(id.to_string()));
        assert_eq!(found["text"], json!("great"));
    }

    #[tokio::test]
    async fn members_reject_duplicate_user_email() {
        let store = MemoryStore::new();
        store
            .insert_one(Collection::Members, doc(json!({"userEmail": "a@b.com"})))
            .await
            .expect("first insert");
        let err = store
            .insert_one(Collection::Members, doc(json!({"userEmail": "a@b.com", "plan": "gold"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "userEmail", .. }));
        let all = store.find(Collection::Members, &Filter::All, None).await.expect("find");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn other_collections_allow_repeated_values() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            store
                .insert_one(Collection::Bookings, doc(json!({"userEmail": "a@b.com"})))
                .await
                .expect("insert");
        }
        let all = store.find(Collection::Bookings, &Filter::All, None).await.expect("find");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_reports_matched_and_modified() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Bookings, doc(json!({"status": "pending"})))
            .await
            .expect("insert");

        let same = store
            .update_one(Collection::Bookings, id, doc(json!({"status": "pending"})), false)
            .await
            .expect("update");
        assert_eq!(same, UpdateOutcome { matched: 1, modified: 0, upserted_id: None });

        let changed = store
            .update_one(Collection::Bookings, id, doc(json!({"status": "confirmed"})), false)
            .await
            .expect("update");
        assert_eq!(changed.modified, 1);

        let missing = store
            .update_one(Collection::Bookings, Uuid::new_v4(), doc(json!({"status": "x"})), false)
            .await
            .expect("update");
        assert_eq!(missing, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn update_replaces_nested_values_with_subsets() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(
                Collection::Services,
                doc(json!({"serviceArea": ["a", "b"], "meta": {"x": 1, "y": 2}})),
            )
            .await
            .expect("insert");

        let outcome = store
            .update_one(
                Collection::Services,
                id,
                doc(json!({"serviceArea": ["a"], "meta": {"x": 1}})),
                false,
            )
            .await
            .expect("update");
        assert_eq!(outcome.modified, 1);

        let found = store
            .find_one(Collection::Services, &Filter::Id(id))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found["serviceArea"], json!(["a"]));
        assert_eq!(found["meta"], json!({"x": 1}));
    }

    #[tokio::test]
    async fn upsert_creates_document_under_given_id() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let outcome = store
            .update_one(Collection::Services, id, doc(json!({"serviceName": "Plumbing"})), true)
            .await
            .expect("upsert");
        assert_eq!(outcome.upserted_id, Some(id));
        let found = store
            .find_one(Collection::Services, &Filter::Id(id))
            .await
            .expect("find");
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = MemoryStore::new();
        let id = store
            .insert_one(Collection::Services, doc(json!({})))
            .await
            .expect("insert");
        assert_eq!(store.delete_one(Collection::Services, id).await.expect("delete"), 1);
        assert_eq!(store.delete_one(Collection::Services, id).await.expect("delete"), 0);
    }

    #[tokio::test]
    async fn sort_is_stable_for_equal_keys() {
        let store = MemoryStore::new();
        for (name, price) in [("a", 5), ("b", 1), ("c", 5)] {
            store
                .insert_one(Collection::Services, doc(json!({"serviceName": name, "servicePrice": price})))
                .await
                .expect("insert");
        }
        let sort = Sort { field: "servicePrice", order: SortOrder::Desc };
        let rows = store
            .find(Collection::Services, &Filter::All, Some(&sort))
            .await
            .expect("find");
        let names: Vec<_> = rows.iter().map(|d| d["serviceName"].clone()).collect();
        assert_eq!(names, vec![json!("a"), json!("c"), json!("b")]);
    }
}
