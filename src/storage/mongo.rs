//! MongoDB storage implementation

use crate::ui::StepProgress;
use crate::{Error, Result};
use mongodb::bson::{doc, Bson, Document};
use mongodb::sync::{Client, Database};

/// MongoDB-backed storage for the document model
pub struct MongoStore {
    db: Database,
    _client: Client,
}

impl MongoStore {
    pub fn connect(uri: &str, database: &str) -> Result<Self> {
        tracing::debug!("connecting to mongo {} (db {})", uri, database);
        let client = Client::with_uri_str(uri)?;
        let db = client.database(database);
        Ok(Self { db, _client: client })
    }

    /// Drop `name` and insert `docs` with `insert_many`, `chunk_size`
    /// documents per call (all at once when `None`). Returns the number of
    /// inserted documents.
    pub fn replace_collection(&self, name: &str, docs: &[Document], chunk_size: Option<usize>) -> Result<usize> {
        let coll = self.db.collection::<Document>(name);
        coll.drop().run()?;

        if docs.is_empty() {
            return Ok(0);
        }

        let chunk_size = chunk_size.unwrap_or(docs.len()).max(1);
        let batches = docs.len().div_ceil(chunk_size);
        let progress = StepProgress::new(batches as u64, &format!("{} batches", name));

        let mut inserted = 0;
        for batch in docs.chunks(chunk_size) {
            let result = coll.insert_many(batch).run()?;
            inserted += result.inserted_ids.len();
            progress.inc(1);
        }
        progress.finish();

        tracing::debug!("inserted {} documents into {} in {} batches", inserted, name, batches);
        Ok(inserted)
    }

    pub fn count(&self, name: &str) -> Result<u64> {
        let n = self.db.collection::<Document>(name).count_documents(doc! {}).run()?;
        Ok(n)
    }
}

/// Convert parsed JSON into BSON documents.
///
/// Values are read as Extended JSON, so `{"$date": "..."}` becomes a BSON
/// datetime. Every element must be an object.
pub fn to_documents(values: Vec<serde_json::Value>) -> Result<Vec<Document>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| match Bson::try_from(value) {
            Ok(Bson::Document(doc)) => Ok(doc),
            Ok(other) => Err(Error::Document(format!(
                "element {} is not an object ({:?})",
                i,
                other.element_type()
            ))),
            Err(e) => Err(Error::Document(format!("element {}: {}", i, e))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extended_json_dates() {
        let docs = to_documents(vec![json!({
            "timestamp": {"$date": "2024-05-01T10:20:30Z"},
            "store": {"name": "Tienda"},
            "total_amount": 12.5,
        })])
        .unwrap();
        assert_eq!(docs.len(), 1);
        assert!(matches!(docs[0].get("timestamp"), Some(Bson::DateTime(_))));
        assert_eq!(docs[0].get_document("store").unwrap().get_str("name").unwrap(), "Tienda");
    }

    #[test]
    fn test_plain_objects_pass_through() {
        let docs = to_documents(vec![json!({"store_name": "A", "inventory": []})]).unwrap();
        assert_eq!(docs[0].get_str("store_name").unwrap(), "A");
    }

    #[test]
    fn test_rejects_non_objects() {
        let err = to_documents(vec![json!({"ok": true}), json!(42)]).unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }
}
