//! # Resources and Responses
//!
//! The thin resource model the [`DocumentClient`](super::DocumentClient) trait speaks.
//! The adapter never inspects resource bodies; it only reads the response metadata
//! (request charge, status code, activity id, content location) for telemetry.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Anything the document store addresses by id: databases, collections, documents.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: String,
}

impl Database {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Resource for Database {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCollection {
    pub id: String,
    /// JSON path of the partition key, e.g. `/tenantId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
}

impl DocumentCollection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            partition_key: None,
        }
    }

    pub fn with_partition_key(mut self, path: impl Into<String>) -> Self {
        self.partition_key = Some(path.into());
        self
    }
}

impl Resource for DocumentCollection {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A stored document. The body is opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub body: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

impl Resource for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Response of a single resource operation.
///
/// `resource` is `None` for operations that return no body (deletes).
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse<R> {
    resource: Option<R>,
    status_code: u16,
    activity_id: String,
    request_charge: f64,
    content_location: Option<String>,
}

impl<R> ResourceResponse<R> {
    pub fn new(resource: Option<R>, status_code: u16) -> Self {
        Self {
            resource,
            status_code,
            activity_id: String::new(),
            request_charge: 0.0,
            content_location: None,
        }
    }

    pub fn with_activity_id(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = activity_id.into();
        self
    }

    pub fn with_request_charge(mut self, request_charge: f64) -> Self {
        self.request_charge = request_charge;
        self
    }

    pub fn with_content_location(mut self, content_location: impl Into<String>) -> Self {
        self.content_location = Some(content_location.into());
        self
    }

    pub fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    pub fn into_resource(self) -> Option<R> {
        self.resource
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    /// Cost of the request in request units.
    pub fn request_charge(&self) -> f64 {
        self.request_charge
    }

    pub fn content_location(&self) -> Option<&str> {
        self.content_location.as_deref()
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedResponse<T> {
    pub items: Vec<T>,
    pub activity_id: String,
    pub request_charge: f64,
    pub continuation: Option<String>,
}

/// A parameterized SQL query against a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuerySpec {
    pub query_text: String,
    #[serde(default)]
    pub parameters: Vec<SqlParameter>,
}

impl SqlQuerySpec {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.push(SqlParameter {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlParameter {
    pub name: String,
    pub value: serde_json::Value,
}

/// Resource link builders (`dbs/{db}/colls/{coll}/docs/{doc}`).
pub mod links {
    pub fn database(database_id: &str) -> String {
        format!("dbs/{database_id}")
    }

    pub fn collection(database_id: &str, collection_id: &str) -> String {
        format!("dbs/{database_id}/colls/{collection_id}")
    }

    pub fn document(database_id: &str, collection_id: &str, document_id: &str) -> String {
        format!("dbs/{database_id}/colls/{collection_id}/docs/{document_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn links_nest_resources() {
        assert_eq!(links::database("shop"), "dbs/shop");
        assert_eq!(links::collection("shop", "orders"), "dbs/shop/colls/orders");
        assert_eq!(
            links::document("shop", "orders", "o-1"),
            "dbs/shop/colls/orders/docs/o-1"
        );
    }

    #[test]
    fn document_body_is_flattened() {
        let doc = Document::new("o-1", json!({ "total": 12.5 }));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value, json!({ "id": "o-1", "total": 12.5 }));
    }

    #[test]
    fn response_exposes_metadata() {
        let response = ResourceResponse::new(Some(Database::new("shop")), 201)
            .with_activity_id("act-7")
            .with_request_charge(4.2)
            .with_content_location("dbs/shop");

        assert_eq!(response.status_code(), 201);
        assert_eq!(response.activity_id(), "act-7");
        assert_eq!(response.request_charge(), 4.2);
        assert_eq!(response.content_location(), Some("dbs/shop"));
        assert_eq!(response.into_resource().map(|db| db.id), Some("shop".to_string()));
    }
}
