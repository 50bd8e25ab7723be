/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use aws_sdk_s3::types::{RequestPayer, ServerSideEncryption, StorageClass};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Attribute name to value mapping of a single model, ordered by name.
pub type Attributes = BTreeMap<String, Value>;

/// A single attribute value.
///
/// Storage has no native date type. Dates are written as ISO-8601 strings with millisecond
/// precision and only come back as [`Value::Date`] when the object metadata says so (see
/// [`crate::codec`]). Everything else is plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A point in time
    Date(DateTime<Utc>),

    /// Any JSON value (string, number, boolean, null, array or object)
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this value is a date.
    pub fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// Returns the date if this value is a date.
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(date) => Some(date),
            Value::Json(_) => None,
        }
    }

    /// Returns the string slice if this value is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Json(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Convert into the JSON form written to storage.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Date(date) => serde_json::Value::String(format_date(date)),
            Value::Json(json) => json.clone(),
        }
    }
}

/// Format a date the way it is written to an object body, e.g. `2013-01-01T00:00:00.000Z`
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Date(date) => serializer.serialize_str(&format_date(date)),
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::Json)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Json(serde_json::Value::String(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Json(serde_json::Value::String(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Json(serde_json::Value::Bool(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Json(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Json(value.into())
    }
}

/// A value that is either given literally or computed on demand by a zero-argument function.
///
/// Used for a model's url and bucket name, which may depend on other state at the time
/// a request is made.
#[derive(Clone)]
pub enum Resolvable<T> {
    /// Literal value
    Value(T),

    /// Function invoked each time the value is needed
    Fn(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Resolvable<T> {
    /// Create a resolvable computed from `f` on every resolution.
    pub fn from_fn(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Resolvable::Fn(Arc::new(f))
    }

    /// Return the current value.
    pub fn resolve(&self) -> T {
        match self {
            Resolvable::Value(value) => value.clone(),
            Resolvable::Fn(f) => f(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolvable::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Resolvable::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl From<&str> for Resolvable<String> {
    fn from(value: &str) -> Self {
        Resolvable::Value(value.to_owned())
    }
}

impl From<String> for Resolvable<String> {
    fn from(value: String) -> Self {
        Resolvable::Value(value)
    }
}

/// The logical sync operation requested by the model layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Persist a model that has no identity yet
    Create,
    /// Fetch the stored attributes of a model
    Read,
    /// Persist a model that already has an identity
    Update,
    /// Remove a model from storage
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Create => "create",
            Method::Read => "read",
            Method::Update => "update",
            Method::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Storage specific request parameters supplied by the caller and merged into the
/// underlying S3 requests.
///
/// Fields that do not apply to a given request type are ignored for that request.
/// `metadata` is only sent on writes and is merged under the reserved
/// [`DATE_ATTRIBUTES_METADATA_KEY`](crate::codec::DATE_ATTRIBUTES_METADATA_KEY) entry.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct RequestOverrides {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) metadata: Option<HashMap<String, String>>,
    pub(crate) content_type: Option<String>,
    pub(crate) cache_control: Option<String>,
    pub(crate) storage_class: Option<StorageClass>,
    pub(crate) server_side_encryption: Option<ServerSideEncryption>,
    pub(crate) sse_customer_algorithm: Option<String>,
    pub(crate) sse_customer_key: Option<String>,
    pub(crate) sse_customer_key_md5: Option<String>,
    pub(crate) request_payer: Option<RequestPayer>,
    pub(crate) expected_bucket_owner: Option<String>,
    pub(crate) version_id: Option<String>,
}

impl RequestOverrides {
    /// Bucket to use instead of the one resolved from the model or collection.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Object key to use instead of the one derived from the model url.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Add a user metadata entry to write alongside the object.
    pub fn metadata(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(k.into(), v.into());
        self
    }

    /// Replace all user metadata to write alongside the object.
    pub fn set_metadata(mut self, input: Option<HashMap<String, String>>) -> Self {
        self.metadata = input;
        self
    }

    /// Content type to write instead of `application/json`.
    pub fn content_type(mut self, input: impl Into<String>) -> Self {
        self.content_type = Some(input.into());
        self
    }

    /// `Cache-Control` header to store with the object.
    pub fn cache_control(mut self, input: impl Into<String>) -> Self {
        self.cache_control = Some(input.into());
        self
    }

    /// Storage class for written objects.
    pub fn storage_class(mut self, input: StorageClass) -> Self {
        self.storage_class = Some(input);
        self
    }

    /// Server-side encryption algorithm for written objects.
    pub fn server_side_encryption(mut self, input: ServerSideEncryption) -> Self {
        self.server_side_encryption = Some(input);
        self
    }

    /// Customer provided encryption key (SSE-C) parameters, used on writes and reads.
    pub fn sse_customer_key(
        mut self,
        algorithm: impl Into<String>,
        key: impl Into<String>,
        key_md5: impl Into<String>,
    ) -> Self {
        self.sse_customer_algorithm = Some(algorithm.into());
        self.sse_customer_key = Some(key.into());
        self.sse_customer_key_md5 = Some(key_md5.into());
        self
    }

    /// Confirms that the requester knows they will be charged for the request.
    pub fn request_payer(mut self, input: RequestPayer) -> Self {
        self.request_payer = Some(input);
        self
    }

    /// The account ID of the expected bucket owner.
    pub fn expected_bucket_owner(mut self, input: impl Into<String>) -> Self {
        self.expected_bucket_owner = Some(input.into());
        self
    }

    /// Object version to read or delete.
    pub fn version_id(mut self, input: impl Into<String>) -> Self {
        self.version_id = Some(input.into());
        self
    }
}
