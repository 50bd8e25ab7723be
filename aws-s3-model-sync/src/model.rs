/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{self, Error};
use crate::key;
use crate::types::{Attributes, Resolvable, Value};

/// Default name of the identity attribute
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Wrapper that separates model attributes from transport data: `{"backboneData": {...}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped attributes
    #[serde(rename = "backboneData")]
    pub backbone_data: T,
}

impl<T> Envelope<T> {
    /// Wrap `backbone_data`
    pub fn new(backbone_data: T) -> Self {
        Self { backbone_data }
    }

    /// Unwrap the data
    pub fn into_inner(self) -> T {
        self.backbone_data
    }
}

/// Attribute selection for [`Model::to_json`]
#[derive(Debug, Clone, Default)]
pub enum Selection<'a> {
    /// All attributes
    #[default]
    All,
    /// Only the named attributes
    Pick(&'a [&'a str]),
    /// Everything except the named attributes
    Omit(&'a [&'a str]),
}

/// A single entity with named attributes, persisted as one object.
///
/// The object key is derived from [`Model::url`]; the bucket from [`Model::bucket`].
#[derive(Debug, Clone)]
pub struct Model {
    attributes: Attributes,
    id_attribute: String,
    url: Option<Resolvable<String>>,
    url_root: Option<Resolvable<String>>,
    bucket: Option<Resolvable<String>>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            attributes: Attributes::new(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_owned(),
            url: None,
            url_root: None,
            bucket: None,
        }
    }
}

impl Model {
    /// Create a new [`Model`] builder
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    /// All current attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get a single attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set a single attribute
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merge `attributes` over the current attributes
    pub fn set_all(&mut self, attributes: Attributes) -> &mut Self {
        self.attributes.extend(attributes);
        self
    }

    /// Remove a single attribute
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Name of the identity attribute
    pub fn id_attribute(&self) -> &str {
        &self.id_attribute
    }

    /// The identity of this model, if it has one
    pub fn id(&self) -> Option<String> {
        match self.attributes.get(&self.id_attribute)? {
            Value::Json(serde_json::Value::Null) => None,
            Value::Json(serde_json::Value::String(s)) => Some(s.clone()),
            Value::Json(other) => Some(other.to_string()),
            Value::Date(date) => Some(crate::types::format_date(date)),
        }
    }

    /// A model is new until it has been assigned an identity
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// Resolve the url of this model.
    ///
    /// An explicit url wins. Otherwise the url root is used, followed by the escaped
    /// identity for models that are not new.
    pub fn url(&self) -> Result<String, Error> {
        if let Some(url) = &self.url {
            return Ok(url.resolve());
        }

        let base = self.url_root.as_ref().map(Resolvable::resolve).ok_or_else(|| {
            error::invalid_input("a url or url root must be specified for the model")
        })?;

        Ok(match self.id() {
            Some(id) => key::join_segment(&base, &id),
            None => base,
        })
    }

    /// Resolve the bucket of this model, if one was configured
    pub fn bucket(&self) -> Option<String> {
        self.bucket.as_ref().map(Resolvable::resolve)
    }

    /// Wrap the attributes in an [`Envelope`], optionally restricted to a subset.
    pub fn to_json(&self, selection: Selection<'_>) -> Envelope<Attributes> {
        let attributes = match selection {
            Selection::All => self.attributes.clone(),
            Selection::Pick(names) => self
                .attributes
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            Selection::Omit(names) => self
                .attributes
                .iter()
                .filter(|(name, _)| !names.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        };
        Envelope::new(attributes)
    }

    /// Unwrap an [`Envelope`] into attributes.
    ///
    /// Strings that are exactly in the `YYYY-MM-DDTHH:MM:SS.sssZ` form are converted to dates,
    /// so data that went through plain JSON (without date metadata) keeps its dates.
    pub fn parse(envelope: Envelope<Attributes>) -> Attributes {
        envelope
            .into_inner()
            .into_iter()
            .map(|(name, value)| {
                let value = match value.as_str().and_then(parse_iso_date) {
                    Some(date) => Value::Date(date),
                    None => value,
                };
                (name, value)
            })
            .collect()
    }
}

/// Length of `YYYY-MM-DDTHH:MM:SS.sssZ`
const ISO_DATE_LEN: usize = 24;

fn parse_iso_date(s: &str) -> Option<chrono::DateTime<Utc>> {
    if s.len() != ISO_DATE_LEN || !s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Fluent style builder for [Model]
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    inner: Model,
}

impl ModelBuilder {
    /// Set an attribute
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.set(name, value);
        self
    }

    /// Set all attributes
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.inner.attributes = attributes;
        self
    }

    /// Name of the identity attribute (default `id`)
    pub fn id_attribute(mut self, name: impl Into<String>) -> Self {
        self.inner.id_attribute = name.into();
        self
    }

    /// Explicit url of the model, used as-is
    pub fn url(mut self, url: impl Into<Resolvable<String>>) -> Self {
        self.inner.url = Some(url.into());
        self
    }

    /// Base url; the identity is appended once the model has one
    pub fn url_root(mut self, url_root: impl Into<Resolvable<String>>) -> Self {
        self.inner.url_root = Some(url_root.into());
        self
    }

    /// Bucket containing the model
    pub fn bucket(mut self, bucket: impl Into<Resolvable<String>>) -> Self {
        self.inner.bucket = Some(bucket.into());
        self
    }

    /// Consumes the builder and constructs a [`Model`]
    pub fn build(self) -> Model {
        self.inner
    }
}

/// An ordered group of models sharing a key prefix.
#[derive(Debug, Clone)]
pub struct Collection {
    url: Resolvable<String>,
    bucket: Option<Resolvable<String>>,
    id_attribute: String,
    models: Vec<Model>,
}

impl Collection {
    /// Create a new, empty collection rooted at `url`
    pub fn new(url: impl Into<Resolvable<String>>) -> Self {
        Self {
            url: url.into(),
            bucket: None,
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_owned(),
            models: Vec::new(),
        }
    }

    /// Set the bucket containing the collection
    pub fn with_bucket(mut self, bucket: impl Into<Resolvable<String>>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the identity attribute name used for member models
    pub fn with_id_attribute(mut self, name: impl Into<String>) -> Self {
        self.id_attribute = name.into();
        self
    }

    /// Resolve the url of this collection
    pub fn url(&self) -> String {
        self.url.resolve()
    }

    /// Resolve the bucket of this collection, if one was configured
    pub fn bucket(&self) -> Option<String> {
        self.bucket.as_ref().map(Resolvable::resolve)
    }

    /// The member models, in order
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Number of member models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the collection has no members
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Build a member model from `attributes`, sharing this collection's url and bucket
    pub fn model(&self, attributes: Attributes) -> Model {
        Model {
            attributes,
            id_attribute: self.id_attribute.clone(),
            url: None,
            url_root: Some(self.url.clone()),
            bucket: self.bucket.clone(),
        }
    }

    /// Append a member model built from `attributes`
    pub fn add(&mut self, attributes: Attributes) -> &Model {
        let model = self.model(attributes);
        self.models.push(model);
        &self.models[self.models.len() - 1]
    }

    /// Replace all member models with ones built from `items`
    pub fn reset(&mut self, items: Vec<Attributes>) {
        self.models = items.into_iter().map(|attrs| self.model(attrs)).collect();
    }

    /// Wrap the attributes of all member models in an [`Envelope`]
    pub fn to_json(&self) -> Envelope<Vec<Attributes>> {
        Envelope::new(
            self.models
                .iter()
                .map(|model| model.attributes().clone())
                .collect(),
        )
    }

    /// Unwrap a collection [`Envelope`]; each item is parsed the way [`Model::parse`] does
    pub fn parse(envelope: Envelope<Vec<Envelope<Attributes>>>) -> Vec<Attributes> {
        envelope.into_inner().into_iter().map(Model::parse).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_url_from_root() {
        let mut model = Model::builder().url_root("notes").build();
        assert!(model.is_new());
        assert_eq!("notes", model.url().unwrap());

        model.set("id", "a b");
        assert!(!model.is_new());
        assert_eq!("notes/a%20b", model.url().unwrap());
    }

    #[test]
    fn test_explicit_url_wins() {
        let model = Model::builder()
            .url("custom/key")
            .url_root("notes")
            .attribute("id", "abc")
            .build();
        assert_eq!("custom/key", model.url().unwrap());
    }

    #[test]
    fn test_missing_url() {
        let err = Model::default().url().unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }

    #[test]
    fn test_custom_id_attribute() {
        let model = Model::builder()
            .id_attribute("_id")
            .url_root("notes/")
            .attribute("id", "ignored")
            .attribute("_id", 7i64)
            .build();
        assert_eq!(Some("7".to_owned()), model.id());
        assert_eq!("notes/7", model.url().unwrap());
    }

    #[test]
    fn test_null_id_is_new() {
        let model = Model::builder()
            .attribute("id", json!(null))
            .build();
        assert!(model.is_new());
    }

    #[test]
    fn test_to_json_selection() {
        let model = Model::builder()
            .attribute("id", "1")
            .attribute("title", "hello")
            .attribute("secret", "shh")
            .build();

        let all = model.to_json(Selection::All).into_inner();
        assert_eq!(3, all.len());

        let picked = model.to_json(Selection::Pick(&["title"])).into_inner();
        assert_eq!(vec!["title"], picked.keys().map(String::as_str).collect::<Vec<_>>());

        let omitted = model.to_json(Selection::Omit(&["secret"])).into_inner();
        assert_eq!(
            vec!["id", "title"],
            omitted.keys().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_envelope_wire_name() {
        let model = Model::builder().attribute("title", "hello").build();
        let json = serde_json::to_value(model.to_json(Selection::All)).unwrap();
        assert_eq!(json!({"backboneData": {"title": "hello"}}), json);
    }

    #[test]
    fn test_parse_converts_iso_dates() {
        let envelope: Envelope<Attributes> = serde_json::from_value(json!({
            "backboneData": {
                "postedAt": "2013-01-01T00:00:00.000Z",
                "noMillis": "2013-01-01T00:00:00Z",
                "title": "hello",
            }
        }))
        .unwrap();

        let attrs = Model::parse(envelope);
        assert_eq!(
            Some(&Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap()),
            attrs["postedAt"].as_date()
        );
        assert_eq!(Some("2013-01-01T00:00:00Z"), attrs["noMillis"].as_str());
        assert_eq!(Some("hello"), attrs["title"].as_str());
    }

    #[test]
    fn test_collection_members_share_url_and_bucket() {
        let mut notes = Collection::new("/notes").with_bucket("test-bucket");
        let mut attrs = Attributes::new();
        attrs.insert("id".to_owned(), "aaa".into());
        let model = notes.add(attrs);

        assert_eq!("/notes/aaa", model.url().unwrap());
        assert_eq!(Some("test-bucket".to_owned()), model.bucket());
        assert_eq!(1, notes.len());
    }

    #[test]
    fn test_collection_parse() {
        let envelope: Envelope<Vec<Envelope<Attributes>>> = serde_json::from_value(json!({
            "backboneData": [
                {"backboneData": {"id": "aaa"}},
                {"backboneData": {"id": "bbb"}},
            ]
        }))
        .unwrap();

        let mut notes = Collection::new("notes");
        notes.reset(Collection::parse(envelope));
        let ids: Vec<_> = notes.models().iter().filter_map(Model::id).collect();
        assert_eq!(vec!["aaa", "bbb"], ids);
    }
}
