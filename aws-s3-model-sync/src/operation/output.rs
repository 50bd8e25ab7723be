/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use crate::model::Envelope;
use crate::types::{Attributes, Method};

/// Output of a model sync operation
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub(crate) method: Method,
    pub(crate) bucket: String,
    pub(crate) key: String,
    pub(crate) backbone_data: Attributes,
    pub(crate) metadata: Option<HashMap<String, String>>,
    pub(crate) e_tag: Option<String>,
    pub(crate) version_id: Option<String>,
    pub(crate) delete_marker: Option<bool>,
}

impl ModelOutput {
    pub(crate) fn new(method: Method, bucket: String, key: String) -> Self {
        Self {
            method,
            bucket,
            key,
            backbone_data: Attributes::new(),
            metadata: None,
            e_tag: None,
            version_id: None,
            delete_marker: None,
        }
    }

    /// The operation that produced this output
    pub fn method(&self) -> Method {
        self.method
    }

    /// Bucket the request was sent to
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key the request was sent to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Attribute data carried by the response.
    ///
    /// For a write these are the attributes assigned while saving (the generated identity of a
    /// new model, nothing otherwise). For a read, the decoded stored attributes. Empty for a
    /// delete.
    pub fn backbone_data(&self) -> &Attributes {
        &self.backbone_data
    }

    /// User metadata stored with the object (reads only)
    pub fn metadata(&self) -> Option<&HashMap<String, String>> {
        self.metadata.as_ref()
    }

    /// Entity tag of the object
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Version of the object, if the bucket is versioned
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// Whether a delete created a delete marker
    pub fn delete_marker(&self) -> Option<bool> {
        self.delete_marker
    }

    /// The response data in its wire envelope, `{"backboneData": {...}}`
    pub fn to_envelope(&self) -> Envelope<Attributes> {
        Envelope::new(self.backbone_data.clone())
    }
}

/// Output of a collection sync operation
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOutput {
    pub(crate) bucket: String,
    pub(crate) prefix: String,
    pub(crate) keys: Vec<String>,
    pub(crate) backbone_data: Vec<Envelope<Attributes>>,
}

impl CollectionOutput {
    /// Bucket that was listed
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix that was listed
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Keys of the fetched objects, in listing order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// One decoded envelope per fetched object, in listing order
    pub fn backbone_data(&self) -> &[Envelope<Attributes>] {
        &self.backbone_data
    }

    /// The response data in its wire envelope, `{"backboneData": [{"backboneData": {...}}, ...]}`
    pub fn into_envelope(self) -> Envelope<Vec<Envelope<Attributes>>> {
        Envelope::new(self.backbone_data)
    }
}
