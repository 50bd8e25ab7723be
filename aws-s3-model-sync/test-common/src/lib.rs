/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use aws_sdk_s3::operation::get_object::GetObjectOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_mocks_experimental::{mock, Rule};
use aws_smithy_runtime_api::{client::orchestrator::HttpResponse, http::StatusCode};
use bytes::Bytes;

/// A single stored object of a [`MockBucket`]
#[derive(Debug, Clone)]
pub struct MockObject {
    object: aws_sdk_s3::types::Object,
    contents: Bytes,
    metadata: HashMap<String, String>,
    error_on_get: bool,
}

impl MockObject {
    /// Create a new mock object with the given key and contents
    pub fn new(key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let contents: Bytes = data.into();
        let object = aws_sdk_s3::types::Object::builder()
            .key(key.into())
            .size(contents.len() as i64)
            .build();
        Self {
            object,
            contents,
            metadata: HashMap::new(),
            error_on_get: false,
        }
    }

    /// Create a new mock object that fails when `get_object` is invoked on it
    pub fn new_with_error(key: impl Into<String>) -> Self {
        let mut obj = Self::new(key, Bytes::new());
        obj.error_on_get = true;
        obj
    }

    /// Add a user metadata entry returned by `get_object`
    pub fn with_metadata(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.metadata.insert(k.into(), v.into());
        self
    }

    fn key(&self) -> Option<&str> {
        self.object.key()
    }

    /// Get the output for the `get_object` invocation
    fn get_object_output(&self) -> GetObjectOutput {
        assert!(!self.error_on_get, "mock object expects error");
        GetObjectOutput::builder()
            .body(ByteStream::from(self.contents.clone()))
            .content_length(self.contents.len() as i64)
            .set_metadata(Some(self.metadata.clone()).filter(|md| !md.is_empty()))
            .build()
    }
}

/// 403 `AccessDenied`, which the SDK does not retry
fn get_object_error_http_resp() -> HttpResponse {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?><Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;
    HttpResponse::new(
        StatusCode::try_from(403).unwrap(),
        Bytes::from_static(body.as_bytes()).into(),
    )
}

/// Get the mock rule for this object when `get_object` is invoked for the corresponding key
fn get_object_rule(mobj: &MockObject, gets: Arc<AtomicUsize>) -> Rule {
    let share1 = Arc::new(mobj.clone());
    let share2 = share1.clone();

    let rule = mock!(aws_sdk_s3::Client::get_object).match_requests(move |r| {
        let matched = r.key() == share1.key();
        if matched {
            gets.fetch_add(1, Ordering::SeqCst);
        }
        matched
    });

    if mobj.error_on_get {
        rule.then_http_response(get_object_error_http_resp)
    } else {
        rule.then_output(move || share2.get_object_output())
    }
}

/// Mock bucket with a set of objects for testing collection sync.
///
/// NOTE: This is limited to simple test scenarios where only a single `ListObjectsV2` is used.
/// The listing returns every object of the bucket in insertion order regardless of the
/// requested prefix.
#[derive(Debug)]
pub struct MockBucket {
    objects: Vec<MockObject>,
    list_prefixes: Arc<std::sync::Mutex<Vec<Option<String>>>>,
    gets: Arc<AtomicUsize>,
}

impl MockBucket {
    /// Create a new [`MockBucket`] builder
    pub fn builder() -> MockBucketBuilder {
        MockBucketBuilder::default()
    }

    /// Return the mock rules representing this bucket. This includes
    /// the `ListObjectsV2` call as well as all of the `GetObject` calls.
    pub fn rules(&self) -> Vec<Rule> {
        let contents = self.objects.iter().map(|m| m.object.clone()).collect();

        let list_output = ListObjectsV2Output::builder()
            .set_contents(Some(contents))
            .build();

        let prefixes = self.list_prefixes.clone();
        let list_rule = mock!(aws_sdk_s3::Client::list_objects_v2)
            .match_requests(move |r| {
                prefixes
                    .lock()
                    .unwrap()
                    .push(r.prefix().map(str::to_owned));
                true
            })
            .then_output(move || list_output.clone());

        let mut rules: Vec<Rule> = self
            .objects
            .iter()
            .map(|obj| get_object_rule(obj, self.gets.clone()))
            .collect();

        rules.push(list_rule);
        rules
    }

    /// Number of `GetObject` requests served so far
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Prefixes of the `ListObjectsV2` requests served so far
    pub fn list_prefixes(&self) -> Vec<Option<String>> {
        self.list_prefixes.lock().unwrap().clone()
    }
}

/// Fluent style builder for [MockBucket]
#[derive(Debug, Default)]
pub struct MockBucketBuilder {
    objects: Vec<MockObject>,
}

impl MockBucketBuilder {
    /// Add a stored object
    pub fn object(mut self, object: MockObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Add a stored object with the given JSON body
    pub fn json(mut self, key: impl Into<String>, body: &'static str) -> Self {
        self.objects.push(MockObject::new(key, body));
        self
    }

    /// Create a new key that returns an error when `get_object` API operation is invoked
    pub fn key_with_error(mut self, key: impl Into<String>) -> Self {
        self.objects.push(MockObject::new_with_error(key));
        self
    }

    /// Consume the builder and build a `MockBucket`
    pub fn build(self) -> MockBucket {
        MockBucket {
            objects: self.objects,
            list_prefixes: Default::default(),
            gets: Default::default(),
        }
    }
}
