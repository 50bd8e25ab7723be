/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::{Arc, Mutex};

use aws_s3_model_sync::codec::DATE_ATTRIBUTES_METADATA_KEY;
use aws_s3_model_sync::error::{Error, ErrorKind};
use aws_s3_model_sync::{Collection, CollectionSyncOptions, Method, Value};
use aws_smithy_mocks_experimental::{mock_client, RuleMode};
use chrono::{TimeZone, Utc};
use test_common::{MockBucket, MockObject};

fn test_client(s3: aws_sdk_s3::Client) -> aws_s3_model_sync::Client {
    let config = aws_s3_model_sync::Config::builder()
        .client(s3)
        .default_bucket("test-bucket")
        .build();
    aws_s3_model_sync::Client::new(config)
}

/// Items come back in listing order, each wrapped in its own envelope
#[tokio::test]
async fn test_fetch_in_listing_order() {
    let bucket = MockBucket::builder()
        .json("notes/aaa", r#"{"id":"aaa","title":"first"}"#)
        .json("notes/bbb", r#"{"id":"bbb","title":"second"}"#)
        .build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));

    let mut notes = Collection::new("notes");
    let output = client
        .fetch_collection(&mut notes, CollectionSyncOptions::new())
        .await
        .unwrap();

    assert_eq!(vec![Some("notes/".to_owned())], bucket.list_prefixes());
    assert_eq!(2, bucket.get_count());
    assert_eq!(vec!["notes/aaa", "notes/bbb"], output.keys());

    let titles: Vec<_> = output
        .backbone_data()
        .iter()
        .map(|item| item.backbone_data["title"].as_str())
        .collect();
    assert_eq!(vec![Some("first"), Some("second")], titles);

    assert_eq!(2, notes.len());
    assert_eq!(Some("aaa".to_owned()), notes.models()[0].id());
    assert_eq!("notes/bbb", notes.models()[1].url().unwrap());
}

#[tokio::test]
async fn test_item_dates_are_restored() {
    let bucket = MockBucket::builder()
        .object(
            MockObject::new(
                "notes/aaa",
                r#"{"id":"aaa","postedAt":"2013-01-01T00:00:00.000Z"}"#,
            )
            .with_metadata(DATE_ATTRIBUTES_METADATA_KEY, r#"["postedAt"]"#),
        )
        .build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));

    let mut notes = Collection::new("/notes/");
    client
        .fetch_collection(&mut notes, CollectionSyncOptions::new())
        .await
        .unwrap();

    assert_eq!(
        Some(&Utc.with_ymd_and_hms(2013, 1, 1, 0, 0, 0).unwrap()),
        notes.models()[0].get("postedAt").and_then(Value::as_date)
    );
}

/// An empty listing resolves empty without reading anything
#[tokio::test]
async fn test_empty_listing_issues_no_gets() {
    let bucket = MockBucket::builder().build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));

    let mut notes = Collection::new("notes");
    let output = client
        .fetch_collection(&mut notes, CollectionSyncOptions::new())
        .await
        .unwrap();

    assert!(output.backbone_data().is_empty());
    assert!(notes.is_empty());
    assert_eq!(0, bucket.get_count());
}

/// One failed read rejects the whole fetch and nothing is exposed
#[tokio::test]
async fn test_single_failure_rejects_fetch() {
    let bucket = MockBucket::builder()
        .json("notes/aaa", r#"{"id":"aaa"}"#)
        .key_with_error("notes/bbb")
        .json("notes/ccc", r#"{"id":"ccc"}"#)
        .build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));
    let log: Arc<Mutex<Vec<String>>> = Default::default();
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let options = CollectionSyncOptions::new()
        .success(move |_, out| {
            l1.lock()
                .unwrap()
                .push(format!("success {}", out.backbone_data().len()))
        })
        .error(move |_, err| l2.lock().unwrap().push(format!("error {:?}", err.kind())))
        .complete(move |_, res| l3.lock().unwrap().push(format!("complete {}", res.is_ok())));

    let mut notes = Collection::new("notes");
    notes.add(Default::default());
    let err = client
        .fetch_collection(&mut notes, options)
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::ChildOperationFailed, err.kind());
    // the item's own storage request failed, not its task
    let item_err = err
        .downcast_source::<Error>()
        .expect("source is the failed item error");
    assert_eq!(&ErrorKind::StorageFailed, item_err.kind());
    // every get still ran to completion
    assert_eq!(3, bucket.get_count());
    assert_eq!(
        vec!["error ChildOperationFailed", "complete false"],
        *log.lock().unwrap()
    );
    // untouched on failure
    assert_eq!(1, notes.len());
}

#[tokio::test]
async fn test_sync_collection_always_lists() {
    let bucket = MockBucket::builder()
        .json("notes/aaa", r#"{"id":"aaa"}"#)
        .build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));

    let notes = Collection::new("notes");
    let output = client
        .sync_collection(Method::Delete, &notes, CollectionSyncOptions::new())
        .await
        .unwrap();

    assert_eq!(1, output.backbone_data().len());
    assert_eq!(1, bucket.list_prefixes().len());
}

/// A root collection still lists under a separator prefix
#[tokio::test]
async fn test_root_collection_lists_separator() {
    let bucket = MockBucket::builder().json("/top", r#"{"id":"top"}"#).build();
    let client = test_client(mock_client!(
        aws_sdk_s3,
        RuleMode::MatchAny,
        bucket.rules().as_slice()
    ));

    let mut root = Collection::new("/");
    client
        .fetch_collection(&mut root, CollectionSyncOptions::new())
        .await
        .unwrap();

    assert_eq!(vec![Some("/".to_owned())], bucket.list_prefixes());
    assert_eq!(1, root.len());
}
