/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use futures_util::future::join_all;
use tracing::Instrument;

use super::get_object::fetch_object;
use super::output::CollectionOutput;
use super::SyncContext;
use crate::error::{self, Error};
use crate::key;
use crate::model::{Collection, Envelope};

/// List every object under the collection prefix and fetch all of them.
///
/// Gets are issued concurrently in listing order. The outcome is decided only after every get
/// has settled: if any failed the whole fetch fails and none of the items are returned.
#[tracing::instrument(skip_all, level = "debug", name = "fetch-collection")]
pub(crate) async fn fetch_collection(
    ctx: &SyncContext,
    collection: &Collection,
) -> Result<CollectionOutput, Error> {
    let overrides = ctx.overrides();
    let bucket = ctx.bucket(collection.bucket())?;
    let prefix = key::collection_prefix(&collection.url());

    // single page only, no continuation
    let listing = ctx
        .client()
        .list_objects_v2()
        .bucket(&bucket)
        .prefix(&prefix)
        .set_request_payer(overrides.request_payer.clone())
        .set_expected_bucket_owner(overrides.expected_bucket_owner.clone())
        .send()
        .await?;

    let keys: Vec<String> = listing
        .contents()
        .iter()
        .filter_map(|obj| obj.key().map(str::to_owned))
        .collect();
    tracing::debug!("listed {} objects under s3://{bucket}/{prefix}", keys.len());

    let tasks: Vec<_> = keys
        .iter()
        .map(|key| {
            let ctx = ctx.clone();
            let bucket = bucket.clone();
            let key = key.clone();
            let span = tracing::debug_span!("fetch-collection-item", key = key.as_str());
            tokio::spawn(async move { fetch_object(&ctx, &bucket, &key, None).await }.instrument(span))
        })
        .collect();

    let results = join_all(tasks).await;

    let mut backbone_data = Vec::with_capacity(results.len());
    let mut failure: Option<Error> = None;
    for (key, result) in keys.iter().zip(results) {
        match result.map_err(Error::from).and_then(|fetched| fetched) {
            Ok(fetched) => backbone_data.push(Envelope::new(fetched.attributes)),
            Err(err) => {
                tracing::debug!("failed to fetch collection item {key:?}: {err}");
                if failure.is_none() {
                    failure = Some(error::child_operation_failed(err));
                }
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }

    Ok(CollectionOutput {
        bucket,
        prefix,
        keys,
        backbone_data,
    })
}
