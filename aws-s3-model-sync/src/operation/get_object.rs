/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use super::output::ModelOutput;
use super::SyncContext;
use crate::codec;
use crate::error::Error;
use crate::key;
use crate::model::Model;
use crate::types::{Attributes, Method};

/// A single object read back from storage and decoded.
#[derive(Debug)]
pub(crate) struct FetchedObject {
    pub(crate) attributes: Attributes,
    pub(crate) metadata: Option<HashMap<String, String>>,
    pub(crate) e_tag: Option<String>,
    pub(crate) version_id: Option<String>,
}

/// Read the object of `model` and decode its attributes.
#[tracing::instrument(skip_all, level = "debug", name = "get-object")]
pub(crate) async fn get_object(ctx: &SyncContext, model: &Model) -> Result<ModelOutput, Error> {
    let overrides = ctx.overrides();
    let bucket = ctx.bucket(model.bucket())?;
    let key = match &overrides.key {
        Some(key) => key.clone(),
        None => key::object_key(&model.url()?),
    };

    let fetched = fetch_object(ctx, &bucket, &key, overrides.version_id.clone()).await?;

    let mut output = ModelOutput::new(Method::Read, bucket, key);
    output.backbone_data = fetched.attributes;
    output.metadata = fetched.metadata;
    output.e_tag = fetched.e_tag;
    output.version_id = fetched.version_id;
    Ok(output)
}

/// Issue a `GetObject` for `key`, collect the body and decode it.
pub(crate) async fn fetch_object(
    ctx: &SyncContext,
    bucket: &str,
    key: &str,
    version_id: Option<String>,
) -> Result<FetchedObject, Error> {
    let overrides = ctx.overrides();
    tracing::trace!("reading s3://{bucket}/{key}");

    let resp = ctx
        .client()
        .get_object()
        .bucket(bucket)
        .key(key)
        .set_version_id(version_id)
        .set_sse_customer_algorithm(overrides.sse_customer_algorithm.clone())
        .set_sse_customer_key(overrides.sse_customer_key.clone())
        .set_sse_customer_key_md5(overrides.sse_customer_key_md5.clone())
        .set_request_payer(overrides.request_payer.clone())
        .set_expected_bucket_owner(overrides.expected_bucket_owner.clone())
        .send()
        .await?;

    let body = resp.body.collect().await?.into_bytes();
    let attributes = codec::decode(&body, resp.metadata.as_ref());

    Ok(FetchedObject {
        attributes,
        metadata: resp.metadata,
        e_tag: resp.e_tag,
        version_id: resp.version_id,
    })
}
