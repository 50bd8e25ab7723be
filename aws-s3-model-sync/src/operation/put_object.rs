/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::primitives::ByteStream;

use super::output::ModelOutput;
use super::SyncContext;
use crate::codec;
use crate::error::Error;
use crate::key;
use crate::model::Model;
use crate::types::{Attributes, Method, Value};

/// Write the full attribute set of `model` to its object.
///
/// A new model is assigned an identity first; the identity is part of the written body and
/// is reported back as the only changed attribute.
#[tracing::instrument(skip_all, level = "debug", name = "put-object")]
pub(crate) async fn put_object(
    ctx: &SyncContext,
    model: &Model,
    method: Method,
) -> Result<ModelOutput, Error> {
    let overrides = ctx.overrides();
    let bucket = ctx.bucket(model.bucket())?;
    let resolved = key::model_key(&model.url()?, model.is_new(), || ctx.generate_id());
    let key = overrides.key.clone().unwrap_or(resolved.key);

    let mut attributes = model.attributes().clone();
    let mut changed = Attributes::new();
    if let Some(id) = resolved.assigned_id {
        let id = Value::from(id);
        attributes.insert(model.id_attribute().to_owned(), id.clone());
        changed.insert(model.id_attribute().to_owned(), id);
    }

    let metadata = codec::encode_metadata(&attributes, overrides.metadata.clone())?;
    let body = codec::encode_body(&attributes)?;
    let content_type = overrides
        .content_type
        .clone()
        .unwrap_or_else(|| codec::CONTENT_TYPE.to_owned());

    tracing::debug!(
        "writing {} bytes to s3://{bucket}/{key} ({method})",
        body.len()
    );

    let resp = ctx
        .client()
        .put_object()
        .bucket(&bucket)
        .key(&key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .set_metadata(metadata)
        .set_cache_control(overrides.cache_control.clone())
        .set_storage_class(overrides.storage_class.clone())
        .set_server_side_encryption(overrides.server_side_encryption.clone())
        .set_sse_customer_algorithm(overrides.sse_customer_algorithm.clone())
        .set_sse_customer_key(overrides.sse_customer_key.clone())
        .set_sse_customer_key_md5(overrides.sse_customer_key_md5.clone())
        .set_request_payer(overrides.request_payer.clone())
        .set_expected_bucket_owner(overrides.expected_bucket_owner.clone())
        .send()
        .await?;

    let mut output = ModelOutput::new(method, bucket, key);
    output.backbone_data = changed;
    output.e_tag = resp.e_tag;
    output.version_id = resp.version_id;
    Ok(output)
}
