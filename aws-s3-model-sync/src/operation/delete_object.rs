/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use super::output::ModelOutput;
use super::SyncContext;
use crate::error::Error;
use crate::key;
use crate::model::Model;
use crate::types::Method;

/// Remove the object of `model`.
#[tracing::instrument(skip_all, level = "debug", name = "delete-object")]
pub(crate) async fn delete_object(ctx: &SyncContext, model: &Model) -> Result<ModelOutput, Error> {
    let overrides = ctx.overrides();
    let bucket = ctx.bucket(model.bucket())?;
    let key = match &overrides.key {
        Some(key) => key.clone(),
        None => key::object_key(&model.url()?),
    };

    tracing::debug!("deleting s3://{bucket}/{key}");
    let resp = ctx
        .client()
        .delete_object()
        .bucket(&bucket)
        .key(&key)
        .set_version_id(overrides.version_id.clone())
        .set_request_payer(overrides.request_payer.clone())
        .set_expected_bucket_owner(overrides.expected_bucket_owner.clone())
        .send()
        .await?;

    let mut output = ModelOutput::new(Method::Delete, bucket, key);
    output.delete_marker = resp.delete_marker;
    output.version_id = resp.version_id;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::operation::delete_object::DeleteObjectOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};

    use super::delete_object;
    use crate::error::ErrorKind;
    use crate::model::Model;
    use crate::operation::test_util::{error_response, test_handle};
    use crate::operation::SyncContext;
    use crate::types::RequestOverrides;

    fn note() -> Model {
        Model::builder()
            .url_root("notes")
            .bucket("test-bucket")
            .attribute("id", "abc")
            .build()
    }

    #[tokio::test]
    async fn test_delete() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .match_requests(|r| r.key() == Some("notes/abc"))
            .then_output(|| DeleteObjectOutput::builder().delete_marker(true).build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&rule]);
        let ctx = SyncContext::new(test_handle(client), RequestOverrides::default());

        let output = delete_object(&ctx, &note()).await.unwrap();
        assert_eq!("notes/abc", output.key());
        assert_eq!(Some(true), output.delete_marker());
        assert!(output.backbone_data().is_empty());
    }

    #[tokio::test]
    async fn test_delete_service_failure() {
        let rule = mock!(aws_sdk_s3::Client::delete_object)
            .then_http_response(|| error_response(403, "AccessDenied"));
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&rule]);
        let ctx = SyncContext::new(test_handle(client), RequestOverrides::default());

        let err = delete_object(&ctx, &note()).await.unwrap_err();
        assert_eq!(&ErrorKind::StorageFailed, err.kind());
    }
}
