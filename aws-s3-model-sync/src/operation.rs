/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::{self, Error};
use crate::types::RequestOverrides;

/// Create/update a model by writing its object
pub(crate) mod put_object;

/// Read a model back from its object
pub(crate) mod get_object;

/// Remove a model's object
pub(crate) mod delete_object;

/// List a collection prefix and fetch every object under it
pub(crate) mod fetch_collection;

/// Handle returned by every sync operation
pub mod handle;
pub use handle::SyncHandle;

/// Output types of sync operations
pub mod output;
pub use output::{CollectionOutput, ModelOutput};

/// Callback slots and request parameters of a sync operation
pub mod options;
pub use options::{CollectionSyncOptions, ModelSyncOptions, SyncOptions};

/// Container for maintaining context required to carry out a single sync operation.
#[derive(Debug, Clone)]
pub(crate) struct SyncContext {
    handle: Arc<crate::client::Handle>,
    overrides: Arc<RequestOverrides>,
}

impl SyncContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, overrides: RequestOverrides) -> Self {
        Self {
            handle,
            overrides: Arc::new(overrides),
        }
    }

    /// The S3 client to use for SDK operations
    pub(crate) fn client(&self) -> &aws_sdk_s3::Client {
        self.handle.config.client()
    }

    /// Caller supplied request parameters
    pub(crate) fn overrides(&self) -> &RequestOverrides {
        &self.overrides
    }

    /// Generate the identity for a new model
    pub(crate) fn generate_id(&self) -> String {
        self.handle.config.generate_id()
    }

    /// Pick the bucket for a request: request override, then the target's own bucket, then
    /// the configured default.
    pub(crate) fn bucket(&self, target_bucket: Option<String>) -> Result<String, Error> {
        self.overrides
            .bucket
            .clone()
            .or(target_bucket)
            .or_else(|| self.handle.config.default_bucket().map(str::to_owned))
            .ok_or_else(|| error::invalid_input("no bucket configured for sync operation"))
    }
}
