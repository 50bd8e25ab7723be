/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::model::{Collection, Model};
use crate::operation::{
    delete_object::delete_object, fetch_collection::fetch_collection, get_object::get_object,
    put_object::put_object, CollectionOutput, CollectionSyncOptions, ModelOutput,
    ModelSyncOptions, SyncContext, SyncHandle,
};
use crate::types::Method;
use crate::Config;

/// Model and collection persistence client for Amazon Simple Storage Service.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. the S3 client and id generation
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Client {
    /// Creates a new client from a sync config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Run a single model operation against storage.
    ///
    /// `Create` and `Update` write the object, `Read` reads it back and `Delete` removes it.
    /// The operation starts immediately on the current Tokio runtime; its outcome goes to the
    /// callbacks in `options` and to the returned handle.
    ///
    /// This only talks to storage. Use [`Client::save`], [`Client::fetch`] or
    /// [`Client::destroy`] to also apply the response to the model.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aws_s3_model_sync::{Method, Model, ModelSyncOptions};
    ///
    /// async fn read_note(
    ///     client: &aws_s3_model_sync::Client,
    /// ) -> Result<(), aws_s3_model_sync::error::Error> {
    ///     let note = Model::builder()
    ///         .url_root("notes")
    ///         .bucket("my-bucket")
    ///         .attribute("id", "abc")
    ///         .build();
    ///
    ///     let options = ModelSyncOptions::new()
    ///         .success(|_note, output| println!("read {}", output.key()))
    ///         .complete(|_note, _result| println!("done"));
    ///
    ///     let output = client.sync_model(Method::Read, &note, options).await?;
    ///     // ... do something with output.backbone_data()
    ///     Ok(())
    /// }
    /// ```
    pub fn sync_model(
        &self,
        method: Method,
        model: &Model,
        options: ModelSyncOptions,
    ) -> SyncHandle<ModelOutput> {
        let (overrides, callbacks) = options.into_parts();
        let ctx = SyncContext::new(self.handle.clone(), overrides);
        let snapshot = model.clone();
        let target = model.clone();
        let span = tracing::debug_span!("sync-model", %method);

        SyncHandle::spawn(
            snapshot,
            callbacks,
            async move {
                match method {
                    Method::Create | Method::Update => put_object(&ctx, &target, method).await,
                    Method::Read => get_object(&ctx, &target).await,
                    Method::Delete => delete_object(&ctx, &target).await,
                }
            },
            span,
        )
    }

    /// Materialize a collection from storage.
    ///
    /// Every object under the collection prefix is listed and fetched; the operation succeeds
    /// only if all of them could be read. Collections are always listed regardless of
    /// `method`.
    pub fn sync_collection(
        &self,
        method: Method,
        collection: &Collection,
        options: CollectionSyncOptions,
    ) -> SyncHandle<CollectionOutput> {
        if method != Method::Read {
            tracing::debug!("collection sync always lists; treating {method} as read");
        }

        let (overrides, callbacks) = options.into_parts();
        let ctx = SyncContext::new(self.handle.clone(), overrides);
        let snapshot = collection.clone();
        let target = collection.clone();
        let span = tracing::debug_span!("sync-collection", %method);

        SyncHandle::spawn(
            snapshot,
            callbacks,
            async move { fetch_collection(&ctx, &target).await },
            span,
        )
    }

    /// Write `model` to storage and merge the changed payload (a generated identity for a new
    /// model) back into it.
    pub async fn save(
        &self,
        model: &mut Model,
        options: ModelSyncOptions,
    ) -> Result<ModelOutput, Error> {
        let method = if model.is_new() {
            Method::Create
        } else {
            Method::Update
        };
        let output = self.sync_model(method, model, options).await?;
        model.set_all(Model::parse(output.to_envelope()));
        Ok(output)
    }

    /// Read `model` from storage and set the stored attributes on it.
    pub async fn fetch(
        &self,
        model: &mut Model,
        options: ModelSyncOptions,
    ) -> Result<ModelOutput, Error> {
        let output = self.sync_model(Method::Read, model, options).await?;
        model.set_all(Model::parse(output.to_envelope()));
        Ok(output)
    }

    /// Delete `model` from storage.
    ///
    /// A new model was never stored, so nothing is sent and `Ok(None)` is returned without
    /// invoking any callbacks.
    pub async fn destroy(
        &self,
        model: &Model,
        options: ModelSyncOptions,
    ) -> Result<Option<ModelOutput>, Error> {
        if model.is_new() {
            tracing::debug!("not deleting new model, it has never been stored");
            return Ok(None);
        }
        self.sync_model(Method::Delete, model, options)
            .await
            .map(Some)
    }

    /// Read every object of `collection` and replace its members with them.
    ///
    /// If any object could not be read the collection is left untouched.
    pub async fn fetch_collection(
        &self,
        collection: &mut Collection,
        options: CollectionSyncOptions,
    ) -> Result<CollectionOutput, Error> {
        let output = self
            .sync_collection(Method::Read, collection, options)
            .await?;
        collection.reset(Collection::parse(output.clone().into_envelope()));
        Ok(output)
    }
}
