/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use crate::error::Error;
use crate::model::{Collection, Model};
use crate::types::RequestOverrides;

use super::output::{CollectionOutput, ModelOutput};

type SuccessFn<T, O> = Box<dyn FnOnce(&T, &O) + Send>;
type ErrorFn<T> = Box<dyn FnOnce(&T, &Error) + Send>;
type CompleteFn<T, O> = Box<dyn FnOnce(&T, Result<&O, &Error>) + Send>;

/// Options of a model sync operation
pub type ModelSyncOptions = SyncOptions<Model, ModelOutput>;

/// Options of a collection sync operation
pub type CollectionSyncOptions = SyncOptions<Collection, CollectionOutput>;

/// Per call options of a sync operation: callbacks plus storage request parameters.
///
/// Every callback receives the model or collection the operation was started with. That
/// target is the invocation context; any other context a callback needs is captured by the
/// closure itself.
///
/// For a single operation `success` runs iff it succeeded, `error` runs iff it failed, and
/// `complete` always runs exactly once, after either of them.
pub struct SyncOptions<T, O> {
    success: Option<SuccessFn<T, O>>,
    error: Option<ErrorFn<T>>,
    complete: Option<CompleteFn<T, O>>,
    s3: RequestOverrides,
}

impl<T, O> SyncOptions<T, O> {
    /// Create empty options
    pub fn new() -> Self {
        Self {
            success: None,
            error: None,
            complete: None,
            s3: RequestOverrides::default(),
        }
    }

    /// Invoked with the output when the operation succeeds
    pub fn success(mut self, f: impl FnOnce(&T, &O) + Send + 'static) -> Self {
        self.success = Some(Box::new(f));
        self
    }

    /// Invoked with the error when the operation fails
    pub fn error(mut self, f: impl FnOnce(&T, &Error) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Invoked once the operation has finished either way
    pub fn complete(mut self, f: impl FnOnce(&T, Result<&O, &Error>) + Send + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    /// Storage request parameters merged into the S3 requests
    pub fn s3(mut self, overrides: RequestOverrides) -> Self {
        self.s3 = overrides;
        self
    }

    /// The storage request parameters
    pub fn get_s3(&self) -> &RequestOverrides {
        &self.s3
    }

    pub(crate) fn into_parts(self) -> (RequestOverrides, Callbacks<T, O>) {
        let callbacks = Callbacks {
            success: self.success,
            error: self.error,
            complete: self.complete,
        };
        (self.s3, callbacks)
    }
}

impl<T, O> Default for SyncOptions<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, O> fmt::Debug for SyncOptions<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("success", &self.success.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .field("s3", &self.s3)
            .finish()
    }
}

/// Callbacks split off of [`SyncOptions`], consumed when the operation settles.
pub(crate) struct Callbacks<T, O> {
    success: Option<SuccessFn<T, O>>,
    error: Option<ErrorFn<T>>,
    complete: Option<CompleteFn<T, O>>,
}

impl<T, O> Callbacks<T, O> {
    pub(crate) fn notify(self, target: &T, result: &Result<O, Error>) {
        match result {
            Ok(output) => {
                if let Some(success) = self.success {
                    success(target, output);
                }
            }
            Err(err) => {
                if let Some(error) = self.error {
                    error(target, err);
                }
            }
        }

        if let Some(complete) = self.complete {
            complete(target, result.as_ref());
        }
    }
}
