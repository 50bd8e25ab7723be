/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Model and collection persistence on top of Amazon S3.
//!
//! Each [`Model`] is stored as one JSON object whose key is derived from the model's url and
//! identity. Each [`Collection`] is a key prefix; fetching it lists the prefix and reads every
//! object under it concurrently. Date valued attributes survive the round trip through a
//! reserved `date-attributes` metadata entry on the object.
//!
//! # Examples
//!
//! Load the default configuration:
//!
//! ```no_run
//! # async fn example() {
//! let config = aws_s3_model_sync::from_env()
//!     .default_bucket("my-bucket")
//!     .load()
//!     .await;
//! let client = aws_s3_model_sync::Client::new(config);
//! # }
//! ```
//!
//! Save a note and read back every note:
//!
//! ```no_run
//! use aws_s3_model_sync::{Collection, CollectionSyncOptions, Model, ModelSyncOptions};
//!
//! # async fn example(client: aws_s3_model_sync::Client) -> Result<(), aws_s3_model_sync::error::Error> {
//! let mut note = Model::builder()
//!     .url_root("notes")
//!     .attribute("title", "hello")
//!     .build();
//!
//! // a new model is assigned an identity when it is first saved
//! client.save(&mut note, ModelSyncOptions::new()).await?;
//! assert!(!note.is_new());
//!
//! let mut notes = Collection::new("notes");
//! client
//!     .fetch_collection(&mut notes, CollectionSyncOptions::new())
//!     .await?;
//!
//! # Ok(())
//! # }
//! ```
//!
//! See the documentation for each client operation for more information:
//!
//! * [`sync_model`](crate::Client::sync_model) - run a create/read/update/delete against one object
//! * [`sync_collection`](crate::Client::sync_collection) - list and fetch a collection prefix
//! * [`save`](crate::Client::save), [`fetch`](crate::Client::fetch),
//!   [`destroy`](crate::Client::destroy), [`fetch_collection`](crate::Client::fetch_collection) -
//!   the same, applying the response to the model or collection

/// Error types emitted by `aws-s3-model-sync`
pub mod error;

/// Common types used by `aws-s3-model-sync`
pub mod types;

/// Object key derivation
pub mod key;

/// Object body and metadata encoding
pub mod codec;

/// Models and collections
pub mod model;

/// Sync client
pub mod client;

/// Sync operations
pub mod operation;

/// Sync configuration
pub mod config;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;
pub use self::model::{Collection, Envelope, Model, Selection};
pub use self::operation::{
    CollectionOutput, CollectionSyncOptions, ModelOutput, ModelSyncOptions, SyncHandle,
    SyncOptions,
};
pub use self::types::{Attributes, Method, RequestOverrides, Resolvable, Value};

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
