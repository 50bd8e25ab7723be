/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

pub(crate) mod loader;

/// Generates the identity assigned to a model on its first write.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

fn default_id_generator() -> IdGenerator {
    Arc::new(|| uuid::Uuid::new_v4().to_string())
}

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Clone)]
pub struct Config {
    client: aws_sdk_s3::client::Client,
    default_bucket: Option<String>,
    id_generator: IdGenerator,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The Amazon S3 client instance that will be used to send requests to S3.
    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }

    /// Bucket used when neither the model/collection nor the request names one.
    pub fn default_bucket(&self) -> Option<&str> {
        self.default_bucket.as_deref()
    }

    /// Generate a new model identity
    pub(crate) fn generate_id(&self) -> String {
        (self.id_generator)()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client", &self.client)
            .field("default_bucket", &self.default_bucket)
            .finish_non_exhaustive()
    }
}

/// Fluent style builder for [Config]
#[derive(Clone, Default)]
pub struct Builder {
    client: Option<aws_sdk_s3::Client>,
    default_bucket: Option<String>,
    id_generator: Option<IdGenerator>,
}

impl Builder {
    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Bucket used when neither the model/collection nor the request names one.
    pub fn default_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.default_bucket = Some(bucket.into());
        self
    }

    /// Bucket used when neither the model/collection nor the request names one.
    pub fn set_default_bucket(mut self, bucket: Option<String>) -> Self {
        self.default_bucket = bucket;
        self
    }

    /// Override how new model identities are generated.
    ///
    /// Default is a random (v4) UUID.
    pub fn id_generator(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            client: self.client.expect("client set"),
            default_bucket: self.default_bucket,
            id_generator: self.id_generator.unwrap_or_else(default_id_generator),
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("client", &self.client)
            .field("default_bucket", &self.default_bucket)
            .finish_non_exhaustive()
    }
}
