/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::Builder;
use crate::Config;

/// Load sync [`Config`] from the environment.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
}

impl ConfigLoader {
    /// Bucket used when neither the model/collection nor the request names one.
    pub fn default_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.builder = self.builder.default_bucket(bucket);
        self
    }

    /// Override how new model identities are generated.
    pub fn id_generator(mut self, generator: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.builder = self.builder.id_generator(generator);
        self
    }

    /// Load the default configuration
    ///
    /// The S3 client is constructed from the shared AWS configuration found in the
    /// environment (credentials, region, profile, ...). If fields have been overridden during
    /// builder construction, the override values will be used.
    pub async fn load(self) -> Config {
        let shared_config = aws_config::from_env().load().await;
        let s3_client = aws_sdk_s3::Client::new(&shared_config);
        self.builder.client(s3_client).build()
    }
}
