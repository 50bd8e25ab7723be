/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::ready;
use pin_project_lite::pin_project;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::options::Callbacks;
use crate::error::Error;

pin_project! {
    /// Handle for an in-flight sync operation.
    ///
    /// The operation runs on its own task and delivers its outcome to the callbacks given in
    /// its options; the same outcome is yielded by awaiting the handle (or calling
    /// [`Self::join`]).
    ///
    /// # Cancellation
    ///
    /// There is none. Dropping the handle detaches the operation; it still runs to completion
    /// and still invokes its callbacks.
    #[derive(Debug)]
    pub struct SyncHandle<O> {
        #[pin]
        task: JoinHandle<Result<O, Error>>,
    }
}

impl<O> SyncHandle<O>
where
    O: Send + 'static,
{
    /// Spawn `operation` and route its outcome through `callbacks`, which run against `target`.
    pub(crate) fn spawn<T, F>(
        target: T,
        callbacks: Callbacks<T, O>,
        operation: F,
        span: tracing::Span,
    ) -> Self
    where
        T: Send + 'static,
        F: Future<Output = Result<O, Error>> + Send + 'static,
    {
        let task = tokio::spawn(
            async move {
                let result = operation.await;
                if let Err(err) = &result {
                    tracing::debug!("sync operation failed: {err}");
                }
                callbacks.notify(&target, &result);
                result
            }
            .instrument(span),
        );
        Self { task }
    }

    /// Consume the handle and wait for the operation to complete
    pub async fn join(self) -> Result<O, Error> {
        self.await
    }
}

impl<O> Future for SyncHandle<O> {
    type Output = Result<O, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.task.poll(cx));
        Poll::Ready(result.map_err(Error::from).and_then(|r| r))
    }
}
