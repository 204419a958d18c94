/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

#![deny(
    clippy::all,
    clippy::cargo,
    clippy::else_if_without_else,
    clippy::empty_line_after_outer_attr,
    clippy::multiple_inherent_impl,
    clippy::mut_mut,
    clippy::path_buf_push_overwrite
)]
#![warn(
    clippy::cargo_common_metadata,
    clippy::mutex_integer,
    clippy::needless_borrow,
    clippy::similar_names
)]
#![allow(clippy::multiple_crate_versions)]

use std::result::Result as StdResult;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use logstream_client_shared::*;
use snafu::{ResultExt, Snafu};
use tokio::time::timeout;
use tracing::debug;

pub mod mock_service;
pub mod paginator;

#[cfg(test)]
mod test;

#[derive(Debug, Snafu)]
pub enum LogServiceError {
    #[snafu(display("Resource {} already exists", resource))]
    ResourceAlreadyExists { resource: String },

    #[snafu(display("Resource {} does not exist", resource))]
    ResourceNotFound { resource: String },

    #[snafu(display(
        "Invalid sequence token for stream {}, the next expected token is {:?}",
        stream,
        expected
    ))]
    InvalidSequenceToken {
        stream: String,
        expected: Option<String>,
    },

    #[snafu(display("Invalid parameter for operation {}: {}", operation, error_msg))]
    InvalidParameter { operation: String, error_msg: String },

    #[snafu(display(
        "Log service failed to perform operation {} due to {}",
        operation,
        error_msg,
    ))]
    OperationError {
        can_retry: bool,
        operation: String,
        error_msg: String,
    },

    #[snafu(display("Could not connect to log service {}", endpoint))]
    ConnectionError {
        can_retry: bool,
        endpoint: String,
        error_msg: String,
    },

    #[snafu(display("Operation {} did not complete within {:?}", operation, limit))]
    RequestTimeout {
        operation: String,
        limit: Duration,
        source: tokio::time::error::Elapsed,
    },
}

pub type Result<T> = StdResult<T, LogServiceError>;

/// The operations of the remote log service that the stream readers and writers rely on.
///
/// Implementations surface the service's own failures as [`LogServiceError`]; callers neither
/// retry nor reclassify them.
#[async_trait]
pub trait LogServiceClient: Send + Sync {
    /**
     * API to append a batch of events to a stream. `sequence_token` must be the token returned by
     * the previous append, or `None` for the first append to a new stream. The output carries the
     * token for the next append and, if the service refused some events, which ones.
     */
    async fn put_log_events(
        &self,
        stream: &ScopedLogStream,
        events: Vec<InputLogEvent>,
        sequence_token: Option<&SequenceToken>,
    ) -> Result<PutLogEventsOutput>;

    /**
     * API to create a stream in an existing group. Fails with `ResourceAlreadyExists` if the
     * stream was created before.
     */
    async fn create_log_stream(&self, stream: &ScopedLogStream) -> Result<()>;

    /**
     * API to list the streams of a group whose names start with `stream_name_prefix`.
     */
    async fn describe_log_streams(
        &self,
        group: &LogGroupName,
        stream_name_prefix: &str,
    ) -> Result<Vec<LogStreamDescription>>;

    /**
     * API to fetch one page of events, starting from the head of the stream when `next_token`
     * is `None`.
     */
    async fn get_log_events(
        &self,
        stream: &ScopedLogStream,
        next_token: Option<&ContinuationToken>,
    ) -> Result<GetLogEventsOutput>;
}

/// Bounds every call to the wrapped client by a fixed time limit.
pub struct TimeoutLogServiceClient {
    inner: Arc<dyn LogServiceClient>,
    limit: Duration,
}

impl TimeoutLogServiceClient {
    pub fn new(inner: Arc<dyn LogServiceClient>, limit: Duration) -> Self {
        TimeoutLogServiceClient { inner, limit }
    }
}

#[async_trait]
impl LogServiceClient for TimeoutLogServiceClient {
    async fn put_log_events(
        &self,
        stream: &ScopedLogStream,
        events: Vec<InputLogEvent>,
        sequence_token: Option<&SequenceToken>,
    ) -> Result<PutLogEventsOutput> {
        debug!("put {} events to {}", events.len(), stream);
        timeout(
            self.limit,
            self.inner.put_log_events(stream, events, sequence_token),
        )
        .await
        .context(RequestTimeout {
            operation: "PutLogEvents",
            limit: self.limit,
        })?
    }

    async fn create_log_stream(&self, stream: &ScopedLogStream) -> Result<()> {
        debug!("create stream {}", stream);
        timeout(self.limit, self.inner.create_log_stream(stream))
            .await
            .context(RequestTimeout {
                operation: "CreateLogStream",
                limit: self.limit,
            })?
    }

    async fn describe_log_streams(
        &self,
        group: &LogGroupName,
        stream_name_prefix: &str,
    ) -> Result<Vec<LogStreamDescription>> {
        debug!("describe streams of {} with prefix {}", group, stream_name_prefix);
        timeout(
            self.limit,
            self.inner.describe_log_streams(group, stream_name_prefix),
        )
        .await
        .context(RequestTimeout {
            operation: "DescribeLogStreams",
            limit: self.limit,
        })?
    }

    async fn get_log_events(
        &self,
        stream: &ScopedLogStream,
        next_token: Option<&ContinuationToken>,
    ) -> Result<GetLogEventsOutput> {
        debug!("get events of {} from token {:?}", stream, next_token);
        timeout(self.limit, self.inner.get_log_events(stream, next_token))
            .await
            .context(RequestTimeout {
                operation: "GetLogEvents",
                limit: self.limit,
            })?
    }
}
