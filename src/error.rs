//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use logstream_client_shared::naming_utils::NameError;
use logstream_client_shared::RejectedLogEventsInfo;
use logstream_service_client::LogServiceError;
use snafu::Snafu;

/// Failures while resolving a stream of a [`LogGroup`] to a reader or writer.
///
/// [`LogGroup`]: crate::group::LogGroup
#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum GroupError {
    #[snafu(display("Invalid name: {}", source))]
    InvalidName { source: NameError },

    #[snafu(display("Failed to create log stream {}: {}", stream, source))]
    CreateStream { stream: String, source: LogServiceError },

    #[snafu(display("Failed to look up log stream {}: {}", stream, source))]
    DescribeStreams { stream: String, source: LogServiceError },

    #[snafu(display("Log stream not found {}, {} streams matched", stream, matches))]
    StreamNotFound { stream: String, matches: usize },
}

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum ReaderError {
    #[snafu(display("Failed to fetch events of {}: {}", stream, source))]
    FetchEvents { stream: String, source: LogServiceError },
}

/// Failures of a single write. Both variants report how many input bytes were turned into
/// events before the append was attempted.
#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum WriterError {
    #[snafu(display("Failed to append events to {}: {}", stream, source))]
    AppendFailed {
        stream: String,
        consumed: usize,
        source: LogServiceError,
    },

    #[snafu(display("Log messages were rejected by {}: {}", stream, info))]
    EventsRejected {
        stream: String,
        consumed: usize,
        info: RejectedLogEventsInfo,
    },
}

impl WriterError {
    /// Number of input bytes consumed by the failed write.
    pub fn consumed(&self) -> usize {
        match self {
            WriterError::AppendFailed { consumed, .. } => *consumed,
            WriterError::EventsRejected { consumed, .. } => *consumed,
        }
    }
}
