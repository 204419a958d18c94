//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

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

pub mod clock;
pub mod naming_utils;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;
use std::fmt::{Display, Formatter};

#[macro_use]
extern crate shrinkwraprs;

#[derive(Shrinkwrap, Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroupName {
    pub name: String,
}

#[derive(Shrinkwrap, Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStreamName {
    pub name: String,
}

/// A log stream qualified by the group that owns it.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedLogStream {
    pub group: LogGroupName,
    pub stream: LogStreamName,
}

/// The token the service hands out after every accepted append. The next append to the same
/// stream must present it.
#[derive(Shrinkwrap, Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceToken(pub String);

/// Opaque forward pagination token returned by a read.
#[derive(Shrinkwrap, Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationToken(pub String);

/// Milliseconds since the unix epoch.
#[derive(Shrinkwrap, Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

/// A single event submitted in an append batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLogEvent {
    pub message: String,
    pub timestamp: Timestamp,
}

/// A single event returned by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLogEvent {
    pub message: String,
    pub timestamp: Timestamp,
    pub ingestion_time: Timestamp,
}

/// Describes which events of an append batch the service refused to store.
///
/// Indices refer to positions in the submitted batch. `too_new_log_event_start_index` is the first
/// event that was too far in the future, the two end indices are exclusive upper bounds of the
/// events that were too old or past the retention period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLogEventsInfo {
    pub too_new_log_event_start_index: Option<i32>,
    pub too_old_log_event_end_index: Option<i32>,
    pub expired_log_event_end_index: Option<i32>,
}

impl RejectedLogEventsInfo {
    pub fn is_empty(&self) -> bool {
        self.too_new_log_event_start_index.is_none()
            && self.too_old_log_event_end_index.is_none()
            && self.expired_log_event_end_index.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStreamDescription {
    pub log_stream_name: LogStreamName,
    pub creation_time: Timestamp,
    pub first_event_timestamp: Option<Timestamp>,
    pub last_event_timestamp: Option<Timestamp>,
    pub upload_sequence_token: Option<SequenceToken>,
    pub stored_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutLogEventsOutput {
    pub next_sequence_token: Option<SequenceToken>,
    pub rejected_log_events_info: Option<RejectedLogEventsInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLogEventsOutput {
    pub events: Vec<OutputLogEvent>,
    pub next_forward_token: Option<ContinuationToken>,
}

impl From<&str> for LogGroupName {
    fn from(name: &str) -> Self {
        LogGroupName { name: name.to_owned() }
    }
}

impl From<String> for LogGroupName {
    fn from(name: String) -> Self {
        LogGroupName { name }
    }
}

impl From<&str> for LogStreamName {
    fn from(name: &str) -> Self {
        LogStreamName { name: name.to_owned() }
    }
}

impl From<String> for LogStreamName {
    fn from(name: String) -> Self {
        LogStreamName { name }
    }
}

impl From<&str> for SequenceToken {
    fn from(token: &str) -> Self {
        SequenceToken(token.to_owned())
    }
}

impl From<&str> for ContinuationToken {
    fn from(token: &str) -> Self {
        ContinuationToken(token.to_owned())
    }
}

impl From<&str> for ScopedLogStream {
    /// Parses `group:stream`. Group names may contain `/`, stream names may not contain `:`,
    /// so the last `:` separates the two.
    fn from(qualified: &str) -> Self {
        match qualified.rfind(':') {
            Some(pos) => ScopedLogStream {
                group: LogGroupName::from(&qualified[..pos]),
                stream: LogStreamName::from(&qualified[pos + 1..]),
            },
            None => ScopedLogStream {
                group: LogGroupName::from(""),
                stream: LogStreamName::from(qualified),
            },
        }
    }
}

impl Display for LogGroupName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        Ok(())
    }
}

impl Display for LogStreamName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        Ok(())
    }
}

impl Display for ScopedLogStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.group.name)?;
        f.write_char(':')?;
        f.write_str(&self.stream.name)?;
        Ok(())
    }
}

impl Display for SequenceToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for ContinuationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for RejectedLogEventsInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut field = |f: &mut Formatter<'_>, label: &str, value: Option<i32>| -> fmt::Result {
            if let Some(index) = value {
                if !first {
                    f.write_str(", ")?;
                }
                first = false;
                write!(f, "{}={}", label, index)?;
            }
            Ok(())
        };
        f.write_char('[')?;
        field(f, "too_new_start", self.too_new_log_event_start_index)?;
        field(f, "too_old_end", self.too_old_log_event_end_index)?;
        field(f, "expired_end", self.expired_log_event_end_index)?;
        f.write_char(']')
    }
}
