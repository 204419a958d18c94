/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use super::{LogServiceClient, LogServiceError, Result};
use async_trait::async_trait;
use logstream_client_shared::clock::Clock;
use logstream_client_shared::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Events older than this relative to the service clock are rejected as too old.
const MAX_EVENT_AGE_MILLIS: i64 = 14 * 24 * 60 * 60 * 1000;
/// Events further than this in the future are rejected as too new.
const MAX_EVENT_LEAD_MILLIS: i64 = 2 * 60 * 60 * 1000;
const DEFAULT_PAGE_SIZE: usize = 100;
const FORWARD_TOKEN_PREFIX: &str = "f/";

/// What `get_log_events` hands back once a page reaches the last stored event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndOfPages {
    /// No forward token.
    AbsentToken,
    /// A forward token that keeps pointing at the tail, so new events show up on the next call.
    RepeatToken,
}

#[derive(Debug)]
struct StreamState {
    creation_time: Timestamp,
    events: Vec<OutputLogEvent>,
    upload_sequence_token: Option<SequenceToken>,
    stored_bytes: u64,
}

#[derive(Debug, Default)]
struct State {
    groups: HashMap<LogGroupName, BTreeMap<String, StreamState>>,
    token_counter: u64,
}

/// A log service that keeps everything in memory.
///
/// It follows the observable contract of the remote service closely enough to exercise the
/// readers and writers end to end: appends must present the latest sequence token, events outside
/// the accepted time window are reported as rejected, and reads are paginated with forward tokens.
pub struct InMemoryLogService {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    page_size: usize,
    end_of_pages: EndOfPages,
}

impl InMemoryLogService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        InMemoryLogService {
            state: Mutex::new(State::default()),
            clock,
            page_size: DEFAULT_PAGE_SIZE,
            end_of_pages: EndOfPages::AbsentToken,
        }
    }

    /// Maximum number of events returned by one `get_log_events` call. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_end_of_pages(mut self, end_of_pages: EndOfPages) -> Self {
        self.end_of_pages = end_of_pages;
        self
    }

    pub async fn create_log_group(&self, group: &LogGroupName) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.groups.contains_key(group) {
            return Err(LogServiceError::ResourceAlreadyExists {
                resource: group.to_string(),
            });
        }
        state.groups.insert(group.clone(), BTreeMap::new());
        Ok(())
    }

    fn stream_mut<'a>(state: &'a mut State, stream: &ScopedLogStream) -> Result<&'a mut StreamState> {
        state
            .groups
            .get_mut(&stream.group)
            .ok_or(LogServiceError::ResourceNotFound {
                resource: stream.group.to_string(),
            })?
            .get_mut(&stream.stream.name)
            .ok_or(LogServiceError::ResourceNotFound {
                resource: stream.to_string(),
            })
    }

    /// Splits a batch into the indices the service refuses: events before the returned
    /// `too_old_end` are too old and events from `too_new_start` on are too new.
    fn classify(&self, events: &[InputLogEvent]) -> (usize, usize) {
        let now = *self.clock.now_millis();
        let too_old_end = events
            .iter()
            .rposition(|e| *e.timestamp < now - MAX_EVENT_AGE_MILLIS)
            .map_or(0, |i| i + 1);
        let too_new_start = events
            .iter()
            .position(|e| *e.timestamp > now + MAX_EVENT_LEAD_MILLIS)
            .unwrap_or_else(|| events.len());
        (too_old_end, too_new_start.max(too_old_end))
    }

    fn parse_forward_token(token: &ContinuationToken) -> Result<usize> {
        token
            .strip_prefix(FORWARD_TOKEN_PREFIX)
            .and_then(|index| index.parse::<usize>().ok())
            .ok_or(LogServiceError::InvalidParameter {
                operation: "GetLogEvents".into(),
                error_msg: format!("the next token {} is not valid", token),
            })
    }

    fn forward_token(index: usize) -> ContinuationToken {
        ContinuationToken(format!("{}{:020}", FORWARD_TOKEN_PREFIX, index))
    }
}

#[async_trait]
impl LogServiceClient for InMemoryLogService {
    async fn put_log_events(
        &self,
        stream: &ScopedLogStream,
        events: Vec<InputLogEvent>,
        sequence_token: Option<&SequenceToken>,
    ) -> Result<PutLogEventsOutput> {
        if events.is_empty() {
            return Err(LogServiceError::InvalidParameter {
                operation: "PutLogEvents".into(),
                error_msg: "at least one log event is required".into(),
            });
        }
        if events.windows(2).any(|pair| pair[0].timestamp > pair[1].timestamp) {
            return Err(LogServiceError::InvalidParameter {
                operation: "PutLogEvents".into(),
                error_msg: "log events in a single batch must be in chronological order".into(),
            });
        }
        let (too_old_end, too_new_start) = self.classify(&events);
        let ingestion_time = self.clock.now_millis();

        let mut state = self.state.lock().await;
        state.token_counter += 1;
        let next_token = SequenceToken(format!("{:056}", state.token_counter));
        let target = InMemoryLogService::stream_mut(&mut state, stream)?;
        if target.upload_sequence_token.as_ref() != sequence_token {
            return Err(LogServiceError::InvalidSequenceToken {
                stream: stream.to_string(),
                expected: target.upload_sequence_token.as_ref().map(|t| t.0.clone()),
            });
        }

        let batch_len = events.len();
        let accepted = too_new_start - too_old_end;
        for event in events.into_iter().skip(too_old_end).take(accepted) {
            target.stored_bytes += event.message.len() as u64;
            target.events.push(OutputLogEvent {
                message: event.message,
                timestamp: event.timestamp,
                ingestion_time,
            });
        }
        target.upload_sequence_token = Some(next_token.clone());
        debug!("stored {} of {} events in {}", accepted, batch_len, stream);

        let mut rejected = RejectedLogEventsInfo::default();
        if too_old_end > 0 {
            rejected.too_old_log_event_end_index = Some(too_old_end as i32);
        }
        if too_new_start < batch_len {
            rejected.too_new_log_event_start_index = Some(too_new_start as i32);
        }
        Ok(PutLogEventsOutput {
            next_sequence_token: Some(next_token),
            rejected_log_events_info: if rejected.is_empty() { None } else { Some(rejected) },
        })
    }

    async fn create_log_stream(&self, stream: &ScopedLogStream) -> Result<()> {
        let creation_time = self.clock.now_millis();
        let mut state = self.state.lock().await;
        let group = state
            .groups
            .get_mut(&stream.group)
            .ok_or(LogServiceError::ResourceNotFound {
                resource: stream.group.to_string(),
            })?;
        if group.contains_key(&stream.stream.name) {
            return Err(LogServiceError::ResourceAlreadyExists {
                resource: stream.to_string(),
            });
        }
        group.insert(
            stream.stream.name.clone(),
            StreamState {
                creation_time,
                events: Vec::new(),
                upload_sequence_token: None,
                stored_bytes: 0,
            },
        );
        Ok(())
    }

    async fn describe_log_streams(
        &self,
        group: &LogGroupName,
        stream_name_prefix: &str,
    ) -> Result<Vec<LogStreamDescription>> {
        let state = self.state.lock().await;
        let streams = state.groups.get(group).ok_or(LogServiceError::ResourceNotFound {
            resource: group.to_string(),
        })?;
        Ok(streams
            .iter()
            .filter(|(name, _)| name.starts_with(stream_name_prefix))
            .map(|(name, s)| LogStreamDescription {
                log_stream_name: LogStreamName::from(name.as_str()),
                creation_time: s.creation_time,
                first_event_timestamp: s.events.iter().map(|e| e.timestamp).min(),
                last_event_timestamp: s.events.iter().map(|e| e.timestamp).max(),
                upload_sequence_token: s.upload_sequence_token.clone(),
                stored_bytes: s.stored_bytes,
            })
            .collect())
    }

    async fn get_log_events(
        &self,
        stream: &ScopedLogStream,
        next_token: Option<&ContinuationToken>,
    ) -> Result<GetLogEventsOutput> {
        let start = match next_token {
            Some(token) => InMemoryLogService::parse_forward_token(token)?,
            None => 0,
        };
        let mut state = self.state.lock().await;
        let source = InMemoryLogService::stream_mut(&mut state, stream)?;
        let start = start.min(source.events.len());
        let end = (start + self.page_size).min(source.events.len());
        let events = source.events[start..end].to_vec();
        let next_forward_token = if end < source.events.len() {
            Some(InMemoryLogService::forward_token(end))
        } else {
            match self.end_of_pages {
                EndOfPages::AbsentToken => None,
                EndOfPages::RepeatToken => Some(InMemoryLogService::forward_token(end)),
            }
        };
        Ok(GetLogEventsOutput {
            events,
            next_forward_token,
        })
    }
}
