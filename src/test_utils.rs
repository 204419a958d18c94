//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use async_trait::async_trait;
use logstream_client_shared::*;
use logstream_service_client::{LogServiceClient, LogServiceError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) type PutCall = (ScopedLogStream, Vec<InputLogEvent>, Option<SequenceToken>);

/// A service that answers each call with the next scripted response and records the requests.
///
/// Creating a stream succeeds and describing finds nothing unless scripted otherwise. Appends
/// and reads without a scripted response fail.
#[derive(Default)]
pub(crate) struct ScriptedLogService {
    creates: Mutex<VecDeque<Result<()>>>,
    describes: Mutex<VecDeque<Result<Vec<LogStreamDescription>>>>,
    put_responses: Mutex<VecDeque<Result<PutLogEventsOutput>>>,
    get_responses: Mutex<VecDeque<Result<GetLogEventsOutput>>>,
    put_calls: Mutex<Vec<PutCall>>,
    get_calls: Mutex<Vec<Option<ContinuationToken>>>,
    describe_calls: Mutex<Vec<(LogGroupName, String)>>,
}

impl ScriptedLogService {
    pub(crate) fn push_create(&self, response: Result<()>) {
        self.creates.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_describe(&self, response: Result<Vec<LogStreamDescription>>) {
        self.describes.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_put(&self, response: Result<PutLogEventsOutput>) {
        self.put_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_get(&self, response: Result<GetLogEventsOutput>) {
        self.get_responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn puts(&self) -> Vec<PutCall> {
        self.put_calls.lock().unwrap().clone()
    }

    pub(crate) fn get_tokens(&self) -> Vec<Option<ContinuationToken>> {
        self.get_calls.lock().unwrap().clone()
    }

    pub(crate) fn describes(&self) -> Vec<(LogGroupName, String)> {
        self.describe_calls.lock().unwrap().clone()
    }
}

fn unscripted(operation: &str) -> LogServiceError {
    LogServiceError::OperationError {
        can_retry: false,
        operation: operation.to_owned(),
        error_msg: "no scripted response".to_owned(),
    }
}

#[async_trait]
impl LogServiceClient for ScriptedLogService {
    async fn put_log_events(
        &self,
        stream: &ScopedLogStream,
        events: Vec<InputLogEvent>,
        sequence_token: Option<&SequenceToken>,
    ) -> Result<PutLogEventsOutput> {
        self.put_calls
            .lock()
            .unwrap()
            .push((stream.clone(), events, sequence_token.cloned()));
        self.put_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("PutLogEvents")))
    }

    async fn create_log_stream(&self, _stream: &ScopedLogStream) -> Result<()> {
        self.creates.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn describe_log_streams(
        &self,
        group: &LogGroupName,
        stream_name_prefix: &str,
    ) -> Result<Vec<LogStreamDescription>> {
        self.describe_calls
            .lock()
            .unwrap()
            .push((group.clone(), stream_name_prefix.to_owned()));
        self.describes.lock().unwrap().pop_front().unwrap_or_else(|| Ok(vec![]))
    }

    async fn get_log_events(
        &self,
        _stream: &ScopedLogStream,
        next_token: Option<&ContinuationToken>,
    ) -> Result<GetLogEventsOutput> {
        self.get_calls.lock().unwrap().push(next_token.cloned());
        self.get_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("GetLogEvents")))
    }
}

pub(crate) fn output_event(message: &str, timestamp: i64) -> OutputLogEvent {
    OutputLogEvent {
        message: message.to_owned(),
        timestamp: Timestamp(timestamp),
        ingestion_time: Timestamp(timestamp),
    }
}

pub(crate) fn stream_description(name: &str, token: Option<&str>) -> LogStreamDescription {
    LogStreamDescription {
        log_stream_name: LogStreamName::from(name),
        creation_time: Timestamp(0),
        first_event_timestamp: None,
        last_event_timestamp: None,
        upload_sequence_token: token.map(SequenceToken::from),
        stored_bytes: 0,
    }
}
