//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

use crate::byte::reader::LogStreamReader;
use crate::byte::writer::LogStreamWriter;
use crate::client_factory::ClientFactoryAsync;
use crate::error::*;

use logstream_client_shared::naming_utils::NameUtils;
use logstream_client_shared::{LogGroupName, LogStreamName, ScopedLogStream};
use logstream_service_client::LogServiceError;

use snafu::ResultExt;
use tracing::info;

/// A LogGroup hands out readers and writers for the streams of one remote log group.
///
/// # Examples
/// ```no_run
/// use logstream_client::client_factory::ClientFactory;
/// use logstream_client_config::ClientConfigBuilder;
/// use logstream_client_shared::clock::SystemClock;
/// use logstream_service_client::mock_service::InMemoryLogService;
/// use std::io::{Read, Write};
/// use std::sync::Arc;
///
/// fn main() {
///     let config = ClientConfigBuilder::default().build().expect("creating config");
///     let service = Arc::new(InMemoryLogService::new(Arc::new(SystemClock)));
///     let client_factory = ClientFactory::new(config, service).expect("create factory");
///
///     // assuming the group my-group exists.
///     let group = client_factory.log_group("my-group").expect("valid group name");
///     let mut writer = group.create_writer("my-stream").expect("create writer");
///     writer.write_all(b"hello\nworld\n").expect("write");
///
///     let mut reader = group.open_reader("my-stream").expect("open reader");
///     let mut content = String::new();
///     reader.read_to_string(&mut content).expect("read");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LogGroup {
    group: LogGroupName,
    factory: ClientFactoryAsync,
}

impl LogGroup {
    pub(crate) fn new(group: LogGroupName, factory: ClientFactoryAsync) -> Self {
        LogGroup { group, factory }
    }

    pub fn name(&self) -> &LogGroupName {
        &self.group
    }

    /// Creates the stream and returns a writer for it.
    ///
    /// If the stream already exists the writer continues it: it starts with the stream's current
    /// upload sequence token, so its first append is accepted.
    pub fn create_writer(&self, stream: &str) -> Result<LogStreamWriter, GroupError> {
        self.factory
            .runtime_handle()
            .block_on(self.create_writer_async(stream))
    }

    pub async fn create_writer_async(&self, stream: &str) -> Result<LogStreamWriter, GroupError> {
        let scoped_stream = self.scoped_stream(stream)?;
        match self.factory.service_client().create_log_stream(&scoped_stream).await {
            Ok(()) => {
                info!("created log stream {}", scoped_stream);
                Ok(LogStreamWriter::new(scoped_stream, None, self.factory.clone()))
            }
            Err(LogServiceError::ResourceAlreadyExists { .. }) => self.existing(scoped_stream).await,
            Err(e) => Err(e).context(CreateStream {
                stream: scoped_stream.to_string(),
            }),
        }
    }

    /// Returns a reader for the stream. The stream is not checked up front; if it does not
    /// exist the first read fails.
    pub fn open_reader(&self, stream: &str) -> Result<LogStreamReader, GroupError> {
        let scoped_stream = self.scoped_stream(stream)?;
        Ok(LogStreamReader::new(scoped_stream, self.factory.clone()))
    }

    async fn existing(&self, scoped_stream: ScopedLogStream) -> Result<LogStreamWriter, GroupError> {
        let mut streams = self
            .factory
            .service_client()
            .describe_log_streams(&self.group, &scoped_stream.stream.name)
            .await
            .context(DescribeStreams {
                stream: scoped_stream.to_string(),
            })?;

        if streams.len() != 1 {
            return StreamNotFound {
                stream: scoped_stream.to_string(),
                matches: streams.len(),
            }
            .fail();
        }
        let description = streams.remove(0);
        info!(
            "log stream {} already exists, continuing from sequence token {:?}",
            scoped_stream, description.upload_sequence_token
        );
        Ok(LogStreamWriter::new(
            scoped_stream,
            description.upload_sequence_token,
            self.factory.clone(),
        ))
    }

    fn scoped_stream(&self, stream: &str) -> Result<ScopedLogStream, GroupError> {
        if self.factory.config().validate_names() {
            NameUtils::validate_stream_name(stream).context(InvalidName {})?;
        }
        Ok(ScopedLogStream {
            group: self.group.clone(),
            stream: LogStreamName::from(stream),
        })
    }
}
