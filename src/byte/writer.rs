//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

use crate::client_factory::ClientFactoryAsync;
use crate::error::{AppendFailed, EventsRejected, WriterError};

use logstream_client_config::policy::RejectionTokenPolicy;
use logstream_client_shared::{InputLogEvent, ScopedLogStream, SequenceToken};

use snafu::ResultExt;
use std::io::{Error, ErrorKind, Write};
use tracing::{debug, warn};

/// A LogStreamWriter appends bytes to a log stream, one event per line.
///
/// The LogStreamWriter implements the [`Write`] trait in the standard library.
///
/// Every call to `write` is a single append to the service: the input is split after each
/// newline, each non empty piece becomes one event and all events of the call share a single
/// timestamp taken from the factory's clock. The newline stays part of the event it ends. The
/// trailing bytes after the last newline form an event of their own, so a line split across
/// two writes ends up in two events.
///
/// The writer carries the stream's sequence token from one append to the next. Clones or
/// parallel writers of the same stream would race for that token, which the service rejects.
///
/// Each write is decoded as UTF-8 on its own and invalid bytes are replaced with U+FFFD. A
/// multi-byte character split across two writes, e.g. at the flush boundary of a `BufWriter`,
/// therefore arrives as two replacement characters. Callers writing arbitrary text should split
/// their writes at line or character boundaries.
///
/// `flush` does nothing since nothing is buffered.
///
/// [`Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
///
/// # Examples
/// ```no_run
/// use logstream_client::client_factory::ClientFactory;
/// use logstream_client_config::ClientConfigBuilder;
/// use logstream_client_shared::clock::SystemClock;
/// use logstream_service_client::mock_service::InMemoryLogService;
/// use std::io::Write;
/// use std::sync::Arc;
///
/// fn main() {
///     let config = ClientConfigBuilder::default().build().expect("creating config");
///     let service = Arc::new(InMemoryLogService::new(Arc::new(SystemClock)));
///     let client_factory = ClientFactory::new(config, service).expect("create factory");
///
///     let group = client_factory.log_group("my-group").expect("valid group name");
///     let mut writer = group.create_writer("my-stream").expect("create writer");
///     let size = writer.write(b"Hello\nWorld").expect("write to log stream");
///     assert_eq!(size, 11);
/// }
/// ```
pub struct LogStreamWriter {
    stream: ScopedLogStream,
    sequence_token: Option<SequenceToken>,
    factory: ClientFactoryAsync,
}

impl Write for LogStreamWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.factory
            .runtime_handle()
            .block_on(self.write_async(buf))
            .map_err(|e| Error::new(ErrorKind::Other, e))
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl LogStreamWriter {
    pub(crate) fn new(
        stream: ScopedLogStream,
        sequence_token: Option<SequenceToken>,
        factory: ClientFactoryAsync,
    ) -> Self {
        LogStreamWriter {
            stream,
            sequence_token,
            factory,
        }
    }

    /// Writes the given data asynchronously as one batch of events.
    ///
    /// On success the whole input counts as consumed. Both error variants report the consumed
    /// byte count as well, since the events were submitted even when the append failed.
    ///
    /// ```ignore
    /// let mut writer = group.create_writer("my-stream")?;
    /// let size = writer.write_async(b"first line\nsecond line\n").await?;
    /// ```
    pub async fn write_async(&mut self, buf: &[u8]) -> Result<usize, WriterError> {
        let timestamp = self.factory.clock().now_millis();
        let events: Vec<InputLogEvent> = buf
            .split_inclusive(|b| *b == b'\n')
            .filter(|segment| !segment.is_empty())
            .map(|segment| InputLogEvent {
                message: self.message(segment),
                timestamp,
            })
            .collect();
        if events.is_empty() {
            return Ok(0);
        }

        let consumed = buf.len();
        debug!("appending {} events to {}", events.len(), self.stream);
        let output = self
            .factory
            .service_client()
            .put_log_events(&self.stream, events, self.sequence_token.as_ref())
            .await
            .context(AppendFailed {
                stream: self.stream.to_string(),
                consumed,
            })?;

        match output.rejected_log_events_info {
            Some(info) => {
                warn!("events appended to {} were rejected: {}", self.stream, info);
                if self.factory.config().rejection_token_policy() == RejectionTokenPolicy::Adopt {
                    if let Some(token) = output.next_sequence_token {
                        self.sequence_token = Some(token);
                    }
                }
                EventsRejected {
                    stream: self.stream.to_string(),
                    consumed,
                    info,
                }
                .fail()
            }
            None => {
                self.sequence_token = output.next_sequence_token;
                Ok(consumed)
            }
        }
    }

    /// The token the next append will present.
    pub fn sequence_token(&self) -> Option<&SequenceToken> {
        self.sequence_token.as_ref()
    }

    pub fn stream(&self) -> &ScopedLogStream {
        &self.stream
    }

    fn message(&self, segment: &[u8]) -> String {
        match std::str::from_utf8(segment) {
            Ok(message) => message.to_owned(),
            Err(e) => {
                warn!("invalid utf-8 in event for {}: {}", self.stream, e);
                String::from_utf8_lossy(segment).into_owned()
            }
        }
    }
}
