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
use crate::error::{FetchEvents, ReaderError};

use logstream_client_shared::{ContinuationToken, ScopedLogStream};

use snafu::ResultExt;
use std::cmp;
use std::collections::VecDeque;
use std::io::{Error, ErrorKind, Read};
use tracing::debug;

/// The result of one read: how many bytes were copied into the caller's buffer and whether
/// the stream is exhausted.
///
/// `end_of_stream` is set on the read that hands out the last buffered byte, not on a
/// following empty read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    pub size: usize,
    pub end_of_stream: bool,
}

/// A LogStreamReader reads the messages of a log stream's events as a byte stream.
///
/// The LogStreamReader implements the [`Read`] trait in the standard library.
///
/// Each page of events fetched from the service is appended to an internal buffer, and reads
/// are served from that buffer until it is empty. Only then is the next page requested,
/// using the forward token returned with the previous one. A page without a forward token ends
/// the stream.
///
/// A page can be empty while still carrying a forward token, e.g. when the reader caught up
/// with a stream that is still being written. [`read_async`] reports that as a zero sized,
/// non final [`ReadOutcome`]; the blocking [`Read`] implementation returns an error of kind
/// [`WouldBlock`] so it cannot be mistaken for the end of the stream. Callers poll again later.
///
/// [`Read`]: https://doc.rust-lang.org/std/io/trait.Read.html
/// [`read_async`]: LogStreamReader::read_async
/// [`WouldBlock`]: std::io::ErrorKind::WouldBlock
///
/// # Examples
/// ```no_run
/// use logstream_client::client_factory::ClientFactory;
/// use logstream_client_config::ClientConfigBuilder;
/// use logstream_client_shared::clock::SystemClock;
/// use logstream_service_client::mock_service::InMemoryLogService;
/// use std::io::Read;
/// use std::sync::Arc;
///
/// fn main() {
///     let config = ClientConfigBuilder::default().build().expect("creating config");
///     let service = Arc::new(InMemoryLogService::new(Arc::new(SystemClock)));
///     let client_factory = ClientFactory::new(config, service).expect("create factory");
///
///     let group = client_factory.log_group("my-group").expect("valid group name");
///     let mut reader = group.open_reader("my-stream").expect("open reader");
///     let mut buf: Vec<u8> = vec![0; 4];
///     let size = reader.read(&mut buf).expect("read from log stream");
/// }
/// ```
pub struct LogStreamReader {
    stream: ScopedLogStream,
    next_token: Option<ContinuationToken>,
    buffer: VecDeque<u8>,
    end_of_stream: bool,
    factory: ClientFactoryAsync,
}

impl Read for LogStreamReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        let outcome = self
            .factory
            .runtime_handle()
            .block_on(self.read_async(buf))
            .map_err(|e| Error::new(ErrorKind::Other, e))?;
        if outcome.size == 0 && !outcome.end_of_stream {
            return Err(Error::new(
                ErrorKind::WouldBlock,
                format!("no new events in {} yet", self.stream),
            ));
        }
        Ok(outcome.size)
    }
}

impl LogStreamReader {
    pub(crate) fn new(stream: ScopedLogStream, factory: ClientFactoryAsync) -> Self {
        let capacity = factory.config().reader_buffer_capacity();
        LogStreamReader {
            stream,
            next_token: None,
            buffer: VecDeque::with_capacity(capacity),
            end_of_stream: false,
            factory,
        }
    }

    /// Read data asynchronously.
    ///
    /// At most one page is requested from the service per call, and only when the internal
    /// buffer is empty. A failed request leaves the reader unchanged and can be retried by
    /// calling again.
    ///
    /// ```ignore
    /// let mut reader = group.open_reader("my-stream")?;
    /// let mut buf: Vec<u8> = vec![0; 4];
    /// let outcome = reader.read_async(&mut buf).await?;
    /// ```
    pub async fn read_async(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, ReaderError> {
        if self.buffer.is_empty() && !self.end_of_stream {
            self.fetch_page().await?;
        }
        let size = self.drain(buf);
        Ok(ReadOutcome {
            size,
            end_of_stream: self.end_of_stream && self.buffer.is_empty(),
        })
    }

    /// Return the bytes that are available to read instantly without fetching from the service.
    pub fn available(&self) -> usize {
        self.buffer.len()
    }

    pub fn stream(&self) -> &ScopedLogStream {
        &self.stream
    }

    /// The forward token the next page will be requested with.
    pub fn continuation_token(&self) -> Option<&ContinuationToken> {
        self.next_token.as_ref()
    }

    /// Whether the service signalled the end of the stream. Buffered bytes may still be
    /// waiting to be read.
    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    async fn fetch_page(&mut self) -> Result<(), ReaderError> {
        let page = self
            .factory
            .service_client()
            .get_log_events(&self.stream, self.next_token.as_ref())
            .await
            .context(FetchEvents {
                stream: self.stream.to_string(),
            })?;

        let repeated = self.factory.config().end_on_repeated_token()
            && page.next_forward_token.is_some()
            && page.next_forward_token == self.next_token;
        debug!(
            "fetched {} events of {}, next token {:?}",
            page.events.len(),
            self.stream,
            page.next_forward_token
        );
        self.end_of_stream = page.next_forward_token.is_none() || repeated;
        self.next_token = page.next_forward_token;
        for event in page.events {
            self.buffer.extend(event.message.as_bytes());
        }
        Ok(())
    }

    fn drain(&mut self, buf: &mut [u8]) -> usize {
        let size = cmp::min(buf.len(), self.buffer.len());
        for (dst, src) in buf.iter_mut().zip(self.buffer.drain(..size)) {
            *dst = src;
        }
        size
    }
}
