//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

//! The Byte API for writing and reading the events of a log stream as raw bytes.
//!
//! The writer turns every line of the bytes written to it into one log event, and the reader
//! concatenates the messages of the stream's events back into a byte stream. Event boundaries
//! are not preserved beyond the newlines the messages themselves carry.
//!
//! Neither reader nor writer is meant to be shared: both keep a service token that each call
//! reads and replaces, which is why every I/O method takes `&mut self`.
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
///     let group = client_factory.log_group("my-group").expect("valid group name");
///
///     // create writer and write some lines.
///     let mut writer = group.create_writer("my-stream").expect("create writer");
///     writer.write(b"hello\nworld").expect("write");
///
///     // create reader and read them back.
///     let mut reader = group.open_reader("my-stream").expect("open reader");
///     let mut buf: Vec<u8> = vec![0; 11];
///     let size = reader.read(&mut buf).expect("read from log stream");
/// }
/// ```
pub mod reader;
pub mod writer;
