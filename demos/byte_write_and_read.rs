/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use logstream_client::client_factory::ClientFactoryAsync;
use logstream_client_config::ClientConfigBuilder;
use logstream_client_shared::clock::SystemClock;
use logstream_client_shared::LogGroupName;
use logstream_service_client::mock_service::InMemoryLogService;
use std::sync::Arc;
use tokio::runtime::Handle;

#[tokio::main]
async fn main() {
    let config = ClientConfigBuilder::default().build().unwrap();

    // an in-memory service stands in for the remote one
    let service = Arc::new(InMemoryLogService::new(Arc::new(SystemClock)));
    service
        .create_log_group(&LogGroupName::from("my-group"))
        .await
        .unwrap();

    let client_factory = ClientFactoryAsync::new(config, service, Handle::current());
    let group = client_factory.log_group("my-group").unwrap();

    // every line becomes one event
    let mut writer = group.create_writer_async("my-stream").await.unwrap();
    let size = writer.write_async(b"hello\nworld\n").await.unwrap();
    assert_eq!(size, 12);

    // read the events back as bytes
    let mut reader = group.open_reader("my-stream").unwrap();
    let mut content = Vec::new();
    let mut buf = vec![0; 4];
    loop {
        let outcome = reader.read_async(&mut buf).await.unwrap();
        content.extend_from_slice(&buf[..outcome.size]);
        if outcome.end_of_stream {
            break;
        }
    }
    assert_eq!(content, b"hello\nworld\n");
    println!("{}", String::from_utf8_lossy(&content));
}
