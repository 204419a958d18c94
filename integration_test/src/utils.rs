//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

use logstream_client::client_factory::ClientFactory;
use logstream_client_config::ClientConfig;
use logstream_client_shared::clock::MockClock;
use logstream_client_shared::LogGroupName;
use logstream_service_client::mock_service::InMemoryLogService;
use std::sync::Arc;

/// 2021-01-01T00:00:00Z, well inside the window the service accepts for a clock at the same time.
pub(crate) const START_MILLIS: i64 = 1_609_459_200_000;

/// helper function
pub(crate) fn create_factory_with_group(
    config: ClientConfig,
    service: InMemoryLogService,
    group: &str,
) -> (ClientFactory, Arc<InMemoryLogService>) {
    let service = Arc::new(service);
    let factory = ClientFactory::new(config, service.clone())
        .expect("create client factory")
        .with_clock(Arc::new(MockClock::with_millis(START_MILLIS)));
    factory
        .runtime()
        .block_on(service.create_log_group(&LogGroupName::from(group)))
        .expect("create log group");
    (factory, service)
}

pub(crate) fn service_clock() -> Arc<MockClock> {
    Arc::new(MockClock::with_millis(START_MILLIS))
}
