//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

//! Factory to create the components of the log stream client.
//!
//! Applications should always use this ClientFactory to obtain a [`LogGroup`], and from it the
//! readers and writers of the group's streams.
//!
//! [`LogGroup`]: crate::group::LogGroup
//!
use crate::error::{GroupError, InvalidName};
use crate::group::LogGroup;

use logstream_client_config::ClientConfig;
use logstream_client_shared::clock::{Clock, SystemClock};
use logstream_client_shared::naming_utils::NameUtils;
use logstream_client_shared::LogGroupName;
use logstream_service_client::{LogServiceClient, TimeoutLogServiceClient};

use snafu::ResultExt;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::{Handle, Runtime};
use tracing::info;

/// Applications should use ClientFactory to create resources they need.
///
/// ClientFactory owns a Tokio runtime that drives the asynchronous service client underneath
/// the blocking [`Read`] and [`Write`] implementations of the readers and writers.
/// Applications that already run inside a Tokio runtime should use [`ClientFactoryAsync`]
/// and the `*_async` methods instead, since blocking calls panic inside an async context.
///
/// [`Read`]: std::io::Read
/// [`Write`]: std::io::Write
///
/// # Examples
/// ```no_run
/// use logstream_client::client_factory::ClientFactory;
/// use logstream_client_config::ClientConfigBuilder;
/// use logstream_client_shared::clock::SystemClock;
/// use logstream_service_client::mock_service::InMemoryLogService;
/// use std::sync::Arc;
///
/// fn main() {
///     let config = ClientConfigBuilder::default().build().expect("creating config");
///     let service = Arc::new(InMemoryLogService::new(Arc::new(SystemClock)));
///     let client_factory = ClientFactory::new(config, service).expect("create factory");
///     let group = client_factory.log_group("my-group").expect("valid group name");
/// }
/// ```
pub struct ClientFactory {
    runtime: Arc<Runtime>,
    factory: ClientFactoryAsync,
}

impl ClientFactory {
    pub fn new(config: ClientConfig, client: Arc<dyn LogServiceClient>) -> std::io::Result<ClientFactory> {
        let runtime = Arc::new(Runtime::new()?);
        let factory =
            ClientFactoryAsync::build(config, client, runtime.handle().clone(), Some(runtime.clone()));
        Ok(ClientFactory { runtime, factory })
    }

    /// Replaces the clock used to timestamp written events.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> ClientFactory {
        self.factory = self.factory.with_clock(clock);
        self
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    pub fn config(&self) -> &ClientConfig {
        self.factory.config()
    }

    pub fn service_client(&self) -> &dyn LogServiceClient {
        self.factory.service_client()
    }

    pub fn log_group(&self, group: &str) -> Result<LogGroup, GroupError> {
        self.factory.log_group(group)
    }

    pub fn to_async(&self) -> ClientFactoryAsync {
        self.factory.clone()
    }
}

/// The async flavor of [`ClientFactory`]. It does not own a runtime; it drives blocking calls
/// through the handle of the runtime it was created in.
#[derive(Clone)]
pub struct ClientFactoryAsync {
    config: Arc<ClientConfig>,
    client: Arc<dyn LogServiceClient>,
    clock: Arc<dyn Clock>,
    runtime_handle: Handle,
    // keeps the runtime of a blocking ClientFactory alive as long as a reader or writer needs it
    _runtime: Option<Arc<Runtime>>,
}

impl ClientFactoryAsync {
    /// Creates a factory bound to the given runtime handle, usually `Handle::current()`.
    ///
    /// Service calls are bounded by the configured `request_timeout`, which needs the runtime's
    /// time driver. On a runtime built without `enable_time`, set `request_timeout` to `None`.
    pub fn new(config: ClientConfig, client: Arc<dyn LogServiceClient>, handle: Handle) -> Self {
        ClientFactoryAsync::build(config, client, handle, None)
    }

    fn build(
        config: ClientConfig,
        client: Arc<dyn LogServiceClient>,
        runtime_handle: Handle,
        runtime: Option<Arc<Runtime>>,
    ) -> Self {
        info!(
            "creating client factory with request timeout {:?}",
            config.request_timeout()
        );
        let client: Arc<dyn LogServiceClient> = match config.request_timeout() {
            Some(limit) => Arc::new(TimeoutLogServiceClient::new(client, limit)),
            None => client,
        };
        ClientFactoryAsync {
            config: Arc::new(config),
            client,
            clock: Arc::new(SystemClock),
            runtime_handle,
            _runtime: runtime,
        }
    }

    /// Replaces the clock used to timestamp written events.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn log_group(&self, group: &str) -> Result<LogGroup, GroupError> {
        if self.config.validate_names() {
            NameUtils::validate_group_name(group).context(InvalidName {})?;
        }
        Ok(LogGroup::new(LogGroupName::from(group), self.clone()))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn service_client(&self) -> &dyn LogServiceClient {
        &*self.client
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    pub fn runtime_handle(&self) -> Handle {
        self.runtime_handle.clone()
    }
}

impl fmt::Debug for ClientFactoryAsync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFactoryAsync")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::ScriptedLogService;
    use logstream_client_config::ClientConfigBuilder;
    use logstream_client_shared::{PutLogEventsOutput, SequenceToken};
    use std::time::Duration;

    #[test]
    fn test_runtime_without_time_driver() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime");
        let config = ClientConfigBuilder::default()
            .request_timeout(None::<Duration>)
            .build()
            .unwrap();
        let service = Arc::new(ScriptedLogService::default());
        service.push_put(Ok(PutLogEventsOutput {
            next_sequence_token: Some(SequenceToken::from("token-1")),
            rejected_log_events_info: None,
        }));
        let factory = ClientFactoryAsync::new(config, service.clone(), runtime.handle().clone());

        runtime.block_on(async {
            let group = factory.log_group("group").unwrap();
            let mut writer = group.create_writer_async("1234").await.expect("create writer");
            assert_eq!(writer.write_async(b"Hello\nWorld").await.unwrap(), 11);
        });
        assert_eq!(service.puts().len(), 1);
    }

    #[test]
    fn test_request_timeout_bounds_calls() {
        let config = ClientConfigBuilder::default()
            .request_timeout(Duration::from_millis(10))
            .build()
            .unwrap();
        let factory = ClientFactory::new(config, Arc::new(ScriptedLogService::default())).unwrap();
        assert_eq!(factory.config().request_timeout(), Some(Duration::from_millis(10)));
        let group = factory.log_group("group").unwrap();
        assert!(group.create_writer("1234").is_ok());
    }
}
