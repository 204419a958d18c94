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
pub mod policy;

use crate::policy::RejectionTokenPolicy;
use derive_builder::*;
use getset::CopyGetters;
use std::env;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT_ENV: &str = "logstream_client_request_timeout_ms";

#[derive(Builder, Debug, CopyGetters, Clone)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ClientConfig {
    /// Upper bound of every call to the log service. `None` leaves calls unbounded, which is
    /// required when the client runs on a Tokio runtime without the time driver.
    #[get_copy = "pub"]
    #[builder(default = "self.extract_request_timeout()")]
    pub request_timeout: Option<Duration>,

    #[get_copy = "pub"]
    #[builder(default = "RejectionTokenPolicy::Adopt")]
    pub rejection_token_policy: RejectionTokenPolicy,

    /// Treat a forward token equal to the one sent as the end of the stream. Some services hand
    /// back the same token forever once a reader has caught up with the tail.
    #[get_copy = "pub"]
    #[builder(default = "false")]
    pub end_on_repeated_token: bool,

    #[get_copy = "pub"]
    #[builder(default = "64 * 1024")]
    pub reader_buffer_capacity: usize,

    #[get_copy = "pub"]
    #[builder(default = "true")]
    pub validate_names: bool,
}

impl ClientConfigBuilder {
    // 0 in the environment disables the timeout
    fn extract_request_timeout(&self) -> Option<Duration> {
        match env::var(REQUEST_TIMEOUT_ENV).ok().and_then(|v| v.parse::<u64>().ok()) {
            Some(0) => {
                debug!("request timeout disabled by {}", REQUEST_TIMEOUT_ENV);
                None
            }
            Some(millis) => {
                debug!("using request timeout {}ms from {}", millis, REQUEST_TIMEOUT_ENV);
                Some(Duration::from_millis(millis))
            }
            None => Some(self.default_timeout()),
        }
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(30)
    }

    /// validate the builder before returning it
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(timeout)) = self.request_timeout {
            if timeout == Duration::from_millis(0) {
                return Err("request_timeout must be greater than zero".to_owned());
            }
        }
        if let Some(capacity) = self.reader_buffer_capacity {
            if capacity == 0 {
                return Err("reader_buffer_capacity must be greater than zero".to_owned());
            }
        }
        Ok(())
    }
}
