//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
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
#![allow(clippy::multiple_crate_versions, clippy::needless_doctest_main)]

//! A byte stream client for remote log services.
//!
//! A remote log service stores named streams of timestamped text events inside log groups.
//! This crate exposes such a stream as a plain byte stream:
//! * [LogGroup] creates writers, creating the stream on the way, and opens readers.
//! * [Byte] provides the readers and writers, implementing [`Read`] and [`Write`].
//!
//! The service itself is reached through the [`LogServiceClient`] trait, so any transport
//! can be plugged in.
//!
//! [LogGroup]: crate::group::LogGroup
//! [Byte]: crate::byte
//! [`Read`]: std::io::Read
//! [`Write`]: std::io::Write
//! [`LogServiceClient`]: logstream_service_client::LogServiceClient
//!
pub mod byte;
pub mod client_factory;
pub mod error;
pub mod group;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_utils;
