//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
use snafu::Snafu;

const MAX_NAME_LENGTH: usize = 512;
const GROUP_NAME_EXTRA_CHARS: &[char] = &['_', '-', '/', '.', '#'];
const STREAM_NAME_FORBIDDEN_CHARS: &[char] = &[':', '*'];

#[derive(Debug, Snafu, PartialEq)]
pub enum NameError {
    #[snafu(display("Invalid log group name {:?}: {}", name, reason))]
    InvalidGroupName { name: String, reason: String },

    #[snafu(display("Invalid log stream name {:?}: {}", name, reason))]
    InvalidStreamName { name: String, reason: String },
}

pub struct NameUtils {}

impl NameUtils {
    /// Group names are 1 to 512 characters of `a-z A-Z 0-9 _ - / . #`.
    pub fn validate_group_name(name: &str) -> Result<(), NameError> {
        if let Some(reason) = NameUtils::check_length(name) {
            return InvalidGroupName { name, reason }.fail();
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || GROUP_NAME_EXTRA_CHARS.contains(c)))
        {
            return InvalidGroupName {
                name,
                reason: format!("character {:?} is not allowed", c),
            }
            .fail();
        }
        Ok(())
    }

    /// Stream names are 1 to 512 characters and may not contain `:` or `*`.
    pub fn validate_stream_name(name: &str) -> Result<(), NameError> {
        if let Some(reason) = NameUtils::check_length(name) {
            return InvalidStreamName { name, reason }.fail();
        }
        if let Some(c) = name.chars().find(|c| STREAM_NAME_FORBIDDEN_CHARS.contains(c)) {
            return InvalidStreamName {
                name,
                reason: format!("character {:?} is not allowed", c),
            }
            .fail();
        }
        Ok(())
    }

    fn check_length(name: &str) -> Option<String> {
        let len = name.chars().count();
        if len == 0 {
            Some("name is empty".to_owned())
        } else if len > MAX_NAME_LENGTH {
            Some(format!("name has {} characters, at most {} allowed", len, MAX_NAME_LENGTH))
        } else {
            None
        }
    }
}
