//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

use std::fmt;

/// What a writer does with the next sequence token when the service accepted a batch but
/// reported some of its events as rejected.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RejectionTokenPolicy {
    /// Store the token returned with the partially accepted batch.
    Adopt,
    /// Keep the token the writer held before the append.
    Withhold,
}

impl fmt::Display for RejectionTokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
