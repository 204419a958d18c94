//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//

use tracing::{dispatcher, Dispatch, Level};
use tracing_subscriber::FmtSubscriber;

/// Installs a global fmt subscriber at the default level.
///
/// Returns false if a global subscriber was already installed, which leaves that one in place.
pub fn init() -> bool {
    init_with_level(Level::INFO)
}

pub fn init_with_level(level: Level) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_ansi(true)
        .with_max_level(level)
        .finish();

    let my_dispatch = Dispatch::new(subscriber);
    // only the first call in a process succeeds
    dispatcher::set_global_default(my_dispatch).is_ok()
}
