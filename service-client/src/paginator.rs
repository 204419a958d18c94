/*
 * Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 */

use crate::{LogServiceClient, LogServiceError};
use futures::prelude::*;
use futures::stream::{self};
use logstream_client_shared::{ContinuationToken, OutputLogEvent, ScopedLogStream};
use std::vec::IntoIter;
use tracing::debug;

///
///Helper method to iterate over all the events of a log stream, from the head of the stream.
///This method returns a stream of values, log events, produced asynchronously.
///
/// Pages are fetched lazily. The stream ends once the service returns no forward token, or
/// hands back the token it was called with. A failed page is yielded as an error and ends the
/// stream.
///
/// ```ignore
/// use logstream_client_shared::ScopedLogStream;
/// use logstream_service_client::paginator::list_log_events;
///     let events = list_log_events(ScopedLogStream::from("group:stream"), client);
///     // collect all the messages in a single vector
///     let messages: Vec<String> = events.map(|e| e.unwrap().message).collect::<Vec<String>>().await;
/// ```
///
pub fn list_log_events(
    stream: ScopedLogStream,
    client: &dyn LogServiceClient,
) -> impl Stream<Item = Result<OutputLogEvent, LogServiceError>> + '_ {
    struct State {
        events: IntoIter<OutputLogEvent>,
        stream: ScopedLogStream,
        token: Option<ContinuationToken>,
        done: bool,
    }

    // Initial state without a continuation token.
    stream::unfold(
        State {
            events: Vec::new().into_iter(),
            stream,
            token: None,
            done: false,
        },
        move |mut state| async move {
            loop {
                if let Some(event) = state.events.next() {
                    return Some((Ok(event), state));
                }
                if state.done {
                    return None;
                }
                debug!("fetch the next page of events of {}", state.stream);
                match client.get_log_events(&state.stream, state.token.as_ref()).await {
                    Ok(page) => {
                        let repeated =
                            page.next_forward_token.is_some() && page.next_forward_token == state.token;
                        state.done = page.next_forward_token.is_none() || repeated;
                        state.token = page.next_forward_token;
                        state.events = page.events.into_iter();
                    }
                    Err(e) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                }
            }
        },
    )
}
