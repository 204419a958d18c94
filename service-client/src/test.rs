use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use logstream_client_shared::clock::MockClock;

use super::mock_service::{EndOfPages, InMemoryLogService};
use super::paginator::list_log_events;
use super::*;

const NOW: i64 = 1_600_000_000_000;

async fn service_with_stream(
    page_size: usize,
    end_of_pages: EndOfPages,
) -> (InMemoryLogService, ScopedLogStream) {
    let service = InMemoryLogService::new(Arc::new(MockClock::with_millis(NOW)))
        .with_page_size(page_size)
        .with_end_of_pages(end_of_pages);
    let stream = ScopedLogStream::from("group:1234");
    service.create_log_group(&stream.group).await.unwrap();
    service.create_log_stream(&stream).await.unwrap();
    (service, stream)
}

fn event(message: &str, timestamp: i64) -> InputLogEvent {
    InputLogEvent {
        message: message.to_string(),
        timestamp: Timestamp(timestamp),
    }
}

#[tokio::test]
async fn test_create_stream_twice() {
    let (service, stream) = service_with_stream(10, EndOfPages::AbsentToken).await;
    let result = service.create_log_stream(&stream).await;
    assert!(matches!(result, Err(LogServiceError::ResourceAlreadyExists { .. })));
}

#[tokio::test]
async fn test_create_stream_in_missing_group() {
    let service = InMemoryLogService::new(Arc::new(MockClock::with_millis(NOW)));
    let result = service
        .create_log_stream(&ScopedLogStream::from("missing:1234"))
        .await;
    assert!(matches!(result, Err(LogServiceError::ResourceNotFound { .. })));
}

#[tokio::test]
async fn test_put_enforces_sequence_token() {
    let (service, stream) = service_with_stream(10, EndOfPages::AbsentToken).await;

    let first = service
        .put_log_events(&stream, vec![event("a\n", NOW)], None)
        .await
        .unwrap();
    let token = first.next_sequence_token.expect("token after first put");
    assert!(first.rejected_log_events_info.is_none());

    // a missing token is stale once the stream has data
    let result = service.put_log_events(&stream, vec![event("b\n", NOW)], None).await;
    match result {
        Err(LogServiceError::InvalidSequenceToken { expected, .. }) => {
            assert_eq!(expected, Some(token.0.clone()))
        }
        other => panic!("expected InvalidSequenceToken, got {:?}", other),
    }

    let second = service
        .put_log_events(&stream, vec![event("b\n", NOW)], Some(&token))
        .await
        .unwrap();
    assert_ne!(second.next_sequence_token, Some(token.clone()));

    // reusing an old token fails as well
    let result = service.put_log_events(&stream, vec![event("c\n", NOW)], Some(&token)).await;
    assert!(matches!(result, Err(LogServiceError::InvalidSequenceToken { .. })));
}

#[tokio::test]
async fn test_put_rejects_events_outside_window() {
    let (service, stream) = service_with_stream(10, EndOfPages::AbsentToken).await;
    let too_old = NOW - 15 * 24 * 60 * 60 * 1000;
    let too_new = NOW + 3 * 60 * 60 * 1000;
    let output = service
        .put_log_events(
            &stream,
            vec![
                event("old\n", too_old),
                event("kept\n", NOW),
                event("new\n", too_new),
            ],
            None,
        )
        .await
        .unwrap();
    let info = output.rejected_log_events_info.expect("rejected info");
    assert_eq!(info.too_old_log_event_end_index, Some(1));
    assert_eq!(info.too_new_log_event_start_index, Some(2));
    assert_eq!(info.expired_log_event_end_index, None);
    assert!(output.next_sequence_token.is_some());

    let page = service.get_log_events(&stream, None).await.unwrap();
    assert_eq!(page.events.len(), 1);
    assert_eq!(page.events[0].message, "kept\n");
    assert_eq!(page.events[0].ingestion_time, Timestamp(NOW));
}

#[tokio::test]
async fn test_put_rejects_empty_and_unordered_batches() {
    let (service, stream) = service_with_stream(10, EndOfPages::AbsentToken).await;
    let result = service.put_log_events(&stream, vec![], None).await;
    assert!(matches!(result, Err(LogServiceError::InvalidParameter { .. })));

    let result = service
        .put_log_events(&stream, vec![event("b", NOW), event("a", NOW - 1)], None)
        .await;
    assert!(matches!(result, Err(LogServiceError::InvalidParameter { .. })));
}

#[tokio::test]
async fn test_describe_by_prefix() {
    let (service, stream) = service_with_stream(10, EndOfPages::AbsentToken).await;
    service
        .create_log_stream(&ScopedLogStream::from("group:12345"))
        .await
        .unwrap();
    service
        .create_log_stream(&ScopedLogStream::from("group:other"))
        .await
        .unwrap();
    let output = service
        .put_log_events(&stream, vec![event("hello", NOW)], None)
        .await
        .unwrap();

    let streams = service.describe_log_streams(&stream.group, "1234").await.unwrap();
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].log_stream_name.name, "1234");
    assert_eq!(streams[0].upload_sequence_token, output.next_sequence_token);
    assert_eq!(streams[0].stored_bytes, 5);
    assert_eq!(streams[0].first_event_timestamp, Some(Timestamp(NOW)));
    assert_eq!(streams[1].log_stream_name.name, "12345");
    assert_eq!(streams[1].upload_sequence_token, None);

    let streams = service.describe_log_streams(&stream.group, "other").await.unwrap();
    assert_eq!(streams.len(), 1);
}

#[tokio::test]
async fn test_get_pages() {
    let (service, stream) = service_with_stream(2, EndOfPages::AbsentToken).await;
    service
        .put_log_events(
            &stream,
            vec![event("a", NOW), event("b", NOW), event("c", NOW)],
            None,
        )
        .await
        .unwrap();

    let first = service.get_log_events(&stream, None).await.unwrap();
    assert_eq!(first.events.len(), 2);
    let token = first.next_forward_token.expect("more pages");

    let second = service.get_log_events(&stream, Some(&token)).await.unwrap();
    assert_eq!(second.events.len(), 1);
    assert_eq!(second.events[0].message, "c");
    assert!(second.next_forward_token.is_none());

    let result = service
        .get_log_events(&stream, Some(&ContinuationToken::from("garbage")))
        .await;
    assert!(matches!(result, Err(LogServiceError::InvalidParameter { .. })));
}

#[tokio::test]
async fn test_get_repeats_token_at_tail() {
    let (service, stream) = service_with_stream(10, EndOfPages::RepeatToken).await;
    let first = service.get_log_events(&stream, None).await.unwrap();
    assert!(first.events.is_empty());
    let token = first.next_forward_token.expect("tail token");

    let again = service.get_log_events(&stream, Some(&token)).await.unwrap();
    assert_eq!(again.next_forward_token, Some(token.clone()));

    service
        .put_log_events(&stream, vec![event("late", NOW)], None)
        .await
        .unwrap();
    let tail = service.get_log_events(&stream, Some(&token)).await.unwrap();
    assert_eq!(tail.events.len(), 1);
    assert_ne!(tail.next_forward_token, Some(token));
}

#[tokio::test]
async fn test_get_missing_stream() {
    let (service, _stream) = service_with_stream(10, EndOfPages::AbsentToken).await;
    let result = service
        .get_log_events(&ScopedLogStream::from("group:missing"), None)
        .await;
    assert!(matches!(result, Err(LogServiceError::ResourceNotFound { .. })));
}

#[tokio::test]
async fn test_list_log_events() {
    for end_of_pages in [EndOfPages::AbsentToken, EndOfPages::RepeatToken].iter() {
        let (service, stream) = service_with_stream(2, *end_of_pages).await;
        let events = (0..5).map(|i| event(&format!("line {}\n", i), NOW)).collect();
        service.put_log_events(&stream, events, None).await.unwrap();

        let messages = list_log_events(stream.clone(), &service)
            .map(|e| e.unwrap().message)
            .collect::<Vec<String>>()
            .await;
        assert_eq!(
            messages,
            vec!["line 0\n", "line 1\n", "line 2\n", "line 3\n", "line 4\n"]
        );
    }
}

#[tokio::test]
async fn test_list_log_events_error() {
    let service = InMemoryLogService::new(Arc::new(MockClock::with_millis(NOW)));
    let mut events = Box::pin(list_log_events(ScopedLogStream::from("group:missing"), &service));
    assert!(matches!(
        events.next().await,
        Some(Err(LogServiceError::ResourceNotFound { .. }))
    ));
    assert!(events.next().await.is_none());
}

struct StalledClient;

#[async_trait]
impl LogServiceClient for StalledClient {
    async fn put_log_events(
        &self,
        _stream: &ScopedLogStream,
        _events: Vec<InputLogEvent>,
        _sequence_token: Option<&SequenceToken>,
    ) -> Result<PutLogEventsOutput> {
        futures::future::pending().await
    }

    async fn create_log_stream(&self, _stream: &ScopedLogStream) -> Result<()> {
        futures::future::pending().await
    }

    async fn describe_log_streams(
        &self,
        _group: &LogGroupName,
        _stream_name_prefix: &str,
    ) -> Result<Vec<LogStreamDescription>> {
        Ok(vec![])
    }

    async fn get_log_events(
        &self,
        _stream: &ScopedLogStream,
        _next_token: Option<&ContinuationToken>,
    ) -> Result<GetLogEventsOutput> {
        futures::future::pending().await
    }
}

#[tokio::test]
async fn test_timeout_client() {
    let client = TimeoutLogServiceClient::new(Arc::new(StalledClient), Duration::from_millis(20));
    let stream = ScopedLogStream::from("group:1234");

    let result = client.get_log_events(&stream, None).await;
    match result {
        Err(LogServiceError::RequestTimeout { operation, limit, .. }) => {
            assert_eq!(operation, "GetLogEvents");
            assert_eq!(limit, Duration::from_millis(20));
        }
        other => panic!("expected RequestTimeout, got {:?}", other),
    }
    assert!(matches!(
        client.create_log_stream(&stream).await,
        Err(LogServiceError::RequestTimeout { .. })
    ));
    // calls that finish in time pass through
    assert!(client
        .describe_log_streams(&stream.group, "")
        .await
        .unwrap()
        .is_empty());
}
