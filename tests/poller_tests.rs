use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tripcraft_rs::{
    GenerationPoller, PlanClient, PlanStatus, PollOutcome, PollUpdate, Session,
    DEFAULT_MAX_ATTEMPTS,
};

fn client_for(server: &mockito::ServerGuard) -> PlanClient {
    PlanClient::new(Session::new(server.url())).unwrap()
}

fn fast_poller(client: PlanClient) -> GenerationPoller {
    GenerationPoller::new(client).with_interval(Duration::from_millis(1))
}

#[tokio::test]
async fn test_watch_stops_on_completed_with_full_progress() {
    let mut server = mockito::Server::new_async().await;
    let hits = AtomicUsize::new(0);
    let mock = server
        .mock("GET", "/travel-plans/1/status")
        .with_status(200)
        .with_body_from_request(move |_| {
            let n = hits.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                br#"{"status":"generating"}"#.to_vec()
            } else {
                br#"{"status":"completed"}"#.to_vec()
            }
        })
        .expect(3)
        .create_async()
        .await;

    let updates: Arc<Mutex<Vec<PollUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    let outcome = fast_poller(client_for(&server))
        .watch(1, move |update| sink.lock().unwrap().push(update))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Completed);
    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[2].progress, 100.0);
    assert_eq!(updates[2].status, Some(PlanStatus::Completed));
    assert!(updates[2].preview.is_none());
    assert!(updates[0].progress < updates[1].progress);
    // Exactly 3 status checks, no 4th tick.
    mock.assert_async().await;
}

#[tokio::test]
async fn test_watch_reports_failed_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/travel-plans/2/status")
        .with_status(200)
        .with_body(r#"{"status":"failed"}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome = fast_poller(client_for(&server))
        .watch(2, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Failed);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_watch_times_out_at_attempt_ceiling() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/travel-plans/3/status")
        .with_status(200)
        .with_body(r#"{"status":"generating"}"#)
        .expect(DEFAULT_MAX_ATTEMPTS as usize)
        .create_async()
        .await;

    let ticks = AtomicUsize::new(0);
    let outcome = fast_poller(client_for(&server))
        .watch(3, |_| {
            ticks.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::TimedOut);
    assert_eq!(ticks.load(Ordering::SeqCst), DEFAULT_MAX_ATTEMPTS as usize);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_transient_poll_error_is_swallowed() {
    let mut server = mockito::Server::new_async().await;
    let hits = AtomicUsize::new(0);
    let mock = server
        .mock("GET", "/travel-plans/4/status")
        .with_status(200)
        .with_body_from_request(move |_| {
            if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                // Unparseable body: this tick errors client-side.
                b"not json".to_vec()
            } else {
                br#"{"status":"completed"}"#.to_vec()
            }
        })
        .expect(2)
        .create_async()
        .await;

    let outcome = fast_poller(client_for(&server))
        .watch(4, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Completed);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_preview_surfaced_then_cleared_on_completion() {
    let mut server = mockito::Server::new_async().await;
    let hits = AtomicUsize::new(0);
    server
        .mock("GET", "/travel-plans/5/status")
        .with_status(200)
        .with_body_from_request(move |_| {
            if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                r#"{
                    "status": "generating",
                    "generated_plans": [{
                        "is_preview": true,
                        "preview_type": "raw_data_preview",
                        "hotels": [{"name": "如家"}],
                        "restaurants": [{"name": "食堂"}, {"name": "面馆"}]
                    }]
                }"#
                .as_bytes()
                .to_vec()
            } else {
                br#"{"status":"completed"}"#.to_vec()
            }
        })
        .expect(2)
        .create_async()
        .await;

    let updates: Arc<Mutex<Vec<PollUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = updates.clone();
    fast_poller(client_for(&server))
        .watch(5, move |update| sink.lock().unwrap().push(update))
        .await
        .unwrap();

    let updates = updates.lock().unwrap();
    let preview = updates[0].preview.as_ref().expect("preview on first tick");
    assert_eq!(preview.hotels.len(), 1);
    assert_eq!(preview.restaurants.len(), 2);
    assert!(updates[1].preview.is_none());
}

#[tokio::test]
async fn test_unknown_status_keeps_polling() {
    let mut server = mockito::Server::new_async().await;
    let hits = AtomicUsize::new(0);
    let mock = server
        .mock("GET", "/travel-plans/6/status")
        .with_status(200)
        .with_body_from_request(move |_| {
            if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                br#"{"status":"queued"}"#.to_vec()
            } else {
                br#"{"status":"completed"}"#.to_vec()
            }
        })
        .expect(2)
        .create_async()
        .await;

    let outcome = fast_poller(client_for(&server))
        .watch(6, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Completed);
    mock.assert_async().await;
}
