use courier::{
    EventDelegate, Payload, TaskError, TimeoutError, completed, maybe_timeout, schedule,
    schedule_shielded, timeout_from_secs,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::time::{Instant, sleep};

mod common;
use common::{Gateway, message};

#[tokio::test(start_paused = true)]
async fn a_finished_operation_disarms_its_deadline() {
    let start = Instant::now();
    let value = maybe_timeout(Some(Duration::from_secs(10)), async {
        sleep(Duration::from_secs(1)).await;
        7
    })
    .await;
    assert_eq!(value, Ok(7));
    assert_eq!(start.elapsed(), Duration::from_secs(1));

    // Nothing fires later on behalf of the finished scope.
    sleep(Duration::from_secs(30)).await;
}

#[tokio::test(start_paused = true)]
async fn nested_scopes_fail_at_the_tighter_deadline() {
    let outer = maybe_timeout(Some(Duration::from_secs(10)), async {
        maybe_timeout(Some(Duration::from_secs(2)), sleep(Duration::from_secs(5))).await
    })
    .await;
    assert_eq!(outer, Ok(Err(TimeoutError::new(Duration::from_secs(2)))));
}

#[tokio::test(start_paused = true)]
async fn seconds_convert_into_scoped_deadlines() {
    assert_eq!(timeout_from_secs(0.0), None);
    assert_eq!(timeout_from_secs(-1.0), None);

    let deadline = timeout_from_secs(1.5);
    assert_eq!(deadline, Some(Duration::from_millis(1500)));
    let err = maybe_timeout(deadline, sleep(Duration::from_secs(2)))
        .await
        .unwrap_err();
    assert_eq!(err.duration(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn a_scoped_wait_for_composes_with_maybe_timeout() {
    let delegate = EventDelegate::<Gateway>::new();

    let remote = delegate.clone();
    let sender = schedule(Some("sender"), async move {
        sleep(Duration::from_secs(3)).await;
        remote.dispatch("message", [message("alice", "late")]).await;
    });

    let outcome = maybe_timeout(
        Some(Duration::from_secs(1)),
        delegate.wait_for_next("message", None),
    )
    .await;
    assert!(outcome.is_err());
    assert!(!delegate.has_waiters("message"));

    sender.await.unwrap();
    let retry = maybe_timeout(
        Some(Duration::from_secs(1)),
        delegate.wait_for_next("message", None),
    );
    let _ = delegate.dispatch("message", [message("alice", "again")]);
    assert_eq!(
        retry.await.unwrap().unwrap(),
        Payload::Single(message("alice", "again"))
    );
}

#[tokio::test(start_paused = true)]
async fn shielded_work_outlives_an_impatient_caller() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let mut handle = schedule_shielded(Some("persist"), async move {
        sleep(Duration::from_secs(5)).await;
        flag.store(true, Ordering::SeqCst);
    });

    assert!(maybe_timeout(Some(Duration::from_secs(1)), &mut handle).await.is_err());
    drop(handle);

    sleep(Duration::from_secs(10)).await;
    assert!(finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn unshielded_work_is_cancelled_with_its_caller() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let mut handle = schedule(Some("persist"), async move {
        sleep(Duration::from_secs(5)).await;
        flag.store(true, Ordering::SeqCst);
    });

    assert!(maybe_timeout(Some(Duration::from_secs(1)), &mut handle).await.is_err());
    drop(handle);

    sleep(Duration::from_secs(10)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

async fn explode() {
    panic!("listener exploded")
}

#[tokio::test]
async fn scheduled_panics_surface_as_task_errors() {
    let err = schedule(None, explode()).await.unwrap_err();
    assert_eq!(err, TaskError::Panicked("listener exploded".to_string()));
}

#[tokio::test]
async fn completed_futures_resolve_immediately() {
    assert_eq!(completed(Payload::<Gateway>::Unit).await, Payload::Unit);
}
