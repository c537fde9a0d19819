use courier::{
    EventArgs, EventDelegate, ListenerError, ListenerRef, TimeoutError,
    listeners::{LoggingListener, TimeoutListener},
    testing::{FailingListener, OrderLog, PanickingListener, RecordingListener},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

mod common;
use common::{Gateway, emoji, message, user};

#[tokio::test]
async fn listeners_run_in_registration_order() {
    common::init_tracing();
    let delegate = EventDelegate::<Gateway>::new();
    let order = OrderLog::default();
    for tag in 1..=3 {
        let listener = RecordingListener::<Gateway>::with_order(tag, order.clone());
        delegate.register("message", ListenerRef::new(listener)).unwrap();
    }

    let report = delegate.dispatch("message", [message("alice", "hi")]).await;

    assert!(report.is_ok());
    assert_eq!(report.len(), 3);
    assert_eq!(order.snapshot(), vec![1, 2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_order_holds_on_a_multi_thread_runtime() {
    let delegate = EventDelegate::<Gateway>::new();
    let order = OrderLog::default();
    for tag in 1..=3 {
        let listener = RecordingListener::<Gateway>::with_order(tag, order.clone());
        delegate.register("message", ListenerRef::new(listener)).unwrap();
    }

    for _ in 0..20 {
        let remote = delegate.clone();
        let report = tokio::spawn(async move {
            remote.dispatch("message", [message("alice", "hi")]).await
        })
        .await
        .unwrap();
        assert!(report.is_ok());
    }

    let snapshot = order.snapshot();
    assert_eq!(snapshot.len(), 60);
    for dispatch in snapshot.chunks(3) {
        assert_eq!(dispatch, [1, 2, 3]);
    }
}

#[tokio::test]
async fn listeners_receive_the_positional_arguments() {
    common::init_tracing();
    let delegate = EventDelegate::<Gateway>::new();
    let recorder = RecordingListener::<Gateway>::new();
    delegate.listen("reaction_add", LoggingListener::new("reaction_add")).unwrap();
    delegate.register("reaction_add", ListenerRef::new(recorder.clone())).unwrap();

    delegate.dispatch("reaction_add", [user("bob"), emoji("+1")]).await;
    delegate.dispatch("reaction_add", EventArgs::empty()).await;

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].as_slice(), &[user("bob"), emoji("+1")]);
    assert!(calls[1].is_empty());
}

#[tokio::test]
async fn registering_twice_runs_twice_and_unregister_removes_one() {
    let delegate = EventDelegate::<Gateway>::new();
    let recorder = RecordingListener::<Gateway>::new();
    let listener = ListenerRef::new(recorder.clone());
    delegate.register("typing", listener.clone()).unwrap();
    delegate.register("typing", listener.clone()).unwrap();

    delegate.dispatch("typing", [user("bob")]).await;
    assert_eq!(recorder.count(), 2);

    assert!(delegate.unregister("typing", &listener));
    delegate.dispatch("typing", [user("bob")]).await;
    assert_eq!(recorder.count(), 3);

    assert!(delegate.unregister("typing", &listener));
    assert!(!delegate.unregister("typing", &listener));
    assert!(!delegate.has_listeners("typing"));
}

#[tokio::test]
async fn unregister_only_touches_the_named_event() {
    let delegate = EventDelegate::<Gateway>::new();
    let recorder = RecordingListener::<Gateway>::new();
    let listener = ListenerRef::new(recorder.clone());
    delegate.register("message", listener.clone()).unwrap();
    delegate.register("message_edit", listener.clone()).unwrap();

    assert!(delegate.unregister("message", &listener));
    delegate.dispatch("message", [message("alice", "gone")]).await;
    delegate.dispatch("message_edit", [message("alice", "kept")]).await;

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].first(), Some(&message("alice", "kept")));
    assert_eq!(delegate.event_names(), vec!["message_edit".to_string()]);
}

#[tokio::test]
async fn failures_are_isolated_per_listener() {
    common::init_tracing();
    let delegate = EventDelegate::<Gateway>::new();
    let recorder = RecordingListener::<Gateway>::new();
    delegate.listen("message", FailingListener::new("bad listener")).unwrap();
    delegate.register("message", ListenerRef::new(recorder.clone())).unwrap();
    delegate.listen("message", PanickingListener::new("worse listener")).unwrap();

    let dispatched = delegate.dispatch("message", [message("alice", "hi")]);
    assert_eq!(dispatched.listener_count(), 3);
    let report = dispatched.await;

    assert_eq!(recorder.count(), 1);
    assert!(!report.is_ok());
    let outcomes = report.outcomes();
    assert!(matches!(&outcomes[0], Err(ListenerError::Failed(err)) if err.to_string() == "bad listener"));
    assert!(outcomes[1].is_ok());
    assert!(matches!(&outcomes[2], Err(ListenerError::Panicked(msg)) if msg == "worse listener"));
    assert_eq!(report.failures().count(), 2);
}

#[tokio::test]
async fn dispatch_with_no_listeners_completes_immediately() {
    let delegate = EventDelegate::<Gateway>::new();
    let dispatched = delegate.dispatch("unheard", [user("nobody")]);
    assert_eq!(dispatched.listener_count(), 0);
    assert!(dispatched.await.is_empty());
}

#[tokio::test]
async fn listeners_run_without_the_dispatch_being_awaited() {
    let delegate = EventDelegate::<Gateway>::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    delegate
        .listen("ready", move |args: EventArgs<Gateway>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(args.len());
            }
        })
        .unwrap();

    let _ = delegate.dispatch("ready", [user("bot")]);

    assert_eq!(rx.recv().await, Some(1));
}

#[tokio::test]
async fn listeners_can_call_back_into_the_delegate() {
    let delegate = EventDelegate::<Gateway>::new();
    let follow_up = RecordingListener::<Gateway>::new();

    let inner = delegate.clone();
    let registered = follow_up.clone();
    delegate
        .listen("ready", move |_args: EventArgs<Gateway>| {
            let inner = inner.clone();
            let registered = registered.clone();
            async move {
                inner
                    .register("resumed", ListenerRef::new(registered))
                    .unwrap();
                let report = inner.dispatch("resumed", [user("bot")]).await;
                assert_eq!(report.len(), 1);
            }
        })
        .unwrap();

    let report = delegate.dispatch("ready", EventArgs::empty()).await;

    assert!(report.is_ok());
    assert_eq!(follow_up.count(), 1);
    assert_eq!(delegate.listener_count("resumed"), 1);
}

#[tokio::test(start_paused = true)]
async fn configured_listener_timeout_fails_slow_listeners() {
    let delegate = EventDelegate::<Gateway>::builder()
        .label("gateway")
        .listener_timeout(Some(Duration::from_secs(1)))
        .build();
    let recorder = RecordingListener::<Gateway>::new();
    delegate
        .listen("guild_create", |_args: EventArgs<Gateway>| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
        })
        .unwrap();
    delegate.register("guild_create", ListenerRef::new(recorder.clone())).unwrap();

    let report = delegate.dispatch("guild_create", EventArgs::empty()).await;

    assert!(matches!(
        report.outcomes()[0],
        Err(ListenerError::TimedOut(d)) if d == Duration::from_secs(1)
    ));
    assert!(report.outcomes()[1].is_ok());
    assert_eq!(recorder.count(), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_listener_bounds_a_single_listener() {
    let delegate = EventDelegate::<Gateway>::new();
    let slow = |_args: EventArgs<Gateway>| async {
        tokio::time::sleep(Duration::from_secs(30)).await;
    };
    delegate
        .listen("voice_state", TimeoutListener::new(slow, Duration::from_secs(2)))
        .unwrap();

    let report = delegate.dispatch("voice_state", EventArgs::empty()).await;

    let Err(ListenerError::Failed(err)) = &report.outcomes()[0] else {
        panic!("expected a failed listener, got {:?}", report.outcomes());
    };
    let elapsed = err.downcast_ref::<TimeoutError>().expect("timeout error");
    assert_eq!(elapsed.duration(), Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn dropping_an_awaited_dispatch_cancels_its_listeners() {
    let delegate = EventDelegate::<Gateway>::new();
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    delegate
        .listen("slow", move |_args: EventArgs<Gateway>| {
            let flag = flag.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                flag.store(true, Ordering::SeqCst);
            }
        })
        .unwrap();

    let mut dispatched = delegate.dispatch("slow", EventArgs::empty());
    let gave_up = tokio::time::timeout(Duration::from_secs(1), &mut dispatched).await;
    assert!(gave_up.is_err());
    drop(dispatched);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!finished.load(Ordering::SeqCst));
}
