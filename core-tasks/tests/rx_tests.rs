use core_async::executor::serial;
use core_tasks::{cause, SimpleTaskSource, Task, TaskCompletionSource, TaskError, TaskFailure};
use futures::StreamExt;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

#[test]
fn test_subscribe_delivers_value_then_disposes() {
    let task = SimpleTaskSource::new(Duration::from_millis(10)).create("reactive");
    let (tx, rx) = mpsc::channel();

    let disposable = task.to_single().subscribe(move |value| {
        let _ = tx.send(value);
    });

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "reactive");
    assert!(disposable.is_disposed());
}

#[test]
fn test_pending_subscription_is_live_until_delivery() {
    let source = TaskCompletionSource::new();
    let (main, mut looper) = serial("main");

    let disposable = source
        .task()
        .to_single()
        .observe_on(Arc::new(main))
        .subscribe_with(|_: u32| {}, |_| {});
    assert!(!disposable.is_disposed());

    source.set_exception(cause(TaskFailure("boom".into()))).unwrap();
    // Completed but not yet delivered on the looper.
    assert!(!disposable.is_disposed());

    assert_eq!(looper.run_pending(), 1);
    assert!(disposable.is_disposed());
}

#[test]
fn test_disposed_subscription_never_delivers() {
    let source = TaskCompletionSource::new();
    let delivered = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&delivered);
    let disposable = source.task().to_single().subscribe(move |value: String| {
        sink.lock().unwrap().push(value);
    });
    disposable.dispose();

    source.set_result("ignored".to_string()).unwrap();

    assert!(disposable.is_disposed());
    assert!(delivered.lock().unwrap().is_empty());
}

#[test]
fn test_dispose_between_completion_and_delivery() {
    let source = TaskCompletionSource::new();
    let (main, mut looper) = serial("main");
    let delivered = Arc::new(Mutex::new(None));

    let sink = Arc::clone(&delivered);
    let disposable = source
        .task()
        .to_single()
        .observe_on(Arc::new(main))
        .subscribe(move |value: u32| {
            *sink.lock().unwrap() = Some(value);
        });

    source.set_result(3).unwrap();
    disposable.dispose();

    assert_eq!(looper.run_pending(), 1);
    assert!(delivered.lock().unwrap().is_none());
}

#[test]
fn test_observe_on_defers_delivery_to_executor() {
    let source = TaskCompletionSource::new();
    let (main, mut looper) = serial("main");
    let delivered = Arc::new(Mutex::new(None));

    let sink = Arc::clone(&delivered);
    source
        .task()
        .to_single()
        .observe_on(Arc::new(main))
        .subscribe(move |value: String| {
            *sink.lock().unwrap() = Some(value);
        });

    source.set_result("on main".to_string()).unwrap();
    assert!(delivered.lock().unwrap().is_none());

    looper.run_pending();
    assert_eq!(delivered.lock().unwrap().as_deref(), Some("on main"));
}

#[test]
fn test_error_and_cancel_reach_error_handler() {
    let errors = Arc::new(Mutex::new(Vec::new()));

    let failed: Task<u8> = Task::for_error(cause(TaskFailure("broken".into())));
    let sink = Arc::clone(&errors);
    failed.to_single().subscribe_with(
        |_| panic!("failed single must not succeed"),
        move |err| sink.lock().unwrap().push(err.to_string()),
    );

    let cancelled: Task<u8> = Task::for_canceled();
    let sink = Arc::clone(&errors);
    cancelled.to_single().subscribe_with(
        |_| panic!("cancelled single must not succeed"),
        move |err| {
            assert!(matches!(err, TaskError::Cancelled));
            sink.lock().unwrap().push("cancelled".to_string());
        },
    );

    assert_eq!(
        *errors.lock().unwrap(),
        vec!["Operation failed: broken".to_string(), "cancelled".to_string()]
    );
}

#[core_async::test]
async fn test_stream_yields_exactly_one_item() {
    let single = SimpleTaskSource::new(Duration::from_millis(10))
        .create("streamed")
        .to_single();
    let mut stream = single.into_stream();

    assert_eq!(stream.next().await.unwrap().unwrap(), "streamed");
    assert!(stream.next().await.is_none());
}
