use deferred_runtime::{Scheduler, SchedulerBuilder, SchedulerError, TimeUnit};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn scheduler() -> Scheduler {
    SchedulerBuilder::new()
        .worker_threads(2)
        .thread_name("intervals-test")
        .build()
        .unwrap()
}

#[test]
fn fires_repeatedly_with_roughly_the_period_between_runs() {
    let scheduler = scheduler();
    let (tx, rx) = mpsc::channel();

    let tx = Mutex::new(tx);
    let id = scheduler
        .set_interval(move || tx.lock().unwrap().send(Instant::now()).unwrap(), 50)
        .unwrap();

    let firings: Vec<Instant> = (0..4)
        .map(|_| rx.recv_timeout(Duration::from_secs(2)).unwrap())
        .collect();
    scheduler.clear_interval(id);

    for pair in firings.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= Duration::from_millis(45), "gap too short: {:?}", gap);
        assert!(gap < Duration::from_millis(300), "gap too long: {:?}", gap);
    }
}

#[test]
fn clearing_after_third_firing_prevents_a_fourth() {
    let scheduler = scheduler();
    let fired = Arc::new(AtomicUsize::new(0));
    let (third_tx, third_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();

    let counter = fired.clone();
    let third_tx = Mutex::new(third_tx);
    let gate_rx = Mutex::new(gate_rx);
    let id = scheduler
        .set_interval(
            move || {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                    third_tx.lock().unwrap().send(()).unwrap();
                    // Hold the third run open until the interval has been cleared.
                    gate_rx.lock().unwrap().recv().unwrap();
                }
            },
            20,
        )
        .unwrap();

    third_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    scheduler.clear_interval(id);
    gate_tx.send(()).unwrap();

    thread::sleep(Duration::from_millis(150));
    assert_eq!(fired.load(Ordering::SeqCst), 3);
    assert_eq!(scheduler.active_intervals(), 0);
}

#[test]
fn clearing_before_first_period_prevents_any_firing() {
    let scheduler = scheduler();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = fired.clone();
    let id = scheduler
        .set_interval(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            100,
        )
        .unwrap();
    assert_eq!(scheduler.active_intervals(), 1);

    thread::sleep(Duration::from_millis(20));
    scheduler.clear_interval(id);
    thread::sleep(Duration::from_millis(200));

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(scheduler.active_intervals(), 0);
}

#[test]
fn failing_interval_stops_itself_and_leaves_others_running() {
    let scheduler = scheduler();
    let failing_runs = Arc::new(AtomicUsize::new(0));
    let healthy_runs = Arc::new(AtomicUsize::new(0));

    let counter = failing_runs.clone();
    scheduler
        .set_interval(
            move || -> Result<(), String> {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                    return Err("second run failed".to_string());
                }
                Ok(())
            },
            10,
        )
        .unwrap();

    let counter = healthy_runs.clone();
    let healthy = scheduler
        .set_interval(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            10,
        )
        .unwrap();

    thread::sleep(Duration::from_millis(250));
    assert_eq!(failing_runs.load(Ordering::SeqCst), 2);
    assert!(healthy_runs.load(Ordering::SeqCst) > 3);
    assert_eq!(scheduler.active_intervals(), 1);

    // Timeouts are unaffected as well.
    let (tx, rx) = mpsc::channel();
    scheduler.set_timeout(move || tx.send(()).unwrap(), 10);
    rx.recv_timeout(Duration::from_secs(1)).unwrap();

    scheduler.clear_interval(healthy);
    assert_eq!(scheduler.active_intervals(), 0);
}

#[test]
fn panicking_interval_stops_after_first_run() {
    let scheduler = scheduler();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    scheduler
        .set_interval::<_, ()>(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                panic!("interval callback panicked");
            },
            10,
        )
        .unwrap();

    thread::sleep(Duration::from_millis(150));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.active_intervals(), 0);
}

#[test]
fn zero_period_is_rejected() {
    let scheduler = scheduler();

    assert!(matches!(scheduler.set_interval(|| {}, 0), Err(SchedulerError::InvalidPeriod)));
    assert!(matches!(
        scheduler.set_interval_with_unit(|| {}, 500, TimeUnit::Microseconds),
        Err(SchedulerError::InvalidPeriod)
    ));
    assert!(matches!(
        scheduler.set_interval_every(|| {}, Duration::ZERO),
        Err(SchedulerError::InvalidPeriod)
    ));
    assert_eq!(scheduler.active_intervals(), 0);
}

#[test]
fn shutdown_stops_all_intervals() {
    let scheduler = scheduler();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = runs.clone();
    scheduler
        .set_interval_with_unit(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            10,
            TimeUnit::Milliseconds,
        )
        .unwrap();

    thread::sleep(Duration::from_millis(60));
    scheduler.shutdown();
    let after_shutdown = runs.load(Ordering::SeqCst);

    thread::sleep(Duration::from_millis(100));
    // A run that had already woken may still finish on its own thread.
    assert!(runs.load(Ordering::SeqCst) <= after_shutdown + 1);
}

#[test]
fn blocked_interval_does_not_starve_other_tasks() {
    let scheduler = SchedulerBuilder::new()
        .worker_threads(2)
        .max_blocking_threads(1)
        .thread_name("starvation-test")
        .build()
        .unwrap();

    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let gate_rx = Mutex::new(gate_rx);
    let blocked = scheduler
        .set_interval(
            move || {
                let _ = gate_rx.lock().unwrap().recv_timeout(Duration::from_secs(2));
            },
            5,
        )
        .unwrap();

    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    let ticking = scheduler
        .set_interval(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            10,
        )
        .unwrap();

    let (fired_tx, fired_rx) = mpsc::channel();
    scheduler.set_timeout(move || fired_tx.send(()).unwrap(), 50);

    thread::sleep(Duration::from_millis(600));
    let ticked = ticks.load(Ordering::SeqCst);
    let timeout_fired = fired_rx.try_recv().is_ok();

    scheduler.clear_interval(blocked);
    scheduler.clear_interval(ticking);
    let _ = gate_tx.send(());

    assert!(ticked > 10, "unblocked interval only ran {} times", ticked);
    assert!(timeout_fired, "timeout never ran while an interval was blocked");
}
