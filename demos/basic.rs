use chrono::Local;
use deferred::TimeUnit;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

static TICKS: AtomicU32 = AtomicU32::new(0);

fn now() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🚀 Timeouts and intervals on the global scheduler\n");

    // Submitted later but due earlier: fires first.
    deferred::set_timeout(|| println!("[{}] ⏱️  [TIMEOUT] 300ms", now()), 300);
    deferred::set_timeout(|| println!("[{}] ⚡ [TIMEOUT] 100ms", now()), 100);

    let cancelled = deferred::set_timeout(|| println!("never printed"), 200);
    deferred::clear_timeout(cancelled);

    let ticker = deferred::set_interval(
        || {
            let count = TICKS.fetch_add(1, Ordering::SeqCst) + 1;
            println!("[{}] 🔄 [INTERVAL] tick #{}", now(), count);
        },
        250,
    )?;

    // A failing interval is logged once and stops on its own.
    deferred::set_interval_with_unit(
        || -> Result<(), String> { Err("upstream unavailable".to_string()) },
        1,
        TimeUnit::Seconds,
    )?;

    thread::sleep(Duration::from_secs(2));
    deferred::clear_interval(ticker);

    println!("\n📊 RESULTS after 2 seconds:");
    println!("   Interval ticks (250ms): {}", TICKS.load(Ordering::SeqCst));
    println!("   Expected: ~7-8");

    Ok(())
}
