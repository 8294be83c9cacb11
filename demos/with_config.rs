use chrono::Local;
use deferred::{SchedulerBuilder, TimeUnit};
use std::path::Path;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/config");

    // Override any key with e.g. DEFERRED_SCHEDULER__THREAD_NAME=custom
    let scheduler = SchedulerBuilder::with_toml(config_dir.join("deferred.toml"))?.build()?;
    let yaml_scheduler = SchedulerBuilder::with_yaml(config_dir.join("deferred.yaml"))?.build()?;

    scheduler.set_timeout_with_unit(
        || {
            let now = Local::now().format("%H:%M:%S%.3f");
            let thread = thread::current();
            println!("[{}] 📍 [TOML] fired on {:?}", now, thread.name());
        },
        1,
        TimeUnit::Seconds,
    );

    yaml_scheduler.set_interval_every(
        || {
            let now = Local::now().format("%H:%M:%S%.3f");
            println!("[{}] 🔄 [YAML] every 400ms", now);
        },
        Duration::from_millis(400),
    )?;

    thread::sleep(Duration::from_secs(2));

    scheduler.shutdown();
    yaml_scheduler.shutdown();
    println!("✅ Both schedulers shut down");

    Ok(())
}
