use chrono::Local;
use log::info;
use std::time::Instant;

/// Run a closure and log its wall-clock duration under `label`.
pub fn time_it<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    info!(
        "{} finished in {:.6} s",
        label,
        start.elapsed().as_secs_f64()
    );
    result
}

/// Log the current local time with a message.
pub fn log_timestamp(message: &str) {
    info!("{}: {}", message, Local::now().format("%Y-%m-%d %H:%M:%S"));
}
