use clap::Parser;
use log::error;

use tilekit::config::Args;
use tilekit::dataset::process_split;
use tilekit::timing::{log_timestamp, time_it};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if !args.raw_root.exists() {
        error!(
            "The specified raw_root does not exist: {}",
            args.raw_root.display()
        );
        return;
    }

    log_timestamp("Starting label conversion");

    match time_it("label conversion", || process_split(&args)) {
        Ok(stats) => stats.print_summary(),
        Err(e) => error!("Failed to process split: {}", e),
    }
}
