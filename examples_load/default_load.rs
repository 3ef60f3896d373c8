use std::sync::Arc;
use std::time::Instant;

use console_log_adapter::env::env_or;
use console_log_adapter::noop_sink::NoopSink;
use console_log_adapter::{console, console_error, ConsoleAdapter, ErrorValue};
use serde_json::json;

fn main() {
    let adapter = ConsoleAdapter::new(Arc::new(NoopSink)).include_context(false);
    console::install(Arc::new(adapter));

    let n: u64 = env_or("LOAD_ITERATIONS", "100000").parse().unwrap_or(100_000);
    let start = Instant::now();

    for i in 0..n {
        console_error!(
            "default load test error",
            json!({ "iteration": i }),
            ErrorValue::new("simulated")
        );
    }

    let elapsed = start.elapsed();
    console::restore();
    println!("default config: sent {} calls in {:?} (~{:.0} calls/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
