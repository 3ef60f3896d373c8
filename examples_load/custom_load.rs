use std::sync::Arc;
use std::time::Instant;

use console_log_adapter::context::{with_request_context, Identity, IdentityType, RequestContext};
use console_log_adapter::env::env_or;
use console_log_adapter::noop_sink::NoopSink;
use console_log_adapter::{console, console_info, ConsoleAdapter};
use serde_json::json;

/// Same loop as `default_load`, but with ambient context lookups enabled
/// and a request scope active, to measure the cost of enrichment.
#[tokio::main]
async fn main() {
    console::install(Arc::new(ConsoleAdapter::new(Arc::new(NoopSink))));

    let n: u64 = env_or("LOAD_ITERATIONS", "100000").parse().unwrap_or(100_000);
    let ctx = RequestContext::new()
        .tenant("load-tenant")
        .app("app_load")
        .identity(Identity::new("us_load", IdentityType::User))
        .correlation("load-run");

    let elapsed = with_request_context(ctx, async move {
        let start = Instant::now();
        for i in 0..n {
            console_info!("custom load test", json!({ "iteration": i }));
        }
        start.elapsed()
    })
    .await;

    console::restore();
    println!("custom config: sent {} calls in {:?} (~{:.0} calls/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
