use std::any::Any;

use tracing_forest::ForestLayer;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The default `Level` is `INFO`. It can be overridden with `RUST_LOG`.
///
/// With the `tracing-profile` feature the profiling layer is installed
/// instead; keep the returned guard alive until the end of `main` so it gets
/// flushed.
pub fn init_logger() -> Option<Box<dyn Any>> {
    if cfg!(feature = "tracing-profile") || cfg!(feature = "perfetto") {
        use tracing_profile::init_tracing;
        if let Ok(guard) = init_tracing() {
            return Some(Box::new(guard));
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a subscriber may already be installed, e.g. by another test
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(ForestLayer::default())
        .try_init();
    None
}
