use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber. Call once, before the client starts.
pub fn setup_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set default tracing subscriber");
}
