use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub fn setup_logging(level: Level) {
    // Create a subscriber that logs to stdout
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    // A second call (e.g. from tests) keeps the first subscriber
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
