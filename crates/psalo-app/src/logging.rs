use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries command output.
/// `RUST_LOG` overrides `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if atty::is(atty::Stream::Stderr) {
        builder.init();
    } else {
        builder.json().init();
    }
}
