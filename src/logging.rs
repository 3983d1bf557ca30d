use env_logger::Env;

/// Installs env_logger with an `info` default, overridable via `RUST_LOG`.
/// Safe to call more than once.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}
