use std::io::Write;

/// Initializes the process-wide logger. Defaults to `info` unless
/// `RUST_LOG` says otherwise; safe to call more than once.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()))
        .try_init();
}
