//! Two logging facades side by side, same as the teacher: `fern`+`log` for
//! this binary's own startup banner, `tracing-subscriber` so the library
//! crates' `tracing` events actually reach stderr instead of going nowhere.

pub(crate) fn init(level_override: Option<log::LevelFilter>) -> Result<(), log::SetLoggerError> {
    let level = level_override.unwrap_or_else(|| {
        std::env::var("PGCONF_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(log::LevelFilter::Off)
    });

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level.to_string()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
