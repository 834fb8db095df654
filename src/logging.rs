use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, registry, EnvFilter};

const RUST_LOG_ENV: &str = "RUST_LOG";

/// Install the global subscriber.
///
/// Defaults to `INFO`. Individual modules can be raised with `RUST_LOG`, e.g.
/// `RUST_LOG="ledgerun::fsm=debug"` to see every state transition, or
/// `RUST_LOG="ledgerun::player=trace"` for jump details.
pub fn init() {
    let filter = match std::env::var_os(RUST_LOG_ENV).map(|s| s.into_string()) {
        Some(Ok(env)) => {
            let mut filter = EnvFilter::default().add_directive(LevelFilter::INFO.into());
            for s in env.split(',') {
                match s.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(err) => eprintln!("WARN ignoring log directive: `{}`: {}", s, err),
                };
            }
            filter
        }
        _ => EnvFilter::default().add_directive(LevelFilter::INFO.into()),
    };

    registry().with(fmt::layer().with_target(true)).with(filter).init();
}
