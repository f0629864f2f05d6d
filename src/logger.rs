use tracing_subscriber::{fmt, EnvFilter};

/// Initialise console logging.
///
/// Honours `RUST_LOG`; defaults to `info` for the harvester so the per-step
/// diagnostics are visible without configuration. Safe to call more than
/// once (tests each call it); only the first call installs the subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("route_distance_harvester=info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_is_harmless() {
        super::init();
        super::init();
    }
}
