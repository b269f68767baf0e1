//! Tracing setup.
//!
//! The crate only emits events; an application installs the subscriber once
//! at startup with [`init_tracing`], usually passing
//! [`GameConfig::log_filter`](crate::config::GameConfig::log_filter).

use tracing::{instrument, trace, warn};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter`; an unparseable filter falls
/// back to the default one.
#[instrument]
pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init();

    if installed.is_err() {
        warn!("a global subscriber was already installed");
    }

    trace!("finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    // The captured subscriber is already global here, so both calls take the
    // already-installed branch.
    #[tracing_test::traced_test]
    #[test]
    fn test_init_tracing_twice() {
        let config = GameConfig::default();
        init_tracing(&config.log_filter);
        init_tracing(&config.log_filter);

        assert!(logs_contain("a global subscriber was already installed"));
    }
}
