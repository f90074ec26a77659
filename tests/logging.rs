//! Installs a global subscriber, so it lives in its own test binary.

use dwav_lib::{Config, init};
use tracing::Level;

#[test]
fn init_debug_twice_keeps_first_subscriber() {
    let config = Config {
        debug: true,
        ..Config::default()
    };
    init(&config);
    init(&config);
    assert!(tracing::enabled!(Level::DEBUG));
    assert!(tracing::enabled!(Level::INFO));
}
