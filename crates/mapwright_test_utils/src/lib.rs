//! Mapwright Test Utilities
//!
//! Fixture shapes for the classic mapping scenarios and a tracing setup that
//! routes library logs into the test output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mapwright_test_utils::{init_test_tracing, fixtures::objects::{Source, Target}};
//!
//! #[test]
//! fn test_something() {
//!     init_test_tracing();
//!     let builder = Mapper::default().from::<Source>().to::<Target>();
//!     // ...
//! }
//! ```

pub mod fixtures;

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_TEST_FILTER: &str = "mapwright=debug";

/// Install a fmt subscriber writing to the test harness output.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
