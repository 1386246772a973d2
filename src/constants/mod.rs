//! Constants shared across the crate.

mod http_client;
pub use http_client::*;

mod logging;
pub use logging::*;

mod vault;
pub use vault::*;
