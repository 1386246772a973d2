mod error;
pub use error::*;

mod secret_string;
pub use secret_string::*;

mod signing_config;
pub use signing_config::*;
