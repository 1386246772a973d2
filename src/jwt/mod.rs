//! Minimal JWT plumbing hosting pluggable signing methods.
//!
//! Mirrors the shape of the usual JWT libraries: signing methods are looked up
//! by the `alg` header through a name-keyed registry, token segments use
//! URL-safe unpadded base64, and the signing string is
//! `<header segment>.<claims segment>`.

mod segment;
pub use segment::*;

mod signing_method;
pub use signing_method::*;

mod registry;
pub use registry::*;

mod claims;
pub use claims::*;

mod token;
pub use token::*;
