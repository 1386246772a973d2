mod serde;
pub use serde::*;

mod time;
pub use time::*;

mod base64;
pub use base64::*;

mod url;
pub use url::*;
