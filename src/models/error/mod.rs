mod signer;
pub use signer::*;

mod token;
pub use token::*;
