pub mod token;

pub use token::{AccessClaims, RefreshClaims, DecodedToken, TokenPair};
