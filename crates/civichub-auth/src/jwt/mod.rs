//! Session token encoding, decoding, and claims.

pub mod claims;
pub mod codec;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenSubject};
pub use codec::TokenCodec;
pub use decoder::{JwtDecoder, TokenError};
pub use encoder::{IssuedToken, JwtEncoder};
