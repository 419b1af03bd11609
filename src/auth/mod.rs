pub mod jwt;
pub mod password;

pub use self::jwt::{Claims, DecodeJwtError, EncodeJwtError, TokenKeys};
