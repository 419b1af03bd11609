pub mod figment;
pub mod sensitive;
pub mod serde;
pub mod validation;
pub mod validator;

pub use self::sensitive::Sensitive;
