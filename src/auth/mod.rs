pub mod authz;
pub mod guard;
pub mod jwt;

pub use authz::{authorize, verify_presence};
pub use jwt::{decode, Claims, DecodeError};
