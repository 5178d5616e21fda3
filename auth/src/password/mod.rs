pub mod errors;
pub mod salted;

pub use errors::PasswordError;
pub use salted::PasswordHasher;
pub use salted::SaltedPassword;
