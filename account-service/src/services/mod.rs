pub mod accounts;
pub mod sessions;
pub mod views;

pub use accounts::{AccountService, MediaUpload, RegistrationInput};
pub use sessions::{SessionService, TokenPair};
