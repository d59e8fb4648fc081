#![forbid(unsafe_code)]

pub mod confirmation;
pub mod contact;
pub mod landing;
pub mod selection;

pub use confirmation::{ConfirmationScreen, ConfirmationSummary};
pub use contact::{ContactScreen, SubmitOutcome};
pub use landing::LandingScreen;
pub use selection::SelectionScreen;
