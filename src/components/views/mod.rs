mod challenge;
mod login;
mod setup;

pub use challenge::ChallengeView;
pub use login::LoginView;
pub use setup::SetupView;
