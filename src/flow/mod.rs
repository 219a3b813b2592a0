//! The sequence-authentication flow: a synchronous state machine plus the
//! playlist edit and shuffle helpers it is built on.

mod controller;
pub mod playlist;
pub mod shuffle;

pub use controller::{FlowController, SearchTicket};

use std::fmt;

/// A display string such as `"Blinding Lights - The Weeknd"`.
/// Compared by exact string equality.
pub type Candidate = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Login,
    Challenge,
    Resolved(Outcome),
}

impl Phase {
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Setup => "Set Up Your Song Sequence",
            Self::Login => "Log In",
            Self::Challenge | Self::Resolved(_) => "Authenticate",
        }
    }
}

/// Result of a completed `verify` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// Attempt length differs from the secret.
    WrongCount { expected: usize, actual: usize },
    /// Wrong order; the attempt was cleared and one retry consumed.
    Mismatch { attempts_remaining: u32 },
    /// Wrong order with no retries left.
    Locked,
}

/// Last user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Verdict(Verdict),
    LoginRejected,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Verdict(Verdict::Success))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verdict(Verdict::Success) => write!(f, "Authentication Successful!"),
            Self::Verdict(Verdict::WrongCount { expected, actual }) => write!(
                f,
                "Incorrect selection count: picked {actual} of {expected} songs."
            ),
            Self::Verdict(Verdict::Mismatch { attempts_remaining }) => {
                let plural = if *attempts_remaining == 1 { "" } else { "s" };
                write!(
                    f,
                    "Authentication Failed. Try Again. ({attempts_remaining} attempt{plural} left)"
                )
            }
            Self::Verdict(Verdict::Locked) => {
                write!(f, "Authentication Failed. Too many attempts, reset to start over.")
            }
            Self::LoginRejected => write!(f, "Enter both a username and a password."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages() {
        assert_eq!(
            Status::Verdict(Verdict::Success).to_string(),
            "Authentication Successful!"
        );
        assert_eq!(
            Status::Verdict(Verdict::Mismatch {
                attempts_remaining: 1
            })
            .to_string(),
            "Authentication Failed. Try Again. (1 attempt left)"
        );
        assert!(Status::Verdict(Verdict::WrongCount {
            expected: 3,
            actual: 2
        })
        .to_string()
        .contains("2 of 3"));
    }
}
