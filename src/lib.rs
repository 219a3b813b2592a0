//! SongAuth: authenticate by reproducing a memorized song order.
//!
//! The [`flow`] module holds the state machine. It talks to the outside world
//! through two collaborators: a catalog search ([`api`]) and a key/value
//! secret store ([`db`]).

pub mod api;
pub mod config;
pub mod db;
pub mod flow;
