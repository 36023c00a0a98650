//! HVV departure board.
//!
//! A client for the Geofox (GTI) real-time interface that answers:
//! "when does the next bus or train leave from my stops?"

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod gti;
