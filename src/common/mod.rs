//! # Common Components
//!
//! Wire-level building blocks shared by the session and the command-line client.
//!
//! ## Modules
//!
//! - [`messages`]: Frame definitions for action invocation and results
//! - [`connection`]: TCP connection abstraction with message framing
//! - [`config`]: Configuration parsing utilities

pub mod config;
pub mod connection;
pub mod messages;
