//! autohidpi-host library
//!
//! This crate provides the core functionality of the AutoHiDPI native
//! messaging host:
//! - Length-prefixed JSON framing over stdin/stdout
//! - `wlr-randr` invocation and output parsing
//! - The synchronous request/response session loop

pub mod backend;
pub mod config;
pub mod randr;
pub mod session;
pub mod transport;
