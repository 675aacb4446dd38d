//! Shared plumbing for the CAS client workspace: the error type, the process-wide
//! configuration and the framed byte-stream channel the protocol crate talks through.

#![warn(rust_2018_idioms)]

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod error;
pub mod service;

pub use error::{Error, Result};
