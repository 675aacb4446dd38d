//! Binary wire protocol spoken between a database client and the CAS application server.
//! Requests are enveloped into big-endian, length-prefixed buffers by the packet writer;
//! responses are cut into frames by the codec and decoded by the packet that issued them.

#![warn(rust_2018_idioms)]

pub mod protocol;
pub mod service;
