//! The `transport` module is responsible for talking to the broker over
//! a TCP stream of newline-delimited JSON.
//!
//! It defines the wire messages exchanged with the broker and the
//! connection that performs the handshake and carries one request/reply
//! line pair per operation.

pub mod connection;
pub mod message;

pub use connection::Connection;
