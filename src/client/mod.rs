//! The `client` module is the application-facing side of the crate.
//!
//! It provides `BrokerClient`, which connects to a broker and exposes
//! publish, subscribe and consume, along with the `ClientIdentity` it
//! connects as and the registry of subscriber tokens it has issued.

pub mod broker_client;
pub mod identity;
pub mod registry;

pub use broker_client::BrokerClient;
pub use identity::ClientIdentity;
pub use registry::{SubscriberId, SubscriptionRegistry};
