pub mod config;
pub mod downlink;
pub mod error;
pub mod uplink;

pub use downlink::{DownlinkCommand, encode};
pub use error::Error;
pub use uplink::{UplinkMessage, decode};
