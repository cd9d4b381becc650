//! Payload codec for the LK30 LoRaWAN sensor.
//!
//! - [`libs::uplink`] decodes sensor reports.
//! - [`libs::downlink`] encodes configuration commands.
//! - [`routes`] exposes both over HTTP.

pub mod libs;
pub mod routes;
