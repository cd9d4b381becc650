//! Uplink (sensor report) decoder.
//!
//! Layout of the report, all offsets fixed:
//! - BYTE-0: function code, passed through uninterpreted.
//! - BYTE-1..2: measurand, big-endian.
//! - BYTE-3: battery voltage (0~100).
//! - BYTE-4: alarm bits. Bit 7 is the alarm status and bit 0 is the alarm direction.
//!
//! Trailing bytes are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use super::error::Error;

/// Decoded sensor report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UplinkMessage {
    pub function_code: u8,
    pub measurand: u16,
    pub battery_voltage: u8,
    /// `true` while the alarm condition is active.
    pub alarm_status: bool,
    /// `true` for a rising threshold crossing, `false` for falling.
    pub alarm_direction: bool,
}

/// Input of the network server uplink codec call.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DecodeInput {
    pub bytes: Vec<u8>,
    #[serde(rename = "fPort", default)]
    pub f_port: u8,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Output of the network server uplink codec call.
#[derive(Clone, Debug, Serialize)]
pub struct DecodeOutput {
    pub data: UplinkData,
}

/// JSON form of [`UplinkMessage`]. Alarm bits are rendered as `0`/`1`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UplinkData {
    pub func: u8,
    pub measurand: u16,
    #[serde(rename = "batteryVoltage")]
    pub battery_voltage: u8,
    #[serde(serialize_with = "bit")]
    pub alarm_status: bool,
    #[serde(serialize_with = "bit")]
    pub alarm_direction: bool,
}

const UPLINK_LEN: usize = 5;
const ALARM_STATUS_MASK: u8 = 0x80;
const ALARM_DIR_MASK: u8 = 0x01;

/// Decode one uplink payload.
///
/// Returns [`Error::OutOfRange`] when fewer than 5 bytes are supplied.
pub fn decode(bytes: &[u8]) -> Result<UplinkMessage, Error> {
    if bytes.len() < UPLINK_LEN {
        return Err(Error::OutOfRange {
            field: "bytes",
            value: bytes.len() as i64,
        });
    }

    Ok(UplinkMessage {
        function_code: bytes[0],
        measurand: u16::from_be_bytes([bytes[1], bytes[2]]),
        battery_voltage: bytes[3],
        alarm_status: bytes[4] & ALARM_STATUS_MASK != 0,
        alarm_direction: bytes[4] & ALARM_DIR_MASK != 0,
    })
}

/// Decode with the network server calling convention. `fPort` and `variables` are not used.
pub fn decode_input(input: &DecodeInput) -> Result<DecodeOutput, Error> {
    Ok(DecodeOutput {
        data: UplinkData::from(decode(input.bytes.as_slice())?),
    })
}

impl From<UplinkMessage> for UplinkData {
    fn from(msg: UplinkMessage) -> Self {
        UplinkData {
            func: msg.function_code,
            measurand: msg.measurand,
            battery_voltage: msg.battery_voltage,
            alarm_status: msg.alarm_status,
            alarm_direction: msg.alarm_direction,
        }
    }
}

fn bit<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(*value as u8)
}
