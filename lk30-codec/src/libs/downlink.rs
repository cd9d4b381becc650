//! Downlink (configuration command) encoder.
//!
//! BYTE-0 is the function code and selects the layout:
//! - `1`: set schedule, `[1, wait(2), measurements(2)]`.
//! - `2`: set alarm, `[2, threshold + 1000 (2), deadband(2), flags]`.
//! - `128`: reset, `[128]`.
//!
//! Multi-byte fields are big-endian.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, de};

use super::error::Error;

pub const FUNC_SET_SCHEDULE: u8 = 1;
pub const FUNC_SET_ALARM: u8 = 2;
pub const FUNC_RESET: u8 = 128;

/// Offset added to the alarm threshold so that -1000 maps to wire value 0.
pub const THRESHOLD_OFFSET: i64 = 1000;

const FLAG_ALARM_DIR: u8 = 0x01;
const FLAG_ALARM_THR: u8 = 0x02;
const FLAG_ALARM_ACTIVE: u8 = 0x80;

/// Device configuration command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownlinkCommand {
    /// Measurement schedule. Both values must fit in 16 bits.
    SetSchedule {
        wait_seconds: u32,
        measurement_count: u32,
    },
    /// Alarm configuration. `threshold` must be within -1000~64535.
    SetAlarmConfig {
        threshold: i32,
        deadband: u32,
        alarm_direction: bool,
        alarm_on_threshold: bool,
        alarm_active: bool,
    },
    Reset,
}

/// Loosely typed command as delivered by the network server.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DownlinkData {
    /// Function code, given as a number or a numeric string.
    #[serde(deserialize_with = "func_code")]
    pub func: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadband: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_dir: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_thr: Option<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_active: Option<Flag>,
}

/// A flag given as a boolean, a number where non-zero means set, or a string where non-empty
/// means set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FuncCode {
    Number(i64),
    Text(String),
}

/// Input of the network server downlink codec call.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EncodeInput {
    pub data: DownlinkData,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Output of the network server downlink codec call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncodeOutput {
    pub bytes: Vec<u8>,
}

impl DownlinkCommand {
    pub fn function_code(&self) -> u8 {
        match self {
            DownlinkCommand::SetSchedule { .. } => FUNC_SET_SCHEDULE,
            DownlinkCommand::SetAlarmConfig { .. } => FUNC_SET_ALARM,
            DownlinkCommand::Reset => FUNC_RESET,
        }
    }
}

impl Flag {
    pub fn is_set(&self) -> bool {
        match self {
            Flag::Bool(v) => *v,
            Flag::Number(v) => *v != 0.0 && !v.is_nan(),
            Flag::Text(v) => !v.is_empty(),
        }
    }
}

impl TryFrom<&DownlinkData> for DownlinkCommand {
    type Error = Error;

    fn try_from(data: &DownlinkData) -> Result<Self, Self::Error> {
        let func = match u8::try_from(data.func) {
            Err(_) => return Err(Error::UnsupportedFunction(data.func)),
            Ok(func) => func,
        };

        match func {
            FUNC_SET_SCHEDULE => Ok(DownlinkCommand::SetSchedule {
                wait_seconds: required("wait", data.wait)?,
                measurement_count: required("measurements", data.measurements)?,
            }),
            FUNC_SET_ALARM => Ok(DownlinkCommand::SetAlarmConfig {
                threshold: required("threshold", data.threshold)?,
                deadband: required("deadband", data.deadband)?,
                alarm_direction: flag(data.alarm_dir.as_ref()),
                alarm_on_threshold: flag(data.alarm_thr.as_ref()),
                alarm_active: flag(data.alarm_active.as_ref()),
            }),
            FUNC_RESET => Ok(DownlinkCommand::Reset),
            _ => Err(Error::UnsupportedFunction(data.func)),
        }
    }
}

/// Encode one command into the downlink payload.
///
/// Every 16-bit field is range checked and reported as [`Error::OutOfRange`] rather than
/// wrapped.
pub fn encode(command: &DownlinkCommand) -> Result<Vec<u8>, Error> {
    match *command {
        DownlinkCommand::SetSchedule {
            wait_seconds,
            measurement_count,
        } => {
            let wait = to_wire("wait_seconds", wait_seconds as i64, wait_seconds as i64)?;
            let count = to_wire(
                "measurement_count",
                measurement_count as i64,
                measurement_count as i64,
            )?;

            let mut payload = Vec::with_capacity(5);
            payload.push(FUNC_SET_SCHEDULE);
            payload.extend_from_slice(&wait.to_be_bytes());
            payload.extend_from_slice(&count.to_be_bytes());
            Ok(payload)
        }
        DownlinkCommand::SetAlarmConfig {
            threshold,
            deadband,
            alarm_direction,
            alarm_on_threshold,
            alarm_active,
        } => {
            let threshold = to_wire(
                "threshold",
                threshold as i64,
                threshold as i64 + THRESHOLD_OFFSET,
            )?;
            let deadband = to_wire("deadband", deadband as i64, deadband as i64)?;
            let mut flags = 0u8;
            if alarm_direction {
                flags |= FLAG_ALARM_DIR;
            }
            if alarm_on_threshold {
                flags |= FLAG_ALARM_THR;
            }
            if alarm_active {
                flags |= FLAG_ALARM_ACTIVE;
            }

            let mut payload = Vec::with_capacity(6);
            payload.push(FUNC_SET_ALARM);
            payload.extend_from_slice(&threshold.to_be_bytes());
            payload.extend_from_slice(&deadband.to_be_bytes());
            payload.push(flags);
            Ok(payload)
        }
        DownlinkCommand::Reset => Ok(vec![FUNC_RESET]),
    }
}

/// Encode with the network server calling convention. `variables` is not used.
pub fn encode_input(input: &EncodeInput) -> Result<EncodeOutput, Error> {
    let command = DownlinkCommand::try_from(&input.data)?;
    Ok(EncodeOutput {
        bytes: encode(&command)?,
    })
}

/// Check the wire value fits 16 bits. `value` is the caller's value used for reporting.
fn to_wire(field: &'static str, value: i64, wire: i64) -> Result<u16, Error> {
    match u16::try_from(wire) {
        Err(_) => Err(Error::OutOfRange { field, value }),
        Ok(v) => Ok(v),
    }
}

fn required<T: TryFrom<i64>>(field: &'static str, value: Option<i64>) -> Result<T, Error> {
    let value = match value {
        None => return Err(Error::MissingField(field)),
        Some(value) => value,
    };
    match T::try_from(value) {
        Err(_) => Err(Error::OutOfRange { field, value }),
        Ok(v) => Ok(v),
    }
}

fn flag(value: Option<&Flag>) -> bool {
    match value {
        None => false,
        Some(v) => v.is_set(),
    }
}

fn func_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match FuncCode::deserialize(deserializer)? {
        FuncCode::Number(v) => Ok(v),
        FuncCode::Text(v) => match v.trim().parse::<i64>() {
            Err(_) => Err(de::Error::custom(format!("invalid function code `{}`", v))),
            Ok(v) => Ok(v),
        },
    }
}
