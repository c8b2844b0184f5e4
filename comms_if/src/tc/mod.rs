//! # Telecommand module
//!
//! This module provides telecommand functionality to the communications
//! interface.
//!
//! A telecommand is a JSON object of the form
//!
//! ```json
//! {"type": "VEL", "payload": {...}, "resp_chan": "ctrl.resp", "multi": false}
//! ```
//!
//! where only `type` is mandatory (and `payload` for those types which carry
//! one).

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod quad_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize, de::DeserializeOwned};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
pub use quad_ctrl::{VelCmd, PoseCmd};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the robot by a controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tc
{
    /// The type of the telecommand
    pub tc_type: TcType,

    /// The payload associated with this TC
    pub payload: TcPayload,

    /// Channel the sender expects a response on, if any
    pub resp_chan: Option<String>,

    /// True if the sender expects multiple responses
    pub multi: bool
}

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static TYPE_HAS_NO_PAYLOAD: [TcType; 4] = [
    TcType::None,
    TcType::Heartbeat,
    TcType::MakeSafe,
    TcType::MakeUnsafe
];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Telecommand types.
///
/// The type is used to identify the purpose of the telecommand, and should be
/// used by the telecommand processor to determine where to send the command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum TcType {
    None,
    Heartbeat,
    MakeSafe,
    MakeUnsafe,
    VelCmd,
    PoseCmd,
    GaitConfig,
}

/// Telecommand payload.
///
/// The payload allows the data contained in the TC to be serialised in may
/// ways. The payload only indicates which serialisation format the data is in.
/// Use `Tc::decode_payload` to deserialise the data contained within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TcPayload {
    None,
    Json(String)
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC has an invalid type ({0})")]
    InvalidType(String),

    #[error("TC of type {0:?} is expected to have a payload but it doesn't")]
    MissingPayload(TcType),

    #[error("TC of type {0:?} has an invalid payload: {1}")]
    InvalidPayload(TcType, serde_json::Error),

    #[error("TC field \"{0}\" has the wrong type")]
    InvalidField(&'static str)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Create a TC which carries no payload.
    pub fn new(tc_type: TcType) -> Self {
        Tc {
            tc_type,
            payload: TcPayload::None,
            resp_chan: None,
            multi: false
        }
    }

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        // Parse the JSON string into a value
        let val: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(TcParseError::InvalidJson(e))
        };

        // Get the type of the TC
        let type_str = match val["type"].as_str() {
            Some(s) => s,
            None => return Err(TcParseError::InvalidType(String::from(
                "Expected \"type\" to be a string"
            )))
        };
        let tc_type = match TcType::from_str(type_str) {
            Some(t) => t,
            None => return Err(TcParseError::InvalidType(
                format!("{} is not a recognised TC type", type_str)
            ))
        };

        // Get the payload. If it's null and the type does not have a payload
        // then an error is returned
        let payload = if val["payload"].is_null() {
            if !TYPE_HAS_NO_PAYLOAD.contains(&tc_type) {
                return Err(TcParseError::MissingPayload(tc_type))
            }
            TcPayload::None
        }
        else {
            TcPayload::Json(val["payload"].to_string())
        };

        // Optional routing fields
        let resp_chan = match &val["resp_chan"] {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            _ => return Err(TcParseError::InvalidField("resp_chan"))
        };
        let multi = match &val["multi"] {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => return Err(TcParseError::InvalidField("multi"))
        };

        Ok(Tc {
            tc_type,
            payload,
            resp_chan,
            multi
        })
    }

    /// Deserialise the payload into the given type.
    pub fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, TcParseError> {
        match self.payload {
            TcPayload::Json(ref s) => serde_json::from_str(s)
                .map_err(|e| TcParseError::InvalidPayload(self.tc_type, e)),
            TcPayload::None => Err(TcParseError::MissingPayload(self.tc_type))
        }
    }
}

impl TcType {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "NONE" => Some(TcType::None),
            "HEARTBEAT" => Some(TcType::Heartbeat),
            "SAFE" => Some(TcType::MakeSafe),
            "UNSAFE" => Some(TcType::MakeUnsafe),
            "VEL" => Some(TcType::VelCmd),
            "POSE" => Some(TcType::PoseCmd),
            "GAIT" => Some(TcType::GaitConfig),
            _ => None
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let tc = Tc::from_json(
            r#"{"type": "SAFE", "resp_chan": "ctrl.resp", "multi": true}"#
        ).unwrap();

        assert_eq!(tc.tc_type, TcType::MakeSafe);
        assert_eq!(tc.resp_chan.as_deref(), Some("ctrl.resp"));
        assert!(tc.multi);
        assert!(matches!(tc.payload, TcPayload::None));

        let tc = Tc::from_json(r#"{"type": "HEARTBEAT"}"#).unwrap();
        assert_eq!(tc.tc_type, TcType::Heartbeat);
        assert!(tc.resp_chan.is_none());
        assert!(!tc.multi);
    }

    #[test]
    fn test_parse_vel_cmd() {
        let tc = Tc::from_json(
            r#"{"type": "VEL", "payload": {"linear_ms": [0.1, 0.0, 0.0], "angular_rads": [0.0, 0.0, 0.3]}}"#
        ).unwrap();

        assert_eq!(tc.tc_type, TcType::VelCmd);

        let cmd: VelCmd = tc.decode_payload().unwrap();
        assert_eq!(cmd.linear_ms, [0.1, 0.0, 0.0]);
        assert_eq!(cmd.angular_rads, [0.0, 0.0, 0.3]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Tc::from_json("not json"),
            Err(TcParseError::InvalidJson(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": 4}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "WALK"}"#),
            Err(TcParseError::InvalidType(_))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "POSE"}"#),
            Err(TcParseError::MissingPayload(TcType::PoseCmd))
        ));
        assert!(matches!(
            Tc::from_json(r#"{"type": "SAFE", "multi": "yes"}"#),
            Err(TcParseError::InvalidField("multi"))
        ));

        // Payload of the wrong shape is only caught on decode
        let tc = Tc::from_json(r#"{"type": "VEL", "payload": {"linear_ms": 1.0}}"#)
            .unwrap();
        assert!(matches!(
            tc.decode_payload::<VelCmd>(),
            Err(TcParseError::InvalidPayload(TcType::VelCmd, _))
        ));
    }
}
