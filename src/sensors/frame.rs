//! Sensor frame decoder.
//!
//! Stateless and total: every byte slice either yields a complete
//! [`SensorReading`] or a single uniform [`FormatError`].  There are no
//! partial results, so a rejected frame can never disturb the caller's
//! previous reading.

use super::SensorReading;
use crate::error::FormatError;

/// Literal that must open every telemetry record.
pub const FRAME_MARKER: &str = "1";

/// Number of comma-separated fields in a telemetry record.
pub const FIELD_COUNT: usize = 5;

/// Decode one raw telemetry frame.
///
/// The relay fields arrive **inverted**: the node reports the GPIO level of
/// active-low relays, so `0` on the wire means "energised".  The returned
/// reading carries the logical state.  This is a property of the deployed
/// hardware protocol and must stay as is.
pub fn decode(frame: &[u8]) -> Result<SensorReading, FormatError> {
    let text = core::str::from_utf8(frame).map_err(|_| FormatError::new("not utf-8"))?;

    let mut fields = [""; FIELD_COUNT];
    let mut count = 0;
    for field in text.split(',') {
        if count == FIELD_COUNT {
            return Err(FormatError::new("field count"));
        }
        fields[count] = field;
        count += 1;
    }
    if count != FIELD_COUNT {
        return Err(FormatError::new("field count"));
    }

    let [marker, temperature, humidity, fan_raw, watering_raw] = fields;

    if marker != FRAME_MARKER {
        return Err(FormatError::new("marker"));
    }
    let temperature = temperature
        .parse::<f64>()
        .map_err(|_| FormatError::new("temperature"))?;
    let humidity = humidity
        .parse::<f64>()
        .map_err(|_| FormatError::new("humidity"))?;
    let watering_raw = parse_flag(watering_raw).ok_or(FormatError::new("watering flag"))?;
    let fan_raw = parse_flag(fan_raw).ok_or(FormatError::new("fan flag"))?;

    Ok(SensorReading {
        temperature,
        humidity,
        watering_actuator_reported: !watering_raw,
        fan_actuator_reported: !fan_raw,
    })
}

/// Boolean literals accepted from the node firmware.
fn parse_flag(field: &str) -> Option<bool> {
    match field {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

// ── Tests ────────────────────────────────────────────────────
