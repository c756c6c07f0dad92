//! Route geometries and the encoded polyline format.
//!
//! Activities carry their route as a Google encoded polyline: coordinates
//! scaled by 1e5, delta-encoded against the previous point, zig-zag signed
//! and split into 5-bit groups offset by 63. Decoding happens once per
//! render; everything downstream works on [`Polyline`].
//!
//! See <https://developers.google.com/maps/documentation/utilities/polylinealgorithm>.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::projection::BoundingBox;

/// Fixed-point precision of the encoding (five decimal digits).
const PRECISION: f64 = 1e5;

/// Added to every 6-bit group to land in printable ASCII.
const CHAR_OFFSET: u8 = 63;

/// Highest byte a group can encode to (`~`).
const MAX_BYTE: u8 = CHAR_OFFSET + 0x3F;

/// Set on every group except the last one of a value.
const CONTINUATION_BIT: u64 = 0x20;

const GROUP_MASK: u64 = 0x1F;

/// Shift of the seventh group; anything beyond cannot fit in 32 bits.
const MAX_SHIFT: u32 = 30;

/// A polyline representing a route geometry as decoded coordinates.
///
/// Each point is a (latitude, longitude) tuple in decimal degrees, in route
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes an encoded polyline string. See [`decode`].
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        decode(encoded)
    }

    /// Encodes the points back into the compact string form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box over every point, or `None` for an empty polyline.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

/// Decodes an encoded polyline into its coordinates.
///
/// An empty string yields an empty polyline. Each call starts from scratch,
/// so decoding the same input twice gives identical results.
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the string ends inside a value or
/// between the latitude and longitude of a pair, [`DecodeError::InvalidByte`]
/// for bytes outside `?`..=`~`, and [`DecodeError::Overflow`] for values
/// wider than 32 bits.
pub fn decode(encoded: &str) -> Result<Polyline, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::with_capacity(bytes.len() / 4);

    while cursor < bytes.len() {
        lat += read_value(bytes, &mut cursor)?;
        lng += read_value(bytes, &mut cursor)?;
        points.push((lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(Polyline::new(points))
}

/// Reads one zig-zag encoded delta starting at `cursor`, leaving the cursor
/// on the first byte of the next value.
fn read_value(bytes: &[u8], cursor: &mut usize) -> Result<i64, DecodeError> {
    let start = *cursor;
    let mut result: u64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*cursor) else {
            return Err(DecodeError::Truncated { offset: start });
        };
        if !(CHAR_OFFSET..=MAX_BYTE).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                offset: *cursor,
                byte,
            });
        }
        *cursor += 1;

        let group = u64::from(byte - CHAR_OFFSET);
        result |= (group & GROUP_MASK) << shift;
        if group < CONTINUATION_BIT {
            break;
        }

        shift += 5;
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { offset: start });
        }
    }

    let value = u32::try_from(result).map_err(|_| DecodeError::Overflow { offset: start })?;
    let magnitude = i64::from(value >> 1);
    Ok(if value & 1 == 1 { !magnitude } else { magnitude })
}

/// Encodes coordinates into the polyline format at 1e5 precision.
///
/// Inverse of [`decode`] up to rounding to five decimal digits.
pub fn encode(points: &[(f64, f64)]) -> String {
    let mut output = String::with_capacity(points.len() * 8);
    let mut previous = (0_i64, 0_i64);

    for &(lat, lng) in points {
        let current = (scale(lat), scale(lng));
        write_value(current.0 - previous.0, &mut output);
        write_value(current.1 - previous.1, &mut output);
        previous = current;
    }

    output
}

fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}

fn write_value(delta: i64, output: &mut String) {
    let zigzag = if delta < 0 { !(delta << 1) } else { delta << 1 };
    let mut value = zigzag as u64;
    while value >= CONTINUATION_BIT {
        output.push(char::from((CONTINUATION_BIT | (value & GROUP_MASK)) as u8 + CHAR_OFFSET));
        value >>= 5;
    }
    output.push(char::from(value as u8 + CHAR_OFFSET));
}
