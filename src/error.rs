//! Error types for decoding and rendering routes.

use thiserror::Error;

/// Errors produced while decoding an encoded polyline.
///
/// Offsets are byte positions into the encoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The string ended before the value starting at `offset` was terminated,
    /// or before the longitude of a coordinate pair.
    #[error("encoded polyline truncated: value starting at byte {offset} is incomplete")]
    Truncated { offset: usize },

    /// A byte outside the polyline alphabet (`?` through `~`).
    #[error("invalid byte 0x{byte:02X} at offset {offset} in encoded polyline")]
    InvalidByte { offset: usize, byte: u8 },

    /// A value needs more than 32 bits.
    #[error("value starting at byte {offset} overflows 32 bits")]
    Overflow { offset: usize },
}

/// Errors produced by a render call. None of these touch the surface.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("cannot decode route: {0}")]
    Decode(#[from] DecodeError),

    #[error("route has no points")]
    EmptyRoute,

    #[error("surface has no drawable area ({width}x{height})")]
    EmptySurface { width: f64, height: f64 },

    /// The backing buffer would exceed
    /// [`MAX_BACKING_PIXELS`](crate::render::MAX_BACKING_PIXELS).
    #[error("backing buffer of {width}x{height} device pixels is too large")]
    SurfaceTooLarge { width: f64, height: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_offset() {
        let err = DecodeError::Truncated { offset: 12 };
        assert!(err.to_string().contains("byte 12"));

        let err = DecodeError::InvalidByte { offset: 3, byte: b' ' };
        assert_eq!(
            err.to_string(),
            "invalid byte 0x20 at offset 3 in encoded polyline"
        );
    }

    #[test]
    fn test_render_error_from_decode() {
        let err: RenderError = DecodeError::Overflow { offset: 0 }.into();
        assert_eq!(err, RenderError::Decode(DecodeError::Overflow { offset: 0 }));
        assert!(err.to_string().starts_with("cannot decode route"));
    }

    #[test]
    fn test_surface_too_large_names_size() {
        let err = RenderError::SurfaceTooLarge {
            width: 70000.0,
            height: 70000.0,
        };
        assert_eq!(
            err.to_string(),
            "backing buffer of 70000x70000 device pixels is too large"
        );
    }
}
