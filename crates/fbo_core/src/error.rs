//! Field error types

use std::fmt;

/// Error type for building particle position data
#[derive(Debug)]
pub enum FieldError {
    /// Width or height is zero, so the field would hold no particles
    ZeroDimensions { width: u32, height: u32 },
    /// Supplied point count does not equal width * height
    SizeMismatch { expected: usize, actual: usize },
    /// Image could not be opened or decoded
    Image(image::ImageError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::ZeroDimensions { width, height } => {
                write!(f, "Field dimensions must be non-zero, got {}x{}", width, height)
            }
            FieldError::SizeMismatch { expected, actual } => {
                write!(f, "Expected {} particle positions, got {}", expected, actual)
            }
            FieldError::Image(err) => write!(f, "Image error: {}", err),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for FieldError {
    fn from(err: image::ImageError) -> Self {
        FieldError::Image(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_display() {
        let err = FieldError::ZeroDimensions { width: 0, height: 4 };
        assert_eq!(format!("{}", err), "Field dimensions must be non-zero, got 0x4");
    }

    #[test]
    fn test_size_mismatch_display() {
        let err = FieldError::SizeMismatch { expected: 16, actual: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("16"));
        assert!(msg.contains("3"));
    }

    #[test]
    fn test_source_only_for_image() {
        use std::error::Error;
        let err = FieldError::SizeMismatch { expected: 1, actual: 2 };
        assert!(err.source().is_none());
    }
}
