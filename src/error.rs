use std::fmt;

/// Errors produced while loading, rendering or encoding a scene
#[derive(Debug)]
pub enum Error {
    /// Line does not contain a single token
    InvalidLine { line: usize },
    /// Line is malformed: bad token sequence, quoting, literal, shape or missing property
    InvalidInput { line: usize, reason: String },
    /// Property (or shape) name is longer than [`crate::MAX_PROPERTY_NAME_LEN`]
    PropertyNameTooLong { line: usize, name: String },
    /// Command identifier is already used by another command of the scene
    DuplicateIdentifier { line: usize, id: i64 },
    /// Failed to allocate pixel buffer of the given size in bytes
    OutOfMemory { size: usize },
    /// Pixel buffer length does not match its dimensions
    InvalidCanvas {
        width: usize,
        height: usize,
        len: usize,
    },
    /// Image dimensions do not fit into the bitmap header fields
    ImageTooLarge { width: usize, height: usize },
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// IO error propagated while reading input or writing output
    Io(std::io::Error),
}

impl Error {
    /// Line number (starting from `1`) of the scene that caused this error
    pub fn line(&self) -> Option<usize> {
        use Error::*;
        match self {
            InvalidLine { line }
            | InvalidInput { line, .. }
            | PropertyNameTooLong { line, .. }
            | DuplicateIdentifier { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn invalid_input(line: usize, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            line,
            reason: reason.into(),
        }
    }

    /// Attach line number to an error produced without knowing it
    pub(crate) fn at_line(self, line: usize) -> Self {
        use Error::*;
        match self {
            InvalidLine { .. } => InvalidLine { line },
            InvalidInput { reason, .. } => InvalidInput { line, reason },
            PropertyNameTooLong { name, .. } => PropertyNameTooLong { line, name },
            DuplicateIdentifier { id, .. } => DuplicateIdentifier { line, id },
            error => error,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            InvalidLine { line } => write!(f, "empty entry on line {}", line),
            InvalidInput { line, reason } => {
                write!(f, "invalid entry on line {}: {}", line, reason)
            }
            PropertyNameTooLong { line, name } => write!(
                f,
                "property name \"{}\" on line {} is too long",
                name, line
            ),
            DuplicateIdentifier { line, id } => {
                write!(f, "duplicate ID \"{}\" on line {}", id, line)
            }
            OutOfMemory { size } => write!(f, "out of memory allocating {} bytes", size),
            InvalidCanvas { width, height, len } => write!(
                f,
                "pixel buffer of {} bytes does not match {}x{} image",
                len, width, height
            ),
            ImageTooLarge { width, height } => {
                write!(f, "{}x{} image is too large for a bitmap", width, height)
            }
            #[cfg(feature = "serde")]
            Json(error) => write!(f, "json: {}", error),
            Io(error) => write!(f, "io: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "serde")]
            Error::Json(error) => Some(error),
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            Error::OutOfMemory { .. } => Self::new(std::io::ErrorKind::OutOfMemory, error),
            _ => Self::new(std::io::ErrorKind::InvalidData, error),
        }
    }
}
