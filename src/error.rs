use std::path::PathBuf;

use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Process exit code for an input that is missing or cannot be read.
pub const EXIT_READ_FAILED: i32 = 30;
/// Process exit code for an input that is not a valid .NET module.
pub const EXIT_INVALID_MODULE: i32 = 40;
/// Process exit code for an output that could not be written or replaced.
pub const EXIT_WRITE_FAILED: i32 = 50;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Read failures
/// - [`Error::ReadFailed`] - The input path does not exist or cannot be opened
/// - [`Error::FileError`] - Raw I/O failure while mapping the input
///
/// ## Format failures
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file boundaries
/// - [`Error::NotSupported`] - Unsupported file format or feature
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::GoblinErr`] - PE parsing errors from goblin crate
///
/// ## Write failures
/// - [`Error::WriteFailed`] - The output could not be created, serialized or moved into place
///
/// Every variant maps onto one of the process exit codes through [`Error::exit_code`].
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Indicates that the input file is not a .NET PE executable, or uses metadata
    /// features this library does not understand.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// The input path is missing or could not be opened.
    #[error("Could not read {}: {source}", path.display())]
    ReadFailed {
        /// The input that failed
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },

    /// The output could not be created, serialized or moved to its final location.
    #[error("Could not write {}: {source}", path.display())]
    WriteFailed {
        /// The path that was being written, replaced or created
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },
}

impl Error {
    /// Maps this error onto the process exit code of its category.
    ///
    /// Missing or unreadable inputs yield [`EXIT_READ_FAILED`], inputs that are not valid
    /// .NET modules yield [`EXIT_INVALID_MODULE`], and output failures yield
    /// [`EXIT_WRITE_FAILED`].
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ReadFailed { .. } | Error::FileError(_) => EXIT_READ_FAILED,
            Error::Malformed { .. }
            | Error::OutOfBounds
            | Error::NotSupported
            | Error::Empty
            | Error::GoblinErr(_) => EXIT_INVALID_MODULE,
            Error::WriteFailed { .. } => EXIT_WRITE_FAILED,
        }
    }

    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::WriteFailed {
            path: path.into(),
            source,
        }
    }
}
