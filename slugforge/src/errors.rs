//! Definition of errors.

use std::error::Error;
use std::fmt;

/// A specialized Result type for Slugforge.
pub type Result<T, E = SlugforgeError> = std::result::Result<T, E>;

/// The error type for Slugforge.
#[derive(Debug)]
pub enum SlugforgeError {
    /// The error variant for [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`PatternSyntaxError`].
    PatternSyntax(PatternSyntaxError),

    /// The error variant for [`SlugFormatError`].
    SlugFormat(SlugFormatError),

    /// The error variant for [`DictionaryError`].
    Dictionary(DictionaryError),

    /// The error variant for [`ParseIntError`](std::num::ParseIntError).
    ParseInt(std::num::ParseIntError),

    /// The error variant for [`DecodeError`](bincode::error::DecodeError).
    BincodeDecode(bincode::error::DecodeError),

    /// The error variant for [`EncodeError`](bincode::error::EncodeError).
    BincodeEncode(bincode::error::EncodeError),

    /// The error variant for [`serde_yaml::Error`].
    Yaml(serde_yaml::Error),

    /// The error variant for [`serde_json::Error`].
    Json(serde_json::Error),

    /// The error variant for [`std::io::Error`].
    StdIo(std::io::Error),
}

impl SlugforgeError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// Builds a pattern syntax error. A zero column means the error is not
    /// anchored to a position in the pattern source.
    pub(crate) fn pattern_syntax<S>(msg: S, column: usize) -> Self
    where
        S: Into<String>,
    {
        Self::PatternSyntax(PatternSyntaxError {
            msg: msg.into(),
            column,
        })
    }

    pub(crate) const fn slug_format(expected: usize, actual: usize) -> Self {
        Self::SlugFormat(SlugFormatError { expected, actual })
    }

    pub(crate) fn dictionary<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Dictionary(DictionaryError { msg: msg.into() })
    }
}

impl fmt::Display for SlugforgeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::PatternSyntax(e) => e.fmt(f),
            Self::SlugFormat(e) => e.fmt(f),
            Self::Dictionary(e) => e.fmt(f),
            Self::ParseInt(e) => e.fmt(f),
            Self::BincodeDecode(e) => e.fmt(f),
            Self::BincodeEncode(e) => e.fmt(f),
            Self::Yaml(e) => e.fmt(f),
            Self::Json(e) => e.fmt(f),
            Self::StdIo(e) => e.fmt(f),
        }
    }
}

impl Error for SlugforgeError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a pattern source does not conform to the pattern language.
#[derive(Debug)]
pub struct PatternSyntaxError {
    /// Error message.
    pub(crate) msg: String,

    /// 1-based character column into the pattern source, or 0 when the error
    /// is not anchored to a position.
    pub(crate) column: usize,
}

impl PatternSyntaxError {
    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the 1-based column of the offending character, if any.
    pub const fn column(&self) -> Option<usize> {
        if self.column == 0 {
            None
        } else {
            Some(self.column)
        }
    }
}

impl fmt::Display for PatternSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.column == 0 {
            write!(f, "PatternSyntaxError: {}", self.msg)
        } else {
            write!(f, "PatternSyntaxError: {} at column {}", self.msg, self.column)
        }
    }
}

impl Error for PatternSyntaxError {}

/// Error used when the number of substitutions handed to the slug formatter
/// does not match the number of placeholders in the pattern.
#[derive(Debug)]
pub struct SlugFormatError {
    /// Number of placeholders in the pattern.
    pub(crate) expected: usize,

    /// Number of substitutions supplied.
    pub(crate) actual: usize,
}

impl fmt::Display for SlugFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SlugFormatError: expected {} substitutions, got {}",
            self.expected, self.actual
        )
    }
}

impl Error for SlugFormatError {}

/// Error used when a dictionary is missing, malformed, or too small for the
/// requested operation.
#[derive(Debug)]
pub struct DictionaryError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DictionaryError: {}", self.msg)
    }
}

impl Error for DictionaryError {}

impl From<std::num::ParseIntError> for SlugforgeError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::ParseInt(error)
    }
}

impl From<bincode::error::DecodeError> for SlugforgeError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::BincodeDecode(error)
    }
}

impl From<bincode::error::EncodeError> for SlugforgeError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::BincodeEncode(error)
    }
}

impl From<serde_yaml::Error> for SlugforgeError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Yaml(error)
    }
}

impl From<serde_json::Error> for SlugforgeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<std::io::Error> for SlugforgeError {
    fn from(error: std::io::Error) -> Self {
        Self::StdIo(error)
    }
}
