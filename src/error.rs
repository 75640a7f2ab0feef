use config_file::ConfigFileError;
use tokio::task::JoinError;

use std::fmt;

#[derive(Debug)]
pub enum Error {
    ConfigFileError(ConfigFileError),
    IoError(std::io::Error),
    IffError(IffError),
    SerdeJsonError(serde_json::Error),
    JoinError(JoinError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ConfigFileError(x) => write!(f, "IFF timetables error: {}", x),
            Error::IoError(x) => write!(f, "IFF timetables error: {}", x),
            Error::IffError(x) => write!(f, "IFF timetables error: {}", x),
            Error::SerdeJsonError(x) => write!(f, "IFF timetables error: {}", x),
            Error::JoinError(x) => write!(f, "IFF timetables error: {}", x),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigFileError> for Error {
    fn from(error: ConfigFileError) -> Self {
        Error::ConfigFileError(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IoError(error)
    }
}

impl From<IffError> for Error {
    fn from(error: IffError) -> Self {
        Error::IffError(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJsonError(error)
    }
}

impl From<JoinError> for Error {
    fn from(error: JoinError) -> Self {
        Error::JoinError(error)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IffErrorType {
    RowShapeMismatch { line: String, pattern: &'static str },
    EndOfInput,
    MissingIdentification,
    MissingValidityWindow,
    InvalidInteger(String),
    InvalidDate(String),
    InvalidTime(String),
    UnknownField(&'static str),
    FieldKindMismatch { field: &'static str, expected: &'static str },
    TruncatedRoute(i64),
}

impl fmt::Display for IffErrorType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IffErrorType::RowShapeMismatch { line, pattern } => write!(f, "Row {:?} does not match {} pattern", line, pattern),
            IffErrorType::EndOfInput => write!(f, "Unexpected end of input"),
            IffErrorType::MissingIdentification => write!(f, "Missing identification record in file"),
            IffErrorType::MissingValidityWindow => write!(f, "No validity window known to decode footnote vector"),
            IffErrorType::InvalidInteger(x) => write!(f, "Invalid integer {}", x),
            IffErrorType::InvalidDate(x) => write!(f, "Invalid date {}", x),
            IffErrorType::InvalidTime(x) => write!(f, "Invalid time {}", x),
            IffErrorType::UnknownField(x) => write!(f, "Field {} is not declared by the pattern", x),
            IffErrorType::FieldKindMismatch { field, expected } => write!(f, "Field {} is not of kind {}", field, expected),
            IffErrorType::TruncatedRoute(x) => write!(f, "Route of service {} ends before its final stop", x),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IffError {
    pub error_type: IffErrorType,
    pub line: u64,
    pub column: usize,
}

impl IffError {
    pub fn new(error_type: IffErrorType, line: u64, column: usize) -> Self {
        Self { error_type, line, column }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.error_type == IffErrorType::EndOfInput
    }
}

impl fmt::Display for IffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Error reading IFF file line {} column {}: {}",
            self.line, self.column, self.error_type
        )
    }
}

impl std::error::Error for IffError {}
