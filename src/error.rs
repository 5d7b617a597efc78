use std::{error, fmt, io};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by the modulation driver.
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    ParameterError(String),
    ThreadError(io::Error),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::ThreadError(err) => Some(err),
            Self::ParameterError(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::ThreadError(err) => write!(f, "Failed to spawn modulation thread: {err}"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::ThreadError(err)
    }
}
