use std::ffi::CStr;

use cvsafe_sys::status::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_handle(kind: &'static str) -> Error {
        ErrorKind::InvalidHandle { kind }.into()
    }

    pub fn already_released(kind: &'static str) -> Error {
        ErrorKind::ResourceAlreadyReleased { kind }.into()
    }

    pub fn out_of_range(operation: impl Into<String>, message: impl Into<String>) -> Error {
        ErrorKind::OutOfRange {
            operation: operation.into(),
            message: message.into(),
        }
        .into()
    }

    pub fn size_mismatch(required: usize, available: usize) -> Error {
        ErrorKind::SizeMismatch {
            required,
            available,
        }
        .into()
    }

    pub fn invalid_format(name: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: name.into(),
                message: Default::default(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    /// Translates a failing status code returned by the native engine.
    ///
    /// `function` names the engine entry point that reported the status.
    pub fn from_status(status: i32, function: &str) -> Error {
        let message = status_message(status);
        match status {
            CV_STS_OUT_OF_RANGE => Error::out_of_range(function, message),
            CV_STS_NULL_PTR => Error::invalid_handle("native pointer"),
            CV_STS_BAD_ARG | CV_STS_BAD_SIZE | CV_STS_UNMATCHED_FORMATS
            | CV_STS_UNMATCHED_SIZES | CV_STS_UNSUPPORTED_FORMAT => {
                Error::invalid_arg(function, message)
            }
            _ => ErrorKind::Native {
                status,
                function: function.to_string(),
                message,
            }
            .into(),
        }
    }

    /// Returns `true` for errors reporting an out-of-bounds region or index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }
}

fn status_message(status: i32) -> String {
    // The engine hands out static NUL-terminated strings for every code.
    let text = unsafe { CStr::from_ptr(cv_error_str(status)) };
    text.to_string_lossy().into_owned()
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid {kind} handle")]
    InvalidHandle { kind: &'static str },

    #[error("{kind} handle has already been released")]
    ResourceAlreadyReleased { kind: &'static str },

    #[error("{operation}: {message}")]
    OutOfRange { operation: String, message: String },

    #[error("size mismatch: {required} elements required, {available} available")]
    SizeMismatch { required: usize, available: usize },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("invalid data format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("native call {function} failed with status {status}: {message}")]
    Native {
        status: i32,
        function: String,
        message: String,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
