use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Express whether the error seems to be happening in the caller, the catalog
/// data, or our own logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLayer {
    /// The request itself references something that can't exist, like a
    /// category that no record carries or an id that isn't in the catalog.
    /// The display layers are expected to only offer values they got from the
    /// catalog, so seeing this from a UI means the UI is stale or buggy; seeing
    /// it from `directory-tool` just means a typo on the command line.
    BadInput,
    /// The catalog source could not be read or decoded.
    DataLayer,
    /// Templating, channel or IO failure in the server.
    ServerLayer,
    /// Something we believe is impossible happened, like the session task
    /// going away while a handle still exists.
    RuntimeInvariantViolation,
}

/// Payload to provide details about what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

/// Does a retry make sense or not?
///
/// Nothing in the directory retries today, but a catalog fetched from
/// somewhere other than local disk would want to distinguish the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// An error that will persist, like an unknown category.
    StickyProblem(ErrorDetails),
    /// An error that might go away if retried later.
    TransientProblem(ErrorDetails),
}

impl DirectoryError {
    pub fn bad_input(message: impl Into<String>) -> DirectoryError {
        DirectoryError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::BadInput,
            message: message.into(),
        })
    }

    pub fn invariant(message: impl Into<String>) -> DirectoryError {
        DirectoryError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::RuntimeInvariantViolation,
            message: message.into(),
        })
    }

    /// The HTTP machinery itself failed; binding again later may work.
    pub fn server_problem(message: impl Into<String>) -> DirectoryError {
        DirectoryError::TransientProblem(ErrorDetails {
            layer: ErrorLayer::ServerLayer,
            message: message.into(),
        })
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            DirectoryError::StickyProblem(details) => details,
            DirectoryError::TransientProblem(details) => details,
        }
    }

    pub fn layer(&self) -> &ErrorLayer {
        &self.details().layer
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self.details();
        write!(f, "{:?}: {}", details.layer, details.message)
    }
}

impl std::error::Error for DirectoryError {}

// JSON parse errors are sticky data problems.
impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> DirectoryError {
        DirectoryError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

/// IO errors mean the catalog or config file isn't there, which isn't going to
/// fix itself.
impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> DirectoryError {
        DirectoryError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

impl From<liquid::Error> for DirectoryError {
    fn from(err: liquid::Error) -> DirectoryError {
        DirectoryError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::ServerLayer,
            message: err.to_string(),
        })
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self.layer() {
            ErrorLayer::BadInput => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
