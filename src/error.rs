use std::fmt;
use thiserror::Error;

use crate::handle::HandleParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRole {
    Parent,
    Child,
}

impl fmt::Display for HandleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleRole::Parent => f.write_str("parent"),
            HandleRole::Child => f.write_str("child"),
        }
    }
}

/// Last-error codes the reparent tool knows how to explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsErrorCode {
    InvalidWindowHandle,
    AccessDenied,
    InvalidParameter,
    Other(u32),
}

impl OsErrorCode {
    pub const SUCCESS: u32 = 0;
    const ACCESS_DENIED: u32 = 5;
    const INVALID_PARAMETER: u32 = 87;
    const INVALID_WINDOW_HANDLE: u32 = 1400;

    pub const fn from_raw(code: u32) -> Self {
        match code {
            Self::INVALID_WINDOW_HANDLE => Self::InvalidWindowHandle,
            Self::ACCESS_DENIED => Self::AccessDenied,
            Self::INVALID_PARAMETER => Self::InvalidParameter,
            other => Self::Other(other),
        }
    }

    pub const fn raw(self) -> u32 {
        match self {
            Self::InvalidWindowHandle => Self::INVALID_WINDOW_HANDLE,
            Self::AccessDenied => Self::ACCESS_DENIED,
            Self::InvalidParameter => Self::INVALID_PARAMETER,
            Self::Other(code) => code,
        }
    }

    pub const fn reason(self) -> Option<&'static str> {
        match self {
            Self::InvalidWindowHandle => Some("Invalid window handle"),
            Self::AccessDenied => Some("Access denied (may need admin rights)"),
            Self::InvalidParameter => Some("Invalid parameter"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for OsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to parse {role} window handle {input:?}: {source}")]
    Parse {
        role: HandleRole,
        input: String,
        source: HandleParseError,
    },

    #[error("invalid {role} window handle (HWND: {value})")]
    InvalidHandle { role: HandleRole, value: usize },

    #[error("failed to set parent, error code {code}")]
    SetParentFailed { code: OsErrorCode },

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} only runs on Windows")]
    Unsupported { tool: &'static str },

    #[error("win32 call failed ({code:#010x}): {message}")]
    Win32 { code: i32, message: String },
}

#[cfg(windows)]
impl From<windows::core::Error> for AppError {
    fn from(e: windows::core::Error) -> Self {
        AppError::Win32 {
            code: e.code().0,
            message: e.to_string(),
        }
    }
}

impl AppError {
    /// Process exit status for this error.
    pub fn code(&self) -> u8 {
        match self {
            AppError::Parse { .. } => 101,
            AppError::InvalidHandle { .. } => 102,
            AppError::SetParentFailed { .. } => 103,
            AppError::Io(_) => 104,
            AppError::Unsupported { .. } => 105,
            AppError::Win32 { .. } => 106,
        }
    }

    /// Decoded explanation for a failed reparent, when the code is known.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AppError::SetParentFailed { code } => code.reason(),
            _ => None,
        }
    }
}
