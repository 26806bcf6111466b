use std::fmt;

/// Errors reported by a windowing backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// A service call returned a non-zero status; `code` is the errno it left behind
    Call { call: &'static str, code: i32 },
    /// The event poll elapsed without an event
    Timeout,
    /// The service reported success but handed back a null handle
    NullHandle(&'static str),
    /// The handle does not belong to this backend (or was already destroyed)
    UnknownHandle(&'static str),
}

impl ScreenError {
    /// Numeric code in the form the service reports it (0 when there is none)
    pub fn code(&self) -> i32 {
        match self {
            ScreenError::Call { code, .. } => *code,
            _ => 0,
        }
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::Call { call, code } => {
                write!(
                    f,
                    "{}: {}",
                    call,
                    std::io::Error::from_raw_os_error(*code)
                )
            }
            ScreenError::Timeout => write!(f, "timed out waiting for event"),
            ScreenError::NullHandle(what) => write!(f, "{} returned a null handle", what),
            ScreenError::UnknownHandle(what) => write!(f, "unknown {} handle", what),
        }
    }
}

impl std::error::Error for ScreenError {}

/// Result type alias for backend calls
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Which of the two composed windows an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRole {
    Background,
    Overlay,
}

impl WindowRole {
    /// 1-based window number used in diagnostics
    pub fn number(self) -> u32 {
        match self {
            WindowRole::Background => 1,
            WindowRole::Overlay => 2,
        }
    }
}

impl fmt::Display for WindowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window{}", self.number())
    }
}

/// Fatal setup failures; each one ends the process with its own exit status
#[derive(Debug)]
pub enum OverlayError {
    /// Context creation failed
    ContextCreation(ScreenError),
    /// Window creation failed
    WindowCreation { window: WindowRole, source: ScreenError },
    /// Back buffer allocation failed
    BufferAllocation { window: WindowRole, source: ScreenError },
    /// Render buffer retrieval failed (only fatal for the background window)
    RenderBuffer { window: WindowRole, source: ScreenError },
    /// Event receptacle creation failed
    EventCreation(ScreenError),
    /// Writing user-facing output failed
    Io(std::io::Error),
    /// Configuration errors
    ConfigError(String),
    /// Signal handler installation failed
    SignalError(String),
}

impl OverlayError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            OverlayError::BufferAllocation { .. } | OverlayError::RenderBuffer { .. } => -1,
            _ => 1,
        }
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::ContextCreation(source) => write!(f, "{}", source),
            OverlayError::WindowCreation { window, source } => match source {
                ScreenError::Call { code, .. } => write!(
                    f,
                    "screen_create_{}: {}",
                    window,
                    std::io::Error::from_raw_os_error(*code)
                ),
                other => write!(f, "screen_create_{}: {}", window, other),
            },
            OverlayError::BufferAllocation { window, source } => write!(
                f,
                "ERROR: screen_create_window_buffers for {} failed: {}",
                window,
                source.code()
            ),
            OverlayError::RenderBuffer { window, source } => write!(
                f,
                "ERROR: Failed to get render buffer for {}: {}",
                window,
                source.code()
            ),
            OverlayError::EventCreation(source) => write!(f, "{}", source),
            OverlayError::Io(err) => write!(f, "Output error: {}", err),
            OverlayError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            OverlayError::SignalError(msg) => {
                write!(f, "Failed to install signal handler: {}", msg)
            }
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverlayError::ContextCreation(source)
            | OverlayError::WindowCreation { source, .. }
            | OverlayError::BufferAllocation { source, .. }
            | OverlayError::RenderBuffer { source, .. }
            | OverlayError::EventCreation(source) => Some(source),
            OverlayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ctrlc::Error> for OverlayError {
    fn from(err: ctrlc::Error) -> Self {
        OverlayError::SignalError(err.to_string())
    }
}

impl From<std::io::Error> for OverlayError {
    fn from(err: std::io::Error) -> Self {
        OverlayError::Io(err)
    }
}

impl From<serde_json::Error> for OverlayError {
    fn from(err: serde_json::Error) -> Self {
        OverlayError::ConfigError(err.to_string())
    }
}

/// Result type alias for setup operations
pub type OverlayResult<T> = Result<T, OverlayError>;
