//! Error types
//!
//! None of these are fatal to the show: the frame driver logs them and keeps
//! whichever subsystems still work.

use std::fmt;

/// Errors setting up the GPU drawing surface
#[derive(Debug)]
pub enum RenderError {
    /// The page has no usable canvas element
    NoCanvas(String),
    /// Failed to create a surface for the canvas
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create the GPU device
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoCanvas(id) => write!(f, "No canvas element with id '{}'", id),
            RenderError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            RenderError::NoAdapter(e) => write!(f, "No compatible GPU adapter found: {}", e),
            RenderError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::SurfaceCreation(e) => Some(e),
            RenderError::NoAdapter(e) => Some(e),
            RenderError::DeviceCreation(e) => Some(e),
            RenderError::NoCanvas(_) => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        RenderError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::DeviceCreation(e)
    }
}

/// Errors from the audio output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device (unsupported, blocked, or never created)
    Unavailable,
    /// The backend rejected a node or parameter
    Backend(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "Audio output unavailable"),
            AudioError::Backend(msg) => write!(f, "Audio backend error: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Errors loading show configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Malformed JSON
    Parse(serde_json::Error),
    /// Well-formed but unusable value
    Invalid(String),
    /// Config file could not be read
    Io(std::io::Error),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse show config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid show config: {}", msg),
            ConfigError::Io(e) => write!(f, "Failed to read show config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
