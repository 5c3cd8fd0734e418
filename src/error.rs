//! Error types.
//!
//! Configuration problems and resource-creation failures are the two fatal
//! classes at initialization; both abort construction and propagate to the
//! caller. Settings-artifact problems are deliberately *not* here - they
//! recover locally with defaults (see `settings`). GPU resource failures
//! are not transient in this design, so there is no retry path.

use std::fmt;

/// Top-level error for building a particle system or its surroundings.
#[derive(Debug)]
pub enum Error {
    /// Invalid construction parameters.
    Config(ConfigError),
    /// Adapter/device/surface acquisition failed.
    Gpu(GpuError),
    /// Sprite texture loading failed.
    Texture(TextureError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {e}"),
            Error::Gpu(e) => write!(f, "GPU error: {e}"),
            Error::Texture(e) => write!(f, "texture error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Gpu(e) => Some(e),
            Error::Texture(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<GpuError> for Error {
    fn from(e: GpuError) -> Self {
        Error::Gpu(e)
    }
}

impl From<TextureError> for Error {
    fn from(e: TextureError) -> Self {
        Error::Texture(e)
    }
}

/// Invalid construction parameters for a particle system.
#[derive(Debug)]
pub enum ConfigError {
    /// A zero-capacity system can hold no emitter and can never recover.
    ZeroParticleCount,
    /// The requested capacity does not fit a single storage binding.
    ParticleCountExceedsLimit { requested: u32, limit: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroParticleCount => {
                write!(f, "particle capacity must be at least 1")
            }
            ConfigError::ParticleCountExceedsLimit { requested, limit } => write!(
                f,
                "particle capacity {requested} exceeds the device limit of {limit} records"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failures acquiring the GPU itself.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a rendering surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible adapter was offered.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused to create a device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "failed to create surface: {e}"),
            GpuError::Adapter(e) => write!(f, "no compatible GPU adapter: {e}"),
            GpuError::DeviceCreation(e) => write!(f, "failed to create device: {e}"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::Adapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Failures loading a sprite texture from disk.
#[derive(Debug)]
pub enum TextureError {
    /// The file could not be decoded as an image.
    ImageLoad(image::ImageError),
    /// The file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "failed to decode image: {e}"),
            TextureError::Io(e) => write!(f, "failed to read texture file: {e}"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}
