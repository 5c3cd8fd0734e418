//! # embers
//!
//! GPU-resident billboard particle systems: births, deaths, aging and
//! rendering all happen on the GPU, with no per-particle CPU work after
//! initialization and no readback of the live count, ever.
//!
//! ## How it works
//!
//! A system owns two equally sized particle pools used in ping-pong
//! fashion. Each [`ParticleSystem::update`] runs one compute pass that
//! reads the previous generation and appends the next one - surviving
//! flares, the persistent emitter, and any newly spawned flares - into the
//! other pool through an atomic counter. That counter lives inside an
//! indirect-draw argument buffer, so [`ParticleSystem::draw`] renders
//! exactly the live population with `draw_indirect` while the host never
//! learns the number.
//!
//! One persistent *emitter* record seeds the whole population: it is never
//! rendered and never dropped, and it spawns a *flare* on a fixed cadence.
//! Flares age each frame and silently disappear once they outlive their
//! profile's maximum age - dropped records are simply never appended to
//! the next generation.
//!
//! ## Quick start
//!
//! ```ignore
//! use embers::prelude::*;
//!
//! let settings = Settings::load_or_init(embers::settings::DEFAULT_PATH);
//! let mut system = ParticleSystem::new(
//!     &device,
//!     &SystemDesc {
//!         max_particles: settings.max_particles,
//!         emit_position: Vec3::new(0.0, 1.0, 120.0),
//!         profile: settings.mode.profile(),
//!         color_format: surface_format,
//!         depth_format: embers::gpu::DEPTH_FORMAT,
//!     },
//!     &random_table_view,
//!     &sprite_view,
//!     &sprite_sampler,
//! )?;
//!
//! // Per frame:
//! system.update(&queue, &mut encoder, dt);
//! // ... begin a render pass with a depth attachment ...
//! system.draw(&queue, &mut rpass, &camera.frame(aspect));
//! ```
//!
//! Run the demo binary to see it move: drag to orbit, scroll to zoom,
//! press `R` to reset. The `embers.cfg` artifact next to the binary picks
//! the capacity (line 1) and the profile (line 2: `smoke` or `rain`).

mod buffers;

pub mod camera;
pub mod error;
pub mod gpu;
pub mod particle;
pub mod profile;
pub mod random;
pub mod settings;
pub mod shaders;
pub mod system;
pub mod textures;
pub mod time;
pub mod window;

pub use camera::{OrbitCamera, ViewFrame};
pub use error::{ConfigError, Error, GpuError, TextureError};
pub use glam::{Vec2, Vec3};
pub use particle::{ParticleRecord, KIND_EMITTER, KIND_FLARE};
pub use profile::{BlendMode, Profile, ProfileKind};
pub use random::RandomTable;
pub use settings::Settings;
pub use system::{EmissionState, ParticleSystem, SystemDesc};
pub use textures::SpriteConfig;
pub use time::Time;

/// Convenient re-exports for typical embedding.
pub mod prelude {
    pub use crate::camera::{OrbitCamera, ViewFrame};
    pub use crate::error::Error;
    pub use crate::profile::{Profile, ProfileKind};
    pub use crate::random::RandomTable;
    pub use crate::settings::Settings;
    pub use crate::system::{ParticleSystem, SystemDesc};
    pub use crate::textures::SpriteConfig;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3};
}
