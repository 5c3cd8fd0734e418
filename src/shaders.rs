//! Shader assembly.
//!
//! The WGSL sources are static; the record-kind constants and the active
//! profile's parameters are prepended at pipeline creation, so every
//! profile-dependent value is a module constant the compiler can fold.

use crate::particle::{KIND_EMITTER, KIND_FLARE};
use crate::profile::Profile;

/// Simulation stage source, before constant injection.
pub const SIMULATE_SOURCE: &str = include_str!("shaders/simulate.wgsl");
/// Render stage source, before constant injection.
pub const RENDER_SOURCE: &str = include_str!("shaders/render.wgsl");

fn record_constants() -> String {
    format!(
        "const KIND_EMITTER: u32 = {KIND_EMITTER}u;\n\
         const KIND_FLARE: u32 = {KIND_FLARE}u;\n"
    )
}

/// The complete simulation shader for `profile`.
pub fn simulation_shader(profile: &Profile) -> String {
    format!(
        "{}{}\n{}",
        record_constants(),
        profile.wgsl_constants(),
        SIMULATE_SOURCE
    )
}

/// The complete render shader for `profile`.
pub fn render_shader(profile: &Profile) -> String {
    format!(
        "{}{}\n{}",
        record_constants(),
        profile.wgsl_constants(),
        RENDER_SOURCE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembled_sources_carry_profile_constants() {
        let source = simulation_shader(&Profile::smoke());
        assert!(source.contains("const KIND_EMITTER: u32 = 0u;"));
        assert!(source.contains("const SPAWN_INTERVAL"));
        assert!(source.contains("@compute"));

        let source = render_shader(&Profile::rain());
        assert!(source.contains("const MAX_FLARE_AGE"));
        assert!(source.contains("@vertex"));
        assert!(source.contains("@fragment"));
    }
}
