//! Visual/physics profiles.
//!
//! A profile fixes everything about how a system looks and moves: spawn
//! cadence, flare lifetime, the velocity update rule, billboard sizing and
//! the blend mode. Profiles are compiled into the shaders as constants at
//! pipeline creation, so a running system carries no per-particle branches
//! and cannot change profile without being rebuilt.

use glam::{Vec2, Vec3};

/// Which built-in profile a system runs with. Selected once, at
/// initialization, usually from the settings artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileKind {
    /// Slow, buoyant puffs that grow and fade. The default.
    #[default]
    Smoke,
    /// Fast, falling streaks with an additive glow.
    Rain,
}

impl ProfileKind {
    /// Parse a settings token. Accepts the legacy `quad`/`cube` spellings
    /// alongside the descriptive ones.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "smoke" | "quad" => Some(Self::Smoke),
            "rain" | "cube" => Some(Self::Rain),
            _ => None,
        }
    }

    /// Canonical settings token for this profile.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::Rain => "rain",
        }
    }

    /// The full parameter set for this profile.
    pub fn profile(&self) -> Profile {
        match self {
            Self::Smoke => Profile::smoke(),
            Self::Rain => Profile::rain(),
        }
    }
}

/// How billboard fragments combine with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default). Good for dense, opaque-ish media.
    #[default]
    Alpha,
    /// Additive blending. Overlapping particles brighten, which reads as
    /// glow: rain streaks, sparks, energy.
    Additive,
}

impl BlendMode {
    /// The pipeline blend state for this mode.
    pub fn blend_state(&self) -> wgpu::BlendState {
        match self {
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            },
        }
    }
}

/// The complete parameter set behind one visual profile.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Seconds between flare spawns from the emitter.
    pub spawn_interval: f32,
    /// Flares older than this are dropped by the simulation stage.
    pub max_flare_age: f32,
    /// Constant world-space acceleration applied to flares.
    pub accel: Vec3,
    /// Velocity damping factor per second (0 = none).
    pub drag: f32,
    /// Base speed of a fresh flare.
    pub initial_speed: f32,
    /// Mean direction of a fresh flare's velocity.
    pub initial_direction: Vec3,
    /// How far random samples push the direction off the mean.
    pub spread: f32,
    /// Base billboard extents of a flare.
    pub flare_size: Vec2,
    /// Random per-flare size variation (fraction of `flare_size`).
    pub size_jitter: f32,
    /// Billboard growth per second of age (0 = constant size).
    pub growth: f32,
    /// How fragments blend into the frame.
    pub blend: BlendMode,
}

impl Profile {
    /// Buoyant smoke: slow updraft, heavy drag, quads that grow and fade.
    pub fn smoke() -> Self {
        Self {
            spawn_interval: 0.02,
            max_flare_age: 4.0,
            accel: Vec3::new(0.0, 0.85, 0.0),
            drag: 0.25,
            initial_speed: 1.6,
            initial_direction: Vec3::Y,
            spread: 0.6,
            flare_size: Vec2::new(1.4, 1.4),
            size_jitter: 0.35,
            growth: 0.5,
            blend: BlendMode::Alpha,
        }
    }

    /// Rain: fast, gravity-driven streaks that glow additively.
    pub fn rain() -> Self {
        Self {
            spawn_interval: 0.004,
            max_flare_age: 3.0,
            accel: Vec3::new(0.0, -9.8, 0.0),
            drag: 0.02,
            initial_speed: 6.0,
            initial_direction: Vec3::new(0.0, -1.0, 0.05),
            spread: 0.25,
            flare_size: Vec2::new(0.08, 1.1),
            size_jitter: 0.4,
            growth: 0.0,
            blend: BlendMode::Additive,
        }
    }

    /// WGSL constant block prepended to both shader stages. Keeping the
    /// profile in module constants lets naga fold it, and means a running
    /// pipeline has no profile branch at all.
    pub fn wgsl_constants(&self) -> String {
        format!(
            "const SPAWN_INTERVAL: f32 = {:?};\n\
             const MAX_FLARE_AGE: f32 = {:?};\n\
             const ACCEL: vec3<f32> = vec3<f32>({:?}, {:?}, {:?});\n\
             const DRAG: f32 = {:?};\n\
             const INITIAL_SPEED: f32 = {:?};\n\
             const INITIAL_DIRECTION: vec3<f32> = vec3<f32>({:?}, {:?}, {:?});\n\
             const SPREAD: f32 = {:?};\n\
             const FLARE_SIZE: vec2<f32> = vec2<f32>({:?}, {:?});\n\
             const SIZE_JITTER: f32 = {:?};\n\
             const GROWTH: f32 = {:?};\n",
            self.spawn_interval,
            self.max_flare_age,
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.drag,
            self.initial_speed,
            self.initial_direction.x,
            self.initial_direction.y,
            self.initial_direction.z,
            self.spread,
            self.flare_size.x,
            self.flare_size.y,
            self.size_jitter,
            self.growth,
        )
    }

    /// The live population this profile converges to: one flare per spawn
    /// interval surviving `max_flare_age` seconds, plus the emitter.
    /// Useful for sizing buffers and for warning when a capacity is too
    /// small to hold the steady state.
    pub fn steady_state_population(&self) -> u32 {
        (self.max_flare_age / self.spawn_interval).ceil() as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        for kind in [ProfileKind::Smoke, ProfileKind::Rain] {
            assert_eq!(ProfileKind::from_token(kind.token()), Some(kind));
        }
    }

    #[test]
    fn legacy_tokens_accepted() {
        assert_eq!(ProfileKind::from_token("quad"), Some(ProfileKind::Smoke));
        assert_eq!(ProfileKind::from_token("cube"), Some(ProfileKind::Rain));
        assert_eq!(ProfileKind::from_token("  RAIN \n"), Some(ProfileKind::Rain));
        assert_eq!(ProfileKind::from_token("fog"), None);
    }

    #[test]
    fn steady_state_matches_rate_times_lifetime() {
        // One spawn per 0.1s living 2.0s converges to about 20 flares.
        let profile = Profile {
            spawn_interval: 0.1,
            max_flare_age: 2.0,
            ..Profile::smoke()
        };
        assert_eq!(profile.steady_state_population(), 21);
        assert!(profile.steady_state_population() <= 1000);
    }

    #[test]
    fn built_in_profiles_fit_default_capacity() {
        assert!(Profile::smoke().steady_state_population() <= 20_000);
        assert!(Profile::rain().steady_state_population() <= 20_000);
    }

    #[test]
    fn constants_block_names_every_knob() {
        let block = Profile::smoke().wgsl_constants();
        for name in [
            "SPAWN_INTERVAL",
            "MAX_FLARE_AGE",
            "ACCEL",
            "DRAG",
            "INITIAL_SPEED",
            "INITIAL_DIRECTION",
            "SPREAD",
            "FLARE_SIZE",
            "SIZE_JITTER",
            "GROWTH",
        ] {
            assert!(block.contains(name), "missing constant {name}");
        }
    }
}
