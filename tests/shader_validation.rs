//! Integration tests for the assembled shader sources.
//!
//! The profiles are compiled into the WGSL as constants, so every profile
//! produces a distinct shader pair. Each one must parse and validate under
//! naga exactly as wgpu will see it at pipeline creation.

use embers::profile::{Profile, ProfileKind};
use embers::shaders;

fn validate_wgsl(source: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("WGSL parse error: {e:?}"))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {e:?}"))?;

    Ok(())
}

fn profiles() -> Vec<(&'static str, Profile)> {
    vec![
        ("smoke", ProfileKind::Smoke.profile()),
        ("rain", ProfileKind::Rain.profile()),
    ]
}

#[test]
fn simulation_shader_validates_for_every_profile() {
    for (name, profile) in profiles() {
        validate_wgsl(&shaders::simulation_shader(&profile))
            .unwrap_or_else(|e| panic!("{name} simulation shader invalid: {e}"));
    }
}

#[test]
fn render_shader_validates_for_every_profile() {
    for (name, profile) in profiles() {
        validate_wgsl(&shaders::render_shader(&profile))
            .unwrap_or_else(|e| panic!("{name} render shader invalid: {e}"));
    }
}

#[test]
fn simulation_shader_has_expected_entry_point() {
    let module = naga::front::wgsl::parse_str(&shaders::simulation_shader(&Profile::smoke()))
        .expect("parse");
    let entry_points: Vec<_> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
    assert_eq!(entry_points, ["main"]);
}

#[test]
fn render_shader_has_vertex_and_fragment_entry_points() {
    let module =
        naga::front::wgsl::parse_str(&shaders::render_shader(&Profile::rain())).expect("parse");
    let mut entry_points: Vec<_> = module.entry_points.iter().map(|ep| ep.name.as_str()).collect();
    entry_points.sort_unstable();
    assert_eq!(entry_points, ["fs_main", "vs_main"]);
}

#[test]
fn transition_constants_reach_the_assembled_source() {
    // The spawn cadence and lifetime cutoff drive the birth/death rules;
    // a profile that failed to inject them would simulate nothing.
    let profile = Profile {
        spawn_interval: 0.125,
        max_flare_age: 2.5,
        ..Profile::smoke()
    };
    let source = shaders::simulation_shader(&profile);
    assert!(source.contains("const SPAWN_INTERVAL: f32 = 0.125;"));
    assert!(source.contains("const MAX_FLARE_AGE: f32 = 2.5;"));
    assert!(source.contains("atomicAdd"));
}

#[test]
fn randomized_profiles_still_validate() {
    // Profile knobs are data, not code; no value a caller picks should be
    // able to break shader assembly.
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(9);

    for _ in 0..8 {
        let profile = Profile {
            spawn_interval: rng.gen_range(0.001..1.0),
            max_flare_age: rng.gen_range(0.1..30.0),
            accel: embers::Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            ),
            drag: rng.gen_range(0.0..1.0),
            initial_speed: rng.gen_range(0.1..50.0),
            spread: rng.gen_range(0.0..2.0),
            growth: rng.gen_range(0.0..3.0),
            ..Profile::smoke()
        };
        validate_wgsl(&shaders::simulation_shader(&profile)).expect("simulation");
        validate_wgsl(&shaders::render_shader(&profile)).expect("render");
    }
}
