//! Particle storage: the ping-pong pair, the seed buffer and the selector.
//!
//! Every generation lives in one of two equally sized buffers; each update
//! reads one and appends into the other, then the "current" designation
//! moves to the freshly written side. Alongside each pool sits an
//! indirect-args buffer whose `instance_count` field is the live count,
//! written only by the simulation shader and consumed only by
//! `draw_indirect` and the next simulation pass. The host never reads it.
//!
//! The seed buffer holds the single emitter record that boots the system
//! and re-boots it after a reset; its args are fixed at one instance.

use bytemuck::bytes_of;
use glam::Vec3;

use crate::particle::ParticleRecord;

/// Vertices per billboard instance (two triangles).
pub(crate) const QUAD_VERTICES: u32 = 6;

/// Which buffer feeds the next simulation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimInput {
    /// The single-emitter seed buffer (first run, or a pending reset).
    Seed,
    /// One half of the ping-pong pair.
    Slot(usize),
}

/// A resolved update: where the simulation reads from and which pair slot
/// it appends into. Input and output can never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Route {
    pub input: SimInput,
    pub output: usize,
}

impl Route {
    /// Index into the pre-built array of simulation bind groups, one per
    /// legal route.
    pub fn bind_index(&self) -> usize {
        match (self.input, self.output) {
            (SimInput::Seed, 0) => 0,
            (SimInput::Seed, 1) => 1,
            (SimInput::Slot(0), 1) => 2,
            (SimInput::Slot(1), 0) => 3,
            other => unreachable!("particle stream routed onto itself: {other:?}"),
        }
    }
}

/// The single-bit ping-pong state, kept separate from the GPU resources so
/// the swap/reset rules are plain testable code.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Selector {
    /// Pair slot written by the most recent update.
    active: usize,
    /// False until the first update; the seed is current until then.
    primed: bool,
}

impl Selector {
    pub fn new() -> Self {
        Self { active: 1, primed: false }
    }

    /// Resolve the next update. A pending reset (or a never-updated system)
    /// reads the seed; otherwise the input is whatever was written last
    /// frame. The output is always the other pair slot, and becomes current.
    pub fn begin_update(&mut self, reset: bool) -> Route {
        let input = if reset || !self.primed {
            SimInput::Seed
        } else {
            SimInput::Slot(self.active)
        };
        let output = 1 - self.active;
        self.active = output;
        self.primed = true;
        Route { input, output }
    }

    /// What `draw` should read right now. Stable between updates.
    pub fn current(&self) -> SimInput {
        if self.primed {
            SimInput::Slot(self.active)
        } else {
            SimInput::Seed
        }
    }
}

/// GPU-side particle storage owned by one controller. Raw buffer identity
/// stays inside this module; callers see only routes and the current
/// designation.
pub(crate) struct ParticleBuffers {
    pool: [wgpu::Buffer; 2],
    args: [wgpu::Buffer; 2],
    seed: wgpu::Buffer,
    seed_args: wgpu::Buffer,
    selector: Selector,
    capacity: u32,
}

impl ParticleBuffers {
    pub fn new(device: &wgpu::Device, capacity: u32, emit_position: Vec3) -> Self {
        use wgpu::util::DeviceExt;

        let pool_size = capacity as wgpu::BufferAddress * ParticleRecord::STRIDE;
        let make_pool = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: pool_size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::STORAGE,
                mapped_at_creation: false,
            })
        };
        let make_args = |label: &str| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes_of(&[QUAD_VERTICES, 0u32, 0u32, 0u32]),
                usage: wgpu::BufferUsages::INDIRECT
                    | wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST,
            })
        };

        let seed_record = ParticleRecord::emitter(emit_position);
        let seed = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle seed"),
            contents: bytes_of(&seed_record),
            usage: wgpu::BufferUsages::VERTEX
                | wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST,
        });
        // One emitter instance, forever.
        let seed_args = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("particle seed args"),
            contents: bytes_of(&[QUAD_VERTICES, 1u32, 0u32, 0u32]),
            usage: wgpu::BufferUsages::INDIRECT | wgpu::BufferUsages::STORAGE,
        });

        log::info!(
            "allocated particle pools: 2 x {} records ({} bytes each)",
            capacity,
            pool_size
        );

        Self {
            pool: [make_pool("particle pool a"), make_pool("particle pool b")],
            args: [make_args("particle args a"), make_args("particle args b")],
            seed,
            seed_args,
            selector: Selector::new(),
            capacity,
        }
    }

    /// Advance the selector for one update.
    pub fn begin_update(&mut self, reset: bool) -> Route {
        self.selector.begin_update(reset)
    }

    /// Particle + args buffers for a simulation input.
    pub fn input(&self, input: SimInput) -> (&wgpu::Buffer, &wgpu::Buffer) {
        match input {
            SimInput::Seed => (&self.seed, &self.seed_args),
            SimInput::Slot(i) => (&self.pool[i], &self.args[i]),
        }
    }

    /// Particle + args buffers for a simulation output slot.
    pub fn output(&self, slot: usize) -> (&wgpu::Buffer, &wgpu::Buffer) {
        (&self.pool[slot], &self.args[slot])
    }

    /// The buffers `draw` reads this frame.
    pub fn current(&self) -> (&wgpu::Buffer, &wgpu::Buffer) {
        self.input(self.selector.current())
    }

    /// Zero a pair slot's live count ahead of an update that appends into
    /// it. Keeps the quad vertex count intact.
    pub fn clear_output_args(&self, queue: &wgpu::Queue, slot: usize) {
        queue.write_buffer(
            &self.args[slot],
            0,
            bytes_of(&[QUAD_VERTICES, 0u32, 0u32, 0u32]),
        );
    }

    /// Re-author the seed's emitter record, e.g. after the emit position
    /// moves, so the next reset starts from the right place.
    pub fn reauthor_seed(&self, queue: &wgpu::Queue, record: ParticleRecord) {
        queue.write_buffer(&self.seed, 0, bytes_of(&record));
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_selector_draws_the_seed() {
        let selector = Selector::new();
        assert_eq!(selector.current(), SimInput::Seed);
    }

    #[test]
    fn current_is_stable_between_updates() {
        // Drawing any number of times without an update observes the same
        // input; draw never advances state.
        let mut selector = Selector::new();
        assert_eq!(selector.current(), selector.current());

        selector.begin_update(false);
        let first = selector.current();
        for _ in 0..5 {
            assert_eq!(selector.current(), first);
        }
    }

    #[test]
    fn first_update_reads_seed_then_ping_pongs() {
        let mut selector = Selector::new();

        let r1 = selector.begin_update(false);
        assert_eq!(r1.input, SimInput::Seed);
        assert_eq!(r1.output, 0);
        assert_eq!(selector.current(), SimInput::Slot(0));

        let r2 = selector.begin_update(false);
        assert_eq!(r2.input, SimInput::Slot(0));
        assert_eq!(r2.output, 1);
        assert_eq!(selector.current(), SimInput::Slot(1));

        let r3 = selector.begin_update(false);
        assert_eq!(r3.input, SimInput::Slot(1));
        assert_eq!(r3.output, 0);
    }

    #[test]
    fn output_never_aliases_input() {
        let mut selector = Selector::new();
        for frame in 0..16 {
            let route = selector.begin_update(frame == 7);
            if let SimInput::Slot(i) = route.input {
                assert_ne!(i, route.output);
            }
        }
    }

    #[test]
    fn reset_forces_seed_input_whole_frame() {
        let mut selector = Selector::new();
        selector.begin_update(false);
        selector.begin_update(false);
        selector.begin_update(false);

        // A pending reset makes the whole next generation come from the
        // seed's lone emitter; the draw that follows sees only that output.
        let route = selector.begin_update(true);
        assert_eq!(route.input, SimInput::Seed);
        assert_eq!(selector.current(), SimInput::Slot(route.output));
    }

    #[test]
    fn every_route_has_a_bind_index() {
        let mut seen = [false; 4];
        let mut selector = Selector::new();
        seen[selector.begin_update(false).bind_index()] = true;
        seen[selector.begin_update(false).bind_index()] = true;
        seen[selector.begin_update(false).bind_index()] = true;
        seen[selector.begin_update(true).bind_index()] = true;
        // Routes seed->0, 0->1, 1->0 and seed->1 all resolve distinctly.
        assert_eq!(seen, [true; 4]);
    }
}
