//! The particle record and its GPU layout contract.
//!
//! One fixed record type flows through the whole pipeline: the simulation
//! stage reads and writes it as a storage array, the render stage reads the
//! very same buffer as an instance-stepped vertex stream. Both views must
//! agree on byte offsets, which is why the layout lives here in one place
//! and is asserted by tests.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Record kind for the persistent, never-rendered emitter.
pub const KIND_EMITTER: u32 = 0;
/// Record kind for the short-lived, rendered flares.
pub const KIND_FLARE: u32 = 1;

/// A single particle as stored on the GPU.
///
/// The explicit padding after each `[f32; 3]` makes the host layout
/// byte-identical to the WGSL struct
/// `{ position: vec3<f32>, velocity: vec3<f32>, size: vec2<f32>, age: f32, kind: u32 }`,
/// so no translation happens between the storage and vertex views.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleRecord {
    /// World-space position.
    pub position: [f32; 3],
    _pad0: f32,
    /// World-space velocity in units per second.
    pub velocity: [f32; 3],
    _pad1: f32,
    /// Billboard extents (width, height).
    pub size: [f32; 2],
    /// Seconds since this record was spawned.
    pub age: f32,
    /// [`KIND_EMITTER`] or [`KIND_FLARE`].
    pub kind: u32,
}

impl ParticleRecord {
    /// Byte stride of one record, shared by the vertex layout and the
    /// storage array.
    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<ParticleRecord>() as _;

    /// Vertex attributes for the instance-stepped render input.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3, // position
        },
        wgpu::VertexAttribute {
            offset: 16,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3, // velocity
        },
        wgpu::VertexAttribute {
            offset: 32,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2, // size
        },
        wgpu::VertexAttribute {
            offset: 40,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32, // age
        },
        wgpu::VertexAttribute {
            offset: 44,
            shader_location: 4,
            format: wgpu::VertexFormat::Uint32, // kind
        },
    ];

    /// The seed record: one emitter at `position` with no motion and no
    /// visual extent. Its `age` doubles as the spawn-interval accumulator.
    pub fn emitter(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            velocity: [0.0; 3],
            _pad1: 0.0,
            size: [0.0; 2],
            age: 0.0,
            kind: KIND_EMITTER,
        }
    }

    /// Vertex buffer layout for the render pipeline. One instance per
    /// record; the six quad corners come from `vertex_index`.
    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn record_stride_is_48() {
        assert_eq!(size_of::<ParticleRecord>(), 48);
        assert_eq!(ParticleRecord::STRIDE, 48);
    }

    #[test]
    fn field_offsets_match_vertex_attributes() {
        assert_eq!(offset_of!(ParticleRecord, position), 0);
        assert_eq!(offset_of!(ParticleRecord, velocity), 16);
        assert_eq!(offset_of!(ParticleRecord, size), 32);
        assert_eq!(offset_of!(ParticleRecord, age), 40);
        assert_eq!(offset_of!(ParticleRecord, kind), 44);

        for attr in ParticleRecord::ATTRIBUTES {
            let expected = match attr.shader_location {
                0 => offset_of!(ParticleRecord, position),
                1 => offset_of!(ParticleRecord, velocity),
                2 => offset_of!(ParticleRecord, size),
                3 => offset_of!(ParticleRecord, age),
                4 => offset_of!(ParticleRecord, kind),
                other => panic!("unexpected shader location {other}"),
            };
            assert_eq!(attr.offset, expected as wgpu::BufferAddress);
        }
    }

    #[test]
    fn emitter_seed_record() {
        let seed = ParticleRecord::emitter(Vec3::new(0.0, 1.0, 120.0));
        assert_eq!(seed.kind, KIND_EMITTER);
        assert_eq!(seed.position, [0.0, 1.0, 120.0]);
        assert_eq!(seed.age, 0.0);
        assert_eq!(seed.velocity, [0.0; 3]);
    }
}
