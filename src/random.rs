//! The random source.
//!
//! Shader stages have no randomness of their own, so spawn variation comes
//! from a table of uniform samples generated host-side once and uploaded as
//! an immutable 1-D texture. The simulation stage reads it with
//! `textureLoad` at a wrapped index derived from the running time, which
//! keeps the table shareable across any number of systems.

use bytemuck::cast_slice;

/// A table of 4-component samples uniformly distributed in [-1, 1].
#[derive(Debug, Clone)]
pub struct RandomTable {
    samples: Vec<[f32; 4]>,
}

impl RandomTable {
    /// Table length that comfortably decorrelates spawns at any sane frame
    /// rate.
    pub const DEFAULT_LEN: u32 = 1024;

    /// Generate `len` samples from `seed`. Deterministic: the same inputs
    /// always produce the same table.
    pub fn new(len: u32, seed: u32) -> Self {
        let samples = (0..len)
            .map(|i| {
                let base = i.wrapping_mul(4).wrapping_add(seed.wrapping_mul(0x9E37_79B9));
                [
                    unit_sample(base),
                    unit_sample(base.wrapping_add(1)),
                    unit_sample(base.wrapping_add(2)),
                    unit_sample(base.wrapping_add(3)),
                ]
            })
            .collect();
        Self { samples }
    }

    /// Number of samples in the table.
    pub fn len(&self) -> u32 {
        self.samples.len() as u32
    }

    /// Whether the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The raw samples.
    pub fn samples(&self) -> &[[f32; 4]] {
        &self.samples
    }

    /// Upload the table as an immutable 1-D `Rgba32Float` texture. Written
    /// exactly once; every consumer binds it read-only.
    pub fn create_texture(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("random table"),
            size: wgpu::Extent3d {
                width: self.len(),
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D1,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            cast_slice(&self.samples),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: None,
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: self.len(),
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        log::info!("uploaded random table with {} samples", self.len());
        texture
    }
}

/// Hash `seed` into a single sample in [-1, 1].
fn unit_sample(seed: u32) -> f32 {
    let mut n = seed
        .wrapping_mul(374_761_393)
        .wrapping_add(0x68E3_1DA4);
    n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    let unit = (n & 0x00FF_FFFF) as f32 / 0x00FF_FFFF as f32;
    unit * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_cover_unit_range() {
        let table = RandomTable::new(RandomTable::DEFAULT_LEN, 7);
        assert_eq!(table.len(), RandomTable::DEFAULT_LEN);
        for sample in table.samples() {
            for &component in sample {
                assert!((-1.0..=1.0).contains(&component), "out of range: {component}");
            }
        }
    }

    #[test]
    fn deterministic_for_a_seed() {
        let a = RandomTable::new(64, 42);
        let b = RandomTable::new(64, 42);
        assert_eq!(a.samples(), b.samples());

        let c = RandomTable::new(64, 43);
        assert_ne!(a.samples(), c.samples());
    }

    #[test]
    fn samples_are_not_degenerate() {
        // A table that never leaves one quadrant would make every spawn
        // drift the same way.
        let table = RandomTable::new(256, 3);
        let positives = table
            .samples()
            .iter()
            .flatten()
            .filter(|&&v| v > 0.0)
            .count();
        let total = table.samples().len() * 4;
        assert!(positives > total / 4);
        assert!(positives < 3 * total / 4);
    }
}
