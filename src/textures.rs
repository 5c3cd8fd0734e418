//! Billboard sprite sources.
//!
//! Sprites come from image files or from the procedural generators, which
//! exist so the demo runs without any assets on disk. Either way the result
//! is an RGBA byte buffer uploaded once to an immutable 2-D texture; the
//! particle system only ever binds it read-only.

use std::path::Path;

use crate::error::TextureError;

/// Filter mode for sprite sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Nearest-neighbor, for deliberately crunchy sprites.
    Nearest,
}

impl FilterMode {
    fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Address mode for UVs outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Clamp to the edge texel (default).
    #[default]
    ClampToEdge,
    /// Tile the sprite.
    Repeat,
}

impl AddressMode {
    fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
        }
    }
}

/// An RGBA sprite ready for upload.
#[derive(Debug, Clone)]
pub struct SpriteConfig {
    /// Raw RGBA pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl SpriteConfig {
    /// Wrap raw RGBA data.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }

    /// Load a sprite from a PNG or JPEG file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?.into_rgba8();
        let (width, height) = img.dimensions();
        log::info!(
            "loaded sprite {} ({width}x{height})",
            path.as_ref().display()
        );
        Ok(Self::from_rgba(img.into_raw(), width, height))
    }

    /// Soft radial puff: white with alpha falling off smoothly from the
    /// center. The stand-in smoke sprite.
    pub fn radial_puff(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let center = (size as f32 - 1.0) / 2.0;
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - center) / center;
                let dy = (y as f32 - center) / center;
                let dist = (dx * dx + dy * dy).sqrt().min(1.0);
                let alpha = (1.0 - dist).powi(2);
                data.extend_from_slice(&[255, 255, 255, (alpha * 255.0) as u8]);
            }
        }
        Self::from_rgba(data, size, size)
    }

    /// Vertical streak: a bright core fading out sideways and toward both
    /// ends. The stand-in rain sprite.
    pub fn rain_streak(width: u32, height: u32) -> Self {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;
        for y in 0..height {
            for x in 0..width {
                let across = 1.0 - ((x as f32 - cx) / cx.max(1.0)).abs();
                let along = 1.0 - ((y as f32 - cy) / cy.max(1.0)).abs().powi(2);
                let alpha = (across.powi(2) * along).clamp(0.0, 1.0);
                data.extend_from_slice(&[200, 220, 255, (alpha * 255.0) as u8]);
            }
        }
        Self::from_rgba(data, width, height)
    }

    /// Override the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Override the address mode.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Upload as an immutable 2-D `Rgba8UnormSrgb` texture.
    pub fn create_texture(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("billboard sprite"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            &self.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: None,
            },
            size,
        );

        texture
    }

    /// Sampler matching this sprite's filter and address modes.
    pub fn create_sampler(&self, device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("billboard sprite sampler"),
            address_mode_u: self.address_mode.to_wgpu(),
            address_mode_v: self.address_mode.to_wgpu(),
            mag_filter: self.filter.to_wgpu(),
            min_filter: self.filter.to_wgpu(),
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radial_puff_is_opaque_center_transparent_edge() {
        let sprite = SpriteConfig::radial_puff(64);
        assert_eq!(sprite.data.len(), 64 * 64 * 4);

        let alpha_at = |x: u32, y: u32| sprite.data[((y * 64 + x) * 4 + 3) as usize];
        assert!(alpha_at(32, 32) > 200);
        assert!(alpha_at(0, 0) == 0);
        assert!(alpha_at(63, 31) < 30);
    }

    #[test]
    fn rain_streak_is_brightest_in_the_middle() {
        let sprite = SpriteConfig::rain_streak(8, 64);
        let alpha_at = |x: u32, y: u32| sprite.data[((y * 8 + x) * 4 + 3) as usize];
        assert!(alpha_at(4, 32) > alpha_at(0, 32));
        assert!(alpha_at(4, 32) > alpha_at(4, 0));
    }

    #[test]
    #[should_panic(expected = "RGBA data size mismatch")]
    fn from_rgba_rejects_short_data() {
        SpriteConfig::from_rgba(vec![0; 8], 2, 2);
    }
}
