//! Texture atlas loading and depth-buffer helpers.

use std::path::Path;

use crate::{assets, error::VoxenError, gpu::pipeline_helpers};

/// Texture uv of `corner` within the tile at `tile`, for a square atlas
/// holding `tiles_per_row` tiles along each axis.
///
/// Corner `[0.0, 0.0]` is the tile's lower-left, `[1.0, 1.0]` its
/// upper-right. Tiles are numbered row-major from the bottom-left of the
/// atlas.
#[must_use]
pub fn tile_uv(tile: u32, corner: [f32; 2], tiles_per_row: u32) -> [f32; 2] {
    let per_row = tiles_per_row.max(1);
    let column = tile % per_row;
    let row = tile / per_row;
    let scale = 1.0 / per_row as f32;
    [
        (column as f32 + corner[0]) * scale,
        (row as f32 + corner[1]) * scale,
    ]
}

/// A tiled color atlas uploaded to the GPU, with the sampler and bind
/// group render passes need to sample it.
pub struct AtlasTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Nearest-neighbor repeat sampler.
    pub sampler: wgpu::Sampler,
    /// Bind group exposing the view and sampler to shaders.
    pub bind_group: wgpu::BindGroup,
    width: u32,
    tile_size: u32,
}

impl AtlasTexture {
    /// Decodes a PNG from the asset tree and uploads it.
    ///
    /// Rows are flipped during upload: PNG stores rows top-down while tile
    /// coordinates assume a bottom-left origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a decodable
    /// image.
    pub fn from_png(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
        tile_size: u32,
    ) -> Result<Self, VoxenError> {
        let bytes = assets::load_bytes(path)?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| {
            log::error!("failed to decode {}: {e}", path.display());
            VoxenError::Texture(format!("{}: {e}", path.display()))
        })?;
        let mut rgba = decoded.to_rgba8();
        image::imageops::flip_vertical_in_place(&mut rgba);
        Ok(Self::from_image(device, queue, &rgba, tile_size))
    }

    /// Uploads an already-decoded RGBA image as an atlas.
    #[must_use]
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &image::RgbaImage,
        tile_size: u32,
    ) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Atlas Texture"),
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
            image,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = pipeline_helpers::nearest_sampler(device, "Atlas Sampler");
        let layout = Self::bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Atlas Bind Group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        Self {
            texture,
            view,
            sampler,
            bind_group,
            width,
            tile_size,
        }
    }

    /// Layout for the atlas bind group: texture at binding 0 and sampler
    /// at binding 1, both fragment-visible.
    #[must_use]
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Atlas Bind Group Layout"),
            entries: &[
                pipeline_helpers::texture_entry(0, wgpu::ShaderStages::FRAGMENT),
                pipeline_helpers::sampler_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        })
    }

    /// Number of tiles along each axis of the atlas.
    #[must_use]
    pub fn tiles_per_row(&self) -> u32 {
        if self.tile_size == 0 {
            1
        } else {
            (self.width / self.tile_size).max(1)
        }
    }

    /// Texture uv of `corner` within the tile at `tile`.
    #[must_use]
    pub fn tile_uv(&self, tile: u32, corner: [f32; 2]) -> [f32; 2] {
        tile_uv(tile, corner, self.tiles_per_row())
    }
}

/// A depth attachment sized to match the surface.
pub struct DepthTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view, used as the depth attachment.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Depth format used by every depth attachment in the crate.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture of the given size. Zero dimensions are
    /// clamped to one texel.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Recreates the depth texture at a new size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::tile_uv;

    #[test]
    fn first_tile_spans_the_atlas_corner() {
        assert_eq!(tile_uv(0, [0.0, 0.0], 16), [0.0, 0.0]);
        assert_eq!(tile_uv(0, [1.0, 1.0], 16), [1.0 / 16.0, 1.0 / 16.0]);
    }

    #[test]
    fn tiles_advance_row_major() {
        // Tile 17 of a 16-wide atlas sits one column in, one row up.
        assert_eq!(tile_uv(17, [0.0, 0.0], 16), [1.0 / 16.0, 1.0 / 16.0]);
    }

    #[test]
    fn single_tile_atlas_uses_full_range() {
        assert_eq!(tile_uv(0, [0.5, 0.5], 1), [0.5, 0.5]);
    }

    #[test]
    fn zero_tiles_per_row_is_treated_as_one() {
        assert_eq!(tile_uv(0, [1.0, 1.0], 0), [1.0, 1.0]);
    }
}
