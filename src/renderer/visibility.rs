//! GPU visibility culling over the chunk grid.

use crate::{
    error::VoxenError,
    gpu::{
        compute::ComputeJob, render_context::RenderContext,
        shader_composer::ShaderComposer,
    },
};

const VISIBILITY_SHADER: &str =
    include_str!("../../assets/shaders/chunk_visibility.wgsl");

/// Threads per culling workgroup; matches the shader's workgroup size.
const WORKGROUP_SIZE: u32 = 64;

const HEADER_SIZE: u64 = size_of::<CullHeader>() as u64;
const ORIGIN_SIZE: u64 = size_of::<[i32; 4]>() as u64;
const FLAG_SIZE: u64 = size_of::<u32>() as u64;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CullHeader {
    /// Eye chunk coordinates in xyz; w carries the render radius.
    eye_chunk: [i32; 4],
    count: u32,
    _pad: [u32; 3],
}

/// Chunk-grid coordinate containing the world coordinate `x`.
///
/// World coordinates round to the nearest block before the divide, so
/// positions within half a block of a boundary land in the chunk their
/// block belongs to.
#[must_use]
pub fn chunk_coord(x: f32, chunk_size: u32) -> i32 {
    (x.round() / chunk_size as f32).floor() as i32
}

/// Origins of the `(2r + 1)²` chunk columns centered on
/// `(center_x, center_z)`, in chunk coordinates with y fixed to zero.
///
/// Each origin is padded to four lanes for direct storage-buffer upload.
#[must_use]
pub fn grid_origins(center_x: i32, center_z: i32, radius: i32) -> Vec<[i32; 4]> {
    let mut origins =
        Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)).max(0) as usize);
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            origins.push([center_x + dx, 0, center_z + dz, 0]);
        }
    }
    origins
}

/// Flags chunks visible when their Chebyshev distance from the eye's
/// chunk, in chunk-grid steps, is within the render radius.
///
/// The culler owns a [`ComputeJob`] sized for `max_chunks`; results come
/// back one flag word per chunk through the job's staging buffer.
pub struct VisibilityCuller {
    job: ComputeJob,
    max_chunks: u32,
    in_flight_count: u32,
}

impl VisibilityCuller {
    /// Compose the culling shader and size the job's buffers for
    /// `max_chunks` chunk origins.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::ShaderCompose` if the culling shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        max_chunks: u32,
    ) -> Result<Self, VoxenError> {
        let shader = composer.compose(
            &context.device,
            "Chunk Visibility Shader",
            VISIBILITY_SHADER,
            "shaders/chunk_visibility.wgsl",
        )?;
        let job = ComputeJob::new(
            &context.device,
            &shader,
            "cs_main",
            HEADER_SIZE + u64::from(max_chunks) * ORIGIN_SIZE,
            u64::from(max_chunks.max(1)) * FLAG_SIZE,
            "Chunk Visibility",
        );
        Ok(Self {
            job,
            max_chunks,
            in_flight_count: 0,
        })
    }

    /// Upload the cull parameters and record the dispatch plus the
    /// output copy for readback.
    ///
    /// Origins beyond the job's `max_chunks` capacity are dropped with a
    /// warning.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        eye_chunk: [i32; 3],
        radius: i32,
        origins: &[[i32; 4]],
    ) {
        let mut count = origins.len();
        if count > self.max_chunks as usize {
            log::warn!(
                "culling {count} chunks exceeds capacity {}, truncating",
                self.max_chunks
            );
            count = self.max_chunks as usize;
        }
        let header = CullHeader {
            eye_chunk: [eye_chunk[0], eye_chunk[1], eye_chunk[2], radius],
            count: count as u32,
            _pad: [0; 3],
        };
        let mut bytes =
            Vec::with_capacity(HEADER_SIZE as usize + count * ORIGIN_SIZE as usize);
        bytes.extend_from_slice(bytemuck::bytes_of(&header));
        bytes.extend_from_slice(bytemuck::cast_slice(&origins[..count]));
        self.job.write_input_bytes(queue, &bytes);

        self.in_flight_count = count as u32;
        self.job.dispatch_for(encoder, count as u32, WORKGROUP_SIZE);
        self.job.copy_output(encoder);
    }

    /// Request mapping of the copied flags. Call after submitting the
    /// encoder that recorded [`encode`](Self::encode).
    pub fn begin_readback(&mut self) {
        self.job.begin_readback();
    }

    /// Poll for the visibility flags, one word per origin passed to the
    /// last `encode` (nonzero means visible).
    ///
    /// Returns `Ok(None)` while the map is still in flight.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Readback` if the buffer map failed.
    pub fn try_flags(
        &mut self,
        device: &wgpu::Device,
    ) -> Result<Option<Vec<u32>>, VoxenError> {
        let count = self.in_flight_count as usize;
        Ok(self
            .job
            .try_readback::<u32>(device)?
            .map(|mut flags| {
                flags.truncate(count);
                flags
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::{chunk_coord, grid_origins, CullHeader};

    #[test]
    fn header_matches_shader_struct_size() {
        // vec4<i32> + u32 + 3 pad words
        assert_eq!(size_of::<CullHeader>(), 32);
    }

    #[test]
    fn chunk_coord_floors_toward_negative_infinity() {
        assert_eq!(chunk_coord(0.0, 16), 0);
        assert_eq!(chunk_coord(13.4, 16), 0);
        assert_eq!(chunk_coord(16.2, 16), 1);
        assert_eq!(chunk_coord(-0.4, 16), 0);
        assert_eq!(chunk_coord(-8.6, 16), -1);
        assert_eq!(chunk_coord(-16.5, 16), -2);
    }

    #[test]
    fn grid_covers_the_square_around_the_center() {
        let origins = grid_origins(3, -2, 2);
        assert_eq!(origins.len(), 25);
        assert!(origins.contains(&[3, 0, -2, 0]));
        assert!(origins.contains(&[1, 0, -4, 0]));
        assert!(origins.contains(&[5, 0, 0, 0]));
        assert!(origins.iter().all(|o| o[1] == 0));
    }

    #[test]
    fn zero_radius_grid_is_the_center_column() {
        assert_eq!(grid_origins(7, 9, 0), vec![[7, 0, 9, 0]]);
    }
}
