//! Chunk face-mesh draw pass.

use wgpu::util::DeviceExt;

use crate::{
    error::VoxenError,
    gpu::{
        face_buffer::FaceMesh, pipeline_helpers, render_context::RenderContext,
        shader_composer::ShaderComposer, texture::AtlasTexture,
    },
    renderer::camera::{Camera, CameraUniform},
};

const CHUNK_SHADER: &str = include_str!("../../assets/shaders/chunk.wgsl");

/// Draws chunk face meshes textured from the block atlas.
///
/// Owns the chunk pipeline and the camera uniform binding at group 0;
/// the atlas binds at group 1.
pub struct ChunkRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl ChunkRenderer {
    /// Compose the chunk shader and build the pipeline and camera
    /// binding.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::ShaderCompose` if the chunk shader fails to
    /// compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, VoxenError> {
        let device = &context.device;
        let shader =
            composer.compose(device, "Chunk Shader", CHUNK_SHADER, "shaders/chunk.wgsl")?;

        let uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let atlas_layout = AtlasTexture::bind_group_layout(device);
        let pipeline = pipeline_helpers::create_face_pipeline(
            device,
            "Chunk",
            &shader,
            context.format(),
            &[&camera_layout, &atlas_layout],
        );

        Ok(Self {
            pipeline,
            uniform,
            camera_buffer,
            camera_bind_group,
        })
    }

    /// Upload the camera state for this frame.
    pub fn update_camera(&mut self, queue: &wgpu::Queue, camera: &Camera, aspect: f32) {
        self.uniform.update_view_proj(camera, aspect);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    /// Set pipeline and bind groups, then draw one indexed mesh.
    ///
    /// The pass must target a color attachment in the context's surface
    /// format plus a [`DepthTexture`](crate::gpu::texture::DepthTexture)
    /// attachment.
    pub fn record<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        atlas: &'a AtlasTexture,
        mesh: &'a FaceMesh,
    ) {
        if mesh.index_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &atlas.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass
            .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
