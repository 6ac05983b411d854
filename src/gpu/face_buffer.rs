//! Face-quad geometry staging and growable GPU buffers.
//!
//! Chunk meshers emit block faces on the CPU, either as flat triangle
//! lists (6 vertices per face) or as indexed quads (4 vertices plus 6
//! indices per face). Staging batches are consumed by `upload`, so the
//! CPU copy is dropped as soon as the GPU owns the data. [`FaceBuffer`]
//! covers the streaming case: a buffer that grows 2x when a remesh
//! produces more data and never shrinks.

use wgpu::util::DeviceExt;

/// Vertices in one unindexed face (two triangles).
pub const VERTS_PER_FACE: usize = 6;

/// Vertices in one indexed face (a quad).
pub const VERTS_PER_INDEXED_FACE: usize = 4;

/// Indices in one indexed face (two triangles into the quad).
pub const INDICES_PER_FACE: usize = 6;

/// One vertex of a block face.
///
/// `ao` and `light` are baked by the mesher: ambient occlusion from the
/// three neighboring blocks of each corner, light from the propagation
/// pass. The fragment shader multiplies both into the atlas sample.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FaceVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Tile atlas texture coordinates.
    pub uv: [f32; 2],
    /// Ambient occlusion factor (0 = fully occluded, 1 = open).
    pub ao: f32,
    /// Baked light level.
    pub light: f32,
}

/// Vertex buffer layout matching the chunk shader's inputs.
#[must_use]
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<FaceVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0, // position
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1, // normal
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2, // uv
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 32,
                shader_location: 3, // ao
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 36,
                shader_location: 4, // light
            },
        ],
    }
}

/// Indices for `faces` quads: two counter-clockwise triangles per quad.
#[must_use]
pub fn quad_indices(faces: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(faces * INDICES_PER_FACE);
    for face in 0..faces as u32 {
        let base = face * VERTS_PER_INDEXED_FACE as u32;
        indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }
    indices
}

/// CPU staging for unindexed faces (6 vertices each).
///
/// Used for one-off geometry like the player model and sign quads, where
/// the duplicate corner vertices cost less than an index buffer.
pub struct FaceBatch<V> {
    vertices: Vec<V>,
}

impl<V: bytemuck::Pod> FaceBatch<V> {
    /// Staging sized for `faces` faces.
    #[must_use]
    pub fn with_faces(faces: usize) -> Self {
        Self { vertices: Vec::with_capacity(faces * VERTS_PER_FACE) }
    }

    /// Append one face as two explicit triangles.
    pub fn push_face(&mut self, corners: [V; VERTS_PER_FACE]) {
        self.vertices.extend_from_slice(&corners);
    }

    /// Number of complete faces staged.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTS_PER_FACE
    }

    /// Number of staged vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Staged vertices, in push order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Upload to a vertex buffer, consuming the staging copy.
    #[must_use]
    pub fn upload(self, device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        })
    }
}

/// A static indexed mesh: vertex buffer, index buffer, index count.
pub struct FaceMesh {
    /// Quad corner vertices.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle indices into the vertex buffer (`Uint32`).
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

/// CPU staging for indexed faces (4 vertices each).
///
/// Chunk meshes use this form: corner vertices are shared between the
/// two triangles of each quad, and [`quad_indices`] supplies the index
/// pattern at upload time.
pub struct IndexedFaceBatch<V> {
    vertices: Vec<V>,
}

impl<V: bytemuck::Pod> IndexedFaceBatch<V> {
    /// Staging sized for `faces` faces.
    #[must_use]
    pub fn with_faces(faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(faces * VERTS_PER_INDEXED_FACE),
        }
    }

    /// Append one face as four quad corners, in counter-clockwise order.
    pub fn push_face(&mut self, corners: [V; VERTS_PER_INDEXED_FACE]) {
        self.vertices.extend_from_slice(&corners);
    }

    /// Number of complete faces staged.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTS_PER_INDEXED_FACE
    }

    /// Number of staged vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Staged vertices, in push order.
    #[must_use]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Triangle indices for the staged faces.
    #[must_use]
    pub fn indices(&self) -> Vec<u32> {
        quad_indices(self.face_count())
    }

    /// Upload to vertex and index buffers, consuming the staging copy.
    #[must_use]
    pub fn upload(self, device: &wgpu::Device, label: &str) -> FaceMesh {
        let indices = self.indices();
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        FaceMesh {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// A GPU buffer that grows as remeshes produce more data.
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct FaceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl FaceBuffer {
    /// Buffer with the given initial byte capacity.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(64); // Minimum 64 bytes

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Write data to the buffer, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups and
    /// buffer slices held elsewhere need recreation).
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let reallocated = if needed > self.capacity {
            // 2x growth, minimum 1KB step
            let new_capacity = (needed * 2).max(self.capacity + 1024);

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.len = needed;

        reallocated
    }

    /// The underlying GPU buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Current data length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no data has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32) -> FaceVertex {
        FaceVertex {
            position: [x, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
            ao: 1.0,
            light: 1.0,
        }
    }

    #[test]
    fn face_vertex_is_tightly_packed() {
        assert_eq!(size_of::<FaceVertex>(), 40);
    }

    #[test]
    fn layout_covers_the_whole_vertex() {
        let layout = vertex_buffer_layout();
        assert_eq!(layout.array_stride, 40);
        assert_eq!(layout.attributes.len(), 5);
        // Last attribute is the trailing f32.
        let last = layout.attributes[layout.attributes.len() - 1];
        assert_eq!(last.offset, 36);
    }

    #[test]
    fn quad_indices_walk_two_triangles_per_face() {
        assert_eq!(
            quad_indices(2),
            vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]
        );
        assert!(quad_indices(0).is_empty());
    }

    #[test]
    fn flat_batch_counts_faces() {
        let mut batch = FaceBatch::with_faces(2);
        assert!(batch.is_empty());
        batch.push_face([vertex(0.0); VERTS_PER_FACE]);
        assert_eq!(batch.face_count(), 1);
        assert_eq!(batch.vertex_count(), 6);
    }

    #[test]
    fn indexed_batch_counts_faces_and_indices() {
        let mut batch = IndexedFaceBatch::with_faces(3);
        batch.push_face([vertex(0.0); VERTS_PER_INDEXED_FACE]);
        batch.push_face([vertex(1.0); VERTS_PER_INDEXED_FACE]);
        assert_eq!(batch.face_count(), 2);
        assert_eq!(batch.vertex_count(), 8);
        let indices = batch.indices();
        assert_eq!(indices.len(), 12);
        // Every index addresses a staged vertex.
        let max = indices.iter().max().copied().unwrap_or(0);
        assert!((max as usize) < batch.vertex_count());
    }
}
