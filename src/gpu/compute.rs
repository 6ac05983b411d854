//! Compute dispatch with paired storage buffers and staged readback.
//!
//! A [`ComputeJob`] owns one compute pipeline plus its input (read-only
//! storage at binding 0) and output (read-write storage at binding 1)
//! buffers, and a `MAP_READ` staging buffer for getting results back to
//! the CPU. Readback is two-phase so the render loop never blocks on the
//! GPU: [`ComputeJob::begin_readback`] after submit, then
//! [`ComputeJob::try_readback`] on following frames until data lands.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::error::VoxenError;
use crate::gpu::pipeline_helpers;

const MAP_PENDING: u8 = 0;
const MAP_READY: u8 = 1;
const MAP_FAILED: u8 = 2;

/// Workgroups needed to cover `items` at `workgroup_size` threads each.
#[must_use]
pub fn workgroup_count(items: u32, workgroup_size: u32) -> u32 {
    items.div_ceil(workgroup_size)
}

/// A compute pipeline with fixed-size input/output storage buffers.
pub struct ComputeJob {
    pipeline: wgpu::ComputePipeline,
    input_buffer: wgpu::Buffer,
    output_buffer: wgpu::Buffer,
    /// Staging buffer for reading back output data
    staging_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    label: String,
    input_size: u64,
    output_size: u64,
    /// Whether a readback is in flight (buffer mapping requested)
    readback_in_flight: bool,
    /// State set by the callback when buffer mapping completes
    map_state: Arc<AtomicU8>,
}

impl ComputeJob {
    /// Create a job for `shader`'s `entry_point` with the given buffer
    /// sizes in bytes.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        entry_point: &str,
        input_size: u64,
        output_size: u64,
        label: &str,
    ) -> Self {
        let input_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Input Buffer")),
            size: input_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Output Buffer")),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Staging Buffer")),
            size: output_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Bind Group Layout")),
                entries: &[
                    pipeline_helpers::storage_read_entry(
                        0,
                        wgpu::ShaderStages::COMPUTE,
                    ),
                    pipeline_helpers::storage_write_entry(
                        1,
                        wgpu::ShaderStages::COMPUTE,
                    ),
                ],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline = pipeline_helpers::create_compute_pipeline(
            device,
            label,
            shader,
            entry_point,
            &[&bind_group_layout],
        );

        Self {
            pipeline,
            input_buffer,
            output_buffer,
            staging_buffer,
            bind_group,
            label: label.to_owned(),
            input_size,
            output_size,
            readback_in_flight: false,
            map_state: Arc::new(AtomicU8::new(MAP_PENDING)),
        }
    }

    /// Input buffer capacity in bytes.
    #[must_use]
    pub fn input_size(&self) -> u64 {
        self.input_size
    }

    /// Output buffer capacity in bytes.
    #[must_use]
    pub fn output_size(&self) -> u64 {
        self.output_size
    }

    /// Upload typed data to the input storage buffer.
    pub fn write_input<T: bytemuck::Pod>(
        &self,
        queue: &wgpu::Queue,
        data: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        debug_assert!(
            bytes.len() as u64 <= self.input_size,
            "input data exceeds buffer capacity"
        );
        queue.write_buffer(&self.input_buffer, 0, bytes);
    }

    /// Upload raw bytes to the input storage buffer.
    pub fn write_input_bytes(&self, queue: &wgpu::Queue, data: &[u8]) {
        debug_assert!(
            data.len() as u64 <= self.input_size,
            "input data exceeds buffer capacity"
        );
        queue.write_buffer(&self.input_buffer, 0, data);
    }

    /// Record a dispatch with an explicit workgroup grid.
    pub fn dispatch(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        workgroups: (u32, u32, u32),
    ) {
        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&self.label),
                timestamp_writes: None,
            });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.dispatch_workgroups(workgroups.0, workgroups.1, workgroups.2);
    }

    /// Record a one-dimensional dispatch covering `items` work items.
    ///
    /// Does nothing for an empty workload.
    pub fn dispatch_for(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        items: u32,
        workgroup_size: u32,
    ) {
        if items == 0 {
            return;
        }
        self.dispatch(encoder, (workgroup_count(items, workgroup_size), 1, 1));
    }

    /// Record a copy of the output buffer into the readback staging buffer.
    pub fn copy_output(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_buffer_to_buffer(
            &self.output_buffer,
            0,
            &self.staging_buffer,
            0,
            self.output_size,
        );
    }

    /// Start async readback (call after the encoder is submitted).
    /// Initiates the staging buffer mapping without blocking; at most one
    /// readback is in flight at a time.
    pub fn begin_readback(&mut self) {
        if self.readback_in_flight {
            return;
        }
        self.readback_in_flight = true;
        self.map_state.store(MAP_PENDING, Ordering::SeqCst);
        let map_state = self.map_state.clone();
        let buffer_slice = self.staging_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            match result {
                Ok(()) => map_state.store(MAP_READY, Ordering::SeqCst),
                Err(e) => {
                    log::warn!("compute readback map failed: {e}");
                    map_state.store(MAP_FAILED, Ordering::SeqCst);
                }
            }
        });
    }

    /// Try to complete the readback without blocking.
    ///
    /// Returns `Ok(Some(data))` once the staging buffer is mapped,
    /// `Ok(None)` while the map is still pending (or none was started).
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Readback` if the map failed; the in-flight
    /// latch is cleared so the caller may start another readback.
    pub fn try_readback<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
    ) -> Result<Option<Vec<T>>, VoxenError> {
        if !self.readback_in_flight {
            return Ok(None);
        }

        // Poll without waiting - process map callbacks
        let _ = device.poll(wgpu::PollType::Poll);

        match self.map_state.load(Ordering::SeqCst) {
            MAP_READY => {
                let buffer_slice = self.staging_buffer.slice(..);
                let data = buffer_slice.get_mapped_range();
                let out = bytemuck::cast_slice(&data[..]).to_vec();
                drop(data);
                self.staging_buffer.unmap();
                self.readback_in_flight = false;
                Ok(Some(out))
            }
            MAP_FAILED => {
                self.readback_in_flight = false;
                Err(VoxenError::Readback(format!(
                    "{} staging buffer map failed",
                    self.label
                )))
            }
            _ => Ok(None),
        }
    }

    /// Read the output buffer, blocking until the GPU finishes.
    ///
    /// Intended for tools and tests; the render loop should prefer the
    /// [`Self::begin_readback`] / [`Self::try_readback`] pair.
    ///
    /// # Errors
    ///
    /// Returns `VoxenError::Readback` if the device wait or the buffer
    /// map fails.
    pub fn read_output<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
    ) -> Result<Vec<T>, VoxenError> {
        self.begin_readback();
        let _ = device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| VoxenError::Readback(e.to_string()))?;

        match self.try_readback(device)? {
            Some(data) => Ok(data),
            None => {
                self.readback_in_flight = false;
                Err(VoxenError::Readback(format!(
                    "{} map callback never completed",
                    self.label
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workgroup_count_rounds_up() {
        assert_eq!(workgroup_count(0, 64), 0);
        assert_eq!(workgroup_count(1, 64), 1);
        assert_eq!(workgroup_count(64, 64), 1);
        assert_eq!(workgroup_count(65, 64), 2);
        assert_eq!(workgroup_count(961, 64), 16);
    }
}
