use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::error::{SimError, SimResult};
use crate::simulation::{GpuCell, PassUniforms};

const CELL_BYTES: u64 = std::mem::size_of::<GpuCell>() as u64;

/// Size in bytes of a `grid_size x grid_size` grid buffer
pub fn grid_buffer_bytes(grid_size: u32) -> u64 {
    grid_size as u64 * grid_size as u64 * CELL_BYTES
}

/// Create one zero-initialized grid storage buffer
///
/// COPY_SRC lets `read_cells` copy it into a staging buffer.
pub fn create_grid_buffer(device: &Device, grid_size: u32) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("grid-buffer"),
        size: grid_buffer_bytes(grid_size),
        usage: BufferUsages::STORAGE | BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    })
}

/// Create the uniform buffer holding one pass snapshot
pub fn create_uniform_buffer(device: &Device) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("pass-uniforms-buffer"),
        size: std::mem::size_of::<PassUniforms>() as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Copy a grid buffer into host memory, blocking until the GPU is done
pub fn read_cells(device: &Device, queue: &Queue, buffer: &Buffer) -> SimResult<Vec<GpuCell>> {
    let size = buffer.size();
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("grid-readback-buffer"),
        size,
        usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("grid-readback-encoder"),
    });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device.poll(wgpu::Maintain::Wait);

    match rx.recv() {
        Ok(result) => result?,
        Err(_) => return Err(SimError::ReadbackInterrupted),
    }

    let cells = {
        let data = slice.get_mapped_range();
        data.chunks_exact(CELL_BYTES as usize)
            .map(bytemuck::pod_read_unaligned::<GpuCell>)
            .collect()
    };
    staging.unmap();
    Ok(cells)
}
