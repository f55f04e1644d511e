use std::sync::Arc;
use wgpu::{BindGroupLayout, Buffer, ComputePipeline, Device, Queue};

use crate::config::WORKGROUP_SIZE;
use crate::error::{SimError, SimResult};
use crate::gpu::buffers;
use crate::gpu::context::GpuContext;
use crate::simulation::{GpuCell, GridDispatcher, PassUniforms};

/// Bindings of `shaders/sim.wgsl`
const SOURCE_BINDING: u32 = 0;
const DEST_BINDING: u32 = 1;
const UNIFORMS_BINDING: u32 = 2;

fn cells_layout_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<GpuCell>() as u64),
        },
        count: None,
    }
}

/// Runs kernel passes as wgpu compute dispatches on storage buffers.
///
/// Every pass is submitted on its own, after its uniform snapshot is written,
/// so queue order keeps consecutive passes strictly sequential.
pub struct WgpuDispatcher {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline: ComputePipeline,
    layout: BindGroupLayout,
    uniform_buffer: Buffer,
    max_grid_bytes: u64,
}

impl WgpuDispatcher {
    pub fn new(context: &GpuContext) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sim-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sim.wgsl").into()),
        });

        // One pass reads the current buffer and writes the other
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sim-pass-layout"),
            entries: &[
                cells_layout_entry(SOURCE_BINDING, true),
                cells_layout_entry(DEST_BINDING, false),
                wgpu::BindGroupLayoutEntry {
                    binding: UNIFORMS_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<PassUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sim-pipeline-layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("sim-pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
            pipeline,
            layout,
            uniform_buffer: buffers::create_uniform_buffer(device),
            max_grid_bytes: context.max_storage_binding_bytes(),
        }
    }

    /// Read a grid buffer back into host memory
    pub fn read_cells(&self, buffer: &Buffer) -> SimResult<Vec<GpuCell>> {
        buffers::read_cells(&self.device, &self.queue, buffer)
    }
}

impl GridDispatcher for WgpuDispatcher {
    type Buffer = Buffer;

    fn create_grid_buffer(&mut self, grid_size: u32) -> SimResult<Buffer> {
        let bytes = buffers::grid_buffer_bytes(grid_size);
        if bytes > self.max_grid_bytes {
            return Err(SimError::GridTooLarge {
                grid_size,
                bytes,
                limit: self.max_grid_bytes,
            });
        }
        Ok(buffers::create_grid_buffer(&self.device, grid_size))
    }

    fn run_full_grid_pass(
        &mut self,
        source: &Buffer,
        dest: &mut Buffer,
        uniforms: &PassUniforms,
    ) -> SimResult<()> {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        // Rebuilt per pass since source and dest trade places every time
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sim-pass-bind-group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: SOURCE_BINDING,
                    resource: source.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: DEST_BINDING,
                    resource: dest.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: UNIFORMS_BINDING,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let workgroups = uniforms.grid_size.div_ceil(WORKGROUP_SIZE);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sim-pass-encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("sim-pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(workgroups, workgroups, 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn release_grid_buffer(&mut self, buffer: Buffer) {
        buffer.destroy();
    }
}
