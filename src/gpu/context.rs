use std::sync::Arc;
use wgpu::{Adapter, Device, Instance, Queue, Surface};

use crate::error::{SimError, SimResult};

/// GPU context holding wgpu instance, adapter, device, and queue
///
/// Device and queue are shared with the dispatcher and with whatever the host
/// renders the grid with.
pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    /// Create the wgpu instance a context (and any window surface) is built from
    pub fn create_instance() -> Instance {
        Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        })
    }

    /// Create a context without a window, blocking on adapter and device requests
    pub fn headless() -> SimResult<Self> {
        pollster::block_on(Self::request(Self::create_instance(), None))
    }

    /// Request an adapter (compatible with `compatible_surface` if given) and a device
    pub async fn request(
        instance: Instance,
        compatible_surface: Option<&Surface<'_>>,
    ) -> SimResult<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SimError::AdapterNotFound)?;

        log::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("neon-life-device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    /// Largest storage buffer a single binding may cover
    pub fn max_storage_binding_bytes(&self) -> u64 {
        self.device.limits().max_storage_buffer_binding_size as u64
    }
}
