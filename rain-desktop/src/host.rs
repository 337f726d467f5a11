use std::collections::HashMap;
use std::sync::Arc;

use rain::SurfaceLocator;
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoopProxy;
use winit::window::{Window, WindowId};

use crate::session::ShellEvent;

pub type HostResult<T> = Result<T, Box<dyn std::error::Error>>;

struct HostedSurface {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    locator: SurfaceLocator,
}

/// Puts a rendering surface into each window and presents its backdrop
/// through wgpu. The rain itself comes from the renderer the locator points at.
///
/// Once a surface has content worth showing the host posts
/// [`ShellEvent::SurfaceReady`]; the controller keeps windows hidden until
/// then so no blank frame flashes on screen.
pub struct GpuHost {
    instance: wgpu::Instance,
    proxy: EventLoopProxy<ShellEvent>,
    power_preference: wgpu::PowerPreference,
    surfaces: HashMap<WindowId, HostedSurface>,
}

impl GpuHost {
    pub fn new(proxy: EventLoopProxy<ShellEvent>, power_preference: wgpu::PowerPreference) -> Self {
        Self {
            instance: wgpu::Instance::default(),
            proxy,
            power_preference,
            surfaces: HashMap::new(),
        }
    }

    async fn attach(&self, window: Arc<Window>, locator: &SurfaceLocator) -> HostResult<HostedSurface> {
        let surface = self.instance.create_surface(Arc::clone(&window))?;

        let adapter = self
            .instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.power_preference,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Surface adapter: {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("rain:device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                ..Default::default()
            })
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = get_preferred_format(&capabilities).ok_or("surface reports no formats")?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        log::info!(
            "Loaded {} into {}x{} surface ({:?})",
            locator,
            config.width,
            config.height,
            format
        );

        Ok(HostedSurface {
            window,
            surface,
            device,
            queue,
            config,
            locator: locator.clone(),
        })
    }

    /// Attach the surface named by `locator`. Loading into a window that
    /// already has a surface replaces it.
    pub fn load(&mut self, window: Arc<Window>, locator: &SurfaceLocator) -> HostResult<()> {
        let window_id = window.id();
        let hosted = pollster::block_on(self.attach(window, locator))?;
        present(&hosted);
        self.surfaces.insert(window_id, hosted);

        if self.proxy.send_event(ShellEvent::SurfaceReady(window_id)).is_err() {
            log::error!("Event loop closed before surface became ready");
        }
        Ok(())
    }

    pub fn resize(&mut self, window_id: WindowId, size: PhysicalSize<u32>) {
        if let Some(hosted) = self.surfaces.get_mut(&window_id) {
            hosted.config.width = size.width.max(1);
            hosted.config.height = size.height.max(1);
            hosted.surface.configure(&hosted.device, &hosted.config);
            hosted.window.request_redraw();
        }
    }

    pub fn redraw(&mut self, window_id: WindowId) {
        if let Some(hosted) = self.surfaces.get(&window_id) {
            present(hosted);
        }
    }
}

fn present(hosted: &HostedSurface) {
    let frame = match hosted.surface.get_current_texture() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
            hosted.surface.configure(&hosted.device, &hosted.config);
            return;
        }
        Err(err) => {
            log::error!("Failed to acquire frame for {}: {}", hosted.locator, err);
            return;
        }
    };

    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = hosted
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("rain:backdrop"),
        });

    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("rain:backdrop"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    hosted.queue.submit(Some(encoder.finish()));
    hosted.window.pre_present_notify();
    frame.present();
}

fn get_preferred_format(capabilities: &wgpu::SurfaceCapabilities) -> Option<wgpu::TextureFormat> {
    let preferred_formats = [
        wgpu::TextureFormat::Rgb10a2Unorm,
        wgpu::TextureFormat::Bgra8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];

    preferred_formats
        .into_iter()
        .find(|format| capabilities.formats.contains(format))
        .or_else(|| capabilities.formats.first().copied())
}
