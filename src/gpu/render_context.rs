use std::fmt;

/// Errors that can occur during GPU context initialization.
#[derive(Debug)]
pub enum RenderContextError {
    /// Failed to create a wgpu surface from the window handle.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// GPU device request failed (limits or features not met).
    DeviceRequest(wgpu::RequestDeviceError),
    /// Surface configuration not supported by the selected adapter.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Pick the presentation format: a non-sRGB format when `linear_output`
/// is requested (shader output is written as-is), otherwise an sRGB one.
/// Falls back to the first supported format.
#[must_use]
pub fn select_surface_format(
    formats: &[wgpu::TextureFormat],
    linear_output: bool,
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() != linear_output)
        .or_else(|| formats.first().copied())
}

/// A presentation surface and its configuration.
pub struct SurfaceState {
    /// The surface.
    pub surface: wgpu::Surface<'static>,
    /// Current configuration (format, size, present mode).
    pub config: wgpu::SurfaceConfiguration,
}

impl SurfaceState {
    fn configure(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: (u32, u32),
        linear_output: bool,
    ) -> Result<Self, RenderContextError> {
        let caps = surface.get_capabilities(adapter);
        let format = select_surface_format(&caps.formats, linear_output)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(device, &config);
        Ok(Self { surface, config })
    }

    /// Reconfigure for a new size. Ignores zero-sized dimensions.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(device, &self.config);
        }
    }

    /// Acquire the next texture to draw into.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated or
    /// timed out.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Reconfigure with the current configuration (after `Lost`/`Outdated`).
    pub fn reconfigure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }
}

/// Owns the core wgpu resources: instance, adapter, device, queue and the
/// main presentation surface.
pub struct RenderContext {
    /// The wgpu instance, kept to create further surfaces.
    pub instance: wgpu::Instance,
    /// The adapter the device was created from.
    pub adapter: wgpu::Adapter,
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    /// The main surface and its configuration.
    pub main: SurfaceState,
}

impl RenderContext {
    /// Create a new render context from the given window surface target and
    /// initial size.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if surface creation, adapter request,
    /// device request, or surface configuration fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        linear_output: bool,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let main = SurfaceState::configure(
            surface,
            &adapter,
            &device,
            initial_size,
            linear_output,
        )?;
        let config = &main.config;
        log::info!(
            "GPU context ready: {} ({:?}), surface {:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format,
            config.width,
            config.height
        );

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            main,
        })
    }

    /// Create and configure a further surface on the same device, e.g. the
    /// view cube's own canvas.
    ///
    /// # Errors
    ///
    /// Returns `RenderContextError` if the surface cannot be created or the
    /// adapter cannot present to it.
    pub fn create_secondary_surface(
        &self,
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        linear_output: bool,
    ) -> Result<SurfaceState, RenderContextError> {
        let surface = self
            .instance
            .create_surface(target)
            .map_err(RenderContextError::SurfaceCreation)?;
        if !self.adapter.is_surface_supported(&surface) {
            return Err(RenderContextError::UnsupportedSurface);
        }
        SurfaceState::configure(
            surface,
            &self.adapter,
            &self.device,
            size,
            linear_output,
        )
    }

    /// The main surface texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.main.config.format
    }

    /// Main surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.main.config.width, self.main.config.height)
    }

    /// Reconfigure the main surface for the new window size. Ignores
    /// zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.main.resize(&self.device, width, height);
    }

    /// Acquire the next main swapchain texture for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated,
    /// or timed out.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.main.get_next_frame()
    }

    /// Create a new command encoder for recording GPU commands.
    pub fn create_encoder(&self) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            })
    }

    /// Finish the encoder and submit its command buffer to the GPU queue.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use wgpu::TextureFormat as F;

    use super::*;

    #[test]
    fn linear_output_prefers_unorm() {
        let formats = [F::Bgra8UnormSrgb, F::Bgra8Unorm];
        assert_eq!(select_surface_format(&formats, true), Some(F::Bgra8Unorm));
        assert_eq!(
            select_surface_format(&formats, false),
            Some(F::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        assert_eq!(
            select_surface_format(&[F::Rgba8UnormSrgb], true),
            Some(F::Rgba8UnormSrgb)
        );
        assert_eq!(select_surface_format(&[], true), None);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            RenderContextError::UnsupportedSurface.to_string(),
            "surface configuration not supported by adapter"
        );
    }
}
