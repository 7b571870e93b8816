/// GPU setup knobs, passed to [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,
    /// The transmission pass samples a full-resolution buffer every frame;
    /// a discrete GPU is preferred when there is one.
    pub power_preference: wgpu::PowerPreference,
    /// Colors and images are linear; an sRGB surface does the encode on store.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// `None` takes the first mode the surface reports.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_limits: wgpu::Limits,
    /// Hint only.
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: None,
            required_limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}
