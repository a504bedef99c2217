//! Terrascape - procedural terrain viewer

use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use terrascape::config::DemoConfig;
use terrascape::core::{
    camera::{OrbitCamera, Projection, ProjectionKind},
    input::InputState,
    logging,
    time::FrameTimer,
    DVec3, Error, Result,
};
use terrascape::render::{context::GpuContext, TerrainRenderer};
use terrascape::scene::TerrainScene;
use terrascape::terrain::GenerationSettings;

/// Everything that only exists once a window is up
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: TerrainRenderer,
}

struct App {
    config: DemoConfig,
    graphics: Option<Graphics>,
    scene: TerrainScene,
    camera: OrbitCamera,
    projection: Projection,
    input: InputState,
    timer: FrameTimer,
    /// Set once exit was requested; queued redraws are dropped after this
    closing: bool,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let projection = Projection::new(
            config.scene.projection,
            config.window.width,
            config.window.height,
        );
        Self {
            graphics: None,
            scene: TerrainScene::new(config.scene.clone()),
            camera: OrbitCamera::new(DVec3::ZERO, config.scene.camera_distance),
            projection,
            input: InputState::new(),
            timer: FrameTimer::default(),
            closing: false,
            config,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let (width, height) = gpu.size();
        self.projection.set_viewport(width, height);

        log::info!("Window created: {}x{}", width, height);
        log::info!("GPU: {}", gpu.adapter.get_info().name);

        let mut renderer = TerrainRenderer::new(&gpu.device, gpu.format(), width, height, &self.config.render)?;

        self.scene.load()?;
        renderer.upload(&gpu.device, self.scene.mesh()?, self.current_generation()?);

        self.graphics = Some(Graphics { window, gpu, renderer });
        Ok(())
    }

    fn current_generation(&self) -> Result<u64> {
        self.scene.generation().ok_or(Error::NotLoaded("upload"))
    }

    /// Rebuild the mesh with new settings and push it to the GPU
    fn regenerate(&mut self, settings: GenerationSettings) -> Result<()> {
        log::info!(
            "Regenerating: octaves={} amplitude={:.3} frequency={:.3} seed={}",
            settings.octaves, settings.amplitude, settings.frequency, settings.seed
        );
        self.scene.regenerate(settings)?;
        let generation = self.current_generation()?;
        if let Some(graphics) = &mut self.graphics {
            graphics.renderer.upload(&graphics.gpu.device, self.scene.mesh()?, generation);
        }
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => self.shutdown(event_loop),
            KeyCode::Enter if self.input.alt_held() => self.toggle_fullscreen(),
            KeyCode::KeyO => self.set_projection(ProjectionKind::Perspective),
            KeyCode::KeyP => self.set_projection(ProjectionKind::Orthographic),
            KeyCode::KeyF => {
                if let Some(graphics) = &mut self.graphics {
                    let wanted = !graphics.renderer.is_wireframe();
                    let active = graphics.renderer.set_wireframe(wanted);
                    log::info!("Wireframe: {}", if active { "on" } else { "off" });
                }
            }
            _ => {
                if let Some(settings) = adjust_settings(self.scene.settings(), code) {
                    if let Err(e) = self.regenerate(settings) {
                        log::warn!("Keeping previous terrain: {}", e);
                    }
                }
            }
        }
    }

    fn set_projection(&mut self, kind: ProjectionKind) {
        if self.projection.kind != kind {
            self.projection.kind = kind;
            log::info!("Projection: {:?}", kind);
        }
    }

    fn toggle_fullscreen(&self) {
        if let Some(graphics) = &self.graphics {
            let window = &graphics.window;
            let next = match window.fullscreen() {
                Some(_) => None,
                None => Some(Fullscreen::Borderless(None)),
            };
            window.set_fullscreen(next);
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.projection.set_viewport(size.width, size.height);
        if let Some(graphics) = &mut self.graphics {
            graphics.gpu.resize(size.width, size.height);
            graphics.renderer.resize(&graphics.gpu.device, size.width, size.height);
        }
    }

    fn update(&mut self) {
        if self.timer.tick() {
            log::info!("FPS: {:.1} ({} frames)", self.timer.fps(), self.timer.frame_count());
        }

        let (dx, dy) = self.input.left_drag();
        self.camera.rotate(dx, dy);
        self.camera.zoom(self.input.scroll_delta());

        self.scene.update(self.timer.elapsed_secs());
        self.scene.set_view_matrix(self.camera.view_matrix());
        self.scene.set_projection_matrix(self.projection.matrix());
    }

    fn should_render(&self) -> bool {
        !self.closing && self.scene.is_loaded()
    }

    fn render(&mut self) -> Result<()> {
        if !self.should_render() {
            return Ok(());
        }
        let Some(graphics) = &mut self.graphics else { return Ok(()) };
        let frame = self.scene.frame()?;

        let output = match graphics.gpu.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                // Lost or outdated surface: reconfigure and try next frame
                log::warn!("Failed to get surface texture: {}", e);
                let (width, height) = graphics.gpu.size();
                graphics.gpu.resize(width, height);
                return Ok(());
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = graphics.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("terrain_frame"),
        });
        graphics.renderer.draw(&mut encoder, &view, &graphics.gpu.queue, &frame)?;
        graphics.gpu.queue.submit(std::iter::once(encoder.finish()));

        graphics.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.closing = true;
        event_loop.exit();
    }

    /// Free the mesh on both sides once the event loop has stopped
    fn teardown(&mut self) {
        self.closing = true;
        self.scene.unload();
        if let Some(graphics) = &mut self.graphics {
            graphics.renderer.release();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.handle_key(event_loop, code);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if self.closing {
                    return;
                }
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Draw failed: {}", e);
                    event_loop.exit();
                }
                self.input.end_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.closing {
            return;
        }
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Settings produced by a settings key, or `None` if `code` is not one
fn adjust_settings(current: &GenerationSettings, code: KeyCode) -> Option<GenerationSettings> {
    let mut next = current.clone();
    match code {
        KeyCode::BracketLeft => next.octaves = current.octaves.saturating_sub(1).max(1),
        KeyCode::BracketRight => next.octaves = current.octaves.saturating_add(1),
        KeyCode::Minus => next.amplitude *= 0.8,
        KeyCode::Equal => next.amplitude *= 1.25,
        KeyCode::Comma => next.frequency *= 0.8,
        KeyCode::Period => next.frequency *= 1.25,
        // LCG step so repeated presses walk through distinct seeds
        KeyCode::KeyR => next.seed = current.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223),
        _ => return None,
    }
    (next != *current).then_some(next)
}

fn main() {
    logging::init();
    log::info!("Terrascape starting...");

    let args: Vec<String> = std::env::args().collect();
    let config = match DemoConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    log::info!(
        "Grid: {}x{}, wireframe: {}",
        config.scene.columns, config.scene.rows, config.render.wireframe
    );

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::new(config);

    event_loop.run_app(&mut app).expect("Event loop error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octave_keys() {
        let settings = GenerationSettings::default();
        let up = adjust_settings(&settings, KeyCode::BracketRight).unwrap();
        assert_eq!(up.octaves, 2);
        let down = adjust_settings(&up, KeyCode::BracketLeft).unwrap();
        assert_eq!(down.octaves, 1);
        // Already at the minimum
        assert!(adjust_settings(&down, KeyCode::BracketLeft).is_none());
    }

    #[test]
    fn test_scale_keys() {
        let settings = GenerationSettings::default();
        let louder = adjust_settings(&settings, KeyCode::Equal).unwrap();
        assert!((louder.amplitude - 0.25).abs() < 1e-12);
        let quieter = adjust_settings(&settings, KeyCode::Minus).unwrap();
        assert!((quieter.amplitude - 0.16).abs() < 1e-12);

        let finer = adjust_settings(&settings, KeyCode::Period).unwrap();
        assert!((finer.frequency - 2.5).abs() < 1e-12);
        let coarser = adjust_settings(&settings, KeyCode::Comma).unwrap();
        assert!((coarser.frequency - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_new_seed() {
        let settings = GenerationSettings::default();
        let first = adjust_settings(&settings, KeyCode::KeyR).unwrap();
        let second = adjust_settings(&first, KeyCode::KeyR).unwrap();
        assert_ne!(first.seed, settings.seed);
        assert_ne!(second.seed, first.seed);
        assert_eq!(first.octaves, settings.octaves);
    }

    #[test]
    fn test_no_draw_after_close() {
        let mut config = DemoConfig::default();
        config.scene = config.scene.with_grid_size(4);
        let mut app = App::new(config);
        assert!(!app.should_render());

        app.scene.load().unwrap();
        assert!(app.should_render());

        app.closing = true;
        assert!(!app.should_render());
        assert!(app.render().is_ok());

        app.teardown();
        assert!(!app.scene.is_loaded());
        assert!(app.render().is_ok());
    }

    #[test]
    fn test_octave_limit_keeps_mesh() {
        let mut config = DemoConfig::default();
        config.scene = config.scene.with_grid_size(4);
        let mut app = App::new(config);
        app.scene.load().unwrap();

        // Walk `]` up until validation refuses the next step
        let mut presses = 0;
        while let Some(next) = adjust_settings(app.scene.settings(), KeyCode::BracketRight) {
            if app.regenerate(next).is_err() {
                break;
            }
            presses += 1;
            assert!(presses < 64, "octaves never hit a limit");
        }
        let settings = app.scene.settings();
        assert!(settings.validate().is_ok());
        assert!(settings.octaves > 1);
        assert_eq!(app.scene.generation(), Some(1 + presses));
        assert!(app.scene.frame().is_ok());
    }

    #[test]
    fn test_other_keys_ignored() {
        let settings = GenerationSettings::default();
        assert!(adjust_settings(&settings, KeyCode::KeyW).is_none());
        assert!(adjust_settings(&settings, KeyCode::KeyF).is_none());
    }
}
