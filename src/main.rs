//! Depth Effects - Main Entry Point
//!
//! Opens a window showing one depth-driven effect, or with `--snapshot`
//! renders a single frame on the CPU and writes it to a PNG.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use depth_effects::assets;
use depth_effects::surface::{CpuSurface, PresentationSurface};
use depth_effects::{App, Compositor, CompositorError, DemoConfig, PointerState};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

const USAGE: &str = "usage: depth-effects [CONFIG.json] [--snapshot OUT.png] [--time SECONDS] [--pointer X,Y]";

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    time: f32,
    pointer: Option<(f32, f32)>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Options::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--snapshot" => {
                    let path = args.next().ok_or("--snapshot needs a path")?;
                    options.snapshot = Some(PathBuf::from(path));
                }
                "--time" => {
                    let value = args.next().ok_or("--time needs a value")?;
                    options.time = value
                        .parse()
                        .map_err(|_| format!("invalid time: {value}"))?;
                }
                "--pointer" => {
                    let value = args.next().ok_or("--pointer needs X,Y")?;
                    let (x, y) = value
                        .split_once(',')
                        .ok_or_else(|| format!("invalid pointer: {value}"))?;
                    let parse = |v: &str| {
                        v.trim()
                            .parse::<f32>()
                            .map_err(|_| format!("invalid pointer: {value}"))
                    };
                    options.pointer = Some((parse(x)?, parse(y)?));
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
                _ if options.config.is_none() => options.config = Some(PathBuf::from(&arg)),
                _ => return Err(format!("unexpected argument: {arg}")),
            }
        }

        Ok(options)
    }
}

/// Application state machine
enum AppState {
    /// Initial state before window is created
    Uninitialized,
    /// Window and graphics context are ready
    Running { window: Arc<Window>, app: App },
    /// Startup failed; the loop is shutting down
    Failed,
}

/// Main application handler implementing winit's ApplicationHandler trait
struct DepthEffectsApp {
    config: DemoConfig,
    state: AppState,
    next_redraw_at: Instant,
    error: Option<CompositorError>,
}

impl DepthEffectsApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            config,
            state: AppState::Uninitialized,
            next_redraw_at: Instant::now(),
            error: None,
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<(Arc<Window>, App), CompositorError> {
        log::info!("Creating window...");

        let window_attributes = WindowAttributes::default()
            .with_title(self.config.window_title())
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| CompositorError::SurfaceConfiguration(e.to_string()))?,
        );

        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let app = pollster::block_on(App::new(window.clone(), &self.config))?;
        Ok((window, app))
    }
}

impl ApplicationHandler for DepthEffectsApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only initialize if we haven't already
        if !matches!(self.state, AppState::Uninitialized) {
            return;
        }

        match self.start(event_loop) {
            Ok((window, app)) => {
                log::info!("{} ready", app.effect().display_name());
                log::info!("Press ESC to exit, F11 for fullscreen");
                window.request_redraw();
                self.state = AppState::Running { window, app };
            }
            Err(e) => {
                log::error!("Startup failed: {}", e);
                self.error = Some(e);
                self.state = AppState::Failed;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Only handle events if we're running
        let AppState::Running { window, app } = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match key_code {
                KeyCode::Escape => {
                    log::info!("Escape pressed, exiting...");
                    event_loop.exit();
                }
                KeyCode::F11 => {
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None);
                        log::info!("Exiting fullscreen");
                    } else {
                        window.set_fullscreen(Some(winit::window::Fullscreen::Borderless(None)));
                        log::info!("Entering fullscreen");
                    }
                }
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                app.resize(physical_size);
            }

            WindowEvent::CursorMoved { position, .. } => {
                app.on_cursor_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::CursorEntered { .. } => {
                app.on_cursor_entered();
            }

            WindowEvent::CursorLeft { .. } => {
                app.on_cursor_left();
            }

            WindowEvent::RedrawRequested => match app.render() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("Surface lost, reconfiguring...");
                    app.resize(app.size());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of GPU memory!");
                    event_loop.exit();
                }
                Err(e) => {
                    log::warn!("Surface error: {:?}", e);
                }
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Running { window, .. } = &mut self.state else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        // Drive redraws at target FPS
        let frame_duration = Duration::from_nanos(1_000_000_000u64 / self.config.target_fps as u64);
        let now = Instant::now();

        if now >= self.next_redraw_at {
            window.request_redraw();
            self.next_redraw_at += frame_duration;

            // Reset if too far behind
            if now > self.next_redraw_at + frame_duration * 2 {
                self.next_redraw_at = now + frame_duration;
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_redraw_at));
    }
}

/// Render one frame on the CPU and write it to `out`.
fn snapshot(config: &DemoConfig, options: &Options, out: &Path) -> Result<(), CompositorError> {
    let image = assets::load_image(&config.image_path)?;
    let depth = assets::load_depth(&config.depth_path)?;
    let compositor = Compositor::new(image, depth, config.effect.clone());

    let pointer = match options.pointer {
        Some((x, y)) => PointerState::at(x, y),
        None => PointerState::default(),
    };

    let mut surface = CpuSurface::new();
    surface.configure(config.window_width, config.window_height)?;
    let frame = compositor.render_frame(
        config.window_width,
        config.window_height,
        pointer,
        options.time,
    );
    surface.present(&frame)?;
    surface.save_png(out)
}

fn run_window(config: DemoConfig) -> Result<(), CompositorError> {
    let event_loop =
        EventLoop::new().map_err(|e| CompositorError::UnsupportedPlatform(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut handler = DepthEffectsApp::new(config);
    event_loop
        .run_app(&mut handler)
        .map_err(|e| CompositorError::UnsupportedPlatform(e.to_string()))?;

    match handler.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Depth Effects v{}", env!("CARGO_PKG_VERSION"));

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match &options.config {
        Some(path) => DemoConfig::load(path),
        None => Ok(DemoConfig::default()),
    };

    let result = config.and_then(|config| match &options.snapshot {
        Some(out) => snapshot(&config, &options, out),
        None => run_window(config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
