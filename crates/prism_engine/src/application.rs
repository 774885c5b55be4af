//! Application shell: startup, the run loop, and shutdown
//!
//! Owns the window, the renderer, the scene and the persisted configuration.
//! The run loop polls window events, dispatches close and framebuffer-resize,
//! suppresses rendering while minimized and drives one render cycle per tick.

use thiserror::Error;

use crate::assets::Assets;
use crate::core::{CommandLineArgs, Config};
use crate::ecs::Scene;
use crate::foundation::logging;
use crate::foundation::time::Timer;
use crate::render::{self, RenderError, Renderer};
use crate::window::{Window, WindowError};

/// Engine-level errors surfaced to the entry point.
///
/// Backend construction failures land here and terminate the application;
/// there is no meaningful retry at this level.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Windowing layer failure
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Render backend failure
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Startup parameters of an application.
#[derive(Debug, Clone)]
pub struct ApplicationSpec {
    /// Application name, used for the window title and driver registration
    pub name: String,
    /// Application version (major, minor, patch)
    pub version: (u32, u32, u32),
    /// Initial window size in screen coordinates
    pub window_size: (u32, u32),
    /// Path of the persisted key-value config file
    pub config_file: String,
    /// Base directory for assets (shader binaries)
    pub asset_path: String,
    /// Captured process arguments
    pub args: CommandLineArgs,
}

impl Default for ApplicationSpec {
    fn default() -> Self {
        Self {
            name: "Prism Application".to_string(),
            version: (0, 1, 0),
            window_size: (1280, 720),
            config_file: "config.cfg".to_string(),
            asset_path: "resources".to_string(),
            args: CommandLineArgs::default(),
        }
    }
}

/// A zero dimension means the window is minimized and there is nothing to
/// render into.
pub fn is_minimized_size(width: u32, height: u32) -> bool {
    width == 0 || height == 0
}

/// The running application: window, renderer, scene, configuration.
pub struct Application {
    spec: ApplicationSpec,
    config: Config,
    assets: Assets,
    scene: Scene,
    window: Window,
    renderer: Renderer,
    minimized: bool,
    running: bool,
}

impl Application {
    /// Initialize logging, configuration, the window and the render backend.
    pub fn new(spec: ApplicationSpec) -> Result<Self, EngineError> {
        logging::init(if cfg!(debug_assertions) {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        });
        log::info!("Logging started.");
        log::info!(
            "Engine version: {} | Application: {} v{}.{}.{}",
            env!("CARGO_PKG_VERSION"),
            spec.name,
            spec.version.0,
            spec.version.1,
            spec.version.2
        );
        for (index, arg) in spec.args.iter().enumerate() {
            log::info!("Arg[{}] = \"{}\"", index + 1, arg);
        }

        let mut config = Config::load(&spec.config_file);

        let backend = render::setup_backend(&mut config, &spec.args);

        let mut window = Window::new(&spec.name, spec.window_size.0, spec.window_size.1)?;
        let assets = Assets::new(&spec.asset_path);
        let renderer = Renderer::create(
            backend,
            &mut window,
            &assets,
            &mut config,
            &spec.name,
            spec.version,
        )?;

        Ok(Self {
            spec,
            config,
            assets,
            scene: Scene::new(),
            window,
            renderer,
            minimized: false,
            running: true,
        })
    }

    /// The entity-component scene store.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene store.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The persisted configuration store.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether rendering is currently suppressed by minimization.
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Request the run loop to stop after the current tick.
    pub fn close(&mut self) {
        self.running = false;
    }

    /// Run until the window closes, rendering once per tick.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let mut timer = Timer::new();
        let mut fps_frames = 0u32;
        let mut fps_elapsed = 0.0f32;

        while self.running && !self.window.should_close() {
            self.window.poll_events();
            for event in self.window.flush_events() {
                match event {
                    glfw::WindowEvent::Close => self.running = false,
                    glfw::WindowEvent::FramebufferSize(width, height) => {
                        self.on_framebuffer_resize(width.max(0) as u32, height.max(0) as u32)?;
                    }
                    _ => {}
                }
            }
            if !self.running {
                break;
            }

            if !self.minimized {
                self.renderer.render()?;
            }

            fps_frames += 1;
            fps_elapsed += timer.tick();
            if fps_elapsed >= 1.0 {
                let fps = (fps_frames as f32 / fps_elapsed).round() as u32;
                self.window.set_title(&format!("{} - FPS: {}", self.spec.name, fps));
                fps_frames = 0;
                fps_elapsed = 0.0;
            }
        }

        self.renderer.wait_idle()?;
        Ok(())
    }

    /// Handle a framebuffer size change from the windowing layer.
    ///
    /// A zero dimension marks the application minimized and suppresses
    /// rendering; a real size clears the flag and rebuilds the swapchain and
    /// pipeline for the new extent.
    pub fn on_framebuffer_resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        if is_minimized_size(width, height) {
            log::debug!("Window minimized; suppressing rendering.");
            self.minimized = true;
            return Ok(());
        }

        log::debug!("Framebuffer resized to {width}x{height}.");
        self.minimized = false;
        self.renderer.on_framebuffer_resize(&self.window, &self.assets)?;
        Ok(())
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        if let Err(err) = self.config.save() {
            log::warn!("Failed to save config: {err}");
        }
        log::info!("Shutdown.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_count_as_minimized() {
        assert!(is_minimized_size(0, 720));
        assert!(is_minimized_size(1280, 0));
        assert!(is_minimized_size(0, 0));
        assert!(!is_minimized_size(1, 1));
    }

    #[test]
    fn default_spec_is_sensible() {
        let spec = ApplicationSpec::default();
        assert!(!spec.name.is_empty());
        assert!(spec.window_size.0 > 0 && spec.window_size.1 > 0);
        assert_eq!(spec.config_file, "config.cfg");
    }
}
