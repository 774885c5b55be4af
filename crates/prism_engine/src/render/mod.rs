//! Rendering front end: backend selection and dispatch
//!
//! Multiple graphics backends hide behind one interface. The active backend
//! is resolved exactly once at startup, from the persisted choice, then the
//! command line, then the build default, and is never switched at runtime;
//! dispatch happens per frame on the selected variant, not per draw call.

pub mod vulkan;

pub use vulkan::{VulkanError, VulkanRenderer};

use thiserror::Error;

use crate::assets::Assets;
use crate::core::{CommandLineArgs, Config};
use crate::window::Window;

/// Config key remembering the renderer backend across runs.
pub const RENDERER_API_KEY: &str = "RendererAPI";

/// The backend used when nothing was persisted or requested.
pub const DEFAULT_BACKEND: BackendKind = BackendKind::Vulkan;

/// Identifies a graphics backend.
///
/// All names are recognized for selection purposes; only backends with an
/// implementation in this build report as supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// No backend; selection fell through
    None,
    /// Direct3D 12 (not built)
    DirectX,
    /// Metal (not built)
    Metal,
    /// Vulkan
    Vulkan,
    /// OpenGL (not built)
    OpenGL,
}

impl BackendKind {
    /// Canonical display and persistence name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DirectX => "DirectX",
            Self::Metal => "Metal",
            Self::Vulkan => "Vulkan",
            Self::OpenGL => "OpenGL",
        }
    }

    /// Parse a backend name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "directx" => Some(Self::DirectX),
            "metal" => Some(Self::Metal),
            "vulkan" => Some(Self::Vulkan),
            "opengl" => Some(Self::OpenGL),
            _ => None,
        }
    }

    /// Whether this build carries an implementation of the backend.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Vulkan)
    }
}

/// Rendering front-end errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failure inside the Vulkan backend
    #[error(transparent)]
    Vulkan(#[from] VulkanError),

    /// The selected backend has no implementation in this build
    #[error("Renderer backend {} is not supported in this build", .0.as_str())]
    Unsupported(BackendKind),
}

/// Resolve the backend to use for this run and persist the choice.
///
/// Order: previously persisted backend, command-line override, build default.
/// Every decision is logged.
pub fn setup_backend(config: &mut Config, args: &CommandLineArgs) -> BackendKind {
    let mut selected = BackendKind::None;

    let previous = config.get(RENDERER_API_KEY, "None");
    if previous != "None" {
        log::info!("Previously used renderer API: {previous}.");
        match BackendKind::from_name(&previous) {
            Some(kind) if kind.is_supported() => selected = kind,
            Some(_) => log::info!("Previously used renderer API is not supported in this build."),
            None => log::info!("Previously used renderer API \"{previous}\" is unknown!"),
        }
    }

    for kind in [
        BackendKind::DirectX,
        BackendKind::Metal,
        BackendKind::Vulkan,
        BackendKind::OpenGL,
    ] {
        if args.check(&kind.as_str().to_ascii_lowercase()) {
            log::info!("Requested renderer API from command line: {}.", kind.as_str());
            if kind.is_supported() {
                selected = kind;
            } else {
                log::info!("Requested renderer API is not supported in this build.");
            }
        }
    }

    if selected == BackendKind::None {
        selected = DEFAULT_BACKEND;
        log::info!("Default renderer API: {}.", selected.as_str());
    }
    log::info!("Selected renderer API: {}.", selected.as_str());

    config.set(RENDERER_API_KEY, selected.as_str());
    selected
}

/// The active render backend.
///
/// One variant per implemented backend; constructed once at startup.
pub enum Renderer {
    /// Vulkan backend
    Vulkan(VulkanRenderer),
}

impl Renderer {
    /// Construct the selected backend against the window.
    pub fn create(
        kind: BackendKind,
        window: &mut Window,
        assets: &Assets,
        config: &mut Config,
        app_name: &str,
        app_version: (u32, u32, u32),
    ) -> Result<Self, RenderError> {
        match kind {
            BackendKind::Vulkan => Ok(Self::Vulkan(VulkanRenderer::new(
                window,
                assets,
                config,
                app_name,
                app_version,
            )?)),
            other => Err(RenderError::Unsupported(other)),
        }
    }

    /// Drive one frame cycle.
    pub fn render(&mut self) -> Result<(), RenderError> {
        match self {
            Self::Vulkan(renderer) => renderer.render().map_err(RenderError::from),
        }
    }

    /// React to a framebuffer size change (both dimensions non-zero).
    pub fn on_framebuffer_resize(
        &mut self,
        window: &Window,
        assets: &Assets,
    ) -> Result<(), RenderError> {
        match self {
            Self::Vulkan(renderer) => renderer
                .on_framebuffer_resize(window, assets)
                .map_err(RenderError::from),
        }
    }

    /// Wait for the device to finish all submitted work.
    pub fn wait_idle(&self) -> Result<(), RenderError> {
        match self {
            Self::Vulkan(renderer) => renderer.wait_idle().map_err(RenderError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(tag: &str) -> Config {
        Config::load(
            std::env::temp_dir().join(format!("prism_render_test_{tag}_{}.cfg", std::process::id())),
        )
    }

    fn args(list: &[&str]) -> CommandLineArgs {
        CommandLineArgs::new(
            std::iter::once("app".to_string()).chain(list.iter().map(|s| (*s).to_string())),
        )
    }

    #[test]
    fn backend_names_round_trip() {
        for kind in [
            BackendKind::None,
            BackendKind::DirectX,
            BackendKind::Metal,
            BackendKind::Vulkan,
            BackendKind::OpenGL,
        ] {
            assert_eq!(BackendKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(BackendKind::from_name("VULKAN"), Some(BackendKind::Vulkan));
        assert_eq!(BackendKind::from_name("software"), None);
    }

    #[test]
    fn setup_defaults_to_vulkan_and_persists() {
        let mut config = temp_config("default");
        let selected = setup_backend(&mut config, &args(&[]));
        assert_eq!(selected, BackendKind::Vulkan);
        assert_eq!(config.get(RENDERER_API_KEY, ""), "Vulkan");
    }

    #[test]
    fn setup_honors_persisted_supported_backend() {
        let mut config = temp_config("persisted");
        config.set(RENDERER_API_KEY, "Vulkan");
        let selected = setup_backend(&mut config, &args(&[]));
        assert_eq!(selected, BackendKind::Vulkan);
    }

    #[test]
    fn setup_ignores_unsupported_request_and_falls_back() {
        let mut config = temp_config("unsupported");
        let selected = setup_backend(&mut config, &args(&["--opengl"]));
        assert_eq!(selected, BackendKind::Vulkan);
        assert_eq!(config.get(RENDERER_API_KEY, ""), "Vulkan");
    }

    #[test]
    fn command_line_flag_selects_backend() {
        let mut config = temp_config("cli");
        let selected = setup_backend(&mut config, &args(&["--vulkan"]));
        assert_eq!(selected, BackendKind::Vulkan);
    }
}
