//! Sandbox: minimal demo application for the prism engine
//!
//! Opens a window, brings up the Vulkan backend and renders the fixed demo
//! scene. A few named entities exercise the scene store.

use prism_engine::prelude::*;

fn main() {
    let spec = ApplicationSpec {
        name: "Sandbox".to_string(),
        version: (0, 1, 0),
        asset_path: "resources/shaders".to_string(),
        args: CommandLineArgs::new(std::env::args()),
        ..Default::default()
    };

    let mut app = match Application::new(spec) {
        Ok(app) => app,
        Err(err) => {
            // Startup failures are fatal; nothing to retry at this level.
            log::error!("{err}");
            eprintln!("Failed to start: {err}");
            std::process::exit(1);
        }
    };

    populate_scene(app.scene_mut());

    if let Err(err) = app.run() {
        log::error!("{err}");
        eprintln!("Fatal error: {err}");
        std::process::exit(1);
    }
}

fn populate_scene(scene: &mut Scene) {
    let camera = scene.create("Camera");
    if let Some(transform) = scene.transform_mut(camera) {
        transform.translation = Vec3::new(0.0, 0.0, -2.0);
    }

    for index in 0..3 {
        let entity = scene.create(&format!("Marker {index}"));
        if let Some(transform) = scene.transform_mut(entity) {
            transform.translation = Vec3::new(index as f32, 0.0, 0.0);
        }
    }

    log::info!("Scene populated with {} entities.", scene.len());
}
