// Build script: compile GLSL shaders to SPIR-V when a compiler is available.
//
// Shader compilation is skipped (with a warning) when no glslc can be found,
// so the crate still builds on machines without the Vulkan SDK; the sandbox
// then needs prebuilt .spv files next to the sources.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../resources/shaders");
    println!("cargo:rerun-if-env-changed=VULKAN_SDK");

    if env::var("SKIP_SHADERS").is_ok() {
        eprintln!("info: Skipping shader compilation (SKIP_SHADERS set)");
        return;
    }

    let glslc = match find_glslc() {
        Some(path) => path,
        None => {
            eprintln!("warning: glslc not found, shader compilation skipped");
            eprintln!("hint: install the Vulkan SDK and set VULKAN_SDK");
            return;
        }
    };

    let shader_dir = PathBuf::from("../resources/shaders");
    let entries = match std::fs::read_dir(&shader_dir) {
        Ok(entries) => entries,
        Err(_) => {
            eprintln!("info: no shader directory found at {shader_dir:?}");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let is_shader = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("vert" | "frag")
        );
        if !is_shader {
            continue;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let out_file = shader_dir.join(format!("{file_name}.spv"));

        let status = Command::new(&glslc)
            .arg(&path)
            .arg("-o")
            .arg(&out_file)
            .status();
        match status {
            Ok(status) if status.success() => {
                eprintln!("info: compiled {file_name}");
            }
            Ok(status) => {
                panic!("glslc failed on {file_name} with {status}");
            }
            Err(err) => {
                eprintln!("warning: failed to run glslc: {err}");
                return;
            }
        }
    }
}

fn find_glslc() -> Option<PathBuf> {
    if let Ok(sdk) = env::var("VULKAN_SDK") {
        let candidate = if cfg!(target_os = "windows") {
            Path::new(&sdk).join("Bin").join("glslc.exe")
        } else {
            Path::new(&sdk).join("bin").join("glslc")
        };
        if candidate.exists() {
            return Some(candidate);
        }
    }

    // Fall back to a glslc on PATH.
    let name = if cfg!(target_os = "windows") {
        "glslc.exe"
    } else {
        "glslc"
    };
    let found = Command::new(name)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    found.then(|| PathBuf::from(name))
}
