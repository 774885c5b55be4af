//! Instance-level Vulkan state: driver connection, diagnostics, surface
//!
//! `GraphicsContext` owns the top of the backend's ownership chain. Required
//! layers and extensions are hard startup preconditions; every enumerated
//! layer/extension is logged as supported, unused or missing so a failing
//! startup can be diagnosed from the log alone.

use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::Surface;
use ash::vk;
use std::ffi::{CStr, CString};

use super::{VulkanError, VulkanResult};
use crate::window::Window;

/// Owns the Vulkan instance, the optional debug messenger and the
/// presentation surface bound to the application window.
pub struct GraphicsContext {
    entry: ash::Entry,
    instance: ash::Instance,
    debug_utils: Option<DebugUtils>,
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
    surface_loader: Surface,
    surface: vk::SurfaceKHR,
}

impl GraphicsContext {
    /// Establish the driver connection and create the presentation surface.
    ///
    /// Fails fatally when a required layer or extension is unsupported, or
    /// when the driver rejects instance or surface creation.
    pub fn new(
        window: &mut Window,
        app_name: &str,
        app_version: u32,
        enable_diagnostics: bool,
    ) -> VulkanResult<Self> {
        let entry = unsafe { ash::Entry::load() }.map_err(|err| {
            VulkanError::InitializationFailed(format!("Failed to load Vulkan library: {err}"))
        })?;

        log_api_versions(&entry);

        let app_name_c = CString::new(app_name).map_err(|_| {
            VulkanError::InitializationFailed("Application name contains a NUL byte".to_string())
        })?;
        let engine_name_c = CString::new("prism").map_err(|_| {
            VulkanError::InitializationFailed("Engine name contains a NUL byte".to_string())
        })?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name_c)
            .application_version(app_version)
            .engine_name(&engine_name_c)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_1);

        let layers = required_layers(enable_diagnostics);
        let extensions = required_extensions(window, enable_diagnostics)?;

        if !check_layer_support(&entry, &layers)? {
            return Err(VulkanError::InitializationFailed(
                "Required instance layers not supported!".to_string(),
            ));
        }
        if !check_extension_support(&entry, &extensions)? {
            return Err(VulkanError::InitializationFailed(
                "Required instance extensions not supported!".to_string(),
            ));
        }

        let layer_ptrs: Vec<*const i8> = layers.iter().map(|l| l.as_ptr()).collect();
        let extension_ptrs: Vec<*const i8> = extensions.iter().map(|e| e.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(&layer_ptrs)
            .enabled_extension_names(&extension_ptrs);

        log::trace!("Creating instance...");
        let instance = unsafe {
            entry
                .create_instance(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        let (debug_utils, debug_messenger) = if enable_diagnostics {
            let debug_utils = DebugUtils::new(&entry, &instance);
            let messenger = create_debug_messenger(&debug_utils)?;
            (Some(debug_utils), Some(messenger))
        } else {
            (None, None)
        };

        log::trace!("Creating surface...");
        let surface_loader = Surface::new(&entry, &instance);
        let surface = window.create_surface(instance.handle())?;

        Ok(Self {
            entry,
            instance,
            debug_utils,
            debug_messenger,
            surface_loader,
            surface,
        })
    }

    /// The loaded Vulkan entry points.
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// The instance handle wrapper.
    pub fn instance(&self) -> &ash::Instance {
        &self.instance
    }

    /// The presentation surface.
    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// The surface extension loader.
    pub fn surface_loader(&self) -> &Surface {
        &self.surface_loader
    }
}

impl Drop for GraphicsContext {
    fn drop(&mut self) {
        log::trace!("Destroying instance objects...");
        unsafe {
            if self.surface != vk::SurfaceKHR::null() {
                self.surface_loader.destroy_surface(self.surface, None);
            }
            if let (Some(debug_utils), Some(messenger)) =
                (&self.debug_utils, self.debug_messenger)
            {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

fn log_api_versions(entry: &ash::Entry) {
    match entry.try_enumerate_instance_version() {
        Ok(Some(version)) => log::debug!(
            "System's max supported Vulkan version: {}.{}.{}",
            vk::api_version_major(version),
            vk::api_version_minor(version),
            vk::api_version_patch(version)
        ),
        _ => log::debug!("System reports Vulkan 1.0 (no instance version query)"),
    }
    log::debug!(
        "Engine's requested Vulkan version: {}.{}.{}",
        vk::api_version_major(vk::API_VERSION_1_1),
        vk::api_version_minor(vk::API_VERSION_1_1),
        vk::api_version_patch(vk::API_VERSION_1_1)
    );
}

pub(crate) fn required_layers(enable_diagnostics: bool) -> Vec<CString> {
    let mut layers = Vec::new();
    if enable_diagnostics {
        // CString::new on a literal without NUL bytes cannot fail.
        if let Ok(validation) = CString::new("VK_LAYER_KHRONOS_validation") {
            layers.push(validation);
        }
    }
    layers
}

fn required_extensions(window: &Window, enable_diagnostics: bool) -> VulkanResult<Vec<CString>> {
    let mut extensions = Vec::new();
    for name in window.required_instance_extensions()? {
        extensions.push(CString::new(name).map_err(|_| {
            VulkanError::InitializationFailed("Extension name contains a NUL byte".to_string())
        })?);
    }
    if enable_diagnostics {
        extensions.push(DebugUtils::name().to_owned());
    }
    Ok(extensions)
}

fn check_layer_support(entry: &ash::Entry, required: &[CString]) -> VulkanResult<bool> {
    let supported = entry
        .enumerate_instance_layer_properties()
        .map_err(VulkanError::Api)?;
    let supported_names: Vec<String> = supported
        .iter()
        .map(|layer| {
            unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) }
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    Ok(check_support(
        "instance layers",
        required,
        &supported_names,
    ))
}

fn check_extension_support(entry: &ash::Entry, required: &[CString]) -> VulkanResult<bool> {
    let supported = entry
        .enumerate_instance_extension_properties(None)
        .map_err(VulkanError::Api)?;
    let supported_names: Vec<String> = supported
        .iter()
        .map(|ext| {
            unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) }
                .to_string_lossy()
                .into_owned()
        })
        .collect();

    Ok(check_support(
        "instance extensions",
        required,
        &supported_names,
    ))
}

/// Log the support table for one requirement set and report whether every
/// required entry is present.
///
/// Required-and-present entries log at debug as `[  OK  ]`, supported-but-
/// unused entries at trace as `[UNUSED]`, missing required entries at debug
/// as `[FAILED]`.
pub(crate) fn check_support(kind: &str, required: &[CString], supported: &[String]) -> bool {
    let mut missing: Vec<String> = required
        .iter()
        .map(|r| r.to_string_lossy().into_owned())
        .collect();

    log::debug!("Required {kind} ({}/{}):", required.len(), supported.len());
    for name in supported {
        if let Some(pos) = missing.iter().position(|m| m == name) {
            missing.swap_remove(pos);
            log::debug!("[  OK  ] \"{name}\"");
        } else {
            log::trace!("[UNUSED] \"{name}\"");
        }
    }
    if !missing.is_empty() {
        log::debug!("Unsupported {kind} ({}):", missing.len());
        for name in &missing {
            log::debug!("[FAILED] \"{name}\"");
        }
    }

    missing.is_empty()
}

fn create_debug_messenger(debug_utils: &DebugUtils) -> VulkanResult<vk::DebugUtilsMessengerEXT> {
    log::trace!("Creating debug messenger...");

    let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback));

    unsafe {
        debug_utils
            .create_debug_utils_messenger(&create_info, None)
            .map_err(VulkanError::Api)
    }
}

unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = if callback_data.is_null() {
        std::borrow::Cow::from("<no message>")
    } else {
        CStr::from_ptr((*callback_data).p_message).to_string_lossy()
    };

    if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::error!("[Vulkan] {message_type:?} - {message}");
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        log::warn!("[Vulkan] {message_type:?} - {message}");
    } else if message_severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        log::info!("[Vulkan] {message_type:?} - {message}");
    } else {
        log::trace!("[Vulkan] {message_type:?} - {message}");
    }

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cstrings(names: &[&str]) -> Vec<CString> {
        names
            .iter()
            .map(|n| CString::new(*n).expect("no NUL bytes in test names"))
            .collect()
    }

    #[test]
    fn check_support_passes_when_all_required_present() {
        let required = cstrings(&["VK_KHR_surface", "VK_KHR_xcb_surface"]);
        let supported = vec![
            "VK_KHR_surface".to_string(),
            "VK_KHR_xcb_surface".to_string(),
            "VK_EXT_debug_utils".to_string(),
        ];
        assert!(check_support("test", &required, &supported));
    }

    #[test]
    fn check_support_fails_on_missing_entry() {
        let required = cstrings(&["VK_KHR_surface", "VK_KHR_win32_surface"]);
        let supported = vec!["VK_KHR_surface".to_string()];
        assert!(!check_support("test", &required, &supported));
    }

    #[test]
    fn check_support_passes_with_empty_requirements() {
        assert!(check_support("test", &[], &[]));
    }
}
