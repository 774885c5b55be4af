//! Physical device selection and logical device management
//!
//! Candidate GPUs are enumerated once per process, filtered by required
//! extensions and queue families, scored by device class, and the winner is
//! remembered in the config store so later launches re-select the same card
//! without re-scoring. The logical device owns the queues and the command
//! pool and exposes the memory/format/buffer helpers the rest of the backend
//! builds on.

use ash::extensions::khr::{Surface, Swapchain as SwapchainLoader};
use ash::vk;
use std::ffi::CStr;

use super::instance::check_support;
use super::{GraphicsContext, VulkanError, VulkanResult};
use crate::core::Config;

/// Config key holding the display name of the previously selected device.
pub const DEVICE_NAME_KEY: &str = "PhysicalDeviceName";
/// Config key holding the numeric id of the previously selected device.
pub const DEVICE_ID_KEY: &str = "PhysicalDeviceId";

/// Queue family indices required by the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueFamilyIndices {
    /// Family with graphics support
    pub graphics: Option<u32>,
    /// Family with presentation support against the live surface
    pub present: Option<u32>,
}

impl QueueFamilyIndices {
    /// Whether both required families were found.
    pub fn complete(&self) -> bool {
        self.graphics.is_some() && self.present.is_some()
    }
}

/// Query graphics and present queue families of `device`.
pub fn find_queue_families(
    instance: &ash::Instance,
    surface_loader: &Surface,
    surface: vk::SurfaceKHR,
    device: vk::PhysicalDevice,
) -> VulkanResult<QueueFamilyIndices> {
    let families = unsafe { instance.get_physical_device_queue_family_properties(device) };

    let mut indices = QueueFamilyIndices::default();
    for (index, family) in families.iter().enumerate() {
        let index = index as u32;

        if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) && indices.graphics.is_none() {
            indices.graphics = Some(index);
        }

        let present_support = unsafe {
            surface_loader
                .get_physical_device_surface_support(device, index, surface)
                .map_err(VulkanError::Api)?
        };
        if present_support && indices.present.is_none() {
            indices.present = Some(index);
        }

        if indices.complete() {
            break;
        }
    }

    Ok(indices)
}

/// Device class, ordered by desirability for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Dedicated GPU
    Discrete,
    /// GPU sharing memory with the host
    Integrated,
    /// GPU virtualized by a hypervisor
    Virtual,
    /// Software rasterizer
    Cpu,
    /// Anything else
    Other,
}

impl From<vk::PhysicalDeviceType> for DeviceClass {
    fn from(device_type: vk::PhysicalDeviceType) -> Self {
        match device_type {
            vk::PhysicalDeviceType::DISCRETE_GPU => Self::Discrete,
            vk::PhysicalDeviceType::INTEGRATED_GPU => Self::Integrated,
            vk::PhysicalDeviceType::VIRTUAL_GPU => Self::Virtual,
            vk::PhysicalDeviceType::CPU => Self::Cpu,
            _ => Self::Other,
        }
    }
}

impl DeviceClass {
    fn as_str(self) -> &'static str {
        match self {
            Self::Discrete => "Discrete GPU",
            Self::Integrated => "Integrated GPU",
            Self::Virtual => "Virtual GPU",
            Self::Cpu => "CPU",
            Self::Other => "Other",
        }
    }
}

/// Immutable snapshot of one suitable physical device.
#[derive(Debug, Clone)]
pub struct PhysicalDeviceInfo {
    /// Raw device handle
    pub handle: vk::PhysicalDevice,
    /// Display name reported by the driver
    pub name: String,
    /// PCI vendor id
    pub vendor_id: u32,
    /// PCI device id
    pub device_id: u32,
    /// Device class
    pub class: DeviceClass,
    /// Suitability score; higher is better
    pub score: i32,
}

/// Score a device by class, with a bonus for a deeper push-constant budget.
///
/// 128 bytes of push constants are guaranteed everywhere; 256 are common on
/// desktop hardware and worth preferring.
pub fn rate_suitability(class: DeviceClass, max_push_constants_size: u32) -> i32 {
    let mut score = match class {
        DeviceClass::Discrete => 1000,
        DeviceClass::Integrated => 500,
        DeviceClass::Virtual => 200,
        DeviceClass::Cpu => 100,
        DeviceClass::Other => 0,
    };
    if max_push_constants_size >= 256 {
        score += 100;
    }
    score
}

/// Pick a device from an already-filtered candidate list.
///
/// A persisted `(name, device id)` preference wins when that device is still
/// in the list; otherwise the highest score wins, first-enumerated on ties.
fn select_device<'a>(
    devices: &'a [PhysicalDeviceInfo],
    persisted: Option<(&str, u32)>,
) -> Option<&'a PhysicalDeviceInfo> {
    if let Some((name, id)) = persisted {
        if let Some(device) = devices
            .iter()
            .find(|d| d.name == name && d.device_id == id)
        {
            log::info!("Re-selecting previously used physical device: \"{}\"", device.name);
            return Some(device);
        }
        log::info!("Previously used physical device \"{name}\" is gone or unsuitable; re-scoring.");
    }

    let mut best: Option<&PhysicalDeviceInfo> = None;
    for device in devices {
        if best.map_or(true, |b| device.score > b.score) {
            best = Some(device);
        }
    }
    best
}

/// Enumerates and caches the suitable physical devices of an instance.
pub struct PhysicalDeviceSelector {
    devices: Vec<PhysicalDeviceInfo>,
}

impl PhysicalDeviceSelector {
    /// Enumerate all physical devices and keep the suitable ones.
    ///
    /// A device is suitable when it supports the required device extensions
    /// and has complete queue families against the live surface. Excluded
    /// devices are logged with the failing check.
    pub fn enumerate(context: &GraphicsContext) -> VulkanResult<Self> {
        let instance = context.instance();
        let handles = unsafe {
            instance
                .enumerate_physical_devices()
                .map_err(VulkanError::Api)?
        };

        let mut devices = Vec::new();
        for handle in handles {
            let props = unsafe { instance.get_physical_device_properties(handle) };
            let name = unsafe { CStr::from_ptr(props.device_name.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            let class = DeviceClass::from(props.device_type);

            log::info!(
                "Physical device: ({:04X}:{:04X}) \"{}\"",
                props.vendor_id,
                props.device_id,
                name
            );
            log::debug!("[ INFO ] Type: {}", class.as_str());
            log::debug!(
                "[ INFO ] API v{}.{}.{}",
                vk::api_version_major(props.api_version),
                vk::api_version_minor(props.api_version),
                vk::api_version_patch(props.api_version)
            );

            let supported_extensions = unsafe {
                instance
                    .enumerate_device_extension_properties(handle)
                    .map_err(VulkanError::Api)?
            };
            let supported_names: Vec<String> = supported_extensions
                .iter()
                .map(|ext| {
                    unsafe { CStr::from_ptr(ext.extension_name.as_ptr()) }
                        .to_string_lossy()
                        .into_owned()
                })
                .collect();
            let required = [SwapchainLoader::name().to_owned()];
            if !check_support("device extensions", &required, &supported_names) {
                log::debug!("Device excluded: required device extensions not supported.");
                continue;
            }

            let indices = find_queue_families(
                instance,
                context.surface_loader(),
                context.surface(),
                handle,
            )?;
            if !indices.complete() {
                log::debug!("Device excluded: unsupported queue families:");
                if indices.graphics.is_none() {
                    log::debug!("[FAILED] Graphics Queue");
                }
                if indices.present.is_none() {
                    log::debug!("[FAILED] Presentation Queue");
                }
                continue;
            }

            let score = rate_suitability(class, props.limits.max_push_constants_size);
            log::info!("[ INFO ] Device is suitable (score: {score}).");

            devices.push(PhysicalDeviceInfo {
                handle,
                name,
                vendor_id: props.vendor_id,
                device_id: props.device_id,
                class,
                score,
            });
        }

        Ok(Self { devices })
    }

    /// The cached suitable-device snapshot.
    pub fn devices(&self) -> &[PhysicalDeviceInfo] {
        &self.devices
    }

    /// Select the device to open, preferring the persisted choice, and
    /// persist the winner.
    ///
    /// Fails fatally when no suitable device exists.
    pub fn pick(&self, config: &mut Config) -> VulkanResult<PhysicalDeviceInfo> {
        let persisted_name = config.get(DEVICE_NAME_KEY, "");
        let persisted_id: Option<u32> = config.get(DEVICE_ID_KEY, "").parse().ok();
        let persisted = match (persisted_name.as_str(), persisted_id) {
            ("", _) | (_, None) => None,
            (name, Some(id)) => Some((name, id)),
        };

        let chosen = select_device(&self.devices, persisted).ok_or_else(|| {
            VulkanError::InitializationFailed(
                "Failed to find a suitable physical device!".to_string(),
            )
        })?;

        log::info!(
            "Selected physical device: ({:04X}:{:04X}) \"{}\"",
            chosen.vendor_id,
            chosen.device_id,
            chosen.name
        );
        config.set(DEVICE_NAME_KEY, &chosen.name);
        config.set(DEVICE_ID_KEY, &chosen.device_id.to_string());

        Ok(chosen.clone())
    }
}

/// Deduplicated queue families to create queues for, graphics first.
fn unique_queue_families(graphics: u32, present: u32) -> Vec<u32> {
    let mut families = vec![graphics];
    if present != graphics {
        families.push(present);
    }
    families
}

/// Whether `props` offers `features` under the given tiling mode.
fn tiling_supports(props: vk::FormatProperties, tiling: vk::ImageTiling, features: vk::FormatFeatureFlags) -> bool {
    match tiling {
        vk::ImageTiling::LINEAR => props.linear_tiling_features.contains(features),
        _ => props.optimal_tiling_features.contains(features),
    }
}

/// First memory type index matching `type_filter` and carrying `required`.
fn find_memory_type_index(
    memory_props: &vk::PhysicalDeviceMemoryProperties,
    type_filter: u32,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    (0..memory_props.memory_type_count).find(|&i| {
        (type_filter & (1 << i)) != 0
            && memory_props.memory_types[i as usize]
                .property_flags
                .contains(required)
    })
}

/// Opened device: queues, command pool, allocation helpers.
///
/// Exactly one `LogicalDevice` exists per instance for the process lifetime.
pub struct LogicalDevice {
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: ash::Device,
    graphics_queue: vk::Queue,
    present_queue: vk::Queue,
    graphics_family: u32,
    present_family: u32,
    command_pool: vk::CommandPool,
    swapchain_loader: SwapchainLoader,
}

impl LogicalDevice {
    /// Open the chosen physical device.
    ///
    /// Builds a minimal unique set of queue requests, enables anisotropic
    /// sampling and the swapchain extension, retrieves the queue handles and
    /// allocates a command pool for transient, individually resettable
    /// command buffers.
    pub fn new(
        context: &GraphicsContext,
        physical: &PhysicalDeviceInfo,
        enable_diagnostics: bool,
    ) -> VulkanResult<Self> {
        let instance = context.instance();
        let indices = find_queue_families(
            instance,
            context.surface_loader(),
            context.surface(),
            physical.handle,
        )?;
        let graphics_family = indices.graphics.ok_or_else(|| {
            VulkanError::InitializationFailed("No graphics queue family found".to_string())
        })?;
        let present_family = indices.present.ok_or_else(|| {
            VulkanError::InitializationFailed("No present queue family found".to_string())
        })?;

        let priorities = [1.0_f32];
        let queue_infos: Vec<vk::DeviceQueueCreateInfo> =
            unique_queue_families(graphics_family, present_family)
                .into_iter()
                .map(|family| {
                    vk::DeviceQueueCreateInfo::builder()
                        .queue_family_index(family)
                        .queue_priorities(&priorities)
                        .build()
                })
                .collect();

        let features = vk::PhysicalDeviceFeatures::builder().sampler_anisotropy(true);
        let extension_ptrs = [SwapchainLoader::name().as_ptr()];
        // Device layers are ignored by modern drivers but passing the
        // validation layer here keeps old loaders diagnosable too.
        let layer_names = super::instance::required_layers(enable_diagnostics);
        let layer_ptrs: Vec<*const i8> = layer_names.iter().map(|l| l.as_ptr()).collect();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_layer_names(&layer_ptrs)
            .enabled_extension_names(&extension_ptrs)
            .enabled_features(&features);

        log::trace!("Creating logical device...");
        let device = unsafe {
            instance
                .create_device(physical.handle, &create_info, None)
                .map_err(VulkanError::Api)?
        };

        let graphics_queue = unsafe { device.get_device_queue(graphics_family, 0) };
        let present_queue = unsafe { device.get_device_queue(present_family, 0) };

        log::trace!("Creating command pool...");
        let pool_info = vk::CommandPoolCreateInfo::builder()
            .queue_family_index(graphics_family)
            .flags(
                vk::CommandPoolCreateFlags::TRANSIENT
                    | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER,
            );
        let command_pool = unsafe {
            device
                .create_command_pool(&pool_info, None)
                .map_err(VulkanError::Api)?
        };

        let swapchain_loader = SwapchainLoader::new(instance, &device);

        Ok(Self {
            instance: instance.clone(),
            physical_device: physical.handle,
            device,
            graphics_queue,
            present_queue,
            graphics_family,
            present_family,
            command_pool,
            swapchain_loader,
        })
    }

    /// The opened device handle wrapper.
    pub fn device(&self) -> &ash::Device {
        &self.device
    }

    /// The physical device this logical device was opened on.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Queue accepting graphics submissions.
    pub fn graphics_queue(&self) -> vk::Queue {
        self.graphics_queue
    }

    /// Queue accepting present requests (may equal the graphics queue).
    pub fn present_queue(&self) -> vk::Queue {
        self.present_queue
    }

    /// Graphics queue family index.
    pub fn graphics_family(&self) -> u32 {
        self.graphics_family
    }

    /// Present queue family index.
    pub fn present_family(&self) -> u32 {
        self.present_family
    }

    /// The primary command pool.
    pub fn command_pool(&self) -> vk::CommandPool {
        self.command_pool
    }

    /// The swapchain extension loader.
    pub fn swapchain_loader(&self) -> &SwapchainLoader {
        &self.swapchain_loader
    }

    /// Block until all submitted work completed.
    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.device.device_wait_idle().map_err(VulkanError::Api) }
    }

    /// Memory type index satisfying `type_filter` and `properties`.
    ///
    /// Fails fatally when no type matches; allocation cannot proceed.
    pub fn find_memory_type(
        &self,
        type_filter: u32,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<u32> {
        let memory_props = unsafe {
            self.instance
                .get_physical_device_memory_properties(self.physical_device)
        };
        find_memory_type_index(&memory_props, type_filter, properties)
            .ok_or(VulkanError::NoSuitableMemoryType)
    }

    /// First format in `candidates` supporting `features` under `tiling`.
    pub fn find_supported_format(
        &self,
        candidates: &[vk::Format],
        tiling: vk::ImageTiling,
        features: vk::FormatFeatureFlags,
    ) -> VulkanResult<vk::Format> {
        candidates
            .iter()
            .copied()
            .find(|&format| {
                let props = unsafe {
                    self.instance
                        .get_physical_device_format_properties(self.physical_device, format)
                };
                tiling_supports(props, tiling, features)
            })
            .ok_or(VulkanError::NoSupportedFormat)
    }

    /// Create an image and bind freshly allocated memory to it.
    pub fn create_image_with_memory(
        &self,
        image_info: &vk::ImageCreateInfo,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<(vk::Image, vk::DeviceMemory)> {
        unsafe {
            let image = self
                .device
                .create_image(image_info, None)
                .map_err(VulkanError::Api)?;

            let requirements = self.device.get_image_memory_requirements(image);
            let alloc_info = vk::MemoryAllocateInfo::builder()
                .allocation_size(requirements.size)
                .memory_type_index(self.find_memory_type(requirements.memory_type_bits, properties)?);

            let memory = match self.device.allocate_memory(&alloc_info, None) {
                Ok(memory) => memory,
                Err(err) => {
                    self.device.destroy_image(image, None);
                    return Err(VulkanError::Api(err));
                }
            };
            if let Err(err) = self.device.bind_image_memory(image, memory, 0) {
                self.device.destroy_image(image, None);
                self.device.free_memory(memory, None);
                return Err(VulkanError::Api(err));
            }

            Ok((image, memory))
        }
    }

    /// Create a buffer and bind freshly allocated memory to it.
    pub fn create_buffer(
        &self,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<(vk::Buffer, vk::DeviceMemory)> {
        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        unsafe {
            let buffer = self
                .device
                .create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);
            let alloc_info = vk::MemoryAllocateInfo::builder()
                .allocation_size(requirements.size)
                .memory_type_index(self.find_memory_type(requirements.memory_type_bits, properties)?);

            let memory = match self.device.allocate_memory(&alloc_info, None) {
                Ok(memory) => memory,
                Err(err) => {
                    self.device.destroy_buffer(buffer, None);
                    return Err(VulkanError::Api(err));
                }
            };
            if let Err(err) = self.device.bind_buffer_memory(buffer, memory, 0) {
                self.device.destroy_buffer(buffer, None);
                self.device.free_memory(memory, None);
                return Err(VulkanError::Api(err));
            }

            Ok((buffer, memory))
        }
    }

    /// Create a host-visible buffer initialized with `data`.
    ///
    /// Used for static geometry: allocate, map, copy, unmap.
    pub fn create_buffer_with_data(
        &self,
        usage: vk::BufferUsageFlags,
        data: &[u8],
    ) -> VulkanResult<(vk::Buffer, vk::DeviceMemory)> {
        let size = data.len() as vk::DeviceSize;
        let (buffer, memory) = self.create_buffer(
            size,
            usage,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )?;

        unsafe {
            let mapped = match self
                .device
                .map_memory(memory, 0, size, vk::MemoryMapFlags::empty())
            {
                Ok(ptr) => ptr,
                Err(err) => {
                    self.device.destroy_buffer(buffer, None);
                    self.device.free_memory(memory, None);
                    return Err(VulkanError::Api(err));
                }
            };
            std::ptr::copy_nonoverlapping(data.as_ptr(), mapped.cast::<u8>(), data.len());
            self.device.unmap_memory(memory);
        }

        Ok((buffer, memory))
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        log::trace!("Destroying device objects...");
        unsafe {
            let _ = self.device.device_wait_idle();
            if self.command_pool != vk::CommandPool::null() {
                self.device.destroy_command_pool(self.command_pool, None);
            }
            self.device.destroy_device(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, device_id: u32, class: DeviceClass, score: i32) -> PhysicalDeviceInfo {
        PhysicalDeviceInfo {
            handle: vk::PhysicalDevice::null(),
            name: name.to_string(),
            vendor_id: 0x10DE,
            device_id,
            class,
            score,
        }
    }

    #[test]
    fn rate_prefers_discrete_over_integrated() {
        let discrete = rate_suitability(DeviceClass::Discrete, 128);
        let integrated = rate_suitability(DeviceClass::Integrated, 128);
        let cpu = rate_suitability(DeviceClass::Cpu, 128);
        assert!(discrete > integrated);
        assert!(integrated > cpu);
    }

    #[test]
    fn rate_rewards_push_constant_budget() {
        assert_eq!(
            rate_suitability(DeviceClass::Discrete, 256),
            rate_suitability(DeviceClass::Discrete, 128) + 100
        );
        // The bonus never flips the class ordering.
        assert!(
            rate_suitability(DeviceClass::Discrete, 128)
                > rate_suitability(DeviceClass::Integrated, 256)
        );
    }

    #[test]
    fn select_picks_highest_score() {
        let devices = vec![
            info("Integrated", 1, DeviceClass::Integrated, 500),
            info("Discrete", 2, DeviceClass::Discrete, 1100),
            info("Cpu", 3, DeviceClass::Cpu, 100),
        ];
        let chosen = select_device(&devices, None).expect("non-empty list");
        assert_eq!(chosen.name, "Discrete");
    }

    #[test]
    fn select_breaks_ties_by_enumeration_order() {
        let devices = vec![
            info("First", 1, DeviceClass::Discrete, 1000),
            info("Second", 2, DeviceClass::Discrete, 1000),
        ];
        // Deterministic across repeated runs.
        for _ in 0..3 {
            let chosen = select_device(&devices, None).expect("non-empty list");
            assert_eq!(chosen.name, "First");
        }
    }

    #[test]
    fn select_prefers_persisted_device_when_still_present() {
        let devices = vec![
            info("Discrete", 2, DeviceClass::Discrete, 1100),
            info("Integrated", 1, DeviceClass::Integrated, 500),
        ];
        let chosen = select_device(&devices, Some(("Integrated", 1))).expect("non-empty list");
        assert_eq!(chosen.name, "Integrated");
    }

    #[test]
    fn select_rescores_when_persisted_device_is_gone() {
        let devices = vec![info("Discrete", 2, DeviceClass::Discrete, 1100)];
        let chosen = select_device(&devices, Some(("Removed", 9))).expect("non-empty list");
        assert_eq!(chosen.name, "Discrete");
    }

    #[test]
    fn select_returns_none_for_empty_list() {
        assert!(select_device(&[], None).is_none());
    }

    #[test]
    fn pick_persists_the_winning_device() {
        let path = std::env::temp_dir().join(format!(
            "prism_device_test_{}.cfg",
            std::process::id()
        ));
        let mut config = crate::core::Config::load(&path);

        let selector = PhysicalDeviceSelector {
            devices: vec![
                info("Integrated", 1, DeviceClass::Integrated, 500),
                info("Discrete", 0x1234, DeviceClass::Discrete, 1100),
            ],
        };
        let chosen = selector.pick(&mut config).expect("suitable device exists");
        assert_eq!(chosen.name, "Discrete");
        assert_eq!(config.get(DEVICE_NAME_KEY, ""), "Discrete");
        assert_eq!(config.get(DEVICE_ID_KEY, ""), "4660");

        // The persisted identity is preferred on the next pick even when a
        // higher-scoring device appears.
        let richer = PhysicalDeviceSelector {
            devices: vec![
                info("Newer Discrete", 7, DeviceClass::Discrete, 1200),
                info("Discrete", 0x1234, DeviceClass::Discrete, 1100),
            ],
        };
        let repeat = richer.pick(&mut config).expect("suitable device exists");
        assert_eq!(repeat.name, "Discrete");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn pick_fails_without_suitable_devices() {
        let path = std::env::temp_dir().join(format!(
            "prism_device_test_empty_{}.cfg",
            std::process::id()
        ));
        let mut config = crate::core::Config::load(&path);
        let selector = PhysicalDeviceSelector { devices: Vec::new() };
        assert!(selector.pick(&mut config).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unique_queue_families_deduplicates() {
        assert_eq!(unique_queue_families(0, 0), vec![0]);
        assert_eq!(unique_queue_families(0, 2), vec![0, 2]);
    }

    #[test]
    fn memory_type_index_honors_filter_and_flags() {
        let mut props = vk::PhysicalDeviceMemoryProperties::default();
        props.memory_type_count = 2;
        props.memory_types[0].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;
        props.memory_types[1].property_flags =
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;

        // Type 1 matches the host-visible request.
        assert_eq!(
            find_memory_type_index(&props, 0b11, vk::MemoryPropertyFlags::HOST_VISIBLE),
            Some(1)
        );
        // The filter excludes type 1 even though its flags match.
        assert_eq!(
            find_memory_type_index(&props, 0b01, vk::MemoryPropertyFlags::HOST_VISIBLE),
            None
        );
        assert_eq!(
            find_memory_type_index(&props, 0b11, vk::MemoryPropertyFlags::DEVICE_LOCAL),
            Some(0)
        );
    }

    #[test]
    fn tiling_support_reads_the_matching_feature_set() {
        let props = vk::FormatProperties {
            linear_tiling_features: vk::FormatFeatureFlags::empty(),
            optimal_tiling_features: vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
            buffer_features: vk::FormatFeatureFlags::empty(),
        };
        assert!(tiling_supports(
            props,
            vk::ImageTiling::OPTIMAL,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT
        ));
        assert!(!tiling_supports(
            props,
            vk::ImageTiling::LINEAR,
            vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT
        ));
    }
}
