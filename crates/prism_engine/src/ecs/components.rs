//! Built-in components
//!
//! Components are plain data records; behavior lives in the systems that query
//! them. There is no component inheritance, only composition.

use crate::foundation::math::{Mat4, Quat, Vec3};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Stable identity of an entity, unique per process run and suitable for
/// persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(pub u64);

impl Id {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        static SEED: OnceLock<u64> = OnceLock::new();

        let seed = *SEED.get_or_init(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x9E37_79B9_7F4A_7C15)
        });
        Self(splitmix64(seed ^ COUNTER.fetch_add(1, Ordering::Relaxed)))
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

// Standard 64-bit mixer; spreads a sequential counter over the id space.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Human-readable entity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    /// Create a name, substituting `"Entity"` for an empty string.
    pub fn new(name: &str) -> Self {
        if name.is_empty() {
            Self("Entity".to_string())
        } else {
            Self(name.to_string())
        }
    }
}

/// Spatial transform: translation, euler rotation (radians), scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World-space translation
    pub translation: Vec3,
    /// Euler rotation in radians (roll, pitch, yaw)
    pub rotation: Vec3,
    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform from a translation only.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Compose the transform into a matrix (translate, then rotate, then
    /// scale applied to the incoming point).
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::new_translation(&self.translation)
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ids_are_unique() {
        let a = Id::new();
        let b = Id::new();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_name_gets_placeholder() {
        assert_eq!(Name::new("").0, "Entity");
        assert_eq!(Name::new("Player").0, "Player");
    }

    #[test]
    fn default_transform_is_identity() {
        let transform = Transform::default();
        assert_relative_eq!(transform.matrix(), Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn matrix_applies_translation() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let point = transform.matrix().transform_point(&nalgebra::Point3::origin());
        assert_relative_eq!(point.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(point.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(point.z, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn matrix_applies_scale_before_translation() {
        let transform = Transform {
            translation: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::zeros(),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };
        let point = transform
            .matrix()
            .transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.x, 3.0, epsilon = 1e-6);
    }
}
