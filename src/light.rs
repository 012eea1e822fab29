//! Lighting configuration for the demo scene.
//!
//! The scene is lit by an ambient term and a small number of directional
//! lights. Directions point from the light towards the scene.

use crate::color::{Color, WHITE};
use glamx::Vec3;

/// Maximum number of directional lights supported in a scene.
pub const MAX_LIGHTS: usize = 4;

/// The type of light source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightType {
    /// Uniform light hitting every surface equally, whatever its orientation.
    Ambient,
    /// A directional light with parallel rays (like the sun).
    Directional(Vec3),
}

/// A light source of the scene.
///
/// # Examples
/// ```no_run
/// # use instagrid::prelude::*;
/// let ambient = Light::ambient().with_intensity(0.6);
/// let sun = Light::directional(Vec3::new(-1.0, -2.0, -1.0))
///     .with_intensity(0.8);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Light {
    /// The type of light.
    pub light_type: LightType,
    /// The color of the light (RGBA, each component 0.0-1.0).
    pub color: Color,
    /// The intensity multiplier for the light.
    pub intensity: f32,
    /// Whether the light is enabled.
    pub enabled: bool,
}

impl Light {
    /// Creates a white ambient light of unit intensity.
    pub fn ambient() -> Self {
        Self {
            light_type: LightType::Ambient,
            color: WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    /// Creates a white directional light shining along `dir`.
    pub fn directional(dir: Vec3) -> Self {
        Self {
            light_type: LightType::Directional(dir.normalize_or_zero()),
            color: WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    /// Sets the light intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Enables or disables the light.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    fn radiance(&self) -> Vec3 {
        Vec3::new(self.color.r, self.color.g, self.color.b) * self.intensity
    }
}

/// GPU layout of the lights uniform, must match `Lights` in `mesh.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLights {
    /// Sum of all ambient lights (rgb), `w` unused.
    pub ambient: [f32; 4],
    /// Direction of each directional light, `w` unused.
    pub directions: [[f32; 4]; MAX_LIGHTS],
    /// Radiance of each directional light, `w` unused.
    pub colors: [[f32; 4]; MAX_LIGHTS],
    /// Number of valid entries in `directions` and `colors`.
    pub num_lights: u32,
    pub _padding: [u32; 3],
}

/// The set of lights of a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightCollection {
    lights: Vec<Light>,
}

impl LightCollection {
    /// Creates an empty light collection.
    pub fn new() -> Self {
        Self { lights: Vec::new() }
    }

    /// Adds a light to the collection.
    ///
    /// Returns `false` if the light is directional and the collection already
    /// holds [`MAX_LIGHTS`] directional lights.
    pub fn add(&mut self, light: Light) -> bool {
        if matches!(light.light_type, LightType::Directional(_))
            && self.num_directional() >= MAX_LIGHTS
        {
            return false;
        }

        self.lights.push(light);
        true
    }

    /// Iterates through the lights.
    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Returns the number of lights in the collection.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    fn num_directional(&self) -> usize {
        self.lights
            .iter()
            .filter(|l| matches!(l.light_type, LightType::Directional(_)))
            .count()
    }

    /// Packs the enabled lights into their GPU representation.
    pub fn to_gpu(&self) -> GpuLights {
        let mut res = GpuLights::default();
        let mut ambient = Vec3::ZERO;
        let mut n = 0;

        for light in self.lights.iter().filter(|l| l.enabled) {
            match light.light_type {
                LightType::Ambient => ambient += light.radiance(),
                LightType::Directional(dir) => {
                    res.directions[n] = dir.extend(0.0).to_array();
                    res.colors[n] = light.radiance().extend(0.0).to_array();
                    n += 1;
                }
            }
        }

        res.ambient = ambient.extend(1.0).to_array();
        res.num_lights = n as u32;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambient_lights_are_summed() {
        let mut lights = LightCollection::new();
        lights.add(Light::ambient().with_intensity(0.25));
        lights.add(Light::ambient().with_intensity(0.5));
        lights.add(Light::ambient().with_enabled(false));

        let gpu = lights.to_gpu();
        assert_eq!(gpu.ambient[0], 0.75);
        assert_eq!(gpu.num_lights, 0);
    }

    #[test]
    fn directional_lights_are_capped() {
        let mut lights = LightCollection::new();
        for _ in 0..MAX_LIGHTS {
            assert!(lights.add(Light::directional(Vec3::NEG_Y)));
        }
        assert!(!lights.add(Light::directional(Vec3::NEG_Y)));
        assert!(lights.add(Light::ambient()));

        let gpu = lights.to_gpu();
        assert_eq!(gpu.num_lights as usize, MAX_LIGHTS);
        assert_eq!(gpu.directions[0], [0.0, -1.0, 0.0, 0.0]);
    }
}
