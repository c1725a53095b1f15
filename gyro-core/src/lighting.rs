//! Fixed-function style lighting: materials, light sources and the
//! Blinn-Phong shading equation evaluated in eye space.

use nalgebra::{Point3, Vector3};

/// Linear RGB colour, components nominally in `[0, 1]`
pub type Rgb = Vector3<f32>;

/// Ambient term added regardless of any light source
pub fn global_ambient() -> Rgb {
    Rgb::new(0.2, 0.2, 0.2)
}

/// Surface reflectance coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub emission: Rgb,
    pub shininess: f32,
}

impl Material {
    /// Dull grey metal of the outer ring
    pub fn grey() -> Self {
        Self {
            ambient: Rgb::new(0.2, 0.2, 0.2),
            diffuse: Rgb::new(0.2, 0.2, 0.2),
            specular: Rgb::new(0.2, 0.2, 0.2),
            emission: Rgb::zeros(),
            shininess: 80.0,
        }
    }

    pub fn brass() -> Self {
        Self {
            ambient: Rgb::new(0.329412, 0.223529, 0.027451),
            diffuse: Rgb::new(0.780392, 0.568627, 0.113725),
            specular: Rgb::new(0.992157, 0.941176, 0.807843),
            emission: Rgb::zeros(),
            shininess: 27.8974,
        }
    }

    pub fn chrome() -> Self {
        Self {
            ambient: Rgb::new(0.25, 0.25, 0.25),
            diffuse: Rgb::new(0.4, 0.4, 0.4),
            specular: Rgb::new(0.774597, 0.774597, 0.774597),
            emission: Rgb::zeros(),
            shininess: 76.8,
        }
    }

    pub fn copper() -> Self {
        Self {
            ambient: Rgb::new(0.19125, 0.0735, 0.0225),
            diffuse: Rgb::new(0.7038, 0.27048, 0.0828),
            specular: Rgb::new(0.256777, 0.137622, 0.086014),
            emission: Rgb::zeros(),
            shininess: 12.8,
        }
    }

    /// Self-lit surface used to draw a light source
    pub fn emissive(color: Rgb) -> Self {
        Self {
            ambient: Rgb::zeros(),
            diffuse: Rgb::zeros(),
            specular: Rgb::zeros(),
            emission: color,
            shininess: 1.0,
        }
    }
}

/// Cone restriction for a spotlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    /// Axis of the cone in the light's own frame
    pub direction: Vector3<f32>,
    /// Half-angle of the cone, in degrees
    pub cutoff: f32,
    pub exponent: f32,
}

/// Colour properties of a light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub spot: Option<Spot>,
}

impl Light {
    /// Blue-ish point light near the rings
    pub fn key() -> Self {
        Self {
            ambient: Rgb::new(0.1, 0.1, 0.1),
            diffuse: Rgb::new(0.1, 0.1, 0.9),
            specular: Rgb::new(0.9, 0.1, 0.1),
            spot: None,
        }
    }

    /// Spotlight aimed back across the rings from the side
    pub fn spot() -> Self {
        Self {
            ambient: Rgb::new(0.1, 0.0, 0.0),
            diffuse: Rgb::new(0.7, 0.7, 0.9),
            specular: Rgb::new(0.9, 0.1, 0.1),
            spot: Some(Spot {
                direction: Vector3::new(-10.0, 0.0, 0.0),
                cutoff: 64.0,
                exponent: 2.0,
            }),
        }
    }
}

/// The scene's two lights, indexed like the light toggles
pub fn scene_lights() -> [Light; 2] {
    [Light::key(), Light::spot()]
}

/// A light placed in eye space for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub light: Light,
    pub position: Point3<f32>,
    /// Spot axis in eye space, normalised
    pub direction: Option<Vector3<f32>>,
}

/// Colour of a surface point, every vector in eye space.
///
/// The viewer is at infinity along +z. Components are clamped to `[0, 1]`.
pub fn shade(material: &Material, position: &Point3<f32>, normal: &Vector3<f32>, lights: &[LightSource]) -> Rgb {
    let n = normal.normalize();
    let view = Vector3::z();
    let mut color = material.emission + global_ambient().component_mul(&material.ambient);

    for source in lights {
        let to_light = source.position - position;
        let distance = to_light.norm();
        if distance < 1e-6 {
            continue;
        }
        let l = to_light / distance;

        let spot_factor = match (source.light.spot, source.direction) {
            (Some(spot), Some(axis)) => {
                let cos_angle = (-l).dot(&axis);
                if cos_angle < spot.cutoff.to_radians().cos() {
                    0.0
                } else {
                    cos_angle.max(0.0).powf(spot.exponent)
                }
            }
            _ => 1.0,
        };
        if spot_factor == 0.0 {
            continue;
        }

        let mut contribution = source.light.ambient.component_mul(&material.ambient);
        let lambert = n.dot(&l);
        if lambert > 0.0 {
            contribution += source.light.diffuse.component_mul(&material.diffuse) * lambert;
            let half = (l + view).normalize();
            let highlight = n.dot(&half).max(0.0).powf(material.shininess);
            contribution += source.light.specular.component_mul(&material.specular) * highlight;
        }
        color += contribution * spot_factor;
    }

    color.map(|c| c.clamp(0.0, 1.0))
}

/// Perceived brightness of a colour
pub fn luminance(color: &Rgb) -> f32 {
    0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
}
