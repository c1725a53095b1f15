//! Scene-graph walk: turns the scene's frames into a flat draw list.
//!
//! The walk mirrors a push/pop matrix stack. Each level multiplies its own
//! frame onto the current top, draws its primitive, recurses into its
//! children and then restores the top so siblings start from the parent's
//! matrix.

use nalgebra::{Matrix4, Point3};

use crate::geometry::Primitive;
use crate::lighting::{scene_lights, LightSource, Material, Rgb};
use crate::scene::{FrameId, Scene, LIGHT_COUNT};

/// Drawable pieces of the gyroscope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    OuterRing,
    MiddleRing,
    InnerRing,
    Rotor,
    LightMarker(usize),
}

impl Part {
    pub const ALL: [Part; 6] = [
        Part::OuterRing,
        Part::MiddleRing,
        Part::InnerRing,
        Part::Rotor,
        Part::LightMarker(0),
        Part::LightMarker(1),
    ];

    pub fn primitive(self) -> Primitive {
        match self {
            Part::OuterRing => Primitive::Torus { minor: 0.1, major: 4.4 },
            Part::MiddleRing => Primitive::Torus { minor: 0.1, major: 4.2 },
            Part::InnerRing => Primitive::Torus { minor: 0.1, major: 4.0 },
            Part::Rotor => Primitive::Sphere { radius: 0.6 },
            Part::LightMarker(_) => Primitive::Sphere { radius: 0.15 },
        }
    }
}

/// One primitive to draw with its eye-space transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub part: Part,
    pub model_view: Matrix4<f32>,
    pub material: Material,
}

/// Matrix stack with scoped pushes
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: Vec<Matrix4<f32>>,
}

impl MatrixStack {
    pub fn new(root: Matrix4<f32>) -> Self {
        Self { stack: vec![root] }
    }

    pub fn top(&self) -> &Matrix4<f32> {
        // The root entry is never popped
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Right-multiply the top by `m`
    pub fn mult(&mut self, m: &Matrix4<f32>) {
        let last = self.stack.len() - 1;
        self.stack[last] *= m;
    }

    /// Run `f` on a copy of the top; the top is restored afterwards
    pub fn push<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let top = *self.top();
        self.stack.push(top);
        let result = f(self);
        self.stack.pop();
        result
    }
}

fn material_for(part: Part, scene: &Scene) -> Material {
    match part {
        Part::OuterRing => Material::grey(),
        Part::MiddleRing => Material::brass(),
        Part::InnerRing => Material::chrome(),
        Part::Rotor => Material::copper(),
        Part::LightMarker(index) => {
            if scene.light_enabled(index) {
                Material::emissive(scene_lights()[index].diffuse.map(|c| c.max(0.3)))
            } else {
                Material::emissive(Rgb::new(0.08, 0.08, 0.08))
            }
        }
    }
}

/// Flatten the scene into draw calls, `view` being the eye transform
pub fn compose(scene: &Scene, view: &Matrix4<f32>) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(Part::ALL.len());
    let mut stack = MatrixStack::new(*view);

    let mut draw = |model_view: Matrix4<f32>, part: Part| {
        items.push(DrawItem {
            part,
            model_view,
            material: material_for(part, scene),
        });
    };

    stack.push(|stack| {
        stack.mult(scene.frame(FrameId::World).matrix());
        stack.push(|stack| {
            stack.mult(scene.frame(FrameId::Outer).matrix());
            stack.mult(&Matrix4::new_translation(&scene.outer_jitter()));
            draw(*stack.top(), Part::OuterRing);
            stack.push(|stack| {
                stack.mult(scene.frame(FrameId::Middle).matrix());
                draw(*stack.top(), Part::MiddleRing);
                stack.push(|stack| {
                    stack.mult(scene.frame(FrameId::Inner).matrix());
                    draw(*stack.top(), Part::InnerRing);
                    draw(*stack.top(), Part::Rotor);
                });
            });
        });
    });

    for index in 0..LIGHT_COUNT {
        if let Some(frame) = FrameId::light(index) {
            stack.push(|stack| {
                stack.mult(scene.frame(frame).matrix());
                draw(*stack.top(), Part::LightMarker(index));
            });
        }
    }

    items
}

/// Enabled lights placed in eye space; disabled lights are left out entirely
pub fn lights(scene: &Scene, view: &Matrix4<f32>) -> Vec<LightSource> {
    let table = scene_lights();
    (0..LIGHT_COUNT)
        .filter(|&index| scene.light_enabled(index))
        .filter_map(|index| {
            let to_eye = eye_matrix(scene, view, FrameId::light(index)?);
            let light = table[index];
            Some(LightSource {
                light,
                position: to_eye.transform_point(&Point3::origin()),
                direction: light
                    .spot
                    .map(|spot| to_eye.transform_vector(&spot.direction).normalize()),
            })
        })
        .collect()
}

/// Frame-to-eye matrix, following the frame's parents up to the root
fn eye_matrix(scene: &Scene, view: &Matrix4<f32>, id: FrameId) -> Matrix4<f32> {
    let mut chain = vec![id];
    while let Some(parent) = chain.last().and_then(|id| id.parent()) {
        chain.push(parent);
    }
    chain
        .iter()
        .rev()
        .fold(*view, |acc, id| acc * scene.frame(*id).matrix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::transform::{Axis, Space};
    use nalgebra::Vector3;

    fn item(items: &[DrawItem], part: Part) -> DrawItem {
        *items.iter().find(|i| i.part == part).unwrap()
    }

    #[test]
    fn test_stack_restores_after_push() {
        let mut stack = MatrixStack::new(Matrix4::identity());
        let inner = stack.push(|stack| {
            stack.mult(&Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
            stack.push(|stack| {
                stack.mult(&Matrix4::new_scaling(2.0));
                assert_eq!(stack.depth(), 3);
                *stack.top()
            })
        });
        assert_eq!(inner[(0, 3)], 1.0);
        assert_eq!(inner[(0, 0)], 2.0);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), &Matrix4::identity());
    }

    #[test]
    fn test_compose_draws_every_part_once() {
        let scene = Scene::new();
        let items = compose(&scene, &Matrix4::identity());
        assert_eq!(items.len(), Part::ALL.len());
        for part in Part::ALL {
            assert_eq!(items.iter().filter(|i| i.part == part).count(), 1);
        }
    }

    #[test]
    fn test_children_follow_parents() {
        let mut scene = Scene::new();
        scene.apply(&Command::Translate {
            frame: FrameId::Outer,
            axis: Axis::X,
            space: Space::Local,
            delta: 2.0,
        });
        scene.apply(&Command::Translate {
            frame: FrameId::Inner,
            axis: Axis::Y,
            space: Space::Local,
            delta: 1.0,
        });
        let items = compose(&scene, &Matrix4::identity());
        let origin = |part| item(&items, part).model_view.transform_point(&Point3::origin());

        assert!((origin(Part::OuterRing) - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-5);
        assert!((origin(Part::MiddleRing) - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-5);
        assert!((origin(Part::InnerRing) - Point3::new(2.0, 1.0, 0.0)).norm() < 1e-5);
        // Light markers hang off the eye, not the world
        assert!((origin(Part::LightMarker(1)) - Point3::new(6.0, 0.2, 0.0)).norm() < 1e-5);
        let inner = eye_matrix(&scene, &Matrix4::identity(), FrameId::Inner);
        assert!((inner.transform_point(&Point3::origin()) - origin(Part::InnerRing)).norm() < 1e-5);
    }

    #[test]
    fn test_world_moves_rings_but_not_lights() {
        let mut scene = Scene::new();
        scene.apply(&Command::Translate {
            frame: FrameId::World,
            axis: Axis::Z,
            space: Space::Parent,
            delta: -3.0,
        });
        let items = compose(&scene, &Matrix4::identity());
        let origin = |part| item(&items, part).model_view.transform_point(&Point3::origin());
        assert!((origin(Part::Rotor).z + 3.0).abs() < 1e-5);
        assert!((origin(Part::LightMarker(0)) - Point3::new(-0.2, 0.5, 0.2)).norm() < 1e-5);
    }

    #[test]
    fn test_jitter_shifts_rings_only() {
        let mut scene = Scene::new();
        scene.set_outer_jitter(Vector3::new(0.03, 0.0, 0.0));
        let items = compose(&scene, &Matrix4::identity());
        let origin = |part| item(&items, part).model_view.transform_point(&Point3::origin());
        assert!((origin(Part::OuterRing).x - 0.03).abs() < 1e-6);
        assert!((origin(Part::InnerRing).x - 0.03).abs() < 1e-6);
        assert!((origin(Part::LightMarker(0)).x + 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_lights_are_dropped() {
        let mut scene = Scene::new();
        assert_eq!(lights(&scene, &Matrix4::identity()).len(), 2);
        scene.apply(&Command::ToggleLight { index: 0 });
        let remaining = lights(&scene, &Matrix4::identity());
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].light.spot.is_some());
        scene.apply(&Command::ToggleLight { index: 1 });
        assert!(lights(&scene, &Matrix4::identity()).is_empty());
    }

    #[test]
    fn test_lights_are_placed_through_the_view() {
        let scene = Scene::new();
        let view = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -10.0));
        let placed = lights(&scene, &view);
        assert!((placed[0].position - Point3::new(-0.2, 0.5, -9.8)).norm() < 1e-5);
        assert!((placed[1].position - Point3::new(6.0, 0.2, -10.0)).norm() < 1e-5);
    }

    #[test]
    fn test_spot_direction_follows_light_frame() {
        let mut scene = Scene::new();
        scene.apply(&Command::Rotate {
            frame: FrameId::Light1,
            axis: Axis::Y,
            space: Space::Local,
            degrees: 90.0,
        });
        let spot = lights(&scene, &Matrix4::identity())[1];
        let direction = spot.direction.unwrap();
        // -x turned a quarter about y points along +z
        assert!((direction - Vector3::z()).norm() < 1e-5);
    }

    #[test]
    fn test_marker_material_tracks_toggle() {
        let mut scene = Scene::new();
        let lit = item(&compose(&scene, &Matrix4::identity()), Part::LightMarker(0)).material;
        scene.apply(&Command::ToggleLight { index: 0 });
        let dark = item(&compose(&scene, &Matrix4::identity()), Part::LightMarker(0)).material;
        assert!(lit.emission.norm() > dark.emission.norm());
    }
}
