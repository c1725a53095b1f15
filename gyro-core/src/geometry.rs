/// Geometry primitives for 3D rendering
use std::f32::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Average of the vertex normals, used for flat shading
    pub fn mean_normal(&self) -> Vector3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|v| v.normal).sum();
        sum.normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.position.coords + b.position.coords + c.position.coords) / 3.0)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Split the quad `a b c d` (counter-clockwise) into two triangles
    fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    /// Ring around the z axis in the xy plane.
    ///
    /// `minor` is the tube radius, `major` the distance from the centre to
    /// the middle of the tube; `sides` subdivide the tube and `rings` the
    /// sweep around z.
    pub fn torus(minor: f32, major: f32, sides: usize, rings: usize) -> Self {
        let sides = sides.max(3);
        let rings = rings.max(3);
        let vertex = |i: usize, j: usize| {
            let (sin_u, cos_u) = (TAU * i as f32 / rings as f32).sin_cos();
            let (sin_v, cos_v) = (TAU * j as f32 / sides as f32).sin_cos();
            let reach = major + minor * cos_v;
            Vertex::new(
                reach * cos_u,
                reach * sin_u,
                minor * sin_v,
                cos_v * cos_u,
                cos_v * sin_u,
                sin_v,
            )
        };

        let mut mesh = Self::with_capacity(2 * sides * rings);
        for i in 0..rings {
            for j in 0..sides {
                mesh.add_quad(vertex(i, j), vertex(i + 1, j), vertex(i + 1, j + 1), vertex(i, j + 1));
            }
        }
        mesh
    }

    /// Latitude/longitude sphere centred on the origin
    pub fn sphere(radius: f32, slices: usize, stacks: usize) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let vertex = |slice: usize, stack: usize| {
            let (sin_theta, cos_theta) = (PI * stack as f32 / stacks as f32).sin_cos();
            let (sin_phi, cos_phi) = (TAU * slice as f32 / slices as f32).sin_cos();
            let n = Vector3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
            Vertex::new(n.x * radius, n.y * radius, n.z * radius, n.x, n.y, n.z)
        };

        let mut mesh = Self::with_capacity(2 * slices * stacks);
        for stack in 0..stacks {
            for slice in 0..slices {
                mesh.add_quad(
                    vertex(slice, stack),
                    vertex(slice, stack + 1),
                    vertex(slice + 1, stack + 1),
                    vertex(slice + 1, stack),
                );
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape drawn at one scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Torus { minor: f32, major: f32 },
    Sphere { radius: f32 },
}

impl Primitive {
    /// Build a mesh; `detail` scales the subdivision (1 is coarse)
    pub fn tessellate(&self, detail: usize) -> Mesh {
        let detail = detail.max(1);
        match *self {
            Primitive::Torus { minor, major } => Mesh::torus(minor, major, 6 * detail, 32 * detail),
            Primitive::Sphere { radius } => Mesh::sphere(radius, 12 * detail, 6 * detail),
        }
    }
}
