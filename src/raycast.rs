//! Ray construction and intersection against tracked scene nodes.
//!
//! Rays are built in world space from a camera and an NDC interaction point,
//! then tested against each node's [`HitShape`] in the node's local space via
//! the inverse world transform. Hits report world-space distance so callers
//! can sort nearest-first.

use crate::camera::PerspectiveCamera;
use crate::scene::{HitShape, SceneGraph};
use crate::types::NodeId;
use glam::{Vec2, Vec3};

/// A world-space ray with a normalised direction.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Builds the pointer ray through an NDC interaction point.
    pub fn from_camera(camera: &PerspectiveCamera, ndc: Vec2) -> Self {
        let unprojected = camera.unproject(Vec3::new(ndc.x, ndc.y, 0.5));
        let dir = (unprojected - camera.position).normalize();
        Self {
            origin: camera.position,
            dir,
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.dir * distance
    }
}

/// A resolved intersection between the pointer ray and a tracked node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vec3,
}

/// Intersects the ray with a single node's hit shape.
///
/// Returns `None` for nodes without a shape, invisible nodes, or misses.
pub fn intersect_node(
    ray: &Ray,
    graph: &SceneGraph,
    id: NodeId,
) -> Option<RayHit> {
    let shape = graph.get(id)?.hit_shape?;
    if !graph.effectively_visible(id) {
        return None;
    }

    let world = graph.world_transform(id);
    let inverse = world.inverse();

    // Transform the ray into node-local space. Direction is intentionally
    // left unnormalised so local t values map back through the same scale.
    let local_origin = inverse.transform_point3(ray.origin);
    let local_dir = inverse.transform_vector3(ray.dir);

    let local_t = match shape {
        HitShape::Rect { width, height } => intersect_rect(local_origin, local_dir, width, height),
        HitShape::Box { half_extents } => intersect_box(local_origin, local_dir, half_extents),
        HitShape::Sphere { radius } => intersect_sphere(local_origin, local_dir, radius),
    }?;

    let local_point = local_origin + local_dir * local_t;
    let point = world.transform_point3(local_point);
    let distance = (point - ray.origin).length();

    Some(RayHit {
        node: id,
        distance,
        point,
    })
}

/// Intersects against every tracked node, appending hits sorted
/// nearest-first into `out`.
pub fn intersect_nodes(
    ray: &Ray,
    graph: &SceneGraph,
    tracked: &[NodeId],
    out: &mut Vec<RayHit>,
) {
    for &id in tracked {
        if let Some(hit) = intersect_node(ray, graph, id) {
            out.push(hit);
        }
    }
    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

fn intersect_rect(origin: Vec3, dir: Vec3, width: f32, height: f32) -> Option<f32> {
    if dir.z.abs() < f32::EPSILON {
        return None;
    }
    let t = -origin.z / dir.z;
    if t < 0.0 {
        return None;
    }
    let hit = origin + dir * t;
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    if hit.x.abs() <= half_w && hit.y.abs() <= half_h {
        Some(t)
    } else {
        None
    }
}

fn intersect_box(origin: Vec3, dir: Vec3, half_extents: Vec3) -> Option<f32> {
    // Slab test over the three axes.
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let extent = half_extents[axis];

        if d.abs() < f32::EPSILON {
            if o.abs() > extent {
                return None;
            }
            continue;
        }

        let t1 = (-extent - o) / d;
        let t2 = (extent - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };
        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

fn intersect_sphere(origin: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    let a = dir.length_squared();
    let b = 2.0 * origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);
    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}
