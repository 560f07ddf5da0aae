use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box described by minimum and maximum corners.
///
/// Every test is boundary-inclusive: a point exactly on a face counts as
/// inside, and two boxes sharing a face overlap. Zero-size boxes are legal
/// degenerate points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const ZERO: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered at `center` extending `half` on each side.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Interval overlap on all three axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Slab-method ray intersection for a normalized direction. Returns the
    /// hit distance and an axis-aligned surface normal; an origin inside
    /// the box hits at distance 0 with the reversed ray direction as the
    /// normal.
    pub fn ray_intersect(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<(f32, Vec3)> {
        if direction.length_squared() < f32::EPSILON {
            return None;
        }
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = 0;
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            if d.abs() < f32::EPSILON {
                // Ray parallel to this slab: must already be inside it.
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (self.min[axis] - o) * inv;
            let mut t1 = (self.max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_enter {
                t_enter = t0;
                enter_axis = axis;
            }
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }
        if t_exit < 0.0 || t_enter > max_distance {
            return None;
        }
        if t_enter < 0.0 {
            return Some((0.0, -direction));
        }
        let mut normal = Vec3::ZERO;
        normal[enter_axis] = if direction[enter_axis] > 0.0 { -1.0 } else { 1.0 };
        Some((t_enter, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(0.75, 0.0, 0.0));
        let c = unit_box_at(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert!(a.intersects(&b));
        assert_eq!(a.intersects(&c), c.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn touching_faces_count_as_overlap() {
        let a = unit_box_at(Vec3::ZERO);
        let b = unit_box_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn point_on_face_is_inside() {
        let b = unit_box_at(Vec3::ZERO);
        assert!(b.contains_point(Vec3::new(0.5, 0.0, 0.0)));
        assert!(b.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!b.contains_point(Vec3::new(0.51, 0.0, 0.0)));
    }

    #[test]
    fn degenerate_box_is_a_point() {
        let point_box = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ZERO);
        assert!(point_box.contains_point(Vec3::ZERO));
        assert!(point_box.intersects(&unit_box_at(Vec3::ZERO)));
        assert!(!point_box.intersects(&unit_box_at(Vec3::new(2.0, 0.0, 0.0))));
    }

    #[test]
    fn ray_hits_facing_side() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, -5.0));
        let (distance, normal) = b
            .ray_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 100.0)
            .unwrap();
        assert!((distance - 4.5).abs() < 1e-4);
        assert_eq!(normal, Vec3::Z);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, -5.0));
        assert!(b
            .ray_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), 100.0)
            .is_none());
    }

    #[test]
    fn ray_beyond_max_distance_misses() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, -5.0));
        assert!(b
            .ray_intersect(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 4.0)
            .is_none());
    }

    #[test]
    fn ray_from_inside_hits_at_zero() {
        let b = unit_box_at(Vec3::ZERO);
        let (distance, normal) = b.ray_intersect(Vec3::ZERO, Vec3::X, 100.0).unwrap();
        assert_eq!(distance, 0.0);
        assert_eq!(normal, -Vec3::X);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let b = unit_box_at(Vec3::ZERO);
        assert!(b
            .ray_intersect(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 100.0)
            .is_none());
    }
}
