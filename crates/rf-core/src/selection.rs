//! Cursor hit testing
//!
//! A candidate is scored by how well the direction from the ray origin to the
//! candidate lines up with the ray itself. Candidates are only ever compared
//! against others of the same category (bones against bones, colliders against
//! colliders, ...), so callers pass one category at a time.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::constants::HIT_THRESHOLD;

/// Pointer ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from `origin` through `target`
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Unproject a pointer position (pixels, origin top-left) into a world ray
    pub fn from_screen(screen_pos: Vec2, screen_size: Vec2, view: Mat4, projection: Mat4) -> Self {
        let ndc_x = (2.0 * screen_pos.x / screen_size.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_pos.y / screen_size.y);

        let inv_view_proj = (projection * view).inverse();
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Self::towards(near, far)
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Cosine between the ray and the direction from its origin to `point`.
///
/// Approaches 1.0 as the point lies exactly on the ray. A point at the ray
/// origin scores 0.
pub fn selection_accuracy(ray: &Ray, point: Vec3) -> f32 {
    (point - ray.origin).normalize_or_zero().dot(ray.direction)
}

/// Candidate with the highest accuracy; ties keep the first one seen.
///
/// Returns the candidate and its score, or `None` for an empty set.
pub fn closest_to_cursor<T, I>(ray: &Ray, candidates: I) -> Option<(T, f32)>
where
    I: IntoIterator<Item = (T, Vec3)>,
{
    let mut best: Option<(T, f32)> = None;
    for (candidate, position) in candidates {
        let accuracy = selection_accuracy(ray, position);
        match &best {
            Some((_, best_accuracy)) if accuracy <= *best_accuracy => {}
            _ => best = Some((candidate, accuracy)),
        }
    }
    best
}

/// Closest candidate, if it scores above `threshold`
pub fn pick_with_threshold<T, I>(ray: &Ray, candidates: I, threshold: f32) -> Option<T>
where
    I: IntoIterator<Item = (T, Vec3)>,
{
    closest_to_cursor(ray, candidates)
        .filter(|(_, accuracy)| *accuracy > threshold)
        .map(|(candidate, _)| candidate)
}

/// Closest candidate above the default threshold
pub fn pick<T, I>(ray: &Ray, candidates: I) -> Option<T>
where
    I: IntoIterator<Item = (T, Vec3)>,
{
    pick_with_threshold(ray, candidates, HIT_THRESHOLD)
}

/// Whether `target` is the candidate under the cursor within its category
pub fn is_under_cursor<T, I>(ray: &Ray, target: &T, candidates: I, threshold: f32) -> bool
where
    T: PartialEq,
    I: IntoIterator<Item = (T, Vec3)>,
{
    pick_with_threshold(ray, candidates, threshold).is_some_and(|hit| hit == *target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down_from(x: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, 0.0), Vec3::NEG_Y)
    }

    #[test]
    fn test_accuracy_on_ray_is_one() {
        let ray = down_from(0.0);
        assert_relative_eq!(selection_accuracy(&ray, Vec3::ZERO), 1.0);
        assert_relative_eq!(selection_accuracy(&ray, Vec3::new(0.0, 20.0, 0.0)), -1.0);
    }

    #[test]
    fn test_empty_candidates_is_no_hit() {
        let ray = down_from(0.0);
        let none: Vec<(u32, Vec3)> = Vec::new();
        assert!(closest_to_cursor(&ray, none.clone()).is_none());
        assert!(pick(&ray, none).is_none());
    }

    #[test]
    fn test_closest_is_strict_max() {
        let ray = down_from(0.0);
        let candidates = vec![
            (1, Vec3::new(1.0, 0.0, 0.0)),
            (2, Vec3::new(0.1, 0.0, 0.0)),
            (3, Vec3::new(-0.5, 0.0, 0.0)),
        ];
        let (hit, accuracy) = closest_to_cursor(&ray, candidates).unwrap();
        assert_eq!(hit, 2);
        assert!(accuracy > 0.99);
    }

    #[test]
    fn test_ties_resolve_to_first() {
        let ray = down_from(0.0);
        // Same direction, different distance along the ray
        let candidates = vec![(1, Vec3::new(0.0, 0.0, 0.0)), (2, Vec3::new(0.0, 5.0, 0.0))];
        assert_eq!(closest_to_cursor(&ray, candidates).unwrap().0, 1);
    }

    #[test]
    fn test_threshold_rejects_far_candidates() {
        let ray = down_from(0.0);
        let candidates = vec![(1, Vec3::new(3.0, 0.0, 0.0))];
        assert!(pick(&ray, candidates.clone()).is_none());
        assert_eq!(pick_with_threshold(&ray, candidates, 0.5), Some(1));
    }

    #[test]
    fn test_under_cursor_only_for_best_candidate() {
        let ray = down_from(0.0);
        let candidates = vec![(1, Vec3::new(0.05, 0.0, 0.0)), (2, Vec3::new(0.0, 0.0, 0.0))];
        assert!(is_under_cursor(&ray, &2, candidates.clone(), HIT_THRESHOLD));
        assert!(!is_under_cursor(&ray, &1, candidates, HIT_THRESHOLD));
    }

    #[test]
    fn test_screen_center_ray_looks_forward() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);
        let ray = Ray::from_screen(Vec2::new(400.0, 400.0), Vec2::new(800.0, 800.0), view, projection);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!(selection_accuracy(&ray, Vec3::ZERO) > 0.9999);
    }
}
