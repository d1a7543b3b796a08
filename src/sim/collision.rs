//! Circle collision primitives
//!
//! Every body in the arena is a circle, so all overlap tests compare squared
//! distances against squared radius sums and never take a square root on the
//! miss path.

use glam::Vec2;

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the second circle toward the first
    pub normal: Vec2,
    /// Overlap depth (always > 0)
    pub penetration: f32,
}

/// Squared-distance overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Whether `point` lies within `radius` of `center`
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Overlap details for two circles, `None` when they do not touch.
///
/// Coincident centers report an arbitrary but stable normal (+X) so callers
/// can still push the bodies apart.
pub fn circle_contact(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<Contact> {
    if !circles_overlap(a, ra, b, rb) {
        return None;
    }
    let delta = a - b;
    let dist = delta.length();
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::X
    };
    Some(Contact {
        normal,
        penetration: ra + rb - dist,
    })
}

/// Unit vector from `from` toward `to`, zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        // Touching exactly at the rim does not count
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.9, 0.0), 10.0));
    }

    #[test]
    fn test_contact_normal_points_from_b_to_a() {
        let contact = circle_contact(Vec2::new(15.0, 0.0), 10.0, Vec2::ZERO, 10.0).unwrap();
        assert!((contact.normal - Vec2::X).length() < 1e-6);
        assert!((contact.penetration - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_centers_still_separate() {
        let contact = circle_contact(Vec2::ONE, 4.0, Vec2::ONE, 4.0).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((contact.penetration - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_miss_returns_none() {
        assert!(circle_contact(Vec2::ZERO, 1.0, Vec2::new(5.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.1));
        assert!(!within_radius(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
    }
}
