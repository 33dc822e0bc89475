//! Plane geometry primitives used by the constraint force laws and the safe-distance
//! collision handling in [`crate::layout`].
use std::f64::consts::PI;

use glam::DVec2;

use crate::error::GeometryError;

/// Wraps an angle into `[-PI, PI)`.
///
/// Rust's `%` truncates toward zero rather than flooring, so the branch below is load
/// bearing: for negative `angle` the truncated remainder can itself be negative.
pub fn wrap(angle: f64) -> f64 {
    let mut rem = (angle + PI) % (2.0 * PI);
    if rem < 0.0 {
        rem += 2.0 * PI;
    }
    rem - PI
}

/// Bearing of `a` relative to `b`, wrapped into `[-PI, PI)`.
pub fn angle(a: DVec2, b: DVec2) -> f64 {
    let d = a - b;
    wrap(d.y.atan2(d.x))
}

/// Bearing of `a` relative to `b`, minus the bearing of `c` relative to `b`.
pub fn angle3(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    wrap(angle(a, b) - angle(c, b))
}

/// Distance between two points.
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// Unit vector pointing from `b` toward `a`; falls back to `(1, 0)` for coincident points.
pub fn uv(a: DVec2, b: DVec2) -> DVec2 {
    let d = a - b;
    if d == DVec2::ZERO {
        DVec2::new(1.0, 0.0)
    } else {
        d.normalize()
    }
}

/// Counter-clockwise quarter turn of a vector.
pub fn orthog(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}

/// Finds the intersection of the segment from `line_a` toward `line_b` with the circle
/// `(circle_center, circle_r)` that is nearest to `line_a`.
///
/// The line is solved as `x = m*y + c` when the segment is closer to vertical than
/// horizontal (`|dx| < |dy|`), and as `y = m*x + c` otherwise, to keep the slope `m`
/// well conditioned near either axis.
pub fn first_circle_intersect(
    line_a: DVec2,
    line_b: DVec2,
    circle_center: DVec2,
    circle_r: f64,
) -> Result<DVec2, GeometryError> {
    let disp = line_b - line_a;
    let use_vertical = disp.x.abs() < disp.y.abs();
    let m = if use_vertical {
        disp.x / disp.y
    } else {
        disp.y / disp.x
    };
    let c = if use_vertical {
        -m * line_a.y + line_a.x
    } else {
        -m * line_a.x + line_a.y
    };

    let quad_a = -1.0 - m * m;
    let quad_b = -2.0 * m * c
        + 2.0 * m * (if use_vertical { circle_center.x } else { circle_center.y })
        + 2.0 * (if use_vertical { circle_center.y } else { circle_center.x });
    let quad_c = -c * c + circle_r * circle_r
        - circle_center.x * circle_center.x
        - circle_center.y * circle_center.y
        + 2.0 * c * (if use_vertical { circle_center.x } else { circle_center.y });
    let discriminant = quad_b * quad_b - 4.0 * quad_a * quad_c;
    if discriminant < 0.0 {
        return Err(GeometryError::NoIntersection);
    }

    let sqrt_disc = discriminant.sqrt();
    let root_1 = (-quad_b + sqrt_disc) / (2.0 * quad_a);
    let root_2 = (-quad_b - sqrt_disc) / (2.0 * quad_a);

    let intersect_1 = if use_vertical {
        DVec2::new(m * root_1 + c, root_1)
    } else {
        DVec2::new(root_1, m * root_1 + c)
    };
    let intersect_2 = if use_vertical {
        DVec2::new(m * root_2 + c, root_2)
    } else {
        DVec2::new(root_2, m * root_2 + c)
    };

    Ok(if (intersect_1 - line_a).length() < (intersect_2 - line_a).length() {
        intersect_1
    } else {
        intersect_2
    })
}

/// Bearing of the ray reflected about the surface normal at `reflect_point`, where the
/// normal points from `reflect_origin` to `reflect_point` and the incoming ray travels
/// from `start_point` to `reflect_point`.
pub fn reflected_direction(start_point: DVec2, reflect_point: DVec2, reflect_origin: DVec2) -> f64 {
    let ro = reflect_origin - reflect_point;
    let sr = reflect_point - start_point;
    wrap((-ro.y).atan2(-ro.x) - (sr.y.atan2(sr.x) - ro.y.atan2(ro.x)))
}

/// Point reached by consuming the step length left over after reaching `reflect_point`,
/// travelling onward along `reflect_direction`.
pub fn reflected_position(
    start_point: DVec2,
    step: DVec2,
    reflect_point: DVec2,
    reflect_direction: f64,
) -> DVec2 {
    let reflect_step = reflect_point - start_point;
    let r = step.length() - reflect_step.length();
    reflect_point + r * DVec2::new(reflect_direction.cos(), reflect_direction.sin())
}

/// Rotates a vector to a new bearing, preserving its magnitude.
pub fn rotate_vector_to(vector: DVec2, angle: f64) -> DVec2 {
    let r = vector.length();
    DVec2::new(r * angle.cos(), r * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range() {
        for i in -20..20 {
            let x = i as f64 * 1.3;
            let w = wrap(x);
            assert!((-PI..PI).contains(&w), "wrap({x}) = {w} out of range");
        }
    }

    #[test]
    fn wrap_is_idempotent() {
        for i in -20..20 {
            let x = i as f64 * 0.77;
            assert!((wrap(wrap(x)) - wrap(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn angle_is_antisymmetric() {
        let a = DVec2::new(1.0, 2.0);
        let b = DVec2::new(-3.0, 0.5);
        assert!((wrap(angle(a, b) + PI) - angle(b, a)).abs() < 1e-9);
    }

    #[test]
    fn uv_falls_back_for_coincident_points() {
        let p = DVec2::new(1.0, 1.0);
        assert_eq!(uv(p, p), DVec2::new(1.0, 0.0));
    }

    #[test]
    fn orthog_is_ccw_quarter_turn() {
        assert_eq!(orthog(DVec2::new(1.0, 0.0)), DVec2::new(0.0, 1.0));
    }

    #[test]
    fn first_circle_intersect_finds_nearest_root() {
        let a = DVec2::new(-5.0, 0.0);
        let b = DVec2::new(5.0, 0.0);
        let hit = first_circle_intersect(a, b, DVec2::ZERO, 1.0).unwrap();
        assert!((hit - DVec2::new(-1.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn first_circle_intersect_errors_when_segment_misses() {
        let a = DVec2::new(-5.0, 5.0);
        let b = DVec2::new(5.0, 5.0);
        let err = first_circle_intersect(a, b, DVec2::ZERO, 1.0).unwrap_err();
        assert_eq!(err, GeometryError::NoIntersection);
    }

    #[test]
    fn rotate_vector_to_preserves_magnitude() {
        let v = DVec2::new(3.0, 4.0);
        let rotated = rotate_vector_to(v, PI / 2.0);
        assert!((rotated.length() - v.length()).abs() < 1e-9);
    }
}
