//! Spline math and frame computation.
//!
//! Pure value → value transforms with no buffer or structure dependencies.
//! The same cardinal spline samples trace positions, tube cross-section
//! outlines and per-residue color streams (RGB treated as a 3D curve), so
//! geometry slices and color slices line up index for index.

use std::ops::{Add, Mul, Sub};

use glam::Vec3;

/// Values a cardinal spline can interpolate.
pub trait SplineValue:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
}

impl<T> SplineValue for T where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>
{
}

/// Tangent strength that turns a cardinal spline into Catmull-Rom.
pub const CATMULL_ROM: f32 = 0.5;

/// A point along a path with position, tangent, and frame vectors.
#[derive(Clone, Copy, Debug)]
pub struct SplinePoint {
    /// Position on the path.
    pub pos: Vec3,
    /// Unit tangent.
    pub tangent: Vec3,
    /// Unit normal, orthogonal to `tangent`.
    pub normal: Vec3,
    /// `tangent × normal`.
    pub binormal: Vec3,
}

/// Evaluate the cardinal segment between `p1` and `p2` at `t` in [0, 1].
fn cardinal<T: SplineValue>(
    [p0, p1, p2, p3]: [T; 4],
    t: f32,
    strength: f32,
) -> T {
    let m1 = (p2 - p0) * strength;
    let m2 = (p3 - p1) * strength;
    let t2 = t * t;
    let t3 = t2 * t;
    p1 * (2.0 * t3 - 3.0 * t2 + 1.0)
        + m1 * (t3 - 2.0 * t2 + t)
        + p2 * (-2.0 * t3 + 3.0 * t2)
        + m2 * (t3 - t2)
}

/// Sample an open cardinal spline through `points` at `count` parameter
/// values spread uniformly from the first to the last control point.
///
/// The curve passes through every control point; end tangents use
/// reflected phantom points.
#[must_use]
pub fn sample_open<T: SplineValue>(
    points: &[T],
    count: usize,
    strength: f32,
) -> Vec<T> {
    let n = points.len();
    match (n, count) {
        (0, _) | (_, 0) => return Vec::new(),
        (1, _) => return vec![points[0]; count],
        (_, 1) => return vec![points[0]],
        _ => {}
    }

    let span = (n - 1) as f32 / (count - 1) as f32;
    (0..count)
        .map(|i| {
            let s = i as f32 * span;
            let seg = (s.floor() as usize).min(n - 2);
            let t = s - seg as f32;
            let p1 = points[seg];
            let p2 = points[seg + 1];
            let p0 = if seg == 0 {
                p1 * 2.0 - p2
            } else {
                points[seg - 1]
            };
            let p3 = if seg + 2 >= n {
                p2 * 2.0 - p1
            } else {
                points[seg + 2]
            };
            cardinal([p0, p1, p2, p3], t, strength)
        })
        .collect()
}

/// Sample a closed (periodic) cardinal spline through `points` at `count`
/// uniformly spaced parameter values. Sample 0 sits on the first control
/// point; the curve wraps from the last control point back to the first.
#[must_use]
pub fn sample_closed<T: SplineValue>(
    points: &[T],
    count: usize,
    strength: f32,
) -> Vec<T> {
    let n = points.len();
    match (n, count) {
        (0, _) | (_, 0) => return Vec::new(),
        (1, _) => return vec![points[0]; count],
        _ => {}
    }

    let step = n as f32 / count as f32;
    (0..count)
        .map(|i| {
            let s = i as f32 * step;
            let seg = (s.floor() as usize) % n;
            let t = s - s.floor();
            let p0 = points[(seg + n - 1) % n];
            let p1 = points[seg];
            let p2 = points[(seg + 1) % n];
            let p3 = points[(seg + 2) % n];
            cardinal([p0, p1, p2, p3], t, strength)
        })
        .collect()
}

/// Up-sample one color per residue to `factor` colors per residue.
///
/// RGB is treated as a 3D curve and resampled with a Catmull-Rom spline,
/// open or closed. The result always holds `factor * colors.len()`
/// entries, clamped to [0, 1]. A factor of 0 or 1 returns the input.
#[must_use]
pub fn interpolate_colors(
    colors: &[[f32; 3]],
    factor: usize,
    closed: bool,
) -> Vec<[f32; 3]> {
    if factor <= 1 {
        return colors.to_vec();
    }
    let points: Vec<Vec3> = colors.iter().map(|&c| Vec3::from(c)).collect();
    let count = colors.len() * factor;
    let sampled = if closed {
        sample_closed(&points, count, CATMULL_ROM)
    } else {
        sample_open(&points, count, CATMULL_ROM)
    };
    sampled
        .into_iter()
        .map(|c| c.clamp(Vec3::ZERO, Vec3::ONE).to_array())
        .collect()
}

/// Compute tangents from path positions via central differences.
#[must_use]
pub fn compute_tangents(path: &[Vec3]) -> Vec<Vec3> {
    let n = path.len();
    if n < 2 {
        return vec![Vec3::Z; n];
    }
    (0..n)
        .map(|i| {
            if i == 0 {
                (path[1] - path[0]).normalize_or_zero()
            } else if i == n - 1 {
                (path[i] - path[i - 1]).normalize_or_zero()
            } else {
                (path[i + 1] - path[i - 1]).normalize_or_zero()
            }
        })
        .collect()
}

/// Build [`SplinePoint`] shells (position + tangent, frame zeroed).
#[must_use]
pub fn build_frames(path: &[Vec3], tangents: &[Vec3]) -> Vec<SplinePoint> {
    path.iter()
        .zip(tangents.iter())
        .map(|(&pos, &tangent)| SplinePoint {
            pos,
            tangent,
            normal: Vec3::ZERO,
            binormal: Vec3::ZERO,
        })
        .collect()
}

/// Compute Frenet frames (curvature-based).
///
/// The normal points away from the center of curvature. Falls back to an
/// arbitrary frame on straight segments, so consecutive frames can rotate
/// abruptly; callers stitching cross-sections realign with a ring offset.
pub fn compute_frenet_frames(points: &mut [SplinePoint]) {
    if points.len() < 2 {
        return;
    }

    let n = points.len();

    // Curvature vector (dT/ds) at each point via finite differences
    let curvatures: Vec<Vec3> = (0..n)
        .map(|i| {
            if i == 0 {
                points[1].tangent - points[0].tangent
            } else if i == n - 1 {
                points[n - 1].tangent - points[n - 2].tangent
            } else {
                (points[i + 1].tangent - points[i - 1].tangent) * 0.5
            }
        })
        .collect();

    for (point, curv) in points.iter_mut().zip(curvatures) {
        let t = point.tangent;
        let projected = curv - t * t.dot(curv);
        let normal = if projected.length() > 1e-6 {
            -projected.normalize()
        } else {
            any_perpendicular(t)
        };
        point.normal = normal;
        point.binormal = t.cross(normal).normalize_or_zero();
    }
}

/// Rotation-minimizing frames by double reflection (Wang et al. 2008).
///
/// The first normal is any perpendicular of the first tangent. Each later
/// normal is the previous one carried to the next sample without twist
/// about the path.
pub fn compute_rmf(points: &mut [SplinePoint]) {
    let Some(first) = points.first_mut() else {
        return;
    };
    first.normal = any_perpendicular(first.tangent);
    first.binormal = first.tangent.cross(first.normal).normalize_or_zero();

    for i in 1..points.len() {
        let prev = points[i - 1];
        let cur = &mut points[i];
        let step = cur.pos - prev.pos;
        let carried = if step.length_squared() < 1e-10 {
            prev.normal
        } else {
            let normal = reflect(prev.normal, step);
            let tangent = reflect(prev.tangent, step);
            reflect(normal, cur.tangent - tangent)
        };
        let t = cur.tangent;
        cur.normal = (carried - t * t.dot(carried)).normalize_or_zero();
        cur.binormal = t.cross(cur.normal).normalize_or_zero();
    }
}

/// Mirror `v` in the plane whose normal is `axis`. A degenerate axis
/// leaves `v` unchanged.
fn reflect(v: Vec3, axis: Vec3) -> Vec3 {
    let len2 = axis.length_squared();
    if len2 < 1e-10 {
        return v;
    }
    v - axis * (2.0 * axis.dot(v) / len2)
}

/// Some unit vector orthogonal to `t`.
fn any_perpendicular(t: Vec3) -> Vec3 {
    let helper = if t.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    t.cross(helper).normalize_or_zero()
}
