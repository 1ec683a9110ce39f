//! Closed-form 2-D intersection and cross-plane slope transfer.
//!
//! These are the hot-path formulas behind wire-pair matching in 3-D
//! reconstruction. Everything here is a pure function; the geometry core
//! wraps them with ID validation and endpoint extraction.

/// Comparisons against zero use this absolute band instead of exact
/// floating-point equality.
const DETERMINANT_EPSILON: f64 = 1e-8;

/// Endpoint containment tolerates this much overshoot, in cm.
const ENDPOINT_EPSILON: f64 = 1e-6;

/// Slopes below this magnitude cannot be resolved and are clamped.
const MIN_SLOPE: f64 = 0.001;

/// Intersection of the two infinite lines through segments A and B.
///
/// Solves the 2x2 determinant form; `None` means the lines are parallel
/// (determinant within epsilon of zero).
pub fn intersect_lines(
    a_start: (f64, f64),
    a_end: (f64, f64),
    b_start: (f64, f64),
    b_end: (f64, f64),
) -> Option<(f64, f64)> {
    let denom = (a_start.0 - a_end.0) * (b_start.1 - b_end.1)
        - (a_start.1 - a_end.1) * (b_start.0 - b_end.0);

    if denom.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let a = (a_start.0 * a_end.1 - a_start.1 * a_end.0) / denom;
    let b = (b_start.0 * b_end.1 - b_start.1 * b_end.0) / denom;

    let x = (b_start.0 - b_end.0) * a - (a_start.0 - a_end.0) * b;
    let y = (b_start.1 - b_end.1) * a - (a_start.1 - a_end.1) * b;
    Some((x, y))
}

/// Whether `value` lies in `[min, max]` (in either order), tolerating
/// epsilon overshoot at the endpoints.
fn value_in_range(value: f64, mut min: f64, mut max: f64) -> bool {
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }
    if (value - min).abs() < ENDPOINT_EPSILON || (value - max).abs() < ENDPOINT_EPSILON {
        return true;
    }
    value >= min && value <= max
}

/// Whether the point lies within the bounding intervals of both segments.
pub fn point_within_segments(
    a_start: (f64, f64),
    a_end: (f64, f64),
    b_start: (f64, f64),
    b_end: (f64, f64),
    point: (f64, f64),
) -> bool {
    value_in_range(point.0, a_start.0, a_end.0)
        && value_in_range(point.1, a_start.1, a_end.1)
        && value_in_range(point.0, b_start.0, b_end.0)
        && value_in_range(point.1, b_start.1, b_end.1)
}

/// Intersection of two segments.
///
/// `None` either because the supporting lines are parallel or because the
/// crossing point lies outside one of the segments.
pub fn intersect_segments(
    a_start: (f64, f64),
    a_end: (f64, f64),
    b_start: (f64, f64),
    b_end: (f64, f64),
) -> Option<(f64, f64)> {
    let point = intersect_lines(a_start, a_end, b_start, b_end)?;
    point_within_segments(a_start, a_end, b_start, b_end, point).then_some(point)
}

/// Slope seen on a third plane, given the apparent slopes on two others.
///
/// Angles are the planes' wire-coordinate directions with respect to the
/// z axis; slopes are in homogeneous (distance-ratio) units. Slopes too
/// small to resolve are clamped to 0.001, and the result is computed as
/// an inverse and then inverted back, which keeps the sign convention
/// consistent for every downstream consumer; a vanishing inverse maps
/// to 999.
pub fn compute_third_plane_slope(
    angle1: f64,
    slope1: f64,
    angle2: f64,
    slope2: f64,
    angle3: f64,
) -> f64 {
    // Can't resolve very small slopes
    if slope1.abs() < MIN_SLOPE && slope2.abs() < MIN_SLOPE {
        return MIN_SLOPE;
    }

    let mut slope3 = MIN_SLOPE;
    if slope1.abs() > MIN_SLOPE && slope2.abs() > MIN_SLOPE {
        slope3 = ((1.0 / slope1) * (angle3 - angle2).sin()
            - (1.0 / slope2) * (angle3 - angle1).sin())
            / (angle1 - angle2).sin();
    }
    if slope3 != 0.0 {
        slope3 = 1.0 / slope3;
    } else {
        slope3 = 999.0;
    }

    slope3
}

/// dT/dW variant of [`compute_third_plane_slope`]: slopes arrive and leave
/// in time-per-wire units, so each is normalized by its plane's wire pitch
/// on the way in and the result is scaled by the output pitch on the way
/// out. The time coefficient is common to all planes and cancels.
#[allow(clippy::too_many_arguments)]
pub fn compute_third_plane_slope_rate(
    angle1: f64,
    pitch1: f64,
    slope_rate1: f64,
    angle2: f64,
    pitch2: f64,
    slope_rate2: f64,
    angle_target: f64,
    pitch_target: f64,
) -> f64 {
    pitch_target
        * compute_third_plane_slope(
            angle1,
            slope_rate1 / pitch1,
            angle2,
            slope_rate2 / pitch2,
            angle_target,
        )
}
