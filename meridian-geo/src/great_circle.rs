//! Spherical trigonometry on a unit sphere.
//!
//! All functions take and return angles in radians. Distances are central angles, i.e. the length of the
//! great circle arc on a sphere of radius `1`. Use [`Length`](crate::Length) to convert them into physical units.
//!
//! Latitudes are named `phi`, longitudes are named `lambda`.

use num_traits::{Float, FloatConst};

/// Great circle distance between two points.
///
/// Uses the haversine form, which stays accurate for very small distances. The intermediate value is pinned to
/// `1` before `asin`, so that antipodal points return `PI` instead of `NaN` because of rounding.
pub fn spherical_distance<N: Float>(phi1: N, lambda0: N, phi: N, lambda: N) -> N {
    let two = N::one() + N::one();
    let pdiff = ((phi - phi1) / two).sin();
    let ldiff = ((lambda - lambda0) / two).sin();
    let rval = ((pdiff * pdiff) + phi.cos() * phi1.cos() * (ldiff * ldiff)).sqrt();

    let rval = if rval > N::one() { N::one() } else { rval };
    two * rval.asin()
}

/// Initial bearing (azimuth) from the first point to the second one, measured clockwise from north.
///
/// The result is in `(-PI, PI]`. Azimuth between two identical points is `0`.
pub fn spherical_azimuth<N: Float + FloatConst>(phi1: N, lambda0: N, phi: N, lambda: N) -> N {
    let ldiff = lambda - lambda0;
    let cosphi = phi.cos();

    let azimuth = (cosphi * ldiff.sin()).atan2(phi1.cos() * phi.sin() - phi1.sin() * cosphi * ldiff.cos());
    normalize_azimuth(azimuth)
}

/// Point at the distance `c` from the origin point in the direction `azimuth`.
///
/// Returns `(phi, lambda)`. The longitude is not wrapped, callers that need the `[-PI, PI]` range must wrap it.
pub fn spherical_between<N: Float>(phi1: N, lambda0: N, c: N, azimuth: N) -> (N, N) {
    let cosphi1 = phi1.cos();
    let sinphi1 = phi1.sin();
    let cos_az = azimuth.cos();
    let sin_az = azimuth.sin();
    let sinc = c.sin();
    let cosc = c.cos();

    let phi = (sinphi1 * cosc + cosphi1 * sinc * cos_az).asin();
    let lambda = (sinc * sin_az).atan2(cosphi1 * cosc - sinphi1 * sinc * cos_az) + lambda0;

    (phi, lambda)
}

/// Points along the great circle arc between two points.
///
/// The arc is split into `n` equal segments. The returned vector starts with the first point and contains `n`
/// points, plus the last point if `include_last` is set. `n == 0` returns only the endpoints.
pub fn great_circle_points<N: Float + FloatConst>(
    phi1: N,
    lambda0: N,
    phi: N,
    lambda: N,
    n: usize,
    include_last: bool,
) -> Vec<(N, N)> {
    let mut points = Vec::with_capacity(n + 1);
    points.push((phi1, lambda0));

    if n > 0 {
        let c = spherical_distance(phi1, lambda0, phi, lambda);
        let azimuth = spherical_azimuth(phi1, lambda0, phi, lambda);
        let Some(count) = N::from(n) else {
            return points;
        };
        let step = c / count;
        for i in 1..n {
            let Some(i) = N::from(i) else {
                break;
            };
            points.push(spherical_between(phi1, lambda0, step * i, azimuth));
        }
    }

    if include_last {
        points.push((phi, lambda));
    }

    points
}

/// Points of a small circle of the radius `c` around the center point.
///
/// The circle is traced clockwise starting from the north with `n` points. The first point is not repeated at
/// the end.
pub fn earth_circle<N: Float + FloatConst>(phi1: N, lambda0: N, c: N, n: usize) -> Vec<(N, N)> {
    let mut points = Vec::with_capacity(n);
    let Some(count) = N::from(n) else {
        return points;
    };
    let step = (N::PI() + N::PI()) / count;

    for i in 0..n {
        let Some(i) = N::from(i) else {
            break;
        };
        points.push(spherical_between(phi1, lambda0, c, step * i));
    }

    points
}

fn normalize_azimuth<N: Float + FloatConst>(azimuth: N) -> N {
    if azimuth <= -N::PI() {
        azimuth + N::PI() + N::PI()
    } else {
        azimuth
    }
}
