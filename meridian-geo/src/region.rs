//! Paths and closed regions on the unit sphere, and the intersection tests between them.

use std::cmp::Ordering;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geo::Geo;

/// Default tolerance in radians used by intersection and on-edge tests.
pub const DEFAULT_EPSILON: f64 = 1e-12;

/// Great circle arc between two points. The arc is the shorter one of the two arcs of the great circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSegment {
    start: Geo,
    end: Geo,
}

impl GeoSegment {
    /// Creates a new segment.
    pub fn new(start: Geo, end: Geo) -> Self {
        Self { start, end }
    }

    /// First point of the segment.
    pub fn start(&self) -> Geo {
        self.start
    }

    /// Last point of the segment.
    pub fn end(&self) -> Geo {
        self.end
    }

    /// Length of the segment in radians.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Returns true if the point lies on the segment within `epsilon` radians.
    ///
    /// The point must be within `epsilon` of the great circle of the segment and between its endpoints.
    pub fn contains(&self, point: &Geo, epsilon: f64) -> bool {
        let s = self.start.vector();
        let e = self.end.vector();
        let p = point.vector();

        let normal = s.cross(e);
        let norm = normal.norm();
        if norm == 0.0 {
            return self.start.distance(point) <= epsilon;
        }
        let normal = normal / norm;

        if p.dot(&normal).abs() > epsilon {
            return false;
        }

        s.cross(p).dot(&normal) >= -epsilon && p.cross(e).dot(&normal) >= -epsilon && p.dot(&(s + e)) > 0.0
    }

    /// Intersection point of two segments, if there is one.
    ///
    /// Segments lying on the same great circle have no single intersection point and return `None`.
    pub fn intersection(&self, other: &GeoSegment, epsilon: f64) -> Option<Geo> {
        let n1 = canonical_normal(&self.start, &self.end)?;
        let n2 = canonical_normal(&other.start, &other.end)?;

        let line = n1.cross(&n2);
        if line.norm() <= f64::EPSILON {
            return None;
        }

        let candidate = Geo::from_vector(line);
        [candidate, candidate.antipode()]
            .into_iter()
            .find(|c| self.contains(c, epsilon) && other.contains(c, epsilon))
    }
}

/// Normal of the great circle through two points, independent of the order of the points.
///
/// Using the same orientation for both directions of an edge makes intersections with an edge shared by two regions
/// bit-identical.
fn canonical_normal(a: &Geo, b: &Geo) -> Option<Vector3<f64>> {
    let (first, second) = match compare_vectors(a.vector(), b.vector()) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };

    let normal = first.vector().cross(second.vector());
    let norm = normal.norm();
    if norm == 0.0 {
        None
    } else {
        Some(normal / norm)
    }
}

fn compare_vectors(a: &Vector3<f64>, b: &Vector3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}

/// Open sequence of points connected by great circle arcs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPath {
    points: Vec<Geo>,
}

impl GeoPath {
    /// Creates a new path.
    pub fn new(points: Vec<Geo>) -> Self {
        Self { points }
    }

    /// Creates a path from `(lat, lon)` pairs in degrees.
    pub fn from_degrees(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|(lat, lon)| Geo::from_degrees(*lat, *lon)).collect())
    }

    /// Points of the path.
    pub fn points(&self) -> &[Geo] {
        &self.points
    }

    /// Segments of the path in order.
    pub fn segments(&self) -> impl Iterator<Item = GeoSegment> + '_ {
        self.points.windows(2).map(|w| GeoSegment::new(w[0], w[1]))
    }
}

/// Closed polygon on the sphere. The last point is implicitly connected to the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRegion {
    points: Vec<Geo>,
}

impl GeoRegion {
    /// Creates a new region from its boundary points.
    pub fn new(points: Vec<Geo>) -> Self {
        Self { points }
    }

    /// Creates a region from `(lat, lon)` pairs in degrees.
    pub fn from_degrees(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|(lat, lon)| Geo::from_degrees(*lat, *lon)).collect())
    }

    /// Boundary points of the region.
    pub fn points(&self) -> &[Geo] {
        &self.points
    }

    /// Edges of the region, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = GeoSegment> + '_ {
        closing_edges(&self.points)
    }

    /// Returns true if the point is inside of the region or on its boundary. See [`is_point_in_polygon`].
    pub fn contains(&self, point: &Geo) -> bool {
        is_point_in_polygon(point, &self.points)
    }

    /// Intersections of the segment with the boundary of the region. See [`segment_near_polygon`].
    pub fn intersections(&self, segment: &GeoSegment, epsilon: f64) -> Vec<Geo> {
        segment_near_polygon(segment, &self.points, epsilon)
    }
}

fn closing_edges(ring: &[Geo]) -> impl Iterator<Item = GeoSegment> + '_ {
    let count = if ring.len() > 1 { ring.len() } else { 0 };
    (0..count).map(move |i| GeoSegment::new(ring[i], ring[(i + 1) % ring.len()]))
}

/// Normalized sum of the ring points.
pub fn polygon_center(ring: &[Geo]) -> Option<Geo> {
    let sum = ring.iter().fold(Vector3::zeros(), |acc, g| acc + g.vector());
    if sum.norm() == 0.0 {
        None
    } else {
        Some(Geo::from_vector(sum))
    }
}

/// Returns true if the point is inside of the closed ring.
///
/// Points lying on an edge or on a vertex (within [`DEFAULT_EPSILON`]) count as inside.
///
/// The test projects the ring with a gnomonic projection centered at the ring center, where great circle edges become
/// straight lines, and counts crossings of a ray from the point. The ring must therefore fit into the hemisphere
/// around its center; points and rings beyond that are reported as outside.
pub fn is_point_in_polygon(point: &Geo, ring: &[Geo]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    if closing_edges(ring).any(|edge| edge.contains(point, DEFAULT_EPSILON)) {
        return true;
    }

    let Some(center) = polygon_center(ring) else {
        return false;
    };

    let c = *center.vector();
    let reference = if c.z.abs() < 0.9 {
        Vector3::z()
    } else {
        Vector3::x()
    };
    let e1 = c.cross(&reference).normalize();
    let e2 = c.cross(&e1);

    let project = |g: &Geo| {
        let v = g.vector();
        let depth = v.dot(&c);
        if depth <= 0.0 {
            None
        } else {
            Some((v.dot(&e1) / depth, v.dot(&e2) / depth))
        }
    };

    let Some((px, py)) = project(point) else {
        return false;
    };

    let mut projected = Vec::with_capacity(ring.len());
    for g in ring {
        match project(g) {
            Some(p) => projected.push(p),
            None => {
                log::debug!("Polygon does not fit into a hemisphere, treating {point} as outside");
                return false;
            }
        }
    }

    let mut inside = false;
    let mut j = projected.len() - 1;
    for i in 0..projected.len() {
        let (xi, yi) = projected[i];
        let (xj, yj) = projected[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Intersection points of the segment with every edge of the closed ring, in edge order.
///
/// Endpoints touching an edge within `epsilon` count as intersections.
pub fn segment_near_polygon(segment: &GeoSegment, ring: &[Geo], epsilon: f64) -> Vec<Geo> {
    closing_edges(ring)
        .filter_map(|edge| segment.intersection(&edge, epsilon))
        .collect()
}
