//! Points where a path enters or leaves a set of regions.

use std::cmp::Ordering;

use crate::geo::Geo;
use crate::region::{GeoPath, GeoRegion, GeoSegment, DEFAULT_EPSILON};

/// Location where a path crosses a region boundary.
///
/// A crossing usually has only one of `entered` and `exited` set. When the path leaves one region and enters another
/// one at exactly the same point (e.g. on a boundary shared by two regions), both are set.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryCrossing<'a> {
    geo: Geo,
    entered: Option<&'a GeoRegion>,
    exited: Option<&'a GeoRegion>,
}

impl<'a> BoundaryCrossing<'a> {
    fn new(geo: Geo, region: &'a GeoRegion, is_entering: bool) -> Self {
        if is_entering {
            Self {
                geo,
                entered: Some(region),
                exited: None,
            }
        } else {
            Self {
                geo,
                entered: None,
                exited: Some(region),
            }
        }
    }

    /// Location of the crossing.
    pub fn geo(&self) -> Geo {
        self.geo
    }

    /// Region the path enters at this point.
    pub fn entered(&self) -> Option<&'a GeoRegion> {
        self.entered
    }

    /// Region the path leaves at this point.
    pub fn exited(&self) -> Option<&'a GeoRegion> {
        self.exited
    }

    fn merge(&self, next: &BoundaryCrossing<'a>) -> Option<BoundaryCrossing<'a>> {
        if self.geo.distance(&next.geo) != 0.0 {
            return None;
        }

        let (exited, entered) = match (self, next) {
            (
                BoundaryCrossing {
                    exited: Some(exited),
                    entered: None,
                    ..
                },
                BoundaryCrossing {
                    entered: Some(entered),
                    exited: None,
                    ..
                },
            )
            | (
                BoundaryCrossing {
                    entered: Some(entered),
                    exited: None,
                    ..
                },
                BoundaryCrossing {
                    exited: Some(exited),
                    entered: None,
                    ..
                },
            ) => (*exited, *entered),
            _ => return None,
        };

        if std::ptr::eq(exited, entered) {
            return None;
        }

        Some(BoundaryCrossing {
            geo: self.geo,
            entered: Some(entered),
            exited: Some(exited),
        })
    }
}

/// Accumulates crossings of a path, one `(segment, region)` pair at a time, in path order.
///
/// Crossings of the current segment are buffered until the next segment starts, so that crossings of different
/// regions along one segment end up ordered by their distance from the segment start. [`Collector::compact`] flushes
/// the buffer and merges exit/enter pairs at the same location.
#[derive(Debug)]
pub struct Collector<'a> {
    crossings: Vec<BoundaryCrossing<'a>>,
    pending: Vec<(f64, BoundaryCrossing<'a>)>,
    segment: Option<GeoSegment>,
    epsilon: f64,
}

impl Default for Collector<'_> {
    fn default() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }
}

impl<'a> Collector<'a> {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collector that treats points closer than `epsilon` radians as the same point.
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            crossings: Vec::new(),
            pending: Vec::new(),
            segment: None,
            epsilon,
        }
    }

    /// Records the intersections of one path segment with one region.
    ///
    /// Must be called for segments in path order. An intersection point is a crossing only if the path is on
    /// different sides of the boundary before and after it. Boundary points count as inside, so a path vertex lying
    /// on the boundary is reported once, by the segment that arrives at it from outside or leaves it to the outside.
    pub fn add_crossing(&mut self, segment: &GeoSegment, region: &'a GeoRegion, points: &[Geo]) {
        if self.segment.as_ref() != Some(segment) {
            self.flush();
            self.segment = Some(*segment);
        }

        if points.is_empty() {
            return;
        }

        let start = segment.start();
        let end = segment.end();
        let epsilon = self.epsilon;
        let mut sorted: Vec<(f64, Geo)> = points.iter().map(|p| (start.distance(p), *p)).collect();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        // A path through a vertex hits both edges of the vertex.
        sorted.dedup_by(|next, prev| next.1.distance(&prev.1) <= epsilon);

        let mut inside = region.contains(&start);
        for (i, &(distance, geo)) in sorted.iter().enumerate() {
            let next = sorted.get(i + 1).map_or(end, |&(_, g)| g);
            let after = if geo.distance(&next) <= epsilon {
                region.contains(&next)
            } else {
                region.contains(&midpoint(&geo, &next))
            };

            if after != inside {
                inside = after;
                self.pending
                    .push((distance, BoundaryCrossing::new(geo, region, inside)));
            }
        }
    }

    fn flush(&mut self) {
        self.pending
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        self.crossings
            .extend(self.pending.drain(..).map(|(_, crossing)| crossing));
    }

    /// Flushes the buffered segment and merges adjacent crossings at the same location.
    ///
    /// Calling it again without adding new crossings does not change anything.
    pub fn compact(&mut self) {
        self.flush();
        self.crossings = compact_crossings(std::mem::take(&mut self.crossings));
    }

    /// Iterates over collected crossings. Call [`Collector::compact`] first.
    pub fn iter(&self) -> impl Iterator<Item = &BoundaryCrossing<'a>> {
        self.crossings.iter()
    }

    /// Number of collected crossings.
    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    /// Returns true if no crossings were collected.
    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty() && self.pending.is_empty()
    }

    /// Compacts the collector and returns the crossings.
    pub fn into_crossings(mut self) -> Vec<BoundaryCrossing<'a>> {
        self.compact();
        self.crossings
    }
}

/// Merges every exit crossing that is followed by an enter crossing of a different region at the same location (and
/// vice versa) into a single crossing.
pub fn compact_crossings(crossings: Vec<BoundaryCrossing<'_>>) -> Vec<BoundaryCrossing<'_>> {
    let mut result: Vec<BoundaryCrossing> = Vec::with_capacity(crossings.len());
    for crossing in crossings {
        if let Some(merged) = result.last().and_then(|last| last.merge(&crossing)) {
            if let Some(last) = result.last_mut() {
                *last = merged;
            }
        } else {
            result.push(crossing);
        }
    }

    result
}

/// Crossings of the path with the boundaries of the regions, in path order.
pub fn get_crossings<'a>(path: &GeoPath, regions: &'a [GeoRegion]) -> Vec<BoundaryCrossing<'a>> {
    get_crossings_within(path, regions, DEFAULT_EPSILON)
}

/// Same as [`get_crossings`], with a custom intersection tolerance in radians.
pub fn get_crossings_within<'a>(path: &GeoPath, regions: &'a [GeoRegion], epsilon: f64) -> Vec<BoundaryCrossing<'a>> {
    let mut collector = Collector::with_epsilon(epsilon);
    for segment in path.segments() {
        for region in regions {
            let points = region.intersections(&segment, epsilon);
            collector.add_crossing(&segment, region, &points);
        }
    }

    collector.into_crossings()
}

fn midpoint(a: &Geo, b: &Geo) -> Geo {
    Geo::from_vector(a.vector() + b.vector())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn square(lat_min: f64, lon_min: f64, lat_max: f64, lon_max: f64) -> GeoRegion {
        GeoRegion::from_degrees(&[
            (lat_min, lon_min),
            (lat_max, lon_min),
            (lat_max, lon_max),
            (lat_min, lon_max),
        ])
    }

    fn is(region: Option<&GeoRegion>, expected: &GeoRegion) -> bool {
        region.is_some_and(|r| std::ptr::eq(r, expected))
    }

    #[test]
    fn nested_regions() {
        let regions = vec![square(-10.0, -10.0, 10.0, 10.0), square(-5.0, -5.0, 5.0, 5.0)];
        let (outer, inner) = (&regions[0], &regions[1]);
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, 20.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 4);

        let lons: Vec<f64> = crossings.iter().map(|c| c.geo().lon()).collect();
        for (lon, expected) in lons.iter().zip([-10.0, -5.0, 5.0, 10.0]) {
            assert_abs_diff_eq!(*lon, expected, epsilon = 1e-9);
        }

        assert!(is(crossings[0].entered(), outer) && crossings[0].exited().is_none());
        assert!(is(crossings[1].entered(), inner) && crossings[1].exited().is_none());
        assert!(is(crossings[2].exited(), inner) && crossings[2].entered().is_none());
        assert!(is(crossings[3].exited(), outer) && crossings[3].entered().is_none());
    }

    #[test]
    fn sequential_regions_alternate() {
        let regions = vec![square(-5.0, 10.0, 5.0, 15.0), square(-5.0, -15.0, 5.0, -10.0)];
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, 0.0), (0.0, 20.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 4);
        assert!(is(crossings[0].entered(), &regions[1]));
        assert!(is(crossings[1].exited(), &regions[1]));
        assert!(is(crossings[2].entered(), &regions[0]));
        assert!(is(crossings[3].exited(), &regions[0]));

        let lons: Vec<f64> = crossings.iter().map(|c| c.geo().lon()).collect();
        assert!(lons.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn path_starting_inside() {
        let regions = vec![square(-10.0, -10.0, 10.0, 10.0)];
        let path = GeoPath::from_degrees(&[(0.0, 0.0), (0.0, 20.0), (0.0, 30.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 1);
        assert!(is(crossings[0].exited(), &regions[0]));
        assert!(crossings[0].entered().is_none());
    }

    #[test]
    fn shared_boundary_is_merged() {
        let regions = vec![square(-10.0, -10.0, 10.0, 0.0), square(-10.0, 0.0, 10.0, 10.0)];
        let (west, east) = (&regions[0], &regions[1]);
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, 20.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 3);
        assert!(is(crossings[0].entered(), west));
        assert!(is(crossings[1].exited(), west) && is(crossings[1].entered(), east));
        assert_abs_diff_eq!(crossings[1].geo().lon(), 0.0, epsilon = 1e-9);
        assert!(is(crossings[2].exited(), east));
    }

    #[test]
    fn compact_twice_is_noop() {
        let regions = vec![square(-10.0, -10.0, 10.0, 0.0), square(-10.0, 0.0, 10.0, 10.0)];
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, 20.0)]);

        let mut collector = Collector::new();
        for segment in path.segments() {
            for region in &regions {
                collector.add_crossing(&segment, region, &region.intersections(&segment, DEFAULT_EPSILON));
            }
        }

        collector.compact();
        let first: Vec<Geo> = collector.iter().map(|c| c.geo()).collect();
        assert_eq!(first.len(), 3);

        collector.compact();
        let second: Vec<Geo> = collector.iter().map(|c| c.geo()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn no_crossings() {
        let regions = vec![square(30.0, 30.0, 40.0, 40.0)];
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, 20.0)]);
        assert!(get_crossings(&path, &regions).is_empty());
        assert!(get_crossings(&GeoPath::default(), &regions).is_empty());

        let collector = Collector::new();
        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
    }

    #[test]
    fn same_region_at_same_point_is_not_merged() {
        let region = square(0.0, 0.0, 1.0, 1.0);
        let geo = Geo::from_degrees(0.0, 0.5);
        let crossings = vec![
            BoundaryCrossing::new(geo, &region, false),
            BoundaryCrossing::new(geo, &region, true),
        ];
        assert_eq!(compact_crossings(crossings).len(), 2);
    }

    #[test]
    fn path_vertex_on_boundary_enters_once() {
        let regions = vec![square(-10.0, -10.0, 10.0, 10.0)];
        let path = GeoPath::from_degrees(&[(0.0, -20.0), (0.0, -10.0), (0.0, 0.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 1);
        assert!(is(crossings[0].entered(), &regions[0]) && crossings[0].exited().is_none());
        assert_abs_diff_eq!(crossings[0].geo().lon(), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn path_vertex_on_boundary_exits_once() {
        let regions = vec![square(-10.0, -10.0, 10.0, 10.0)];
        let path = GeoPath::from_degrees(&[(0.0, 0.0), (0.0, 10.0), (0.0, 20.0)]);

        let crossings = get_crossings(&path, &regions);
        assert_eq!(crossings.len(), 1);
        assert!(is(crossings[0].exited(), &regions[0]) && crossings[0].entered().is_none());
        assert_abs_diff_eq!(crossings[0].geo().lon(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn path_starting_on_boundary() {
        let regions = vec![square(-10.0, -10.0, 10.0, 10.0)];

        let inward = GeoPath::from_degrees(&[(0.0, -10.0), (0.0, 0.0)]);
        assert!(get_crossings(&inward, &regions).is_empty());

        let outward = GeoPath::from_degrees(&[(0.0, -10.0), (0.0, -20.0)]);
        let crossings = get_crossings(&outward, &regions);
        assert_eq!(crossings.len(), 1);
        assert!(is(crossings[0].exited(), &regions[0]));
    }
}
