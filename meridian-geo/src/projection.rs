/// Conversion of points from one coordinate system into another one and back.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the projected point.
    type OutPoint;

    /// Projects the input point. Returns `None` if the point cannot be represented in the target system.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Converts a projected point back into the input system.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Projection that runs the inner projection backwards.
pub struct InvertedProjection<P> {
    inner: P,
}

impl<P> InvertedProjection<P> {
    /// Wraps the projection.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Projection> Projection for InvertedProjection<P> {
    type InPoint = P::OutPoint;
    type OutPoint = P::InPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.inner.project(input)
    }
}
