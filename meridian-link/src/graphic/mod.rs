//! Graphic primitives of the Link protocol.
//!
//! Every primitive is written as:
//!
//! * header tag, e.g. `<OMLINE>`
//! * graphic type byte ([`GraphicType`])
//! * render type byte ([`RenderType`])
//! * geometry fields of the render type
//! * properties block ([`LinkProperties`])

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::properties::LinkProperties;
use crate::wire::{self, LinkReader, WriteLinkExt};

mod arc;
mod bitmap;
mod circle;
mod ellipse;
mod grid;
mod line;
mod point;
mod poly;
mod raster;
mod rectangle;
mod text;

pub use arc::LinkArc;
pub use bitmap::LinkBitmap;
pub use circle::LinkCircle;
pub use ellipse::LinkEllipse;
pub use grid::{GridMajor, LinkGrid};
pub use line::LinkLine;
pub use point::LinkPoint;
pub use poly::{AngleUnit, CoordMode, LinkPoly};
pub use raster::{ColorModel, LinkRaster, RasterImage};
pub use rectangle::LinkRectangle;
pub use text::{Justification, LinkText};

/// Kind of a graphic primitive, written as one byte after the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphicType {
    /// [`LinkLine`].
    Line,
    /// [`LinkPoly`].
    Poly,
    /// [`LinkRectangle`].
    Rectangle,
    /// [`LinkCircle`].
    Circle,
    /// [`LinkRaster`].
    Raster,
    /// [`LinkBitmap`].
    Bitmap,
    /// [`LinkText`].
    Text,
    /// [`LinkGrid`].
    Grid,
    /// [`LinkPoint`].
    Point,
    /// [`LinkArc`].
    Arc,
    /// [`LinkEllipse`].
    Ellipse,
}

impl GraphicType {
    /// All graphic types.
    pub const ALL: [GraphicType; 11] = [
        GraphicType::Line,
        GraphicType::Poly,
        GraphicType::Rectangle,
        GraphicType::Circle,
        GraphicType::Raster,
        GraphicType::Bitmap,
        GraphicType::Text,
        GraphicType::Grid,
        GraphicType::Point,
        GraphicType::Arc,
        GraphicType::Ellipse,
    ];

    /// Wire code.
    pub fn code(&self) -> u8 {
        match self {
            GraphicType::Line => 1,
            GraphicType::Poly => 2,
            GraphicType::Rectangle => 3,
            GraphicType::Circle => 4,
            GraphicType::Raster => 5,
            GraphicType::Bitmap => 6,
            GraphicType::Text => 7,
            GraphicType::Grid => 8,
            GraphicType::Point => 9,
            GraphicType::Arc => 10,
            GraphicType::Ellipse => 11,
        }
    }

    /// Header tag written before graphics of this type.
    pub fn header(&self) -> &'static str {
        match self {
            GraphicType::Line => wire::HEADER_LINE,
            GraphicType::Poly => wire::HEADER_POLY,
            GraphicType::Rectangle => wire::HEADER_RECTANGLE,
            GraphicType::Circle => wire::HEADER_CIRCLE,
            GraphicType::Raster => wire::HEADER_RASTER,
            GraphicType::Bitmap => wire::HEADER_BITMAP,
            GraphicType::Text => wire::HEADER_TEXT,
            GraphicType::Grid => wire::HEADER_GRID,
            GraphicType::Point => wire::HEADER_POINT,
            GraphicType::Arc => wire::HEADER_ARC,
            GraphicType::Ellipse => wire::HEADER_ELLIPSE,
        }
    }

    /// Finds the graphic type by its header tag.
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.header() == header)
    }
}

impl TryFrom<u8> for GraphicType {
    type Error = LinkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == value)
            .ok_or(LinkError::UnknownGraphicType(value))
    }
}

/// Placement mode of a graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderType {
    /// Georeferenced: coordinates are latitudes and longitudes in degrees.
    LatLon,
    /// Fixed position on the screen in pixels.
    Xy,
    /// Georeferenced anchor with pixel offsets from it.
    Offset,
}

impl RenderType {
    /// Wire code.
    pub fn code(&self) -> u8 {
        match self {
            RenderType::LatLon => 0,
            RenderType::Xy => 1,
            RenderType::Offset => 2,
        }
    }
}

impl TryFrom<u8> for RenderType {
    type Error = LinkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RenderType::LatLon),
            1 => Ok(RenderType::Xy),
            2 => Ok(RenderType::Offset),
            _ => Err(LinkError::UnknownRenderType(value)),
        }
    }
}

/// How a georeferenced line between two points is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineType {
    /// Not specified, the client decides.
    #[default]
    Unknown,
    /// Straight line in the screen space.
    Straight,
    /// Line of constant bearing.
    Rhumb,
    /// Shortest path on the sphere.
    GreatCircle,
}

impl LineType {
    /// Wire code.
    pub fn code(&self) -> i32 {
        match self {
            LineType::Unknown => 0,
            LineType::Straight => 1,
            LineType::Rhumb => 2,
            LineType::GreatCircle => 3,
        }
    }

    pub(crate) fn read<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        match reader.read_i32::<BigEndian>()? {
            0 => Ok(LineType::Unknown),
            1 => Ok(LineType::Straight),
            2 => Ok(LineType::Rhumb),
            3 => Ok(LineType::GreatCircle),
            other => Err(LinkError::malformed(format!("unknown line type {other}"))),
        }
    }
}

/// Position of a graphic that is placed by a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    /// Geographic position.
    LatLon {
        /// Latitude in degrees.
        lat: f32,
        /// Longitude in degrees.
        lon: f32,
    },
    /// Screen position in pixels.
    Xy {
        /// Pixels from the left edge of the view.
        x: i32,
        /// Pixels from the top edge of the view.
        y: i32,
    },
    /// Pixel offset from a geographic position.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// Horizontal offset in pixels.
        x: i32,
        /// Vertical offset in pixels, down is positive.
        y: i32,
    },
}

impl Anchor {
    /// Render type matching the anchor variant.
    pub fn render_type(&self) -> RenderType {
        match self {
            Anchor::LatLon { .. } => RenderType::LatLon,
            Anchor::Xy { .. } => RenderType::Xy,
            Anchor::Offset { .. } => RenderType::Offset,
        }
    }

    pub(crate) fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            Anchor::LatLon { lat, lon } => writer.write_f32_slice(&[lat, lon]),
            Anchor::Xy { x, y } => writer.write_i32_slice(&[x, y]),
            Anchor::Offset { lat, lon, x, y } => {
                writer.write_f32_slice(&[lat, lon])?;
                writer.write_i32_slice(&[x, y])
            }
        }
    }

    pub(crate) fn read<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => Anchor::LatLon {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
            },
            RenderType::Xy => Anchor::Xy {
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Offset => Anchor::Offset {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
            },
        })
    }
}

/// Geometry codec of one primitive kind.
///
/// Implementors only write and read their geometry fields. Framing with the header, type bytes and properties is
/// done by the provided methods.
pub trait Primitive: Sized + Into<Shape> {
    /// Graphic type of the primitive.
    const GRAPHIC_TYPE: GraphicType;

    /// Render type of this instance.
    fn render_type(&self) -> RenderType;

    /// Writes the geometry fields.
    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError>;

    /// Reads the geometry fields of the given render type.
    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError>;

    /// Writes the complete primitive record.
    fn write<W: Write + ?Sized>(&self, properties: &LinkProperties, writer: &mut W) -> Result<(), LinkError> {
        writer.write_header(Self::GRAPHIC_TYPE.header())?;
        writer.write_u8(Self::GRAPHIC_TYPE.code())?;
        writer.write_u8(self.render_type().code())?;
        self.write_geometry(writer)?;
        properties.write(writer)
    }

    /// Reads the primitive record following its header and graphic type byte.
    fn read<R: Read>(
        reader: &mut LinkReader<R>,
        buffer: Option<&mut LinkProperties>,
    ) -> Result<(Self, LinkProperties), LinkError> {
        let render_type = RenderType::try_from(reader.read_u8()?)?;
        let shape = Self::read_geometry(reader, render_type)?;
        let properties = LinkProperties::read(reader, buffer)?;
        Ok((shape, properties))
    }
}

/// Geometry of any primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Straight line.
    Line(LinkLine),
    /// Polyline or polygon.
    Poly(LinkPoly),
    /// Rectangle.
    Rectangle(LinkRectangle),
    /// Circle.
    Circle(LinkCircle),
    /// Raster image.
    Raster(LinkRaster),
    /// One bit per pixel image.
    Bitmap(LinkBitmap),
    /// Text label.
    Text(LinkText),
    /// Grid of values.
    Grid(LinkGrid),
    /// Point marker.
    Point(LinkPoint),
    /// Arc.
    Arc(LinkArc),
    /// Ellipse.
    Ellipse(LinkEllipse),
}

macro_rules! impl_from_primitive {
    ($($variant:ident => $primitive:ty),* $(,)?) => {
        $(
            impl From<$primitive> for Shape {
                fn from(value: $primitive) -> Self {
                    Shape::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive!(
    Line => LinkLine,
    Poly => LinkPoly,
    Rectangle => LinkRectangle,
    Circle => LinkCircle,
    Raster => LinkRaster,
    Bitmap => LinkBitmap,
    Text => LinkText,
    Grid => LinkGrid,
    Point => LinkPoint,
    Arc => LinkArc,
    Ellipse => LinkEllipse,
);

impl Shape {
    /// Graphic type of the shape.
    pub fn graphic_type(&self) -> GraphicType {
        match self {
            Shape::Line(_) => GraphicType::Line,
            Shape::Poly(_) => GraphicType::Poly,
            Shape::Rectangle(_) => GraphicType::Rectangle,
            Shape::Circle(_) => GraphicType::Circle,
            Shape::Raster(_) => GraphicType::Raster,
            Shape::Bitmap(_) => GraphicType::Bitmap,
            Shape::Text(_) => GraphicType::Text,
            Shape::Grid(_) => GraphicType::Grid,
            Shape::Point(_) => GraphicType::Point,
            Shape::Arc(_) => GraphicType::Arc,
            Shape::Ellipse(_) => GraphicType::Ellipse,
        }
    }

    /// Render type of the shape.
    pub fn render_type(&self) -> RenderType {
        match self {
            Shape::Line(v) => v.render_type(),
            Shape::Poly(v) => v.render_type(),
            Shape::Rectangle(v) => v.render_type(),
            Shape::Circle(v) => v.render_type(),
            Shape::Raster(v) => v.render_type(),
            Shape::Bitmap(v) => v.render_type(),
            Shape::Text(v) => v.render_type(),
            Shape::Grid(v) => v.render_type(),
            Shape::Point(v) => v.render_type(),
            Shape::Arc(v) => v.render_type(),
            Shape::Ellipse(v) => v.render_type(),
        }
    }
}

/// Primitive together with its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGraphic {
    /// Geometry.
    pub shape: Shape,
    /// Attributes.
    pub properties: LinkProperties,
}

impl LinkGraphic {
    /// Creates a graphic.
    pub fn new(shape: impl Into<Shape>, properties: LinkProperties) -> Self {
        Self {
            shape: shape.into(),
            properties,
        }
    }

    /// Graphic id property, if set.
    pub fn graphic_id(&self) -> Option<&str> {
        self.properties.get(crate::properties::GRAPHIC_ID)
    }

    /// Writes the graphic record.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        let properties = &self.properties;
        match &self.shape {
            Shape::Line(v) => v.write(properties, writer),
            Shape::Poly(v) => v.write(properties, writer),
            Shape::Rectangle(v) => v.write(properties, writer),
            Shape::Circle(v) => v.write(properties, writer),
            Shape::Raster(v) => v.write(properties, writer),
            Shape::Bitmap(v) => v.write(properties, writer),
            Shape::Text(v) => v.write(properties, writer),
            Shape::Grid(v) => v.write(properties, writer),
            Shape::Point(v) => v.write(properties, writer),
            Shape::Arc(v) => v.write(properties, writer),
            Shape::Ellipse(v) => v.write(properties, writer),
        }
    }

    /// Reads a graphic record, starting with its header.
    pub fn read<R: Read>(
        reader: &mut LinkReader<R>,
        buffer: Option<&mut LinkProperties>,
    ) -> Result<Self, LinkError> {
        let header = reader.read_header()?;
        Self::read_after_header(reader, &header, buffer)
    }

    pub(crate) fn read_after_header<R: Read>(
        reader: &mut LinkReader<R>,
        header: &str,
        buffer: Option<&mut LinkProperties>,
    ) -> Result<Self, LinkError> {
        let expected = GraphicType::from_header(header).ok_or_else(|| LinkError::UnknownHeader(header.to_owned()))?;
        let graphic_type = GraphicType::try_from(reader.read_u8()?)?;
        if graphic_type != expected {
            return Err(LinkError::malformed(format!(
                "graphic type {graphic_type:?} does not match header {header}"
            )));
        }

        log::trace!("Reading {graphic_type:?} graphic");
        match graphic_type {
            GraphicType::Line => read_primitive::<LinkLine, _>(reader, buffer),
            GraphicType::Poly => read_primitive::<LinkPoly, _>(reader, buffer),
            GraphicType::Rectangle => read_primitive::<LinkRectangle, _>(reader, buffer),
            GraphicType::Circle => read_primitive::<LinkCircle, _>(reader, buffer),
            GraphicType::Raster => read_primitive::<LinkRaster, _>(reader, buffer),
            GraphicType::Bitmap => read_primitive::<LinkBitmap, _>(reader, buffer),
            GraphicType::Text => read_primitive::<LinkText, _>(reader, buffer),
            GraphicType::Grid => read_primitive::<LinkGrid, _>(reader, buffer),
            GraphicType::Point => read_primitive::<LinkPoint, _>(reader, buffer),
            GraphicType::Arc => read_primitive::<LinkArc, _>(reader, buffer),
            GraphicType::Ellipse => read_primitive::<LinkEllipse, _>(reader, buffer),
        }
    }
}

fn read_primitive<P: Primitive, R: Read>(
    reader: &mut LinkReader<R>,
    buffer: Option<&mut LinkProperties>,
) -> Result<LinkGraphic, LinkError> {
    let (shape, properties) = P::read(reader, buffer)?;
    Ok(LinkGraphic::new(shape, properties))
}

/// Number of cells in a `width` x `height` image or grid.
pub(crate) fn cell_count(width: i32, height: i32) -> Result<usize, LinkError> {
    if width < 0 || height < 0 {
        return Err(LinkError::malformed(format!("negative dimensions {width}x{height}")));
    }

    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| LinkError::malformed(format!("dimensions {width}x{height} are too large")))
}

/// Checks that an array has the length implied by the dimensions before writing it.
pub(crate) fn check_len(len: usize, expected: usize, what: &str) -> Result<(), LinkError> {
    if len != expected {
        return Err(LinkError::malformed(format!("{what} has {len} elements, expected {expected}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn codes_are_unique() {
        for t in GraphicType::ALL {
            assert_eq!(GraphicType::try_from(t.code()).unwrap(), t);
            assert_eq!(GraphicType::from_header(t.header()), Some(t));
        }

        assert_matches!(GraphicType::try_from(0), Err(LinkError::UnknownGraphicType(0)));
        assert_matches!(GraphicType::try_from(12), Err(LinkError::UnknownGraphicType(12)));
        assert_matches!(RenderType::try_from(3), Err(LinkError::UnknownRenderType(3)));
    }

    #[test]
    fn line_wire_layout() {
        let line = LinkLine::Xy {
            x1: 1,
            y1: 2,
            x2: 3,
            y2: 4,
        };
        let mut buf: Vec<u8> = Vec::new();
        line.write(&LinkProperties::new(), &mut buf).unwrap();

        let mut expected = b"<OMLINE>".to_vec();
        expected.extend([1, 1]);
        expected.extend([0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4]);
        expected.extend([0, 0, 0, 0]);
        assert_eq!(buf, expected);
    }

    #[test]
    fn header_and_type_mismatch() {
        let mut buf = b"<OMLINE>".to_vec();
        buf.push(GraphicType::Poly.code());
        let result = LinkGraphic::read(&mut LinkReader::new(Cursor::new(buf)), None);
        assert_matches!(result, Err(LinkError::Malformed(_)));

        let result = LinkGraphic::read(&mut LinkReader::new(Cursor::new(b"<OMSHAPE>".to_vec())), None);
        assert_matches!(result, Err(LinkError::UnknownHeader(h)) if h == "<OMSHAPE>");
    }

    #[test]
    fn unknown_render_type() {
        let mut buf = b"<OMCIRCLE>".to_vec();
        buf.extend([GraphicType::Circle.code(), 7]);
        let result = LinkGraphic::read(&mut LinkReader::new(Cursor::new(buf)), None);
        assert_matches!(result, Err(LinkError::UnknownRenderType(7)));
    }

    #[test]
    fn dimensions() {
        assert_eq!(cell_count(3, 4).unwrap(), 12);
        assert_matches!(cell_count(-1, 4), Err(LinkError::Malformed(_)));
        assert!(check_len(3, 4, "data").is_err());
    }
}
