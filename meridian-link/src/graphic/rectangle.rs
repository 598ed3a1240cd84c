use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, LineType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Rectangle given by two opposite corners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkRectangle {
    /// Upper left and lower right geographic corners. Edges are drawn with the given line type.
    LatLon {
        /// Latitude of the first point in degrees.
        lat1: f32,
        /// Longitude of the first point in degrees.
        lon1: f32,
        /// Latitude of the second point in degrees.
        lat2: f32,
        /// Longitude of the second point in degrees.
        lon2: f32,
        /// How the edges are drawn.
        line_type: LineType,
        /// Number of segments of curved edges, `-1` to let the client decide.
        nsegs: i32,
    },
    /// Upper left and lower right screen corners.
    Xy {
        /// First x in pixels.
        x1: i32,
        /// First y in pixels.
        y1: i32,
        /// Second x in pixels.
        x2: i32,
        /// Second y in pixels.
        y2: i32,
    },
    /// Corners are offsets in pixels from the geographic anchor.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// First x in pixels.
        x1: i32,
        /// First y in pixels.
        y1: i32,
        /// Second x in pixels.
        x2: i32,
        /// Second y in pixels.
        y2: i32,
    },
}

impl Primitive for LinkRectangle {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Rectangle;

    fn render_type(&self) -> RenderType {
        match self {
            LinkRectangle::LatLon { .. } => RenderType::LatLon,
            LinkRectangle::Xy { .. } => RenderType::Xy,
            LinkRectangle::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            LinkRectangle::LatLon {
                lat1,
                lon1,
                lat2,
                lon2,
                line_type,
                nsegs,
            } => {
                writer.write_f32_slice(&[lat1, lon1, lat2, lon2])?;
                writer.write_i32::<BigEndian>(line_type.code())?;
                writer.write_i32::<BigEndian>(nsegs)?;
            }
            LinkRectangle::Xy { x1, y1, x2, y2 } => writer.write_i32_slice(&[x1, y1, x2, y2])?,
            LinkRectangle::Offset {
                lat,
                lon,
                x1,
                y1,
                x2,
                y2,
            } => {
                writer.write_f32_slice(&[lat, lon])?;
                writer.write_i32_slice(&[x1, y1, x2, y2])?;
            }
        }

        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => LinkRectangle::LatLon {
                lat1: reader.read_f32::<BigEndian>()?,
                lon1: reader.read_f32::<BigEndian>()?,
                lat2: reader.read_f32::<BigEndian>()?,
                lon2: reader.read_f32::<BigEndian>()?,
                line_type: LineType::read(reader)?,
                nsegs: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Xy => LinkRectangle::Xy {
                x1: reader.read_i32::<BigEndian>()?,
                y1: reader.read_i32::<BigEndian>()?,
                x2: reader.read_i32::<BigEndian>()?,
                y2: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Offset => LinkRectangle::Offset {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                x1: reader.read_i32::<BigEndian>()?,
                y1: reader.read_i32::<BigEndian>()?,
                x2: reader.read_i32::<BigEndian>()?,
                y2: reader.read_i32::<BigEndian>()?,
            },
        })
    }
}
