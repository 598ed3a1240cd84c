use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, LineType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Line between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkLine {
    /// Line between two geographic points. `nsegs` is the number of segments used to approximate curved line types,
    /// `-1` to let the client decide.
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
    /// Line between two screen points.
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
    /// Both ends are offsets in pixels from the geographic anchor.
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

impl Primitive for LinkLine {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Line;

    fn render_type(&self) -> RenderType {
        match self {
            LinkLine::LatLon { .. } => RenderType::LatLon,
            LinkLine::Xy { .. } => RenderType::Xy,
            LinkLine::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            LinkLine::LatLon {
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
            LinkLine::Xy { x1, y1, x2, y2 } => writer.write_i32_slice(&[x1, y1, x2, y2])?,
            LinkLine::Offset {
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
            RenderType::LatLon => LinkLine::LatLon {
                lat1: reader.read_f32::<BigEndian>()?,
                lon1: reader.read_f32::<BigEndian>()?,
                lat2: reader.read_f32::<BigEndian>()?,
                lon2: reader.read_f32::<BigEndian>()?,
                line_type: LineType::read(reader)?,
                nsegs: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Xy => LinkLine::Xy {
                x1: reader.read_i32::<BigEndian>()?,
                y1: reader.read_i32::<BigEndian>()?,
                x2: reader.read_i32::<BigEndian>()?,
                y2: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Offset => LinkLine::Offset {
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
