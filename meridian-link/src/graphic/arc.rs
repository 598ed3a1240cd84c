use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Part of a circle or an ellipse outline. Angles are in degrees, measured counterclockwise from the positive x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkArc {
    /// Arc of a small circle around a geographic center. `radius` is in degrees of a great circle, `nverts` is the
    /// number of vertices used to draw it, `-1` to let the client decide.
    LatLon {
        /// Latitude of the center in degrees.
        lat: f32,
        /// Longitude of the center in degrees.
        lon: f32,
        /// Radius in degrees.
        radius: f32,
        /// Number of vertices.
        nverts: i32,
        /// Start angle.
        start: f32,
        /// Angular length of the arc.
        extent: f32,
    },
    /// Arc of an ellipse inscribed into the `width` x `height` box centered at `x, y`.
    Xy {
        /// Center x in pixels.
        x: i32,
        /// Center y in pixels.
        y: i32,
        /// Width of the bounding box in pixels.
        width: i32,
        /// Height of the bounding box in pixels.
        height: i32,
        /// Start angle.
        start: f32,
        /// Angular length of the arc.
        extent: f32,
    },
    /// Same as [`LinkArc::Xy`], with the center offset from a geographic point.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// Center x offset in pixels.
        x: i32,
        /// Center y offset in pixels.
        y: i32,
        /// Width of the bounding box in pixels.
        width: i32,
        /// Height of the bounding box in pixels.
        height: i32,
        /// Start angle.
        start: f32,
        /// Angular length of the arc.
        extent: f32,
    },
}

impl Primitive for LinkArc {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Arc;

    fn render_type(&self) -> RenderType {
        match self {
            LinkArc::LatLon { .. } => RenderType::LatLon,
            LinkArc::Xy { .. } => RenderType::Xy,
            LinkArc::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            LinkArc::LatLon {
                lat,
                lon,
                radius,
                nverts,
                start,
                extent,
            } => {
                writer.write_f32_slice(&[lat, lon, radius])?;
                writer.write_i32::<BigEndian>(nverts)?;
                writer.write_f32_slice(&[start, extent])?;
            }
            LinkArc::Xy {
                x,
                y,
                width,
                height,
                start,
                extent,
            } => {
                writer.write_i32_slice(&[x, y, width, height])?;
                writer.write_f32_slice(&[start, extent])?;
            }
            LinkArc::Offset {
                lat,
                lon,
                x,
                y,
                width,
                height,
                start,
                extent,
            } => {
                writer.write_f32_slice(&[lat, lon])?;
                writer.write_i32_slice(&[x, y, width, height])?;
                writer.write_f32_slice(&[start, extent])?;
            }
        }

        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => LinkArc::LatLon {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                radius: reader.read_f32::<BigEndian>()?,
                nverts: reader.read_i32::<BigEndian>()?,
                start: reader.read_f32::<BigEndian>()?,
                extent: reader.read_f32::<BigEndian>()?,
            },
            RenderType::Xy => LinkArc::Xy {
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                width: reader.read_i32::<BigEndian>()?,
                height: reader.read_i32::<BigEndian>()?,
                start: reader.read_f32::<BigEndian>()?,
                extent: reader.read_f32::<BigEndian>()?,
            },
            RenderType::Offset => LinkArc::Offset {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                width: reader.read_i32::<BigEndian>()?,
                height: reader.read_i32::<BigEndian>()?,
                start: reader.read_f32::<BigEndian>()?,
                extent: reader.read_f32::<BigEndian>()?,
            },
        })
    }
}
