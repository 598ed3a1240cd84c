use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkCircle {
    /// Small circle of `radius` degrees of a great circle around the center.
    LatLon {
        /// Latitude of the center in degrees.
        lat: f32,
        /// Longitude of the center in degrees.
        lon: f32,
        /// Radius in degrees.
        radius: f32,
        /// Number of vertices used to draw the circle, `-1` to let the client decide.
        nverts: i32,
    },
    /// Circle or ellipse inscribed into the `width` x `height` box centered at `x, y`.
    Xy {
        /// Center x in pixels.
        x: i32,
        /// Center y in pixels.
        y: i32,
        /// Width in pixels.
        width: i32,
        /// Height in pixels.
        height: i32,
    },
    /// Same as [`LinkCircle::Xy`], with the center offset from a geographic point.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// Center x offset in pixels.
        x: i32,
        /// Center y offset in pixels.
        y: i32,
        /// Width in pixels.
        width: i32,
        /// Height in pixels.
        height: i32,
    },
}

impl Primitive for LinkCircle {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Circle;

    fn render_type(&self) -> RenderType {
        match self {
            LinkCircle::LatLon { .. } => RenderType::LatLon,
            LinkCircle::Xy { .. } => RenderType::Xy,
            LinkCircle::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            LinkCircle::LatLon {
                lat,
                lon,
                radius,
                nverts,
            } => {
                writer.write_f32_slice(&[lat, lon, radius])?;
                writer.write_i32::<BigEndian>(nverts)?;
            }
            LinkCircle::Xy { x, y, width, height } => writer.write_i32_slice(&[x, y, width, height])?,
            LinkCircle::Offset {
                lat,
                lon,
                x,
                y,
                width,
                height,
            } => {
                writer.write_f32_slice(&[lat, lon])?;
                writer.write_i32_slice(&[x, y, width, height])?;
            }
        }

        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => LinkCircle::LatLon {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                radius: reader.read_f32::<BigEndian>()?,
                nverts: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Xy => LinkCircle::Xy {
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                width: reader.read_i32::<BigEndian>()?,
                height: reader.read_i32::<BigEndian>()?,
            },
            RenderType::Offset => LinkCircle::Offset {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                width: reader.read_i32::<BigEndian>()?,
                height: reader.read_i32::<BigEndian>()?,
            },
        })
    }
}
