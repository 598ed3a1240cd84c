use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Rotated ellipse. `major` and `minor` are the full axis lengths, `rotation` is in degrees counterclockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkEllipse {
    /// Axis lengths are in degrees of a great circle.
    LatLon {
        /// Latitude of the center in degrees.
        lat: f32,
        /// Longitude of the center in degrees.
        lon: f32,
        /// Major axis.
        major: f32,
        /// Minor axis.
        minor: f32,
        /// Rotation.
        rotation: f32,
    },
    /// Axis lengths are in pixels.
    Xy {
        /// Center x in pixels.
        x: i32,
        /// Center y in pixels.
        y: i32,
        /// Major axis.
        major: i32,
        /// Minor axis.
        minor: i32,
        /// Rotation.
        rotation: f32,
    },
    /// Pixel ellipse with the center offset from a geographic point.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// Center x offset in pixels.
        x: i32,
        /// Center y offset in pixels.
        y: i32,
        /// Major axis.
        major: i32,
        /// Minor axis.
        minor: i32,
        /// Rotation.
        rotation: f32,
    },
}

impl Primitive for LinkEllipse {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Ellipse;

    fn render_type(&self) -> RenderType {
        match self {
            LinkEllipse::LatLon { .. } => RenderType::LatLon,
            LinkEllipse::Xy { .. } => RenderType::Xy,
            LinkEllipse::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match *self {
            LinkEllipse::LatLon {
                lat,
                lon,
                major,
                minor,
                rotation,
            } => writer.write_f32_slice(&[lat, lon, major, minor, rotation])?,
            LinkEllipse::Xy {
                x,
                y,
                major,
                minor,
                rotation,
            } => {
                writer.write_i32_slice(&[x, y, major, minor])?;
                writer.write_f32::<BigEndian>(rotation)?;
            }
            LinkEllipse::Offset {
                lat,
                lon,
                x,
                y,
                major,
                minor,
                rotation,
            } => {
                writer.write_f32_slice(&[lat, lon])?;
                writer.write_i32_slice(&[x, y, major, minor])?;
                writer.write_f32::<BigEndian>(rotation)?;
            }
        }

        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => LinkEllipse::LatLon {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                major: reader.read_f32::<BigEndian>()?,
                minor: reader.read_f32::<BigEndian>()?,
                rotation: reader.read_f32::<BigEndian>()?,
            },
            RenderType::Xy => LinkEllipse::Xy {
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                major: reader.read_i32::<BigEndian>()?,
                minor: reader.read_i32::<BigEndian>()?,
                rotation: reader.read_f32::<BigEndian>()?,
            },
            RenderType::Offset => LinkEllipse::Offset {
                lat: reader.read_f32::<BigEndian>()?,
                lon: reader.read_f32::<BigEndian>()?,
                x: reader.read_i32::<BigEndian>()?,
                y: reader.read_i32::<BigEndian>()?,
                major: reader.read_i32::<BigEndian>()?,
                minor: reader.read_i32::<BigEndian>()?,
                rotation: reader.read_f32::<BigEndian>()?,
            },
        })
    }
}
