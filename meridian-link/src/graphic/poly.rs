use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{GraphicType, LineType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Units of the coordinates of a georeferenced polyline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleUnit {
    /// Degrees.
    #[default]
    Degrees,
    /// Radians.
    Radians,
}

impl AngleUnit {
    fn code(&self) -> u8 {
        match self {
            AngleUnit::Degrees => 0,
            AngleUnit::Radians => 1,
        }
    }

    fn from_code(code: u8) -> Result<Self, LinkError> {
        match code {
            0 => Ok(AngleUnit::Degrees),
            1 => Ok(AngleUnit::Radians),
            _ => Err(LinkError::malformed(format!("unknown angle unit {code}"))),
        }
    }
}

/// What pixel coordinates of a polyline are relative to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordMode {
    /// Every point is relative to the anchor.
    #[default]
    Origin,
    /// Every point is relative to the previous one.
    Previous,
}

impl CoordMode {
    fn code(&self) -> u8 {
        match self {
            CoordMode::Origin => 0,
            CoordMode::Previous => 1,
        }
    }

    fn from_code(code: u8) -> Result<Self, LinkError> {
        match code {
            0 => Ok(CoordMode::Origin),
            1 => Ok(CoordMode::Previous),
            _ => Err(LinkError::malformed(format!("unknown coordinate mode {code}"))),
        }
    }
}

/// Polyline or polygon.
///
/// Coordinates are stored interleaved: `[lat0, lon0, lat1, lon1, ...]` or `[x0, y0, x1, y1, ...]`. On the wire they
/// are prefixed with the number of values (twice the number of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkPoly {
    /// Georeferenced polyline.
    LatLon {
        /// Interleaved latitudes and longitudes.
        coords: Vec<f32>,
        /// Units of `coords`.
        units: AngleUnit,
        /// How the edges are drawn.
        line_type: LineType,
        /// Number of segments of curved edges, `-1` to let the client decide.
        nsegs: i32,
    },
    /// Polyline in screen pixels.
    Xy {
        /// Interleaved x and y.
        coords: Vec<i32>,
    },
    /// Polyline in pixels relative to a geographic point.
    Offset {
        /// Latitude of the reference point in degrees.
        lat: f32,
        /// Longitude of the reference point in degrees.
        lon: f32,
        /// Interleaved x and y offsets.
        coords: Vec<i32>,
        /// What the offsets are relative to.
        mode: CoordMode,
    },
}

impl LinkPoly {
    /// Number of vertices.
    pub fn point_count(&self) -> usize {
        match self {
            LinkPoly::LatLon { coords, .. } => coords.len() / 2,
            LinkPoly::Xy { coords } | LinkPoly::Offset { coords, .. } => coords.len() / 2,
        }
    }
}

fn check_pairs(len: usize) -> Result<(), LinkError> {
    if len % 2 != 0 {
        return Err(LinkError::malformed(format!("odd number of polyline coordinates: {len}")));
    }

    Ok(())
}

impl Primitive for LinkPoly {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Poly;

    fn render_type(&self) -> RenderType {
        match self {
            LinkPoly::LatLon { .. } => RenderType::LatLon,
            LinkPoly::Xy { .. } => RenderType::Xy,
            LinkPoly::Offset { .. } => RenderType::Offset,
        }
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match self {
            LinkPoly::LatLon {
                coords,
                units,
                line_type,
                nsegs,
            } => {
                check_pairs(coords.len())?;
                writer.write_len(coords.len())?;
                writer.write_f32_slice(coords)?;
                writer.write_u8(units.code())?;
                writer.write_i32::<BigEndian>(line_type.code())?;
                writer.write_i32::<BigEndian>(*nsegs)?;
            }
            LinkPoly::Xy { coords } => {
                check_pairs(coords.len())?;
                writer.write_len(coords.len())?;
                writer.write_i32_slice(coords)?;
            }
            LinkPoly::Offset { lat, lon, coords, mode } => {
                check_pairs(coords.len())?;
                writer.write_f32_slice(&[*lat, *lon])?;
                writer.write_len(coords.len())?;
                writer.write_i32_slice(coords)?;
                writer.write_u8(mode.code())?;
            }
        }

        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(match render_type {
            RenderType::LatLon => {
                let len = reader.read_len()?;
                check_pairs(len)?;
                LinkPoly::LatLon {
                    coords: reader.read_f32_vec(len)?,
                    units: AngleUnit::from_code(reader.read_u8()?)?,
                    line_type: LineType::read(reader)?,
                    nsegs: reader.read_i32::<BigEndian>()?,
                }
            }
            RenderType::Xy => {
                let len = reader.read_len()?;
                check_pairs(len)?;
                LinkPoly::Xy {
                    coords: reader.read_i32_vec(len)?,
                }
            }
            RenderType::Offset => {
                let lat = reader.read_f32::<BigEndian>()?;
                let lon = reader.read_f32::<BigEndian>()?;
                let len = reader.read_len()?;
                check_pairs(len)?;
                LinkPoly::Offset {
                    lat,
                    lon,
                    coords: reader.read_i32_vec(len)?,
                    mode: CoordMode::from_code(reader.read_u8()?)?,
                }
            }
        })
    }
}
