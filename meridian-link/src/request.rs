//! Requests sent from a client to a server.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::graphic_list::SectionEnd;
use crate::properties::LinkProperties;
use crate::version::LinkVersion;
use crate::wire::{self, LinkReader, WriteLinkExt};

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f32,
    /// Western edge.
    pub min_lon: f32,
    /// Northern edge.
    pub max_lat: f32,
    /// Eastern edge.
    pub max_lon: f32,
}

impl BoundingBox {
    /// Returns true if the point is inside of the box or on its boundary.
    pub fn contains(&self, lat: f32, lon: f32) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Request for the graphics of a map view.
///
/// A view crossing the dateline is described by two bounding boxes, one on each side of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRequest {
    /// Protocol version of the client.
    pub version: LinkVersion,
    /// Latitude of the view center in degrees.
    pub center_lat: f32,
    /// Longitude of the view center in degrees.
    pub center_lon: f32,
    /// Scale denominator of the view, e.g. `50000.0` for 1:50000.
    pub scale: f32,
    /// Width of the view in pixels.
    pub width: i32,
    /// Height of the view in pixels.
    pub height: i32,
    /// Geographic extent of the view.
    pub bounds: Vec<BoundingBox>,
    /// Attributes of the request.
    pub properties: LinkProperties,
}

impl MapRequest {
    /// Writes the request followed by the end of transmission marker.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        writer.write_header(wire::HEADER_MAP_REQUEST)?;
        writer.write_f32::<BigEndian>(self.version.to_f32())?;
        writer.write_f32_slice(&[self.center_lat, self.center_lon, self.scale])?;
        writer.write_i32_slice(&[self.width, self.height])?;
        writer.write_len(self.bounds.len())?;
        for b in &self.bounds {
            writer.write_f32_slice(&[b.min_lat, b.min_lon, b.max_lat, b.max_lon])?;
        }
        self.properties.write(writer)?;
        writer.write_header(wire::END_TOTAL)
    }

    /// Reads a request, starting with its header.
    pub fn read<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        reader.expect_header(wire::HEADER_MAP_REQUEST)?;
        Self::read_after_header(reader)
    }

    pub(crate) fn read_after_header<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        let version = read_version(reader)?;
        let center_lat = reader.read_f32::<BigEndian>()?;
        let center_lon = reader.read_f32::<BigEndian>()?;
        let scale = reader.read_f32::<BigEndian>()?;
        let width = reader.read_i32::<BigEndian>()?;
        let height = reader.read_i32::<BigEndian>()?;

        let count = reader.read_len()?;
        let mut bounds = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            bounds.push(BoundingBox {
                min_lat: reader.read_f32::<BigEndian>()?,
                min_lon: reader.read_f32::<BigEndian>()?,
                max_lat: reader.read_f32::<BigEndian>()?,
                max_lon: reader.read_f32::<BigEndian>()?,
            });
        }

        let properties = LinkProperties::read(reader, None)?;
        SectionEnd::read(reader)?;

        Ok(Self {
            version,
            center_lat,
            center_lon,
            scale,
            width,
            height,
            bounds,
            properties,
        })
    }
}

/// Request that carries only properties, e.g. a user action in the client's interface.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiRequest {
    /// Protocol version of the client.
    pub version: LinkVersion,
    /// Attributes of the request.
    pub properties: LinkProperties,
}

impl GuiRequest {
    /// Creates a request of the current protocol version.
    pub fn new(properties: LinkProperties) -> Self {
        Self {
            version: LinkVersion::CURRENT,
            properties,
        }
    }

    /// Writes the request followed by the end of transmission marker.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        writer.write_header(wire::HEADER_GUI_REQUEST)?;
        writer.write_f32::<BigEndian>(self.version.to_f32())?;
        self.properties.write(writer)?;
        writer.write_header(wire::END_TOTAL)
    }

    /// Reads a request, starting with its header.
    pub fn read<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        reader.expect_header(wire::HEADER_GUI_REQUEST)?;
        Self::read_after_header(reader)
    }

    pub(crate) fn read_after_header<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        let version = read_version(reader)?;
        let properties = LinkProperties::read(reader, None)?;
        SectionEnd::read(reader)?;

        Ok(Self { version, properties })
    }
}

fn read_version<R: Read>(reader: &mut LinkReader<R>) -> Result<LinkVersion, LinkError> {
    let version = LinkVersion::from_f32(reader.read_f32::<BigEndian>()?)?;
    reader.options().expected_version.check_compatible(version)?;
    Ok(version)
}
