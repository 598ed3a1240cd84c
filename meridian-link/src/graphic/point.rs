use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{Anchor, GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Point marker drawn as a square or a circle of `radius` pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPoint {
    /// Position of the center.
    pub anchor: Anchor,
    /// Radius in pixels.
    pub radius: i32,
    /// Draw a circle instead of a square.
    pub oval: bool,
}

impl Primitive for LinkPoint {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Point;

    fn render_type(&self) -> RenderType {
        self.anchor.render_type()
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        self.anchor.write(writer)?;
        writer.write_i32::<BigEndian>(self.radius)?;
        writer.write_bool(self.oval)
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(Self {
            anchor: Anchor::read(reader, render_type)?,
            radius: reader.read_i32::<BigEndian>()?,
            oval: reader.read_bool()?,
        })
    }
}
