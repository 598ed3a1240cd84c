use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{Anchor, GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Horizontal alignment of a text relative to its anchor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Justification {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

impl Justification {
    fn code(&self) -> u8 {
        match self {
            Justification::Left => 0,
            Justification::Center => 1,
            Justification::Right => 2,
        }
    }

    fn from_code(code: u8) -> Result<Self, LinkError> {
        match code {
            0 => Ok(Justification::Left),
            1 => Ok(Justification::Center),
            2 => Ok(Justification::Right),
            _ => Err(LinkError::malformed(format!("unknown text justification {code}"))),
        }
    }
}

/// Text label.
///
/// `font` is a font description understood by the client, e.g. `"SansSerif-BOLD-12"`. `rotation` is in degrees
/// counterclockwise around the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkText {
    /// Position of the baseline start.
    pub anchor: Anchor,
    /// Label.
    pub text: String,
    /// Font description.
    pub font: String,
    /// Alignment relative to the anchor.
    pub justification: Justification,
    /// Rotation in degrees.
    pub rotation: f32,
}

impl Primitive for LinkText {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Text;

    fn render_type(&self) -> RenderType {
        self.anchor.render_type()
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        self.anchor.write(writer)?;
        writer.write_string(&self.text)?;
        writer.write_string(&self.font)?;
        writer.write_u8(self.justification.code())?;
        writer.write_f32::<BigEndian>(self.rotation)?;
        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(Self {
            anchor: Anchor::read(reader, render_type)?,
            text: reader.read_string()?,
            font: reader.read_string()?,
            justification: Justification::from_code(reader.read_u8()?)?,
            rotation: reader.read_f32::<BigEndian>()?,
        })
    }
}
