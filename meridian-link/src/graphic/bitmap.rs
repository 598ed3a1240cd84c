use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{check_len, Anchor, GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// One bit per pixel image drawn in the line color.
///
/// Rows are padded to whole bytes, so `bits` holds `(width + 7) / 8 * height` bytes. The most significant bit of a
/// byte is the leftmost pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBitmap {
    /// Upper left corner.
    pub anchor: Anchor,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Packed rows of pixels.
    pub bits: Bytes,
}

impl LinkBitmap {
    /// Number of bytes the bitmap of the given size takes.
    pub fn byte_len(width: i32, height: i32) -> Result<usize, LinkError> {
        super::cell_count(width, height)?;
        Ok((width as usize).div_ceil(8) * height as usize)
    }

    /// Returns true if the pixel at column `x`, row `y` is set. Pixels outside of the bitmap are never set.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (Ok(width), Ok(height)) = (usize::try_from(self.width), usize::try_from(self.height)) else {
            return false;
        };
        if x >= width || y >= height {
            return false;
        }

        self.bits
            .get(y * width.div_ceil(8) + x / 8)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }
}

impl Primitive for LinkBitmap {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Bitmap;

    fn render_type(&self) -> RenderType {
        self.anchor.render_type()
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        check_len(self.bits.len(), Self::byte_len(self.width, self.height)?, "bitmap")?;

        self.anchor.write(writer)?;
        writer.write_i32::<BigEndian>(self.width)?;
        writer.write_i32::<BigEndian>(self.height)?;
        writer.write_len(self.bits.len())?;
        writer.write_all(&self.bits)?;
        Ok(())
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        let anchor = Anchor::read(reader, render_type)?;
        let width = reader.read_i32::<BigEndian>()?;
        let height = reader.read_i32::<BigEndian>()?;
        let len = reader.read_exact_len(Self::byte_len(width, height)?, "bitmap")?;

        Ok(Self {
            anchor,
            width,
            height,
            bits: reader.read_bytes(len)?,
        })
    }
}
