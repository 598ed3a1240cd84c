use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{cell_count, check_len, Anchor, GraphicType, Primitive, RenderType};
use crate::color::Color;
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// How the pixels of a raster are transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorModel {
    /// One ARGB integer per pixel.
    Direct,
    /// One byte per pixel, indexing a color table.
    Indexed,
    /// Only the URL of an image is sent, the client loads it.
    Url,
}

impl ColorModel {
    /// Wire code.
    pub fn code(&self) -> u8 {
        match self {
            ColorModel::Direct => 0,
            ColorModel::Indexed => 1,
            ColorModel::Url => 2,
        }
    }
}

impl TryFrom<u8> for ColorModel {
    type Error = LinkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorModel::Direct),
            1 => Ok(ColorModel::Indexed),
            2 => Ok(ColorModel::Url),
            _ => Err(LinkError::UnknownColorModel(value)),
        }
    }
}

/// Pixel data of a raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RasterImage {
    /// `pixels` holds `width * height` packed `0xAARRGGBB` values, row by row.
    Direct {
        /// Width in pixels.
        width: i32,
        /// Height in pixels.
        height: i32,
        /// Pixel colors.
        pixels: Vec<u32>,
    },
    /// `indices` holds `width * height` indices into `colors`, row by row. `transparency` is the alpha applied to
    /// the whole image, `0..=255`.
    Indexed {
        /// Width in pixels.
        width: i32,
        /// Height in pixels.
        height: i32,
        /// Color table index of every pixel.
        indices: Bytes,
        /// Color table of `0xAARRGGBB` values.
        colors: Vec<u32>,
        /// Alpha of the whole image.
        transparency: i32,
    },
    /// Image to be loaded by the client.
    Url {
        /// Location of the image.
        url: String,
    },
}

impl RasterImage {
    /// Color model of the image.
    pub fn color_model(&self) -> ColorModel {
        match self {
            RasterImage::Direct { .. } => ColorModel::Direct,
            RasterImage::Indexed { .. } => ColorModel::Indexed,
            RasterImage::Url { .. } => ColorModel::Url,
        }
    }

    /// Color of the pixel at column `x`, row `y`. `None` for URL images, pixels out of bounds, and indices missing
    /// from the color table.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let argb = match self {
            RasterImage::Direct { width, height, pixels } => *pixels.get(cell_index(*width, *height, x, y)?)?,
            RasterImage::Indexed {
                width,
                height,
                indices,
                colors,
                ..
            } => *colors.get(*indices.get(cell_index(*width, *height, x, y)?)? as usize)?,
            RasterImage::Url { .. } => return None,
        };

        Some(Color::from_argb(argb))
    }

    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        writer.write_u8(self.color_model().code())?;
        match self {
            RasterImage::Direct { width, height, pixels } => {
                check_len(pixels.len(), cell_count(*width, *height)?, "raster pixels")?;
                writer.write_i32::<BigEndian>(*width)?;
                writer.write_i32::<BigEndian>(*height)?;
                writer.write_len(pixels.len())?;
                for pixel in pixels {
                    writer.write_u32::<BigEndian>(*pixel)?;
                }
            }
            RasterImage::Indexed {
                width,
                height,
                indices,
                colors,
                transparency,
            } => {
                check_len(indices.len(), cell_count(*width, *height)?, "raster indices")?;
                writer.write_i32::<BigEndian>(*width)?;
                writer.write_i32::<BigEndian>(*height)?;
                writer.write_len(indices.len())?;
                writer.write_all(indices)?;
                writer.write_len(colors.len())?;
                for color in colors {
                    writer.write_u32::<BigEndian>(*color)?;
                }
                writer.write_i32::<BigEndian>(*transparency)?;
            }
            RasterImage::Url { url } => writer.write_string(url)?,
        }

        Ok(())
    }

    fn read<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        Ok(match ColorModel::try_from(reader.read_u8()?)? {
            ColorModel::Direct => {
                let width = reader.read_i32::<BigEndian>()?;
                let height = reader.read_i32::<BigEndian>()?;
                let len = reader.read_exact_len(cell_count(width, height)?, "raster pixels")?;
                let mut pixels = vec![0; len];
                reader.read_u32_into::<BigEndian>(&mut pixels)?;
                RasterImage::Direct { width, height, pixels }
            }
            ColorModel::Indexed => {
                let width = reader.read_i32::<BigEndian>()?;
                let height = reader.read_i32::<BigEndian>()?;
                let len = reader.read_exact_len(cell_count(width, height)?, "raster indices")?;
                let indices = reader.read_bytes(len)?;
                let mut colors = vec![0; reader.read_len()?];
                reader.read_u32_into::<BigEndian>(&mut colors)?;
                RasterImage::Indexed {
                    width,
                    height,
                    indices,
                    colors,
                    transparency: reader.read_i32::<BigEndian>()?,
                }
            }
            ColorModel::Url => RasterImage::Url {
                url: reader.read_string()?,
            },
        })
    }
}

fn cell_index(width: i32, height: i32, x: usize, y: usize) -> Option<usize> {
    let width = usize::try_from(width).ok()?;
    let height = usize::try_from(height).ok()?;
    if x >= width || y >= height {
        return None;
    }

    y.checked_mul(width)?.checked_add(x)
}

/// Image placed by its upper left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRaster {
    /// Upper left corner.
    pub anchor: Anchor,
    /// Pixels.
    pub image: RasterImage,
}

impl Primitive for LinkRaster {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Raster;

    fn render_type(&self) -> RenderType {
        self.anchor.render_type()
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        self.anchor.write(writer)?;
        self.image.write(writer)
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        Ok(Self {
            anchor: Anchor::read(reader, render_type)?,
            image: RasterImage::read(reader)?,
        })
    }
}
