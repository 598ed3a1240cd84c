use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use super::{cell_count, check_len, Anchor, GraphicType, Primitive, RenderType};
use crate::error::LinkError;
use crate::wire::{LinkReader, WriteLinkExt};

/// Order of values in grid data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridMajor {
    /// Values of one row are consecutive.
    #[default]
    Row,
    /// Values of one column are consecutive.
    Column,
}

impl GridMajor {
    fn code(&self) -> u8 {
        match self {
            GridMajor::Row => 0,
            GridMajor::Column => 1,
        }
    }

    fn from_code(code: u8) -> Result<Self, LinkError> {
        match code {
            0 => Ok(GridMajor::Row),
            1 => Ok(GridMajor::Column),
            _ => Err(LinkError::malformed(format!("unknown grid orientation {code}"))),
        }
    }
}

/// Grid of integer values, e.g. elevations.
///
/// The anchor is the lower left corner of the grid. Resolutions are the size of one cell: degrees for
/// [`Anchor::LatLon`], pixels otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGrid {
    /// Lower left corner.
    pub anchor: Anchor,
    /// Number of rows.
    pub rows: i32,
    /// Number of columns.
    pub columns: i32,
    /// Order of `data`.
    pub major: GridMajor,
    /// Height of a cell.
    pub vertical_resolution: f32,
    /// Width of a cell.
    pub horizontal_resolution: f32,
    /// `rows * columns` values.
    pub data: Vec<i32>,
}

impl LinkGrid {
    /// Value of the cell.
    pub fn value(&self, row: usize, column: usize) -> Option<i32> {
        let (rows, columns) = (self.rows.max(0) as usize, self.columns.max(0) as usize);
        if row >= rows || column >= columns {
            return None;
        }

        let index = match self.major {
            GridMajor::Row => row * columns + column,
            GridMajor::Column => column * rows + row,
        };
        self.data.get(index).copied()
    }
}

impl Primitive for LinkGrid {
    const GRAPHIC_TYPE: GraphicType = GraphicType::Grid;

    fn render_type(&self) -> RenderType {
        self.anchor.render_type()
    }

    fn write_geometry<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        check_len(self.data.len(), cell_count(self.rows, self.columns)?, "grid data")?;

        self.anchor.write(writer)?;
        writer.write_i32::<BigEndian>(self.rows)?;
        writer.write_i32::<BigEndian>(self.columns)?;
        writer.write_u8(self.major.code())?;
        writer.write_f32::<BigEndian>(self.vertical_resolution)?;
        writer.write_f32::<BigEndian>(self.horizontal_resolution)?;
        writer.write_len(self.data.len())?;
        writer.write_i32_slice(&self.data)
    }

    fn read_geometry<R: Read>(reader: &mut LinkReader<R>, render_type: RenderType) -> Result<Self, LinkError> {
        let anchor = Anchor::read(reader, render_type)?;
        let rows = reader.read_i32::<BigEndian>()?;
        let columns = reader.read_i32::<BigEndian>()?;
        let major = GridMajor::from_code(reader.read_u8()?)?;
        let vertical_resolution = reader.read_f32::<BigEndian>()?;
        let horizontal_resolution = reader.read_f32::<BigEndian>()?;
        let len = reader.read_exact_len(cell_count(rows, columns)?, "grid data")?;

        Ok(Self {
            anchor,
            rows,
            columns,
            major,
            vertical_resolution,
            horizontal_resolution,
            data: reader.read_i32_vec(len)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::properties::LinkProperties;

    fn grid(major: GridMajor) -> LinkGrid {
        LinkGrid {
            anchor: Anchor::LatLon { lat: 40.0, lon: -75.0 },
            rows: 2,
            columns: 3,
            major,
            vertical_resolution: 0.5,
            horizontal_resolution: 0.25,
            data: vec![1, 2, 3, 4, 5, 6],
        }
    }

    #[test]
    fn values() {
        assert_eq!(grid(GridMajor::Row).value(1, 0), Some(4));
        assert_eq!(grid(GridMajor::Column).value(1, 0), Some(2));
        assert_eq!(grid(GridMajor::Row).value(2, 0), None);
    }

    #[test]
    fn data_must_match_dimensions() {
        let mut g = grid(GridMajor::Row);
        g.data.pop();
        assert_matches!(g.write(&LinkProperties::new(), &mut Vec::<u8>::new()), Err(LinkError::Malformed(_)));
    }
}
