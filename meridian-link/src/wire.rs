//! Low level building blocks of the Link byte stream.
//!
//! Everything on the wire is big-endian. Strings are written as an `i32` number of UTF-16 code units followed by the
//! units. Header tags are plain ASCII strings enclosed in angle brackets with no length prefix.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::error::LinkError;
use crate::options::LinkOptions;

/// Header of a straight line.
pub const HEADER_LINE: &str = "<OMLINE>";
/// Header of a polyline or polygon.
pub const HEADER_POLY: &str = "<OMPOLY>";
/// Header of an arc.
pub const HEADER_ARC: &str = "<OMARC>";
/// Header of a circle.
pub const HEADER_CIRCLE: &str = "<OMCIRCLE>";
/// Header of an ellipse.
pub const HEADER_ELLIPSE: &str = "<OMELLIPSE>";
/// Header of a rectangle.
pub const HEADER_RECTANGLE: &str = "<OMRECT>";
/// Header of a point.
pub const HEADER_POINT: &str = "<OMPOINT>";
/// Header of a raster image.
pub const HEADER_RASTER: &str = "<OMRASTER>";
/// Header of a bitmap.
pub const HEADER_BITMAP: &str = "<OMBITMAP>";
/// Header of a text label.
pub const HEADER_TEXT: &str = "<OMTEXT>";
/// Header of a data grid.
pub const HEADER_GRID: &str = "<OMGRID>";
/// Header of a graphic list.
pub const HEADER_GRAPHICS: &str = "<OMGRAPHICS>";
/// Header of a map request.
pub const HEADER_MAP_REQUEST: &str = "<OMMAP>";
/// Header of a properties-only (gui) request.
pub const HEADER_GUI_REQUEST: &str = "<OMGUI>";
/// Marks the end of a section. More sections follow in the same transmission.
pub const END_SECTION: &str = "<OMEND_SECTION>";
/// Marks the end of the whole transmission.
pub const END_TOTAL: &str = "<OMEND_TOTAL>";

/// Reading side of a Link stream.
///
/// Wraps any [`Read`] and adds the protocol-level reads on top of it. Fixed size numbers are read with
/// [`byteorder::ReadBytesExt`] methods as `LinkReader` implements `Read` itself.
#[derive(Debug)]
pub struct LinkReader<R> {
    inner: R,
    options: LinkOptions,
}

impl<R: Read> LinkReader<R> {
    /// Creates a reader with default options.
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, LinkOptions::default())
    }

    /// Creates a reader with the given options.
    pub fn with_options(inner: R, options: LinkOptions) -> Self {
        Self { inner, options }
    }

    /// Options of the reader.
    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Reference to the wrapped stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable reference to the wrapped stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads a header tag, e.g. `<OMLINE>`, including the angle brackets.
    pub fn read_header(&mut self) -> Result<String, LinkError> {
        let first = self.read_u8()?;
        if first != b'<' {
            return Err(LinkError::malformed(format!(
                "header must start with '<', got byte 0x{first:02x}"
            )));
        }

        let mut header = vec![first];
        loop {
            let byte = self.read_u8()?;
            if !byte.is_ascii() {
                return Err(LinkError::malformed("header contains non-ascii bytes"));
            }

            header.push(byte);
            if byte == b'>' {
                break;
            }

            if header.len() >= self.options.max_header_len {
                return Err(LinkError::malformed(format!(
                    "header is longer than {} bytes",
                    self.options.max_header_len
                )));
            }
        }

        String::from_utf8(header).map_err(|e| LinkError::malformed(e.to_string()))
    }

    /// Reads a header tag and checks that it is the `expected` one.
    pub fn expect_header(&mut self, expected: &str) -> Result<(), LinkError> {
        let header = self.read_header()?;
        if header != expected {
            return Err(LinkError::UnknownHeader(header));
        }

        Ok(())
    }

    /// Reads an `i32` length prefix.
    pub fn read_len(&mut self) -> Result<usize, LinkError> {
        let len = self.read_i32::<BigEndian>()?;
        if len < 0 {
            return Err(LinkError::malformed(format!("negative length {len}")));
        }

        let len = len as usize;
        if len > self.options.max_array_len {
            return Err(LinkError::malformed(format!(
                "length {len} exceeds the limit of {}",
                self.options.max_array_len
            )));
        }

        Ok(len)
    }

    /// Reads a length-prefixed UTF-16 string.
    pub fn read_string(&mut self) -> Result<String, LinkError> {
        let len = self.read_len()?;
        let mut units = vec![0u16; len];
        self.read_u16_into::<BigEndian>(&mut units)?;

        String::from_utf16(&units).map_err(|e| LinkError::malformed(e.to_string()))
    }

    /// Reads a one byte boolean flag.
    pub fn read_bool(&mut self) -> Result<bool, LinkError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads `len` floats.
    pub fn read_f32_vec(&mut self, len: usize) -> Result<Vec<f32>, LinkError> {
        let mut values = vec![0.0; len];
        self.read_f32_into::<BigEndian>(&mut values)?;
        Ok(values)
    }

    /// Reads `len` integers.
    pub fn read_i32_vec(&mut self, len: usize) -> Result<Vec<i32>, LinkError> {
        let mut values = vec![0; len];
        self.read_i32_into::<BigEndian>(&mut values)?;
        Ok(values)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, LinkError> {
        let mut buf = vec![0; len];
        self.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Reads a length prefix and checks that it matches the length implied by other fields.
    pub(crate) fn read_exact_len(&mut self, expected: usize, what: &str) -> Result<usize, LinkError> {
        let len = self.read_len()?;
        if len != expected {
            return Err(LinkError::malformed(format!(
                "{what} has {len} elements, expected {expected}"
            )));
        }

        Ok(len)
    }
}

impl<R: Read> Read for LinkReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Protocol-level writes for any [`Write`].
pub trait WriteLinkExt: Write {
    /// Writes a header tag as is.
    fn write_header(&mut self, header: &str) -> Result<(), LinkError> {
        self.write_all(header.as_bytes())?;
        Ok(())
    }

    /// Writes an `i32` length prefix.
    fn write_len(&mut self, len: usize) -> Result<(), LinkError> {
        let len = i32::try_from(len).map_err(|_| LinkError::malformed(format!("length {len} does not fit into i32")))?;
        self.write_i32::<BigEndian>(len)?;
        Ok(())
    }

    /// Writes a length-prefixed UTF-16 string.
    fn write_string(&mut self, value: &str) -> Result<(), LinkError> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_len(units.len())?;
        for unit in units {
            self.write_u16::<BigEndian>(unit)?;
        }

        Ok(())
    }

    /// Writes a one byte boolean flag.
    fn write_bool(&mut self, value: bool) -> Result<(), LinkError> {
        self.write_u8(value as u8)?;
        Ok(())
    }

    /// Writes floats without a length prefix.
    fn write_f32_slice(&mut self, values: &[f32]) -> Result<(), LinkError> {
        for value in values {
            self.write_f32::<BigEndian>(*value)?;
        }

        Ok(())
    }

    /// Writes integers without a length prefix.
    fn write_i32_slice(&mut self, values: &[i32]) -> Result<(), LinkError> {
        for value in values {
            self.write_i32::<BigEndian>(*value)?;
        }

        Ok(())
    }
}

impl<W: Write + ?Sized> WriteLinkExt for W {}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;

    fn reader(bytes: Vec<u8>) -> LinkReader<Cursor<Vec<u8>>> {
        LinkReader::new(Cursor::new(bytes))
    }

    #[test]
    fn strings_are_utf16() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_string("aé€").unwrap();
        assert_eq!(buf, [0, 0, 0, 3, 0, b'a', 0x00, 0xe9, 0x20, 0xac]);
        assert_eq!(reader(buf).read_string().unwrap(), "aé€");

        let mut buf: Vec<u8> = Vec::new();
        buf.write_string("🌍").unwrap();
        assert_eq!(&buf[..4], &[0, 0, 0, 2]);
        assert_eq!(reader(buf).read_string().unwrap(), "🌍");
    }

    #[test]
    fn headers() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_header(HEADER_LINE).unwrap();
        buf.write_header(END_TOTAL).unwrap();

        let mut r = reader(buf);
        assert_eq!(r.read_header().unwrap(), HEADER_LINE);
        assert_matches!(r.expect_header(END_SECTION), Err(LinkError::UnknownHeader(h)) if h == END_TOTAL);
        assert_matches!(r.read_header(), Err(LinkError::Io(_)));
    }

    #[test]
    fn bad_headers() {
        assert_matches!(reader(b"OMLINE>".to_vec()).read_header(), Err(LinkError::Malformed(_)));

        let long = format!("<{}>", "A".repeat(100));
        assert_matches!(reader(long.into_bytes()).read_header(), Err(LinkError::Malformed(_)));
    }

    #[test]
    fn lengths_are_checked() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_i32::<BigEndian>(-1).unwrap();
        assert_matches!(reader(buf).read_len(), Err(LinkError::Malformed(_)));

        let options = LinkOptions {
            max_array_len: 10,
            ..Default::default()
        };
        let mut buf: Vec<u8> = Vec::new();
        buf.write_len(11).unwrap();
        let mut r = LinkReader::with_options(Cursor::new(buf), options);
        assert_matches!(r.read_len(), Err(LinkError::Malformed(_)));
    }

    #[test]
    fn truncated_array_is_io_error() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_f32_slice(&[1.0, 2.0]).unwrap();
        let err = reader(buf).read_f32_vec(3).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn numbers_are_big_endian() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_i32_slice(&[1, -2]).unwrap();
        buf.write_f32_slice(&[1.5]).unwrap();
        buf.write_bool(true).unwrap();
        assert_eq!(&buf[..4], &[0, 0, 0, 1]);

        let mut r = reader(buf);
        assert_eq!(r.read_i32_vec(2).unwrap(), vec![1, -2]);
        assert_eq!(r.read_f32_vec(1).unwrap(), vec![1.5]);
        assert!(r.read_bool().unwrap());
    }
}
