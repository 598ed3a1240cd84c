//! Sections of graphics sent by a server.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::graphic::LinkGraphic;
use crate::properties::LinkProperties;
use crate::version::LinkVersion;
use crate::wire::{self, LinkReader, WriteLinkExt};

/// Marker that ended a section of a transmission.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionEnd {
    /// More sections follow.
    Section,
    /// The transmission is complete.
    #[default]
    Total,
}

impl SectionEnd {
    /// Header tag of the marker.
    pub fn header(&self) -> &'static str {
        match self {
            SectionEnd::Section => wire::END_SECTION,
            SectionEnd::Total => wire::END_TOTAL,
        }
    }

    /// Returns the marker if the header is one of the section terminators.
    pub fn from_header(header: &str) -> Option<Self> {
        match header {
            wire::END_SECTION => Some(SectionEnd::Section),
            wire::END_TOTAL => Some(SectionEnd::Total),
            _ => None,
        }
    }

    pub(crate) fn read<R: Read>(reader: &mut LinkReader<R>) -> Result<Self, LinkError> {
        let header = reader.read_header()?;
        Self::from_header(&header).ok_or(LinkError::UnknownHeader(header))
    }
}

/// Section of graphics sent from a server to a client.
///
/// Layout: `<OMGRAPHICS>`, version float, list properties, graphic records, section terminator.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGraphicList {
    /// Version written with the list, or received from the peer.
    pub version: LinkVersion,
    /// Properties of the list as a whole.
    pub properties: LinkProperties,
    /// Graphics in transmission order.
    pub graphics: Vec<LinkGraphic>,
    /// Terminator written after the graphics, or received from the peer.
    pub end: SectionEnd,
}

impl LinkGraphicList {
    /// Creates an empty list of the current protocol version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a graphic.
    pub fn push(&mut self, graphic: LinkGraphic) {
        self.graphics.push(graphic);
    }

    /// Number of graphics.
    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    /// Returns true if the list has no graphics.
    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    /// Writes the list.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        let mut list_writer = GraphicListWriter::begin(writer, self.version, &self.properties)?;
        for graphic in &self.graphics {
            list_writer.add(graphic)?;
        }

        list_writer.finish(self.end)
    }

    /// Reads a list, starting with its header.
    ///
    /// `buffer` is the caller's scratch properties set passed to every graphic read, see [`LinkProperties::read`].
    pub fn read<R: Read>(reader: &mut LinkReader<R>, buffer: Option<&mut LinkProperties>) -> Result<Self, LinkError> {
        reader.expect_header(wire::HEADER_GRAPHICS)?;
        Self::read_after_header(reader, buffer)
    }

    pub(crate) fn read_after_header<R: Read>(
        reader: &mut LinkReader<R>,
        mut buffer: Option<&mut LinkProperties>,
    ) -> Result<Self, LinkError> {
        let version = LinkVersion::from_f32(reader.read_f32::<BigEndian>()?)?;
        reader.options().expected_version.check_compatible(version)?;

        let properties = LinkProperties::read(reader, None)?;

        let mut graphics = Vec::new();
        let end = loop {
            let header = reader.read_header()?;
            if let Some(end) = SectionEnd::from_header(&header) {
                break end;
            }

            graphics.push(LinkGraphic::read_after_header(reader, &header, buffer.as_deref_mut())?);
        };

        log::debug!("Read graphic list of {} graphics, terminated by {:?}", graphics.len(), end);

        Ok(Self {
            version,
            properties,
            graphics,
            end,
        })
    }
}

/// Writes a graphic list one graphic at a time, without collecting the graphics first.
///
/// ```
/// use meridian_link::{GraphicListWriter, LinkGraphic, LinkProperties, LinkVersion, SectionEnd};
/// use meridian_link::graphic::{Anchor, LinkPoint};
///
/// let mut buf: Vec<u8> = Vec::new();
/// let mut writer = GraphicListWriter::begin(&mut buf, LinkVersion::CURRENT, &LinkProperties::empty())?;
/// for x in 0..3 {
///     let point = LinkPoint { anchor: Anchor::Xy { x, y: 0 }, radius: 2, oval: true };
///     writer.add(&LinkGraphic::new(point, LinkProperties::empty()))?;
/// }
/// writer.finish(SectionEnd::Total)?;
/// # Ok::<(), meridian_link::LinkError>(())
/// ```
pub struct GraphicListWriter<'a, W: Write + ?Sized> {
    writer: &'a mut W,
    count: usize,
}

impl<'a, W: Write + ?Sized> GraphicListWriter<'a, W> {
    /// Writes the list header, version and list properties.
    pub fn begin(writer: &'a mut W, version: LinkVersion, properties: &LinkProperties) -> Result<Self, LinkError> {
        writer.write_header(wire::HEADER_GRAPHICS)?;
        writer.write_f32::<BigEndian>(version.to_f32())?;
        properties.write(&mut *writer)?;

        Ok(Self { writer, count: 0 })
    }

    /// Writes one graphic.
    pub fn add(&mut self, graphic: &LinkGraphic) -> Result<(), LinkError> {
        graphic.write(&mut *self.writer)?;
        self.count += 1;
        Ok(())
    }

    /// Writes the terminator.
    pub fn finish(self, end: SectionEnd) -> Result<(), LinkError> {
        log::trace!("Wrote graphic list of {} graphics", self.count);
        self.writer.write_header(end.header())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::graphic::{Anchor, LinkPoint};
    use crate::options::LinkOptions;

    fn point(x: i32) -> LinkGraphic {
        LinkGraphic::new(
            LinkPoint {
                anchor: Anchor::Xy { x, y: 0 },
                radius: 1,
                oval: false,
            },
            LinkProperties::empty(),
        )
    }

    fn encode(list: &LinkGraphicList) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        list.write(&mut buf).unwrap();
        buf
    }

    #[test]
    fn empty_list() {
        let list = LinkGraphicList::new();
        let bytes = encode(&list);
        let decoded = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), None).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.end, SectionEnd::Total);
    }

    #[test]
    fn sections_are_distinguished() {
        let mut first = LinkGraphicList::new();
        first.push(point(1));
        first.end = SectionEnd::Section;

        let mut second = LinkGraphicList::new();
        second.push(point(2));
        second.push(point(3));

        let mut bytes = encode(&first);
        bytes.extend(encode(&second));

        let mut reader = LinkReader::new(Cursor::new(bytes));
        let decoded_first = LinkGraphicList::read(&mut reader, None).unwrap();
        assert_eq!(decoded_first.end, SectionEnd::Section);
        assert_eq!(decoded_first, first);

        let decoded_second = LinkGraphicList::read(&mut reader, None).unwrap();
        assert_eq!(decoded_second.end, SectionEnd::Total);
        assert_eq!(decoded_second.len(), 2);
    }

    #[test]
    fn major_version_mismatch_is_fatal() {
        let list = LinkGraphicList {
            version: LinkVersion::new(1, 0),
            ..Default::default()
        };
        let result = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(encode(&list))), None);
        assert_matches!(result, Err(LinkError::IncompatibleVersion { .. }));
    }

    #[test]
    fn minor_version_mismatch_is_accepted() {
        let list = LinkGraphicList {
            version: LinkVersion::new(0, 6),
            ..Default::default()
        };
        let options = LinkOptions {
            expected_version: LinkVersion::new(0, 4),
            ..Default::default()
        };
        let mut reader = LinkReader::with_options(Cursor::new(encode(&list)), options);
        let decoded = LinkGraphicList::read(&mut reader, None).unwrap();
        assert_eq!(decoded.version, LinkVersion::new(0, 6));
    }

    #[test]
    fn unknown_header_in_list() {
        let mut bytes = encode(&LinkGraphicList::new());
        let end_len = wire::END_TOTAL.len();
        bytes.truncate(bytes.len() - end_len);
        bytes.extend_from_slice(b"<OMWHATEVER>");

        let result = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), None);
        assert_matches!(result, Err(LinkError::UnknownHeader(h)) if h == "<OMWHATEVER>");
    }

    #[test]
    fn truncated_list_is_io_error() {
        let mut list = LinkGraphicList::new();
        list.push(point(1));
        let mut bytes = encode(&list);
        bytes.truncate(bytes.len() - wire::END_TOTAL.len() - 2);

        let result = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), None);
        assert!(result.unwrap_err().is_io());
    }
}
