//! Connection to a Link peer.

use std::io::{BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::LinkError;
use crate::graphic_list::LinkGraphicList;
use crate::options::LinkOptions;
use crate::properties::LinkProperties;
use crate::request::{GuiRequest, MapRequest};
use crate::wire::{self, LinkReader};

/// Top level message of a Link transmission.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkMessage {
    /// Graphics sent by a server.
    Graphics(LinkGraphicList),
    /// View request sent by a client.
    Map(MapRequest),
    /// Properties-only request sent by a client.
    Gui(GuiRequest),
}

impl LinkMessage {
    /// Writes the message.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        match self {
            LinkMessage::Graphics(list) => list.write(writer),
            LinkMessage::Map(request) => request.write(writer),
            LinkMessage::Gui(request) => request.write(writer),
        }
    }

    /// Reads the next message of any kind.
    pub fn read<R: Read>(reader: &mut LinkReader<R>, buffer: Option<&mut LinkProperties>) -> Result<Self, LinkError> {
        let header = reader.read_header()?;
        log::trace!("Reading message {header}");

        match header.as_str() {
            wire::HEADER_GRAPHICS => Ok(LinkMessage::Graphics(LinkGraphicList::read_after_header(reader, buffer)?)),
            wire::HEADER_MAP_REQUEST => Ok(LinkMessage::Map(MapRequest::read_after_header(reader)?)),
            wire::HEADER_GUI_REQUEST => Ok(LinkMessage::Gui(GuiRequest::read_after_header(reader)?)),
            _ => Err(LinkError::UnknownHeader(header)),
        }
    }
}

impl From<LinkGraphicList> for LinkMessage {
    fn from(value: LinkGraphicList) -> Self {
        LinkMessage::Graphics(value)
    }
}

impl From<MapRequest> for LinkMessage {
    fn from(value: MapRequest) -> Self {
        LinkMessage::Map(value)
    }
}

impl From<GuiRequest> for LinkMessage {
    fn from(value: GuiRequest) -> Self {
        LinkMessage::Gui(value)
    }
}

/// Exclusively owned connection to a Link peer.
///
/// Reads and writes take `&mut self`, so only one message is decoded from the stream at a time. The link keeps the
/// properties buffer used to resolve [`PropertyPolicy::Reuse`](crate::PropertyPolicy::Reuse) blocks between the
/// received graphics. The stream is closed when the link is dropped.
///
/// ```no_run
/// use meridian_link::{GuiRequest, Link, LinkMessage, LinkOptions, LinkProperties};
///
/// let mut link = Link::connect("localhost:3031", LinkOptions::default())?;
/// link.send(&GuiRequest::new(LinkProperties::new()).into())?;
/// if let LinkMessage::Graphics(list) = link.receive()? {
///     println!("{} graphics", list.len());
/// }
/// # Ok::<(), meridian_link::LinkError>(())
/// ```
#[derive(Debug)]
pub struct Link<S: Read + Write> {
    reader: LinkReader<BufReader<S>>,
    properties_buffer: LinkProperties,
    out: Vec<u8>,
}

impl Link<TcpStream> {
    /// Opens a TCP connection.
    pub fn connect(addr: impl ToSocketAddrs, options: LinkOptions) -> Result<Self, LinkError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        log::debug!("Connected to Link peer {:?}", stream.peer_addr().ok());

        Ok(Self::with_options(stream, options))
    }
}

impl<S: Read + Write> Link<S> {
    /// Creates a link over the stream with default options.
    pub fn new(stream: S) -> Self {
        Self::with_options(stream, LinkOptions::default())
    }

    /// Creates a link over the stream.
    pub fn with_options(stream: S, options: LinkOptions) -> Self {
        Self {
            reader: LinkReader::with_options(BufReader::new(stream), options),
            properties_buffer: LinkProperties::new(),
            out: Vec::new(),
        }
    }

    /// Options of the link.
    pub fn options(&self) -> &LinkOptions {
        self.reader.options()
    }

    /// Sends a message. Nothing is written to the stream if encoding fails.
    pub fn send(&mut self, message: &LinkMessage) -> Result<(), LinkError> {
        self.out.clear();
        message.write(&mut self.out)?;

        let stream = self.reader.get_mut().get_mut();
        stream.write_all(&self.out)?;
        stream.flush()?;
        Ok(())
    }

    /// Receives the next message.
    ///
    /// An error leaves the stream in an unknown position, so the link should not be used after it.
    pub fn receive(&mut self) -> Result<LinkMessage, LinkError> {
        LinkMessage::read(&mut self.reader, Some(&mut self.properties_buffer))
    }

    /// Properties the next [`PropertyPolicy::Reuse`](crate::PropertyPolicy::Reuse) block will be laid over.
    pub fn properties_buffer(&self) -> &LinkProperties {
        &self.properties_buffer
    }

    /// Returns the stream. Data that was already buffered for reading is lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner().into_inner()
    }
}
