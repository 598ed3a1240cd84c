use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_matches::assert_matches;
use meridian_link::graphic::{Anchor, LinkCircle, LinkPoint};
use meridian_link::{
    GuiRequest, Link, LinkError, LinkGraphic, LinkGraphicList, LinkMessage, LinkOptions, LinkProperties,
    LinkReader, LinkVersion, MapRequest, PropertyPolicy, SectionEnd,
};

/// In-memory stream: reads from a prepared input, collects written bytes.
struct Duplex {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Duplex {
    fn new(input: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(input),
            output: Vec::new(),
        }
    }
}

impl Read for Duplex {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Duplex {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn circle(x: i32, properties: LinkProperties) -> LinkGraphic {
    LinkGraphic::new(
        LinkCircle::Xy {
            x,
            y: 0,
            width: 10,
            height: 10,
        },
        properties,
    )
}

fn encode(messages: &[LinkMessage]) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    for message in messages {
        message.write(&mut buf).unwrap();
    }
    buf
}

#[test]
fn receives_messages_in_order() {
    let mut first = LinkGraphicList::new();
    first.push(circle(1, [("lineColor", "FFFF0000")].into_iter().collect()));
    first.end = SectionEnd::Section;

    let mut second = LinkGraphicList::new();
    second.push(circle(
        2,
        LinkProperties::from_iter([("graphicID", "c2")]).with_policy(PropertyPolicy::Reuse),
    ));

    let gui = GuiRequest::new([("action", "refresh")].into_iter().collect());
    let input = encode(&[first.clone().into(), second.into(), gui.clone().into()]);

    let mut link = Link::new(Duplex::new(input));

    assert_matches!(link.receive().unwrap(), LinkMessage::Graphics(list) if list == first);

    let LinkMessage::Graphics(list) = link.receive().unwrap() else {
        panic!("expected graphics");
    };
    let properties = &list.graphics[0].properties;
    assert_eq!(properties.get("lineColor"), Some("FFFF0000"));
    assert_eq!(properties.get("graphicID"), Some("c2"));
    assert_eq!(link.properties_buffer().len(), 2);

    assert_matches!(link.receive().unwrap(), LinkMessage::Gui(request) if request == gui);
    assert!(link.receive().unwrap_err().is_io());
}

#[test]
fn sends_whole_messages() {
    let mut link = Link::new(Duplex::new(Vec::new()));
    let request = MapRequest {
        version: LinkVersion::CURRENT,
        center_lat: 0.0,
        center_lon: 0.0,
        scale: 1_000_000.0,
        width: 800,
        height: 600,
        bounds: Vec::new(),
        properties: LinkProperties::new(),
    };
    link.send(&request.clone().into()).unwrap();

    let written = link.into_inner().output;
    let decoded = MapRequest::read(&mut LinkReader::new(Cursor::new(written))).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn unknown_message_header() {
    let mut link = Link::new(Duplex::new(b"<OMPOINT>".to_vec()));
    assert_matches!(link.receive(), Err(LinkError::UnknownHeader(h)) if h == "<OMPOINT>");
}

#[test]
fn options_are_applied() {
    let list = LinkGraphicList {
        version: LinkVersion::new(2, 0),
        ..Default::default()
    };
    let options = LinkOptions {
        expected_version: LinkVersion::new(2, 1),
        ..Default::default()
    };

    let mut link = Link::with_options(Duplex::new(encode(&[list.into()])), options);
    assert_eq!(link.options().expected_version, LinkVersion::new(2, 1));
    assert_matches!(link.receive(), Ok(LinkMessage::Graphics(_)));

    let mut strict = Link::new(Duplex::new(encode(&[LinkGraphicList {
        version: LinkVersion::new(2, 0),
        ..Default::default()
    }
    .into()])));
    assert_matches!(strict.receive(), Err(LinkError::IncompatibleVersion { .. }));
}

#[test]
fn tcp_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut link = Link::new(stream);
        let LinkMessage::Gui(request) = link.receive().unwrap() else {
            panic!("expected gui request");
        };

        let mut list = LinkGraphicList::new();
        list.properties = request.properties;
        list.push(LinkGraphic::new(
            LinkPoint {
                anchor: Anchor::LatLon { lat: 1.0, lon: 2.0 },
                radius: 3,
                oval: false,
            },
            LinkProperties::empty(),
        ));
        link.send(&list.into()).unwrap();
    });

    let mut client = Link::connect(addr, LinkOptions::default()).unwrap();
    client
        .send(&GuiRequest::new([("echo", "yes")].into_iter().collect()).into())
        .unwrap();

    let LinkMessage::Graphics(list) = client.receive().unwrap() else {
        panic!("expected graphics");
    };
    assert_eq!(list.properties.get("echo"), Some("yes"));
    assert_eq!(list.len(), 1);

    server.join().unwrap();
}
