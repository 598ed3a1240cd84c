use std::io::Cursor;

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use bytes::Bytes;
use meridian_link::graphic::{
    Anchor, AngleUnit, CoordMode, GridMajor, Justification, LineType, LinkArc, LinkBitmap, LinkCircle, LinkEllipse,
    LinkGrid, LinkLine, LinkPoint, LinkPoly, LinkRaster, LinkRectangle, LinkText, RasterImage,
};
use meridian_link::paint::DashStyle;
use meridian_link::properties::{FILL_COLOR, GRAPHIC_ID, LINE_COLOR, LINE_STYLE, LINE_WIDTH};
use meridian_link::{
    Color, GraphicType, LinkError, LinkGraphic, LinkGraphicList, LinkProperties, LinkReader, PaintCache,
    PropertyPolicy, RenderType, Shape,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn anchors() -> [Anchor; 3] {
    [
        Anchor::LatLon {
            lat: 42.3601,
            lon: -71.0589,
        },
        Anchor::Xy { x: 120, y: -45 },
        Anchor::Offset {
            lat: -33.8688,
            lon: 151.2093,
            x: -7,
            y: 13,
        },
    ]
}

fn all_shapes() -> Vec<Shape> {
    let mut shapes: Vec<Shape> = vec![
        LinkLine::LatLon {
            lat1: 42.3601,
            lon1: -71.0589,
            lat2: 51.5072,
            lon2: -0.1276,
            line_type: LineType::GreatCircle,
            nsegs: 64,
        }
        .into(),
        LinkLine::Xy {
            x1: 0,
            y1: 0,
            x2: 640,
            y2: -480,
        }
        .into(),
        LinkLine::Offset {
            lat: 10.5,
            lon: 20.25,
            x1: -5,
            y1: 5,
            x2: 15,
            y2: -25,
        }
        .into(),
        LinkPoly::LatLon {
            coords: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0],
            units: AngleUnit::Degrees,
            line_type: LineType::Rhumb,
            nsegs: -1,
        }
        .into(),
        LinkPoly::Xy {
            coords: vec![1, 2, 3, 4, 5, 6],
        }
        .into(),
        LinkPoly::Offset {
            lat: 0.1,
            lon: 0.2,
            coords: vec![0, 0, 10, 0, 0, 10],
            mode: CoordMode::Previous,
        }
        .into(),
        LinkRectangle::LatLon {
            lat1: 50.0,
            lon1: -10.0,
            lat2: 40.0,
            lon2: 5.0,
            line_type: LineType::Straight,
            nsegs: 8,
        }
        .into(),
        LinkRectangle::Xy {
            x1: 10,
            y1: 10,
            x2: 100,
            y2: 50,
        }
        .into(),
        LinkRectangle::Offset {
            lat: 1.0,
            lon: 2.0,
            x1: -1,
            y1: -1,
            x2: 1,
            y2: 1,
        }
        .into(),
        LinkCircle::LatLon {
            lat: 60.17,
            lon: 24.94,
            radius: 1.5,
            nverts: 90,
        }
        .into(),
        LinkCircle::Xy {
            x: 5,
            y: 6,
            width: 20,
            height: 20,
        }
        .into(),
        LinkCircle::Offset {
            lat: 0.0,
            lon: 0.0,
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        }
        .into(),
        LinkArc::LatLon {
            lat: 35.68,
            lon: 139.69,
            radius: 0.75,
            nverts: -1,
            start: 0.0,
            extent: 270.0,
        }
        .into(),
        LinkArc::Xy {
            x: 50,
            y: 50,
            width: 30,
            height: 20,
            start: 45.0,
            extent: -90.0,
        }
        .into(),
        LinkArc::Offset {
            lat: -1.0,
            lon: -2.0,
            x: 3,
            y: 4,
            width: 5,
            height: 6,
            start: 7.5,
            extent: 8.5,
        }
        .into(),
        LinkEllipse::LatLon {
            lat: 48.85,
            lon: 2.35,
            major: 2.0,
            minor: 1.0,
            rotation: 30.0,
        }
        .into(),
        LinkEllipse::Xy {
            x: 100,
            y: 200,
            major: 40,
            minor: 10,
            rotation: -15.0,
        }
        .into(),
        LinkEllipse::Offset {
            lat: 5.0,
            lon: 6.0,
            x: 7,
            y: 8,
            major: 9,
            minor: 3,
            rotation: 0.125,
        }
        .into(),
    ];

    for anchor in anchors() {
        shapes.push(
            LinkPoint {
                anchor,
                radius: 4,
                oval: true,
            }
            .into(),
        );
        shapes.push(
            LinkText {
                anchor,
                text: "Zürich 苏黎世".into(),
                font: "SansSerif-BOLD-12".into(),
                justification: Justification::Center,
                rotation: 12.5,
            }
            .into(),
        );
        shapes.push(
            LinkBitmap {
                anchor,
                width: 9,
                height: 2,
                bits: Bytes::from_static(&[0xFF, 0x80, 0x00, 0x01]),
            }
            .into(),
        );
        shapes.push(
            LinkGrid {
                anchor,
                rows: 2,
                columns: 2,
                major: GridMajor::Column,
                vertical_resolution: 0.5,
                horizontal_resolution: 0.25,
                data: vec![-1, 0, 1, i32::MAX],
            }
            .into(),
        );
    }

    let images = [
        RasterImage::Direct {
            width: 2,
            height: 1,
            pixels: vec![0xFFFF0000, 0x8000FF00],
        },
        RasterImage::Indexed {
            width: 2,
            height: 2,
            indices: Bytes::from_static(&[0, 1, 1, 0]),
            colors: vec![0xFF000000, 0xFFFFFFFF],
            transparency: 128,
        },
        RasterImage::Url {
            url: "http://example.com/tiles/3/4/5.png".into(),
        },
    ];
    for (anchor, image) in anchors().into_iter().zip(images) {
        shapes.push(LinkRaster { anchor, image }.into());
    }

    shapes
}

fn properties(id: usize) -> LinkProperties {
    [
        (GRAPHIC_ID.to_string(), format!("graphic-{id}")),
        (LINE_COLOR.to_string(), "FF00FF00".to_string()),
        (LINE_WIDTH.to_string(), "2".to_string()),
    ]
    .into_iter()
    .collect()
}

fn encode(graphic: &LinkGraphic) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    graphic.write(&mut buf).unwrap();
    buf
}

#[test]
fn every_primitive_and_render_type_round_trips() {
    init_logger();

    let shapes = all_shapes();
    for graphic_type in GraphicType::ALL {
        for render_type in [RenderType::LatLon, RenderType::Xy, RenderType::Offset] {
            assert!(
                shapes
                    .iter()
                    .any(|s| s.graphic_type() == graphic_type && s.render_type() == render_type),
                "missing {graphic_type:?} {render_type:?}"
            );
        }
    }

    for (id, shape) in shapes.into_iter().enumerate() {
        let graphic = LinkGraphic::new(shape, properties(id));
        let bytes = encode(&graphic);
        assert!(bytes.starts_with(graphic.shape.graphic_type().header().as_bytes()));

        let mut reader = LinkReader::new(Cursor::new(bytes));
        let decoded = LinkGraphic::read(&mut reader, None).unwrap();
        assert_eq!(decoded, graphic);
        assert_eq!(decoded.graphic_id(), Some(format!("graphic-{id}").as_str()));
        assert_eq!(reader.get_ref().position() as usize, reader.get_ref().get_ref().len());
    }
}

#[test]
fn floats_are_bit_exact() {
    let lat = f32::from_bits(0x4229_5C29);
    let line = LinkLine::LatLon {
        lat1: lat,
        lon1: f32::MIN_POSITIVE,
        lat2: -0.0,
        lon2: f32::MAX,
        line_type: LineType::Unknown,
        nsegs: 0,
    };
    let decoded = LinkGraphic::read(
        &mut LinkReader::new(Cursor::new(encode(&LinkGraphic::new(line, LinkProperties::empty())))),
        None,
    )
    .unwrap();

    let Shape::Line(LinkLine::LatLon { lat1, lat2, lon2, .. }) = decoded.shape else {
        panic!("unexpected shape {:?}", decoded.shape);
    };
    assert_eq!(lat1.to_bits(), lat.to_bits());
    assert_eq!(lat2.to_bits(), (-0.0f32).to_bits());
    assert_eq!(lon2, f32::MAX);
}

#[test]
fn list_with_all_primitives() {
    let mut list = LinkGraphicList::new();
    list.properties.put("layer", "everything").unwrap();
    for (id, shape) in all_shapes().into_iter().enumerate() {
        list.push(LinkGraphic::new(shape, properties(id)));
    }

    let mut bytes: Vec<u8> = Vec::new();
    list.write(&mut bytes).unwrap();

    let mut buffer = LinkProperties::new();
    let decoded = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), Some(&mut buffer)).unwrap();
    assert_eq!(decoded, list);
    assert_eq!(decoded.properties.get("layer"), Some("everything"));
}

#[test]
fn reused_properties_overlay_previous_graphic() {
    init_logger();

    let base: LinkProperties = [(LINE_COLOR, "FFFF0000"), (FILL_COLOR, "FF0000FF")].into_iter().collect();
    let update: LinkProperties = [(GRAPHIC_ID, "second"), (LINE_COLOR, "FF00FF00")].into_iter().collect();
    let cleared: LinkProperties = [(GRAPHIC_ID, "third")].into_iter().collect();

    let point = |x| LinkPoint {
        anchor: Anchor::Xy { x, y: 0 },
        radius: 1,
        oval: false,
    };

    let mut list = LinkGraphicList::new();
    list.push(LinkGraphic::new(point(1), base));
    list.push(LinkGraphic::new(point(2), update.with_policy(PropertyPolicy::Reuse)));
    list.push(LinkGraphic::new(point(3), cleared));

    let mut bytes: Vec<u8> = Vec::new();
    list.write(&mut bytes).unwrap();

    let mut buffer = LinkProperties::new();
    let decoded = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), Some(&mut buffer)).unwrap();

    let second = &decoded.graphics[1].properties;
    assert_eq!(second.get(LINE_COLOR), Some("FF00FF00"));
    assert_eq!(second.get(FILL_COLOR), Some("FF0000FF"));
    assert_eq!(second.get(GRAPHIC_ID), Some("second"));

    let third = &decoded.graphics[2].properties;
    assert_eq!(third.len(), 1);
    assert_eq!(third.get(FILL_COLOR), None);

    assert_eq!(decoded.graphics[0].properties.len(), 2);
    assert_eq!(buffer.get(GRAPHIC_ID), Some("third"));
}

#[test]
fn empty_properties_are_shared() {
    let point = LinkPoint {
        anchor: Anchor::Xy { x: 0, y: 0 },
        radius: 1,
        oval: false,
    };
    let bytes = encode(&LinkGraphic::new(point, LinkProperties::new()));

    let mut decoded = LinkGraphic::read(&mut LinkReader::new(Cursor::new(bytes.clone())), None).unwrap();
    assert!(decoded.properties.is_shared_empty());
    assert_matches!(decoded.properties.put("a", "b"), Err(LinkError::FrozenProperties));

    let again = LinkGraphic::read(&mut LinkReader::new(Cursor::new(bytes)), None).unwrap();
    assert!(again.properties.is_shared_empty());
}

#[test]
fn content_errors_are_not_io_errors() {
    let mut bytes = b"<OMPOINT>".to_vec();
    bytes.push(42);
    let err = LinkGraphic::read(&mut LinkReader::new(Cursor::new(bytes)), None).unwrap_err();
    assert_matches!(err, LinkError::UnknownGraphicType(42));
    assert!(!err.is_io());

    let mut bytes = b"<OMPOINT>".to_vec();
    bytes.extend([GraphicType::Point.code(), 3]);
    let err = LinkGraphic::read(&mut LinkReader::new(Cursor::new(bytes)), None).unwrap_err();
    assert_matches!(err, LinkError::UnknownRenderType(3));
    assert!(!err.is_io());
}

#[test]
fn truncated_records_are_io_errors() {
    let graphic = LinkGraphic::new(
        LinkText {
            anchor: Anchor::LatLon { lat: 1.0, lon: 2.0 },
            text: "label".into(),
            font: "Serif-PLAIN-10".into(),
            justification: Justification::Right,
            rotation: 0.0,
        },
        properties(0),
    );
    let bytes = encode(&graphic);

    for len in [1, 9, 12, 20, bytes.len() - 1] {
        let mut reader = LinkReader::new(Cursor::new(&bytes[..len]));
        let err = LinkGraphic::read(&mut reader, None).unwrap_err();
        assert!(err.is_io(), "prefix of {len} bytes gave {err:?}");
    }
}

#[test]
fn decoded_properties_drive_paint() {
    let mut properties: LinkProperties = [(LINE_COLOR, "80FF0000"), (LINE_WIDTH, "2.5"), (LINE_STYLE, "dash")]
        .into_iter()
        .collect();
    properties.put(FILL_COLOR, "not a color").unwrap();

    let point = LinkPoint {
        anchor: Anchor::Xy { x: 0, y: 0 },
        radius: 1,
        oval: false,
    };
    let decoded = LinkGraphic::read(
        &mut LinkReader::new(Cursor::new(encode(&LinkGraphic::new(point, properties)))),
        None,
    )
    .unwrap();

    let mut cache = PaintCache::default();
    assert_eq!(decoded.properties.line_color(), Color::RED.with_alpha(0x80));
    assert_eq!(decoded.properties.fill_color(), Color::TRANSPARENT);

    let stroke = decoded.properties.stroke(&mut cache);
    assert_abs_diff_eq!(stroke.width, 2.5);
    assert_eq!(stroke.dash, DashStyle::Dash);
    assert_eq!(stroke.dash_array(), vec![15.0, 10.0]);
}

#[test]
fn graphics_serialize_to_json() {
    let graphic = LinkGraphic::new(
        LinkCircle::LatLon {
            lat: 48.8566,
            lon: 2.3522,
            radius: 0.01,
            nverts: 32,
        },
        properties(7),
    );

    let json = serde_json::to_string(&graphic).unwrap();
    let back: LinkGraphic = serde_json::from_str(&json).unwrap();
    assert_eq!(back, graphic);
}
