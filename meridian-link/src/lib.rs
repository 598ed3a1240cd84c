//! Codec for the Link protocol: a big-endian binary stream of vector graphic primitives (lines, polygons, circles,
//! rasters, text and more) sent from a map server to a thin rendering client, and of requests sent back.
//!
//! ```
//! use std::io::Cursor;
//!
//! use meridian_link::graphic::{LineType, LinkLine};
//! use meridian_link::{LinkGraphic, LinkGraphicList, LinkProperties, LinkReader};
//!
//! let mut properties = LinkProperties::new();
//! properties.put(meridian_link::properties::LINE_COLOR, "FFFF0000")?;
//!
//! let mut list = LinkGraphicList::new();
//! list.push(LinkGraphic::new(
//!     LinkLine::LatLon {
//!         lat1: 42.0,
//!         lon1: -71.0,
//!         lat2: 51.5,
//!         lon2: 0.0,
//!         line_type: LineType::GreatCircle,
//!         nsegs: 32,
//!     },
//!     properties,
//! ));
//!
//! let mut bytes: Vec<u8> = Vec::new();
//! list.write(&mut bytes)?;
//!
//! let decoded = LinkGraphicList::read(&mut LinkReader::new(Cursor::new(bytes)), None)?;
//! assert_eq!(decoded, list);
//! # Ok::<(), meridian_link::LinkError>(())
//! ```

pub mod color;
pub mod error;
pub mod graphic;
pub mod graphic_list;
pub mod link;
pub mod options;
pub mod paint;
pub mod properties;
pub mod request;
pub mod version;
pub mod wire;

pub use color::Color;
pub use error::LinkError;
pub use graphic::{GraphicType, LinkGraphic, RenderType, Shape};
pub use graphic_list::{GraphicListWriter, LinkGraphicList, SectionEnd};
pub use link::{Link, LinkMessage};
pub use options::LinkOptions;
pub use paint::PaintCache;
pub use properties::{LinkProperties, PropertyPolicy};
pub use request::{BoundingBox, GuiRequest, MapRequest};
pub use version::LinkVersion;
pub use wire::{LinkReader, WriteLinkExt};
