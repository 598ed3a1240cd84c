//! Key/value attributes attached to graphics and requests.

use std::io::{Read, Write};
use std::sync::Arc;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::LinkError;
use crate::paint::{self, Fill, FillKey, PaintCache, Stroke, StrokeKey};
use crate::wire::{LinkReader, WriteLinkExt};

/// Reserved key of the management pair that starts every non-empty properties block.
pub const MANAGEMENT_KEY: &str = "_manage";

/// Color of lines, `AARRGGBB`.
pub const LINE_COLOR: &str = "lineColor";
/// Dash style of lines, see [`DashStyle`](crate::paint::DashStyle).
pub const LINE_STYLE: &str = "lineStyle";
/// Width of lines in pixels.
pub const LINE_WIDTH: &str = "lineWidth";
/// Fill color of areas, `AARRGGBB`.
pub const FILL_COLOR: &str = "fillColor";
/// Fill hatching, see [`FillPattern`](crate::paint::FillPattern).
pub const FILL_PATTERN: &str = "fillPattern";
/// Color of selected graphics, `AARRGGBB`.
pub const HIGHLIGHT_COLOR: &str = "highlightColor";
/// Stable identifier of a graphic across transmissions.
pub const GRAPHIC_ID: &str = "graphicID";
/// Free text attached to a graphic.
pub const TEXT_STRING: &str = "textString";
/// Font of text graphics.
pub const TEXT_FONT: &str = "textFont";
/// Tooltip shown for a graphic.
pub const INFO_TEXT: &str = "infoText";

/// How a reader should combine a received properties block with the properties it buffered earlier.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyPolicy {
    /// Buffered properties are discarded before the received ones are applied.
    #[default]
    Clear,
    /// Received properties are laid over the buffered ones, new values win.
    Reuse,
}

impl PropertyPolicy {
    fn name(&self) -> &'static str {
        match self {
            PropertyPolicy::Clear => "clear",
            PropertyPolicy::Reuse => "reuse",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "reuse" => PropertyPolicy::Reuse,
            "clear" => PropertyPolicy::Clear,
            other => {
                log::warn!("Unknown property management value {other:?}, treating as clear");
                PropertyPolicy::Clear
            }
        }
    }
}

lazy_static! {
    static ref EMPTY: LinkProperties = LinkProperties {
        entries: Arc::new(IndexMap::new()),
        policy: PropertyPolicy::Clear,
        frozen: true,
    };
}

/// Ordered string to string map attached to a graphic.
///
/// Cloning is cheap: entries are shared until one of the clones is modified.
///
/// Decoding a block without entries returns clones of one shared instance, see [`LinkProperties::empty`]. That
/// instance is frozen: adding entries to it fails with [`LinkError::FrozenProperties`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkProperties {
    entries: Arc<IndexMap<String, String>>,
    #[serde(default)]
    policy: PropertyPolicy,
    #[serde(skip)]
    frozen: bool,
}

impl LinkProperties {
    /// Creates an empty modifiable set.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(IndexMap::new()),
            policy: PropertyPolicy::Clear,
            frozen: false,
        }
    }

    /// Returns the shared frozen empty set.
    pub fn empty() -> Self {
        EMPTY.clone()
    }

    /// Returns true if this is the shared empty set returned by [`LinkProperties::empty`].
    pub fn is_shared_empty(&self) -> bool {
        Arc::ptr_eq(&self.entries, &EMPTY.entries)
    }

    /// Returns true if entries cannot be added to this set.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Management policy written with the set.
    pub fn policy(&self) -> PropertyPolicy {
        self.policy
    }

    /// Sets the management policy written with the set.
    pub fn set_policy(&mut self, policy: PropertyPolicy) {
        self.policy = policy;
    }

    /// Returns the set with the given management policy.
    pub fn with_policy(mut self, policy: PropertyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Inserts an entry, returning the previous value of the key.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Option<String>, LinkError> {
        if self.frozen {
            log::warn!("Attempt to modify the shared empty properties set");
            return Err(LinkError::FrozenProperties);
        }

        Ok(Arc::make_mut(&mut self.entries).insert(key.into(), value.into()))
    }

    /// Removes an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        if !self.entries.contains_key(key) {
            return None;
        }

        Arc::make_mut(&mut self.entries).shift_remove(key)
    }

    /// Value of the key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries, not counting the management pair.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the properties block.
    ///
    /// A set without entries and with the [`PropertyPolicy::Clear`] policy is written as a single zero count.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), LinkError> {
        if self.entries.is_empty() && self.policy == PropertyPolicy::Clear {
            return writer.write_len(0);
        }

        writer.write_len((self.entries.len() + 1) * 2)?;
        writer.write_string(MANAGEMENT_KEY)?;
        writer.write_string(self.policy.name())?;
        for (key, value) in self.entries.iter() {
            writer.write_string(key)?;
            writer.write_string(value)?;
        }

        Ok(())
    }

    /// Reads a properties block.
    ///
    /// If `buffer` is given, the block is combined with its contents according to the received policy and the buffer
    /// is updated with the result, so it can be passed to the next read. The buffer is reused in place when nothing
    /// else holds its entries.
    pub fn read<R: Read>(
        reader: &mut LinkReader<R>,
        buffer: Option<&mut LinkProperties>,
    ) -> Result<LinkProperties, LinkError> {
        let count = reader.read_len()?;
        if count == 0 {
            if let Some(buffer) = buffer {
                buffer.clear_buffer();
            }

            return Ok(Self::empty());
        }

        if count % 2 != 0 {
            return Err(LinkError::malformed(format!(
                "properties block has odd number of strings: {count}"
            )));
        }

        let mut pairs = Vec::with_capacity((count / 2).min(64));
        for _ in 0..count / 2 {
            let key = reader.read_string()?;
            let value = reader.read_string()?;
            pairs.push((key, value));
        }

        let policy = match pairs.first() {
            Some((key, value)) if key == MANAGEMENT_KEY => {
                let policy = PropertyPolicy::from_name(value);
                pairs.remove(0);
                policy
            }
            _ => PropertyPolicy::Clear,
        };

        let Some(buffer) = buffer else {
            let mut properties: LinkProperties = pairs.into_iter().collect();
            properties.policy = policy;
            return Ok(properties);
        };

        if buffer.frozen {
            *buffer = LinkProperties::new();
        }

        let entries = Arc::make_mut(&mut buffer.entries);
        if policy == PropertyPolicy::Clear {
            entries.clear();
        }
        entries.extend(pairs);
        buffer.policy = policy;

        Ok(buffer.clone())
    }

    fn clear_buffer(&mut self) {
        if self.frozen {
            *self = LinkProperties::new();
        } else if !self.entries.is_empty() {
            Arc::make_mut(&mut self.entries).clear();
        }

        self.policy = PropertyPolicy::Clear;
    }

    /// Color of lines. Black if not set.
    pub fn line_color(&self) -> Color {
        paint::parse_color(self.get(LINE_COLOR), paint::DEFAULT_LINE_COLOR)
    }

    /// Fill color. Transparent if not set.
    pub fn fill_color(&self) -> Color {
        paint::parse_color(self.get(FILL_COLOR), paint::DEFAULT_FILL_COLOR)
    }

    /// Color of selected graphics. Black if not set.
    pub fn highlight_color(&self) -> Color {
        paint::parse_color(self.get(HIGHLIGHT_COLOR), paint::DEFAULT_HIGHLIGHT_COLOR)
    }

    /// Line width and dash style. Solid 1px line if not set.
    pub fn stroke(&self, cache: &mut PaintCache) -> Stroke {
        cache.stroke(StrokeKey {
            width: self.get(LINE_WIDTH).map(str::to_owned),
            style: self.get(LINE_STYLE).map(str::to_owned),
        })
    }

    /// Area fill combining the fill color and fill pattern. No fill if not set.
    pub fn fill(&self, cache: &mut PaintCache) -> Fill {
        cache.fill(FillKey {
            color: self.get(FILL_COLOR).map(str::to_owned),
            pattern: self.get(FILL_PATTERN).map(str::to_owned),
        })
    }
}

impl Default for LinkProperties {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LinkProperties {
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy && self.entries == other.entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LinkProperties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            policy: PropertyPolicy::Clear,
            frozen: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use assert_matches::assert_matches;

    use super::*;
    use crate::paint::DashStyle;

    fn encode(properties: &LinkProperties) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        properties.write(&mut buf).unwrap();
        buf
    }

    fn decode(bytes: Vec<u8>, buffer: Option<&mut LinkProperties>) -> LinkProperties {
        LinkProperties::read(&mut LinkReader::new(Cursor::new(bytes)), buffer).unwrap()
    }

    #[test]
    fn round_trip() {
        let properties: LinkProperties = [(LINE_COLOR, "FFFF0000"), (GRAPHIC_ID, "road-17"), ("name", "Ünter den Linden")]
            .into_iter()
            .collect();

        let decoded = decode(encode(&properties), None);
        assert_eq!(decoded, properties);
        assert_eq!(decoded.get("name"), Some("Ünter den Linden"));
        assert!(!decoded.is_frozen());
    }

    #[test]
    fn management_pair_is_first() {
        let properties: LinkProperties = [("a", "b")].into_iter().collect();
        let bytes = encode(&properties.with_policy(PropertyPolicy::Reuse));

        let mut reader = LinkReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_len().unwrap(), 4);
        assert_eq!(reader.read_string().unwrap(), MANAGEMENT_KEY);
        assert_eq!(reader.read_string().unwrap(), "reuse");
    }

    #[test]
    fn empty_is_shared_and_frozen() {
        let bytes = encode(&LinkProperties::new());
        assert_eq!(bytes, [0, 0, 0, 0]);

        let mut first = decode(bytes.clone(), None);
        let second = decode(bytes, None);
        assert!(first.is_shared_empty());
        assert!(Arc::ptr_eq(&first.entries, &second.entries));
        assert!(first.is_frozen());

        assert_matches!(first.put("key", "value"), Err(LinkError::FrozenProperties));
        assert!(LinkProperties::empty().is_empty());
    }

    #[test]
    fn reuse_overlays_buffer() {
        let mut buffer: LinkProperties = [(LINE_COLOR, "FF0000FF"), (LINE_WIDTH, "2")].into_iter().collect();

        let update: LinkProperties = [(LINE_COLOR, "FFFF0000"), (GRAPHIC_ID, "7")].into_iter().collect();
        let decoded = decode(encode(&update.with_policy(PropertyPolicy::Reuse)), Some(&mut buffer));

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.get(LINE_COLOR), Some("FFFF0000"));
        assert_eq!(decoded.get(LINE_WIDTH), Some("2"));
        assert_eq!(decoded.get(GRAPHIC_ID), Some("7"));
        assert_eq!(decoded.policy(), PropertyPolicy::Reuse);
        assert_eq!(buffer, decoded);
    }

    #[test]
    fn clear_discards_buffer() {
        let mut buffer: LinkProperties = [(LINE_COLOR, "FF0000FF"), (LINE_WIDTH, "2")].into_iter().collect();

        let update: LinkProperties = [(GRAPHIC_ID, "7")].into_iter().collect();
        let decoded = decode(encode(&update), Some(&mut buffer));

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get(LINE_WIDTH), None);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn frozen_buffer_is_replaced() {
        let mut buffer = LinkProperties::empty();
        let update: LinkProperties = [("a", "1")].into_iter().collect();
        let decoded = decode(encode(&update.with_policy(PropertyPolicy::Reuse)), Some(&mut buffer));

        assert_eq!(decoded.get("a"), Some("1"));
        assert!(!buffer.is_frozen());
        assert!(LinkProperties::empty().is_empty());
    }

    #[test]
    fn reuse_does_not_change_previous_results() {
        let mut buffer = LinkProperties::new();
        let first: LinkProperties = [("a", "1")].into_iter().collect();
        let first = decode(encode(&first), Some(&mut buffer));

        let second: LinkProperties = [("b", "2")].into_iter().collect();
        let second = decode(encode(&second.with_policy(PropertyPolicy::Reuse)), Some(&mut buffer));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn empty_clear_block_resets_buffer() {
        let mut buffer = LinkProperties::new();
        let first = decode(encode(&[("a", "1")].into_iter().collect()), Some(&mut buffer));

        let second = decode(encode(&LinkProperties::new()), Some(&mut buffer));
        assert!(second.is_shared_empty());
        assert!(buffer.is_empty());
        assert_eq!(buffer.policy(), PropertyPolicy::Clear);

        let third: LinkProperties = [("b", "2")].into_iter().collect();
        let third = decode(encode(&third.with_policy(PropertyPolicy::Reuse)), Some(&mut buffer));
        assert_eq!(third.get("a"), None);
        assert_eq!(third, [("b", "2")].into_iter().collect::<LinkProperties>().with_policy(PropertyPolicy::Reuse));
        assert_eq!(first.get("a"), Some("1"));
    }

    #[test]
    fn odd_count_is_malformed() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_len(3).unwrap();
        let result = LinkProperties::read(&mut LinkReader::new(Cursor::new(buf)), None);
        assert_matches!(result, Err(LinkError::Malformed(_)));
    }

    #[test]
    fn truncated_block_is_io_error() {
        let properties: LinkProperties = [("key", "value")].into_iter().collect();
        let mut bytes = encode(&properties);
        bytes.truncate(bytes.len() - 3);

        let result = LinkProperties::read(&mut LinkReader::new(Cursor::new(bytes)), None);
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn derived_attributes() {
        let mut cache = PaintCache::default();
        let defaults = LinkProperties::empty();
        assert_eq!(defaults.line_color(), Color::BLACK);
        assert_eq!(defaults.fill_color(), Color::TRANSPARENT);
        assert_eq!(defaults.stroke(&mut cache), Stroke::default());
        assert_eq!(defaults.fill(&mut cache), Fill::Solid(Color::TRANSPARENT));

        let mut properties = LinkProperties::new();
        properties.put(LINE_WIDTH, "3").unwrap();
        properties.put(LINE_STYLE, "dashdot").unwrap();
        properties.put(FILL_COLOR, "800000FF").unwrap();
        properties.put(FILL_PATTERN, "cross").unwrap();

        let stroke = properties.stroke(&mut cache);
        assert_eq!(stroke.width, 3.0);
        assert_eq!(stroke.dash, DashStyle::DashDot);
        assert_matches!(properties.fill(&mut cache), Fill::Pattern(tile) if tile.pixel(0, 0) == Color::rgba(0, 0, 255, 0x80));

        properties.put(LINE_WIDTH, "4").unwrap();
        assert_eq!(properties.stroke(&mut cache).width, 4.0);
    }
}
