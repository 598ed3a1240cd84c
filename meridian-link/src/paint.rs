//! Drawing attributes derived from graphic properties.

use std::sync::Arc;

use quick_cache::unsync::Cache;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Default line width in pixels.
pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
/// Default line color.
pub const DEFAULT_LINE_COLOR: Color = Color::BLACK;
/// Default fill color.
pub const DEFAULT_FILL_COLOR: Color = Color::TRANSPARENT;
/// Default highlight color.
pub const DEFAULT_HIGHLIGHT_COLOR: Color = Color::BLACK;

/// Size of a fill pattern tile in pixels.
pub const PATTERN_TILE_SIZE: usize = 8;
const PATTERN_STEP: usize = 4;

/// Dash style of a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// `lineStyle` value `longdash`.
    LongDash,
    /// `lineStyle` value `dash`.
    Dash,
    /// `lineStyle` value `dot`.
    Dot,
    /// `lineStyle` value `dashdot`.
    DashDot,
    /// `lineStyle` value `dashdotdot`.
    DashDotDot,
}

impl DashStyle {
    /// Parses the value of the `lineStyle` property.
    pub fn from_name(name: &str) -> Option<Self> {
        let style = match name.trim().to_ascii_lowercase().as_str() {
            "solid" => DashStyle::Solid,
            "longdash" => DashStyle::LongDash,
            "dash" => DashStyle::Dash,
            "dot" => DashStyle::Dot,
            "dashdot" => DashStyle::DashDot,
            "dashdotdot" => DashStyle::DashDotDot,
            _ => return None,
        };

        Some(style)
    }

    /// Name of the style as written in properties.
    pub fn name(&self) -> &'static str {
        match self {
            DashStyle::Solid => "solid",
            DashStyle::LongDash => "longdash",
            DashStyle::Dash => "dash",
            DashStyle::Dot => "dot",
            DashStyle::DashDot => "dashdot",
            DashStyle::DashDotDot => "dashdotdot",
        }
    }

    /// Alternating dash and gap lengths in pixels for a line of the given width. Empty for solid lines.
    pub fn dash_array(&self, width: f32) -> Vec<f32> {
        let unit = width.max(1.0);
        let pattern: &[f32] = match self {
            DashStyle::Solid => &[],
            DashStyle::LongDash => &[12.0, 4.0],
            DashStyle::Dash => &[6.0, 4.0],
            DashStyle::Dot => &[1.0, 3.0],
            DashStyle::DashDot => &[6.0, 3.0, 1.0, 3.0],
            DashStyle::DashDotDot => &[6.0, 3.0, 1.0, 3.0, 1.0, 3.0],
        };

        pattern.iter().map(|v| v * unit).collect()
    }
}

/// Hatching pattern of a fill.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillPattern {
    /// Plain fill color.
    #[default]
    Solid,
    /// Horizontal lines.
    Horizontal,
    /// Vertical lines.
    Vertical,
    /// Horizontal and vertical lines.
    Cross,
    /// Both diagonals.
    DiagCross,
    /// Lines from lower left to upper right.
    ForwardDiagonal,
    /// Lines from upper left to lower right.
    BackwardDiagonal,
}

impl FillPattern {
    /// Parses the value of the `fillPattern` property.
    pub fn from_name(name: &str) -> Option<Self> {
        let pattern = match name.trim().to_ascii_lowercase().as_str() {
            "solid" => FillPattern::Solid,
            "horizontal" => FillPattern::Horizontal,
            "vertical" => FillPattern::Vertical,
            "cross" => FillPattern::Cross,
            "diagcross" => FillPattern::DiagCross,
            "fdiagonal" => FillPattern::ForwardDiagonal,
            "bdiagonal" => FillPattern::BackwardDiagonal,
            _ => return None,
        };

        Some(pattern)
    }

    /// Name of the pattern as written in properties.
    pub fn name(&self) -> &'static str {
        match self {
            FillPattern::Solid => "solid",
            FillPattern::Horizontal => "horizontal",
            FillPattern::Vertical => "vertical",
            FillPattern::Cross => "cross",
            FillPattern::DiagCross => "diagcross",
            FillPattern::ForwardDiagonal => "fdiagonal",
            FillPattern::BackwardDiagonal => "bdiagonal",
        }
    }

    fn is_set(&self, x: usize, y: usize) -> bool {
        let horizontal = y % PATTERN_STEP == 0;
        let vertical = x % PATTERN_STEP == 0;
        let forward = (x + y) % PATTERN_STEP == 0;
        let backward = (x + PATTERN_TILE_SIZE - y) % PATTERN_STEP == 0;

        match self {
            FillPattern::Solid => true,
            FillPattern::Horizontal => horizontal,
            FillPattern::Vertical => vertical,
            FillPattern::Cross => horizontal || vertical,
            FillPattern::DiagCross => forward || backward,
            FillPattern::ForwardDiagonal => forward,
            FillPattern::BackwardDiagonal => backward,
        }
    }

    /// Renders the pattern into a tile: pattern pixels get the `fore` color, all others are transparent.
    pub fn render_tile(&self, fore: Color) -> PatternTile {
        let mut pixels = Vec::with_capacity(PATTERN_TILE_SIZE * PATTERN_TILE_SIZE);
        for y in 0..PATTERN_TILE_SIZE {
            for x in 0..PATTERN_TILE_SIZE {
                pixels.push(if self.is_set(x, y) {
                    fore
                } else {
                    Color::TRANSPARENT
                });
            }
        }

        PatternTile { pixels }
    }
}

/// Square image repeated to fill an area. Pixels are stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTile {
    pixels: Vec<Color>,
}

impl PatternTile {
    /// Width and height of the tile.
    pub fn size(&self) -> usize {
        PATTERN_TILE_SIZE
    }

    /// Color of the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[(y % PATTERN_TILE_SIZE) * PATTERN_TILE_SIZE + x % PATTERN_TILE_SIZE]
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

/// Line drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line width in pixels.
    pub width: f32,
    /// Dash style.
    pub dash: DashStyle,
}

impl Stroke {
    /// Dash lengths scaled by the stroke width.
    pub fn dash_array(&self) -> Vec<f32> {
        self.dash.dash_array(self.width)
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: DEFAULT_LINE_WIDTH,
            dash: DashStyle::Solid,
        }
    }
}

/// Area fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Single color. Transparent color means no fill.
    Solid(Color),
    /// Tiled hatching pattern.
    Pattern(Arc<PatternTile>),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid(DEFAULT_FILL_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct StrokeKey {
    pub width: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FillKey {
    pub color: Option<String>,
    pub pattern: Option<String>,
}

const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Memo of the drawing attributes computed from properties.
///
/// Entries are keyed by the property values they were computed from, so a cache can be shared by any number of
/// property sets and stays valid when a set is modified.
pub struct PaintCache {
    strokes: Cache<StrokeKey, Stroke>,
    fills: Cache<FillKey, Fill>,
}

impl PaintCache {
    /// Creates a cache holding approximately `capacity` entries of each kind.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strokes: Cache::new(capacity),
            fills: Cache::new(capacity),
        }
    }

    pub(crate) fn stroke(&mut self, key: StrokeKey) -> Stroke {
        if let Some(stroke) = self.strokes.get(&key) {
            return *stroke;
        }

        let width = match key.width.as_deref().map(|v| v.trim().parse::<f32>()) {
            None => DEFAULT_LINE_WIDTH,
            Some(Ok(width)) if width.is_finite() && width >= 0.0 => width,
            Some(_) => {
                log::warn!("Invalid line width {:?}, using default", key.width);
                DEFAULT_LINE_WIDTH
            }
        };

        let dash = match key.style.as_deref() {
            None => DashStyle::Solid,
            Some(name) => DashStyle::from_name(name).unwrap_or_else(|| {
                log::warn!("Unknown line style {name:?}, using solid");
                DashStyle::Solid
            }),
        };

        let stroke = Stroke { width, dash };
        self.strokes.insert(key, stroke);
        stroke
    }

    pub(crate) fn fill(&mut self, key: FillKey) -> Fill {
        if let Some(fill) = self.fills.get(&key) {
            return fill.clone();
        }

        let color = parse_color(key.color.as_deref(), DEFAULT_FILL_COLOR);
        let pattern = match key.pattern.as_deref() {
            None => FillPattern::Solid,
            Some(name) => FillPattern::from_name(name).unwrap_or_else(|| {
                log::warn!("Unknown fill pattern {name:?}, using solid");
                FillPattern::Solid
            }),
        };

        let fill = match pattern {
            FillPattern::Solid => Fill::Solid(color),
            _ => Fill::Pattern(Arc::new(pattern.render_tile(color))),
        };

        self.fills.insert(key, fill.clone());
        fill
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.strokes.len() + self.fills.len()
    }

    /// Returns true if nothing is memoized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PaintCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

pub(crate) fn parse_color(value: Option<&str>, default: Color) -> Color {
    match value {
        None => default,
        Some(value) => Color::try_from_hex(value).unwrap_or_else(|| {
            log::warn!("Invalid color {value:?}, using default");
            default
        }),
    }
}
