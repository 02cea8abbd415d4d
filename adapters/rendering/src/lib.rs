#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Homestead adapters.
//!
//! Nothing here draws anything. The crate defines the colors, input
//! snapshot, and declarative scene state that concrete renderers consume;
//! [`HighlightBoard`] is the reference interpreter for the one-way
//! [`DisplayCommand`] stream emitted by the placement system.

use std::collections::BTreeMap;
use std::{error::Error, fmt};

use glam::Vec2;
use homestead_core::{
    BuildingDescriptor, BuildingView, DisplayCommand, HighlightKind, TerrainQuery, TileArea,
    TileCoord, WorldPoint,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Fill used for tiles where construction is currently legal.
pub const BUILDABLE_HIGHLIGHT_COLOR: Color = Color::new(0.76, 0.96, 0.39, 0.55);
/// Fill used for tiles the hovered placement would newly grant.
pub const EXPANDED_HIGHLIGHT_COLOR: Color = Color::new(0.44, 0.89, 0.76, 0.55);
/// Fill used for resource tiles the hovered placement would collect.
pub const RESOURCE_HIGHLIGHT_COLOR: Color = Color::new(0.98, 0.82, 0.25, 0.55);
/// Tint applied to the ghost while the hovered placement is legal.
pub const PREVIEW_VALID_COLOR: Color = Color::new(0.76, 0.96, 0.39, 0.8);
/// Tint applied to the ghost while the hovered placement is refused.
pub const PREVIEW_INVALID_COLOR: Color = Color::new(0.95, 0.6, 0.6, 0.8);
/// Color used when drawing tile grid lines.
pub const GRID_LINE_COLOR: Color = Color::new(0.3, 0.3, 0.32, 1.0);

/// Fill color associated with a highlight style.
#[must_use]
pub fn highlight_color(kind: HighlightKind) -> Color {
    match kind {
        HighlightKind::Buildable => BUILDABLE_HIGHLIGHT_COLOR,
        HighlightKind::Expanded => EXPANDED_HIGHLIGHT_COLOR,
        HighlightKind::Resource => RESOURCE_HIGHLIGHT_COLOR,
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units, when over the scene.
    pub cursor_world_space: Option<Vec2>,
    /// Building type the player picked from the catalog on this frame.
    pub selected_building: Option<BuildingDescriptor>,
    /// Whether the adapter detected a placement confirmation on this frame.
    pub confirm_action: bool,
    /// Whether the adapter detected a demolition request on this frame.
    pub demolish_action: bool,
    /// Whether the adapter detected a preview cancellation on this frame.
    pub cancel_action: bool,
}

impl FrameInput {
    /// Cursor position converted to the core's world-point representation.
    #[must_use]
    pub fn cursor_world_point(&self) -> Option<WorldPoint> {
        self.cursor_world_space
            .map(|cursor| WorldPoint::new(cursor.x, cursor.y))
    }
}

/// Describes the tile grid a renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    bounds: TileArea,
    tile_length: f32,
    line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `tile_length` is not positive.
    pub fn new(
        bounds: TileArea,
        tile_length: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            bounds,
            tile_length,
            line_color,
        })
    }

    /// Tile rectangle covered by the grid.
    #[must_use]
    pub const fn bounds(&self) -> TileArea {
        self.bounds
    }

    /// Side length of a single tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Color used when drawing grid lines.
    #[must_use]
    pub const fn line_color(&self) -> Color {
        self.line_color
    }

    /// World-space position of a tile's upper-left corner.
    #[must_use]
    pub fn tile_origin(&self, tile: TileCoord) -> Vec2 {
        Vec2::new(
            tile.x() as f32 * self.tile_length,
            tile.y() as f32 * self.tile_length,
        )
    }

    /// Tile containing the provided world position, when inside the grid.
    #[must_use]
    pub fn world_to_tile(&self, position: Vec2) -> Option<TileCoord> {
        let tile = TileCoord::from_world(WorldPoint::new(position.x, position.y), self.tile_length);
        self.bounds.contains(tile).then_some(tile)
    }
}

/// Errors surfaced while validating presentation descriptors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderingError {
    /// The provided tile side length cannot be used for drawing.
    InvalidTileLength {
        /// Rejected tile side length.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile length {tile_length} must be positive")
            }
        }
    }
}

impl Error for RenderingError {}

/// Declarative state of the placement ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostModel {
    /// Building type the ghost represents.
    pub descriptor: BuildingDescriptor,
    /// Area the ghost currently covers.
    pub area: TileArea,
    /// Whether the ghost should use its valid or invalid styling.
    pub valid: bool,
}

impl GhostModel {
    /// Tint the renderer should apply to the ghost.
    #[must_use]
    pub fn tint(&self) -> Color {
        if self.valid {
            PREVIEW_VALID_COLOR
        } else {
            PREVIEW_INVALID_COLOR
        }
    }
}

/// Declarative scene state maintained from the display command stream.
///
/// Highlights are stored per tile with last-command-wins semantics, in a
/// `BTreeMap` so renderers iterate them deterministically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightBoard {
    highlights: BTreeMap<TileCoord, HighlightKind>,
    ghost: Option<GhostModel>,
}

impl HighlightBoard {
    /// Creates an empty board with no highlights and no ghost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single display command to the board.
    pub fn apply(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::HighlightTiles { tiles, kind } => {
                for tile in tiles {
                    let _ = self.highlights.insert(*tile, *kind);
                }
            }
            DisplayCommand::ClearHighlights => self.highlights.clear(),
            DisplayCommand::ShowPreview { descriptor, area } => {
                self.ghost = Some(GhostModel {
                    descriptor: *descriptor,
                    area: *area,
                    valid: false,
                });
            }
            DisplayCommand::MovePreview { area } => {
                if let Some(ghost) = &mut self.ghost {
                    ghost.area = *area;
                }
            }
            DisplayCommand::SetPreviewValidity { valid } => {
                if let Some(ghost) = &mut self.ghost {
                    ghost.valid = *valid;
                }
            }
            DisplayCommand::HidePreview => self.ghost = None,
        }
    }

    /// Applies every command of a frame in order.
    pub fn apply_all(&mut self, commands: &[DisplayCommand]) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Highlight style active on the provided tile, if any.
    #[must_use]
    pub fn highlight_at(&self, tile: TileCoord) -> Option<HighlightKind> {
        self.highlights.get(&tile).copied()
    }

    /// Iterates highlighted tiles in `(x, y)` order.
    pub fn highlights(&self) -> impl Iterator<Item = (TileCoord, HighlightKind)> + '_ {
        self.highlights.iter().map(|(tile, kind)| (*tile, *kind))
    }

    /// Current ghost state, when a preview is active.
    #[must_use]
    pub fn ghost(&self) -> Option<&GhostModel> {
        self.ghost.as_ref()
    }
}

/// Read-only bundle handed to a presenter for one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneView<'a> {
    /// Grid the renderer should draw beneath everything else.
    pub grid: &'a GridPresentation,
    /// Static terrain attributes for base-layer tinting.
    pub terrain: &'a TerrainQuery,
    /// Highlights and ghost state accumulated from display commands.
    pub board: &'a HighlightBoard,
    /// Buildings currently placed in the world.
    pub buildings: &'a BuildingView,
}

/// Renderer-facing seam: consumes a scene snapshot and draws one frame.
pub trait ScenePresenter {
    /// Presents a single frame of the scene.
    fn present(&mut self, scene: &SceneView<'_>) -> anyhow::Result<()>;
}
