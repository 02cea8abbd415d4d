#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Homestead engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems additionally publish [`DisplayCommand`]
//! values that presentation adapters consume one-way, with no reply expected.

mod terrain;

use serde::{Deserialize, Serialize};

pub use terrain::{
    ConfigurationError, ElevationId, TerrainAttribute, TerrainLayer, TerrainLayerId, TerrainQuery,
    TileAttributes,
};

/// Location of a single grid tile expressed as signed column and row indices.
///
/// Coordinates are signed because pointer positions are converted by flooring,
/// which can land below the terrain origin. Ordering is lexicographic by
/// `(x, y)` so tile collections can be iterated deterministically.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal tile index.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical tile index.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Converts a world-space position into the tile containing it.
    ///
    /// The position is divided by `tile_length` and floored on each axis, so
    /// positions left of or above the origin resolve to negative indices.
    /// `tile_length` must be positive.
    #[must_use]
    pub fn from_world(point: WorldPoint, tile_length: f32) -> Self {
        Self {
            x: (point.x() / tile_length).floor() as i32,
            y: (point.y() / tile_length).floor() as i32,
        }
    }
}

/// Position expressed in world units, as delivered by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal world coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical world coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Size of a [`TileArea`] measured in whole tiles.
///
/// Both dimensions are at least one tile; the constructor clamps zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAreaSize {
    width: u32,
    height: u32,
}

impl TileAreaSize {
    /// Creates a new size descriptor, clamping each dimension to at least one.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: if height == 0 { 1 } else { height },
        }
    }

    /// Width of the area in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the area in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Axis-aligned rectangle of tiles anchored at an origin coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileArea {
    origin: TileCoord,
    size: TileAreaSize,
}

impl TileArea {
    /// Constructs an area from an origin tile and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: TileCoord, size: TileAreaSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left tile that anchors the area.
    #[must_use]
    pub const fn origin(&self) -> TileCoord {
        self.origin
    }

    /// Dimensions of the area measured in whole tiles.
    #[must_use]
    pub const fn size(&self) -> TileAreaSize {
        self.size
    }

    /// Lazily enumerates every tile covered by the area in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> {
        let origin = self.origin;
        let width = self.size.width();
        (0..self.size.height()).flat_map(move |dy| {
            (0..width).map(move |dx| TileCoord::new(origin.x() + dx as i32, origin.y() + dy as i32))
        })
    }

    /// Returns the area grown by `radius` tiles on every side.
    ///
    /// The expansion is square (Chebyshev distance, not Euclidean), matching
    /// the radius semantics used for buildable and resource coverage.
    #[must_use]
    pub fn expanded_by(&self, radius: u32) -> Self {
        let offset = radius as i32;
        Self {
            origin: TileCoord::new(self.origin.x() - offset, self.origin.y() - offset),
            size: TileAreaSize::new(
                self.size.width() + 2 * radius,
                self.size.height() + 2 * radius,
            ),
        }
    }

    /// Reports whether the provided tile lies within the area.
    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        let dx = tile.x() - self.origin.x();
        let dy = tile.y() - self.origin.y();
        dx >= 0 && dy >= 0 && (dx as u32) < self.size.width() && (dy as u32) < self.size.height()
    }
}

/// Unique identifier assigned to a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Static template describing a constructible building type.
///
/// Descriptors are immutable and compared by value; every placed instance of
/// a building type shares the same descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuildingDescriptor {
    name: &'static str,
    footprint: TileAreaSize,
    buildable_radius: u32,
    resource_radius: u32,
    resource_cost: u32,
    deletable: bool,
}

impl BuildingDescriptor {
    /// Creates a new building descriptor.
    #[must_use]
    pub const fn new(
        name: &'static str,
        footprint: TileAreaSize,
        buildable_radius: u32,
        resource_radius: u32,
        resource_cost: u32,
        deletable: bool,
    ) -> Self {
        Self {
            name,
            footprint,
            buildable_radius,
            resource_radius,
            resource_cost,
            deletable,
        }
    }

    /// Display name of the building type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Dimensions of the footprint the building occupies.
    #[must_use]
    pub const fn footprint(&self) -> TileAreaSize {
        self.footprint
    }

    /// Distance around the footprint within which construction becomes legal.
    #[must_use]
    pub const fn buildable_radius(&self) -> u32 {
        self.buildable_radius
    }

    /// Distance around the footprint within which resource tiles are collected.
    #[must_use]
    pub const fn resource_radius(&self) -> u32 {
        self.resource_radius
    }

    /// Number of resources consumed by placing the building.
    #[must_use]
    pub const fn resource_cost(&self) -> u32 {
        self.resource_cost
    }

    /// Reports whether the building may be demolished after placement.
    #[must_use]
    pub const fn is_deletable(&self) -> bool {
        self.deletable
    }
}

/// Tuning knobs for the derived grid-state computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridOptions {
    resource_radius_respects_elevation: bool,
}

impl GridOptions {
    /// Creates grid options with every policy stated explicitly.
    #[must_use]
    pub const fn new(resource_radius_respects_elevation: bool) -> Self {
        Self {
            resource_radius_respects_elevation,
        }
    }

    /// When `true`, resource radius expansion only collects tiles on the same
    /// elevation layer as the collecting building, mirroring the rule that
    /// buildable radius expansion always follows.
    #[must_use]
    pub const fn resource_radius_respects_elevation(&self) -> bool {
        self.resource_radius_respects_elevation
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the world's terrain and derived-grid policies, clearing every
    /// placed building.
    ConfigureTerrain {
        /// Resolved terrain lookup the world should adopt.
        terrain: TerrainQuery,
        /// Policies governing derived-set computation.
        options: GridOptions,
    },
    /// Requests placement of a building anchored at the provided root tile.
    PlaceBuilding {
        /// Template of the building to construct.
        descriptor: BuildingDescriptor,
        /// Upper-left tile that anchors the building's footprint.
        root: TileCoord,
    },
    /// Requests demolition of an existing building.
    RemoveBuilding {
        /// Identifier of the building targeted for demolition.
        building: BuildingId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a building was placed into the world.
    BuildingPlaced {
        /// Identifier assigned to the building by the world.
        building: BuildingId,
        /// Template of the building that was placed.
        descriptor: BuildingDescriptor,
        /// Tiles occupied by the building.
        footprint: TileArea,
    },
    /// Confirms that a building was demolished.
    BuildingRemoved {
        /// Identifier of the building that was removed.
        building: BuildingId,
        /// Template of the building that was removed.
        descriptor: BuildingDescriptor,
        /// Tiles previously occupied by the building.
        footprint: TileArea,
    },
    /// Reports the new cardinality of the collected-resource tile set.
    ///
    /// Emitted when placement changed the set, and unconditionally after
    /// demolition or terrain reconfiguration.
    ResourceTilesUpdated {
        /// Number of resource tiles currently collected.
        count: usize,
    },
    /// Announces that the derived grid sets changed and should be re-read.
    GridStateUpdated,
}

/// Visual category applied to a batch of highlighted tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    /// Tiles where construction is currently legal.
    Buildable,
    /// Tiles the hovered placement would newly make buildable.
    Expanded,
    /// Resource tiles the hovered placement would collect.
    Resource,
}

/// One-way directives published to the presentation collaborator.
///
/// No reply or return value is ever expected; adapters are free to drop or
/// batch these however their renderer requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Requests that the provided tiles be highlighted with the given style.
    HighlightTiles {
        /// Tiles to highlight, in deterministic `(x, y)` order.
        tiles: Vec<TileCoord>,
        /// Style to apply to the batch.
        kind: HighlightKind,
    },
    /// Removes every active highlight.
    ClearHighlights,
    /// Creates the placement ghost for a newly selected building type.
    ShowPreview {
        /// Template of the building being previewed.
        descriptor: BuildingDescriptor,
        /// Area the ghost initially covers.
        area: TileArea,
    },
    /// Repositions the placement ghost over a new hovered area.
    MovePreview {
        /// Area the ghost now covers.
        area: TileArea,
    },
    /// Switches the ghost between its valid and invalid styling.
    SetPreviewValidity {
        /// Whether the hovered placement is currently legal and affordable.
        valid: bool,
    },
    /// Destroys the placement ghost.
    HidePreview,
}

/// Immutable representation of a single placed building used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingSnapshot {
    /// Identifier allocated to the building by the world.
    pub id: BuildingId,
    /// Template the building was constructed from.
    pub descriptor: BuildingDescriptor,
    /// Tile anchoring the building's footprint.
    pub root: TileCoord,
    /// Tiles occupied by the building.
    pub footprint: TileArea,
}

/// Read-only snapshot describing all buildings placed within the world.
#[derive(Clone, Debug, Default)]
pub struct BuildingView {
    snapshots: Vec<BuildingSnapshot>,
}

impl BuildingView {
    /// Creates a new building view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BuildingSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &BuildingSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BuildingSnapshot> {
        self.snapshots
    }
}
