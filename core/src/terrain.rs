//! Read-only terrain attribute lookup across a precedence-ordered layer stack.
//!
//! Terrain is authored as a tree of [`TerrainLayer`] nodes and resolved once,
//! at startup, into a flat [`TerrainQuery`]. After resolution the data is
//! immutable, so the query is safe to share across any number of readers.

use std::collections::HashMap;

use thiserror::Error;

use crate::{TileArea, TileAreaSize, TileCoord};

/// Identifier of a resolved terrain layer, allocated in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TerrainLayerId(u32);

impl TerrainLayerId {
    /// Creates a new terrain layer identifier.
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

/// Identifier of an elevation grouping of terrain layers.
///
/// Buildings may never span tiles belonging to two different elevations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElevationId(u32);

impl ElevationId {
    /// Creates a new elevation identifier.
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

/// Static attributes a terrain layer can assign to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainAttribute {
    /// The tile can host construction, grid state permitting.
    Buildable,
    /// The tile carries a collectible resource.
    ResourceBearing,
}

/// Per-tile attribute record stored inside a terrain layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileAttributes {
    buildable: bool,
    resource_bearing: bool,
    ignored: bool,
}

impl TileAttributes {
    /// Creates an attribute record with the provided flags and no `ignored`
    /// marking.
    #[must_use]
    pub const fn new(buildable: bool, resource_bearing: bool) -> Self {
        Self {
            buildable,
            resource_bearing,
            ignored: false,
        }
    }

    /// A plain buildable tile.
    #[must_use]
    pub const fn buildable() -> Self {
        Self::new(true, false)
    }

    /// A resource-bearing tile that cannot itself host construction.
    #[must_use]
    pub const fn resource() -> Self {
        Self::new(false, true)
    }

    /// A defined tile that is neither buildable nor resource-bearing.
    #[must_use]
    pub const fn barren() -> Self {
        Self::new(false, false)
    }

    /// An entry the layer walk skips, deferring to the layer beneath.
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            buildable: false,
            resource_bearing: false,
            ignored: true,
        }
    }

    /// Reports whether the tile can host construction.
    #[must_use]
    pub const fn is_buildable(&self) -> bool {
        self.buildable
    }

    /// Reports whether the tile carries a collectible resource.
    #[must_use]
    pub const fn is_resource_bearing(&self) -> bool {
        self.resource_bearing
    }

    /// Reports whether the entry is skipped during lookup.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Retrieves the named attribute flag.
    #[must_use]
    pub const fn attribute(&self, attribute: TerrainAttribute) -> bool {
        match attribute {
            TerrainAttribute::Buildable => self.buildable,
            TerrainAttribute::ResourceBearing => self.resource_bearing,
        }
    }
}

/// Authoring node of the terrain tree.
///
/// A node may mark an elevation boundary, carry per-tile attribute entries,
/// and hold any number of children. Later children sit visually in front of
/// earlier siblings, and every child sits in front of its parent.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TerrainLayer {
    name: String,
    elevation_boundary: bool,
    tiles: HashMap<TileCoord, TileAttributes>,
    children: Vec<TerrainLayer>,
}

impl TerrainLayer {
    /// Creates a plain terrain layer with the provided name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elevation_boundary: false,
            tiles: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates a layer that starts a new elevation grouping for itself and
    /// every descendant without a closer marker.
    #[must_use]
    pub fn elevation(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elevation_boundary: true,
            tiles: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds a single tile attribute entry to the layer.
    #[must_use]
    pub fn with_tile(mut self, tile: TileCoord, attributes: TileAttributes) -> Self {
        let _ = self.tiles.insert(tile, attributes);
        self
    }

    /// Adds every provided tile attribute entry to the layer.
    #[must_use]
    pub fn with_tiles<I>(mut self, tiles: I) -> Self
    where
        I: IntoIterator<Item = (TileCoord, TileAttributes)>,
    {
        for (tile, attributes) in tiles {
            let _ = self.tiles.insert(tile, attributes);
        }
        self
    }

    /// Appends a child layer, placing it in front of existing children.
    #[must_use]
    pub fn with_child(mut self, child: TerrainLayer) -> Self {
        self.children.push(child);
        self
    }

    /// Name given to the layer by the terrain author.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Structural authoring defects detected while resolving a terrain tree.
///
/// These are fatal at startup and never recovered from at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A layer carrying tile data has no elevation marker in its ancestor
    /// chain, so its tiles cannot be grouped for adjacency checks.
    #[error("terrain layer '{layer}' has no enclosing elevation layer")]
    MissingElevationLayer {
        /// Name of the offending layer.
        layer: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct ResolvedLayer {
    id: TerrainLayerId,
    name: String,
    elevation: ElevationId,
    tiles: HashMap<TileCoord, TileAttributes>,
}

/// Immutable per-tile attribute lookup resolved from a terrain tree.
///
/// Layers are stored in precedence order: deepest child first, front to back.
/// The first layer holding a non-ignored entry for a tile determines the
/// result; tiles absent from every layer resolve to no owner and `false`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TerrainQuery {
    layers: Vec<ResolvedLayer>,
}

impl TerrainQuery {
    /// Resolves an authored terrain tree into a flat lookup.
    ///
    /// Elevations are assigned by walking each layer's ancestor chain to the
    /// nearest elevation marker. A data-carrying layer without one is a
    /// [`ConfigurationError`].
    pub fn resolve(root: &TerrainLayer) -> Result<Self, ConfigurationError> {
        let mut layers = Vec::new();
        let mut next_elevation = 0;
        collect_layers(root, None, &mut next_elevation, &mut layers)?;
        Ok(Self { layers })
    }

    /// Looks up the named attribute for a tile.
    ///
    /// Returns the owning layer and the attribute value, or `None` when the
    /// tile is absent from (or ignored by) every layer.
    #[must_use]
    pub fn attribute_at(
        &self,
        tile: TileCoord,
        attribute: TerrainAttribute,
    ) -> Option<(TerrainLayerId, bool)> {
        self.entry_at(tile)
            .map(|(layer, attributes)| (layer.id, attributes.attribute(attribute)))
    }

    /// Reports whether the terrain marks the tile as buildable.
    #[must_use]
    pub fn is_buildable(&self, tile: TileCoord) -> bool {
        self.attribute_at(tile, TerrainAttribute::Buildable)
            .is_some_and(|(_, value)| value)
    }

    /// Reports whether the terrain marks the tile as resource-bearing.
    #[must_use]
    pub fn is_resource_bearing(&self, tile: TileCoord) -> bool {
        self.attribute_at(tile, TerrainAttribute::ResourceBearing)
            .is_some_and(|(_, value)| value)
    }

    /// Returns the layer whose entry determines the tile, if any.
    #[must_use]
    pub fn owner_of(&self, tile: TileCoord) -> Option<TerrainLayerId> {
        self.entry_at(tile).map(|(layer, _)| layer.id)
    }

    /// Returns the elevation grouping of the layer that owns the tile.
    #[must_use]
    pub fn elevation_at(&self, tile: TileCoord) -> Option<ElevationId> {
        self.entry_at(tile).map(|(layer, _)| layer.elevation)
    }

    /// Returns the elevation grouping a resolved layer belongs to.
    #[must_use]
    pub fn elevation_of(&self, layer: TerrainLayerId) -> Option<ElevationId> {
        self.layers
            .iter()
            .find(|resolved| resolved.id == layer)
            .map(|resolved| resolved.elevation)
    }

    /// Returns the authored name of a resolved layer.
    #[must_use]
    pub fn layer_name(&self, layer: TerrainLayerId) -> Option<&str> {
        self.layers
            .iter()
            .find(|resolved| resolved.id == layer)
            .map(|resolved| resolved.name.as_str())
    }

    /// Smallest area covering every tile defined by any layer.
    ///
    /// Returns `None` for terrain with no tile entries at all.
    #[must_use]
    pub fn tile_bounds(&self) -> Option<TileArea> {
        let mut tiles = self.layers.iter().flat_map(|layer| layer.tiles.keys());
        let first = *tiles.next()?;
        let (mut min_x, mut min_y) = (first.x(), first.y());
        let (mut max_x, mut max_y) = (first.x(), first.y());
        for tile in tiles {
            min_x = min_x.min(tile.x());
            min_y = min_y.min(tile.y());
            max_x = max_x.max(tile.x());
            max_y = max_y.max(tile.y());
        }
        Some(TileArea::from_origin_and_size(
            TileCoord::new(min_x, min_y),
            TileAreaSize::new((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32),
        ))
    }

    fn entry_at(&self, tile: TileCoord) -> Option<(&ResolvedLayer, TileAttributes)> {
        for layer in &self.layers {
            if let Some(attributes) = layer.tiles.get(&tile) {
                if attributes.is_ignored() {
                    continue;
                }
                return Some((layer, *attributes));
            }
        }
        None
    }
}

fn collect_layers(
    node: &TerrainLayer,
    inherited: Option<ElevationId>,
    next_elevation: &mut u32,
    out: &mut Vec<ResolvedLayer>,
) -> Result<(), ConfigurationError> {
    let elevation = if node.elevation_boundary {
        let id = ElevationId::new(*next_elevation);
        *next_elevation += 1;
        Some(id)
    } else {
        inherited
    };

    for child in node.children.iter().rev() {
        collect_layers(child, elevation, next_elevation, out)?;
    }

    if !node.tiles.is_empty() {
        let elevation = elevation.ok_or_else(|| ConfigurationError::MissingElevationLayer {
            layer: node.name.clone(),
        })?;
        out.push(ResolvedLayer {
            id: TerrainLayerId::new(out.len() as u32),
            name: node.name.clone(),
            elevation,
            tiles: node.tiles.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    #[test]
    fn child_layer_overrides_its_parent() {
        let root = TerrainLayer::elevation("ground")
            .with_tile(tile(0, 0), TileAttributes::buildable())
            .with_child(TerrainLayer::new("path").with_tile(tile(0, 0), TileAttributes::barren()));

        let query = TerrainQuery::resolve(&root).expect("terrain resolves");

        assert!(!query.is_buildable(tile(0, 0)), "child entry must win");
        let owner = query.owner_of(tile(0, 0)).expect("tile is owned");
        assert_eq!(query.layer_name(owner), Some("path"));
    }

    #[test]
    fn later_sibling_sits_in_front_of_earlier_sibling() {
        let root = TerrainLayer::elevation("ground")
            .with_child(TerrainLayer::new("back").with_tile(tile(1, 1), TileAttributes::barren()))
            .with_child(
                TerrainLayer::new("front").with_tile(tile(1, 1), TileAttributes::buildable()),
            );

        let query = TerrainQuery::resolve(&root).expect("terrain resolves");

        assert!(query.is_buildable(tile(1, 1)));
        let owner = query.owner_of(tile(1, 1)).expect("tile is owned");
        assert_eq!(query.layer_name(owner), Some("front"));
    }

    #[test]
    fn ignored_entry_defers_to_the_layer_beneath() {
        let root = TerrainLayer::elevation("ground")
            .with_tile(tile(2, 2), TileAttributes::buildable())
            .with_child(TerrainLayer::new("rim").with_tile(tile(2, 2), TileAttributes::ignored()));

        let query = TerrainQuery::resolve(&root).expect("terrain resolves");

        assert!(query.is_buildable(tile(2, 2)), "walk continues past rim");
        let owner = query.owner_of(tile(2, 2)).expect("tile is owned");
        assert_eq!(query.layer_name(owner), Some("ground"));
    }

    #[test]
    fn absent_tiles_resolve_to_unowned_false() {
        let root =
            TerrainLayer::elevation("ground").with_tile(tile(0, 0), TileAttributes::buildable());
        let query = TerrainQuery::resolve(&root).expect("terrain resolves");

        assert_eq!(query.attribute_at(tile(9, 9), TerrainAttribute::Buildable), None);
        assert!(!query.is_buildable(tile(9, 9)));
        assert_eq!(query.owner_of(tile(9, 9)), None);
        assert_eq!(query.elevation_at(tile(9, 9)), None);
    }

    #[test]
    fn data_layer_without_elevation_marker_fails_resolve() {
        let root = TerrainLayer::new("orphan").with_tile(tile(0, 0), TileAttributes::buildable());

        let error = TerrainQuery::resolve(&root).expect_err("resolve must fail");
        assert_eq!(
            error,
            ConfigurationError::MissingElevationLayer {
                layer: "orphan".to_owned(),
            },
        );
    }

    #[test]
    fn elevation_follows_the_nearest_marker() {
        let root = TerrainLayer::elevation("ground")
            .with_tile(tile(0, 0), TileAttributes::buildable())
            .with_child(
                TerrainLayer::elevation("plateau")
                    .with_tile(tile(5, 5), TileAttributes::buildable()),
            );

        let query = TerrainQuery::resolve(&root).expect("terrain resolves");

        let ground = query.elevation_at(tile(0, 0)).expect("ground owned");
        let plateau = query.elevation_at(tile(5, 5)).expect("plateau owned");
        assert_ne!(ground, plateau, "markers start distinct elevations");

        let owner = query.owner_of(tile(5, 5)).expect("plateau tile owned");
        assert_eq!(query.elevation_of(owner), Some(plateau));
    }

    #[test]
    fn tile_bounds_cover_every_layer() {
        let root = TerrainLayer::elevation("ground")
            .with_tile(tile(-1, 0), TileAttributes::buildable())
            .with_child(TerrainLayer::new("spur").with_tile(tile(3, 4), TileAttributes::barren()));

        let query = TerrainQuery::resolve(&root).expect("terrain resolves");
        let bounds = query.tile_bounds().expect("bounds exist");

        assert_eq!(bounds.origin(), tile(-1, 0));
        assert_eq!(bounds.size(), TileAreaSize::new(5, 5));
        assert!(bounds.contains(tile(3, 4)));
    }

    #[test]
    fn empty_terrain_has_no_bounds() {
        assert_eq!(TerrainQuery::default().tile_bounds(), None);
    }
}
