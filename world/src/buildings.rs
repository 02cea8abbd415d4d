//! Authoritative placed-building storage.

use std::collections::BTreeMap;

use homestead_core::{BuildingDescriptor, BuildingId, TileArea, TileCoord};

/// Snapshot of a building stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct PlacedBuilding {
    /// Identifier allocated by the world for the building.
    pub(crate) id: BuildingId,
    /// Template the building was constructed from.
    pub(crate) descriptor: BuildingDescriptor,
    /// Tile anchoring the building's footprint.
    pub(crate) root: TileCoord,
    /// Tiles covered by the building, derived from root and footprint size.
    pub(crate) footprint: TileArea,
}

/// Registry that stores buildings and manages identifier allocation.
///
/// Entries live in a `BTreeMap` so replaying them during recomputation is
/// deterministic.
#[derive(Debug, Default)]
pub(crate) struct BuildingRegistry {
    entries: BTreeMap<BuildingId, PlacedBuilding>,
    next_id: u32,
}

impl BuildingRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Stores a new building anchored at `root`, returning its identifier.
    pub(crate) fn insert(&mut self, descriptor: BuildingDescriptor, root: TileCoord) -> BuildingId {
        let id = BuildingId::new(self.next_id);
        self.next_id += 1;
        let footprint = TileArea::from_origin_and_size(root, descriptor.footprint());
        let _ = self.entries.insert(
            id,
            PlacedBuilding {
                id,
                descriptor,
                root,
                footprint,
            },
        );
        id
    }

    /// Retrieves a building by identifier.
    pub(crate) fn get(&self, id: BuildingId) -> Option<&PlacedBuilding> {
        self.entries.get(&id)
    }

    /// Removes a building by identifier, returning the stored state.
    pub(crate) fn remove(&mut self, id: BuildingId) -> Option<PlacedBuilding> {
        self.entries.remove(&id)
    }

    /// Finds the building whose footprint contains the provided tile.
    pub(crate) fn at(&self, tile: TileCoord) -> Option<&PlacedBuilding> {
        self.entries
            .values()
            .find(|building| building.footprint.contains(tile))
    }

    /// Iterates over stored buildings in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlacedBuilding> {
        self.entries.values()
    }
}
