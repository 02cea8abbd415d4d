//! Derived grid sets and the incremental / full recomputation policies.
//!
//! The three sets are pure functions of the placed buildings and the terrain.
//! Placement is applied incrementally because addition only ever grows the
//! sets. Removal always rebuilds from scratch: a removed building may share
//! claimed tiles with a neighbor, and naive subtraction would revoke tiles
//! the neighbor still legitimately covers.

use std::collections::HashSet;

use homestead_core::{BuildingDescriptor, GridOptions, TerrainQuery, TileArea, TileCoord};

/// Hash-keyed derived sets; working size scales with buildings times radius
/// squared, not with the total map size.
#[derive(Clone, Debug, Default)]
pub(crate) struct GridState {
    occupied: HashSet<TileCoord>,
    buildable: HashSet<TileCoord>,
    collected_resources: HashSet<TileCoord>,
}

impl GridState {
    /// Empties every derived set.
    pub(crate) fn clear(&mut self) {
        self.occupied.clear();
        self.buildable.clear();
        self.collected_resources.clear();
    }

    /// Membership test against the buildable set.
    pub(crate) fn is_tile_buildable(&self, tile: TileCoord) -> bool {
        self.buildable.contains(&tile)
    }

    /// Membership test against the occupied set.
    pub(crate) fn is_occupied(&self, tile: TileCoord) -> bool {
        self.occupied.contains(&tile)
    }

    /// Reports whether every tile of `area` can legally host a footprint.
    ///
    /// All tiles must be terrain-buildable, currently buildable, and share
    /// the elevation of the area's first tile. An area straddling two
    /// elevations is simply not buildable; it is never an error.
    pub(crate) fn is_area_buildable(&self, area: TileArea, terrain: &TerrainQuery) -> bool {
        let elevation = terrain.elevation_at(area.origin());
        area.tiles().all(|tile| {
            terrain.is_buildable(tile)
                && self.buildable.contains(&tile)
                && terrain.elevation_at(tile) == elevation
        })
    }

    /// Incrementally folds one placed building into the derived sets.
    ///
    /// Returns `true` when the collected-resource set changed cardinality.
    pub(crate) fn mark_placed(
        &mut self,
        footprint: TileArea,
        descriptor: &BuildingDescriptor,
        terrain: &TerrainQuery,
        options: GridOptions,
    ) -> bool {
        for tile in footprint.tiles() {
            let _ = self.occupied.insert(tile);
            let _ = self.buildable.remove(&tile);
        }

        let elevation = terrain.elevation_at(footprint.origin());
        for tile in footprint.expanded_by(descriptor.buildable_radius()).tiles() {
            if self.occupied.contains(&tile) {
                continue;
            }
            if !terrain.is_buildable(tile) {
                continue;
            }
            if terrain.elevation_at(tile) != elevation {
                continue;
            }
            let _ = self.buildable.insert(tile);
        }

        let before = self.collected_resources.len();
        for tile in footprint.expanded_by(descriptor.resource_radius()).tiles() {
            if !terrain.is_resource_bearing(tile) {
                continue;
            }
            if options.resource_radius_respects_elevation()
                && terrain.elevation_at(tile) != elevation
            {
                continue;
            }
            let _ = self.collected_resources.insert(tile);
        }
        self.collected_resources.len() != before
    }

    /// Rebuilds every derived set by replaying the provided buildings.
    pub(crate) fn recompute<'a, I>(
        &mut self,
        buildings: I,
        terrain: &TerrainQuery,
        options: GridOptions,
    ) where
        I: IntoIterator<Item = (TileArea, &'a BuildingDescriptor)>,
    {
        self.clear();
        for (footprint, descriptor) in buildings {
            let _ = self.mark_placed(footprint, descriptor, terrain, options);
        }
    }

    /// Tiles currently covered by any building footprint.
    pub(crate) fn occupied(&self) -> &HashSet<TileCoord> {
        &self.occupied
    }

    /// Tiles where construction is currently legal.
    pub(crate) fn buildable(&self) -> &HashSet<TileCoord> {
        &self.buildable
    }

    /// Resource tiles within some building's resource radius.
    pub(crate) fn collected_resources(&self) -> &HashSet<TileCoord> {
        &self.collected_resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestead_core::{TerrainLayer, TileAreaSize, TileAttributes};

    fn tile(x: i32, y: i32) -> TileCoord {
        TileCoord::new(x, y)
    }

    fn open_field() -> TerrainQuery {
        let mut ground = TerrainLayer::elevation("field");
        for x in 0..8 {
            for y in 0..8 {
                ground = ground.with_tile(tile(x, y), TileAttributes::buildable());
            }
        }
        ground = ground.with_tile(tile(7, 0), TileAttributes::resource());
        TerrainQuery::resolve(&ground).expect("terrain resolves")
    }

    fn hut() -> BuildingDescriptor {
        BuildingDescriptor::new("hut", TileAreaSize::new(1, 1), 1, 0, 1, true)
    }

    #[test]
    fn placement_claims_footprint_and_grants_radius() {
        let terrain = open_field();
        let mut grid = GridState::default();
        let footprint = TileArea::from_origin_and_size(tile(3, 3), TileAreaSize::new(1, 1));

        let changed = grid.mark_placed(footprint, &hut(), &terrain, GridOptions::default());

        assert!(!changed, "hut has no resource radius");
        assert!(grid.is_occupied(tile(3, 3)));
        assert!(!grid.is_tile_buildable(tile(3, 3)), "footprint never buildable");
        for neighbor in [tile(2, 2), tile(4, 4), tile(3, 2), tile(2, 4)] {
            assert!(grid.is_tile_buildable(neighbor), "{neighbor:?} within radius");
        }
        assert!(!grid.is_tile_buildable(tile(5, 3)), "outside radius");
    }

    #[test]
    fn later_footprint_evicts_previously_buildable_tiles() {
        let terrain = open_field();
        let mut grid = GridState::default();
        let descriptor = hut();
        let first = TileArea::from_origin_and_size(tile(3, 3), TileAreaSize::new(1, 1));
        let second = TileArea::from_origin_and_size(tile(4, 3), TileAreaSize::new(1, 1));

        let _ = grid.mark_placed(first, &descriptor, &terrain, GridOptions::default());
        assert!(grid.is_tile_buildable(tile(4, 3)));
        let _ = grid.mark_placed(second, &descriptor, &terrain, GridOptions::default());

        assert!(grid.is_occupied(tile(4, 3)));
        assert!(!grid.is_tile_buildable(tile(4, 3)));
        assert!(
            grid.buildable().is_disjoint(grid.occupied()),
            "buildable and occupied must never intersect",
        );
    }

    #[test]
    fn resource_collection_reports_cardinality_changes() {
        let terrain = open_field();
        let mut grid = GridState::default();
        let collector = BuildingDescriptor::new("camp", TileAreaSize::new(1, 1), 0, 1, 1, true);
        let near_vein = TileArea::from_origin_and_size(tile(6, 1), TileAreaSize::new(1, 1));

        let changed = grid.mark_placed(near_vein, &collector, &terrain, GridOptions::default());
        assert!(changed, "vein at (7, 0) lies within radius");
        assert!(grid.collected_resources().contains(&tile(7, 0)));

        let again = grid.mark_placed(near_vein, &collector, &terrain, GridOptions::default());
        assert!(!again, "re-collecting the same vein changes nothing");
    }

    #[test]
    fn buildable_expansion_never_crosses_elevations() {
        let root = TerrainLayer::elevation("lowland")
            .with_tiles((0..6).flat_map(|x| {
                (0..3).map(move |y| (tile(x, y), TileAttributes::buildable()))
            }))
            .with_child(
                TerrainLayer::elevation("bluff")
                    .with_tiles((0..6).map(|x| (tile(x, 3), TileAttributes::buildable()))),
            );
        let terrain = TerrainQuery::resolve(&root).expect("terrain resolves");
        let mut grid = GridState::default();
        let descriptor = BuildingDescriptor::new("hut", TileAreaSize::new(1, 1), 2, 0, 1, true);
        let footprint = TileArea::from_origin_and_size(tile(2, 1), TileAreaSize::new(1, 1));

        let _ = grid.mark_placed(footprint, &descriptor, &terrain, GridOptions::default());

        assert!(grid.is_tile_buildable(tile(2, 2)), "same elevation, in radius");
        assert!(
            !grid.is_tile_buildable(tile(2, 3)),
            "bluff row is inside the radius but on another elevation",
        );
    }

    #[test]
    fn resource_elevation_policy_is_configurable() {
        let root = TerrainLayer::elevation("lowland")
            .with_tile(tile(0, 0), TileAttributes::buildable())
            .with_child(
                TerrainLayer::elevation("bluff").with_tile(tile(1, 0), TileAttributes::resource()),
            );
        let terrain = TerrainQuery::resolve(&root).expect("terrain resolves");
        let collector = BuildingDescriptor::new("camp", TileAreaSize::new(1, 1), 0, 1, 1, true);
        let footprint = TileArea::from_origin_and_size(tile(0, 0), TileAreaSize::new(1, 1));

        let mut lenient = GridState::default();
        let changed = lenient.mark_placed(footprint, &collector, &terrain, GridOptions::default());
        assert!(changed, "default policy collects across elevations");

        let mut strict = GridState::default();
        let changed = strict.mark_placed(footprint, &collector, &terrain, GridOptions::new(true));
        assert!(!changed, "strict policy stops at the elevation boundary");
    }

    #[test]
    fn recompute_rebuilds_from_the_provided_buildings_only() {
        let terrain = open_field();
        let mut grid = GridState::default();
        let descriptor = hut();
        let kept = TileArea::from_origin_and_size(tile(1, 1), TileAreaSize::new(1, 1));
        let dropped = TileArea::from_origin_and_size(tile(6, 6), TileAreaSize::new(1, 1));

        let _ = grid.mark_placed(kept, &descriptor, &terrain, GridOptions::default());
        let _ = grid.mark_placed(dropped, &descriptor, &terrain, GridOptions::default());
        grid.recompute(
            [(kept, &descriptor)],
            &terrain,
            GridOptions::default(),
        );

        assert!(grid.is_occupied(tile(1, 1)));
        assert!(!grid.is_occupied(tile(6, 6)));
        assert!(!grid.is_tile_buildable(tile(6, 5)), "dropped grant is gone");
    }
}
