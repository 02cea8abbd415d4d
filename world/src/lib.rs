#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid and building state management for Homestead.
//!
//! The world owns the placed-building registry and the derived grid sets.
//! Adapters and systems mutate it exclusively through [`apply`], which
//! executes one [`Command`] and appends the resulting [`Event`]s, and read it
//! exclusively through the [`query`] module. The world is the
//! building-lifecycle registry: placement and demolition commands arrive
//! already validated by the placement system, and the derived sets are
//! recomputed here before the triggering call returns.

mod buildings;
mod grid;

use buildings::BuildingRegistry;
use grid::GridState;
use homestead_core::{Command, Event, GridOptions, TerrainQuery, TileArea};
use tracing::debug;

/// Represents the authoritative Homestead world state.
#[derive(Debug, Default)]
pub struct World {
    terrain: TerrainQuery,
    options: GridOptions,
    buildings: BuildingRegistry,
    grid: GridState,
}

impl World {
    /// Creates a new world with empty terrain and no buildings.
    ///
    /// Nothing is buildable until terrain is configured and a first building
    /// (typically the scenario's base) is placed to seed the buildable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Grid recomputation triggered by a command completes before this function
/// returns; the appended events are the synchronous notifications required by
/// presentation and UI collaborators.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTerrain { terrain, options } => {
            world.terrain = terrain;
            world.options = options;
            world.buildings = BuildingRegistry::new();
            world.grid.clear();
            debug!("terrain reconfigured, world reset");
            out_events.push(Event::ResourceTilesUpdated { count: 0 });
            out_events.push(Event::GridStateUpdated);
        }
        Command::PlaceBuilding { descriptor, root } => {
            let id = world.buildings.insert(descriptor, root);
            let footprint = TileArea::from_origin_and_size(root, descriptor.footprint());
            let resources_changed =
                world
                    .grid
                    .mark_placed(footprint, &descriptor, &world.terrain, world.options);
            debug!(
                building = id.get(),
                name = descriptor.name(),
                x = root.x(),
                y = root.y(),
                "building placed",
            );
            out_events.push(Event::BuildingPlaced {
                building: id,
                descriptor,
                footprint,
            });
            if resources_changed {
                out_events.push(Event::ResourceTilesUpdated {
                    count: world.grid.collected_resources().len(),
                });
            }
            out_events.push(Event::GridStateUpdated);
        }
        Command::RemoveBuilding { building } => {
            let deletable = world
                .buildings
                .get(building)
                .map(|stored| stored.descriptor.is_deletable());
            match deletable {
                None => {
                    debug!(building = building.get(), "ignored removal of unknown building");
                    return;
                }
                Some(false) => {
                    debug!(
                        building = building.get(),
                        "ignored removal of a non-deletable building",
                    );
                    return;
                }
                Some(true) => {}
            }
            let Some(removed) = world.buildings.remove(building) else {
                return;
            };
            world.grid.recompute(
                world
                    .buildings
                    .iter()
                    .map(|stored| (stored.footprint, &stored.descriptor)),
                &world.terrain,
                world.options,
            );
            debug!(
                building = building.get(),
                name = removed.descriptor.name(),
                "building removed, grid recomputed",
            );
            out_events.push(Event::BuildingRemoved {
                building,
                descriptor: removed.descriptor,
                footprint: removed.footprint,
            });
            out_events.push(Event::ResourceTilesUpdated {
                count: world.grid.collected_resources().len(),
            });
            out_events.push(Event::GridStateUpdated);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::HashSet;

    use super::World;
    use homestead_core::{
        BuildingId, BuildingSnapshot, BuildingView, TerrainQuery, TileArea, TileCoord,
    };

    /// Provides read-only access to the resolved terrain lookup.
    #[must_use]
    pub fn terrain(world: &World) -> &TerrainQuery {
        &world.terrain
    }

    /// Membership test against the buildable set.
    #[must_use]
    pub fn is_tile_buildable(world: &World, tile: TileCoord) -> bool {
        world.grid.is_tile_buildable(tile)
    }

    /// Membership test against the occupied set.
    #[must_use]
    pub fn is_tile_occupied(world: &World, tile: TileCoord) -> bool {
        world.grid.is_occupied(tile)
    }

    /// Reports whether every tile of `area` can legally host a footprint.
    ///
    /// True only when each tile is terrain-buildable, in the buildable set,
    /// and on the same elevation as the area's first tile.
    #[must_use]
    pub fn is_area_buildable(world: &World, area: TileArea) -> bool {
        world.grid.is_area_buildable(area, &world.terrain)
    }

    /// Tiles where construction is currently legal, in `(x, y)` order.
    #[must_use]
    pub fn buildable_tiles(world: &World) -> Vec<TileCoord> {
        sorted(world.grid.buildable())
    }

    /// Tiles currently covered by a building footprint, in `(x, y)` order.
    #[must_use]
    pub fn occupied_tiles(world: &World) -> Vec<TileCoord> {
        sorted(world.grid.occupied())
    }

    /// Resource tiles currently collected, in `(x, y)` order.
    #[must_use]
    pub fn collected_resource_tiles(world: &World) -> Vec<TileCoord> {
        sorted(world.grid.collected_resources())
    }

    /// Number of resource tiles currently collected.
    #[must_use]
    pub fn resource_tile_count(world: &World) -> usize {
        world.grid.collected_resources().len()
    }

    /// Finds the building whose footprint contains the provided tile.
    #[must_use]
    pub fn building_at(world: &World, tile: TileCoord) -> Option<BuildingSnapshot> {
        world.buildings.at(tile).map(snapshot)
    }

    /// Retrieves a building snapshot by identifier.
    #[must_use]
    pub fn building(world: &World, id: BuildingId) -> Option<BuildingSnapshot> {
        world.buildings.get(id).map(snapshot)
    }

    /// Captures a read-only view of every placed building.
    #[must_use]
    pub fn buildings(world: &World) -> BuildingView {
        BuildingView::from_snapshots(world.buildings.iter().map(snapshot).collect())
    }

    /// Tiles a placement over `area` would newly make buildable.
    ///
    /// Mirrors the incremental placement expansion: terrain-buildable tiles
    /// within `radius` of the area, on the area's elevation, excluding tiles
    /// already occupied or already buildable. Used for preview highlights.
    #[must_use]
    pub fn expanded_buildable_tiles(world: &World, area: TileArea, radius: u32) -> Vec<TileCoord> {
        let elevation = world.terrain.elevation_at(area.origin());
        let mut tiles: Vec<TileCoord> = area
            .expanded_by(radius)
            .tiles()
            .filter(|tile| {
                world.terrain.is_buildable(*tile)
                    && world.terrain.elevation_at(*tile) == elevation
                    && !world.grid.is_occupied(*tile)
                    && !world.grid.is_tile_buildable(*tile)
            })
            .collect();
        tiles.sort();
        tiles
    }

    /// Uncollected resource tiles a placement over `area` would collect.
    #[must_use]
    pub fn resource_tiles_within(world: &World, area: TileArea, radius: u32) -> Vec<TileCoord> {
        let elevation = world.terrain.elevation_at(area.origin());
        let respects_elevation = world.options.resource_radius_respects_elevation();
        let mut tiles: Vec<TileCoord> = area
            .expanded_by(radius)
            .tiles()
            .filter(|tile| {
                world.terrain.is_resource_bearing(*tile)
                    && (!respects_elevation || world.terrain.elevation_at(*tile) == elevation)
                    && !world.grid.collected_resources().contains(tile)
            })
            .collect();
        tiles.sort();
        tiles
    }

    fn snapshot(stored: &super::buildings::PlacedBuilding) -> BuildingSnapshot {
        BuildingSnapshot {
            id: stored.id,
            descriptor: stored.descriptor,
            root: stored.root,
            footprint: stored.footprint,
        }
    }

    fn sorted(set: &HashSet<TileCoord>) -> Vec<TileCoord> {
        let mut tiles: Vec<TileCoord> = set.iter().copied().collect();
        tiles.sort();
        tiles
    }
}
