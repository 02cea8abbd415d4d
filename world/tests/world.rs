use homestead_core::{
    BuildingDescriptor, Command, Event, GridOptions, TerrainLayer, TerrainQuery, TileArea,
    TileAreaSize, TileAttributes, TileCoord,
};
use homestead_world::{self as world, query, World};

fn tile(x: i32, y: i32) -> TileCoord {
    TileCoord::new(x, y)
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn meadow(width: i32, height: i32) -> TerrainLayer {
    let mut layer = TerrainLayer::elevation("meadow");
    for x in 0..width {
        for y in 0..height {
            layer = layer.with_tile(tile(x, y), TileAttributes::buildable());
        }
    }
    layer
}

fn configured(terrain: TerrainQuery) -> World {
    let mut world = World::new();
    let _ = apply(
        &mut world,
        Command::ConfigureTerrain {
            terrain,
            options: GridOptions::default(),
        },
    );
    world
}

const BASE: BuildingDescriptor =
    BuildingDescriptor::new("base", TileAreaSize::new(2, 2), 4, 0, 0, false);
const HUT: BuildingDescriptor =
    BuildingDescriptor::new("hut", TileAreaSize::new(1, 1), 2, 0, 1, true);

#[test]
fn occupied_equals_the_union_of_all_footprints() {
    let terrain = TerrainQuery::resolve(&meadow(10, 10)).expect("terrain resolves");
    let mut world = configured(terrain);

    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: BASE, root: tile(1, 1) });
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: HUT, root: tile(4, 2) });
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: HUT, root: tile(6, 6) });

    let mut expected: Vec<TileCoord> = query::buildings(&world)
        .iter()
        .flat_map(|snapshot| snapshot.footprint.tiles())
        .collect();
    expected.sort();
    expected.dedup();
    assert_eq!(query::occupied_tiles(&world), expected);

    let removed = query::building_at(&world, tile(4, 2)).expect("hut present");
    let _ = apply(&mut world, Command::RemoveBuilding { building: removed.id });

    let mut expected: Vec<TileCoord> = query::buildings(&world)
        .iter()
        .flat_map(|snapshot| snapshot.footprint.tiles())
        .collect();
    expected.sort();
    expected.dedup();
    assert_eq!(
        query::occupied_tiles(&world),
        expected,
        "invariant must hold after demolition as well",
    );
}

#[test]
fn buildable_and_occupied_stay_disjoint() {
    let terrain = TerrainQuery::resolve(&meadow(10, 10)).expect("terrain resolves");
    let mut world = configured(terrain);

    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: BASE, root: tile(2, 2) });
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: HUT, root: tile(4, 4) });

    let occupied = query::occupied_tiles(&world);
    for tile in query::buildable_tiles(&world) {
        assert!(
            !occupied.contains(&tile),
            "{tile:?} is both buildable and occupied",
        );
    }
    assert!(query::is_tile_occupied(&world, tile(2, 2)));
    assert!(!query::is_tile_buildable(&world, tile(2, 2)));
}

#[test]
fn place_then_remove_restores_every_derived_set() {
    let terrain = TerrainQuery::resolve(
        &meadow(10, 10).with_tile(tile(7, 3), TileAttributes::resource()),
    )
    .expect("terrain resolves");
    let mut world = configured(terrain);
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: BASE, root: tile(2, 2) });

    let buildable_before = query::buildable_tiles(&world);
    let occupied_before = query::occupied_tiles(&world);
    let resources_before = query::collected_resource_tiles(&world);

    let collector = BuildingDescriptor::new("camp", TileAreaSize::new(1, 1), 1, 2, 2, true);
    let placed = apply(&mut world, Command::PlaceBuilding { descriptor: collector, root: tile(5, 3) });
    let id = placed
        .iter()
        .find_map(|event| match event {
            Event::BuildingPlaced { building, .. } => Some(*building),
            _ => None,
        })
        .expect("placement event emitted");
    assert_ne!(query::collected_resource_tiles(&world), resources_before);

    let _ = apply(&mut world, Command::RemoveBuilding { building: id });

    assert_eq!(query::buildable_tiles(&world), buildable_before);
    assert_eq!(query::occupied_tiles(&world), occupied_before);
    assert_eq!(
        query::collected_resource_tiles(&world),
        resources_before,
        "full recomputation must return the sets to their pre-placement values",
    );
}

#[test]
fn areas_spanning_two_elevations_are_never_buildable() {
    let lowland = (0..6).flat_map(|x| (0..3).map(move |y| (tile(x, y), TileAttributes::buildable())));
    let bluff = (0..6).flat_map(|x| (3..6).map(move |y| (tile(x, y), TileAttributes::buildable())));
    let root = TerrainLayer::elevation("lowland")
        .with_tiles(lowland)
        .with_child(TerrainLayer::elevation("bluff").with_tiles(bluff));
    let terrain = TerrainQuery::resolve(&root).expect("terrain resolves");
    let mut world = configured(terrain);

    let spanning_seed = BuildingDescriptor::new("seed", TileAreaSize::new(1, 1), 6, 0, 0, false);
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: spanning_seed, root: tile(0, 1) });
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: spanning_seed, root: tile(0, 4) });

    let low = TileArea::from_origin_and_size(tile(2, 2), TileAreaSize::new(1, 1));
    let high = TileArea::from_origin_and_size(tile(2, 3), TileAreaSize::new(1, 1));
    assert!(query::is_area_buildable(&world, low));
    assert!(query::is_area_buildable(&world, high));

    let spanning = TileArea::from_origin_and_size(tile(2, 2), TileAreaSize::new(1, 2));
    assert!(
        !query::is_area_buildable(&world, spanning),
        "every tile is individually fine, but the area crosses an elevation seam",
    );
}

#[test]
fn first_collector_reports_one_resource_tile() {
    let origin_vein = TerrainLayer::elevation("meadow")
        .with_tile(tile(0, 0), TileAttributes::new(true, true))
        .with_tiles((1..4).flat_map(|x| (0..4).map(move |y| (tile(x, y), TileAttributes::buildable()))));
    let terrain = TerrainQuery::resolve(&origin_vein).expect("terrain resolves");
    let mut world = configured(terrain);

    let collector = BuildingDescriptor::new("collector", TileAreaSize::new(1, 1), 1, 1, 2, true);
    let events = apply(&mut world, Command::PlaceBuilding { descriptor: collector, root: tile(0, 0) });

    assert!(
        events.contains(&Event::ResourceTilesUpdated { count: 1 }),
        "the building collects the resource tile beneath itself",
    );
    assert_eq!(query::collected_resource_tiles(&world), vec![tile(0, 0)]);
}

#[test]
fn shared_grants_survive_removing_one_of_two_overlapping_buildings() {
    let terrain = TerrainQuery::resolve(&meadow(12, 12)).expect("terrain resolves");
    let mut world = configured(terrain);
    let seed = BuildingDescriptor::new("seed", TileAreaSize::new(1, 1), 1, 0, 0, false);
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: seed, root: tile(0, 0) });

    // Two huts whose buildable radii both cover the tile between them; the
    // seed's radius reaches neither.
    let _ = apply(&mut world, Command::PlaceBuilding { descriptor: HUT, root: tile(3, 4) });
    let second = apply(&mut world, Command::PlaceBuilding { descriptor: HUT, root: tile(7, 4) });
    let shared = tile(5, 3);
    let second_only = tile(8, 3);
    assert!(query::is_tile_buildable(&world, shared));
    assert!(query::is_tile_buildable(&world, second_only));

    let id = second
        .iter()
        .find_map(|event| match event {
            Event::BuildingPlaced { building, .. } => Some(*building),
            _ => None,
        })
        .expect("placement event emitted");
    let _ = apply(&mut world, Command::RemoveBuilding { building: id });

    assert!(
        query::is_tile_buildable(&world, shared),
        "the remaining hut still grants the shared tile after recomputation",
    );
    assert!(
        !query::is_tile_buildable(&world, second_only),
        "grants unique to the removed hut are revoked",
    );
}

#[test]
fn replaying_the_same_script_yields_identical_worlds() {
    let script = || {
        vec![
            Command::ConfigureTerrain {
                terrain: TerrainQuery::resolve(
                    &meadow(9, 9).with_tile(tile(8, 8), TileAttributes::resource()),
                )
                .expect("terrain resolves"),
                options: GridOptions::default(),
            },
            Command::PlaceBuilding { descriptor: BASE, root: tile(1, 1) },
            Command::PlaceBuilding { descriptor: HUT, root: tile(4, 2) },
            Command::PlaceBuilding {
                descriptor: BuildingDescriptor::new("camp", TileAreaSize::new(1, 1), 1, 2, 2, true),
                root: tile(6, 6),
            },
            Command::RemoveBuilding {
                building: homestead_core::BuildingId::new(1),
            },
        ]
    };

    let run = |commands: Vec<Command>| {
        let mut world = World::new();
        let mut log = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut log);
        }
        (
            query::occupied_tiles(&world),
            query::buildable_tiles(&world),
            query::collected_resource_tiles(&world),
            log,
        )
    };

    assert_eq!(run(script()), run(script()), "replay diverged between runs");
}
