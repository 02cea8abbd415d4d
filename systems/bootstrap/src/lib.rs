#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the demo Homestead experience.
//!
//! Owns the content the engine itself is agnostic about: the welcome banner,
//! the building catalog, and a deterministic demo terrain. The terrain is a
//! meadow split by a river with a single ford, a raised plateau whose rim
//! defers to the meadow beneath it, and seeded gold veins beyond the river.
//! The gold-mine mouth on the far bank is the scenario objective: expanding
//! the buildable area until it covers that tile "activates" the mine.

use homestead_core::{
    BuildingDescriptor, Command, ConfigurationError, GridOptions, TerrainLayer, TerrainQuery,
    TileAreaSize, TileAttributes, TileCoord,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Homestead.";

/// The scenario's command post. Pre-placed and indestructible; its radius
/// seeds the initial buildable area.
pub const BASE: BuildingDescriptor =
    BuildingDescriptor::new("base", TileAreaSize::new(2, 2), 4, 0, 0, false);

/// Cheap expansion building used to push the buildable frontier outward.
pub const COTTAGE: BuildingDescriptor =
    BuildingDescriptor::new("cottage", TileAreaSize::new(1, 1), 3, 0, 1, true);

/// Collector that gathers every resource tile within two tiles of itself.
pub const LUMBER_CAMP: BuildingDescriptor =
    BuildingDescriptor::new("lumber camp", TileAreaSize::new(1, 1), 1, 2, 2, true);

/// Heavy collector with a wide resource sweep and a large footprint.
pub const QUARRY: BuildingDescriptor =
    BuildingDescriptor::new("quarry", TileAreaSize::new(2, 2), 2, 3, 3, true);

/// Building types offered to the player, in menu order.
pub const CATALOG: [BuildingDescriptor; 4] = [BASE, COTTAGE, LUMBER_CAMP, QUARRY];

/// Looks a catalog descriptor up by its display name.
#[must_use]
pub fn descriptor_named(name: &str) -> Option<BuildingDescriptor> {
    CATALOG
        .iter()
        .find(|descriptor| descriptor.name() == name)
        .copied()
}

const MEADOW_WIDTH: i32 = 16;
const MEADOW_HEIGHT: i32 = 12;
const RIVER_X: i32 = 12;
const FORD: TileCoord = TileCoord::new(12, 6);
const GOLD_MINE_MOUTH: TileCoord = TileCoord::new(14, 6);
const VEIN_SEED: u64 = 0x60_1d_5eed_2026;
const VEIN_COUNT: usize = 6;

const DEFAULT_TILE_LENGTH: f32 = 64.0;
const DEFAULT_STARTING_RESOURCES: u32 = 4;

/// Fully prepared demo scenario, ready to be fed into a fresh world.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    terrain: TerrainQuery,
    options: GridOptions,
    base_root: TileCoord,
    objective: TileCoord,
    starting_resources: u32,
    tile_length: f32,
}

impl Scenario {
    /// Resolved terrain lookup for the demo map.
    #[must_use]
    pub fn terrain(&self) -> &TerrainQuery {
        &self.terrain
    }

    /// Grid policies the demo runs with.
    #[must_use]
    pub fn options(&self) -> GridOptions {
        self.options
    }

    /// Tile anchoring the pre-placed base.
    #[must_use]
    pub fn base_root(&self) -> TileCoord {
        self.base_root
    }

    /// The gold-mine mouth; the scenario is won once this tile is buildable.
    #[must_use]
    pub fn objective(&self) -> TileCoord {
        self.objective
    }

    /// Resources the player starts with before collecting anything.
    #[must_use]
    pub fn starting_resources(&self) -> u32 {
        self.starting_resources
    }

    /// World-unit side length of one tile.
    #[must_use]
    pub fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Commands that bring a fresh world up to the scenario's start state.
    #[must_use]
    pub fn setup_commands(&self) -> Vec<Command> {
        vec![
            Command::ConfigureTerrain {
                terrain: self.terrain.clone(),
                options: self.options,
            },
            Command::PlaceBuilding {
                descriptor: BASE,
                root: self.base_root,
            },
        ]
    }
}

/// Produces the data required to boot the demo experience.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Builds the deterministic demo scenario.
    ///
    /// Fails only on a structural authoring defect in the terrain tree,
    /// which is a bug in this crate rather than a runtime condition.
    pub fn demo_scenario(&self) -> Result<Scenario, ConfigurationError> {
        Ok(Scenario {
            terrain: demo_terrain()?,
            options: GridOptions::default(),
            base_root: TileCoord::new(7, 5),
            objective: GOLD_MINE_MOUTH,
            starting_resources: DEFAULT_STARTING_RESOURCES,
            tile_length: DEFAULT_TILE_LENGTH,
        })
    }
}

fn demo_terrain() -> Result<TerrainQuery, ConfigurationError> {
    let mut meadow = TerrainLayer::elevation("meadow");
    for x in 0..MEADOW_WIDTH {
        for y in 0..MEADOW_HEIGHT {
            let tile = TileCoord::new(x, y);
            let attributes = if x == RIVER_X && tile != FORD {
                TileAttributes::barren()
            } else {
                TileAttributes::buildable()
            };
            meadow = meadow.with_tile(tile, attributes);
        }
    }
    for vein in scatter_veins() {
        meadow = meadow.with_tile(vein, TileAttributes::resource());
    }

    TerrainQuery::resolve(&meadow.with_child(plateau()))
}

/// Raised ground in the meadow's north-west corner. Its rim entries are
/// ignored so lookups there fall through to the meadow elevation.
fn plateau() -> TerrainLayer {
    let mut layer = TerrainLayer::elevation("plateau");
    for x in 1..=6 {
        for y in 1..=6 {
            let interior = (2..=5).contains(&x) && (2..=5).contains(&y);
            let attributes = if interior {
                TileAttributes::buildable()
            } else {
                TileAttributes::ignored()
            };
            layer = layer.with_tile(TileCoord::new(x, y), attributes);
        }
    }
    layer
}

/// Scatters gold veins on the far bank of the river, never on the mine
/// mouth itself. Seeded, so every boot produces the same map.
fn scatter_veins() -> Vec<TileCoord> {
    let mut rng = ChaCha8Rng::seed_from_u64(VEIN_SEED);
    let mut veins: Vec<TileCoord> = Vec::with_capacity(VEIN_COUNT);
    while veins.len() < VEIN_COUNT {
        let candidate = TileCoord::new(
            rng.gen_range(RIVER_X + 1..MEADOW_WIDTH),
            rng.gen_range(0..MEADOW_HEIGHT),
        );
        if candidate == GOLD_MINE_MOUTH || veins.contains(&candidate) {
            continue;
        }
        veins.push(candidate);
    }
    veins
}
