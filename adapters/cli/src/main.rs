#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the demo Homestead experience.
//!
//! Drives a scripted placement session against the bootstrap scenario,
//! printing an ASCII rendition of the grid after every tick, and offers
//! import/export of settlement layout strings for clipboard sharing.

mod layout_transfer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use homestead_core::{Event, HighlightKind, TileCoord};
use homestead_rendering::{
    FrameInput, GridPresentation, HighlightBoard, ScenePresenter, SceneView, GRID_LINE_COLOR,
};
use homestead_system_bootstrap::{
    Bootstrap, Scenario, CATALOG, COTTAGE, LUMBER_CAMP, QUARRY, WELCOME_BANNER,
};
use homestead_system_placement::{Placement, PlacementInput};
use homestead_world::{self as world, query, World};
use layout_transfer::{SettlementBuilding, SettlementSnapshot};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "homestead", about = "Tile-grid base building demo")]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Runs the scripted demo session, printing the grid after every tick.
    Demo,
    /// Runs the demo session and prints its settlement layout string.
    Export,
    /// Decodes a settlement layout string and summarizes its contents.
    Inspect {
        /// Layout string produced by `export`.
        layout: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(CliCommand::Demo) {
        CliCommand::Demo => {
            let _ = run_demo(true)?;
            Ok(())
        }
        CliCommand::Export => {
            let outcome = run_demo(false)?;
            let snapshot = snapshot_world(&outcome.world, &outcome.scenario)?;
            println!("{}", snapshot.encode());
            Ok(())
        }
        CliCommand::Inspect { layout } => inspect_layout(&layout),
    }
}

struct DemoOutcome {
    world: World,
    scenario: Scenario,
}

fn run_demo(verbose: bool) -> Result<DemoOutcome> {
    let scenario = Bootstrap::default().demo_scenario()?;
    let mut world = World::new();
    let mut pending_events: Vec<Event> = Vec::new();
    for command in scenario.setup_commands() {
        world::apply(&mut world, command, &mut pending_events);
    }

    let bounds = scenario
        .terrain()
        .tile_bounds()
        .context("demo terrain defines at least one tile")?;
    let grid = GridPresentation::new(bounds, scenario.tile_length(), GRID_LINE_COLOR)?;
    let mut placement = Placement::new(scenario.tile_length(), scenario.starting_resources());
    let mut board = HighlightBoard::new();
    let mut presenter = AsciiPresenter;
    let mut objective_reported = false;

    if verbose {
        println!("{WELCOME_BANNER}");
    }

    for (label, frame) in demo_script(&scenario) {
        let mut commands = Vec::new();
        let mut display = Vec::new();
        placement.handle(
            &pending_events,
            placement_input(&frame),
            &world,
            &mut commands,
            &mut display,
        );
        pending_events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut pending_events);
        }
        board.apply_all(&display);

        if verbose {
            println!();
            println!("== {label}");
            report_events(&pending_events);
            let buildings = query::buildings(&world);
            presenter.present(&SceneView {
                grid: &grid,
                terrain: query::terrain(&world),
                board: &board,
                buildings: &buildings,
            })?;
            println!("available resources: {}", placement.available_resources());
        }
        if !objective_reported && query::is_tile_buildable(&world, scenario.objective()) {
            objective_reported = true;
            if verbose {
                println!("the gold mine mouth is within reach!");
            }
        }
    }

    Ok(DemoOutcome { world, scenario })
}

/// Scripted inputs walking through select, place, refuse, cancel and demolish.
fn demo_script(scenario: &Scenario) -> Vec<(&'static str, FrameInput)> {
    let tile_length = scenario.tile_length();
    let at = move |x: i32, y: i32| {
        Vec2::new(
            (x as f32 + 0.5) * tile_length,
            (y as f32 + 0.5) * tile_length,
        )
    };

    vec![
        (
            "select a cottage over the river ford",
            FrameInput {
                cursor_world_space: Some(at(12, 6)),
                selected_building: Some(COTTAGE),
                ..FrameInput::default()
            },
        ),
        (
            "confirm the cottage",
            FrameInput {
                cursor_world_space: Some(at(12, 6)),
                confirm_action: true,
                ..FrameInput::default()
            },
        ),
        (
            "select a lumber camp near the east bank",
            FrameInput {
                cursor_world_space: Some(at(11, 4)),
                selected_building: Some(LUMBER_CAMP),
                ..FrameInput::default()
            },
        ),
        (
            "confirm the lumber camp",
            FrameInput {
                cursor_world_space: Some(at(11, 4)),
                confirm_action: true,
                ..FrameInput::default()
            },
        ),
        (
            "hover a quarry beyond the frontier",
            FrameInput {
                cursor_world_space: Some(at(14, 2)),
                selected_building: Some(QUARRY),
                ..FrameInput::default()
            },
        ),
        (
            "cancel the quarry",
            FrameInput {
                cancel_action: true,
                ..FrameInput::default()
            },
        ),
        (
            "demolish the lumber camp",
            FrameInput {
                cursor_world_space: Some(at(11, 4)),
                demolish_action: true,
                ..FrameInput::default()
            },
        ),
    ]
}

fn placement_input(frame: &FrameInput) -> PlacementInput {
    PlacementInput {
        cursor_world_space: frame.cursor_world_point(),
        select: frame.selected_building,
        confirm_action: frame.confirm_action,
        demolish_action: frame.demolish_action,
        cancel_action: frame.cancel_action,
    }
}

fn report_events(events: &[Event]) {
    for event in events {
        match event {
            Event::BuildingPlaced {
                descriptor,
                footprint,
                ..
            } => println!(
                "placed {} at ({}, {})",
                descriptor.name(),
                footprint.origin().x(),
                footprint.origin().y(),
            ),
            Event::BuildingRemoved { descriptor, .. } => {
                println!("removed {}", descriptor.name());
            }
            Event::ResourceTilesUpdated { count } => {
                println!("resource tiles collected: {count}");
            }
            Event::GridStateUpdated => {}
        }
    }
}

fn snapshot_world(world: &World, scenario: &Scenario) -> Result<SettlementSnapshot> {
    let bounds = query::terrain(world)
        .tile_bounds()
        .context("a configured world always has terrain bounds")?;
    Ok(SettlementSnapshot {
        columns: bounds.size().width(),
        rows: bounds.size().height(),
        tile_length: scenario.tile_length(),
        options: scenario.options(),
        buildings: query::buildings(world)
            .iter()
            .map(|snapshot| SettlementBuilding {
                name: snapshot.descriptor.name().to_owned(),
                root: snapshot.root,
            })
            .collect(),
    })
}

fn inspect_layout(layout: &str) -> Result<()> {
    let snapshot = SettlementSnapshot::decode(layout)?;
    println!(
        "{}x{} grid, tile length {}",
        snapshot.columns, snapshot.rows, snapshot.tile_length,
    );
    println!(
        "resource radius respects elevation: {}",
        snapshot.options.resource_radius_respects_elevation(),
    );
    for (descriptor, root) in snapshot.resolved_buildings(&CATALOG)? {
        println!(
            "  {} at ({}, {}) costing {}",
            descriptor.name(),
            root.x(),
            root.y(),
            descriptor.resource_cost(),
        );
    }
    Ok(())
}

/// Prints the scene as one character per tile.
///
/// Buildings win over the ghost, the ghost over highlights, highlights over
/// terrain. `#` building, `g`/`!` valid/invalid ghost, `+` buildable, `o`
/// newly granted, `$` collectable resource, `*` vein, `~` defined but not
/// buildable, `.` open ground.
struct AsciiPresenter;

impl ScenePresenter for AsciiPresenter {
    fn present(&mut self, scene: &SceneView<'_>) -> Result<()> {
        let origin = scene.grid.bounds().origin();
        let size = scene.grid.bounds().size();
        let mut out = String::new();
        for dy in 0..size.height() {
            for dx in 0..size.width() {
                let tile = TileCoord::new(origin.x() + dx as i32, origin.y() + dy as i32);
                out.push(glyph(scene, tile));
            }
            out.push('\n');
        }
        print!("{out}");
        Ok(())
    }
}

fn glyph(scene: &SceneView<'_>, tile: TileCoord) -> char {
    if scene
        .buildings
        .iter()
        .any(|building| building.footprint.contains(tile))
    {
        return '#';
    }
    if let Some(ghost) = scene.board.ghost() {
        if ghost.area.contains(tile) {
            return if ghost.valid { 'g' } else { '!' };
        }
    }
    match scene.board.highlight_at(tile) {
        Some(HighlightKind::Buildable) => '+',
        Some(HighlightKind::Expanded) => 'o',
        Some(HighlightKind::Resource) => '$',
        None => {
            if scene.terrain.is_resource_bearing(tile) {
                '*'
            } else if scene.terrain.is_buildable(tile) {
                '.'
            } else if scene.terrain.owner_of(tile).is_some() {
                '~'
            } else {
                ' '
            }
        }
    }
}
