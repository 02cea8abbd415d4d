#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement workflow system driving select, preview, commit and demolish.
//!
//! The system is a two-state machine. `Idle` waits for a building type to be
//! selected; `Previewing` tracks a ghost over the hovered tile area and
//! re-validates it as the pointer, the grid, or the resource balance change.
//! Every tick the host passes the frame's [`PlacementInput`] plus the world
//! events it observed; the system answers with world [`Command`]s and
//! one-way [`DisplayCommand`]s for the presentation collaborator. Illegal
//! interactions are ignored without comment: in an interactive editor they
//! are frequent, expected, and recoverable by definition.

use homestead_core::{
    BuildingDescriptor, Command, DisplayCommand, Event, HighlightKind, TileArea, TileCoord,
    WorldPoint,
};
use homestead_world::{query, World};

const DEFAULT_TILE_LENGTH: f32 = 64.0;
const DEFAULT_STARTING_RESOURCES: u32 = 4;

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PlacementInput {
    /// Pointer position in world units, when the pointer is over the scene.
    pub cursor_world_space: Option<WorldPoint>,
    /// Building type selected on this frame, if any.
    pub select: Option<BuildingDescriptor>,
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Indicates whether the player requested a demolition on this frame.
    pub demolish_action: bool,
    /// Indicates whether the player cancelled the active preview on this frame.
    pub cancel_action: bool,
}

impl PlacementInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        cursor_world_space: Option<WorldPoint>,
        select: Option<BuildingDescriptor>,
        confirm_action: bool,
        demolish_action: bool,
        cancel_action: bool,
    ) -> Self {
        Self {
            cursor_world_space,
            select,
            confirm_action,
            demolish_action,
            cancel_action,
        }
    }
}

/// Declarative snapshot of the active placement preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Building type proposed for placement.
    pub descriptor: BuildingDescriptor,
    /// Hovered area the ghost currently covers.
    pub area: TileArea,
    /// Indicates whether the hovered placement is legal and affordable.
    pub valid: bool,
}

#[derive(Clone, Copy, Debug)]
struct Session {
    descriptor: BuildingDescriptor,
    hovered: TileArea,
    valid: bool,
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Idle,
    Previewing(Session),
}

/// Placement state machine that translates frame input into world commands.
#[derive(Clone, Debug)]
pub struct Placement {
    mode: Mode,
    tile_length: f32,
    starting_resources: u32,
    collected_resources: usize,
    used_resources: u32,
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_LENGTH, DEFAULT_STARTING_RESOURCES)
    }
}

impl Placement {
    /// Creates a new placement system.
    ///
    /// `tile_length` is the fixed world-unit size of one tile, used to
    /// convert pointer positions; it must be positive.
    #[must_use]
    pub const fn new(tile_length: f32, starting_resources: u32) -> Self {
        Self {
            mode: Mode::Idle,
            tile_length,
            starting_resources,
            collected_resources: 0,
            used_resources: 0,
        }
    }

    /// Snapshot of the active preview, if the system is in `Previewing`.
    #[must_use]
    pub fn preview(&self) -> Option<PlacementPreview> {
        match self.mode {
            Mode::Previewing(session) => Some(PlacementPreview {
                descriptor: session.descriptor,
                area: session.hovered,
                valid: session.valid,
            }),
            Mode::Idle => None,
        }
    }

    /// Reports whether a placement session is active.
    #[must_use]
    pub fn is_previewing(&self) -> bool {
        matches!(self.mode, Mode::Previewing(_))
    }

    /// Resources currently available for construction.
    ///
    /// Starting resources plus collected resource tiles, minus the cost of
    /// everything currently built.
    #[must_use]
    pub fn available_resources(&self) -> i64 {
        i64::from(self.starting_resources) + self.collected_resources as i64
            - i64::from(self.used_resources)
    }

    /// Consumes world events and frame input, emitting commands and display
    /// directives for this tick.
    ///
    /// At most one placement or demolition is emitted per call; hover
    /// revalidation happens before the confirm action is examined, so a
    /// commit always acts on this tick's validity.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: PlacementInput,
        world: &World,
        out: &mut Vec<Command>,
        display: &mut Vec<DisplayCommand>,
    ) {
        for event in events {
            if let Event::ResourceTilesUpdated { count } = event {
                self.collected_resources = *count;
            }
        }

        if input.cancel_action {
            self.end_session(display);
        }

        if let Some(descriptor) = input.select {
            self.begin_session(descriptor, input.cursor_world_space, world, display);
        } else {
            self.refresh_hover(input.cursor_world_space, world, display);
        }

        if input.confirm_action {
            self.commit(out, display);
        }

        if input.demolish_action {
            self.demolish(input.cursor_world_space, world, out);
        }
    }

    fn begin_session(
        &mut self,
        descriptor: BuildingDescriptor,
        cursor: Option<WorldPoint>,
        world: &World,
        display: &mut Vec<DisplayCommand>,
    ) {
        let root = cursor
            .map(|point| TileCoord::from_world(point, self.tile_length))
            .unwrap_or_default();
        let hovered = TileArea::from_origin_and_size(root, descriptor.footprint());
        let valid = self.is_placeable(world, descriptor, hovered);
        display.push(DisplayCommand::ShowPreview {
            descriptor,
            area: hovered,
        });
        self.publish_grid_display(world, descriptor, hovered, valid, display);
        display.push(DisplayCommand::SetPreviewValidity { valid });
        self.mode = Mode::Previewing(Session {
            descriptor,
            hovered,
            valid,
        });
    }

    fn refresh_hover(
        &mut self,
        cursor: Option<WorldPoint>,
        world: &World,
        display: &mut Vec<DisplayCommand>,
    ) {
        let Mode::Previewing(session) = self.mode else {
            return;
        };

        let mut hovered = session.hovered;
        if let Some(point) = cursor {
            let root = TileCoord::from_world(point, self.tile_length);
            if root != hovered.origin() {
                hovered = TileArea::from_origin_and_size(root, session.descriptor.footprint());
            }
        }
        let valid = self.is_placeable(world, session.descriptor, hovered);
        if hovered == session.hovered && valid == session.valid {
            return;
        }

        display.push(DisplayCommand::MovePreview { area: hovered });
        self.publish_grid_display(world, session.descriptor, hovered, valid, display);
        display.push(DisplayCommand::SetPreviewValidity { valid });
        self.mode = Mode::Previewing(Session {
            descriptor: session.descriptor,
            hovered,
            valid,
        });
    }

    fn commit(&mut self, out: &mut Vec<Command>, display: &mut Vec<DisplayCommand>) {
        let Mode::Previewing(session) = self.mode else {
            return;
        };
        if !session.valid {
            return;
        }

        out.push(Command::PlaceBuilding {
            descriptor: session.descriptor,
            root: session.hovered.origin(),
        });
        self.used_resources = self
            .used_resources
            .saturating_add(session.descriptor.resource_cost());
        self.end_session(display);
    }

    fn demolish(&mut self, cursor: Option<WorldPoint>, world: &World, out: &mut Vec<Command>) {
        if self.is_previewing() {
            return;
        }
        let Some(point) = cursor else {
            return;
        };
        let tile = TileCoord::from_world(point, self.tile_length);
        let Some(target) = query::building_at(world, tile) else {
            return;
        };
        if !target.descriptor.is_deletable() {
            return;
        }

        self.used_resources = self
            .used_resources
            .saturating_sub(target.descriptor.resource_cost());
        out.push(Command::RemoveBuilding {
            building: target.id,
        });
    }

    fn end_session(&mut self, display: &mut Vec<DisplayCommand>) {
        if self.is_previewing() {
            self.mode = Mode::Idle;
            display.push(DisplayCommand::ClearHighlights);
            display.push(DisplayCommand::HidePreview);
        }
    }

    fn is_placeable(
        &self,
        world: &World,
        descriptor: BuildingDescriptor,
        hovered: TileArea,
    ) -> bool {
        query::is_area_buildable(world, hovered)
            && self.available_resources() >= i64::from(descriptor.resource_cost())
    }

    fn publish_grid_display(
        &self,
        world: &World,
        descriptor: BuildingDescriptor,
        hovered: TileArea,
        valid: bool,
        display: &mut Vec<DisplayCommand>,
    ) {
        display.push(DisplayCommand::ClearHighlights);
        display.push(DisplayCommand::HighlightTiles {
            tiles: query::buildable_tiles(world),
            kind: HighlightKind::Buildable,
        });
        if valid {
            display.push(DisplayCommand::HighlightTiles {
                tiles: query::expanded_buildable_tiles(
                    world,
                    hovered,
                    descriptor.buildable_radius(),
                ),
                kind: HighlightKind::Expanded,
            });
            display.push(DisplayCommand::HighlightTiles {
                tiles: query::resource_tiles_within(world, hovered, descriptor.resource_radius()),
                kind: HighlightKind::Resource,
            });
        }
    }
}
