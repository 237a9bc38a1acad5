//! Terrain mutation engine.
//!
//! [`EditorState`] owns the board and the placed-object table. Every add or
//! remove goes through it so the blueprint, the asset reference grid and the
//! scene stay in step.

use std::collections::BTreeMap;

use bevy::math::Vec3;
use bevy::prelude::Resource;
use rand::Rng;
use thiserror::Error;

use crate::{
    components::{AnimationCue, Cell, ElementKind, ObjectKind, PlacedObject},
    config::{BoardConfig, BoardSizeError, PlacementConfig, SandboxConfig, ScaleRange},
    footprint::{can_place, footprint_cells, stamp_object},
    grid::{Board, GridError},
    mapgen::{generate_blueprint, BlueprintKind, GenerationReport},
    picking::{hit_to_cell, PickChange, PickTracker},
    scene::{AssetFactory, AssetHandle, TerrainMesher},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditAction {
    #[default]
    Add,
    Remove,
}

/// Mode, action and element chosen by the user interface.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSelection {
    pub mode: EditorMode,
    pub action: EditAction,
    pub element: ElementKind,
}

impl Default for EditorSelection {
    fn default() -> Self {
        Self {
            mode: EditorMode::View,
            action: EditAction::Add,
            element: ElementKind::Tree,
        }
    }
}

impl EditorSelection {
    pub fn adding(element: ElementKind) -> Self {
        Self {
            mode: EditorMode::Edit,
            action: EditAction::Add,
            element,
        }
    }

    pub fn removing() -> Self {
        Self {
            mode: EditorMode::Edit,
            action: EditAction::Remove,
            ..Self::default()
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    OutOfBounds(#[from] GridError),
    #[error("{0} cannot be placed on its own")]
    NotPlaceable(ElementKind),
    #[error("{kind} needs a free {size}x{size} block of land at {cell}")]
    PlacementBlocked {
        kind: ElementKind,
        cell: Cell,
        size: u32,
    },
    #[error(transparent)]
    BoardSize(#[from] BoardSizeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Object(PlacedObject),
    Water { cell: Cell },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The cell was already land.
    Nothing,
    Water {
        cell: Cell,
    },
    Object(PlacedObject),
    /// A filler whose anchor could not be found was reset on its own.
    Orphan {
        cell: Cell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    Picked {
        change: PickChange,
        cue: Option<AnimationCue>,
    },
    Added(AddOutcome),
    Removed(RemoveOutcome),
    /// The pointer ray landed off the board.
    Missed,
}

#[derive(Resource, Debug)]
pub struct EditorState {
    board: Board,
    limits: BoardConfig,
    placement: PlacementConfig,
    pinned: Option<BlueprintKind>,
    objects: BTreeMap<AssetHandle, PlacedObject>,
    blueprint_kind: Option<BlueprintKind>,
    picks: PickTracker,
}

impl EditorState {
    /// An all-land board at the configured size. Call
    /// [`EditorState::regenerate`] to populate it.
    pub fn new(config: &SandboxConfig) -> Result<Self, EditError> {
        let dim = config.board.check(config.board.dim)?;
        Ok(Self {
            board: Board::new(dim),
            limits: config.board,
            placement: config.placement,
            pinned: config.generation.blueprint,
            objects: BTreeMap::new(),
            blueprint_kind: None,
            picks: PickTracker::default(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dim(&self) -> u32 {
        self.board.dim()
    }

    pub fn blueprint_kind(&self) -> Option<BlueprintKind> {
        self.blueprint_kind
    }

    pub fn object(&self, handle: AssetHandle) -> Option<&PlacedObject> {
        self.objects.get(&handle)
    }

    pub fn objects(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn highlighted(&self) -> Option<AssetHandle> {
        self.picks.highlighted()
    }

    fn scale_range(&self, kind: ObjectKind) -> ScaleRange {
        match kind {
            ObjectKind::Tree => self.placement.tree_scale,
            ObjectKind::Rock => self.placement.rock_scale,
        }
    }

    /// Places `element` with its footprint anchored at `cell`.
    pub fn add<S>(
        &mut self,
        element: ElementKind,
        cell: Cell,
        scene: &mut S,
    ) -> Result<AddOutcome, EditError>
    where
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        let size = element
            .footprint()
            .ok_or(EditError::NotPlaceable(element))?;
        if !self.board.within_bounds(cell) {
            return Err(GridError::OutOfBounds {
                cell,
                dim: self.dim(),
            }
            .into());
        }
        if !can_place(&self.board.blueprint, cell, size) {
            tracing::debug!(
                target: "terra_sandbox::editor",
                element = %element,
                %cell,
                "editor.add.blocked"
            );
            return Err(EditError::PlacementBlocked {
                kind: element,
                cell,
                size,
            });
        }

        let outcome = match ObjectKind::from_element(element) {
            Some(kind) => {
                stamp_object(&mut self.board.blueprint, kind, cell);
                AddOutcome::Object(self.spawn_object(kind, cell, scene))
            }
            None => {
                self.board.set(cell, ElementKind::Water)?;
                scene.rebuild_merged_terrain(&self.board.blueprint);
                AddOutcome::Water { cell }
            }
        };
        tracing::info!(
            target: "terra_sandbox::editor",
            element = %element,
            %cell,
            "editor.add.applied"
        );
        Ok(outcome)
    }

    /// Clears whatever occupies `cell`. Objects are removed as a whole, from
    /// their anchor or any filler.
    pub fn remove<S>(&mut self, cell: Cell, scene: &mut S) -> Result<RemoveOutcome, EditError>
    where
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        let kind = self.board.get(cell).ok_or(GridError::OutOfBounds {
            cell,
            dim: self.dim(),
        })?;

        let outcome = match kind {
            ElementKind::Land => return Ok(RemoveOutcome::Nothing),
            ElementKind::Water => {
                self.board.set(cell, ElementKind::Land)?;
                scene.rebuild_merged_terrain(&self.board.blueprint);
                RemoveOutcome::Water { cell }
            }
            ElementKind::Tree | ElementKind::Rock | ElementKind::Filler => {
                self.remove_object_at(cell, scene)?
            }
        };
        tracing::info!(
            target: "terra_sandbox::editor",
            removed = %kind,
            %cell,
            "editor.remove.applied"
        );
        Ok(outcome)
    }

    fn remove_object_at<S>(&mut self, cell: Cell, scene: &mut S) -> Result<RemoveOutcome, EditError>
    where
        S: AssetFactory + ?Sized,
    {
        let blueprint = &self.board.blueprint;
        let anchor = blueprint
            .anchor_of(cell)
            .filter(|anchor| blueprint.get(*anchor).map_or(false, ElementKind::is_object));
        let Some(anchor) = anchor else {
            tracing::warn!(
                target: "terra_sandbox::editor",
                %cell,
                "editor.remove.orphan_filler"
            );
            self.board.set(cell, ElementKind::Land)?;
            self.board.assets.set(cell, None)?;
            return Ok(RemoveOutcome::Orphan { cell });
        };

        // Resolve every covered cell before the anchor is cleared.
        let covered: Vec<Cell> = footprint_cells(anchor, 2)
            .filter(|c| blueprint.anchor_of(*c) == Some(anchor))
            .collect();
        let handle = self.board.assets.get(anchor);
        for c in covered {
            self.board.set(c, ElementKind::Land)?;
            self.board.assets.set(c, None)?;
        }

        let placed = handle.and_then(|handle| {
            scene.dispose(handle);
            self.picks.forget(handle);
            self.objects.remove(&handle)
        });
        Ok(match placed {
            Some(placed) => RemoveOutcome::Object(placed),
            None => RemoveOutcome::Orphan { cell: anchor },
        })
    }

    fn spawn_object<S>(&mut self, kind: ObjectKind, anchor: Cell, scene: &mut S) -> PlacedObject
    where
        S: AssetFactory + ?Sized,
    {
        let handle = scene.instantiate(kind);
        scene.set_position(handle, anchor);
        scene.set_random_y_rotation(handle);
        scene.set_random_scale(handle, self.scale_range(kind));

        let placed = PlacedObject {
            kind,
            handle,
            anchor,
        };
        for cell in placed.footprint() {
            let recorded = self.board.assets.set(cell, Some(handle));
            debug_assert!(recorded.is_ok(), "object footprint left the board at {cell}");
        }
        self.objects.insert(handle, placed);
        placed
    }

    /// Replaces the current board with a fresh layout of the same size.
    pub fn regenerate<R, S>(&mut self, rng: &mut R, scene: &mut S) -> GenerationReport
    where
        R: Rng + ?Sized,
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        self.rebuild_board(self.dim(), rng, scene)
    }

    /// Changes the board size and repopulates it. This is the only path that
    /// discards placed objects wholesale.
    pub fn resize<R, S>(
        &mut self,
        dim: u32,
        rng: &mut R,
        scene: &mut S,
    ) -> Result<GenerationReport, EditError>
    where
        R: Rng + ?Sized,
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        let dim = self.limits.check(dim)?;
        Ok(self.rebuild_board(dim, rng, scene))
    }

    fn rebuild_board<R, S>(&mut self, dim: u32, rng: &mut R, scene: &mut S) -> GenerationReport
    where
        R: Rng + ?Sized,
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        let disposed = self.objects.len();
        for handle in self.objects.keys() {
            scene.dispose(*handle);
        }
        self.objects.clear();
        self.picks.clear();
        self.board.resize(dim);

        let kind = self.pinned.unwrap_or_else(|| BlueprintKind::choose(rng));
        let report = generate_blueprint(kind, &mut self.board.blueprint, rng);

        let anchors: Vec<(ObjectKind, Cell)> = self
            .board
            .blueprint
            .iter()
            .filter_map(|(cell, element)| ObjectKind::from_element(element).map(|k| (k, cell)))
            .collect();
        for (object, anchor) in anchors {
            self.spawn_object(object, anchor, scene);
        }
        scene.rebuild_merged_terrain(&self.board.blueprint);
        self.blueprint_kind = Some(kind);

        tracing::info!(
            target: "terra_sandbox::editor",
            dim,
            blueprint = kind.label(),
            disposed,
            spawned = self.objects.len(),
            "editor.board.rebuilt"
        );
        report
    }

    /// Routes a pointer press according to the current selection.
    ///
    /// `hit` is where the pointer ray met the pick plane; `picked` is the
    /// object under the pointer, if any.
    pub fn apply_pointer<S>(
        &mut self,
        selection: &EditorSelection,
        hit: Vec3,
        picked: Option<AssetHandle>,
        scene: &mut S,
    ) -> Result<PointerOutcome, EditError>
    where
        S: AssetFactory + TerrainMesher + ?Sized,
    {
        match selection.mode {
            EditorMode::View => {
                let picked = picked.filter(|handle| self.objects.contains_key(handle));
                let change = self.picks.pick(picked);
                let cue = match change {
                    PickChange::Highlighted { current, .. } => self
                        .objects
                        .get(&current)
                        .map(|object| object.kind.animation_cue()),
                    _ => None,
                };
                Ok(PointerOutcome::Picked { change, cue })
            }
            EditorMode::Edit => {
                let Some(cell) = hit_to_cell(hit) else {
                    return Ok(PointerOutcome::Missed);
                };
                match selection.action {
                    EditAction::Add => self
                        .add(selection.element, cell, scene)
                        .map(PointerOutcome::Added),
                    EditAction::Remove => self.remove(cell, scene).map(PointerOutcome::Removed),
                }
            }
        }
    }
}
