//! Pointer clicks: map to a cell, mutate the engine, redraw immediately.

use crate::engine::{CellCoordinates, Engine};
use crate::render::{DrawSummary, PointerInput, RenderBackend, RenderError};

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub shift: bool,
}

/// A click on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub pointer: PointerInput,
    pub modifiers: Modifiers,
}

/// Engine mutation requested by a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Toggle,
    InsertGlider,
    InsertPulsar,
}

impl ClickAction {
    /// Alt inserts a glider, shift a pulsar, anything else toggles. Alt wins
    /// when both are held.
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.alt {
            ClickAction::InsertGlider
        } else if modifiers.shift {
            ClickAction::InsertPulsar
        } else {
            ClickAction::Toggle
        }
    }

    /// Apply this action to the engine at `cell`.
    pub fn apply(self, engine: &mut dyn Engine, cell: CellCoordinates) {
        let CellCoordinates(row, column) = cell;
        match self {
            ClickAction::Toggle => engine.toggle_cell(row, column),
            ClickAction::InsertGlider => engine.insert_glider(row, column),
            ClickAction::InsertPulsar => engine.insert_pulsar(row, column),
        }
    }
}

/// What a handled click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutcome {
    pub cell: CellCoordinates,
    pub action: ClickAction,
    pub drawn: DrawSummary,
}

/// Handle a click independently of the animation loop.
///
/// The mutation goes through the engine's entry points and is drawn right
/// away, so clicks are visible while paused.
pub fn handle_click(
    engine: &mut dyn Engine,
    backend: &mut dyn RenderBackend,
    event: &ClickEvent,
) -> Result<ClickOutcome, RenderError> {
    let cell = backend.map_pointer(&event.pointer)?;
    let action = ClickAction::from_modifiers(event.modifiers);
    log::debug!("Click at {:?} -> {:?}", cell, action);

    action.apply(engine, cell);
    let drawn = backend.draw_frame(engine)?;

    Ok(ClickOutcome {
        cell,
        action,
        drawn,
    })
}
