//! Pointer and wheel state machine driving pan, zoom and table drags.

use crate::offsets::{DragOffset, DragOffsetStore};
use crate::transform::{Affine, ViewTransform};

/// What a pointer-down landed on, topmost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Background,
    Table(String),
    /// The "+N more" / "Hide" row of a table. Consumed before the table's
    /// own handler, so it never starts a drag.
    ExpandToggle(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A table drag in progress. Everything is captured at drag start in world
/// space, including the view, so drag deltas are 1:1 at any zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub table: String,
    pub view: Affine,
    pub start_world: (f64, f64),
    pub grid: (f64, f64),
    pub table_pos: (f64, f64),
}

impl DragSession {
    pub fn offset_at(&self, screen: (f64, f64)) -> DragOffset {
        let (wx, wy) = self.view.inverse().apply(screen);
        let (dx, dy) = (wx - self.start_world.0, wy - self.start_world.1);
        DragOffset::new(
            self.table_pos.0 + dx - self.grid.0,
            self.table_pos.1 + dy - self.grid.1,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Pointer position minus translate at pan start.
    Panning { anchor: (f64, f64) },
    DraggingTable(DragSession),
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    fn transition(&mut self, next: InteractionState) {
        log::trace!("interaction: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn begin_pan(&mut self, screen: (f64, f64), button: PointerButton, view: &ViewTransform) {
        if button != PointerButton::Primary || !self.is_idle() {
            return;
        }
        self.transition(InteractionState::Panning {
            anchor: (screen.0 - view.translate_x, screen.1 - view.translate_y),
        });
    }

    /// Start dragging `table`, whose grid slot and current display position
    /// are given in world space.
    pub fn begin_drag(
        &mut self,
        table: &str,
        screen: (f64, f64),
        grid: (f64, f64),
        display: (f64, f64),
        view: &ViewTransform,
    ) {
        if !self.is_idle() {
            return;
        }
        let view = view.affine();
        self.transition(InteractionState::DraggingTable(DragSession {
            table: table.to_string(),
            view,
            start_world: view.inverse().apply(screen),
            grid,
            table_pos: display,
        }));
    }

    /// Returns true if the move changed the view or an offset.
    pub fn pointer_move(
        &mut self,
        screen: (f64, f64),
        view: &mut ViewTransform,
        offsets: &mut DragOffsetStore,
    ) -> bool {
        match &self.state {
            InteractionState::Idle => false,
            InteractionState::Panning { anchor } => {
                view.set_translate(screen.0 - anchor.0, screen.1 - anchor.1);
                true
            }
            InteractionState::DraggingTable(session) => {
                offsets.set(&session.table, session.offset_at(screen));
                true
            }
        }
    }

    /// Pointer released anywhere: ends any pan or drag.
    pub fn pointer_up(&mut self) {
        if !self.is_idle() {
            self.transition(InteractionState::Idle);
        }
    }

    /// Pointer left the diagram element. Ends a pan; a drag keeps tracking
    /// at window level until release.
    pub fn pointer_leave(&mut self) {
        if matches!(self.state, InteractionState::Panning { .. }) {
            self.transition(InteractionState::Idle);
        }
    }

    /// Wheel zoom applies in every state.
    pub fn wheel(&mut self, screen: (f64, f64), delta_y: f64, view: &mut ViewTransform) {
        view.zoom_at(screen.0, screen.1, delta_y);
    }

    /// Abandon any gesture (unmount or diagram switch).
    pub fn cancel(&mut self) {
        self.pointer_up();
    }
}
