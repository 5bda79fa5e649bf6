//! Pointer-drag resize state machine for image containers.
//!
//! One machine per bound container. `idle -> resizing -> idle`: pointer-down
//! captures the start X and start width and shows the handle, pointer-move
//! while resizing yields the clamped new width, pointer-up hides the handle
//! and reports that a non-text content change happened (the save path runs,
//! the linkify path must not).

/// Drag state of one container's resize handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeState {
    Idle,
    Resizing { start_x: f64, start_width: f64 },
}

/// Outcome of a completed drag, consumed by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEnded {
    /// The change notification for this drag must skip linkification;
    /// resizing is not a text edit.
    pub skip_linkify: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMachine {
    state: ResizeState,
    min_width: f64,
    /// Whether the handle is currently visible.
    handle_visible: bool,
}

impl ResizeMachine {
    pub fn new(min_width: f64) -> Self {
        Self {
            state: ResizeState::Idle,
            min_width,
            handle_visible: false,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn handle_visible(&self) -> bool {
        self.handle_visible
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing { .. })
    }

    /// Pointer-down on the handle: capture start X and start width, show
    /// the handle.
    pub fn pointer_down(&mut self, x: f64, current_width: f64) {
        self.state = ResizeState::Resizing {
            start_x: x,
            start_width: current_width,
        };
        self.handle_visible = true;
        tracing::trace!(target: "memo::embed", x, current_width, "resize started");
    }

    /// Pointer-move: new width from the drag delta, clamped to the minimum
    /// width and the container's available width. Returns `None` while
    /// idle.
    pub fn pointer_move(&mut self, x: f64, available_width: f64) -> Option<f64> {
        let ResizeState::Resizing {
            start_x,
            start_width,
        } = self.state
        else {
            return None;
        };
        let new_width = start_width + (x - start_x);
        Some(new_width.clamp(self.min_width, available_width.max(self.min_width)))
    }

    /// Pointer-up: hide the handle, return to idle. Yields the end-of-drag
    /// outcome only if a drag was in progress.
    pub fn pointer_up(&mut self) -> Option<ResizeEnded> {
        if !self.is_resizing() {
            return None;
        }
        self.state = ResizeState::Idle;
        self.handle_visible = false;
        tracing::trace!(target: "memo::embed", "resize ended");
        Some(ResizeEnded { skip_linkify: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_move_does_nothing() {
        let mut machine = ResizeMachine::new(50.0);
        assert_eq!(machine.pointer_move(300.0, 800.0), None);
        assert!(!machine.handle_visible());
    }

    #[test]
    fn test_drag_computes_width_from_delta() {
        let mut machine = ResizeMachine::new(50.0);
        machine.pointer_down(100.0, 200.0);
        assert!(machine.handle_visible());
        assert_eq!(machine.pointer_move(150.0, 800.0), Some(250.0));
        assert_eq!(machine.pointer_move(90.0, 800.0), Some(190.0));
    }

    #[test]
    fn test_width_clamped_to_bounds() {
        let mut machine = ResizeMachine::new(50.0);
        machine.pointer_down(100.0, 200.0);
        // Way left of start: clamp to the minimum.
        assert_eq!(machine.pointer_move(-500.0, 800.0), Some(50.0));
        // Way right: clamp to the available width.
        assert_eq!(machine.pointer_move(5000.0, 800.0), Some(800.0));
    }

    #[test]
    fn test_pointer_up_skips_linkify() {
        let mut machine = ResizeMachine::new(50.0);
        machine.pointer_down(0.0, 100.0);
        let ended = machine.pointer_up().unwrap();
        assert!(ended.skip_linkify);
        assert_eq!(machine.state(), ResizeState::Idle);
        assert!(!machine.handle_visible());
    }

    #[test]
    fn test_pointer_up_while_idle_is_noop() {
        let mut machine = ResizeMachine::new(50.0);
        assert_eq!(machine.pointer_up(), None);
    }
}
