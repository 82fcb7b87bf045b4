use crate::foundation::core::Vec2;
use crate::layer::stack::LayerStack;
use crate::layer::transform::LayerKind;

#[derive(Clone, Copy, Debug)]
struct DragState {
    /// Last observed pointer position in canvas coordinates.
    last: Vec2,
}

/// Maps pointer and wheel input onto transform commits for the active layer.
///
/// The controller holds only gesture state; every mutation goes through the
/// stack's clamped `commit_*` methods. Deltas are taken from the previous
/// sample rather than the gesture start, so clamping during a long drag never
/// accumulates drift.
#[derive(Clone, Copy, Debug, Default)]
pub struct InteractionController {
    drag: Option<DragState>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Begin a drag gesture. Returns whether the pointer was captured, which
    /// requires an active layer (active layers always have an image).
    pub fn pointer_down(&mut self, stack: &LayerStack, at: Vec2) -> bool {
        if stack.active().is_none() {
            return false;
        }
        self.drag = Some(DragState { last: at });
        true
    }

    /// Advance a drag gesture. Returns true when a transform changed and the
    /// preview should re-render.
    pub fn pointer_move(&mut self, stack: &mut LayerStack, at: Vec2) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = at - drag.last;
        drag.last = at;

        let Some(kind) = stack.active() else {
            return false;
        };
        let next = stack.transform(kind).translate + delta;
        stack.commit_translate(kind, next);
        true
    }

    /// End the gesture (pointer up or leave).
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Capture loss (window blur, pointer cancel) behaves exactly like
    /// pointer up: the committed transform is already consistent because every
    /// move sample commits through the clamps.
    pub fn pointer_cancel(&mut self) {
        self.pointer_up();
    }

    /// Wheel zoom: `steps` ticks (positive zooms in) applied to the profile
    /// layer, only while it is the active layer. Does not change which layer
    /// is active. Returns true when the scale may have changed.
    pub fn wheel(&mut self, stack: &mut LayerStack, steps: i32) -> bool {
        if steps == 0 || stack.active() != Some(LayerKind::Profile) {
            return false;
        }
        stack.nudge_profile_scale(steps);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/controller.rs"]
mod tests;
