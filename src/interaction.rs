//! Input events and hit testing.
//!
//! Hosts translate their native events into [`InputEvent`]s; the plotter
//! routes them to the sub plot under the cursor.

use crate::geom::{ScreenPoint, ScreenRect};

/// Keys the plotter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Pan the view left.
    Left,
    /// Pan the view right.
    Right,
    /// Pan the view up.
    Up,
    /// Pan the view down.
    Down,
    /// Close the plot.
    Escape,
}

/// Host input, in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    /// A key was pressed.
    Key(Key),
    /// Wheel motion; positive deltas zoom in. Fractional deltas come from
    /// precise scrolling devices.
    Wheel {
        /// Notches scrolled.
        delta: f64,
        /// Cursor column.
        x: i32,
        /// Cursor row.
        y: i32,
    },
    /// The primary button was pressed.
    MouseDown {
        /// Cursor column.
        x: i32,
        /// Cursor row.
        y: i32,
    },
    /// The primary button was released.
    MouseUp {
        /// Cursor column.
        x: i32,
        /// Cursor row.
        y: i32,
    },
    /// The cursor moved by `(dx, dy)` to `(x, y)`.
    MouseMove {
        /// Cursor column.
        x: i32,
        /// Cursor row.
        y: i32,
        /// Horizontal motion.
        dx: i32,
        /// Vertical motion.
        dy: i32,
    },
    /// The window was resized.
    Resize {
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
}

/// Cursor shape requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    /// Regular pointer.
    #[default]
    Arrow,
    /// A view is being dragged.
    Grab,
}

/// A sub plot's area within the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneSlot {
    /// Sub plot index.
    pub index: usize,
    /// Area in window coordinates.
    pub rect: ScreenRect,
}

/// Index of the slot containing `point`.
pub fn hit_test(slots: &[PaneSlot], point: ScreenPoint) -> Option<usize> {
    slots
        .iter()
        .find(|slot| slot.rect.contains(point))
        .map(|slot| slot.index)
}

/// Button-held drag, routed to the pane that received the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Pane receiving the drag.
    pub pane: usize,
    /// Window origin of that pane.
    pub origin: ScreenPoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_uses_half_open_slots() {
        let slots = [
            PaneSlot {
                index: 0,
                rect: ScreenRect::from_origin_size(0, 0, 100, 50),
            },
            PaneSlot {
                index: 1,
                rect: ScreenRect::from_origin_size(100, 0, 100, 50),
            },
        ];
        assert_eq!(hit_test(&slots, ScreenPoint::new(99, 10)), Some(0));
        assert_eq!(hit_test(&slots, ScreenPoint::new(100, 10)), Some(1));
        assert_eq!(hit_test(&slots, ScreenPoint::new(150, 50)), None);
    }
}
