//! Drag-to-reorder protocol, independent of the pointer backend.
//!
//! The browser feeds `dragstart`/`dragover`/`dragend` into a [`ReorderGestures`]
//! implementation; what comes out is at most one sibling move per midpoint
//! crossing.

use crate::models::NavId;

/// Pointer position against the hovered row, in the same coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HoverGeometry {
    pub pointer_y: f64,
    pub top: f64,
    pub height: f64,
}

/// The row currently being dragged. `index` tracks where it sits now, not
/// where the drag began.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DragItem {
    pub id: NavId,
    pub parent: Option<NavId>,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Reorder {
    pub from: usize,
    pub to: usize,
}

pub(crate) trait ReorderGestures {
    fn on_drag_start(&mut self, item: DragItem);

    /// Returns the move to apply, if this hover crossed the midpoint.
    fn on_hover_crossing(
        &mut self,
        parent: Option<&NavId>,
        target_index: usize,
        geometry: HoverGeometry,
    ) -> Option<Reorder>;

    fn on_drag_end(&mut self);
}

/// Only swap once the pointer is past the hovered row's middle in the
/// direction of travel. Without this the two rows trade places on every
/// pixel near the boundary.
pub(crate) fn crosses_midpoint(drag_index: usize, hover_index: usize, g: HoverGeometry) -> bool {
    if drag_index == hover_index {
        return false;
    }
    let middle = g.height / 2.0;
    let offset = g.pointer_y - g.top;

    if drag_index < hover_index && offset < middle {
        return false;
    }
    if drag_index > hover_index && offset > middle {
        return false;
    }
    true
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DragSession {
    item: Option<DragItem>,
}

#[cfg(test)]
impl DragSession {
    pub fn active(&self) -> Option<&DragItem> {
        self.item.as_ref()
    }
}

impl ReorderGestures for DragSession {
    fn on_drag_start(&mut self, item: DragItem) {
        self.item = Some(item);
    }

    fn on_hover_crossing(
        &mut self,
        parent: Option<&NavId>,
        target_index: usize,
        geometry: HoverGeometry,
    ) -> Option<Reorder> {
        let item = self.item.as_mut()?;

        // Reordering never crosses levels.
        if item.parent.as_ref() != parent {
            return None;
        }
        if !crosses_midpoint(item.index, target_index, geometry) {
            return None;
        }

        let reorder = Reorder {
            from: item.index,
            to: target_index,
        };
        item.index = target_index;
        Some(reorder)
    }

    fn on_drag_end(&mut self) {
        self.item = None;
    }
}
