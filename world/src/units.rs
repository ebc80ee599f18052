//! Recruited units deployed near a lane's goal.

use std::time::Duration;

use lane_defence_core::{CellCoord, CellPoint, UnitId, UnitKind, UnitSnapshot};

/// Rows between the goal and the line units rally on.
const RALLY_OFFSET: u32 = 2;

/// Unit stored inside a lane.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Unit {
    pub(crate) id: UnitId,
    pub(crate) kind: UnitKind,
    pub(crate) position: CellPoint,
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) attack_interval: Duration,
    pub(crate) cooldown: Duration,
}

impl Unit {
    pub(crate) fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            damage: self.damage,
            range: self.range,
        }
    }
}

/// Deployment cell for the `slot`-th unit of a lane.
///
/// Slots fan out from the goal column, alternating left and right, on the
/// row just in front of the goal.
pub(crate) fn rally_point(goal: CellCoord, columns: u32, slot: usize) -> CellCoord {
    let row = goal.row().saturating_sub(RALLY_OFFSET);
    let step = u32::try_from(slot.div_ceil(2)).unwrap_or(u32::MAX);
    let column = if slot % 2 == 1 {
        goal.column().saturating_sub(step)
    } else {
        goal.column().saturating_add(step)
    };
    CellCoord::new(column.min(columns.saturating_sub(1)), row)
}
