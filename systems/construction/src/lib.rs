#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure construction system: turns placement requests into build orders and
//! finishes constructions once their build time elapsed.

use std::time::Duration;

use lane_defence_core::{CellCoord, Command, ConstructionView, Event, Rejection, WorkerId};

/// Parameters of the construction system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Time a worker spends on a construction site before it completes.
    pub build_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_duration: Duration::from_millis(2_000),
        }
    }
}

/// Construction system that mirrors the player's placement state from events.
#[derive(Debug, Clone, Default)]
pub struct Construction {
    config: Config,
    placement_mode: bool,
    selected_worker: Option<WorkerId>,
}

impl Construction {
    /// Creates a new construction system.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            placement_mode: false,
            selected_worker: None,
        }
    }

    /// Whether placement mode is active according to the observed events.
    #[must_use]
    pub fn placement_mode(&self) -> bool {
        self.placement_mode
    }

    /// Tracks selection and placement mode changes announced by the world.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PlacementModeChanged { active } => self.placement_mode = *active,
                Event::WorkerSelected { worker } => self.selected_worker = *worker,
                Event::WorldReset { .. } => {
                    self.placement_mode = false;
                    self.selected_worker = None;
                }
                _ => {}
            }
        }
    }

    /// Translates a placement click into a build order for the selected
    /// worker. Requests outside placement mode are refused.
    pub fn request(&self, cell: CellCoord) -> Result<Command, Rejection> {
        if !self.placement_mode {
            return Err(Rejection::PlacementInactive);
        }
        let worker = self.selected_worker.ok_or(Rejection::NoWorkerSelected)?;
        Ok(Command::OrderBuild { worker, cell })
    }

    /// Consumes world events and the construction view, emitting
    /// `CompleteConstruction` for every site whose build time elapsed.
    pub fn handle(
        &mut self,
        events: &[Event],
        sites: &ConstructionView,
        clock: Duration,
        out: &mut Vec<Command>,
    ) {
        self.observe(events);

        for site in sites.iter() {
            if clock.saturating_sub(site.started_at) >= self.config.build_duration {
                out.push(Command::CompleteConstruction {
                    worker: site.worker,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{BuildSite, LaneId};

    fn site(worker: u32, started_at_ms: u64) -> BuildSite {
        BuildSite {
            worker: WorkerId::new(worker),
            lane: LaneId::new(0),
            cell: CellCoord::new(1, 1),
            started_at: Duration::from_millis(started_at_ms),
        }
    }

    #[test]
    fn requests_need_placement_mode_and_a_worker() {
        let mut construction = Construction::default();
        let cell = CellCoord::new(3, 4);
        assert_eq!(
            construction.request(cell),
            Err(Rejection::PlacementInactive)
        );

        construction.observe(&[Event::PlacementModeChanged { active: true }]);
        assert_eq!(construction.request(cell), Err(Rejection::NoWorkerSelected));

        construction.observe(&[Event::WorkerSelected {
            worker: Some(WorkerId::new(2)),
        }]);
        assert_eq!(
            construction.request(cell),
            Ok(Command::OrderBuild {
                worker: WorkerId::new(2),
                cell,
            })
        );
    }

    #[test]
    fn reset_forgets_placement_state() {
        let mut construction = Construction::default();
        construction.observe(&[
            Event::WorkerSelected {
                worker: Some(WorkerId::new(0)),
            },
            Event::PlacementModeChanged { active: true },
            Event::WorldReset { epoch: 1 },
        ]);

        assert!(!construction.placement_mode());
        assert_eq!(
            construction.request(CellCoord::new(0, 0)),
            Err(Rejection::PlacementInactive)
        );
    }

    #[test]
    fn only_elapsed_sites_complete() {
        let mut construction = Construction::new(Config::default());
        let sites = ConstructionView::from_sites(vec![site(0, 0), site(1, 500)]);
        let mut out = Vec::new();

        construction.handle(&[], &sites, Duration::from_millis(2_000), &mut out);

        assert_eq!(
            out,
            vec![Command::CompleteConstruction {
                worker: WorkerId::new(0),
            }]
        );
    }
}
