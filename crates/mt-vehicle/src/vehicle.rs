//! Vehicle state and the per-tick update state machine.

use mt_core::{ProfileId, StreetId, VehicleId};
use mt_network::{classify_turn, Network, Street, TurnDirection};
use mt_signal::SignalSet;

use crate::profile::DriverProfile;

/// Maximum acceleration, m/s².
pub const ACCEL_MPS2: f64 = 2.0;
/// Maximum (comfortable emergency) deceleration, m/s².
pub const DECEL_MPS2: f64 = 4.0;
/// Standstill buffer kept to the leader, metres.
pub const MIN_GAP_M: f64 = 5.0;
/// Distance to the street end below which turn preparation starts, metres.
pub const TURN_PREP_DIST_M: f64 = 50.0;
/// Distance to the street end below which the signal is consulted, metres.
pub const SIGNAL_CHECK_DIST_M: f64 = 20.0;

// ── LeaderView ────────────────────────────────────────────────────────────────

/// Pre-update snapshot of the vehicle immediately ahead (larger arc
/// position) on the same (street, lane).  The simulator builds these when
/// bucketing; the update only needs the leader's position.
#[derive(Copy, Clone, Debug)]
pub struct LeaderView {
    pub position_s: f64,
}

// ── Vehicle ───────────────────────────────────────────────────────────────────

/// One simulated vehicle.
///
/// Holds only ids into the simulator's collections — never references — so
/// per-tick bucketing and removal stay cheap and free of aliasing.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id: VehicleId,
    pub profile: ProfileId,
    pub speed_factor: f64,
    pub reaction_time_s: f64,

    /// Current street; always equals `route[route_index]`.
    pub street: StreetId,
    /// Current lane, `0 ≤ lane < street.lane_count()`.
    pub lane: u8,
    /// Arc position along the current street, `[0, street.length_m]`.
    pub position_s: f64,
    pub speed_mps: f64,

    /// The streets this vehicle intends to traverse, in order.
    pub route: Vec<StreetId>,
    pub route_index: usize,

    /// Speed cap captured on street assignment as
    /// `street.speed_limit · speed_factor`.
    pub base_limit_mps: f64,

    /// Set when the route is exhausted; the simulator drops finished
    /// vehicles at the end of the tick.
    pub finished: bool,
}

impl Vehicle {
    /// Place a new vehicle at the start of `first` (which must be
    /// `route[0]`), standing still.
    pub fn new(
        id: VehicleId,
        profile_id: ProfileId,
        profile: &DriverProfile,
        first: &Street,
        lane: u8,
        route: Vec<StreetId>,
    ) -> Self {
        debug_assert_eq!(route.first().copied(), Some(first.id));
        debug_assert!(lane < first.lane_count());
        Self {
            id,
            profile: profile_id,
            speed_factor: profile.speed_factor,
            reaction_time_s: profile.reaction_time_s,
            street: first.id,
            lane,
            position_s: 0.0,
            speed_mps: 0.0,
            route,
            route_index: 0,
            base_limit_mps: first.speed_limit_mps * profile.speed_factor,
            finished: false,
        }
    }

    /// Advance this vehicle by one tick of `dt` seconds.
    ///
    /// `leader` must be the vehicle immediately ahead on the same
    /// (street, lane), or `None` — the simulator's bucketing guarantees the
    /// pairing.  Never fails: every edge case (red signal at the stop line,
    /// exhausted route) resolves to a defined state.
    pub fn update(&mut self, dt: f64, leader: Option<LeaderView>, net: &Network, signals: &SignalSet) {
        if self.finished {
            return;
        }

        let street = net.street(self.street);
        debug_assert_eq!(self.route[self.route_index], self.street);
        debug_assert!(self.lane < street.lane_count());
        let dist_to_end = street.length_m - self.position_s;

        // ── Headway rule ──────────────────────────────────────────────────
        //
        // Brake when the gap (minus the standstill buffer) undercuts the
        // distance covered during this driver's reaction time.
        let mut desired_accel = ACCEL_MPS2;
        if let Some(leader) = leader {
            let gap = leader.position_s - self.position_s - MIN_GAP_M;
            if gap < self.speed_mps * self.reaction_time_s {
                desired_accel = -DECEL_MPS2;
            }
        }

        // ── Turn preparation ──────────────────────────────────────────────
        //
        // Best-effort one-step lane change toward a lane permitting the
        // upcoming movement.  Adjacent-lane occupancy is deliberately not
        // checked.
        if dist_to_end < TURN_PREP_DIST_M {
            if let Some(turn) = self.next_turn(net) {
                if !street.lane(self.lane).allows(turn) {
                    match turn {
                        TurnDirection::Left => {
                            if self.lane + 1 < street.lane_count() {
                                self.lane += 1;
                            }
                        }
                        TurnDirection::Right => {
                            if self.lane > 0 {
                                self.lane -= 1;
                            }
                        }
                        TurnDirection::Through => {}
                    }
                }
            }
        }

        // ── Signal check ──────────────────────────────────────────────────
        if dist_to_end < SIGNAL_CHECK_DIST_M
            && !signals.may_enter(street.end, self.street, self.lane)
        {
            desired_accel = -DECEL_MPS2;
        }

        // ── Kinematics ────────────────────────────────────────────────────
        let limit = (street.speed_limit_mps * self.speed_factor).min(self.base_limit_mps);
        let new_speed = (self.speed_mps + desired_accel * dt).clamp(0.0, limit);
        let new_pos = self.position_s + new_speed * dt;

        // ── Arrival handling ──────────────────────────────────────────────
        if new_pos >= street.length_m {
            self.position_s = street.length_m;
            self.speed_mps = 0.0;

            if !signals.may_enter(street.end, self.street, self.lane) {
                // Hold at the stop line until the phase admits entry.
                return;
            }

            self.route_index += 1;
            if self.route_index >= self.route.len() {
                self.finished = true;
                return;
            }

            let next = net.street(self.route[self.route_index]);
            self.street = next.id;
            // Project the lane onto the next street.
            self.lane = self.lane.min(next.lane_count() - 1);
            self.position_s = 0.0;
            self.speed_mps = 0.0;
            self.base_limit_mps = next.speed_limit_mps * self.speed_factor;
        } else {
            self.speed_mps = new_speed;
            self.position_s = new_pos;
        }
    }

    /// Movement required to continue onto the next route street, or `None`
    /// on the final street.
    fn next_turn(&self, net: &Network) -> Option<TurnDirection> {
        if self.route_index + 1 >= self.route.len() {
            return None;
        }
        let next = net.street(self.route[self.route_index + 1]);
        Some(classify_turn(net.street(self.street), next))
    }
}
