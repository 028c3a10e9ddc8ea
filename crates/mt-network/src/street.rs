//! Streets, lanes, and turn classification.
//!
//! A street is a *directed* edge with a polyline geometry and an ordered
//! list of lanes.  Lane index 0 is the rightmost lane; shifting "left"
//! increments the index.  Each lane carries the set of turn movements it
//! permits at the street's end intersection.

use mt_core::{NodeId, Point2, StreetId};

use crate::geometry;

// ── Turn movements ────────────────────────────────────────────────────────────

/// The movement a vehicle makes at the end of a street, classified from the
/// street geometry (see [`classify_turn`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    Left,
    Through,
    Right,
}

/// One entry of a lane's permitted-movement list.
///
/// `Other` preserves unmapped `turn:lanes` tokens verbatim (e.g.
/// `merge_to_left`).  Such entries never satisfy a turn check, but they keep
/// the lane's rule list non-empty, which the network invariant requires.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneRule {
    Left,
    Through,
    Right,
    Other(String),
}

/// A single lane: an ordered file of vehicles plus its permitted movements.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    rules: Vec<LaneRule>,
}

impl Lane {
    /// A lane with an explicit rule list.  Emptiness is rejected when the
    /// network is built, not here.
    pub fn new(rules: Vec<LaneRule>) -> Self {
        Self { rules }
    }

    /// A lane permitting every movement — the synthetic-builder default.
    pub fn all_turns() -> Self {
        Self {
            rules: vec![LaneRule::Left, LaneRule::Through, LaneRule::Right],
        }
    }

    /// A lane permitting only the through movement — the padding lane for
    /// imported streets whose `lanes` count exceeds their `turn:lanes` tag.
    pub fn through_only() -> Self {
        Self {
            rules: vec![LaneRule::Through],
        }
    }

    pub fn rules(&self) -> &[LaneRule] {
        &self.rules
    }

    /// Whether this lane permits `turn`.  `Left` and `Right` require an
    /// explicit rule; `Through` requires `Through`.  `Other` rules satisfy
    /// nothing.
    pub fn allows(&self, turn: TurnDirection) -> bool {
        let wanted = match turn {
            TurnDirection::Left => LaneRule::Left,
            TurnDirection::Through => LaneRule::Through,
            TurnDirection::Right => LaneRule::Right,
        };
        self.rules.contains(&wanted)
    }
}

// ── Street ────────────────────────────────────────────────────────────────────

/// A directed street segment.
///
/// `length_m` is the routing/kinematics length.  For imported streets it
/// equals the polyline arc length; synthetic generators assign stylized
/// lengths, so [`position_at`](Self::position_at) interpolates at the
/// normalized fraction of arc length and rendering stays consistent either
/// way.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Street {
    pub id: StreetId,
    pub start: NodeId,
    pub end: NodeId,
    pub polyline: Vec<Point2>,
    pub length_m: f64,
    pub speed_limit_mps: f64,
    pub lanes: Vec<Lane>,
    /// Cumulative arc length at each polyline vertex, for interpolation.
    cum_arc: Vec<f64>,
}

impl Street {
    pub(crate) fn new(
        id: StreetId,
        start: NodeId,
        end: NodeId,
        polyline: Vec<Point2>,
        length_m: f64,
        speed_limit_mps: f64,
        lanes: Vec<Lane>,
    ) -> Self {
        let cum_arc = geometry::cumulative_arc_lengths(&polyline);
        Self {
            id,
            start,
            end,
            polyline,
            length_m,
            speed_limit_mps,
            lanes,
            cum_arc,
        }
    }

    #[inline]
    pub fn lane_count(&self) -> u8 {
        self.lanes.len() as u8
    }

    #[inline]
    pub fn lane(&self, index: u8) -> &Lane {
        &self.lanes[index as usize]
    }

    /// Geometric length of the polyline in metres.
    #[inline]
    pub fn arc_length_m(&self) -> f64 {
        *self.cum_arc.last().unwrap_or(&0.0)
    }

    /// The 2-D point at arc position `s` along the street, `s` clamped to
    /// `[0, length_m]`.  Linear interpolation between polyline vertices.
    pub fn position_at(&self, s: f64) -> Point2 {
        let arc_total = self.arc_length_m();
        if arc_total <= 0.0 {
            return self.polyline[0];
        }
        let target = (s / self.length_m).clamp(0.0, 1.0) * arc_total;

        // Find the segment containing `target`; cum_arc is non-decreasing.
        for (i, w) in self.cum_arc.windows(2).enumerate() {
            let (seg_start, seg_end) = (w[0], w[1]);
            if target <= seg_end {
                let seg_len = seg_end - seg_start;
                if seg_len <= 0.0 {
                    return self.polyline[i];
                }
                let t = (target - seg_start) / seg_len;
                return self.polyline[i].lerp(self.polyline[i + 1], t);
            }
        }
        *self.polyline.last().unwrap_or(&self.polyline[0])
    }

    /// Heading of the final polyline segment — the direction a vehicle faces
    /// when it reaches the end intersection.
    pub fn end_heading_deg(&self) -> f64 {
        let n = self.polyline.len();
        geometry::heading_deg(self.polyline[n - 2], self.polyline[n - 1])
    }

    /// Heading of the first polyline segment — the direction a vehicle faces
    /// when it enters the street.
    pub fn start_heading_deg(&self) -> f64 {
        geometry::heading_deg(self.polyline[0], self.polyline[1])
    }
}

// ── Turn classification ───────────────────────────────────────────────────────

/// Classify the movement from `from` onto `next`.
///
/// Compares the heading of `from`'s last segment against the heading of
/// `next`'s first segment, with the difference normalized into (−180, 180].
/// The 30° boundary is strict on both sides: `diff > 30.0` is Right,
/// `diff < -30.0` is Left, and exactly ±30° classifies as Through.
pub fn classify_turn(from: &Street, next: &Street) -> TurnDirection {
    let diff = geometry::heading_diff_deg(from.end_heading_deg(), next.start_heading_deg());
    if diff > 30.0 {
        TurnDirection::Right
    } else if diff < -30.0 {
        TurnDirection::Left
    } else {
        TurnDirection::Through
    }
}
