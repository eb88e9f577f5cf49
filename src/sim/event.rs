//! Reactor events and their deterministic ordering
//!
//! An event is either a wall bounce or a molecule pair contact, predicted at
//! some delay from the current instant. Delays are bucketed on an `EPS_TIME`
//! grid; events in the same bucket count as simultaneous and are ordered by
//! kind, then ids, then wall order. The result is a total order, so the chosen
//! event never depends on the order candidates are offered in.

use std::cmp::Ordering;

use super::arena::WallSide;
use crate::consts::EPS_TIME;

/// What happens at an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Molecules at indices `i` and `j` (i < j) touch
    Pair { i: usize, j: usize },
    /// Molecule at index `i` reaches a wall
    Wall { i: usize, side: WallSide },
}

/// A predicted event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Delay from the current instant (>= 0)
    pub delta: f64,
    pub kind: EventKind,
    /// Stable ids of the participants, used for tie-breaks
    pub ids: (u32, u32),
}

impl Event {
    pub fn pair(delta: f64, i: usize, j: usize, ids: (u32, u32)) -> Self {
        Self {
            delta,
            kind: EventKind::Pair { i, j },
            ids,
        }
    }

    pub fn wall(delta: f64, i: usize, id: u32, side: WallSide) -> Self {
        Self {
            delta,
            kind: EventKind::Wall { i, side },
            ids: (id, side as u32),
        }
    }

    /// Pair contacts before wall bounces, then by participant ids
    #[inline]
    fn order_key(&self) -> (u8, u32, u32) {
        match self.kind {
            EventKind::Pair { .. } => (0, self.ids.0, self.ids.1),
            EventKind::Wall { .. } => (1, self.ids.0, self.ids.1),
        }
    }

    /// Index of the `EPS_TIME` slot the delay falls in
    #[inline]
    fn bucket(&self) -> f64 {
        (self.delta / EPS_TIME).floor()
    }

    /// Ordering by time slot, then kind and ids
    pub fn compare(&self, other: &Self) -> Ordering {
        self.bucket()
            .total_cmp(&other.bucket())
            .then_with(|| self.order_key().cmp(&other.order_key()))
    }

    /// True if this event should run before `other`
    #[inline]
    pub fn precedes(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    /// True if the event happens within `budget` seconds
    #[inline]
    pub fn within(&self, budget: f64) -> bool {
        self.delta <= budget + EPS_TIME
    }
}

/// Keep the earliest of a stream of candidate events
#[derive(Debug, Default)]
pub struct Earliest(Option<Event>);

impl Earliest {
    pub fn offer(&mut self, candidate: Event) {
        match self.0 {
            Some(best) if !candidate.precedes(&best) => {}
            _ => self.0 = Some(candidate),
        }
    }

    pub fn into_inner(self) -> Option<Event> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_time() {
        let a = Event::pair(1.0, 0, 1, (1, 2));
        let b = Event::wall(2.0, 0, 1, WallSide::Upper);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));
    }

    #[test]
    fn test_simultaneous_pair_beats_wall() {
        let wall = Event::wall(0.5, 0, 1, WallSide::Left);
        let pair = Event::pair(0.5, 3, 4, (7, 9));
        assert!(pair.precedes(&wall));
        assert!(!wall.precedes(&pair));
    }

    #[test]
    fn test_choice_independent_of_offer_order() {
        // Each neighbour is less than EPS_TIME from the next, the ends are not
        let base = 1.0;
        let events = [
            Event::wall(base, 0, 1, WallSide::Upper),
            Event::pair(base + 0.6 * EPS_TIME, 1, 2, (5, 6)),
            Event::pair(base + 1.2 * EPS_TIME, 3, 4, (2, 3)),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        let mut chosen = Vec::new();
        for order in orders {
            let mut best = Earliest::default();
            for k in order {
                best.offer(events[k]);
            }
            chosen.push(best.into_inner().expect("an event"));
        }
        assert!(chosen.iter().all(|e| *e == chosen[0]));
    }

    #[test]
    fn test_simultaneous_walls_use_id_then_side() {
        let a = Event::wall(1.0, 0, 2, WallSide::Right);
        let b = Event::wall(1.0, 1, 3, WallSide::Upper);
        assert!(a.precedes(&b));

        let upper = Event::wall(1.0, 0, 2, WallSide::Upper);
        assert!(upper.precedes(&a));
    }

    #[test]
    fn test_earliest_keeps_first_of_ties() {
        let mut best = Earliest::default();
        best.offer(Event::wall(1.0, 0, 5, WallSide::Lower));
        best.offer(Event::wall(3.0, 1, 1, WallSide::Upper));
        best.offer(Event::wall(1.0, 0, 5, WallSide::Lower));
        best.offer(Event::pair(2.0, 0, 1, (1, 2)));
        let e = best.into_inner().expect("an event");
        assert_eq!(e.kind, EventKind::Wall { i: 0, side: WallSide::Lower });
    }

    #[test]
    fn test_within_budget_allows_epsilon() {
        let e = Event::wall(4.0, 0, 1, WallSide::Right);
        assert!(e.within(4.0));
        assert!(e.within(4.0 - EPS_TIME / 2.0));
        assert!(!e.within(3.9));
    }
}
