//! Candidate ordering for "closest target / source" selection.
//!
//! Roles pick their next target by ordering candidates with a strategy:
//! plain distance, distance buckets with a remaining-work tie-break (so
//! near-equidistant jobs do not thrash), or sticky (keep the remembered
//! job until it is done).

use crate::geometry::Position;
use crate::ids::ObjectId;

/// A target or source as seen by the sorter.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: ObjectId,
    pub pos: Position,
    /// Work left on this candidate (build progress, missing hits, ...).
    pub remaining: u32,
    /// Nothing left to do here; never selected.
    pub complete: bool,
}

impl Candidate {
    pub fn new(id: ObjectId, pos: Position) -> Self {
        Self {
            id,
            pos,
            remaining: 0,
            complete: false,
        }
    }

    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining = remaining;
        self
    }

    pub fn completed(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Ascending range from the worker.
    #[default]
    Distance,
    /// `range / bucket_size` first, then least remaining work.
    Bucketed { bucket_size: u32 },
    /// The remembered candidate first while it is not complete, then range.
    Sticky { remembered: Option<ObjectId> },
}

/// Order `candidates` for a worker standing at `origin`.
///
/// Completed candidates are dropped. The sort is stable: candidates with
/// equal keys keep their input order.
pub fn resolve_closest(
    candidates: Vec<Candidate>,
    origin: &Position,
    strategy: &SortStrategy,
) -> Vec<Candidate> {
    let mut open: Vec<Candidate> = candidates.into_iter().filter(|c| !c.complete).collect();

    match strategy {
        SortStrategy::Distance => {
            open.sort_by_key(|c| origin.range_to(&c.pos));
        }
        SortStrategy::Bucketed { bucket_size } => {
            let bucket = (*bucket_size).max(1);
            open.sort_by_key(|c| (origin.range_to(&c.pos) / bucket, c.remaining));
        }
        SortStrategy::Sticky { remembered } => {
            open.sort_by_key(|c| {
                let keep = Some(c.id) == *remembered;
                (!keep, origin.range_to(&c.pos))
            });
        }
    }

    open
}

/// First candidate of [`resolve_closest`].
pub fn closest(
    candidates: Vec<Candidate>,
    origin: &Position,
    strategy: &SortStrategy,
) -> Option<Candidate> {
    resolve_closest(candidates, origin, strategy).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RoomName;

    fn pos(x: u8, y: u8) -> Position {
        Position::new(RoomName::new(0, 0), x, y)
    }

    #[test]
    fn test_distance_order() {
        let origin = pos(10, 10);
        let sorted = resolve_closest(
            vec![
                Candidate::new(ObjectId(1), pos(30, 10)),
                Candidate::new(ObjectId(2), pos(12, 10)),
                Candidate::new(ObjectId(3), pos(20, 10)),
            ],
            &origin,
            &SortStrategy::Distance,
        );
        let ids: Vec<u64> = sorted.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_distance_ties_keep_input_order() {
        let origin = pos(10, 10);
        let sorted = resolve_closest(
            vec![
                Candidate::new(ObjectId(7), pos(12, 10)),
                Candidate::new(ObjectId(3), pos(8, 10)),
            ],
            &origin,
            &SortStrategy::Distance,
        );
        assert_eq!(sorted[0].id, ObjectId(7));
    }

    #[test]
    fn test_bucketed_prefers_less_work_in_same_bucket() {
        let origin = pos(10, 10);
        let sorted = resolve_closest(
            vec![
                // range 1, bucket 0, lots of work
                Candidate::new(ObjectId(1), pos(11, 10)).with_remaining(5000),
                // range 4, bucket 0, almost done
                Candidate::new(ObjectId(2), pos(14, 10)).with_remaining(10),
                // range 6, bucket 1
                Candidate::new(ObjectId(3), pos(16, 10)).with_remaining(1),
            ],
            &origin,
            &SortStrategy::Bucketed { bucket_size: 5 },
        );
        let ids: Vec<u64> = sorted.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_completed_candidates_are_dropped() {
        let origin = pos(10, 10);
        let sorted = resolve_closest(
            vec![
                Candidate::new(ObjectId(1), pos(11, 10)).completed(true),
                Candidate::new(ObjectId(2), pos(30, 10)),
            ],
            &origin,
            &SortStrategy::Distance,
        );
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].id, ObjectId(2));
    }

    #[test]
    fn test_sticky_keeps_remembered_until_complete() {
        let origin = pos(10, 10);
        let candidates = |far_done: bool| {
            vec![
                Candidate::new(ObjectId(1), pos(11, 10)),
                Candidate::new(ObjectId(2), pos(40, 10)).completed(far_done),
            ]
        };
        let strategy = SortStrategy::Sticky {
            remembered: Some(ObjectId(2)),
        };

        let first = closest(candidates(false), &origin, &strategy).unwrap();
        let again = closest(candidates(false), &origin, &strategy).unwrap();
        assert_eq!(first.id, ObjectId(2));
        assert_eq!(again.id, ObjectId(2));

        let after = closest(candidates(true), &origin, &strategy).unwrap();
        assert_eq!(after.id, ObjectId(1));
    }

    #[test]
    fn test_empty_candidates() {
        assert!(closest(vec![], &pos(0, 0), &SortStrategy::Distance).is_none());
    }
}
