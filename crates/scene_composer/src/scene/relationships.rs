//! Directional relationship computation
//!
//! Object `j` is in direction `d` from object `i` when
//! `(p_j - p_i) · d > eps`. The test is a strict half-space threshold per
//! axis, so a pair can be both left and behind, and a pair offset by exactly
//! `eps` (or less) along an axis is related in neither sense along it.

use crate::foundation::math::Vec3;
use crate::scene::{Direction, DirectionSet, ObjectRecord, Relationships};

/// Threshold used when none is configured
pub const DEFAULT_RELATIONSHIP_EPS: f32 = 0.2;

/// Relationships for every horizontal direction between `objects`
pub fn compute_all_relationships(
    objects: &[ObjectRecord],
    directions: &DirectionSet,
    eps: f32,
) -> Relationships {
    let positions: Vec<Vec3> = objects.iter().map(|o| o.coords).collect();
    relate_positions(&positions, directions, eps)
}

/// Relationships between bare positions
///
/// Each inner list is sorted ascending and never contains its own index.
pub fn relate_positions(positions: &[Vec3], directions: &DirectionSet, eps: f32) -> Relationships {
    Direction::HORIZONTAL
        .iter()
        .map(|&direction| {
            let axis = directions.vector(direction);
            let related: Vec<Vec<usize>> = positions
                .iter()
                .enumerate()
                .map(|(i, from)| {
                    positions
                        .iter()
                        .enumerate()
                        .filter(|&(j, to)| j != i && (to - from).dot(&axis) > eps)
                        .map(|(j, _)| j)
                        .collect::<Vec<usize>>()
                })
                .collect();
            (direction, related)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::object_at;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn axis_aligned() -> DirectionSet {
        DirectionSet::new(Vec3::y(), -Vec3::x(), Vec3::z())
    }

    fn random_positions(seed: u64, count: usize) -> Vec<Vec3> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), 0.35))
            .collect()
    }

    #[test]
    fn test_two_objects_behind() {
        let positions = [Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0)];
        let rel = relate_positions(&positions, &axis_aligned(), DEFAULT_RELATIONSHIP_EPS);

        let none: Vec<usize> = Vec::new();
        assert_eq!(rel[&Direction::Behind], vec![vec![1usize], none.clone()]);
        assert_eq!(rel[&Direction::Front], vec![none.clone(), vec![0usize]]);
        assert_eq!(rel[&Direction::Left], vec![none.clone(), none.clone()]);
        assert_eq!(rel[&Direction::Right], vec![none.clone(), none]);
    }

    #[test]
    fn test_only_horizontal_directions() {
        let rel = relate_positions(&random_positions(1, 4), &axis_aligned(), 0.2);
        let keys: Vec<Direction> = rel.keys().copied().collect();

        assert_eq!(keys.len(), 4);
        assert!(!keys.contains(&Direction::Above));
        assert!(!keys.contains(&Direction::Below));
    }

    #[test]
    fn test_offset_at_threshold_is_unrelated() {
        let positions = [Vec3::zeros(), Vec3::new(0.0, 0.25, 0.0)];
        let rel = relate_positions(&positions, &axis_aligned(), 0.25);

        let unrelated: Vec<Vec<usize>> = vec![Vec::new(), Vec::new()];
        assert_eq!(rel[&Direction::Behind], unrelated);
        assert_eq!(rel[&Direction::Front], unrelated);
    }

    #[test]
    fn test_diagonal_pair_has_two_relations() {
        let positions = [Vec3::zeros(), Vec3::new(-1.0, 1.0, 0.0)];
        let rel = relate_positions(&positions, &axis_aligned(), 0.2);

        assert_eq!(rel[&Direction::Behind][0], vec![1usize]);
        assert_eq!(rel[&Direction::Left][0], vec![1usize]);
        assert_eq!(rel[&Direction::Right][1], vec![0usize]);
    }

    #[test]
    fn test_self_exclusion_and_sorted_subsets() {
        let set = axis_aligned();
        for seed in 0..10 {
            let positions = random_positions(seed, 8);
            let rel = relate_positions(&positions, &set, 0.2);

            for lists in rel.values() {
                assert_eq!(lists.len(), positions.len());
                for (i, related) in lists.iter().enumerate() {
                    assert!(!related.contains(&i));
                    assert!(related.windows(2).all(|w| w[0] < w[1]));
                    assert!(related.iter().all(|&j| j < positions.len()));
                }
            }
        }
    }

    #[test]
    fn test_threshold_implies_membership_and_exclusivity() {
        let set = axis_aligned();
        let eps = 0.2;
        let positions = random_positions(42, 10);
        let rel = relate_positions(&positions, &set, eps);
        let front = set.vector(Direction::Front);

        for (i, pi) in positions.iter().enumerate() {
            for (j, pj) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                if (pj - pi).dot(&front) > eps {
                    assert!(rel[&Direction::Front][i].contains(&j));
                    assert!(!rel[&Direction::Behind][i].contains(&j));
                }
                assert!(!(rel[&Direction::Front][i].contains(&j) && rel[&Direction::Behind][i].contains(&j)));
            }
        }
    }

    #[test]
    fn test_recomputation_is_identical() {
        let set = axis_aligned();
        let objects: Vec<ObjectRecord> = random_positions(9, 6)
            .into_iter()
            .map(|p| object_at(p, 0.35))
            .collect();

        let first = compute_all_relationships(&objects, &set, 0.2);
        let second = compute_all_relationships(&objects, &set, 0.2);
        assert_eq!(first, second);
    }
}
