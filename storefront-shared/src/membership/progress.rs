/// Tier progress calculation
///
/// Pure arithmetic over an already-loaded tier ladder. The next tier is the
/// one following the *assigned* tier in `min_points` order, so progress is
/// measured between tier boundaries rather than from the raw balance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::membership_tier::MembershipTier;

/// A user's standing on the tier ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipProgress {
    /// Current points balance
    pub points: i64,

    /// Assigned tier
    pub current_tier: Option<MembershipTier>,

    /// Tier after the assigned one; `None` at the top or with no tier
    pub next_tier: Option<MembershipTier>,

    /// Percent of the way from the current tier to the next, in `[0, 100]`
    pub progress: f64,
}

impl MembershipProgress {
    /// Result for callers without a resolvable user
    pub fn zero() -> Self {
        Self::unassigned(0)
    }

    /// Result for a user with no tier
    pub fn unassigned(points: i64) -> Self {
        Self {
            points,
            current_tier: None,
            next_tier: None,
            progress: 0.0,
        }
    }
}

/// Percent of the way from `current_min` to `next_min`, clamped to `[0, 100]`
///
/// A zero-width band counts as complete.
pub fn progress_percent(points: i64, current_min: i64, next_min: i64) -> f64 {
    let span = next_min.saturating_sub(current_min);
    if span <= 0 {
        return 100.0;
    }

    let earned = points.saturating_sub(current_min) as f64;
    (earned / span as f64 * 100.0).clamp(0.0, 100.0)
}

/// Places a user on the ladder
///
/// `tiers` must be sorted by `min_points` ascending. An assigned tier id that
/// is not in `tiers` is treated as no tier at all.
pub fn compute(points: i64, assigned: Option<Uuid>, tiers: &[MembershipTier]) -> MembershipProgress {
    let Some(tier_id) = assigned else {
        return MembershipProgress::unassigned(points);
    };

    let Some(index) = tiers.iter().position(|tier| tier.id == tier_id) else {
        tracing::warn!(%tier_id, "Assigned membership tier no longer exists");
        return MembershipProgress::unassigned(points);
    };

    let current = tiers[index].clone();
    let next = tiers.get(index + 1).cloned();

    let progress = match &next {
        Some(next) => progress_percent(points, current.min_points, next.min_points),
        None => 100.0,
    };

    MembershipProgress {
        points,
        current_tier: Some(current),
        next_tier: next,
        progress,
    }
}

/// Highest tier whose threshold `points` reaches
///
/// `tiers` must be sorted by `min_points` ascending.
pub fn tier_for_points(points: i64, tiers: &[MembershipTier]) -> Option<&MembershipTier> {
    tiers.iter().rev().find(|tier| tier.min_points <= points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tier(title: &str, min_points: i64) -> MembershipTier {
        MembershipTier {
            id: Uuid::new_v4(),
            title: title.to_string(),
            icon: String::new(),
            description: String::new(),
            benefits: vec![],
            min_points,
            created_at: Utc::now(),
        }
    }

    fn ladder() -> Vec<MembershipTier> {
        vec![tier("Bronze", 0), tier("Silver", 100), tier("Gold", 500)]
    }

    #[test]
    fn test_halfway_to_next_tier() {
        let tiers = ladder();
        let result = compute(50, Some(tiers[0].id), &tiers);

        assert_eq!(result.points, 50);
        assert_eq!(result.current_tier.as_ref().unwrap().title, "Bronze");
        assert_eq!(result.next_tier.as_ref().unwrap().title, "Silver");
        assert_eq!(result.progress, 50.0);
    }

    #[test]
    fn test_top_tier_is_complete() {
        let tiers = ladder();
        let result = compute(500, Some(tiers[2].id), &tiers);

        assert_eq!(result.current_tier.unwrap().title, "Gold");
        assert!(result.next_tier.is_none());
        assert_eq!(result.progress, 100.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let tiers = ladder();
        let result = compute(100, Some(tiers[0].id), &tiers);
        assert_eq!(result.progress, 100.0);
    }

    #[test]
    fn test_progress_clamped() {
        let tiers = ladder();

        // Balance past the next threshold while still assigned the lower tier
        let over = compute(10_000, Some(tiers[0].id), &tiers);
        assert_eq!(over.progress, 100.0);

        // Balance below the assigned tier's own threshold
        let under = compute(20, Some(tiers[1].id), &tiers);
        assert_eq!(under.progress, 0.0);
    }

    #[test]
    fn test_progress_always_in_range() {
        let tiers = ladder();
        for points in (-50..1200).step_by(7) {
            for current in &tiers {
                let result = compute(points, Some(current.id), &tiers);
                assert!(
                    (0.0..=100.0).contains(&result.progress),
                    "points={points} tier={} progress={}",
                    current.title,
                    result.progress
                );
            }
        }
    }

    #[test]
    fn test_next_tier_follows_assigned_tier_not_balance() {
        let tiers = ladder();
        // 600 points but still assigned Bronze: next is Silver, not none
        let result = compute(600, Some(tiers[0].id), &tiers);
        assert_eq!(result.next_tier.unwrap().title, "Silver");
    }

    #[test]
    fn test_no_assigned_tier() {
        let result = compute(250, None, &ladder());
        assert_eq!(result, MembershipProgress::unassigned(250));
        assert_eq!(result.progress, 0.0);
    }

    #[test]
    fn test_missing_tier_treated_as_unassigned() {
        let result = compute(250, Some(Uuid::new_v4()), &ladder());
        assert!(result.current_tier.is_none());
        assert!(result.next_tier.is_none());
        assert_eq!(result.progress, 0.0);
    }

    #[test]
    fn test_zero_width_band() {
        assert_eq!(progress_percent(10, 100, 100), 100.0);
        assert_eq!(progress_percent(10, 100, 50), 100.0);
    }

    #[test]
    fn test_tier_for_points() {
        let tiers = ladder();
        assert_eq!(tier_for_points(0, &tiers).unwrap().title, "Bronze");
        assert_eq!(tier_for_points(99, &tiers).unwrap().title, "Bronze");
        assert_eq!(tier_for_points(100, &tiers).unwrap().title, "Silver");
        assert_eq!(tier_for_points(9_999, &tiers).unwrap().title, "Gold");

        let no_floor = vec![tier("Silver", 100)];
        assert!(tier_for_points(50, &no_floor).is_none());
    }

    #[test]
    fn test_zero_state() {
        let zero = MembershipProgress::zero();
        assert_eq!(zero.points, 0);
        assert!(zero.current_tier.is_none());
        assert_eq!(zero.progress, 0.0);
    }
}
