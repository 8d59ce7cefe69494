/// Bid ranking
///
/// Pure, deterministic ordering of the bids on one auction. Rank 1 is the
/// best quote. The comparator is a lexicographic tuple:
///
/// 1. ascending `delivery_time_days`
/// 2. ascending `cost_per_unit`
/// 3. ascending `total_cost`
/// 4. ascending `submitted_at` (earliest submission wins the tie; upserts
///    preserve the original submission time, so revising a bid never
///    improves this key)
/// 5. ascending bid `id`, which makes the order total even for identical
///    quotes
///
/// No side effects, O(n log n). The same function backs the rank endpoint
/// and winner candidacy; there is deliberately only one implementation so
/// server views can never disagree about the order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::bid::Bid;

/// A bid with its assigned rank (1 = best)
#[derive(Debug, Clone, Serialize)]
pub struct RankedBid {
    /// 1-based position in the competitive order
    pub rank: u32,

    /// The underlying bid
    #[serde(flatten)]
    pub bid: Bid,
}

/// Compares two bids in competitive order (best first)
///
/// Total: never returns Equal for bids with distinct IDs.
pub fn compare_bids(a: &Bid, b: &Bid) -> Ordering {
    a.delivery_time_days
        .cmp(&b.delivery_time_days)
        .then_with(|| a.cost_per_unit.total_cmp(&b.cost_per_unit))
        .then_with(|| a.total_cost.total_cmp(&b.total_cost))
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Ranks a set of bids, best first
///
/// Returns a new vector; the input is left untouched. Sorting an already
/// ranked list again yields the identical order (the comparator is total),
/// and rank 1 always carries the minimum (delivery, price, submitted_at)
/// tuple.
pub fn rank_bids(bids: &[Bid]) -> Vec<RankedBid> {
    let mut ordered: Vec<Bid> = bids.to_vec();
    ordered.sort_by(compare_bids);

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, bid)| RankedBid {
            rank: (i + 1) as u32,
            bid,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn bid(delivery_days: i32, cost_per_unit: f64, submitted_offset_secs: i64) -> Bid {
        let submitted = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
            + Duration::seconds(submitted_offset_secs);
        Bid {
            id: Uuid::new_v4(),
            auction_id: Uuid::nil(),
            vendor_email: format!("vendor-{}d-{}@example.com", delivery_days, cost_per_unit),
            company_name: "Vendor".to_string(),
            contact_name: "Contact".to_string(),
            contact_phone: "+1 555 0100".to_string(),
            delivery_time_days: delivery_days,
            cost_per_unit,
            total_cost: cost_per_unit * 100.0,
            submitted_at: submitted,
            updated_at: submitted,
        }
    }

    #[test]
    fn test_spec_example_order() {
        // [(5d,$100),(5d,$90),(3d,$200)] → [(3d,$200),(5d,$90),(5d,$100)]
        let bids = vec![bid(5, 100.0, 0), bid(5, 90.0, 1), bid(3, 200.0, 2)];

        let ranked = rank_bids(&bids);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].bid.delivery_time_days, 3);
        assert_eq!(ranked[1].bid.cost_per_unit, 90.0);
        assert_eq!(ranked[2].bid.cost_per_unit, 100.0);
    }

    #[test]
    fn test_earliest_submission_wins_full_tie() {
        let first = bid(4, 50.0, 0);
        let second = bid(4, 50.0, 30);

        let ranked = rank_bids(&[second.clone(), first.clone()]);

        assert_eq!(ranked[0].bid.id, first.id);
        assert_eq!(ranked[1].bid.id, second.id);
    }

    #[test]
    fn test_sorting_twice_is_stable() {
        let bids = vec![
            bid(7, 12.5, 5),
            bid(2, 99.0, 1),
            bid(7, 12.5, 2),
            bid(2, 45.0, 9),
            bid(5, 45.0, 0),
        ];

        let once = rank_bids(&bids);
        let reordered: Vec<Bid> = once.iter().map(|r| r.bid.clone()).collect();
        let twice = rank_bids(&reordered);

        let ids_once: Vec<_> = once.iter().map(|r| r.bid.id).collect();
        let ids_twice: Vec<_> = twice.iter().map(|r| r.bid.id).collect();
        assert_eq!(ids_once, ids_twice);
    }

    #[test]
    fn test_rank_one_minimizes_tuple() {
        let bids = vec![
            bid(6, 10.0, 0),
            bid(3, 80.0, 4),
            bid(3, 20.0, 8),
            bid(9, 5.0, 2),
        ];

        let ranked = rank_bids(&bids);
        let best = &ranked[0].bid;

        for other in &bids {
            let best_key = (best.delivery_time_days, best.cost_per_unit, best.submitted_at);
            let other_key = (
                other.delivery_time_days,
                other.cost_per_unit,
                other.submitted_at,
            );
            assert!(best_key <= other_key);
        }
    }

    #[test]
    fn test_ranks_are_dense_from_one() {
        let bids = vec![bid(1, 1.0, 0), bid(2, 2.0, 1), bid(3, 3.0, 2)];
        let ranked = rank_bids(&bids);

        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_bids(&[]).is_empty());
    }
}
