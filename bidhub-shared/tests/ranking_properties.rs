/// Property tests for bid ranking
///
/// Exercises the ranking comparator over randomized bid sets:
/// - the order is total and stable under re-sorting
/// - rank 1 always minimizes the (delivery, price, submitted_at) tuple
/// - ranks are dense starting at 1

use bidhub_shared::models::bid::Bid;
use bidhub_shared::ranking::{compare_bids, rank_bids};
use chrono::{Duration, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use uuid::Uuid;

fn random_bids(rng: &mut StdRng, count: usize) -> Vec<Bid> {
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

    (0..count)
        .map(|i| {
            let submitted = base + Duration::seconds(rng.gen_range(0..3600));
            let cost = f64::from(rng.gen_range(1..500)) / 2.0;
            Bid {
                id: Uuid::new_v4(),
                auction_id: Uuid::nil(),
                vendor_email: format!("vendor-{}@example.com", i),
                company_name: format!("Vendor {}", i),
                contact_name: "Contact".to_string(),
                contact_phone: "+1 555 0100".to_string(),
                delivery_time_days: rng.gen_range(1..30),
                cost_per_unit: cost,
                total_cost: cost * 100.0,
                submitted_at: submitted,
                updated_at: submitted,
            }
        })
        .collect()
}

#[test]
fn ranking_is_stable_under_resorting() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let bids = random_bids(&mut rng, 20);

        let once = rank_bids(&bids);
        let reordered: Vec<Bid> = once.iter().map(|r| r.bid.clone()).collect();
        let twice = rank_bids(&reordered);

        let ids_once: Vec<_> = once.iter().map(|r| r.bid.id).collect();
        let ids_twice: Vec<_> = twice.iter().map(|r| r.bid.id).collect();
        assert_eq!(ids_once, ids_twice);
    }
}

#[test]
fn rank_one_minimizes_the_lexicographic_tuple() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..50 {
        let bids = random_bids(&mut rng, 15);
        let ranked = rank_bids(&bids);
        let best = &ranked[0].bid;

        for other in &bids {
            let best_key = (best.delivery_time_days, best.cost_per_unit, best.submitted_at);
            let other_key = (
                other.delivery_time_days,
                other.cost_per_unit,
                other.submitted_at,
            );
            assert!(
                best_key <= other_key,
                "rank 1 {:?} beaten by {:?}",
                best_key,
                other_key
            );
        }
    }
}

#[test]
fn order_is_total_over_distinct_bids() {
    let mut rng = StdRng::seed_from_u64(13);
    let bids = random_bids(&mut rng, 30);

    for a in &bids {
        for b in &bids {
            if a.id != b.id {
                assert_ne!(
                    compare_bids(a, b),
                    std::cmp::Ordering::Equal,
                    "distinct bids must never compare equal"
                );
                assert_eq!(compare_bids(a, b), compare_bids(b, a).reverse());
            }
        }
    }
}

#[test]
fn ranks_are_dense_from_one() {
    let mut rng = StdRng::seed_from_u64(17);
    let bids = random_bids(&mut rng, 25);

    let ranked = rank_bids(&bids);
    for (i, entry) in ranked.iter().enumerate() {
        assert_eq!(entry.rank as usize, i + 1);
    }
}
