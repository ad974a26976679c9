//! Properties of the confidence-ranked offset cache, checked against a
//! naive map model.

use std::collections::BTreeMap;

use proptest::prelude::*;

use trajplay_rs::{Confidence, FrameIndex, StreamPos};

fn conf_strategy() -> impl Strategy<Value = Confidence> {
    prop_oneof![
        Just(Confidence::Extrapolated),
        Just(Confidence::Scanned),
        Just(Confidence::Loaded),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<(u64, u64, Confidence)>> {
    prop::collection::vec((0u64..=64, 0u64..100_000, conf_strategy()), 0..=48)
}

/// Reference model: frame -> (confidence, offset), seeded like the cache.
fn run_model(ops: &[(u64, u64, Confidence)]) -> BTreeMap<u64, (Confidence, u64)> {
    let mut model = BTreeMap::new();
    model.insert(0, (Confidence::Extrapolated, 0));
    model.insert(1, (Confidence::Extrapolated, 0));
    for &(frame, offset, conf) in ops {
        if frame == 0 {
            continue;
        }
        let entry = model.entry(frame).or_insert((Confidence::Unknown, 0));
        if entry.0 < conf {
            *entry = (conf, offset);
        }
    }
    model
}

proptest! {
    #[test]
    fn stored_state_matches_the_monotonic_model(ops in ops_strategy()) {
        let mut index = FrameIndex::new();
        for &(frame, offset, conf) in &ops {
            index.record(frame, StreamPos::from_raw(offset), conf);
        }
        let model = run_model(&ops);

        for frame in 0..=70u64 {
            let (conf, offset) = model
                .get(&frame)
                .copied()
                .unwrap_or((Confidence::Unknown, 0));
            prop_assert_eq!(index.confidence_of(frame), conf, "frame {}", frame);
            let expect = (conf > Confidence::Unknown).then(|| StreamPos::from_raw(offset));
            prop_assert_eq!(index.anchor_position(frame), expect, "frame {}", frame);
        }
    }

    #[test]
    fn best_anchor_is_the_nearest_known_at_or_below(
        ops in ops_strategy(),
        target in 0u64..=80,
    ) {
        let mut index = FrameIndex::new();
        for &(frame, offset, conf) in &ops {
            index.record(frame, StreamPos::from_raw(offset), conf);
        }

        let anchor = index.best_anchor(target);
        let top = target.min(index.len() as u64 - 1);

        prop_assert!(anchor <= target);
        prop_assert!(index.confidence_of(anchor) > Confidence::Unknown);
        // Nothing usable sits between the anchor and where the walk began.
        for skipped in anchor + 1..=top {
            prop_assert_eq!(index.confidence_of(skipped), Confidence::Unknown);
        }
    }

    #[test]
    fn last_confirmed_is_the_top_verified_frame(ops in ops_strategy()) {
        let mut index = FrameIndex::new();
        for &(frame, offset, conf) in &ops {
            index.record(frame, StreamPos::from_raw(offset), conf);
        }

        let expected = run_model(&ops)
            .iter()
            .filter(|(_, (conf, _))| *conf >= Confidence::Scanned)
            .map(|(frame, _)| *frame)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(index.last_confirmed(), expected);
    }
}
