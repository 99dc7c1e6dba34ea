//! Property tests for round sequencing (pure domain, no DB).
//!
//! Over any sequence of rolls and any win percentage:
//! - a round-two draw only follows a round-one loss
//! - every round-two draw wins and carries a tier
//! - losses never carry a tier
//! - round_index never decreases and grows by one exactly after a round two

use proptest::prelude::*;

use crate::domain::rng::ScriptedRandom;
use crate::domain::rounds::{decide, DrawRound, LastDraw};
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_round_sequence_invariants(
        rolls in prop::collection::vec(0.0f64..100.0, 1..64),
        win_percent in 0u8..=100u8,
        draws in 1usize..40,
    ) {
        let rng = ScriptedRandom::new(rolls);
        let mut previous: Option<LastDraw> = None;

        for _ in 0..draws {
            let d = decide(previous.as_ref(), win_percent, &rng);

            prop_assert_eq!(d.won, d.tier.is_some(), "tier present exactly on wins");

            match previous {
                None => {
                    prop_assert_eq!(d.round, DrawRound::First);
                    prop_assert_eq!(d.round_index, 1);
                }
                Some(p) => {
                    let after_round_one_loss = p.round == DrawRound::First && !p.won;
                    prop_assert_eq!(d.round == DrawRound::Second, after_round_one_loss);

                    let expected_index = if p.round == DrawRound::Second {
                        p.round_index + 1
                    } else {
                        p.round_index
                    };
                    prop_assert_eq!(d.round_index, expected_index);
                }
            }

            if d.round == DrawRound::Second {
                prop_assert!(d.won, "round two always wins");
            }

            previous = Some(d.as_last_draw());
        }
    }

    #[test]
    fn prop_round_one_win_rate_tracks_percent(win_percent in 0u8..=100u8, roll in 0.0f64..100.0) {
        let rng = ScriptedRandom::new(vec![roll, 0.0]);
        let d = decide(None, win_percent, &rng);
        prop_assert_eq!(d.won, roll < f64::from(win_percent));
    }
}
