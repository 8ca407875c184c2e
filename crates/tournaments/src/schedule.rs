//! Round-robin fixture generation (circle method).
//!
//! Participant 0 stays fixed while the remaining entrants rotate through
//! `n - 1` rounds. An odd field gets a bye entrant to even the count;
//! fixtures involving the bye are discarded, leaving each real participant
//! exactly one idle round.

/// One round of index pairings into the participant list.
pub type Round = Vec<(usize, usize)>;

/// All rounds for a field of `n` participants, bye fixtures removed.
///
/// For `n >= 2` the rounds cover every unordered pair exactly once,
/// `n * (n - 1) / 2` pairings in total.
pub fn round_robin_rounds(n: usize) -> Vec<Round> {
    if n < 2 {
        return Vec::new();
    }

    // Bye entrant evens the field; its pairings are dropped below.
    let bye = if n % 2 == 0 { None } else { Some(n) };
    let field = n + usize::from(bye.is_some());

    let num_rounds = field - 1;
    let half = field / 2;
    let rest_len = field - 1;

    let mut rounds = Vec::with_capacity(num_rounds);
    for round in 0..num_rounds {
        let mut pairings = Round::with_capacity(half);

        // Entrant 0 is fixed; everyone else lives at rotated positions
        // 1..=rest_len, addressed below as offsets into that group.
        let opposite = 1 + round % rest_len;
        push_unless_bye(&mut pairings, bye, 0, opposite);

        for i in 1..half {
            let a = 1 + (round + rest_len - i) % rest_len;
            let b = 1 + (round + i) % rest_len;
            push_unless_bye(&mut pairings, bye, a, b);
        }

        rounds.push(pairings);
    }
    rounds
}

/// The flattened fixture list, in round order.
pub fn round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    round_robin_rounds(n).into_iter().flatten().collect()
}

fn push_unless_bye(pairings: &mut Round, bye: Option<usize>, a: usize, b: usize) {
    if bye == Some(a) || bye == Some(b) {
        return;
    }
    pairings.push((a, b));
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn unordered(a: usize, b: usize) -> (usize, usize) {
        if a < b { (a, b) } else { (b, a) }
    }

    #[test]
    fn two_participants_meet_once() {
        assert_eq!(round_robin_pairings(2), vec![(0, 1)]);
    }

    #[test]
    fn degenerate_fields_produce_no_fixtures() {
        assert!(round_robin_pairings(0).is_empty());
        assert!(round_robin_pairings(1).is_empty());
    }

    #[test]
    fn even_field_has_n_minus_one_rounds_of_half_n_pairings() {
        let rounds = round_robin_rounds(6);
        assert_eq!(rounds.len(), 5);
        for round in &rounds {
            assert_eq!(round.len(), 3);
        }
    }

    #[test]
    fn odd_field_gives_each_round_one_idle_participant() {
        let rounds = round_robin_rounds(5);
        assert_eq!(rounds.len(), 5);
        for round in &rounds {
            assert_eq!(round.len(), 2);
        }
    }

    #[test]
    fn no_participant_plays_twice_in_one_round() {
        for n in 2..12 {
            for round in round_robin_rounds(n) {
                let mut seen = HashSet::new();
                for (a, b) in round {
                    assert!(seen.insert(a));
                    assert!(seen.insert(b));
                }
            }
        }
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Every unordered pair appears exactly once: C(n, 2) fixtures.
            #[test]
            fn covers_every_pair_exactly_once(n in 2usize..32) {
                let pairings = round_robin_pairings(n);
                prop_assert_eq!(pairings.len(), n * (n - 1) / 2);

                let unique: HashSet<_> = pairings
                    .iter()
                    .map(|&(a, b)| unordered(a, b))
                    .collect();
                prop_assert_eq!(unique.len(), pairings.len());
            }

            /// No fixture references the bye entrant; all indices are real.
            #[test]
            fn never_references_the_bye(n in 2usize..32) {
                for (a, b) in round_robin_pairings(n) {
                    prop_assert!(a < n);
                    prop_assert!(b < n);
                    prop_assert_ne!(a, b);
                }
            }

            /// Each participant is scheduled exactly n - 1 times, odd or even.
            #[test]
            fn every_participant_plays_everyone(n in 2usize..32) {
                let mut appearances = vec![0usize; n];
                for (a, b) in round_robin_pairings(n) {
                    appearances[a] += 1;
                    appearances[b] += 1;
                }
                for count in appearances {
                    prop_assert_eq!(count, n - 1);
                }
            }
        }
    }
}
