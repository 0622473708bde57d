//! Builds draws that realize a hit count decided before any ball is shown.

use keno_types::keno::{Draw, Selection, BOARD_SIZE, DRAW_SIZE};

use crate::rng::GameRng;

/// Ten distinct numbers containing exactly `hits` members of `selection`, in random order.
///
/// `hits` is clamped to the selection size.
pub fn build_draw(selection: &Selection, hits: u8, rng: &mut GameRng) -> Draw {
    debug_assert!((hits as usize) <= selection.len(), "hits exceed selection");
    let hits = (hits as usize).min(selection.len()).min(DRAW_SIZE);

    let mut numbers = rng.sample(selection.numbers(), hits);
    numbers.extend(rng.sample(&selection.complement(), DRAW_SIZE - hits));
    rng.shuffle(&mut numbers);

    let mut out = [0u8; DRAW_SIZE];
    out.copy_from_slice(&numbers);
    Draw::from_distinct(out)
}

/// Ten numbers drawn uniformly from the whole board.
pub fn uniform_draw(rng: &mut GameRng) -> Draw {
    let board: Vec<u8> = (1..=BOARD_SIZE).collect();
    let mut numbers = rng.sample(&board, DRAW_SIZE);
    rng.shuffle(&mut numbers);

    let mut out = [0u8; DRAW_SIZE];
    out.copy_from_slice(&numbers);
    Draw::from_distinct(out)
}

/// Number of selected values that appear in `draw`.
pub fn count_hits(selection: &Selection, draw: &Draw) -> u8 {
    draw.hits_against(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keno_types::keno::MAX_PICKS;
    use proptest::prelude::*;

    #[test]
    fn test_build_draw_realizes_hits() {
        let mut rng = GameRng::new(5, 0);
        let selection = Selection::new(&[1, 2, 3, 4, 5]).expect("valid");
        for hits in 0..=5 {
            let draw = build_draw(&selection, hits, &mut rng);
            assert_eq!(count_hits(&selection, &draw), hits);
            assert!(Draw::new(*draw.numbers()).is_some());
        }
    }

    #[test]
    fn test_build_draw_ten_picks_all_hit() {
        let mut rng = GameRng::new(5, 0);
        let picks: Vec<u8> = (11..=20).collect();
        let selection = Selection::new(&picks).expect("valid");
        let draw = build_draw(&selection, 10, &mut rng);
        let mut drawn = draw.numbers().to_vec();
        drawn.sort_unstable();
        assert_eq!(drawn, picks);
    }

    #[test]
    fn test_build_draw_empty_selection() {
        let mut rng = GameRng::new(5, 0);
        let draw = build_draw(&Selection::empty(), 0, &mut rng);
        assert_eq!(draw.hits_against(&Selection::empty()), 0);
    }

    #[test]
    fn test_uniform_draw_is_valid() {
        let mut rng = GameRng::new(8, 0);
        for _ in 0..100 {
            let draw = uniform_draw(&mut rng);
            assert!(Draw::new(*draw.numbers()).is_some());
        }
    }

    #[test]
    fn test_build_draw_deterministic() {
        let selection = Selection::new(&[4, 8, 15, 16, 23, 40]).expect("valid");
        let a = build_draw(&selection, 3, &mut GameRng::new(99, 2));
        let b = build_draw(&selection, 3, &mut GameRng::new(99, 2));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_build_draw_exact_hits(
            picks in proptest::sample::subsequence((1..=BOARD_SIZE).collect::<Vec<u8>>(), 1..=MAX_PICKS),
            hits_seed in any::<u8>(),
            seed in any::<u64>(),
        ) {
            let selection = Selection::new(&picks).expect("valid subset");
            let hits = hits_seed % (selection.picks() + 1);
            let draw = build_draw(&selection, hits, &mut GameRng::new(seed, 0));
            prop_assert!(Draw::new(*draw.numbers()).is_some());
            prop_assert_eq!(count_hits(&selection, &draw), hits);
        }
    }
}
