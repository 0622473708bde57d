use super::*;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn test_selection_sorts_and_validates() {
    let selection = Selection::new(&[7, 3, 40, 1]).expect("valid selection");
    assert_eq!(selection.numbers(), &[1, 3, 7, 40]);
    assert_eq!(selection.picks(), 4);
    assert!(selection.contains(40));
    assert!(!selection.contains(2));
    assert_eq!(selection.complement().len(), 36);
}

#[test]
fn test_selection_rejects_bad_input() {
    assert_eq!(Selection::new(&[]), Err(SelectionError::Empty));
    assert_eq!(
        Selection::new(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
        Err(SelectionError::TooMany { got: 11, max: 10 })
    );
    assert_eq!(
        Selection::new(&[0, 5]),
        Err(SelectionError::OutOfRange { number: 0, max: 40 })
    );
    assert_eq!(
        Selection::new(&[41]),
        Err(SelectionError::OutOfRange { number: 41, max: 40 })
    );
    assert_eq!(
        Selection::new(&[9, 4, 9]),
        Err(SelectionError::Duplicate { number: 9 })
    );
    assert!(Selection::with_empty(&[]).expect("empty allowed").is_empty());
}

#[test]
fn test_selection_serde_validates() {
    let selection: Selection = serde_json::from_str("[5, 1, 3]").expect("valid json");
    assert_eq!(selection.numbers(), &[1, 3, 5]);
    assert!(serde_json::from_str::<Selection>("[5, 5]").is_err());
    assert!(serde_json::from_str::<Selection>("[50]").is_err());
}

#[test]
fn test_draw_validation_and_views() {
    let draw = Draw::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).expect("valid draw");
    assert_eq!(draw.preview(), [1, 2, 3, 4, 5]);
    assert_eq!(draw.remainder(), &[6, 7, 8, 9, 10]);
    let selection = Selection::new(&[2, 9, 30]).expect("valid selection");
    assert_eq!(draw.hits_against(&selection), 2);

    assert!(Draw::new([1, 1, 3, 4, 5, 6, 7, 8, 9, 10]).is_none());
    assert!(Draw::new([0, 2, 3, 4, 5, 6, 7, 8, 9, 10]).is_none());
    assert!(Draw::new([41, 2, 3, 4, 5, 6, 7, 8, 9, 10]).is_none());
}

#[test]
fn test_paytable_exact_before_minimum() {
    let mut rows = BTreeMap::new();
    rows.insert(
        8,
        vec![
            PayRule::MinHit { hits: 6, mult: 10 },
            PayRule::ExactHit { hits: 7, mult: 99 },
            PayRule::MinHit { hits: 7, mult: 40 },
        ],
    );
    let table = Paytable::new(rows);
    assert_eq!(table.multiplier(8, 5), 0);
    assert_eq!(table.multiplier(8, 6), 10);
    assert_eq!(table.multiplier(8, 7), 99);
    // 8 hits: no exact row, highest satisfied minimum wins.
    assert_eq!(table.multiplier(8, 8), 40);
}

#[test]
fn test_classic_paytable_minimum_rows() {
    let table = Paytable::classic();
    table.validate().expect("classic table is valid");
    assert_eq!(table.multiplier(8, 7), 40);
    assert_eq!(table.multiplier(8, 8), 40);
    assert_eq!(table.multiplier(10, 10), 40);
    assert_eq!(table.multiplier(10, 3), 0);
    assert_eq!(table.first_paying_hit(9), Some(4));

    // Minimum-hit rows expand to every hit count they cover.
    let rows: Vec<_> = table.paying_rows(8).collect();
    assert_eq!(rows, vec![(3, 1), (4, 3), (5, 7), (6, 16), (7, 40), (8, 40)]);
    assert_eq!(table.paying_rows(10).last(), Some((10, 40)));
    assert_eq!(table.paying_rows(10).count(), 7);
}

#[test]
fn test_bop_paytable_first_paying_hits() {
    let table = Paytable::bop();
    table.validate().expect("bop table is valid");
    assert_eq!(table.first_paying_hit(1), Some(1));
    assert_eq!(table.max_non_paying_hit(1), 0);
    assert_eq!(table.first_paying_hit(5), Some(2));
    assert_eq!(table.max_non_paying_hit(5), 1);
    assert_eq!(table.max_non_paying_hit(10), 3);
    assert_eq!(table.multiplier(10, 10), 200);
    assert_eq!(table.paying_rows(5).count(), 4);
    // Unconfigured pick counts never pay.
    assert_eq!(table.first_paying_hit(0), None);
    assert_eq!(table.max_non_paying_hit(0), 0);
}

#[test]
fn test_paytable_validate_rejects_impossible_rows() {
    let mut rows = BTreeMap::new();
    rows.insert(3, vec![PayRule::ExactHit { hits: 4, mult: 2 }]);
    assert_eq!(
        Paytable::new(rows).validate(),
        Err(ConfigError::PaytableRow { picks: 3, hits: 4 })
    );

    let mut rows = BTreeMap::new();
    rows.insert(11, vec![PayRule::ExactHit { hits: 1, mult: 2 }]);
    assert!(Paytable::new(rows).validate().is_err());
}

#[test]
fn test_tier_spec_derived_levels() {
    let tier = TierSpec::with_default_cap(UNITS_PER_CREDIT);
    assert_eq!(tier.cap, 300 * UNITS_PER_CREDIT);
    assert_eq!(tier.floor(), 45 * UNITS_PER_CREDIT);
    assert_eq!(tier.threshold(), 90 * UNITS_PER_CREDIT);
    assert_eq!(tier.bootstrap(), 75 * UNITS_PER_CREDIT);
    assert_eq!(tier.max_bet(), 2 * UNITS_PER_CREDIT);
}

#[test]
fn test_default_seed_config_is_valid() {
    let config = SeedConfig::default();
    config.validate().expect("defaults are valid");
    assert_eq!(config.tiers.len(), 4);
    assert_eq!(config.tiers[0].cap, 75 * UNITS_PER_CREDIT);
    assert_eq!(config.tiers[3].cap, 600 * UNITS_PER_CREDIT);
}

#[test]
fn test_seed_config_rejections() {
    let mut config = SeedConfig::default();
    config.tiers.clear();
    assert_eq!(config.validate(), Err(ConfigError::NoTiers));

    let mut config = SeedConfig::default();
    config.tiers.push(config.tiers[0]);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicateTier { .. })
    ));

    let mut config = SeedConfig::default();
    config.bop.p_min = 0.5;
    assert_eq!(config.validate(), Err(ConfigError::ProbabilityOrder));

    let mut config = SeedConfig::default();
    config.bop.slices = vec![(1_000, 1), (500, 1)];
    assert_eq!(config.validate(), Err(ConfigError::InvalidSlices));

    let mut config = SeedConfig::default();
    config.bonus.multipliers = vec![(5, 0)];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroWeight { .. })
    ));

    let mut config = SeedConfig::default();
    config.bonus.pool_share_bps = HOUSE_SHARE_BPS + 1;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ShareTooLarge { .. })
    ));

    let mut config = SeedConfig::default();
    config.bonus.early_trigger_p = f64::NAN;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ProbabilityOutOfRange { .. })
    ));
}

#[test]
fn test_seed_config_yaml_partial_override() {
    let yaml = r#"
seed: 7
tiers:
  - stake: 10000
    cap: 3000000
bonus:
  early_trigger_p: 0.0
paytable:
  rows:
    5:
      - kind: exact_hit
        hits: 3
        mult: 2
      - kind: min_hit
        hits: 4
        mult: 10
"#;
    let config: SeedConfig = serde_yaml::from_str(yaml).expect("parse yaml");
    config.validate().expect("valid config");
    assert_eq!(config.seed, 7);
    assert_eq!(config.tiers.len(), 1);
    assert_eq!(config.bonus.early_trigger_p, 0.0);
    assert_eq!(config.bonus.meter_cap, BONUS_METER_CAP);
    assert_eq!(config.bop, BopParams::default());
    assert_eq!(config.paytable.multiplier(5, 5), 10);
}

#[test]
fn test_lifetime_rtp() {
    let mut stats = LifetimeStats::default();
    assert_eq!(stats.rtp(), 0.0);
    stats.record_wager(10_000, 9_400, 100, 300, 200);
    stats.record_payout(5_000);
    stats.record_bonus(2_500);
    assert_eq!(stats.max_payout, 5_000);
    assert_eq!(stats.bonus_rounds, 1);
    assert!((stats.rtp() - 0.75).abs() < 1e-9);
}

#[test]
fn test_bps_of_rounds_down() {
    assert_eq!(bps_of(25, 9_400), 23);
    assert_eq!(bps_of(2_500, 9_400), 2_350);
    assert_eq!(bps_of(u64::MAX, BPS_DENOMINATOR), u64::MAX);
}

proptest! {
    #[test]
    fn prop_selection_accepts_any_distinct_subset(
        picks in proptest::sample::subsequence((1..=BOARD_SIZE).collect::<Vec<u8>>(), 1..=MAX_PICKS)
    ) {
        let selection = Selection::new(&picks).expect("distinct in-range subset");
        prop_assert_eq!(selection.len(), picks.len());
        prop_assert!(selection.numbers().windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(selection.complement().len(), BOARD_SIZE as usize - picks.len());
    }
}
