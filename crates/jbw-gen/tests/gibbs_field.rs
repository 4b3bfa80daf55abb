use jbw_core::{Position, SplitMix64};
use jbw_gen::gibbs::conditional_distribution;
use jbw_gen::{
    CellUpdate, EnergyModel, GibbsField, IntensityFn, InteractionFn, ItemCatalog, ItemType,
    PatchMap, PatchStore,
};

fn catalog_with_constants(values: &[f64]) -> ItemCatalog {
    let types = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            ItemType::new(format!("item{i}"), vec![i as f32], values.len())
                .with_intensity(IntensityFn::Constant { value: *v })
        })
        .collect();
    ItemCatalog::new(types).expect("valid catalog")
}

fn softmax_with_empty(values: &[f64]) -> Vec<f64> {
    let mut logits = values.to_vec();
    logits.push(0.0);
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|v| (v - max).exp()).collect();
    let z: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / z).collect()
}

#[test]
fn constant_intensities_give_softmax_marginals() {
    let constants = [0.5, -1.0, 1.0];
    let catalog = catalog_with_constants(&constants);
    let expected = softmax_with_empty(&constants);

    let mut map = PatchMap::new(4, catalog.len());
    map.get_or_create(Position::ORIGIN);
    let patches = [Position::ORIGIN];
    let mut rng = SplitMix64::new(2024);

    let sweeps = 2000usize;
    let cells = 16usize;
    let mut totals = vec![0usize; constants.len() + 1];
    let mut empty_per_cell = vec![0usize; cells];

    for _ in 0..sweeps {
        GibbsField::new(&mut map, &catalog, &patches).sample(&mut rng);
        for x in 0..4 {
            for y in 0..4 {
                let p = Position::new(x, y);
                match map.item_at(p) {
                    Some(t) => totals[t] += 1,
                    None => {
                        totals[constants.len()] += 1;
                        empty_per_cell[(x * 4 + y) as usize] += 1;
                    }
                }
            }
        }
    }

    let n = (sweeps * cells) as f64;
    let chi_square: f64 = totals
        .iter()
        .zip(&expected)
        .map(|(observed, p)| {
            let e = n * p;
            (*observed as f64 - e).powi(2) / e
        })
        .sum();
    // df = 3; p = 0.001 critical value is 16.27.
    assert!(chi_square < 16.27, "chi-square {chi_square} for counts {totals:?}");

    let empty_p = expected[constants.len()];
    for (cell, count) in empty_per_cell.iter().enumerate() {
        let freq = *count as f64 / sweeps as f64;
        assert!(
            (freq - empty_p).abs() < 0.06,
            "cell {cell} empty frequency {freq} vs {empty_p}"
        );
    }
}

#[test]
fn conditional_matches_softmax_without_interactions() {
    let constants = [2.0, -3.0];
    let catalog = catalog_with_constants(&constants);
    let mut map = PatchMap::new(8, catalog.len());
    map.get_or_create(Position::ORIGIN);
    map.insert_item(Position::new(1, 1), 0);
    map.insert_item(Position::new(5, 2), 1);

    let expected = softmax_with_empty(&constants);
    let mut probs = Vec::new();
    for p in [Position::new(0, 0), Position::new(7, 7), Position::new(1, 1)] {
        conditional_distribution(&map, &catalog, p, &mut probs).expect("cell has a patch");
        for (a, b) in probs.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn reproducing_the_occupant_leaves_patch_untouched() {
    // Type 0 is effectively certain; every cell already holds it.
    let catalog = catalog_with_constants(&[60.0]);
    let mut map = PatchMap::new(4, 1);
    for x in 0..4 {
        for y in 0..4 {
            assert!(map.insert_item(Position::new(x, y), 0));
        }
    }
    let before = map.patch(Position::ORIGIN).cloned().expect("patch");

    let patches = [Position::ORIGIN];
    let mut rng = SplitMix64::new(1);
    let stats = GibbsField::new(&mut map, &catalog, &patches).sample(&mut rng);

    assert_eq!(stats.changed, 0);
    assert_eq!(map.patch(Position::ORIGIN), Some(&before));
}

#[test]
fn sample_cell_reports_the_transition() {
    let catalog = catalog_with_constants(&[-60.0, 60.0]);
    let mut map = PatchMap::new(2, 2);
    map.insert_item(Position::new(0, 0), 0);

    let mut rng = SplitMix64::new(3);
    let mut scratch = Vec::new();
    let update = jbw_gen::gibbs::sample_cell(
        &mut map,
        &catalog,
        &mut rng,
        Position::new(0, 0),
        &mut scratch,
    );

    assert_eq!(
        update,
        CellUpdate::Changed {
            from: Some(0),
            to: Some(1)
        }
    );
    assert_eq!(map.item_at(Position::new(0, 0)), Some(1));
    let patch = map.patch(Position::ORIGIN).expect("patch");
    assert!(patch.items(0).is_empty());
    assert_eq!(patch.items(1), &[Position::new(0, 0)]);
}

#[test]
fn interaction_sum_ignores_enumeration_order() {
    let mut catalog = catalog_with_constants(&[-1.0, 0.5]);
    let repel = InteractionFn::PiecewiseBox {
        first_cutoff: 4.0,
        second_cutoff: 40.0,
        first_value: -3.0,
        second_value: 0.25,
    };
    catalog.set_interaction(0, 0, repel.clone()).expect("set");
    catalog.set_interaction(0, 1, repel.clone()).expect("set");
    catalog.set_interaction(1, 0, repel).expect("set");
    let spread = InteractionFn::custom(|a, b, _, _| 0.01 * (a - b).squared_length() as f64);
    catalog.set_interaction(1, 1, spread).expect("set");

    let items = [
        (Position::new(1, 2), 0),
        (Position::new(6, 7), 1),
        (Position::new(-3, 4), 0),
        (Position::new(2, -5), 1),
        (Position::new(7, 0), 0),
        (Position::new(-1, -1), 1),
    ];

    let mut forward = PatchMap::new(8, 2);
    let mut backward = PatchMap::new(8, 2);
    for key in [(-1, -1), (-1, 0), (0, -1), (0, 0)] {
        forward.get_or_create(Position::new(key.0, key.1));
        backward.get_or_create(Position::new(key.0, key.1));
    }
    for (p, t) in items {
        assert!(forward.insert_item(p, t));
    }
    for (p, t) in items.iter().rev() {
        assert!(backward.insert_item(*p, *t));
    }

    let mut a = Vec::new();
    let mut b = Vec::new();
    for cell in [Position::new(0, 0), Position::new(1, 2), Position::new(3, 3)] {
        let ca = conditional_distribution(&forward, &catalog, cell, &mut a).expect("patch");
        let cb = conditional_distribution(&backward, &catalog, cell, &mut b).expect("patch");
        assert_eq!(ca, cb);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-12, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn later_cells_see_earlier_updates_in_the_same_sweep() {
    // Touching items repel hard; an isolated cell is almost surely filled.
    let mut catalog = catalog_with_constants(&[20.0]);
    catalog
        .set_interaction(
            0,
            0,
            InteractionFn::PiecewiseBox {
                first_cutoff: 3.0,
                second_cutoff: 3.0,
                first_value: -100.0,
                second_value: 0.0,
            },
        )
        .expect("set");

    let mut map = PatchMap::new(6, 1);
    map.get_or_create(Position::ORIGIN);
    let patches = [Position::ORIGIN];
    let mut rng = SplitMix64::new(11);
    GibbsField::new(&mut map, &catalog, &patches).sample(&mut rng);

    let items: Vec<Position> = map.items().map(|(_, p)| p).collect();
    assert!(!items.is_empty());
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            assert!((*a - *b).squared_length() >= 3, "{a} and {b} are adjacent");
        }
    }
    // The first visited cell is always filled.
    assert_eq!(map.item_at(Position::ORIGIN), Some(0));
}

#[test]
fn neighborhood_picks_the_nearest_two_by_two_block() {
    let mut map = PatchMap::new(4, 1);
    for key in [(0, 0), (-1, 0), (0, -1), (-1, -1), (1, 1)] {
        map.get_or_create(Position::new(key.0, key.1));
    }

    let lower_left = map.neighborhood(Position::new(1, 1));
    assert_eq!(
        lower_left.patch_positions(),
        &[
            Position::new(-1, -1),
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(0, 0)
        ]
    );
    assert_eq!(lower_left.containing_index(), Some(3));

    let upper_right = map.neighborhood(Position::new(3, 3));
    assert_eq!(
        upper_right.patch_positions(),
        &[Position::new(0, 0), Position::new(1, 1)]
    );
    assert_eq!(upper_right.containing(), Some(Position::ORIGIN));

    let missing = map.neighborhood(Position::new(40, 40));
    assert!(missing.is_empty());
    assert_eq!(missing.containing(), None);
}

#[test]
fn generate_around_fixes_patches_once() {
    let catalog = catalog_with_constants(&[-1.0, -2.0]);
    let mut map = PatchMap::new(4, catalog.len());
    let mut rng = SplitMix64::new(5);

    let first = map.generate_around(Position::ORIGIN, 2, &catalog, &mut rng, 3);
    assert!(first.new_patches > 0);
    assert_eq!(first.sampled_patches, first.new_patches);
    assert!(map.patches().all(|(_, p)| p.is_fixed()));

    let snapshot: Vec<_> = map.items().collect();
    let again = map.generate_around(Position::new(1, 1), 2, &catalog, &mut rng, 3);
    assert_eq!(again.new_patches, 0);
    assert_eq!(again.sampled_patches, 0);
    assert_eq!(map.items().collect::<Vec<_>>(), snapshot);

    let moved = map.generate_around(Position::new(12, 0), 2, &catalog, &mut rng, 3);
    assert!(moved.new_patches > 0);
    assert_eq!(catalog.item_type_count(), map.item_type_count());
}

#[test]
fn unknown_patches_are_skipped() {
    let catalog = catalog_with_constants(&[0.0]);
    let mut map = PatchMap::new(2, 1);
    let patches = [Position::new(9, 9)];
    let mut rng = SplitMix64::new(0);
    let stats = GibbsField::new(&mut map, &catalog, &patches).sample(&mut rng);
    assert_eq!(stats.cells, 0);
    assert_eq!(map.patch_count(), 0);
}
