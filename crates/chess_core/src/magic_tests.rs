use super::*;

fn assert_every_subset_indexes_its_attacks(
    slider: Slider,
    entries: &[MagicEntry],
    table: &[Bitboard],
) {
    for sq in 0..64u8 {
        let entry = entries[sq as usize];
        let mask = slider.relevant_mask(sq);
        assert_eq!(entry.mask, mask);
        for i in 0..1usize << mask.popcount() {
            let occ = occupancy_subset(i, mask);
            assert_eq!(
                table[entry.index(occ)],
                slider.slow_attacks(sq, occ),
                "{slider:?} on {sq}, subset {i}"
            );
        }
    }
}

#[test]
fn test_every_blocker_subset_reads_back_its_attacks() {
    let tables = &*SLIDERS;
    assert_every_subset_indexes_its_attacks(Slider::Bishop, &tables.bishop, &tables.attacks);
    assert_every_subset_indexes_its_attacks(Slider::Rook, &tables.rook, &tables.attacks);
}

#[test]
fn test_tables_are_rebuilt_identically() {
    let a = SliderTables::build();
    let b = SliderTables::build();
    let magics = |t: &SliderTables| -> Vec<u64> {
        t.bishop.iter().chain(&t.rook).map(|e| e.magic).collect()
    };
    assert_eq!(magics(&a), magics(&b));
}

#[test]
fn test_find_magic_rejects_destructive_collisions() {
    let mask = Slider::Rook.relevant_mask(0);
    let bits = mask.popcount();
    let occupancies: Vec<Bitboard> = (0..1usize << bits)
        .map(|i| occupancy_subset(i, mask))
        .collect();
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| rook_attacks_slow(0, occ))
        .collect();
    let mut rng = StdRng::seed_from_u64(99);
    let magic = find_magic(mask, bits, &occupancies, &reference, &mut rng);

    let shift = 64 - bits;
    let mut slots = vec![None; occupancies.len()];
    for (occ, &attack) in occupancies.iter().zip(&reference) {
        let idx = (occ.0.wrapping_mul(magic) >> shift) as usize;
        match slots[idx] {
            None => slots[idx] = Some(attack),
            Some(stored) => assert_eq!(stored, attack, "subsets sharing slot {idx} disagree"),
        }
    }
}
