use super::*;

const H: u64 = 0x1234_5678_9abc_def0;

fn mv() -> Move {
    Move::new(12, 28)
}

#[test]
fn test_exact_entry_is_returned_unconditionally() {
    let mut tt = TranspositionTable::main(10);
    tt.store(H, 37, 6, Some(mv()), NodeType::Exact, 0);
    for depth in 0..=6 {
        // Window does not matter for an exact score
        let probe = tt.probe(H, depth, 500, 600, 0);
        assert_eq!(probe.score, Some(37), "depth {depth}");
        assert_eq!(probe.best_move, Some(mv()));
    }
    // Deeper request: no score, still a move hint
    let probe = tt.probe(H, 7, -100, 100, 0);
    assert_eq!(probe.score, None);
    assert_eq!(probe.best_move, Some(mv()));
}

#[test]
fn test_bounds_only_usable_when_they_settle_the_window() {
    let mut tt = TranspositionTable::main(10);
    tt.store(H, 50, 4, None, NodeType::LowerBound, 0);
    assert_eq!(tt.probe(H, 4, 0, 40, 0).score, Some(50));
    assert_eq!(tt.probe(H, 4, 0, 60, 0).score, None);

    tt.store(H, -20, 4, None, NodeType::UpperBound, 0);
    assert_eq!(tt.probe(H, 4, -10, 10, 0).score, Some(-20));
    assert_eq!(tt.probe(H, 4, -30, 10, 0).score, None);
}

#[test]
fn test_miss_on_unknown_hash() {
    let mut tt = TranspositionTable::main(10);
    tt.store(H, 1, 1, None, NodeType::Exact, 0);
    assert_eq!(tt.probe(H ^ (1 << 40), 0, -1, 1, 0), Probe::default());
    assert!(tt.get(H).is_some());
}

#[test]
fn test_same_hash_overwrites_in_place() {
    let mut tt = TranspositionTable::new(4, 2);
    tt.store(H, 1, 3, None, NodeType::Exact, 0);
    tt.store(H, 2, 1, None, NodeType::UpperBound, 0);
    let entry = tt.get(H).unwrap();
    assert_eq!(entry.score, 2);
    assert_eq!(entry.depth, 1);
    assert_eq!(tt.slots.iter().flatten().count(), 1);
}

#[test]
fn test_replacement_prefers_old_and_shallow_entries() {
    // One bucket of two slots, every hash collides
    let mut tt = TranspositionTable::new(0, 2);
    tt.store(1, 0, 8, None, NodeType::Exact, 0);
    tt.store(2, 0, 1, None, NodeType::Exact, 0);

    // New depth 5: shallow entry 2 loses
    tt.store(3, 0, 5, None, NodeType::Exact, 0);
    assert!(tt.get(1).is_some());
    assert!(tt.get(2).is_none());
    assert!(tt.get(3).is_some());

    // After enough searches the deep entry is stale and goes first
    for _ in 0..5 {
        tt.increment_age();
    }
    tt.store(3, 0, 5, None, NodeType::Exact, 0);
    tt.store(4, 0, 2, None, NodeType::Exact, 0);
    assert!(tt.get(1).is_none());
    assert!(tt.get(3).is_some());
    assert!(tt.get(4).is_some());
}

#[test]
fn test_mate_scores_are_node_relative() {
    // Mate found three plies below a node at ply 2: five plies from the root
    let score = MATE_SCORE - 5;
    assert_eq!(score_to_tt(score, 2), MATE_SCORE - 3);
    assert_eq!(score_from_tt(score_to_tt(score, 2), 4), MATE_SCORE - 7);
    assert_eq!(score_to_tt(-score, 2), -(MATE_SCORE - 3));
    assert_eq!(score_to_tt(250, 9), 250);

    let mut tt = TranspositionTable::main(8);
    tt.store(H, -score, 3, None, NodeType::Exact, 2);
    assert_eq!(tt.probe(H, 3, 0, 1, 6).score, Some(-(MATE_SCORE - 9)));
}

#[test]
fn test_clear_and_hashfull() {
    let mut tt = TranspositionTable::new(2, 2);
    assert_eq!(tt.capacity(), 8);
    assert_eq!(tt.hashfull(), 0);
    for h in 0..4u64 {
        tt.store(h, 0, 1, None, NodeType::Exact, 0);
    }
    assert_eq!(tt.hashfull(), 500);
    tt.increment_age();
    tt.clear();
    assert_eq!(tt.hashfull(), 0);
    assert_eq!(tt.age(), 0);
}

#[test]
#[should_panic(expected = "bucket size")]
fn test_rejects_oversized_buckets() {
    TranspositionTable::new(4, 9);
}
