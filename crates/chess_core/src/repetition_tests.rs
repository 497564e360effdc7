use super::*;

#[test]
fn push_and_pop_are_symmetric() {
    let mut table = RepetitionTable::new();
    table.push(42);
    table.push(7);
    table.push(42);
    assert_eq!(table.count(42), 2);
    assert_eq!(table.count(7), 1);

    table.pop();
    assert_eq!(table.count(42), 1);
    table.pop();
    assert_eq!(table.count(7), 0);
    table.pop();
    assert_eq!(table.count(42), 0);
    assert!(table.is_empty());
}

#[test]
#[should_panic]
fn pop_on_empty_panics() {
    RepetitionTable::new().pop();
}
