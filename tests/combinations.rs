use stocksieve::combination::{Combinator, combinations, combine, row_count};
use stocksieve::membership::Membership;

fn vector(len: u64, positions: &[u64]) -> Membership {
    let mut membership = Membership::none(len);
    for position in positions {
        membership.insert(*position);
    }
    membership
}

fn setup() -> Vec<Membership> {
    vec![
        vector(8, &[0, 1, 2, 3]),
        vector(8, &[2, 3, 4, 5]),
        vector(8, &[3, 5, 7]),
    ]
}

#[test]
fn index_combinations_are_lexicographic() {
    assert_eq!(
        combinations(4, 2),
        vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 3],
            vec![1, 2],
            vec![1, 3],
            vec![2, 3],
        ]
    );
    assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
    assert!(combinations(2, 3).is_empty());
}

#[test]
fn full_set_and_combination_equals_elementwise_intersection() {
    let vectors = setup();
    let groups = combine(&vectors, Combinator::And);
    let full = &groups.last().expect("full-size group").rows[0];

    let mut manual = vectors[0].clone();
    manual.intersect_with(&vectors[1]);
    manual.intersect_with(&vectors[2]);
    assert_eq!(full.count, manual.count());
    assert_eq!(full.count, 1);
}

#[test]
fn and_subset_counts_never_exceed_any_member() {
    let vectors = setup();
    for group in combine(&vectors, Combinator::And) {
        for (row, indices) in group.rows.iter().zip(combinations(vectors.len(), group.size)) {
            let smallest = indices.iter().map(|i| vectors[*i].count()).min().unwrap();
            assert!(
                row.count <= smallest,
                "{} has count {} above its smallest member {}",
                row.description,
                row.count,
                smallest
            );
        }
    }
}

#[test]
fn total_row_count_matches_the_bound_formula() {
    let vectors = setup();
    let rows: usize = combine(&vectors, Combinator::And)
        .iter()
        .map(|group| group.rows.len())
        .sum();
    assert_eq!(rows as u128, row_count(vectors.len()));
    assert_eq!(row_count(3), 4);
    assert_eq!(row_count(6), 57);
}

#[test]
fn descriptions_join_one_indexed_members() {
    let vectors = setup();
    let groups = combine(&vectors, Combinator::And);
    let descriptions: Vec<&str> = groups[0]
        .rows
        .iter()
        .map(|row| row.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Option 1 and Option 2",
            "Option 1 and Option 3",
            "Option 2 and Option 3",
        ]
    );
    let or_groups = combine(&vectors, Combinator::Or);
    assert_eq!(or_groups[1].rows[0].description, "Option 1 or Option 2 or Option 3");
}

#[test]
fn or_counts_and_percent_use_the_vectors_own_length() {
    let vectors = setup();
    let groups = combine(&vectors, Combinator::Or);
    let pair = &groups[0].rows[0]; // options 1 and 2
    assert_eq!(pair.count, 6);
    assert_eq!(pair.percent, 75.0);
    let full = &groups[1].rows[0];
    assert_eq!(full.count, 7);
    assert_eq!(full.percent, 87.5);
}
