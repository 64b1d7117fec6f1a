use std::sync::Arc;

use quiver::query::{
    Column, Columns, Operand, Ordering, QueryResults, Schemata, SelectorName, StandardTypeSystem,
    Tuple, TupleSorter, TypeSystem, Value, NEUTRAL_SCORE,
};
use quiver::types::Location;
use quiver::{NullOrdering, QueryConfig, QuiverError, Result};

fn loc(path: &str) -> Location {
    Location::parse(path).expect("valid path")
}

fn types() -> Arc<dyn TypeSystem> {
    Arc::new(StandardTypeSystem::new())
}

fn schemata(types: &Arc<dyn TypeSystem>) -> Result<Schemata> {
    Schemata::builder(Arc::clone(types))
        .add_column("a", "title", "STRING")
        .add_column("a", "rank", "LONG")
        .add_column("b", "size", "LONG")
        .build()
}

/// Two selectors: `a` projects two columns, `b` one, with scoring.
fn two_selector_layout() -> Result<Columns> {
    Columns::new(
        vec![
            Column::named("a", "title"),
            Column::named("a", "rank"),
            Column::named("b", "size"),
        ],
        true,
    )
}

fn bind(orderings: &[Ordering], columns: &Columns, config: &QueryConfig) -> Result<TupleSorter> {
    let types = types();
    let schemata = schemata(&types)?;
    TupleSorter::bind(orderings, columns, &schemata, types, config)
}

#[test]
fn tuple_layout_places_blocks_in_order() -> Result<()> {
    let columns = two_selector_layout()?;
    let a = SelectorName::from("a");
    let b = SelectorName::from("b");
    assert_eq!(columns.tuple_size(), 7);

    let tuple = columns.tuple(
        vec![Value::from("t"), Value::Long(3), Value::Long(42)],
        vec![loc("/x"), loc("/y/z")],
        vec![0.25, 0.75],
    );
    assert_eq!(tuple.len(), 7);
    assert_eq!(tuple[columns.location_index(&a).expect("a")], Value::from(loc("/x")));
    assert_eq!(tuple[columns.location_index(&b).expect("b")], Value::from(loc("/y/z")));
    assert_eq!(columns.score(&tuple, &a), Some(0.25));
    assert_eq!(columns.score(&tuple, &b), Some(0.75));
    assert_eq!(columns.value(&tuple, "size"), Some(&Value::Long(42)));
    Ok(())
}

#[test]
fn join_fills_missing_scores_with_neutral_value() -> Result<()> {
    let left = Columns::new(vec![Column::named("a", "title")], true)?;
    let right = Columns::new(vec![Column::named("b", "size")], false)?;
    let joined = left.join(&right)?;
    assert_eq!(joined.tuple_size(), 6);

    let l = left.tuple(vec![Value::from("t")], vec![loc("/x")], vec![0.5]);
    let r = right.tuple(vec![Value::Long(1)], vec![loc("/y")], vec![]);
    let tuple = joined.join_tuples(&left, &l, &right, &r);
    assert_eq!(joined.score(&tuple, &SelectorName::from("a")), Some(0.5));
    assert_eq!(
        joined.score(&tuple, &SelectorName::from("b")),
        Some(NEUTRAL_SCORE)
    );
    assert_eq!(joined.location(&tuple, &SelectorName::from("b")), Some(&loc("/y")));
    Ok(())
}

#[test]
fn depth_then_property_is_stable() -> Result<()> {
    let columns = Columns::new(
        vec![Column::named("a", "title"), Column::named("a", "rank")],
        false,
    )?;
    let rows = [
        ("/p/q", "deep-2", 2),
        ("/p", "shallow-b", 5),
        ("/r/s", "deep-1", 1),
        ("/s", "shallow-a", 5),
        ("/t", "shallow-c", 4),
    ];
    let tuples: Vec<Tuple> = rows
        .iter()
        .map(|(path, title, rank)| {
            columns.tuple(
                vec![Value::from(*title), Value::Long(*rank)],
                vec![loc(path)],
                vec![],
            )
        })
        .collect();
    let sorter = bind(
        &[
            Ordering::ascending(Operand::NodeDepth("a".into())),
            Ordering::ascending(Operand::property_value("a", "rank")),
        ],
        &columns,
        &QueryConfig::default(),
    )?;
    let mut results = QueryResults::new(Arc::new(columns), tuples);
    results.sort_by(&sorter);

    let titles: Vec<String> = results
        .rows()
        .map(|row| row.value("title").map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(
        titles,
        vec!["shallow-c", "shallow-b", "shallow-a", "deep-1", "deep-2"]
    );
    Ok(())
}

#[test]
fn descending_reverses_nulls_and_values() -> Result<()> {
    let columns = Columns::new(vec![Column::named("a", "rank")], false)?;
    let make = |rank: Option<i64>, path: &str| columns.tuple(vec![rank.into()], vec![loc(path)], vec![]);
    let tuples = vec![make(Some(2), "/two"), make(None, "/none"), make(Some(7), "/seven")];
    let order_of = |sorter: &TupleSorter| {
        let mut sorted = tuples.clone();
        sorter.sort(&mut sorted);
        sorted
            .iter()
            .map(|t| columns.location(t, &SelectorName::from("a")).map(ToString::to_string))
            .collect::<Option<Vec<_>>>()
    };

    let first = QueryConfig::default();
    let last = QueryConfig::default().nulls(NullOrdering::Last);
    let rank = || Operand::property_value("a", "rank");

    let asc = bind(&[Ordering::ascending(rank())], &columns, &first)?;
    assert_eq!(order_of(&asc), Some(vec!["/none".into(), "/two".into(), "/seven".into()]));
    let desc = bind(&[Ordering::descending(rank())], &columns, &first)?;
    assert_eq!(order_of(&desc), Some(vec!["/seven".into(), "/two".into(), "/none".into()]));
    let asc_last = bind(&[Ordering::ascending(rank())], &columns, &last)?;
    assert_eq!(order_of(&asc_last), Some(vec!["/two".into(), "/seven".into(), "/none".into()]));
    Ok(())
}

#[test]
fn score_ordering_requires_scores_at_bind_time() -> Result<()> {
    let unscored = Columns::new(vec![Column::named("a", "title")], false)?;
    let err = bind(
        &[Ordering::descending(Operand::FullTextSearchScore("a".into()))],
        &unscored,
        &QueryConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, QuiverError::Configuration(_)));
    assert_eq!(err.code(), "ConfigurationError");

    let scored = two_selector_layout()?;
    let sorter = bind(
        &[Ordering::descending(Operand::FullTextSearchScore("b".into()))],
        &scored,
        &QueryConfig::default(),
    )?;
    assert_eq!(sorter.key_count(), 1);
    Ok(())
}

#[test]
fn binding_rejects_undeclared_columns_and_unknown_selectors() -> Result<()> {
    let columns = two_selector_layout()?;
    for operand in [
        Operand::property_value("a", "missing"),
        Operand::NodePath("c".into()),
        Operand::length(Operand::property_value("b", "missing")),
    ] {
        let err = bind(&[Ordering::ascending(operand)], &columns, &QueryConfig::default())
            .unwrap_err();
        assert!(matches!(err, QuiverError::Configuration(_)), "{err}");
    }
    Ok(())
}

#[test]
fn joined_layouts_sharing_a_property_sort_by_either_side() -> Result<()> {
    let left_cols = Columns::new(vec![Column::named("a", "title")], false)?;
    let right_cols = Columns::new(vec![Column::named("b", "title")], false)?;
    let joined = left_cols.join(&right_cols)?;

    let rows = [("/l1", "x", "/r1", "beta"), ("/l2", "y", "/r2", "alpha")];
    let tuples: Vec<Tuple> = rows
        .iter()
        .map(|(lp, lt, rp, rt)| {
            let left = left_cols.tuple(vec![Value::from(*lt)], vec![loc(lp)], vec![]);
            let right = right_cols.tuple(vec![Value::from(*rt)], vec![loc(rp)], vec![]);
            joined.join_tuples(&left_cols, &left, &right_cols, &right)
        })
        .collect();

    let types = types();
    let schemata = Schemata::builder(Arc::clone(&types))
        .add_column("a", "title", "STRING")
        .add_column("b", "title", "STRING")
        .build()?;
    let sorter = TupleSorter::bind(
        &[Ordering::ascending(Operand::property_value("b", "title"))],
        &joined,
        &schemata,
        types,
        &QueryConfig::default(),
    )?;
    let mut results = QueryResults::new(Arc::new(joined), tuples);
    results.sort_by(&sorter);

    let a = SelectorName::from("a");
    let lefts: Vec<Option<&Location>> = results.rows().map(|row| row.location(&a)).collect();
    assert_eq!(lefts, vec![Some(&loc("/l2")), Some(&loc("/l1"))]);
    Ok(())
}
