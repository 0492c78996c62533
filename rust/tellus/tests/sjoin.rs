// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use polars::prelude::*;
use rstest::rstest;
use tellus::{GeoDataFrame, SjoinArgs, SpatialJoinError, SpatialPredicate};
use tellus_testing::create::{geometry_frame, geometry_series};

/// Two points: A at the origin, B at (5, 5)
fn points() -> GeoDataFrame {
    GeoDataFrame::new(geometry_frame(
        &["A", "B"],
        &[Some("POINT (0 0)"), Some("POINT (5 5)")],
    ))
}

/// Two polygons: X covering the origin, Y covering (9, 9)
fn polygons() -> GeoDataFrame {
    GeoDataFrame::new(geometry_frame(
        &["X", "Y"],
        &[
            Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))"),
            Some("POLYGON ((8 8, 10 8, 10 10, 8 10, 8 8))"),
        ],
    ))
}

/// The `(id, id_right)` pairs of a result, sorted for comparison
fn id_pairs(df: &GeoDataFrame) -> Vec<(Option<String>, Option<String>)> {
    let left = df
        .as_df()
        .column("id")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect::<Vec<_>>();
    let right = df
        .as_df()
        .column("id_right")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect::<Vec<_>>();
    let mut pairs: Vec<_> = left.into_iter().zip(right).collect();
    pairs.sort();
    pairs
}

fn pair(left: &str, right: &str) -> (Option<String>, Option<String>) {
    (Some(left.to_string()), Some(right.to_string()))
}

#[rstest]
#[case(JoinType::Inner)]
#[case(JoinType::Left)]
#[case(JoinType::Full)]
fn cross_join_always_fails(#[case] how: JoinType) {
    // `how` is what matters; cross must fail no matter what else is passed
    let args = SjoinArgs::default()
        .with_how(JoinType::Cross)
        .with_predicate(SpatialPredicate::Touches)
        .with_suffix("_other")
        .with_validation(JoinValidation::OneToOne);
    let err = points().sjoin(&polygons(), args).unwrap_err();
    assert!(matches!(err, SpatialJoinError::UnsupportedJoinKind(_)));

    // ...while the same arguments with a supported kind are accepted
    let args = SjoinArgs::default().with_how(how);
    assert!(points().sjoin(&polygons(), args).is_ok());
}

#[test]
fn cross_join_fails_lazily_too() {
    let args = SjoinArgs::default().with_how(JoinType::Cross);
    let err = points()
        .lazy()
        .sjoin(polygons().lazy(), &args)
        .unwrap_err();
    assert!(matches!(err, SpatialJoinError::UnsupportedJoinKind(_)));
}

#[test]
fn unknown_predicate_names_fail() {
    for name in ["", "dwithin", "INTERSECTS", "intersect"] {
        let err = SpatialPredicate::from_name(name).unwrap_err();
        assert!(matches!(err, SpatialJoinError::UnknownPredicate(_)));
    }
}

#[test]
fn join_key_defaults_to_the_configured_geometry_column() {
    // Geometry lives in a column polars would never guess; only the
    // configured name connects them
    let left = df!["id" => ["A", "B"]]
        .unwrap()
        .hstack(&[geometry_series(
            "shape",
            &[Some("POINT (0 0)"), Some("POINT (5 5)")],
        )
        .into()])
        .unwrap();
    let right = df!["id" => ["X"]]
        .unwrap()
        .hstack(&[geometry_series(
            "shape",
            &[Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))")],
        )
        .into()])
        .unwrap();

    let left = GeoDataFrame::new(left).with_geometry_column("shape");
    let right = GeoDataFrame::new(right).with_geometry_column("shape");

    let out = left.sjoin(&right, SjoinArgs::default()).unwrap();
    assert_eq!(out.as_df().height(), 1);
}

#[test]
fn self_join_matches_every_row() {
    let frame = points();
    let out = frame.sjoin(&frame, SjoinArgs::default()).unwrap();
    // Every geometry intersects itself, so inner self-joins lose nothing
    assert!(out.as_df().height() >= frame.as_df().height());
}

#[test]
fn inner_join_concrete_scenario() {
    let out = points().sjoin(&polygons(), SjoinArgs::default()).unwrap();
    assert_eq!(id_pairs(&out), vec![pair("A", "X")]);
}

#[test]
fn left_join_preserves_unmatched_left_rows() {
    let args = SjoinArgs::default().with_how(JoinType::Left);
    let out = points().sjoin(&polygons(), args).unwrap();
    assert_eq!(
        id_pairs(&out),
        vec![(Some("B".to_string()), None), pair("A", "X")]
    );
}

#[test]
fn full_join_preserves_both_sides() {
    let args = SjoinArgs::default().with_how(JoinType::Full);
    let out = points().sjoin(&polygons(), args).unwrap();
    assert_eq!(
        id_pairs(&out),
        vec![
            (None, Some("Y".to_string())),
            (Some("B".to_string()), None),
            pair("A", "X"),
        ]
    );
}

#[test]
fn right_join_preserves_right_rows() {
    let args = SjoinArgs::default().with_how(JoinType::Right);
    let out = points().sjoin(&polygons(), args).unwrap();
    let df = out.as_df();
    assert_eq!(df.height(), 2);
    // Both right rows are present; B is gone
    let right_ids: Vec<Option<&str>> = df
        .column("id_right")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .iter()
        .collect();
    let mut right_ids: Vec<_> = right_ids.into_iter().flatten().collect();
    right_ids.sort();
    assert_eq!(right_ids, vec!["X", "Y"]);
}

#[test]
fn semi_and_anti_joins() {
    let args = SjoinArgs::default().with_how(JoinType::Semi);
    let out = points().sjoin(&polygons(), args).unwrap();
    let df = out.as_df();
    assert_eq!(df.height(), 1);
    // Semi joins keep the left schema only
    assert!(df.column("id_right").is_err());

    let args = SjoinArgs::default().with_how(JoinType::Anti);
    let out = points().sjoin(&polygons(), args).unwrap();
    assert_eq!(out.as_df().height(), 1);
}

#[test]
fn cardinality_violation_with_one_to_one() {
    // Both points fall in one polygon: the right row index appears twice
    // in the candidate set
    let left = points();
    let right = GeoDataFrame::new(geometry_frame(
        &["X"],
        &[Some("POLYGON ((-1 -1, 6 -1, 6 6, -1 6, -1 -1))")],
    ));

    let args = SjoinArgs::default().with_validation(JoinValidation::OneToOne);
    let err = left.sjoin(&right, args).unwrap_err();
    assert!(matches!(err, SpatialJoinError::CardinalityViolation(_)));

    // The same match set passes as many-to-many
    let out = left.sjoin(&right, SjoinArgs::default()).unwrap();
    assert_eq!(out.as_df().height(), 2);
}

#[test]
fn many_to_many_multiplicities_are_preserved() {
    // One point inside two overlapping polygons, joined twice
    let left = GeoDataFrame::new(geometry_frame(&["A"], &[Some("POINT (0 0)")]));
    let right = GeoDataFrame::new(geometry_frame(
        &["X", "Y"],
        &[
            Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))"),
            Some("POLYGON ((-2 -2, 2 -2, 2 2, -2 2, -2 -2))"),
        ],
    ));
    let out = left.sjoin(&right, SjoinArgs::default()).unwrap();
    assert_eq!(id_pairs(&out), vec![pair("A", "X"), pair("A", "Y")]);
}

#[test]
fn colliding_columns_take_the_suffix() {
    let left = geometry_frame(&["A"], &[Some("POINT (0 0)")])
        .lazy()
        .with_column(lit("left name").alias("name"))
        .collect()
        .unwrap();
    let right = geometry_frame(&["X"], &[Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))")])
        .lazy()
        .with_column(lit("right name").alias("name"))
        .collect()
        .unwrap();

    let out = GeoDataFrame::new(left)
        .sjoin(&GeoDataFrame::new(right), SjoinArgs::default())
        .unwrap();
    let names = out.as_df().get_column_names();
    assert!(names.iter().any(|n| n.as_str() == "name"));
    assert!(names.iter().any(|n| n.as_str() == "name_right"));

    // A caller-supplied suffix is honored, including on the dropped
    // synthetic key duplicates
    let left = GeoDataFrame::new(
        geometry_frame(&["A"], &[Some("POINT (0 0)")])
            .lazy()
            .with_column(lit("left name").alias("name"))
            .collect()
            .unwrap(),
    );
    let right = GeoDataFrame::new(
        geometry_frame(&["X"], &[Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))")])
            .lazy()
            .with_column(lit("right name").alias("name"))
            .collect()
            .unwrap(),
    );
    let out = left
        .sjoin(&right, SjoinArgs::default().with_suffix("_b"))
        .unwrap();
    let names = out.as_df().get_column_names();
    assert!(names.iter().any(|n| n.as_str() == "name_b"));
    assert!(!names.iter().any(|n| n.starts_with("_sjoin_")));
}

#[test]
fn predicate_selects_the_matches() {
    // B's point lies on the boundary of this polygon: it touches but is
    // not contained
    let left = points();
    let right = GeoDataFrame::new(geometry_frame(
        &["X"],
        &[Some("POLYGON ((5 5, 7 5, 7 7, 5 7, 5 5))")],
    ));

    let args = SjoinArgs::default().with_predicate(SpatialPredicate::Touches);
    let out = left.sjoin(&right, args).unwrap();
    assert_eq!(id_pairs(&out), vec![pair("B", "X")]);

    let args = SjoinArgs::default().with_predicate(SpatialPredicate::Within);
    let out = left.sjoin(&right, args).unwrap();
    assert!(id_pairs(&out).is_empty());

    let args = SjoinArgs::default().with_predicate(SpatialPredicate::CoveredBy);
    let out = left.sjoin(&right, args).unwrap();
    assert_eq!(id_pairs(&out), vec![pair("B", "X")]);
}

#[test]
fn null_geometries_join_like_unmatched_rows() {
    let left = GeoDataFrame::new(geometry_frame(
        &["A", "B"],
        &[Some("POINT (0 0)"), None],
    ));
    let out = left
        .sjoin(
            &polygons(),
            SjoinArgs::default().with_how(JoinType::Left),
        )
        .unwrap();
    assert_eq!(
        id_pairs(&out),
        vec![(Some("B".to_string()), None), pair("A", "X")]
    );
}

#[test]
fn lazy_and_eager_agree() {
    let eager = points().sjoin(&polygons(), SjoinArgs::default()).unwrap();
    let lazy = points()
        .lazy()
        .sjoin(polygons().lazy(), &SjoinArgs::default())
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(id_pairs(&eager), id_pairs(&lazy));
}

#[test]
fn explicit_left_and_right_keys() {
    let left = df!["id" => ["A"]]
        .unwrap()
        .hstack(&[geometry_series("geom_a", &[Some("POINT (0 0)")]).into()])
        .unwrap();
    let right = df!["id" => ["X"]]
        .unwrap()
        .hstack(&[geometry_series(
            "geom_b",
            &[Some("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))")],
        )
        .into()])
        .unwrap();

    let args = SjoinArgs::default()
        .with_left_on(col("geom_a"))
        .with_right_on(col("geom_b"));
    let out = GeoDataFrame::new(left)
        .sjoin(&GeoDataFrame::new(right), args)
        .unwrap();
    assert_eq!(out.as_df().height(), 1);
}
