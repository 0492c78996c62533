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

//! Binary spatial predicates over geometry columns
//!
//! Thin delegation to the geometry engine's relate machinery; a null on
//! either side yields null. A length-1 column broadcasts against the other
//! side.

use geo::{Contains, Distance, Euclidean, Intersects, Relate, Within};
use geo_types::Geometry;
use polars::prelude::*;
use tellus_geometry::bounds::wkb_bounds_xy;

use crate::executor::parse_geometry;

fn binary_predicate<F>(
    left: &BinaryChunked,
    right: &BinaryChunked,
    op: F,
) -> PolarsResult<BooleanChunked>
where
    F: Fn(&Geometry<f64>, &Geometry<f64>) -> PolarsResult<bool>,
{
    arity::broadcast_try_binary_elementwise(left, right, |left_value, right_value| {
        match (left_value, right_value) {
            (Some(left_buf), Some(right_buf)) => {
                match (parse_geometry(left_buf)?, parse_geometry(right_buf)?) {
                    (Some(left_geom), Some(right_geom)) => {
                        op(&left_geom, &right_geom).map(Some)
                    }
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    })
}

pub fn intersects(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.intersects(b)))
}

pub fn disjoint(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(!a.intersects(b)))
}

pub fn contains(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.contains(b)))
}

/// JTS/GEOS "contains properly": see the DE-9IM pattern
pub fn contains_properly(
    left: &BinaryChunked,
    right: &BinaryChunked,
) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| {
        a.relate(b)
            .matches("T**FF*FF*")
            .map_err(|e| polars_err!(ComputeError: "invalid DE-9IM pattern: {e}"))
    })
}

pub fn within(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.is_within(b)))
}

pub fn covers(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.relate(b).is_covers()))
}

/// covered_by(a, b) == covers(b, a)
pub fn covered_by(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(b.relate(a).is_covers()))
}

pub fn touches(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.relate(b).is_touches()))
}

pub fn crosses(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.relate(b).is_crosses()))
}

pub fn overlaps(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.relate(b).is_overlaps()))
}

/// Topological equality, not coordinate-order equality
pub fn equals(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, |a, b| Ok(a.relate(b).is_equal_topo()))
}

/// True when the geometries lie within `distance` of each other
pub fn dwithin(
    left: &BinaryChunked,
    right: &BinaryChunked,
    distance: f64,
) -> PolarsResult<BooleanChunked> {
    binary_predicate(left, right, move |a, b| {
        let euc = Euclidean;
        Ok(euc.distance(a, b) <= distance)
    })
}

/// Bounding-box overlap, without refining against the geometries
///
/// Works straight off the WKB bytes; geometries that cannot be materialized
/// still have boxes, so this is defined wherever the bytes are well formed.
pub fn intersects_bbox(
    left: &BinaryChunked,
    right: &BinaryChunked,
) -> PolarsResult<BooleanChunked> {
    arity::broadcast_try_binary_elementwise(left, right, |left_value, right_value| {
        match (left_value, right_value) {
            (Some(left_buf), Some(right_buf)) => {
                let left_bounds = wkb_bounds_xy(left_buf)
                    .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
                let right_bounds = wkb_bounds_xy(right_buf)
                    .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
                Ok(Some(left_bounds.intersects(&right_bounds)))
            }
            _ => Ok(None),
        }
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tellus_testing::create::binary_chunked;

    use super::*;

    const BOX_0_10: &str = "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))";

    fn eval(
        op: impl Fn(&BinaryChunked, &BinaryChunked) -> PolarsResult<BooleanChunked>,
        left: &str,
        right: &str,
    ) -> Option<bool> {
        let left = binary_chunked("left", &[Some(left)]);
        let right = binary_chunked("right", &[Some(right)]);
        op(&left, &right).unwrap().get(0)
    }

    #[rstest]
    #[case("POINT (5 5)", BOX_0_10, Some(true))]
    #[case("POINT (15 5)", BOX_0_10, Some(false))]
    fn intersects_point_polygon(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Option<bool>,
    ) {
        assert_eq!(eval(intersects, left, right), expected);
        assert_eq!(
            eval(disjoint, left, right),
            expected.map(|value| !value)
        );
    }

    #[test]
    fn containment_family() {
        assert_eq!(eval(contains, BOX_0_10, "POINT (5 5)"), Some(true));
        assert_eq!(eval(contains, BOX_0_10, "POINT (10 5)"), Some(false));
        assert_eq!(eval(covers, BOX_0_10, "POINT (10 5)"), Some(true));
        assert_eq!(eval(within, "POINT (5 5)", BOX_0_10), Some(true));
        assert_eq!(eval(covered_by, "POINT (10 5)", BOX_0_10), Some(true));
        assert_eq!(eval(contains_properly, BOX_0_10, "POINT (5 5)"), Some(true));
        assert_eq!(
            eval(contains_properly, BOX_0_10, "POINT (10 5)"),
            Some(false)
        );
    }

    #[test]
    fn relate_family() {
        assert_eq!(
            eval(touches, BOX_0_10, "POLYGON ((10 0, 20 0, 20 10, 10 10, 10 0))"),
            Some(true)
        );
        assert_eq!(
            eval(crosses, "LINESTRING (-5 5, 15 5)", BOX_0_10),
            Some(true)
        );
        assert_eq!(
            eval(overlaps, BOX_0_10, "POLYGON ((5 5, 15 5, 15 15, 5 15, 5 5))"),
            Some(true)
        );
        assert_eq!(
            eval(equals, BOX_0_10, "POLYGON ((10 0, 10 10, 0 10, 0 0, 10 0))"),
            Some(true)
        );
    }

    #[test]
    fn dwithin_threshold() {
        let left = binary_chunked("left", &[Some("POINT (0 0)")]);
        let right = binary_chunked("right", &[Some("POINT (3 4)")]);
        assert_eq!(dwithin(&left, &right, 5.0).unwrap().get(0), Some(true));
        assert_eq!(dwithin(&left, &right, 4.9).unwrap().get(0), Some(false));
    }

    #[test]
    fn bbox_overlap_ignores_shape() {
        // The diagonal's box covers the point; the line itself does not
        assert_eq!(
            eval(intersects_bbox, "LINESTRING (0 0, 10 10)", "POINT (5 0)"),
            Some(true)
        );
        assert_eq!(
            eval(intersects, "LINESTRING (0 0, 10 10)", "POINT (5 0)"),
            Some(false)
        );
    }

    #[test]
    fn nulls_and_broadcasting() {
        let one = binary_chunked("left", &[Some("POINT (5 5)")]);
        let three = binary_chunked("right", &[Some(BOX_0_10), None, Some("POINT (5 5)")]);
        let out = intersects(&one, &three).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.get(0), Some(true));
        assert_eq!(out.get(1), None);
        assert_eq!(out.get(2), Some(true));
    }
}
