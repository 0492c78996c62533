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

//! The operators as column expressions
//!
//! Every eager kernel of this crate is exposed as an `Expr` combinator so
//! geometry operations compose with the host engine's lazy query plans.

use polars::prelude::*;

use crate::{constructive, measures, predicates, serialize};

fn binary_series(columns: &[Column]) -> PolarsResult<(&BinaryChunked, &BinaryChunked)> {
    let left = columns[0].as_materialized_series().binary()?;
    let right = columns[1].as_materialized_series().binary()?;
    Ok((left, right))
}

macro_rules! binary_predicate_expr {
    ($name:ident) => {
        pub fn $name(left: Expr, right: Expr) -> Expr {
            map_multiple(
                |columns: &mut [Column]| {
                    let (left, right) = binary_series(columns)?;
                    Ok(Some(predicates::$name(left, right)?.into_column()))
                },
                [left, right],
                GetOutput::from_type(DataType::Boolean),
            )
        }
    };
}

binary_predicate_expr!(intersects);
binary_predicate_expr!(disjoint);
binary_predicate_expr!(contains);
binary_predicate_expr!(contains_properly);
binary_predicate_expr!(within);
binary_predicate_expr!(covers);
binary_predicate_expr!(covered_by);
binary_predicate_expr!(touches);
binary_predicate_expr!(crosses);
binary_predicate_expr!(overlaps);
binary_predicate_expr!(equals);
binary_predicate_expr!(intersects_bbox);

pub fn dwithin(left: Expr, right: Expr, distance: f64) -> Expr {
    map_multiple(
        move |columns: &mut [Column]| {
            let (left, right) = binary_series(columns)?;
            Ok(Some(
                predicates::dwithin(left, right, distance)?.into_column(),
            ))
        },
        [left, right],
        GetOutput::from_type(DataType::Boolean),
    )
}

pub fn distance(left: Expr, right: Expr) -> Expr {
    map_multiple(
        |columns: &mut [Column]| {
            let (left, right) = binary_series(columns)?;
            Ok(Some(measures::distance(left, right)?.into_column()))
        },
        [left, right],
        GetOutput::from_type(DataType::Float64),
    )
}

macro_rules! unary_expr {
    ($name:ident, $module:ident, $output:expr) => {
        pub fn $name(expr: Expr) -> Expr {
            expr.map(
                |column: Column| {
                    let wkb = column.as_materialized_series().binary()?;
                    Ok(Some($module::$name(wkb)?.into_column()))
                },
                GetOutput::from_type($output),
            )
        }
    };
}

unary_expr!(area, measures, DataType::Float64);
unary_expr!(length, measures, DataType::Float64);
unary_expr!(centroid, constructive, DataType::Binary);
unary_expr!(envelope, constructive, DataType::Binary);
unary_expr!(convex_hull, constructive, DataType::Binary);
unary_expr!(to_wkt, serialize, DataType::String);
unary_expr!(to_geojson, serialize, DataType::String);

pub fn simplify(expr: Expr, tolerance: f64) -> Expr {
    expr.map(
        move |column: Column| {
            let wkb = column.as_materialized_series().binary()?;
            Ok(Some(
                constructive::simplify(wkb, tolerance)?.into_column(),
            ))
        },
        GetOutput::from_type(DataType::Binary),
    )
}

pub fn bounds(expr: Expr) -> Expr {
    expr.map(
        |column: Column| {
            let wkb = column.as_materialized_series().binary()?;
            Ok(Some(measures::bounds(wkb)?.into_column()))
        },
        GetOutput::from_type(DataType::Struct(vec![
            Field::new(PlSmallStr::from_static("xmin"), DataType::Float64),
            Field::new(PlSmallStr::from_static("ymin"), DataType::Float64),
            Field::new(PlSmallStr::from_static("xmax"), DataType::Float64),
            Field::new(PlSmallStr::from_static("ymax"), DataType::Float64),
        ])),
    )
}
