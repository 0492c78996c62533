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

use crate::index::SpatialIndex;
use crate::options::{INDEX_LEFT, INDEX_RIGHT};
use crate::spatial_predicate::SpatialPredicate;

/// Fixed name of the predicate evaluator function and of the struct column
/// it returns
pub const SJOIN_FUNCTION_NAME: &str = "sjoin";

/// Name of the left field of the evaluator's output struct
const FIELD_LEFT_INDEX: &str = "left_index";

/// Name of the right field of the evaluator's output struct
const FIELD_RIGHT_INDEX: &str = "right_index";

/// Compute the candidate match set between two geometry columns
///
/// The columns are compared in full (every left geometry against every right
/// geometry, through a spatial index over the left side); their relative
/// lengths carry no meaning. Returns one `(left_index, right_index)` pair
/// per geometric match, flattened, in probe order on the right and row
/// order on the left within each probe. Duplicates are not removed and the
/// output may map one row to many counterparties on either side.
pub fn candidate_matches(
    left: &BinaryChunked,
    right: &BinaryChunked,
    predicate: SpatialPredicate,
) -> PolarsResult<(UInt32Chunked, UInt32Chunked)> {
    let index = SpatialIndex::try_new(left, predicate)?;

    let mut left_indices: Vec<u32> = Vec::new();
    let mut right_indices: Vec<u32> = Vec::new();
    let mut matches: Vec<u32> = Vec::new();

    if !index.is_empty() {
        for (right_row, value) in right.iter().enumerate() {
            let Some(buf) = value else {
                continue;
            };

            matches.clear();
            index.query(buf, &mut matches)?;

            let right_row_u32: u32 = right_row
                .try_into()
                .map_err(|_| polars_err!(ComputeError: "geometry column too long"))?;
            left_indices.extend_from_slice(&matches);
            right_indices.extend(std::iter::repeat(right_row_u32).take(matches.len()));
        }
    }

    log::debug!(
        "spatial predicate {predicate} produced {} candidate pairs",
        left_indices.len()
    );

    Ok((
        UInt32Chunked::from_vec(PlSmallStr::from_static(FIELD_LEFT_INDEX), left_indices),
        UInt32Chunked::from_vec(PlSmallStr::from_static(FIELD_RIGHT_INDEX), right_indices),
    ))
}

/// The predicate evaluator as an expression over two packed geometry columns
///
/// This is the foreign-function boundary of the join: two geometry
/// expressions in, one struct column out, with one row per candidate match
/// and two u32 fields holding the source row positions. The row pairing of
/// the two inputs is transport only; the evaluator compares the full
/// columns.
pub fn sjoin_expr(left: Expr, right: Expr, predicate: SpatialPredicate) -> Expr {
    apply_multiple(
        move |columns: &mut [Column]| {
            let left = columns[0].as_materialized_series().binary()?;
            let right = columns[1].as_materialized_series().binary()?;
            let (left_index, right_index) = candidate_matches(left, right, predicate)?;

            let num_matches = left_index.len();
            let out = StructChunked::from_columns(
                PlSmallStr::from_static(SJOIN_FUNCTION_NAME),
                num_matches,
                &[left_index.into_column(), right_index.into_column()],
            )?;
            Ok(Some(out.into_column()))
        },
        [left, right],
        GetOutput::from_type(DataType::Struct(vec![
            Field::new(PlSmallStr::from_static(FIELD_LEFT_INDEX), DataType::UInt32),
            Field::new(PlSmallStr::from_static(FIELD_RIGHT_INDEX), DataType::UInt32),
        ])),
        false,
    )
    .alias(SJOIN_FUNCTION_NAME)
}

/// Unpack the evaluator's struct column into the two reserved index columns
///
/// No filtering, deduplication, or reordering happens here; the candidate
/// set goes to the relational joins exactly as reported.
pub fn candidate_index_exprs() -> [Expr; 2] {
    [
        col(SJOIN_FUNCTION_NAME)
            .struct_()
            .field_by_index(0)
            .alias(INDEX_LEFT),
        col(SJOIN_FUNCTION_NAME)
            .struct_()
            .field_by_index(1)
            .alias(INDEX_RIGHT),
    ]
}
