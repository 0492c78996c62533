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

//! Index-mediated spatial join
//!
//! A spatial join has no equi-join key, so the engine manufactures one: the
//! candidate match set reported by the predicate evaluator is a table of
//! `(left_row_index, right_row_index)` pairs, and both inputs are tagged
//! with dense row indices so that two ordinary relational joins can replay
//! the candidate set with the caller's join semantics. The first join is
//! always FULL so that left rows with zero candidates survive long enough
//! for `left`/`full` joins to keep them; the second join applies the
//! caller's `how`, cardinality validation and null handling. The synthetic
//! index columns are dropped before the result is returned.

use polars::prelude::*;

use crate::error::SpatialJoinError;
use crate::evaluate::{candidate_index_exprs, sjoin_expr};
use crate::options::{SjoinArgs, GEOM_LEFT, GEOM_RIGHT, INDEX_LEFT, INDEX_RIGHT, RESERVED_PREFIX};

/// Join two lazy tables on a spatial predicate
///
/// `default_left_on` and `default_right_on` name the geometry column used on
/// each side when `args` carries no key expression. All argument validation
/// happens eagerly; the returned frame executes the join when collected.
pub fn sjoin(
    mut left: LazyFrame,
    mut right: LazyFrame,
    default_left_on: &str,
    default_right_on: &str,
    args: &SjoinArgs,
) -> Result<LazyFrame, SpatialJoinError> {
    validate_join_kind(&args.how)?;
    let (left_on, right_on) = resolve_key_exprs(args, default_left_on, default_right_on)?;

    let left_schema = left.collect_schema()?;
    let right_schema = right.collect_schema()?;
    validate_reserved_names(&left_schema)?;
    validate_reserved_names(&right_schema)?;

    // Pack both geometry columns side by side into one batch. This is the
    // calling convention of the predicate evaluator, not a row pairing: the
    // shorter column is padded with nulls and the evaluator compares the
    // full columns.
    let packed = concat_lf_horizontal(
        [
            left.clone().select([left_on.alias(GEOM_LEFT)]),
            right.clone().select([right_on.alias(GEOM_RIGHT)]),
        ],
        UnionArgs::default(),
    )?;

    let candidates = packed
        .select([sjoin_expr(
            col(GEOM_LEFT),
            col(GEOM_RIGHT),
            args.predicate,
        )])
        .select(candidate_index_exprs());

    let left_indexed = left.with_row_index(PlSmallStr::from_static(INDEX_LEFT), None);
    let right_indexed = right.with_row_index(PlSmallStr::from_static(INDEX_RIGHT), None);

    // FULL join regardless of the requested kind: left rows with zero
    // candidates must survive this step for `left`/`full` joins; for the
    // other kinds the surplus rows are pruned by the second join.
    let intermediate = candidates
        .join_builder()
        .with(left_indexed)
        .on([col(INDEX_LEFT)])
        .how(JoinType::Full)
        .suffix(args.suffix.as_str())
        .coalesce(args.coalesce)
        .allow_parallel(args.allow_parallel)
        .force_parallel(args.force_parallel)
        .finish();

    // The join that carries the caller's relational semantics.
    let joined = intermediate
        .join_builder()
        .with(right_indexed)
        .on([col(INDEX_RIGHT)])
        .how(args.how.clone())
        .validate(args.validation)
        .join_nulls(args.join_nulls)
        .suffix(args.suffix.as_str())
        .coalesce(args.coalesce)
        .allow_parallel(args.allow_parallel)
        .force_parallel(args.force_parallel)
        .finish();

    // Drop the synthetic key columns, including the suffixed duplicates the
    // second argument of an uncoalesced join leaves behind. Exclusion is
    // used because a coalescing join produces no duplicates to drop.
    let drop_names: Vec<PlSmallStr> = vec![
        INDEX_LEFT.into(),
        INDEX_RIGHT.into(),
        format!("{INDEX_LEFT}{}", args.suffix).into(),
        format!("{INDEX_RIGHT}{}", args.suffix).into(),
    ];
    Ok(joined.select([col("*").exclude(drop_names)]))
}

/// Reject join kinds that have no spatial form
///
/// A "cross spatial join" would be an unconditional pairing with the
/// predicate ignored; callers wanting that should use the relational cross
/// join directly. This check runs before any candidate computation.
fn validate_join_kind(how: &JoinType) -> Result<(), SpatialJoinError> {
    match how {
        JoinType::Cross => Err(SpatialJoinError::UnsupportedJoinKind(how.clone())),
        _ => Ok(()),
    }
}

/// Resolve the per-side join key expressions
///
/// `on` wins over `left_on`/`right_on`; with neither given, both sides fall
/// back to their frame's configured geometry column. Either resolved
/// expression expanding to more than one column is rejected.
fn resolve_key_exprs(
    args: &SjoinArgs,
    default_left_on: &str,
    default_right_on: &str,
) -> Result<(Expr, Expr), SpatialJoinError> {
    let (left_on, right_on) = if let Some(on) = &args.on {
        (on.clone(), on.clone())
    } else if let (Some(left_on), Some(right_on)) = (&args.left_on, &args.right_on) {
        (left_on.clone(), right_on.clone())
    } else {
        (col(default_left_on), col(default_right_on))
    };

    if left_on.clone().meta().has_multiple_outputs()
        || right_on.clone().meta().has_multiple_outputs()
    {
        return Err(SpatialJoinError::AmbiguousExpression);
    }

    Ok((left_on, right_on))
}

/// Fail fast if an input table already uses the engine's private namespace
fn validate_reserved_names(schema: &Schema) -> Result<(), SpatialJoinError> {
    for name in schema.iter_names() {
        if name.starts_with(RESERVED_PREFIX) {
            return Err(SpatialJoinError::ReservedNameCollision(name.to_string()));
        }
    }
    Ok(())
}
