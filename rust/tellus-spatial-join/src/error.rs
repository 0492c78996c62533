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
use polars::prelude::{JoinType, JoinValidation, PolarsError};
use thiserror::Error;

/// Errors raised by the spatial join engine before or during a join
///
/// Everything except [SpatialJoinError::CardinalityViolation] is detected up
/// front, before any candidate computation; cardinality violations are
/// raised by the underlying relational join when the requested `validation`
/// mode is not satisfied.
#[derive(Error, Debug)]
pub enum SpatialJoinError {
    #[error("use of how = {0:?} is not supported on a spatial join; use a relational join instead")]
    UnsupportedJoinKind(JoinType),
    #[error("spatial join key expressions must return a single output column")]
    AmbiguousExpression,
    #[error("unknown spatial predicate {0:?}")]
    UnknownPredicate(String),
    #[error("column {0:?} collides with the reserved \"_sjoin_\" namespace")]
    ReservedNameCollision(String),
    #[error("join cardinality validation failed: {0}")]
    CardinalityViolation(PolarsError),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Classify an error surfaced while executing the join pipeline
///
/// The underlying relational join reports validation failures as a generic
/// compute error; when the caller requested a `validation` mode that can
/// fail, those are re-raised as [SpatialJoinError::CardinalityViolation].
pub fn classify_join_error(err: PolarsError, validation: JoinValidation) -> SpatialJoinError {
    if !matches!(validation, JoinValidation::ManyToMany) && err.to_string().contains("validation") {
        SpatialJoinError::CardinalityViolation(err)
    } else {
        SpatialJoinError::Polars(err)
    }
}
