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

use crate::spatial_predicate::SpatialPredicate;

/// Private namespace for columns the join engine creates and drops within a
/// single call. Input tables must not contain columns under this prefix; the
/// engine validates this before tagging anything.
pub const RESERVED_PREFIX: &str = "_sjoin_";

/// Reserved name of the dense row index tagged onto the left table
pub const INDEX_LEFT: &str = "_sjoin_index_left";

/// Reserved name of the dense row index tagged onto the right table
pub const INDEX_RIGHT: &str = "_sjoin_index_right";

/// Reserved name of the packed left geometry column handed to the evaluator
pub const GEOM_LEFT: &str = "_sjoin_geom_left";

/// Reserved name of the packed right geometry column handed to the evaluator
pub const GEOM_RIGHT: &str = "_sjoin_geom_right";

/// Arguments for a spatial join
///
/// The relational options (`how`, `validation`, `suffix`, `join_nulls`,
/// `coalesce`, `allow_parallel`, `force_parallel`) are forwarded to the
/// underlying join and keep their meaning there; `predicate` selects the
/// spatial relationship that produces the candidate match set, and
/// `on`/`left_on`/`right_on` select the geometry expressions it compares.
/// When all three key expressions are absent, each side falls back to its
/// frame's configured geometry column.
#[derive(Debug, Clone)]
pub struct SjoinArgs {
    pub on: Option<Expr>,
    pub left_on: Option<Expr>,
    pub right_on: Option<Expr>,
    pub how: JoinType,
    pub predicate: SpatialPredicate,
    pub suffix: PlSmallStr,
    pub validation: JoinValidation,
    pub join_nulls: bool,
    pub coalesce: JoinCoalesce,
    pub allow_parallel: bool,
    pub force_parallel: bool,
}

impl Default for SjoinArgs {
    fn default() -> Self {
        Self {
            on: None,
            left_on: None,
            right_on: None,
            how: JoinType::Inner,
            predicate: SpatialPredicate::Intersects,
            suffix: PlSmallStr::from_static("_right"),
            validation: JoinValidation::ManyToMany,
            join_nulls: false,
            coalesce: JoinCoalesce::JoinSpecific,
            allow_parallel: true,
            force_parallel: false,
        }
    }
}

impl SjoinArgs {
    /// Arguments for a join with the given predicate and defaults otherwise
    pub fn new(predicate: SpatialPredicate) -> Self {
        Self {
            predicate,
            ..Default::default()
        }
    }

    pub fn with_on(mut self, on: Expr) -> Self {
        self.on = Some(on);
        self
    }

    pub fn with_left_on(mut self, left_on: Expr) -> Self {
        self.left_on = Some(left_on);
        self
    }

    pub fn with_right_on(mut self, right_on: Expr) -> Self {
        self.right_on = Some(right_on);
        self
    }

    pub fn with_how(mut self, how: JoinType) -> Self {
        self.how = how;
        self
    }

    pub fn with_predicate(mut self, predicate: SpatialPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<PlSmallStr>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_validation(mut self, validation: JoinValidation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_join_nulls(mut self, join_nulls: bool) -> Self {
        self.join_nulls = join_nulls;
        self
    }

    pub fn with_coalesce(mut self, coalesce: JoinCoalesce) -> Self {
        self.coalesce = coalesce;
        self
    }
}
