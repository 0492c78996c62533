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
use std::fmt;
use std::str::FromStr;

use geo::{Contains, Intersects, Relate, Within};
use geo_types::Geometry;
use polars::prelude::{polars_err, PolarsResult};

use crate::error::SpatialJoinError;

/// The spatial relationship a join matches on
///
/// [SpatialPredicate::IntersectsBbox] matches on bounding-box overlap alone
/// (the candidate filter with no refinement); every other predicate refines
/// bounding-box candidates with the corresponding binary relationship,
/// evaluated left-to-right (e.g. `Within` keeps pairs where the left
/// geometry is within the right one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialPredicate {
    IntersectsBbox,
    Intersects,
    Within,
    Contains,
    Overlaps,
    Crosses,
    Touches,
    Covers,
    CoveredBy,
    ContainsProperly,
}

impl SpatialPredicate {
    /// Resolve a predicate from its external name
    pub fn from_name(name: &str) -> Result<Self, SpatialJoinError> {
        match name {
            "intersects_bbox" => Ok(SpatialPredicate::IntersectsBbox),
            "intersects" => Ok(SpatialPredicate::Intersects),
            "within" => Ok(SpatialPredicate::Within),
            "contains" => Ok(SpatialPredicate::Contains),
            "overlaps" => Ok(SpatialPredicate::Overlaps),
            "crosses" => Ok(SpatialPredicate::Crosses),
            "touches" => Ok(SpatialPredicate::Touches),
            "covers" => Ok(SpatialPredicate::Covers),
            "covered_by" => Ok(SpatialPredicate::CoveredBy),
            "contains_properly" => Ok(SpatialPredicate::ContainsProperly),
            _ => Err(SpatialJoinError::UnknownPredicate(name.to_string())),
        }
    }

    /// Create an evaluator for refining candidate pairs with this predicate
    pub(crate) fn evaluator(&self) -> Box<dyn RelationEvaluator> {
        match self {
            SpatialPredicate::IntersectsBbox => Box::new(IntersectsBboxEvaluator),
            SpatialPredicate::Intersects => Box::new(IntersectsEvaluator),
            SpatialPredicate::Within => Box::new(WithinEvaluator),
            SpatialPredicate::Contains => Box::new(ContainsEvaluator),
            SpatialPredicate::Overlaps => Box::new(OverlapsEvaluator),
            SpatialPredicate::Crosses => Box::new(CrossesEvaluator),
            SpatialPredicate::Touches => Box::new(TouchesEvaluator),
            SpatialPredicate::Covers => Box::new(CoversEvaluator),
            SpatialPredicate::CoveredBy => Box::new(CoveredByEvaluator),
            SpatialPredicate::ContainsProperly => Box::new(ContainsProperlyEvaluator),
        }
    }
}

impl fmt::Display for SpatialPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialPredicate::IntersectsBbox => write!(f, "intersects_bbox"),
            SpatialPredicate::Intersects => write!(f, "intersects"),
            SpatialPredicate::Within => write!(f, "within"),
            SpatialPredicate::Contains => write!(f, "contains"),
            SpatialPredicate::Overlaps => write!(f, "overlaps"),
            SpatialPredicate::Crosses => write!(f, "crosses"),
            SpatialPredicate::Touches => write!(f, "touches"),
            SpatialPredicate::Covers => write!(f, "covers"),
            SpatialPredicate::CoveredBy => write!(f, "covered_by"),
            SpatialPredicate::ContainsProperly => write!(f, "contains_properly"),
        }
    }
}

impl FromStr for SpatialPredicate {
    type Err = SpatialJoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpatialPredicate::from_name(s)
    }
}

/// Evaluator refining a single candidate pair
pub(crate) trait RelationEvaluator: Send + Sync {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool>;
}

/// Bounding boxes already overlapped at the index, so every candidate pair
/// is a match.
struct IntersectsBboxEvaluator;

impl RelationEvaluator for IntersectsBboxEvaluator {
    fn evaluate(&self, _left: &Geometry<f64>, _right: &Geometry<f64>) -> PolarsResult<bool> {
        Ok(true)
    }
}

struct IntersectsEvaluator;

impl RelationEvaluator for IntersectsEvaluator {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
        Ok(left.intersects(right))
    }
}

struct WithinEvaluator;

impl RelationEvaluator for WithinEvaluator {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
        Ok(left.is_within(right))
    }
}

struct ContainsEvaluator;

impl RelationEvaluator for ContainsEvaluator {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
        Ok(left.contains(right))
    }
}

/// JTS/GEOS "contains properly": the right geometry intersects the interior
/// of the left one and touches neither its boundary nor exterior.
const CONTAINS_PROPERLY_PATTERN: &str = "T**FF*FF*";

struct ContainsProperlyEvaluator;

impl RelationEvaluator for ContainsProperlyEvaluator {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
        left.relate(right)
            .matches(CONTAINS_PROPERLY_PATTERN)
            .map_err(|e| polars_err!(ComputeError: "invalid DE-9IM pattern: {e}"))
    }
}

/// Generate relation evaluators that answer through the DE-9IM matrix
macro_rules! impl_relate_evaluator {
    ($struct_name:ident, $matrix_method:ident) => {
        struct $struct_name;

        impl RelationEvaluator for $struct_name {
            fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
                Ok(left.relate(right).$matrix_method())
            }
        }
    };
}

impl_relate_evaluator!(OverlapsEvaluator, is_overlaps);
impl_relate_evaluator!(CrossesEvaluator, is_crosses);
impl_relate_evaluator!(TouchesEvaluator, is_touches);
impl_relate_evaluator!(CoversEvaluator, is_covers);

/// covered_by(a, b) == covers(b, a)
struct CoveredByEvaluator;

impl RelationEvaluator for CoveredByEvaluator {
    fn evaluate(&self, left: &Geometry<f64>, right: &Geometry<f64>) -> PolarsResult<bool> {
        Ok(right.relate(left).is_covers())
    }
}
