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

//! Geometry-aware frame wrappers
//!
//! A geometry column is an ordinary Binary column holding canonical WKB;
//! the wrappers add the one piece of state the engine cannot derive from
//! the data: which column that is. Eager and lazy wrappers only join with
//! their own kind, which is what makes passing the wrong table abstraction
//! a compile error rather than a runtime one.

use polars::prelude::*;
use tellus_spatial_join::error::classify_join_error;
use tellus_spatial_join::{SjoinArgs, SpatialJoinError};

/// Column name assumed to hold geometry when none is configured
pub const DEFAULT_GEOMETRY_COLUMN: &str = "geometry";

/// An eager table with a configured geometry column
#[derive(Debug, Clone)]
pub struct GeoDataFrame {
    df: DataFrame,
    geometry_column: PlSmallStr,
}

impl GeoDataFrame {
    pub fn new(df: DataFrame) -> Self {
        Self {
            df,
            geometry_column: PlSmallStr::from_static(DEFAULT_GEOMETRY_COLUMN),
        }
    }

    /// Configure which column holds the geometry
    pub fn with_geometry_column(mut self, name: impl Into<PlSmallStr>) -> Self {
        self.geometry_column = name.into();
        self
    }

    pub fn geometry_column(&self) -> &str {
        self.geometry_column.as_str()
    }

    pub fn as_df(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_df(self) -> DataFrame {
        self.df
    }

    /// The lazy counterpart of this frame, keeping its configuration
    pub fn lazy(&self) -> GeoLazyFrame {
        GeoLazyFrame {
            lf: self.df.clone().lazy(),
            geometry_column: self.geometry_column.clone(),
        }
    }

    /// Join another eager table on a spatial predicate
    ///
    /// Runs through the lazy engine and collects; a cardinality violation
    /// raised by the requested `validation` mode surfaces as
    /// [SpatialJoinError::CardinalityViolation].
    pub fn sjoin(&self, other: &GeoDataFrame, args: SjoinArgs) -> Result<Self, SpatialJoinError> {
        let joined = self.lazy().sjoin(other.lazy(), &args)?;
        let df = joined
            .lf
            .collect()
            .map_err(|e| classify_join_error(e, args.validation))?;
        Ok(Self {
            df,
            geometry_column: self.geometry_column.clone(),
        })
    }
}

impl From<DataFrame> for GeoDataFrame {
    fn from(df: DataFrame) -> Self {
        GeoDataFrame::new(df)
    }
}

/// A lazy table with a configured geometry column
#[derive(Clone)]
pub struct GeoLazyFrame {
    pub(crate) lf: LazyFrame,
    geometry_column: PlSmallStr,
}

impl std::fmt::Debug for GeoLazyFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoLazyFrame")
            .field("geometry_column", &self.geometry_column)
            .finish_non_exhaustive()
    }
}

impl GeoLazyFrame {
    pub fn new(lf: LazyFrame) -> Self {
        Self {
            lf,
            geometry_column: PlSmallStr::from_static(DEFAULT_GEOMETRY_COLUMN),
        }
    }

    /// Configure which column holds the geometry
    pub fn with_geometry_column(mut self, name: impl Into<PlSmallStr>) -> Self {
        self.geometry_column = name.into();
        self
    }

    pub fn geometry_column(&self) -> &str {
        self.geometry_column.as_str()
    }

    pub fn as_lf(&self) -> &LazyFrame {
        &self.lf
    }

    pub fn into_lf(self) -> LazyFrame {
        self.lf
    }

    /// Join another lazy table on a spatial predicate
    ///
    /// Argument validation happens eagerly; the join itself executes when
    /// the returned frame is collected, and any error raised there (e.g. a
    /// cardinality violation) surfaces through the host engine's error
    /// type.
    pub fn sjoin(self, other: GeoLazyFrame, args: &SjoinArgs) -> Result<Self, SpatialJoinError> {
        let lf = tellus_spatial_join::sjoin(
            self.lf,
            other.lf,
            self.geometry_column.as_str(),
            other.geometry_column.as_str(),
            args,
        )?;
        Ok(Self {
            lf,
            geometry_column: self.geometry_column,
        })
    }

    /// Execute the plan and wrap the result with this frame's configuration
    pub fn collect(self) -> PolarsResult<GeoDataFrame> {
        let df = self.lf.collect()?;
        Ok(GeoDataFrame {
            df,
            geometry_column: self.geometry_column,
        })
    }
}

impl From<LazyFrame> for GeoLazyFrame {
    fn from(lf: LazyFrame) -> Self {
        GeoLazyFrame::new(lf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_column_configuration() {
        let df = df!["id" => [1, 2]].unwrap();
        let gdf = GeoDataFrame::new(df.clone());
        assert_eq!(gdf.geometry_column(), "geometry");

        let gdf = gdf.with_geometry_column("geom");
        assert_eq!(gdf.geometry_column(), "geom");

        // The configuration survives the eager/lazy boundary
        assert_eq!(gdf.lazy().geometry_column(), "geom");

        let glf = GeoLazyFrame::new(df.lazy());
        assert_eq!(glf.geometry_column(), "geometry");
    }
}
