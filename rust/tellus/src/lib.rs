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

//! tellus: a spatial extension for the polars dataframe engine
//!
//! Geometry columns are Binary columns holding canonical WKB. The crate
//! exposes geometry operators as column expressions (see
//! [`functions::dsl`]) and a predicate-driven spatial join over eager and
//! lazy frames (see [`GeoDataFrame::sjoin`] and [`GeoLazyFrame::sjoin`]).

pub mod frame;

pub use frame::{GeoDataFrame, GeoLazyFrame, DEFAULT_GEOMETRY_COLUMN};
pub use tellus_functions as functions;
pub use tellus_spatial_join::{SjoinArgs, SpatialJoinError, SpatialPredicate};
