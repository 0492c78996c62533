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

//! Shared plumbing for lifting per-geometry kernels over Binary columns
//!
//! Operators parse each canonical WKB value, hand it to the geometry
//! engine, and never look inside the bytes themselves. A malformed WKB
//! value is an error; a WKB value the engine cannot materialize (e.g. an
//! empty point) behaves like null. Elementwise iteration and length-1
//! broadcasting are the host engine's `arity` kernels, used directly by
//! each operator.

use geo_traits::to_geo::ToGeoGeometry;
use geo_types::Geometry;
use polars::prelude::*;
use wkb::reader::Wkb;

/// Parse one canonical WKB value
pub(crate) fn parse_wkb(buf: &[u8]) -> PolarsResult<Wkb<'_>> {
    wkb::reader::read_wkb(buf)
        .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))
}

/// Materialize one canonical WKB value for the geometry engine
///
/// Returns `None` for well-formed WKB that has no materialized form.
pub(crate) fn parse_geometry(buf: &[u8]) -> PolarsResult<Option<Geometry<f64>>> {
    Ok(parse_wkb(buf)?.try_to_geometry())
}
