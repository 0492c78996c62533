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

//! Serializers out of the canonical column encoding

use geojson::GeoJson;
use polars::prelude::*;

use crate::executor::{parse_geometry, parse_wkb};

/// Serialize each geometry as WKT
///
/// Written straight off the WKB reader without materializing geometries.
pub fn to_wkt(wkb: &BinaryChunked) -> PolarsResult<StringChunked> {
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => {
            let geom = parse_wkb(buf)?;
            let mut out = String::new();
            wkt::to_wkt::write_geometry(&mut out, &geom)
                .map_err(|e| polars_err!(ComputeError: "failed to write WKT: {e}"))?;
            Ok(Some(out))
        }
        None => Ok(None),
    })
}

/// Serialize each geometry as a GeoJSON geometry object
pub fn to_geojson(wkb: &BinaryChunked) -> PolarsResult<StringChunked> {
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => match parse_geometry(buf)? {
            Some(geom) => {
                let geometry = geojson::Geometry::new(geojson::Value::from(&geom));
                Ok(Some(GeoJson::Geometry(geometry).to_string()))
            }
            None => Ok(None),
        },
        None => Ok(None),
    })
}
