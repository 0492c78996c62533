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
use std::str::FromStr;

use polars::prelude::*;
use wkt::Wkt;

/// Create canonical WKB from a WKT literal
///
/// Panics on invalid WKT.
pub fn wkb_value(wkt_value: &str) -> Vec<u8> {
    let geom = Wkt::<f64>::from_str(wkt_value).unwrap();
    let mut out: Vec<u8> = vec![];
    wkb::writer::write_geometry(
        &mut out,
        &geom,
        &wkb::writer::WriteOptions {
            endianness: wkb::Endianness::LittleEndian,
        },
    )
    .unwrap();
    out
}

/// Create a [`BinaryChunked`] geometry column from a sequence of WKT literals
///
/// Panics on invalid WKT.
pub fn binary_chunked(name: &str, wkt_values: &[Option<&str>]) -> BinaryChunked {
    let mut ca: BinaryChunked = wkt_values
        .iter()
        .map(|maybe_wkt| maybe_wkt.map(wkb_value))
        .collect();
    ca.rename(name.into());
    ca
}

/// Create a geometry [`Series`] from a sequence of WKT literals
///
/// Panics on invalid WKT.
pub fn geometry_series(name: &str, wkt_values: &[Option<&str>]) -> Series {
    binary_chunked(name, wkt_values).into_series()
}

/// Create a two-column frame with string ids and a `"geometry"` column
///
/// Panics on invalid WKT or mismatched lengths.
pub fn geometry_frame(ids: &[&str], wkt_values: &[Option<&str>]) -> DataFrame {
    assert_eq!(ids.len(), wkt_values.len());
    let id = Series::new("id".into(), ids);
    let geometry = geometry_series("geometry", wkt_values);
    DataFrame::new(vec![id.into(), geometry.into()]).unwrap()
}
