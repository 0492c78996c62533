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
use std::io::Write;

use geo_types::Geometry;

use crate::error::TellusGeometryError;

/// Create WKB representing a POINT
///
/// A convenience wrapper for [write_wkb_point] that creates a Vec, which is
/// useful for building Binary columns one value at a time.
pub fn wkb_point(pt: (f64, f64)) -> Result<Vec<u8>, TellusGeometryError> {
    let mut out_wkb = Vec::with_capacity(21);
    write_wkb_point(&mut out_wkb, pt)?;
    Ok(out_wkb)
}

/// Write WKB representing a POINT into a buffer
pub fn write_wkb_point(buf: &mut impl Write, pt: (f64, f64)) -> Result<(), TellusGeometryError> {
    buf.write_all(&[0x01, 0x01, 0x00, 0x00, 0x00])?;
    buf.write_all(&pt.0.to_le_bytes())?;
    buf.write_all(&pt.1.to_le_bytes())?;
    Ok(())
}

/// Create WKB representing a LINESTRING
pub fn wkb_linestring<I: ExactSizeIterator<Item = (f64, f64)>>(
    pts: I,
) -> Result<Vec<u8>, TellusGeometryError> {
    let mut out_wkb = Vec::with_capacity(5 + 4 + pts.len() * 16);
    write_wkb_linestring(&mut out_wkb, pts)?;
    Ok(out_wkb)
}

/// Write WKB representing a LINESTRING into a buffer
pub fn write_wkb_linestring<I: ExactSizeIterator<Item = (f64, f64)>>(
    buf: &mut impl Write,
    pts: I,
) -> Result<(), TellusGeometryError> {
    let size_u32: u32 = pts.len().try_into()?;

    buf.write_all(&[0x01, 0x02, 0x00, 0x00, 0x00])?;
    buf.write_all(&size_u32.to_le_bytes())?;
    for pt in pts {
        buf.write_all(&pt.0.to_le_bytes())?;
        buf.write_all(&pt.1.to_le_bytes())?;
    }

    Ok(())
}

/// Create WKB representing a POLYGON with a single exterior ring
pub fn wkb_polygon<I: ExactSizeIterator<Item = (f64, f64)>>(
    pts: I,
) -> Result<Vec<u8>, TellusGeometryError> {
    let mut out_wkb = Vec::with_capacity(5 + 8 + pts.len() * 16);
    write_wkb_polygon(&mut out_wkb, pts)?;
    Ok(out_wkb)
}

/// Write WKB representing a POLYGON with a single exterior ring into a buffer
///
/// An empty `pts` writes a POLYGON with zero rings.
pub fn write_wkb_polygon<I: ExactSizeIterator<Item = (f64, f64)>>(
    buf: &mut impl Write,
    pts: I,
) -> Result<(), TellusGeometryError> {
    let size_u32: u32 = pts.len().try_into()?;

    buf.write_all(&[0x01, 0x03, 0x00, 0x00, 0x00])?;
    if size_u32 == 0 {
        buf.write_all(&0_u32.to_le_bytes())?;
        return Ok(());
    }

    buf.write_all(&1_u32.to_le_bytes())?;
    buf.write_all(&size_u32.to_le_bytes())?;
    for pt in pts {
        buf.write_all(&pt.0.to_le_bytes())?;
        buf.write_all(&pt.1.to_le_bytes())?;
    }

    Ok(())
}

/// Serialize a materialized [Geometry] to WKB
///
/// Constructive operators that hand back geo-types output use this to return
/// to the canonical column encoding (little-endian ISO WKB).
pub fn wkb_geometry(geom: &Geometry<f64>) -> Result<Vec<u8>, TellusGeometryError> {
    let mut out_wkb = Vec::new();
    wkb::writer::write_geometry(
        &mut out_wkb,
        geom,
        &wkb::writer::WriteOptions {
            endianness: wkb::Endianness::LittleEndian,
        },
    )
    .map_err(|e| TellusGeometryError::External(Box::new(e)))?;
    Ok(out_wkb)
}
