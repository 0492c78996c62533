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

//! Constructive operators: geometry in, geometry out
//!
//! Each operator delegates to the geometry engine and serializes the result
//! back to the canonical column encoding.

use geo::{Centroid, ConvexHull, CoordsIter, Simplify};
use geo_types::{Geometry, MultiPoint, Point};
use polars::prelude::*;
use tellus_geometry::bounds::wkb_bounds_xy;
use tellus_geometry::error::TellusGeometryError;
use tellus_geometry::wkb_factory::{wkb_geometry, wkb_point, wkb_polygon};

use crate::executor::parse_geometry;

fn to_compute_err(e: TellusGeometryError) -> PolarsError {
    polars_err!(ComputeError: "failed to write WKB geometry: {e}")
}

fn unary_geometry<F>(wkb: &BinaryChunked, op: F) -> PolarsResult<BinaryChunked>
where
    F: Fn(&Geometry<f64>) -> PolarsResult<Option<Vec<u8>>>,
{
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => match parse_geometry(buf)? {
            Some(geom) => op(&geom),
            None => Ok(None),
        },
        None => Ok(None),
    })
}

/// Centroid as a POINT; null for geometries without one
pub fn centroid(wkb: &BinaryChunked) -> PolarsResult<BinaryChunked> {
    unary_geometry(wkb, |geom| match geom.centroid() {
        Some(point) => Ok(Some(wkb_point((point.x(), point.y())).map_err(to_compute_err)?)),
        None => Ok(None),
    })
}

/// Axis-aligned bounding geometry: a POLYGON, or a POINT when degenerate
///
/// Works straight off the WKB bytes; null for empty geometries.
pub fn envelope(wkb: &BinaryChunked) -> PolarsResult<BinaryChunked> {
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => {
            let bounds = wkb_bounds_xy(buf)
                .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
            let Some(rect) = bounds.to_rect() else {
                return Ok(None);
            };

            let (min, max) = (rect.min(), rect.max());
            let out = if min == max {
                wkb_point((min.x, min.y))
            } else {
                wkb_polygon(
                    [
                        (min.x, min.y),
                        (max.x, min.y),
                        (max.x, max.y),
                        (min.x, max.y),
                        (min.x, min.y),
                    ]
                    .into_iter(),
                )
            }
            .map_err(to_compute_err)?;
            Ok(Some(out))
        }
        None => Ok(None),
    })
}

/// Convex hull as a POLYGON
pub fn convex_hull(wkb: &BinaryChunked) -> PolarsResult<BinaryChunked> {
    unary_geometry(wkb, |geom| {
        let points: Vec<Point<f64>> = geom.coords_iter().map(Point::from).collect();
        if points.is_empty() {
            return Ok(None);
        }

        let hull = MultiPoint::new(points).convex_hull();
        Ok(Some(
            wkb_geometry(&Geometry::Polygon(hull)).map_err(to_compute_err)?,
        ))
    })
}

/// Ramer-Douglas-Peucker simplification
///
/// Puntal geometries and collections pass through unchanged, the way the
/// engine defines simplification only for lineal and areal types.
pub fn simplify(wkb: &BinaryChunked, tolerance: f64) -> PolarsResult<BinaryChunked> {
    unary_geometry(wkb, move |geom| {
        let simplified = match geom {
            Geometry::LineString(ls) => Geometry::LineString(ls.simplify(&tolerance)),
            Geometry::MultiLineString(mls) => Geometry::MultiLineString(mls.simplify(&tolerance)),
            Geometry::Polygon(polygon) => Geometry::Polygon(polygon.simplify(&tolerance)),
            Geometry::MultiPolygon(mp) => Geometry::MultiPolygon(mp.simplify(&tolerance)),
            other => other.clone(),
        };
        Ok(Some(wkb_geometry(&simplified).map_err(to_compute_err)?))
    })
}
