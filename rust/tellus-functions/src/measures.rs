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

//! Measures over geometry columns

use geo::{Area, Distance, Euclidean, Length};
use geo_types::{Geometry, Polygon};
use polars::prelude::*;
use tellus_geometry::bounds::wkb_bounds_xy;

use crate::executor::parse_geometry;

/// Cartesian area; zero for puntal and lineal geometries
pub fn area(wkb: &BinaryChunked) -> PolarsResult<Float64Chunked> {
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => Ok(parse_geometry(buf)?.map(|geom| geom.unsigned_area())),
        None => Ok(None),
    })
}

/// Cartesian length; the perimeter for areal geometries, zero for points
pub fn length(wkb: &BinaryChunked) -> PolarsResult<Float64Chunked> {
    arity::try_unary_elementwise(wkb, |value| match value {
        Some(buf) => Ok(parse_geometry(buf)?.map(|geom| geometry_length(&geom))),
        None => Ok(None),
    })
}

/// Cartesian distance between the closest points of each pair
pub fn distance(left: &BinaryChunked, right: &BinaryChunked) -> PolarsResult<Float64Chunked> {
    arity::broadcast_try_binary_elementwise(left, right, |left_value, right_value| {
        match (left_value, right_value) {
            (Some(left_buf), Some(right_buf)) => {
                match (parse_geometry(left_buf)?, parse_geometry(right_buf)?) {
                    (Some(left_geom), Some(right_geom)) => {
                        let euc = Euclidean;
                        Ok(Some(euc.distance(&left_geom, &right_geom)))
                    }
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    })
}

/// XY bounds as a `{xmin, ymin, xmax, ymax}` struct column
///
/// A null or empty geometry yields null fields.
pub fn bounds(wkb: &BinaryChunked) -> PolarsResult<StructChunked> {
    let mut xmin: Vec<Option<f64>> = Vec::with_capacity(wkb.len());
    let mut ymin: Vec<Option<f64>> = Vec::with_capacity(wkb.len());
    let mut xmax: Vec<Option<f64>> = Vec::with_capacity(wkb.len());
    let mut ymax: Vec<Option<f64>> = Vec::with_capacity(wkb.len());

    for value in wkb.iter() {
        let bounds = match value {
            Some(buf) => Some(
                wkb_bounds_xy(buf)
                    .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?,
            ),
            None => None,
        };

        match bounds {
            Some(bounds) if !bounds.is_empty() => {
                xmin.push(Some(bounds.x().lo()));
                ymin.push(Some(bounds.y().lo()));
                xmax.push(Some(bounds.x().hi()));
                ymax.push(Some(bounds.y().hi()));
            }
            _ => {
                xmin.push(None);
                ymin.push(None);
                xmax.push(None);
                ymax.push(None);
            }
        }
    }

    let fields = [
        ("xmin", xmin),
        ("ymin", ymin),
        ("xmax", xmax),
        ("ymax", ymax),
    ]
    .map(|(name, values)| {
        let mut ca: Float64Chunked = values.into_iter().collect();
        ca.rename(name.into());
        ca.into_column()
    });

    StructChunked::from_columns(wkb.name().clone(), wkb.len(), &fields)
}

fn geometry_length(geom: &Geometry<f64>) -> f64 {
    let euc = Euclidean;
    match geom {
        Geometry::Line(line) => euc.length(line),
        Geometry::LineString(ls) => euc.length(ls),
        Geometry::MultiLineString(mls) => euc.length(mls),
        Geometry::Polygon(polygon) => polygon_perimeter(polygon),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(polygon_perimeter).sum(),
        Geometry::Rect(rect) => polygon_perimeter(&rect.to_polygon()),
        Geometry::Triangle(triangle) => polygon_perimeter(&triangle.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            collection.0.iter().map(geometry_length).sum()
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => 0.0,
    }
}

fn polygon_perimeter(polygon: &Polygon<f64>) -> f64 {
    let euc = Euclidean;
    euc.length(polygon.exterior())
        + polygon
            .interiors()
            .iter()
            .map(|ring| euc.length(ring))
            .sum::<f64>()
}
