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
use geo_traits::{
    CoordTrait, GeometryCollectionTrait, GeometryTrait, GeometryType, LineStringTrait,
    MultiLineStringTrait, MultiPointTrait, MultiPolygonTrait, PointTrait, PolygonTrait,
};
use geo_types::{coord, Rect};

use crate::{error::TellusGeometryError, interval::Interval};

/// Cartesian XY bounding box of a geometry
///
/// An empty geometry (or one containing only empty parts) has empty x and y
/// intervals. Z and M coordinates that may be present are ignored: the
/// canonical geometry columns this crate serves are indexed in XY only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x: Interval,
    y: Interval,
}

impl BoundingBox {
    /// Create a BoundingBox from per-axis intervals
    pub fn xy(x: impl Into<Interval>, y: impl Into<Interval>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Create a BoundingBox covering no values
    pub fn empty() -> Self {
        Self {
            x: Interval::empty(),
            y: Interval::empty(),
        }
    }

    /// The x interval
    pub fn x(&self) -> &Interval {
        &self.x
    }

    /// The y interval
    pub fn y(&self) -> &Interval {
        &self.y
    }

    /// True if this box covers no values on either axis
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty()
    }

    /// True if this box shares at least one point with `other`
    pub fn intersects(&self, other: &Self) -> bool {
        self.x.intersects_interval(&other.x) && self.y.intersects_interval(&other.y)
    }

    /// This box as a [Rect], or None if it is empty
    pub fn to_rect(&self) -> Option<Rect<f64>> {
        if self.is_empty() {
            return None;
        }

        Some(Rect::new(
            coord! { x: self.x.lo(), y: self.y.lo() },
            coord! { x: self.x.hi(), y: self.y.hi() },
        ))
    }
}

/// Calculate the Cartesian XY bounds of a well-known binary geometry blob
pub fn wkb_bounds_xy(wkb_value: &[u8]) -> Result<BoundingBox, TellusGeometryError> {
    let wkb =
        wkb::reader::read_wkb(wkb_value).map_err(|e| TellusGeometryError::External(Box::new(e)))?;
    geo_traits_bounds_xy(wkb)
}

/// Calculate the Cartesian XY bounds of anything implementing [GeometryTrait]
pub fn geo_traits_bounds_xy(
    geom: impl GeometryTrait<T = f64>,
) -> Result<BoundingBox, TellusGeometryError> {
    let mut x = Interval::empty();
    let mut y = Interval::empty();
    geo_traits_update_xy_bounds(geom, &mut x, &mut y)?;
    Ok(BoundingBox::xy(x, y))
}

fn geo_traits_update_xy_bounds(
    geom: impl GeometryTrait<T = f64>,
    x: &mut Interval,
    y: &mut Interval,
) -> Result<(), TellusGeometryError> {
    match geom.as_type() {
        GeometryType::Point(pt) => {
            if let Some(coord) = PointTrait::coord(pt) {
                x.update_value(coord.x());
                y.update_value(coord.y());
            }
        }
        GeometryType::LineString(ls) => {
            for coord in ls.coords() {
                x.update_value(coord.x());
                y.update_value(coord.y());
            }
        }
        GeometryType::Polygon(pl) => {
            if let Some(exterior) = pl.exterior() {
                for coord in exterior.coords() {
                    x.update_value(coord.x());
                    y.update_value(coord.y());
                }
            }

            for interior in pl.interiors() {
                for coord in interior.coords() {
                    x.update_value(coord.x());
                    y.update_value(coord.y());
                }
            }
        }
        GeometryType::MultiPoint(multi_pt) => {
            for pt in multi_pt.points() {
                geo_traits_update_xy_bounds(pt, x, y)?;
            }
        }
        GeometryType::MultiLineString(multi_ls) => {
            for ls in multi_ls.line_strings() {
                geo_traits_update_xy_bounds(ls, x, y)?;
            }
        }
        GeometryType::MultiPolygon(multi_pl) => {
            for pl in multi_pl.polygons() {
                geo_traits_update_xy_bounds(pl, x, y)?;
            }
        }
        GeometryType::GeometryCollection(collection) => {
            for geom in collection.geometries() {
                geo_traits_update_xy_bounds(geom, x, y)?;
            }
        }
        _ => {
            return Err(TellusGeometryError::Invalid(
                "GeometryType not supported for XY bounds".to_string(),
            ))
        }
    }

    Ok(())
}
