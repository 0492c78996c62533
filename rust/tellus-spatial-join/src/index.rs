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
use geo_index::rtree::util::f64_box_to_f32;
use geo_index::rtree::{sort::HilbertSort, RTree, RTreeBuilder, RTreeIndex};
use geo_traits::to_geo::ToGeoGeometry;
use geo_types::Geometry;
use polars::prelude::*;
use tellus_geometry::bounds::wkb_bounds_xy;

use crate::spatial_predicate::{RelationEvaluator, SpatialPredicate};

/// Packed R-tree over one geometry column, probed with the other
///
/// The build side is parsed once: each non-null, non-empty geometry
/// contributes one f32 bounding box to the tree (rounded outward from f64,
/// so the filter can only over-match) and its materialized geometry is kept
/// for refinement. Null and empty values are not indexed and can never
/// match.
pub(crate) struct SpatialIndex {
    rtree: RTree<f32>,
    /// Translates an rtree data index into a build-side row index
    row_ids: Vec<u32>,
    /// Materialized build-side geometries, by row; None for rows that were
    /// not indexed
    geoms: Vec<Option<Geometry<f64>>>,
    evaluator: Box<dyn RelationEvaluator>,
}

impl SpatialIndex {
    pub(crate) fn try_new(
        build: &BinaryChunked,
        predicate: SpatialPredicate,
    ) -> PolarsResult<Self> {
        let mut geoms: Vec<Option<Geometry<f64>>> = Vec::with_capacity(build.len());
        let mut boxes: Vec<(u32, (f32, f32, f32, f32))> = Vec::new();

        for (row, value) in build.iter().enumerate() {
            let Some(buf) = value else {
                geoms.push(None);
                continue;
            };

            let bounds = wkb_bounds_xy(buf)
                .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
            let wkb = wkb::reader::read_wkb(buf)
                .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
            let geom = wkb.try_to_geometry();

            if let (Some(rect), Some(_)) = (bounds.to_rect(), &geom) {
                let row_u32: u32 = row
                    .try_into()
                    .map_err(|_| polars_err!(ComputeError: "geometry column too long"))?;
                let min = rect.min();
                let max = rect.max();
                boxes.push((row_u32, f64_box_to_f32(min.x, min.y, max.x, max.y)));
            }
            geoms.push(geom);
        }

        let mut rtree_builder = RTreeBuilder::<f32>::new(boxes.len() as u32);
        let mut row_ids = vec![0_u32; boxes.len()];
        for (row, (min_x, min_y, max_x, max_y)) in boxes {
            let data_idx = rtree_builder.add(min_x, min_y, max_x, max_y);
            row_ids[data_idx as usize] = row;
        }
        let rtree = rtree_builder.finish::<HilbertSort>();

        log::debug!(
            "built spatial index over {} of {} build-side rows",
            row_ids.len(),
            build.len()
        );

        Ok(Self {
            rtree,
            row_ids,
            geoms,
            evaluator: predicate.evaluator(),
        })
    }

    /// Number of indexed build-side geometries
    pub(crate) fn len(&self) -> usize {
        self.row_ids.len()
    }

    /// True if no build-side geometry was indexed
    pub(crate) fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// Collect the build-side rows matching one probe geometry
    ///
    /// Matching rows are appended to `matches` in build-row order. A probe
    /// that is empty or cannot be materialized yields no matches.
    pub(crate) fn query(&self, probe_wkb: &[u8], matches: &mut Vec<u32>) -> PolarsResult<()> {
        if self.row_ids.is_empty() {
            return Ok(());
        }

        let bounds = wkb_bounds_xy(probe_wkb)
            .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
        let Some(rect) = bounds.to_rect() else {
            return Ok(());
        };
        let probe = wkb::reader::read_wkb(probe_wkb)
            .map_err(|e| polars_err!(ComputeError: "failed to read WKB geometry: {e}"))?;
        let Some(probe_geom) = probe.try_to_geometry() else {
            return Ok(());
        };

        let (min_x, min_y, max_x, max_y) =
            f64_box_to_f32(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        let mut candidates = self.rtree.search(min_x, min_y, max_x, max_y);
        // Each geometry is indexed by exactly one box; sorting keeps the
        // emitted pairs in build-row order for a given probe.
        candidates.sort_unstable();

        for data_idx in candidates {
            let row = self.row_ids[data_idx as usize];
            if let Some(build_geom) = &self.geoms[row as usize] {
                if self.evaluator.evaluate(build_geom, &probe_geom)? {
                    matches.push(row);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tellus_testing::create::{binary_chunked, wkb_value};

    use super::*;

    #[test]
    fn build_skips_null_and_empty() {
        let build = binary_chunked(
            "geometry",
            &[Some("POINT (0 0)"), None, Some("POINT EMPTY"), Some("POINT (5 5)")],
        );
        let index = SpatialIndex::try_new(&build, SpatialPredicate::Intersects).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn query_refines_candidates() {
        let build = binary_chunked(
            "geometry",
            &[
                Some("POINT (0 0)"),
                Some("POINT (5 5)"),
                Some("LINESTRING (0 0, 10 10)"),
            ],
        );
        let index = SpatialIndex::try_new(&build, SpatialPredicate::Intersects).unwrap();

        let mut matches = Vec::new();
        let probe = wkb_value("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))");
        index.query(&probe, &mut matches).unwrap();
        assert_eq!(matches, vec![0, 2]);
    }

    #[test]
    fn bbox_predicate_keeps_all_candidates() {
        // The box of the diagonal line covers (5, 0) without the line
        // passing through it
        let build = binary_chunked("geometry", &[Some("LINESTRING (0 0, 10 10)")]);
        let index = SpatialIndex::try_new(&build, SpatialPredicate::IntersectsBbox).unwrap();

        let mut matches = Vec::new();
        index.query(&wkb_value("POINT (5 0)"), &mut matches).unwrap();
        assert_eq!(matches, vec![0]);

        let index = SpatialIndex::try_new(&build, SpatialPredicate::Intersects).unwrap();
        let mut matches = Vec::new();
        index.query(&wkb_value("POINT (5 0)"), &mut matches).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_build_side() {
        let build = binary_chunked("geometry", &[]);
        let index = SpatialIndex::try_new(&build, SpatialPredicate::Intersects).unwrap();
        assert_eq!(index.len(), 0);

        let mut matches = Vec::new();
        index.query(&wkb_value("POINT (0 0)"), &mut matches).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_probe() {
        let build = binary_chunked("geometry", &[Some("POINT (0 0)")]);
        let index = SpatialIndex::try_new(&build, SpatialPredicate::Intersects).unwrap();

        let mut matches = Vec::new();
        index
            .query(&wkb_value("POINT EMPTY"), &mut matches)
            .unwrap();
        assert!(matches.is_empty());
    }
}
