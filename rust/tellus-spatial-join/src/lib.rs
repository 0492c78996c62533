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
pub mod error;
pub mod evaluate;
mod index;
pub mod join;
pub mod options;
pub mod spatial_predicate;

pub use error::{classify_join_error, SpatialJoinError};
pub use evaluate::{candidate_matches, sjoin_expr, SJOIN_FUNCTION_NAME};
pub use join::sjoin;
pub use options::{SjoinArgs, GEOM_LEFT, GEOM_RIGHT, INDEX_LEFT, INDEX_RIGHT, RESERVED_PREFIX};
pub use spatial_predicate::SpatialPredicate;
