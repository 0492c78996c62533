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
use std::{io, num};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TellusGeometryError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    IO(io::Error),
    #[error("{0}")]
    External(Box<dyn std::error::Error + Send + Sync>),
}

impl From<io::Error> for TellusGeometryError {
    fn from(value: io::Error) -> Self {
        TellusGeometryError::IO(value)
    }
}

impl From<num::TryFromIntError> for TellusGeometryError {
    fn from(value: num::TryFromIntError) -> Self {
        TellusGeometryError::External(Box::new(value))
    }
}
