// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Project-level collaborators shared by the storage and API tooling: locating the
//! project on disk, reading and writing its JSON files, and answering questions
//! about the current environment and enabled features.

pub mod backend_config;
pub mod feature_flags;
pub mod json_util;
pub mod logging_tracing;
pub mod path_manager;
pub mod state_manager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
