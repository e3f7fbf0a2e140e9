// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};

use crate::ScanError;

fn default_use_new_scanner() -> bool {
    true
}

/// Platform-wide scanner toggles, fixed for the lifetime of a
/// `ScanController`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Use the filtered/batched scanner. When `false` the legacy scanner is
    /// used and service filtering is done in process.
    #[serde(default = "default_use_new_scanner")]
    pub use_new_scanner: bool,
    /// Forward match mode and match count hints to the filtered scanner.
    #[serde(default)]
    pub advanced_scanner_settings: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            use_new_scanner: default_use_new_scanner(),
            advanced_scanner_settings: false,
        }
    }
}

impl AdapterConfig {
    /// Load toggles from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json)
            .map_err(|err| ScanError::Configuration(err.to_string()))
    }
}
