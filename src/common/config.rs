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
use uuid::Uuid;

use super::ScanError;

/// Power/latency class of a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanType {
    Background = 0,
    LowPowered = 1,
    Balanced = 2,
    LowLatency = 3,
}

/// Hint for how aggressively hardware-assisted scanning matches
/// advertisements against filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    Aggressive = 0,
    Sticky = 1,
}

/// Hint for how many advertisements per filter the hardware should match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumOfMatches {
    One = 0,
    Few = 1,
    Max = 2,
}

impl TryFrom<i32> for ScanType {
    type Error = ScanError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ScanType::Background),
            1 => Ok(ScanType::LowPowered),
            2 => Ok(ScanType::Balanced),
            3 => Ok(ScanType::LowLatency),
            _ => Err(ScanError::InvalidArgument(format!(
                "invalid scan type: {code}"
            ))),
        }
    }
}

impl TryFrom<i32> for MatchMode {
    type Error = ScanError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MatchMode::Aggressive),
            1 => Ok(MatchMode::Sticky),
            _ => Err(ScanError::InvalidArgument(format!(
                "invalid match mode: {code}"
            ))),
        }
    }
}

impl TryFrom<i32> for NumOfMatches {
    type Error = ScanError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(NumOfMatches::One),
            1 => Ok(NumOfMatches::Few),
            2 => Ok(NumOfMatches::Max),
            _ => Err(ScanError::InvalidArgument(format!(
                "invalid number of matches: {code}"
            ))),
        }
    }
}

fn default_use_scan_batching() -> bool {
    true
}

/// Caller-supplied description of a single scan. Immutable once handed to
/// `ScanController::scan()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    scan_type: ScanType,
    #[serde(default)]
    match_mode: Option<MatchMode>,
    #[serde(default)]
    num_of_matches: Option<NumOfMatches>,
    #[serde(default)]
    service_uuids: Vec<Uuid>,
    #[serde(default = "default_use_scan_batching")]
    use_scan_batching: bool,
}

impl ScanConfig {
    pub fn new(scan_type: ScanType) -> Self {
        ScanConfig {
            scan_type,
            match_mode: None,
            num_of_matches: None,
            service_uuids: Vec::new(),
            use_scan_batching: default_use_scan_batching(),
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = Some(match_mode);
        self
    }

    pub fn with_num_of_matches(mut self, num_of_matches: NumOfMatches) -> Self {
        self.num_of_matches = Some(num_of_matches);
        self
    }

    /// Only surface advertisements for these services. An empty list means no
    /// filtering.
    pub fn with_service_uuids(
        mut self,
        service_uuids: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        self.service_uuids = service_uuids.into_iter().collect();
        self
    }

    /// Request batched delivery where the native scanner supports it.
    pub fn with_scan_batching(mut self, use_scan_batching: bool) -> Self {
        self.use_scan_batching = use_scan_batching;
        self
    }

    /// Decode a JSON scan description. Unknown enum names are reported as
    /// `ScanError::Configuration`.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        serde_json::from_str(json)
            .map_err(|err| ScanError::Configuration(err.to_string()))
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    pub fn match_mode(&self) -> Option<MatchMode> {
        self.match_mode
    }

    pub fn num_of_matches(&self) -> Option<NumOfMatches> {
        self.num_of_matches
    }

    pub fn service_uuids(&self) -> &[Uuid] {
        &self.service_uuids
    }

    pub fn use_scan_batching(&self) -> bool {
        self.use_scan_batching
    }
}

/// Integer-coded scan configuration, as received across an FFI boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawScanConfig {
    pub scan_type: i32,
    pub match_mode: Option<i32>,
    pub num_of_matches: Option<i32>,
    pub service_uuids: Vec<Uuid>,
    pub use_scan_batching: bool,
}

impl TryFrom<RawScanConfig> for ScanConfig {
    type Error = ScanError;

    fn try_from(raw: RawScanConfig) -> Result<Self, Self::Error> {
        let into_config_error = |err: ScanError| match err {
            ScanError::InvalidArgument(msg) => ScanError::Configuration(msg),
            other => other,
        };

        let scan_type = ScanType::try_from(raw.scan_type).map_err(into_config_error)?;
        let match_mode = raw
            .match_mode
            .map(MatchMode::try_from)
            .transpose()
            .map_err(into_config_error)?;
        let num_of_matches = raw
            .num_of_matches
            .map(NumOfMatches::try_from)
            .transpose()
            .map_err(into_config_error)?;

        Ok(ScanConfig {
            scan_type,
            match_mode,
            num_of_matches,
            service_uuids: raw.service_uuids,
            use_scan_batching: raw.use_scan_batching,
        })
    }
}
