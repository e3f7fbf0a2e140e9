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

use std::sync::Arc;

use uuid::Uuid;

use super::ScanCallback;
use crate::common::ScanError;

/// Native scan mode values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeScanMode {
    LowPower = 0,
    Balanced = 1,
    LowLatency = 2,
}

/// Native match mode values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeMatchMode {
    Aggressive = 1,
    Sticky = 2,
}

/// Native match count values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeMatchNumber {
    OneAdvertisement = 1,
    FewAdvertisement = 2,
    MaxAdvertisement = 3,
}

/// A hardware filter matching advertisements of a single service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanFilter {
    service_uuid: Uuid,
}

impl ScanFilter {
    pub fn with_service_uuid(service_uuid: Uuid) -> Self {
        ScanFilter { service_uuid }
    }

    pub fn service_uuid(&self) -> Uuid {
        self.service_uuid
    }
}

/// Parameters handed to `NativeScanner::start_scan`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanSettings {
    pub scan_mode: NativeScanMode,
    pub match_mode: Option<NativeMatchMode>,
    pub num_of_matches: Option<NativeMatchNumber>,
    /// Zero delivers every advertisement as it arrives; anything else asks
    /// the controller to batch reports for that many milliseconds.
    pub report_delay_millis: u64,
}

impl ScanSettings {
    pub fn new(scan_mode: NativeScanMode) -> Self {
        ScanSettings {
            scan_mode,
            match_mode: None,
            num_of_matches: None,
            report_delay_millis: 0,
        }
    }
}

/// Implemented by the host platform on top of its Bluetooth stack. Exposes
/// both scanning subsystems: the filtered/batched scanner (`start_scan`) and
/// the legacy unfiltered one (`start_le_scan`).
///
/// Implementations are called from whatever thread drives the
/// `ScanController`, including the thread that drops a `ScanStream`.
pub trait NativeScanner: Send + Sync {
    /// Whether the controller can batch scan reports in hardware.
    fn is_offloaded_scan_batching_supported(&self) -> bool;

    /// Whether the filtered scanner object is currently present. Typically
    /// `false` while the adapter is powered off.
    fn is_le_scanner_available(&self) -> bool;

    /// Start a filtered scan. An empty `filters` slice matches everything.
    fn start_scan(
        &self,
        filters: &[ScanFilter],
        settings: &ScanSettings,
        callback: Arc<ScanCallback>,
    ) -> Result<(), ScanError>;

    /// Stop the filtered scan started with `callback`.
    fn stop_scan(&self, callback: &Arc<ScanCallback>) -> Result<(), ScanError>;

    /// Start an unfiltered legacy scan.
    fn start_le_scan(&self, callback: Arc<ScanCallback>) -> Result<(), ScanError>;

    /// Stop the legacy scan started with `callback`.
    fn stop_le_scan(&self, callback: &Arc<ScanCallback>) -> Result<(), ScanError>;
}
