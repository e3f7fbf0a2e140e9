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

use std::fmt;

use tracing::error;

use crate::common::BleAddress;

/// Device handle as delivered by the native stack alongside an advertisement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeDevice {
    address: BleAddress,
    name: Option<String>,
}

impl NativeDevice {
    pub fn new(address: BleAddress) -> Self {
        NativeDevice {
            address,
            name: None,
        }
    }

    /// Attach the name the native stack has cached for this device.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn address(&self) -> BleAddress {
        self.address
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// One entry of a batched scan report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeScanRecord {
    pub device: NativeDevice,
    pub rssi: i32,
    pub record: Vec<u8>,
}

type AdvertisementHandler = dyn Fn(&NativeDevice, i32, &[u8]) + Send + Sync;

/// Callback object registered with the native scanner. The native layer holds
/// on to the `Arc` it was started with and must pass the same `Arc` back when
/// stopping; callbacks may be invoked from any thread and must not block.
pub struct ScanCallback {
    handler: Box<AdvertisementHandler>,
}

impl ScanCallback {
    pub(crate) fn new(
        handler: impl Fn(&NativeDevice, i32, &[u8]) + Send + Sync + 'static,
    ) -> Self {
        ScanCallback {
            handler: Box::new(handler),
        }
    }

    /// Deliver a single advertisement.
    pub fn on_advertisement(&self, device: &NativeDevice, rssi: i32, record: &[u8]) {
        (self.handler)(device, rssi, record)
    }

    /// Deliver a batched report. Entries are handled in the order given.
    pub fn on_batch_scan_results(&self, results: &[NativeScanRecord]) {
        for result in results {
            self.on_advertisement(&result.device, result.rssi, &result.record);
        }
    }

    /// The native scan could not be started or was aborted. The result stream
    /// stays open; recovering is up to the caller.
    pub fn on_scan_failed(&self, error_code: i32) {
        error!("Native BLE scan failed with error code {}.", error_code);
    }
}

impl fmt::Debug for ScanCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanCallback").finish_non_exhaustive()
    }
}
