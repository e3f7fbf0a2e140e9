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

use tracing::{debug, info, warn};

use super::ResultEmitter;
use crate::{
    api::{NativeScanner, ScanCallback},
    AdvertisementData, AdvertisementFilter, ScanConfig, ScanError,
};

/// Handle for a running legacy scan.
#[derive(Debug)]
pub(crate) struct LegacyScan {
    callback: Arc<ScanCallback>,
}

impl LegacyScan {
    /// Start the unfiltered legacy scanner. It has no settings, so service
    /// filtering happens here, per advertisement.
    pub(crate) fn start(
        native: &dyn NativeScanner,
        config: &ScanConfig,
        emitter: ResultEmitter,
    ) -> Result<Self, ScanError> {
        let config = config.clone();
        let callback = Arc::new(ScanCallback::new(move |device, rssi, record| {
            let ad = AdvertisementData::parse(record);
            if AdvertisementFilter::include(&ad, &config) {
                emitter.emit(device, rssi, ad);
            } else {
                debug!("Filtered out advertisement from {}.", device.address());
            }
        }));

        info!("Starting legacy BLE scan.");
        native.start_le_scan(callback.clone())?;

        Ok(LegacyScan { callback })
    }

    pub(crate) fn release(self, native: &dyn NativeScanner) {
        if let Err(err) = native.stop_le_scan(&self.callback) {
            warn!("Failed to stop legacy BLE scan: {}", err);
        }
    }
}
