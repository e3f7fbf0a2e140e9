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

use super::{AdvertisementData, Device};

/// A single sighting of a peripheral. Never mutated after creation; the
/// `Device` is shared with the registry, the advertisement is owned.
#[derive(Clone, Debug)]
pub struct ScanResult {
    device: Arc<Device>,
    rssi: i32,
    advertisement: AdvertisementData,
}

impl ScanResult {
    pub(crate) fn new(
        device: Arc<Device>,
        rssi: i32,
        advertisement: AdvertisementData,
    ) -> Self {
        ScanResult {
            device,
            rssi,
            advertisement,
        }
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Received signal strength in dBm.
    pub fn rssi(&self) -> i32 {
        self.rssi
    }

    pub fn advertisement(&self) -> &AdvertisementData {
        &self.advertisement
    }
}
