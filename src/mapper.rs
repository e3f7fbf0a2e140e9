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

use crate::{
    api::NativeDevice,
    registry::{lock_registry, SharedRegistry},
    AdvertisementData, ScanResult,
};

/// Turns native scan events into `ScanResult`s, resolving the device through
/// the session registry.
#[derive(Clone)]
pub(crate) struct ResultMapper {
    registry: SharedRegistry,
}

impl ResultMapper {
    pub(crate) fn new(registry: SharedRegistry) -> Self {
        ResultMapper { registry }
    }

    pub(crate) fn map(
        &self,
        native: &NativeDevice,
        rssi: i32,
        advertisement: AdvertisementData,
    ) -> ScanResult {
        let device = lock_registry(&self.registry).get_or_create(native);
        ScanResult::new(device, rssi, advertisement)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{BleAddress, BleAddressKind, DeviceRegistry};

    #[test]
    fn test_map_resolves_device_through_registry() {
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let mapper = ResultMapper::new(registry.clone());
        let native =
            NativeDevice::new(BleAddress::new(0xAABBCCDDEEFF, BleAddressKind::Public));
        let record = [0x02, 0x0A, 0x05];

        let first = mapper.map(&native, -40, AdvertisementData::parse(&record));
        let second = mapper.map(&native, -70, AdvertisementData::parse(&[]));

        assert!(Arc::ptr_eq(first.device(), second.device()));
        assert_eq!(first.rssi(), -40);
        assert_eq!(second.rssi(), -70);
        assert_eq!(first.advertisement().tx_power(), Some(5));
        assert_eq!(registry.lock().unwrap().len(), 1);
    }
}
