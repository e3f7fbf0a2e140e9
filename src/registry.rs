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

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use crate::{api::NativeDevice, common::BleAddress, Device};

/// Registry shared between the controller and the native callback threads.
pub(crate) type SharedRegistry = Arc<Mutex<DeviceRegistry>>;

/// Lock the shared registry. A panic on another callback thread leaves the
/// map itself consistent, so poisoning is ignored.
pub(crate) fn lock_registry(registry: &SharedRegistry) -> MutexGuard<'_, DeviceRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Maps native addresses to the logical `Device` handed out for them during
/// the current scan session.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<BleAddress, Arc<Device>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every device. Called once at the start of each scan session, as
    /// the OS may hand the same address to another peripheral in between.
    pub fn clear(&mut self) {
        self.devices.clear();
    }

    /// Return the device already known for this address, or create and store
    /// one. This is the only place `Device`s are created.
    pub fn get_or_create(&mut self, native: &NativeDevice) -> Arc<Device> {
        self.devices
            .entry(native.address())
            .or_insert_with(|| {
                debug!("Discovered new device {}.", native.address());
                Arc::new(Device::new(native))
            })
            .clone()
    }

    pub fn get(&self, address: &BleAddress) -> Option<Arc<Device>> {
        self.devices.get(address).cloned()
    }

    /// Snapshot of the devices seen in this session, in no particular order.
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.devices.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BleAddressKind;

    fn native(addr: u64) -> NativeDevice {
        NativeDevice::new(BleAddress::new(addr, BleAddressKind::Public))
    }

    #[test]
    fn test_same_address_same_device() {
        let mut registry = DeviceRegistry::new();
        let first = registry.get_or_create(&native(0xAABBCCDDEEFF));
        let second = registry.get_or_create(&native(0xAABBCCDDEEFF));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_addresses() {
        let mut registry = DeviceRegistry::new();
        let first = registry.get_or_create(&native(1));
        let second = registry.get_or_create(&native(2));

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(registry.devices().len(), 2);
    }

    #[test]
    fn test_clear_yields_new_instance() {
        let mut registry = DeviceRegistry::new();
        let before = registry.get_or_create(&native(0xAABBCCDDEEFF));
        registry.clear();
        assert!(registry.is_empty());

        let after = registry.get_or_create(&native(0xAABBCCDDEEFF));
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.address(), after.address());
    }

    #[test]
    fn test_first_sighting_name_is_kept() {
        let mut registry = DeviceRegistry::new();
        let addr = BleAddress::new(7, BleAddressKind::Random);
        registry.get_or_create(&NativeDevice::new(addr).with_name("first"));
        let device = registry.get_or_create(&NativeDevice::new(addr).with_name("second"));

        assert_eq!(device.name(), Some("first"));
        assert!(registry.get(&addr).is_some());
    }
}
