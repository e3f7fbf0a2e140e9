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

use uuid::Uuid;

use super::BleAddress;
use crate::api::NativeDevice;

/// Logical handle for a discovered peripheral. Instances are only created by
/// the `DeviceRegistry` and handed out as `Arc<Device>`; within one scan
/// session every sighting of an address resolves to the same allocation, so
/// consumers may deduplicate with `Arc::ptr_eq`.
#[derive(Debug)]
pub struct Device {
    address: BleAddress,
    name: Option<String>,
    uuid: Uuid,
}

impl Device {
    pub(crate) fn new(native: &NativeDevice) -> Self {
        let address = native.address();
        Device {
            address,
            name: native.name().map(String::from),
            uuid: uuid_from_address(address),
        }
    }

    /// Retrieve this device's Bluetooth address information.
    pub fn address(&self) -> BleAddress {
        self.address
    }

    /// Name reported by the native stack when the device was first seen.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Stable identifier for the device, derived from its address.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Place the six address octets in the trailing bytes of an otherwise zero
/// UUID, e.g. `AA:BB:CC:DD:EE:FF` becomes
/// `00000000-0000-0000-0000-aabbccddeeff`.
fn uuid_from_address(address: BleAddress) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes[10..].copy_from_slice(&address.octets());
    Uuid::from_bytes(bytes)
}
