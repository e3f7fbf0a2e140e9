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

use std::{fmt, str::FromStr};

use super::ScanError;

/// BLE Addresses can either be the peripheral's public MAC address, or various
/// types of random addresses.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum BleAddressKind {
    Public,
    Random,
}

/// Struct representing a 48-bit BLE Address and its type. Bytes are stored
/// least significant first, the way the controller reports them.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct BleAddress {
    val: [u8; 6],
    kind: BleAddressKind,
}

impl BleAddress {
    /// `BleAddress` constructor.
    pub fn new(addr: u64, kind: BleAddressKind) -> Self {
        let addr = u64_to_6lsb(addr);

        BleAddress { val: addr, kind }
    }

    /// Retrieve the type of BLE Address (public or random).
    pub fn get_kind(&self) -> BleAddressKind {
        self.kind
    }

    /// Address bytes in display order, most significant first.
    pub fn octets(&self) -> [u8; 6] {
        let mut octets = self.val;
        octets.reverse();
        octets
    }
}

/// Function for converting the six LSB of a u64 into a 6-byte array.
#[inline]
fn u64_to_6lsb(num: u64) -> [u8; 6] {
    let bytes = num.to_le_bytes();
    [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]]
}

impl From<BleAddress> for u64 {
    fn from(addr: BleAddress) -> Self {
        let mut bytes = [0u8; 8];
        bytes[..6].copy_from_slice(&addr.val);

        u64::from_le_bytes(bytes)
    }
}

impl fmt::Display for BleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.octets();
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Parses the colon-separated form (`AA:BB:CC:DD:EE:FF`). The address kind
/// isn't part of the text, so parsed addresses are `Public`.
impl FromStr for BleAddress {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ScanError::InvalidArgument(format!("malformed BLE address: {s}"))
        };

        let mut addr: u64 = 0;
        let mut count = 0;
        for part in s.split(':') {
            if part.len() != 2 {
                return Err(invalid());
            }
            let byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
            addr = (addr << 8) | u64::from(byte);
            count += 1;
        }
        if count != 6 {
            return Err(invalid());
        }

        Ok(BleAddress::new(addr, BleAddressKind::Public))
    }
}
