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

use tracing::warn;
use uuid::Uuid;

/// Bluetooth Base UUID, used to expand 16- and 32-bit UUIDs.
/// Bluetooth Core Specification, Vol 3, Part B, Section 2.5.1.
const BASE_UUID: u128 = 0x0000_0000_0000_1000_8000_0080_5F9B_34FB;

/// Expand a 16-bit assigned number into its full 128-bit UUID.
pub fn uuid_from_u16(short: u16) -> Uuid {
    uuid_from_u32(u32::from(short))
}

/// Expand a 32-bit assigned number into its full 128-bit UUID.
pub fn uuid_from_u32(short: u32) -> Uuid {
    Uuid::from_u128(BASE_UUID | (u128::from(short) << 96))
}

/// Enum denoting the assigned number of Bluetooth common data types. Used for
/// decoding data sections of a Bluetooth advertisement.
/// Bluetooth Assigned Numbers, Section 2.3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BleDataTypeId {
    Flags = 0x01,
    IncompleteServiceUuids16Bit = 0x02,
    CompleteServiceUuids16Bit = 0x03,
    IncompleteServiceUuids32Bit = 0x04,
    CompleteServiceUuids32Bit = 0x05,
    IncompleteServiceUuids128Bit = 0x06,
    CompleteServiceUuids128Bit = 0x07,
    ShortenedLocalName = 0x08,
    CompleteLocalName = 0x09,
    TxPowerLevel = 0x0A,
    SolicitationUuids16Bit = 0x14,
    SolicitationUuids128Bit = 0x15,
    ServiceData16BitUuid = 0x16,
    SolicitationUuids32Bit = 0x1F,
    ServiceData32BitUuid = 0x20,
    ServiceData128BitUuid = 0x21,
    ManufacturerSpecificData = 0xFF,
}

impl BleDataTypeId {
    fn from_u8(value: u8) -> Option<Self> {
        use BleDataTypeId::*;

        let id = match value {
            0x01 => Flags,
            0x02 => IncompleteServiceUuids16Bit,
            0x03 => CompleteServiceUuids16Bit,
            0x04 => IncompleteServiceUuids32Bit,
            0x05 => CompleteServiceUuids32Bit,
            0x06 => IncompleteServiceUuids128Bit,
            0x07 => CompleteServiceUuids128Bit,
            0x08 => ShortenedLocalName,
            0x09 => CompleteLocalName,
            0x0A => TxPowerLevel,
            0x14 => SolicitationUuids16Bit,
            0x15 => SolicitationUuids128Bit,
            0x16 => ServiceData16BitUuid,
            0x1F => SolicitationUuids32Bit,
            0x20 => ServiceData32BitUuid,
            0x21 => ServiceData128BitUuid,
            0xFF => ManufacturerSpecificData,
            _ => return None,
        };
        Some(id)
    }
}

/// Struct representing the Bluetooth Service Data common data type. `U` should
/// be one of the valid uuid sizes, specified in:
/// Bluetooth Supplement to the Core Specification, Part A, Section 1.11.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceData<U: Copy> {
    uuid: U,
    data: Vec<u8>,
}

impl<U: Copy> ServiceData<U> {
    pub fn new(uuid: U, data: Vec<u8>) -> Self {
        ServiceData { uuid, data }
    }

    pub fn uuid(&self) -> U {
        self.uuid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Manufacturer Specific Data section, keyed by the Bluetooth SIG company id.
/// Supplement to the Core Specification, Part A, Section 1.4.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManufacturerData {
    company_id: u16,
    data: Vec<u8>,
}

impl ManufacturerData {
    pub fn new(company_id: u16, data: Vec<u8>) -> Self {
        ManufacturerData { company_id, data }
    }

    pub fn company_id(&self) -> u16 {
        self.company_id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Parsed, read-only view over a raw advertisement record. Built once per
/// native scan event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvertisementData {
    raw: Vec<u8>,
    flags: Option<u8>,
    service_uuids: Vec<Uuid>,
    solicited_service_uuids: Vec<Uuid>,
    local_name: Option<String>,
    tx_power: Option<i8>,
    service_data: Vec<ServiceData<Uuid>>,
    manufacturer_data: Vec<ManufacturerData>,
}

impl AdvertisementData {
    /// Decode the AD structures of `record`.
    /// See: Supplement to the Bluetooth Core Specification Part A, Section 1.
    ///
    /// Parsing never fails. A zero length byte is treated as trailing
    /// padding. A structure that claims more bytes than the record holds ends
    /// parsing, and the sections decoded before it are kept.
    pub fn parse(record: &[u8]) -> Self {
        let mut ad = AdvertisementData {
            raw: record.to_vec(),
            ..Default::default()
        };
        let mut shortened_name = None;

        let mut rest = record;
        while let Some((&len, tail)) = rest.split_first() {
            let len = usize::from(len);
            if len == 0 {
                break;
            }
            if tail.len() < len {
                warn!(
                    "Truncated advertisement section: declared {} bytes, {} available.",
                    len,
                    tail.len()
                );
                break;
            }
            let (section, next) = tail.split_at(len);
            rest = next;

            let (&type_id, value) = match section.split_first() {
                Some(parts) => parts,
                None => continue,
            };
            let Some(type_id) = BleDataTypeId::from_u8(type_id) else {
                continue;
            };

            match type_id {
                BleDataTypeId::Flags => ad.flags = value.first().copied(),
                BleDataTypeId::IncompleteServiceUuids16Bit
                | BleDataTypeId::CompleteServiceUuids16Bit => {
                    ad.service_uuids.extend(parse_uuids(value, 2))
                }
                BleDataTypeId::IncompleteServiceUuids32Bit
                | BleDataTypeId::CompleteServiceUuids32Bit => {
                    ad.service_uuids.extend(parse_uuids(value, 4))
                }
                BleDataTypeId::IncompleteServiceUuids128Bit
                | BleDataTypeId::CompleteServiceUuids128Bit => {
                    ad.service_uuids.extend(parse_uuids(value, 16))
                }
                BleDataTypeId::SolicitationUuids16Bit => {
                    ad.solicited_service_uuids.extend(parse_uuids(value, 2))
                }
                BleDataTypeId::SolicitationUuids32Bit => {
                    ad.solicited_service_uuids.extend(parse_uuids(value, 4))
                }
                BleDataTypeId::SolicitationUuids128Bit => {
                    ad.solicited_service_uuids.extend(parse_uuids(value, 16))
                }
                BleDataTypeId::ShortenedLocalName => {
                    shortened_name = Some(String::from_utf8_lossy(value).into_owned())
                }
                BleDataTypeId::CompleteLocalName => {
                    ad.local_name = Some(String::from_utf8_lossy(value).into_owned())
                }
                BleDataTypeId::TxPowerLevel => {
                    ad.tx_power = value.first().map(|&power| power as i8)
                }
                BleDataTypeId::ServiceData16BitUuid => {
                    ad.service_data.extend(parse_service_data(value, 2))
                }
                BleDataTypeId::ServiceData32BitUuid => {
                    ad.service_data.extend(parse_service_data(value, 4))
                }
                BleDataTypeId::ServiceData128BitUuid => {
                    ad.service_data.extend(parse_service_data(value, 16))
                }
                BleDataTypeId::ManufacturerSpecificData => {
                    if let [lo, hi, data @ ..] = value {
                        ad.manufacturer_data.push(ManufacturerData::new(
                            u16::from_le_bytes([*lo, *hi]),
                            data.to_vec(),
                        ));
                    }
                }
            }
        }

        if ad.local_name.is_none() {
            ad.local_name = shortened_name;
        }
        ad
    }

    /// The record this view was decoded from.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn flags(&self) -> Option<u8> {
        self.flags
    }

    /// Advertised service UUIDs, in advertisement order. Empty when the
    /// advertisement carries none.
    pub fn service_uuids(&self) -> &[Uuid] {
        &self.service_uuids
    }

    pub fn solicited_service_uuids(&self) -> &[Uuid] {
        &self.solicited_service_uuids
    }

    /// Complete local name if advertised, else the shortened one.
    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    /// Advertised transmit power level in dBm.
    pub fn tx_power(&self) -> Option<i8> {
        self.tx_power
    }

    pub fn service_data(&self) -> &[ServiceData<Uuid>] {
        &self.service_data
    }

    pub fn manufacturer_data(&self) -> &[ManufacturerData] {
        &self.manufacturer_data
    }
}

/// Decode a list of little-endian UUIDs of `width` bytes each. A trailing
/// partial UUID is ignored.
fn parse_uuids(value: &[u8], width: usize) -> impl Iterator<Item = Uuid> + '_ {
    value.chunks_exact(width).filter_map(uuid_from_le_slice)
}

fn parse_service_data(value: &[u8], width: usize) -> Option<ServiceData<Uuid>> {
    if value.len() < width {
        warn!("Service data section too short for a {}-byte UUID.", width);
        return None;
    }
    let (uuid, data) = value.split_at(width);
    uuid_from_le_slice(uuid).map(|uuid| ServiceData::new(uuid, data.to_vec()))
}

fn uuid_from_le_slice(bytes: &[u8]) -> Option<Uuid> {
    match *bytes {
        [a, b] => Some(uuid_from_u16(u16::from_le_bytes([a, b]))),
        [a, b, c, d] => Some(uuid_from_u32(u32::from_le_bytes([a, b, c, d]))),
        _ => {
            let mut be: [u8; 16] = bytes.try_into().ok()?;
            be.reverse();
            Some(Uuid::from_bytes(be))
        }
    }
}
