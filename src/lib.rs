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

//! BLE scanning engine sitting between a platform's native Bluetooth stack and
//! an application's event stream. Picks between the filtered/batched scanner
//! and the legacy unfiltered one, normalizes native callbacks into
//! [`ScanResult`]s and keeps one logical [`Device`] per address per session.

pub mod api;
mod common;
mod controller;
mod filter;
mod mapper;
mod registry;
mod settings;
mod strategy;

pub use common::{
    uuid_from_u16, uuid_from_u32, AdvertisementData, BleAddress,
    BleAddressKind, BleDataTypeId, Device, ManufacturerData, MatchMode,
    NumOfMatches, RawScanConfig, ScanConfig, ScanError, ScanResult, ScanType,
    ServiceData,
};
pub use controller::{ScanController, ScanStream};
pub use filter::AdvertisementFilter;
pub use registry::DeviceRegistry;
pub use settings::AdapterConfig;
pub use uuid::Uuid;
