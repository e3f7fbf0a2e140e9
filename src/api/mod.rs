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

//! Boundary with the platform Bluetooth stack. The host implements
//! [`NativeScanner`] and invokes the [`ScanCallback`]s it is handed.

mod callback;
#[cfg(test)]
pub(crate) mod mock;
mod scanner;

pub use callback::{NativeDevice, NativeScanRecord, ScanCallback};
pub use scanner::{
    NativeMatchMode, NativeMatchNumber, NativeScanMode, NativeScanner,
    ScanFilter, ScanSettings,
};
