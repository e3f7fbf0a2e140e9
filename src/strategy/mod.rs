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

//! The two native scanning subsystems. Each strategy owns exactly one native
//! callback from `start` until its handle is released.

mod legacy;
mod modern;

use futures::channel::mpsc::UnboundedSender;
use tracing::debug;

pub(crate) use legacy::LegacyScan;
pub(crate) use modern::ModernScan;

use crate::{
    api::{NativeDevice, NativeScanner},
    mapper::ResultMapper,
    AdvertisementData, ScanResult,
};

/// Hands mapped results to the consumer's stream. Sending never blocks, so it
/// is safe to call from native callback threads.
#[derive(Clone)]
pub(crate) struct ResultEmitter {
    mapper: ResultMapper,
    sender: UnboundedSender<ScanResult>,
}

impl ResultEmitter {
    pub(crate) fn new(mapper: ResultMapper, sender: UnboundedSender<ScanResult>) -> Self {
        ResultEmitter { mapper, sender }
    }

    pub(crate) fn emit(&self, native: &NativeDevice, rssi: i32, ad: AdvertisementData) {
        if self.sender.is_closed() {
            debug!("Scan stream closed, dropping advertisement from {}.", native.address());
            return;
        }

        let result = self.mapper.map(native, rssi, ad);
        if let Err(err) = self.sender.unbounded_send(result) {
            debug!("Scan stream closed, dropping result: {}", err);
        }
    }
}

/// The strategy currently holding a native callback.
#[derive(Debug)]
pub(crate) enum ActiveScan {
    Modern(ModernScan),
    Legacy(LegacyScan),
}

impl ActiveScan {
    /// Deregister the native callback. Consumes the handle, so a scan is
    /// released at most once.
    pub(crate) fn release(self, native: &dyn NativeScanner) {
        match self {
            ActiveScan::Modern(scan) => scan.release(native),
            ActiveScan::Legacy(scan) => scan.release(native),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ActiveScan::Modern(_) => "modern",
            ActiveScan::Legacy(_) => "legacy",
        }
    }
}
