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

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use super::{NativeDevice, NativeScanner, ScanCallback, ScanFilter, ScanSettings};
use crate::common::ScanError;

/// A call observed by `MockNativeScanner`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NativeCall {
    StartScan {
        filters: Vec<ScanFilter>,
        settings: ScanSettings,
    },
    StopScan,
    StartLeScan,
    StopLeScan,
}

/// A struct for mocking the platform scanner. Records every call and keeps the
/// registered callbacks so tests can push advertisements through them.
pub(crate) struct MockNativeScanner {
    batching_supported: bool,
    scanner_available: AtomicBool,
    start_error: Mutex<Option<ScanError>>,
    calls: Mutex<Vec<NativeCall>>,
    active: Mutex<Vec<Arc<ScanCallback>>>,
}

impl MockNativeScanner {
    pub(crate) fn new(batching_supported: bool) -> Self {
        MockNativeScanner {
            batching_supported,
            scanner_available: AtomicBool::new(true),
            start_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            active: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_scanner_available(&self, available: bool) {
        self.scanner_available.store(available, Ordering::SeqCst);
    }

    /// Make the next start call fail with `error`.
    pub(crate) fn fail_next_start(&self, error: ScanError) {
        *self.start_error.lock().unwrap() = Some(error);
    }

    pub(crate) fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn active_callbacks(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Push an advertisement through every registered callback.
    pub(crate) fn emit(&self, device: &NativeDevice, rssi: i32, record: &[u8]) {
        let active = self.active.lock().unwrap().clone();
        for callback in active {
            callback.on_advertisement(device, rssi, record);
        }
    }

    fn start(&self, call: NativeCall, callback: Arc<ScanCallback>) -> Result<(), ScanError> {
        self.calls.lock().unwrap().push(call);
        if let Some(error) = self.start_error.lock().unwrap().take() {
            return Err(error);
        }
        self.active.lock().unwrap().push(callback);
        Ok(())
    }

    fn stop(&self, call: NativeCall, callback: &Arc<ScanCallback>) -> Result<(), ScanError> {
        self.calls.lock().unwrap().push(call);
        let mut active = self.active.lock().unwrap();
        let before = active.len();
        active.retain(|registered| !Arc::ptr_eq(registered, callback));
        if active.len() == before {
            return Err(ScanError::FailedPrecondition(String::from(
                "callback was never registered",
            )));
        }
        Ok(())
    }
}

impl NativeScanner for MockNativeScanner {
    fn is_offloaded_scan_batching_supported(&self) -> bool {
        self.batching_supported
    }

    fn is_le_scanner_available(&self) -> bool {
        self.scanner_available.load(Ordering::SeqCst)
    }

    fn start_scan(
        &self,
        filters: &[ScanFilter],
        settings: &ScanSettings,
        callback: Arc<ScanCallback>,
    ) -> Result<(), ScanError> {
        let call = NativeCall::StartScan {
            filters: filters.to_vec(),
            settings: *settings,
        };
        self.start(call, callback)
    }

    fn stop_scan(&self, callback: &Arc<ScanCallback>) -> Result<(), ScanError> {
        self.stop(NativeCall::StopScan, callback)
    }

    fn start_le_scan(&self, callback: Arc<ScanCallback>) -> Result<(), ScanError> {
        self.start(NativeCall::StartLeScan, callback)
    }

    fn stop_le_scan(&self, callback: &Arc<ScanCallback>) -> Result<(), ScanError> {
        self.stop(NativeCall::StopLeScan, callback)
    }
}
