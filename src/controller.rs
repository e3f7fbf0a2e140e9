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
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::{
    channel::mpsc::{self, UnboundedReceiver},
    stream::Stream,
    StreamExt,
};
use tracing::{debug, info};

use crate::{
    api::NativeScanner,
    mapper::ResultMapper,
    registry::{lock_registry, SharedRegistry},
    strategy::{ActiveScan, LegacyScan, ModernScan, ResultEmitter},
    AdapterConfig, Device, DeviceRegistry, RawScanConfig, ScanConfig,
    ScanError, ScanResult,
};

/// Scan bookkeeping. `session` increases with every successful `scan()` so a
/// stream can tell whether it still owns the running scan.
#[derive(Default)]
struct ScanState {
    active: Option<ActiveScan>,
    session: u64,
}

struct Inner {
    native: Arc<dyn NativeScanner>,
    config: AdapterConfig,
    registry: SharedRegistry,
    state: Mutex<ScanState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, ScanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release_active(&self, state: &mut ScanState) -> bool {
        match state.active.take() {
            Some(active) => {
                info!("Stopping {} BLE scan (session {}).", active.kind(), state.session);
                active.release(self.native.as_ref());
                true
            }
            None => false,
        }
    }

    /// Stop the scan only if `session` is still the running one.
    fn stop_session(&self, session: u64) {
        let mut state = self.state();
        if state.session == session {
            self.release_active(&mut state);
        }
    }
}

/// Entry point for scanning. Chooses the native scanning subsystem, owns the
/// device registry and hands out result streams.
///
/// At most one native scan runs per controller. Cloning is cheap and clones
/// share the same scan.
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<Inner>,
}

impl ScanController {
    pub fn new(native: Arc<dyn NativeScanner>, config: AdapterConfig) -> Self {
        ScanController {
            inner: Arc::new(Inner {
                native,
                config,
                registry: Arc::new(Mutex::new(DeviceRegistry::new())),
                state: Mutex::new(ScanState::default()),
            }),
        }
    }

    pub fn adapter_config(&self) -> &AdapterConfig {
        &self.inner.config
    }

    /// Start a scan session and return its result stream.
    ///
    /// A scan that is already running is stopped first. The device registry
    /// is cleared, so devices seen in earlier sessions are not reused. Errors
    /// from the native start call are returned as-is and leave the controller
    /// idle.
    pub fn scan(&self, config: ScanConfig) -> Result<ScanStream, ScanError> {
        let inner = &self.inner;
        let mut state = inner.state();

        if inner.release_active(&mut state) {
            debug!("Replaced a running scan.");
        }
        lock_registry(&inner.registry).clear();

        let (sender, receiver) = mpsc::unbounded();
        let emitter = ResultEmitter::new(ResultMapper::new(inner.registry.clone()), sender);
        let native = inner.native.as_ref();

        let active = if inner.config.use_new_scanner {
            ActiveScan::Modern(ModernScan::start(native, &config, &inner.config, emitter)?)
        } else {
            ActiveScan::Legacy(LegacyScan::start(native, &config, emitter)?)
        };

        state.session += 1;
        info!("Started {} BLE scan (session {}).", active.kind(), state.session);
        state.active = Some(active);

        Ok(ScanStream {
            receiver,
            inner: inner.clone(),
            session: state.session,
        })
    }

    /// `scan()` for an integer-coded configuration. Unknown codes fail with
    /// `ScanError::Configuration` before the native scanner is touched.
    pub fn scan_raw(&self, raw: RawScanConfig) -> Result<ScanStream, ScanError> {
        let config = ScanConfig::try_from(raw)?;
        self.scan(config)
    }

    /// Stop the running scan, if any. Calling this while idle does nothing.
    pub fn stop_scan(&self) {
        let mut state = self.inner.state();
        if !self.inner.release_active(&mut state) {
            debug!("stop_scan() called with no active scan.");
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.inner.state().active.is_some()
    }

    /// Devices discovered in the current (or last) session.
    pub fn discovered_devices(&self) -> Vec<Arc<Device>> {
        lock_registry(&self.inner.registry).devices()
    }
}

/// Results of one scan session, in the order the native stack delivered them.
///
/// The stream doesn't end on its own. Dropping it stops the scan, unless a
/// newer `scan()` call has already replaced this session. After the scan is
/// stopped the stream yields whatever was still buffered, then ends.
pub struct ScanStream {
    receiver: UnboundedReceiver<ScanResult>,
    inner: Arc<Inner>,
    session: u64,
}

impl Stream for ScanStream {
    type Item = ScanResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl Drop for ScanStream {
    fn drop(&mut self) {
        self.inner.stop_session(self.session);
    }
}
