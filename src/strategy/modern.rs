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

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ResultEmitter;
use crate::{
    api::{
        NativeMatchMode, NativeMatchNumber, NativeScanMode, NativeScanner,
        ScanCallback, ScanFilter, ScanSettings,
    },
    AdapterConfig, AdvertisementData, MatchMode, NumOfMatches, ScanConfig,
    ScanError, ScanType,
};

/// Report delay requested when hardware batching is used.
pub(crate) const REPORT_DELAY_MILLIS: u64 = 100;

/// Handle for a running filtered scan.
#[derive(Debug)]
pub(crate) struct ModernScan {
    callback: Arc<ScanCallback>,
}

impl ModernScan {
    /// Build native filters and settings from `config` and start the filtered
    /// scanner. Every callback becomes a result; the native filters have
    /// already matched the service UUIDs.
    pub(crate) fn start(
        native: &dyn NativeScanner,
        config: &ScanConfig,
        adapter_config: &AdapterConfig,
        emitter: ResultEmitter,
    ) -> Result<Self, ScanError> {
        let settings = build_settings(
            config,
            adapter_config,
            native.is_offloaded_scan_batching_supported(),
        );
        let filters = build_filters(config);

        let callback = Arc::new(ScanCallback::new(move |device, rssi, record| {
            emitter.emit(device, rssi, AdvertisementData::parse(record));
        }));

        info!(
            "Starting filtered BLE scan: {:?}, {} filter(s), report delay {}ms.",
            settings.scan_mode,
            filters.len(),
            settings.report_delay_millis
        );
        native.start_scan(&filters, &settings, callback.clone())?;

        Ok(ModernScan { callback })
    }

    /// Stop the native scan with the callback it was started with. Skipped
    /// when the scanner is gone, e.g. the adapter was switched off.
    pub(crate) fn release(self, native: &dyn NativeScanner) {
        if !native.is_le_scanner_available() {
            debug!("BLE scanner unavailable, skipping native stop.");
            return;
        }
        if let Err(err) = native.stop_scan(&self.callback) {
            warn!("Failed to stop filtered BLE scan: {}", err);
        }
    }
}

pub(crate) fn build_settings(
    config: &ScanConfig,
    adapter_config: &AdapterConfig,
    batching_supported: bool,
) -> ScanSettings {
    let mut settings = ScanSettings::new(to_native_scan_mode(config.scan_type()));

    if adapter_config.advanced_scanner_settings {
        settings.match_mode = config.match_mode().map(to_native_match_mode);
        settings.num_of_matches = config.num_of_matches().map(to_native_match_number);
    }

    if config.use_scan_batching() && batching_supported {
        settings.report_delay_millis = REPORT_DELAY_MILLIS;
    }

    settings
}

/// One filter per configured service. No services, no filters.
pub(crate) fn build_filters(config: &ScanConfig) -> Vec<ScanFilter> {
    config
        .service_uuids()
        .iter()
        .map(|uuid| ScanFilter::with_service_uuid(*uuid))
        .collect()
}

pub(crate) fn to_native_scan_mode(scan_type: ScanType) -> NativeScanMode {
    match scan_type {
        ScanType::Background | ScanType::LowPowered => NativeScanMode::LowPower,
        ScanType::Balanced => NativeScanMode::Balanced,
        ScanType::LowLatency => NativeScanMode::LowLatency,
    }
}

pub(crate) fn to_native_match_mode(match_mode: MatchMode) -> NativeMatchMode {
    match match_mode {
        MatchMode::Aggressive => NativeMatchMode::Aggressive,
        MatchMode::Sticky => NativeMatchMode::Sticky,
    }
}

pub(crate) fn to_native_match_number(num_of_matches: NumOfMatches) -> NativeMatchNumber {
    match num_of_matches {
        NumOfMatches::One => NativeMatchNumber::OneAdvertisement,
        NumOfMatches::Few => NativeMatchNumber::FewAdvertisement,
        NumOfMatches::Max => NativeMatchNumber::MaxAdvertisement,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::{channel::mpsc, StreamExt};

    use super::*;
    use crate::{
        api::{
            mock::{MockNativeScanner, NativeCall},
            NativeDevice,
        },
        common::uuid_from_u16,
        mapper::ResultMapper,
        BleAddress, BleAddressKind, DeviceRegistry,
    };

    fn advanced() -> AdapterConfig {
        AdapterConfig {
            advanced_scanner_settings: true,
            ..AdapterConfig::default()
        }
    }

    #[test]
    fn test_scan_mode_mapping() {
        assert_eq!(to_native_scan_mode(ScanType::Background), NativeScanMode::LowPower);
        assert_eq!(to_native_scan_mode(ScanType::LowPowered), NativeScanMode::LowPower);
        assert_eq!(to_native_scan_mode(ScanType::Balanced), NativeScanMode::Balanced);
        assert_eq!(to_native_scan_mode(ScanType::LowLatency), NativeScanMode::LowLatency);
    }

    #[test]
    fn test_match_mappings() {
        assert_eq!(to_native_match_mode(MatchMode::Aggressive), NativeMatchMode::Aggressive);
        assert_eq!(to_native_match_mode(MatchMode::Sticky), NativeMatchMode::Sticky);
        assert_eq!(
            to_native_match_number(NumOfMatches::One),
            NativeMatchNumber::OneAdvertisement
        );
        assert_eq!(
            to_native_match_number(NumOfMatches::Few),
            NativeMatchNumber::FewAdvertisement
        );
        assert_eq!(
            to_native_match_number(NumOfMatches::Max),
            NativeMatchNumber::MaxAdvertisement
        );
    }

    #[test]
    fn test_match_hints_need_advanced_settings() {
        let config = ScanConfig::new(ScanType::Balanced)
            .with_match_mode(MatchMode::Sticky)
            .with_num_of_matches(NumOfMatches::Few);

        let plain = build_settings(&config, &AdapterConfig::default(), false);
        assert_eq!(plain.match_mode, None);
        assert_eq!(plain.num_of_matches, None);

        let tuned = build_settings(&config, &advanced(), false);
        assert_eq!(tuned.match_mode, Some(NativeMatchMode::Sticky));
        assert_eq!(tuned.num_of_matches, Some(NativeMatchNumber::FewAdvertisement));
    }

    #[test]
    fn test_report_delay_needs_request_and_support() {
        let batched = ScanConfig::new(ScanType::Balanced);
        let unbatched = ScanConfig::new(ScanType::Balanced).with_scan_batching(false);
        let adapter_config = AdapterConfig::default();

        assert_eq!(
            build_settings(&batched, &adapter_config, true).report_delay_millis,
            REPORT_DELAY_MILLIS
        );
        assert_eq!(build_settings(&batched, &adapter_config, false).report_delay_millis, 0);
        assert_eq!(build_settings(&unbatched, &adapter_config, true).report_delay_millis, 0);
    }

    #[test]
    fn test_one_filter_per_uuid() {
        assert!(build_filters(&ScanConfig::new(ScanType::Balanced)).is_empty());

        let config = ScanConfig::new(ScanType::Balanced)
            .with_service_uuids([uuid_from_u16(0xAAAA), uuid_from_u16(0xBBBB)]);
        assert_eq!(
            build_filters(&config),
            vec![
                ScanFilter::with_service_uuid(uuid_from_u16(0xAAAA)),
                ScanFilter::with_service_uuid(uuid_from_u16(0xBBBB)),
            ]
        );
    }

    #[test]
    fn test_start_emits_unfiltered_and_release_stops_same_callback() {
        let native = MockNativeScanner::new(false);
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let (tx, mut rx) = mpsc::unbounded();
        let emitter = ResultEmitter::new(ResultMapper::new(registry), tx);
        let config = ScanConfig::new(ScanType::Balanced).with_service_uuids([uuid_from_u16(0xAAAA)]);

        let scan = ModernScan::start(&native, &config, &AdapterConfig::default(), emitter).unwrap();
        assert!(matches!(&native.calls()[0], NativeCall::StartScan { filters, .. } if filters.len() == 1));

        // An advertisement for another service still passes: the native layer
        // owns filtering here.
        let device = NativeDevice::new(BleAddress::new(1, BleAddressKind::Public));
        native.emit(&device, -50, &[0x03, 0x03, 0xCC, 0xCC]);
        let result = futures::executor::block_on(rx.next()).unwrap();
        assert_eq!(result.rssi(), -50);

        scan.release(&native);
        assert_eq!(native.calls().last(), Some(&NativeCall::StopScan));
        assert_eq!(native.active_callbacks(), 0);
    }

    #[test]
    fn test_release_skipped_when_scanner_unavailable() {
        let native = MockNativeScanner::new(false);
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let (tx, _rx) = mpsc::unbounded();
        let emitter = ResultEmitter::new(ResultMapper::new(registry), tx);
        let config = ScanConfig::new(ScanType::LowPowered);

        let scan = ModernScan::start(&native, &config, &AdapterConfig::default(), emitter).unwrap();
        native.set_scanner_available(false);
        scan.release(&native);

        assert_eq!(native.calls().len(), 1);
    }
}
