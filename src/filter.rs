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

use crate::{AdvertisementData, ScanConfig};

/// Unit struct providing service UUID filtering for scanners that can't filter
/// natively.
pub struct AdvertisementFilter;

impl AdvertisementFilter {
    /// Whether `ad` should be surfaced under `config`.
    /// * No configured UUIDs: always included.
    /// * Advertisement carries no UUIDs: always included, there is nothing to
    ///   match against.
    /// * Otherwise included iff the two UUID sets intersect.
    pub fn include(ad: &AdvertisementData, config: &ScanConfig) -> bool {
        let wanted = config.service_uuids();
        let advertised = ad.service_uuids();
        if wanted.is_empty() || advertised.is_empty() {
            return true;
        }

        advertised.iter().any(|uuid| wanted.contains(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::uuid_from_u16, ScanType};

    /// Builds a record advertising the given 16-bit service UUIDs.
    fn ad_with_uuids(uuids: &[u16]) -> AdvertisementData {
        let mut record = vec![(uuids.len() * 2 + 1) as u8, 0x03];
        for uuid in uuids {
            record.extend_from_slice(&uuid.to_le_bytes());
        }
        AdvertisementData::parse(&record)
    }

    fn config_with_uuids(uuids: &[u16]) -> ScanConfig {
        ScanConfig::new(ScanType::LowLatency)
            .with_service_uuids(uuids.iter().map(|uuid| uuid_from_u16(*uuid)))
    }

    #[test]
    fn test_no_configured_uuids_includes_everything() {
        let config = config_with_uuids(&[]);
        assert!(AdvertisementFilter::include(&ad_with_uuids(&[0x180D]), &config));
        assert!(AdvertisementFilter::include(&AdvertisementData::parse(&[]), &config));
    }

    #[test]
    fn test_advertisement_without_uuids_is_included() {
        let config = config_with_uuids(&[0xAAAA, 0xBBBB]);
        assert!(AdvertisementFilter::include(&ad_with_uuids(&[]), &config));
        assert!(AdvertisementFilter::include(&AdvertisementData::parse(&[]), &config));
    }

    #[test]
    fn test_intersection_is_included() {
        let config = config_with_uuids(&[0xAAAA, 0xBBBB]);
        assert!(AdvertisementFilter::include(&ad_with_uuids(&[0xBBBB]), &config));
        assert!(AdvertisementFilter::include(
            &ad_with_uuids(&[0x1234, 0xAAAA]),
            &config
        ));
    }

    #[test]
    fn test_disjoint_is_excluded() {
        let config = config_with_uuids(&[0xAAAA, 0xBBBB]);
        assert!(!AdvertisementFilter::include(&ad_with_uuids(&[0xCCCC]), &config));
        assert!(!AdvertisementFilter::include(
            &ad_with_uuids(&[0x1234, 0x5678]),
            &config
        ));
    }
}
