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

use thiserror::Error;

/// Library error type.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ScanError {
    /// Reported by `scan()` when a scan configuration value is not a member of
    /// its enumerated set. Nothing has been started when this is returned.
    #[error("invalid scan configuration: {0}")]
    Configuration(String),
    /// Reported when a conversion receives a value outside of its domain, e.g.
    /// an unknown integer code for a scan type.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Reported when the native scanning facility is absent, typically
    /// because the adapter is powered off.
    #[error("bluetooth scanner unavailable: {0}")]
    Unavailable(String),
    /// Indicates that the operation was rejected because the system is not in
    /// a state required for the operation's execution.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    /// Wrapper around errors reported by the native Bluetooth stack.
    #[error("bluetooth system-level error: {0}")]
    System(String),
    /// Reported when a bug occurs inside the library. Whenever a seemingly
    /// impossible error condition arises where you could call `expect()`,
    /// return this error instead.
    #[error("internal error: {0}")]
    Internal(String),
}
