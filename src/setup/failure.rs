// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setup failure taxonomy.

use serde::{Deserialize, Serialize};

/// Error codes reported by setup task stages.
///
/// Codes are grouped into three contiguous blocks, one per failure
/// category; the taxonomy mapper works on the inclusive block bounds.
pub mod error_codes {
    /// No download URL was configured for the URL install path.
    pub const EMPTY_DOWNLOAD_URL: i32 = 0;
    /// The download transfer failed.
    pub const DOWNLOAD_FAILED: i32 = 1;
    /// The downloaded file is unreadable or truncated.
    pub const INVALID_DOWNLOADED_FILE: i32 = 2;
    /// The download followed too many redirects.
    pub const TOO_MANY_REDIRECTS: i32 = 3;

    /// The package metadata could not be read.
    pub const NO_PACKAGE_INFO: i32 = 10;
    /// The package carries no signature to verify.
    pub const MISSING_REQUIRED_SIGNATURE: i32 = 11;
    /// The package signature does not match the configured checksum.
    pub const SIGNATURE_MISMATCH: i32 = 12;
    /// The package is signed by multiple signers.
    pub const PACKAGE_HAS_MULTIPLE_SIGNERS: i32 = 13;

    /// A local staging file could not be created.
    pub const CREATE_LOCAL_FILE_FAILED: i32 = 20;
    /// The platform installer rejected the package.
    pub const INSTALLATION_FAILED: i32 = 21;
    /// The installer completion intent could not be obtained.
    pub const GET_PENDING_INTENT_FAILED: i32 = 22;
}

/// Coarse category of a terminal setup failure, reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureType {
    /// Downloading the kiosk package failed.
    DownloadFailed,
    /// Verifying the kiosk package failed.
    VerificationFailed,
    /// Installing the kiosk package failed.
    InstallFailed,
    /// Generic setup failure (unmapped code, missing configuration,
    /// inconsistent state).
    SetupFailed,
}

/// Maps a stage error code onto its failure category.
///
/// Total over `i32`: codes inside one of the three inclusive blocks map
/// to the block's category, everything else (including `-1`, the
/// no-code marker) maps to [`FailureType::SetupFailed`].
#[must_use]
pub fn failure_type_for_code(code: i32) -> FailureType {
    use error_codes as c;

    match code {
        c::EMPTY_DOWNLOAD_URL..=c::TOO_MANY_REDIRECTS => FailureType::DownloadFailed,
        c::NO_PACKAGE_INFO..=c::PACKAGE_HAS_MULTIPLE_SIGNERS => FailureType::VerificationFailed,
        c::CREATE_LOCAL_FILE_FAILED..=c::GET_PENDING_INTENT_FAILED => FailureType::InstallFailed,
        _ => FailureType::SetupFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::error_codes as c;
    use super::*;

    #[test]
    fn download_range_boundaries_inclusive() {
        assert_eq!(
            failure_type_for_code(c::EMPTY_DOWNLOAD_URL),
            FailureType::DownloadFailed
        );
        assert_eq!(
            failure_type_for_code(c::TOO_MANY_REDIRECTS),
            FailureType::DownloadFailed
        );
    }

    #[test]
    fn verification_range_boundaries_inclusive() {
        assert_eq!(
            failure_type_for_code(c::NO_PACKAGE_INFO),
            FailureType::VerificationFailed
        );
        assert_eq!(
            failure_type_for_code(c::PACKAGE_HAS_MULTIPLE_SIGNERS),
            FailureType::VerificationFailed
        );
    }

    #[test]
    fn install_range_boundaries_inclusive() {
        assert_eq!(
            failure_type_for_code(c::CREATE_LOCAL_FILE_FAILED),
            FailureType::InstallFailed
        );
        assert_eq!(
            failure_type_for_code(c::GET_PENDING_INTENT_FAILED),
            FailureType::InstallFailed
        );
    }

    #[test]
    fn out_of_range_codes_map_to_generic() {
        assert_eq!(failure_type_for_code(-1), FailureType::SetupFailed);
        assert_eq!(
            failure_type_for_code(c::TOO_MANY_REDIRECTS + 1),
            FailureType::SetupFailed
        );
        assert_eq!(
            failure_type_for_code(c::GET_PENDING_INTENT_FAILED + 1),
            FailureType::SetupFailed
        );
        assert_eq!(failure_type_for_code(i32::MAX), FailureType::SetupFailed);
        assert_eq!(failure_type_for_code(i32::MIN), FailureType::SetupFailed);
    }

    #[test]
    fn gaps_between_ranges_map_to_generic() {
        for code in (c::TOO_MANY_REDIRECTS + 1)..c::NO_PACKAGE_INFO {
            assert_eq!(failure_type_for_code(code), FailureType::SetupFailed);
        }
        for code in (c::PACKAGE_HAS_MULTIPLE_SIGNERS + 1)..c::CREATE_LOCAL_FILE_FAILED {
            assert_eq!(failure_type_for_code(code), FailureType::SetupFailed);
        }
    }
}
