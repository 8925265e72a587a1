//! The [`DataVersion`] record and the version-ordering queries built on the
//! catalog: nearest-at-or-below lookup, latest-release lookup, and the
//! boundary-crossing predicate that gates structural migrations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CATALOG, UNKNOWN};

/// A cataloged data version: an integer stamp plus its semantic version tag.
///
/// All cataloged versions are 1.x releases or pre-release builds, so the
/// major component is fixed at 1. Entries are plain data; behavior that
/// differs between versions is derived from the minor version (see
/// [`DataVersion::has_poi_files`]) or from the stamp ordering (see
/// [`DataVersion::is_crossed_by_transition`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DataVersion {
    id: i32,
    minor: u8,
    patch: i8,
    build: Option<&'static str>,
}

impl DataVersion {
    /// A full-release catalog entry.
    pub(crate) const fn full(id: i32, minor: u8, patch: i8) -> Self {
        Self {
            id,
            minor,
            patch,
            build: None,
        }
    }

    /// A non-release catalog entry (snapshot, pre-release, release candidate).
    pub(crate) const fn build(id: i32, minor: u8, patch: i8, build: &'static str) -> Self {
        Self {
            id,
            minor,
            patch,
            build: Some(build),
        }
    }

    /// The integer data version stamp, strictly increasing across the catalog.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Major version component. Fixed at 1 for every cataloged entry.
    pub fn major(&self) -> u8 {
        1
    }

    /// Minor version component (the `x` in `1.x.y`).
    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Patch version component. Negative for pre-release builds that predate
    /// any patch numbering of their series.
    pub fn patch(&self) -> i8 {
        self.patch
    }

    /// Build label: `"FINAL"` for full releases, otherwise the pre-release
    /// tag (e.g. `"20w17a"`, `"PRE3"`, `"RC1"`).
    pub fn build_description(&self) -> &'static str {
        self.build.unwrap_or("FINAL")
    }

    /// `true` for full releases, `false` for snapshots, pre-releases, and
    /// release candidates.
    pub fn is_full_release(&self) -> bool {
        self.build.is_none()
    }

    /// Whether worlds of this version keep point-of-interest data in
    /// dedicated per-region files (true as of 1.14).
    pub fn has_poi_files(&self) -> bool {
        self.minor >= 14
    }

    /// Whether worlds of this version keep entities in dedicated per-region
    /// files instead of inside the terrain regions (true as of 1.17).
    pub fn has_entities_files(&self) -> bool {
        self.minor >= 17
    }

    /// Returns the catalog entry with the greatest id at or below `query`.
    ///
    /// Queries below the first cataloged entry answer [`UNKNOWN`] rather than
    /// failing; queries past the last entry clamp to the last entry so that
    /// data from newer, not-yet-cataloged builds is treated like the newest
    /// known version.
    pub fn best_for(query: i32) -> &'static DataVersion {
        match CATALOG.binary_search_by_key(&query, |v| v.id) {
            Ok(i) => &CATALOG[i],
            Err(0) => &UNKNOWN,
            Err(i) => &CATALOG[i - 1],
        }
    }

    /// The newest cataloged full release.
    pub fn latest_full_release() -> &'static DataVersion {
        CATALOG
            .iter()
            .rev()
            .find(|v| v.is_full_release())
            .expect("catalog contains at least one full release")
    }

    /// Whether changing a stamp from `version_a` to `version_b` (in either
    /// direction) passes through this version.
    ///
    /// Call this on the version that introduced a structural change: a true
    /// answer means the change lies between the two stamps, so the transition
    /// needs migration work or must be refused. The boundary is crossed iff
    /// `a != b` and `min(a, b) < self.id <= max(a, b)`; the arguments may be
    /// arbitrary stamps, cataloged or not.
    pub fn is_crossed_by_transition(&self, version_a: i32, version_b: i32) -> bool {
        if version_a == version_b {
            return false;
        }
        let (lo, hi) = if version_a < version_b {
            (version_a, version_b)
        } else {
            (version_b, version_a)
        };
        lo < self.id && self.id <= hi
    }

    /// Fails with [`VersionError::UnsupportedVersionChange`] when
    /// [`is_crossed_by_transition`](Self::is_crossed_by_transition) holds for
    /// the given stamps.
    pub fn check_not_crossed(&self, version_a: i32, version_b: i32) -> Result<(), VersionError> {
        if self.is_crossed_by_transition(version_a, version_b) {
            return Err(VersionError::UnsupportedVersionChange {
                boundary: *self,
                from: version_a,
                to: version_b,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DataVersion {
    /// Renders as `"<id> (1.<minor>[.<patch>][ <build>])"`, e.g.
    /// `"2724 (1.17.0)"` or `"2529 (1.16.0 20w17a)"`. The `UNKNOWN` sentinel
    /// renders as `"UNKNOWN"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            return write!(f, "UNKNOWN");
        }
        write!(f, "{} (1.{}", self.id, self.minor)?;
        if self.patch >= 0 {
            write!(f, ".{}", self.patch)?;
        }
        if let Some(build) = self.build {
            write!(f, " {build}")?;
        }
        write!(f, ")")
    }
}

/// Errors raised by version-transition checks.
#[derive(Debug, Error)]
pub enum VersionError {
    /// A requested stamp change crosses a structural boundary in the
    /// direction that cannot be migrated.
    #[error("data version change from {from} to {to} crosses {boundary}")]
    UnsupportedVersionChange {
        /// The structural-change version that lies between the two stamps.
        boundary: DataVersion,
        /// The stamp the data currently carries.
        from: i32,
        /// The stamp that was requested.
        to: i32,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
