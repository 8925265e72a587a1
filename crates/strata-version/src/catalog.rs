//! The version catalog: every data version stamp this library knows about.
//!
//! Kept in ascending id order (unit test enforced). The set of non-release
//! entries is not the complete set of all builds that ever shipped, only
//! those that matter for storage handling; completeness would only help map
//! viewers and editors.
//!
//! Source of the stamps: the `version.json` embedded in each build, plus the
//! community data-version tables.

use crate::version::DataVersion;

/// Sentinel for stamps that predate the catalog. Id 0.
pub const UNKNOWN: DataVersion = DataVersion::full(0, 0, 0);

pub const V1_9_0: DataVersion = DataVersion::full(169, 9, 0);
pub const V1_9_1: DataVersion = DataVersion::full(175, 9, 1);
pub const V1_9_2: DataVersion = DataVersion::full(176, 9, 2);
pub const V1_9_3: DataVersion = DataVersion::full(183, 9, 3);
pub const V1_9_4: DataVersion = DataVersion::full(184, 9, 4);

pub const V1_10_0: DataVersion = DataVersion::full(510, 10, 0);
pub const V1_10_1: DataVersion = DataVersion::full(511, 10, 1);
pub const V1_10_2: DataVersion = DataVersion::full(512, 10, 2);

pub const V1_11_0: DataVersion = DataVersion::full(819, 11, 0);
pub const V1_11_1: DataVersion = DataVersion::full(921, 11, 1);
pub const V1_11_2: DataVersion = DataVersion::full(922, 11, 2);

pub const V1_12_0: DataVersion = DataVersion::full(1139, 12, 0);
pub const V1_12_1: DataVersion = DataVersion::full(1241, 12, 1);
pub const V1_12_2: DataVersion = DataVersion::full(1343, 12, 2);

pub const V1_13_0: DataVersion = DataVersion::full(1519, 13, 0);
pub const V1_13_1: DataVersion = DataVersion::full(1628, 13, 1);
pub const V1_13_2: DataVersion = DataVersion::full(1631, 13, 2);

/// Point-of-interest region files introduced.
pub const V1_14_0: DataVersion = DataVersion::full(1952, 14, 0);
pub const V1_14_1: DataVersion = DataVersion::full(1957, 14, 1);
pub const V1_14_2: DataVersion = DataVersion::full(1963, 14, 2);
pub const V1_14_3: DataVersion = DataVersion::full(1968, 14, 3);
pub const V1_14_4: DataVersion = DataVersion::full(1976, 14, 4);

/// 3D biomes: the per-chunk biome array grew from 256 to 1024 entries.
pub const V1_15_19W36A: DataVersion = DataVersion::build(2203, 15, -1, "19w36a");
pub const V1_15_0: DataVersion = DataVersion::full(2225, 15, 0);
pub const V1_15_1: DataVersion = DataVersion::full(2227, 15, 1);
pub const V1_15_2: DataVersion = DataVersion::full(2230, 15, 2);

/// Block-state packing changed: packed indices stopped straddling words.
/// This is the boundary the section codec's layout selection keys on.
pub const V1_16_20W17A: DataVersion = DataVersion::build(2529, 16, 0, "20w17a");
pub const V1_16_0: DataVersion = DataVersion::full(2566, 16, 0);
pub const V1_16_1: DataVersion = DataVersion::full(2567, 16, 1);
pub const V1_16_2: DataVersion = DataVersion::full(2578, 16, 2);
pub const V1_16_3: DataVersion = DataVersion::full(2580, 16, 3);
pub const V1_16_4: DataVersion = DataVersion::full(2584, 16, 4);
pub const V1_16_5: DataVersion = DataVersion::full(2586, 16, 5);

/// Entities moved out of terrain regions into their own region files.
pub const V1_17_20W45A: DataVersion = DataVersion::build(2681, 17, 0, "20w45a");
pub const V1_17_0: DataVersion = DataVersion::full(2724, 17, 0);
pub const V1_17_1: DataVersion = DataVersion::full(2730, 17, 1);

pub const V1_18_XS1: DataVersion = DataVersion::build(2825, 18, 0, "XS1");
/// Sections gained container structures for block states and biomes.
pub const V1_18_21W39A: DataVersion = DataVersion::build(2836, 18, 0, "21w39a");
/// Chunk root flattened; sections, entities, and structures renamed/moved.
pub const V1_18_21W43A: DataVersion = DataVersion::build(2844, 18, 0, "21w43a");
pub const V1_18_PRE1: DataVersion = DataVersion::build(2847, 18, 0, "PRE1");
pub const V1_18_PRE2: DataVersion = DataVersion::build(2848, 18, 0, "PRE2");
pub const V1_18_PRE3: DataVersion = DataVersion::build(2849, 18, 0, "PRE3");
pub const V1_18_PRE4: DataVersion = DataVersion::build(2850, 18, 0, "PRE4");
pub const V1_18_PRE5: DataVersion = DataVersion::build(2851, 18, 0, "PRE5");
pub const V1_18_PRE6: DataVersion = DataVersion::build(2853, 18, 0, "PRE6");
pub const V1_18_PRE7: DataVersion = DataVersion::build(2854, 18, 0, "PRE7");
pub const V1_18_PRE8: DataVersion = DataVersion::build(2855, 18, 0, "PRE8");
pub const V1_18_RC1: DataVersion = DataVersion::build(2856, 18, 0, "RC1");
pub const V1_18_RC2: DataVersion = DataVersion::build(2857, 18, 0, "RC2");
pub const V1_18_RC3: DataVersion = DataVersion::build(2858, 18, 0, "RC3");
pub const V1_18_RC4: DataVersion = DataVersion::build(2859, 18, 0, "RC4");
pub const V1_18_0: DataVersion = DataVersion::full(2860, 18, 0);
pub const V1_18_1_PRE1: DataVersion = DataVersion::build(2861, 18, 1, "PRE1");
pub const V1_18_1_RC1: DataVersion = DataVersion::build(2862, 18, 1, "RC1");
pub const V1_18_1_RC2: DataVersion = DataVersion::build(2863, 18, 1, "RC2");
pub const V1_18_1_RC3: DataVersion = DataVersion::build(2864, 18, 1, "RC3");
pub const V1_18_1: DataVersion = DataVersion::full(2865, 18, 1);

/// The full catalog, ascending by id.
pub static CATALOG: &[DataVersion] = &[
    UNKNOWN,
    V1_9_0,
    V1_9_1,
    V1_9_2,
    V1_9_3,
    V1_9_4,
    V1_10_0,
    V1_10_1,
    V1_10_2,
    V1_11_0,
    V1_11_1,
    V1_11_2,
    V1_12_0,
    V1_12_1,
    V1_12_2,
    V1_13_0,
    V1_13_1,
    V1_13_2,
    V1_14_0,
    V1_14_1,
    V1_14_2,
    V1_14_3,
    V1_14_4,
    V1_15_19W36A,
    V1_15_0,
    V1_15_1,
    V1_15_2,
    V1_16_20W17A,
    V1_16_0,
    V1_16_1,
    V1_16_2,
    V1_16_3,
    V1_16_4,
    V1_16_5,
    V1_17_20W45A,
    V1_17_0,
    V1_17_1,
    V1_18_XS1,
    V1_18_21W39A,
    V1_18_21W43A,
    V1_18_PRE1,
    V1_18_PRE2,
    V1_18_PRE3,
    V1_18_PRE4,
    V1_18_PRE5,
    V1_18_PRE6,
    V1_18_PRE7,
    V1_18_PRE8,
    V1_18_RC1,
    V1_18_RC2,
    V1_18_RC3,
    V1_18_RC4,
    V1_18_0,
    V1_18_1_PRE1,
    V1_18_1_RC1,
    V1_18_1_RC2,
    V1_18_1_RC3,
    V1_18_1,
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_strictly_ascending() {
        for pair in CATALOG.windows(2) {
            assert!(
                pair[0].id() < pair[1].id(),
                "catalog out of order at {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_catalog_starts_at_unknown() {
        assert_eq!(CATALOG[0], UNKNOWN);
        assert_eq!(UNKNOWN.id(), 0);
    }

    #[test]
    fn test_packing_boundary_stamp() {
        assert_eq!(V1_16_20W17A.id(), 2529);
        assert!(!V1_16_20W17A.is_full_release());
    }
}
