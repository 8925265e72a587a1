//! Data-version catalog and ordering logic for terrain storage migrations.
//!
//! Savegame data carries an integer data version stamp. The catalog maps known
//! stamps to semantic versions and records which stamps introduced structural
//! changes to the storage format. Migration code asks whether moving between
//! two stamps *crosses* a structural boundary rather than comparing for
//! equality, because most stamps in the wild are not cataloged.

pub mod catalog;
pub mod version;

pub use version::{DataVersion, VersionError};
