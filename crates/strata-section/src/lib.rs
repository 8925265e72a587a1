//! Palette-indexed block-state storage for 16×16×16 terrain sections.
//!
//! A [`Section`] owns a deduplicated palette of [`BlockState`] symbols and a
//! bit-packed index array addressing 4096 positions. The packed layout
//! changed across a historical data-version boundary; [`bit_pack`] implements
//! both layouts and [`Section::set_data_version`] performs the one legal
//! migration between them. Bulk edits go through [`BlockStateCursor`], which
//! defers palette compaction to a single pass at the end.

pub mod bit_pack;
pub mod cursor;
pub mod error;
pub mod light;
pub mod palette;
pub mod section;

pub use bit_pack::{IndexLayout, PackedArray, SECTION_VOLUME, bits_for_palette};
pub use cursor::BlockStateCursor;
pub use error::SectionError;
pub use light::{LIGHT_BUFFER_LEN, LightBuffer};
pub use palette::{BlockState, Palette};
pub use section::{
    ALL_DATA, BLOCK_LIGHT, BLOCK_STATES, SKY_LIGHT, Section, block_index,
};
