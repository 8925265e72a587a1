//! The section codec: one 16×16×16 volume of palette-indexed block states
//! plus its light buffers, loaded from and serialized back to a tag compound.
//!
//! A section is constructed once against a data version; that version fixes
//! the packed-index layout for the section's lifetime. The palette only ever
//! grows during individual writes; unused entries are removed by the batched
//! [`Section::cleanup_palette_and_block_states`] pass, which callers defer
//! until the end of a bulk edit (see [`crate::cursor::BlockStateCursor`]).

use strata_tag::{Compound, Tag};
use strata_version::VersionError;
use strata_version::catalog::V1_16_20W17A;

use crate::bit_pack::{IndexLayout, PackedArray, SECTION_VOLUME, bits_for_palette};
use crate::cursor::BlockStateCursor;
use crate::error::SectionError;
use crate::light::LightBuffer;
use crate::palette::{BlockState, Palette};

/// Load-selector bit: materialize the `BlockLight` buffer.
pub const BLOCK_LIGHT: u8 = 0b0000_0001;
/// Load-selector bit: materialize the `BlockStates` index array.
pub const BLOCK_STATES: u8 = 0b0000_0010;
/// Load-selector bit: materialize the `SkyLight` buffer.
pub const SKY_LIGHT: u8 = 0b0000_0100;
/// Load-selector: materialize everything.
pub const ALL_DATA: u8 = BLOCK_LIGHT | BLOCK_STATES | SKY_LIGHT;

/// Maps section-local coordinates to a linear slot in `0..4096`.
///
/// Y-major, then Z, then X; each coordinate is masked to `0..16`.
pub fn block_index(x: i32, y: i32, z: i32) -> usize {
    ((y & 0xF) as usize) * 256 + ((z & 0xF) as usize) * 16 + (x & 0xF) as usize
}

/// One terrain section: palette, packed index array, light buffers, and the
/// retained source document.
///
/// Buffers left unselected at load time (or absent from the document) stay
/// `None`. A document with no `Palette` list produces a pass-through shell:
/// block-state access decodes nothing, but the retained document still
/// round-trips unchanged through [`Section::update_handle`].
#[derive(Clone, Debug)]
pub struct Section {
    data_version: i32,
    height: i8,
    palette: Option<Palette>,
    block_states: Option<PackedArray>,
    block_light: Option<LightBuffer>,
    sky_light: Option<LightBuffer>,
    doc: Compound,
}

impl Section {
    /// A default section for `data_version`: an air-only palette, a zeroed
    /// 4-bit index array in the version's layout, and dark light buffers.
    ///
    /// # Errors
    ///
    /// [`SectionError::InvalidDataVersion`] when `data_version <= 0`.
    pub fn new(data_version: i32) -> Result<Self, SectionError> {
        if data_version <= 0 {
            return Err(SectionError::InvalidDataVersion(data_version));
        }
        let layout = IndexLayout::for_data_version(data_version);
        Ok(Self {
            data_version,
            height: 0,
            palette: Some(Palette::with_default(BlockState::air())),
            block_states: Some(PackedArray::new(layout, 4)),
            block_light: Some(LightBuffer::new()),
            sky_light: Some(LightBuffer::new()),
            doc: Compound::new(),
        })
    }

    /// Loads a section from a document, materializing only the buffers
    /// selected by `load_flags` ([`BLOCK_LIGHT`] | [`BLOCK_STATES`] |
    /// [`SKY_LIGHT`], or [`ALL_DATA`]).
    ///
    /// A document without a `Palette` list yields a pass-through shell: no
    /// buffers are decoded at all and the document is retained verbatim.
    ///
    /// # Errors
    ///
    /// [`SectionError::InvalidDataVersion`] when `data_version <= 0`;
    /// [`SectionError::MalformedPaletteEntry`] when a palette record is not
    /// a compound carrying a `Name` string.
    pub fn from_compound(
        doc: Compound,
        data_version: i32,
        load_flags: u8,
    ) -> Result<Self, SectionError> {
        if data_version <= 0 {
            return Err(SectionError::InvalidDataVersion(data_version));
        }
        let layout = IndexLayout::for_data_version(data_version);
        let height = doc.byte("Y").unwrap_or(0);

        let mut section = Self {
            data_version,
            height,
            palette: None,
            block_states: None,
            block_light: None,
            sky_light: None,
            doc,
        };

        let Some(records) = section.doc.list("Palette") else {
            return Ok(section);
        };
        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let state = record
                .as_compound()
                .and_then(BlockState::from_compound)
                .ok_or(SectionError::MalformedPaletteEntry { index })?;
            entries.push(state);
        }
        section.palette = Some(Palette::from_entries(entries));

        if load_flags & BLOCK_LIGHT != 0 {
            if let Some(bytes) = section.doc.byte_array("BlockLight") {
                section.block_light = Some(LightBuffer::from_raw(bytes.to_vec()));
            }
        }
        if load_flags & BLOCK_STATES != 0 {
            if let Some(words) = section.doc.long_array("BlockStates") {
                section.block_states = Some(PackedArray::from_words(layout, words.to_vec()));
            }
        }
        if load_flags & SKY_LIGHT != 0 {
            if let Some(bytes) = section.doc.byte_array("SkyLight") {
                section.sky_light = Some(LightBuffer::from_raw(bytes.to_vec()));
            }
        }
        Ok(section)
    }

    /// The data version this section was constructed against.
    pub fn data_version(&self) -> i32 {
        self.data_version
    }

    /// The section's vertical slot within its column.
    pub fn height(&self) -> i8 {
        self.height
    }

    /// Sets the section's vertical slot.
    pub fn set_height(&mut self, height: i8) {
        self.height = height;
    }

    /// The palette, when this section decodes block states.
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// The packed index array, when materialized.
    pub fn block_states(&self) -> Option<&PackedArray> {
        self.block_states.as_ref()
    }

    /// The block-light buffer, when materialized.
    pub fn block_light(&self) -> Option<&LightBuffer> {
        self.block_light.as_ref()
    }

    /// Mutable access to the block-light buffer, when materialized.
    pub fn block_light_mut(&mut self) -> Option<&mut LightBuffer> {
        self.block_light.as_mut()
    }

    /// The sky-light buffer, when materialized.
    pub fn sky_light(&self) -> Option<&LightBuffer> {
        self.sky_light.as_ref()
    }

    /// Mutable access to the sky-light buffer, when materialized.
    pub fn sky_light_mut(&mut self) -> Option<&mut LightBuffer> {
        self.sky_light.as_mut()
    }

    /// Replaces the block-light buffer. The buffer must be exactly 2048
    /// bytes; on rejection the prior buffer is untouched.
    pub fn set_block_light(&mut self, bytes: Vec<u8>) -> Result<(), SectionError> {
        self.block_light = Some(LightBuffer::from_bytes(bytes)?);
        Ok(())
    }

    /// Drops the block-light buffer.
    pub fn clear_block_light(&mut self) {
        self.block_light = None;
    }

    /// Replaces the sky-light buffer. The buffer must be exactly 2048 bytes;
    /// on rejection the prior buffer is untouched.
    pub fn set_sky_light(&mut self, bytes: Vec<u8>) -> Result<(), SectionError> {
        self.sky_light = Some(LightBuffer::from_bytes(bytes)?);
        Ok(())
    }

    /// Drops the sky-light buffer.
    pub fn clear_sky_light(&mut self) {
        self.sky_light = None;
    }

    /// Replaces the raw packed index words. The length must be a multiple of
    /// 64 in `[256, 4096]`; on rejection the prior array is untouched.
    pub fn set_block_states(&mut self, words: Vec<u64>) -> Result<(), SectionError> {
        let len = words.len();
        if len % 64 != 0 || !(256..=4096).contains(&len) {
            return Err(SectionError::InvalidBlockStates(len));
        }
        let layout = IndexLayout::for_data_version(self.data_version);
        self.block_states = Some(PackedArray::from_words(layout, words));
        Ok(())
    }

    /// The block state at section-local `(x, y, z)`, or `None` on a
    /// pass-through shell. Positions never written decode to palette index 0.
    ///
    /// # Panics
    ///
    /// Panics when the packed entry at the position exceeds the palette.
    /// That is an inconsistency in the loaded data or a bug in the codec,
    /// not a recoverable condition.
    pub fn block_state_at(&self, x: i32, y: i32, z: i32) -> Option<&BlockState> {
        self.block_state_at_slot(block_index(x, y, z))
    }

    pub(crate) fn block_state_at_slot(&self, slot: usize) -> Option<&BlockState> {
        let palette = self.palette.as_ref()?;
        let index = match &self.block_states {
            Some(states) => states.get(slot),
            None => 0,
        };
        let state = palette.get(index).unwrap_or_else(|| {
            panic!(
                "packed index {index} at slot {slot} exceeds palette of {} entries",
                palette.len()
            )
        });
        Some(state)
    }

    /// Writes a block state at section-local `(x, y, z)`, deduplicating it
    /// into the palette.
    ///
    /// When the insertion pushes the palette past a power-of-two size, the
    /// whole index array is re-encoded at the next width before the write
    /// (an entry that does not fit the old width cannot be stored first) and
    /// a cleanup is forced regardless of `cleanup`.
    ///
    /// Returns `true` iff [`Section::cleanup_palette_and_block_states`] ran
    /// as part of this call; a `true` answer means no cleanup is owed for
    /// the writes so far. Pass `cleanup = false` during bulk edits and run
    /// the cleanup once at the end.
    pub fn set_block_state_at(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        state: &BlockState,
        cleanup: bool,
    ) -> bool {
        self.ensure_palette();
        let palette = self.palette.as_mut().expect("palette just ensured");
        let size_before = palette.len();
        let palette_index = palette.insert(state);
        let mut cleanup = cleanup;
        if palette.len() != size_before && palette_index.is_power_of_two() {
            // The palette crossed a power-of-two size: re-encode everything
            // at the new width before writing the new index.
            self.ensure_block_states();
            self.adjust_block_state_bits(None);
            cleanup = true;
        }

        self.ensure_block_states();
        self.block_states
            .as_mut()
            .expect("block states just ensured")
            .set(block_index(x, y, z), palette_index);

        if cleanup {
            self.cleanup_palette_and_block_states();
            return true;
        }
        false
    }

    /// Recomputes the minimal palette and re-encodes the index array at the
    /// matching width. Idempotent.
    ///
    /// Scans all 4096 slots for referenced palette indices, drops unused
    /// entries (index 0 is always kept), renumbers survivors in order, and
    /// rewrites every slot through the old→new remap. Costs a full-section
    /// scan regardless of how much changed, which is why individual writes
    /// defer it.
    pub fn cleanup_palette_and_block_states(&mut self) {
        let (Some(palette), Some(states)) = (&mut self.palette, &self.block_states) else {
            return;
        };
        if palette.is_empty() {
            return;
        }
        let mut used = vec![false; palette.len()];
        for slot in 0..SECTION_VOLUME {
            used[states.get(slot)] = true;
        }
        let remap = palette.compact(&used);
        tracing::debug!(
            palette_len = palette.len(),
            "compacted section palette"
        );
        self.adjust_block_state_bits(Some(&remap));
    }

    /// Re-stamps the section to `new_version`, migrating the packed layout
    /// when the packing-change boundary is crossed upward.
    ///
    /// Crossing the boundary downward is refused: the tight layout cannot
    /// represent what the padded layout allows, and reinterpreting the words
    /// would corrupt the section. On refusal the section keeps its prior
    /// version.
    ///
    /// # Errors
    ///
    /// [`SectionError::InvalidDataVersion`] when `new_version <= 0`;
    /// [`SectionError::Version`] when the transition crosses the boundary
    /// downward.
    pub fn set_data_version(&mut self, new_version: i32) -> Result<(), SectionError> {
        if new_version <= 0 {
            return Err(SectionError::InvalidDataVersion(new_version));
        }
        let boundary = V1_16_20W17A;
        if boundary.is_crossed_by_transition(self.data_version, new_version) {
            if new_version < self.data_version {
                return Err(VersionError::UnsupportedVersionChange {
                    boundary,
                    from: self.data_version,
                    to: new_version,
                }
                .into());
            }
            self.upgrade_packing();
        }
        self.data_version = new_version;
        Ok(())
    }

    /// Writes the section's state back into the retained document and
    /// returns it. Keys this codec does not own are preserved as loaded;
    /// buffers that are `None` are left to whatever the document already
    /// holds.
    pub fn update_handle(&mut self) -> &Compound {
        self.doc.put_byte("Y", self.height);
        if let Some(palette) = &self.palette {
            let records = palette
                .entries()
                .iter()
                .map(|state| Tag::Compound(state.to_compound()))
                .collect();
            self.doc.put_list("Palette", records);
        }
        if let Some(light) = &self.block_light {
            self.doc.put_byte_array("BlockLight", light.bytes().to_vec());
        }
        if let Some(states) = &self.block_states {
            self.doc.put_long_array("BlockStates", states.words().to_vec());
        }
        if let Some(light) = &self.sky_light {
            self.doc.put_byte_array("SkyLight", light.bytes().to_vec());
        }
        &self.doc
    }

    /// A single-pass mutation cursor over this section's 4096 slots.
    pub fn block_state_cursor(&mut self) -> BlockStateCursor<'_> {
        BlockStateCursor::new(self)
    }

    /// Re-encodes all 4096 slots into a fresh array at the minimal width for
    /// the current palette, applying `old_to_new` when given (the compaction
    /// remap). Without a remap, indices carry over unchanged; that is the
    /// width-growth path.
    fn adjust_block_state_bits(&mut self, old_to_new: Option<&[usize]>) {
        let palette_len = self.palette.as_ref().map_or(0, Palette::len);
        let new_bits = bits_for_palette(palette_len);
        let old = self
            .block_states
            .as_ref()
            .expect("index array present when adjusting width");
        let mut fresh = PackedArray::new(old.layout(), new_bits);
        for slot in 0..SECTION_VOLUME {
            let index = old.get(slot);
            let index = match old_to_new {
                Some(map) => map[index],
                None => index,
            };
            fresh.set(slot, index);
        }
        self.block_states = Some(fresh);
    }

    /// Tight → padded re-layout at the current minimal width, run when the
    /// packing boundary is crossed upward.
    fn upgrade_packing(&mut self) {
        let Some(palette) = &self.palette else {
            tracing::warn!(
                "skipping packing upgrade for a section with no palette"
            );
            return;
        };
        let new_bits = bits_for_palette(palette.len());
        self.ensure_block_states();
        let old = self
            .block_states
            .take()
            .expect("index array just ensured");
        let mut fresh = PackedArray::new(IndexLayout::Padded, new_bits);
        for slot in 0..SECTION_VOLUME {
            fresh.set(slot, old.get(slot));
        }
        tracing::debug!(bits = new_bits, "repacked section to padded layout");
        self.block_states = Some(fresh);
    }

    fn ensure_palette(&mut self) {
        if self.palette.is_none() {
            self.palette = Some(Palette::with_default(BlockState::air()));
        }
    }

    fn ensure_block_states(&mut self) {
        if self.block_states.is_none() {
            let layout = IndexLayout::for_data_version(self.data_version);
            self.block_states = Some(PackedArray::new(layout, 4));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
