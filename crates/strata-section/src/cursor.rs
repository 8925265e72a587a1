//! Single-pass mutation cursor over a section's block states.
//!
//! The cursor visits all 4096 slots in ascending linear order (x fastest,
//! then z, then y) and lets the caller rewrite states as it goes without
//! paying a palette compaction per write: each write defers the cleanup, and
//! [`BlockStateCursor::finish`] settles the debt once at the end. The cursor
//! exclusively borrows its section, so one pass cannot overlap another.

use crate::palette::BlockState;
use crate::section::Section;

/// A forward-only cursor over a section's 4096 slots.
///
/// Obtained from [`Section::block_state_cursor`]. Call
/// [`advance`](Self::advance) before the first access; the current state is
/// cached per slot rather than re-fetched.
pub struct BlockStateCursor<'a> {
    section: &'a mut Section,
    world_y_base: i32,
    slot: i32,
    current: Option<BlockState>,
    cleanup_owed: bool,
}

impl<'a> BlockStateCursor<'a> {
    pub(crate) fn new(section: &'a mut Section) -> Self {
        let world_y_base = i32::from(section.height()) * 16;
        Self {
            section,
            world_y_base,
            slot: -1,
            current: None,
            cleanup_owed: false,
        }
    }

    /// Moves to the next slot and caches its state. Returns `false` once all
    /// 4096 slots have been visited.
    pub fn advance(&mut self) -> bool {
        if self.slot >= 4095 {
            return false;
        }
        self.slot += 1;
        self.current = self
            .section
            .block_state_at_slot(self.slot as usize)
            .cloned();
        true
    }

    /// The state at the cursor's current slot, as cached by the last
    /// [`advance`](Self::advance).
    ///
    /// # Panics
    ///
    /// Panics before the first `advance`, or when the section is a
    /// pass-through shell with no palette to decode from.
    pub fn current(&self) -> &BlockState {
        self.current
            .as_ref()
            .expect("cursor has no current block state")
    }

    /// Rewrites the current slot with `state`, deferring palette cleanup.
    ///
    /// Tracks whether the write left a cleanup owed; [`finish`](Self::finish)
    /// settles it. A write that forced its own cleanup (palette width growth)
    /// clears the debt, since that cleanup covered all earlier writes too.
    ///
    /// # Panics
    ///
    /// Panics before the first [`advance`](Self::advance).
    pub fn set_current(&mut self, state: &BlockState) {
        assert!(self.slot >= 0, "cursor not advanced");
        let (x, y, z) = (self.x(), self.y(), self.z());
        let ran = self.section.set_block_state_at(x, y, z, state, false);
        self.cleanup_owed = !ran;
        self.current = Some(state.clone());
    }

    /// Runs the deferred palette cleanup if any write left one owed.
    ///
    /// Consumes the cursor; a traversal settles its debt exactly once.
    pub fn finish(self) {
        if self.cleanup_owed {
            self.section.cleanup_palette_and_block_states();
        }
    }

    /// The current linear slot index (`0..4096`).
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// Section-local x of the current slot.
    pub fn x(&self) -> i32 {
        self.slot & 0xF
    }

    /// Section-local z of the current slot.
    pub fn z(&self) -> i32 {
        (self.slot >> 4) & 0xF
    }

    /// Section-local y of the current slot.
    pub fn y(&self) -> i32 {
        self.slot >> 8
    }

    /// Absolute world y of the current slot, offset by the section's
    /// vertical slot.
    pub fn world_y(&self) -> i32 {
        self.world_y_base + self.y()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::block_index;

    fn stone() -> BlockState {
        BlockState::new("minecraft:stone")
    }

    fn glass() -> BlockState {
        BlockState::new("minecraft:glass")
    }

    #[test]
    fn test_visits_all_slots_in_linear_order() {
        let mut section = Section::new(2586).unwrap();
        let mut cursor = section.block_state_cursor();
        let mut visited = 0;
        while cursor.advance() {
            assert_eq!(cursor.slot(), visited);
            assert_eq!(
                block_index(cursor.x(), cursor.y(), cursor.z()),
                visited as usize,
                "coordinate accessors disagree with the slot"
            );
            visited += 1;
        }
        assert_eq!(visited, 4096);
        assert!(!cursor.advance(), "cursor must stay exhausted");
    }

    #[test]
    fn test_current_is_cached_per_slot() {
        let mut section = Section::new(2586).unwrap();
        section.set_block_state_at(1, 0, 0, &stone(), true);
        let mut cursor = section.block_state_cursor();
        cursor.advance();
        assert_eq!(cursor.current(), &BlockState::air());
        cursor.advance();
        assert_eq!(cursor.current(), &stone());
    }

    #[test]
    fn test_set_current_defers_cleanup_until_finish() {
        let mut section = Section::new(2586).unwrap();
        // Strand a palette entry so the deferred cleanup has work to do.
        section.set_block_state_at(0, 0, 0, &glass(), false);
        section.set_block_state_at(0, 0, 0, &BlockState::air(), false);
        assert_eq!(section.palette().unwrap().len(), 2);

        let mut cursor = section.block_state_cursor();
        while cursor.advance() {
            if cursor.y() == 2 {
                cursor.set_current(&stone());
            }
        }
        // Writes deferred their cleanup: the stranded entry is still there.
        assert_eq!(section.palette().unwrap().len(), 3);

        let mut cursor = section.block_state_cursor();
        while cursor.advance() {
            if cursor.y() == 3 {
                cursor.set_current(&stone());
            }
        }
        cursor.finish();
        // The single finishing cleanup dropped the stranded glass entry.
        let palette = section.palette().unwrap();
        assert_eq!(palette.entries(), &[BlockState::air(), stone()]);
        assert_eq!(section.block_state_at(5, 2, 5), Some(&stone()));
        assert_eq!(section.block_state_at(5, 3, 5), Some(&stone()));
        assert_eq!(section.block_state_at(5, 4, 5), Some(&BlockState::air()));
    }

    #[test]
    fn test_finish_without_writes_skips_cleanup() {
        let mut section = Section::new(2230).unwrap();
        // Strand an entry; a read-only traversal must not clean it up.
        section.set_block_state_at(0, 0, 0, &glass(), false);
        section.set_block_state_at(0, 0, 0, &BlockState::air(), false);

        let mut cursor = section.block_state_cursor();
        while cursor.advance() {}
        cursor.finish();
        assert_eq!(section.palette().unwrap().len(), 2);
    }

    #[test]
    fn test_world_y_offsets_by_section_height() {
        let mut section = Section::new(2586).unwrap();
        section.set_height(-4);
        let mut cursor = section.block_state_cursor();
        cursor.advance();
        assert_eq!(cursor.y(), 0);
        assert_eq!(cursor.world_y(), -64);
        for _ in 0..256 {
            cursor.advance();
        }
        assert_eq!(cursor.y(), 1);
        assert_eq!(cursor.world_y(), -63);
    }

    #[test]
    fn test_set_current_updates_cache() {
        let mut section = Section::new(2586).unwrap();
        let mut cursor = section.block_state_cursor();
        cursor.advance();
        cursor.set_current(&stone());
        assert_eq!(cursor.current(), &stone());
        cursor.finish();
        assert_eq!(section.block_state_at(0, 0, 0), Some(&stone()));
    }
}
