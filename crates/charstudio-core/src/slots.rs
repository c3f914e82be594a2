//! Reference slot allocation.
//!
//! A fixed-size ordered list of reference images feeds the generation
//! request. Slot index is significant (images are sent to the model in
//! slot order) and is preserved across fills and removals -- slots are
//! never implicitly reordered.

use crate::types::ImageResource;

/// Number of reference slots.
pub const SLOT_COUNT: usize = 4;

/// Ordered reference slots, each empty or holding one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceSlots {
    slots: [Option<ImageResource>; SLOT_COUNT],
}

impl ReferenceSlots {
    /// Create an all-empty slot list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a batch of incoming images starting at `start_index`.
    ///
    /// Circular first-fit: the first incoming item lands at
    /// `start_index` unconditionally (overwriting any occupant).
    /// Remaining items fill *empty* slots only, scanning forward from
    /// `start_index + 1` to the end, then wrapping from 0 up to (but
    /// not including) `start_index`. Items beyond the available empty
    /// slots are silently dropped. Existing occupants are never moved,
    /// and no slot other than `start_index` is ever overwritten.
    ///
    /// An empty `incoming` clears `start_index` only.
    ///
    /// Out-of-range `start_index` is a no-op.
    pub fn assign(&mut self, start_index: usize, incoming: Vec<ImageResource>) {
        if start_index >= SLOT_COUNT {
            return;
        }

        let mut remaining = incoming.into_iter();
        let Some(first) = remaining.next() else {
            self.slots[start_index] = None;
            return;
        };
        self.slots[start_index] = Some(first);

        // Forward scan, then wrap around, filling empties in index order.
        let scan = (start_index + 1..SLOT_COUNT).chain(0..start_index);
        for index in scan {
            if self.slots[index].is_none() {
                match remaining.next() {
                    Some(resource) => self.slots[index] = Some(resource),
                    None => break,
                }
            }
        }
        // Anything still in `remaining` is dropped.
    }

    /// Clear a single slot. Out-of-range indices are a no-op.
    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Clear all slots.
    pub fn clear_all(&mut self) {
        self.slots = [const { None }; SLOT_COUNT];
    }

    /// The slot contents, in index order.
    #[must_use]
    pub const fn as_slice(&self) -> &[Option<ImageResource>; SLOT_COUNT] {
        &self.slots
    }

    /// Occupied slots in index order (empty slots excluded). This is
    /// the order reference images are sent to the model.
    pub fn occupied(&self) -> impl Iterator<Item = &ImageResource> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Returns `true` if at least one slot holds an image.
    #[must_use]
    pub fn any_occupied(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn res(tag: u8) -> ImageResource {
        ImageResource::new(vec![tag], "image/png")
    }

    fn occupants(slots: &ReferenceSlots) -> Vec<Option<u8>> {
        slots
            .as_slice()
            .iter()
            .map(|s| s.as_ref().map(|r| r.bytes[0]))
            .collect()
    }

    #[test]
    fn single_file_lands_at_start_index() {
        let mut slots = ReferenceSlots::new();
        slots.assign(2, vec![res(1)]);
        assert_eq!(occupants(&slots), vec![None, None, Some(1), None]);
    }

    #[test]
    fn batch_fills_forward_then_wraps() {
        let mut slots = ReferenceSlots::new();
        slots.assign(2, vec![res(1), res(2), res(3)]);
        // 1 at index 2, 2 at index 3, wrap to index 0 for 3.
        assert_eq!(occupants(&slots), vec![Some(3), None, Some(1), Some(2)]);
    }

    #[test]
    fn start_index_overwrites_but_other_occupants_survive() {
        // [A, _, _, B], drop [C, D, E] at index 1:
        // C overwrites index 1, D fills index 2, E has nowhere to go.
        let mut slots = ReferenceSlots::new();
        slots.assign(0, vec![res(b'A')]);
        slots.assign(3, vec![res(b'B')]);

        slots.assign(1, vec![res(b'C'), res(b'D'), res(b'E')]);
        assert_eq!(
            occupants(&slots),
            vec![Some(b'A'), Some(b'C'), Some(b'D'), Some(b'B')],
        );
    }

    #[test]
    fn surplus_items_are_silently_dropped() {
        let mut slots = ReferenceSlots::new();
        slots.assign(0, vec![res(1), res(2), res(3), res(4), res(5), res(6)]);
        assert_eq!(occupants(&slots), vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn empty_incoming_clears_start_slot_only() {
        let mut slots = ReferenceSlots::new();
        slots.assign(0, vec![res(1), res(2)]);
        slots.assign(0, vec![]);
        assert_eq!(occupants(&slots), vec![None, Some(2), None, None]);
    }

    #[test]
    fn incoming_order_is_preserved_across_filled_slots() {
        // Occupied slot in the middle of the scan: incoming items keep
        // their relative order in the slots they do fill.
        let mut slots = ReferenceSlots::new();
        slots.assign(1, vec![res(9)]);
        slots.assign(0, vec![res(1), res(2), res(3)]);
        assert_eq!(occupants(&slots), vec![Some(1), Some(9), Some(2), Some(3)]);
    }

    #[test]
    fn result_always_has_slot_count_entries() {
        let mut slots = ReferenceSlots::new();
        slots.assign(3, vec![res(1), res(2), res(3), res(4), res(5)]);
        assert_eq!(slots.as_slice().len(), SLOT_COUNT);
    }

    #[test]
    fn out_of_range_start_index_is_a_no_op() {
        let mut slots = ReferenceSlots::new();
        slots.assign(0, vec![res(1)]);
        let before = slots.clone();
        slots.assign(SLOT_COUNT, vec![res(2)]);
        assert_eq!(slots, before);
    }

    #[test]
    fn occupied_iterates_in_slot_order() {
        let mut slots = ReferenceSlots::new();
        slots.assign(2, vec![res(1), res(2), res(3)]);
        let order: Vec<u8> = slots.occupied().map(|r| r.bytes[0]).collect();
        // Slot order 0..4 is [3, _, 1, 2].
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn clear_and_clear_all() {
        let mut slots = ReferenceSlots::new();
        slots.assign(0, vec![res(1), res(2)]);
        slots.clear(1);
        assert_eq!(occupants(&slots), vec![Some(1), None, None, None]);
        slots.clear(SLOT_COUNT + 1); // no-op
        slots.clear_all();
        assert!(!slots.any_occupied());
    }
}
