//! Active subset of pool handles.
//!
//! Most pool entries can sit idle; only handles enabled here are walked by
//! the per-tick update, so tick cost follows the number of interesting
//! entries rather than pool occupancy.

use smallvec::SmallVec;

use crate::handle::ZoneHandle;

/// Handle snapshot taken before a walk that may mutate the set.
pub type ActiveSnapshot = SmallVec<[ZoneHandle; 16]>;

const WORD_BITS: usize = u64::BITS as usize;

/// Unique set of handles opted into per-tick evaluation.
///
/// One bit per slot, so iteration is always in slot order. Membership is
/// independent of pool liveness; whoever frees a slot is expected to
/// `disable` its handle first.
#[derive(Debug, Default, Clone)]
pub struct ActiveSet {
    words: Vec<u64>,
    len: usize,
}

impl ActiveSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    const fn locate(handle: ZoneHandle) -> (usize, u64) {
        let index = handle.index();
        (index / WORD_BITS, 1_u64 << (index % WORD_BITS))
    }

    /// Add a handle. Returns `true` if it was not already present.
    pub fn enable(&mut self, handle: ZoneHandle) -> bool {
        let (word, mask) = Self::locate(handle);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }

        let bits = &mut self.words[word];
        if *bits & mask != 0 {
            return false;
        }
        *bits |= mask;
        self.len += 1;
        true
    }

    /// Remove a handle. Returns `true` if it was present.
    pub fn disable(&mut self, handle: ZoneHandle) -> bool {
        let (word, mask) = Self::locate(handle);
        let Some(bits) = self.words.get_mut(word) else {
            return false;
        };
        if *bits & mask == 0 {
            return false;
        }
        *bits &= !mask;
        self.len -= 1;
        true
    }

    #[must_use]
    pub fn contains(&self, handle: ZoneHandle) -> bool {
        let (word, mask) = Self::locate(handle);
        self.words.get(word).is_some_and(|bits| bits & mask != 0)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over enabled handles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = ZoneHandle> + '_ {
        self.words.iter().enumerate().flat_map(|(word, &bits)| {
            let base = word * WORD_BITS;
            let mut rest = bits;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(ZoneHandle::new((base + bit) as u32))
            })
        })
    }

    /// Copy the enabled handles out, in slot order.
    #[must_use]
    pub fn snapshot(&self) -> ActiveSnapshot {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_is_idempotent() {
        let mut set = ActiveSet::new();
        let handle = ZoneHandle::new(3);

        assert!(set.enable(handle));
        assert!(!set.enable(handle));
        assert_eq!(set.len(), 1);
        assert!(set.contains(handle));
    }

    #[test]
    fn test_disable_is_idempotent() {
        let mut set = ActiveSet::new();
        let handle = ZoneHandle::new(3);
        set.enable(handle);

        assert!(set.disable(handle));
        assert!(!set.disable(handle));
        assert!(set.is_empty());

        // Never-enabled handle is fine too.
        assert!(!set.disable(ZoneHandle::new(9)));
    }

    #[test]
    fn test_snapshot_sorted() {
        let mut set = ActiveSet::new();
        for id in [9, 2, 5, 0] {
            set.enable(ZoneHandle::new(id));
        }

        let ids: Vec<_> = set.snapshot().iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![0, 2, 5, 9]);
    }

    #[test]
    fn test_iter_spans_words() {
        let mut set = ActiveSet::new();
        for id in [1000, 63, 64, 0, 127, 128] {
            set.enable(ZoneHandle::new(id));
        }
        set.disable(ZoneHandle::new(127));

        let ids: Vec<_> = set.iter().map(|h| h.id()).collect();
        assert_eq!(ids, vec![0, 63, 64, 128, 1000]);
        assert_eq!(set.len(), 5);
        assert!(!set.contains(ZoneHandle::new(127)));
        assert!(!set.contains(ZoneHandle::new(5000)));

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
