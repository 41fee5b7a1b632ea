use crate::sat::solver::lit_map::LitVec;


// Sentinel terminating every watch list.
pub const END: i32 = -9;


// A cursor into a watch list: either the list head of a literal or the
// next-link cell of a clause already on the list. Rewriting the slot a
// cursor points at excises the following clause from the list in place.
#[derive(Clone, Copy)]
pub enum WatchSlot {
    Head(i32),
    Cell(i32),
}


// The clause database. Every clause, original and learned, lives in one
// dense vector of words and is addressed by the offset of its body. The two
// words before a body are the next-links for the watch lists of the first
// two body literals, and the body is zero-terminated. Offsets below
// `mem_fixed` are original clauses; offsets at or above are lemmas.
pub struct ClauseArena {
    db: Vec<i32>,
    mem_max: usize,
    pub(crate) mem_fixed: usize,
    pub(crate) n_lemmas: usize,
    first: LitVec<i32>,
}

impl ClauseArena {
    pub fn new(n_vars: usize) -> ClauseArena {
        let mut arena = ClauseArena {
            db: Vec::new(),
            mem_max: 1 << 30,
            mem_fixed: 0,
            n_lemmas: 0,
            first: LitVec::new(n_vars, END),
        };
        // Guard word: the word before the first watch cell must read as a
        // clause terminator (see the body-location step of propagation).
        arena.get_memory(1);
        arena.mem_fixed = arena.db.len();
        arena
    }

    // Words currently in use, including the guard word.
    pub fn mem_used(&self) -> usize {
        self.db.len()
    }

    #[inline]
    pub fn get(&self, offset: i32) -> i32 {
        self.db[offset as usize]
    }

    #[inline]
    pub fn set(&mut self, offset: i32, value: i32) {
        self.db[offset as usize] = value;
    }

    // Reserve `size` words and return the offset of the first one.
    fn get_memory(&mut self, size: usize) -> usize {
        let offset = self.db.len();
        if offset + size > self.mem_max {
            panic!("out of memory: clause arena limit of {} words exceeded", self.mem_max);
        }
        self.db.resize(offset + size, 0);
        offset
    }

    // Description:
    //   Append a clause and return the offset of its body. A non-unit
    //   clause is watched on its first two literals, with the watch cells
    //   in the two words before the body. `irr` marks the clause as
    //   original and advances the `mem_fixed` boundary; otherwise the
    //   lemma count goes up.
    pub fn add_clause(&mut self, lits: &[i32], irr: bool) -> i32 {
        let base = self.get_memory(lits.len() + 3);
        let clause = base + 2;
        if lits.len() > 1 {
            self.add_watch(lits[0], base as i32);
            self.add_watch(lits[1], base as i32 + 1);
        }
        self.db[clause..clause + lits.len()].copy_from_slice(lits);
        // the terminator word is already zero
        if irr {
            self.mem_fixed = self.db.len();
        } else {
            self.n_lemmas += 1;
        }
        clause as i32
    }

    // Prepend `cell` to the watch list of `lit`.
    pub fn add_watch(&mut self, lit: i32, cell: i32) {
        self.db[cell as usize] = self.first[lit];
        self.first[lit] = cell;
    }

    #[inline]
    pub fn slot_get(&self, slot: WatchSlot) -> i32 {
        match slot {
            WatchSlot::Head(lit) => self.first[lit],
            WatchSlot::Cell(cell) => self.db[cell as usize],
        }
    }

    #[inline]
    pub fn slot_set(&mut self, slot: WatchSlot, value: i32) {
        match slot {
            WatchSlot::Head(lit) => self.first[lit] = value,
            WatchSlot::Cell(cell) => self.db[cell as usize] = value,
        }
    }

    // The literals of the clause whose body starts at `clause`.
    pub fn clause_lits(&self, clause: i32) -> &[i32] {
        let start = clause as usize;
        let mut end = start;
        while self.db[end] != 0 {
            end += 1;
        }
        &self.db[start..end]
    }

    // Body offsets of every clause allocated in `[from, to)`. `from` must
    // be an allocation boundary.
    pub fn clause_offsets(&self, from: usize, to: usize) -> Vec<i32> {
        let mut offsets = Vec::new();
        let mut i = from + 2;
        while i < to {
            offsets.push(i as i32);
            while self.db[i] != 0 {
                i += 1;
            }
            i += 3;
        }
        offsets
    }

    // Detach the whole lemma region, returning its words.
    pub(crate) fn drain_lemmas(&mut self) -> Vec<i32> {
        self.db.split_off(self.mem_fixed)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn watch_list(arena: &ClauseArena, lit: i32) -> Vec<i32> {
        let mut cells = Vec::new();
        let mut cell = arena.slot_get(WatchSlot::Head(lit));
        while cell != END {
            cells.push(cell);
            cell = arena.get(cell);
        }
        cells
    }

    #[test]
    fn clause_layout_and_watches() {
        let mut arena = ClauseArena::new(3);
        let c1 = arena.add_clause(&[1, 2, 3], true);
        let c2 = arena.add_clause(&[1, -3], true);

        assert_eq!(arena.clause_lits(c1), &[1, 2, 3]);
        assert_eq!(arena.clause_lits(c2), &[1, -3]);
        // watch cells sit in the two words before each body
        assert_eq!(watch_list(&arena, 1), vec![c2 - 2, c1 - 2]);
        assert_eq!(watch_list(&arena, 2), vec![c1 - 1]);
        assert_eq!(watch_list(&arena, -3), vec![c2 - 1]);
        assert_eq!(arena.clause_offsets(1, arena.mem_fixed), vec![c1, c2]);
    }

    #[test]
    fn unit_clause_carries_no_watches() {
        let mut arena = ClauseArena::new(2);
        let c = arena.add_clause(&[2], true);
        assert_eq!(arena.clause_lits(c), &[2]);
        assert!(watch_list(&arena, 2).is_empty());
    }

    #[test]
    fn lemmas_are_counted_above_the_fixed_boundary() {
        let mut arena = ClauseArena::new(2);
        arena.add_clause(&[1, 2], true);
        let frozen = arena.mem_fixed;
        arena.add_clause(&[-1, -2], false);
        assert_eq!(arena.mem_fixed, frozen);
        assert_eq!(arena.n_lemmas, 1);
        assert_eq!(arena.clause_offsets(frozen, arena.mem_used()).len(), 1);
    }
}
