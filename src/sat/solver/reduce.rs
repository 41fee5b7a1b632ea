use crate::sat::solver::arena::{WatchSlot, END};
use crate::sat::solver::Solver;


impl Solver {
    // Description:
    //   Shrink the lemma region. The lemma cap grows and the lemma count
    //   resets before anything else; the count ends up tracking survivors
    //   only. Every watch list is then swept to excise watches into the
    //   lemma region, the region is dropped, and each old lemma with fewer
    //   than `keep` literals satisfied by the saved phases is re-added
    //   compactly at the new high-water mark.
    pub(crate) fn reduce_db(&mut self, keep: usize) {
        self.max_lemmas += 300;
        self.arena.n_lemmas = 0;
        debug!("reducing lemma database (cap now {})", self.max_lemmas);

        let mem_fixed = self.arena.mem_fixed as i32;
        let n = self.n_vars() as i32;
        for lit in -n..=n {
            if lit == 0 {
                continue;
            }
            let mut watch = WatchSlot::Head(lit);
            loop {
                let cell = self.arena.slot_get(watch);
                if cell == END {
                    break;
                }
                if cell < mem_fixed {
                    // an original clause, keep its watch
                    watch = WatchSlot::Cell(cell);
                } else {
                    let next = self.arena.get(cell);
                    self.arena.slot_set(watch, next);
                }
            }
        }

        // Walk the detached region: each allocation is two watch cells, the
        // body, and a terminator.
        let old = self.arena.drain_lemmas();
        let mut i = 2;
        while i < old.len() {
            let head = i;
            let mut satisfied = 0;
            while old[i] != 0 {
                let lit = old[i];
                if (lit > 0) == self.trail.model[lit.abs() as usize] {
                    satisfied += 1;
                }
                i += 1;
            }
            if satisfied < keep {
                self.arena.add_clause(&old[head..i], false);
            }
            i += 3;
        }
    }
}
