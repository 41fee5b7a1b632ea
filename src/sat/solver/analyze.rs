use crate::sat::solver::trail::{IMPLIED, MARK};
use crate::sat::solver::Solver;


impl Solver {
    // MARK a literal as involved in the current conflict and promote its
    // variable in the decision order. Root-level units stay IMPLIED.
    fn bump(&mut self, lit: i32) {
        if self.trail.flags[lit] != IMPLIED {
            self.trail.flags[lit] = MARK;
            self.order.move_to_front(lit.abs());
        }
    }

    // MARK every literal of the zero-terminated clause at `clause`.
    fn bump_clause(&mut self, clause: i32) {
        let mut p = clause;
        loop {
            let lit = self.arena.get(p);
            if lit == 0 {
                break;
            }
            self.bump(lit);
            p += 1;
        }
    }

    // Description:
    //   First-UIP conflict analysis. Resolves backward over the trail until
    //   a single marked literal is left at the most recent decision level,
    //   assembles the learned clause from the marked trail suffix (dropping
    //   literals implied by the others), computes its literal-block
    //   distance and folds it into the restart averages, rewinds the trail
    //   to the asserting position, and installs the lemma. Returns the
    //   lemma's body offset; its first literal is the asserting one.
    pub(crate) fn analyze(&mut self, mut clause: i32) -> i32 {
        self.res += 1;
        self.n_conflicts += 1;
        self.bump_clause(clause);

        // Resolve until the first unique implication point.
        'resolve: loop {
            self.trail.assigned -= 1;
            let lit = self.trail.stack[self.trail.assigned];
            if self.trail.reason_of(lit) == 0 {
                // ran into the decision itself
                break;
            }
            if self.trail.flags[lit] == MARK {
                // Look for another marked literal before the decision; if
                // none exists, `lit` is the first UIP.
                let mut check = self.trail.assigned;
                loop {
                    check -= 1;
                    let below = self.trail.stack[check];
                    if self.trail.flags[below] == MARK {
                        break;
                    }
                    if self.trail.reason_of(below) == 0 {
                        break 'resolve;
                    }
                }
                // Resolve with the reason of `lit`. The stored offset is
                // biased by one, so walking from it skips the propagated
                // literal itself.
                clause = self.trail.reason_of(lit);
                self.bump_clause(clause);
            }
            self.trail.unassign(lit);
        }

        // Build the learned clause from the marked trail suffix, counting
        // one literal block per decision boundary that contributed.
        let mut lbd: i64 = 0;
        let mut block: i64 = 0;
        self.buffer.clear();
        self.trail.processed = self.trail.assigned;
        let mut p = self.trail.assigned;
        loop {
            let lit = self.trail.stack[p];
            if self.trail.flags[lit] == MARK && !self.implied(lit) {
                self.buffer.push(lit);
                block = 1;
            }
            if self.trail.reason_of(lit) == 0 {
                lbd += block;
                block = 0;
                // The latest boundary with exactly one emitted literal
                // becomes the asserting position.
                if self.buffer.len() == 1 {
                    self.trail.processed = p;
                }
            }
            self.trail.flags[lit] = 1;
            if p == self.trail.forced {
                break;
            }
            p -= 1;
        }

        // Fold the block count into the fast and slow moving averages.
        self.fast -= self.fast >> 5;
        self.fast += lbd << 19;
        self.slow -= self.slow >> 15;
        self.slow += lbd << 9;

        // Rewind to the asserting position; the slot there is re-filled by
        // the caller when it asserts the lemma.
        while self.trail.assigned > self.trail.processed {
            let lit = self.trail.stack[self.trail.assigned];
            self.trail.unassign(lit);
            self.trail.assigned -= 1;
        }
        let top = self.trail.stack[self.trail.assigned];
        self.trail.unassign(top);

        self.arena.add_clause(&self.buffer, false)
    }

    // Description:
    //   Recursive self-subsuming test: a literal is redundant in the
    //   learned clause when every literal of its reason is marked or
    //   itself redundant. Results are memoized in the falsity flags with
    //   IMPLIED (redundant) and IMPLIED - 1 (not redundant), so repeated
    //   queries during one build are O(1). Decisions are never redundant.
    fn implied(&mut self, lit: i32) -> bool {
        let flag = self.trail.flags[lit];
        if flag > MARK {
            return (flag & MARK) != 0;
        }
        let reason = self.trail.reason_of(lit);
        if reason == 0 {
            return false;
        }
        // The biased offset again skips the propagated literal.
        let mut p = reason;
        loop {
            let l = self.arena.get(p);
            if l == 0 {
                break;
            }
            if self.trail.flags[l] != MARK && !self.implied(l) {
                self.trail.flags[lit] = IMPLIED - 1;
                return false;
            }
            p += 1;
        }
        self.trail.flags[lit] = IMPLIED;
        true
    }
}
