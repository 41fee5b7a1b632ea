use crate::sat::solver::arena::{WatchSlot, END};
use crate::sat::solver::Solver;


impl Solver {
    // Description:
    //   Two-watched-literal propagation over the unprocessed tail of the
    //   trail. Local conflicts are handled in place: the conflict is
    //   analyzed, the learned clause is asserted, and propagation resumes
    //   from the rewound frontier. Returns false only for a conflict in the
    //   forced regime, which makes the formula unsatisfiable.
    //
    //   The forced regime starts when the literal at the propagation
    //   frontier carries a reason (a root-level unit from parsing, or a
    //   learned unit); every assignment it derives becomes part of the
    //   irrevocable prefix on the way out.
    pub(crate) fn propagate(&mut self) -> bool {
        let mut forced = self.trail.reason_of(self.trail.stack[self.trail.processed]) != 0;

        'trail: while self.trail.processed < self.trail.assigned {
            let lit = self.trail.stack[self.trail.processed];
            self.trail.processed += 1;
            self.n_propagations += 1;

            let mut watch = WatchSlot::Head(lit);
            loop {
                let cell = self.arena.slot_get(watch);
                if cell == END {
                    break;
                }

                // The body starts one word past the second watch cell; the
                // word before a first cell always reads as a terminator.
                let mut clause = cell + 1;
                if self.arena.get(clause - 2) == 0 {
                    clause += 1;
                }

                // Keep the other watched literal in front.
                if self.arena.get(clause) == lit {
                    let other = self.arena.get(clause + 1);
                    self.arena.set(clause, other);
                }

                // Scan the rest of the clause for a replacement watch. Any
                // non-falsified literal is valid, true ones included.
                let mut unit = true;
                let mut i = clause + 2;
                loop {
                    let l = self.arena.get(i);
                    if l == 0 {
                        break;
                    }
                    if !self.trail.is_false(l) {
                        self.arena.set(clause + 1, l);
                        self.arena.set(i, lit);
                        unit = false;
                        let next = self.arena.get(cell);
                        self.arena.slot_set(watch, next);
                        self.arena.add_watch(l, cell);
                        break;
                    }
                    i += 1;
                }

                if unit {
                    self.arena.set(clause + 1, lit);
                    watch = WatchSlot::Cell(cell);

                    let head = self.arena.get(clause);
                    if self.trail.is_true(head) {
                        continue;
                    }
                    if !self.trail.is_false(head) {
                        // The clause became unit; its head is the implied
                        // literal and the clause itself the reason.
                        self.trail.assign(head, clause + 1, forced);
                    } else {
                        if forced {
                            return false;
                        }
                        let lemma = self.analyze(clause);
                        // A learned unit switches propagation into the
                        // forced regime for good.
                        if self.arena.get(lemma + 1) == 0 {
                            forced = true;
                        }
                        let asserting = self.arena.get(lemma);
                        self.trail.assign(asserting, lemma + 1, forced);
                        continue 'trail;
                    }
                }
            }
        }

        if forced {
            self.trail.forced = self.trail.processed;
        }
        true
    }
}
