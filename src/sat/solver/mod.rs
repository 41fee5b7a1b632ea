use crate::sat::{SolveRes, Stats};
use self::arena::ClauseArena;
use self::trail::Trail;
use self::vmtf::DecisionList;

pub(crate) mod arena;
pub(crate) mod lit_map;
pub(crate) mod trail;
pub(crate) mod vmtf;
mod analyze;
mod propagate;
mod reduce;


// A single-shot CDCL solver. Literals are nonzero signed integers whose
// absolute value is a variable in `1 ..= n_vars`; a positive literal means
// the variable is true. All clause storage is offsets into one arena.
pub struct Solver {
    n_vars: usize,
    n_clauses: usize,
    pub(crate) arena: ClauseArena,
    pub(crate) trail: Trail,
    pub(crate) order: DecisionList,
    pub(crate) buffer: Vec<i32>,
    pub(crate) max_lemmas: usize,
    pub(crate) fast: i64,
    pub(crate) slow: i64,
    pub(crate) n_conflicts: u64,
    pub(crate) res: u64,
    pub(crate) n_propagations: u64,
    n_decisions: u64,
    n_restarts: u64,
}

impl Solver {
    // `n_clauses` is the clause count declared in the DIMACS header; it is
    // kept for reporting only.
    pub fn new(n_vars: usize, n_clauses: usize) -> Solver {
        Solver {
            n_vars,
            n_clauses,
            arena: ClauseArena::new(n_vars),
            trail: Trail::new(n_vars),
            order: DecisionList::new(n_vars),
            buffer: Vec::with_capacity(n_vars),
            max_lemmas: 2000,
            fast: 1 << 24,
            slow: 1 << 24,
            n_conflicts: 0,
            res: 0,
            n_propagations: 0,
            n_decisions: 0,
            n_restarts: 0,
        }
    }

    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    pub fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    // Description:
    //   Add an input clause. Returns false when the clause makes the
    //   formula unsatisfiable on the spot: it is empty, or it is a unit
    //   contradicting an earlier one. A unit over an unassigned variable is
    //   committed to the forced prefix immediately.
    pub fn add_clause(&mut self, lits: &[i32]) -> bool {
        debug_assert!(lits.iter().all(|&l| l != 0 && l.abs() as usize <= self.n_vars));
        let clause = self.arena.add_clause(lits, true);
        if lits.is_empty() {
            return false;
        }
        if lits.len() == 1 {
            let unit = lits[0];
            if self.trail.is_false(unit) {
                return false;
            }
            if self.trail.is_unassigned(unit) {
                self.trail.assign(unit, clause + 1, true);
            }
        }
        true
    }

    // Description:
    //   Decide satisfiability. Interleaves propagation (which absorbs
    //   conflicts by learning), the glue-based restart policy, lemma
    //   reduction, and VMTF decisions with saved phases. Returns UNSAT only
    //   on a conflict in the forced regime; SAT when the decision list runs
    //   out of unassigned variables.
    pub fn solve(&mut self) -> SolveRes {
        let mut decision = self.order.head;
        self.res = 0;
        loop {
            let old_lemmas = self.arena.n_lemmas;
            if !self.propagate() {
                return SolveRes::UnSat;
            }

            if self.arena.n_lemmas > old_lemmas {
                // The last decision ran into conflicts; rescan the decision
                // list from its head.
                decision = self.order.head;
                if self.fast > (self.slow / 100) * 125 {
                    debug!(
                        "restarting after {} conflicts (fast {} slow {})",
                        self.res, self.fast, self.slow
                    );
                    self.res = 0;
                    // damp the fast average back to the trigger threshold
                    self.fast = (self.slow / 100) * 125;
                    self.n_restarts += 1;
                    self.trail.rewind_to_forced();
                    if self.arena.n_lemmas > self.max_lemmas {
                        self.reduce_db(6);
                    }
                }
            }

            while self.trail.is_false(decision) || self.trail.is_false(-decision) {
                decision = self.order.prev(decision);
            }
            if decision == 0 {
                return SolveRes::Sat;
            }

            // Branch on the saved phase of the chosen variable.
            let lit = if self.trail.model[decision as usize] {
                decision
            } else {
                -decision
            };
            self.n_decisions += 1;
            self.trail.push_decision(lit);
        }
    }

    // The last saved truth value per variable; index 0 is unused. After a
    // SAT answer this is a satisfying assignment.
    pub fn model(&self) -> &[bool] {
        &self.trail.model
    }

    pub fn n_lemmas(&self) -> usize {
        self.arena.n_lemmas
    }

    pub fn original_clauses(&self) -> Vec<Vec<i32>> {
        self.arena
            .clause_offsets(1, self.arena.mem_fixed)
            .iter()
            .map(|&c| self.arena.clause_lits(c).to_vec())
            .collect()
    }

    pub fn lemmas(&self) -> Vec<Vec<i32>> {
        self.arena
            .clause_offsets(self.arena.mem_fixed, self.arena.mem_used())
            .iter()
            .map(|&c| self.arena.clause_lits(c).to_vec())
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            mem_used: self.arena.mem_used(),
            conflicts: self.n_conflicts,
            max_lemmas: self.max_lemmas,
            restarts: self.n_restarts,
            decisions: self.n_decisions,
            propagations: self.n_propagations,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::arena::{WatchSlot, END};
    use super::trail::IMPLIED;
    use super::*;
    use crate::sat::dimacs;

    // Every cell reachable from some watch list, together with the literal
    // whose list it is on.
    fn watched_cells(solver: &Solver) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        let n = solver.n_vars as i32;
        for lit in -n..=n {
            if lit == 0 {
                continue;
            }
            let mut cell = solver.arena.slot_get(WatchSlot::Head(lit));
            while cell != END {
                cells.push((lit, cell));
                cell = solver.arena.get(cell);
            }
        }
        cells
    }

    // Every non-unit clause must sit on exactly two watch lists, reached
    // through the two cells before its body, and those lists must belong to
    // its first two literals. Which cell serves which literal is free to
    // rotate as propagation moves watches around.
    fn check_watch_invariant(solver: &Solver) {
        let cells = watched_cells(solver);

        // no cell appears on two lists
        let mut seen: Vec<i32> = cells.iter().map(|&(_, cell)| cell).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), cells.len());

        let mem_used = solver.arena.mem_used();
        let mut offsets = solver.arena.clause_offsets(1, solver.arena.mem_fixed);
        offsets.extend(solver.arena.clause_offsets(solver.arena.mem_fixed, mem_used));

        let mut expected_cells = 0;
        for c in offsets {
            let lits = solver.arena.clause_lits(c);
            if lits.len() > 1 {
                expected_cells += 2;
                let mut watched: Vec<i32> = cells
                    .iter()
                    .filter(|&&(_, cell)| cell == c - 2 || cell == c - 1)
                    .map(|&(lit, _)| lit)
                    .collect();
                watched.sort();
                let mut heads = vec![lits[0], lits[1]];
                heads.sort();
                assert_eq!(watched, heads, "clause at offset {}", c);
            }
        }
        assert_eq!(cells.len(), expected_cells);
    }

    fn solve_text(text: &str) -> (Solver, SolveRes) {
        let (mut solver, consistent) = dimacs::parse(text).unwrap();
        let res = if consistent {
            solver.solve()
        } else {
            SolveRes::UnSat
        };
        (solver, res)
    }

    #[test]
    fn watch_lists_are_consistent_after_solving() {
        let (solver, res) = solve_text(
            "p cnf 4 6\n1 2 3 0\n-1 -2 0\n-1 -3 0\n-2 -3 0\n1 4 0\n-4 2 3 0\n",
        );
        assert_eq!(res, SolveRes::Sat);
        check_watch_invariant(&solver);
    }

    #[test]
    fn watch_lists_are_consistent_after_unsat() {
        let (solver, res) = solve_text(
            "p cnf 3 7\n1 2 0\n1 3 0\n2 3 0\n-1 -2 0\n-1 -3 0\n-2 -3 0\n1 2 3 0\n",
        );
        assert_eq!(res, SolveRes::UnSat);
        check_watch_invariant(&solver);
    }

    #[test]
    fn forced_prefix_is_implied() {
        let (solver, res) = solve_text("p cnf 3 3\n1 0\n-1 2 0\n-2 3 0\n");
        assert_eq!(res, SolveRes::Sat);
        assert!(solver.trail.forced >= 1);
        for i in 0..solver.trail.forced {
            let lit = solver.trail.stack[i];
            assert_eq!(solver.trail.flags[lit], IMPLIED);
        }
    }

    #[test]
    fn lemma_count_matches_the_lemma_region() {
        let (solver, _) = solve_text(
            "p cnf 3 7\n1 2 0\n1 3 0\n2 3 0\n-1 -2 0\n-1 -3 0\n-2 -3 0\n1 2 3 0\n",
        );
        assert_eq!(solver.lemmas().len(), solver.n_lemmas());
    }

    #[test]
    fn reduce_is_a_noop_without_lemmas() {
        let (mut solver, consistent) = dimacs::parse("p cnf 2 2\n1 2 0\n-1 2 0\n").unwrap();
        assert!(consistent);
        let before = solver.arena.mem_used();
        solver.reduce_db(6);
        assert_eq!(solver.arena.mem_used(), before);
        assert_eq!(solver.n_lemmas(), 0);
        assert_eq!(solver.max_lemmas, 2300);
        check_watch_invariant(&solver);
    }

    #[test]
    fn reduce_keeps_lemmas_the_phases_leave_underserved() {
        let mut solver = Solver::new(4, 2);
        solver.add_clause(&[1, 2]);
        solver.add_clause(&[3, 4]);
        solver.arena.add_clause(&[-1, -2], false);
        solver.arena.add_clause(&[1, 3], false);
        solver.arena.add_clause(&[2, -3, 4], false);
        assert_eq!(solver.n_lemmas(), 3);
        let before = solver.arena.mem_used();

        // saved phases: 1 and 3 true, 2 and 4 false; this satisfies both
        // literals of [1, 3], one of [-1, -2], and none of [2, -3, 4]
        solver.trail.model[1] = true;
        solver.trail.model[2] = false;
        solver.trail.model[3] = true;
        solver.trail.model[4] = false;

        solver.reduce_db(2);

        // only the lemma with two satisfied literals is dropped; the rest
        // are re-added compactly, in order, with their watches back
        assert_eq!(solver.lemmas(), vec![vec![-1, -2], vec![2, -3, 4]]);
        assert_eq!(solver.n_lemmas(), 2);
        assert!(solver.arena.mem_used() < before);
        assert_eq!(solver.max_lemmas, 2300);
        check_watch_invariant(&solver);
    }
}
