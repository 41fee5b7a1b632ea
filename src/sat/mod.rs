pub mod dimacs;
pub mod solver;


#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SolveRes {
    Sat,
    UnSat,
}


// Snapshot of the solver counters, taken after solving.
#[derive(Default, Clone, Copy, Debug)]
pub struct Stats {
    pub mem_used: usize,
    pub conflicts: u64,
    pub max_lemmas: usize,
    pub restarts: u64,
    pub decisions: u64,
    pub propagations: u64,
}
