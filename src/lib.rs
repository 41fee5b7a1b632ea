#[macro_use]
extern crate log;

use std::{io, path};
use crate::sat::{dimacs, SolveRes, Stats};

pub mod sat;
pub(crate) mod util;


// Description:
//   Solve the DIMACS CNF file at `path`, writing the protocol output (the
//   `s`, `v` and `c` lines) to `out`. Everything else — problem statistics,
//   solver counters, timings — goes to the log, never to `out`.
pub fn solve_path<W: io::Write>(path: &path::Path, out: &mut W) -> io::Result<SolveRes> {
    let initial_time = time::precise_time_s();
    let (mut solver, consistent) = dimacs::parse_file(path)?;
    let parsed_time = time::precise_time_s();

    info!("============================[ Problem Statistics ]=============================");
    info!("|  Number of variables:  {:12}                                         |", solver.n_vars());
    info!("|  Number of clauses:    {:12}                                         |", solver.n_clauses());
    info!("|  Parse time:           {:12.2} s                                       |", parsed_time - initial_time);

    let result = if consistent {
        solver.solve()
    } else {
        info!("Solved by unit propagation");
        SolveRes::UnSat
    };

    match result {
        SolveRes::UnSat => {
            writeln!(out, "s UNSATISFIABLE")?;
        }
        SolveRes::Sat => {
            writeln!(out, "s SATISFIABLE")?;
            dimacs::write_model(out, solver.model())?;
        }
    }

    let stats = solver.stats();
    writeln!(out, "c statistics of {}:", path.display())?;
    writeln!(
        out,
        "c mem: {} conflicts: {} max_lemmas: {}",
        stats.mem_used, stats.conflicts, stats.max_lemmas
    )?;

    print_stats(&stats, time::precise_time_s() - initial_time);
    Ok(result)
}


fn print_stats(stats: &Stats, cpu_time: f64) {
    info!("restarts              : {:<12}", stats.restarts);
    info!("conflicts             : {:<12}   ({:.0} /sec)", stats.conflicts, (stats.conflicts as f64) / cpu_time);
    info!("decisions             : {:<12}   ({:.0} /sec)", stats.decisions, (stats.decisions as f64) / cpu_time);
    info!("propagations          : {:<12}   ({:.0} /sec)", stats.propagations, (stats.propagations as f64) / cpu_time);
    info!("arena words           : {:<12}", stats.mem_used);
    if let Some(mem_kb) = util::mem_used_peak() {
        info!("Memory used           : {:.2} MB", (mem_kb as f64) / 1024.0);
    }
    info!("CPU time              : {} s", cpu_time);
}
