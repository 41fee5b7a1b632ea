#[macro_use]
extern crate clap;

use std::io::Write;
use std::{io, path, process};


fn main() {
    let matches = clap::App::new("gluesat")
        .version(&crate_version!()[..])
        .about("A small CDCL SAT solver")
        .arg(
            clap::Arg::with_name("input")
                .required(true)
                .help("Path to a CNF formula in DIMACS format (optionally gzipped)"),
        )
        .get_matches();

    // All logging goes to stderr so stdout stays protocol-clean.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    builder.init();

    let input = path::Path::new(matches.value_of("input").unwrap());
    let stdout = io::stdout();
    if let Err(e) = gluesat::solve_path(input, &mut stdout.lock()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
