use std::io::Read;
use std::{fs, io, path, str};
use flate2::read::GzDecoder;
use crate::sat::solver::Solver;


// Result of loading a formula: the initialized solver plus a flag that is
// false when parsing already established unsatisfiability (an empty clause,
// or a unit contradicting an earlier one).
pub type Parsed = (Solver, bool);


pub fn parse_file<P: AsRef<path::Path>>(path: P) -> io::Result<Parsed> {
    let raw = fs::read(path.as_ref())?;
    // A gzip stream starts with the magic bytes 1f 8b.
    let text = if raw.starts_with(&[0x1f, 0x8b]) {
        let mut buf = String::new();
        GzDecoder::new(&raw[..]).read_to_string(&mut buf)?;
        buf
    } else {
        String::from_utf8(raw).map_err(|_| parse_error("input is not valid UTF-8"))?
    };
    parse(&text)
}


// Description:
//   Parse a DIMACS CNF formula. Comment lines may appear anywhere,
//   including between the literals of a clause; clauses may span lines and
//   share lines. Every literal must fall within the variable range the
//   header declares. Complete clauses go straight into the solver, so root
//   units are already on the trail when parsing returns.
pub fn parse(text: &str) -> io::Result<Parsed> {
    let mut p = Reader::new(text);

    p.skip_whitespace();
    while let Some('c') = p.current() {
        p.skip_line();
        p.skip_whitespace();
    }
    p.consume("p")?;
    p.skip_whitespace();
    p.consume("cnf")?;
    let n_vars = p.next_uint()?;
    let n_clauses = p.next_uint()?;

    let mut solver = Solver::new(n_vars, n_clauses);
    let mut lits = Vec::new();
    loop {
        p.skip_whitespace();
        match p.current() {
            Some('c') => {
                p.skip_line();
            }
            None => {
                if !lits.is_empty() {
                    return Err(parse_error("unexpected end of file inside a clause"));
                }
                break;
            }
            _ => {
                let lit = p.next_int()?;
                if lit == 0 {
                    if !solver.add_clause(&lits) {
                        return Ok((solver, false));
                    }
                    lits.clear();
                } else {
                    if lit.abs() as usize > n_vars {
                        return Err(parse_error(&format!(
                            "literal {} out of range (header declares {} variables)",
                            lit, n_vars
                        )));
                    }
                    lits.push(lit);
                }
            }
        }
    }
    Ok((solver, true))
}


// Write the model block: `v ` lines wrapped at 80 columns, closed by the
// DIMACS `0` sentinel. `model` is indexed by variable, slot 0 unused.
pub fn write_model<W: io::Write>(out: &mut W, model: &[bool]) -> io::Result<()> {
    let mut line = String::from("v");
    for v in 1..model.len() {
        let token = if model[v] {
            format!(" {}", v)
        } else {
            format!(" -{}", v)
        };
        if line.len() + token.len() > 80 {
            writeln!(out, "{}", line)?;
            line = String::from("v");
        }
        line.push_str(&token);
    }
    if line.len() + 2 > 80 {
        writeln!(out, "{}", line)?;
        line = String::from("v");
    }
    line.push_str(" 0");
    writeln!(out, "{}", line)
}


// Serialize the original clauses back to DIMACS.
pub fn write<W: io::Write>(out: &mut W, solver: &Solver) -> io::Result<()> {
    let clauses = solver.original_clauses();
    writeln!(out, "p cnf {} {}", solver.n_vars(), clauses.len())?;
    for clause in clauses {
        for lit in clause {
            write!(out, "{} ", lit)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}


fn parse_error(message: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("PARSE ERROR! {}", message),
    )
}


struct Reader<'a> {
    chars: str::Chars<'a>,
    cur: Option<char>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Reader<'a> {
        let mut chars = text.chars();
        let cur = chars.next();
        Reader { chars, cur }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.cur
    }

    #[inline]
    fn next(&mut self) {
        self.cur = self.chars.next();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cur {
            if !c.is_whitespace() {
                break;
            }
            self.next();
        }
    }

    fn skip_line(&mut self) {
        loop {
            match self.cur {
                None => break,
                Some('\n') => {
                    self.next();
                    break;
                }
                _ => self.next(),
            }
        }
    }

    fn consume(&mut self, target: &str) -> io::Result<()> {
        for tc in target.chars() {
            match self.cur {
                Some(c) if c == tc => self.next(),
                _ => return Err(parse_error(&format!("expected '{}'", target))),
            }
        }
        Ok(())
    }

    fn read_int_body(&mut self) -> io::Result<i64> {
        let mut len = 0;
        let mut value: i64 = 0;
        loop {
            match self.cur.and_then(|c| c.to_digit(10)) {
                Some(d) => {
                    value = value * 10 + i64::from(d);
                    if value > i64::from(i32::MAX) {
                        return Err(parse_error("number does not fit in 32 bits"));
                    }
                    len += 1;
                    self.next();
                }
                None if len > 0 => return Ok(value),
                None => return Err(parse_error("integer expected")),
            }
        }
    }

    fn next_int(&mut self) -> io::Result<i32> {
        self.skip_whitespace();
        let sign = match self.cur {
            Some('+') => {
                self.next();
                1
            }
            Some('-') => {
                self.next();
                -1
            }
            _ => 1,
        };
        Ok(sign * self.read_int_body()? as i32)
    }

    fn next_uint(&mut self) -> io::Result<usize> {
        self.skip_whitespace();
        if let Some('+') = self.cur {
            self.next();
        }
        Ok(self.read_int_body()? as usize)
    }
}
