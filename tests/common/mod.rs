//! Test support: a brute-force model enumerator speaking the solver text protocol.

use binairo_sat::SolverError;
use binairo_sat::sat::clause::Clause;
use binairo_sat::sat::cnf::Cnf;
use binairo_sat::sat::dimacs::parse_dimacs;
use binairo_sat::sat::solver::{RawOutput, Solver};
use std::fmt::Write;

/// Literals per `v` line, so longer models are split over several lines.
const LINE_WIDTH: usize = 10;

/// Enumerates models by plain backtracking over variables `1..=num_vars` in order.
///
/// A clause is checked once its highest variable has been assigned. Only usable on
/// small grids, which is all the tests need.
#[derive(Debug, Default)]
pub struct Enumerator;

impl Solver for Enumerator {
    fn invoke(&self, input: &str, max_solutions: usize) -> Result<RawOutput, SolverError> {
        let cnf = match parse_dimacs(input.as_bytes()) {
            Ok(cnf) => cnf,
            Err(e) => {
                return RawOutput {
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
                .check(input);
            }
        };

        let models = enumerate(&cnf, max_solutions);
        let mut stdout = String::from("c brute-force enumerator\n");
        for model in &models {
            for chunk in model.chunks(LINE_WIDTH) {
                let line: Vec<String> = chunk.iter().map(ToString::to_string).collect();
                let _ = writeln!(stdout, "v {}", line.join(" "));
            }
            stdout.push_str("v 0\n");
        }
        let verdict = if models.is_empty() {
            "UNSATISFIABLE"
        } else {
            "SATISFIABLE"
        };
        let _ = writeln!(stdout, "s {verdict}");

        Ok(RawOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

/// Every model of `cnf` (at most `limit` of them, `0` = all) as DIMACS integers.
pub fn enumerate(cnf: &Cnf, limit: usize) -> Vec<Vec<i32>> {
    let num_vars = cnf.num_vars() as usize;
    let mut by_last: Vec<Vec<&Clause>> = vec![Vec::new(); num_vars + 1];
    for clause in cnf.iter() {
        if clause.is_empty() {
            return Vec::new();
        }
        by_last[clause.max_variable() as usize].push(clause);
    }

    let mut values = vec![false; num_vars + 1];
    let mut models = Vec::new();
    search(1, &by_last, &mut values, &mut models, limit);
    models
}

fn search(
    var: usize,
    by_last: &[Vec<&Clause>],
    values: &mut [bool],
    models: &mut Vec<Vec<i32>>,
    limit: usize,
) {
    if limit != 0 && models.len() >= limit {
        return;
    }
    if var == by_last.len() {
        let model = (1..var)
            .map(|v| {
                let v = i32::try_from(v).expect("variable fits in i32");
                if values[v as usize] { v } else { -v }
            })
            .collect();
        models.push(model);
        return;
    }

    for value in [true, false] {
        values[var] = value;
        let consistent = by_last[var]
            .iter()
            .all(|clause| clause.is_satisfied_by(|v| Some(values[v as usize])));
        if consistent {
            search(var + 1, by_last, values, models, limit);
        }
    }
}
