#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Bridge to an external SAT solver.
//!
//! A [`Solver`] receives DIMACS text and returns the raw text the solver printed.
//! Rendering the clause set and parsing the answer are shared by every backend
//! through [`Solver::solve`]; the only backend shipped here is
//! [`ExternalSolver`], which runs a solver binary (by default `clasp`) as a child
//! process and talks to it over stdin/stdout.

use crate::error::SolverError;
use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::dimacs::parse_output;
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// How often a solver running under a timeout is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The solver's overall verdict, taken from its status line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// At least one model exists.
    Satisfiable,
    /// No model exists.
    Unsatisfiable,
    /// The solver gave up.
    Unknown,
    /// Any other verdict, kept verbatim.
    Other(String),
}

impl Status {
    /// Interprets the text following the status prefix.
    #[must_use]
    pub fn from_verdict(verdict: &str) -> Self {
        match verdict.trim() {
            "SATISFIABLE" => Self::Satisfiable,
            "UNSATISFIABLE" => Self::Unsatisfiable,
            "UNKNOWN" | "" => Self::Unknown,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SATISFIABLE"),
            Self::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Other(verdict) => write!(f, "{verdict}"),
        }
    }
}

/// Models and verdict parsed from one solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome {
    /// Verdict from the status line.
    pub status: Status,
    /// Models in the order the solver printed them. They carry no ranking.
    pub solutions: Vec<Assignment>,
}

impl SolverOutcome {
    /// `true` for a `SATISFIABLE` verdict.
    #[must_use]
    pub fn is_satisfiable(&self) -> bool {
        self.status == Status::Satisfiable
    }
}

/// What a solver printed, stdout and stderr kept apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr; non-empty means failure.
    pub stderr: String,
}

impl RawOutput {
    /// Fails with [`SolverError::Diagnostic`] if anything reached the error stream.
    ///
    /// # Errors
    ///
    /// See above; `input` is attached so the failing run can be reproduced.
    pub fn check(self, input: &str) -> Result<Self, SolverError> {
        if self.stderr.is_empty() {
            Ok(self)
        } else {
            Err(SolverError::Diagnostic {
                stderr: self.stderr,
                input: input.to_owned(),
            })
        }
    }
}

/// A SAT solver reachable over the DIMACS text protocol.
pub trait Solver {
    /// Hands `input` to the solver, asking for at most `max_solutions` models
    /// (`0` = all of them).
    ///
    /// # Errors
    ///
    /// Implementations must fail with [`SolverError::Diagnostic`] when the solver
    /// reports anything on its error stream (see [`RawOutput::check`]).
    fn invoke(&self, input: &str, max_solutions: usize) -> Result<RawOutput, SolverError>;

    /// Renders `cnf`, runs the solver and parses its models.
    ///
    /// The number of returned models never exceeds `max_solutions` unless it is `0`.
    ///
    /// # Errors
    ///
    /// Whatever [`Solver::invoke`] or [`parse_output`] report.
    fn solve(&self, cnf: &Cnf, max_solutions: usize) -> Result<SolverOutcome, SolverError> {
        let input = cnf.to_dimacs();
        debug!(
            variables = cnf.num_vars(),
            clauses = cnf.num_clauses(),
            max_solutions,
            "invoking solver"
        );
        let raw = self.invoke(&input, max_solutions)?;
        let outcome = parse_output(&raw.stdout, max_solutions)?;
        debug!(status = %outcome.status, models = outcome.solutions.len(), "solver finished");
        Ok(outcome)
    }
}

/// A solver binary run as a child process, one process per call.
///
/// The CNF is written to the child's stdin and its stdout parsed afterwards. The
/// maximum model count is passed as `<models_flag> <count>` (`-n 0` for clasp
/// means "enumerate all"). Exit codes are ignored: solvers conventionally exit
/// with 10/20 to signal their verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalSolver {
    program: String,
    args: Vec<String>,
    models_flag: Option<String>,
    timeout: Option<Duration>,
}

impl Default for ExternalSolver {
    fn default() -> Self {
        Self::new("clasp")
    }
}

impl ExternalSolver {
    /// Runs `program` with the `-n` models flag and no timeout.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            models_flag: Some("-n".to_owned()),
            timeout: None,
        }
    }

    /// Adds an argument passed before the model-count flag.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds several arguments, see [`ExternalSolver::arg`].
    #[must_use]
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Flag used to pass the model limit; `None` if the solver takes no such flag.
    #[must_use]
    pub fn models_flag(mut self, flag: Option<String>) -> Self {
        self.models_flag = flag;
        self
    }

    /// Kills the solver once `timeout` has elapsed. Partial output is discarded.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The program that is run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, max_solutions: usize) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(flag) = &self.models_flag {
            command.arg(flag).arg(max_solutions.to_string());
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl Solver for ExternalSolver {
    fn invoke(&self, input: &str, max_solutions: usize) -> Result<RawOutput, SolverError> {
        debug!(program = %self.program, args = ?self.args, "spawning solver");
        let mut child =
            self.command(max_solutions)
                .spawn()
                .map_err(|source| SolverError::Spawn {
                    program: self.program.clone(),
                    source,
                })?;

        let writer = feed_stdin(&mut child, input)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let exit = match self.timeout {
            None => Some(child.wait()?),
            Some(limit) => wait_with_timeout(&mut child, limit)?,
        };

        let Some(exit) = exit else {
            child.kill()?;
            child.wait()?;
            debug!(program = %self.program, timeout = ?self.timeout, "solver killed after timeout");
            return Err(SolverError::Timeout(self.timeout.unwrap_or_default()));
        };
        debug!(program = %self.program, %exit, "solver exited");

        match join(writer)? {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => {}
        }

        RawOutput {
            stdout: join(stdout)??,
            stderr: join(stderr)??,
        }
        .check(input)
    }
}

/// Writes the CNF on a separate thread so a solver that prints while still
/// reading cannot deadlock against a full stdout pipe.
fn feed_stdin(child: &mut Child, input: &str) -> io::Result<JoinHandle<io::Result<()>>> {
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("solver stdin was not captured"))?;
    let input = input.to_owned();
    Ok(thread::spawn(move || stdin.write_all(input.as_bytes())))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut buffer)?;
        }
        Ok(buffer)
    })
}

fn join<T>(handle: JoinHandle<T>) -> io::Result<T> {
    handle
        .join()
        .map_err(|_| io::Error::other("solver pipe thread panicked"))
}

/// `None` if the child was still running when `limit` elapsed.
fn wait_with_timeout(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= limit {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
