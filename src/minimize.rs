use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::DevResult;
use crate::pbes::{Equation, Pbes, PbesExpr};

/// Greedy shrinking of a PBES on which a test fails
///
/// The oracle reports whether the test passes on a given PBES. A candidate
/// reduction is kept as soon as the oracle still reports a failure for it.
pub struct CounterExampleMinimizer<F>
where
    F: FnMut(&Pbes) -> DevResult<bool>,
{
    current: Pbes,
    oracle: F,
    name: String,
    attempts: usize,
}

/// Node count first, then the number of leaves that are not constants
type Measure = (usize, usize);

fn non_constant_leaves(e: &PbesExpr) -> usize {
    match e {
        PbesExpr::True() | PbesExpr::False() => 0,
        PbesExpr::Val(_) | PbesExpr::PropVar(_) => 1,
        _ => e.children().into_iter().map(non_constant_leaves).sum(),
    }
}

pub fn measure(pbes: &Pbes) -> Measure {
    let leaves = pbes.equations().iter()
        .map(|e| non_constant_leaves(&e.rhs))
        .sum();
    (pbes.size(), leaves)
}

/// Replacements for a single subterm
fn subterm_reductions(term: &PbesExpr) -> Vec<PbesExpr> {
    use PbesExpr::*;
    let mut reductions = vec![True(), False()];

    match term {
        Not(e) => reductions.push((**e).clone()),
        And(l, r) | Or(l, r) | Imp(l, r) => {
            reductions.push((**l).clone());
            reductions.push((**r).clone());
        },
        Forall(v, e) | Exists(v, e) if !e.free_variables().contains(&v.name) => reductions.push((**e).clone()),
        _ => (),
    }

    reductions.retain(|r| r != term);
    reductions
}

/// All single-step reductions of `pbes`, not necessarily well-formed
pub fn candidates(pbes: &Pbes) -> Vec<Pbes> {
    let mut result = Vec::new();

    for removed in pbes.equations().iter().filter(|e| e.name != pbes.init().name) {
        for replacement in [PbesExpr::True(), PbesExpr::False()] {
            let equations = pbes.equations().iter()
                .filter(|e| e.name != removed.name)
                .map(|e| Equation {
                    rhs: e.rhs.substitute_propvar(&removed.name, &replacement),
                    ..e.clone()
                })
                .collect();
            result.push(Pbes::new(equations, pbes.init().clone()));
        }
    }

    for (i, eq) in pbes.equations().iter().enumerate() {
        for pos in 0..eq.rhs.size() {
            let term = match eq.rhs.subterm(pos) {
                Some(term) => term,
                None => continue,
            };
            for replacement in subterm_reductions(term) {
                let mut candidate = pbes.clone();
                candidate.equations_mut()[i].rhs = eq.rhs.replace_at(pos, &replacement);
                result.push(candidate);
            }
        }
    }

    result
}

impl<F> CounterExampleMinimizer<F>
where
    F: FnMut(&Pbes) -> DevResult<bool>,
{
    pub fn new(pbes: Pbes, oracle: F, name: &str) -> Self {
        CounterExampleMinimizer { current: pbes, oracle, name: name.to_owned(), attempts: 0 }
    }

    /// Number of oracle invocations so far
    #[cfg(test)]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    fn reduce_once(&mut self) -> DevResult<bool> {
        let bound = measure(&self.current);

        for candidate in candidates(&self.current) {
            if measure(&candidate) >= bound || candidate.check().is_err() {
                continue;
            }

            self.attempts += 1;
            if !(self.oracle)(&candidate)? {
                debug!("reduced counterexample to size {}", candidate.size());
                self.current = candidate;
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub fn minimize(&mut self) -> DevResult<Pbes> {
        info!("minimizing {} counterexample of size {}", self.name, self.current.size());
        while self.reduce_once()? {}
        info!("minimized to size {} after {} attempts", self.current.size(), self.attempts);
        Ok(self.current.clone())
    }

    /// Store the current counterexample as `<name>_minimized.txt` in `dir`
    pub fn write(&self, dir: &Path) -> DevResult<PathBuf> {
        let path = dir.join(format!("{}_minimized.txt", self.name));
        fs::write(&path, self.current.to_string())?;
        info!("wrote minimized counterexample to {}", path.display());
        Ok(path)
    }
}
