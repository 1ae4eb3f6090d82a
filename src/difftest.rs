use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{info, warn};

use crate::error::{DevError, DevResult};
use crate::minimize::CounterExampleMinimizer;
use crate::pbes::Pbes;
use crate::random::RandomPbes;
use crate::tools::{PbesTools, Strategy};

/// Result of comparing the solutions before and after abstraction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Agree(bool),
    Inconclusive,
    Mismatch { original: bool, abstracted: bool },
}

/// Settings of a differential test run
#[derive(Clone, Debug)]
pub struct DiffTestConfig {
    pub iterations: usize,
    pub equation_count: usize,
    pub atom_count: usize,
    pub propvar_count: usize,
    pub use_quantifiers: bool,
    /// Use this strategy in every iteration instead of alternating
    pub strategy: Option<Strategy>,
    pub minimize: bool,
    pub name: String,
}

/// Files produced during a run, removed on cleanup
pub struct TempFiles {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

pub struct DiffTest<'a, T: PbesTools> {
    tools: &'a mut T,
    files: TempFiles,
    keep_files: bool,
}

impl Outcome {
    pub fn from_answers(original: Option<bool>, abstracted: Option<bool>) -> Self {
        match (original, abstracted) {
            (Some(original), Some(abstracted)) if original == abstracted => Outcome::Agree(original),
            (Some(original), Some(abstracted)) => Outcome::Mismatch { original, abstracted },
            _ => Outcome::Inconclusive,
        }
    }

    /// A test passes unless both answers are present and differ
    pub fn passed(&self) -> bool {
        !matches!(self, Outcome::Mismatch { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Agree(answer) => write!(f, "{} {}", answer, answer),
            Outcome::Inconclusive => write!(f, "inconclusive"),
            Outcome::Mismatch { original, abstracted } => write!(f, "{} {} MISMATCH", original, abstracted),
        }
    }
}

impl Default for DiffTestConfig {
    fn default() -> Self {
        DiffTestConfig {
            iterations: 10,
            equation_count: 2,
            atom_count: 2,
            propvar_count: 2,
            use_quantifiers: true,
            strategy: None,
            minimize: true,
            name: String::from("pbesabsinthe"),
        }
    }
}

impl TempFiles {
    pub fn new(dir: PathBuf) -> Self {
        TempFiles { dir, files: Vec::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `name` inside the working directory, registered for removal
    pub fn add(&mut self, name: &str) -> PathBuf {
        let path = self.dir.join(name);
        if !self.files.contains(&path) {
            self.files.push(path.clone());
        }
        path
    }

    pub fn cleanup(&mut self) {
        for file in self.files.drain(..) {
            if let Err(e) = fs::remove_file(&file) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("unable to remove {}: {}", file.display(), e);
                }
            }
        }
    }
}

/// Solve `pbes` before and after abstracting it with pbesabsinthe
pub fn test_pbesabsinthe<T: PbesTools>(tools: &mut T, files: &mut TempFiles, pbes: &Pbes, filename: &str, strategy: Strategy) -> DevResult<Outcome> {
    let txtfile = files.add(&format!("{}.txt", filename));
    fs::write(&txtfile, pbes.to_string())?;
    let pbesfile1 = files.add(&format!("{}a.pbes", filename));
    let pbesfile2 = files.add(&format!("{}b.pbes", filename));

    tools.txt2pbes(&txtfile, &pbesfile1)?;
    let abstracted = tools.pbesabsinthe(&pbesfile1, &pbesfile2, strategy)?;

    let answer1 = tools.pbes2bool(&pbesfile1)?;
    let answer2 = if abstracted { tools.pbes2bool(&pbesfile2)? } else { None };

    info!("{} {} {:?} {:?}", filename, strategy, answer1, answer2);
    Ok(Outcome::from_answers(answer1, answer2))
}

impl<'a, T: PbesTools> DiffTest<'a, T> {
    /// Produced files are removed at the end of `run` and `check_and_minimize` unless `keep_files` is set
    pub fn new(tools: &'a mut T, dir: PathBuf, keep_files: bool) -> Self {
        DiffTest { tools, files: TempFiles::new(dir), keep_files }
    }

    pub fn test(&mut self, pbes: &Pbes, filename: &str, strategy: Strategy) -> DevResult<Outcome> {
        test_pbesabsinthe(&mut *self.tools, &mut self.files, pbes, filename, strategy)
    }

    /// Run all iterations, stopping at the first mismatch
    pub fn run<R: Rng>(&mut self, config: &DiffTestConfig, rng: &mut R) -> DevResult<()> {
        let result = self.run_iterations(config, rng);
        self.finish();
        result
    }

    fn run_iterations<R: Rng>(&mut self, config: &DiffTestConfig, rng: &mut R) -> DevResult<()> {
        for i in 0..config.iterations {
            let pbes = RandomPbes::generate(config.equation_count, config.atom_count, config.propvar_count, config.use_quantifiers, rng);
            let strategy = config.strategy.unwrap_or_else(|| Strategy::for_iteration(i));

            if !self.test(&pbes, &config.name, strategy)?.passed() {
                if config.minimize {
                    self.minimize(pbes, &config.name, strategy)?;
                }
                return Err(DevError::test_failed(format!("{}.txt", config.name)));
            }
        }

        Ok(())
    }

    /// Shrink a failing PBES and store it as `<name>_minimized.txt`
    pub fn minimize(&mut self, pbes: Pbes, name: &str, strategy: Strategy) -> DevResult<Pbes> {
        let filename = format!("{}_minimize", name);
        let dir = self.files.dir().to_owned();
        let tools = &mut *self.tools;
        let files = &mut self.files;

        let oracle = |p: &Pbes| -> DevResult<bool> {
            Ok(test_pbesabsinthe(&mut *tools, &mut *files, p, &filename, strategy)?.passed())
        };
        let mut minimizer = CounterExampleMinimizer::new(pbes, oracle, name);
        let minimized = minimizer.minimize()?;
        minimizer.write(&dir)?;
        Ok(minimized)
    }

    /// Minimize `pbes` if the test fails on it, `None` if it passes
    pub fn check_and_minimize(&mut self, pbes: Pbes, name: &str, strategy: Strategy) -> DevResult<Option<Pbes>> {
        let result = self.test(&pbes, &format!("{}_check", name), strategy)
            .and_then(|outcome| {
                info!("{}: {}", name, outcome);
                if outcome.passed() {
                    Ok(None)
                } else {
                    self.minimize(pbes, name, strategy).map(Some)
                }
            });
        self.finish();
        result
    }

    fn finish(&mut self) {
        if self.keep_files {
            info!("keeping generated files in {}", self.files.dir().display());
        } else {
            self.files.cleanup();
        }
    }
}
