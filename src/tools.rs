use std::fmt::{self, Display};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{self, Child, ExitStatus, Stdio};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::error::{DevError, DevResult};

/// Approximation strategy of pbesabsinthe
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    Over,
    Under,
}

/// The external tools a differential test depends on
pub trait PbesTools {
    /// Translate a textual PBES into the binary format
    fn txt2pbes(&mut self, input: &Path, output: &Path) -> DevResult<()>;

    /// Abstract a PBES, returns `false` if the tool did not produce a result
    fn pbesabsinthe(&mut self, input: &Path, output: &Path, strategy: Strategy) -> DevResult<bool>;

    /// Solve a PBES, `None` if no answer could be obtained
    fn pbes2bool(&mut self, input: &Path) -> DevResult<Option<bool>>;
}

/// Tools from an mCRL2 installation, invoked as subprocesses
#[derive(Clone, Debug)]
pub struct Mcrl2Tools {
    txt2pbes: PathBuf,
    pbesabsinthe: PathBuf,
    pbes2bool: PathBuf,
    timeout: Option<Duration>,
}

impl Strategy {
    /// Alternate between over- and underapproximation
    pub fn for_iteration(i: usize) -> Self {
        if i % 2 == 0 {
            Strategy::Over
        } else {
            Strategy::Under
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Over => write!(f, "over"),
            Strategy::Under => write!(f, "under"),
        }
    }
}

impl Mcrl2Tools {
    pub fn new(txt2pbes: PathBuf, pbesabsinthe: PathBuf, pbes2bool: PathBuf, timeout: Option<Duration>) -> Self {
        Mcrl2Tools { txt2pbes, pbesabsinthe, pbes2bool, timeout }
    }

    fn spawn(tool: &Path, args: &[&str], stdout: Stdio) -> DevResult<Child> {
        debug!("running {} {}", tool.display(), args.join(" "));
        process::Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| DevError::child_creation(tool))
    }

    /// Wait for the child, killing it once the timeout expires
    fn wait(&self, tool: &Path, child: &mut Child) -> DevResult<Option<ExitStatus>> {
        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => return Ok(Some(child.wait()?)),
        };

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(Some(status)),
            None => {
                warn!("{} timed out after {:?}", tool.display(), timeout);
                child.kill()?;
                child.wait()?;
                Ok(None)
            },
        }
    }

    fn run(&self, tool: &Path, args: &[&str], stdout: Stdio) -> DevResult<Option<ExitStatus>> {
        let mut child = Self::spawn(tool, args, stdout)?;
        self.wait(tool, &mut child)
    }
}

fn path_arg(path: &Path) -> DevResult<&str> {
    path.to_str()
        .ok_or_else(|| DevError::file_error(std::io::Error::other(format!("non-unicode path {}", path.display()))))
}

/// Answer printed by pbes2bool, which is the last word of its output
pub fn parse_pbes2bool_output(output: &str) -> Option<bool> {
    let line = output.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()?;

    match line.split_whitespace().last()?.trim_end_matches('.') {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

impl PbesTools for Mcrl2Tools {
    fn txt2pbes(&mut self, input: &Path, output: &Path) -> DevResult<()> {
        let status = self.run(&self.txt2pbes, &[path_arg(input)?, path_arg(output)?], Stdio::null())?;
        match status {
            Some(status) if status.success() => Ok(()),
            Some(status) => Err(DevError::child_exited(&self.txt2pbes, status.code().unwrap_or(-1))),
            None => Err(DevError::child_exited(&self.txt2pbes, -1)),
        }
    }

    fn pbesabsinthe(&mut self, input: &Path, output: &Path, strategy: Strategy) -> DevResult<bool> {
        let strategy = format!("--strategy={}", strategy);
        let status = self.run(&self.pbesabsinthe, &[&strategy, path_arg(input)?, path_arg(output)?], Stdio::null())?;
        match status {
            Some(status) if status.success() => Ok(true),
            Some(status) => {
                warn!("{} exited with {}", self.pbesabsinthe.display(), status);
                Ok(false)
            },
            None => Ok(false),
        }
    }

    fn pbes2bool(&mut self, input: &Path) -> DevResult<Option<bool>> {
        let answer_file = input.with_extension("answer");
        let stdout = File::create(&answer_file)?;
        let status = self.run(&self.pbes2bool, &[path_arg(input)?], Stdio::from(stdout));

        let output = fs::read_to_string(&answer_file);
        if let Err(e) = fs::remove_file(&answer_file) {
            warn!("unable to remove {}: {}", answer_file.display(), e);
        }
        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!("unable to read {}: {}", answer_file.display(), e);
                String::new()
            },
        };

        match status? {
            Some(status) if status.success() => Ok(parse_pbes2bool_output(&output)),
            Some(status) => {
                debug!("{} exited with {}", self.pbes2bool.display(), status);
                Ok(None)
            },
            None => Ok(None),
        }
    }
}
