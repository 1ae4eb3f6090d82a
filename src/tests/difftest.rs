use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::difftest::{DiffTest, DiffTestConfig, Outcome};
use crate::error::{DevError, DevResult};
use crate::parser;
use crate::tools::{PbesTools, Strategy};

/// Stand-in for the mCRL2 tools with fixed answers
struct FakeTools {
    original: Option<bool>,
    abstracted: Option<bool>,
    abstraction_succeeds: bool,
    translation_fails: bool,
    strategies: Vec<Strategy>,
    texts: Vec<String>,
    solved: usize,
}

impl FakeTools {
    fn new(original: Option<bool>, abstracted: Option<bool>) -> Self {
        FakeTools { original, abstracted, abstraction_succeeds: true, translation_fails: false, strategies: Vec::new(), texts: Vec::new(), solved: 0 }
    }
}

impl PbesTools for FakeTools {
    fn txt2pbes(&mut self, input: &Path, output: &Path) -> DevResult<()> {
        self.texts.push(fs::read_to_string(input)?);
        if self.translation_fails {
            return Err(DevError::child_exited(Path::new("txt2pbes"), -1));
        }
        fs::write(output, "")?;
        Ok(())
    }

    fn pbesabsinthe(&mut self, _input: &Path, output: &Path, strategy: Strategy) -> DevResult<bool> {
        self.strategies.push(strategy);
        if self.abstraction_succeeds {
            fs::write(output, "")?;
        }
        Ok(self.abstraction_succeeds)
    }

    fn pbes2bool(&mut self, input: &Path) -> DevResult<Option<bool>> {
        self.solved += 1;
        if input.to_string_lossy().ends_with("a.pbes") {
            Ok(self.original)
        } else {
            Ok(self.abstracted)
        }
    }
}

fn config(iterations: usize) -> DiffTestConfig {
    DiffTestConfig { iterations, ..DiffTestConfig::default() }
}

#[test]
fn outcomes() {
    assert_eq!(Outcome::from_answers(Some(true), Some(true)), Outcome::Agree(true));
    assert_eq!(Outcome::from_answers(Some(false), Some(false)), Outcome::Agree(false));
    assert_eq!(Outcome::from_answers(Some(true), Some(false)), Outcome::Mismatch { original: true, abstracted: false });
    assert_eq!(Outcome::from_answers(None, Some(false)), Outcome::Inconclusive);
    assert_eq!(Outcome::from_answers(Some(true), None), Outcome::Inconclusive);
    assert_eq!(Outcome::from_answers(None, None), Outcome::Inconclusive);

    assert!(Outcome::Agree(false).passed());
    assert!(Outcome::Inconclusive.passed());
    assert!(!Outcome::Mismatch { original: false, abstracted: true }.passed());
}

#[test]
fn agreeing_run_passes() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(true), Some(true));
    let mut rng = StdRng::seed_from_u64(3);

    DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config(6), &mut rng).unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    use Strategy::*;
    assert_eq!(tools.strategies, vec![Over, Under, Over, Under, Over, Under]);
    assert_eq!(tools.texts.len(), 6);
    for text in tools.texts.iter() {
        parser::parse(text).unwrap();
    }
}

#[test]
fn fixed_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(false), Some(false));
    let mut rng = StdRng::seed_from_u64(5);

    let config = DiffTestConfig { strategy: Some(Strategy::Under), ..config(3) };
    DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config, &mut rng).unwrap();

    assert_eq!(tools.strategies, vec![Strategy::Under; 3]);
}

#[test]
fn inconclusive_passes() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(None, Some(true));
    let mut rng = StdRng::seed_from_u64(11);

    DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config(4), &mut rng).unwrap();
    assert_eq!(tools.solved, 8);
}

#[test]
fn failed_abstraction_is_inconclusive() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(true), Some(false));
    tools.abstraction_succeeds = false;
    let mut rng = StdRng::seed_from_u64(13);

    DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config(4), &mut rng).unwrap();
    // only the original PBES is solved
    assert_eq!(tools.solved, 4);
}

#[test]
#[ntest::timeout(20000)]
fn mismatch_fails_and_minimizes() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(true), Some(false));
    let mut rng = StdRng::seed_from_u64(17);

    match DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config(5), &mut rng) {
        Err(DevError::TestFailed(file)) => assert_eq!(file, "pbesabsinthe.txt"),
        other => panic!("expected a test failure, got {:?}", other),
    }

    // the failing PBES is found in the first iteration
    assert_eq!(tools.strategies[0], Strategy::Over);
    assert!(tools.strategies[1..].iter().all(|s| *s == Strategy::Over));

    let minimized = fs::read_to_string(dir.path().join("pbesabsinthe_minimized.txt")).unwrap();
    let minimized = parser::parse(&minimized).unwrap();
    assert!(minimized.size() <= parser::parse(&tools.texts[0]).unwrap().size());
    // a failing run still removes its files, except for the minimized result
    let remaining: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name().into_string().unwrap()).collect();
    assert_eq!(remaining, vec!["pbesabsinthe_minimized.txt"]);
}

#[test]
fn mismatch_without_minimizing() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(false), Some(true));
    let mut rng = StdRng::seed_from_u64(19);

    let config = DiffTestConfig { minimize: false, ..config(5) };
    assert!(DiffTest::new(&mut tools, dir.path().to_owned(), true).run(&config, &mut rng).is_err());

    assert_eq!(tools.texts.len(), 1);
    assert!(!dir.path().join("pbesabsinthe_minimized.txt").exists());
    // kept for inspection
    for file in ["pbesabsinthe.txt", "pbesabsinthea.pbes", "pbesabsintheb.pbes"] {
        assert!(dir.path().join(file).exists(), "{}", file);
    }
}

#[test]
fn keep_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(true), Some(true));
    let mut rng = StdRng::seed_from_u64(23);

    let config = DiffTestConfig { name: String::from("kept"), ..config(2) };
    DiffTest::new(&mut tools, dir.path().to_owned(), true).run(&config, &mut rng).unwrap();

    let text = fs::read_to_string(dir.path().join("kept.txt")).unwrap();
    assert_eq!(text, tools.texts[1]);
    assert!(dir.path().join("kepta.pbes").exists());
    assert!(dir.path().join("keptb.pbes").exists());
}

#[test]
fn translation_errors_abort_and_clean_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = FakeTools::new(Some(true), Some(true));
    tools.translation_fails = true;
    let mut rng = StdRng::seed_from_u64(29);

    let result = DiffTest::new(&mut tools, dir.path().to_owned(), false).run(&config(3), &mut rng);
    assert!(matches!(result, Err(DevError::ChildExited(_, -1))));
    assert_eq!(tools.solved, 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
#[ntest::timeout(20000)]
fn check_and_minimize() {
    let dir = tempfile::tempdir().unwrap();
    let pbes = parser::parse(super::EXAMPLE).unwrap();

    let mut tools = FakeTools::new(Some(true), Some(true));
    let result = DiffTest::new(&mut tools, dir.path().to_owned(), false)
        .check_and_minimize(pbes.clone(), "example", Strategy::Under)
        .unwrap();
    assert_eq!(result, None);
    assert_eq!(tools.strategies, vec![Strategy::Under]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let mut tools = FakeTools::new(Some(false), Some(true));
    let minimized = DiffTest::new(&mut tools, dir.path().to_owned(), false)
        .check_and_minimize(pbes.clone(), "example", Strategy::Over)
        .unwrap()
        .unwrap();
    assert!(minimized.size() < pbes.size());

    let written = fs::read_to_string(dir.path().join("example_minimized.txt")).unwrap();
    assert_eq!(parser::parse(&written).unwrap(), minimized);
    assert!(!dir.path().join("example_check.txt").exists());
}
