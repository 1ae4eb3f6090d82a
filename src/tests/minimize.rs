use crate::error::DevResult;
use crate::minimize::{self, CounterExampleMinimizer};
use crate::parser;
use crate::pbes::*;

const FAILING: &str = "
pbes
  nu X0(n: Nat) = (val(n < 2) && X1(n)) || !X0(0);
  mu X1(m: Nat) = val(m > 1) => X0(m);
init X0(0);
";

fn contains_greater(e: &PbesExpr) -> bool {
    match e {
        PbesExpr::Val(DataExpr::Greater(..)) => true,
        _ => e.children().into_iter().any(contains_greater),
    }
}

/// The test "fails" as long as some comparison with `>` survives
fn oracle(pbes: &Pbes) -> DevResult<bool> {
    Ok(!pbes.equations().iter().any(|e| contains_greater(&e.rhs)))
}

#[test]
#[ntest::timeout(10000)]
fn minimizes_to_smallest_failing_system() {
    let pbes = parser::parse(FAILING).unwrap();
    let mut minimizer = CounterExampleMinimizer::new(pbes, oracle, "greater");
    let minimized = minimizer.minimize().unwrap();

    let expected = parser::parse("pbes nu X0(n: Nat) = true; mu X1(m: Nat) = val(m > 1); init X0(0);").unwrap();
    assert_eq!(minimized, expected, "\n{}", minimized);
    assert!(!oracle(&minimized).unwrap());
    assert!(minimizer.attempts() > 0);
}

#[test]
#[ntest::timeout(10000)]
fn passing_input_is_kept() {
    let pbes = parser::parse(FAILING).unwrap();
    let mut calls = 0;
    let mut minimizer = CounterExampleMinimizer::new(pbes.clone(), |_: &Pbes| {
        calls += 1;
        Ok(true)
    }, "passing");

    assert_eq!(minimizer.minimize().unwrap(), pbes);
    let attempts = minimizer.attempts();
    drop(minimizer);
    assert_eq!(attempts, calls);
}

#[test]
fn oracle_errors_abort() {
    let pbes = parser::parse(FAILING).unwrap();
    let mut minimizer = CounterExampleMinimizer::new(pbes, |_: &Pbes| {
        Err(crate::error::DevError::test_failed(String::from("broken.txt")))
    }, "broken");

    assert!(minimizer.minimize().is_err());
}

#[test]
fn candidates_shrink() {
    let pbes = parser::parse(FAILING).unwrap();
    let bound = minimize::measure(&pbes);
    let candidates = minimize::candidates(&pbes);

    assert!(!candidates.is_empty());
    for candidate in candidates.iter().filter(|c| c.check().is_ok()) {
        assert!(minimize::measure(candidate) <= bound, "{}", candidate);
    }

    // removing X1 substitutes its instance
    let removed = candidates.iter()
        .find(|c| c.equations().len() == 1 && c.equations()[0].rhs.to_string() == "((val(n < 2) && true) || !X0(0))");
    assert!(removed.is_some());
}

#[test]
fn init_equation_is_never_removed() {
    let pbes = parser::parse(FAILING).unwrap();
    for candidate in minimize::candidates(&pbes) {
        assert!(candidate.equations().iter().any(|e| e.name == pbes.init().name));
    }
}

#[test]
fn writes_result() {
    let dir = tempfile::tempdir().unwrap();
    let pbes = parser::parse(FAILING).unwrap();
    let mut minimizer = CounterExampleMinimizer::new(pbes, oracle, "greater");
    let minimized = minimizer.minimize().unwrap();

    let path = minimizer.write(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("greater_minimized.txt"));
    let written = std::fs::read_to_string(path).unwrap();
    assert_eq!(parser::parse(&written).unwrap(), minimized);
}
