use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::difftest::{test_pbesabsinthe, Outcome, TempFiles};
use crate::error::DevError;
use crate::tools::{parse_pbes2bool_output, Mcrl2Tools, PbesTools, Strategy};

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn pbes2bool_output() {
    assert_eq!(parse_pbes2bool_output("true\n"), Some(true));
    assert_eq!(parse_pbes2bool_output("false"), Some(false));
    assert_eq!(parse_pbes2bool_output("The solution for the initial variable of the pbes is true\n\n"), Some(true));
    assert_eq!(parse_pbes2bool_output("The solution for the initial variable of the pbes is false."), Some(false));
    assert_eq!(parse_pbes2bool_output("solving...\nfalse\n"), Some(false));
    assert_eq!(parse_pbes2bool_output(""), None);
    assert_eq!(parse_pbes2bool_output("error: out of memory"), None);
}

#[test]
fn strategies() {
    assert_eq!(Strategy::for_iteration(0), Strategy::Over);
    assert_eq!(Strategy::for_iteration(1), Strategy::Under);
    assert_eq!(Strategy::for_iteration(2), Strategy::Over);
    assert_eq!(Strategy::Under.to_string(), "under");
}

/// Runs all subprocess scenarios in sequence, so no other test forks while scripts are written
#[test]
#[ntest::timeout(30000)]
fn subprocess_tools() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();

    let txt2pbes = script(bin.path(), "txt2pbes", "cp \"$1\" \"$2\"");
    let absinthe = script(bin.path(), "pbesabsinthe", "[ \"$1\" = \"--strategy=over\" ] || exit 3\ncp \"$2\" \"$3\"");
    let solve_true = script(bin.path(), "pbes2bool_true", "test -f \"$1\" && echo true");
    let solve_fail = script(bin.path(), "pbes2bool_fail", "echo false; exit 1");
    let solve_hang = script(bin.path(), "pbes2bool_hang", "sleep 10; echo true");
    let failing = script(bin.path(), "failing", "exit 2");
    let translate_hang = script(bin.path(), "txt2pbes_hang", "sleep 10; cp \"$1\" \"$2\"");

    let pbes = super::random_pbes(1, true);
    let mut files = TempFiles::new(work.path().to_owned());

    let mut tools = Mcrl2Tools::new(txt2pbes.clone(), absinthe.clone(), solve_true.clone(), None);
    let outcome = test_pbesabsinthe(&mut tools, &mut files, &pbes, "scripted", Strategy::Over).unwrap();
    assert_eq!(outcome, Outcome::Agree(true));
    assert_eq!(fs::read_to_string(work.path().join("scriptedb.pbes")).unwrap(), pbes.to_string());

    // the script rejects the under strategy, so there is nothing to compare
    let outcome = test_pbesabsinthe(&mut tools, &mut files, &pbes, "scripted", Strategy::Under).unwrap();
    assert_eq!(outcome, Outcome::Inconclusive);

    let mut tools = Mcrl2Tools::new(txt2pbes.clone(), absinthe.clone(), solve_fail, None);
    assert_eq!(tools.pbes2bool(&work.path().join("scripteda.pbes")).unwrap(), None);

    let mut tools = Mcrl2Tools::new(txt2pbes.clone(), absinthe.clone(), solve_hang, Some(Duration::from_millis(300)));
    assert_eq!(tools.pbes2bool(&work.path().join("scripteda.pbes")).unwrap(), None);
    assert!(!work.path().join("scripteda.answer").exists());

    // a translation that does not finish in time is an error, not an inconclusive result
    let mut tools = Mcrl2Tools::new(translate_hang, absinthe.clone(), solve_true.clone(), Some(Duration::from_millis(300)));
    let result = tools.txt2pbes(&work.path().join("scripted.txt"), &work.path().join("out.pbes"));
    assert!(matches!(result, Err(DevError::ChildExited(_, -1))));
    assert!(!work.path().join("out.pbes").exists());

    let mut tools = Mcrl2Tools::new(failing, absinthe.clone(), solve_true.clone(), None);
    let result = tools.txt2pbes(&work.path().join("scripted.txt"), &work.path().join("out.pbes"));
    assert!(matches!(result, Err(DevError::ChildExited(_, 2))));

    let mut tools = Mcrl2Tools::new(bin.path().join("missing"), absinthe, solve_true, None);
    let result = tools.txt2pbes(&work.path().join("scripted.txt"), &work.path().join("out.pbes"));
    assert!(matches!(result, Err(DevError::ChildCreation(_))));

    files.cleanup();
    assert!(!work.path().join("scripted.txt").exists());
    // answer files of pbes2bool do not outlive the call
    assert!(!work.path().join("scripteda.answer").exists());
}
