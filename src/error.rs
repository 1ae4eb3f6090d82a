use std::path::Path;
use std::process;

use thiserror::Error;

use crate::{classes, parser};

pub type DevResult<T> = Result<T, DevError>;

#[derive(Error, Debug)]
pub enum DevError {
    #[error("Parsing Error: unexpected rule - {0}")]
    ParsingUnexpectedRule(String),

    #[error("Parsing Error: rule not found - {0}")]
    ParsingRuleNotFound(String),

    #[error("Syntax Error:\n{0}")]
    SyntaxError(Box<pest::error::Error<parser::Rule>>),

    #[error("Class Table Error: {0} line {1}:\n{2}")]
    ClassSyntaxError(String, usize, Box<pest::error::Error<classes::Rule>>),

    #[error("Class Table Error: {0}")]
    ClassTable(String),

    #[error("Malformed PBES: {0}")]
    MalformedPbes(String),

    #[error("File Error: {0}")]
    File(#[from] std::io::Error),

    #[error("Child Error: unable to execute '{0}'")]
    ChildCreation(String),

    #[error("Child Error: '{0}' exited with error '{1}'")]
    ChildExited(String, i32),

    #[error("Test {0} failed")]
    TestFailed(String),
}

impl DevError {
    pub fn parsing_unexpected_rule(rule: parser::Rule) -> Self {
        DevError::ParsingUnexpectedRule(format!("{:?}", rule))
    }

    pub fn parsing_rule_not_found(rule: parser::Rule) -> Self {
        DevError::ParsingRuleNotFound(format!("{:?}", rule))
    }

    pub fn syntax_error(e: pest::error::Error<parser::Rule>) -> Self {
        DevError::SyntaxError(Box::new(e))
    }

    pub fn class_syntax_error(table: &str, line: usize, e: pest::error::Error<classes::Rule>) -> Self {
        DevError::ClassSyntaxError(table.to_owned(), line, Box::new(e))
    }

    pub fn class_table(msg: String) -> Self {
        DevError::ClassTable(msg)
    }

    pub fn malformed(msg: String) -> Self {
        DevError::MalformedPbes(msg)
    }

    pub fn child_creation(name: &Path) -> Self {
        DevError::ChildCreation(name.display().to_string())
    }

    pub fn child_exited(name: &Path, code: i32) -> Self {
        DevError::ChildExited(name.display().to_string(), code)
    }

    pub fn file_error(e: std::io::Error) -> Self {
        DevError::File(e)
    }

    pub fn test_failed(file: String) -> Self {
        DevError::TestFailed(file)
    }
}

pub fn resolve<T>(result: DevResult<T>) -> T {
    match result {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        },
    }
}
