use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Display};

use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use crate::error::{DevError, DevResult};

#[derive(Parser)]
#[grammar = "class_table.pest"]
struct ClassTableParser;

const TABLE_SUFFIX: &str = "_CLASSES";
const LIST_SUFFIX: &str = "_list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub is_const: bool,
    pub sort: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub name: String,
    /// Postfix between brackets, e.g. `_base` in `variable[_base]`
    pub base_postfix: Option<String>,
    pub params: Vec<Parameter>,
}

/// One row of a class table: ATerm tag, constructor and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRow {
    pub tag: String,
    pub constructor: Constructor,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    name: String,
    rows: Vec<ClassRow>,
}

impl Parameter {
    /// Sort of the element if the parameter is a list, otherwise the sort itself
    pub fn element_sort(&self) -> &str {
        self.sort.strip_suffix(LIST_SUFFIX).unwrap_or(&self.sort)
    }
}

impl Constructor {
    /// Name of the generated class
    pub fn class_name(&self) -> String {
        match &self.base_postfix {
            Some(postfix) => format!("{}{}", self.name, postfix),
            None => self.name.clone(),
        }
    }

    /// Name used by the generated traversal functions
    pub fn traversal_name(&self) -> &str {
        &self.name
    }
}

impl ClassRow {
    pub fn arity(&self) -> usize {
        self.constructor.params.len()
    }
}

fn parse_parameter(pair: Pair<Rule>) -> DevResult<Parameter> {
    let mut is_const = false;
    let mut identifiers = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::const_qualifier => is_const = true,
            Rule::identifier => identifiers.push(inner.as_str().to_owned()),
            Rule::reference => (),
            rule => return Err(DevError::class_table(format!("unexpected rule {:?}", rule))),
        }
    }

    match <[String; 2]>::try_from(identifiers) {
        Ok([sort, name]) => Ok(Parameter { is_const, sort, name }),
        Err(ids) => Err(DevError::class_table(format!("malformed parameter {:?}", ids))),
    }
}

fn parse_constructor(pair: Pair<Rule>) -> DevResult<Constructor> {
    let mut name = None;
    let mut base_postfix = None;
    let mut params = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::identifier => name = Some(inner.as_str().to_owned()),
            Rule::base_postfix => base_postfix = inner.into_inner()
                .next()
                .map(|p| p.as_str().to_owned()),
            Rule::parameter => params.push(parse_parameter(inner)?),
            rule => return Err(DevError::class_table(format!("unexpected rule {:?}", rule))),
        }
    }

    let name = name.ok_or_else(|| DevError::class_table(String::from("constructor without name")))?;
    Ok(Constructor { name, base_postfix, params })
}

fn parse_row(pair: Pair<Rule>) -> DevResult<ClassRow> {
    let mut tag = None;
    let mut constructor = None;
    let mut description = String::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag => tag = Some(inner.as_str().to_owned()),
            Rule::constructor => constructor = Some(parse_constructor(inner)?),
            Rule::description => description = inner.as_str().trim().to_owned(),
            Rule::EOI => (),
            rule => return Err(DevError::class_table(format!("unexpected rule {:?}", rule))),
        }
    }

    match (tag, constructor) {
        (Some(tag), Some(constructor)) => Ok(ClassRow { tag, constructor, description }),
        _ => Err(DevError::class_table(String::from("incomplete row"))),
    }
}

impl ClassTable {
    /// Parse a table with one row per non-blank line
    pub fn parse(name: &str, text: &str) -> DevResult<Self> {
        let mut rows = Vec::new();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let pair = ClassTableParser::parse(Rule::row, line)
                .map_err(|e| DevError::class_syntax_error(name, i + 1, e))?
                .next()
                .ok_or_else(|| DevError::class_table(format!("{} line {}: empty parse", name, i + 1)))?;
            rows.push(parse_row(pair)?);
        }

        Ok(ClassTable { name: name.to_owned(), rows })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[ClassRow] {
        &self.rows
    }

    /// Sort of the classes in this table, `NUMERIC_EXPRESSION_CLASSES` gives `numeric_expression`
    pub fn sort_name(&self) -> String {
        self.name.strip_suffix(TABLE_SUFFIX)
            .unwrap_or(&self.name)
            .to_lowercase()
    }

    /// One line per row with the tag, class name, traversal name and arity
    pub fn name_listing(&self) -> String {
        let width = self.rows.iter().map(|r| r.tag.len()).max().unwrap_or(0);
        self.rows.iter()
            .map(|r| format!("{:width$} {} {} {}\n", r.tag, r.constructor.class_name(), r.constructor.traversal_name(), r.arity(), width = width))
            .collect()
    }

    pub fn check(&self) -> DevResult<()> {
        let mut tags = HashSet::new();
        for row in self.rows.iter() {
            if !tags.insert(row.tag.as_str()) {
                return Err(DevError::class_table(format!("duplicate tag '{}' in {}", row.tag, self.name)));
            }
        }
        Ok(())
    }
}

/// Parameter sorts that are not defined by any of the tables
pub fn unresolved_sorts(tables: &[ClassTable]) -> BTreeSet<String> {
    let defined: HashSet<_> = tables.iter().map(|t| t.sort_name()).collect();

    tables.iter()
        .flat_map(|t| t.rows().iter())
        .flat_map(|r| r.constructor.params.iter())
        .map(|p| p.element_sort())
        .filter(|s| !defined.contains(*s))
        .map(str::to_owned)
        .collect()
}

impl Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}& {}", self.sort, self.name)
    }
}

impl Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(postfix) = &self.base_postfix {
            write!(f, "[{}]", postfix)?;
        }
        let params: Vec<_> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "({})", params.join(", "))
    }
}

impl Display for ClassRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.tag, self.constructor, self.description)
    }
}

impl Display for ClassTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|r| r.tag.len()).max().unwrap_or(0);
        for row in self.rows.iter() {
            writeln!(f, "{:width$} | {} | {}", row.tag, row.constructor, row.description, width = width)?;
        }
        Ok(())
    }
}
