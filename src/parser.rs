use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use crate::error::{DevError, DevResult};
use crate::pbes::*;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct PbesParser;

fn next_pair<'a>(inner: &mut impl Iterator<Item = Pair<'a, Rule>>, rule: Rule) -> DevResult<Pair<'a, Rule>> {
    inner.next().ok_or(DevError::parsing_rule_not_found(rule))
}

fn parse_name(pair: Pair<Rule>) -> DevResult<PropVarName> {
    if pair.as_rule() != Rule::identifier {
        return Err(DevError::parsing_unexpected_rule(pair.as_rule()));
    }
    Ok(pair.as_span().as_str().to_owned().into())
}

fn parse_sort(pair: Pair<Rule>) -> DevResult<Sort> {
    match next_pair(&mut pair.into_inner(), Rule::sort)?.as_rule() {
        Rule::bool_sort => Ok(Sort::Bool),
        Rule::nat_sort => Ok(Sort::Nat),
        rule => Err(DevError::parsing_unexpected_rule(rule)),
    }
}

fn parse_var_decl(pair: Pair<Rule>) -> DevResult<VarDecl> {
    if pair.as_rule() != Rule::var_decl {
        return Err(DevError::parsing_unexpected_rule(pair.as_rule()));
    }

    let mut inner = pair.into_inner();
    let name = parse_name(next_pair(&mut inner, Rule::identifier)?)?;
    let sort = parse_sort(next_pair(&mut inner, Rule::sort)?)?;
    Ok(VarDecl { name, sort })
}

fn parse_data(pair: Pair<Rule>) -> DevResult<DataExpr> {
    match pair.as_rule() {
        Rule::number => pair.as_span().as_str()
            .parse()
            .map(DataExpr::Nat)
            .map_err(|_| DevError::parsing_unexpected_rule(Rule::number)),
        Rule::true_lit => Ok(DataExpr::Bool(true)),
        Rule::false_lit => Ok(DataExpr::Bool(false)),
        Rule::identifier => Ok(DataExpr::Var(parse_name(pair)?)),
        Rule::data_sum => {
            let mut inner = pair.into_inner();
            let mut sum = parse_data(next_pair(&mut inner, Rule::data_sum)?)?;
            for operand in inner {
                sum = DataExpr::Plus(Box::new(sum), Box::new(parse_data(operand)?));
            }
            Ok(sum)
        },
        Rule::data_expr => {
            let mut inner = pair.into_inner();
            let left = parse_data(next_pair(&mut inner, Rule::data_sum)?)?;
            let op = match inner.next() {
                Some(op) => op,
                None => return Ok(left),
            };
            let right = Box::new(parse_data(next_pair(&mut inner, Rule::data_sum)?)?);
            let left = Box::new(left);

            match next_pair(&mut op.into_inner(), Rule::compare_op)?.as_rule() {
                Rule::equal => Ok(DataExpr::Equal(left, right)),
                Rule::less => Ok(DataExpr::Less(left, right)),
                Rule::greater => Ok(DataExpr::Greater(left, right)),
                rule => Err(DevError::parsing_unexpected_rule(rule)),
            }
        },
        rule => Err(DevError::parsing_unexpected_rule(rule)),
    }
}

fn parse_instance(pair: Pair<Rule>) -> DevResult<Instance> {
    if pair.as_rule() != Rule::instance {
        return Err(DevError::parsing_unexpected_rule(pair.as_rule()));
    }

    let mut inner = pair.into_inner();
    let name = parse_name(next_pair(&mut inner, Rule::identifier)?)?;
    let args = inner.map(parse_data).collect::<DevResult<_>>()?;
    Ok(Instance::new(name, args))
}

/// Fold the operands of a left associative operator
fn parse_chain(pair: Pair<Rule>, op: fn(PbesExpr, PbesExpr) -> PbesExpr) -> DevResult<PbesExpr> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();
    let mut expr = parse_expr(next_pair(&mut inner, rule)?)?;
    for operand in inner {
        expr = op(expr, parse_expr(operand)?);
    }
    Ok(expr)
}

fn parse_expr(pair: Pair<Rule>) -> DevResult<PbesExpr> {
    match pair.as_rule() {
        Rule::expr => parse_expr(next_pair(&mut pair.into_inner(), Rule::implication)?),
        Rule::implication => {
            let mut inner = pair.into_inner();
            let premise = parse_expr(next_pair(&mut inner, Rule::disjunction)?)?;
            match inner.next() {
                Some(conclusion) => Ok(PbesExpr::imp(premise, parse_expr(conclusion)?)),
                None => Ok(premise),
            }
        },
        Rule::disjunction => parse_chain(pair, PbesExpr::or),
        Rule::conjunction => parse_chain(pair, PbesExpr::and),
        Rule::negation => {
            let operand = next_pair(&mut pair.into_inner(), Rule::negation)?;
            Ok(PbesExpr::not(parse_expr(operand)?))
        },
        Rule::quantifier => {
            let mut inner = pair.into_inner();
            let kind = next_pair(&mut inner, Rule::quantifier)?.as_rule();
            let var = parse_var_decl(next_pair(&mut inner, Rule::var_decl)?)?;
            let body = parse_expr(next_pair(&mut inner, Rule::expr)?)?;
            match kind {
                Rule::forall => Ok(PbesExpr::forall(var, body)),
                Rule::exists => Ok(PbesExpr::exists(var, body)),
                rule => Err(DevError::parsing_unexpected_rule(rule)),
            }
        },
        Rule::true_lit => Ok(PbesExpr::True()),
        Rule::false_lit => Ok(PbesExpr::False()),
        Rule::val => Ok(PbesExpr::Val(parse_data(next_pair(&mut pair.into_inner(), Rule::data_expr)?)?)),
        Rule::instance => Ok(PbesExpr::PropVar(parse_instance(pair)?)),
        rule => Err(DevError::parsing_unexpected_rule(rule)),
    }
}

fn parse_equation(pair: Pair<Rule>) -> DevResult<Equation> {
    if pair.as_rule() != Rule::equation {
        return Err(DevError::parsing_unexpected_rule(pair.as_rule()));
    }

    let mut inner = pair.into_inner();
    let fixpoint = match next_pair(&mut next_pair(&mut inner, Rule::fixpoint)?.into_inner(), Rule::fixpoint)?.as_rule() {
        Rule::mu => Fixpoint::Mu,
        Rule::nu => Fixpoint::Nu,
        rule => return Err(DevError::parsing_unexpected_rule(rule)),
    };
    let name = parse_name(next_pair(&mut inner, Rule::identifier)?)?;

    let mut params = Vec::new();
    let mut rhs = None;
    for pair in inner {
        match pair.as_rule() {
            Rule::var_decl => params.push(parse_var_decl(pair)?),
            Rule::expr => rhs = Some(parse_expr(pair)?),
            rule => return Err(DevError::parsing_unexpected_rule(rule)),
        }
    }

    let rhs = rhs.ok_or(DevError::parsing_rule_not_found(Rule::expr))?;
    Ok(Equation::new(fixpoint, name, params, rhs))
}

fn parse_system(pair: Pair<Rule>) -> DevResult<Pbes> {
    if pair.as_rule() != Rule::system {
        return Err(DevError::parsing_unexpected_rule(pair.as_rule()));
    }

    let mut equations = Vec::new();
    let mut init = None;

    for pair in pair.into_inner() {
        match pair.as_rule() {
            Rule::equation => equations.push(parse_equation(pair)?),
            Rule::init => init = Some(parse_instance(next_pair(&mut pair.into_inner(), Rule::instance)?)?),
            Rule::EOI => (),
            rule => return Err(DevError::parsing_unexpected_rule(rule)),
        }
    }

    let init = init.ok_or(DevError::parsing_rule_not_found(Rule::init))?;
    Ok(Pbes::new(equations, init))
}

pub fn first_pass(input: &str) -> DevResult<Pair<'_, Rule>> {
    PbesParser::parse(Rule::system, input)
        .map_err(DevError::syntax_error)?
        .next()
        .ok_or(DevError::parsing_rule_not_found(Rule::system))
}

pub fn parse(input: &str) -> DevResult<Pbes> {
    let first_pass = first_pass(input)?;
    let second_pass = parse_system(first_pass)?;
    second_pass.check()?;
    Ok(second_pass)
}
