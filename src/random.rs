use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::pbes::*;

/// Exclusive upper bound for values of quantified variables
const QUANTIFIER_BOUND: u32 = 3;

/// Largest natural number constant that is generated
const MAX_CONSTANT: u32 = 2;

fn propvar_name(n: usize) -> PropVarName {
    format!("X{}", n).into()
}

fn parameter_pool() -> [VarDecl; 3] {
    [
        VarDecl::new("b", Sort::Bool),
        VarDecl::new("m", Sort::Nat),
        VarDecl::new("n", Sort::Nat),
    ]
}

fn quantifier_pool() -> [VarDecl; 2] {
    [
        VarDecl::new("k", Sort::Nat),
        VarDecl::new("l", Sort::Nat),
    ]
}

/// Generator of closed random PBESs with finite data domains
pub struct RandomPbes<'a, R: Rng> {
    rng: &'a mut R,
    signatures: Vec<(PropVarName, Vec<VarDecl>)>,
    quantifier_vars: Vec<VarDecl>,
}

impl<'a, R: Rng> RandomPbes<'a, R> {
    pub fn generate(equation_count: usize, atom_count: usize, propvar_count: usize, use_quantifiers: bool, rng: &'a mut R) -> Pbes {
        let equation_count = equation_count.max(1);
        let quantifier_vars = if use_quantifiers { quantifier_pool().to_vec() } else { Vec::new() };
        let mut generator = RandomPbes { rng, signatures: Vec::new(), quantifier_vars };

        for i in 0..equation_count {
            let params = generator.random_parameters();
            generator.signatures.push((propvar_name(i), params));
        }

        let equations = (0..equation_count)
            .map(|i| generator.equation(i, atom_count, propvar_count))
            .collect();

        let (name, params) = &generator.signatures[0];
        let args = params.iter()
            .map(|p| match p.sort {
                Sort::Bool => DataExpr::Bool(true),
                Sort::Nat => DataExpr::Nat(0),
            })
            .collect();

        Pbes::new(equations, Instance::new(name.clone(), args))
    }

    fn random_parameters(&mut self) -> Vec<VarDecl> {
        let pool = parameter_pool();
        let count = self.rng.gen_range(0..=pool.len());
        let mut chosen = index::sample(&mut *self.rng, pool.len(), count).into_vec();
        chosen.sort();
        chosen.into_iter().map(|i| pool[i].clone()).collect()
    }

    fn equation(&mut self, index: usize, atom_count: usize, propvar_count: usize) -> Equation {
        let (name, params) = self.signatures[index].clone();
        let mut scope = params.clone();
        scope.extend(self.quantifier_vars.iter().cloned());

        let mut terms = Vec::new();
        for _ in 0..atom_count {
            terms.push(self.atom(&scope));
        }
        for _ in 0..propvar_count {
            terms.push(self.instance(&scope));
        }
        if terms.is_empty() {
            terms.push(if self.rng.gen() { PbesExpr::True() } else { PbesExpr::False() });
        }

        while terms.len() > 1 {
            terms.shuffle(&mut *self.rng);
            let left = terms.pop().unwrap_or(PbesExpr::True());
            let right = terms.pop().unwrap_or(PbesExpr::True());
            let mut term = match self.rng.gen_range(0..3) {
                0 => PbesExpr::and(left, right),
                1 => PbesExpr::or(left, right),
                _ => PbesExpr::imp(left, right),
            };
            if self.rng.gen_bool(0.2) {
                term = PbesExpr::not(term);
            }
            if self.rng.gen_bool(0.3) {
                term = self.quantify(term);
            }
            terms.push(term);
        }

        let mut rhs = terms.pop().unwrap_or(PbesExpr::True());
        while self.free_quantifier_var(&rhs).is_some() {
            rhs = self.quantify(rhs);
        }

        let fixpoint = if self.rng.gen() { Fixpoint::Mu } else { Fixpoint::Nu };
        Equation::new(fixpoint, name, params, rhs)
    }

    fn free_quantifier_var(&self, term: &PbesExpr) -> Option<VarDecl> {
        let free = term.free_variables();
        self.quantifier_vars.iter()
            .find(|v| free.contains(&v.name))
            .cloned()
    }

    /// Bind a free quantifier variable of `term` with a bounded quantifier
    fn quantify(&mut self, term: PbesExpr) -> PbesExpr {
        let var = match self.free_quantifier_var(&term) {
            Some(var) => var,
            None => return term,
        };

        let guard = PbesExpr::Val(DataExpr::Less(
            Box::new(DataExpr::var(&var.name)),
            Box::new(DataExpr::Nat(QUANTIFIER_BOUND)),
        ));

        if self.rng.gen() {
            PbesExpr::forall(var, PbesExpr::imp(guard, term))
        } else {
            PbesExpr::exists(var, PbesExpr::and(guard, term))
        }
    }

    fn constant(&mut self, sort: Sort) -> DataExpr {
        match sort {
            Sort::Bool => DataExpr::Bool(self.rng.gen()),
            Sort::Nat => DataExpr::Nat(self.rng.gen_range(0..=MAX_CONSTANT)),
        }
    }

    /// Constant or variable of the given sort
    fn operand(&mut self, sort: Sort, scope: &[VarDecl]) -> DataExpr {
        let candidates: Vec<_> = scope.iter().filter(|v| v.sort == sort).collect();
        if candidates.is_empty() || self.rng.gen_bool(0.3) {
            return self.constant(sort);
        }
        match candidates.choose(&mut *self.rng) {
            Some(v) => DataExpr::var(&v.name),
            None => self.constant(sort),
        }
    }

    fn atom(&mut self, scope: &[VarDecl]) -> PbesExpr {
        let var = match scope.choose(&mut *self.rng) {
            Some(var) => var.clone(),
            None => return if self.rng.gen() { PbesExpr::True() } else { PbesExpr::False() },
        };

        let data = match var.sort {
            Sort::Bool => DataExpr::var(&var.name),
            Sort::Nat => {
                let left = Box::new(DataExpr::var(&var.name));
                let right = Box::new(self.constant(Sort::Nat));
                match self.rng.gen_range(0..3) {
                    0 => DataExpr::Less(left, right),
                    1 => DataExpr::Greater(left, right),
                    _ => DataExpr::Equal(left, right),
                }
            },
        };

        PbesExpr::Val(data)
    }

    fn instance(&mut self, scope: &[VarDecl]) -> PbesExpr {
        let index = self.rng.gen_range(0..self.signatures.len());
        let (name, params) = self.signatures[index].clone();
        let args = params.iter()
            .map(|p| self.operand(p.sort, scope))
            .collect();
        PbesExpr::PropVar(Instance::new(name, args))
    }
}
