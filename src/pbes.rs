use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::{DevError, DevResult};

pub type VarName = Rc<String>;
pub type PropVarName = Rc<String>;

type Scope = HashMap<VarName, Sort>;
type Signatures<'a> = HashMap<&'a PropVarName, Vec<Sort>>;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Sort {
    Bool,
    Nat,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct VarDecl {
    pub name: VarName,
    pub sort: Sort,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum DataExpr {
    Var(VarName),
    Nat(u32),
    Bool(bool),
    Plus(Box<Self>, Box<Self>),
    Less(Box<Self>, Box<Self>),
    Greater(Box<Self>, Box<Self>),
    Equal(Box<Self>, Box<Self>),
}

/// Instance of a propositional variable, e.g. `X1(m, 0)`
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Instance {
    pub name: PropVarName,
    pub args: Vec<DataExpr>,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum PbesExpr {
    True(),
    False(),
    Val(DataExpr),
    PropVar(Instance),
    Not(Box<Self>),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Imp(Box<Self>, Box<Self>),
    Forall(VarDecl, Box<Self>),
    Exists(VarDecl, Box<Self>),
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Fixpoint {
    Mu,
    Nu,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Equation {
    pub fixpoint: Fixpoint,
    pub name: PropVarName,
    pub params: Vec<VarDecl>,
    pub rhs: PbesExpr,
}

/// Parameterised boolean equation system
#[derive(Debug, Clone, PartialEq)]
pub struct Pbes {
    equations: Vec<Equation>,
    init: Instance,
}

impl VarDecl {
    pub fn new(name: &str, sort: Sort) -> Self {
        VarDecl { name: name.to_owned().into(), sort }
    }
}

impl Instance {
    pub fn new(name: PropVarName, args: Vec<DataExpr>) -> Self {
        Instance { name, args }
    }
}

impl DataExpr {
    pub fn var(name: &VarName) -> Self {
        DataExpr::Var(name.clone())
    }

    pub fn is_binary(&self) -> bool {
        use DataExpr::*;
        matches!(self, Plus(..) | Less(..) | Greater(..) | Equal(..))
    }

    fn collect_variables(&self, vars: &mut HashSet<VarName>) {
        use DataExpr::*;
        match self {
            Var(name) => { vars.insert(name.clone()); },
            Nat(_) | Bool(_) => (),
            Plus(l, r) | Less(l, r) | Greater(l, r) | Equal(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            },
        }
    }

    pub fn variables(&self) -> HashSet<VarName> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    /// Sort of the expression, failing on unbound variables or ill-typed operands
    pub fn sort(&self, scope: &HashMap<VarName, Sort>) -> DevResult<Sort> {
        use DataExpr::*;
        let expect_sort = |e: &Self, sort: Sort| -> DevResult<()> {
            let actual = e.sort(scope)?;
            if actual != sort {
                return Err(DevError::malformed(format!("expected {} but '{}' has sort {}", sort, e, actual)));
            }
            Ok(())
        };

        match self {
            Var(name) => scope.get(name)
                .copied()
                .ok_or_else(|| DevError::malformed(format!("free variable '{}'", name))),
            Nat(_) => Ok(Sort::Nat),
            Bool(_) => Ok(Sort::Bool),
            Plus(l, r) => {
                expect_sort(l, Sort::Nat)?;
                expect_sort(r, Sort::Nat)?;
                Ok(Sort::Nat)
            },
            Less(l, r) | Greater(l, r) => {
                expect_sort(l, Sort::Nat)?;
                expect_sort(r, Sort::Nat)?;
                Ok(Sort::Bool)
            },
            Equal(l, r) => {
                expect_sort(r, l.sort(scope)?)?;
                Ok(Sort::Bool)
            },
        }
    }
}

impl PbesExpr {
    pub fn not(e: Self) -> Self {
        PbesExpr::Not(Box::new(e))
    }

    pub fn and(l: Self, r: Self) -> Self {
        PbesExpr::And(Box::new(l), Box::new(r))
    }

    pub fn or(l: Self, r: Self) -> Self {
        PbesExpr::Or(Box::new(l), Box::new(r))
    }

    pub fn imp(l: Self, r: Self) -> Self {
        PbesExpr::Imp(Box::new(l), Box::new(r))
    }

    pub fn forall(v: VarDecl, e: Self) -> Self {
        PbesExpr::Forall(v, Box::new(e))
    }

    pub fn exists(v: VarDecl, e: Self) -> Self {
        PbesExpr::Exists(v, Box::new(e))
    }

    /// Number of nodes in the expression tree
    pub fn size(&self) -> usize {
        use PbesExpr::*;
        match self {
            True() | False() | Val(_) | PropVar(_) => 1,
            Not(e) | Forall(_, e) | Exists(_, e) => 1 + e.size(),
            And(l, r) | Or(l, r) | Imp(l, r) => 1 + l.size() + r.size(),
        }
    }

    pub fn children(&self) -> Vec<&Self> {
        use PbesExpr::*;
        match self {
            True() | False() | Val(_) | PropVar(_) => vec![],
            Not(e) | Forall(_, e) | Exists(_, e) => vec![e.as_ref()],
            And(l, r) | Or(l, r) | Imp(l, r) => vec![l.as_ref(), r.as_ref()],
        }
    }

    /// Subterm at the given position in preorder, where 0 is the expression itself
    pub fn subterm(&self, index: usize) -> Option<&Self> {
        if index == 0 {
            return Some(self);
        }

        let mut index = index - 1;
        for child in self.children() {
            let size = child.size();
            if index < size {
                return child.subterm(index);
            }
            index -= size;
        }
        None
    }

    /// Copy of the expression with the subterm at preorder position `index` replaced
    pub fn replace_at(&self, index: usize, replacement: &Self) -> Self {
        use PbesExpr::*;
        if index == 0 {
            return replacement.clone();
        }

        let index = index - 1;
        match self {
            True() | False() | Val(_) | PropVar(_) => self.clone(),
            Not(e) => Not(Box::new(e.replace_at(index, replacement))),
            Forall(v, e) => Forall(v.clone(), Box::new(e.replace_at(index, replacement))),
            Exists(v, e) => Exists(v.clone(), Box::new(e.replace_at(index, replacement))),
            And(l, r) => {
                let (l, r) = Self::replace_in_pair(l, r, index, replacement);
                And(l, r)
            },
            Or(l, r) => {
                let (l, r) = Self::replace_in_pair(l, r, index, replacement);
                Or(l, r)
            },
            Imp(l, r) => {
                let (l, r) = Self::replace_in_pair(l, r, index, replacement);
                Imp(l, r)
            },
        }
    }

    fn replace_in_pair(l: &Self, r: &Self, index: usize, replacement: &Self) -> (Box<Self>, Box<Self>) {
        let left_size = l.size();
        if index < left_size {
            (Box::new(l.replace_at(index, replacement)), Box::new(r.clone()))
        } else {
            (Box::new(l.clone()), Box::new(r.replace_at(index - left_size, replacement)))
        }
    }

    /// Replace every instance of the propositional variable `name`
    pub fn substitute_propvar(&self, name: &PropVarName, replacement: &Self) -> Self {
        use PbesExpr::*;
        let sub = |e: &Self| Box::new(e.substitute_propvar(name, replacement));
        match self {
            PropVar(inst) if inst.name == *name => replacement.clone(),
            True() | False() | Val(_) | PropVar(_) => self.clone(),
            Not(e) => Not(sub(e)),
            And(l, r) => And(sub(l), sub(r)),
            Or(l, r) => Or(sub(l), sub(r)),
            Imp(l, r) => Imp(sub(l), sub(r)),
            Forall(v, e) => Forall(v.clone(), sub(e)),
            Exists(v, e) => Exists(v.clone(), sub(e)),
        }
    }

    pub fn free_variables(&self) -> HashSet<VarName> {
        use PbesExpr::*;
        match self {
            True() | False() => HashSet::new(),
            Val(d) => d.variables(),
            PropVar(inst) => inst.args.iter()
                .flat_map(|a| a.variables())
                .collect(),
            Not(e) => e.free_variables(),
            And(l, r) | Or(l, r) | Imp(l, r) => l.free_variables()
                .union(&r.free_variables())
                .cloned()
                .collect(),
            Forall(v, e) | Exists(v, e) => {
                let mut vars = e.free_variables();
                vars.remove(&v.name);
                vars
            },
        }
    }

    fn check(&self, scope: &Scope, signatures: &Signatures) -> DevResult<()> {
        use PbesExpr::*;
        match self {
            True() | False() => Ok(()),
            Val(d) => match d.sort(scope)? {
                Sort::Bool => Ok(()),
                sort => Err(DevError::malformed(format!("'{}' has sort {} in boolean context", d, sort))),
            },
            PropVar(inst) => check_instance(inst, scope, signatures),
            Not(e) => e.check(scope, signatures),
            And(l, r) | Or(l, r) | Imp(l, r) => {
                l.check(scope, signatures)?;
                r.check(scope, signatures)
            },
            Forall(v, e) | Exists(v, e) => {
                let mut inner = scope.clone();
                inner.insert(v.name.clone(), v.sort);
                e.check(&inner, signatures)
            },
        }
    }
}

fn check_instance(inst: &Instance, scope: &Scope, signatures: &Signatures) -> DevResult<()> {
    let sorts = signatures.get(&inst.name)
        .ok_or_else(|| DevError::malformed(format!("undeclared propositional variable '{}'", inst.name)))?;

    if sorts.len() != inst.args.len() {
        return Err(DevError::malformed(format!("'{}' expects {} arguments, got {}", inst.name, sorts.len(), inst.args.len())));
    }

    for (arg, expected) in inst.args.iter().zip(sorts) {
        let actual = arg.sort(scope)?;
        if actual != *expected {
            return Err(DevError::malformed(format!("argument '{}' of '{}' has sort {}, expected {}", arg, inst.name, actual, expected)));
        }
    }

    Ok(())
}

impl Equation {
    pub fn new(fixpoint: Fixpoint, name: PropVarName, params: Vec<VarDecl>, rhs: PbesExpr) -> Self {
        Equation { fixpoint, name, params, rhs }
    }

    pub fn signature(&self) -> Vec<Sort> {
        self.params.iter().map(|p| p.sort).collect()
    }
}

impl Pbes {
    pub fn new(equations: Vec<Equation>, init: Instance) -> Self {
        Pbes { equations, init }
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn equations_mut(&mut self) -> &mut Vec<Equation> {
        &mut self.equations
    }

    pub fn init(&self) -> &Instance {
        &self.init
    }

    pub fn size(&self) -> usize {
        self.equations.iter()
            .map(|e| 1 + e.rhs.size())
            .sum()
    }

    /// Check that the system is closed and well-typed
    pub fn check(&self) -> DevResult<()> {
        let mut signatures = HashMap::new();
        for eq in self.equations.iter() {
            if signatures.insert(&eq.name, eq.signature()).is_some() {
                return Err(DevError::malformed(format!("duplicate equation for '{}'", eq.name)));
            }
        }

        for eq in self.equations.iter() {
            let mut scope = HashMap::new();
            for param in eq.params.iter() {
                if scope.insert(param.name.clone(), param.sort).is_some() {
                    return Err(DevError::malformed(format!("duplicate parameter '{}' of '{}'", param.name, eq.name)));
                }
            }
            eq.rhs.check(&scope, &signatures)
                .map_err(|e| DevError::malformed(format!("in equation '{}': {}", eq.name, e)))?;
        }

        check_instance(&self.init, &HashMap::new(), &signatures)
            .map_err(|e| DevError::malformed(format!("in init: {}", e)))
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Nat => write!(f, "Nat"),
        }
    }
}

impl Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.sort)
    }
}

impl Display for DataExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DataExpr::*;
        match self {
            Var(name) => write!(f, "{}", name),
            Nat(n) => write!(f, "{}", n),
            Bool(b) => write!(f, "{}", b),
            Plus(l, r) => write!(f, "({} + {})", l, r),
            Less(l, r) => write!(f, "({} < {})", l, r),
            Greater(l, r) => write!(f, "({} > {})", l, r),
            Equal(l, r) => write!(f, "({} == {})", l, r),
        }
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<_> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

impl Display for PbesExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PbesExpr::*;
        match self {
            True() => write!(f, "true"),
            False() => write!(f, "false"),
            // binary data expressions already carry their own parentheses
            Val(d) if d.is_binary() => write!(f, "val{}", d),
            Val(d) => write!(f, "val({})", d),
            PropVar(inst) => write!(f, "{}", inst),
            Not(e) => write!(f, "!{}", e),
            And(l, r) => write!(f, "({} && {})", l, r),
            Or(l, r) => write!(f, "({} || {})", l, r),
            Imp(l, r) => write!(f, "({} => {})", l, r),
            Forall(v, e) => write!(f, "(forall {}. {})", v, e),
            Exists(v, e) => write!(f, "(exists {}. {})", v, e),
        }
    }
}

impl Display for Fixpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fixpoint::Mu => write!(f, "mu"),
            Fixpoint::Nu => write!(f, "nu"),
        }
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fixpoint, self.name)?;
        if !self.params.is_empty() {
            let params: Vec<_> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, "({})", params.join(", "))?;
        }
        write!(f, " =\n    {};", self.rhs)
    }
}

impl Display for Pbes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pbes")?;
        for eq in self.equations.iter() {
            writeln!(f, "  {}", eq)?;
        }
        write!(f, "\ninit {};", self.init)
    }
}
