use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pbes::*;
use crate::random::RandomPbes;

fn has_quantifier(e: &PbesExpr) -> bool {
    matches!(e, PbesExpr::Forall(..) | PbesExpr::Exists(..))
        || e.children().into_iter().any(has_quantifier)
}

#[test]
fn generated_systems_are_well_formed() {
    for seed in super::SEEDS {
        let pbes = super::random_pbes(seed, true);
        if let Err(e) = pbes.check() {
            panic!("[seed {}] {}\n{}", seed, e, pbes);
        }
        for eq in pbes.equations() {
            // only parameters occur free, quantifier variables are always bound
            let free = eq.rhs.free_variables();
            assert!(free.iter().all(|v| eq.params.iter().any(|p| p.name == *v)), "[seed {}] {}", seed, eq);
            assert!(free.iter().all(|v| v.as_str() != "k" && v.as_str() != "l"), "[seed {}] {}", seed, eq);
        }
    }
}

#[test]
fn same_seed_same_system() {
    assert_eq!(super::random_pbes(42, true), super::random_pbes(42, true));
}

#[test]
fn without_quantifiers() {
    for seed in super::SEEDS {
        let pbes = super::random_pbes(seed, false);
        pbes.check().unwrap();
        assert!(pbes.equations().iter().all(|eq| !has_quantifier(&eq.rhs)), "[seed {}]\n{}", seed, pbes);
    }
}

#[test]
fn quantifiers_are_used() {
    let any_quantifier = super::SEEDS
        .map(|seed| super::random_pbes(seed, true))
        .any(|pbes| pbes.equations().iter().any(|eq| has_quantifier(&eq.rhs)));
    assert!(any_quantifier);
}

#[test]
fn shape() {
    let mut rng = StdRng::seed_from_u64(7);
    let pbes = RandomPbes::generate(4, 3, 1, true, &mut rng);

    let names: Vec<_> = pbes.equations().iter().map(|e| e.name.to_string()).collect();
    assert_eq!(names, vec!["X0", "X1", "X2", "X3"]);
    assert_eq!(*pbes.init().name, "X0");

    // init only passes constants
    assert!(pbes.init().args.iter().all(|a| a.variables().is_empty()));
    assert_eq!(pbes.init().args.len(), pbes.equations()[0].params.len());
}

#[test]
fn degenerate_sizes() {
    let mut rng = StdRng::seed_from_u64(1);
    let pbes = RandomPbes::generate(0, 0, 0, true, &mut rng);
    assert_eq!(pbes.equations().len(), 1);
    assert!(matches!(pbes.equations()[0].rhs, PbesExpr::True() | PbesExpr::False()));
    pbes.check().unwrap();
}
