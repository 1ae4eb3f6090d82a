use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pbes::Pbes;
use crate::random::RandomPbes;

mod difftest;
mod generator;
mod minimize;
#[cfg(unix)]
mod tools;

/// Seeds used for tests on generated PBESs
const SEEDS: std::ops::Range<u64> = 0..200;

const EXAMPLE: &str = "
% hand written system with every operator
pbes
  nu X0(b: Bool, n: Nat) =
    (val(b) && X1(n, 0)) || !X0(false, 1) ;
  mu X1(m: Nat, k: Nat) =
    forall j: Nat. val(j < 3) => (exists i: Nat. val(i == m + j) && X1(i, k))
      || val(m > k) ;
init X0(true, 0);
";

fn random_pbes(seed: u64, use_quantifiers: bool) -> Pbes {
    let mut rng = StdRng::seed_from_u64(seed);
    RandomPbes::generate(2, 2, 2, use_quantifiers, &mut rng)
}
