use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use difftest::{DiffTest, DiffTestConfig};
use error::{DevError, DevResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use random::RandomPbes;
use tools::{Mcrl2Tools, Strategy};
use tracing::info;

mod classes;
mod difftest;
mod error;
mod fdr;
mod logger;
mod minimize;
mod parser;
mod pbes;
mod random;
mod tools;
#[cfg(test)]
mod tests;

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print debug output
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[derive(Clone, Debug, PartialEq, clap::Subcommand)]
enum Subcommand {
    /// Print a random PBES
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Seed for the random generator
        #[clap(long)]
        seed: Option<u64>,
    },

    /// Compare pbes2bool answers before and after pbesabsinthe on random PBESs
    Absinthe {
        #[command(flatten)]
        generator: GeneratorArgs,

        #[command(flatten)]
        tools: ToolArgs,

        /// Number of random PBESs to test
        #[clap(short, long, default_value_t = 10)]
        iterations: usize,

        /// Use this strategy throughout instead of alternating over and under
        #[clap(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// Do not minimize a failing PBES
        #[clap(long)]
        no_minimize: bool,

        /// Base name of the files that are written
        #[clap(long, default_value = "pbesabsinthe")]
        name: String,

        /// Seed for the random generator
        #[clap(long)]
        seed: Option<u64>,
    },

    /// Minimize a PBES on which pbesabsinthe changes the solution
    Minimize {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        tools: ToolArgs,

        /// Approximation strategy of pbesabsinthe
        #[clap(short, long, value_enum, default_value_t = Strategy::Over)]
        strategy: Strategy,
    },

    /// Parse, check and echo a PBES
    Parse {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the FDR class tables
    Classes {
        /// Only print this table, by table or sort name
        #[clap(short, long)]
        table: Option<String>,

        /// List parameter sorts that no table defines
        #[clap(short, long)]
        unresolved: bool,

        /// Print tag, class name, traversal name and arity of every row
        #[clap(short, long)]
        names: bool,
    },

    /// Display the syntax tree derived by the parser
    #[clap(hide(true))]
    SyntaxTree {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args, Debug, PartialEq, Clone)]
struct CommonArgs {
    /// File with a textual PBES
    #[clap()]
    file: PathBuf,
}

#[derive(clap::Args, Debug, PartialEq, Clone)]
struct GeneratorArgs {
    /// Number of equations
    #[clap(long, default_value_t = 2)]
    equations: usize,

    /// Number of data atoms per equation
    #[clap(long, default_value_t = 2)]
    atoms: usize,

    /// Number of propositional variable instances per equation
    #[clap(long, default_value_t = 2)]
    propvars: usize,

    /// Generate PBESs without quantifiers
    #[clap(long)]
    no_quantifiers: bool,
}

#[derive(clap::Args, Debug, PartialEq, Clone)]
struct ToolArgs {
    /// Directory for the generated files
    #[clap(short, long, default_value = ".")]
    dir: PathBuf,

    /// Keep the generated files
    #[clap(short, long)]
    keep_files: bool,

    /// Timeout for a single tool invocation in seconds
    #[clap(long)]
    timeout: Option<u64>,

    #[clap(long, default_value = "txt2pbes")]
    txt2pbes: PathBuf,

    #[clap(long, default_value = "pbesabsinthe")]
    pbesabsinthe: PathBuf,

    #[clap(long, default_value = "pbes2bool")]
    pbes2bool: PathBuf,
}

impl ToolArgs {
    fn tools(&self) -> Mcrl2Tools {
        Mcrl2Tools::new(
            self.txt2pbes.clone(),
            self.pbesabsinthe.clone(),
            self.pbes2bool.clone(),
            self.timeout.map(Duration::from_secs),
        )
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("random seed {}", seed);
    StdRng::seed_from_u64(seed)
}

fn read_pbes(file: &Path) -> DevResult<pbes::Pbes> {
    let contents = fs::read_to_string(file).map_err(DevError::file_error)?;
    parser::parse(&contents)
}

fn generate(generator: GeneratorArgs, seed: Option<u64>) -> DevResult<()> {
    let mut rng = seeded_rng(seed);
    let pbes = RandomPbes::generate(generator.equations, generator.atoms, generator.propvars, !generator.no_quantifiers, &mut rng);
    println!("{}", pbes);
    Ok(())
}

fn absinthe(config: DiffTestConfig, tools: ToolArgs, seed: Option<u64>) -> DevResult<()> {
    let mut rng = seeded_rng(seed);
    let mut mcrl2 = tools.tools();
    DiffTest::new(&mut mcrl2, tools.dir.clone(), tools.keep_files).run(&config, &mut rng)?;

    info!("{} iterations passed", config.iterations);
    Ok(())
}

fn minimize(common: CommonArgs, tools: ToolArgs, strategy: Strategy) -> DevResult<()> {
    let pbes = read_pbes(&common.file)?;
    let name = common.file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("pbesabsinthe"));

    let mut mcrl2 = tools.tools();
    let mut difftest = DiffTest::new(&mut mcrl2, tools.dir.clone(), tools.keep_files);

    match difftest.check_and_minimize(pbes, &name, strategy)? {
        Some(minimized) => println!("{}", minimized),
        None => info!("test passes, nothing to minimize"),
    }
    Ok(())
}

fn parse(file: &Path) -> DevResult<()> {
    println!("{}", read_pbes(file)?);
    Ok(())
}

fn classes(table: Option<String>, unresolved: bool, names: bool) -> DevResult<()> {
    let tables = fdr::fdr_tables()?;
    for t in tables.iter() {
        t.check()?;
    }

    if unresolved {
        for sort in classes::unresolved_sorts(&tables) {
            println!("{}", sort);
        }
        return Ok(());
    }

    let selected: Vec<_> = match &table {
        Some(name) => tables.iter()
            .filter(|t| t.name() == name.as_str() || t.sort_name() == *name)
            .collect(),
        None => tables.iter().collect(),
    };
    if selected.is_empty() {
        return Err(DevError::class_table(format!("no table named '{}'", table.unwrap_or_default())));
    }

    for t in selected {
        println!("% {} ({})", t.name(), t.sort_name());
        if names {
            println!("{}", t.name_listing());
        } else {
            println!("{}", t);
        }
    }
    Ok(())
}

fn syntax_tree(file: &Path) -> DevResult<()> {
    let contents = fs::read_to_string(file).map_err(DevError::file_error)?;
    println!("{:#?}", parser::first_pass(&contents)?);
    Ok(())
}

fn main() {
    let args = Args::parse();
    logger::init_logger(args.verbose);

    let result = match args.subcommand {
        Subcommand::Generate { generator, seed } => generate(generator, seed),
        Subcommand::Absinthe { generator, tools, iterations, strategy, no_minimize, name, seed } => {
            let config = DiffTestConfig {
                iterations,
                equation_count: generator.equations,
                atom_count: generator.atoms,
                propvar_count: generator.propvars,
                use_quantifiers: !generator.no_quantifiers,
                strategy,
                minimize: !no_minimize,
                name,
            };
            absinthe(config, tools, seed)
        },
        Subcommand::Minimize { common, tools, strategy } => minimize(common, tools, strategy),
        Subcommand::Parse { common } => parse(&common.file),
        Subcommand::Classes { table, unresolved, names } => classes(table, unresolved, names),
        Subcommand::SyntaxTree { common } => syntax_tree(&common.file),
    };

    error::resolve(result);
}
