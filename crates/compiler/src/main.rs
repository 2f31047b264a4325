//! idlpy Mapping CLI
//!
//! Command-line interface for inspecting routine mappings and previewing
//! the Python generated for definitions and call sites.

use clap::{Args, CommandFactory, Parser as ClapParser, Subcommand};
use clap_complete::{Shell, generate};
use idlpy::{Mapping, MappingContext, TranslatorConfig, indent};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(ClapParser)]
#[command(name = "idlpyc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "idlpy - map IDL routines to Python definitions and calls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which mappings to load
#[derive(Args)]
struct CatalogArgs {
    /// Mapping catalog file(s) to load after the builtins
    #[arg(long = "catalog", value_name = "PATH")]
    catalogs: Vec<PathBuf>,

    /// Do not register the builtin routines
    #[arg(long)]
    no_builtins: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Python call site for a routine invocation
    Call {
        /// IDL routine name
        routine: String,

        /// Positional argument expressions
        args: Vec<String>,

        /// Keyword argument, possibly abbreviated (NAME=EXPR)
        #[arg(short, long = "key", value_name = "NAME=EXPR", value_parser = parse_pair)]
        keys: Vec<(String, String)>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Print the Python definition preamble for a routine declaration
    Def {
        /// IDL routine name
        routine: String,

        /// Parameter names, one per positional slot
        params: Vec<String>,

        /// Declared keyword and its local name (KEYWORD=LOCAL)
        #[arg(short, long = "key", value_name = "KEYWORD=LOCAL", value_parser = parse_pair)]
        keys: Vec<(String, String)>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// List every registered routine and variable
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Call {
            routine,
            args,
            keys,
            catalog,
        } => run_call(&routine, &args, &keys, &catalog),
        Commands::Def {
            routine,
            params,
            keys,
            catalog,
        } => run_def(&routine, &params, &keys, &catalog),
        Commands::List { catalog } => run_list(&catalog),
        Commands::Completions { shell } => run_completions(shell),
    }
}

fn default_filter() -> tracing_subscriber::EnvFilter {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match "idlpy=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

fn load_context(args: &CatalogArgs) -> MappingContext {
    let mut config = TranslatorConfig::new().with_catalogs(args.catalogs.iter().cloned());
    if args.no_builtins {
        config = config.without_builtins();
    }

    match MappingContext::from_config(&config) {
        Ok(ctx) => {
            info!(
                routines = ctx.routines().len(),
                variables = ctx.variables().len(),
                "mappings loaded"
            );
            ctx
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_call(routine: &str, args: &[String], keys: &[(String, String)], catalog: &CatalogArgs) {
    let mut ctx = load_context(catalog);
    let Some(mapping) = ctx.lookup_routine(routine) else {
        eprintln!("Error: no mapping for subroutine '{}'", routine);
        process::exit(1);
    };

    match ctx.synthesize_call(&mapping, args, keys) {
        Ok(call) => {
            println!("{}", call);
            print_extra_code(&mut ctx);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_def(routine: &str, params: &[String], keys: &[(String, String)], catalog: &CatalogArgs) {
    let mut ctx = load_context(catalog);
    let Some(mapping) = ctx.lookup_routine(routine) else {
        eprintln!("Error: no mapping for subroutine '{}'", routine);
        process::exit(1);
    };

    match ctx.synthesize_definition(&mapping, params, keys) {
        Ok(def) => {
            println!("{}", def.header);
            print!("{}", indent(&def.body, 1));
            print_extra_code(&mut ctx);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run_list(catalog: &CatalogArgs) {
    let ctx = load_context(catalog);

    for routine in ctx.routines().iter() {
        println!("{}", routine);
    }
    for var in ctx.variables().iter() {
        let target = var.override_name().unwrap_or("-");
        let readonly = if var.readonly() { " (read-only)" } else { "" };
        println!("var {} -> {}{}", var.source_name(), target, readonly);
    }
}

fn print_extra_code(ctx: &mut MappingContext) {
    let extra = ctx.drain_extra_code();
    if !extra.is_empty() {
        println!();
        println!("{}", extra);
    }
}

fn run_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "idlpyc", &mut io::stdout());
}
