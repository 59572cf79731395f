use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use thiserror::Error;

use skiff_lang::ast::unparse::Unparser;
use skiff_lang::context::Interner;
use skiff_lang::error::CompileErrors;
use skiff_lang::parser::lexer;
use skiff_lang::passes::{parse::Parser, resolve};

#[derive(Debug, Error)]
enum RunError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compile(#[from] CompileErrors),

    #[error("{0}")]
    Usage(String),
}

/// Skiff front end: tokenize, parse, and run name analysis over one
/// source file. At least one action flag is required.
#[derive(ClapParser)]
#[command(name = "skiffc")]
#[command(about = "Skiff compiler front end")]
struct Cli {
    /// Source file to compile
    input: PathBuf,

    /// Dump the token stream to FILE ("--" for stdout)
    #[arg(short = 't', long = "tokens", value_name = "FILE")]
    tokens: Option<String>,

    /// Stop after checking that the input parses
    #[arg(short = 'p', long = "parse")]
    parse: bool,

    /// Unparse the program to FILE ("--" for stdout)
    #[arg(short = 'u', long = "unparse", value_name = "FILE")]
    unparse: Option<String>,

    /// Run name analysis and write the type-annotated unparse to FILE
    /// ("--" for stdout)
    #[arg(short = 'n', long = "named-unparse", value_name = "FILE")]
    named_unparse: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        // Diagnostics were already rendered through Ariadne.
        Err(RunError::Compile(_)) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("skiffc: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), RunError> {
    if cli.tokens.is_none() && !cli.parse && cli.unparse.is_none() && cli.named_unparse.is_none() {
        return Err(RunError::Usage(
            "no action requested; pass at least one of -t, -p, -u, -n".into(),
        ));
    }

    let src = fs::read_to_string(&cli.input)?;

    if let Some(out) = &cli.tokens {
        write_output(out, &lexer::dump_tokens(&src))?;
    }

    // Every action past tokenizing starts from the same parse.
    if !cli.parse && cli.unparse.is_none() && cli.named_unparse.is_none() {
        return Ok(());
    }

    let parsed = match Parser::parse(&src, 0) {
        Ok(parsed) => parsed,
        Err(errors) => {
            report(&errors, &src, &Interner::default());
            return Err(errors.into());
        }
    };

    if let Some(out) = &cli.unparse {
        let text = Unparser::new(&parsed.ast, &parsed.interner).unparse();
        write_output(out, &text)?;
    }

    if let Some(out) = &cli.named_unparse {
        let (program, errors) = resolve::analyze(parsed);
        if !errors.is_empty() {
            report(&errors, &src, &program.interner);
            return Err(errors.into());
        }
        let text = Unparser::new(&program.ast, &program.interner)
            .with_resolutions(&program.resolutions)
            .unparse();
        write_output(out, &text)?;
    }

    Ok(())
}

fn report(errors: &CompileErrors, src: &str, interner: &Interner) {
    for report in errors.reports(interner) {
        let _ = report.eprint(ariadne::sources(vec![(0usize, src.to_string())]));
    }
}

fn write_output(target: &str, text: &str) -> Result<(), RunError> {
    if target == "--" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
    } else {
        fs::write(target, text)?;
    }
    Ok(())
}
