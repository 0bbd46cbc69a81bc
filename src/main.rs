use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use karel::bytecode::disasm;
use karel::frontend::token_dumper::TokenDumper;
use karel::{CompileError, Dialect};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    Java,
    Pascal,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Java => Dialect::Java,
            DialectArg::Pascal => Dialect::Pascal,
        }
    }
}

/// Compile Karel programs (.kj, .kp) into stack-machine bytecode.
#[derive(Parser, Debug)]
#[command(name = "karelc", author, version, about)]
struct Cli {
    /// Source file
    input: PathBuf,
    /// Dialect, when the extension does not tell
    #[arg(long, value_enum)]
    dialect: Option<DialectArg>,
    /// Dump the token stream and stop
    #[arg(long)]
    tokens: bool,
    /// Dump the syntax tree and stop
    #[arg(long)]
    cst: bool,
    /// Print a disassembly listing
    #[arg(long)]
    disasm: bool,
    /// Print opcode statistics
    #[arg(long)]
    stats: bool,
    /// Print the program as JSON (the default when nothing else is asked for)
    #[arg(long)]
    json: bool,
    /// Write the postcard-encoded program here
    #[arg(long, short)]
    out: Option<PathBuf>,
    /// Plain token dump without ANSI colors
    #[arg(long)]
    no_color: bool,
    /// Token dump with images instead of Debug kinds
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CompileError>() {
                Some(compile_error) => eprint!("{}", compile_error.report()),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let dialect = dialect_for(cli)?;
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;
    let filename = cli.input.display().to_string();

    if cli.tokens {
        dump_tokens(dialect, &source, cli);
        return Ok(());
    }
    if cli.cst {
        let (view, comments) = dialect.parse(&source, Some(&filename))?;
        print!("{}", view.render());
        for comment in comments {
            println!("comment {:?} @{}:{}", comment.image, comment.line, comment.column);
        }
        return Ok(());
    }

    let program = dialect.compile(&source, Some(&filename))?;

    if cli.disasm {
        print!("{}", disasm::disassemble(&program));
    }
    if cli.stats {
        print!("{}", disasm::stats(&program));
    }
    if let Some(out) = &cli.out {
        let bytes = program.to_bytes().context("failed to encode program")?;
        fs::write(out, bytes).with_context(|| format!("failed to write '{}'", out.display()))?;
    }
    let listed = cli.disasm || cli.stats || cli.out.is_some();
    if cli.json || !listed {
        println!("{}", serde_json::to_string(&program)?);
    }
    Ok(())
}

fn dialect_for(cli: &Cli) -> Result<Dialect> {
    if let Some(arg) = cli.dialect {
        return Ok(arg.into());
    }
    Dialect::from_path(&cli.input).ok_or_else(|| {
        anyhow!(
            "cannot tell the dialect of '{}': expected a .kj or .kp file, or --dialect",
            display_name(&cli.input)
        )
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn dump_tokens(dialect: Dialect, source: &str, cli: &Cli) {
    let lexed = dialect.tokenize(source);

    let mut dumper = TokenDumper::new();
    if cli.no_color {
        dumper = dumper.no_color();
    }
    if cli.pretty {
        dumper = dumper.pretty();
    }
    print!("{}", dumper.dump(&lexed.tokens, &lexed.comments));

    for error in &lexed.errors {
        eprintln!(
            "lexing-error {:?} at {}:{}",
            error.text().unwrap_or_default(),
            error.line().unwrap_or_default(),
            error.column().unwrap_or_default()
        );
    }
}
