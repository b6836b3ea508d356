//! faust-cmaj — Faust → Cmajor source transformer.
//!
//! `serve` speaks the host's JSON-lines protocol on stdin/stdout. The other
//! subcommands run the same pipeline once from the command line.

use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use faust_cmaj::transform::dsp_name;
use faust_cmaj::transport::Session;
use faust_cmaj::ui;
use faust_cmaj::{BridgeConfig, BridgeError, CmajorCompiler, FaustProcess, SourceTransformer};

#[derive(Parser)]
#[command(name = "faust-cmaj", version, about = "Compile Faust DSP files into Cmajor modules")]
struct Cli {
    /// Faust executable (overrides the config file)
    #[arg(long, global = true)]
    faust: Option<PathBuf>,

    /// Config file (default: ~/.faust-cmaj/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Add a Faust include directory (repeatable)
    #[arg(short = 'I', long = "include", global = true)]
    include: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve transform requests over stdin/stdout (default)
    Serve,
    /// Compile one .dsp file and print the Cmajor module
    Compile {
        file: PathBuf,
        /// Extra compiler flags
        #[arg(long = "args", allow_hyphen_values = true)]
        extra_args: Option<String>,
        /// Write the module here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the input declarations for a Faust JSON UI descriptor
    Declarations { file: PathBuf },
    /// Print version information
    Version,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("faust-cmaj: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), BridgeError> {
    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::load().unwrap_or_default(),
    };
    if let Some(faust) = cli.faust {
        config.faust_path = faust;
    }
    config.include_dirs.extend(cli.include);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config),
        Command::Compile {
            file,
            extra_args,
            output,
        } => compile(&config, &file, extra_args, output.as_deref()),
        Command::Declarations { file } => {
            let json = std::fs::read_to_string(&file)?;
            for line in ui::map_descriptor_to_declarations(&json)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Version => {
            let compiler = build_compiler(&config)?;
            println!("faust-cmaj {}", env!("CARGO_PKG_VERSION"));
            println!("faust {}", compiler.version());
            Ok(())
        }
    }
}

fn build_compiler(config: &BridgeConfig) -> Result<CmajorCompiler<FaustProcess>, BridgeError> {
    let backend = FaustProcess::new(&config.faust_path)?;
    Ok(CmajorCompiler::new(backend).with_include_dirs(config.include_dirs.clone()))
}

fn serve(config: &BridgeConfig) -> Result<(), BridgeError> {
    let compiler = build_compiler(config)?;
    info!(faust = %compiler.version(), "running source transformer");
    let transformer = SourceTransformer::new(compiler)
        .with_extra_args(config.extra_args.clone())
        .with_declaration_logging(config.log_declarations);

    let stdin = io::stdin();
    let mut session = Session::new(transformer, BufReader::new(stdin.lock()), io::stdout());
    session.run()?;
    Ok(())
}

fn compile(
    config: &BridgeConfig,
    file: &Path,
    extra_args: Option<String>,
    output: Option<&Path>,
) -> Result<(), BridgeError> {
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(name) = dsp_name(&filename) else {
        return Err(BridgeError::Config(format!(
            "{} is not a .dsp file",
            file.display()
        )));
    };

    let content = std::fs::read_to_string(file)?;
    let mut compiler = build_compiler(config)?;
    let extra_args = extra_args.unwrap_or_else(|| config.extra_args.clone());
    let out = compiler.compile(name, &content, &extra_args)?;

    if config.log_declarations {
        match ui::map_descriptor_to_declarations(&out.json) {
            Ok(lines) => lines.iter().for_each(|line| info!("{line}")),
            Err(e) => tracing::warn!("skipping declarations: {e}"),
        }
    }

    match output {
        Some(path) => std::fs::write(path, &out.cmajor)?,
        None => print!("{}", out.cmajor),
    }
    Ok(())
}
