use atomdump::{DumpOptions, dump_file};
use clap::{ArgAction, CommandFactory, Parser};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Dump the atom tree of a QuickTime or ISO base media file")]
struct Args {
    /// QuickTime / MP4 file path
    path: Option<PathBuf>,

    /// Write the avcC parameter sets, length-prefixed, to this file
    #[arg(long, value_name = "PATH")]
    avcc: Option<PathBuf>,

    /// Print the atom outline as JSON instead of the text dump
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn init_logging(&self) {
        let filter = EnvFilter::builder()
            .with_default_directive(self.level().into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    let Some(path) = args.path.clone() else {
        // a bare invocation asks for help, anything else is missing the file
        if std::env::args_os().len() == 1 {
            Args::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{}", Args::command().render_help());
        eprintln!("error: missing input file");
        return Ok(ExitCode::FAILURE);
    };

    args.init_logging();
    match run(&args, path) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(args: &Args, path: PathBuf) -> anyhow::Result<()> {
    let opts = DumpOptions {
        avcc_path: args.avcc.clone(),
        quicktime_brand: None,
    };
    tracing::debug!(path = %path.display(), "dumping");

    let stdout = io::stdout();
    if args.json {
        let outline = dump_file(&path, io::sink(), &opts)?;
        let mut out = BufWriter::new(stdout.lock());
        serde_json::to_writer_pretty(&mut out, &outline)?;
        writeln!(out)?;
        out.flush()?;
    } else {
        dump_file(&path, BufWriter::new(stdout.lock()), &opts)?;
    }
    Ok(())
}
