use clap::crate_authors;
use structopt::StructOpt;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use nfa_gen::{BufReadLines, Builder, Diagnostics, StderrDiagnostics};

fn with_changed_extension(path: &Path, new_extension: &str) -> PathBuf {
    let mut new_path = PathBuf::new();
    if let Some(dir) = path.parent() {
        new_path.push(dir);
    }
    new_path.push(path.file_stem().unwrap_or_else(|| std::ffi::OsStr::new("spec")));
    new_path.set_extension(new_extension);
    new_path
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "nfa_gen",
    about = "Lexical-analyzer generator front end: regex spec to NFA",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Read the grammar specification from this file instead of stdin.
    #[structopt(short, long, parse(from_os_str))]
    file: Option<PathBuf>,
    /// Emit Graphviz instead of the human-readable text form.
    #[structopt(long)]
    dot: bool,
    /// Emit both forms: text to stdout, Graphviz to a `.dot` file
    /// alongside the input (requires `--file`).
    #[structopt(long)]
    both: bool,
}

fn main() {
    let cl_options = CLOptions::from_args();

    let mut builder = Builder::new();
    let mut diagnostics = StderrDiagnostics::default();

    let parse_result = match &cl_options.file {
        Some(path) => {
            let file = File::open(path).unwrap_or_else(|error| {
                eprintln!("{}: {}", path.to_string_lossy(), error);
                std::process::exit(2);
            });
            let mut lines = BufReadLines::new(BufReader::new(file));
            builder.parse(&mut lines, &mut diagnostics)
        }
        None => {
            let stdin = io::stdin();
            let mut lines = BufReadLines::new(stdin.lock());
            builder.parse(&mut lines, &mut diagnostics)
        }
    };

    if let Err(error) = parse_result {
        let location = error.location().unwrap_or_else(nfa_gen::Location::start);
        diagnostics.fatal(location, &error.to_string());
    }

    let handle = match builder.build_nfa() {
        Ok(handle) => handle,
        Err(error) => {
            let location = error.location().unwrap_or_else(nfa_gen::Location::start);
            diagnostics.fatal(location, &error.to_string())
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cl_options.both {
        nfa_gen::emit::emit_text(&mut builder.nfa, handle, &mut out).expect("stdout write failed");
        let dot_path = cl_options
            .file
            .as_deref()
            .map(|path| with_changed_extension(path, "dot"))
            .unwrap_or_else(|| PathBuf::from("nfa.dot"));
        let mut dot_file = File::create(&dot_path).unwrap_or_else(|error| {
            eprintln!("{}: {}", dot_path.to_string_lossy(), error);
            std::process::exit(2);
        });
        nfa_gen::emit::emit_dot(&mut builder.nfa, handle, &mut dot_file)
            .expect("dot file write failed");
    } else if cl_options.dot {
        nfa_gen::emit::emit_dot(&mut builder.nfa, handle, &mut out).expect("stdout write failed");
    } else {
        nfa_gen::emit::emit_text(&mut builder.nfa, handle, &mut out).expect("stdout write failed");
    }
}
