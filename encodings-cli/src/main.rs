use std::fs;
use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use encodings::{escape_into, IoSink};

/// Escape newlines in text, writing the result to stdout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Files to escape. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Escape each line on its own and keep one output line per input line.
    #[arg(short, long)]
    lines: bool,
}

fn escape_whole<R: Read, W: Write>(mut input: R, sink: &mut IoSink<W>) -> anyhow::Result<()> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;

    escape_into(sink, &text)?;

    Ok(())
}

fn escape_lines<R: BufRead, W: Write>(mut input: R, sink: &mut IoSink<W>) -> anyhow::Result<()> {
    let mut line = String::new();

    // Terminators are copied back as read, so CRLF and a bare last line survive.
    while input.read_line(&mut line)? != 0 {
        let body = line.strip_suffix('\n').unwrap_or(&line);
        escape_into(sink, body)?;

        if body.len() < line.len() {
            sink.get_mut().write_all(b"\n")?;
        }

        line.clear();
    }

    Ok(())
}

fn run(args: Args) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut sink = IoSink::new(BufWriter::new(stdout.lock()));

    if args.files.is_empty() {
        log::debug!("escaping stdin (lines: {})", args.lines);
        let stdin = io::stdin().lock();

        let result = if args.lines {
            escape_lines(stdin, &mut sink)
        } else {
            escape_whole(stdin, &mut sink)
        };
        result.context("failed to escape stdin")?;
    }

    for path in &args.files {
        log::debug!("escaping {} (lines: {})", path.display(), args.lines);
        let file = fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

        let result = if args.lines {
            escape_lines(io::BufReader::new(file), &mut sink)
        } else {
            escape_whole(file, &mut sink)
        };
        result.with_context(|| format!("failed to escape {}", path.display()))?;
    }

    sink.get_mut().flush().context("failed to flush stdout")?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::debug!("bridge-escape {}", encodings::VERSION);

    run(Args::parse())
}
