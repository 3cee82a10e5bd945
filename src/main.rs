//! `amalgo` command-line entry point.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use amalgo::config::DEFAULT_DENY_DIRS;
use amalgo::render::{load_files, Registry, RenderOptions};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "amalgo",
    version,
    about = "Concatenate files by extension into a single output file.",
    long_about = "Recursively scans a directory for files with the given extension(s) \
                  and produces one amalgamated document. Supports .gitignore patterns \
                  for flexible filtering. Handy for passing a small project as context \
                  to an LLM or a reviewer."
)]
struct Cli {
    /// Root directory to scan.
    #[arg(short = 'd', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// File extension(s) to include, e.g. `.rs,.py` or repeat `-e`.
    #[arg(short = 'e', long = "ext", required = true)]
    ext: Vec<String>,

    /// Output file path. `-` writes to stdout. Defaults to `concat.<format ext>`.
    #[arg(short = 'o', long = "out")]
    out: Option<String>,

    /// Top-level directory names to ignore.
    #[arg(
        short = 'i',
        long = "ignore-dirs",
        value_delimiter = ',',
        default_values_t = DEFAULT_DENY_DIRS.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    )]
    ignore_dirs: Vec<String>,

    /// Markdown heading level (1-6).
    #[arg(short = 'l', long = "heading-level", default_value_t = 1)]
    heading_level: usize,

    /// Include hidden files and directories.
    #[arg(long = "include-hidden")]
    include_hidden: bool,

    /// Output format.
    #[arg(short = 'f', long = "format", default_value = "markdown")]
    format: String,

    /// Path to a .gitignore file (default: auto-detect in the scan root).
    #[arg(short = 'g', long = "gitignore")]
    gitignore: Option<PathBuf>,

    /// Automatically use .gitignore in the scan root if present.
    #[arg(
        long = "use-gitignore",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    use_gitignore: bool,

    /// Extra gitignore-style patterns to exclude, e.g. `*.log,tmp/` or repeat `-p`.
    #[arg(short = 'p', long = "ignore-pattern", value_delimiter = ',')]
    ignore_pattern: Vec<String>,
}

fn main() -> ExitCode {
    // Logs go to stderr so `-o -` output stays clean (respects RUST_LOG).
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = Registry::with_defaults();
    let renderer = registry.get(&cli.format)?;

    let base_dir = cli.dir.clone();

    let mut builder = amalgo::scan(&base_dir)
        .extensions(cli.ext)
        .deny_dirs(cli.ignore_dirs)
        .include_hidden(cli.include_hidden)
        .use_root_gitignore(cli.use_gitignore)
        .ignore_patterns(cli.ignore_pattern);
    if let Some(path) = cli.gitignore {
        builder = builder.gitignore(path);
    }

    let result = builder.run().context("scanning files")?;

    if result.is_empty() {
        info!("No files found matching criteria");
        return Ok(());
    }

    let docs = load_files(&result.paths, &base_dir);
    let opts = RenderOptions {
        heading_level: cli.heading_level,
    };
    let content = renderer
        .render(&docs, &opts)
        .context("processing files")?;

    let out = cli
        .out
        .unwrap_or_else(|| format!("concat{}", renderer.file_extension()));

    write_output(&content, &out, result.len())
}

fn write_output(content: &[u8], out: &str, file_count: usize) -> Result<()> {
    if out == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content).context("write output")?;
        return stdout.flush().context("write output");
    }

    fs::write(Path::new(out), content).context("write output")?;
    info!("Wrote {file_count} file(s) to {out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["amalgo", "-e", ".go"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.ignore_dirs, vec![".git", "node_modules", "vendor"]);
        assert_eq!(cli.heading_level, 1);
        assert_eq!(cli.format, "markdown");
        assert!(cli.use_gitignore);
        assert!(!cli.include_hidden);
        assert!(cli.out.is_none());
    }

    #[test]
    fn ext_is_required() {
        assert!(Cli::try_parse_from(["amalgo"]).is_err());
    }

    #[test]
    fn repeated_and_comma_flags() {
        let cli = Cli::try_parse_from([
            "amalgo", "-e", ".go,.rs", "-e", "py", "-i", "target,dist", "-p", "*.log", "-p", "tmp/",
            "--use-gitignore=false",
        ])
        .unwrap();
        assert_eq!(cli.ext, vec![".go,.rs", "py"]);
        assert_eq!(cli.ignore_dirs, vec!["target", "dist"]);
        assert_eq!(cli.ignore_pattern, vec!["*.log", "tmp/"]);
        assert!(!cli.use_gitignore);
    }

    #[test]
    fn comma_joined_ignore_patterns_are_split() {
        let cli = Cli::try_parse_from(["amalgo", "-e", ".go", "-p", "*.log,*.tmp"]).unwrap();
        assert_eq!(cli.ignore_pattern, vec!["*.log", "*.tmp"]);
    }

    #[test]
    fn run_writes_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("proj");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("main.go"), "package main\n").unwrap();
        fs::write(root.join("README.md"), "# hi\n").unwrap();
        let out = tmp.path().join("out.md");

        let args: Vec<OsString> = vec![
            "amalgo".into(),
            "-d".into(),
            root.clone().into_os_string(),
            "-e".into(),
            "go".into(),
            "-o".into(),
            out.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(cli).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(written, "# main.go\n```go\npackage main\n```\n\n");
    }

    #[test]
    fn unknown_format_fails_before_scanning() {
        let cli = Cli::try_parse_from(["amalgo", "-e", ".go", "-f", "pdf", "-d", "/definitely/not/here"])
            .unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("available formats: markdown"));
    }
}
