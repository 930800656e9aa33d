//! mdv CLI - markdown viewer.
//!
//! Renders markdown from a file or stdin to a sanitized HTML fragment on
//! stdout (or a file). Rendering itself never fails; only I/O can.

mod error;
mod output;

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use mdv_renderer::MarkdownRenderer;
use tracing_subscriber::EnvFilter;

use error::CliError;
use output::Output;

/// mdv - markdown viewer.
#[derive(Parser)]
#[command(name = "mdv", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML.
    Render(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Input markdown file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Output file; writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum nested blockquote depth rendered structurally.
    #[arg(long, default_value_t = 16)]
    max_quote_depth: usize,

    /// Emit target/rel attributes on links for external display surfaces.
    #[arg(long)]
    external_links: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let out = Output::new();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or stay quiet.
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Render(args) => run_render(&args, &out),
    };

    if let Err(err) = result {
        out.error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_render(args: &RenderArgs, out: &Output) -> Result<(), CliError> {
    let markdown = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut renderer = MarkdownRenderer::new().with_max_quote_depth(args.max_quote_depth);
    if args.external_links {
        renderer = renderer.with_external_links();
    }
    let html = renderer.render(&markdown);

    match &args.output {
        Some(path) => {
            fs::write(path, &html)?;
            out.success(&format!("Wrote {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(input: PathBuf, output: PathBuf) -> RenderArgs {
        RenderArgs {
            input: Some(input),
            output: Some(output),
            max_quote_depth: 16,
            external_links: false,
            verbose: false,
        }
    }

    #[test]
    fn test_render_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.html");
        fs::write(&input, "# Title\n\n**bold**").unwrap();

        run_render(&render_args(input, output.clone()), &Output::new()).unwrap();

        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_render_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = render_args(dir.path().join("absent.md"), dir.path().join("out.html"));
        assert!(run_render(&args, &Output::new()).is_err());
    }

    #[test]
    fn test_external_links_flag() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.html");
        fs::write(&input, "[x](https://example.com)").unwrap();

        let mut args = render_args(input, output.clone());
        args.external_links = true;
        run_render(&args, &Output::new()).unwrap();

        let html = fs::read_to_string(output).unwrap();
        assert!(html.contains(r#"target="_blank""#));
    }
}
