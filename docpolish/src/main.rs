use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docpolish_lib::markdown::{available_themes, render_markdown, MarkdownOptions, DEFAULT_THEME};
use docpolish_lib::style::inline::inline_styles;
use docpolish_lib::transform::collapsible::{wrap_long_code_blocks, DEFAULT_MAX_LINES};
use docpolish_lib::transform::mermaid::convert_diagram_blocks;
use docpolish_lib::transform::simplify::consolidate_styles;
use docpolish_lib::transform::toc::{add_table_of_contents, DEFAULT_MAX_DEPTH};
use docpolish_lib::{parse_html, serialize_document};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docpolish")]
#[command(version, about = "Post-process HTML and Markdown documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge all <style> blocks into one consolidated stylesheet.
    Simplify {
        /// Input HTML file.
        input: PathBuf,
        /// Output file name; defaults to <input>_simplify.<ext>.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert stylesheet rules into inline style attributes and drop
    /// class attributes.
    Inline {
        /// Input HTML file.
        input: PathBuf,
        /// Output file name; defaults to <input>_inline.<ext>.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Wrap long code blocks in collapsible containers.
    Collapsible {
        /// Input HTML file.
        input: PathBuf,
        /// Output file name; defaults to <input>_collapsible.<ext>.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum lines before a block collapses.
        #[arg(short, long, default_value_t = DEFAULT_MAX_LINES)]
        lines: usize,
    },
    /// Insert a table of contents built from the document's headings.
    Toc {
        /// Input HTML file.
        input: PathBuf,
        /// Output file name; defaults to <input>_withcontent.<ext>.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Deepest heading level included (2-6).
        #[arg(short, long, default_value_t = DEFAULT_MAX_DEPTH,
              value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..=6))]
        depth: usize,
    },
    /// Convert diagram code blocks into mermaid.js markup.
    Mermaid {
        /// Input HTML file.
        input: PathBuf,
        /// Output file name; defaults to <input>_mermaid.<ext>.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a Markdown file to styled HTML with syntax highlighting.
    Md2html {
        /// Input Markdown file.
        #[arg(required_unless_present = "list_themes")]
        input: Option<PathBuf>,
        /// CSS file to embed into the generated document.
        #[arg(short, long)]
        style: Option<PathBuf>,
        /// Output file name; defaults to <input>.html.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Syntax highlighting theme.
        #[arg(long, default_value = DEFAULT_THEME)]
        theme: String,
        /// List the available highlighting themes and exit.
        #[arg(long)]
        list_themes: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Simplify { input, output } => {
            let document = parse_html(&read_input(&input)?);
            let blocks = consolidate_styles(&document);
            if blocks == 0 {
                println!("No style blocks found.");
                return Ok(());
            }
            let output = output.unwrap_or_else(|| suffixed_path(&input, "_simplify"));
            write_output(&output, &serialize_document(&document))?;
            println!(
                "Merged {} style blocks; saved to {}",
                blocks,
                output.display()
            );
        }
        Command::Inline { input, output } => {
            let document = parse_html(&read_input(&input)?);
            let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
            let outcome = inline_styles(&document, base_dir);
            let output = output.unwrap_or_else(|| suffixed_path(&input, "_inline"));
            write_output(&output, &serialize_document(&document))?;
            println!(
                "Inlined {} rules ({} preserved in a style block); saved to {}",
                outcome.inlined_rules,
                outcome.preserved_rules,
                output.display()
            );
        }
        Command::Collapsible {
            input,
            output,
            lines,
        } => {
            let document = parse_html(&read_input(&input)?);
            let wrapped = wrap_long_code_blocks(&document, lines);
            let output = output.unwrap_or_else(|| suffixed_path(&input, "_collapsible"));
            write_output(&output, &serialize_document(&document))?;
            println!(
                "Wrapped {} code blocks longer than {} lines; saved to {}",
                wrapped,
                lines,
                output.display()
            );
        }
        Command::Toc {
            input,
            output,
            depth,
        } => {
            let document = parse_html(&read_input(&input)?);
            let entries = add_table_of_contents(&document, depth);
            if entries == 0 {
                println!("No headings found to build a table of contents.");
                return Ok(());
            }
            let output = output.unwrap_or_else(|| suffixed_path(&input, "_withcontent"));
            write_output(&output, &serialize_document(&document))?;
            println!(
                "Added a table of contents with {} entries; saved to {}",
                entries,
                output.display()
            );
        }
        Command::Mermaid { input, output } => {
            let document = parse_html(&read_input(&input)?);
            let converted = convert_diagram_blocks(&document);
            if converted == 0 {
                println!("No diagram code blocks found.");
                return Ok(());
            }
            let output = output.unwrap_or_else(|| suffixed_path(&input, "_mermaid"));
            write_output(&output, &serialize_document(&document))?;
            println!(
                "Converted {} diagram blocks; saved to {}",
                converted,
                output.display()
            );
        }
        Command::Md2html {
            input,
            style,
            output,
            theme,
            list_themes,
        } => {
            if list_themes {
                println!("Available highlighting themes:");
                for name in available_themes() {
                    println!("  {}", name);
                }
                return Ok(());
            }
            let Some(input) = input else {
                bail!("an input Markdown file is required");
            };
            let markdown = read_input(&input)?;

            let extra_css = match style {
                Some(path) => match fs::read_to_string(&path) {
                    Ok(css) => Some(css),
                    Err(err) => {
                        warn!("could not read CSS file {}: {}", path.display(), err);
                        None
                    }
                },
                None => None,
            };
            let fallback_title = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Document".to_string());

            let options = MarkdownOptions {
                theme,
                extra_css,
                fallback_title,
            };
            let html = render_markdown(&markdown, &options);
            let output = output.unwrap_or_else(|| input.with_extension("html"));
            write_output(&output, &html)?;
            println!("Converted {} to {}", input.display(), output.display());
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// `doc.html` + `_simplify` -> `doc_simplify.html`.
fn suffixed_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}{}", stem, suffix);
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    input.with_file_name(name)
}
