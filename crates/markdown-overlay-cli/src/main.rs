use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use markdown_overlay_config::{Config, OutputFormat, ParserConfig};
use markdown_overlay_engine::output::OutputTree;
use markdown_overlay_engine::parsing::mdast;
use markdown_overlay_engine::{
    OffsetEncoding, ParseOptions, SourceText, dump, io, parse_markdown, render_overlay, to_html,
    to_view,
};
use std::path::{Path, PathBuf};

mod preview;

#[derive(Parser)]
#[command(name = "markdown-overlay")]
#[command(about = "Build offset-synchronized overlay trees from markdown files")]
struct Cli {
    /// Config file to use instead of ~/.config/markdown-overlay/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the overlay tree of a file
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output format; defaults to the configured one
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
    /// Verify that the overlay reproduces the file exactly
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Browse the overlay lines in the terminal
    Preview {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Markdown file to overlay
    file: PathBuf,

    /// Read the parsed tree from an mdast JSON file instead of parsing FILE
    #[arg(long, value_name = "JSON")]
    mdast: Option<PathBuf>,

    /// Unit of the offsets in the mdast JSON
    #[arg(long, value_enum, default_value_t = Offsets::Utf8)]
    offsets: Offsets,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Json,
    Tree,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Json => OutputFormat::Json,
            Format::Tree => OutputFormat::Tree,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Offsets {
    Utf8,
    Utf16,
    Chars,
}

impl From<Offsets> for OffsetEncoding {
    fn from(offsets: Offsets) -> Self {
        match offsets {
            Offsets::Utf8 => OffsetEncoding::Utf8,
            Offsets::Utf16 => OffsetEncoding::Utf16,
            Offsets::Chars => OffsetEncoding::Chars,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render { input, format } => {
            let (_, tree) = load_overlay(&input, &config.parser)?;
            let format = format.map(OutputFormat::from).unwrap_or(config.render.format);
            let stylesheet = match &config.render.stylesheet {
                Some(path) => Some(
                    io::read_source(path)
                        .with_context(|| format!("reading stylesheet {}", path.display()))?,
                ),
                None => None,
            };
            print!("{}", format_tree(&tree, format, stylesheet.as_deref())?);
        }
        Command::Check { input } => {
            let (source, tree) = load_overlay(&input, &config.parser)?;
            println!("{}: {}", input.file.display(), check_fidelity(&source, &tree)?);
        }
        Command::Preview { input } => {
            let (_, tree) = load_overlay(&input, &config.parser)?;
            preview::run(&input.file, &tree)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    let config = Config::load_from_path(&path)?;
    if config.is_none() {
        log::debug!("no config at {}, using defaults", path.display());
    }
    Ok(config.unwrap_or_default())
}

fn parse_options(parser: &ParserConfig) -> ParseOptions {
    ParseOptions {
        tables: parser.tables,
        footnotes: parser.footnotes,
        strikethrough: parser.strikethrough,
        tasklists: parser.tasklists,
        math: parser.math,
    }
}

/// Reads the input file, obtains its parsed tree and builds the overlay.
fn load_overlay(input: &InputArgs, parser: &ParserConfig) -> Result<(SourceText, OutputTree)> {
    let content = io::read_source(&input.file)
        .with_context(|| format!("reading {}", input.file.display()))?;
    let source = SourceText::new(&content);

    let root = match &input.mdast {
        Some(json_path) => {
            let json = io::read_source(json_path)
                .with_context(|| format!("reading {}", json_path.display()))?;
            mdast::from_json(&json, &source, input.offsets.into())
                .with_context(|| format!("loading mdast from {}", json_path.display()))?
        }
        None => parse_markdown(&content, &parse_options(parser)),
    };
    log::debug!("parsed tree has {} nodes", root.node_count());

    let tree = render_overlay(&root, &source);
    Ok((source, tree))
}

fn format_tree(tree: &OutputTree, format: OutputFormat, stylesheet: Option<&str>) -> Result<String> {
    let output = match format {
        OutputFormat::Html => {
            let body = to_html(tree);
            match stylesheet {
                Some(css) => format!(
                    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{css}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
                ),
                None => format!("{body}\n"),
            }
        }
        OutputFormat::Json => {
            let view = to_view(tree).context("overlay has no root element")?;
            let mut json = serde_json::to_string_pretty(&view)?;
            json.push('\n');
            json
        }
        OutputFormat::Tree => dump(tree),
    };
    Ok(output)
}

/// Compares the overlay's text with the source, returning a summary line.
fn check_fidelity(source: &SourceText, tree: &OutputTree) -> Result<String> {
    let expected = source.to_string();
    let actual = tree.source_text();
    if actual != expected {
        let offset = expected
            .char_indices()
            .zip(actual.chars())
            .find(|((_, a), b)| a != b)
            .map_or(expected.len().min(actual.len()), |((i, _), _)| i);
        let (line, column) = source.line_col(offset);
        bail!(
            "overlay text differs from source at line {}, column {}",
            line + 1,
            column + 1
        );
    }
    Ok(format!(
        "ok, {} blocks, {} lines, {} bytes",
        tree.blocks().len(),
        tree.all_lines().len(),
        source.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_overlay_engine::{NodeFactory, Tag};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn input(dir: &TempDir, markdown: &str) -> InputArgs {
        let file = dir.path().join("doc.md");
        fs::write(&file, markdown).unwrap();
        InputArgs {
            file,
            mdast: None,
            offsets: Offsets::Utf8,
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_arguments() {
        let cli = Cli::try_parse_from([
            "markdown-overlay",
            "render",
            "doc.md",
            "--format",
            "tree",
            "--mdast",
            "doc.json",
            "--offsets",
            "utf16",
        ])
        .unwrap();

        match cli.command {
            Command::Render { input, format } => {
                assert_eq!(input.file, PathBuf::from("doc.md"));
                assert_eq!(input.mdast, Some(PathBuf::from("doc.json")));
                assert_eq!(input.offsets, Offsets::Utf16);
                assert_eq!(format, Some(Format::Tree));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn renders_parsed_file_as_tree() {
        let dir = TempDir::new().unwrap();
        let (_, tree) = load_overlay(&input(&dir, "# Hi"), &ParserConfig::default()).unwrap();

        let out = format_tree(&tree, OutputFormat::Tree, None).unwrap();
        assert_eq!(
            out,
            "div\n  div.md-block [index=0]\n    div.md-heading.md-heading1\n      span.md-delimiter\n        \"# \"\n      span.md-text\n        \"Hi\"\n      <marker>\n"
        );
    }

    #[test]
    fn reads_tree_from_mdast_json() {
        let dir = TempDir::new().unwrap();
        let mut args = input(&dir, "é *x*");
        let json_path = dir.path().join("doc.json");
        fs::write(
            &json_path,
            r#"{"type":"root","range":[0,5],"children":[
                {"type":"paragraph","range":[0,5],"children":[
                    {"type":"emphasis","range":[2,5]}
                ]}
            ]}"#,
        )
        .unwrap();
        args.mdast = Some(json_path);
        args.offsets = Offsets::Chars;

        let (source, tree) = load_overlay(&args, &ParserConfig::default()).unwrap();
        let line = tree.all_lines()[0];
        assert_eq!(tree.line_text(line), "é *x*");
        assert!(check_fidelity(&source, &tree).is_ok());
    }

    #[test]
    fn html_with_stylesheet_is_a_full_document() {
        let dir = TempDir::new().unwrap();
        let (_, tree) = load_overlay(&input(&dir, "text"), &ParserConfig::default()).unwrap();

        let out = format_tree(&tree, OutputFormat::Html, Some(".md-block {}")).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<style>\n.md-block {}\n</style>"));
        assert!(out.contains("<div class=\"md-block\" index=\"0\">"));
    }

    #[test]
    fn json_output_is_pretty() {
        let dir = TempDir::new().unwrap();
        let (_, tree) = load_overlay(&input(&dir, "a"), &ParserConfig::default()).unwrap();

        let out = format_tree(&tree, OutputFormat::Json, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["tag"], "div");
        assert!(out.contains("\n  \"children\""));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let args = InputArgs {
            file: dir.path().join("absent.md"),
            mdast: None,
            offsets: Offsets::Utf8,
        };

        let err = load_overlay(&args, &ParserConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("absent.md"));
    }

    #[test]
    fn check_reports_counts() {
        let dir = TempDir::new().unwrap();
        let (source, tree) =
            load_overlay(&input(&dir, "a\n\nb\n"), &ParserConfig::default()).unwrap();

        assert_eq!(
            check_fidelity(&source, &tree).unwrap(),
            "ok, 4 blocks, 4 lines, 5 bytes"
        );
    }

    #[test]
    fn check_locates_the_first_difference() {
        let source = SourceText::new("ab\ncd");
        let mut tree = OutputTree::new();
        let root = tree.create_element(Tag::Div);
        let block = tree.create_element(Tag::Div);
        for text in ["ab", "cx"] {
            let line = tree.create_element(Tag::Div);
            tree.append_text(line, text);
            tree.append_marker(line);
            tree.append_child(block, line);
        }
        tree.add_class(block, "md-block");
        tree.append_child(root, block);
        tree.set_root(root);

        let err = check_fidelity(&source, &tree).unwrap_err();
        assert_eq!(
            err.to_string(),
            "overlay text differs from source at line 2, column 2"
        );
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("none.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parser_config_maps_onto_parse_options() {
        let parser = ParserConfig {
            math: false,
            ..ParserConfig::default()
        };
        let options = parse_options(&parser);
        assert!(!options.math);
        assert!(options.tables);
    }
}
