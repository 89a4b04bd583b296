//! pagefix - post-process static documentation pages

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

use pagefix::dom::parse_document;
use pagefix::enhance::{TocOutcome, XrefOutcome};
use pagefix::{
    Audit, CrossRefTable, EnhanceOptions, FsSource, Outline, PageConfig, Profile, Summary,
    TableSource, enhance,
};

/// Script whose tag carries the `ROOT` attribute in page templates.
const SITE_SCRIPT: &str = "site.js";

#[derive(Parser)]
#[command(name = "pagefix")]
#[command(version, about = "Post-process static documentation pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    pagefix enhance _site/intro/index.html --in-place
    pagefix enhance _site/index.html --root true -o out.html
    pagefix toc --chapters intro,basics --appendices tools --bib bib > toc.json
    pagefix check _site")]
struct Cli {
    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enhance one page
    Enhance {
        /// Page to enhance
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the result (default: stdout)
        #[arg(short, long, value_name = "OUTPUT", conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite INPUT with the result
        #[arg(long)]
        in_place: bool,

        /// Whether the page is the site root (default: read from the site.js script tag)
        #[arg(long, value_name = "BOOL")]
        root: Option<bool>,

        /// Cross-reference table (default: toc.json next to the site root)
        #[arg(long, value_name = "PATH")]
        toc: Option<PathBuf>,

        /// Transforms to run: full, no-cross-refs or minimal
        #[arg(long, default_value_t = Profile::Full)]
        profile: Profile,
    },

    /// Print the cross-reference table for an ordered outline
    Toc {
        /// Chapter slugs in order
        #[arg(long, value_delimiter = ',')]
        chapters: Vec<String>,

        /// Appendix slugs in order
        #[arg(long, value_delimiter = ',')]
        appendices: Vec<String>,

        /// Slug of the bibliography page
        #[arg(long)]
        bib: Option<String>,
    },

    /// Report undefined and unused references across a site
    Check {
        /// Root directory of the generated site
        #[arg(value_name = "SITE_DIR")]
        site: PathBuf,

        /// Cross-reference table (default: SITE_DIR/toc.json when present)
        #[arg(long, value_name = "PATH")]
        toc: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Command::Enhance {
            input,
            output,
            in_place,
            root,
            toc,
            profile,
        } => {
            let output = if in_place { Some(input.clone()) } else { output };
            run_enhance(&input, output.as_deref(), root, toc.as_deref(), profile, cli.quiet)
                .map(|()| true)
        }
        Command::Toc {
            chapters,
            appendices,
            bib,
        } => run_toc(Outline {
            chapters,
            appendices,
            bibliography: bib,
        })
        .map(|()| true),
        Command::Check { site, toc } => run_check(&site, toc.as_deref(), cli.quiet),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "error" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run_enhance(
    input: &Path,
    output: Option<&Path>,
    root: Option<bool>,
    toc: Option<&Path>,
    profile: Profile,
    quiet: bool,
) -> pagefix::Result<()> {
    let html = fs::read_to_string(input)?;
    let mut dom = parse_document(&html);

    let page = match root {
        Some(root) => PageConfig { root },
        None => PageConfig::from_script_tag(&dom, SITE_SCRIPT).unwrap_or_else(|| {
            tracing::debug!("no {SITE_SCRIPT} script tag, treating page as nested");
            PageConfig::nested()
        }),
    };
    let options = EnhanceOptions::new(page).with_profile(profile);

    let summary = match toc {
        Some(path) => {
            let explicit = |_: &str| -> pagefix::Result<CrossRefTable> {
                CrossRefTable::from_slice(&fs::read(path)?)
            };
            enhance(&mut dom, &options, &explicit)?
        }
        None => enhance(&mut dom, &options, &FsSource::for_page(input))?,
    };

    let rendered = dom.to_html();
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            if !quiet {
                eprintln!("{}: {}", path.display(), describe(&summary));
            }
        }
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn describe(summary: &Summary) -> String {
    let toc = match summary.toc {
        TocOutcome::NoContainer => "no contents".to_string(),
        TocOutcome::Removed => "contents removed".to_string(),
        TocOutcome::Built(n) => format!("{n} headings"),
    };
    let xrefs = match &summary.cross_refs {
        None | Some(XrefOutcome::NoMainContent) => "no cross-references".to_string(),
        Some(XrefOutcome::Resolved(n)) => format!("{n} cross-references"),
        Some(XrefOutcome::TableUnavailable(_)) => "cross-references unresolved".to_string(),
    };
    format!(
        "{toc}, {} tables, {} citations, {} glossary links, {xrefs}",
        summary.tables_styled, summary.citations_rewritten, summary.gloss_links_rewritten
    )
}

fn run_toc(outline: Outline) -> pagefix::Result<()> {
    let table = CrossRefTable::from_outline(&outline)?;
    println!("{}", table.to_json_pretty()?);
    Ok(())
}

fn run_check(site: &Path, toc: Option<&Path>, quiet: bool) -> pagefix::Result<bool> {
    let default_toc = site.join("toc.json");
    let table = match toc {
        Some(path) => Some(CrossRefTable::from_slice(&fs::read(path)?)?),
        None if default_toc.is_file() => Some(FsSource::new(site).load("toc.json")?),
        None => None,
    };

    let mut audit = Audit::new();
    let mut pages = 0;
    for entry in WalkDir::new(site).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let html = fs::read_to_string(path)?;
        let name = path.strip_prefix(site).unwrap_or(path).display().to_string();
        audit.scan(&name, &parse_document(&html))?;
        pages += 1;
    }

    let report = audit.report(table.as_ref());
    print!("{report}");
    if report.is_clean() && !quiet {
        eprintln!("{pages} pages checked, no problems found");
    }
    Ok(!report.has_undefined())
}
