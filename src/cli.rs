//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{load_contract, ContractOverrides};
use crate::core::render::{write_raw_warning, OutputFormat, RenderConfig};
use crate::dom::Selector;
use crate::sync::{DanglingAnchorPolicy, EmptySectionsPolicy, ScrollBehavior};

/// navsync - keep a sidebar in step with the page, and lint pages for it.
#[derive(Parser, Debug)]
#[command(name = "navsync")]
#[command(
    author,
    version,
    about,
    long_about = r#"navsync loads HTML pages into a simulated host and runs the sidebar sync
handlers against them: smooth scrolling for in-page anchors, and scroll-driven
highlighting of the nav item whose section is nearest the top of the container.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only (unstable; intended for debugging)

Examples:
    navsync lint
    navsync sections index.html --scroll-top 640
    navsync active index.html --layout layout.json --scroll-top 1200
    navsync click index.html '#contact'
    navsync replay index.html --events script.json
"#
)]
pub struct Cli {
    /// Root directory for all operations.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        env = "NAVSYNC_ROOT",
        long_help = "Root directory for all operations (defaults to the current directory).\n\n\
Page, layout and script paths are resolved against it, paths in results are\n\
relative to it, and ROOT/.navsync.json is read from it."
    )]
    pub root: PathBuf,

    /// Contract config file (default: ROOT/.navsync.json, if present).
    #[arg(long, global = true, value_name = "FILE", env = "NAVSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw"
    )]
    pub format: OutputFormat,

    /// Disable colored output (when applicable).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logs on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(flatten)]
    pub contract: ContractArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the DOM contract; each wins over the config file
#[derive(Args, Debug, Default)]
pub struct ContractArgs {
    /// Selector for in-page anchors [default: a[href^="#"]]
    #[arg(long, global = true, value_name = "SELECTOR", env = "NAVSYNC_ANCHOR")]
    pub anchor: Option<Selector>,

    /// Selector for the scroll container [default: main]
    #[arg(long, global = true, value_name = "SELECTOR", env = "NAVSYNC_CONTAINER")]
    pub container: Option<Selector>,

    /// Selector for content sections [default: .section-container]
    #[arg(long, global = true, value_name = "SELECTOR", env = "NAVSYNC_SECTION")]
    pub section: Option<Selector>,

    /// Selector for nav items [default: .nav-item]
    #[arg(long, global = true, value_name = "SELECTOR", env = "NAVSYNC_NAV_ITEM")]
    pub nav_item: Option<Selector>,

    /// Attribute linking a nav item to a section id [default: data-ref]
    #[arg(long, global = true, value_name = "ATTR", env = "NAVSYNC_REF_ATTR")]
    pub ref_attr: Option<String>,

    /// Class marking the active nav item [default: active]
    #[arg(long, global = true, value_name = "CLASS", env = "NAVSYNC_ACTIVE_CLASS")]
    pub active_class: Option<String>,

    /// Scroll behavior for anchor clicks (smooth/instant) [default: smooth]
    #[arg(long, global = true, value_name = "BEHAVIOR", env = "NAVSYNC_SCROLL_BEHAVIOR")]
    pub scroll_behavior: Option<ScrollBehavior>,

    /// What a click on an anchor without a target does (fail/ignore) [default: fail]
    #[arg(long, global = true, value_name = "POLICY", env = "NAVSYNC_ON_DANGLING")]
    pub on_dangling: Option<DanglingAnchorPolicy>,

    /// What a scroll does when no section exists (fail/ignore) [default: fail]
    #[arg(long, global = true, value_name = "POLICY", env = "NAVSYNC_ON_EMPTY")]
    pub on_empty: Option<EmptySectionsPolicy>,
}

impl From<ContractArgs> for ContractOverrides {
    fn from(args: ContractArgs) -> Self {
        ContractOverrides {
            anchor: args.anchor,
            container: args.container,
            section: args.section,
            nav_item: args.nav_item,
            ref_attr: args.ref_attr,
            active_class: args.active_class,
            scroll_behavior: args.scroll_behavior,
            on_dangling: args.on_dangling,
            on_empty: args.on_empty,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check pages against the DOM contract.
    #[command(long_about = "Check HTML pages against the DOM contract and emit one issue per\n\
problem: dangling anchors, a missing container or sections, sections without\n\
ids, duplicate ids, and nav items out of step with the sections.\n\n\
Exits non-zero when any error-severity issue is found.\n\n\
Examples:\n\
  navsync lint\n\
  navsync lint docs/ index.html --on-dangling ignore\n")]
    Lint {
        /// Pages or directories to lint (default: every *.html/*.htm under ROOT).
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// List sections with their offsets, marking the closest one.
    Sections {
        #[command(flatten)]
        page: PageArgs,

        /// Scroll position of the container before measuring.
        #[arg(long, value_name = "PX", default_value_t = 0.0)]
        scroll_top: f64,
    },

    /// Fire one scroll event and report every nav item's active state.
    Active {
        #[command(flatten)]
        page: PageArgs,

        /// Scroll position of the container before the scroll event.
        #[arg(long, value_name = "PX", default_value_t = 0.0)]
        scroll_top: f64,
    },

    /// Click an in-page anchor and report the scroll and resulting nav state.
    Click {
        #[command(flatten)]
        page: PageArgs,

        /// Href of the anchor to click, e.g. '#contact'.
        #[arg(value_name = "HREF")]
        href: String,
    },

    /// Replay a JSON event script against a page.
    #[command(long_about = "Replay a JSON event script against a page and emit the active section\n\
after every step.\n\n\
Script format:\n\
  [{\"scroll\": 120.0}, {\"click\": \"#contact\"}]\n")]
    Replay {
        #[command(flatten)]
        page: PageArgs,

        /// Event script file.
        #[arg(long, value_name = "FILE")]
        events: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct PageArgs {
    /// HTML page to load.
    #[arg(value_name = "PAGE")]
    pub page: PathBuf,

    /// Layout file with element tops (default: sections stacked 800px apart).
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let render_config = RenderConfig::with_pretty(cli.format, cli.pretty);
    if cli.format == OutputFormat::Raw && !cli.quiet {
        write_raw_warning();
    }

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let config = cli.config.as_deref().map(|p| crate::core::paths::resolve(&root, p));
    let contract = load_contract(&root, config.as_deref(), cli.contract.into())?;
    tracing::debug!(root = %root.display(), ?contract, "resolved contract");

    match cli.command {
        Commands::Lint { paths } => {
            crate::lint::run_lint(&root, &paths, &contract, render_config, cli.quiet)
        }

        Commands::Sections { page, scroll_top } => {
            let result_set = crate::simulate::sections(
                &root,
                &page.page,
                page.layout.as_deref(),
                scroll_top,
                &contract,
            )?;
            crate::simulate::render(&result_set, render_config)
        }

        Commands::Active { page, scroll_top } => {
            let result_set = crate::simulate::active(
                &root,
                &page.page,
                page.layout.as_deref(),
                scroll_top,
                &contract,
            )?;
            crate::simulate::render(&result_set, render_config)
        }

        Commands::Click { page, href } => {
            let result_set = crate::simulate::click(
                &root,
                &page.page,
                page.layout.as_deref(),
                &href,
                &contract,
            )?;
            crate::simulate::render(&result_set, render_config)
        }

        Commands::Replay { page, events } => {
            let steps = read_script(&root, &events)?;
            let result_set = crate::simulate::replay(
                &root,
                &page.page,
                page.layout.as_deref(),
                &steps,
                &contract,
            )?;
            crate::simulate::render(&result_set, render_config)
        }
    }
}

fn read_script(root: &Path, events: &Path) -> Result<Vec<crate::simulate::ScriptStep>> {
    let path = crate::core::paths::resolve(root, events);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read event script: {}", path.display()))?;
    crate::simulate::parse_script(&json)
}
