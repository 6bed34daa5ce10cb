//! Clawome CLI
//!
//! Opens a page in a headless browser, runs the compression pipeline and
//! prints the agent-readable tree. Optionally clicks a node and reports what
//! changed.

use clap::Parser;
use clawome::{LaunchOptions, PageSession, WalkerConfig};

#[derive(Parser)]
#[command(name = "clawome")]
#[command(version)]
#[command(about = "Compress a web page's DOM into an agent-readable tree", long_about = None)]
struct Cli {
    /// URL to open
    url: String,

    /// Render in lite mode (truncate non-interactive text)
    #[arg(long)]
    lite: bool,

    /// Print compression statistics to stderr
    #[arg(long)]
    stats: bool,

    /// After the first extraction, click this node id and print the diff
    #[arg(long, value_name = "ID")]
    click: Option<String>,

    /// Launch browser with a visible window
    #[arg(long, short = 'H')]
    headed: bool,

    /// Enable a bundled site profile (repeatable)
    #[arg(long, value_name = "NAME")]
    profile: Vec<String>,

    /// Maximum walker records
    #[arg(long)]
    max_nodes: Option<usize>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> clawome::Result<()> {
    let mut config = WalkerConfig::default();
    if let Some(max_nodes) = cli.max_nodes {
        config.max_nodes = max_nodes;
    }

    let options = LaunchOptions::new().headless(!cli.headed);
    let mut session = PageSession::launch(options, config)?;
    for name in &cli.profile {
        session.registry_mut().enable(name);
    }

    session.navigate(&cli.url)?;
    let extraction = session.extract()?;

    if cli.lite {
        println!("{}", extraction.render_lite(session.config()));
    } else {
        println!("{}", extraction.tree);
    }
    if cli.stats {
        let s = &extraction.stats;
        eprintln!(
            "{} -> {} chars ({} -> {} tokens, ratio {}), {} -> {} nodes",
            s.raw_html_chars,
            s.tree_chars,
            s.raw_html_tokens,
            s.tree_tokens,
            s.compression_ratio,
            s.nodes_before_filter,
            s.nodes_after_filter,
        );
    }

    if let Some(hid) = cli.click {
        session.click(&hid)?;
        let (extraction, diff) = session.extract_with_diff()?;
        eprintln!("clicked [{}]: {}", hid, diff.summary);
        if cli.lite {
            println!("{}", extraction.render_lite(session.config()));
        } else {
            println!("{}", extraction.tree);
        }
    }

    Ok(())
}
