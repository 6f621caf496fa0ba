use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use familygraph::citation::{format_citation_as_json, format_citation_as_text};
use familygraph::config::load_config;
use familygraph::familygraph::FamilyGraph;
use familygraph::network::FamilyNetwork;
use familygraph::registry::FamilyIdRegistry;
use familygraph::types::{FamilyRole, PersonQuery};

/// Family network resolution and citations for a genealogical corpus.
#[derive(Parser)]
#[command(
    name = "familygraph",
    about = "Family network resolution and citations for a genealogical corpus"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration
    Init {
        /// Project path (default: current directory)
        path: Option<String>,
    },
    /// List family identifiers grouped by clan
    Ids {
        /// Only show this clan
        #[arg(short, long)]
        clan: Option<String>,
    },
    /// Resolve a family and its cross-referenced families
    Resolve {
        /// Family identifier, e.g. "KORPI 6"
        family_id: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Load only the nuclear family
        #[arg(long)]
        no_cross_refs: bool,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Generate a citation for a family or one of its members
    Cite {
        /// Family identifier
        family_id: String,
        /// Person to cite
        #[arg(long)]
        person: Option<String>,
        /// Birth date of the person, when several share the name
        #[arg(long, requires = "person")]
        born: Option<String>,
        /// Role of the person in the family: parent or child
        #[arg(long, requires = "person")]
        role: Option<FamilyRole>,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Prefetch the families that follow a family
    Prefetch {
        /// Family identifier to start after
        family_id: String,
        /// Project path
        #[arg(short, long)]
        path: Option<String>,
        /// Number of families to prefetch (default: config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Check whether two names are equivalent
    Names {
        first: String,
        second: String,
        /// Project path, for custom name pairs
        #[arg(short, long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs the tracing subscriber on stderr. `RUST_LOG` wins over the
/// project's configured filter.
fn init_tracing(cli: &Cli) {
    let path = match &cli.command {
        Commands::Resolve { path, .. }
        | Commands::Cite { path, .. }
        | Commands::Prefetch { path, .. }
        | Commands::Names { path, .. } => path.clone(),
        _ => None,
    };
    let configured = load_config(&resolve_path(path))
        .map(|c| c.log_filter)
        .unwrap_or_else(|_| "familygraph=info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> familygraph::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_path = resolve_path(path);
            FamilyGraph::init(&project_path)?;
            println!("Initialized familygraph at {}", project_path.display());
        }
        Commands::Ids { clan } => {
            let registry = FamilyIdRegistry::global();
            let groups = match clan {
                Some(name) => registry.clan(&name).into_iter().collect(),
                None => registry.grouped_by_clan(),
            };
            if groups.is_empty() {
                println!("No families found");
            }
            for group in &groups {
                println!("{} ({})", group.clan, group.suffixes.len());
                println!("  {}", group.suffixes.join(", "));
            }
        }
        Commands::Resolve {
            family_id,
            path,
            no_cross_refs,
            json,
        } => {
            let fg = FamilyGraph::open(&resolve_path(path))?;
            let network = if no_cross_refs {
                fg.preview(&family_id).await?
            } else {
                let network = fg.cache().get_or_resolve(&family_id).await?;
                FamilyNetwork::clone(&network)
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&network)?);
            } else {
                print_network(&network);
            }
        }
        Commands::Cite {
            family_id,
            person,
            born,
            role,
            path,
            json,
        } => {
            let fg = FamilyGraph::open(&resolve_path(path))?;
            let citation = match person {
                Some(name) => {
                    let mut query = PersonQuery::parse(&name);
                    if let Some(born) = born {
                        query = query.born(&born);
                    }
                    if let Some(role) = role {
                        query = query.with_role(role);
                    }
                    fg.person_citation(&family_id, &query).await?
                }
                None => fg.citation(&family_id, None).await?,
            };
            if json {
                println!("{}", format_citation_as_json(&citation));
            } else {
                print!("{}", format_citation_as_text(&citation));
            }
        }
        Commands::Prefetch {
            family_id,
            path,
            count,
        } => {
            let project_path = resolve_path(path);
            let mut config = load_config(&project_path)?;
            if count.is_some() {
                config.prefetch.max_families = count;
            }
            config.prefetch.enabled = true;
            let fg = FamilyGraph::open_with_config(&project_path, config)?;
            fg.cache().start_background_processing(&family_id);
            fg.cache().wait_for_background().await;
            let status = fg.cache_status();
            println!("{}", status.status_message);
            println!(
                "  Cached: {}  Resolved this session: {}",
                status.cached_count, status.session_resolutions
            );
            for id in fg.cache().cached_family_ids() {
                println!("  {}", id);
            }
        }
        Commands::Names {
            first,
            second,
            path,
        } => {
            let matcher = FamilyGraph::load_name_matcher(&resolve_path(path))?;
            let equivalent = matcher.are_names_equivalent(&first, &second);
            println!(
                "'{}' and '{}' are {}",
                first,
                second,
                if equivalent { "equivalent" } else { "not equivalent" }
            );
            println!("  {}: {}", first, matcher.determine_gender(&first).as_str());
            println!("  {}: {}", second, matcher.determine_gender(&second).as_str());
        }
    }
    Ok(())
}

fn print_network(network: &FamilyNetwork) {
    let family = &network.main_family;
    println!("{}", network.family_id());
    for couple in &family.couples {
        println!(
            "  {} & {} ({} children)",
            couple.husband.full_name(),
            couple.wife.full_name(),
            couple.children.len()
        );
    }
    let sections = [
        ("As child", &network.as_child_families),
        ("As parent", &network.as_parent_families),
        ("Spouse as child", &network.spouse_as_child_families),
    ];
    for (label, families) in sections {
        if families.is_empty() {
            continue;
        }
        println!("  {}:", label);
        let mut entries: Vec<_> = families.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (name, linked) in entries {
            println!("    {} -> {}", name, linked.family_id);
        }
    }
    println!("  Linked families: {}", network.total_linked_families());
}

/// Resolves an optional path argument to a `PathBuf`.
///
/// Defaults to the current working directory if no path is provided.
fn resolve_path(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
