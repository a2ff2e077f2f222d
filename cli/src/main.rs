//! Labscape CLI — builds the thematic neighbor graph for a set of lab records
//!
//! Reads a JSON array of lab records, indexes them once and prints the graph
//! (or one lab's neighbors) for the selected subset.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use labscape::{
    build_view_with, facets, parse_keywords, parse_records, records_to_entities,
    CommunityDetector, ComponentDetector, EntityId, GraphConfig, LabFilter, LabRecord,
    LouvainDetector, ThemeView, VectorSpace,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "labscape", version, about = "Thematic similarity graph for research labs")]
struct Cli {
    /// JSON file holding an array of lab records
    #[arg(long, short, global = true, env = "LABSCAPE_INPUT")]
    input: Option<PathBuf>,

    /// YAML view configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, clap::ValueEnum)]
enum Detector {
    Louvain,
    Components,
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Minimum cosine similarity (overrides config)
    #[arg(long)]
    threshold: Option<f64>,

    /// Neighbors kept per node (overrides config)
    #[arg(long)]
    top_k: Option<usize>,

    /// Disable clustering
    #[arg(long)]
    no_cluster: bool,

    /// Community detector
    #[arg(long, default_value = "louvain")]
    detector: Detector,

    /// Restrict the view to these ids (comma separated); default is every lab
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Free-text search over code, name and themes
    #[arg(long, short)]
    query: Option<String>,

    /// Keywords that must all appear (comma separated)
    #[arg(long)]
    kw: Option<String>,

    /// ERC panel (repeatable; any of)
    #[arg(long)]
    erc: Vec<String>,

    /// HCERES domain (repeatable; any of)
    #[arg(long)]
    hceres: Vec<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> LabFilter {
        LabFilter {
            query: self.query.clone().unwrap_or_default(),
            keywords: self.kw.as_deref().map(parse_keywords).unwrap_or_default(),
            erc: self.erc.clone(),
            hceres: self.hceres.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the neighbor graph
    Graph {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print the neighbors of one lab
    Neighbors {
        /// Lab id
        id: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Print corpus statistics
    Stats,
    /// List the ERC and HCERES values usable as filters
    Facets,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let records = load_records(cli)?;

    match &cli.command {
        Commands::Graph { view } => {
            let space = build_space(&records);
            let result = compute_view(cli, &records, &space, view)?;
            print_graph(&result, &cli.format)
        }
        Commands::Neighbors { id, view } => {
            let space = build_space(&records);
            if !space.contains(id) {
                bail!("unknown lab id {id}");
            }
            let result = compute_view(cli, &records, &space, view)?;
            print_neighbors(&result, id, &cli.format)
        }
        Commands::Stats => print_stats(&build_space(&records), &cli.format),
        Commands::Facets => print_facets(&records, &cli.format),
    }
}

fn build_space(records: &[LabRecord]) -> VectorSpace {
    VectorSpace::build(&records_to_entities(records))
}

fn load_records(cli: &Cli) -> anyhow::Result<Vec<LabRecord>> {
    let Some(path) = &cli.input else {
        bail!("no input file (use --input or LABSCAPE_INPUT)");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let records = parse_records(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!("Loaded {} lab records from {}", records.len(), path.display());

    Ok(records)
}

fn view_config(cli: &Cli, args: &ViewArgs) -> anyhow::Result<GraphConfig> {
    let mut config = match &cli.config {
        Some(path) => GraphConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GraphConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }
    if args.no_cluster {
        config.clustering = false;
    }
    Ok(config.clamped())
}

fn compute_view(
    cli: &Cli,
    records: &[LabRecord],
    space: &VectorSpace,
    args: &ViewArgs,
) -> anyhow::Result<ThemeView> {
    let config = view_config(cli, args)?;
    let louvain = LouvainDetector::new(config.louvain.to_algo_config());
    let detector: &dyn CommunityDetector = match args.detector {
        Detector::Louvain => &louvain,
        Detector::Components => &ComponentDetector,
    };

    let mut active: Vec<EntityId> = args.filter.to_filter().apply(records);
    if !args.ids.is_empty() {
        let wanted: Vec<&str> = args.ids.iter().map(|id| id.trim()).collect();
        active.retain(|id| wanted.contains(&id.as_str()));
    }

    Ok(build_view_with(space, &active, &config, detector))
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn print_graph(view: &ThemeView, format: &OutputFormat) -> anyhow::Result<()> {
    let cluster_of = |id: &EntityId| {
        view.clusters
            .as_ref()
            .and_then(|c| c.get(id.as_str()))
            .map(|l| l.to_string())
            .unwrap_or_default()
    };

    match format {
        OutputFormat::Json => {
            println!("{}", view.to_json()?);
        }
        OutputFormat::Csv => {
            println!("source,target,weight,top_terms,source_cluster,target_cluster");
            for e in view.graph.edges() {
                println!(
                    "{},{},{:.4},{},{},{}",
                    csv_field(e.source().as_str()),
                    csv_field(e.target().as_str()),
                    e.weight,
                    csv_field(&e.top_terms.join(" ")),
                    cluster_of(e.source()),
                    cluster_of(e.target())
                );
            }
        }
        OutputFormat::Table => {
            if view.graph.edge_count() == 0 {
                println!("(no edges)");
            } else {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["Source", "Target", "Similarity", "Shared terms"]);
                for e in view.graph.edges() {
                    table.add_row(vec![
                        e.source().to_string(),
                        e.target().to_string(),
                        format!("{:.3}", e.weight),
                        e.top_terms.join(" • "),
                    ]);
                }
                println!("{}", table);
            }

            let clusters = view.clusters.as_ref().map_or(0, |c| c.cluster_count());
            println!(
                "{} node(s), {} edge(s), {} cluster(s)",
                view.graph.node_count(),
                view.graph.edge_count(),
                clusters
            );
        }
    }

    Ok(())
}

fn print_neighbors(view: &ThemeView, id: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let neighbors = view.graph.neighbors_of(id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&neighbors)?);
        }
        OutputFormat::Csv => {
            println!("id,weight,top_terms");
            for n in &neighbors {
                println!(
                    "{},{:.4},{}",
                    csv_field(n.id.as_str()),
                    n.weight,
                    csv_field(&n.top_terms.join(" "))
                );
            }
        }
        OutputFormat::Table => {
            if neighbors.is_empty() {
                println!("(no neighbors at the current threshold)");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Neighbor", "Similarity", "Shared terms"]);
            for n in &neighbors {
                table.add_row(vec![
                    n.id.to_string(),
                    format!("{:.3}", n.weight),
                    n.top_terms.join(" • "),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

fn print_facets(records: &[LabRecord], format: &OutputFormat) -> anyhow::Result<()> {
    let facets = facets(records);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&facets)?);
        }
        OutputFormat::Csv => {
            println!("facet,value");
            for value in &facets.erc {
                println!("erc,{}", csv_field(value));
            }
            for value in &facets.hceres {
                println!("hceres,{}", csv_field(value));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Facet", "Value"]);
            for value in &facets.erc {
                table.add_row(vec!["ERC", value.as_str()]);
            }
            for value in &facets.hceres {
                table.add_row(vec!["HCERES", value.as_str()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

fn print_stats(space: &VectorSpace, format: &OutputFormat) -> anyhow::Result<()> {
    let zero_vectors = space
        .entity_ids()
        .filter(|id| space.vector(id.as_str()).is_some_and(|v| v.is_zero()))
        .count();

    match format {
        OutputFormat::Json => {
            let stats = serde_json::json!({
                "entities": space.len(),
                "terms": space.vocabulary_size(),
                "emptyEntities": zero_vectors,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            println!("Entities:       {}", space.len());
            println!("Terms:          {}", space.vocabulary_size());
            println!("Empty entities: {}", zero_vectors);
        }
    }

    Ok(())
}
