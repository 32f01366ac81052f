use canvas_store::graph::GraphStore;
use canvas_store::prelude::*;
use clap::{Parser, Subcommand};
use std::str::FromStr;

/// Inspect and maintain a persisted canvas store
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the persisted state
    #[arg(short, long, default_value = "data")]
    dir: String,

    /// Optional path to a store configuration JSON file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize persisted boards and assets
    Inspect,
    /// Report edges whose endpoints are missing, per board
    Validate,
    /// List the built-in node kinds
    Catalog {
        /// Only show kinds of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Create an empty board
    NewBoard { name: String, category: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => StoreConfig::default(),
    };

    match cli.command {
        Command::Inspect => inspect(open_store(&cli.dir, config)),
        Command::Validate => validate(open_store(&cli.dir, config)),
        Command::Catalog { category } => list_catalog(category.as_deref()),
        Command::NewBoard { name, category } => {
            let category = parse_category(&category);
            let mut store = open_store(&cli.dir, config);
            if store.is_write_through_suspended() {
                exit_with_error("Refusing to write over unreadable persisted state");
            }
            let board = store.create_board(&name, category);
            if let Err(e) = store.flush() {
                exit_with_error(&format!("Board created but not saved: {}", e));
            }
            println!("Created board '{}' ({}) in {}", board.name, board.id, board.category);
        }
    }
}

fn open_store(dir: &str, config: StoreConfig) -> CanvasStore {
    let store = CanvasStore::open(config, Box::new(FileStorage::new(dir)));
    if let Some(e) = store.last_persistence_error() {
        eprintln!("Warning: persisted state was unreadable and has been ignored: {}", e);
    }
    store
}

fn inspect(store: CanvasStore) {
    println!("--- Canvas Store ---");
    println!("Active category: {}", store.active_category());

    println!("\nBoards ({}):", store.boards().len());
    for board in store.boards() {
        println!(
            "  - {} [{}] {} nodes, {} edges, updated {}",
            board.name,
            board.category,
            board.nodes.len(),
            board.edges.len(),
            board.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    let assets = store.assets();
    println!("\nAssets ({}):", assets.len());
    for asset in assets.assets() {
        let tags = if asset.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", asset.tags.join(" #"))
        };
        println!("  - {} ({:?}){}", display_name(asset), asset.kind(), tags);
    }
}

fn validate(store: CanvasStore) {
    let mut failures = 0;
    for board in store.boards() {
        let mut graph = GraphStore::new();
        graph.set_nodes(board.nodes.clone());
        graph.set_edges(board.edges.clone());
        let dangling = graph.validate();
        if dangling.is_empty() {
            println!("OK    {}", board.name);
        } else {
            failures += 1;
            println!("FAIL  {}", board.name);
            for d in dangling {
                println!("        edge {}", d);
            }
        }
    }
    if failures > 0 {
        exit_with_error(&format!("{} board(s) contain dangling edges", failures));
    }
}

fn list_catalog(category: Option<&str>) {
    let catalog = NodeCatalog::default();
    let kinds = match category {
        Some(c) => catalog.in_category(parse_category(c)),
        None => catalog.kinds(),
    };
    for kind in kinds {
        let agent = kind
            .agent
            .as_ref()
            .map_or("-".to_string(), |a| a.endpoint.clone());
        println!(
            "{:<14} {:<18} {:<10} in:{} out:{} agent:{}",
            kind.type_name,
            kind.label,
            kind.category,
            kind.inputs.len(),
            kind.outputs.len(),
            agent
        );
    }
}

fn display_name(asset: &Asset) -> &str {
    if asset.name.is_empty() {
        asset.content.url().unwrap_or(&asset.id)
    } else {
        &asset.name
    }
}

fn parse_category(value: &str) -> Category {
    Category::from_str(value).unwrap_or_else(|e| exit_with_error(&e))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
