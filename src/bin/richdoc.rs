use clap::{Args, Parser, Subcommand};
use richdoc::{
    BlockContent, BlockDraft, BlockId, DirectorySink, DirectoryStore, DocumentStore, EditorConfig,
    ExportFormat, Heading, HeadingLevel, MarginsPatch, Orientation, PaperSize, SettingsPatch,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the document snapshot
    #[arg(long, env = "RICHDOC_DIR", default_value = ".richdoc", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new, empty document (replaces the stored one)
    New {
        #[arg(long)]
        title: Option<String>,
    },
    /// Show a summary of the current document
    Show {
        /// Print the full JSON snapshot instead
        #[arg(long)]
        json: bool,
    },
    /// Rename the document
    Title { title: String },
    /// Append a block
    Add {
        #[command(subcommand)]
        block: AddBlock,
    },
    /// Replace the text of a paragraph or heading
    Edit { id: String, text: String },
    /// Replace one cell of a table
    SetCell {
        id: String,
        row: usize,
        col: usize,
        text: String,
    },
    /// Delete a block
    Delete { id: String },
    /// Change page settings
    Settings(SettingsArgs),
    /// Export the document
    Export {
        /// pdf, docx, html or json
        format: ExportFormat,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List the document structure
    Outline {
        #[arg(long)]
        json: bool,
    },
    /// Print the share link
    Share {
        /// Base URL of the sharing site
        #[arg(long)]
        base: Option<String>,
    },
    /// Print the live preview markup
    Preview,
}

#[derive(Subcommand)]
enum AddBlock {
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
        level: u8,
    },
    Table {
        rows: usize,
        cols: usize,
    },
    Image {
        src: String,
        #[arg(long, default_value = "")]
        alt: String,
    },
    Divider,
}

#[derive(Args)]
struct SettingsArgs {
    /// A4, A3, A5, Letter or Legal
    #[arg(long)]
    paper_size: Option<PaperSize>,
    /// portrait or landscape
    #[arg(long)]
    orientation: Option<Orientation>,
    #[arg(long)]
    font: Option<String>,
    #[arg(long, value_parser = parse_positive)]
    line_spacing: Option<f64>,
    #[arg(long, value_parser = parse_non_negative)]
    margin_top: Option<f64>,
    #[arg(long, value_parser = parse_non_negative)]
    margin_bottom: Option<f64>,
    #[arg(long, value_parser = parse_non_negative)]
    margin_left: Option<f64>,
    #[arg(long, value_parser = parse_non_negative)]
    margin_right: Option<f64>,
}

fn parse_positive(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number > 0.0 => Ok(number),
        _ => Err(format!("expected a positive number, got {value:?}")),
    }
}

fn parse_non_negative(value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(number),
        _ => Err(format!("expected a non-negative number, got {value:?}")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RICHDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EditorConfig::default();
    let storage = match DirectoryStore::open(&cli.dir) {
        Ok(storage) => storage,
        Err(err) => fail(err),
    };

    match cli.command {
        Commands::New { title } => new_command(&storage, &config, title),
        Commands::Show { json } => show_command(&storage, &config, json),
        Commands::Title { title } => {
            let mut store = load(&storage, &config);
            store.replace_title(title);
            persist(&storage, &config, &store);
        }
        Commands::Add { block } => add_command(&storage, &config, block),
        Commands::Edit { id, text } => edit_command(&storage, &config, id.into(), text),
        Commands::SetCell { id, row, col, text } => {
            let mut store = load(&storage, &config);
            let id = BlockId::from(id);
            let before = store.snapshot();
            let after = store.set_table_cell(&id, row, col, text);
            if std::sync::Arc::ptr_eq(&before, &after) {
                fail(format!("no table cell ({row}, {col}) in block {id}"));
            }
            persist(&storage, &config, &store);
        }
        Commands::Delete { id } => {
            let mut store = load(&storage, &config);
            let id = BlockId::from(id);
            require_block(&store, &id);
            store.delete_block(&id);
            persist(&storage, &config, &store);
        }
        Commands::Settings(args) => settings_command(&storage, &config, args),
        Commands::Export { format, out } => export_command(&storage, &config, format, out),
        Commands::Outline { json } => outline_command(&storage, &config, json),
        Commands::Share { base } => {
            let store = load(&storage, &config);
            let base = base.unwrap_or_else(|| config.share_base.clone());
            println!("{}", richdoc::share_link(store.document(), &base));
        }
        Commands::Preview => {
            let store = load(&storage, &config);
            println!("{}", richdoc::render_preview(store.document()));
        }
    }
}

fn fail(err: impl Display) -> ! {
    eprintln!("Error: {err}");
    process::exit(1);
}

fn load(storage: &DirectoryStore, config: &EditorConfig) -> DocumentStore {
    DocumentStore::new(richdoc::restore(storage, config))
}

fn persist(storage: &DirectoryStore, config: &EditorConfig, store: &DocumentStore) {
    if let Err(err) = richdoc::save(storage, &config.storage_key, store.document()) {
        fail(err);
    }
}

fn require_block(store: &DocumentStore, id: &BlockId) {
    if store.block(id).is_none() {
        fail(format!("no block with id {id}"));
    }
}

fn new_command(storage: &DirectoryStore, config: &EditorConfig, title: Option<String>) {
    let mut store = DocumentStore::new(richdoc::Document::with_owner(
        config.owner_id.clone(),
        chrono::Utc::now(),
    ));
    if let Some(title) = title {
        store.replace_title(title);
    }
    persist(storage, config, &store);
    println!("{}", store.document().id);
}

fn show_command(storage: &DirectoryStore, config: &EditorConfig, json: bool) {
    let store = load(storage, config);
    let doc = store.document();
    if json {
        match richdoc::serialize_json(doc) {
            Ok(encoded) => println!("{encoded}"),
            Err(err) => fail(err),
        }
        return;
    }
    println!("Title: {}", doc.title);
    println!("Id: {}", doc.id);
    println!("Last modified: {}", doc.last_modified.to_rfc3339());
    println!("Blocks: {}", doc.blocks().len());
}

fn add_command(storage: &DirectoryStore, config: &EditorConfig, block: AddBlock) {
    let draft = match block {
        AddBlock::Paragraph { text } => BlockDraft::paragraph(text),
        AddBlock::Heading { text, level } => BlockDraft::heading(text, HeadingLevel::from(level)),
        AddBlock::Table { rows, cols } => BlockDraft::table(rows, cols),
        AddBlock::Image { src, alt } => BlockDraft::image(src, alt),
        AddBlock::Divider => BlockDraft::divider(),
    };
    let mut store = load(storage, config);
    let (id, _) = store.add_block(draft);
    persist(storage, config, &store);
    println!("{id}");
}

fn edit_command(storage: &DirectoryStore, config: &EditorConfig, id: BlockId, text: String) {
    let mut store = load(storage, config);
    let content = match store.block(&id).map(|block| &block.content) {
        Some(BlockContent::Paragraph(_)) => BlockContent::Paragraph(text),
        Some(BlockContent::Heading(heading)) => BlockContent::Heading(Heading {
            text,
            level: heading.level,
        }),
        Some(other) => fail(format!(
            "block {id} is a {} and has no text",
            other.kind_name()
        )),
        None => fail(format!("no block with id {id}")),
    };
    store.update_block(&id, content);
    persist(storage, config, &store);
}

fn settings_command(storage: &DirectoryStore, config: &EditorConfig, args: SettingsArgs) {
    let margins = MarginsPatch {
        top: args.margin_top,
        bottom: args.margin_bottom,
        left: args.margin_left,
        right: args.margin_right,
    };
    let patch = SettingsPatch {
        paper_size: args.paper_size,
        orientation: args.orientation,
        default_font: args.font,
        line_spacing: args.line_spacing,
        margins: (margins != MarginsPatch::default()).then_some(margins),
    };
    let mut store = load(storage, config);
    if patch.is_empty() {
        let settings = store.document().settings();
        match serde_json::to_string_pretty(settings) {
            Ok(encoded) => println!("{encoded}"),
            Err(err) => fail(err),
        }
        return;
    }
    store.update_settings(patch);
    persist(storage, config, &store);
}

fn export_command(
    storage: &DirectoryStore,
    config: &EditorConfig,
    format: ExportFormat,
    out: PathBuf,
) {
    let store = load(storage, config);
    let mut sink = DirectorySink::new(&out);
    if let Err(err) = richdoc::export_document(store.document(), format, &mut sink) {
        fail(err);
    }
    for path in sink.written() {
        println!("{}", path.display());
    }
}

fn outline_command(storage: &DirectoryStore, config: &EditorConfig, json: bool) {
    let store = load(storage, config);
    let entries = richdoc::outline(store.document());
    if json {
        match serde_json::to_string_pretty(&entries) {
            Ok(encoded) => println!("{encoded}"),
            Err(err) => fail(err),
        }
        return;
    }
    if entries.is_empty() {
        println!("Document is empty.");
    }
    for entry in entries {
        println!("{}  {}", entry.id, entry.label);
    }
}
