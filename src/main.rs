//! OmniSky - rich-text and widget board tools for the OmniSky Bluesky client
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use omnisky::board::{catalog, persist, preview};
use omnisky::config::StorageBackend;
use omnisky::richtext::{self, PostRecord};
use omnisky::{
    BoardState, Config, KvStore, MemoryStore, Page, PlacementPatch, SqliteStore, WidgetSize,
    embed, subject,
};

fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize logging (RUST_LOG overrides the configured level)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let memory = take_flag(&mut args, "--memory");

    match parse_args(&args)? {
        Command::Board(cmd) => run_board(&config, memory, cmd),
        Command::Catalog => {
            list_catalog();
            Ok(())
        }
        Command::Segment { text, facets } => segment_cli(&text, facets.as_deref()),
        Command::SegmentRecord { json } => segment_record_cli(&json),
        Command::Subject { input } => {
            let parsed = subject::parse_subject(&input);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Command::Embed { url } => {
            let player = embed::resolve_embed(&url);
            println!("{}", serde_json::to_string_pretty(&player)?);
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Board(BoardCommand),
    Catalog,
    Segment { text: String, facets: Option<String> },
    SegmentRecord { json: String },
    Subject { input: String },
    Embed { url: String },
    Help,
    Version,
}

/// Widget board subcommands
enum BoardCommand {
    Show,
    Add {
        widget_type: String,
        size: Option<WidgetSize>,
    },
    Move {
        instance_id: Uuid,
        patch: PlacementPatch,
    },
    Remove {
        instance_id: Uuid,
    },
    Content {
        instance_id: Uuid,
        json: Option<String>,
    },
}

/// Remove a boolean flag from the argument list, reporting whether it was present
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

/// Value following any of `names`
fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing {what}"))
}

fn parse_instance_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).with_context(|| format!("Invalid widget instance id: {s}"))
}

fn parse_size(args: &[String]) -> Result<Option<WidgetSize>> {
    Ok(flag_value(args, &["--size", "-s"])
        .map(str::parse::<WidgetSize>)
        .transpose()?)
}

fn parse_u8(args: &[String], names: &[&str]) -> Result<Option<u8>> {
    flag_value(args, names)
        .map(|v| v.parse::<u8>().with_context(|| format!("Invalid number for {}: {v}", names[0])))
        .transpose()
}

fn parse_args(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Board(BoardCommand::Show));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "catalog" | "widgets" => Ok(Command::Catalog),

        "board" => parse_board_args(&args[1..]).map(Command::Board),

        "segment" => {
            if let Some(json) = flag_value(args, &["--record", "-r"]) {
                return Ok(Command::SegmentRecord {
                    json: json.to_string(),
                });
            }
            let text = required(args, 1, "text to segment")?.to_string();
            let facets = flag_value(args, &["--facets", "-f"]).map(String::from);
            Ok(Command::Segment { text, facets })
        }

        "subject" => Ok(Command::Subject {
            input: required(args, 1, "subject (DID or handle)")?.to_string(),
        }),

        "embed" => Ok(Command::Embed {
            url: required(args, 1, "music URL")?.to_string(),
        }),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'omnisky --help' for usage"
        )),
    }
}

fn parse_board_args(args: &[String]) -> Result<BoardCommand> {
    let Some(sub) = args.first() else {
        return Ok(BoardCommand::Show);
    };

    match sub.as_str() {
        "show" | "ls" => Ok(BoardCommand::Show),

        "add" => Ok(BoardCommand::Add {
            widget_type: required(args, 1, "widget type (see 'omnisky catalog')")?.to_string(),
            size: parse_size(args)?,
        }),

        "move" | "update" => {
            let instance_id = parse_instance_id(required(args, 1, "widget instance id")?)?;
            let page = parse_u8(args, &["--page", "-p"])?
                .map(Page::try_from)
                .transpose()?;
            let patch = PlacementPatch {
                page,
                row: parse_u8(args, &["--row", "-r"])?,
                col: parse_u8(args, &["--col", "-c"])?,
                size: parse_size(args)?,
            };
            if patch.is_empty() {
                bail!("Nothing to change: pass --page, --row, --col or --size");
            }
            Ok(BoardCommand::Move { instance_id, patch })
        }

        "remove" | "rm" => Ok(BoardCommand::Remove {
            instance_id: parse_instance_id(required(args, 1, "widget instance id")?)?,
        }),

        "content" => Ok(BoardCommand::Content {
            instance_id: parse_instance_id(required(args, 1, "widget instance id")?)?,
            json: args.get(2).cloned(),
        }),

        other => Err(anyhow::anyhow!(
            "Unknown board command: {other}\nRun 'omnisky --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = omnisky::paths::config_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🦋 OmniSky - rich text and widget board tools

USAGE:
    omnisky                                  Show the widget board
    omnisky [--memory] [COMMAND]

COMMANDS:
    board [show]                             Preview both pages and list widgets
    board add <widget-type> [--size RxC]     Add a widget in the first free slot
    board move <id> [OPTIONS]                Move or resize a widget
      Options:
        -p, --page <1|2>
        -r, --row <0|1>
        -c, --col <0|1>
        -s, --size <1x1|1x2|2x1|2x2>
    board remove <id>                        Remove a widget and its content
    board content <id> [json]                Show or set a widget's content
      Example:
        omnisky board content <id> '{{"kind":"stickyNote","text":"hi"}}'

    catalog                                  List widget types

    segment <text> [--facets <json>]         Split text into rich-text segments
    segment --record <json>                  Same, from a post record
      Example:
        omnisky segment "Hello #world" --facets '[{{"index":{{"byteStart":6,"byteEnd":12}},"features":[{{"$type":"app.bsky.richtext.facet#tag","tag":"world"}}]}}]'

    subject <did-or-handle>                  Classify an account identifier
    embed <url>                              Resolve a music URL to a player

OPTIONS:
    --memory                                 Use a throwaway in-memory store
    -h, --help                               Show this help message
    -v, --version                            Show version information

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("omnisky {}", omnisky::VERSION);
}

fn open_store(config: &Config, memory: bool) -> Result<Box<dyn KvStore>> {
    if memory || config.storage == StorageBackend::Memory {
        return Ok(Box::new(MemoryStore::new()));
    }
    Ok(Box::new(SqliteStore::open()?))
}

fn run_board(config: &Config, memory: bool, cmd: BoardCommand) -> Result<()> {
    let mut store = open_store(config, memory)?;
    let loaded = persist::load_board(store.as_ref(), &config.board_key)?;
    if loaded.dropped > 0 {
        eprintln!("⚠ Dropped {} invalid widget(s) from the stored board", loaded.dropped);
    }
    let mut state = loaded.state;

    match cmd {
        BoardCommand::Show => {
            show_board(&state);
            return Ok(());
        }

        BoardCommand::Add { widget_type, size } => {
            let size = size.unwrap_or(config.default_widget_size);
            let widget = state.board.add_widget(&widget_type, Some(size))?;
            println!(
                "✓ Added {} ({}) on page {}, row {}, col {}\n  id: {}",
                widget.name(),
                widget.size,
                widget.page,
                widget.row,
                widget.col,
                widget.instance_id
            );
        }

        BoardCommand::Move { instance_id, patch } => {
            let widget = state.board.update_widget(instance_id, patch)?;
            println!(
                "✓ {} is now {} on page {}, row {}, col {}",
                widget.name(),
                widget.size,
                widget.page,
                widget.row,
                widget.col
            );
        }

        BoardCommand::Remove { instance_id } => {
            let Some(widget) = state.remove_widget(instance_id) else {
                bail!("No widget with instance id {instance_id}");
            };
            println!("✓ Removed {}", widget.name());
        }

        BoardCommand::Content { instance_id, json: None } => {
            match state.content.get(instance_id) {
                Some(content) => println!("{}", serde_json::to_string_pretty(content)?),
                None => println!("No content set for {instance_id}"),
            }
            return Ok(());
        }

        BoardCommand::Content {
            instance_id,
            json: Some(json),
        } => {
            let content = serde_json::from_str(&json).context("Failed to parse widget content JSON")?;
            state.set_content(instance_id, content)?;
            println!("✓ Content saved");
        }
    }

    persist::save_board(store.as_mut(), &config.board_key, &state)?;
    Ok(())
}

fn show_board(state: &BoardState) {
    println!("{}", preview::render(&state.board));

    if state.board.is_empty() {
        println!("\nNo widgets yet. Add one with:");
        println!("  omnisky board add <widget-type>");
        return;
    }

    println!("\nWidgets:\n");
    for widget in state.board.widgets() {
        let content_marker = if state.content.get(widget.instance_id).is_some() {
            " ✎"
        } else {
            ""
        };
        println!(
            "  {}  {} ({}) page {}, row {}, col {}{}",
            widget.instance_id,
            widget.name(),
            widget.size,
            widget.page,
            widget.row,
            widget.col,
            content_marker
        );
    }
}

fn list_catalog() {
    println!("Available widgets:\n");
    for widget in catalog::all() {
        let marker = if widget.single_instance { " (once)" } else { "" };
        println!("  {:<24} {}{}", widget.id, widget.name, marker);
    }
}

fn segment_cli(text: &str, facets: Option<&str>) -> Result<()> {
    let facets = facets.map(richtext::parse_facets).transpose()?.unwrap_or_default();
    let segments = richtext::segment(text, &facets);
    println!("{}", serde_json::to_string_pretty(&segments)?);
    Ok(())
}

fn segment_record_cli(json: &str) -> Result<()> {
    let record: PostRecord = serde_json::from_str(json).context("Failed to parse post record")?;
    println!("{}", serde_json::to_string_pretty(&record.segments())?);
    Ok(())
}
