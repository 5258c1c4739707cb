use anyhow::{Context, Result, bail};
use clap::Parser;
use erdview::catalog;
use erdview::diagram::Diagram;
use erdview::layout::LayoutEngine;
use erdview::payload::ErdPayload;
use erdview::schema::{DiagramIdentity, SchemaModel};
use erdview::svg::SvgRenderer;
use erdview::transform::ViewConfig;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Render a database schema as an ER diagram (SVG)
#[derive(Parser, Debug)]
#[command(name = "erdview")]
#[command(version)]
#[command(about = "Render an ERD payload or catalog rows to SVG", long_about = None)]
struct Args {
    /// Input JSON file (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Treat the input as a catalog `data_array` instead of an ERD payload
    #[arg(long, requires_all = ["catalog", "schema"])]
    rows: bool,

    /// Catalog name for --rows input
    #[arg(long)]
    catalog: Option<String>,

    /// Schema name for --rows input
    #[arg(long)]
    schema: Option<String>,

    /// Show all columns of a table (repeatable)
    #[arg(short, long, value_name = "TABLE")]
    expand: Vec<String>,

    /// Show all columns of every table
    #[arg(long, conflicts_with = "expand")]
    expand_all: bool,

    /// Fit the diagram into a viewport of this size, e.g. 1280x800
    #[arg(long, value_name = "WxH")]
    viewport: Option<Viewport>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Table card width in pixels
    #[arg(long)]
    table_width: Option<f64>,

    /// Spacing between parallel edges in pixels
    #[arg(long)]
    stagger: Option<f64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy)]
struct Viewport {
    width: f64,
    height: f64,
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .ok()
                .filter(|n| *n > 0.0)
                .ok_or_else(|| format!("invalid viewport dimension {:?}", v))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    let input = read_input(&args.input)?;
    let payload = if args.rows {
        let catalog = args.catalog.as_deref().unwrap_or_default();
        let schema = args.schema.as_deref().unwrap_or_default();
        catalog::assemble_json(&input, catalog, schema).context("Failed to assemble catalog rows")?
    } else {
        ErdPayload::from_json(&input)?
    };

    let mut engine = LayoutEngine::default();
    if let Some(width) = args.table_width {
        if width <= 0.0 {
            bail!("--table-width must be positive");
        }
        engine.table_width = width;
    }
    if let Some(step) = args.stagger {
        engine.stagger_step = step;
    }

    let mut diagram = Diagram::with_config(
        DiagramIdentity::of(&payload),
        SchemaModel::from_payload(&payload),
        engine.clone(),
        ViewConfig::default(),
    );
    if diagram.model().is_empty() {
        log::warn!("schema has no tables; rendering an empty diagram");
    }
    log::debug!(
        "loaded {} tables, {} relationships",
        diagram.model().tables.len(),
        diagram.model().relationships.len()
    );

    if args.expand_all {
        diagram.expand_all();
    }
    for name in &args.expand {
        if !diagram.model().contains(name) {
            log::warn!("--expand {}: no such table", name);
        }
        diagram.expand(name);
    }

    let viewport = args.viewport.map(|v| (v.width, v.height));
    if let Some((width, height)) = viewport {
        diagram.on_viewport_resize(width, height);
        diagram.fit_to_view().context("Failed to fit diagram to viewport")?;
    }

    let svg = SvgRenderer::new(engine).render(&diagram.scene(), diagram.view(), viewport);

    match args.output {
        Some(path) => {
            std::fs::write(&path, &svg).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("SVG saved to: {}", path.display());
        }
        None => print!("{}", svg),
    }
    Ok(())
}
