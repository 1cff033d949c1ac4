// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up diagnostics (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code:
//      0 = success
//      1 = degraded result (no images found / catalog notice shown)
//      2 = error
//
// Rust concepts:
// - #[tokio::main]: sets up the async runtime for us
// - anyhow::Result: any error type can bubble up with ?
// - tokio::select!: wait on several things, act on whichever is ready first
// =============================================================================

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant};
use tracing_subscriber::EnvFilter;
use url::Url;

use catalog_carousel::carousel::{CardId, Carousel, CarouselStatus, Thumbnail};
use catalog_carousel::catalog::{self, CatalogLoader, CatalogSource, Container};
use catalog_carousel::cli::{parse_play_input, Cli, Commands, PlayInput, ProbeArgs, ThemeAction};
use catalog_carousel::probe::{is_valid_folder, ImageSource, ProbeReport, Prober};
use catalog_carousel::theme::{Theme, ThemeStore};

#[tokio::main]
async fn main() {
    init_tracing();

    // Run the actual program and map the outcome to an exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so stdout stays clean for markup and JSON
//
// RUST_LOG=debug shows every probe hit; the default only shows warnings
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    // Parse arguments; clap prints help and exits on --help or bad input
    let cli = Cli::parse();

    // Route to the right handler based on which subcommand was used
    match cli.command {
        Commands::Probe {
            folder,
            source,
            probe,
            json,
        } => handle_probe(&folder, &source, &probe, json).await,
        // Render has many flags; bundle them into a request struct
        Commands::Render {
            source,
            catalog,
            output,
            page,
            title,
            prefs,
            probe,
            json,
        } => {
            let request = RenderRequest {
                source: &source,
                catalog: catalog.as_deref(),
                output: output.as_deref(),
                page,
                title: &title,
                prefs: &prefs,
                json,
            };
            handle_render(request, &probe).await
        }
        Commands::Play {
            folder,
            source,
            name,
            ticks,
            interval_ms,
            interactive,
            probe,
        } => {
            // Without --name the folder doubles as the alt text
            let name = name.unwrap_or_else(|| folder.clone());
            let request = PlayRequest {
                folder: &folder,
                name: &name,
                source: &source,
                ticks,
                interval: Duration::from_millis(interval_ms),
                interactive,
            };
            handle_play(request, &probe).await
        }
        // `theme` on its own means `theme show`
        Commands::Theme { action, prefs } => handle_theme(action.unwrap_or(ThemeAction::Show), &prefs),
    }
}

// --source decides the loader, the shared flags decide the limits
fn build_prober(source: &str, args: &ProbeArgs) -> Result<Prober> {
    // "https://..." -> HttpLoader, anything else -> DirLoader
    let loader = ImageSource::parse(source)?.into_loader(args.timeout())?;
    Ok(Prober::new(loader, args.options()))
}

// Handles the 'probe' subcommand
async fn handle_probe(folder: &str, source: &str, args: &ProbeArgs, json: bool) -> Result<i32> {
    // A typo'd folder is a usage error here, not an empty result
    if !is_valid_folder(folder) {
        return Err(anyhow!(
            "Invalid folder name '{}' (expected a single name such as 'stoneware-mug')",
            folder
        ));
    }

    let prober = build_prober(source, args)?;

    if !json {
        println!("🔍 Probing {} in {}", folder, source);
    }

    let report = prober.probe_report(folder).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_probe_report(&report, &prober);
    }

    // No images is a degraded result, not an error
    Ok(if report.images.is_empty() { 1 } else { 0 })
}

fn print_probe_report(report: &ProbeReport, prober: &Prober) {
    if report.images.is_empty() {
        println!("⚠️  No images found");
    } else {
        // Numbered from 1, like the filenames
        for (position, image) in report.images.iter().enumerate() {
            println!("   {:>2}. {}", position + 1, image.path);
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   🖼️  Images: {}", report.images.len());
    println!("   🔢 Indices tried: {}", report.indices_attempted);
    println!("   📨 Load attempts: {}", report.loads_issued);

    // Echo the limits so a short result can be told apart from a low cap
    let options = prober.options();
    println!(
        "   ⚙️  Limits: max index {}, miss limit {}, extensions {}",
        options.max_index,
        options.miss_limit,
        options.extensions.join(",")
    );
}

// Borrowed views of the render flags; 'a ties them to the parsed CLI
struct RenderRequest<'a> {
    source: &'a str,
    catalog: Option<&'a str>,
    output: Option<&'a Path>,
    page: bool,
    title: &'a str,
    prefs: &'a Path,
    json: bool,
}

// Handles the 'render' subcommand
//
// Progress goes to stderr so the markup on stdout can be piped
async fn handle_render(request: RenderRequest<'_>, args: &ProbeArgs) -> Result<i32> {
    let prober = build_prober(request.source, args)?;

    // An invalid --catalog is the user's mistake: fail instead of falling back
    let remote = request
        .catalog
        .map(|c| Url::parse(c).map_err(|e| anyhow!("Invalid catalog URL '{}': {}", c, e)))
        .transpose()?;
    let loader = CatalogLoader::new(remote, args.timeout())?;

    // Never fails: a broken remote catalog falls back to the embedded list
    let load = loader.load().await;
    match load.source {
        CatalogSource::Remote => eprintln!("📦 Loaded {} product(s) from the catalog", load.products.len()),
        CatalogSource::Embedded => eprintln!("📦 Using {} embedded product(s)", load.products.len()),
    }

    // Read once at startup; a missing file just means the default theme
    let theme = ThemeStore::new(request.prefs).load();

    // Start every card's probe, then wait for all of them
    let mut container = Container::new();
    container.populate(&load.products, &prober);
    eprintln!("🔍 Probing images for {} card(s)...", container.len());
    container.settle().await;

    // Exit 1 when the grid ended up showing only the "unable to load" notice
    let degraded = container.notice().is_some();

    // Three output formats: JSON card states, a full page, or just the grid
    let rendered = if request.json {
        let snapshots: Vec<_> = container
            .cards()
            .iter()
            .map(|card| card.carousel.snapshot())
            .collect();
        serde_json::to_string_pretty(&snapshots)?
    } else if request.page {
        catalog::render_page(&container, theme, request.title).into_string()
    } else {
        catalog::render_container(&container, theme).into_string()
    };

    // Rendering is a one-shot snapshot; nothing needs the timers afterwards
    container.clear();

    // --output writes a file, otherwise the markup goes to stdout
    match request.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✅ Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(if degraded { 1 } else { 0 })
}

struct PlayRequest<'a> {
    folder: &'a str,
    name: &'a str,
    source: &'a str,
    ticks: u32,
    interval: Duration,
    interactive: bool,
}

// Handles the 'play' subcommand
async fn handle_play(request: PlayRequest<'_>, args: &ProbeArgs) -> Result<i32> {
    if request.interval.is_zero() {
        return Err(anyhow!("--interval-ms must be greater than zero"));
    }

    let prober = build_prober(request.source, args)?;
    // A single card; it's the only one, so its id is 0
    let card = Carousel::new(CardId(0), request.name).with_interval(request.interval);

    println!("🔍 Probing {} in {}", request.folder, request.source);
    // Probe inline (no container here), then hand the result to the card
    card.on_probe_complete(prober.probe(request.folder).await);

    if card.status() == CarouselStatus::Empty {
        println!("⚠️  No images available for {}", request.name);
        return Ok(1);
    }

    print_slide(&card);

    // Sample just after each autoplay tick so every printed slide is the new one
    let offset = Duration::from_millis(50);
    let mut sampler = interval_at(Instant::now() + request.interval + offset, request.interval);
    // Async line reader over stdin, so waiting for input doesn't block ticks
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = request.interactive;
    let mut remaining = request.ticks;

    if reading {
        println!("⌨️  n/p = next/previous, space = pause, click, hover/leave, q = quit");
    }

    // Whichever comes first: the next sample tick, or a line on stdin
    //
    // The `if reading` guard disables the stdin branch once input is closed
    while remaining > 0 {
        tokio::select! {
            _ = sampler.tick() => {
                remaining -= 1; // one autoplay interval has passed
                print_slide(&card);
            }
            line = lines.next_line(), if reading => {
                match line? {
                    Some(line) => match parse_play_input(&line) {
                        Some(PlayInput::Quit) => break,
                        // Same handler a page would call for mouse and key events
                        Some(PlayInput::Gesture(gesture)) => {
                            card.handle(gesture);
                            print_slide(&card);
                        }
                        None => eprintln!("Unknown command: {}", line.trim()),
                    },
                    // stdin closed; keep playing without input
                    None => reading = false,
                }
            }
        }
    }

    // Stop the autoplay task before the runtime shuts down
    card.dispose();
    Ok(0)
}

// Prints "▶️  [2/3] Images/Products/lamp/2.jpg" (⏸️ while paused)
fn print_slide(card: &Carousel) {
    let snapshot = card.snapshot();
    // Only Active cards have an image to show
    if let Thumbnail::Image { path, .. } = &snapshot.view.thumbnail {
        let marker = if card.is_paused() { "⏸️ " } else { "▶️ " };
        println!(
            "{} [{}/{}] {}",
            marker,
            snapshot.current_index + 1,
            snapshot.image_count,
            path
        );
    }
}

// Handles the 'theme' subcommand
fn handle_theme(action: ThemeAction, prefs: &Path) -> Result<i32> {
    let store = ThemeStore::new(prefs);

    // Every action ends with the theme now in effect
    let theme = match action {
        ThemeAction::Show => store.load(),
        ThemeAction::Toggle => store.toggle()?,
        ThemeAction::Set { theme } => {
            // FromStr for Theme; an unknown name is an error (exit 2)
            let theme: Theme = theme.parse()?;
            store.save(theme)?;
            theme
        }
    };

    println!("🎨 Theme: {}", theme);
    Ok(0)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does run() return Result<i32>?
//    - Ok(code) is a finished run, even a degraded one (exit 1)
//    - Err(e) is something unexpected (exit 2)
//    - main() turns both into the process exit code
//
// 2. Why eprintln! for progress in render?
//    - stdout may be piped into a file or another program
//    - Progress on stderr keeps the markup clean
//
// 3. What does tokio::select! do?
//    - It polls several futures and runs the branch of the first one ready
//    - The others are dropped (and polled again on the next loop iteration)
// -----------------------------------------------------------------------------
