use clap::Parser;
use std::io::Write;
use std::{fs, process};

use ledsign_gfx::{render, GlyphStoreBuilder, RenderOptions};

mod display;
use display::{ArrivalSource, FixedArrivals};

#[derive(Parser, Debug)]
#[command(version, about = "Renders transit arrival predictions for an LED sign")]
struct Args {
    /// Route to get predictions for, or "all" for a whole-stop overview
    #[arg(long)]
    route: String,

    /// Route direction
    #[arg(long, default_value = "inbound")]
    direction: String,

    /// Stop to watch
    #[arg(long)]
    stop: String,

    /// Warn if the wait for an arrival is at least this many minutes
    #[arg(long, default_value_t = 13)]
    timing: i64,

    /// Font documents, loaded in order; later ones override per glyph
    #[arg(long = "font", default_values_t = [
        "fonts/7x7.glyphs".to_string(),
        "fonts/amends.glyphs".to_string(),
        "fonts/specific.glyphs".to_string(),
    ])]
    font: Vec<String>,

    /// Sign height in pixels
    #[arg(long, default_value_t = 8)]
    height: u32,

    /// Sign driver command; the picture text is piped to its stdin
    #[arg(long)]
    driver: Option<String>,

    /// Arrival minutes per route, e.g. "F=3,9,24" (stands in for the
    /// prediction feed)
    #[arg(long = "arrivals", value_parser = display::parse_arrival_spec)]
    arrivals: Vec<(String, Vec<i64>)>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = GlyphStoreBuilder::new();
    for path in &args.font {
        let document = fs::read_to_string(path).map_err(|err| format!("{}: {}", path, err))?;
        builder.load(&document);
    }
    let store = builder.build();
    log::info!(
        "loaded {} glyphs from {} font documents",
        store.len(),
        args.font.len()
    );

    let source = FixedArrivals::new(args.arrivals.clone());
    let opts = RenderOptions {
        ignore_shift_h: true,
        ..RenderOptions::default()
    };

    let payload = if args.route == "all" {
        let arrivals = source.all_arrivals(&args.stop);
        log::debug!("stop arrivals: {:?}", arrivals);
        display::stop_overview(&store, &arrivals, &args.direction, args.height, opts)?
    } else {
        let minutes = source
            .arrivals(&args.route, &args.direction, &args.stop)
            .ok_or_else(|| format!("no arrivals known for route {}", args.route))?;
        log::debug!("arrivals for {}: {:?}", args.route, minutes);

        let line = display::prediction_line(&args.route, &minutes, args.timing);
        render(&store, &line, args.height, opts)?.to_text()
    };

    match &args.driver {
        Some(command) => pipe_to_driver(command, &payload)?,
        None => println!("{}", payload),
    }

    Ok(())
}

fn pipe_to_driver(command: &str, payload: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or("empty driver command")?;

    let mut child = process::Command::new(program)
        .args(parts)
        .stdin(process::Stdio::piped())
        .stdout(process::Stdio::piped())
        .stderr(process::Stdio::piped())
        .spawn()?;

    // Feed stdin from its own thread. Writing it inline would deadlock with
    // a driver that fills its output pipe before consuming its input.
    let mut stdin = child.stdin.take().ok_or("driver has no stdin")?;
    let input = payload.to_string();
    let writer = std::thread::spawn(move || -> std::io::Result<()> {
        for line in input.lines() {
            writeln!(stdin, "{}", line)?;
        }
        Ok(())
    });

    let output = child.wait_with_output()?;
    writer
        .join()
        .map_err(|_| "driver stdin writer panicked")??;
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        log::debug!("driver: {}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        log::debug!("driver: {}", line);
    }

    if !output.status.success() {
        return Err(format!("driver exited with {}", output.status).into());
    }
    Ok(())
}
