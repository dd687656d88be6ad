// src/main.rs
use anyhow::{Context, Result};
use hand_tracker::host::{ManualClock, ToggleParams};
use hand_tracker::status::NodeComment;
use hand_tracker::{Command, MappingRules, MemoryGeometry, SessionSlot, SimulatedDevice, TrackerConfig};
use std::path::PathBuf;

struct Options {
    config: Option<PathBuf>,
    ticks: i64,
    hands: usize,
    centers: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        config: None,
        ticks: 8,
        hands: 2,
        centers: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--ticks" => {
                let n = args.next().context("--ticks needs a number")?;
                options.ticks = n.parse().with_context(|| format!("Invalid tick count: {}", n))?;
            }
            "--hands" => {
                let n = args.next().context("--hands needs a number")?;
                options.hands = n.parse().with_context(|| format!("Invalid hand count: {}", n))?;
            }
            "--centers" => options.centers = true,
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    Ok(options)
}

fn run(options: Options) -> Result<()> {
    let mut config = TrackerConfig::resolve(options.config.as_deref())?;
    if options.centers {
        config.rules = MappingRules::centers();
    }
    let params = ToggleParams {
        hands: config.default_hands,
        arms: config.default_arms,
    };

    let mut slot: SessionSlot<SimulatedDevice, NodeComment> = SessionSlot::new();
    let hands = options.hands;
    slot.init(
        || (SimulatedDevice::new(hands), NodeComment::default()),
        config,
    );

    let clock = ManualClock::new(0);
    let mut node = NodeComment::default();
    let mut geo = MemoryGeometry::with_standard_groups();

    println!("tick  hands  points  polylines  tips  fetches");
    for tick in 0..options.ticks {
        clock.set(tick);

        // Pause for the middle stretch to show the "no reading" path
        if tick == options.ticks / 2 {
            slot.invoke(&mut node, Command::Disable)?;
        } else if tick == options.ticks / 2 + 2 {
            slot.invoke(&mut node, Command::Enable)?;
        }

        // Hosts often cook twice per tick; the second one is served from cache
        for _ in 0..2 {
            geo.clear();
            match slot.track(&mut node, &clock, &params, &mut geo) {
                Ok(summary) => {
                    let fetches = slot.session().map(|s| s.cache().fetches()).unwrap_or(0);
                    println!(
                        "{:>4}  {:>5}  {:>6}  {:>9}  {:>4}  {:>7}",
                        summary.tick,
                        summary.hands,
                        summary.points,
                        summary.polylines,
                        geo.members("tips").len(),
                        fetches
                    );
                }
                Err(e) => println!("{:>4}  {}", tick, e),
            }
        }
    }

    if let Some(session) = slot.session() {
        println!();
        println!("{}", session.state().status_text());
        println!("Node: {}", node.text);
    }

    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let result = parse_args().and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
