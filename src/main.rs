//! # Eclipse Simulator Entry Point
//!
//! Development binary around the simulation library: loads configuration,
//! locates the eclipse for the configured observer, and prints ASCII
//! previews of the sky to stdout.
//!
//! Usage:
//!   eclipse-sim                      sweep of frames across the window
//!   eclipse-sim --offset <mins>      single frame at an offset from max
//!   eclipse-sim --zoom               zoomed mode (5° vertical field)
//!   eclipse-sim --json               emit frames as JSON instead of ASCII
//!   eclipse-sim --config <path>      alternate config file


use anyhow::{bail, Context, Result};
use std::env;

use eclipse_sim_lib::config::Config;
use eclipse_sim_lib::ephemeris::MeeusEphemeris;
use eclipse_sim_lib::fov::Viewport;
use eclipse_sim_lib::renderer::draw_ascii;
use eclipse_sim_lib::session::{Session, ZoomMode};

struct Args {
    offset_mins: Option<f64>,
    zoom: ZoomMode,
    json: bool,
    config_path: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        offset_mins: None,
        zoom: ZoomMode::Wide,
        json: false,
        config_path: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--offset" => {
                let value = iter.next().context("--offset requires a value in minutes")?;
                args.offset_mins =
                    Some(value.parse().context("--offset value must be a number")?);
            }
            "--zoom" => args.zoom = ZoomMode::Zoomed,
            "--json" => args.json = true,
            "--config" => {
                args.config_path = Some(iter.next().context("--config requires a path")?);
            }
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let seed = config
        .search_seed()
        .context("invalid eclipse date or search hour in config")?;

    let cols = config.display.width as usize;
    let rows = config.display.height as usize;
    // Character cells are about twice as tall as wide
    let viewport = Viewport {
        width: cols as f64,
        height: rows as f64 * 2.0,
    };

    let mut session = Session::new(
        MeeusEphemeris,
        config.coordinate(),
        viewport,
        args.zoom,
        seed,
    )
    .context("failed to initialize simulation")?;

    let event = session.eclipse_event();
    if !args.json {
        println!(
            "maximum eclipse at {} from {} ({:.6}, {:.6})",
            event.instant.format("%Y-%m-%d %H:%M:%S UTC"),
            config.location.name,
            config.location.lat,
            config.location.lng
        );
    }

    let offsets: Vec<f64> = match args.offset_mins {
        Some(mins) => vec![mins],
        None => vec![-60.0, -30.0, -10.0, 0.0, 10.0, 30.0, 60.0],
    };

    for mins in offsets {
        session.set_offset_mins(mins);
        let frame = session.frame().context("ephemeris query failed")?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&frame)?);
        } else {
            let fov = session.display_fov();
            let view_aspect = (fov.x / 2.0).sin() / (fov.y / 2.0).sin();
            println!();
            print!(
                "{}",
                draw_ascii(&frame, session.current_instant(), cols, rows, view_aspect)
            );
        }
    }

    Ok(())
}
