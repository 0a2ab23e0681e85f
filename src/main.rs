//! Terminal animation runner (default binary).
//!
//! Picks a scene from the CLI mode selector, applies the shared overrides,
//! and hands the result to the animation loop. Unknown modes or flags print
//! a usage line and render nothing.

use anyhow::Result;
use log::info;
use phosphor::runtime::Runner;
use phosphor::scene::{CubeLayout, Mode, Overrides};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Debug)]
struct Options {
    mode: Mode,
    overrides: Overrides,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            // A bad selection is not an error for a cosmetic tool; say why
            // and do nothing.
            println!("{message}");
            return Ok(());
        }
    };

    let mut rng = StdRng::from_entropy();
    let (scene, config) = options.mode.build(&options.overrides, &mut rng);
    info!(
        "mode {} at {}x{} every {:?}",
        options.mode.name(),
        config.width,
        config.height,
        config.frame_delay
    );

    Runner::new(scene, config, rng).run()?;
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut mode = Mode::Cube;
    let mut overrides = Overrides::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mode" | "-m" => {
                let value = flag_value(&mut iter, arg)?;
                mode = Mode::parse(value)
                    .ok_or_else(|| format!("unknown mode {value:?} (expected {})", mode_list()))?;
            }
            "--width" => {
                overrides.width = Some(numeric_value(&mut iter, arg)?);
            }
            "--height" => {
                overrides.height = Some(numeric_value(&mut iter, arg)?);
            }
            "--delay-ms" => {
                let millis: u64 = numeric_value(&mut iter, arg)?;
                overrides.frame_delay = Some(Duration::from_millis(millis));
            }
            "--cube-layout" => {
                let value = flag_value(&mut iter, arg)?;
                overrides.cube_layout = Some(CubeLayout::parse(value).ok_or_else(|| {
                    format!("unknown cube-layout {value:?} (expected multi | single)")
                })?);
            }
            "--help" | "-h" => return Err(usage()),
            other => return Err(format!("unknown flag {other:?}\n{}", usage())),
        }
    }

    Ok(Options { mode, overrides })
}

fn flag_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{flag} needs a value\n{}", usage()))
}

fn numeric_value<T: std::str::FromStr>(
    iter: &mut std::slice::Iter<'_, String>,
    flag: &str,
) -> Result<T, String> {
    let value = flag_value(iter, flag)?;
    value
        .parse()
        .map_err(|_| format!("{flag} needs a number, got {value:?}"))
}

fn mode_list() -> String {
    Mode::ALL
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn usage() -> String {
    format!(
        "usage: phosphor [--mode <name>] [--width N] [--height N] [--delay-ms N] \
         [--cube-layout multi|single]\nmodes: {}",
        mode_list()
    )
}
