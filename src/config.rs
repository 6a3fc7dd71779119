use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use log::LevelFilter;

use crate::material::Color;
use crate::scene::parse_color;

pub const DEFAULT_WIDTH: usize = 1024;
pub const DEFAULT_HEIGHT: usize = 768;
pub const DEFAULT_BACKGROUND: Color = 0x000000FF;
pub const DEFAULT_OUTPUT: &str = "render.png";

pub const USAGE: &str = "\
Usage: scanraster [options] [definitions_file]
  definitions_file   one triangle per line: `x1,y1 x2,y2 x3,y3 colorHex`
  --width N          output width in pixels (default 1024)
  --height N         output height in pixels (default 768)
  --background HEX   colour of uncovered pixels, 0xRRGGBBAA (default 000000FF)
  --threads N        worker threads (default: logical CPU count)
  --output PATH      image to write, .png or .bmp (default render.png)
  --random N         render N random triangles instead of a file
  --seed N           seed for --random
  --no-reorder       keep vertex order exactly as given
  --window           show the result in a window (needs the `window` feature)
  -v, --verbose      debug logging (repeat for trace)
  -q, --quiet        only log errors
  -h, --help         print this help text";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    pub threads: usize,
    pub reorder: bool,
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub random_triangles: Option<usize>,
    pub seed: Option<u64>,
    pub window: bool,
    pub log_level: LevelFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND,
            threads: num_cpus::get(),
            reorder: true,
            input: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            random_triangles: None,
            seed: None,
            window: false,
            log_level: LevelFilter::Info,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Render(RenderConfig),
}

fn value<'a, I: Iterator<Item = &'a str>>(args: &mut I, flag: &str) -> Result<&'a str> {
    match args.next() {
        Some(v) => Ok(v),
        None => bail!("{} expects a value", flag),
    }
}

fn number<'a, I: Iterator<Item = &'a str>>(args: &mut I, flag: &str) -> Result<usize> {
    let raw = value(args, flag)?;
    raw.parse().with_context(|| format!("{} expects a number, got `{}`", flag, raw))
}

impl RenderConfig {
    /// Parses arguments, excluding the program name.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Command> {
        let mut config = RenderConfig::default();
        let mut verbosity = 0;
        let mut args = args.iter().map(|arg| AsRef::<str>::as_ref(arg));

        while let Some(arg) = args.next() {
            match arg {
                "-h" | "--help" => return Ok(Command::Help),
                "--width" => config.width = number(&mut args, arg)?,
                "--height" => config.height = number(&mut args, arg)?,
                "--background" => config.background = parse_color(value(&mut args, arg)?)?,
                "--threads" => config.threads = number(&mut args, arg)?,
                "--output" | "-o" => config.output = PathBuf::from(value(&mut args, arg)?),
                "--random" => config.random_triangles = Some(number(&mut args, arg)?),
                "--seed" => config.seed = Some(number(&mut args, arg)? as u64),
                "--no-reorder" => config.reorder = false,
                "--window" => config.window = true,
                "-v" | "--verbose" => verbosity += 1,
                "-q" | "--quiet" => verbosity = -1,
                flag if flag.starts_with('-') => bail!("unknown option `{}`", flag),
                path => {
                    if config.input.is_some() {
                        bail!("only one definitions file may be given");
                    }
                    config.input = Some(PathBuf::from(path));
                }
            }
        }

        config.log_level = match verbosity {
            v if v < 0 => LevelFilter::Error,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        if config.input.is_none() && config.random_triangles.is_none() {
            bail!("no definitions file given\n\n{}", USAGE);
        }
        if config.width == 0 || config.height == 0 {
            bail!("output size must be non-zero, got {}x{}", config.width, config.height);
        }
        config.screen_size()?;
        if config.threads == 0 {
            config.threads = num_cpus::get();
        }
        Ok(Command::Render(config))
    }

    /// Output size as image dimensions. Each side must fit an `i32` (BMP header and
    /// window size) and the pixel count must fit a `u32`.
    pub fn screen_size(&self) -> Result<(u32, u32)> {
        let width = i32::try_from(self.width).with_context(|| format!("width {} is too large", self.width))?;
        let height = i32::try_from(self.height).with_context(|| format!("height {} is too large", self.height))?;
        let (width, height) = (width as u32, height as u32);
        if width.checked_mul(height).is_none() {
            bail!("output size {}x{} has too many pixels", width, height);
        }
        Ok((width, height))
    }
}
