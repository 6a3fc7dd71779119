// External crates
use anyhow::{Context, Result};
use log::{error, info, LevelFilter, Log, Metadata, Record};
use rand::SeedableRng;
use rand::rngs::StdRng;

// STD library
use std::env;
use std::process;

// Internal imports
use scanraster::config::{Command, RenderConfig, USAGE};
use scanraster::{perf_scope, Rasterizer, Scene, ScreenSpace};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn load_scene(config: &RenderConfig) -> Result<Scene> {
    perf_scope!("load scene");
    let mut scene = match (config.random_triangles, &config.input) {
        (Some(count), _) => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let (width, height) = config.screen_size()?;
            Scene::random(count, width, height, &mut rng)
        }
        (None, Some(path)) => Scene::load(path)?,
        (None, None) => anyhow::bail!("nothing to render"),
    };
    if config.reorder {
        scene.reorder();
    }
    info!("Loaded {} triangles", scene.len());
    Ok(scene)
}

fn run(config: &RenderConfig) -> Result<()> {
    info!("Rendering {}x{} on {} threads", config.width, config.height, config.threads);

    // Build thread pool based on configured thread count
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .context("failed to build worker pool")?;

    let scene = load_scene(config)?;
    let materials = scene.materials();

    let (width, height) = config.screen_size()?;
    let mut screen = ScreenSpace::new(width, height);
    let mut rasterizer = Rasterizer::new(config.width, config.height).with_background(config.background);
    let stats = pool.install(|| rasterizer.render_parallel(&scene.triangles, &materials, &mut screen.pixels))?;
    stats.log_summary();

    {
        perf_scope!("save image");
        screen.save(&config.output)?;
    }
    info!("Saved {}", config.output.display());

    if config.window {
        show_window(&screen)?;
    }
    Ok(())
}

#[cfg(feature = "window")]
fn show_window(screen: &ScreenSpace) -> Result<()> {
    let width = screen.width as i32;
    let height = screen.height as i32;

    let (mut r1, thread) = raylib::init()
        .size(width, height)
        .title("Scanraster")
        .resizable()
        .build();
    r1.set_target_fps(60);

    let image = raylib::prelude::Image::gen_image_color(width, height, raylib::prelude::Color::BLACK);
    let mut texture = r1
        .load_texture_from_image(&thread, &image)
        .map_err(|e| anyhow::anyhow!("raylib texture loading failed: {:?}", e))?;
    texture
        .update_texture(&screen.to_rgba_bytes())
        .map_err(|e| anyhow::anyhow!("raylib texture upload failed: {:?}", e))?;

    while !r1.window_should_close() {
        if r1.is_key_pressed(raylib::consts::KeyboardKey::KEY_ESCAPE) {
            break;
        }
        let window_width = r1.get_screen_width();
        let window_height = r1.get_screen_height();

        let mut d = r1.begin_drawing(&thread);
        d.clear_background(raylib::prelude::Color::BLACK);
        d.draw_texture_pro(
            &texture,
            raylib::prelude::Rectangle { x: 0.0, y: 0.0, width: width as f32, height: height as f32 },
            raylib::prelude::Rectangle { x: 0.0, y: 0.0, width: window_width as f32, height: window_height as f32 },
            raylib::prelude::Vector2 { x: 0.0, y: 0.0 },
            0.0,
            raylib::prelude::Color::WHITE,
        );
    }
    Ok(())
}

#[cfg(not(feature = "window"))]
fn show_window(_screen: &ScreenSpace) -> Result<()> {
    log::warn!("--window ignored: built without the `window` feature");
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match RenderConfig::from_args(&args) {
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return;
        }
        Ok(Command::Render(config)) => config,
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(2);
        }
    };

    init_logging(config.log_level);
    if let Err(err) = run(&config) {
        error!("{:#}", err);
        process::exit(1);
    }
}
