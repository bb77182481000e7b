use std::path::PathBuf;
use std::process;

use clap::Parser;

use faceplay_core::app::app_loop::App;
use faceplay_core::app::loop_logger::StatsLoopLogger;
use faceplay_core::detection::domain::face_metrics::FaceMetrics;
use faceplay_core::games::domain::game_registry::GameRegistry;
use faceplay_core::games::infrastructure::entry_points::{EntryPointSource, EntryPointTable};
use faceplay_core::games::infrastructure::local_games::LocalGameSource;
use faceplay_core::input::domain::input_event::ProviderKind;
use faceplay_core::input::domain::provider_config::ProviderConfig;
use faceplay_core::input::infrastructure::face_sampler::Sample;
use faceplay_core::input::infrastructure::provider_factory::{create_face_sampler, create_provider};
use faceplay_core::runtime::infrastructure::terminal_runtime::TerminalRuntime;
use faceplay_core::shared::constants::ENTRY_POINT_NAMESPACE;
use faceplay_core::shared::settings::Settings;

/// Frames read before `--probe` gives up on the camera.
const PROBE_ATTEMPTS: u32 = 30;

/// Play small retro games in the terminal with your face.
#[derive(Parser, Debug)]
#[command(name = "faceplay", version)]
struct Cli {
    /// Start this game directly instead of showing the menu.
    #[arg(long)]
    game: Option<String>,

    /// Input provider: mediapipe_face or keyboard.
    #[arg(long, default_value = "mediapipe_face")]
    provider: String,

    /// Print the discovered games and exit.
    #[arg(long)]
    list: bool,

    /// Frames per second for the game loop.
    #[arg(long)]
    fps: Option<u32>,

    /// Camera index.
    #[arg(long)]
    camera: Option<u32>,

    /// Camera device path or name; overrides --camera.
    #[arg(long)]
    camera_device: Option<String>,

    /// Face landmark model (.onnx).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Download URL used when the model is not found locally.
    #[arg(long)]
    model_url: Option<String>,

    /// Run the model on every (N+1)-th camera frame.
    #[arg(long)]
    frame_skip: Option<u32>,

    /// Eye closure needed for Primary (0.0-1.0).
    #[arg(long)]
    blink_threshold: Option<f64>,

    /// Mouth openness needed for Secondary (0.0-1.0).
    #[arg(long)]
    mouth_threshold: Option<f64>,

    /// Head roll in degrees needed for Left/Right.
    #[arg(long)]
    tilt_threshold: Option<f64>,

    /// The camera image is already mirrored.
    #[arg(long)]
    mirror: bool,

    /// Run face inference on a background thread.
    #[arg(long)]
    threaded_inference: bool,

    /// Print per-stage frame timings on exit.
    #[arg(long)]
    stats: bool,

    /// Capture one frame, print the face metrics and exit.
    #[arg(long)]
    probe: bool,

    /// Store the effective tuning options as the new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let kind: ProviderKind = cli.provider.parse()?;

    let mut settings = Settings::load();
    apply_overrides(&cli, &mut settings);
    validate(&settings)?;
    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }

    let registry = discover_games();
    if cli.list {
        print!("{}", format_game_list(&registry));
        return Ok(());
    }

    let config = settings.provider_config();
    if cli.probe {
        return run_probe(&config);
    }

    let factory = move || create_provider(kind);
    let mut app = App::new(registry, kind, Box::new(factory), config);
    if cli.stats {
        app = app.with_logger(Box::new(StatsLoopLogger::new()));
    }
    // Acquire the provider before taking over the terminal so failures print
    // plainly.
    if let Some(name) = &cli.game {
        app.launch(name)?;
    }

    let mut runtime = TerminalRuntime::start(settings.fps)?;
    let result = app.run(&mut runtime);
    drop(runtime);

    if cli.stats {
        if let Some(summary) = app.logger().summary() {
            eprintln!("{summary}");
        }
    }
    result?;
    Ok(())
}

fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(fps) = cli.fps {
        settings.fps = fps;
    }
    if let Some(index) = cli.camera {
        settings.camera_index = index;
        settings.camera_device = None;
    }
    if let Some(device) = &cli.camera_device {
        settings.camera_device = Some(device.clone());
    }
    if let Some(model) = &cli.model {
        settings.model_path = Some(model.clone());
    }
    if let Some(url) = &cli.model_url {
        settings.model_url = Some(url.clone());
    }
    if let Some(skip) = cli.frame_skip {
        settings.frame_skip = skip;
    }
    if let Some(t) = cli.blink_threshold {
        settings.thresholds.blink = t;
    }
    if let Some(t) = cli.mouth_threshold {
        settings.thresholds.mouth = t;
    }
    if let Some(t) = cli.tilt_threshold {
        settings.thresholds.tilt_degrees = t;
    }
    settings.mirror |= cli.mirror;
    settings.threaded_inference |= cli.threaded_inference;
}

fn validate(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !(1..=120).contains(&settings.fps) {
        return Err(format!("FPS must be between 1 and 120, got {}", settings.fps).into());
    }
    let t = &settings.thresholds;
    for (name, value) in [("Blink", t.blink), ("Mouth", t.mouth), ("Smile", t.smile)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} threshold must be between 0.0 and 1.0, got {value}").into());
        }
    }
    if !(0.0..=90.0).contains(&t.tilt_degrees) {
        return Err(format!(
            "Tilt threshold must be between 0 and 90 degrees, got {}",
            t.tilt_degrees
        )
        .into());
    }
    Ok(())
}

/// Built-in games plus everything registered by game packages.
fn discover_games() -> GameRegistry {
    let mut table = EntryPointTable::new();
    faceplay_arcade::register(&mut table);
    let packages = EntryPointSource::new(&table, ENTRY_POINT_NAMESPACE);
    GameRegistry::discover(&[&LocalGameSource, &packages])
}

fn format_game_list(registry: &GameRegistry) -> String {
    if registry.is_empty() {
        return "No games found.\n".to_string();
    }
    registry
        .descriptors()
        .map(|d| format!("- {} ({})\n", d.name, d.origin))
        .collect()
}

fn run_probe(config: &ProviderConfig) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Probing {}", config.camera.describe());
    let mut sampler = create_face_sampler(config);
    sampler.open(&config.camera)?;
    let sample = sampler.probe(PROBE_ATTEMPTS);
    sampler.close();

    match sample {
        Sample::Face(metrics) => {
            print!("{}", format_metrics(&metrics));
            Ok(())
        }
        Sample::NoFace => Err("No face found in the captured frame".into()),
        _ => Err(format!("Could not read a frame from {}", config.camera.describe()).into()),
    }
}

fn format_metrics(m: &FaceMetrics) -> String {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
    format!(
        "eye_closure:    {}\nmouth_openness: {}\nsmile:          {}\nroll_degrees:   {}\npitch_ratio:    {}\n",
        fmt(m.eye_closure),
        fmt(m.mouth_openness),
        fmt(m.smile),
        fmt(m.roll_degrees),
        fmt(m.pitch_ratio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("faceplay").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_help_exits_zero() {
        let err = Cli::try_parse_from(["faceplay", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.game, None);
        assert_eq!(cli.provider, "mediapipe_face");
        assert!(!cli.list && !cli.probe && !cli.stats);
    }

    #[rstest]
    #[case("keyboard", true)]
    #[case("mediapipe_face", true)]
    #[case("bogus", false)]
    fn test_provider_names(#[case] name: &str, #[case] valid: bool) {
        let cli = parse(&["--provider", name]);
        assert_eq!(cli.provider.parse::<ProviderKind>().is_ok(), valid);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["faceplay", "--bogus"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_discovers_builtin_and_package_games() {
        let registry = discover_games();
        assert_eq!(registry.names(), vec!["reaction", "runner", "test"]);
        assert!(registry.instantiate("nosuchgame").is_err());
    }

    #[test]
    fn test_game_list_shows_origin() {
        let list = format_game_list(&discover_games());
        assert!(list.contains("- runner (local)\n"));
        assert!(list.contains("- reaction (faceplay-arcade)\n"));
        assert_eq!(format_game_list(&GameRegistry::new()), "No games found.\n");
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let cli = parse(&[
            "--fps",
            "60",
            "--camera",
            "2",
            "--blink-threshold",
            "0.7",
            "--tilt-threshold",
            "20",
            "--mirror",
        ]);
        let mut settings = Settings::default();
        settings.camera_device = Some("/dev/video9".into());

        apply_overrides(&cli, &mut settings);

        assert_eq!(settings.fps, 60);
        assert_eq!(settings.camera_index, 2);
        assert_eq!(settings.camera_device, None);
        assert_eq!(settings.thresholds.blink, 0.7);
        assert_eq!(settings.thresholds.tilt_degrees, 20.0);
        assert!(settings.mirror);
        assert!(validate(&settings).is_ok());
    }

    #[rstest]
    #[case(&["--fps", "0"])]
    #[case(&["--mouth-threshold", "1.5"])]
    #[case(&["--tilt-threshold=-3"])]
    fn test_out_of_range_values_fail_validation(#[case] args: &[&str]) {
        let cli = parse(args);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);
        assert!(validate(&settings).is_err());
    }

    #[rstest]
    #[case(&["--game", "nosuchgame", "--provider", "keyboard"])]
    #[case(&["--provider", "bogus"])]
    fn test_run_rejects_unknown_names(#[case] args: &[&str]) {
        assert!(run(parse(args)).is_err());
    }

    #[test]
    fn test_metrics_format_marks_missing_values() {
        let metrics = FaceMetrics {
            eye_closure: Some(0.25),
            ..FaceMetrics::default()
        };
        let text = format_metrics(&metrics);
        assert!(text.contains("eye_closure:    0.250"));
        assert!(text.contains("pitch_ratio:    -"));
    }
}
