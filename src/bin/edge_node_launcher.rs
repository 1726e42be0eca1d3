use eframe::egui;
use edge_node_launcher::config::LauncherConfig;
use edge_node_launcher::docker::{ContainerRuntime, DockerCli};
use edge_node_launcher::gui::LauncherApp;
use edge_node_launcher::icon::load_icon;
use edge_node_launcher::launcher::Launcher;
use std::env;

const WINDOW_TITLE: &str = "Edge Node Launcher";

fn fail(message: &str) -> ! {
    log::error!("{}", message);
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(WINDOW_TITLE)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
    std::process::exit(1);
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,edge_node_launcher=info"),
    )
    .format_timestamp_secs()
    .init();

    let mut config = match LauncherConfig::from_env() {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };

    // Optional volume path argument
    let args: Vec<String> = env::args().collect();
    if let Some(volume) = args.get(1) {
        config = config.with_volume_path(volume);
    }

    let docker = DockerCli::new(&config);
    if let Err(e) = docker.check() {
        fail(&format!("Docker is not available: {}\nPlease install and start Docker.", e));
    }

    log::info!(
        "Monitoring {} (volume {})",
        config.container_name,
        config.volume_path.display()
    );

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([1800.0, 1100.0])
        .with_min_inner_size([1000.0, 700.0])
        .with_maximized(true)
        .with_app_id("edge_node_launcher");
    if let Some(icon) = load_icon() {
        viewport = viewport.with_icon(icon);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            let launcher = Launcher::new(config, docker);
            Ok(Box::new(LauncherApp::new(cc, launcher)))
        }),
    )
}
