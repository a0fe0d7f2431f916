use std::path::PathBuf;

use eframe::egui;
use kura::editor::{EditorApp, EditorConfig, config::CONFIG_FILE_NAME};
use kura::engine::ProjectLoader;

fn main() -> eframe::Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    let config = EditorConfig::load(&config_path);
    let project_root = parse_project_root(&config);

    let link = match ProjectLoader::load_blocking(&project_root) {
        Ok(link) => link,
        Err(err) => {
            eprintln!(
                "Failed to load project at {}: {err}",
                project_root.display()
            );
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(egui::vec2(config.window_width, config.window_height))
            .with_min_inner_size(egui::vec2(960.0, 600.0)),
        ..Default::default()
    };

    let mut initial = Some((link, config, config_path));
    eframe::run_native(
        "Kura Editor",
        options,
        Box::new(move |_cc| {
            let (link, config, config_path) =
                initial.take().expect("editor state already taken");
            Box::new(EditorApp::new(link, config, config_path))
        }),
    )
}

fn parse_project_root(config: &EditorConfig) -> PathBuf {
    std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.last_project.clone())
        .unwrap_or_else(|| PathBuf::from("sample/project"))
}
