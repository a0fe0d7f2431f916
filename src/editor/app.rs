use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use eframe::egui::{self, Color32, RichText};

use crate::{
    editor::{
        config::EditorConfig,
        materials_tool::{MaterialsAction, MaterialsTool},
        project_tool::{ProjectAction, ProjectTool},
    },
    engine::{AssetSource, FieldValue, ProjectLink, ProjectLoader},
    grid::{PropertyGrid, PropertyRow},
    import::{
        ImportRequest, default_mesh_import_dir, default_texture_import_dir, import_mesh,
        import_texture,
    },
    tree::AssetTree,
};

pub struct EditorApp {
    link: ProjectLink,
    tree: AssetTree,
    materials_tree: AssetTree,
    project_tool: ProjectTool,
    materials_tool: MaterialsTool,
    inspected: Option<String>,
    status: Option<StatusMessage>,
    import_dialog: Option<ImportDialog>,
    config: EditorConfig,
    config_path: PathBuf,
}

impl EditorApp {
    pub fn new(link: ProjectLink, config: EditorConfig, config_path: PathBuf) -> Self {
        let tree = AssetTree::build(&link);
        let materials_tree = tree.filtered_by_type("MaterialAsset");
        Self {
            link,
            tree,
            materials_tree,
            project_tool: ProjectTool::default(),
            materials_tool: MaterialsTool::default(),
            inspected: None,
            status: None,
            import_dialog: None,
            config,
            config_path,
        }
    }

    /// Discards and rebuilds the display hierarchy from the asset database.
    fn refresh_tree(&mut self) {
        self.tree = AssetTree::build(&self.link);
        self.materials_tree = self.tree.filtered_by_type("MaterialAsset");
    }

    fn prune_status(&mut self) {
        if let Some(status) = &self.status {
            if status.expired() {
                self.status = None;
            }
        }
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status = Some(StatusMessage::new(kind, message));
    }

    fn save_project(&mut self) {
        match self.link.save_blocking() {
            Ok(()) => self.set_status(StatusKind::Info, "Project saved"),
            Err(err) => self.set_status(StatusKind::Error, format!("Failed to save: {err}")),
        }
    }

    fn reload_project(&mut self) {
        let root = self.link.root().to_path_buf();
        match ProjectLoader::load_blocking(&root) {
            Ok(link) => {
                self.link = link;
                self.refresh_tree();
                self.inspected = None;
                self.project_tool.selection = None;
                self.materials_tool.selected = None;
                self.set_status(StatusKind::Info, "Reloaded project");
            }
            Err(err) => self.set_status(StatusKind::Error, format!("Failed to reload: {err}")),
        }
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Kura Editor");
            ui.separator();
            ui.label(self.link.root().display().to_string());
            ui.separator();
            let dirty = self.link.is_dirty();
            let label = if dirty { "● Dirty" } else { "● Saved" };
            let color = if dirty {
                Color32::from_rgb(235, 111, 111)
            } else {
                Color32::from_rgb(116, 185, 120)
            };
            ui.label(RichText::new(label).color(color));
            if ui
                .add_enabled(dirty, egui::Button::new("Save"))
                .on_hover_text("Write edited asset definitions to disk")
                .clicked()
            {
                self.save_project();
            }
            if ui
                .button("Reload")
                .on_hover_text("Reload the project from disk")
                .clicked()
            {
                self.reload_project();
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(status) = &self.status {
                    let text = RichText::new(&status.text).color(status.color());
                    ui.label(text);
                }
            });
        });
    }

    fn handle_project_action(&mut self, action: ProjectAction) {
        match action {
            ProjectAction::SelectAsset { asset_id } => {
                self.inspected = Some(asset_id);
            }
            ProjectAction::ImportMesh { module_id } => {
                // An unloaded module means there is nothing to import into.
                let Some(module) = self.link.find_loaded_module(&module_id) else {
                    return;
                };
                self.import_dialog = Some(ImportDialog::new(
                    ImportKind::Mesh,
                    module_id,
                    default_mesh_import_dir(module),
                ));
            }
            ProjectAction::ImportTexture { module_id } => {
                let Some(module) = self.link.find_loaded_module(&module_id) else {
                    return;
                };
                self.import_dialog = Some(ImportDialog::new(
                    ImportKind::Texture,
                    module_id,
                    default_texture_import_dir(module),
                ));
            }
        }
    }

    fn handle_materials_action(&mut self, action: MaterialsAction) {
        match action {
            MaterialsAction::SelectMaterial { asset_id } => {
                self.inspected = Some(asset_id);
            }
            MaterialsAction::CreateMaterial { module_id, name } => {
                match crate::import::create_material(&mut self.link, &module_id, &name) {
                    Ok(created) => {
                        self.refresh_tree();
                        self.materials_tool.selected = Some(created.asset_id.clone());
                        self.inspected = Some(created.asset_id.clone());
                        self.set_status(
                            StatusKind::Info,
                            format!("Created material '{}'", created.asset_id),
                        );
                    }
                    Err(err) => self.set_status(StatusKind::Error, format!("{err}")),
                }
            }
        }
    }

    fn draw_inspector(&mut self, ui: &mut egui::Ui) {
        ui.heading("Inspector");
        let Some(asset_id) = self.inspected.clone() else {
            ui.label("Select an asset to edit");
            return;
        };
        let Some(asset) = self.link.asset_base(&asset_id) else {
            // Stale selection after a reload; skip quietly.
            ui.label("Asset is no longer declared");
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(&asset_id);
            ui.label(RichText::new(&asset.asset_type).monospace());
        });
        ui.separator();

        let grid = PropertyGrid::from_asset(asset);
        if grid.is_empty() {
            ui.label("No editable fields");
            return;
        }

        let mut edits: Vec<(String, FieldValue)> = Vec::new();
        egui::Grid::new("asset_property_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for row in &grid.rows {
                    match row {
                        PropertyRow::Category(name) => {
                            ui.label(RichText::new(name).strong());
                            ui.end_row();
                        }
                        PropertyRow::Bool { name, value } => {
                            ui.label(name);
                            let mut working = *value;
                            if ui.checkbox(&mut working, "").changed() {
                                edits.push((name.clone(), FieldValue::Bool(working)));
                            }
                            ui.end_row();
                        }
                        PropertyRow::Text { name, value } => {
                            ui.label(name);
                            let mut working = value.clone();
                            if ui.text_edit_singleline(&mut working).changed() {
                                edits.push((name.clone(), FieldValue::Text(working)));
                            }
                            ui.end_row();
                        }
                    }
                }
            });

        for (field, value) in edits {
            self.link.set_asset_field(&asset_id, &field, value);
        }
    }

    fn show_import_dialog(&mut self, ctx: &egui::Context) {
        if let Some(mut dialog) = self.import_dialog.take() {
            let mut submitted = false;
            egui::Window::new(dialog.title())
                .open(&mut dialog.open)
                .collapsible(false)
                .show(ctx, |ui| {
                    ui.label(format!("Module: {}", dialog.module_id));
                    ui.separator();

                    ui.label("Asset ID");
                    ui.text_edit_singleline(&mut dialog.asset_name);

                    ui.label("Source file");
                    ui.horizontal(|ui| {
                        let label = dialog
                            .source_file
                            .as_ref()
                            .map(|path| path.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string());
                        ui.label(RichText::new(label).monospace());
                        if ui.button("Browse...").clicked() {
                            if let Some(picked) = dialog.kind.file_dialog().pick_file() {
                                dialog.source_file = Some(picked);
                            }
                        }
                    });

                    ui.label("Import directory");
                    ui.text_edit_singleline(&mut dialog.import_dir);
                    ui.checkbox(&mut dialog.copy_file, "Copy file into import directory");

                    ui.separator();
                    let ready = dialog.source_file.is_some() && !dialog.asset_name.trim().is_empty();
                    if ui
                        .add_enabled(ready, egui::Button::new("Import"))
                        .clicked()
                    {
                        submitted = true;
                    }
                });

            if submitted {
                self.run_import(&dialog);
            } else if dialog.open {
                self.import_dialog = Some(dialog);
            }
        }
    }

    fn run_import(&mut self, dialog: &ImportDialog) {
        let Some(source_file) = dialog.source_file.clone() else {
            return;
        };
        let request = ImportRequest {
            module_id: dialog.module_id.clone(),
            asset_name: dialog.asset_name.trim().to_string(),
            source_file,
            import_dir: PathBuf::from(dialog.import_dir.clone()),
            copy_file: dialog.copy_file,
        };
        let result = match dialog.kind {
            ImportKind::Mesh => import_mesh(&mut self.link, &request),
            ImportKind::Texture => import_texture(&mut self.link, &request),
        };
        match result {
            Ok(created) => {
                self.refresh_tree();
                self.inspected = Some(created.asset_id.clone());
                self.set_status(
                    StatusKind::Info,
                    format!("Imported '{}'", created.asset_id),
                );
            }
            Err(err) => self.set_status(StatusKind::Error, format!("Import failed: {err}")),
        }
    }

    /// Remembers the current window size so it lands in the saved config.
    fn track_window_size(&mut self, size: Option<egui::Vec2>) {
        if let Some(size) = size {
            if size.x > 0.0 && size.y > 0.0 {
                self.config.window_width = size.x;
                self.config.window_height = size.y;
            }
        }
    }

    fn persist_config(&mut self) {
        self.config.last_project = Some(self.link.root().to_path_buf());
        if let Err(err) = self.config.save(&self.config_path) {
            tracing::warn!(error = %err, "failed to save editor config");
        }
    }
}

impl eframe::App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.prune_status();
        self.track_window_size(ctx.input(|i| i.viewport().inner_rect.map(|rect| rect.size())));

        egui::TopBottomPanel::top("editor_top").show(ctx, |ui| self.draw_top_bar(ui));

        let project_action = egui::SidePanel::left("project_tool")
            .resizable(true)
            .min_width(240.0)
            .show(ctx, |ui| self.project_tool.ui(ui, &self.tree))
            .inner;
        if let Some(action) = project_action {
            self.handle_project_action(action);
        }

        let materials_action = egui::SidePanel::left("materials_tool")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.materials_tool
                    .ui(ui, &self.materials_tree, self.link.modules())
            })
            .inner;
        if let Some(action) = materials_action {
            self.handle_materials_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_inspector(ui));

        self.show_import_dialog(ctx);

        ctx.request_repaint_after(Duration::from_millis(200));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.persist_config();
    }
}

#[derive(Clone, Copy)]
enum ImportKind {
    Mesh,
    Texture,
}

impl ImportKind {
    fn file_dialog(&self) -> rfd::FileDialog {
        match self {
            ImportKind::Mesh => rfd::FileDialog::new()
                .add_filter("Mesh files", &["obj", "dae", "fbx", "gltf", "glb"]),
            ImportKind::Texture => rfd::FileDialog::new()
                .add_filter("Image files", &["png", "jpg", "jpeg", "tga", "dds"]),
        }
    }
}

struct ImportDialog {
    kind: ImportKind,
    module_id: String,
    asset_name: String,
    source_file: Option<PathBuf>,
    import_dir: String,
    copy_file: bool,
    open: bool,
}

impl ImportDialog {
    fn new(kind: ImportKind, module_id: String, import_dir: PathBuf) -> Self {
        Self {
            kind,
            module_id,
            asset_name: String::new(),
            source_file: None,
            import_dir: import_dir.display().to_string(),
            copy_file: true,
            open: true,
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ImportKind::Mesh => "Import Mesh",
            ImportKind::Texture => "Import Texture",
        }
    }
}

struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(6)
    }

    fn color(&self) -> Color32 {
        match self.kind {
            StatusKind::Info => Color32::from_rgb(116, 185, 120),
            StatusKind::Error => Color32::from_rgb(235, 111, 111),
        }
    }
}

#[derive(Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ProjectLoader, assets::ModuleManifest, io::write_json_file};

    fn test_app(root: &std::path::Path) -> EditorApp {
        let module_dir = root.join("base");
        std::fs::create_dir_all(&module_dir).unwrap();
        let manifest = ModuleManifest {
            module_id: "base".to_string(),
            version_id: 1,
            declared_assets: Vec::new(),
        };
        write_json_file(module_dir.join("module.json"), &manifest).unwrap();

        let link = ProjectLoader::load_blocking(root).unwrap();
        EditorApp::new(
            link,
            EditorConfig::default(),
            root.join("kura_editor.yaml"),
        )
    }

    #[test]
    fn window_size_survives_into_saved_config() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = test_app(tmp.path());

        app.track_window_size(Some(egui::vec2(1500.0, 900.0)));
        assert_eq!(app.config.window_width, 1500.0);
        assert_eq!(app.config.window_height, 900.0);

        // Minimized or missing viewports never clobber the stored size.
        app.track_window_size(None);
        app.track_window_size(Some(egui::vec2(0.0, 0.0)));
        assert_eq!(app.config.window_width, 1500.0);

        app.persist_config();
        let saved = EditorConfig::load(tmp.path().join("kura_editor.yaml"));
        assert_eq!(saved.window_width, 1500.0);
        assert_eq!(saved.window_height, 900.0);
        assert_eq!(saved.last_project, Some(tmp.path().to_path_buf()));
    }
}
