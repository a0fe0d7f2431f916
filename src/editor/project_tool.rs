//! Project Tool panel: the module → category → asset browser with the module
//! context menu.

use eframe::egui::{self, RichText};

use crate::tree::{AssetTree, NodeKind};

/// What the user asked for this frame, handled by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    SelectAsset { asset_id: String },
    ImportMesh { module_id: String },
    ImportTexture { module_id: String },
}

#[derive(Default)]
pub struct ProjectTool {
    pub selection: Option<NodeKind>,
}

impl ProjectTool {
    pub fn ui(&mut self, ui: &mut egui::Ui, tree: &AssetTree) -> Option<ProjectAction> {
        ui.heading("Project");
        ui.label(format!(
            "{} module(s), {} asset(s)",
            tree.modules.len(),
            tree.asset_count()
        ));
        ui.separator();

        if tree.is_empty() {
            ui.label("No declared assets");
            return None;
        }

        let mut action = None;
        egui::ScrollArea::vertical()
            .id_source("project_tool_tree")
            .show(ui, |ui| {
                for module in &tree.modules {
                    let header = egui::CollapsingHeader::new(format!(
                        "{} (v{})",
                        module.module_id, module.version
                    ))
                    .default_open(true)
                    .show(ui, |ui| {
                        for category in &module.categories {
                            egui::CollapsingHeader::new(format!(
                                "{} ({})",
                                category.label,
                                category.assets.len()
                            ))
                            .default_open(true)
                            .show(ui, |ui| {
                                for asset in &category.assets {
                                    let selected = matches!(
                                        &self.selection,
                                        Some(NodeKind::Asset { asset_id })
                                            if *asset_id == asset.asset_id
                                    );
                                    if ui
                                        .selectable_label(
                                            selected,
                                            RichText::new(&asset.name).monospace(),
                                        )
                                        .clicked()
                                    {
                                        self.selection = Some(NodeKind::Asset {
                                            asset_id: asset.asset_id.clone(),
                                        });
                                        action = Some(ProjectAction::SelectAsset {
                                            asset_id: asset.asset_id.clone(),
                                        });
                                    }
                                }
                            });
                        }
                    });

                    header.header_response.context_menu(|ui| {
                        if ui.button("Import Mesh...").clicked() {
                            self.selection = Some(NodeKind::Module {
                                module_id: module.module_id.clone(),
                            });
                            action = Some(ProjectAction::ImportMesh {
                                module_id: module.module_id.clone(),
                            });
                            ui.close_menu();
                        }
                        if ui.button("Import Texture...").clicked() {
                            self.selection = Some(NodeKind::Module {
                                module_id: module.module_id.clone(),
                            });
                            action = Some(ProjectAction::ImportTexture {
                                module_id: module.module_id.clone(),
                            });
                            ui.close_menu();
                        }
                    });
                }
            });

        action
    }
}
