//! Materials Tool panel: material assets grouped by owning module, with a
//! per-module create flow.

use eframe::egui::{self, RichText};

use crate::engine::ModuleDefinition;
use crate::tree::AssetTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialsAction {
    SelectMaterial { asset_id: String },
    CreateMaterial { module_id: String, name: String },
}

#[derive(Default)]
pub struct MaterialsTool {
    pub selected: Option<String>,
    new_material_name: String,
    target_module: Option<String>,
}

impl MaterialsTool {
    /// `materials` is the asset tree restricted to `MaterialAsset`.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        materials: &AssetTree,
        modules: &[ModuleDefinition],
    ) -> Option<MaterialsAction> {
        ui.heading("Materials");

        let mut action = self.draw_create_row(ui, modules);
        ui.separator();

        egui::ScrollArea::vertical()
            .id_source("materials_tool_list")
            .show(ui, |ui| {
                for module in &materials.modules {
                    egui::CollapsingHeader::new(&module.module_id)
                        .default_open(true)
                        .show(ui, |ui| {
                            for category in &module.categories {
                                let mut entries = category.assets.clone();
                                entries.sort_by(|a, b| a.name.cmp(&b.name));
                                for asset in entries {
                                    let selected =
                                        self.selected.as_deref() == Some(&asset.asset_id);
                                    if ui
                                        .selectable_label(
                                            selected,
                                            RichText::new(&asset.name).monospace(),
                                        )
                                        .clicked()
                                    {
                                        self.selected = Some(asset.asset_id.clone());
                                        action = Some(MaterialsAction::SelectMaterial {
                                            asset_id: asset.asset_id.clone(),
                                        });
                                    }
                                }
                            }
                        });
                }
            });

        action
    }

    fn draw_create_row(
        &mut self,
        ui: &mut egui::Ui,
        modules: &[ModuleDefinition],
    ) -> Option<MaterialsAction> {
        if self.target_module.is_none() {
            self.target_module = modules.first().map(|module| module.module_id.clone());
        }

        let mut action = None;
        ui.horizontal(|ui| {
            let current = self.target_module.clone().unwrap_or_default();
            egui::ComboBox::from_id_source("materials_target_module")
                .selected_text(&current)
                .show_ui(ui, |ui| {
                    for module in modules {
                        ui.selectable_value(
                            &mut self.target_module,
                            Some(module.module_id.clone()),
                            &module.module_id,
                        );
                    }
                });
            ui.add(
                egui::TextEdit::singleline(&mut self.new_material_name)
                    .hint_text("new material")
                    .desired_width(120.0),
            );
            if ui.button("Add").clicked() {
                if let Some(module_id) = self.target_module.clone() {
                    action = Some(MaterialsAction::CreateMaterial {
                        module_id,
                        name: self.new_material_name.trim().to_string(),
                    });
                    self.new_material_name.clear();
                }
            }
        });
        action
    }
}
