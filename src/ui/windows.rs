use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use serde_json::Value as JsonValue;

use vc_scout::data::model::StartupRecord;
use vc_scout::data::number::format_investment;
use vc_scout::state::HistoryView;

use crate::app::VcScoutApp;

// ---------------------------------------------------------------------------
// Details window
// ---------------------------------------------------------------------------

pub fn details_window(ctx: &egui::Context, app: &mut VcScoutApp) {
    let Some(rec) = app.view.details.clone() else {
        return;
    };
    let mut open = true;
    egui::Window::new(&rec.name)
        .id(egui::Id::new("details_window"))
        .open(&mut open)
        .collapsible(false)
        .default_width(520.0)
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(rec.short_description_or_default()).weak());
            ui.horizontal(|ui: &mut Ui| {
                for tag in rec.tags() {
                    ui.label(RichText::new(tag).small().strong());
                }
            });
            ui.separator();

            ui.strong("📊 Informações do Investimento");
            egui::Grid::new("details_investment").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Valor do Investimento");
                ui.strong(format_investment(&rec.investment_value));
                ui.end_row();
                ui.label("Rodada");
                ui.label(&rec.round);
                ui.end_row();
                ui.label("Data do Investimento");
                ui.label(&rec.investment_date);
                ui.end_row();
                ui.label("VC Investidor");
                ui.label(&rec.investor_name);
                ui.end_row();
            });
            ui.separator();

            ui.strong("🏢 Informações da Empresa");
            egui::Grid::new("details_company").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("Setor");
                ui.label(&rec.sector);
                ui.end_row();
                ui.label("Ano de Fundação");
                ui.label(rec.founding_year_label());
                ui.end_row();
                ui.label("Website");
                if rec.site.is_empty() {
                    ui.label("—");
                } else {
                    ui.hyperlink(&rec.site);
                }
                ui.end_row();
                ui.label("LinkedIn do Fundador");
                if rec.has_linkedin() {
                    ui.hyperlink_to("Ver perfil", &rec.founder_linkedin);
                } else {
                    ui.label("—");
                }
                ui.end_row();
            });
            ui.separator();

            ui.collapsing("🔧 Dados Técnicos", |ui: &mut Ui| {
                ScrollArea::vertical().max_height(300.0).show(ui, |ui: &mut Ui| {
                    ui.monospace(serde_json::to_string_pretty(&rec.raw).unwrap_or_default());
                });
            });
        });
    if !open {
        app.view.details = None;
    }
}

trait DescriptionExt {
    fn short_description_or_default(&self) -> &str;
}

impl DescriptionExt for StartupRecord {
    fn short_description_or_default(&self) -> &str {
        if self.short_description.is_empty() {
            "Sem descrição disponível."
        } else {
            &self.short_description
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison window
// ---------------------------------------------------------------------------

pub fn compare_window(ctx: &egui::Context, app: &mut VcScoutApp) {
    let Some(items) = &app.view.comparison else {
        return;
    };
    let mut open = true;
    egui::Window::new("Comparar startups")
        .open(&mut open)
        .collapsible(false)
        .default_width(640.0)
        .show(ctx, |ui: &mut Ui| {
            let rows: [(&str, fn(&StartupRecord) -> String); 6] = [
                ("Setor", |r| r.sector.clone()),
                ("Fundação", |r| r.founding_year_label()),
                ("Rodada", |r| r.round.clone()),
                ("Valor", |r| format_investment(&r.investment_value)),
                ("VC", |r| r.investor_name.clone()),
                ("Descrição", |r| r.short_description.clone()),
            ];

            ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .column(Column::auto())
                    .columns(Column::initial(160.0).resizable(true), items.len())
                    .header(22.0, |mut header| {
                        header.col(|_ui| {});
                        for rec in items {
                            header.col(|ui: &mut Ui| {
                                ui.strong(&rec.name);
                            });
                        }
                    })
                    .body(|mut body| {
                        for (label, field) in rows {
                            body.row(20.0, |mut row| {
                                row.col(|ui: &mut Ui| {
                                    ui.label(RichText::new(label).strong());
                                });
                                for rec in items {
                                    row.col(|ui: &mut Ui| {
                                        ui.label(field(rec));
                                    });
                                }
                            });
                        }
                        body.row(20.0, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.label(RichText::new("LinkedIn").strong());
                            });
                            for rec in items {
                                row.col(|ui: &mut Ui| {
                                    if rec.has_linkedin() {
                                        ui.hyperlink_to("Ver perfil", &rec.founder_linkedin);
                                    } else {
                                        ui.label("—");
                                    }
                                });
                            }
                        });
                    });
            });
        });
    if !open {
        app.view.comparison = None;
    }
}

// ---------------------------------------------------------------------------
// History panel (right side)
// ---------------------------------------------------------------------------

pub fn history_panel(ui: &mut Ui, app: &mut VcScoutApp) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Histórico");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.small_button("✕").clicked() {
                app.state.close_history();
            }
        });
    });
    ui.separator();

    let mut load: Option<JsonValue> = None;
    match &app.state.history {
        HistoryView::Closed => {}
        HistoryView::Loading => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Carregando histórico...");
            });
        }
        HistoryView::Failed(message) => {
            ui.label(RichText::new(message).weak());
        }
        HistoryView::Loaded(entries) if entries.is_empty() => {
            ui.label(RichText::new("Nenhuma pesquisa no histórico.").weak());
        }
        HistoryView::Loaded(entries) => {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for entry in entries {
                    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                        ui.set_width(ui.available_width());
                        ui.strong(&entry.vc_list);
                        ui.label(
                            RichText::new(format!("{} startups encontradas", entry.startup_count()))
                                .weak(),
                        );
                        if entry.tipo_pesquisa.as_deref() == Some("profunda") {
                            ui.label(RichText::new("pesquisa profunda").small());
                        }
                        if ui.button("Carregar").clicked() {
                            load = Some(entry.id.clone());
                        }
                    });
                }
            });
        }
    }

    if let Some(id) = load {
        app.state.load_history_item(&id);
    }
}
