use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use vc_scout::data::model::StartupRecord;
use vc_scout::data::number::format_investment;

use crate::app::VcScoutApp;
use crate::color::ColorMap;

/// What a click on a card asked for. Applied after the card list is drawn so
/// the list can borrow the state immutably.
enum CardAction {
    ToggleSelect(String),
    ToggleSave(String),
    LinkedIn(String),
    Details(String),
}

// ---------------------------------------------------------------------------
// Central panel – result cards
// ---------------------------------------------------------------------------

pub fn results(ui: &mut Ui, app: &mut VcScoutApp) {
    if app.state.loading && app.state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("🔍 Buscando startups...");
        });
        return;
    }
    if app.state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Digite o nome de um ou mais VCs para ver as startups investidas.");
        });
        return;
    }

    let mut actions = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for rec in app.state.visible_records() {
                let selected = app.state.is_selected(&rec.id);
                let saved = app.state.is_saved(&rec.id);
                card(ui, rec, selected, saved, app.view.show_raw, &app.colors, &mut actions);
                ui.add_space(6.0);
            }
        });

    let ctx = ui.ctx().clone();
    for action in actions {
        match action {
            CardAction::ToggleSelect(id) => app.state.toggle_selected(&id),
            CardAction::ToggleSave(id) => app.state.toggle_saved(&id),
            CardAction::LinkedIn(id) => app.open_linkedin(&ctx, &id),
            CardAction::Details(id) => {
                app.view.details = app.state.results.get(&id).cloned();
            }
        }
    }
}

fn card(
    ui: &mut Ui,
    rec: &StartupRecord,
    selected: bool,
    saved: bool,
    show_raw: bool,
    colors: &ColorMap,
    actions: &mut Vec<CardAction>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui: &mut Ui| {
            ui.label(RichText::new(rec.initials()).size(22.0).strong());
            ui.vertical(|ui: &mut Ui| {
                ui.heading(&rec.name);
                let desc = if rec.short_description.is_empty() {
                    "Sem descrição disponível."
                } else {
                    rec.short_description.as_str()
                };
                ui.label(RichText::new(desc).weak());
                ui.horizontal(|ui: &mut Ui| {
                    for tag in rec.tags() {
                        let color = if tag == rec.sector {
                            colors.color_for(tag)
                        } else {
                            Color32::GRAY
                        };
                        ui.label(RichText::new(tag).color(color).small());
                    }
                });
            });
        });

        egui::Grid::new(("card_meta", rec.id.as_str()))
            .num_columns(2)
            .spacing([16.0, 2.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("Valor do Investimento");
                ui.strong(format_investment(&rec.investment_value));
                ui.end_row();
                ui.label("Rodada");
                ui.label(&rec.round);
                ui.end_row();
                ui.label("Fundação");
                ui.label(rec.founding_year_label());
                ui.end_row();
                ui.label("Investimento");
                ui.label(&rec.investment_date);
                ui.end_row();
                ui.label("VC Investidor");
                ui.label(&rec.investor_name);
                ui.end_row();
            });

        ui.horizontal(|ui: &mut Ui| {
            let mut checked = selected;
            if ui.checkbox(&mut checked, "Selecionar").changed() {
                actions.push(CardAction::ToggleSelect(rec.id.clone()));
            }
            let label = if saved { "Salvo" } else { "Salvar" };
            if ui.selectable_label(saved, label).clicked() {
                actions.push(CardAction::ToggleSave(rec.id.clone()));
            }
            if ui.button("LinkedIn").clicked() {
                actions.push(CardAction::LinkedIn(rec.id.clone()));
            }
            if ui.button("Ver detalhes").clicked() {
                actions.push(CardAction::Details(rec.id.clone()));
            }
        });

        if show_raw {
            let raw = serde_json::to_string_pretty(&rec.raw).unwrap_or_default();
            ui.collapsing("Dados técnicos", |ui: &mut Ui| {
                ui.monospace(raw);
            });
        }
    });
}
