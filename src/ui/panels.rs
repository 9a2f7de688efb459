use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use vc_scout::data::number::format_currency;
use vc_scout::state::NotificationKind;

use crate::app::VcScoutApp;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar – menu, search form, suggestions, notification
// ---------------------------------------------------------------------------

/// Render the top menu and search form.
pub fn top_bar(ui: &mut Ui, app: &mut VcScoutApp) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir resultados…").clicked() {
                app.open_file();
                ui.close_menu();
            }
            if ui.button("Exportar CSV…").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Histórico").clicked() {
            app.toggle_history();
        }
        ui.checkbox(&mut app.view.show_raw, "Dados técnicos");

        if let Some(n) = &app.state.notification {
            let color = match n.kind {
                NotificationKind::Success => Color32::from_rgb(0x10, 0xb9, 0x81),
                NotificationKind::Error => Color32::RED,
            };
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                ui.label(RichText::new(&n.message).color(color).strong());
            });
        }
    });

    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut app.view.query)
                .hint_text("Sequoia Capital, Kaszek, …  (Ctrl+K)")
                .desired_width(420.0),
        );
        if app.view.focus_search {
            input.request_focus();
            app.view.focus_search = false;
        }
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.checkbox(&mut app.view.deep_search, "Pesquisa profunda");

        let button = ui.add_enabled(!app.state.loading, egui::Button::new("Buscar"));
        if (button.clicked() || submitted) && !app.state.loading {
            app.search();
        }
        if app.state.loading {
            ui.spinner();
            ui.label("Buscando startups...");
        }
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(RichText::new("Sugestões:").weak());
        for name in app.suggestions.clone() {
            if ui.small_button(&name).clicked() {
                app.view.query = name;
                app.view.focus_search = true;
            }
        }
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Bottom bar – selection and favorites
// ---------------------------------------------------------------------------

pub fn bottom_bar(ui: &mut Ui, app: &mut VcScoutApp) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{} selecionada(s)", app.state.selected.len()));

        if ui
            .add_enabled(app.state.can_compare(), egui::Button::new("Comparar"))
            .clicked()
        {
            app.open_comparison();
        }
        if ui
            .add_enabled(!app.state.selected.is_empty(), egui::Button::new("Salvar selecionadas"))
            .clicked()
        {
            app.state.save_selected();
        }
        if ui.button("Limpar favoritos").clicked() {
            app.state.clear_saved();
        }

        ui.separator();
        ui.label(format!("{} favorito(s)", app.state.saved.len()));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.button("Exportar CSV").clicked() {
                app.export_csv();
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Left side panel – stats, sector chart, filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, app: &mut VcScoutApp) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            stats(ui, app);
            ui.separator();

            ui.strong("Setores");
            plot::sector_chart(ui, &app.state.summary, &app.colors);
            ui.separator();

            filters(ui, app);

            if let Some(meta) = &app.state.deep_metadata {
                ui.separator();
                ui.strong("Pesquisa profunda");
                if let Some(n) = meta.total_fontes {
                    ui.label(format!("Fontes consultadas: {n}"));
                }
                if let Some(n) = meta.total_startups {
                    ui.label(format!("Startups encontradas: {n}"));
                }
                if !meta.vcs_pesquisadas.is_empty() {
                    ui.label(format!("VCs pesquisadas: {}", meta.vcs_pesquisadas.len()));
                }
                if let Some(q) = &meta.query_aprofundamento {
                    ui.label(format!("Consulta: {q}"));
                }
            }
        });
}

fn stats(ui: &mut Ui, app: &VcScoutApp) {
    let summary = &app.state.summary;
    egui::Grid::new("stats_grid")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Startups");
            ui.strong(summary.total_startups.to_string());
            ui.end_row();

            ui.label("Valor total");
            let total = if summary.total_value != 0 {
                format_currency(summary.total_value)
            } else {
                "—".to_string()
            };
            ui.strong(total);
            ui.end_row();

            ui.label("VCs");
            let vcs = if summary.total_vcs > 0 {
                summary.total_vcs.to_string()
            } else {
                "—".to_string()
            };
            ui.strong(vcs);
            ui.end_row();
        });
}

fn filters(ui: &mut Ui, app: &mut VcScoutApp) {
    ui.heading("Filtros");

    let mut edited = false;
    let filters = &mut app.state.filters;
    egui::Grid::new("filter_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Fundação de");
            edited |= ui.text_edit_singleline(&mut filters.year_from).changed();
            ui.end_row();

            ui.label("Fundação até");
            edited |= ui.text_edit_singleline(&mut filters.year_to).changed();
            ui.end_row();

            ui.label("Setor");
            edited |= ui.text_edit_singleline(&mut filters.sector).changed();
            ui.end_row();

            ui.label("Valor mín.");
            edited |= ui
                .add(egui::TextEdit::singleline(&mut filters.min_value).hint_text("500k"))
                .changed();
            ui.end_row();

            ui.label("Valor máx.");
            edited |= ui
                .add(egui::TextEdit::singleline(&mut filters.max_value).hint_text("10M"))
                .changed();
            ui.end_row();
        });

    if edited {
        app.state.filters_edited(Instant::now());
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Limpar filtros").clicked() {
            app.state.clear_filters();
        }
        ui.label(format!(
            "{} de {} visíveis",
            app.state.visible_indices.len(),
            app.state.results.len()
        ));
    });
}
