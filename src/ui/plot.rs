use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use vc_scout::data::stats::Summary;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Sector histogram (left panel)
// ---------------------------------------------------------------------------

/// Horizontal bar chart of the top sectors, largest on top.
pub fn sector_chart(ui: &mut Ui, summary: &Summary, colors: &ColorMap) {
    let top = summary.top_sectors();
    if top.is_empty() {
        ui.label(RichText::new("Sem dados para exibir").weak());
        return;
    }

    let n = top.len();
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new((n - 1 - i) as f64, s.count as f64)
                .name(format!("{} ({})", s.sector, s.count))
                .fill(colors.color_for(&s.sector))
                .width(0.7)
        })
        .collect();

    // axis labels, indexed by bar position
    let labels: Vec<String> = top.iter().rev().map(|s| s.sector.clone()).collect();

    Plot::new("sector_chart")
        .height(30.0 * n as f32 + 30.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .show_grid(false)
        .include_x(0.0)
        .y_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}
