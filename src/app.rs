use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use vc_scout::api::{SearchBackend, SearchMode};
use vc_scout::data::model::StartupRecord;
use vc_scout::export::default_export_file_name;
use vc_scout::state::{AppState, HistoryView};
use vc_scout::worker::{Worker, WorkerEvent};

use crate::color::ColorMap;
use crate::ui::{cards, panels, windows};

// ---------------------------------------------------------------------------
// View-only state (what is open, what is typed)
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ViewState {
    /// Search box contents: comma-separated VC names.
    pub query: String,
    pub deep_search: bool,
    /// Show each card's raw source JSON.
    pub show_raw: bool,
    pub details: Option<StartupRecord>,
    pub comparison: Option<Vec<StartupRecord>>,
    /// Move keyboard focus to the search box on the next frame.
    pub focus_search: bool,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VcScoutApp {
    pub state: AppState,
    pub view: ViewState,
    pub suggestions: Vec<String>,
    pub colors: ColorMap,
    worker: Worker,
}

impl VcScoutApp {
    pub fn new(
        ctx: &egui::Context,
        state: AppState,
        backend: Arc<dyn SearchBackend>,
        suggestions: Vec<String>,
    ) -> Self {
        let repaint = ctx.clone();
        let worker = Worker::new(backend).with_waker(move || repaint.request_repaint());
        Self {
            state,
            view: ViewState::default(),
            suggestions,
            colors: ColorMap::default(),
            worker,
        }
    }

    /// Submit the search box.
    pub fn search(&mut self) {
        let mode = if self.view.deep_search {
            SearchMode::Deep
        } else {
            SearchMode::Normal
        };
        if let Some(ticket) = self.state.begin_search(&self.view.query, mode) {
            self.worker.spawn_search(ticket);
        }
    }

    pub fn toggle_history(&mut self) {
        if let Some(generation) = self.state.toggle_history() {
            self.worker.spawn_history(generation);
        }
    }

    pub fn export_csv(&mut self) {
        if !self.state.can_export() {
            return;
        }
        let file = rfd::FileDialog::new()
            .set_title("Exportar CSV")
            .set_file_name(default_export_file_name())
            .add_filter("CSV", &["csv"])
            .save_file();
        if let Some(path) = file {
            self.state.export_visible(&path);
        }
    }

    pub fn open_file(&mut self) {
        let file = rfd::FileDialog::new()
            .set_title("Abrir resultados salvos")
            .add_filter("Supported files", &["json", "csv"])
            .add_filter("JSON", &["json"])
            .add_filter("CSV", &["csv"])
            .pick_file();
        if let Some(path) = file {
            self.state.load_file(&path);
        }
    }

    pub fn open_linkedin(&mut self, ctx: &egui::Context, id: &str) {
        if let Some(url) = self.state.linkedin_url(id) {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }
    }

    pub fn open_comparison(&mut self) {
        self.view.comparison = self.state.comparison();
    }

    fn drain_worker(&mut self) {
        while let Some(event) = self.worker.try_recv() {
            match event {
                WorkerEvent::Search { ticket, result } => self.state.finish_search(ticket, result),
                WorkerEvent::History { generation, result } => {
                    self.state.finish_history(generation, result)
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (escape, focus) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.modifiers.command && i.key_pressed(egui::Key::K),
            )
        });
        if escape {
            self.view.details = None;
            self.view.comparison = None;
            self.state.close_history();
        }
        if focus {
            self.view.focus_search = true;
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        if let Some(wait) = self.state.pending_refilter_in(now) {
            ctx.request_repaint_after(wait);
        }
        if let Some(n) = &self.state.notification {
            ctx.request_repaint_after(n.expires_at.saturating_duration_since(now));
        }
    }
}

impl eframe::App for VcScoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker();
        let now = Instant::now();
        self.state.tick(now);
        self.colors = ColorMap::new(&self.state.summary.sectors);
        self.handle_shortcuts(ctx);

        // ---- Top panel: search bar + menu ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, self);
        });

        // ---- Bottom panel: selection actions ----
        egui::TopBottomPanel::bottom("bottom_bar").show(ctx, |ui| {
            panels::bottom_bar(ui, self);
        });

        // ---- Left side panel: stats, chart, filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, self);
            });

        // ---- Right side panel: search history ----
        if !matches!(self.state.history, HistoryView::Closed) {
            egui::SidePanel::right("history_panel")
                .default_width(280.0)
                .show(ctx, |ui| {
                    windows::history_panel(ui, self);
                });
        }

        // ---- Central panel: result cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::results(ui, self);
        });

        windows::details_window(ctx, self);
        windows::compare_window(ctx, self);

        self.schedule_repaint(ctx, now);
    }
}
