use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

use serde_json::Value as JsonValue;

use crate::api::{DeepMetadata, HistoryEntry, SearchMode, SearchReply};
use crate::data::filter::{filtered_indices, FilterConfig};
use crate::data::model::{ResultSet, StartupRecord};
use crate::data::normalize::normalize_payload;
use crate::data::stats::Summary;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::export;
use crate::favorites::{FavoritesRepository, SavedMap};
use crate::worker::SearchTicket;

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message ("toast").
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub expires_at: Instant,
}

// ---------------------------------------------------------------------------
// History panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub enum HistoryView {
    #[default]
    Closed,
    Loading,
    Loaded(Vec<HistoryEntry>),
    /// Shown inline in the panel, not as a notification.
    Failed(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the UI shows, independent of rendering. All mutation goes
/// through the methods below.
pub struct AppState {
    /// Current result set; replaced wholesale by each search or history load.
    pub results: ResultSet,

    /// Filter control contents.
    pub filters: FilterConfig,

    /// Indices into `results.records` passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Stats over the visible records (cached).
    pub summary: Summary,

    /// Ids ticked for comparison / bulk save.
    pub selected: BTreeSet<String>,

    /// Favorites, mirrored to the repository on every change.
    pub saved: SavedMap,

    /// Metadata of the last deep search, if the last search was deep.
    pub deep_metadata: Option<DeepMetadata>,

    pub history: HistoryView,

    pub notification: Option<Notification>,

    /// Whether a search is in flight.
    pub loading: bool,

    search_generation: u64,
    history_generation: u64,
    debounce: Debouncer,
    favorites: Box<dyn FavoritesRepository>,
}

impl AppState {
    /// Build the state and load persisted favorites. A favorites file that
    /// cannot be read is logged and treated as empty.
    pub fn new(favorites: Box<dyn FavoritesRepository>, filter_debounce: Duration) -> Self {
        let saved = favorites.load().unwrap_or_else(|e| {
            log::error!("Error loading favorites: {e}");
            SavedMap::new()
        });
        log::info!("Loaded {} favorites", saved.len());

        Self {
            results: ResultSet::default(),
            filters: FilterConfig::default(),
            visible_indices: Vec::new(),
            summary: Summary::default(),
            selected: BTreeSet::new(),
            saved,
            deep_metadata: None,
            history: HistoryView::Closed,
            notification: None,
            loading: false,
            search_generation: 0,
            history_generation: 0,
            debounce: Debouncer::new(filter_debounce),
            favorites,
        }
    }

    // -- notifications --

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            NotificationKind::Success => log::info!("{message}"),
            NotificationKind::Error => log::warn!("{message}"),
        }
        self.notification = Some(Notification {
            kind,
            message,
            expires_at: Instant::now() + NOTIFICATION_TTL,
        });
    }

    /// Drop the notification once it has expired.
    pub fn expire_notification(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notification = None;
        }
    }

    // -- search --

    /// Validate the search box and number a new search. Returns `None` (with
    /// an error notification) when no VC name was given.
    pub fn begin_search(&mut self, input: &str, mode: SearchMode) -> Option<SearchTicket> {
        let vcs: Vec<String> = input
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if vcs.is_empty() {
            self.notify(NotificationKind::Error, "Digite pelo menos um VC.");
            return None;
        }

        self.search_generation += 1;
        self.loading = true;
        Some(SearchTicket {
            generation: self.search_generation,
            vcs,
            mode,
        })
    }

    /// Apply a finished search. Responses to anything but the latest search
    /// are dropped.
    pub fn finish_search(&mut self, ticket: SearchTicket, result: Result<SearchReply, ApiError>) {
        if ticket.generation != self.search_generation {
            log::debug!(
                "Ignoring stale search response {} (latest is {})",
                ticket.generation,
                self.search_generation
            );
            return;
        }
        self.loading = false;

        match result {
            Ok(reply) => {
                let records = normalize_payload(reply.payload);
                self.deep_metadata = match ticket.mode {
                    SearchMode::Deep => reply.metadata,
                    SearchMode::Normal => None,
                };
                self.set_results(records, ticket.vcs);
                let n = self.results.len();
                self.notify(NotificationKind::Success, format!("{n} startups encontradas!"));
            }
            Err(e) => {
                log::error!("Search error: {e}");
                self.set_results(Vec::new(), Vec::new());
                self.deep_metadata = None;
                self.notify(NotificationKind::Error, e.user_message());
            }
        }
    }

    /// Replace the result set, clear the selection, and refilter.
    pub fn set_results(&mut self, records: Vec<StartupRecord>, vcs: Vec<String>) {
        self.results = ResultSet::new(records, vcs);
        self.selected.clear();
        self.refilter();
    }

    /// Load results from a saved response or exported CSV.
    pub fn load_file(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(records) => {
                log::info!("Loaded {} startups from {}", records.len(), path.display());
                self.deep_metadata = None;
                self.set_results(records, Vec::new());
                let n = self.results.len();
                self.notify(NotificationKind::Success, format!("{n} startups carregadas"));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.notify(NotificationKind::Error, format!("Erro: {e:#}"));
            }
        }
    }

    // -- history --

    /// Open or close the history panel. Opening starts a fetch and returns
    /// its generation.
    pub fn toggle_history(&mut self) -> Option<u64> {
        if self.history != HistoryView::Closed {
            self.history = HistoryView::Closed;
            return None;
        }
        self.history_generation += 1;
        self.history = HistoryView::Loading;
        Some(self.history_generation)
    }

    pub fn close_history(&mut self) {
        self.history = HistoryView::Closed;
    }

    pub fn finish_history(&mut self, generation: u64, result: Result<Vec<HistoryEntry>, ApiError>) {
        if generation != self.history_generation || self.history == HistoryView::Closed {
            return;
        }
        self.history = match result {
            Ok(entries) => HistoryView::Loaded(entries),
            Err(_) => HistoryView::Failed("Erro ao carregar histórico.".to_string()),
        };
    }

    /// Replace the results with a history entry's and close the panel.
    pub fn load_history_item(&mut self, id: &JsonValue) {
        let entry = match &self.history {
            HistoryView::Loaded(entries) => entries.iter().find(|e| &e.id == id).cloned(),
            _ => None,
        };
        let Some(entry) = entry else {
            self.notify(NotificationKind::Error, "Erro ao carregar item do histórico");
            return;
        };

        // a search still in flight must not overwrite what the user picked
        self.search_generation += 1;
        self.loading = false;
        self.deep_metadata = None;
        self.set_results(entry.records(), entry.vcs());
        self.history = HistoryView::Closed;
        self.notify(NotificationKind::Success, "Histórico carregado com sucesso");
    }

    // -- filters --

    /// Note a filter edit; the refilter happens in [`AppState::tick`] once
    /// the edits stop.
    pub fn filters_edited(&mut self, now: Instant) {
        self.debounce.arm(now);
    }

    /// Run a pending debounced refilter. Returns whether one ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.expire_notification(now);
        if self.debounce.fire(now) {
            self.refilter();
            true
        } else {
            false
        }
    }

    /// Time until the pending refilter, for scheduling a repaint.
    pub fn pending_refilter_in(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterConfig::default();
        self.debounce.cancel();
        self.refilter();
        self.notify(NotificationKind::Success, "Filtros limpos");
    }

    /// Recompute `visible_indices` and `summary` after a filter or result change.
    pub fn refilter(&mut self) {
        let predicates = self.filters.compile();
        self.visible_indices = filtered_indices(&self.results.records, &predicates);
        self.summary = Summary::compute(
            &self.results.records,
            &self.visible_indices,
            self.results.vcs.len(),
        );
        log::debug!(
            "{} of {} startups visible",
            self.visible_indices.len(),
            self.results.len()
        );
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &StartupRecord> + '_ {
        self.visible_indices
            .iter()
            .filter_map(|&i| self.results.records.get(i))
    }

    // -- selection --

    pub fn toggle_selected(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Selected records in result order.
    pub fn selected_records(&self) -> Vec<&StartupRecord> {
        self.results
            .records
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .collect()
    }

    pub fn can_compare(&self) -> bool {
        self.selected_records().len() >= 2
    }

    /// Records to show side by side, or `None` (with a notification) when
    /// fewer than two are selected.
    pub fn comparison(&mut self) -> Option<Vec<StartupRecord>> {
        let items: Vec<StartupRecord> = self.selected_records().into_iter().cloned().collect();
        if items.len() < 2 {
            self.notify(NotificationKind::Error, "Selecione ao menos 2 startups para comparar");
            return None;
        }
        Some(items)
    }

    // -- favorites --

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains_key(id)
    }

    pub fn toggle_saved(&mut self, id: &str) {
        if self.saved.remove(id).is_some() {
            self.notify(NotificationKind::Success, "Removido dos favoritos");
        } else if let Some(rec) = self.results.get(id).cloned() {
            self.saved.insert(rec.id.clone(), rec);
            self.notify(NotificationKind::Success, "Salvo nos favoritos");
        } else {
            return;
        }
        self.persist_saved();
    }

    pub fn save_selected(&mut self) {
        let items: Vec<StartupRecord> = self.selected_records().into_iter().cloned().collect();
        let n = items.len();
        for rec in items {
            self.saved.insert(rec.id.clone(), rec);
        }
        self.notify(
            NotificationKind::Success,
            format!("{n} startup(s) salvas nos favoritos"),
        );
        self.persist_saved();
    }

    pub fn clear_saved(&mut self) {
        self.saved.clear();
        self.notify(NotificationKind::Success, "Favoritos limpos.");
        self.persist_saved();
    }

    /// Write favorites through the repository. On failure the in-memory set
    /// is kept and the user is told.
    fn persist_saved(&mut self) {
        if let Err(e) = self.favorites.save(&self.saved) {
            log::error!("Error saving favorites: {e}");
            self.notify(NotificationKind::Error, "Erro ao salvar favoritos");
        }
    }

    // -- links & export --

    /// The founder's LinkedIn URL, or `None` with an error notification.
    pub fn linkedin_url(&mut self, id: &str) -> Option<String> {
        let url = self
            .results
            .get(id)
            .filter(|r| r.has_linkedin())
            .map(|r| r.founder_linkedin.clone());
        if url.is_none() {
            self.notify(NotificationKind::Error, "Link do LinkedIn não disponível");
        }
        url
    }

    /// Whether there is anything to export; notifies when there is not.
    pub fn can_export(&mut self) -> bool {
        if self.visible_indices.is_empty() {
            self.notify(NotificationKind::Error, "Sem resultados para exportar.");
            return false;
        }
        true
    }

    /// Export the visible records to `path`.
    pub fn export_visible(&mut self, path: &Path) {
        if !self.can_export() {
            return;
        }
        let result = export::export_to_path(path, self.visible_records());
        match result {
            Ok(_) => self.notify(NotificationKind::Success, "CSV exportado com sucesso"),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.notify(NotificationKind::Error, format!("Erro ao exportar CSV: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::favorites::InMemoryRepository;
    use serde_json::json;

    struct BrokenRepository;

    impl FavoritesRepository for BrokenRepository {
        fn load(&self) -> Result<SavedMap, StoreError> {
            Err(StoreError::Unavailable("disk gone".into()))
        }
        fn save(&self, _: &SavedMap) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    fn state() -> AppState {
        AppState::new(Box::new(InMemoryRepository::new()), Duration::from_millis(300))
    }

    fn reply(payload: JsonValue) -> Result<SearchReply, ApiError> {
        Ok(SearchReply { payload, metadata: None })
    }

    fn loaded_state() -> AppState {
        let mut s = state();
        let ticket = s.begin_search("Kaszek, Monashees", SearchMode::Normal).unwrap();
        s.finish_search(
            ticket,
            reply(json!([
                {"id": "a", "nome": "A", "setor": "Fintech", "valor_investimento": "1M", "linkedin": "https://l/a"},
                {"id": "b", "nome": "B", "setor": "Agro", "valor_investimento": "2M"},
                {"id": "c", "nome": "C", "setor": "Fintech"}
            ])),
        );
        s
    }

    fn message(s: &AppState) -> (NotificationKind, &str) {
        let n = s.notification.as_ref().unwrap();
        (n.kind, n.message.as_str())
    }

    #[test]
    fn empty_query_is_rejected() {
        let mut s = state();
        assert!(s.begin_search(" , ,", SearchMode::Normal).is_none());
        assert_eq!(message(&s), (NotificationKind::Error, "Digite pelo menos um VC."));
        assert!(!s.loading);
    }

    #[test]
    fn search_splits_names() {
        let mut s = state();
        let ticket = s.begin_search(" Kaszek ,a16z,, ", SearchMode::Deep).unwrap();
        assert_eq!(ticket.vcs, ["Kaszek", "a16z"]);
        assert_eq!(ticket.mode, SearchMode::Deep);
        assert!(s.loading);
    }

    #[test]
    fn successful_search_populates_everything() {
        let s = loaded_state();
        assert!(!s.loading);
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.summary.total_startups, 3);
        assert_eq!(s.summary.total_value, 3_000_000);
        assert_eq!(s.summary.total_vcs, 2);
        assert_eq!(message(&s), (NotificationKind::Success, "3 startups encontradas!"));
    }

    #[test]
    fn failed_search_empties_results() {
        let mut s = loaded_state();
        let ticket = s.begin_search("X", SearchMode::Normal).unwrap();
        s.finish_search(
            ticket,
            Err(ApiError::Backend { status: 400, message: "vc_list é obrigatório".into() }),
        );
        assert!(s.results.is_empty());
        assert!(s.visible_indices.is_empty());
        assert_eq!(message(&s), (NotificationKind::Error, "vc_list é obrigatório"));
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut s = state();
        let first = s.begin_search("Old VC", SearchMode::Normal).unwrap();
        let second = s.begin_search("New VC", SearchMode::Normal).unwrap();

        s.finish_search(second, reply(json!([{"nome": "New"}])));
        s.finish_search(first, reply(json!([{"nome": "Old"}, {"nome": "Older"}])));

        assert_eq!(s.results.len(), 1);
        assert_eq!(s.results.records[0].name, "New");
        assert_eq!(s.results.vcs, ["New VC"]);
    }

    #[test]
    fn deep_metadata_only_kept_for_deep_search() {
        let mut s = state();
        let ticket = s.begin_search("Kaszek", SearchMode::Deep).unwrap();
        let meta = DeepMetadata { total_fontes: Some(4), ..Default::default() };
        s.finish_search(ticket, Ok(SearchReply { payload: json!([]), metadata: Some(meta.clone()) }));
        assert_eq!(s.deep_metadata, Some(meta));

        let ticket = s.begin_search("Kaszek", SearchMode::Normal).unwrap();
        s.finish_search(ticket, reply(json!([])));
        assert_eq!(s.deep_metadata, None);
    }

    #[test]
    fn filter_edits_are_debounced() {
        let mut s = loaded_state();
        let t0 = Instant::now();
        s.filters.sector = "fin".into();
        s.filters_edited(t0);
        assert!(!s.tick(t0 + Duration::from_millis(100)));
        assert_eq!(s.visible_indices.len(), 3);

        s.filters.sector = "fintech".into();
        s.filters_edited(t0 + Duration::from_millis(200));
        assert!(!s.tick(t0 + Duration::from_millis(400)));
        assert!(s.tick(t0 + Duration::from_millis(500)));
        assert_eq!(s.visible_indices, vec![0, 2]);
        assert_eq!(s.summary.total_value, 1_000_000);
        assert!(!s.tick(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn clear_filters_applies_immediately() {
        let mut s = loaded_state();
        s.filters.sector = "agro".into();
        s.refilter();
        assert_eq!(s.visible_indices, vec![1]);
        s.filters_edited(Instant::now());
        s.clear_filters();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.pending_refilter_in(Instant::now()), None);
    }

    #[test]
    fn selection_and_comparison() {
        let mut s = loaded_state();
        s.toggle_selected("c");
        assert!(!s.can_compare());
        assert!(s.comparison().is_none());
        assert_eq!(
            message(&s),
            (NotificationKind::Error, "Selecione ao menos 2 startups para comparar")
        );

        s.toggle_selected("a");
        let names: Vec<String> = s.comparison().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["A", "C"]);

        s.toggle_selected("a");
        assert!(!s.is_selected("a"));
    }

    #[test]
    fn new_results_clear_selection() {
        let mut s = loaded_state();
        s.toggle_selected("a");
        s.set_results(Vec::new(), Vec::new());
        assert!(s.selected.is_empty());
    }

    #[test]
    fn favorites_persist_through_repository() {
        let repo = std::sync::Arc::new(InMemoryRepository::new());

        struct Shared(std::sync::Arc<InMemoryRepository>);
        impl FavoritesRepository for Shared {
            fn load(&self) -> Result<SavedMap, StoreError> {
                self.0.load()
            }
            fn save(&self, saved: &SavedMap) -> Result<(), StoreError> {
                self.0.save(saved)
            }
        }

        let mut s = AppState::new(Box::new(Shared(repo.clone())), Duration::from_millis(300));
        let ticket = s.begin_search("VC", SearchMode::Normal).unwrap();
        s.finish_search(ticket, reply(json!([{"id": "a", "nome": "A"}, {"id": "b", "nome": "B"}])));

        s.toggle_saved("a");
        assert!(s.is_saved("a"));
        assert_eq!(message(&s), (NotificationKind::Success, "Salvo nos favoritos"));
        assert_eq!(repo.load().unwrap().len(), 1);

        s.toggle_selected("a");
        s.toggle_selected("b");
        s.save_selected();
        assert_eq!(message(&s).1, "2 startup(s) salvas nos favoritos");
        assert_eq!(repo.load().unwrap().len(), 2);

        s.toggle_saved("a");
        assert_eq!(message(&s).1, "Removido dos favoritos");
        assert_eq!(repo.load().unwrap().keys().collect::<Vec<_>>(), ["b"]);

        s.clear_saved();
        assert!(repo.load().unwrap().is_empty());

        let reopened = AppState::new(Box::new(Shared(repo)), Duration::from_millis(300));
        assert!(reopened.saved.is_empty());
    }

    #[test]
    fn favorites_write_failure_keeps_memory_state() {
        let mut s = AppState::new(Box::new(BrokenRepository), Duration::from_millis(300));
        assert!(s.saved.is_empty());
        s.set_results(vec![crate::data::normalize::normalize_startup(&json!({"id": "a"}))], vec![]);
        s.toggle_saved("a");
        assert!(s.is_saved("a"));
        assert_eq!(message(&s), (NotificationKind::Error, "Erro ao salvar favoritos"));
    }

    #[test]
    fn history_flow() {
        let mut s = state();
        let generation = s.toggle_history().unwrap();
        assert_eq!(s.history, HistoryView::Loading);

        let entry: HistoryEntry = serde_json::from_value(json!({
            "id": 7,
            "vc_list": "Kaszek, Monashees",
            "resultado": [{"nome": "A"}, {"nome": "B"}]
        }))
        .unwrap();
        s.finish_history(generation, Ok(vec![entry]));
        assert!(matches!(&s.history, HistoryView::Loaded(e) if e.len() == 1));

        s.load_history_item(&json!(7));
        assert_eq!(s.history, HistoryView::Closed);
        assert_eq!(s.results.len(), 2);
        assert_eq!(s.summary.total_vcs, 2);
        assert_eq!(message(&s), (NotificationKind::Success, "Histórico carregado com sucesso"));
    }

    #[test]
    fn history_failure_is_inline() {
        let mut s = state();
        let generation = s.toggle_history().unwrap();
        s.finish_history(
            generation,
            Err(ApiError::Backend { status: 500, message: "boom".into() }),
        );
        assert_eq!(s.history, HistoryView::Failed("Erro ao carregar histórico.".into()));
        assert!(s.notification.is_none());
    }

    #[test]
    fn history_load_supersedes_pending_search() {
        let mut s = state();
        let ticket = s.begin_search("Slow VC", SearchMode::Normal).unwrap();
        let generation = s.toggle_history().unwrap();
        let entry: HistoryEntry =
            serde_json::from_value(json!({"id": 1, "vc_list": "a16z", "resultado": [{"nome": "H"}]})).unwrap();
        s.finish_history(generation, Ok(vec![entry]));
        s.load_history_item(&json!(1));

        s.finish_search(ticket, reply(json!([{"nome": "Late"}])));
        assert_eq!(s.results.records[0].name, "H");
    }

    #[test]
    fn linkedin_and_export_guards() {
        let mut s = loaded_state();
        assert_eq!(s.linkedin_url("a").as_deref(), Some("https://l/a"));
        assert!(s.linkedin_url("b").is_none());
        assert_eq!(message(&s), (NotificationKind::Error, "Link do LinkedIn não disponível"));

        let mut empty = state();
        assert!(!empty.can_export());
        assert_eq!(message(&empty).1, "Sem resultados para exportar.");
    }

    #[test]
    fn export_writes_visible_records_only() {
        let mut s = loaded_state();
        s.filters.sector = "agro".into();
        s.refilter();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export::default_export_file_name());
        s.export_visible(&path);
        assert_eq!(message(&s), (NotificationKind::Success, "CSV exportado com sucesso"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"B\""));
    }

    #[test]
    fn notifications_expire() {
        let mut s = state();
        s.notify(NotificationKind::Success, "ok");
        s.expire_notification(Instant::now());
        assert!(s.notification.is_some());
        s.expire_notification(Instant::now() + NOTIFICATION_TTL);
        assert!(s.notification.is_none());
    }
}
