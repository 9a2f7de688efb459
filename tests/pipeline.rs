use std::time::Duration;

use serde_json::json;

use vc_scout::api::{decode_search_body, SearchMode};
use vc_scout::data::number::format_currency;
use vc_scout::data::stats::SectorCount;
use vc_scout::favorites::InMemoryRepository;
use vc_scout::state::AppState;

fn fresh_state() -> AppState {
    AppState::new(Box::new(InMemoryRepository::new()), Duration::from_millis(300))
}

#[test]
fn search_response_to_stats() {
    let body = json!({
        "resultado": [
            {"nome": "Foo", "setor": "Fintech", "ano_fundacao": 2020, "valor_investimento": "1.2M"}
        ]
    })
    .to_string();

    let mut state = fresh_state();
    let ticket = state.begin_search("Kaszek", SearchMode::Normal).unwrap();
    state.finish_search(ticket, decode_search_body(200, &body));

    assert_eq!(state.summary.total_startups, 1);
    assert_eq!(format_currency(state.summary.total_value), "R$ 1.200.000");
    assert_eq!(state.summary.total_vcs, 1);
    assert_eq!(
        state.summary.top_sectors(),
        [SectorCount { sector: "Fintech".into(), count: 1 }]
    );
}

#[test]
fn every_payload_shape_reaches_the_cards() {
    let shapes = [
        json!({"resultado": [{"nome": "A"}, {"nome": "B"}]}),
        json!({"resultado": {"result": [{"nome": "A"}, {"nome": "B"}]}}),
        json!({"resultado": {"investidas": [{"nome": "A"}], "outras": [{"nome": "B"}], "fonte": "x"}}),
    ];
    for body in shapes {
        let mut state = fresh_state();
        let ticket = state.begin_search("VC", SearchMode::Normal).unwrap();
        state.finish_search(ticket, decode_search_body(200, &body.to_string()));
        let names: Vec<&str> = state.visible_records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B"], "payload {body}");
    }
}

#[test]
fn backend_error_leaves_empty_view() {
    let mut state = fresh_state();
    let ticket = state.begin_search("VC", SearchMode::Normal).unwrap();
    state.finish_search(ticket, decode_search_body(400, r#"{"erro": "vc_list é obrigatório"}"#));
    assert!(state.visible_indices.is_empty());
    assert_eq!(state.summary.total_startups, 0);
    assert_eq!(
        state.notification.as_ref().map(|n| n.message.as_str()),
        Some("vc_list é obrigatório")
    );
}

#[test]
fn filters_never_drop_unparseable_values() {
    let body = json!({
        "resultado": [
            {"nome": "Known", "valor_investimento": "50k"},
            {"nome": "Secret", "valor_investimento": "não divulgado"}
        ]
    })
    .to_string();
    let mut state = fresh_state();
    let ticket = state.begin_search("VC", SearchMode::Normal).unwrap();
    state.finish_search(ticket, decode_search_body(200, &body));

    state.filters.min_value = "1M".into();
    state.refilter();
    let names: Vec<&str> = state.visible_records().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Secret"]);
}
