//! Tests for arena-core: entities, wire records, board lifecycle, chat, scoring, config

use arena_core::growth::{improvement, projections};
use arena_core::scoring::{score, word_count, Standings};
use arena_core::*;
use std::time::{Duration, Instant};

fn token(entity: Entity, text: &str) -> StreamEvent {
    StreamEvent::Token {
        entity,
        text: text.into(),
    }
}

fn response(entity: Entity, text: &str) -> StreamEvent {
    StreamEvent::Response {
        entity,
        text: text.into(),
    }
}

fn record(json: &str) -> Vec<StreamEvent> {
    serde_json::from_str::<StreamRecord>(json).unwrap().into_events()
}

fn chat_record(json: &str) -> Vec<ChatEvent> {
    serde_json::from_str::<StreamRecord>(json)
        .unwrap()
        .into_chat_events()
}

// ===========================================================================
// Entity
// ===========================================================================

#[test]
fn entity_wire_names() {
    for entity in Entity::ALL {
        assert_eq!(Entity::from_wire(entity.as_str()), Some(entity));
        assert_eq!(Entity::ALL[entity.index()], entity);
    }
    assert_eq!(Entity::from_wire("llama"), None);
    assert_eq!(Entity::from_wire("GPT"), None);
}

#[test]
fn entity_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Entity::Gemini).unwrap(), r#""gemini""#);
    assert_eq!(format!("{}", Entity::Claude), "claude");
}

// ===========================================================================
// StreamRecord
// ===========================================================================

#[test]
fn record_token() {
    assert_eq!(
        record(r#"{"model":"gpt","token":"Hel"}"#),
        vec![token(Entity::Gpt, "Hel")]
    );
}

#[test]
fn record_response() {
    assert_eq!(
        record(r#"{"model":"claude","response":"Hi"}"#),
        vec![response(Entity::Claude, "Hi")]
    );
}

#[test]
fn record_done() {
    assert_eq!(record(r#"{"done":true}"#), vec![StreamEvent::Done]);
    assert!(record(r#"{"done":false}"#).is_empty());
}

#[test]
fn record_fields_are_not_exclusive() {
    let events = record(r#"{"model":"gemini","token":"x","response":"xy","done":true}"#);
    assert_eq!(
        events,
        vec![
            token(Entity::Gemini, "x"),
            response(Entity::Gemini, "xy"),
            StreamEvent::Done
        ]
    );
}

#[test]
fn record_empty_strings_carry_nothing() {
    assert!(record(r#"{"model":"gpt","token":""}"#).is_empty());
    assert!(record(r#"{"model":"gpt","response":""}"#).is_empty());
}

#[test]
fn record_unknown_model_keeps_done() {
    assert!(record(r#"{"model":"llama","token":"x"}"#).is_empty());
    assert_eq!(
        record(r#"{"model":"llama","token":"x","done":true}"#),
        vec![StreamEvent::Done]
    );
}

#[test]
fn record_token_without_model_ignored() {
    assert!(record(r#"{"token":"orphan"}"#).is_empty());
}

#[test]
fn battle_request_session_id() {
    let req = BattleRequest::new("Explain quantum computing");
    assert!(req.session_id.starts_with("battle-"));
    assert!(req.session_id["battle-".len()..].parse::<i64>().is_ok());

    let req = req.with_session_id("fixed");
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["prompt"], "Explain quantum computing");
    assert_eq!(json["session_id"], "fixed");
}

// ===========================================================================
// Chat
// ===========================================================================

#[test]
fn chat_record_takes_modelless_token() {
    assert_eq!(
        chat_record(r#"{"token":"Hel"}"#),
        vec![ChatEvent::Token("Hel".into())]
    );
    assert_eq!(
        chat_record(r#"{"token":"lo","done":true}"#),
        vec![ChatEvent::Token("lo".into()), ChatEvent::Done]
    );
}

#[test]
fn chat_record_ignores_model_and_response() {
    assert_eq!(
        chat_record(r#"{"model":"claude","token":"x","response":"full"}"#),
        vec![ChatEvent::Token("x".into())]
    );
    assert!(chat_record(r#"{"token":""}"#).is_empty());
    assert!(chat_record(r#"{"done":false}"#).is_empty());
}

#[test]
fn chat_request_serializes_history() {
    let req = ChatRequest::new(vec![ChatMessage::user("hi")]);
    assert!(req.session_id.starts_with("avatar-"));
    assert!(req.session_id["avatar-".len()..].parse::<i64>().is_ok());

    let json = serde_json::to_value(req.with_session_id("s")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "session_id": "s",
        })
    );
}

#[test]
fn conversation_blank_text_rejected() {
    let mut chat = Conversation::new();
    assert!(chat.begin_turn("   ").is_none());
    assert!(chat.messages().is_empty());
    assert!(!chat.is_streaming());
}

#[test]
fn conversation_turn_accumulates_reply() {
    let mut chat = Conversation::new();
    let req = chat.begin_turn("Hello").unwrap();
    assert_eq!(req.messages, vec![ChatMessage::user("Hello")]);
    assert!(chat.is_streaming());
    assert_eq!(chat.reply(), Some(""));

    assert_eq!(
        chat.apply(&ChatEvent::Token("Hi ".into())),
        Some(ChatUpdate::Token("Hi ".into()))
    );
    chat.apply(&ChatEvent::Token("there".into()));
    assert_eq!(chat.apply(&ChatEvent::Done), Some(ChatUpdate::Finished));

    assert!(!chat.is_streaming());
    assert_eq!(chat.reply(), Some("Hi there"));
    assert_eq!(chat.messages().len(), 2);
}

#[test]
fn conversation_ignores_events_after_done() {
    let mut chat = Conversation::new();
    chat.begin_turn("q").unwrap();
    chat.apply(&ChatEvent::Token("a".into()));
    chat.apply(&ChatEvent::Done);
    assert_eq!(chat.apply(&ChatEvent::Token("late".into())), None);
    assert_eq!(chat.reply(), Some("a"));
}

#[test]
fn conversation_next_turn_sends_history() {
    let mut chat = Conversation::new();
    chat.begin_turn("first").unwrap();
    chat.apply(&ChatEvent::Token("one".into()));
    chat.apply(&ChatEvent::Done);

    let req = chat.begin_turn("second").unwrap();
    assert_eq!(
        req.messages,
        vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("one"),
            ChatMessage::user("second"),
        ]
    );
}

#[test]
fn conversation_fail_replaces_empty_reply() {
    let mut chat = Conversation::new();
    chat.begin_turn("q").unwrap();
    chat.fail();
    assert!(!chat.is_streaming());
    assert_eq!(
        chat.messages(),
        &[ChatMessage::user("q"), ChatMessage::assistant(conversation::ERROR_REPLY)]
    );
}

#[test]
fn conversation_fail_keeps_partial_reply() {
    let mut chat = Conversation::new();
    chat.begin_turn("q").unwrap();
    chat.apply(&ChatEvent::Token("part".into()));
    chat.fail();
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[1].content, "part");
    assert_eq!(chat.reply(), Some(conversation::ERROR_REPLY));
}

#[test]
fn conversation_stop_keeps_partial_reply() {
    let mut chat = Conversation::new();
    chat.begin_turn("q").unwrap();
    chat.apply(&ChatEvent::Token("part".into()));
    chat.stop();
    assert_eq!(chat.apply(&ChatEvent::Token("more".into())), None);
    assert_eq!(chat.reply(), Some("part"));
}

// ===========================================================================
// Board
// ===========================================================================

#[test]
fn board_starts_idle() {
    let board = Board::new();
    for (_, state) in board.iter() {
        assert_eq!(state.status, Status::Idle);
        assert!(state.accumulated.is_empty());
        assert!(state.partial.is_empty());
    }
    assert!(!board.is_running());
    assert!(!board.is_accepting());
}

#[test]
fn board_ignores_events_before_begin() {
    let mut board = Board::new();
    assert!(board.apply(&token(Entity::Gpt, "x")).is_none());
    assert_eq!(board.get(Entity::Gpt).status, Status::Idle);
}

#[test]
fn board_begin_sets_running_and_clears() {
    let mut board = Board::new();
    board.begin();
    board.apply(&response(Entity::Claude, "old"));
    board.begin();
    for (_, state) in board.iter() {
        assert_eq!(state, &EntityState::running());
    }
    assert!(board.is_running());
}

#[test]
fn board_hello_example() {
    let mut board = Board::new();
    board.begin();
    board.apply(&token(Entity::Gpt, "Hel"));
    assert_eq!(board.get(Entity::Gpt).partial, "Hel");
    board.apply(&token(Entity::Gpt, "lo"));
    assert_eq!(board.get(Entity::Gpt).partial, "Hello");
    assert_eq!(board.get(Entity::Gpt).status, Status::Running);

    let update = board.apply(&response(Entity::Gpt, "Hello"));
    assert_eq!(update, Some(Update::Completed { entity: Entity::Gpt }));

    let gpt = board.get(Entity::Gpt);
    assert_eq!(gpt.status, Status::Complete);
    assert_eq!(gpt.accumulated, "Hello");
    assert_eq!(gpt.partial, "");
}

#[test]
fn board_completion_replaces_tokens() {
    let mut board = Board::new();
    board.begin();
    board.apply(&token(Entity::Claude, "draft that differs"));
    board.apply(&response(Entity::Claude, "final text"));
    assert_eq!(board.get(Entity::Claude).accumulated, "final text");
    assert_eq!(board.get(Entity::Claude).partial, "");
}

#[test]
fn board_one_completion_per_entity() {
    let mut board = Board::new();
    board.begin();
    assert!(board.apply(&response(Entity::Gemini, "first")).is_some());
    assert!(board.apply(&response(Entity::Gemini, "second")).is_none());
    assert_eq!(board.get(Entity::Gemini).accumulated, "first");
}

#[test]
fn board_done_disables_mutation() {
    let mut board = Board::new();
    board.begin();
    assert_eq!(board.apply(&StreamEvent::Done), Some(Update::Finished));
    assert!(!board.is_running());
    assert!(!board.is_accepting());

    assert!(board.apply(&token(Entity::Claude, "stale")).is_none());
    assert!(board.apply(&response(Entity::Claude, "stale")).is_none());
    assert_eq!(board.get(Entity::Claude), &EntityState::running());
}

#[test]
fn board_stop_keeps_text() {
    let mut board = Board::new();
    board.begin();
    board.apply(&token(Entity::Gpt, "partial"));
    board.stop();
    assert!(!board.is_running());
    assert_eq!(board.get(Entity::Gpt).partial, "partial");
    assert!(board.apply(&token(Entity::Gpt, "more")).is_none());
}

#[test]
fn board_reset_from_any_state() {
    let mut board = Board::new();
    board.begin();
    board.apply(&token(Entity::Claude, "a"));
    board.apply(&response(Entity::Gpt, "b"));
    board.reset();
    for (_, state) in board.iter() {
        assert_eq!(state, &EntityState::default());
    }
    assert!(!board.is_running());

    // mid-battle and after a finished battle
    board.begin();
    board.apply(&StreamEvent::Done);
    board.reset();
    assert!(board.iter().all(|(_, s)| s.status == Status::Idle));
}

#[test]
fn board_all_complete() {
    let mut board = Board::new();
    board.begin();
    for entity in Entity::ALL {
        assert!(!board.all_complete());
        board.apply(&response(entity, "done"));
    }
    assert!(board.all_complete());
}

// ===========================================================================
// Scoring
// ===========================================================================

#[test]
fn word_count_splits_on_spaces() {
    assert_eq!(word_count("one two three"), 3);
    assert_eq!(word_count(""), 1);
    assert_eq!(word_count("a  b"), 3);
}

#[test]
fn score_components_cap() {
    let long = "word ".repeat(1000);
    // speed 40 + detail capped 30 + length capped 30
    assert_eq!(score(&long, Duration::ZERO), 100);
    // 10s → speed 20
    assert_eq!(score(&long, Duration::from_secs(10)), 80);
}

fn finished_board(texts: [(Entity, &str, u64); 3]) -> Board {
    let start = Instant::now();
    let mut board = Board::new();
    board.begin_at(start);
    for (entity, text, secs) in texts {
        board.apply_at(&response(entity, text), start + Duration::from_secs(secs));
    }
    board
}

#[test]
fn standings_order_and_knockout() {
    let long = "word ".repeat(300);
    let board = finished_board([
        (Entity::Claude, "short", 15),
        (Entity::Gpt, long.as_str(), 1),
        (Entity::Gemini, "a bit longer answer here", 5),
    ]);
    let standings = Standings::from_board(&board);
    let order: Vec<Entity> = standings.entries().iter().map(|s| s.entity).collect();
    assert_eq!(order, vec![Entity::Gpt, Entity::Gemini, Entity::Claude]);

    let ko = standings.knockout().unwrap();
    assert_eq!(ko.winner, Entity::Gpt);
    assert_eq!(ko.runner_up, Entity::Gemini);
    assert_eq!(ko.eliminated, Entity::Claude);

    let text = ko.explanation(&standings);
    assert!(text.starts_with("GPT WINS!"));
    assert!(text.contains("Defeated: GEMINI"));
    assert!(text.contains("CLAUDE"));
}

#[test]
fn explanation_lists_victory_factors() {
    let long = "word ".repeat(300);
    let board = finished_board([
        (Entity::Claude, "short", 15),
        (Entity::Gpt, long.as_str(), 1),
        (Entity::Gemini, "a bit longer answer here", 5),
    ]);
    let standings = Standings::from_board(&board);
    let text = standings.knockout().unwrap().explanation(&standings);

    // 38 speed + 30 detail + 30 length
    assert!(text.contains("Score: 98 points"));
    assert!(text.contains("- Speed: 51ms average\n"));
    assert!(text.contains("- Detail: 301 words\n"));
    assert!(text.contains("- Accuracy: Comprehensive answer\n\nDefeated:"));
}

#[test]
fn standings_need_three_for_knockout() {
    let mut board = Board::new();
    board.begin();
    board.apply(&response(Entity::Claude, "only one"));
    let standings = Standings::from_board(&board);
    assert_eq!(standings.entries().len(), 1);
    assert!(standings.knockout().is_none());
}

#[test]
fn standings_ties_keep_display_order() {
    let board = finished_board([
        (Entity::Claude, "same", 0),
        (Entity::Gpt, "same", 0),
        (Entity::Gemini, "same", 0),
    ]);
    let standings = Standings::from_board(&board);
    let order: Vec<Entity> = standings.entries().iter().map(|s| s.entity).collect();
    assert_eq!(order, Entity::ALL.to_vec());
}

// ===========================================================================
// Growth
// ===========================================================================

#[test]
fn growth_projection_rows() {
    let rows = projections(50.0);
    assert_eq!(improvement(50.0), 30.0);
    assert_eq!(rows[0].month, "Current");
    assert_eq!((rows[0].traffic, rows[0].conversions), (100.0, 100.0));
    assert!((rows[1].traffic - 109.0).abs() < 1e-9);
    assert!((rows[1].conversions - 107.5).abs() < 1e-9);
    assert!((rows[2].traffic - 118.0).abs() < 1e-9);
    assert!((rows[3].traffic - 130.0).abs() < 1e-9);
    assert!((rows[3].conversions - 124.0).abs() < 1e-9);
}

#[test]
fn growth_clamps_score() {
    assert_eq!(improvement(150.0), 0.0);
    assert_eq!(improvement(-10.0), 60.0);
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn config_defaults() {
    let config = ArenaConfig::default();
    assert_eq!(config.backend_url, "http://localhost:8001");
    assert_eq!(
        config.endpoint(BATTLE_PATH).unwrap().as_str(),
        "http://localhost:8001/api/ai/battle"
    );
}

#[test]
fn config_endpoint_keeps_prefix() {
    let config = ArenaConfig::default()
        .with_backend_override(Some("https://example.com/backend/".into()));
    assert_eq!(
        config.endpoint(ANALYZE_PATH).unwrap().as_str(),
        "https://example.com/backend/api/analyze"
    );
}

#[test]
fn config_blank_override_ignored() {
    let config = ArenaConfig::default().with_backend_override(Some("  ".into()));
    assert_eq!(config.backend_url, "http://localhost:8001");
}

#[test]
fn config_invalid_url() {
    let config = ArenaConfig::default().with_backend_override(Some("not a url".into()));
    assert!(matches!(config.base_url(), Err(Error::InvalidUrl { .. })));
}

#[test]
fn config_load_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.toml");
    std::fs::write(&path, "backend_url = \"http://10.0.0.5:9000\"\n").unwrap();
    let config = ArenaConfig::load(&path);
    assert_eq!(config.backend_url, "http://10.0.0.5:9000");
    assert_eq!(config.request_timeout_secs, 120);
}

#[test]
fn config_load_missing_or_invalid_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        ArenaConfig::load(&dir.path().join("missing.toml")),
        ArenaConfig::default()
    );
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "backend_url = [").unwrap();
    assert_eq!(ArenaConfig::load(&path), ArenaConfig::default());
}

#[test]
fn config_toml_roundtrip() {
    let config = ArenaConfig::default();
    let back: ArenaConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(back, config);
}
