use fc_extract::record::ParseOutcome;
use fc_extract::registry;
use serde_json::{json, Value};

fn parse(format: &str, text: &str) -> ParseOutcome {
    registry::install_default_formats();
    registry::get(format).expect("format registered").parse(text)
}

fn arguments_json(outcome: &ParseOutcome, idx: usize) -> Value {
    let calls = outcome.tool_calls.as_ref().expect("calls");
    serde_json::from_str(&calls[idx].arguments).expect("argument JSON")
}

// -- registry surface ---------------------------------------------------

#[test]
fn unknown_format_is_a_hard_error_listing_known_names() {
    registry::install_default_formats();
    let err = registry::get("no_such_format").expect_err("must not resolve");
    let message = err.to_string();
    assert!(message.contains("no_such_format"));
    assert!(message.contains("hermes"));
    assert!(message.contains("qwen3_coder"));

    let names = registry::list();
    assert!(names.windows(2).all(|pair| pair[0] <= pair[1]), "sorted");
}

// -- cheap rejection: byte-for-byte passthrough -------------------------

#[test]
fn marker_free_text_comes_back_verbatim_for_every_format() {
    registry::install_default_formats();
    let text = "  Unmarked text.\nNothing to see here. \t";
    for name in registry::list() {
        let outcome = parse(&name, text);
        assert_eq!(
            outcome.content.as_deref(),
            Some(text),
            "format {name} must return the original text unchanged"
        );
        assert!(outcome.tool_calls.is_none(), "format {name}");
    }
}

// -- concrete scenarios -------------------------------------------------

#[test]
fn hermes_weather_scenario() {
    let text = "Sure.\n<tool_call>\n{\"name\": \"get_weather\", \"arguments\": {\"city\": \"Paris\"}}\n</tool_call>";
    let outcome = parse("hermes", text);
    assert_eq!(outcome.content.as_deref(), Some("Sure."));
    let calls = outcome.tool_calls.as_ref().expect("calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "get_weather");
    assert_eq!(calls[0].arguments, "{\"city\": \"Paris\"}");
}

#[test]
fn llama_parameters_scenario() {
    let text = "I'll check.\n{\"name\": \"lookup\", \"parameters\": {\"id\": 7}}";
    let outcome = parse("llama3_json", text);
    let calls = outcome.tool_calls.as_ref().expect("calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].arguments, "{\"id\": 7}");
}

#[test]
fn mistral_legacy_scenario() {
    let text = "[TOOL_CALLS] [{\"name\": \"ping\", \"arguments\": {}}]";
    let outcome = parse("mistral", text);
    assert_eq!(outcome.content, None);
    let calls = outcome.tool_calls.as_ref().expect("calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "ping");
}

#[test]
fn malformed_second_block_keeps_the_first() {
    let text = "<tool_call>{\"name\": \"first\", \"arguments\": {}}</tool_call>\n\
                <tool_call>{broken</tool_call>";
    let outcome = parse("hermes", text);
    let calls = outcome.tool_calls.as_ref().expect("calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "first");
}

// -- truncation recovery ------------------------------------------------

#[test]
fn truncated_generation_still_yields_one_call() {
    let text = "On it.\n<tool_call>\n{\"name\": \"save\", \"arguments\": {\"path\": \"a.txt\"}}";
    let outcome = parse("qwen", text);
    let calls = outcome.tool_calls.as_ref().expect("calls");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "save");
}

// -- ordering -----------------------------------------------------------

#[test]
fn three_blocks_keep_left_to_right_order() {
    let text = "<tool_call>{\"name\": \"one\", \"arguments\": {}}</tool_call>\
                <tool_call>{\"name\": \"two\", \"arguments\": {}}</tool_call>\
                <tool_call>{\"name\": \"three\", \"arguments\": {}}</tool_call>";
    let outcome = parse("hermes", text);
    let calls = outcome.tool_calls.as_ref().expect("calls");
    let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["one", "two", "three"]);
}

// -- aliases share grammars ---------------------------------------------

#[test]
fn aliases_agree_with_their_primaries() {
    let hermes_text =
        "<tool_call>{\"name\": \"f\", \"arguments\": {\"a\": 1}}</tool_call>";
    let a = parse("hermes", hermes_text);
    let b = parse("qwen", hermes_text);
    assert_eq!(a.content, b.content);
    assert_eq!(
        a.tool_calls.as_ref().map(|c| (&c[0].name, &c[0].arguments)),
        b.tool_calls.as_ref().map(|c| (&c[0].name, &c[0].arguments)),
    );

    let ds_text = "<｜tool▁calls▁begin｜><｜tool▁call▁begin｜>f<｜tool▁sep｜>{}<｜tool▁call▁end｜>";
    let a = parse("deepseek_v3_1", ds_text);
    let b = parse("deepseek_v31", ds_text);
    assert_eq!(
        a.tool_calls.as_ref().map(|c| c[0].name.clone()),
        b.tool_calls.as_ref().map(|c| c[0].name.clone()),
    );

    let llama_text = "{\"name\": \"f\", \"arguments\": {}}";
    let a = parse("llama3_json", llama_text);
    let b = parse("llama4_json", llama_text);
    assert_eq!(a.tool_calls.is_some(), b.tool_calls.is_some());
}

// -- round trips --------------------------------------------------------

#[test]
fn encoding_and_reparsing_reproduces_names_and_arguments() {
    registry::install_default_formats();
    let fixtures: Vec<(&str, Value)> = vec![
        ("get_weather", json!({"city": "Paris", "unit": "C"})),
        ("run", json!({"cmd": "ls", "timeout": 5})),
    ];

    for (name, args) in &fixtures {
        let args_text = serde_json::to_string(args).expect("serialize");

        let hermes = format!(
            "<tool_call>{{\"name\": \"{name}\", \"arguments\": {args_text}}}</tool_call>"
        );
        let outcome = parse("hermes", &hermes);
        assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].name, *name);
        assert_eq!(arguments_json(&outcome, 0), *args);

        let v31 = format!(
            "<｜tool▁calls▁begin｜><｜tool▁call▁begin｜>{name}<｜tool▁sep｜>{args_text}<｜tool▁call▁end｜>"
        );
        let outcome = parse("deepseek_v3_1", &v31);
        assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].name, *name);
        assert_eq!(arguments_json(&outcome, 0), *args);

        let kimi = format!(
            "<|tool_calls_section_begin|><|tool_call_begin|>functions.{name}:0<|tool_call_argument_begin|>{args_text}<|tool_call_end|><|tool_calls_section_end|>"
        );
        let outcome = parse("kimi_k2", &kimi);
        assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].name, *name);
        assert_eq!(arguments_json(&outcome, 0), *args);

        let mistral = format!("[TOOL_CALLS]{name}{args_text}");
        let outcome = parse("mistral", &mistral);
        assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].name, *name);
        assert_eq!(arguments_json(&outcome, 0), *args);

        let llama = format!("{{\"name\": \"{name}\", \"arguments\": {args_text}}}");
        let outcome = parse("llama3_json", &llama);
        assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].name, *name);
        assert_eq!(arguments_json(&outcome, 0), *args);
    }
}

#[test]
fn glm_round_trip_through_key_value_pairs() {
    let text = "<tool_call>get_weather\n\
                <arg_key>city</arg_key><arg_value>Paris</arg_value>\n\
                <arg_key>days</arg_key><arg_value>3</arg_value>\n\
                </tool_call>";
    for format in ["glm45", "glm47"] {
        let outcome = parse(format, text);
        let calls = outcome.tool_calls.as_ref().expect("calls");
        assert_eq!(calls[0].name, "get_weather", "format {format}");
        assert_eq!(
            arguments_json(&outcome, 0),
            json!({"city": "Paris", "days": 3}),
            "format {format}"
        );
    }
}

// -- id policies --------------------------------------------------------

#[test]
fn id_policies_are_format_specific() {
    let outcome = parse(
        "hermes",
        "<tool_call>{\"name\": \"f\", \"arguments\": {}}</tool_call>",
    );
    let id = &outcome.tool_calls.as_ref().expect("calls")[0].id;
    assert!(id.starts_with("call_"));
    assert_eq!(id.len(), "call_".len() + 8);

    let outcome = parse(
        "kimi_k2",
        "<|tool_calls_section_begin|><|tool_call_begin|>functions.f:0<|tool_call_argument_begin|>{}<|tool_call_end|>",
    );
    assert_eq!(outcome.tool_calls.as_ref().expect("calls")[0].id, "functions.f:0");

    let outcome = parse("mistral", "[TOOL_CALLS]f{}");
    let id = &outcome.tool_calls.as_ref().expect("calls")[0].id;
    assert_eq!(id.len(), 9);
    assert!(id.bytes().all(|b| b.is_ascii_alphanumeric()));

    let outcome = parse(
        "qwen3_coder",
        "<tool_call><function=f></function></tool_call>",
    );
    let id = &outcome.tool_calls.as_ref().expect("calls")[0].id;
    assert_eq!(id.len(), "call_".len() + 24);
}

// -- content never contains the first block -----------------------------

#[test]
fn content_stops_before_the_first_marker() {
    let cases = [
        (
            "hermes",
            "prose\n<tool_call>{\"name\": \"f\", \"arguments\": {}}</tool_call>\ntrailing",
        ),
        (
            "glm45",
            "prose\n<tool_call>f\n<arg_key>k</arg_key><arg_value>v</arg_value></tool_call>",
        ),
        ("mistral", "prose\n[TOOL_CALLS]f{\"a\": 1}"),
    ];
    for (format, text) in cases {
        let outcome = parse(format, text);
        assert_eq!(outcome.content.as_deref(), Some("prose"), "format {format}");
    }
}
