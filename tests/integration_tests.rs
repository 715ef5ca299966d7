mod integration_tests_helper {

    use fakit::{document, validate_string, SubsetLimits};
    use serde_json::{json, Value};

    // NFA with an epsilon move out of the start state: q0 --ɛ--> q1,
    // q1 loops on a and moves to q2 on b, q2 absorbs a and b, accept q2
    pub fn epsilon_nfa_document() -> Value {
        json!({
            "states": ["q0", "q1", "q2"],
            "symbols": ["a", "b", "ɛ"],
            "transitions": {
                "q0": {"ɛ": ["q1"]},
                "q1": {"a": ["q1"], "b": ["q2"]},
                "q2": {"a": ["q2"], "b": ["q2"]}
            },
            "start_state": "q0",
            "end_states": ["q2"]
        })
    }

    // DFA over {0, 1} where every pair of states is distinguishable
    pub fn four_state_dfa_document() -> Value {
        json!({
            "states": ["A", "B", "C", "D"],
            "symbols": ["0", "1"],
            "transitions": {
                "A": {"0": ["B"], "1": ["C"]},
                "B": {"0": ["A"], "1": ["D"]},
                "C": {"0": ["D"], "1": ["A"]},
                "D": {"0": ["D"], "1": ["D"]}
            },
            "start_state": "A",
            "end_states": ["D"]
        })
    }

    // DFA where s1/s3 and s0/s2 are pairwise indistinguishable
    pub fn redundant_dfa_document() -> Value {
        json!({
            "states": ["s0", "s1", "s2", "s3"],
            "symbols": ["a", "b"],
            "transitions": {
                "s0": {"a": ["s1"], "b": ["s2"]},
                "s1": {"a": ["s1"], "b": ["s2"]},
                "s2": {"a": ["s3"], "b": ["s2"]},
                "s3": {"a": ["s3"], "b": ["s2"]}
            },
            "start_state": "s0",
            "end_states": ["s1", "s3"]
        })
    }

    pub fn convert(nfa_document: &Value) -> Value {
        let nfa = document::decode_automaton(&nfa_document.to_string()).unwrap();
        let (dfa, conversion_info) =
            fakit::construct_dfa(&nfa, &SubsetLimits::default()).unwrap();
        document::encode_conversion(&dfa, &conversion_info)
    }

    pub fn minimize(dfa_document: &Value) -> Value {
        let dfa = document::decode_automaton(&dfa_document.to_string()).unwrap();
        let minimal_dfa = fakit::minimize_dfa(&dfa).unwrap();
        document::encode_minimized(&minimal_dfa)
    }

    /// Run a validation request assembled from an automaton document and an
    /// input string, returning the result document
    pub fn validate(automaton_document: &Value, input: &str) -> Value {
        let mut request = automaton_document.clone();
        request["input"] = json!(input);
        let (fa, document_input) =
            document::decode_validation_request(&request.to_string()).unwrap();
        let validation = validate_string(&fa, &document_input.unwrap());
        document::encode_validation(&validation)
    }

    pub fn accepted(automaton_document: &Value, input: &str) -> bool {
        validate(automaton_document, input)["accepted"] == json!(true)
    }

    /// Every string over {a, b} (or the two given symbols) up to the length
    pub fn words(first: char, second: char, max_length: u32) -> Vec<String> {
        let mut result = Vec::new();
        for length in 0..=max_length {
            for word in 0..(1u32 << length) {
                result.push(
                    (0..length)
                        .map(|bit| if word & (1 << bit) != 0 { second } else { first })
                        .collect(),
                );
            }
        }
        result
    }
}

mod integration_tests {
    use crate::integration_tests_helper::{
        accepted, convert, epsilon_nfa_document, four_state_dfa_document, minimize,
        redundant_dfa_document, validate, words,
    };

    use fakit::{classify, document, to_dot, FaError, FaType, SubsetLimits};
    use serde_json::json;

    #[test]
    fn test_subset_construction_scenario() {
        let nfa_document = epsilon_nfa_document();
        let conversion = convert(&nfa_document);

        assert_eq!(conversion["success"], json!(true));
        assert_eq!(conversion["conversion_info"]["original_nfa_states"], json!(3));
        assert_eq!(
            conversion["conversion_info"]["epsilon_transitions_removed"],
            json!(true)
        );
        assert_eq!(conversion["dfa"]["start_state"], json!("q0"));

        // The DFA must not see epsilon in its alphabet
        assert_eq!(conversion["dfa"]["symbols"], json!(["a", "b"]));

        let dfa_document = conversion["dfa"].clone();
        assert!(accepted(&dfa_document, "bb"));
        assert!(!accepted(&dfa_document, "a"));

        // Three subsets get discovered ({q0,q1}, {q1}, {q2}); the language
        // itself needs only two states, which minimization recovers
        assert_eq!(
            conversion["conversion_info"]["resulting_dfa_states"],
            json!(3)
        );
        let minimal = minimize(&dfa_document);
        assert_eq!(minimal["states"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_conversion_preserves_language() {
        let nfa_document = epsilon_nfa_document();
        let conversion = convert(&nfa_document);
        let dfa_document = conversion["dfa"].clone();

        for input in words('a', 'b', 4) {
            assert_eq!(
                accepted(&nfa_document, &input),
                accepted(&dfa_document, &input),
                "disagreement on {:?}",
                input
            );
        }
    }

    #[test]
    fn test_conversion_ignores_undeclared_symbols() {
        // The only move out of q0 uses a symbol missing from the symbols
        // list, so subset construction never follows it
        let nfa_document = json!({
            "states": ["q0", "q1"],
            "symbols": ["a"],
            "transitions": {"q0": {"b": ["q1"]}},
            "start_state": "q0",
            "end_states": ["q1"]
        });

        let conversion = convert(&nfa_document);
        assert_eq!(conversion["dfa"]["symbols"], json!(["a"]));
        assert_eq!(conversion["dfa"]["states"], json!(["q0"]));
    }

    #[test]
    fn test_minimization_scenario() {
        let dfa_document = four_state_dfa_document();
        let minimal = minimize(&dfa_document);

        assert_eq!(minimal["success"], json!(true));
        assert_eq!(minimal["start_state"], json!("A"));

        let original_count = dfa_document["states"].as_array().unwrap().len();
        let minimal_count = minimal["states"].as_array().unwrap().len();
        assert!(minimal_count <= original_count);

        for input in words('0', '1', 4) {
            assert_eq!(
                accepted(&dfa_document, &input),
                accepted(&minimal, &input),
                "disagreement on {:?}",
                input
            );
        }
    }

    #[test]
    fn test_minimization_merges_redundant_states() {
        let dfa_document = redundant_dfa_document();
        let minimal = minimize(&dfa_document);

        assert_eq!(minimal["states"].as_array().unwrap().len(), 2);
        assert_eq!(minimal["start_state"], json!("s0"));
        assert_eq!(minimal["end_states"].as_array().unwrap().len(), 1);

        for input in words('a', 'b', 4) {
            assert_eq!(
                accepted(&dfa_document, &input),
                accepted(&minimal, &input),
                "disagreement on {:?}",
                input
            );
        }
    }

    #[test]
    fn test_minimized_document_schema() {
        let minimal = minimize(&redundant_dfa_document());

        for state in minimal["states"].as_array().unwrap() {
            let moves = &minimal["transitions"][state.as_str().unwrap()];
            // Every symbol explicit, plus the empty epsilon entry
            assert!(moves["a"].is_array());
            assert!(moves["b"].is_array());
            assert_eq!(moves["ɛ"], json!([]));
        }
    }

    #[test]
    fn test_validation_stuck_scenario() {
        // No state anywhere moves on 'c'
        let automaton = json!({
            "states": ["q0", "q1"],
            "symbols": ["a", "b"],
            "transitions": {
                "q0": {"a": ["q1"]},
                "q1": {"b": ["q1"]}
            },
            "start_state": "q0",
            "end_states": ["q1"]
        });

        let result = validate(&automaton, "abc");

        assert_eq!(result["success"], json!(false));
        assert_eq!(result["accepted"], json!(false));
        assert_eq!(result["input_length"], json!(3));

        let error = result["error"].as_str().unwrap();
        assert!(error.contains("'c'"), "unexpected message: {}", error);
        assert!(error.contains("position 2"), "unexpected message: {}", error);
    }

    #[test]
    fn test_validation_path_shows_epsilon_entries() {
        let result = validate(&epsilon_nfa_document(), "b");

        assert_eq!(result["success"], json!(true));
        assert_eq!(result["accepted"], json!(true));
        assert_eq!(result["path"], json!(["q0", "q1 (ɛ)", "q2"]));
        assert_eq!(result["path_length"], json!(3));
        assert_eq!(result["final_state"], json!("q2"));
    }

    #[test]
    fn test_empty_input_validation() {
        // Empty input is accepted iff the start closure hits an end state
        let result = validate(&epsilon_nfa_document(), "");
        assert_eq!(result["accepted"], json!(false));

        let mut accepting_start = epsilon_nfa_document();
        accepting_start["end_states"] = json!(["q1"]);
        let result = validate(&accepting_start, "");
        assert_eq!(result["accepted"], json!(true));
    }

    #[test]
    fn test_missing_field_error_document() {
        let incomplete = json!({
            "states": ["q0"],
            "symbols": ["a"],
            "transitions": {},
            "start_state": "q0"
        });

        let error = document::decode_automaton(&incomplete.to_string()).unwrap_err();
        let error_document = document::encode_error(&error);

        assert_eq!(error_document["success"], json!(false));
        let message = error_document["error"].as_str().unwrap();
        assert!(message.contains("end_states"), "unexpected message: {}", message);
    }

    #[test]
    fn test_state_limit_error_document() {
        let nfa = document::decode_automaton(&epsilon_nfa_document().to_string()).unwrap();
        let limits = SubsetLimits { max_states: 1 };

        let error = fakit::construct_dfa(&nfa, &limits).unwrap_err();
        assert!(matches!(error, FaError::StateLimit(1)));

        let error_document = document::encode_error(&error);
        assert_eq!(error_document["success"], json!(false));
    }

    #[test]
    fn test_minimizing_an_nfa_fails() {
        let error =
            document::decode_automaton(&epsilon_nfa_document().to_string())
                .and_then(|fa| fakit::minimize_dfa(&fa))
                .unwrap_err();

        assert!(matches!(error, FaError::MalformedTransition { .. }));
    }

    #[test]
    fn test_classification() {
        let nfa = document::decode_automaton(&epsilon_nfa_document().to_string()).unwrap();
        assert_eq!(classify(&nfa), FaType::Nfa);

        let conversion = convert(&epsilon_nfa_document());
        let dfa =
            document::decode_automaton(&conversion["dfa"].to_string()).unwrap();
        assert_eq!(classify(&dfa), FaType::Dfa);

        assert_eq!(document::encode_fa_type(classify(&dfa))["type"], json!("DFA"));
    }

    #[test]
    fn test_dot_export_document() {
        let fa = document::decode_automaton(&epsilon_nfa_document().to_string()).unwrap();
        let dot_document = document::encode_dot(&to_dot(&fa));

        assert_eq!(dot_document["success"], json!(true));
        assert!(dot_document["dot"].as_str().unwrap().starts_with("digraph"));
    }

    #[test]
    fn test_minimized_output_can_be_reminimized() {
        // The explicit empty epsilon entries in the output schema must decode
        // back as "no move", not as an epsilon transition
        let minimal = minimize(&redundant_dfa_document());
        let again = minimize(&minimal);

        assert_eq!(minimal["states"], again["states"]);
        assert_eq!(minimal["start_state"], again["start_state"]);
    }
}
