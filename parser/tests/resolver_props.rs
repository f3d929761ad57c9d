//! Property tests for content-type resolution and N-Triples literal escapes.

use proptest::prelude::*;

use serializedform::{parsing_provider, resolve, supported_formats, Literal, SimpleGraph, Term};

fn known_media_type() -> impl Strategy<Value = &'static str> {
    let formats: Vec<&'static str> = supported_formats().collect();
    prop::sample::select(formats)
}

proptest! {
    #[test]
    fn prop_parameters_never_change_the_grammar(
        media_type in known_media_type(),
        parameters in "[ -~]{0,24}",
    ) {
        let with_parameters = format!("{media_type};{parameters}");
        prop_assert_eq!(resolve(&with_parameters), resolve(media_type));
    }

    #[test]
    fn prop_unknown_types_report_the_original_string(content_type in "[a-z]{1,8}/[a-z0-9.+-]{1,12}(;[ -~]{0,12})?") {
        let stripped = content_type.split(';').next().unwrap_or_default();
        prop_assume!(supported_formats().all(|known| known != stripped));
        let err = resolve(&content_type).unwrap_err();
        prop_assert_eq!(err.content_type, content_type);
    }

    #[test]
    fn prop_ntriples_literals_survive_escaping(value in "\\PC{0,32}") {
        let mut escaped = String::new();
        for c in value.chars() {
            match c {
                '"' => escaped.push_str("\\\""),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                c => escaped.push(c),
            }
        }
        let document = format!("<http://e/s> <http://e/p> \"{escaped}\" .\n");

        let mut graph = SimpleGraph::new();
        parsing_provider()
            .parse(&mut graph, document.as_bytes(), "application/n-triples", None)
            .unwrap();
        let triple = graph.iter().next().unwrap();
        prop_assert_eq!(&triple.object, &Term::Literal(Literal::simple(value.as_str())));
    }
}
