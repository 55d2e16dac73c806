use proptest::prelude::*;

use groupwatch::pipeline::{tokenize, Scalar};

fn word() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./=-]{1,12}"
}

fn gap() -> impl Strategy<Value = String> {
    "[ \t\n]{1,4}"
}

proptest! {
    #[test]
    fn unquoted_words_split_on_whitespace(
        words in proptest::collection::vec(word(), 0..8),
        gaps in proptest::collection::vec(gap(), 8),
        lead in "[ \t]{0,3}",
        trail in "[ \t]{0,3}",
    ) {
        let mut line = lead.clone();
        for (i, w) in words.iter().enumerate() {
            if i > 0 {
                line.push_str(&gaps[i]);
            }
            line.push_str(w);
        }
        line.push_str(&trail);

        prop_assert_eq!(tokenize(&line), words);
    }

    #[test]
    fn single_quotes_keep_content_verbatim(body in r"[^'\x{FFFD}\x00]{0,20}") {
        let line = format!("cmd '{body}'");
        prop_assert_eq!(tokenize(&line), vec!["cmd".to_string(), body]);
    }

    #[test]
    fn tokens_never_contain_dropped_characters(input in "\\PC{0,40}") {
        for token in tokenize(&input) {
            prop_assert!(!token.contains('\u{FFFD}'), "replacement char leaked into {:?}", token);
            prop_assert!(!token.contains('\u{0}'), "NUL leaked into {:?}", token);
        }
    }

    #[test]
    fn integers_coerce_to_integers(n in any::<i64>()) {
        prop_assume!(n != 0 && n != 1);
        prop_assert_eq!(Scalar::coerce(n.to_string()), Scalar::Integer(n));
    }
}
