use preprocessing::{normalize, StopWords, TextNormalizer};

const SAMPLE_REVIEWS: &[&str] = &[
    "",
    "a",
    "I",
    "<br/>",
    "One of the other reviewers has mentioned that after watching just 1 Oz episode you'll be hooked.",
    "A wonderful little production. <br /><br />The filming technique is very unassuming- very old-time-BBC fashion",
    "Basically there's a family where a little boy (Jake) thinks there's a zombie in his closet & his parents are fighting all the time.",
    "<i>Petter Mattei's</i> \"Love in the Time of Money\" is a visually stunning film to watch!!!",
    "x a b c y z",
    "   \t\n  mixed\twhitespace\n\nand   TABS  ",
    "1234567890 !@#$%^&*()",
    "ünïcödé wörds ärë splït",
];

#[test]
fn test_normalize_is_idempotent() {
    for review in SAMPLE_REVIEWS {
        let once = normalize(review);
        let twice = normalize(&once);
        assert_eq!(once, twice, "normalize not idempotent for {:?}", review);
    }
}

#[test]
fn test_normalized_text_shape() {
    let stopwords = StopWords::english();

    for review in SAMPLE_REVIEWS {
        let normalized = normalize(review);

        assert_eq!(normalized.trim(), normalized);
        assert!(!normalized.contains("  "), "double space in {:?}", normalized);
        for token in normalized.split(' ').filter(|t| !t.is_empty()) {
            assert!(token.len() >= 2, "short token {:?} from {:?}", token, review);
            assert!(token.chars().all(|c| c.is_ascii_lowercase()));
            assert!(!stopwords.contains(token), "stopword {:?} survived", token);
        }
    }
}

#[test]
fn test_known_reviews() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("<b>HELLO world</b> 123"), "hello world");
    assert_eq!(
        normalize("This movie was absolutely great and wonderful!"),
        "movie absolutely great wonderful"
    );
    assert_eq!(
        normalize("A wonderful little production. <br /><br />The filming technique is very unassuming- very old-time-BBC fashion"),
        "wonderful little production filming technique unassuming old time bbc fashion"
    );
}

#[test]
fn test_custom_normalizer_matches_default_with_same_list() {
    let custom = TextNormalizer::with_stopwords(StopWords::english());
    for review in SAMPLE_REVIEWS {
        assert_eq!(custom.normalize(review), normalize(review));
    }
}
