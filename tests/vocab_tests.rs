use tinyformer::{ArithmeticVocab, Vocabulary, WordVocab};

#[test]
fn arithmetic_vocab_round_trips_questions() {
    let vocab = ArithmeticVocab::new();
    assert_eq!(vocab.len(), 13);

    let ids = vocab.encode("17+25=");
    assert_eq!(ids.len(), 6);
    assert_eq!(vocab.decode(&ids), "17+25=");
}

#[test]
fn arithmetic_vocab_keeps_padding_spaces() {
    let vocab = ArithmeticVocab::new();
    let ids = vocab.encode("2+3=  ");
    assert_eq!(ids.len(), 6);
    assert_eq!(vocab.decode(&ids), "2+3=  ");
}

#[test]
#[should_panic(expected = "missing from vocabulary")]
fn arithmetic_vocab_rejects_unknown_symbols() {
    let vocab = ArithmeticVocab::new();
    vocab.encode("2-3=");
}

#[test]
#[should_panic(expected = "out of range")]
fn arithmetic_vocab_rejects_unknown_ids() {
    let vocab = ArithmeticVocab::new();
    vocab.decode(&[99]);
}

#[test]
fn word_vocab_assigns_sorted_dense_ids() {
    let vocab = WordVocab::fit("the cat saw the dog. The dog ran!").expect("fit vocabulary");

    // Eight distinct tokens, punctuation first, then case-sensitive words.
    assert_eq!(vocab.len(), 8);
    assert_eq!(vocab.encode("!"), vec![0]);
    assert_eq!(vocab.encode("."), vec![1]);
    assert_eq!(vocab.encode("The"), vec![2]);
    assert_eq!(vocab.encode("the cat"), vec![7, 3]);
}

#[test]
fn word_vocab_round_trips_punctuation() {
    let vocab = WordVocab::fit("hello, world!").expect("fit vocabulary");
    let ids = vocab.encode("hello, world!");
    assert_eq!(ids.len(), 4);
    assert_eq!(vocab.decode(&ids), "hello, world!");
}

#[test]
fn word_vocab_drops_unknown_tokens() {
    let vocab = WordVocab::fit("alpha beta").expect("fit vocabulary");
    let ids = vocab.encode("alpha gamma beta");
    assert_eq!(ids.len(), 2);
    assert_eq!(vocab.decode(&ids), "alpha beta");
}

#[test]
fn special_ids_surface_through_the_trait() {
    let arithmetic = ArithmeticVocab::new();
    let word = WordVocab::fit("some text").expect("fit vocabulary");

    let arithmetic: &dyn Vocabulary = &arithmetic;
    assert_eq!(arithmetic.pad_id(), Some(12));
    assert_eq!(arithmetic.bos_id(), None);
    assert_eq!(arithmetic.eos_id(), None);
    assert_eq!(arithmetic.unk_id(), None);

    let word: &dyn Vocabulary = &word;
    assert_eq!(word.pad_id(), None);
    assert_eq!(word.unk_id(), None);
}
