//! End-to-end tests: train a dictionary on a corpus, push every document
//! through compress/decompress, and check the properties the optimizer
//! promises (determinism, size bounds, graceful empty cases).

use sdc::codec::{SubstringPacker, SubstringUnpacker, Token, TokenBuffer};
use sdc::corpus::Corpus;
use sdc::dict::DictionaryOptimizer;
use sdc::model::{CompressionModel, ModelVariant};

fn url_corpus() -> Corpus {
    Corpus::from_docs([
        "http://espn.de",
        "http://popsugar.de",
        "http://google.de",
        "http://yahoo.de",
        "http://www.linkedin.com",
        "http://www.facebook.com",
        "http:www.stanford.edu",
    ])
}

fn log_corpus() -> Corpus {
    Corpus::from_docs((0..200).map(|i| {
        format!(
            "2026-08-{:02}T12:{:02}:00Z INFO request method=GET path=/api/v2/users/{i} status=200",
            i % 28 + 1,
            i % 60,
        )
    }))
}

/// Every training document must survive a compress/decompress cycle
/// byte-for-byte, and so must documents the model never saw.
#[test]
fn round_trip_whole_corpus() {
    for corpus in [url_corpus(), log_corpus()] {
        let model = CompressionModel::build(ModelVariant::Substring, &corpus, 2048).unwrap();
        for doc in corpus.iter() {
            let compressed = model.compress(doc).unwrap();
            let restored = model.decompress(&compressed).unwrap();
            assert_eq!(restored, doc);
        }

        let unseen = b"2026-09-01T00:00:00Z WARN request method=POST path=/api/v2/login status=401";
        let compressed = model.compress(unseen).unwrap();
        assert_eq!(model.decompress(&compressed).unwrap(), unseen);
    }
}

#[test]
fn round_trip_pathological_documents() {
    let model = CompressionModel::build(ModelVariant::Substring, &url_corpus(), 1024).unwrap();
    let docs: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![b'a'; 1],
        vec![b'a'; 10_000],
        (0..=255u8).collect(),
        b"http://http://http://".to_vec(),
        vec![0u8; 64],
    ];
    for doc in docs {
        let compressed = model.compress(&doc).unwrap();
        assert_eq!(model.decompress(&compressed).unwrap(), doc);
    }
}

#[test]
fn optimization_is_idempotent() {
    let corpus = log_corpus();
    let first = DictionaryOptimizer::new(&corpus).optimize(4096);
    let second = DictionaryOptimizer::new(&corpus).optimize(4096);
    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert!(first.len() <= 4096);
}

#[test]
fn dictionary_makes_compression_better() {
    let corpus = log_corpus();
    let with_dict = CompressionModel::build(ModelVariant::Substring, &corpus, 4096).unwrap();
    let without_dict = CompressionModel::with_dictionary(None);

    let doc = corpus.get(0);
    let dict_size = with_dict.compress(doc).unwrap().len();
    let bare_size = without_dict.compress(doc).unwrap().len();
    assert!(
        dict_size < bare_size,
        "dictionary {dict_size} vs bare {bare_size} bytes"
    );
    assert!(dict_size < doc.len());
}

/// The packer and unpacker agree without any serialization in between:
/// the unpacker is itself a TokenSink.
#[test]
fn packer_drives_unpacker_directly() {
    let dictionary = DictionaryOptimizer::new(&url_corpus()).optimize(512);
    let packer = SubstringPacker::new(dictionary.clone());
    let mut unpacker = SubstringUnpacker::new(&dictionary);

    for doc in url_corpus().iter() {
        packer.pack(doc, &mut unpacker).unwrap();
        assert_eq!(unpacker.take_document(), doc);
    }
}

#[test]
fn empty_corpus_yields_empty_dictionary_and_still_works() {
    let corpus = Corpus::new();
    let model = CompressionModel::build(ModelVariant::Substring, &corpus, 1024).unwrap();
    let doc = b"never seen anything like this";
    let compressed = model.compress(doc).unwrap();
    assert_eq!(model.decompress(&compressed).unwrap(), doc);
}

#[test]
fn emitted_matches_stay_inside_the_window() {
    let corpus = url_corpus();
    let dictionary = DictionaryOptimizer::new(&corpus).optimize(1024);
    let packer = SubstringPacker::new(dictionary.clone());

    for doc in corpus.iter() {
        let mut tokens = TokenBuffer::new();
        packer.pack(doc, &mut tokens).unwrap();

        let mut emitted = 0i64;
        for token in tokens.tokens() {
            match *token {
                Token::Literal(_) => emitted += 1,
                Token::Match { offset, length } => {
                    assert!(offset < 0);
                    assert!(length >= 1);
                    // The match must start inside {dictionary ++ output}.
                    assert!(emitted + offset as i64 + dictionary.len() as i64 >= 0);
                    emitted += length as i64;
                }
            }
        }
        assert_eq!(emitted, doc.len() as i64);
    }
}

#[test]
fn corrupt_stream_is_rejected_not_garbled() {
    let model = CompressionModel::build(ModelVariant::Substring, &url_corpus(), 1024).unwrap();
    let mut compressed = model.compress(b"http://www.google.de/search").unwrap();

    // Flip the first tag to something undefined.
    compressed[0] = 0xee;
    assert!(model.decompress(&compressed).is_err());
}
