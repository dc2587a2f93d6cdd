use std::io::Write;

use approx::assert_abs_diff_eq;
use hmmtag::{BigramModel, Dataset, Error, Model, Space, Tagger, Trainer};

fn trained() -> BigramModel {
    let ds: Dataset = "time/NOUN flies/VERB\nflies/NOUN like/VERB arrows/NOUN\nhe/PRON likes/VERB time/NOUN"
        .parse()
        .unwrap();
    Trainer::default().train(&ds).unwrap()
}

#[test]
fn save_and_load() {
    let model = trained();
    let file = tempfile::NamedTempFile::new().unwrap();
    model.save(file.path()).unwrap();
    let loaded = BigramModel::from_path(file.path()).unwrap();

    assert_eq!(loaded.tags(), model.tags());
    assert_eq!(loaded.words(), model.words());
    let pairs = [
        (loaded.transition(), model.transition()),
        (loaded.emission(), model.emission()),
    ];
    for (a, b) in pairs {
        assert_eq!(a.num_rows(), b.num_rows());
        assert_eq!(a.num_cols(), b.num_cols());
        for (ra, rb) in a.rows().zip(b.rows()) {
            for (x, y) in ra.iter().zip(rb) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-15);
            }
        }
    }

    let sentence = ["he", "likes", "flies"];
    assert_eq!(
        loaded.tagger(Space::Linear).tag(&sentence),
        model.tagger(Space::Linear).tag(&sentence)
    );
}

#[test]
fn layout() {
    let model = trained();
    let mut buf = Vec::new();
    model.write(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "5");
    assert_eq!(lines[1], "7");
    assert_eq!(lines[2], "</s> <s> NOUN PRON VERB");
    assert_eq!(lines[3], "<UNK> arrows flies he like likes time");
    assert_eq!(lines.len(), 4 + 5 + 5);
    assert!(lines[4..9].iter().all(|l| l.split(' ').count() == 5));
    assert!(lines[9..].iter().all(|l| l.split(' ').count() == 7));
}

#[test]
fn declared_counts_must_match() {
    let model = trained();
    let mut buf = Vec::new();
    model.write(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", text.replacen("5\n7\n", "5\n8\n", 1)).unwrap();
    match BigramModel::from_path(file.path()) {
        Err(Error::InvalidModel(msg)) => assert!(msg.contains("declared 8 words"), "{msg}"),
        r => panic!("expected invalid model, got {r:?}"),
    }
}

#[test]
fn missing_file() {
    assert!(matches!(
        BigramModel::from_path("tests/does-not-exist.model"),
        Err(Error::Io(_))
    ));
}
