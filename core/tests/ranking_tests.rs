use sift_core::rank::scorer_for;
use sift_core::{
    Bm25, Bm25Params, DocId, EnglishNormalizer, Field, FieldWeights, IndexError, IndexWriter, ModelKind,
    NewDocument, QueryPlanner, Ranker, SearchIndex,
};
use std::sync::Arc;

fn corpus(bodies: &[&str]) -> SearchIndex {
    let mut writer = IndexWriter::new(Arc::new(EnglishNormalizer));
    for (i, body) in bodies.iter().enumerate() {
        let location = format!("doc{i}.html");
        writer.add(NewDocument { location: &location, body, ..Default::default() }).unwrap();
    }
    writer.finish()
}

fn body_only() -> FieldWeights {
    FieldWeights::empty().with(Field::Body, 2.0).unwrap().with(Field::Title, 0.0).unwrap()
}

fn search(index: &SearchIndex, q: &str, weights: FieldWeights, k: usize) -> Vec<(DocId, f64)> {
    let query = QueryPlanner::new(&EnglishNormalizer).plan(q, weights).unwrap();
    let bm25 = Bm25::default();
    Ranker::new(index, &bm25).rank(&query, k).into_iter().map(|r| (r.doc_id, r.score)).collect()
}

#[test]
fn higher_tf_ranks_first_and_non_matches_are_excluded() {
    let index = corpus(&["cat dog cat", "dog dog dog", "bird fish"]);
    let hits = search(&index, "dog", body_only(), 10);
    let ids: Vec<DocId> = hits.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 0]);
    assert!(hits[0].1 > hits[1].1);
}

#[test]
fn verbatim_body_word_is_always_a_candidate() {
    let index = corpus(&["Searching engines crawl pages", "unrelated words here"]);
    for word in ["Searching", "engines", "crawl", "pages"] {
        let hits = search(&index, word, FieldWeights::default(), 10);
        assert!(hits.iter().any(|(id, _)| *id == 0), "{word} did not match doc 0");
    }
}

#[test]
fn ties_break_by_ascending_doc_id_and_runs_are_identical() {
    let index = corpus(&["alpha beta", "gamma", "alpha beta", "alpha beta"]);
    let first = search(&index, "alpha", body_only(), 10);
    assert_eq!(first.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![0, 2, 3]);
    for _ in 0..5 {
        assert_eq!(search(&index, "alpha", body_only(), 10), first);
    }
}

#[test]
fn top_k_truncates_after_sorting() {
    let index = corpus(&["x", "x x", "x x x", "y"]);
    let hits = search(&index, "x", body_only(), 2);
    assert_eq!(hits.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![2, 1]);
    assert!(search(&index, "x", body_only(), 0).is_empty());
}

#[test]
fn unknown_terms_yield_no_results() {
    let index = corpus(&["cat", "dog"]);
    assert!(search(&index, "zebra", FieldWeights::default(), 10).is_empty());
}

#[test]
fn empty_index_yields_no_results() {
    let index = corpus(&[]);
    assert!(search(&index, "anything", FieldWeights::default(), 10).is_empty());
}

#[test]
fn stopword_query_is_rejected() {
    let err = QueryPlanner::new(&EnglishNormalizer).plan("the and of", FieldWeights::default()).unwrap_err();
    assert!(matches!(err, IndexError::EmptyQuery(_)));
}

#[test]
fn title_weight_lifts_title_matches() {
    let mut writer = IndexWriter::new(Arc::new(EnglishNormalizer));
    writer.add(NewDocument { location: "a", title: "compilers", body: "notes on parsing", ..Default::default() }).unwrap();
    writer.add(NewDocument { location: "b", title: "notes", body: "compilers compile code", ..Default::default() }).unwrap();
    let index = writer.finish();

    let title_heavy = FieldWeights::empty().with(Field::Title, 10.0).unwrap().with(Field::Body, 0.1).unwrap();
    assert_eq!(search(&index, "compilers", title_heavy, 10)[0].0, 0);
    let body_heavy = FieldWeights::empty().with(Field::Title, 0.1).unwrap().with(Field::Body, 10.0).unwrap();
    assert_eq!(search(&index, "compilers", body_heavy, 10)[0].0, 1);
}

#[test]
fn zero_weight_field_never_produces_candidates() {
    let mut writer = IndexWriter::new(Arc::new(EnglishNormalizer));
    writer.add(NewDocument { location: "a", title: "zebra", body: "stripes", ..Default::default() }).unwrap();
    let index = writer.finish();
    assert!(search(&index, "zebra", body_only(), 10).is_empty());
}

#[test]
fn tfidf_model_shares_candidates_and_order_rules() {
    let index = corpus(&["cat dog cat", "dog dog dog", "bird fish"]);
    let query = QueryPlanner::new(&EnglishNormalizer).plan("dog", body_only()).unwrap();
    let scorer = scorer_for(ModelKind::TfIdf, Bm25Params::default());
    let hits = Ranker::new(&index, scorer.as_ref()).rank(&query, 10);
    assert_eq!(hits.iter().map(|r| r.doc_id).collect::<Vec<_>>(), vec![1, 0]);
}

#[test]
fn index_can_be_searched_from_many_threads() {
    let index = Arc::new(corpus(&["rust threads", "rust async", "go routines"]));
    let expected = search(&index, "rust", body_only(), 10);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            std::thread::spawn(move || search(&index, "rust", body_only(), 10))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
