// Lexical scorers: count-vector cosine and keyword overlap
use ahash::AHashSet;

use crate::scorer::{
    score_batch, PassageScore, Scorer, DEFAULT_OVERLAP_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::tokenizer::{tokenize, KEYWORD_MIN_WORD_CHARS};
use crate::{Corpus, Error, Result};

/// Cosine similarity between frozen-vocabulary count vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalCosineScorer;

impl Scorer for LexicalCosineScorer {
    fn name(&self) -> &'static str {
        "lexical_cosine"
    }

    fn default_threshold(&self) -> f32 {
        DEFAULT_SIMILARITY_THRESHOLD
    }

    fn validate(&self, corpus: &Corpus) -> Result<()> {
        if corpus.is_empty() || corpus.lexical().is_some() {
            Ok(())
        } else {
            Err(Error::MissingFeatures("lexical"))
        }
    }

    fn score_all(&self, query: &str, corpus: &Corpus) -> Result<Vec<PassageScore>> {
        let Some(lexical) = corpus.lexical() else {
            return Ok(Vec::new());
        };

        let query_vector = lexical.space().vectorize(query);
        let query_norm = query_vector.norm();
        if query_norm == 0.0 {
            return Ok(Vec::new());
        }

        let vectors = lexical.vectors();
        let norms = lexical.norms();
        Ok(score_batch(vectors.len(), |index| {
            let passage_norm = norms[index];
            let similarity = if passage_norm == 0.0 {
                0.0
            } else {
                vectors[index].dot(&query_vector) / (passage_norm * query_norm)
            };
            PassageScore::similarity(index, similarity)
        }))
    }
}

/// Fraction of distinct query words (longer than three characters) that occur
/// as substrings of the lowercased passage
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOverlapScorer;

impl KeywordOverlapScorer {
    /// Distinct lowercased query words eligible for matching
    pub fn query_words(query: &str) -> Vec<String> {
        let mut seen = AHashSet::new();
        tokenize(query, KEYWORD_MIN_WORD_CHARS)
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect()
    }
}

impl Scorer for KeywordOverlapScorer {
    fn name(&self) -> &'static str {
        "keyword_overlap"
    }

    fn default_threshold(&self) -> f32 {
        DEFAULT_OVERLAP_THRESHOLD
    }

    fn validate(&self, _corpus: &Corpus) -> Result<()> {
        Ok(())
    }

    fn score_all(&self, query: &str, corpus: &Corpus) -> Result<Vec<PassageScore>> {
        let words = Self::query_words(query);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let total = words.len() as f32;
        let passages = corpus.passages();
        Ok(score_batch(passages.len(), |index| {
            let folded = passages[index].folded();
            let matches = words.iter().filter(|w| folded.contains(w.as_str())).count();
            PassageScore::similarity(index, matches as f32 / total)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CorpusBuilder;

    fn manual() -> Corpus {
        Corpus::build([
            "Door sensor alignment: clearance 5mm minimum.",
            "Safety circuit testing procedure.",
            "Error code E5: door obstruction detected.",
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_scores() {
        let corpus = manual();
        let scores = LexicalCosineScorer.score_all("door obstruction", &corpus).unwrap();
        assert_eq!(scores.len(), 3);

        // door sensor alignment clearance 5mm minimum -> 6 tokens, 1 shared
        let expected_sensor = 1.0 / (6.0f32.sqrt() * 2.0f32.sqrt());
        // error code door obstruction detected -> 5 tokens, 2 shared
        let expected_e5 = 2.0 / (5.0f32.sqrt() * 2.0f32.sqrt());
        assert!((scores[0].similarity - expected_sensor).abs() < 1e-6);
        assert_eq!(scores[1].similarity, 0.0);
        assert!((scores[2].similarity - expected_e5).abs() < 1e-6);
        assert!(scores.iter().all(|s| s.distance.is_none()));
    }

    #[test]
    fn test_cosine_unknown_query_is_empty() {
        let corpus = manual();
        assert!(LexicalCosineScorer.score_all("zzz qqq", &corpus).unwrap().is_empty());
        assert!(LexicalCosineScorer.score_all("", &corpus).unwrap().is_empty());
        // "e5" and "is" are too short to be vocabulary members
        assert!(LexicalCosineScorer.score_all("e5 is", &corpus).unwrap().is_empty());
    }

    #[test]
    fn test_cosine_requires_lexical_features() {
        let corpus = CorpusBuilder::new()
            .lexical_features(false)
            .build(["door"])
            .unwrap();
        assert!(matches!(
            LexicalCosineScorer.validate(&corpus),
            Err(Error::MissingFeatures("lexical"))
        ));
        assert!(LexicalCosineScorer.validate(&Corpus::empty()).is_ok());
    }

    #[test]
    fn test_overlap_ratio() {
        let corpus = manual();
        let scores = KeywordOverlapScorer.score_all("door obstruction", &corpus).unwrap();
        assert_eq!(scores[0].similarity, 0.5);
        assert_eq!(scores[1].similarity, 0.0);
        assert_eq!(scores[2].similarity, 1.0);
    }

    #[test]
    fn test_overlap_substring_and_distinct_words() {
        let corpus = Corpus::build(["Doors must close within limits"]).unwrap();
        // "door" matches inside "doors"; the repeated word counts once
        let scores = KeywordOverlapScorer
            .score_all("door door grinding", &corpus)
            .unwrap();
        assert_eq!(scores[0].similarity, 0.5);
    }

    #[test]
    fn test_overlap_short_words_ignored() {
        let corpus = manual();
        assert!(KeywordOverlapScorer.score_all("E5 on car", &corpus).unwrap().is_empty());
        assert_eq!(
            KeywordOverlapScorer::query_words("Door, door and DOOR gate"),
            vec!["door".to_string(), "gate".to_string()]
        );
    }
}
