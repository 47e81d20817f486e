//! Fitted TF-IDF vector spaces and cosine scoring.
//!
//! A `TfidfSpace` is built once over the catalog at startup and is read-only
//! afterwards. Queries are mapped into the already-fit vocabulary —
//! out-of-vocabulary tokens contribute nothing, the space is never re-fit.
//!
//! Vectors are L2-normalized at construction, so cosine similarity reduces
//! to a dot product. All weights are non-negative, hence scores lie in [0,1].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

// Word tokens of two or more characters; single letters carry no signal.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token regex"));

/// Common English stop words excluded from every vector space.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "been",
    "before", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down", "during",
    "each", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "few", "for", "former", "from", "further", "had",
    "has", "have", "having", "he", "hence", "her", "here", "hereby", "herein", "hers",
    "herself", "him", "himself", "his", "how", "however", "if", "in", "indeed", "into", "is",
    "it", "its", "itself", "just", "keep", "last", "latter", "least", "less", "many", "may",
    "me", "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "much", "must",
    "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody",
    "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "same", "seem",
    "seemed", "seeming", "seems", "she", "should", "since", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "these", "they", "this", "those",
    "though", "through", "throughout", "thus", "to", "together", "too", "toward", "towards",
    "under", "until", "up", "upon", "us", "very", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas", "whereby",
    "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !STOP_WORDS.contains(t.as_str()))
        .collect()
}

/// A fitted text-to-vector mapping plus one L2-normalized vector per fitted
/// document.
#[derive(Debug, Clone)]
pub struct TfidfSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    doc_vectors: Vec<Vec<f64>>,
}

impl TfidfSpace {
    /// Build vocabulary, smoothed IDF, and the per-document matrix.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        for tokens in &tokenized {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens {
                let idx = match vocabulary.get(token) {
                    Some(&i) => i,
                    None => {
                        let i = vocabulary.len();
                        vocabulary.insert(token.clone(), i);
                        doc_freq.push(0);
                        i
                    }
                };
                if seen.insert(idx) {
                    doc_freq[idx] += 1;
                }
            }
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1. Keeps every fitted term
        // at a strictly positive weight.
        let n_docs = documents.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut space = Self {
            vocabulary,
            idf,
            doc_vectors: Vec::new(),
        };
        space.doc_vectors = tokenized
            .iter()
            .map(|tokens| space.weigh(tokens))
            .collect();
        space
    }

    /// Term counts → IDF weighting → L2 normalization.
    fn weigh(&self, tokens: &[String]) -> Vec<f64> {
        let mut v = vec![0.0; self.vocabulary.len()];
        for token in tokens {
            if let Some(&i) = self.vocabulary.get(token) {
                v[i] += 1.0;
            }
        }
        for (i, x) in v.iter_mut().enumerate() {
            *x *= self.idf[i];
        }
        l2_normalize(&mut v);
        v
    }

    /// Map arbitrary text into the fitted space.
    pub fn embed(&self, text: &str) -> Vec<f64> {
        self.weigh(&tokenize(text))
    }

    /// Cosine similarity of `text` against every fitted document, one score
    /// per document, each in [0,1].
    pub fn similarities(&self, text: &str) -> Vec<f64> {
        let query = self.embed(text);
        self.doc_vectors.iter().map(|doc| dot(&query, doc)).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn doc_count(&self) -> usize {
        self.doc_vectors.len()
    }
}

fn l2_normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<&'static str> {
        vec![
            "fatigue weakness pale dizziness low hemoglobin anemia",
            "bloating constipation gas irregular digestion low fiber",
            "cramps twitching insomnia headache stress sweating",
        ]
    }

    #[test]
    fn fit_builds_one_vector_per_document() {
        let space = TfidfSpace::fit(&docs());
        assert_eq!(space.doc_count(), 3);
        assert!(space.vocabulary_size() > 0);
    }

    #[test]
    fn stop_words_are_excluded_from_vocabulary() {
        let space = TfidfSpace::fit(&["the cat and the dog", "a cat on the mat"]);
        assert!(!space.vocabulary.contains_key("the"));
        assert!(!space.vocabulary.contains_key("and"));
        assert!(space.vocabulary.contains_key("cat"));
    }

    #[test]
    fn identical_text_scores_one() {
        let space = TfidfSpace::fit(&docs());
        let sims = space.similarities(docs()[0]);
        assert!((sims[0] - 1.0).abs() < 1e-9, "self similarity: {}", sims[0]);
        assert!(sims[1] < sims[0]);
    }

    #[test]
    fn out_of_vocabulary_query_scores_zero_everywhere() {
        let space = TfidfSpace::fit(&docs());
        let sims = space.similarities("zzzz qqqq completely unrelated vocabulary");
        assert!(sims.iter().all(|&s| s == 0.0), "got: {sims:?}");
    }

    #[test]
    fn similarities_stay_in_unit_interval() {
        let space = TfidfSpace::fit(&docs());
        for query in ["fatigue and bloating", "stress cramps fatigue", ""] {
            for s in space.similarities(query) {
                assert!((0.0..=1.0 + 1e-12).contains(&s), "score out of range: {s}");
            }
        }
    }

    #[test]
    fn partial_overlap_ranks_the_right_document_first() {
        let space = TfidfSpace::fit(&docs());
        let sims = space.similarities("bloating gas digestion");
        let best = sims
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i);
        assert_eq!(best, Some(1));
    }

    #[test]
    fn query_never_extends_the_vocabulary() {
        let space = TfidfSpace::fit(&docs());
        let before = space.vocabulary_size();
        let _ = space.similarities("brandnew words outside corpus");
        assert_eq!(space.vocabulary_size(), before);
    }
}
