//! Valence lexicon and a VADER-style sentiment intensity scorer.
//!
//! Word valences live on the usual -4..4 scale. The scorer sums the valence of
//! every lexicon hit after applying boosters, negation, capitalisation, "but"
//! contrast and exclamation emphasis, then squashes the sum into [-1, 1].

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

const BOOSTER_INCR: f64 = 0.293;
const BOOSTER_DECR: f64 = -0.293;
const CAPS_INCR: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_INCR: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCR: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
/// How many preceding tokens are checked for boosters and negations.
const LOOKBACK: usize = 3;

const DEFAULT_VALENCES: &[(&str, f64)] = &[
    // strongly positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("wonderful", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("outstanding", 3.0),
    ("superb", 3.1),
    ("incredible", 2.4),
    ("delighted", 3.0),
    ("thrilled", 2.9),
    ("ecstatic", 3.2),
    ("adore", 2.6),
    ("best", 3.2),
    ("beautiful", 2.9),
    ("joy", 2.8),
    ("joyful", 2.9),
    ("magnificent", 2.9),
    ("marvelous", 2.9),
    // moderately positive
    ("happy", 2.7),
    ("great", 3.1),
    ("good", 1.9),
    ("glad", 2.0),
    ("nice", 1.8),
    ("like", 1.5),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("pleased", 1.9),
    ("pleasant", 2.3),
    ("fun", 2.3),
    ("cool", 1.3),
    ("calm", 1.3),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("excited", 1.4),
    ("grateful", 2.0),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("smile", 1.5),
    ("proud", 2.1),
    ("relaxed", 2.2),
    ("relieved", 1.5),
    ("win", 2.8),
    ("winning", 2.4),
    ("success", 2.7),
    ("better", 1.9),
    ("helpful", 1.8),
    ("kind", 2.4),
    ("sweet", 2.0),
    ("lovely", 2.8),
    ("comfortable", 1.5),
    ("peaceful", 2.2),
    ("positive", 2.6),
    ("optimistic", 1.3),
    ("yay", 2.4),
    ("cheerful", 2.5),
    ("content", 1.4),
    // mildly positive
    ("fine", 0.6),
    ("ok", 0.9),
    ("okay", 0.9),
    ("decent", 0.9),
    ("alright", 1.0),
    ("interesting", 1.7),
    ("fair", 1.3),
    ("satisfied", 1.8),
    // mildly negative
    ("meh", -0.3),
    ("tired", -1.9),
    ("bored", -1.1),
    ("boring", -1.3),
    ("confused", -1.3),
    ("worried", -1.2),
    ("nervous", -1.1),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("lonely", -1.6),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("difficult", -1.5),
    ("problem", -1.7),
    ("mediocre", -0.9),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("sad", -2.1),
    ("sorry", -0.3),
    ("wrong", -2.1),
    ("weak", -1.9),
    ("hurt", -2.4),
    ("lost", -1.3),
    ("fail", -2.5),
    ("failed", -2.3),
    ("worse", -2.1),
    ("pain", -2.3),
    ("cry", -2.1),
    ("crying", -2.1),
    ("fear", -2.2),
    ("scared", -2.2),
    ("afraid", -2.0),
    ("angry", -2.3),
    ("mad", -2.2),
    ("bad", -2.5),
    ("poor", -2.1),
    ("ugly", -2.3),
    ("negative", -2.7),
    ("anxious", -1.0),
    ("depressed", -2.3),
    ("miserable", -2.2),
    // strongly negative
    ("hate", -2.7),
    ("hated", -3.2),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("worst", -3.1),
    ("disgusting", -2.4),
    ("dreadful", -2.7),
    ("furious", -2.7),
    ("devastated", -2.5),
    ("hopeless", -2.0),
    ("tragic", -3.4),
    ("disaster", -3.1),
    ("nightmare", -2.7),
    ("pathetic", -2.2),
    ("despise", -2.8),
    ("heartbroken", -3.3),
    ("useless", -1.8),
];

const BOOSTERS_INCR: &[&str] = &[
    "absolutely",
    "amazingly",
    "completely",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "fully",
    "greatly",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "majorly",
    "more",
    "most",
    "particularly",
    "purely",
    "quite",
    "really",
    "remarkably",
    "so",
    "substantially",
    "thoroughly",
    "totally",
    "tremendously",
    "truly",
    "unbelievably",
    "utterly",
    "very",
];

const BOOSTERS_DECR: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
    "sort",
];

const NEGATIONS: &[&str] = &[
    "aint", "ain't", "arent", "aren't", "cannot", "cant", "can't", "couldnt", "couldn't",
    "didnt", "didn't", "doesnt", "doesn't", "dont", "don't", "hadnt", "hadn't", "hasnt",
    "hasn't", "havent", "haven't", "isnt", "isn't", "mightnt", "mightn't", "neither",
    "never", "no", "nobody", "none", "nope", "nor", "not", "nothing", "nowhere", "shouldnt",
    "shouldn't", "wasnt", "wasn't", "werent", "weren't", "without", "wont", "won't",
    "wouldnt", "wouldn't",
];

/// Word valences plus the booster and negation word lists.
#[derive(Debug, Clone)]
pub struct ValenceLexicon {
    valences: HashMap<String, f64>,
    boosters: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl ValenceLexicon {
    /// The built-in general-purpose English lexicon.
    pub fn new() -> Self {
        Self::with_valences(
            DEFAULT_VALENCES
                .iter()
                .map(|(word, v)| (word.to_string(), *v))
                .collect(),
        )
    }

    fn with_valences(valences: HashMap<String, f64>) -> Self {
        let boosters = BOOSTERS_INCR
            .iter()
            .map(|w| (w.to_string(), BOOSTER_INCR))
            .chain(BOOSTERS_DECR.iter().map(|w| (w.to_string(), BOOSTER_DECR)))
            .collect();
        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();
        Self {
            valences,
            boosters,
            negations,
        }
    }

    /// Parses a VADER-format lexicon: one `token<TAB>mean[<TAB>...]` per
    /// line. Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut valences = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default();
            let mean = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("line {}: missing valence for '{}'", index + 1, token))?;
            let mean: f64 = mean.trim().parse().map_err(|e| {
                anyhow::anyhow!("line {}: invalid valence '{}': {}", index + 1, mean, e)
            })?;
            valences.insert(token.to_lowercase(), mean);
        }
        if valences.is_empty() {
            anyhow::bail!("lexicon contains no entries");
        }
        Ok(Self::with_valences(valences))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open lexicon file {:?}: {}", path, e))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(&word.to_lowercase()).copied()
    }

    pub fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(&word.to_lowercase()).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(&word.to_lowercase())
    }

    /// Adds or overrides a single word.
    pub fn insert(&mut self, word: &str, valence: f64) {
        self.valences.insert(word.to_lowercase(), valence);
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for ValenceLexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw polarity breakdown for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarityScores {
    #[serde(rename = "neg")]
    pub negative: f64,
    #[serde(rename = "neu")]
    pub neutral: f64,
    #[serde(rename = "pos")]
    pub positive: f64,
    /// Normalised sum of all valences, in [-1, 1].
    pub compound: f64,
}

impl PolarityScores {
    fn empty() -> Self {
        Self {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.0,
            compound: 0.0,
        }
    }
}

/// VADER-style intensity scorer over a [`ValenceLexicon`].
#[derive(Debug, Clone, Default)]
pub struct VaderScorer {
    lexicon: ValenceLexicon,
}

impl VaderScorer {
    pub fn new(lexicon: ValenceLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &ValenceLexicon {
        &self.lexicon
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::empty();
        }
        let caps_differ = has_mixed_caps(&tokens);

        let mut sentiments: Vec<f64> = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| self.token_valence(&tokens, i, token, caps_differ))
            .collect();
        apply_but_contrast(&tokens, &mut sentiments);

        let sum: f64 = sentiments.iter().sum();
        let emphasis = punctuation_emphasis(text);
        let adjusted = if sum > 0.0 {
            sum + emphasis
        } else if sum < 0.0 {
            sum - emphasis
        } else {
            sum
        };
        let compound = normalize(adjusted);

        let (mut pos, mut neg, mut neu) = (0.0, 0.0, 0.0);
        for &s in &sentiments {
            if s > 0.0 {
                pos += s + 1.0;
            } else if s < 0.0 {
                neg += s - 1.0;
            } else {
                neu += 1.0;
            }
        }
        if pos > neg.abs() {
            pos += emphasis;
        } else if pos < neg.abs() {
            neg -= emphasis;
        }
        let total = pos + neg.abs() + neu;
        if total == 0.0 {
            return PolarityScores {
                compound,
                ..PolarityScores::empty()
            };
        }

        PolarityScores {
            negative: round3(neg.abs() / total),
            neutral: round3(neu / total),
            positive: round3(pos / total),
            compound: round4(compound),
        }
    }

    fn token_valence(&self, tokens: &[&str], i: usize, token: &str, caps_differ: bool) -> f64 {
        if self.lexicon.booster(token).is_some() {
            return 0.0;
        }
        let Some(mut valence) = self.lexicon.valence(token) else {
            return 0.0;
        };
        if caps_differ && is_all_caps(token) {
            valence += CAPS_INCR.copysign(valence);
        }

        let mut negations = 0;
        for distance in 1..=LOOKBACK.min(i) {
            let previous = tokens[i - distance];
            if let Some(boost) = self.lexicon.booster(previous) {
                let mut scalar = if valence < 0.0 { -boost } else { boost };
                if caps_differ && is_all_caps(previous) {
                    scalar += CAPS_INCR.copysign(scalar);
                }
                scalar *= match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                valence += scalar;
            }
            if self.lexicon.is_negation(previous) {
                negations += 1;
            }
        }
        valence * NEGATION_SCALAR.powi(negations)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && token.chars().all(|c| !c.is_lowercase())
}

fn has_mixed_caps(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

/// Sentiment before "but" is damped, sentiment after it amplified.
fn apply_but_contrast(tokens: &[&str], sentiments: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|t| t.eq_ignore_ascii_case("but")) else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_INCR,
        _ => MAX_QUESTION_EMPHASIS,
    };
    exclamations as f64 * EXCLAMATION_INCR + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

fn round4(x: f64) -> f64 {
    (x * 10000.0).round() / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_is_case_insensitive() {
        let lexicon = ValenceLexicon::new();
        assert!(lexicon.valence("LOVE").unwrap() > 3.0);
        assert!(lexicon.valence("hate").unwrap() < 0.0);
        assert!(lexicon.is_negation("Don't"));
        assert!(lexicon.booster("very").unwrap() > 0.0);
        assert!(lexicon.booster("slightly").unwrap() < 0.0);
    }

    #[test]
    fn strong_praise_is_strongly_positive() {
        let scorer = VaderScorer::default();
        let scores = scorer.polarity_scores("I absolutely love this, it's wonderful!");
        assert!(scores.compound > 0.5, "{scores:?}");
        assert!(scores.positive > scores.negative);
    }

    #[test]
    fn plain_statement_is_near_zero() {
        let scorer = VaderScorer::default();
        let scores = scorer.polarity_scores("This is fine.");
        assert!((-0.2..=0.2).contains(&scores.compound), "{scores:?}");
    }

    #[test]
    fn booster_increases_intensity() {
        let scorer = VaderScorer::default();
        let plain = scorer.polarity_scores("The food was good").compound;
        let boosted = scorer.polarity_scores("The food was very good").compound;
        let damped = scorer.polarity_scores("The food was slightly good").compound;
        assert!(boosted > plain);
        assert!(damped < plain);
    }

    #[test]
    fn negation_flips_polarity() {
        let scorer = VaderScorer::default();
        assert!(scorer.polarity_scores("I am happy").compound > 0.0);
        assert!(scorer.polarity_scores("I am not happy").compound < 0.0);
    }

    #[test]
    fn each_negator_in_the_window_applies() {
        let scorer = VaderScorer::default();
        let doubled = scorer.token_valence(&["not", "never", "happy"], 2, "happy", false);
        let single = scorer.token_valence(&["I", "never", "happy"], 2, "happy", false);
        let base = scorer.lexicon().valence("happy").unwrap();
        assert!(single < 0.0);
        assert!((single - base * NEGATION_SCALAR).abs() < 1e-12);
        assert!(doubled > 0.0, "double negation cancels, got {doubled}");
        assert!((doubled - base * NEGATION_SCALAR * NEGATION_SCALAR).abs() < 1e-12);
    }

    #[test]
    fn caps_and_exclamations_add_emphasis() {
        let scorer = VaderScorer::default();
        let plain = scorer.polarity_scores("this is great").compound;
        let shouted = scorer.polarity_scores("this is GREAT").compound;
        let exclaimed = scorer.polarity_scores("this is great!!").compound;
        assert!(shouted > plain);
        assert!(exclaimed > plain);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let scorer = VaderScorer::default();
        let scores = scorer.polarity_scores("The start was good but the ending was terrible");
        assert!(scores.compound < 0.0);
    }

    #[test]
    fn proportions_sum_to_one() {
        let scorer = VaderScorer::default();
        let s = scorer.polarity_scores("I hate mondays but I love fridays");
        assert!((s.negative + s.neutral + s.positive - 1.0).abs() < 0.01);
    }

    #[test]
    fn unknown_words_score_zero() {
        let scorer = VaderScorer::default();
        let s = scorer.polarity_scores("zxqv blorp");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neutral, 1.0);
    }

    #[test]
    fn parses_vader_format() {
        let data = "# custom\nsplendid\t2.8\t0.4\t[3, 2, 3]\n\ngrim\t-2.0\n";
        let lexicon = ValenceLexicon::from_reader(data.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.valence("Splendid"), Some(2.8));
        assert_eq!(lexicon.valence("grim"), Some(-2.0));
        assert!(ValenceLexicon::from_reader("bad line".as_bytes()).is_err());
        assert!(ValenceLexicon::from_reader("".as_bytes()).is_err());
    }
}
