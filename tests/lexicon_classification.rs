// Integration tests for the rule-based back-end through the public facade.

use moodify::pipelines::lexicon_scoring::LexiconScorer;
use moodify::pipelines::mood_classification::*;

#[test]
fn strong_praise_is_positive() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    let result = classifier.classify("I absolutely love this, it's wonderful!")?;
    assert!(result.score.unwrap() > 0.5);
    assert_eq!(result.mood, MoodLabel::Positive);
    assert!(result.raw_scores.is_some());
    assert!(result.class_id.is_none());
    Ok(())
}

#[test]
fn flat_statement_is_neutral() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    let result = classifier.classify("This is fine.")?;
    let score = result.score.unwrap();
    assert!((-0.2..=0.2).contains(&score), "compound {score}");
    assert_eq!(result.mood, MoodLabel::Neutral);
    Ok(())
}

#[test]
fn strong_complaint_is_negative() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    let result = classifier.classify("This is the worst, I hate it!")?;
    assert_eq!(result.mood, MoodLabel::Negative);
    Ok(())
}

#[test]
fn confidence_is_rounded_intensity() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    for text in [
        "I absolutely love this, it's wonderful!",
        "This is fine.",
        "not bad at all",
        "The food was good but the service was horrible",
        "meh",
    ] {
        let result = classifier.classify(text)?;
        let score = result.score.unwrap();
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!((result.confidence - score.abs()).abs() <= 0.0005);
        assert_eq!(result.mood, MoodLabel::from_compound(score));
    }
    Ok(())
}

#[test]
fn scoring_is_idempotent() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    let first = classifier.classify("Pretty good day, honestly")?;
    let second = classifier.classify("Pretty good day, honestly")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn stronger_wording_never_lowers_the_mood() {
    let scorer = LexiconScorer::new();
    let plain = scorer.score("The movie was good");
    let boosted = scorer.score("The movie was extremely good!!");
    assert!(boosted >= plain);
    assert!(scorer.classify("The movie was extremely good!!") >= scorer.classify("The movie was good"));
}

#[test]
fn blank_text_is_a_client_error() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    for text in ["", "   ", "\t\n"] {
        let err = classifier.classify(text).unwrap_err();
        assert!(matches!(err, moodify::MoodError::EmptyInput));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Text input is empty");
    }
    Ok(())
}

#[test]
fn serialized_result_uses_canonical_label_spelling() -> anyhow::Result<()> {
    let classifier = MoodClassifierBuilder::lexicon().build()?;
    let result = classifier.classify("I absolutely love this, it's wonderful!")?;
    let json = serde_json::to_value(&result)?;
    assert_eq!(json["mood"], "Positive");
    assert_eq!(json["text"], "I absolutely love this, it's wonderful!");
    assert!(json.get("all_probs").is_none());
    assert!(json["raw_scores"]["compound"].is_number());
    Ok(())
}
