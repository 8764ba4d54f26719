use eduman_quiz::clients::{GenerationOptions, TextProvider};
use eduman_quiz::error::{ParameterError, ProviderError};
use eduman_quiz::services::{fallback_record, MAX_QUESTION_COUNT};
use eduman_quiz::{AnswerLetter, QuestionBatch, QuestionSource, QuizParameters};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::Mutex;

/// 按顺序返回预设结果的生成服务，同时记录收到的提示词
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    fn failing() -> Self {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "quota exceeded");
        Self::new(vec![Err(ProviderError::request_failed("scripted", io))])
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        _options: &'a GenerationOptions,
    ) -> BoxFuture<'a, Result<String, ProviderError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::empty_content("scripted")));
        Box::pin(async move { next })
    }
}

fn params() -> QuizParameters {
    QuizParameters::parse("5th", "CBSE", "Maths", "Multiplication", "Easy").unwrap()
}

fn source(provider: ScriptedProvider) -> QuestionSource<ScriptedProvider> {
    QuestionSource::new(provider, GenerationOptions::default())
}

/// 每道题都满足：四个非空选项，标号依次为 A-D，答案是其中之一
fn assert_well_formed(batch: &QuestionBatch) {
    for record in batch.records() {
        assert!(!record.question().is_empty());
        for (option, letter) in record.options().iter().zip(AnswerLetter::ALL) {
            assert!(option.starts_with(&format!("{}) ", letter)));
            assert!(option.len() > 3);
        }
        assert!(AnswerLetter::ALL.contains(&record.answer()));
    }
}

#[tokio::test]
async fn test_embedded_object_is_extracted() {
    let text = "here you go: {\"question\":\"Q\",\"options\":[\"A) 1\",\"B) 2\",\"C) 3\",\"D) 4\"],\"answer\":\"B\"} thanks";
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 1).await.unwrap();

    assert_eq!(batch.len(), 1);
    assert!(!batch.is_fallback());
    let record = &batch.records()[0];
    assert_eq!(record.question(), "Q");
    assert_eq!(record.answer(), AnswerLetter::B);
    assert_eq!(record.answer_option(), "B) 2");
    assert_well_formed(&batch);
}

#[tokio::test]
async fn test_non_json_returns_fallback() {
    let source = source(ScriptedProvider::replying("not json at all"));

    let batch = source.generate(&params(), 1).await.unwrap();

    assert_eq!(batch.records(), &[fallback_record()]);
    assert!(batch.is_fallback());
}

#[tokio::test]
async fn test_three_options_is_malformed() {
    let text = r#"{"question":"Q","options":["A) 1","B) 2","C) 3"],"answer":"A"}"#;
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 1).await.unwrap();

    assert_eq!(batch.records(), &[fallback_record()]);
}

#[tokio::test]
async fn test_provider_failure_in_batch_mode() {
    let source = source(ScriptedProvider::failing());

    let batch = source.generate(&params(), 20).await.unwrap();

    assert_eq!(batch.len(), 20);
    assert_eq!(batch.fallback_count(), 20);
    assert!(batch.records().iter().all(|r| *r == fallback_record()));
    assert_well_formed(&batch);
}

#[tokio::test]
async fn test_batch_object_instead_of_list_falls_back() {
    let text = r#"{"question":"Q","options":["1","2","3","4"],"answer":"A"}"#;
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 5).await.unwrap();

    assert_eq!(batch.len(), 5);
    assert!(batch.is_fallback());
}

#[tokio::test]
async fn test_batch_with_nested_braces_in_prose() {
    let text = r#"I used the template {"question": ...} as asked. Here is the list:
```json
[
  {"question": "Which set is {1, 2}?", "options": ["A) {1,2}", "B) {2,3}", "C) {}", "D) {1}"], "answer": "A"},
  {"question": "What is 7 × 8?", "options": ["54", "56", "58", "64"], "answer": "56"}
]
```"#;
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 2).await.unwrap();

    assert_eq!(batch.fallback_count(), 0);
    assert_eq!(batch.records()[0].question(), "Which set is {1, 2}?");
    assert_eq!(batch.records()[1].answer(), AnswerLetter::B);
    assert_well_formed(&batch);
}

#[tokio::test]
async fn test_answer_given_as_option_text_keeps_correct_key() {
    let text = r#"{"question":"Who chaired the drafting committee?","options":["Gandhi","Nehru","B.R. Ambedkar","Patel"],"answer":"B.R. Ambedkar"}"#;
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 1).await.unwrap();

    assert!(!batch.is_fallback());
    let record = &batch.records()[0];
    assert_eq!(record.options()[2], "C) B.R. Ambedkar");
    assert_eq!(record.answer(), AnswerLetter::C);
    assert_well_formed(&batch);
}

#[tokio::test]
async fn test_ambiguous_answer_falls_back() {
    let text = r#"{"question":"Pick one","options":["b","a","c","d"],"answer":"a"}"#;
    let source = source(ScriptedProvider::replying(text));

    let batch = source.generate(&params(), 1).await.unwrap();

    assert_eq!(batch.records(), &[fallback_record()]);
}

#[tokio::test]
async fn test_invalid_parameters_rejected_before_call() {
    assert_eq!(
        QuizParameters::parse("8th", "", "Science", "", "Easy").unwrap_err(),
        ParameterError::EmptyBoard
    );

    let provider = ScriptedProvider::replying("{}");
    let source = source(provider);
    let err = source.generate(&params(), 0).await.unwrap_err();

    assert_eq!(err, ParameterError::ZeroCount);

    let err = source.generate(&params(), usize::MAX / 2).await.unwrap_err();
    assert_eq!(
        err,
        ParameterError::TooManyQuestions {
            requested: usize::MAX / 2,
            max: MAX_QUESTION_COUNT
        }
    );
    assert!(source.provider().prompts().is_empty());
}

#[tokio::test]
async fn test_repeated_calls_each_valid_with_fresh_entropy() {
    let first = r#"{"question":"Q1","options":["1","2","3","4"],"answer":"A"}"#;
    let second = r#"{"question":"Q2","options":["5","6","7","8"],"answer":"D"}"#;
    let provider = ScriptedProvider::new(vec![Ok(first.to_string()), Ok(second.to_string())]);
    let source = source(provider);

    let a = source.generate(&params(), 1).await.unwrap();
    let b = source.generate(&params(), 1).await.unwrap();

    assert_ne!(a, b);
    assert_well_formed(&a);
    assert_well_formed(&b);

    let prompts = source.provider().prompts();
    assert_eq!(prompts.len(), 2);
    for prompt in &prompts {
        assert!(prompt.contains("SEED: "));
        assert!(prompt.contains("Subject: Maths"));
        assert!(prompt.contains("Lesson: Multiplication"));
    }
}
