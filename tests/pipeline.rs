//! Pipeline orchestration tests
//!
//! Exercises the orchestrator against in-process stage stubs, without
//! any network I/O.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;

use liz_gateway::{
    AudioPayload, AvatarRenderer, ConversationHistory, Credentials, DialogueModel, Error, Result,
    Role, SpeechSynthesizer, Stage, Transcriber, VoicePipeline,
};

/// Per-stage call counters shared with the stubs
#[derive(Default)]
struct Calls {
    transcribe: AtomicU32,
    reply: AtomicU32,
    synthesize: AtomicU32,
    render: AtomicU32,
}

struct StubTranscriber {
    calls: Arc<Calls>,
    response: Option<String>,
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, _audio: &AudioPayload) -> Result<String> {
        self.calls.transcribe.fetch_add(1, Ordering::SeqCst);
        self.response.clone().ok_or(Error::Upstream {
            stage: Stage::Transcription,
            status: 500,
            detail: "stub failure".to_string(),
        })
    }
}

struct StubDialogue {
    calls: Arc<Calls>,
    response: Option<String>,
    history_len_seen: Arc<AtomicUsize>,
}

#[async_trait]
impl DialogueModel for StubDialogue {
    async fn reply(&self, _user_text: &str, history: &ConversationHistory) -> Result<String> {
        self.calls.reply.fetch_add(1, Ordering::SeqCst);
        self.history_len_seen.store(history.len(), Ordering::SeqCst);
        self.response.clone().ok_or(Error::Upstream {
            stage: Stage::Dialogue,
            status: 500,
            detail: "stub failure".to_string(),
        })
    }
}

struct StubSynthesizer {
    calls: Arc<Calls>,
    ok: bool,
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<AudioPayload> {
        self.calls.synthesize.fetch_add(1, Ordering::SeqCst);
        if self.ok {
            Ok(AudioPayload::mp3(vec![0xff, 0xfb]))
        } else {
            Err(Error::Upstream {
                stage: Stage::Synthesis,
                status: 500,
                detail: "stub failure".to_string(),
            })
        }
    }
}

struct StubRenderer {
    calls: Arc<Calls>,
    response: Option<String>,
}

#[async_trait]
impl AvatarRenderer for StubRenderer {
    async fn render(&self, _audio: &AudioPayload) -> Result<String> {
        self.calls.render.fetch_add(1, Ordering::SeqCst);
        self.response.clone().ok_or(Error::RenderFailed {
            detail: "stub failure".to_string(),
        })
    }
}

/// Build a pipeline from stub responses; `None` makes that stage fail
fn stub_pipeline(
    calls: &Arc<Calls>,
    transcription: Option<&str>,
    reply: Option<&str>,
    synthesis_ok: bool,
    video_url: Option<&str>,
) -> (VoicePipeline, Arc<AtomicUsize>) {
    let history_len_seen = Arc::new(AtomicUsize::new(0));

    let pipeline = VoicePipeline::new(
        Box::new(StubTranscriber {
            calls: calls.clone(),
            response: transcription.map(String::from),
        }),
        Box::new(StubDialogue {
            calls: calls.clone(),
            response: reply.map(String::from),
            history_len_seen: history_len_seen.clone(),
        }),
        Box::new(StubSynthesizer {
            calls: calls.clone(),
            ok: synthesis_ok,
        }),
        Box::new(StubRenderer {
            calls: calls.clone(),
            response: video_url.map(String::from),
        }),
    );

    (pipeline, history_len_seen)
}

fn happy_pipeline(calls: &Arc<Calls>) -> (VoicePipeline, Arc<AtomicUsize>) {
    stub_pipeline(
        calls,
        Some("olá"),
        Some("oi, como posso ajudar?"),
        true,
        Some("https://example/video123.mp4"),
    )
}

fn captured_audio() -> AudioPayload {
    AudioPayload::webm(vec![1, 2, 3, 4])
}

#[tokio::test]
async fn successful_run_returns_stage_outputs() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = happy_pipeline(&calls);

    let result = pipeline.run(captured_audio()).await.unwrap();

    assert_eq!(result.transcription, "olá");
    assert_eq!(result.reply, "oi, como posso ajudar?");
    assert_eq!(result.video_url, "https://example/video123.mp4");

    assert_eq!(calls.transcribe.load(Ordering::SeqCst), 1);
    assert_eq!(calls.reply.load(Ordering::SeqCst), 1);
    assert_eq!(calls.synthesize.load(Ordering::SeqCst), 1);
    assert_eq!(calls.render.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn successful_run_appends_user_then_assistant() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = happy_pipeline(&calls);

    pipeline.run(captured_audio()).await.unwrap();

    let turns = pipeline.history().turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].content, "olá");
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "oi, como posso ajudar?");
}

#[tokio::test]
async fn history_accumulates_and_feeds_the_dialogue_stage() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, history_len_seen) = happy_pipeline(&calls);

    pipeline.run(captured_audio()).await.unwrap();
    assert_eq!(history_len_seen.load(Ordering::SeqCst), 0);

    pipeline.run(captured_audio()).await.unwrap();
    // The second exchange sees the first one as context
    assert_eq!(history_len_seen.load(Ordering::SeqCst), 2);
    assert_eq!(pipeline.history().len(), 4);
}

#[tokio::test]
async fn repeated_runs_are_idempotent() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = happy_pipeline(&calls);

    let first = pipeline.run(captured_audio()).await.unwrap();
    let second = pipeline.run(captured_audio()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn transcription_failure_aborts_before_later_stages() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = stub_pipeline(&calls, None, Some("reply"), true, Some("url"));

    let err = pipeline.run(captured_audio()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Transcription));
    assert!(pipeline.history().is_empty());
    assert_eq!(calls.reply.load(Ordering::SeqCst), 0);
    assert_eq!(calls.synthesize.load(Ordering::SeqCst), 0);
    assert_eq!(calls.render.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dialogue_failure_aborts_before_later_stages() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = stub_pipeline(&calls, Some("olá"), None, true, Some("url"));

    let err = pipeline.run(captured_audio()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Dialogue));
    assert!(pipeline.history().is_empty());
    assert_eq!(calls.transcribe.load(Ordering::SeqCst), 1);
    assert_eq!(calls.synthesize.load(Ordering::SeqCst), 0);
    assert_eq!(calls.render.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn synthesis_failure_aborts_before_render() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = stub_pipeline(&calls, Some("olá"), Some("reply"), false, Some("url"));

    let err = pipeline.run(captured_audio()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Synthesis));
    assert!(pipeline.history().is_empty());
    assert_eq!(calls.render.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn render_failure_discards_intermediate_artifacts() {
    let calls = Arc::new(Calls::default());
    let (mut pipeline, _) = stub_pipeline(&calls, Some("olá"), Some("reply"), true, None);

    let err = pipeline.run(captured_audio()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::RenderPoll));
    // Transcription and reply both succeeded but neither is kept
    assert!(pipeline.history().is_empty());
}

#[test]
fn missing_credentials_reported_together() {
    let credentials = Credentials {
        openai: Some("sk-test".to_string()),
        elevenlabs: None,
        did: None,
    };

    let err = VoicePipeline::from_credentials(&credentials).unwrap_err();
    match err {
        Error::Config { missing } => assert_eq!(missing, vec!["ElevenLabs", "D-ID"]),
        other => panic!("expected Config error, got {other}"),
    }
}

#[test]
fn all_credentials_missing_lists_all_providers() {
    let err = VoicePipeline::from_credentials(&Credentials::default()).unwrap_err();
    match err {
        Error::Config { missing } => {
            assert_eq!(missing, vec!["OpenAI", "ElevenLabs", "D-ID"]);
        }
        other => panic!("expected Config error, got {other}"),
    }
}

#[test]
fn full_credentials_build_a_pipeline() {
    let credentials = Credentials {
        openai: Some("sk-test".to_string()),
        elevenlabs: Some("el-test".to_string()),
        did: Some("did-test".to_string()),
    };

    assert!(VoicePipeline::from_credentials(&credentials).is_ok());
}
