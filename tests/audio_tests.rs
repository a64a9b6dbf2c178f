// Tests for clip handling and the symphonia-backed transcoder.
//
// WAV fixtures are generated in memory with hound, so the decode path is
// exercised end to end without filesystem fixtures.

use streamscribe::audio::{AudioClip, DecodeError, MergeError, SymphoniaTranscoder, Transcoder};
use streamscribe::pipeline::join_spans;
use streamscribe::stt::TextSpan;

fn wav_bytes(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Vec<u8> {
    AudioClip::new(samples, sample_rate, channels)
        .to_wav_bytes()
        .unwrap()
}

#[test]
fn test_clip_byte_len_and_duration() {
    let clip = AudioClip::new(vec![0i16; 16000], 16000, 1);
    assert_eq!(clip.byte_len(), 32000);
    assert!((clip.duration_seconds() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_wav_roundtrip_through_hound() {
    let samples = vec![100i16, -200, 300, -400, 500];
    let bytes = wav_bytes(samples.clone(), 16000, 1);

    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);

    let decoded: Vec<i16> = reader.into_samples::<i16>().map(Result::unwrap).collect();
    assert_eq!(decoded, samples);
}

#[tokio::test]
async fn test_decode_wav_chunk() {
    let samples = vec![1000i16, -1000, 2000, -2000];
    let raw = wav_bytes(samples.clone(), 16000, 1);

    let transcoder = SymphoniaTranscoder::new();
    let clip = transcoder.decode(raw).await.unwrap();

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.channels, 1);
    assert_eq!(clip.samples, samples);
}

#[tokio::test]
async fn test_decode_downsamples_to_16khz() {
    let raw = wav_bytes(vec![0i16; 3200], 32000, 1);

    let transcoder = SymphoniaTranscoder::new();
    let clip = transcoder.decode(raw).await.unwrap();

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.samples.len(), 1600);
}

#[tokio::test]
async fn test_decode_folds_stereo_to_mono() {
    // Interleaved L/R pairs that sum cleanly
    let samples = vec![100i16, 200, -100, -200, 50, 50];
    let raw = wav_bytes(samples, 16000, 2);

    let transcoder = SymphoniaTranscoder::new();
    let clip = transcoder.decode(raw).await.unwrap();

    assert_eq!(clip.channels, 1);
    assert_eq!(clip.samples, vec![300, -300, 100]);
}

#[tokio::test]
async fn test_decode_rejects_garbage() {
    let transcoder = SymphoniaTranscoder::new();
    let result = transcoder.decode(vec![0xde, 0xad, 0xbe, 0xef]).await;
    assert!(matches!(result, Err(DecodeError::Probe(_))));
}

#[tokio::test]
async fn test_merge_concatenates_in_order() {
    let a = AudioClip::new(vec![1i16, 2], 16000, 1);
    let b = AudioClip::new(vec![3i16], 16000, 1);
    let c = AudioClip::new(vec![4i16, 5, 6], 16000, 1);

    let transcoder = SymphoniaTranscoder::new();
    let merged = transcoder.merge(&[&a, &b, &c]).await.unwrap();

    assert_eq!(merged.samples, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(merged.sample_rate, 16000);
    assert_eq!(merged.channels, 1);
}

#[tokio::test]
async fn test_merge_nothing_fails() {
    let transcoder = SymphoniaTranscoder::new();
    assert!(matches!(
        transcoder.merge(&[]).await,
        Err(MergeError::NoSegments)
    ));
}

#[tokio::test]
async fn test_merge_rejects_mixed_formats() {
    let a = AudioClip::new(vec![1i16], 16000, 1);
    let b = AudioClip::new(vec![2i16], 48000, 1);

    let transcoder = SymphoniaTranscoder::new();
    assert!(matches!(
        transcoder.merge(&[&a, &b]).await,
        Err(MergeError::FormatMismatch(_))
    ));
}

#[test]
fn test_join_spans_trims_and_single_spaces() {
    let spans = vec![
        TextSpan {
            text: "  hello ".to_string(),
        },
        TextSpan {
            text: "".to_string(),
        },
        TextSpan {
            text: " world  ".to_string(),
        },
    ];
    assert_eq!(join_spans(&spans), "hello world");
}

#[test]
fn test_join_spans_empty() {
    assert_eq!(join_spans(&[]), "");
}
