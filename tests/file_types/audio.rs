//! audio support test

use std::fs;
use std::io::{Read, Seek, SeekFrom};

use cvn_rs::prelude::*;
use cvn_rs::prelude::file::unwrap_wav;

use super::scratch_dir;

const SAMPLES: [i16; 8] = [0, 100, -100, 2000, -2000, i16::MAX, i16::MIN, 1];

fn raw_audio() -> Vec<u8> {
	let format = WaveFormat {
		format_tag: 1,
		channels: 2,
		sample_rate: 44100,
		byte_rate: 44100 * 4,
		block_align: 4,
		bits_per_sample: 16,
	};
	let mut raw = format.to_bytes().to_vec();
	for sample in SAMPLES {
		raw.extend_from_slice(&sample.to_le_bytes());
	}
	raw
}

#[test_log::test]
fn test_extract_playable_wav() {
	let dir = scratch_dir("audio-extract");
	let path = dir.join("bgm.cv3");
	let raw = raw_audio();
	fs::write(&path, &raw).unwrap();

	let mut audio = AudioFile::open(&path).unwrap();
	assert_eq!(audio.wave_format().map(|f| f.channels), Some(2));

	let wav = dir.join("bgm.wav");
	audio.extract(&wav).unwrap();
	assert_eq!(fs::metadata(&wav).unwrap().len(), raw.len() as u64 + 0x1C);

	let mut reader = hound::WavReader::open(&wav).unwrap();
	assert_eq!(reader.spec().channels, 2);
	assert_eq!(reader.spec().sample_rate, 44100);
	let decoded: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
	assert_eq!(decoded, SAMPLES);

	assert_eq!(unwrap_wav(&fs::read(&wav).unwrap()).unwrap(), raw);
}

#[test_log::test]
fn test_save_writes_original() {
	let dir = scratch_dir("audio-save");
	let path = dir.join("se.cv3");
	let raw = raw_audio();
	fs::write(&path, &raw).unwrap();

	let mut audio = AudioFile::open(&path).unwrap();
	let copy = dir.join("copy.cv3");
	audio.unwrap_to_original(&copy).unwrap();
	assert_eq!(fs::read(&copy).unwrap(), raw);
	assert_eq!(fs::read(&path).unwrap(), raw);
}

#[test_log::test]
fn test_stream_over_file() {
	let dir = scratch_dir("audio-stream");
	let path = dir.join("voice.cv3");
	let raw = raw_audio();
	fs::write(&path, &raw).unwrap();

	let mut audio = AudioFile::open(&path).unwrap();
	let whole = audio.to_wav_bytes().unwrap();
	let stream = audio.stream_mut().unwrap();

	for offset in 0..=whole.len() as u64 {
		stream.seek(SeekFrom::Start(offset)).unwrap();
		let mut tail = Vec::new();
		stream.read_to_end(&mut tail).unwrap();
		assert_eq!(tail, &whole[offset as usize..], "offset {offset}");
	}
}

#[test_log::test]
fn test_save_over_source() {
	let dir = scratch_dir("audio-in-place");
	let path = dir.join("loop.cv3");
	let mut raw = raw_audio();
	raw.extend((0..48u8).map(|b| b.wrapping_mul(37)));
	fs::write(&path, &raw).unwrap();

	let mut audio = AudioFile::open(&path).unwrap();
	audio.save(&path).unwrap();
	assert_eq!(fs::read(&path).unwrap(), raw);

	let mut audio = AudioFile::open(&path).unwrap();
	audio.unwrap_to_original(&path).unwrap();
	assert_eq!(fs::read(&path).unwrap(), raw);
}

#[test_log::test]
fn test_extract_over_source() {
	let dir = scratch_dir("audio-extract-in-place");
	let path = dir.join("jingle.cv3");
	let raw = raw_audio();
	fs::write(&path, &raw).unwrap();

	let mut audio = AudioFile::open(&path).unwrap();
	let expected = audio.to_wav_bytes().unwrap();
	audio.extract(&path).unwrap();
	assert_eq!(fs::read(&path).unwrap(), expected);
	assert_eq!(unwrap_wav(&expected).unwrap(), raw);
}
