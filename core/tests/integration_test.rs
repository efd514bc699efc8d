use rand::{Rng, SeedableRng};
use speakwave_core::{
    FrameLayout, ModemConfig, ModemError, Modulator, PhaseMode, WavHeader, WAV_HEADER_SIZE,
};
use std::io::Cursor;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scenario_config() -> ModemConfig {
    ModemConfig::new(8000, 100, 2200.0, 1200.0)
}

fn random_bits(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(0..=1)).collect()
}

#[test]
fn test_reference_scenario() {
    init_logging();
    let modulator = Modulator::new(scenario_config()).expect("valid config");
    let wav = modulator
        .encode(&[1, 0, 1])
        .expect("encode")
        .expect("container for non-empty bits");

    assert_eq!(modulator.samples_per_symbol(), 80);
    assert_eq!(wav.len(), 2284);

    let header = WavHeader::parse(&wav).expect("parse header");
    assert_eq!(header.data_size, 2240);
    assert_eq!(header.chunk_size, 2240 + 36);
    assert_eq!(u32::from_le_bytes(wav[24..28].try_into().unwrap()), 8000);
    assert_eq!(u16::from_le_bytes(wav[34..36].try_into().unwrap()), 8);
}

#[test]
fn test_data_size_formula() {
    init_logging();
    let configs = [
        ModemConfig::new(8000, 100, 2000.0, 1000.0),
        ModemConfig::new(8000, 300, 2000.0, 1000.0),
        ModemConfig::new(44100, 1200, 2200.0, 1200.0),
        ModemConfig::new(11025, 50, 1800.0, 900.0),
    ];
    for config in configs {
        let sps = (config.sample_rate / config.symbol_rate) as usize;
        let modulator = Modulator::new(config).unwrap();
        for len in [1, 7, 64] {
            let bits = random_bits(len as u64, len);
            let wav = modulator.encode(&bits).unwrap().unwrap();
            let data_size = (25 + len) * sps;
            assert_eq!(wav.len(), WAV_HEADER_SIZE + data_size);
            let header = WavHeader::parse(&wav).unwrap();
            assert_eq!(header.data_size as usize, data_size);
            assert_eq!(header.chunk_size as usize, data_size + 36);
        }
    }
}

#[test]
fn test_header_tags() {
    let modulator = Modulator::new(ModemConfig::default()).unwrap();
    let wav = modulator.encode(&random_bits(7, 40)).unwrap().unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(&wav[36..40], b"data");
}

#[test]
fn test_pipeline_is_idempotent() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    let bits = random_bits(42, 200);
    let first = modulator.encode(&bits).unwrap();
    let second = Modulator::new(scenario_config()).unwrap().encode(&bits).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_preamble_independent_of_payload() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    let sps = modulator.samples_per_symbol();
    let preamble_len = 20 * sps;

    let a = modulator.synthesize(&random_bits(1, 32));
    let b = modulator.synthesize(&random_bits(2, 5));
    let c = modulator.synthesize(&[0]);
    assert_eq!(&a[..preamble_len], &b[..preamble_len]);
    assert_eq!(&a[..preamble_len], &c[..preamble_len]);

    // Preamble alternates 0,1,... so symbols 0 and 2 match, 0 and 1 do not
    assert_eq!(&a[..sps], &a[2 * sps..3 * sps]);
    assert_ne!(&a[..sps], &a[sps..2 * sps]);
}

#[test]
fn test_postamble_is_all_zero_symbols() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    let sps = modulator.samples_per_symbol();

    let samples = modulator.synthesize(&[1, 1, 1, 1]);
    let zero_symbol = &samples[..sps];
    let postamble = &samples[samples.len() - 5 * sps..];
    for chunk in postamble.chunks(sps) {
        assert_eq!(chunk, zero_symbol);
    }

    let other = modulator.synthesize(&random_bits(9, 77));
    assert_eq!(postamble, &other[other.len() - 5 * sps..]);
}

#[test]
fn test_payload_symbols_map_to_bit_waveforms() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    let sps = modulator.samples_per_symbol();
    let samples = modulator.synthesize(&[1, 0, 1]);

    let zero = &samples[..sps];
    let one = &samples[sps..2 * sps];
    let payload = &samples[20 * sps..23 * sps];
    assert_eq!(&payload[..sps], one);
    assert_eq!(&payload[sps..2 * sps], zero);
    assert_eq!(&payload[2 * sps..], one);
}

#[test]
fn test_wide_input_values_reduced_to_lsb() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    let wide = modulator.encode(&[3, 2, 255, 128]).unwrap();
    let narrow = modulator.encode(&[1, 0, 1, 0]).unwrap();
    assert_eq!(wide, narrow);
}

#[test]
fn test_empty_bits_produce_no_container() {
    let modulator = Modulator::new(scenario_config()).unwrap();
    assert_eq!(modulator.encode(&[]).unwrap(), None);
    assert!(modulator.synthesize(&[]).is_empty());

    // Not the same thing as a container holding zero samples
    let zero_data = speakwave_core::encode_wav(&[], 8000).unwrap();
    assert_eq!(zero_data.len(), WAV_HEADER_SIZE);
}

#[test]
fn test_zero_sample_rate_is_configuration_error() {
    let result = Modulator::new(ModemConfig::new(0, 100, 2200.0, 1200.0));
    assert!(matches!(result, Err(ModemError::Configuration(_))));

    let result = Modulator::new(ModemConfig::new(8000, 100, 2200.0, -5.0));
    assert!(matches!(result, Err(ModemError::Configuration(_))));
}

#[test]
fn test_container_too_large_is_rejected_up_front() {
    init_logging();
    // Valid configuration whose single-bit frame exceeds the 32-bit data size
    let modulator =
        Modulator::new(ModemConfig::new(200_000_000, 1, 2000.0, 1000.0)).expect("valid config");
    assert!(matches!(
        modulator.encode(&[1]),
        Err(ModemError::DataTooLarge(_))
    ));
}

#[test]
fn test_hound_reads_container() {
    init_logging();
    let modulator = Modulator::new(scenario_config()).unwrap();
    let bits = random_bits(3, 50);
    let wav = modulator.encode(&bits).unwrap().unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(&wav)).expect("hound accepts container");
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.bits_per_sample, 8);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let decoded: Vec<i16> = reader
        .samples::<i16>()
        .collect::<Result<_, _>>()
        .expect("read samples");
    let expected: Vec<i16> = modulator
        .synthesize(&bits)
        .iter()
        .map(|&s| s as i16 - 128)
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_hdlc_message_container() {
    init_logging();
    let modulator = Modulator::new(ModemConfig::default()).unwrap();
    let wav = modulator.encode_message(b"hello").unwrap().unwrap();

    // 5 payload bytes + 2 FCS bytes + 2 flags, plus any stuffed bits
    let bits = speakwave_core::hdlc::frame_bits(b"hello");
    assert!(bits.len() >= 9 * 8);
    assert_eq!(wav.len(), modulator.container_len(bits.len()));
}

#[test]
fn test_custom_layout_frame_length() {
    let modulator =
        Modulator::with_layout(scenario_config(), FrameLayout::new(0, 0)).unwrap();
    let wav = modulator.encode(&[1, 0]).unwrap().unwrap();
    assert_eq!(wav.len(), WAV_HEADER_SIZE + 2 * 80);
}

#[test]
fn test_continuous_phase_container_valid() {
    let config = scenario_config().with_phase_mode(PhaseMode::Continuous);
    let modulator = Modulator::new(config).unwrap();
    let wav = modulator.encode(&random_bits(11, 30)).unwrap().unwrap();
    let reader = hound::WavReader::new(Cursor::new(&wav)).unwrap();
    assert_eq!(reader.len() as usize, 55 * 80);
}
