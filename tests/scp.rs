use fluxcore::{FluxRecord, MasterTrack, RawTrack, ScpCodec};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A synthetic but structurally realistic MFM-ish bit pattern, long enough to exercise the
/// weak-region and splice logic without needing a real capture fixture.
fn sample_master_track() -> MasterTrack {
    let bit_count = 50_000usize;
    let mut bytes = vec![0x55u8; bit_count.div_ceil(8)]; // 0101... alternating
    bytes[0] = 0xAA;
    MasterTrack::new(bytes, 0.2, None, 128, vec![(20_000, 600)])
}

#[test]
fn master_track_round_trips_through_an_scp_image() {
    init();
    let track = sample_master_track();
    let mut codec = ScpCodec::new();
    codec.emit_track(0, 0, &track).expect("emit_track should accept a MasterTrack");

    let bytes = codec.to_bytes().expect("encoding a single-track image should succeed");
    assert_eq!(&bytes[0..3], b"SCP");

    let decoded = ScpCodec::from_bytes(&bytes).expect("decoding what we just encoded should succeed");
    let flux = decoded.get_track(0, 0).expect("track (0, 0) should be present");

    let original = track.flux();
    assert_eq!(flux.index_ticks.len(), original.index_ticks.len());
    for (a, b) in flux.index_ticks.iter().zip(original.index_ticks.iter()) {
        assert!((a - b).abs() <= 1.0, "index ticks should survive the SCP round trip to within a tick");
    }
}

#[test]
fn scp_image_decodes_cleanly_through_the_pll() {
    init();
    let track = sample_master_track();
    let mut codec = ScpCodec::new();
    codec.emit_track(3, 1, &track).unwrap();

    let bytes = codec.to_bytes().unwrap();
    let decoded = ScpCodec::from_bytes(&bytes).unwrap();
    let flux: FluxRecord = decoded.get_track(3, 1).unwrap();

    let mut pll = RawTrack::new().with_params(0.10, 0.05, 0.60);
    pll.append(&flux);

    assert_eq!(pll.revolutions().len(), 1);
    let rev = &pll.revolutions()[0];
    assert_eq!(rev.bits.len(), rev.times.len());
    assert!(rev.bits.len() > 1000, "should have decoded a substantial number of bitcells");
}

#[test]
fn multi_track_image_preserves_all_track_keys() {
    init();
    let mut codec = ScpCodec::new();
    for cyl in 0..3u8 {
        for side in 0..2u8 {
            let track = sample_master_track();
            codec.emit_track(cyl, side, &track).unwrap();
        }
    }
    let bytes = codec.to_bytes().unwrap();
    let decoded = ScpCodec::from_bytes(&bytes).unwrap();

    let mut expected: Vec<u8> = (0..6).collect();
    expected.sort_unstable();
    let mut got: Vec<u8> = decoded.track_keys().collect();
    got.sort_unstable();
    assert_eq!(got, expected);
}
