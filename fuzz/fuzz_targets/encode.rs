// cargo fuzz run encode corpus/encode -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;

use gifsmith::{Algorithm, Encoder};

fuzz_target!(|data: &[u8]| {
    // first two bytes: width and height; the rest is frames
    if data.len() < 2 {
        return;
    }
    let (width, height) = (u16::from(data[0] % 16), u16::from(data[1] % 16));
    let algorithm = if width % 2 == 0 {
        Algorithm::Octree
    } else {
        Algorithm::NeuQuant
    };
    let mut enc = Encoder::new(width, height)
        .with_algorithm(algorithm)
        .with_change_detection(true);
    enc.set_transparent(Some(0));
    if enc.start().is_err() {
        return;
    }
    let len = usize::from(width) * usize::from(height) * 4;
    for frame in data[2..].chunks(len) {
        if enc.add_frame(frame.to_vec()).is_err() {
            assert_eq!(frame.len(), data[2..].len() % len);
        }
    }
    enc.finish().unwrap();
    let gif = enc.into_bytes();
    assert_eq!(gif.last(), Some(&0x3B));
});
