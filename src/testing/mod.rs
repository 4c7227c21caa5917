//! Synthetic frame generation for hardware-free operation and tests.

use crate::types::CameraFrame;

/// Create a synthetic RGB test frame with content that varies per frame.
///
/// The moving gradient gives the H.264 encoder temporal change to work
/// with and makes consecutive frames distinguishable in tests.
pub fn synthetic_frame(frame_number: u64, width: u32, height: u32) -> CameraFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    CameraFrame::new(data, width, height, "synthetic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_frame_correct_size() {
        let frame = synthetic_frame(0, 320, 240);
        assert_eq!(frame.width, 320);
        assert_eq!(frame.height, 240);
        assert!(frame.is_well_formed());
    }

    #[test]
    fn test_synthetic_frames_differ() {
        let frame0 = synthetic_frame(0, 320, 240);
        let frame1 = synthetic_frame(1, 320, 240);
        assert_ne!(frame0.data[0], frame1.data[0]);
    }
}
