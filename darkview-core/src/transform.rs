//! Dark-mode colour transform

use crate::raster::Raster;

/// Invert the colour channels of every pixel in place. Alpha is untouched.
///
/// Applying this twice restores the original buffer.
pub fn invert(raster: &mut Raster) {
    for px in raster.pixels_mut().chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

/// Inverted copy of `raster`
pub fn inverted(raster: &Raster) -> Raster {
    let mut copy = raster.clone();
    invert(&mut copy);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn inverts_rgb_and_keeps_alpha() {
        let mut raster = Raster::from_raw(2, 1, vec![0, 128, 255, 7, 10, 20, 30, 255]).unwrap();
        invert(&mut raster);
        assert_eq!(raster.pixels(), &[255, 127, 0, 7, 245, 235, 225, 255]);
    }

    #[test]
    fn inverted_leaves_source_alone() {
        let source = Raster::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
        let copy = inverted(&source);
        assert_eq!(source.pixels(), &[1, 2, 3, 4]);
        assert_eq!(copy.pixels(), &[254, 253, 252, 4]);
        assert_eq!(copy.dimensions(), source.dimensions());
    }

    proptest! {
        #[test]
        fn double_inversion_restores_every_channel(pixels in prop::collection::vec(any::<[u8; 4]>(), 1..64)) {
            let width = pixels.len() as u32;
            let original: Vec<u8> = pixels.concat();
            let mut raster = Raster::from_raw(width, 1, original.clone()).unwrap();

            invert(&mut raster);
            for (after, before) in raster.pixels().chunks_exact(4).zip(original.chunks_exact(4)) {
                prop_assert_eq!(after[3], before[3]);
            }

            invert(&mut raster);
            prop_assert_eq!(raster.pixels(), original.as_slice());
        }
    }
}
