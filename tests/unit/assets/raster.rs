use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = EncodedImage::from_bytes(png_bytes(1, 1, [100, 50, 200, 128]));
    let prepared = decode_image(&img).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_garbage_is_an_asset_error() {
    let err = decode_image(&EncodedImage::from_bytes(b"not an image".to_vec())).unwrap_err();
    assert!(matches!(err, ThumbError::AssetLoad(_)));
}

#[test]
fn encode_png_round_trips_opaque_pixels() {
    let px = [10u8, 20, 30, 255];
    let data: Vec<u8> = px.iter().copied().cycle().take(2 * 3 * 4).collect();
    let out = encode_png(2, 3, &data).unwrap();
    assert_eq!(out.format(), Some(image::ImageFormat::Png));

    let back = image::load_from_memory(out.bytes()).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (2, 3));
    assert_eq!(back.get_pixel(1, 2).0, px);
}

#[test]
fn encode_png_rejects_mismatched_buffer() {
    assert!(matches!(
        encode_png(4, 4, &[0u8; 8]),
        Err(ThumbError::Encode(_))
    ));
}

#[test]
fn demultiply_restores_straight_alpha() {
    let mut px = [64u8, 32, 0, 128];
    demultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 64, 0, 128]);
}

#[test]
fn clones_share_the_payload() {
    let a = EncodedImage::from_bytes(vec![1u8, 2, 3]);
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    let c = EncodedImage::from_bytes(vec![1u8, 2, 3]);
    assert_eq!(a, c);
    assert!(!a.ptr_eq(&c));
}
