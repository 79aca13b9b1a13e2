//! Validates the code examples from README.md compile and behave correctly.

use corset::Error;

#[test]
fn readme_usage() -> Result<(), Error> {
    use corset::{Bitmap32, Raster};

    let mut bmp = Bitmap32::new(1920, 1080, 0xFF00_0000)?;
    bmp.fill_scanline(100, 10, 200, 0xFFFF_FFFF)?;
    bmp.set_pixel(5, 5, 0xFF12_3456)?;

    assert_eq!(bmp.get_pixel(150, 10)?, 0xFFFF_FFFF);
    assert_eq!(bmp.get_pixel(-1, 10)?, 0xFF00_0000);
    assert!(bmp.compressed_size_used() < bmp.uncompressed_size() / 1000);

    bmp.optimize(true)?;
    assert_eq!(bmp.compressed_size_reserved(), bmp.compressed_size_used());
    assert_eq!(bmp.get_pixel(5, 5)?, 0xFF12_3456);
    Ok(())
}

#[test]
fn readme_scanlines() -> Result<(), Error> {
    use corset::{Bitmap32, Raster};

    let mut bmp = Bitmap32::new(8, 2, 0)?;
    bmp.write_scanline(-2, 1, &[1, 2, 3, 4])?;

    let mut dest = [9u32; 10];
    bmp.read_scanline(-1, 1, &mut dest)?;
    assert_eq!(dest, [0, 3, 4, 0, 0, 0, 0, 0, 0, 0]);
    Ok(())
}

#[test]
fn readme_run_lists() -> Result<(), Error> {
    use corset::{Raster, SparseBitmap};

    let mut mask = SparseBitmap::new(4096, 64, 0u32)?;
    mask.fill_scanline(1000, 3, 500, 1)?;
    assert_eq!(mask.run_count(3), 3);
    assert_eq!(mask.get_pixel(1200, 3)?, 1);
    Ok(())
}

#[test]
fn readme_deep_pixels_and_codecs() -> Result<(), Error> {
    use corset::{Bitmap64, CompressedBitmap, Raster, Sparse};

    let mut deep = Bitmap64::new(640, 480, 0xFFFF_0000_0000_0000)?;
    deep.set_pixel(1, 1, 0xFFFF_1234_5678_9ABC)?;
    assert_eq!(deep.get_pixel(1, 1)?, 0xFFFF_1234_5678_9ABC);

    let mut listed: CompressedBitmap<u32, Sparse> = CompressedBitmap::new(640, 480, 0)?;
    listed.fill_scanline(0, 0, 320, 7)?;
    assert_eq!(listed.get_pixel(319, 0)?, 7);
    assert_eq!(listed.get_pixel(320, 0)?, 0);
    Ok(())
}

#[test]
fn readme_tuning() {
    use corset::{Bitmap32, Options, Raster};

    let options = Options::new()
        .growth_base(4096)
        .max_capacity(64 << 20)
        .compaction_divisor(8);
    let bmp = Bitmap32::with_options(1024, 1024, 0, options).unwrap();
    assert_eq!(bmp.width(), 1024);

    let tight = Options::new().max_capacity(16);
    assert!(matches!(
        Bitmap32::with_options(1024, 1024, 0, tight),
        Err(Error::OutOfMemory { .. })
    ));
}

#[cfg(feature = "imgref")]
#[test]
fn readme_imgref() -> Result<(), Error> {
    use corset::{Bitmap32, img};
    use imgref::ImgVec;
    use rgb::Rgba;

    let photo = ImgVec::new(vec![Rgba::new(200u8, 100, 50, 255); 64 * 48], 64, 48);
    let mut bmp = Bitmap32::new(photo.width(), photo.height(), 0)?;
    img::load_rgba8(&mut bmp, photo.as_ref())?;
    let back = img::to_rgba8(&mut bmp)?;
    assert_eq!(back.buf(), photo.buf());
    Ok(())
}
