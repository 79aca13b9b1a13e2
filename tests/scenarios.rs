//! End-to-end behaviour of the public API on small, hand-checked inputs.

use corset::{Arena, Bitmap32, Dense, Options, Raster, RowCodec, SparseBitmap};

const BG: u32 = 0xFF11_2233;
const EDIT: u32 = 0xFFAA_BBCC;

#[test]
fn solid_fill() {
    let mut bmp = Bitmap32::new(4, 3, BG).unwrap();

    let mut encoded = Vec::new();
    Dense::encode(&[BG; 4], &mut encoded);
    assert!(encoded.len() < 4 * 4, "{} bytes", encoded.len());
    assert_eq!(bmp.compressed_size_used(), 3 * encoded.len());

    assert_eq!(bmp.row(1).unwrap(), [BG; 4]);
    let mut decoded = [0u32; 4];
    assert_eq!(Dense::decode(&encoded, &mut decoded), Ok(encoded.len()));
    assert_eq!(decoded, [BG; 4]);
}

#[test]
fn single_pixel_edit_survives_row_switch() {
    let mut bmp = Bitmap32::new(4, 3, BG).unwrap();
    bmp.set_pixel(2, 1, EDIT).unwrap();
    assert_eq!(bmp.active_row(), Some(1));

    bmp.get_pixel(0, 0).unwrap();
    assert_eq!(bmp.active_row(), Some(0));
    bmp.validate().unwrap();

    assert_eq!(bmp.get_pixel(2, 1).unwrap(), EDIT);
    for x in [0, 1, 3] {
        assert_eq!(bmp.get_pixel(x, 1).unwrap(), BG);
    }
    assert_eq!(bmp.row(0).unwrap(), [BG; 4]);
    assert_eq!(bmp.row(2).unwrap(), [BG; 4]);
}

#[test]
fn single_pixel_edit_sparse() {
    let mut bmp = SparseBitmap::new(4, 3, BG).unwrap();
    bmp.set_pixel(2, 1, EDIT).unwrap();
    assert_eq!(bmp.get_pixel(2, 1).unwrap(), EDIT);
    assert_eq!(bmp.run_count(1), 3);
    assert_eq!(bmp.to_vec().unwrap()[4..8], [BG, BG, EDIT, BG]);
}

#[test]
fn fragmentation_then_compaction() {
    let mut arena = Arena::new(&Options::default());
    let first = arena.alloc(10).unwrap();
    let second = arena.alloc(20).unwrap();
    arena.write(&second, &[7; 20]);
    arena.free(first);
    let third = arena.alloc(5).unwrap();
    arena.write(&third, &[9; 5]);
    assert_eq!(arena.fragmented(), 10);
    assert_eq!(arena.filled(), 35);

    let mut entries = [second, third];
    arena.optimize(&mut entries, false);
    assert_eq!(arena.fragmented(), 0);
    assert_eq!(arena.filled(), 25);
    assert_eq!(arena.bytes(&entries[0]), [7; 20]);
    assert_eq!(arena.bytes(&entries[1]), [9; 5]);
    arena.validate(&entries).unwrap();

    arena.rebuild(&mut entries).unwrap();
    assert_eq!(arena.capacity(), arena.used());
    assert_eq!(arena.bytes(&entries[0]), [7; 20]);
    arena.validate(&entries).unwrap();
}

#[test]
fn full_optimize_on_bitmap() {
    let mut bmp = Bitmap32::new(32, 32, BG).unwrap();
    for y in 0..32 {
        bmp.fill_scanline(y, y, 8, EDIT).unwrap();
    }
    for y in 0..32 {
        bmp.fill_scanline(0, y, 32, BG).unwrap();
    }
    bmp.optimize(true).unwrap();
    assert_eq!(bmp.compressed_size_reserved(), bmp.compressed_size_used());
    assert_eq!(bmp.to_vec().unwrap(), vec![BG; 32 * 32]);
}

#[test]
fn solid_full_hd_is_tiny() {
    let mut bmp = Bitmap32::new(1920, 1080, 0xFF00_0000).unwrap();
    assert_eq!(bmp.uncompressed_size(), 1920 * 1080 * 4);
    let per_row = bmp.compressed_size_used() / 1080;
    assert!(per_row <= 8, "{per_row} bytes per row");
    assert!(bmp.compressed_size_used() * 100 < bmp.uncompressed_size());

    // A touched but unchanged row compresses back to the same size.
    bmp.fill_scanline(0, 500, 1920, 0xFF00_0000).unwrap();
    bmp.optimize(true).unwrap();
    assert_eq!(bmp.compressed_size_used(), per_row * 1080);
}

#[test]
fn compaction_recovers_rewritten_rows() {
    let options = Options::new().growth_base(64).compaction_divisor(2);
    let mut bmp = Bitmap32::with_options(256, 8, 0, options).unwrap();
    for round in 0..4u32 {
        for y in 0..8 {
            for x in 0..256 {
                bmp.set_pixel(x, y, (x as u32) ^ round.wrapping_mul(0x0101_0101))
                    .unwrap();
            }
        }
        bmp.validate().unwrap();
    }
    bmp.flush().unwrap();
    let arena_used = bmp.compressed_size_used();
    assert!(bmp.compressed_size_reserved() >= arena_used);
    bmp.optimize(false).unwrap();
    bmp.validate().unwrap();
    assert_eq!(bmp.get_pixel(255, 7).unwrap(), 255 ^ 0x0303_0303);
}
