use image::{Rgba, RgbaImage};
use rusty_archery::model::{ArrowValue, End, ScoringSystem};
use rusty_archery::raster::decode_image;
use rusty_archery::scoresheet::raster::{footer_rect, render_scoresheet, sheet_dimensions};
use rusty_archery::scoresheet::signature::normalize_ink;
use rusty_archery::scoresheet::{ScoresheetLayout, SignatureRole, Signatures, compose};

mod common;
use common::{REGRESSION_ENDS, arrows};

fn ends_of(per_end: usize) -> Vec<End> {
    let flat: Vec<&str> = REGRESSION_ENDS.iter().flatten().copied().collect();
    flat.chunks(per_end).map(|c| End::new(arrows(c))).collect()
}

#[test]
fn test_rows_of_twelve_regardless_of_end_size() {
    let by_three = ScoresheetLayout::from_ends("Portsmouth", &ends_of(3), ScoringSystem::TenZone);
    let by_six = ScoresheetLayout::from_ends("Portsmouth", &ends_of(6), ScoringSystem::TenZone);
    assert_eq!(by_three, by_six);

    assert_eq!(by_three.rows.len(), 2);
    let second = &by_three.rows[1];
    assert_eq!(second.cells.len(), 12);
    assert_eq!(second.cells.iter().filter(|c| c.is_none()).count(), 6);
    assert!(second.cells[6..].iter().all(Option::is_none));
}

#[test]
fn test_row_totals() {
    let layout = ScoresheetLayout::from_ends("Portsmouth", &ends_of(3), ScoringSystem::TenZone);
    let first = &layout.rows[0];
    assert_eq!(first.cells[3], Some(ArrowValue::InnerTen));
    assert_eq!(first.cells[5], Some(ArrowValue::Miss));
    assert_eq!(first.hand_totals, [47, 35]);
    assert_eq!((first.score, first.hits, first.golds), (82, 11, 3));
    assert_eq!(first.running_total, 82);

    let second = &layout.rows[1];
    assert_eq!(second.hand_totals, [57, 0]);
    assert_eq!(second.running_total, 139);

    assert_eq!(layout.totals.score, 139);
    assert_eq!(layout.totals.hits, 17);
    assert_eq!(layout.totals.golds, 6);
}

#[test]
fn test_empty_round_has_no_rows() {
    let layout = ScoresheetLayout::from_ends("Portsmouth", &[], ScoringSystem::TenZone);
    assert!(layout.rows.is_empty());
    let image = render_scoresheet(&layout, ScoringSystem::TenZone);
    assert_eq!(image.dimensions(), sheet_dimensions(&layout));
}

#[test]
fn test_normalize_ink() {
    let mut sig = RgbaImage::new(2, 1);
    sig.put_pixel(0, 0, Rgba([200, 30, 30, 200]));
    sig.put_pixel(1, 0, Rgba([0, 0, 255, 10]));
    let ink = normalize_ink(&sig);
    assert_eq!(*ink.get_pixel(0, 0), Rgba([0, 0, 0, 200]));
    assert_eq!(*ink.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
}

#[test]
fn test_compose_unsigned_only_without_both_signatures() {
    let ends = ends_of(3);
    let mut signatures = Signatures::default();
    signatures.set(
        SignatureRole::Archer,
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255])),
    );
    let images = compose("Portsmouth", &ends, ScoringSystem::TenZone, &signatures).unwrap();
    assert!(images.signed.is_none());
    assert_eq!(&images.unsigned[..4], &[0x89, b'P', b'N', b'G']);
    assert_eq!(images.primary(), images.unsigned.as_slice());
    assert_eq!(signatures.missing(), vec![SignatureRole::Witness]);
}

#[test]
fn test_compose_signed_is_opaque_and_stamped() {
    let ends = ends_of(3);
    let mut signatures = Signatures::default();
    signatures.set(
        SignatureRole::Archer,
        RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255])),
    );
    signatures.set(
        SignatureRole::Witness,
        RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255])),
    );
    let images = compose("Portsmouth", &ends, ScoringSystem::TenZone, &signatures).unwrap();
    let signed = decode_image(images.signed.as_deref().unwrap()).unwrap();
    let unsigned = decode_image(&images.unsigned).unwrap();
    assert_eq!(signed.dimensions(), unsigned.dimensions());
    assert!(signed.pixels().all(|p| p[3] == 255));

    let (fx, fy, fw, fh) = footer_rect(signed.width(), signed.height());
    for role in [SignatureRole::Archer, SignatureRole::Witness] {
        let (bx, by, bw, bh) = role.footer_box();
        let cx = fx + ((bx + bw / 2.0) * fw as f32) as u32;
        let cy = fy + ((by + bh / 2.0) * fh as f32) as u32;
        let px = signed.get_pixel(cx, cy);
        assert!(px[0] < 40 && px[1] < 40 && px[2] < 40, "{role}: {px:?}");
    }
}

#[test]
fn test_role_parse() {
    assert_eq!("Archer".parse::<SignatureRole>().unwrap(), SignatureRole::Archer);
    assert_eq!("witness".parse::<SignatureRole>().unwrap(), SignatureRole::Witness);
    assert!("judge".parse::<SignatureRole>().is_err());
}
