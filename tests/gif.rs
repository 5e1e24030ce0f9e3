use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use tarotgif::{
    CardFilter, FsImageSource, GifRequest, LayoutKind, PaintKind, TarotError, create_gif, plan,
    render, write_gif,
};

fn write_card(dir: &Path, name: &str, shade: u8) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(30, 50, Rgb([shade, 255 - shade, 90]))
        .save(&path)
        .unwrap();
    path
}

fn small_cards(request: &mut GifRequest) {
    request.params.card_width = Some(40);
    request.params.card_height = Some(60);
}

fn names(paths: &[&PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn full_deck_strip_plays_major_arcana_in_order() {
    let dir = tempfile::tempdir().unwrap();
    // Written out of order on purpose.
    for n in [7, 0, 21, 13, 2, 19, 4, 11, 1, 16, 9, 20, 5, 14, 3, 18, 8, 12, 6, 17, 10, 15] {
        write_card(dir.path(), &format!("RWS_Tarot_{n:02}_Card.jpg"), n as u8 * 10);
    }
    std::fs::write(dir.path().join("readme.txt"), "not a card").unwrap();

    let mut request = GifRequest::new(dir.path(), LayoutKind::All);
    small_cards(&mut request);
    let plan = plan(&request).unwrap();
    let animation = render(&plan, &mut FsImageSource).unwrap();

    assert_eq!(animation.len(), 22);
    let played: Vec<String> = animation
        .frames
        .iter()
        .flat_map(|frame| names(&frame.cards()))
        .collect();
    let expected: Vec<String> = (0..22).map(|n| format!("RWS_Tarot_{n:02}_Card.jpg")).collect();
    assert_eq!(played, expected);
    assert_eq!(animation.dimensions(), Some((40, 60)));
}

#[test]
fn three_card_pool_larger_than_deck_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=10 {
        write_card(dir.path(), &format!("cups{n:02}.jpg"), 40);
    }
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("three_cards.gif");

    let mut request = GifRequest::new(dir.path(), LayoutKind::Three);
    request.params.pool = Some(36);
    let err = create_gif(&request, &target, &mut FsImageSource).unwrap_err();

    assert!(matches!(
        err,
        TarotError::InsufficientCards {
            found: 10,
            required: 36
        }
    ));
    assert!(!target.exists());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn celtic_spread_writes_requested_frames() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=12 {
        write_card(dir.path(), &format!("swords{n:02}.jpg"), n as u8 * 15);
    }
    write_card(dir.path(), "deck_cover.jpg", 0);
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("celtic_cards.gif");

    let mut request = GifRequest::new(dir.path(), LayoutKind::Celtic);
    request.params.frames = Some(3);
    request.seed = Some(11);
    let plan = plan(&request).unwrap();
    let animation = render(&plan, &mut FsImageSource).unwrap();

    assert_eq!(animation.len(), 3);
    for frame in &animation.frames {
        assert_eq!(frame.cards_painted(), 10);
        let last = frame.paints.last().unwrap();
        assert_eq!((last.slot, last.kind), ("challenge", PaintKind::Card));
        assert!(
            frame
                .cards()
                .iter()
                .all(|p| !p.to_string_lossy().contains("cover"))
        );
    }

    let summary = write_gif(animation, &target).unwrap();
    assert_eq!((summary.frames, summary.width, summary.height), (3, 500, 600));

    let decoder = GifDecoder::new(BufReader::new(File::open(&target).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].buffer().dimensions(), (500, 600));
}

#[test]
fn create_gif_reports_what_it_wrote() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=4 {
        write_card(dir.path(), &format!("pents{n:02}.jpg"), n as u8 * 40);
    }
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("strip.gif");

    let mut request = GifRequest::new(dir.path(), LayoutKind::All);
    small_cards(&mut request);
    request.params.duration_ms = Some(200);
    request.params.loop_count = 2;
    let summary = create_gif(&request, &target, &mut FsImageSource).unwrap();

    assert_eq!((summary.frames, summary.width, summary.height), (4, 40, 60));
    assert_eq!((summary.frame_duration_ms, summary.loop_count), (200, 2));
    assert!(target.exists());
}

#[test]
fn random_sequence_never_repeats_a_card() {
    let dir = tempfile::tempdir().unwrap();
    for suit in ["wands", "cups", "swords"] {
        for n in 1..=10 {
            write_card(dir.path(), &format!("{suit}{n:02}.jpg"), n as u8 * 20);
        }
    }

    let mut request = GifRequest::new(dir.path(), LayoutKind::Random);
    request.params.cards = Some(12);
    request.seed = Some(99);
    small_cards(&mut request);
    let plan = plan(&request).unwrap();
    let animation = render(&plan, &mut FsImageSource).unwrap();

    let played: Vec<String> = animation
        .frames
        .iter()
        .flat_map(|frame| names(&frame.cards()))
        .collect();
    assert_eq!(played.len(), 12);
    let unique: HashSet<&String> = played.iter().collect();
    assert_eq!(unique.len(), 12);

    let again = render(&plan, &mut FsImageSource).unwrap();
    let replayed: Vec<String> = again
        .frames
        .iter()
        .flat_map(|frame| names(&frame.cards()))
        .collect();
    assert_eq!(replayed, played);
}

#[test]
fn filtered_strip_keeps_only_matching_suit() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["cups03.jpg", "wands01.jpg", "cups01.jpg", "pents02.jpg", "cups02.jpg"] {
        write_card(dir.path(), name, 100);
    }

    let mut request = GifRequest::new(dir.path(), LayoutKind::Filtered);
    request.filter = Some(CardFilter::parse("cups"));
    small_cards(&mut request);
    let plan = plan(&request).unwrap();
    let animation = render(&plan, &mut FsImageSource).unwrap();

    let played: Vec<String> = animation
        .frames
        .iter()
        .flat_map(|frame| names(&frame.cards()))
        .collect();
    assert_eq!(played, vec!["cups01.jpg", "cups02.jpg", "cups03.jpg"]);
}

#[test]
fn composed_layouts_size_cards_from_measured_ratio() {
    let dir = tempfile::tempdir().unwrap();
    for n in 0..10 {
        RgbImage::from_pixel(40, 50, Rgb([10, 10, 10]))
            .save(dir.path().join(format!("wands{n:02}.jpg")))
            .unwrap();
    }
    RgbImage::from_pixel(10, 100, Rgb([10, 10, 10]))
        .save(dir.path().join("wands10.jpg"))
        .unwrap();

    let single = plan(&GifRequest::new(dir.path(), LayoutKind::Single)).unwrap();
    assert!((single.aspect_ratio - 0.8).abs() < 1e-9);
    assert_eq!(single.spec.card_height, 320);
    assert_eq!(
        single.spec.card_width,
        (f64::from(single.spec.card_height) * single.aspect_ratio) as u32
    );
    assert!((255..=256).contains(&single.spec.card_width));

    let celtic = plan(&GifRequest::new(dir.path(), LayoutKind::Celtic)).unwrap();
    assert_eq!(
        celtic.spec.card_width,
        (f64::from(celtic.spec.card_height) * celtic.aspect_ratio) as u32
    );
    assert!((95..=96).contains(&celtic.spec.card_width));

    // Strips keep their fixed card size whatever the source ratio.
    let strip = plan(&GifRequest::new(dir.path(), LayoutKind::All)).unwrap();
    assert_eq!((strip.spec.card_width, strip.spec.card_height), (400, 600));
}

#[test]
fn missing_source_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let request = GifRequest::new(dir.path().join("nope"), LayoutKind::All);
    assert!(matches!(plan(&request), Err(TarotError::MissingSource(_))));
}
