use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use tarotgif::{Suit, deck_order};

#[test]
fn directory_sorts_into_deck_order() {
    let dir = tempfile::tempdir().unwrap();
    let files = [
        "zz_back.jpg",
        "pents01.jpg",
        "swords14.JPG",
        "Cups02.jpeg",
        "rws_tarot_10_wheel.jpg",
        "wands01.jpg",
        "rws_tarot_00_fool.jpg",
        "cover.png",
    ];
    for name in files {
        RgbImage::from_pixel(4, 6, Rgb([1, 2, 3]))
            .save_with_format(dir.path().join(name), guess_format(name))
            .unwrap();
    }

    let cards = deck_order(dir.path()).unwrap();
    let listed: Vec<String> = cards.iter().map(|c| c.file_name()).collect();
    assert_eq!(
        listed,
        vec![
            "rws_tarot_00_fool.jpg",
            "rws_tarot_10_wheel.jpg",
            "wands01.jpg",
            "Cups02.jpeg",
            "swords14.JPG",
            "pents01.jpg",
            "zz_back.jpg",
        ]
    );
    assert_eq!(cards.last().map(|c| c.suit), Some(Suit::Unknown));
}

fn guess_format(name: &str) -> image::ImageFormat {
    if name.ends_with(".png") {
        image::ImageFormat::Png
    } else {
        image::ImageFormat::Jpeg
    }
}
