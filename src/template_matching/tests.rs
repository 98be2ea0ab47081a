//! File-based tests for normalization, matching and selection

use crate::template_matching::{
    MatchError, MatchSelector, Resolution, ScoreSurface, TemplateMatcher,
};
use crate::test_support::scratch_dir;
use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use std::path::{Path, PathBuf};

const SCREEN: Resolution = Resolution::new(96, 60);

fn button_template() -> RgbImage {
    RgbImage::from_fn(16, 12, |x, y| {
        let v = ((x * 53 + y * 29 + (x ^ y) * 7) % 241) as u8;
        Rgb([v, v.wrapping_add(40), 255 - v])
    })
}

fn screen_with(template: &RgbImage, at: (u32, u32)) -> RgbImage {
    let mut screen = RgbImage::new(SCREEN.width, SCREEN.height);
    imageops::replace(&mut screen, template, at.0 as i64, at.1 as i64);
    screen
}

fn selector(dir: &Path) -> MatchSelector {
    MatchSelector::new(TemplateMatcher::new(dir.join("out")), SCREEN)
}

fn save(image: &RgbImage, path: PathBuf) -> PathBuf {
    image.save(&path).unwrap();
    path
}

#[test]
fn test_exact_copy_scores_one_at_offset() {
    let dir = scratch_dir("exact_copy");
    let template = save(&button_template(), dir.join("button.png"));
    let screen = save(&screen_with(&button_template(), (30, 20)), dir.join("screen.png"));

    let best = selector(&dir)
        .find_match(&screen, &[template])
        .unwrap()
        .expect("template is on screen");

    assert!(best.score > 0.999, "score was {}", best.score);
    assert_eq!(best.location, (30, 20));
    assert_eq!(best.name(), "button");
}

#[test]
fn test_blank_screen_has_no_match() {
    let dir = scratch_dir("blank_screen");
    let templates = vec![
        save(&button_template(), dir.join("ref1.png")),
        save(&imageops::flip_horizontal(&button_template()), dir.join("ref2.png")),
    ];
    let screen = save(&RgbImage::new(SCREEN.width, SCREEN.height), dir.join("screen.png"));

    let result = selector(&dir).find_match(&screen, &templates).unwrap();
    assert!(result.is_none(), "got {result:?}");
}

#[test]
fn test_identical_scores_prefer_first_template() {
    let dir = scratch_dir("tie_break");
    let first = save(&button_template(), dir.join("first.png"));
    let second = save(&button_template(), dir.join("second.png"));
    let screen = save(&screen_with(&button_template(), (5, 7)), dir.join("screen.png"));
    let sel = selector(&dir);

    let scores = sel
        .evaluate_templates(&screen, &[first.clone(), second.clone()])
        .unwrap();
    assert_eq!(scores[0].score, scores[1].score);

    let best = sel.find_match(&screen, &[first, second.clone()]).unwrap().unwrap();
    assert_eq!(best.name(), "first");

    let best = sel
        .find_match(&screen, &[second, dir.join("first.png")])
        .unwrap()
        .unwrap();
    assert_eq!(best.name(), "second");
}

#[test]
fn test_better_template_wins_regardless_of_order() {
    let dir = scratch_dir("better_wins");
    let present = save(&button_template(), dir.join("present.png"));
    let absent = save(
        &RgbImage::from_fn(16, 12, |x, y| {
            let v = if (x / 4 + y / 3) % 2 == 0 { 200 } else { 10 };
            Rgb([v, v, v])
        }),
        dir.join("absent.png"),
    );
    let screen = save(&screen_with(&button_template(), (60, 40)), dir.join("screen.png"));
    let sel = selector(&dir);

    let best = sel
        .find_match(&screen, &[absent.clone(), present.clone()])
        .unwrap()
        .unwrap();
    assert_eq!(best.name(), "present");

    let best = sel.find_match(&screen, &[present, absent]).unwrap().unwrap();
    assert_eq!(best.name(), "present");
}

#[test]
fn test_screen_is_normalized_before_matching() {
    let dir = scratch_dir("normalize_first");
    let template = save(&button_template(), dir.join("button.png"));
    let screen = save(
        &RgbImage::from_pixel(SCREEN.width * 2, SCREEN.height * 2, Rgb([10, 20, 30])),
        dir.join("screen.png"),
    );

    selector(&dir).find_match(&screen, &[template]).unwrap();

    let reloaded = image::open(&screen).unwrap();
    assert_eq!((reloaded.width(), reloaded.height()), (SCREEN.width, SCREEN.height));
}

#[test]
fn test_oversized_template_is_rejected() {
    let dir = scratch_dir("oversized");
    let big = save(
        &RgbImage::from_pixel(SCREEN.width + 1, 10, Rgb([1, 2, 3])),
        dir.join("wide.png"),
    );
    let screen = save(&screen_with(&button_template(), (0, 0)), dir.join("screen.png"));

    let err = selector(&dir).find_match(&screen, &[big]).unwrap_err();
    assert!(
        matches!(err, MatchError::TemplateLargerThanTarget { .. }),
        "got {err:?}"
    );
}

#[test]
fn test_missing_template_is_decode_error() {
    let dir = scratch_dir("missing_template");
    let screen = save(&screen_with(&button_template(), (0, 0)), dir.join("screen.png"));

    let err = selector(&dir)
        .find_match(&screen, &[dir.join("ref_missing.png")])
        .unwrap_err();
    assert!(matches!(err, MatchError::Decode { .. }), "got {err:?}");
}

#[test]
fn test_score_surface_is_persisted() {
    let dir = scratch_dir("surface_persisted");
    let template = save(&button_template(), dir.join("button.png"));
    let screen = save(&screen_with(&button_template(), (30, 20)), dir.join("screen.png"));
    let matcher = TemplateMatcher::new(dir.join("out"));

    let surface = matcher.match_files(&template, &screen).unwrap();
    assert_eq!(surface.path, dir.join("out").join("button_match_result.png"));
    assert_eq!(
        surface.resolution(),
        Resolution::new(SCREEN.width - 16 + 1, SCREEN.height - 12 + 1)
    );

    let reloaded = ScoreSurface::load(&surface.path).unwrap();
    assert_eq!(reloaded.resolution(), surface.resolution());
    let (best, location) = reloaded.best();
    assert_eq!(location, (30, 20));
    assert!((best - 1.0).abs() < 1e-3);

    // Blank regions are stored as exactly zero correlation
    let blank_cell = reloaded.scores.get_pixel(0, 0)[0];
    assert!(blank_cell.abs() < 1e-4, "got {blank_cell}");
}

#[test]
fn test_grayscale_matching_ignores_color_channels() {
    let dir = scratch_dir("grayscale");
    let gray_template = GrayImage::from_fn(16, 12, |x, y| Luma([((x * 17 + y * 31) % 200) as u8]));
    let template = dir.join("gray.png");
    gray_template.save(&template).unwrap();

    let mut screen_gray = GrayImage::new(SCREEN.width, SCREEN.height);
    imageops::replace(&mut screen_gray, &gray_template, 12, 9);
    let screen = dir.join("screen.png");
    image::DynamicImage::ImageLuma8(screen_gray)
        .to_rgb8()
        .save(&screen)
        .unwrap();

    let best = selector(&dir).find_match(&screen, &[template]).unwrap().unwrap();
    assert_eq!(best.location, (12, 9));
    assert!(best.score > 0.999);
}
