use std::fs;
use std::str::FromStr;

use image::{Rgb, RgbImage};

use tilekit::conversion::{
    boxes_to_labels, labels_to_boxes, scale_labels, shift_to_origin, to_lines, Mode,
    TransformError,
};
use tilekit::io::{create_output_directory, empty_directory, read_label_file, write_label_file};
use tilekit::naming::{DatasetLayout, Direction, FileKind, NamingError, Split, TileGrid, TileNamer};
use tilekit::plot::{draw_boxes, draw_centroids};
use tilekit::sanitize::{sanitize_fragment, sanitize_stem};
use tilekit::types::{BoxRecord, LabelRecord};

fn label(class_id: i64, x_center: f64, y_center: f64, width: f64, height: f64) -> LabelRecord {
    LabelRecord {
        class_id,
        x_center,
        y_center,
        width,
        height,
    }
}

#[test]
fn test_labels_to_boxes_truncates_toward_zero() {
    let boxes = labels_to_boxes(&[label(0, 5.25, 5.25, 2.5, 2.5)]);

    // x0 = 4.0, x1 = 6.5 -> truncated to 6, not rounded to 7
    assert_eq!(
        boxes,
        vec![BoxRecord {
            class_id: 0,
            x0: 4,
            y0: 4,
            x1: 6,
            y1: 6,
        }]
    );
}

#[test]
fn test_labels_to_boxes_preserves_order() {
    let labels: Vec<LabelRecord> = (0..10)
        .map(|i| label(i, 100.0 + i as f64, 50.0, 10.0, 10.0))
        .collect();

    let boxes = labels_to_boxes(&labels);

    assert_eq!(boxes.len(), labels.len());
    for (i, bbox) in boxes.iter().enumerate() {
        assert_eq!(bbox.class_id, i as i64);
        assert_eq!(bbox.x0, 95 + i as i64);
    }
}

#[test]
fn test_boxes_to_labels_uses_ceiling() {
    let boxes = vec![BoxRecord {
        class_id: 1,
        x0: 10,
        y0: 10,
        x1: 30,
        y1: 50,
    }];

    let labels = boxes_to_labels(&boxes);

    assert_eq!(labels[0].class_id, 1);
    assert_eq!(labels[0].x_center, 20.0);
    assert_eq!(labels[0].y_center, 30.0);
    assert_eq!(labels[0].width, 20.0);
    assert_eq!(labels[0].height, 40.0);

    // Odd corner sum: (10 + 15) / 2 = 12.5 rounds up, never down
    let odd = boxes_to_labels(&[BoxRecord {
        class_id: 0,
        x0: 10,
        y0: 0,
        x1: 15,
        y1: 0,
    }]);
    assert_eq!(odd[0].x_center, 13.0);
}

#[test]
fn test_boxes_to_labels_permits_negative_extent() {
    // Swapped corners are passed through, not rejected
    let labels = boxes_to_labels(&[BoxRecord {
        class_id: 0,
        x0: 30,
        y0: 50,
        x1: 10,
        y1: 10,
    }]);

    assert_eq!(labels[0].width, -20.0);
    assert_eq!(labels[0].height, -40.0);
}

#[test]
fn test_center_corner_roundtrip_preserves_extent() {
    let original = vec![label(2, 50.0, 100.0, 20.0, 40.0), label(7, 8.0, 8.0, 4.0, 6.0)];

    let roundtripped = boxes_to_labels(&labels_to_boxes(&original));

    for (before, after) in original.iter().zip(&roundtripped) {
        assert_eq!(before.class_id, after.class_id);
        assert_eq!(before.width, after.width);
        assert_eq!(before.height, after.height);
        assert_eq!(before.x_center, after.x_center);
        assert_eq!(before.y_center, after.y_center);
    }
}

#[test]
fn test_scale_labels_absolute_with_rounding() {
    let labels = vec![label(2, 0.5, 0.5, 0.2, 0.4)];

    let scaled = scale_labels(&labels, Mode::Absolute, 100, 200, true).unwrap();

    assert_eq!(scaled[0].class_id, 2);
    assert_eq!(scaled[0].x_center, 50.0);
    assert_eq!(scaled[0].y_center, 100.0);
    assert_eq!(scaled[0].width, 20.0);
    assert_eq!(scaled[0].height, 80.0);
}

#[test]
fn test_scale_labels_relative_then_absolute_is_identity() {
    // Power-of-two dimensions keep the division exact, so the inverse is
    // algebraic as long as rounding stays off
    let original = vec![label(3, 12.0, 40.0, 8.0, 16.0), label(0, 1.0, 127.0, 3.0, 5.0)];

    let relative = scale_labels(&original, Mode::Relative, 64, 128, true).unwrap();
    let restored = scale_labels(&relative, Mode::Absolute, 64, 128, false).unwrap();

    assert_eq!(original, restored);
}

#[test]
fn test_scale_labels_rejects_zero_dimensions() {
    let labels = vec![label(0, 0.5, 0.5, 0.1, 0.1)];

    for mode in [Mode::Absolute, Mode::Relative] {
        assert!(matches!(
            scale_labels(&labels, mode, 0, 100, true),
            Err(TransformError::ZeroDimension)
        ));
        assert!(matches!(
            scale_labels(&labels, mode, 100, 0, true),
            Err(TransformError::ZeroDimension)
        ));
    }
}

#[test]
fn test_mode_rejects_unknown_strings() {
    assert!(matches!(
        Mode::from_str("diagonal"),
        Err(TransformError::UnknownMode(_))
    ));
    assert_eq!(Mode::from_str("absolute").unwrap(), Mode::Absolute);
    assert_eq!(Mode::from_str("Relative").unwrap(), Mode::Relative);
}

#[test]
fn test_to_lines_one_line_per_row_integer_first_field() {
    let labels = vec![
        label(2, 0.5, 0.5, 0.2, 0.4),
        label(0, 0.25, 0.75, 0.1, 0.1),
        label(11, 0.125, 0.125, 0.0625, 0.0625),
    ];

    let lines = to_lines(&labels).unwrap();

    assert_eq!(lines.len(), labels.len());
    assert_eq!(lines[0], "2 0.5 0.5 0.2 0.4");
    for line in &lines {
        let first = line.split(' ').next().unwrap();
        assert!(first.parse::<i64>().is_ok());
    }
}

#[test]
fn test_shift_to_origin_translates_corners() {
    let boxes = vec![BoxRecord {
        class_id: 4,
        x0: 250,
        y0: 260,
        x1: 270,
        y1: 300,
    }];

    let shifted = shift_to_origin(&boxes, (240, 240));

    assert_eq!(
        shifted,
        vec![BoxRecord {
            class_id: 4,
            x0: 10,
            y0: 20,
            x1: 30,
            y1: 60,
        }]
    );
}

#[test]
fn test_label_record_parses_annotation_line() {
    let record: LabelRecord = "2 0.5 0.5 0.2 0.4".parse().unwrap();

    assert_eq!(record.class_id, 2);
    assert_eq!(record.x_center, 0.5);
    assert_eq!(record.height, 0.4);

    assert!("2 0.5 0.5".parse::<LabelRecord>().is_err());
    assert!("two 0.5 0.5 0.2 0.4".parse::<LabelRecord>().is_err());
    assert!("2 0.5 0.5 0.2 tall".parse::<LabelRecord>().is_err());
}

#[test]
fn test_write_then_read_label_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("frame_000.txt");
    let labels = vec![label(2, 0.5, 0.5, 0.2, 0.4), label(0, 0.1, 0.9, 0.05, 0.05)];

    write_label_file(&path, &labels).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(raw.lines().count(), labels.len());

    let restored = read_label_file(&path).unwrap();
    assert_eq!(restored, labels);
}

#[test]
fn test_read_label_file_reports_malformed_line() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("broken.txt");
    fs::write(&path, "0 0.5 0.5 0.1 0.1\nnot a label\n").unwrap();

    let err = read_label_file(&path).unwrap_err();
    assert!(err.to_string().contains(":2"));
}

#[test]
fn test_create_output_directory_recreates_existing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out_dir = temp_dir.path().join("labels");
    fs::create_dir_all(&out_dir).unwrap();
    fs::write(out_dir.join("stale.txt"), "leftover").unwrap();

    let created = create_output_directory(&out_dir).unwrap();

    assert!(created.exists());
    assert!(!created.join("stale.txt").exists());
}

#[test]
fn test_empty_directory_clears_children() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path().join("scratch");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("file.txt"), "x").unwrap();

    empty_directory(&dir).unwrap();

    assert!(dir.exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    assert!(empty_directory(&temp_dir.path().join("missing")).is_err());
}

#[test]
fn test_layout_builds_convention_paths() {
    let layout = DatasetLayout::new("/data/raw/ds", "/data/processed/ds");

    assert_eq!(
        layout.dir(Direction::In, Split::Valid, FileKind::Label),
        std::path::PathBuf::from("/data/raw/ds/valid/labels")
    );

    // Roboflow-style name: prefix goes between base name and hash tail
    let tiled = layout
        .file(
            Direction::Out,
            Split::Valid,
            FileKind::Label,
            "tile00x00",
            "209_205_50_JPG.rf.a6fdbfed5ddcebe949b5a721c39c6a1f",
        )
        .unwrap();
    assert_eq!(
        tiled,
        std::path::PathBuf::from(
            "/data/processed/ds/valid/labels/209_205_50_JPG.tile00x00.rf.a6fdbfed5ddcebe949b5a721c39c6a1f.txt"
        )
    );

    // Plain name: prefix is appended after the name
    let plain = layout
        .file(Direction::In, Split::Train, FileKind::Image, "tile01x02", "frame")
        .unwrap();
    assert_eq!(
        plain,
        std::path::PathBuf::from("/data/raw/ds/train/images/frame.tile01x02.jpg")
    );

    // Empty prefix keeps the name untouched
    let bare = layout
        .file(Direction::In, Split::Test, FileKind::Image, "", "frame")
        .unwrap();
    assert_eq!(
        bare,
        std::path::PathBuf::from("/data/raw/ds/test/images/frame.jpg")
    );
}

#[test]
fn test_layout_rejects_unusable_names() {
    let layout = DatasetLayout::new("/raw", "/processed");

    assert!(matches!(
        layout.file(Direction::In, Split::Train, FileKind::Label, "", "???"),
        Err(NamingError::EmptyName(_))
    ));
}

#[test]
fn test_tile_namer_generates_per_prefix() {
    let layout = DatasetLayout::new("/raw", "/processed");
    let namer = TileNamer::new(layout, Direction::Out, Split::Train, FileKind::Label, "frame");

    assert_eq!(
        namer.generate("tile00x01").unwrap(),
        std::path::PathBuf::from("/processed/train/labels/frame.tile00x01.txt")
    );
    assert_eq!(
        namer.generate("tile02x00").unwrap(),
        std::path::PathBuf::from("/processed/train/labels/frame.tile02x00.txt")
    );
}

#[test]
fn test_split_kind_direction_parsing() {
    assert_eq!(Split::from_str("TRAIN").unwrap(), Split::Train);
    assert_eq!(Split::from_str("valid").unwrap(), Split::Valid);
    assert!(matches!(
        Split::from_str("eval"),
        Err(NamingError::InvalidSplit(_))
    ));

    assert_eq!(FileKind::from_str("image").unwrap(), FileKind::Image);
    assert!(matches!(
        FileKind::from_str("mask"),
        Err(NamingError::InvalidFileKind(_))
    ));

    assert_eq!(Direction::from_str("out").unwrap(), Direction::Out);
    assert!(matches!(
        Direction::from_str("sideways"),
        Err(NamingError::InvalidDirection(_))
    ));
}

#[test]
fn test_tile_grid_index_and_prefix() {
    let grid = TileGrid::new(4).unwrap();

    assert_eq!(grid.index(0, 0), 0);
    assert_eq!(grid.index(2, 1), 9);
    assert_eq!(grid.prefix(0, 0), "tile00x00");
    assert_eq!(grid.prefix(2, 11), "tile02x11");

    assert!(matches!(TileGrid::new(0), Err(NamingError::ZeroColumns)));
}

#[test]
fn test_sanitize_fragment_strips_disallowed_characters() {
    assert_eq!(sanitize_fragment("tile 00?x*00"), "tile00x00");
    assert_eq!(sanitize_fragment("train/images"), "train/images");
    assert_eq!(sanitize_fragment("frame_01.rf.abc-def"), "frame_01.rf.abc-def");
}

#[test]
fn test_sanitize_stem_removes_path_separators() {
    assert!(!sanitize_stem("../../etc/passwd").contains('/'));
    assert_eq!(sanitize_stem("frame_01"), "frame_01");
}

#[test]
fn test_draw_boxes_marks_border_pixels() {
    let mut image = RgbImage::new(40, 40);
    let boxes = vec![BoxRecord {
        class_id: 0,
        x0: 5,
        y0: 5,
        x1: 15,
        y1: 15,
    }];

    draw_boxes(&mut image, &boxes, (0, 0));

    assert_ne!(*image.get_pixel(5, 5), Rgb([0, 0, 0]));
    // Interior stays untouched with hollow rectangles
    assert_eq!(*image.get_pixel(10, 10), Rgb([0, 0, 0]));
}

#[test]
fn test_draw_boxes_skips_degenerate_geometry() {
    let mut image = RgbImage::new(40, 40);
    let boxes = vec![BoxRecord {
        class_id: 0,
        x0: 15,
        y0: 15,
        x1: 5,
        y1: 5,
    }];

    draw_boxes(&mut image, &boxes, (0, 0));

    assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn test_draw_centroids_marks_center() {
    let mut image = RgbImage::new(40, 40);
    let labels = vec![label(0, 20.0, 20.0, 10.0, 10.0)];

    draw_centroids(&mut image, &labels);

    assert_eq!(*image.get_pixel(20, 20), Rgb([255, 0, 0]));
}
