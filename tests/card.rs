use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use palette::Srgb;
use palette_card::{
    AspectRatio, BLACK_BORDER, CardError, CardOptions, LayoutSpec, Palette, Sampling, SwatchShape,
    WHITE_BORDER, WallpaperOptions, compose, encode_png, make_card, palette_card_bytes, parse_hex,
};

fn photo(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x * 3 + y * 5) % 256) as u8])
    })
}

fn px(c: Srgb<u8>) -> Rgb<u8> {
    Rgb([c.red, c.green, c.blue])
}

fn five_colors() -> Palette {
    Palette::from_colors([
        Srgb::new(255, 0, 0),
        Srgb::new(0, 255, 0),
        Srgb::new(0, 0, 255),
        Srgb::new(255, 255, 0),
        Srgb::new(0, 255, 255),
    ])
}

#[test]
fn landscape_400x300_five_rectangles() {
    let img = DynamicImage::ImageRgb8(photo(400, 300));
    let options = CardOptions { background: parse_hex("#F5F5F5").unwrap(), ..CardOptions::default() };
    let card = make_card(&img, &options).unwrap();

    assert_eq!(card.layout.image_size, 300);
    assert_eq!(card.layout.border, 24);
    // max(14, 300 / 30) widened by one so five cells divide the width
    assert_eq!(card.layout.cell_gap, 15);
    assert_eq!(card.layout.cell_size, 48);
    assert_eq!(card.layout.grid_width(), 300);
    assert_eq!(card.canvas.width(), 348);
    assert_eq!(
        card.canvas.height(),
        300 + card.layout.outer_gap + card.layout.cell_size + 2 * card.layout.border
    );
    assert_eq!(card.palette.len(), 5);
    assert!(card.wallpaper.is_none());
}

#[test]
fn ten_swatches_use_two_rows() {
    let img = DynamicImage::ImageRgb8(photo(400, 300));
    let options = CardOptions { swatch_count: 10, ..CardOptions::default() };
    let card = make_card(&img, &options).unwrap();
    let l = card.layout;

    assert_eq!((l.columns, l.rows), (5, 2));
    assert_eq!(card.canvas.width(), 348);
    assert_eq!(card.canvas.height(), 300 + l.outer_gap + 2 * l.cell_size + l.cell_gap + 2 * l.border);
    assert_eq!(card.palette.len(), 10);
}

#[test]
fn eight_swatches_use_four_columns() {
    let img = DynamicImage::ImageRgb8(photo(240, 420));
    let card = make_card(&img, &CardOptions { swatch_count: 8, ..CardOptions::default() }).unwrap();
    assert_eq!((card.layout.columns, card.layout.rows), (4, 2));
    assert_eq!(card.layout.grid_width(), 240);
}

#[test]
fn image_and_swatches_land_where_the_layout_says() {
    let src = photo(400, 300);
    let palette = five_colors();
    let canvas = compose(&src, &palette, BLACK_BORDER, SwatchShape::Rectangle).unwrap();
    let layout = LayoutSpec::compute(300, 5).unwrap();
    let bg = px(BLACK_BORDER);

    // cropped image starts 50 px into the source
    assert_eq!(*canvas.get_pixel(0, 0), bg);
    assert_eq!(*canvas.get_pixel(24, 24), *src.get_pixel(50, 0));
    assert_eq!(*canvas.get_pixel(24 + 299, 24 + 299), *src.get_pixel(349, 299));
    assert_eq!(*canvas.get_pixel(24 + 300, 24), bg);

    for (i, color) in palette.colors().enumerate() {
        let (x, y) = layout.cell_origin(i);
        assert_eq!(*canvas.get_pixel(x, y), px(color));
        assert_eq!(*canvas.get_pixel(x + layout.cell_size - 1, y + layout.cell_size - 1), px(color));
        assert_eq!(*canvas.get_pixel(x + layout.cell_size, y), bg, "gap after swatch {i}");
    }
    // image-to-grid gap is background
    let (x0, y0) = layout.cell_origin(0);
    assert_eq!(*canvas.get_pixel(x0, y0 - 1), bg);
    // last swatch is flush with the image's right edge
    let (x4, _) = layout.cell_origin(4);
    assert_eq!(x4 + layout.cell_size, 24 + 300);
}

#[test]
fn ellipse_swatches_leave_cell_corners_background() {
    let canvas = compose(&photo(300, 300), &five_colors(), WHITE_BORDER, SwatchShape::Ellipse).unwrap();
    let layout = LayoutSpec::compute(300, 5).unwrap();
    let (x, y) = layout.cell_origin(2);
    let half = layout.cell_size / 2;
    assert_eq!(*canvas.get_pixel(x, y), px(WHITE_BORDER));
    assert_eq!(*canvas.get_pixel(x + half, y + half), Rgb([0, 0, 255]));
}

#[test]
fn compose_rejects_unsupported_palette_sizes() {
    let palette = Palette::from_colors([Srgb::new(1, 2, 3); 7]);
    assert!(matches!(
        compose(&photo(200, 200), &palette, WHITE_BORDER, SwatchShape::Rectangle),
        Err(CardError::UnsupportedGridShape(7))
    ));
    assert!(matches!(
        compose(&RgbImage::new(0, 50), &five_colors(), WHITE_BORDER, SwatchShape::Rectangle),
        Err(CardError::DegenerateImage { .. })
    ));
}

#[test]
fn identical_requests_give_identical_bytes() {
    let img = DynamicImage::ImageRgb8(photo(333, 287));
    let options = CardOptions {
        swatch_count: 5,
        sampling: Sampling::Wide,
        shape: SwatchShape::Ellipse,
        wallpaper: Some(WallpaperOptions { ratio: AspectRatio::MOBILE, fill_index: 2 }),
        ..CardOptions::default()
    };
    let a = make_card(&img, &options).unwrap().encode().unwrap();
    let b = make_card(&img, &options).unwrap().encode().unwrap();
    assert_eq!(a.card, b.card);
    assert_eq!(a.wallpaper, b.wallpaper);
    assert_eq!(a.palette, b.palette);
}

#[test]
fn desktop_wallpaper_pads_sideways_with_chosen_swatch() {
    let img = DynamicImage::ImageRgb8(photo(300, 300));
    let options = CardOptions {
        wallpaper: Some(WallpaperOptions { ratio: AspectRatio::DESKTOP, fill_index: 3 }),
        ..CardOptions::default()
    };
    let card = make_card(&img, &options).unwrap();
    let wp = card.wallpaper.as_ref().unwrap();

    assert_eq!(wp.fill, card.palette.get(3).unwrap());
    assert!(wp.image.width() > wp.image.height());
    assert!(wp.image.width() >= card.canvas.width() && wp.image.height() >= card.canvas.height());
    assert_eq!(*wp.image.get_pixel(0, wp.image.height() / 2), px(wp.fill));

    let ratio = wp.image.width() as f64 / wp.image.height() as f64;
    assert!((ratio - 16.0 / 9.0).abs() <= 1.0 / wp.image.height() as f64);

    let frame = card.canvas.width().min(card.canvas.height()) / 4;
    let side = (wp.image.width() - card.canvas.width()) / 2;
    assert!(side > frame);
    assert_eq!(wp.image.height(), card.canvas.height() + 2 * frame);
}

#[test]
fn mobile_wallpaper_is_portrait() {
    let img = DynamicImage::ImageRgb8(photo(500, 400));
    let options = CardOptions {
        swatch_count: 8,
        wallpaper: Some(WallpaperOptions { ratio: AspectRatio::MOBILE, fill_index: 0 }),
        ..CardOptions::default()
    };
    let card = make_card(&img, &options).unwrap();
    let wp = card.wallpaper.unwrap();
    assert!(wp.image.height() > wp.image.width());
    let ratio = wp.image.width() as f64 / wp.image.height() as f64;
    assert!((ratio - 9.0 / 19.5).abs() <= 1.0 / wp.image.width() as f64);
}

#[test]
fn bytes_in_png_out() {
    let input = encode_png(&photo(260, 180)).unwrap();
    let options = CardOptions {
        swatch_count: 10,
        wallpaper: Some(WallpaperOptions { ratio: AspectRatio::DESKTOP, fill_index: 9 }),
        ..CardOptions::default()
    };
    let out = palette_card_bytes(&input, &options).unwrap();
    assert_eq!(out.palette.len(), 10);
    assert!(out.palette.iter().all(|h| h.len() == 6));

    let card = image::load_from_memory(&out.card).unwrap();
    let layout = LayoutSpec::compute(180, 10).unwrap();
    assert_eq!(card.dimensions(), layout.canvas_size());

    let wallpaper = image::load_from_memory(out.wallpaper.as_deref().unwrap()).unwrap();
    assert!(wallpaper.width() > card.width());
}

#[test]
fn undecodable_bytes_abort_the_request() {
    assert!(matches!(
        palette_card_bytes(b"\x89PNG but not really", &CardOptions::default()),
        Err(CardError::DecodeFailure(_))
    ));
}

#[test]
fn tiny_upload_is_rejected_before_layout() {
    let img = DynamicImage::ImageRgb8(photo(500, 30));
    assert!(matches!(
        make_card(&img, &CardOptions::default()),
        Err(CardError::DegenerateImage { .. })
    ));
}
