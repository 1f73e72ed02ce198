use lumibake_render::film::Film;
use lumibake_render::math::Vec3;

#[test]
fn put_then_develop_averages_by_weight() {
    let mut film = Film::new(2, 1, 1);
    film.put(0, 0, Vec3::new(1.0, 0.0, 0.0));
    film.put(0, 0, Vec3::new(3.0, 0.0, 0.0));

    let image = film.develop();
    assert_eq!(image.width, 2);
    assert_eq!(image.height, 1);
    assert_eq!(image.pixel(0, 0), [2.0, 0.0, 0.0]);
}

#[test]
fn puts_land_on_the_addressed_pixel() {
    let mut film = Film::new(3, 2, 1);
    film.put(2, 1, Vec3::new(1.0, 2.0, 3.0));

    let image = film.develop();
    assert_eq!(image.pixel(2, 1), [1.0, 2.0, 3.0]);
    assert_eq!(image.pixel(2, 0), [0.0, 0.0, 0.0]);
    assert_eq!(image.pixel(1, 1), [0.0, 0.0, 0.0]);
}

#[test]
fn untouched_pixels_develop_black() {
    let film = Film::new(3, 2, 1);
    let image = film.develop();
    for y in 0..2 {
        for x in 0..3 {
            let px = image.pixel(x, y);
            assert_eq!(px, [0.0, 0.0, 0.0]);
            assert!(px.iter().all(|c| c.is_finite()));
        }
    }
}

#[test]
fn supersampled_film_box_filters_down() {
    let mut film = Film::new(1, 1, 2);
    assert_eq!(film.fine_width(), 2);
    assert_eq!(film.fine_height(), 2);

    film.put(0, 0, Vec3::new(1.0, 0.0, 0.0));
    film.put(1, 0, Vec3::new(0.0, 1.0, 0.0));
    film.put(0, 1, Vec3::new(0.0, 0.0, 1.0));
    film.put(1, 1, Vec3::new(1.0, 1.0, 1.0));

    let image = film.develop();
    assert_eq!(image.width, 1);
    assert_eq!(image.height, 1);
    assert_eq!(image.pixel(0, 0), [0.5, 0.5, 0.5]);
}

#[test]
fn partially_covered_pixel_ignores_empty_bins() {
    let mut film = Film::new(1, 1, 2);
    film.put(0, 0, Vec3::new(0.8, 0.4, 0.2));

    let image = film.develop();
    assert_eq!(image.pixel(0, 0), [0.8, 0.4, 0.2]);
}

#[test]
fn out_of_bounds_puts_are_dropped() {
    let mut film = Film::new(2, 2, 1);
    film.put(2, 0, Vec3::new(5.0, 5.0, 5.0));
    film.put(0, 2, Vec3::new(5.0, 5.0, 5.0));

    let image = film.develop();
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(image.pixel(x, y), [0.0, 0.0, 0.0]);
        }
    }
}
