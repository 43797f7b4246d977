use sparselife::Population;
use sparselife::Viewport;
use sparselife::camera::Camera;
use sparselife::pattern;

fn glider() -> Population {
    Population::new([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)])
}

#[test]
fn glider_phases() {
    let mut p = glider();
    let window = Viewport::new(0, 0, 3, 3);

    let mut frames = Vec::new();
    for _ in 0..5 {
        frames.push(pattern::to_plaintext(&p, window));
        p.step();
    }

    insta::assert_snapshot!(frames.join("---\n").trim_end(), @r"
    .*..
    ..*.
    ***.
    ....
    ---
    ....
    *.*.
    .**.
    .*..
    ---
    ....
    ..*.
    *.*.
    .**.
    ---
    ....
    .*..
    ..**
    .**.
    ---
    ....
    ..*.
    ...*
    .***
    ");
}

#[test]
fn blinker_phases() {
    let mut p = Population::new([(0, 1), (1, 1), (2, 1)]);
    let window = Viewport::new(0, 0, 2, 2);

    let horizontal = pattern::to_plaintext(&p, window);
    p.step();
    let vertical = pattern::to_plaintext(&p, window);

    insta::assert_snapshot!(format!("{horizontal}---\n{vertical}").trim_end(), @r"
    ...
    ***
    ...
    ---
    .*.
    .*.
    .*.
    ");
}

#[test]
fn glider_in_braille() {
    let p = glider();
    let mut cam = Camera::new(4, 4);

    cam.draw(&p);

    insta::assert_snapshot!(cam.render().trim_end(), @"⠬⠆");
}

#[test]
fn braille_follows_the_glider() {
    let mut p = glider();
    let mut cam = Camera::new(8, 8);

    let mut frames = Vec::new();
    for _ in 0..3 {
        cam.reset();
        cam.draw(&p);
        frames.push(cam.render().to_string());

        p.advance(4);
        cam.offset_x(1);
        cam.offset_y(1);
    }

    // the camera keeps pace with the glider, so every frame is the same
    assert!(frames.windows(2).all(|w| w[0] == w[1]));
    insta::assert_snapshot!(frames[0].trim_end(), @r"
    ⠬⠆⠀⠀
    ⠀⠀⠀⠀
    ");
}
