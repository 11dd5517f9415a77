//! End-to-end drawing scenarios through the public API.

#![allow(clippy::unwrap_used)]

use softblit::prelude::*;

// ============================================================================
// Combine laws
// ============================================================================

const ALL_OPS: [BlendOp; 6] = [
    BlendOp::Copy,
    BlendOp::Add,
    BlendOp::Dodge,
    BlendOp::Multiply,
    BlendOp::Overlay,
    BlendOp::HsvShift,
];

#[test]
fn test_zero_alpha_is_noop_through_every_entry_point() {
    for op in ALL_OPS {
        let mut pm = Pixmap::new(16, 16).unwrap();
        blit::clear(&mut pm.surface(), Rgba::rgb(40, 90, 140));
        let before = pm.pixels().to_vec();

        let blend = Blend::new(op);
        let paint = Paint::new(Rgba::RED).with_blend(blend).with_alpha(0);
        let mut src = Pixmap::new(4, 4).unwrap();
        blit::clear(&mut src.surface(), Rgba::GREEN);

        let mut s = pm.surface();
        blit::fill_rect(&mut s, IntRect::of_size(8, 8), Rgba::RED, 0, blend);
        blit::blit(&mut s, (1, 1), src.as_ref(), src.as_ref().bounds(), 0, blend);
        transform::scaled_blit(
            &mut s,
            IntRect::of_size(8, 8),
            src.as_ref(),
            src.as_ref().bounds(),
            0,
            blend,
        );
        render::draw_line(&mut s, 0, 0, 15, 15, paint);
        render::draw_circle(&mut s, 8, 8, 5, paint);
        render::fill_convex_polygon(&mut s, &[(1, 1), (10, 2), (5, 12)], paint);
        drop(s);

        assert_eq!(pm.pixels(), &before[..], "op {op:?} drew at zero alpha");
    }
}

#[test]
fn test_copy_full_alpha_overwrites_exactly() {
    let mut pm = Pixmap::new(8, 8).unwrap();
    blit::clear(&mut pm.surface(), Rgba::rgb(1, 2, 3));
    let src = Rgba::new(250, 3, 99, 180);
    blit::fill_rect(&mut pm.surface(), IntRect::of_size(8, 8), src, OPAQUE, Blend::copy());
    assert!(pm.pixels().iter().all(|&p| p == src.to_bits()));
}

// ============================================================================
// Cross-module invariants
// ============================================================================

#[test]
fn test_scaled_blit_at_unit_scale_equals_blit() {
    let mut src = Pixmap::new(9, 6).unwrap();
    {
        let mut s = src.surface();
        for y in 0..6 {
            for x in 0..9 {
                s.set_pixel(x, y, Rgba::new((x * 29) as u8, (y * 41) as u8, 77, 255));
            }
        }
    }
    let mut via_blit = Pixmap::new(16, 16).unwrap();
    let mut via_scaled = Pixmap::new(16, 16).unwrap();
    blit::blit(
        &mut via_blit.surface(),
        (4, 5),
        src.as_ref(),
        src.as_ref().bounds(),
        OPAQUE,
        Blend::copy(),
    );
    transform::scaled_blit(
        &mut via_scaled.surface(),
        IntRect::new(4, 5, 9, 6),
        src.as_ref(),
        src.as_ref().bounds(),
        OPAQUE,
        Blend::copy(),
    );
    assert_eq!(via_blit.pixels(), via_scaled.pixels());
}

#[test]
fn test_triangle_equals_three_vertex_polygon() {
    let mut a = Pixmap::new(24, 24).unwrap();
    let mut b = Pixmap::new(24, 24).unwrap();
    let tri = [(2, 3), (20, 7), (9, 21)];
    render::fill_triangle(&mut a.surface(), tri[0], tri[1], tri[2], Paint::new(Rgba::RED));
    render::fill_convex_polygon(&mut b.surface(), &tri, Paint::new(Rgba::RED));
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn test_hsv_round_trip_sampled_cube() {
    for r in (0..=255u32).step_by(7) {
        for g in (0..=255u32).step_by(7) {
            for b in (0..=255u32).step_by(7) {
                let orig = Rgba::rgb(r as u8, g as u8, b as u8);
                let back: Rgba = Hsv::from(orig).into();
                for (x, y) in [(orig.r, back.r), (orig.g, back.g), (orig.b, back.b)] {
                    assert!(
                        (i32::from(x) - i32::from(y)).abs() <= 1,
                        "rgb({r},{g},{b}) -> {back:?}"
                    );
                }
            }
        }
    }
}

// ============================================================================
// Composed scenes
// ============================================================================

#[test]
fn test_layered_scene_is_deterministic() {
    let draw = || {
        let mut pm = Pixmap::new(64, 64).unwrap();
        let mut s = pm.surface();
        blit::clear(&mut s, Rgba::rgb(10, 10, 30));
        blit::fill_rect_gradient(
            &mut s,
            IntRect::of_size(64, 32),
            Rgba::rgb(10, 10, 30),
            Rgba::rgb(60, 60, 120),
            OPAQUE,
            Blend::copy(),
        );
        render::fill_circle(&mut s, 32, 32, 14, Paint::new(Rgba::rgb(200, 170, 40)));
        render::draw_circle(
            &mut s,
            32,
            32,
            14,
            Paint::new(Rgba::WHITE).with_blend(Blend::add().with_source_alpha()),
        );
        render::draw_thick_line(&mut s, 2, 60, 61, 50, 3, Paint::new(Rgba::rgb(30, 90, 30)));
        drop(s);
        pm
    };
    let a = draw();
    let b = draw();
    assert_eq!(a.pixels(), b.pixels());
    // The scene actually drew something over the background.
    assert_ne!(a.as_ref().pixel(32, 32), Some(Rgba::rgb(10, 10, 30)));
}

#[test]
fn test_glyph_composites_over_scene() {
    let mut pm = Pixmap::new(12, 12).unwrap();
    blit::clear(&mut pm.surface(), Rgba::rgb(0, 0, 80));
    // A 3x3 "dot" glyph with a soft edge.
    let data = [0u8, 128, 0, 128, 255, 128, 0, 128, 0];
    let cov = Coverage::new(&data, 3, 3).unwrap();
    glyph::draw_glyph(
        &mut pm.surface(),
        (4, 4),
        &cov,
        Rgba::WHITE,
        OPAQUE,
        Blend::copy(),
    );
    let center = pm.as_ref().pixel(5, 5).unwrap();
    let edge = pm.as_ref().pixel(4, 5).unwrap();
    let corner = pm.as_ref().pixel(4, 4).unwrap();
    assert_eq!(center, Rgba::WHITE);
    assert!(edge.r > 100 && edge.r < 160);
    assert_eq!(corner, Rgba::rgb(0, 0, 80));
}

#[test]
fn test_flipped_surface_draws_bottom_up() {
    let mut buf = vec![0u32; 8 * 8];
    let mut s = Surface::new(&mut buf, 8, 8).unwrap().flipped(true);
    blit::fill_rect(&mut s, IntRect::new(0, 0, 8, 2), Rgba::RED, OPAQUE, Blend::copy());
    drop(s);
    // Logical top rows land at the physical bottom.
    assert_eq!(Rgba::from_bits(buf[7 * 8]), Rgba::RED);
    assert_eq!(Rgba::from_bits(buf[6 * 8]), Rgba::RED);
    assert_eq!(buf[0], 0);
}

// ============================================================================
// Backend interception
// ============================================================================

#[derive(Default)]
struct CountingBackend {
    clears: u32,
    fills: u32,
    blits: u32,
}

impl AccelHook for CountingBackend {
    fn clear(&mut self, _color: Rgba) -> bool {
        self.clears += 1;
        true
    }

    fn fill_rect(&mut self, _rect: IntRect, _color: Rgba, _alpha: u32, _blend: Blend) -> bool {
        self.fills += 1;
        // Handle fills but decline everything else.
        true
    }

    fn blit(&mut self, _dst_pos: (i32, i32), _src_rect: IntRect, _alpha: u32, _blend: Blend) -> bool {
        self.blits += 1;
        false
    }
}

#[test]
fn test_hook_first_refusal_and_software_fallback() {
    let mut src = Pixmap::new(2, 2).unwrap();
    blit::clear(&mut src.surface(), Rgba::GREEN);

    let mut buf = vec![0u32; 8 * 8];
    let mut backend = CountingBackend::default();
    let mut s = Surface::new(&mut buf, 8, 8)
        .unwrap()
        .with_hook(&mut backend);

    blit::clear(&mut s, Rgba::RED);
    blit::fill_rect(&mut s, IntRect::of_size(4, 4), Rgba::BLUE, OPAQUE, Blend::copy());
    blit::blit(&mut s, (0, 0), src.as_ref(), src.as_ref().bounds(), OPAQUE, Blend::copy());
    drop(s);

    assert_eq!(backend.clears, 1);
    assert_eq!(backend.fills, 1);
    assert_eq!(backend.blits, 1);
    // Clear and fill were claimed by the backend; the blit was declined and
    // ran in software.
    assert_eq!(Rgba::from_bits(buf[0]), Rgba::GREEN);
    assert_eq!(buf[3 * 8 + 3], 0);
}
